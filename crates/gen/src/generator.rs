use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::cloud::PointCloud;
use crate::params::{GalaxyParameters, Geometry};
use crate::random::RandomSource;

/// How many points are generated between cancellation checks.
const CANCEL_POLL_INTERVAL: usize = 4096;

/// Errors from point-cloud generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("generation cancelled after {completed} of {count} points")]
    Cancelled { completed: usize, count: usize },
}

impl GenerateError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        GenerateError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Base angle of the branch that point `i` is seeded on.
///
/// Points cycle through branches by index, so every branch receives the same
/// number of points (within one) whatever the count.
pub fn branch_angle(i: usize, branches: u32) -> f32 {
    let branches = branches.max(1) as usize;
    (i % branches) as f32 / branches as f32 * TAU
}

/// Generate a fresh point cloud from `params`, drawing from `rng`.
pub fn generate<R>(params: GalaxyParameters, rng: &mut R) -> Result<PointCloud, GenerateError>
where
    R: RandomSource + ?Sized,
{
    run(params, rng, None)
}

/// Like [`generate`], but gives up with [`GenerateError::Cancelled`] once
/// `cancel` is observed set. The flag is polled every few thousand points.
pub fn generate_cancellable<R>(
    params: GalaxyParameters,
    rng: &mut R,
    cancel: &AtomicBool,
) -> Result<PointCloud, GenerateError>
where
    R: RandomSource + ?Sized,
{
    run(params, rng, Some(cancel))
}

fn run<R>(
    params: GalaxyParameters,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<PointCloud, GenerateError>
where
    R: RandomSource + ?Sized,
{
    params.validate()?;
    let count = params.count;
    let _span =
        tracing::info_span!("generate_galaxy", mode = params.geometry.name(), count).entered();
    let started = Instant::now();

    let len = count
        .checked_mul(3)
        .ok_or_else(|| GenerateError::invalid("count", format!("{count} points overflow")))?;
    let mut positions = Vec::new();
    let mut colors = Vec::new();
    positions
        .try_reserve_exact(len)
        .and_then(|()| colors.try_reserve_exact(len))
        .map_err(|e| GenerateError::invalid("count", format!("{count} points: {e}")))?;
    let extent = params.geometry.extent();

    for i in 0..count {
        if let Some(flag) = cancel {
            if i % CANCEL_POLL_INTERVAL == 0 && flag.load(Ordering::Relaxed) {
                tracing::warn!(completed = i, count, "generation cancelled");
                return Err(GenerateError::Cancelled {
                    completed: i,
                    count,
                });
            }
        }

        let (position, radial) = match params.geometry {
            Geometry::Spiral {
                radius,
                branches,
                spin,
                randomness,
                randomness_power,
            } => {
                let r = uniform(rng) * radius;
                let angle = branch_angle(i, branches) + r * spin;
                let ox = jitter(rng, randomness_power, randomness, r);
                let oy = jitter(rng, randomness_power, randomness, r);
                let oz = jitter(rng, randomness_power, randomness, r);
                ([angle.cos() * r + ox, oy, angle.sin() * r + oz], r)
            }
            Geometry::Arm {
                arm_length,
                arm_radius,
                eccentricity,
                spin,
            } => {
                let magnitude = uniform(rng) * arm_length;
                let r = magnitude * rng.next_sign();
                let rotation = magnitude * TAU * spin;

                // Distance from the arm centerline, concentrated near zero.
                let z = arm_radius * biased(rng, eccentricity) * rng.next_sign();
                let chord = (arm_radius * arm_radius - z * z).max(0.0).sqrt();
                let dy = biased(rng, eccentricity) * rng.next_sign() * chord;

                (
                    [r * rotation.cos(), r * rotation.sin() + dy, z],
                    magnitude,
                )
            }
        };

        let color = params
            .inside_color
            .lerp(params.outside_color, radial / extent);
        positions.extend_from_slice(&position);
        colors.extend_from_slice(&color.to_array());
    }

    tracing::debug!(
        points = count,
        elapsed_us = started.elapsed().as_micros() as u64,
        "galaxy generated"
    );

    Ok(PointCloud::from_parts(positions, colors))
}

fn uniform<R: RandomSource + ?Sized>(rng: &mut R) -> f32 {
    rng.next_uniform() as f32
}

/// Uniform draw raised to `power`; larger powers pull values toward zero.
fn biased<R: RandomSource + ?Sized>(rng: &mut R, power: f32) -> f32 {
    uniform(rng).powf(power)
}

/// Signed offset from the branch curve, scaled by distance from the center.
fn jitter<R: RandomSource + ?Sized>(rng: &mut R, power: f32, randomness: f32, r: f32) -> f32 {
    biased(rng, power) * rng.next_sign() * randomness * r
}
