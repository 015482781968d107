use galaxy_common::Rgb;
use galaxy_math::{AxisRotation, DVec3, MathError};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::generator::GenerateError;

/// Flat point buffers ready for upload.
///
/// `positions` holds `(x, y, z)` triplets and `colors` holds `(r, g, b)`
/// triplets in the same order. Both always have length `3 * len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCloud")]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

#[derive(Deserialize)]
struct RawCloud {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl TryFrom<RawCloud> for PointCloud {
    type Error = GenerateError;

    fn try_from(raw: RawCloud) -> Result<Self, Self::Error> {
        PointCloud::from_buffers(raw.positions, raw.colors)
    }
}

/// Axis-aligned bounding box of a cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

impl PointCloud {
    pub(crate) fn from_parts(positions: Vec<f32>, colors: Vec<f32>) -> Self {
        debug_assert_eq!(positions.len(), colors.len());
        debug_assert_eq!(positions.len() % 3, 0);
        Self { positions, colors }
    }

    /// Wrap existing buffers, checking the triplet layout.
    pub fn from_buffers(positions: Vec<f32>, colors: Vec<f32>) -> Result<Self, GenerateError> {
        if positions.len() != colors.len() {
            return Err(GenerateError::invalid(
                "colors",
                format!(
                    "length {} does not match positions length {}",
                    colors.len(),
                    positions.len()
                ),
            ));
        }
        if positions.len() % 3 != 0 {
            return Err(GenerateError::invalid(
                "positions",
                format!("length {} is not a multiple of 3", positions.len()),
            ));
        }
        Ok(Self { positions, colors })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Give up ownership of both buffers.
    pub fn into_buffers(self) -> (Vec<f32>, Vec<f32>) {
        (self.positions, self.colors)
    }

    /// Position of point `i`. Panics if `i >= len()`.
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[3 * i..3 * i + 3])
    }

    /// Color of point `i`. Panics if `i >= len()`.
    pub fn color(&self, i: usize) -> Rgb {
        let c = &self.colors[3 * i..3 * i + 3];
        Rgb::new(c[0], c[1], c[2])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Vec3, Rgb)> + '_ {
        self.positions
            .chunks_exact(3)
            .zip(self.colors.chunks_exact(3))
            .map(|(p, c)| (Vec3::from_slice(p), Rgb::new(c[0], c[1], c[2])))
    }

    /// Bounding box, or `None` for an empty cloud.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.positions.chunks_exact(3).map(Vec3::from_slice);
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Bounds { min, max })
    }

    /// SHA-256 over the little-endian bytes of both buffers, as lowercase hex.
    ///
    /// Two clouds with the same fingerprint are bit-identical.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.len() as u64).to_le_bytes());
        for v in self.positions.iter().chain(&self.colors) {
            hasher.update(v.to_le_bytes());
        }
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// A new cloud with every point rotated by `angle` radians around `axis`
    /// (through the origin). Colors are carried over unchanged.
    pub fn rotated_around_axis(&self, axis: DVec3, angle: f64) -> Result<Self, MathError> {
        let rotation = AxisRotation::new(axis, angle)?;
        let positions = self
            .positions
            .chunks_exact(3)
            .flat_map(|p| {
                let q = rotation.apply(DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64));
                [q.x as f32, q.y as f32, q.z as f32]
            })
            .collect();
        Ok(Self {
            positions,
            colors: self.colors.clone(),
        })
    }
}
