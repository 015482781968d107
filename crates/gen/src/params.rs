use galaxy_common::Rgb;
use serde::{Deserialize, Serialize};

use crate::generator::GenerateError;

/// Shape model used to place points.
///
/// The two models come from different iterations of the galaxy sketch and
/// are kept as separate strategies rather than merged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Geometry {
    /// Flat disc in the x-z plane with `branches` evenly spaced spiral arms.
    Spiral {
        radius: f32,
        #[serde(alias = "branchCount")]
        branches: u32,
        spin: f32,
        randomness: f32,
        #[serde(alias = "randomnessPower")]
        randomness_power: f32,
    },
    /// Single twisted arm in the x-y plane, extending to both sides of the
    /// center, with a roughly circular cross-section of `arm_radius`.
    Arm {
        #[serde(alias = "armLength")]
        arm_length: f32,
        #[serde(alias = "armRadius")]
        arm_radius: f32,
        eccentricity: f32,
        spin: f32,
    },
}

impl Geometry {
    /// Short name used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Geometry::Spiral { .. } => "spiral",
            Geometry::Arm { .. } => "arm",
        }
    }

    /// Maximum radial distance `R` a point is seeded at, before jitter.
    pub fn extent(&self) -> f32 {
        match *self {
            Geometry::Spiral { radius, .. } => radius,
            Geometry::Arm { arm_length, .. } => arm_length,
        }
    }

    pub fn spin(&self) -> f32 {
        match *self {
            Geometry::Spiral { spin, .. } | Geometry::Arm { spin, .. } => spin,
        }
    }

    fn validate(&self) -> Result<(), GenerateError> {
        match *self {
            Geometry::Spiral {
                radius,
                branches,
                spin,
                randomness,
                randomness_power,
            } => {
                positive("radius", radius)?;
                if branches < 1 {
                    return Err(GenerateError::invalid("branches", "must be at least 1"));
                }
                finite("spin", spin)?;
                if !(randomness.is_finite() && randomness >= 0.0) {
                    return Err(GenerateError::invalid(
                        "randomness",
                        format!("must be finite and >= 0, got {randomness}"),
                    ));
                }
                at_least_one("randomness_power", randomness_power)
            }
            Geometry::Arm {
                arm_length,
                arm_radius,
                eccentricity,
                spin,
            } => {
                positive("arm_length", arm_length)?;
                positive("arm_radius", arm_radius)?;
                at_least_one("eccentricity", eccentricity)?;
                finite("spin", spin)
            }
        }
    }
}

/// Everything needed to generate one point cloud.
///
/// Immutable per generation call: the caller builds a fresh value for every
/// change and passes it by value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalaxyParameters {
    pub count: usize,
    /// Point size for the renderer. The generator ignores it.
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(alias = "insideColor")]
    pub inside_color: Rgb,
    #[serde(alias = "outsideColor")]
    pub outside_color: Rgb,
    #[serde(flatten)]
    pub geometry: Geometry,
}

fn default_size() -> f32 {
    0.01
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        crate::config::spiral()
    }
}

impl GalaxyParameters {
    /// Replace the point count.
    pub fn with_count(self, count: usize) -> Self {
        Self { count, ..self }
    }

    pub fn with_geometry(self, geometry: Geometry) -> Self {
        Self { geometry, ..self }
    }

    pub fn with_colors(self, inside_color: Rgb, outside_color: Rgb) -> Self {
        Self {
            inside_color,
            outside_color,
            ..self
        }
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.count == 0 {
            return Err(GenerateError::invalid("count", "must be at least 1"));
        }
        if !(self.size.is_finite() && self.size >= 0.0) {
            return Err(GenerateError::invalid(
                "size",
                format!("must be finite and >= 0, got {}", self.size),
            ));
        }
        color("inside_color", self.inside_color)?;
        color("outside_color", self.outside_color)?;
        self.geometry.validate()
    }
}

fn color(name: &'static str, value: Rgb) -> Result<(), GenerateError> {
    Rgb::try_new(value.r, value.g, value.b)
        .map(|_| ())
        .map_err(|e| GenerateError::invalid(name, e.to_string()))
}

fn positive(name: &'static str, value: f32) -> Result<(), GenerateError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GenerateError::invalid(
            name,
            format!("must be finite and > 0, got {value}"),
        ))
    }
}

fn at_least_one(name: &'static str, value: f32) -> Result<(), GenerateError> {
    if value.is_finite() && value >= 1.0 {
        Ok(())
    } else {
        Err(GenerateError::invalid(
            name,
            format!("must be finite and >= 1, got {value}"),
        ))
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), GenerateError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GenerateError::invalid(name, format!("must be finite, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spiral(radius: f32, branches: u32) -> GalaxyParameters {
        GalaxyParameters::default().with_geometry(Geometry::Spiral {
            radius,
            branches,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
        })
    }

    fn arm(arm_length: f32, arm_radius: f32, eccentricity: f32) -> GalaxyParameters {
        GalaxyParameters::default().with_geometry(Geometry::Arm {
            arm_length,
            arm_radius,
            eccentricity,
            spin: 0.3,
        })
    }

    fn rejected_field(params: GalaxyParameters) -> &'static str {
        match params.validate() {
            Err(GenerateError::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(GalaxyParameters::default().validate().is_ok());
        assert!(arm(5.0, 0.6, 3.0).validate().is_ok());
    }

    #[test]
    fn zero_count_rejected() {
        assert_eq!(rejected_field(GalaxyParameters::default().with_count(0)), "count");
    }

    #[test]
    fn spiral_ranges_enforced() {
        assert_eq!(rejected_field(spiral(0.0, 3)), "radius");
        assert_eq!(rejected_field(spiral(-1.0, 3)), "radius");
        assert_eq!(rejected_field(spiral(f32::NAN, 3)), "radius");
        assert_eq!(rejected_field(spiral(5.0, 0)), "branches");

        let mut p = spiral(5.0, 3);
        if let Geometry::Spiral {
            randomness_power, ..
        } = &mut p.geometry
        {
            *randomness_power = 0.5;
        }
        assert_eq!(rejected_field(p), "randomness_power");

        let mut p = spiral(5.0, 3);
        if let Geometry::Spiral { randomness, .. } = &mut p.geometry {
            *randomness = -0.1;
        }
        assert_eq!(rejected_field(p), "randomness");
    }

    #[test]
    fn color_channels_enforced() {
        let base = spiral(5.0, 3);
        let bad = Rgb::new(2.0, -1.0, f32::NAN);
        assert_eq!(rejected_field(base.with_colors(bad, Rgb::WHITE)), "inside_color");
        assert_eq!(rejected_field(base.with_colors(Rgb::BLACK, bad)), "outside_color");
        assert_eq!(
            rejected_field(base.with_colors(Rgb::new(0.0, f32::NAN, 0.0), Rgb::WHITE)),
            "inside_color"
        );
        assert!(base.with_colors(Rgb::BLACK, Rgb::WHITE).validate().is_ok());
    }

    #[test]
    fn arm_ranges_enforced() {
        assert_eq!(rejected_field(arm(0.0, 0.5, 2.0)), "arm_length");
        assert_eq!(rejected_field(arm(5.0, 0.0, 2.0)), "arm_radius");
        assert_eq!(rejected_field(arm(5.0, 0.5, 0.9)), "eccentricity");
    }

    #[test]
    fn single_branch_is_valid() {
        assert!(spiral(1.0, 1).validate().is_ok());
    }

    #[test]
    fn extent_per_mode() {
        assert_eq!(spiral(4.0, 3).geometry.extent(), 4.0);
        assert_eq!(arm(7.0, 0.5, 2.0).geometry.extent(), 7.0);
        assert_eq!(arm(7.0, 0.5, 2.0).geometry.name(), "arm");
    }

    #[test]
    fn deserializes_debug_panel_field_names() {
        let json = r##"{
            "count": 1000,
            "size": 0.02,
            "insideColor": "#ff6030",
            "outsideColor": "#1b3984",
            "mode": "spiral",
            "radius": 5.0,
            "branchCount": 4,
            "spin": 1.0,
            "randomness": 0.2,
            "randomnessPower": 3.0
        }"##;
        let p: GalaxyParameters = serde_json::from_str(json).unwrap();
        assert_eq!(p.count, 1000);
        assert!(matches!(p.geometry, Geometry::Spiral { branches: 4, .. }));
    }

    #[test]
    fn size_defaults_when_missing() {
        let json = r##"{
            "count": 10,
            "inside_color": 16777215,
            "outside_color": "#000000",
            "mode": "arm",
            "arm_length": 3.0,
            "arm_radius": 0.5,
            "eccentricity": 2.0,
            "spin": 0.1
        }"##;
        let p: GalaxyParameters = serde_json::from_str(json).unwrap();
        assert_eq!(p.size, 0.01);
        assert_eq!(p.inside_color, Rgb::WHITE);
    }

    #[test]
    fn off_grid_colors_survive_a_save() {
        use crate::random::SplitMix64;

        let params = GalaxyParameters::default()
            .with_count(200)
            .with_colors(Rgb::new(0.5, 0.25, 0.1), Rgb::new(0.3, 0.7, 0.9));
        let json = serde_json::to_string(&params).unwrap();
        let back: GalaxyParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);

        let yaml = serde_yaml::to_string(&params).unwrap();
        assert_eq!(serde_yaml::from_str::<GalaxyParameters>(&yaml).unwrap(), params);

        let a = crate::generate(params, &mut SplitMix64::new(12)).unwrap();
        let b = crate::generate(back, &mut SplitMix64::new(12)).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
