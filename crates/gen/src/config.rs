//! Named presets and file-based parameter loading.
//!
//! Parameter files are YAML (`.yaml` / `.yml`) or JSON (`.json`). Every
//! loaded value is validated before it is returned.

use std::path::Path;

use galaxy_common::Rgb;

use crate::generator::GenerateError;
use crate::params::{GalaxyParameters, Geometry};

/// Errors from loading parameters.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown preset {0:?} (available: {available})", available = PRESET_NAMES.join(", "))]
    UnknownPreset(String),
    #[error("unsupported config format {0:?}: expected .yaml, .yml or .json")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Invalid(#[from] GenerateError),
}

/// Names accepted by [`preset`].
pub const PRESET_NAMES: &[&str] = &["spiral", "arm", "bloom"];

const INSIDE: Rgb = Rgb::new(1.0, 96.0 / 255.0, 48.0 / 255.0); // #ff6030
const OUTSIDE: Rgb = Rgb::new(27.0 / 255.0, 57.0 / 255.0, 132.0 / 255.0); // #1b3984

/// Three-branch spiral disc.
pub fn spiral() -> GalaxyParameters {
    GalaxyParameters {
        count: 100_000,
        size: 0.01,
        inside_color: INSIDE,
        outside_color: OUTSIDE,
        geometry: Geometry::Spiral {
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
        },
    }
}

/// Single arm with eccentricity-controlled thickness.
pub fn arm() -> GalaxyParameters {
    GalaxyParameters {
        count: 50_000,
        size: 0.01,
        inside_color: INSIDE,
        outside_color: OUTSIDE,
        geometry: Geometry::Arm {
            arm_length: 5.0,
            arm_radius: 0.6,
            eccentricity: 3.0,
            spin: 0.3,
        },
    }
}

/// Spiral tuned for a bloom pass: brighter core, saturated rim, larger points.
pub fn bloom() -> GalaxyParameters {
    GalaxyParameters {
        size: 0.02,
        inside_color: Rgb::new(1.0, 208.0 / 255.0, 144.0 / 255.0), // #ffd090
        outside_color: Rgb::new(48.0 / 255.0, 80.0 / 255.0, 1.0),  // #3050ff
        ..spiral()
    }
}

/// Look up a preset by name.
pub fn preset(name: &str) -> Result<GalaxyParameters, ConfigError> {
    match name {
        "spiral" => Ok(spiral()),
        "arm" => Ok(arm()),
        "bloom" => Ok(bloom()),
        other => Err(ConfigError::UnknownPreset(other.to_string())),
    }
}

/// Parse and validate YAML parameters.
pub fn from_yaml_str(s: &str) -> Result<GalaxyParameters, ConfigError> {
    let params: GalaxyParameters = serde_yaml::from_str(s)?;
    params.validate()?;
    Ok(params)
}

/// Parse and validate JSON parameters.
pub fn from_json_str(s: &str) -> Result<GalaxyParameters, ConfigError> {
    let params: GalaxyParameters = serde_json::from_str(s)?;
    params.validate()?;
    Ok(params)
}

/// Load parameters from a file, choosing the format by extension.
pub fn load(path: impl AsRef<Path>) -> Result<GalaxyParameters, ConfigError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), format = %ext, "loading galaxy parameters");
    match ext.as_str() {
        "yaml" | "yml" => from_yaml_str(&text),
        "json" => from_json_str(&text),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Render parameters as YAML, the format used for presets on disk.
pub fn to_yaml(params: &GalaxyParameters) -> Result<String, ConfigError> {
    Ok(serde_yaml::to_string(params)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn presets_are_valid() {
        for name in PRESET_NAMES {
            let p = preset(name).unwrap();
            assert!(p.validate().is_ok(), "{name}");
        }
    }

    #[test]
    fn preset_colors_match_hex() {
        let p = spiral();
        assert_eq!(p.inside_color.to_hex(), "#ff6030");
        assert_eq!(p.outside_color.to_hex(), "#1b3984");
        assert_eq!(bloom().inside_color.to_hex(), "#ffd090");
        assert_eq!(bloom().outside_color.to_hex(), "#3050ff");
    }

    #[test]
    fn unknown_preset_lists_choices() {
        let err = preset("andromeda").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPreset(_)));
        assert!(err.to_string().contains("spiral, arm, bloom"));
    }

    #[test]
    fn yaml_round_trip() {
        let yaml = to_yaml(&arm()).unwrap();
        assert!(yaml.contains("mode: arm"));
        let back = from_yaml_str(&yaml).unwrap();
        assert_eq!(back.geometry, arm().geometry);
        assert_eq!(back.inside_color.to_hex(), "#ff6030");
    }

    #[test]
    fn yaml_accepts_integer_literals() {
        let yaml = "\
count: 2000
inside_color: '#ffffff'
outside_color: 0
mode: spiral
radius: 4
branches: 5
spin: -1
randomness: 0
randomness_power: 2
";
        let p = from_yaml_str(yaml).unwrap();
        assert_eq!(p.count, 2000);
        assert!(matches!(
            p.geometry,
            Geometry::Spiral {
                radius,
                branches: 5,
                ..
            } if radius == 4.0
        ));
    }

    #[test]
    fn invalid_values_rejected_on_load() {
        let json = r##"{"count":0,"inside_color":"#ffffff","outside_color":"#000000",
            "mode":"spiral","radius":1,"branches":3,"spin":1,"randomness":0.1,"randomness_power":2}"##;
        assert!(matches!(
            from_json_str(json),
            Err(ConfigError::Invalid(GenerateError::InvalidParameter { name: "count", .. }))
        ));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("galaxy.yaml");
        std::fs::write(&yaml_path, to_yaml(&spiral()).unwrap()).unwrap();
        assert_eq!(load(&yaml_path).unwrap().count, 100_000);

        let json_path = dir.path().join("galaxy.json");
        let mut f = std::fs::File::create(&json_path).unwrap();
        f.write_all(serde_json::to_string(&arm()).unwrap().as_bytes())
            .unwrap();
        assert_eq!(load(&json_path).unwrap().geometry.name(), "arm");

        let txt_path = dir.path().join("galaxy.txt");
        std::fs::write(&txt_path, "count: 1").unwrap();
        assert!(matches!(
            load(&txt_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            load(dir.path().join("missing.yaml")),
            Err(ConfigError::Io(_))
        ));
    }
}
