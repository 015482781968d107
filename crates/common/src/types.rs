use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a point cloud handed to a render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CloudId(pub Uuid);

impl CloudId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for CloudId {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from parsing a color.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorParseError {
    #[error("invalid hex color {0:?}: expected #rrggbb")]
    InvalidHex(String),
    #[error("packed color {0:#x} exceeds 24 bits")]
    PackedOverflow(u32),
    #[error("color channel {channel} = {value} is outside [0, 1]")]
    ChannelOutOfRange { channel: char, value: f32 },
}

/// Linear RGB color with each channel in [0, 1].
///
/// Accepts three input forms when deserialized: a `"#rrggbb"` string, a
/// packed `0xRRGGBB` integer, or an `{ r, g, b }` map. Serializes as hex when
/// every channel is an exact 8-bit value, otherwise as the channel map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "ColorRepr")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from channels, rejecting anything outside [0, 1] (including NaN).
    pub fn try_new(r: f32, g: f32, b: f32) -> Result<Self, ColorParseError> {
        for (channel, value) in [('r', r), ('g', g), ('b', b)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ColorParseError::ChannelOutOfRange { channel, value });
            }
        }
        Ok(Self { r, g, b })
    }

    /// Decode a 24-bit packed `0xRRGGBB` value.
    pub fn from_packed(packed: u32) -> Result<Self, ColorParseError> {
        if packed > 0x00ff_ffff {
            return Err(ColorParseError::PackedOverflow(packed));
        }
        let channel = |shift: u32| ((packed >> shift) & 0xff) as f32 / 255.0;
        Ok(Self::new(channel(16), channel(8), channel(0)))
    }

    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(hex.to_string()));
        }
        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::InvalidHex(hex.to_string()))?;
        Self::from_packed(packed)
    }

    pub fn to_packed(&self) -> u32 {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (quantize(self.r) << 16) | (quantize(self.g) << 8) | quantize(self.b)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:06x}", self.to_packed())
    }

    /// Component-wise linear interpolation. `t` is clamped to [0, 1].
    pub fn lerp(&self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// True when [`to_hex`](Self::to_hex) loses nothing.
    pub fn is_8bit(&self) -> bool {
        Rgb::from_packed(self.to_packed()).is_ok_and(|c| c == *self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Packed(u32),
    Channels { r: f32, g: f32, b: f32 },
}

impl TryFrom<ColorRepr> for Rgb {
    type Error = ColorParseError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(s) => Rgb::from_hex(&s),
            ColorRepr::Packed(p) => Rgb::from_packed(p),
            ColorRepr::Channels { r, g, b } => Rgb::try_new(r, g, b),
        }
    }
}

impl From<Rgb> for ColorRepr {
    fn from(color: Rgb) -> Self {
        if color.is_8bit() {
            ColorRepr::Hex(color.to_hex())
        } else {
            ColorRepr::Channels {
                r: color.r,
                g: color.g,
                b: color.b,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_id_uniqueness() {
        let a = CloudId::new();
        let b = CloudId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn hex_and_packed_agree() {
        let a = Rgb::from_hex("#ff6030").unwrap();
        let b = Rgb::from_packed(0xff6030).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.r, 1.0);
        assert_eq!(a.to_hex(), "#ff6030");
    }

    #[test]
    fn hex_without_hash_is_accepted() {
        assert!(Rgb::from_hex("1b3984").is_ok());
    }

    #[test]
    fn malformed_hex_rejected() {
        assert!(Rgb::from_hex("#ff60").is_err());
        assert!(Rgb::from_hex("#gg6030").is_err());
        assert!(Rgb::from_hex("#+f6030").is_err());
    }

    #[test]
    fn packed_overflow_rejected() {
        assert_eq!(
            Rgb::from_packed(0x0100_0000),
            Err(ColorParseError::PackedOverflow(0x0100_0000))
        );
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgb::BLACK;
        let b = Rgb::WHITE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(0.5, 0.5, 0.5));
        // Clamped outside [0, 1]
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }

    #[test]
    fn channel_range_enforced() {
        assert!(Rgb::try_new(0.0, 0.5, 1.0).is_ok());
        assert!(Rgb::try_new(1.5, 0.0, 0.0).is_err());
        assert!(Rgb::try_new(0.0, f32::NAN, 0.0).is_err());
    }

    #[test]
    fn serde_accepts_all_forms() {
        let hex: Rgb = serde_json::from_str("\"#1b3984\"").unwrap();
        let packed: Rgb = serde_json::from_str(&0x1b3984u32.to_string()).unwrap();
        assert_eq!(hex, packed);

        let channels: Rgb = serde_json::from_str(r#"{"r":1.0,"g":0.0,"b":0.0}"#).unwrap();
        assert_eq!(channels, Rgb::new(1.0, 0.0, 0.0));

        assert_eq!(serde_json::to_string(&hex).unwrap(), "\"#1b3984\"");
        assert!(serde_json::from_str::<Rgb>("\"nope\"").is_err());
    }

    #[test]
    fn off_grid_channels_serialize_exactly() {
        let color = Rgb::new(0.5, 0.25, 0.1);
        assert!(!color.is_8bit());
        let json = serde_json::to_string(&color).unwrap();
        assert!(json.starts_with('{'), "{json}");
        assert_eq!(serde_json::from_str::<Rgb>(&json).unwrap(), color);

        assert!(Rgb::from_hex("#1b3984").unwrap().is_8bit());
        assert!(Rgb::WHITE.is_8bit());
    }
}
