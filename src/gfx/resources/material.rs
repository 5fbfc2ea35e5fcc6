//! Material descriptors
//!
//! A material is a shading model ([`MaterialKind`]) plus a base color. How each kind
//! shades is decided by the render backend; the editor core only stores and forwards it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear RGB color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [f32; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Each channel clamped into `[0, 1]`; non-finite channels become 0.
    pub fn clamped(self) -> Self {
        let clamp = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self::rgb(clamp(self.r), clamp(self.g), clamp(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Shading model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    #[default]
    Basic,
    Lambert,
    Phong,
    Standard,
    Physical,
    Toon,
    Matcap,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 7] = [
        MaterialKind::Basic,
        MaterialKind::Lambert,
        MaterialKind::Phong,
        MaterialKind::Standard,
        MaterialKind::Physical,
        MaterialKind::Toon,
        MaterialKind::Matcap,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MaterialKind::Basic => "basic",
            MaterialKind::Lambert => "lambert",
            MaterialKind::Phong => "phong",
            MaterialKind::Standard => "standard",
            MaterialKind::Physical => "physical",
            MaterialKind::Toon => "toon",
            MaterialKind::Matcap => "matcap",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shading model plus base color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    pub kind: MaterialKind,
    pub color: Color,
}

impl MaterialDescriptor {
    pub fn new(kind: MaterialKind, color: Color) -> Self {
        Self { kind, color }
    }
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        Self::new(MaterialKind::Basic, Color::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::parse_hex("#ff0000"), Some(Color::RED));
        assert_eq!(Color::parse_hex("FFFFFF"), Some(Color::WHITE));
        assert_eq!(Color::parse_hex("#fff"), None);
        assert_eq!(Color::parse_hex("#gg0000"), None);
        assert_eq!(Color::from_hex(0x336699).to_hex(), 0x336699);
        assert_eq!(Color::RED.to_string(), "#ff0000");
    }

    #[test]
    fn test_kind_labels_round_trip() {
        for kind in MaterialKind::ALL {
            assert_eq!(MaterialKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(MaterialKind::from_label("glass"), None);
    }

    #[test]
    fn test_clamped_drops_out_of_range_channels() {
        let color = Color::rgb(1.5, -0.25, f32::NAN).clamped();
        assert_eq!(color, Color::rgb(1.0, 0.0, 0.0));
    }
}
