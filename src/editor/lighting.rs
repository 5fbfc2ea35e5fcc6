//! Lighting panel model: background, ambient and one directional light.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::gfx::resources::material::Color;

pub const INTENSITY_RANGE: (f32, f32) = (0.0, 5.0);
pub const POSITION_RANGE: (f32, f32) = (-100.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: [f32; 3],
}

impl DirectionalLight {
    pub fn position_vector(&self) -> Vector3<f32> {
        Vector3::from(self.position)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            position: [0.0, 1.0, 0.0],
        }
    }
}

/// One edit from the lighting panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightingField {
    Background(Color),
    AmbientColor(Color),
    AmbientIntensity(f32),
    DirectionalColor(Color),
    DirectionalIntensity(f32),
    DirectionalPosition([f32; 3]),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingState {
    pub background_color: Color,
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Default for LightingState {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            ambient: AmbientLight::default(),
            directional: DirectionalLight::default(),
        }
    }
}

impl LightingState {
    /// Apply one field edit. Returns `false` if the value was rejected.
    pub fn set(&mut self, field: LightingField) -> bool {
        match field {
            LightingField::Background(color) => self.background_color = color.clamped(),
            LightingField::AmbientColor(color) => self.ambient.color = color.clamped(),
            LightingField::DirectionalColor(color) => self.directional.color = color.clamped(),
            LightingField::AmbientIntensity(value) => {
                let Some(value) = clamp_finite(value, INTENSITY_RANGE) else {
                    log::warn!("Rejected ambient intensity {value}");
                    return false;
                };
                self.ambient.intensity = value;
            }
            LightingField::DirectionalIntensity(value) => {
                let Some(value) = clamp_finite(value, INTENSITY_RANGE) else {
                    log::warn!("Rejected directional intensity {value}");
                    return false;
                };
                self.directional.intensity = value;
            }
            LightingField::DirectionalPosition(position) => {
                let mut clamped = [0.0; 3];
                for (out, value) in clamped.iter_mut().zip(position) {
                    let Some(value) = clamp_finite(value, POSITION_RANGE) else {
                        log::warn!("Rejected directional light position {position:?}");
                        return false;
                    };
                    *out = value;
                }
                self.directional.position = clamped;
            }
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn clamp_finite(value: f32, (min, max): (f32, f32)) -> Option<f32> {
    value.is_finite().then(|| value.clamp(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let lighting = LightingState::default();
        assert_eq!(lighting.background_color, Color::WHITE);
        assert_eq!(lighting.ambient.intensity, 1.0);
        assert_eq!(lighting.directional.position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_values_are_clamped() {
        let mut lighting = LightingState::default();
        assert!(lighting.set(LightingField::AmbientIntensity(9.0)));
        assert_eq!(lighting.ambient.intensity, 5.0);
        assert!(lighting.set(LightingField::DirectionalPosition([500.0, -3.0, -200.0])));
        assert_eq!(lighting.directional.position, [100.0, -3.0, -100.0]);
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let mut lighting = LightingState::default();
        assert!(!lighting.set(LightingField::DirectionalIntensity(f32::NAN)));
        assert!(!lighting.set(LightingField::DirectionalPosition([0.0, f32::INFINITY, 0.0])));
        assert_eq!(lighting, LightingState::default());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut lighting = LightingState::default();
        lighting.set(LightingField::Background(Color::RED));
        lighting.set(LightingField::AmbientIntensity(0.2));

        lighting.reset();
        assert_eq!(lighting, LightingState::default());
        lighting.reset();
        assert_eq!(lighting, LightingState::default());
    }
}
