//! Editor settings loaded from JSON.
//!
//! Looked up at `$SCENEFORGE_CONFIG`, falling back to `./sceneforge.json`. Every field has
//! a default, so a partial file only overrides what it names. A missing or malformed file
//! is not fatal: the defaults are used and a warning is logged.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
use crate::gfx::rendering::OverlayStyle;

pub const CONFIG_ENV_VAR: &str = "SCENEFORGE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "sceneforge.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorSettings {
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub gizmo: GizmoSettings,
    pub input: InputSettings,
    pub import: ImportSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "sceneforge".to_string(),
            width: 1280,
            height: 800,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping: f32,
    /// Radians per second
    pub auto_rotate_speed: f32,
    pub grid_size: f32,
    pub grid_divisions: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 6.0,
            pitch: 0.4,
            yaw: 0.6,
            fov_degrees: 45.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.01,
            damping: 0.1,
            auto_rotate_speed: 0.6,
            grid_size: 20.0,
            grid_divisions: 20,
        }
    }
}

impl CameraSettings {
    /// Camera and controller configured from these settings.
    pub fn build(&self, aspect: f32) -> CameraManager {
        let mut camera = OrbitCamera::new(
            self.distance,
            self.pitch,
            self.yaw,
            cgmath::Vector3::new(0.0, 0.0, 0.0),
            aspect,
        );
        camera.fovy = cgmath::Deg(self.fov_degrees.clamp(10.0, 120.0)).into();

        let mut controller = CameraController::new(self.rotate_speed, self.zoom_speed);
        controller.pan_speed = self.pan_speed;
        controller.damping = self.damping.clamp(0.0, 1.0);
        controller.auto_rotate_speed = self.auto_rotate_speed;

        CameraManager::new(camera, controller)
    }

    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            grid_size: self.grid_size,
            grid_divisions: self.grid_divisions,
            ..OverlayStyle::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoSettings {
    pub handle_length: f32,
}

impl Default for GizmoSettings {
    fn default() -> Self {
        Self { handle_length: 1.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub double_click_ms: u64,
    /// Pointer travel in pixels beyond which a press becomes a drag
    pub click_slop: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            double_click_ms: 300,
            click_slop: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImportSettings {
    /// Move each imported batch so its bounds are centered on the origin
    pub center_on_bounds: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub directory: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl EditorSettings {
    /// `$SCENEFORGE_CONFIG` when set, else `./sceneforge.json`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        Ok(settings)
    }

    /// Settings from `path`, or the defaults when it is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e:#}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "gizmo": { "handle_length": 2.5 } }"#).unwrap();

        let settings = EditorSettings::load(&path).unwrap();
        assert_eq!(settings.gizmo.handle_length, 2.5);
        assert_eq!(settings.window, WindowSettings::default());
        assert_eq!(settings.input.double_click_ms, 300);
        assert!(!settings.import.center_on_bounds);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(EditorSettings::load(&path).is_err());
        assert_eq!(EditorSettings::load_or_default(&path), EditorSettings::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EditorSettings::load_or_default(&dir.path().join("absent.json"));
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = EditorSettings::default();
        settings.window.title = "bench".to_string();
        settings.export.directory = PathBuf::from("out");
        settings.import.center_on_bounds = true;
        settings.save(&path).unwrap();

        assert_eq!(EditorSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_camera_settings_apply() {
        let settings = CameraSettings {
            damping: 3.0,
            ..CameraSettings::default()
        };
        let manager = settings.build(1.5);
        assert_eq!(manager.controller.damping, 1.0);
        assert_eq!(manager.camera.aspect, 1.5);
        assert_eq!(manager.camera.distance, settings.distance);
    }
}
