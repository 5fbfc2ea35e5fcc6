//! sceneforge
//!
//! An interactive 3D scene editor built on wgpu and winit: parametric primitives,
//! ray picking, transform gizmos, a single-slot clipboard, scene lighting, and glTF/OBJ
//! import with glTF export.
//!
//! The editor core ([`editor`], [`gfx`] geometry/picking/gizmos, [`io`]) runs without a GPU;
//! [`app`] wires it to a window, the wgpu renderer and the imgui panels.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod gfx;
pub mod io;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

pub use app::EditorApp;
pub use config::EditorSettings;
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
