//! # User Interface Module
//!
//! Dear ImGui control surface for the editor.
//!
//! - [`UiManager`] - imgui context, winit input glue and wgpu rendering
//! - [`panel`] - the editor panel: create, inspect, edit, light, import and export
//!
//! Panels only read the [`Editor`](crate::editor::Editor) and emit
//! [`EditorCommand`](crate::editor::EditorCommand)s. While imgui wants the pointer, viewport
//! picking and camera input are skipped.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{editor_panel, PanelState, Status};
