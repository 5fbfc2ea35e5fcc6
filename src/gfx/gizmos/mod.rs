//! # Gizmo System
//!
//! Interactive handles drawn over the viewport. The only gizmo the editor needs is the
//! [`TransformGizmo`]: translate, rotate and scale handles attached to the selected object.
//!
//! ## Usage
//!
//! ```no_run
//! use sceneforge::gfx::gizmos::{GizmoMode, TransformGizmo};
//!
//! let mut gizmo = TransformGizmo::default();
//! assert!(!gizmo.set_mode(GizmoMode::Rotate)); // idle: nothing to switch
//! ```

pub mod transform_gizmo;

pub use transform_gizmo::{
    GizmoAxis, GizmoMode, GizmoState, TransformDelta, TransformGizmo,
};
