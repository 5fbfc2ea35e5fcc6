//! # Prelude
//!
//! Common imports for driving the editor from code:
//!
//! ```rust
//! use sceneforge::prelude::*;
//!
//! let mut editor = Editor::new(HeadlessBackend::new());
//! let red = MaterialDescriptor::new(MaterialKind::Standard, Color::RED);
//! let id = editor
//!     .create_object(ShapeDescriptor::Box(BoxParams::default()), red, Transform::default())
//!     .unwrap();
//! editor.dispatch(EditorCommand::Select(Some(id))).unwrap();
//! assert_eq!(editor.selection(), Some(id));
//! ```

pub use crate::config::EditorSettings;
pub use crate::editor::{
    CommandOutcome, Editor, EditorCommand, HeadlessBackend, LightingField, ObjectId,
    ObjectUpdate, RenderBackend, UploadId,
};
pub use crate::error::{EditorError, EditorResult, EntityId};
pub use crate::gfx::camera::{CameraManager, OrbitCamera};
pub use crate::gfx::geometry::*;
pub use crate::gfx::gizmos::{GizmoAxis, GizmoMode};
pub use crate::gfx::picking::{Aabb, ObjectPicker, Ray};
pub use crate::gfx::resources::material::{Color, MaterialDescriptor, MaterialKind};
pub use crate::gfx::transform::{Transform, WorldPose};
pub use crate::io::{AssetSource, GltfDocument};

pub use cgmath::{Deg, Rad, Vector3};
