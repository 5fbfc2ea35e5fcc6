//! Commands emitted by input handling and UI panels, applied through
//! [`Editor::dispatch`](super::Editor::dispatch).

use std::path::PathBuf;

use super::lighting::LightingField;
use super::registry::{ObjectId, ObjectUpdate};
use super::uploads::UploadId;
use crate::gfx::geometry::ShapeDescriptor;
use crate::gfx::gizmos::GizmoMode;
use crate::gfx::picking::Ray;
use crate::gfx::resources::material::{Color, MaterialDescriptor};
use crate::gfx::transform::Transform;
use crate::io::AssetSource;

#[derive(Debug, Clone)]
pub enum EditorCommand {
    CreateObject {
        shape: ShapeDescriptor,
        material: MaterialDescriptor,
        transform: Transform,
    },
    UpdateObject {
        id: ObjectId,
        update: ObjectUpdate,
    },
    RemoveObject(ObjectId),
    /// Attach the gizmo to `id`, or detach with `None`
    Select(Option<ObjectId>),
    /// Pointer click in the viewport
    Click(Ray),
    SetGizmoMode(GizmoMode),
    BeginGizmoDrag(Ray),
    DragGizmo(Ray),
    EndGizmoDrag,
    CopySelected,
    Paste,
    DeleteSelected,
    SetLighting(LightingField),
    ResetLighting,
    /// Start a background import
    Import(AssetSource),
    /// Center later imports on their bounds
    SetCenterImports(bool),
    SetUploadColor {
        id: UploadId,
        color: Color,
    },
    SetUploadScale {
        id: UploadId,
        scale: f32,
    },
    RemoveUpload(UploadId),
    ClearUploads,
    Export {
        dir: PathBuf,
    },
}

/// Result of a dispatched command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// State changed
    Applied,
    Created(ObjectId),
    Selected(Option<ObjectId>),
    ImportStarted,
    Exported(PathBuf),
    /// Nothing to do, or the target no longer exists
    Ignored,
}
