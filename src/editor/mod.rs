//! # Editor Core
//!
//! [`Editor`] owns every piece of scene state and is the only place where it changes.
//! Each mutation is applied to the [`ObjectRegistry`] first and mirrored into the
//! [`SceneGraph`] within the same call, so picking and drawing never see a stale node.
//!
//! ## Usage
//!
//! ```rust
//! use sceneforge::editor::{Editor, HeadlessBackend};
//! use sceneforge::gfx::geometry::ShapeDescriptor;
//! use sceneforge::gfx::resources::material::MaterialDescriptor;
//! use sceneforge::gfx::transform::Transform;
//!
//! let mut editor = Editor::new(HeadlessBackend::new());
//! let id = editor
//!     .create_object(ShapeDescriptor::default(), MaterialDescriptor::default(), Transform::default())
//!     .unwrap();
//! assert!(!editor.copy_selected());
//! editor.select(Some(id)).unwrap();
//! assert!(editor.copy_selected());
//! ```

pub mod clipboard;
pub mod commands;
pub mod inspector;
pub mod lighting;
pub mod registry;
pub mod scene_graph;
pub mod uploads;

pub use clipboard::Clipboard;
pub use commands::{CommandOutcome, EditorCommand};
pub use inspector::{InspectorRow, SceneInspector};
pub use lighting::{LightingField, LightingState};
pub use registry::{ObjectId, ObjectRegistry, ObjectUpdate, RegistryEvent, SceneObject};
pub use scene_graph::{HeadlessBackend, HelperOverlays, NodeKey, RenderBackend, SceneGraph};
pub use uploads::{UploadId, UploadedMesh, UploadedMeshes};

use cgmath::Vector3;
use std::path::{Path, PathBuf};

use crate::error::{EditorError, EditorResult, EntityId};
use crate::gfx::geometry::{self, ShapeDescriptor};
use crate::gfx::gizmos::{GizmoMode, TransformGizmo};
use crate::gfx::picking::{ObjectPicker, Ray};
use crate::gfx::resources::material::{Color, MaterialDescriptor, MaterialKind};
use crate::gfx::transform::Transform;
use crate::io::{self, AssetImporter, AssetSource, GltfDocument, ImportedMesh};

/// Outcome of one background import collected by [`Editor::poll_imports`]
#[derive(Debug)]
pub struct ImportReport {
    pub label: String,
    pub result: EditorResult<Vec<UploadId>>,
}

pub struct Editor<B: RenderBackend> {
    registry: ObjectRegistry,
    scene: SceneGraph<B>,
    gizmo: TransformGizmo,
    picker: ObjectPicker,
    clipboard: Clipboard,
    lighting: LightingState,
    uploads: UploadedMeshes,
    importer: AssetImporter,
    center_imports: bool,
    elapsed: f32,
}

impl<B: RenderBackend> Editor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            scene: SceneGraph::new(backend),
            gizmo: TransformGizmo::default(),
            picker: ObjectPicker::new(),
            clipboard: Clipboard::new(),
            lighting: LightingState::default(),
            uploads: UploadedMeshes::new(),
            importer: AssetImporter::new(),
            center_imports: false,
            elapsed: 0.0,
        }
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn scene(&self) -> &SceneGraph<B> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph<B> {
        &mut self.scene
    }

    pub fn gizmo(&self) -> &TransformGizmo {
        &self.gizmo
    }

    pub fn gizmo_mut(&mut self) -> &mut TransformGizmo {
        &mut self.gizmo
    }

    pub fn picker(&self) -> &ObjectPicker {
        &self.picker
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn lighting(&self) -> &LightingState {
        &self.lighting
    }

    pub fn uploads(&self) -> &UploadedMeshes {
        &self.uploads
    }

    /// The object the gizmo is attached to.
    pub fn selection(&self) -> Option<ObjectId> {
        self.gizmo.attached()
    }

    /// Seconds of animation time accumulated by [`Editor::advance`].
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Step the clock and play imported animations forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed += dt;
        for (id, matrix) in self.uploads.animate(dt) {
            self.scene.set_transform(NodeKey::Upload(id), matrix);
        }
    }

    /// Whether each imported batch is moved so its bounds are centered on the origin.
    pub fn center_imports(&self) -> bool {
        self.center_imports
    }

    pub fn set_center_imports(&mut self, enabled: bool) {
        self.center_imports = enabled;
    }

    fn sync(&mut self, event: RegistryEvent) {
        if !event.is_noop() {
            self.scene.apply(&event, &self.registry);
        }
    }

    // Objects

    pub fn create_object(
        &mut self,
        shape: ShapeDescriptor,
        material: MaterialDescriptor,
        transform: Transform,
    ) -> EditorResult<ObjectId> {
        let event = self.registry.create(shape, material, transform)?;
        let id = event.id();
        self.sync(event);
        log::debug!("Created {id}");
        Ok(id)
    }

    pub fn update_object(&mut self, id: ObjectId, update: ObjectUpdate) -> EditorResult<()> {
        let event = self.registry.update(id, update)?;
        self.sync(event);
        Ok(())
    }

    pub fn remove_object(&mut self, id: ObjectId) -> EditorResult<()> {
        let event = self.registry.remove(id)?;
        if self.gizmo.attached() == Some(id) {
            self.gizmo.detach();
        }
        self.sync(event);
        log::debug!("Removed {id}");
        Ok(())
    }

    // Selection and gizmo

    /// Nearest object hit by `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<ObjectId> {
        self.picker
            .pick_ray(ray, self.registry.pick_candidates())
            .map(|hit| hit.key)
    }

    /// Attach the gizmo to `id`, or detach with `None`.
    pub fn select(&mut self, id: Option<ObjectId>) -> EditorResult<()> {
        match id {
            Some(id) if !self.registry.contains(id) => {
                Err(EditorError::NotFound(EntityId::Object(id)))
            }
            Some(id) => {
                self.gizmo.attach(id);
                Ok(())
            }
            None => {
                self.gizmo.detach();
                Ok(())
            }
        }
    }

    /// Pick along `ray` and attach to the hit, detaching when nothing is hit.
    pub fn click(&mut self, ray: &Ray) -> Option<ObjectId> {
        let hit = self.pick(ray);
        match hit {
            Some(id) => self.gizmo.attach(id),
            None => self.gizmo.detach(),
        }
        hit
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) -> bool {
        self.gizmo.set_mode(mode)
    }

    /// Start a gizmo drag if `ray` hits a handle of the attached object.
    pub fn begin_gizmo_drag(&mut self, ray: &Ray) -> bool {
        let Some(object) = self.gizmo.attached().and_then(|id| self.registry.get(id)) else {
            return false;
        };
        let transform = *object.transform();
        match self.gizmo.hit_handle(ray, transform.position) {
            Some(axis) => self.gizmo.begin_drag(axis, ray, &transform),
            None => false,
        }
    }

    /// Feed a pointer move into the active drag and commit the delta.
    pub fn drag_gizmo(&mut self, ray: &Ray) -> EditorResult<bool> {
        let Some(id) = self.gizmo.attached() else {
            return Ok(false);
        };
        let Some(delta) = self.gizmo.drag(ray) else {
            return Ok(false);
        };
        let Some(object) = self.registry.get(id) else {
            self.gizmo.detach();
            return Err(EditorError::NotFound(EntityId::Object(id)));
        };
        let transform = delta.apply(object.transform());
        self.update_object(id, ObjectUpdate::transform(transform))?;
        Ok(true)
    }

    pub fn end_gizmo_drag(&mut self) -> bool {
        self.gizmo.end_drag()
    }

    pub fn is_dragging(&self) -> bool {
        self.gizmo.is_dragging()
    }

    // Clipboard

    pub fn copy_selected(&mut self) -> bool {
        let selected = self.selection().and_then(|id| self.registry.get(id));
        self.clipboard.copy(selected)
    }

    /// Insert the clipboard object offset by its own world size. The slot is cleared
    /// only when the insert succeeds.
    pub fn paste(&mut self) -> EditorResult<Option<ObjectId>> {
        let Some(snapshot) = self.clipboard.take() else {
            return Ok(None);
        };

        let offset = match geometry::build(&snapshot.shape) {
            Ok(geometry) => geometry
                .bounds
                .transform(&snapshot.transform.matrix())
                .size(),
            Err(err) => {
                self.clipboard.restore(snapshot);
                return Err(err.into());
            }
        };
        let transform = Transform {
            position: snapshot.transform.position + offset,
            ..snapshot.transform
        };

        match self.create_object(snapshot.shape, snapshot.material, transform) {
            Ok(id) => Ok(Some(id)),
            Err(err) => {
                self.clipboard.restore(snapshot);
                Err(err)
            }
        }
    }

    pub fn delete_selected(&mut self) -> EditorResult<Option<ObjectId>> {
        let Some(id) = self.selection() else {
            return Ok(None);
        };
        self.remove_object(id)?;
        Ok(Some(id))
    }

    // Lighting

    pub fn set_lighting(&mut self, field: LightingField) -> bool {
        self.lighting.set(field)
    }

    pub fn reset_lighting(&mut self) {
        self.lighting.reset();
    }

    // Uploads

    /// Load `source` on the calling thread and add its meshes.
    pub fn import_asset(&mut self, source: &AssetSource) -> EditorResult<Vec<UploadId>> {
        let meshes = io::load_asset(source)?;
        Ok(self.add_uploads(meshes))
    }

    /// Load `source` on a worker thread; results arrive through [`Editor::poll_imports`].
    pub fn begin_import(&mut self, source: AssetSource) -> EditorResult<()> {
        self.importer.spawn(source)?;
        Ok(())
    }

    pub fn pending_imports(&self) -> usize {
        self.importer.pending()
    }

    /// Apply every background import that has finished.
    pub fn poll_imports(&mut self) -> Vec<ImportReport> {
        let completed = self.importer.poll();
        self.apply_imports(completed)
    }

    /// Block until every background import has finished and apply them.
    pub fn wait_for_imports(&mut self) -> Vec<ImportReport> {
        let completed = self.importer.wait_all();
        self.apply_imports(completed)
    }

    fn apply_imports(&mut self, completed: Vec<io::CompletedImport>) -> Vec<ImportReport> {
        completed
            .into_iter()
            .map(|import| {
                let result = match import.result {
                    Ok(meshes) => Ok(self.add_uploads(meshes)),
                    Err(err) => {
                        log::warn!("Import of {} failed: {err}", import.label);
                        Err(err.into())
                    }
                };
                ImportReport {
                    label: import.label,
                    result,
                }
            })
            .collect()
    }

    fn add_uploads(&mut self, mut meshes: Vec<ImportedMesh>) -> Vec<UploadId> {
        if self.center_imports {
            let offset = io::center_on_bounds(&mut meshes);
            log::debug!("Centered import by {offset:?}");
        }
        meshes
            .into_iter()
            .map(|mesh| {
                let id = self.uploads.add(mesh);
                if let Some(mesh) = self.uploads.get(id) {
                    self.scene.insert(
                        NodeKey::Upload(id),
                        mesh.geometry(),
                        &upload_material(mesh.color()),
                        mesh.matrix(),
                    );
                }
                id
            })
            .collect()
    }

    pub fn set_upload_color(&mut self, id: UploadId, color: Color) -> EditorResult<()> {
        let mesh = self.uploads.set_color(id, color)?;
        let material = upload_material(mesh.color());
        self.scene.set_material(NodeKey::Upload(id), &material);
        Ok(())
    }

    pub fn set_upload_scale(&mut self, id: UploadId, scale: f32) -> EditorResult<()> {
        let matrix = self.uploads.set_uniform_scale(id, scale)?.matrix();
        self.scene.set_transform(NodeKey::Upload(id), matrix);
        Ok(())
    }

    pub fn remove_upload(&mut self, id: UploadId) -> EditorResult<()> {
        self.uploads.remove(id)?;
        self.scene.remove(NodeKey::Upload(id));
        Ok(())
    }

    pub fn clear_uploads(&mut self) -> usize {
        let removed = self.uploads.clear();
        for id in &removed {
            self.scene.remove(NodeKey::Upload(*id));
        }
        removed.len()
    }

    // Export

    /// Build the export document with helper overlays hidden for the duration.
    pub fn export_scene(&mut self) -> EditorResult<GltfDocument> {
        let _overlays = self.scene.suspend_overlays();
        let document = io::build_document(self.registry.list(), self.uploads.list())?;
        Ok(document)
    }

    /// Export and write `modified_model.gltf` into `dir`.
    pub fn export_to_dir(&mut self, dir: &Path) -> EditorResult<PathBuf> {
        let document = self.export_scene()?;
        Ok(io::write_document(dir, &document)?)
    }

    pub fn inspector(&self) -> SceneInspector {
        SceneInspector::collect(
            &self.registry,
            &self.uploads,
            self.selection().map(EntityId::Object),
        )
    }

    /// Apply one command. Commands aimed at entities that no longer exist are logged and
    /// reported as [`CommandOutcome::Ignored`].
    pub fn dispatch(&mut self, command: EditorCommand) -> EditorResult<CommandOutcome> {
        log::debug!("Dispatching {command:?}");
        match self.execute(command) {
            Err(err) if err.is_not_found() => {
                log::warn!("Ignoring command: {err}");
                Ok(CommandOutcome::Ignored)
            }
            other => other,
        }
    }

    fn execute(&mut self, command: EditorCommand) -> EditorResult<CommandOutcome> {
        let applied = |changed: bool| {
            if changed {
                CommandOutcome::Applied
            } else {
                CommandOutcome::Ignored
            }
        };

        Ok(match command {
            EditorCommand::CreateObject {
                shape,
                material,
                transform,
            } => CommandOutcome::Created(self.create_object(shape, material, transform)?),
            EditorCommand::UpdateObject { id, update } => {
                self.update_object(id, update)?;
                CommandOutcome::Applied
            }
            EditorCommand::RemoveObject(id) => {
                self.remove_object(id)?;
                CommandOutcome::Applied
            }
            EditorCommand::Select(id) => {
                self.select(id)?;
                CommandOutcome::Selected(id)
            }
            EditorCommand::Click(ray) => CommandOutcome::Selected(self.click(&ray)),
            EditorCommand::SetGizmoMode(mode) => applied(self.set_gizmo_mode(mode)),
            EditorCommand::BeginGizmoDrag(ray) => applied(self.begin_gizmo_drag(&ray)),
            EditorCommand::DragGizmo(ray) => applied(self.drag_gizmo(&ray)?),
            EditorCommand::EndGizmoDrag => applied(self.end_gizmo_drag()),
            EditorCommand::CopySelected => applied(self.copy_selected()),
            EditorCommand::Paste => match self.paste()? {
                Some(id) => CommandOutcome::Created(id),
                None => CommandOutcome::Ignored,
            },
            EditorCommand::DeleteSelected => applied(self.delete_selected()?.is_some()),
            EditorCommand::SetLighting(field) => applied(self.set_lighting(field)),
            EditorCommand::ResetLighting => {
                self.reset_lighting();
                CommandOutcome::Applied
            }
            EditorCommand::Import(source) => {
                self.begin_import(source)?;
                CommandOutcome::ImportStarted
            }
            EditorCommand::SetCenterImports(enabled) => {
                let changed = self.center_imports != enabled;
                self.set_center_imports(enabled);
                applied(changed)
            }
            EditorCommand::SetUploadColor { id, color } => {
                self.set_upload_color(id, color)?;
                CommandOutcome::Applied
            }
            EditorCommand::SetUploadScale { id, scale } => {
                self.set_upload_scale(id, scale)?;
                CommandOutcome::Applied
            }
            EditorCommand::RemoveUpload(id) => {
                self.remove_upload(id)?;
                CommandOutcome::Applied
            }
            EditorCommand::ClearUploads => applied(self.clear_uploads() > 0),
            EditorCommand::Export { dir } => CommandOutcome::Exported(self.export_to_dir(&dir)?),
        })
    }
}

/// Render material for an uploaded mesh: lit, in the mesh's own color.
fn upload_material(color: Color) -> MaterialDescriptor {
    MaterialDescriptor::new(MaterialKind::Standard, color)
}

/// Default spawn offset so new objects do not stack exactly on the origin.
pub fn spawn_position(count: usize) -> Vector3<f32> {
    let step = (count % 8) as f32;
    Vector3::new(step * 0.25, 0.0, -step * 0.25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::BoxParams;
    use crate::gfx::gizmos::GizmoState;

    fn editor_with_box(position: Vector3<f32>) -> (Editor<HeadlessBackend>, ObjectId) {
        let mut editor = Editor::new(HeadlessBackend::new());
        let id = editor
            .create_object(
                ShapeDescriptor::Box(BoxParams::new(1.0, 1.0, 1.0)),
                MaterialDescriptor::new(MaterialKind::Basic, Color::RED),
                Transform::from_position(position),
            )
            .unwrap();
        (editor, id)
    }

    fn down_ray(x: f32, z: f32) -> Ray {
        Ray::new(Vector3::new(x, 10.0, z), Vector3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_click_attaches_and_empty_click_detaches() {
        let (mut editor, id) = editor_with_box(Vector3::new(0.0, 0.0, 0.0));

        assert_eq!(editor.click(&down_ray(0.0, 0.0)), Some(id));
        assert_eq!(
            editor.gizmo().state(),
            GizmoState::Attached {
                id,
                mode: GizmoMode::Translate
            }
        );

        assert_eq!(editor.click(&down_ray(20.0, 20.0)), None);
        assert_eq!(editor.gizmo().state(), GizmoState::Idle);
    }

    #[test]
    fn test_remove_detaches_gizmo() {
        let (mut editor, id) = editor_with_box(Vector3::new(0.0, 0.0, 0.0));
        editor.select(Some(id)).unwrap();
        editor.remove_object(id).unwrap();

        assert_eq!(editor.selection(), None);
        assert_eq!(editor.scene().node_count(), 0);
        assert!(editor.remove_object(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_translate_drag_commits_each_delta() {
        let (mut editor, id) = editor_with_box(Vector3::new(0.0, 0.0, 0.0));
        editor.select(Some(id)).unwrap();

        // Grab the X handle from above, then slide one unit along +X
        assert!(editor.begin_gizmo_drag(&down_ray(1.0, 0.0)));
        assert!(editor.is_dragging());
        assert!(editor.drag_gizmo(&down_ray(2.0, 0.0)).unwrap());
        assert!(editor.end_gizmo_drag());

        let position = editor.registry().get(id).unwrap().transform().position;
        assert!((position.x - 1.0).abs() < 1e-4);
        assert!(position.y.abs() < 1e-4 && position.z.abs() < 1e-4);

        let handle = editor.scene().handle_of(NodeKey::Object(id)).unwrap();
        let node = editor.scene().backend().node(handle).unwrap();
        assert!((node.transform.w.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_paste_offsets_by_world_size_and_clears_slot() {
        let (mut editor, id) = editor_with_box(Vector3::new(1.0, 0.0, 0.0));
        let update = ObjectUpdate::transform(Transform {
            position: Vector3::new(1.0, 0.0, 0.0),
            scale: Vector3::new(2.0, 1.0, 1.0),
            ..Transform::default()
        });
        editor.update_object(id, update).unwrap();
        editor.select(Some(id)).unwrap();

        assert!(editor.copy_selected());
        let pasted = editor.paste().unwrap().unwrap();
        let position = editor.registry().get(pasted).unwrap().transform().position;
        assert!((position.x - 3.0).abs() < 1e-4);
        assert!((position.y - 1.0).abs() < 1e-4);
        assert!((position.z - 1.0).abs() < 1e-4);

        assert_eq!(editor.paste().unwrap(), None);
        assert_eq!(editor.registry().len(), 2);
    }

    #[test]
    fn test_dispatch_downgrades_missing_targets() {
        let (mut editor, id) = editor_with_box(Vector3::new(0.0, 0.0, 0.0));
        editor.remove_object(id).unwrap();

        let outcome = editor
            .dispatch(EditorCommand::RemoveObject(id))
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Ignored);

        let invalid = editor.dispatch(EditorCommand::CreateObject {
            shape: ShapeDescriptor::Box(BoxParams::new(0.0, 1.0, 1.0)),
            material: MaterialDescriptor::default(),
            transform: Transform::default(),
        });
        assert!(matches!(invalid, Err(EditorError::Validation(_))));
    }

    #[test]
    fn test_export_restores_overlays_after_refusal() {
        let (mut editor, id) = editor_with_box(Vector3::new(0.0, 0.0, 0.0));
        let flat = Transform {
            scale: Vector3::new(0.0, 1.0, 1.0),
            ..Transform::default()
        };
        editor.update_object(id, ObjectUpdate::transform(flat)).unwrap();

        let before = editor.scene().overlays();
        assert!(matches!(
            editor.export_scene(),
            Err(EditorError::ExportRefused(_))
        ));
        assert_eq!(editor.scene().overlays(), before);

        let history = editor.scene().backend().overlay_history();
        assert_eq!(history[history.len() - 2], HelperOverlays::HIDDEN);
        assert_eq!(history[history.len() - 1], before);
    }

    #[test]
    fn test_upload_operations_track_nodes() {
        let mut editor = Editor::new(HeadlessBackend::new());
        let source = AssetSource::Bytes {
            name: "tri.obj".to_string(),
            data: b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n".to_vec(),
        };
        let ids = editor.import_asset(&source).unwrap();
        assert_eq!(ids.len(), 1);
        assert!(editor.scene().contains(NodeKey::Upload(ids[0])));

        editor.set_upload_scale(ids[0], 3.0).unwrap();
        assert!(editor.set_upload_scale(ids[0], -1.0).is_err());
        editor.set_upload_color(ids[0], Color::RED).unwrap();

        editor.import_asset(&source).unwrap();
        assert_eq!(editor.clear_uploads(), 2);
        assert_eq!(editor.scene().node_count(), 0);
        assert_eq!(editor.registry().len(), 0);
    }

    #[test]
    fn test_advance_plays_imported_animation() {
        use crate::io::import::tests::triangle_gltf;

        let mut editor = Editor::new(HeadlessBackend::new());
        let ids = editor
            .import_asset(&triangle_gltf(&[0, 1, 2], Some([4.0, 0.0, 0.0])))
            .unwrap();
        let key = NodeKey::Upload(ids[0]);
        let node_matrix = |editor: &Editor<HeadlessBackend>| {
            let handle = editor.scene().handle_of(key).unwrap();
            editor.scene().backend().node(handle).unwrap().transform
        };
        let start = node_matrix(&editor);

        editor.advance(0.5);
        let moved = node_matrix(&editor);
        assert_ne!(moved, start);
        assert!((moved.w.x - 2.0).abs() < 1e-5);
        assert_eq!(moved, editor.uploads().get(ids[0]).unwrap().matrix());

        // Picking bounds follow the animated pose
        let bounds = editor.uploads().get(ids[0]).unwrap().world_bounds();
        assert!((bounds.min.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_centered_import_is_opt_in() {
        let source = AssetSource::Bytes {
            name: "tri.obj".to_string(),
            data: b"v 2 2 0\nv 4 2 0\nv 2 4 0\nf 1 2 3\n".to_vec(),
        };
        let mut editor = Editor::new(HeadlessBackend::new());
        let kept = editor.import_asset(&source).unwrap();
        let bounds = editor.uploads().get(kept[0]).unwrap().world_bounds();
        assert_eq!(bounds.center(), Vector3::new(3.0, 3.0, 0.0));

        let outcome = editor.dispatch(EditorCommand::SetCenterImports(true)).unwrap();
        assert_eq!(outcome, CommandOutcome::Applied);
        assert!(editor.center_imports());
        let centered = editor.import_asset(&source).unwrap();
        let bounds = editor.uploads().get(centered[0]).unwrap().world_bounds();
        assert_eq!(bounds.center(), Vector3::new(0.0, 0.0, 0.0));
    }

}
