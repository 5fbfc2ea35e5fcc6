//! Editor panels
//!
//! Panels read editor state and push [`EditorCommand`]s; they never mutate the editor
//! directly. The app dispatches the collected commands after the frame and feeds the
//! outcomes back through [`PanelState::record`] for the status line.

use cgmath::Vector3;
use std::f32::consts::TAU;
use std::path::PathBuf;

use crate::editor::{
    CommandOutcome, Editor, EditorCommand, ImportReport, LightingField, ObjectUpdate,
    RenderBackend, SceneObject,
};
use crate::error::{EditorResult, EntityId};
use crate::gfx::geometry::{ShapeDescriptor, ShapeKind, MAX_DETAIL, MAX_SEGMENTS};
use crate::gfx::gizmos::GizmoMode;
use crate::gfx::resources::material::{Color, MaterialDescriptor, MaterialKind};
use crate::gfx::transform::Transform;
use crate::io::AssetSource;

const ERROR_COLOR: [f32; 4] = [1.0, 0.4, 0.4, 1.0];
const INFO_COLOR: [f32; 4] = [0.6, 0.9, 0.6, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

/// Panel-local input that is not part of the scene: pending form values and the status line.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub new_shape: usize,
    pub new_material: usize,
    pub new_color: [f32; 3],
    pub import_path: String,
    pub export_dir: String,
    pub status: Option<Status>,
}

impl PanelState {
    pub fn new(export_dir: &std::path::Path) -> Self {
        Self {
            new_shape: 0,
            new_material: 0,
            new_color: Color::WHITE.to_array(),
            import_path: String::new(),
            export_dir: export_dir.display().to_string(),
            status: None,
        }
    }

    /// Command for the create form, placed by how many objects already exist.
    pub fn create_command(&self, existing: usize) -> EditorCommand {
        let shape = ShapeKind::ALL
            .get(self.new_shape)
            .copied()
            .unwrap_or(ShapeKind::Box);
        let kind = MaterialKind::ALL
            .get(self.new_material)
            .copied()
            .unwrap_or_default();
        EditorCommand::CreateObject {
            shape: shape.default_descriptor(),
            material: MaterialDescriptor::new(kind, Color::from_array(self.new_color).clamped()),
            transform: Transform::from_position(crate::editor::spawn_position(existing)),
        }
    }

    /// Import command for the path field, or `None` when it is blank.
    pub fn import_command(&self) -> Option<EditorCommand> {
        let path = self.import_path.trim();
        (!path.is_empty()).then(|| EditorCommand::Import(AssetSource::path(path)))
    }

    pub fn export_command(&self) -> EditorCommand {
        let dir = self.export_dir.trim();
        EditorCommand::Export {
            dir: PathBuf::from(if dir.is_empty() { "." } else { dir }),
        }
    }

    /// Update the status line from a dispatched command.
    pub fn record(&mut self, result: &EditorResult<CommandOutcome>) {
        match result {
            Ok(CommandOutcome::Exported(path)) => {
                self.info(format!("Exported {}", path.display()))
            }
            Ok(CommandOutcome::ImportStarted) => self.info("Importing...".to_string()),
            Ok(_) => {}
            Err(e) => self.error(e.to_string()),
        }
    }

    pub fn record_import(&mut self, report: &ImportReport) {
        match &report.result {
            Ok(ids) => self.info(format!("Imported {} mesh(es) from {}", ids.len(), report.label)),
            Err(e) => self.error(format!("{}: {e}", report.label)),
        }
    }

    fn info(&mut self, message: String) {
        self.status = Some(Status {
            message,
            is_error: false,
        });
    }

    fn error(&mut self, message: String) {
        self.status = Some(Status {
            message,
            is_error: true,
        });
    }
}

/// The editor side panel. Commands are appended to `commands`.
pub fn editor_panel<B: RenderBackend>(
    ui: &imgui::Ui,
    state: &mut PanelState,
    editor: &Editor<B>,
    commands: &mut Vec<EditorCommand>,
) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    let panel_width = (display_size[0] * 0.28).clamp(320.0, 460.0);
    let panel_height = (display_size[1] - 40.0).max(300.0);

    ui.window("Scene")
        .size([panel_width, panel_height], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            render_status(ui, state);
            render_create(ui, state, editor.registry().len(), commands);
            ui.separator();
            render_objects(ui, editor, commands);
            if let Some(object) = editor.selection().and_then(|id| editor.registry().get(id)) {
                ui.separator();
                render_selection(ui, editor.gizmo().mode(), object, commands);
            }
            ui.separator();
            render_uploads(ui, editor, commands);
            ui.separator();
            render_lighting(ui, editor, commands);
            ui.separator();
            render_files(ui, state, editor.pending_imports(), editor.center_imports(), commands);
        });
}

fn render_status(ui: &imgui::Ui, state: &mut PanelState) {
    let Some(status) = &state.status else {
        return;
    };
    let color = if status.is_error { ERROR_COLOR } else { INFO_COLOR };
    ui.text_colored(color, &status.message);
    ui.same_line();
    if ui.small_button("x##status") {
        state.status = None;
    }
}

fn render_create(
    ui: &imgui::Ui,
    state: &mut PanelState,
    existing: usize,
    commands: &mut Vec<EditorCommand>,
) {
    if !ui.collapsing_header("Create", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }
    let shapes: Vec<&str> = ShapeKind::ALL.iter().map(|k| k.label()).collect();
    let materials: Vec<&str> = MaterialKind::ALL.iter().map(|k| k.label()).collect();
    ui.combo_simple_string("Shape", &mut state.new_shape, &shapes);
    ui.combo_simple_string("Material##new", &mut state.new_material, &materials);
    ui.color_edit3("Color##new", &mut state.new_color);
    if ui.button("Add object") {
        commands.push(state.create_command(existing));
    }
}

fn render_objects<B: RenderBackend>(
    ui: &imgui::Ui,
    editor: &Editor<B>,
    commands: &mut Vec<EditorCommand>,
) {
    let inspector = editor.inspector();
    ui.text(format!("Objects ({})", inspector.objects.len()));
    ui.child_window("object_list")
        .size([0.0, 140.0])
        .border(true)
        .build(|| {
            if inspector.objects.is_empty() {
                ui.text_disabled("Nothing here yet");
            }
            for row in &inspector.objects {
                let EntityId::Object(id) = row.entity else {
                    continue;
                };
                let label = format!("{}##object{}", row.label, id.raw());
                if ui.selectable_config(&label).selected(row.selected).build() {
                    let target = if row.selected { None } else { Some(id) };
                    commands.push(EditorCommand::Select(target));
                }
                if ui.is_item_hovered() {
                    ui.tooltip_text(&row.detail);
                }
            }
        });

    let has_selection = editor.selection().is_some();
    if ui.button("Copy") && has_selection {
        commands.push(EditorCommand::CopySelected);
    }
    ui.same_line();
    if ui.button("Paste") && !editor.clipboard().is_empty() {
        commands.push(EditorCommand::Paste);
    }
    ui.same_line();
    if ui.button("Delete") && has_selection {
        commands.push(EditorCommand::DeleteSelected);
    }
}

fn render_selection(
    ui: &imgui::Ui,
    mode: GizmoMode,
    object: &SceneObject,
    commands: &mut Vec<EditorCommand>,
) {
    let id = object.id();
    ui.text(format!("Selected: {}", object.name()));

    for (label, target) in [
        ("Move (W)", GizmoMode::Translate),
        ("Rotate (E)", GizmoMode::Rotate),
        ("Scale (R)", GizmoMode::Scale),
    ] {
        if ui.radio_button_bool(label, mode == target) && mode != target {
            commands.push(EditorCommand::SetGizmoMode(target));
        }
        ui.same_line();
    }
    ui.new_line();

    if ui.collapsing_header("Transform", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        let current = *object.transform();
        let mut position: [f32; 3] = current.position.into();
        let mut rotation: [f32; 3] = current.rotation.map(f32::to_degrees).into();
        let mut scale: [f32; 3] = current.scale.into();

        let mut changed = ui.input_float3("Position", &mut position).build();
        changed |= ui.input_float3("Rotation (deg)", &mut rotation).build();
        changed |= ui.input_float3("Scale", &mut scale).build();
        if ui.button("Reset transform") {
            position = [0.0; 3];
            rotation = [0.0; 3];
            scale = [1.0; 3];
            changed = true;
        }

        if changed {
            let transform = Transform {
                position: Vector3::from(position),
                rotation: Vector3::from(rotation).map(f32::to_radians),
                scale: Vector3::from(scale),
            };
            commands.push(EditorCommand::UpdateObject {
                id,
                update: ObjectUpdate::transform(transform),
            });
        }
    }

    if ui.collapsing_header("Material", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        let material = *object.material();
        let labels: Vec<&str> = MaterialKind::ALL.iter().map(|k| k.label()).collect();
        let mut kind_index = MaterialKind::ALL
            .iter()
            .position(|k| *k == material.kind)
            .unwrap_or(0);
        let mut color = material.color.to_array();

        let mut changed = ui.combo_simple_string("Kind", &mut kind_index, &labels);
        changed |= ui.color_edit3("Color", &mut color);
        if changed {
            let kind = MaterialKind::ALL
                .get(kind_index)
                .copied()
                .unwrap_or(material.kind);
            commands.push(EditorCommand::UpdateObject {
                id,
                update: ObjectUpdate::material(MaterialDescriptor::new(
                    kind,
                    Color::from_array(color),
                )),
            });
        }
    }

    if ui.collapsing_header("Geometry", imgui::TreeNodeFlags::empty()) {
        let mut shape = *object.shape();
        if edit_shape(ui, &mut shape) {
            commands.push(EditorCommand::UpdateObject {
                id,
                update: ObjectUpdate::shape(shape),
            });
        }
    }
}

/// Parameter widgets for every shape kind. Returns true when a value changed.
fn edit_shape(ui: &imgui::Ui, shape: &mut ShapeDescriptor) -> bool {
    let length = |label: &str, value: &mut f32| ui.slider(label, 0.01, 10.0, value);
    let segments =
        |label: &str, value: &mut u32, min: u32| ui.slider(label, min, MAX_SEGMENTS, value);
    let angle = |label: &str, value: &mut f32| ui.slider(label, 0.0, TAU, value);

    match shape {
        ShapeDescriptor::Box(p) => {
            length("Width", &mut p.width)
                | length("Height", &mut p.height)
                | length("Depth", &mut p.depth)
                | segments("Width segments", &mut p.width_segments, 1)
                | segments("Height segments", &mut p.height_segments, 1)
                | segments("Depth segments", &mut p.depth_segments, 1)
        }
        ShapeDescriptor::Capsule(p) => {
            length("Radius", &mut p.radius)
                | length("Length", &mut p.length)
                | segments("Cap segments", &mut p.cap_segments, 1)
                | segments("Radial segments", &mut p.radial_segments, 3)
        }
        ShapeDescriptor::Cone(p) => {
            length("Radius", &mut p.radius)
                | length("Height", &mut p.height)
                | segments("Radial segments", &mut p.radial_segments, 3)
                | segments("Height segments", &mut p.height_segments, 1)
                | ui.checkbox("Open ended", &mut p.open_ended)
                | angle("Theta start", &mut p.theta_start)
                | angle("Theta length", &mut p.theta_length)
        }
        ShapeDescriptor::Cylinder(p) => {
            length("Radius top", &mut p.radius_top)
                | length("Radius bottom", &mut p.radius_bottom)
                | length("Height", &mut p.height)
                | segments("Radial segments", &mut p.radial_segments, 3)
                | segments("Height segments", &mut p.height_segments, 1)
                | ui.checkbox("Open ended", &mut p.open_ended)
                | angle("Theta start", &mut p.theta_start)
                | angle("Theta length", &mut p.theta_length)
        }
        ShapeDescriptor::Tetrahedron(p)
        | ShapeDescriptor::Octahedron(p)
        | ShapeDescriptor::Dodecahedron(p)
        | ShapeDescriptor::Icosahedron(p) => {
            length("Radius", &mut p.radius) | ui.slider("Detail", 0, MAX_DETAIL, &mut p.detail)
        }
        ShapeDescriptor::Sphere(p) => {
            length("Radius", &mut p.radius)
                | segments("Width segments", &mut p.width_segments, 3)
                | segments("Height segments", &mut p.height_segments, 2)
                | angle("Phi start", &mut p.phi_start)
                | angle("Phi length", &mut p.phi_length)
                | angle("Theta start", &mut p.theta_start)
                | angle("Theta length", &mut p.theta_length)
        }
        ShapeDescriptor::Torus(p) => {
            length("Radius", &mut p.radius)
                | length("Tube", &mut p.tube)
                | segments("Radial segments", &mut p.radial_segments, 2)
                | segments("Tubular segments", &mut p.tubular_segments, 3)
                | angle("Arc", &mut p.arc)
        }
        ShapeDescriptor::TorusKnot(p) => {
            length("Radius", &mut p.radius)
                | length("Tube", &mut p.tube)
                | segments("Tubular segments", &mut p.tubular_segments, 3)
                | segments("Radial segments", &mut p.radial_segments, 3)
                | ui.slider("P", 1, 16, &mut p.p)
                | ui.slider("Q", 1, 16, &mut p.q)
        }
        ShapeDescriptor::Plane(p) => {
            length("Width", &mut p.width)
                | length("Height", &mut p.height)
                | segments("Width segments", &mut p.width_segments, 1)
                | segments("Height segments", &mut p.height_segments, 1)
        }
        ShapeDescriptor::Circle(p) => {
            length("Radius", &mut p.radius)
                | segments("Segments", &mut p.segments, 3)
                | angle("Theta start", &mut p.theta_start)
                | angle("Theta length", &mut p.theta_length)
        }
    }
}

fn render_uploads<B: RenderBackend>(
    ui: &imgui::Ui,
    editor: &Editor<B>,
    commands: &mut Vec<EditorCommand>,
) {
    let uploads = editor.uploads();
    if !ui.collapsing_header(
        format!("Uploaded meshes ({})###uploads", uploads.len()),
        imgui::TreeNodeFlags::empty(),
    ) {
        return;
    }
    for mesh in uploads.list() {
        let id = mesh.id();
        let tag = id.raw();
        ui.text(mesh.name());

        let mut color = mesh.color().to_array();
        if ui.color_edit3(format!("Color##upload{tag}"), &mut color) {
            commands.push(EditorCommand::SetUploadColor {
                id,
                color: Color::from_array(color),
            });
        }
        let mut scale = mesh.uniform_scale();
        if ui.slider(format!("Scale##upload{tag}"), 0.01, 10.0, &mut scale) {
            commands.push(EditorCommand::SetUploadScale { id, scale });
        }
        if ui.small_button(format!("Remove##upload{tag}")) {
            commands.push(EditorCommand::RemoveUpload(id));
        }
    }
    if !uploads.is_empty() && ui.button("Clear uploads") {
        commands.push(EditorCommand::ClearUploads);
    }
}

fn render_lighting<B: RenderBackend>(
    ui: &imgui::Ui,
    editor: &Editor<B>,
    commands: &mut Vec<EditorCommand>,
) {
    if !ui.collapsing_header("Lighting", imgui::TreeNodeFlags::empty()) {
        return;
    }
    let lighting = editor.lighting();

    let mut background = lighting.background_color.to_array();
    if ui.color_edit3("Background", &mut background) {
        commands.push(EditorCommand::SetLighting(LightingField::Background(
            Color::from_array(background),
        )));
    }

    let mut ambient = lighting.ambient.color.to_array();
    if ui.color_edit3("Ambient", &mut ambient) {
        commands.push(EditorCommand::SetLighting(LightingField::AmbientColor(
            Color::from_array(ambient),
        )));
    }
    let mut ambient_intensity = lighting.ambient.intensity;
    if ui.slider("Ambient intensity", 0.0, 5.0, &mut ambient_intensity) {
        commands.push(EditorCommand::SetLighting(LightingField::AmbientIntensity(
            ambient_intensity,
        )));
    }

    let mut directional = lighting.directional.color.to_array();
    if ui.color_edit3("Directional", &mut directional) {
        commands.push(EditorCommand::SetLighting(LightingField::DirectionalColor(
            Color::from_array(directional),
        )));
    }
    let mut directional_intensity = lighting.directional.intensity;
    if ui.slider("Directional intensity", 0.0, 5.0, &mut directional_intensity) {
        commands.push(EditorCommand::SetLighting(
            LightingField::DirectionalIntensity(directional_intensity),
        ));
    }
    let mut position = lighting.directional.position;
    if ui.input_float3("Light position", &mut position).build() {
        commands.push(EditorCommand::SetLighting(
            LightingField::DirectionalPosition(position),
        ));
    }

    if ui.button("Reset lighting") {
        commands.push(EditorCommand::ResetLighting);
    }
}

fn render_files(
    ui: &imgui::Ui,
    state: &mut PanelState,
    pending_imports: usize,
    center_imports: bool,
    commands: &mut Vec<EditorCommand>,
) {
    if !ui.collapsing_header("Import / Export", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }
    let mut center = center_imports;
    if ui.checkbox("Center on import", &mut center) {
        commands.push(EditorCommand::SetCenterImports(center));
    }
    ui.input_text("Asset path", &mut state.import_path).build();
    if ui.button("Import") {
        if let Some(command) = state.import_command() {
            commands.push(command);
        }
    }
    if pending_imports > 0 {
        ui.same_line();
        ui.text_disabled(format!("{pending_imports} pending"));
    }

    ui.input_text("Export dir", &mut state.export_dir).build();
    if ui.button("Export glTF") {
        commands.push(state.export_command());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::io::LoadError;
    use std::path::Path;

    #[test]
    fn test_create_command_uses_form_values() {
        let mut state = PanelState::new(Path::new("."));
        state.new_shape = 8; // sphere
        state.new_material = 2; // phong
        state.new_color = [0.0, 0.5, 1.0];

        match state.create_command(3) {
            EditorCommand::CreateObject {
                shape,
                material,
                transform,
            } => {
                assert_eq!(shape.kind(), ShapeKind::Sphere);
                assert_eq!(material.kind, MaterialKind::Phong);
                assert_eq!(material.color, Color::from_array([0.0, 0.5, 1.0]));
                assert_eq!(transform.position, crate::editor::spawn_position(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_blank_import_path_is_ignored() {
        let mut state = PanelState::new(Path::new("."));
        state.import_path = "   ".to_string();
        assert!(state.import_command().is_none());
        state.import_path = "model.glb".to_string();
        assert!(matches!(
            state.import_command(),
            Some(EditorCommand::Import(AssetSource::Path(_)))
        ));
    }

    #[test]
    fn test_status_tracks_outcomes() {
        let mut state = PanelState::new(Path::new("out"));
        state.record(&Ok(CommandOutcome::Applied));
        assert!(state.status.is_none());

        state.record(&Ok(CommandOutcome::Exported(PathBuf::from("out/modified_model.gltf"))));
        assert_eq!(state.status.as_ref().map(|s| s.is_error), Some(false));

        state.record(&Err(EditorError::Load(LoadError::UnsupportedFormat(
            "fbx".to_string(),
        ))));
        let status = state.status.clone().unwrap();
        assert!(status.is_error);
        assert!(status.message.contains("fbx"));
    }

    #[test]
    fn test_export_command_defaults_to_cwd() {
        let mut state = PanelState::new(Path::new("exports"));
        assert!(matches!(
            state.export_command(),
            EditorCommand::Export { dir } if dir == Path::new("exports")
        ));
        state.export_dir.clear();
        assert!(matches!(
            state.export_command(),
            EditorCommand::Export { dir } if dir == Path::new(".")
        ));
    }
}
