use cgmath::Vector3;

use sceneforge::app::{sync_camera_lock, RenderLoop};
use sceneforge::config::CameraSettings;
use sceneforge::editor::{Editor, EditorCommand, HeadlessBackend, HelperOverlays};
use sceneforge::error::EditorError;
use sceneforge::gfx::camera::OrbitCamera;
use sceneforge::gfx::geometry::{BoxParams, ShapeDescriptor, SphereParams};
use sceneforge::gfx::gizmos::GizmoMode;
use sceneforge::gfx::picking::{ObjectPicker, Ray};
use sceneforge::gfx::resources::material::{Color, MaterialDescriptor, MaterialKind};
use sceneforge::gfx::transform::{matrices_close, Transform};
use sceneforge::io::{AssetSource, EXPORT_FILE_NAME};

fn red_standard() -> MaterialDescriptor {
    MaterialDescriptor::new(MaterialKind::Standard, Color::RED)
}

/// Straight down onto the ground plane at (x, z)
fn down_ray(x: f32, z: f32) -> Ray {
    Ray::new(Vector3::new(x, 5.0, z), Vector3::new(0.0, -1.0, 0.0))
}

#[test]
fn test_create_pick_rotate_delete() {
    let mut editor = Editor::new(HeadlessBackend::new());
    let id = editor
        .create_object(
            ShapeDescriptor::Box(BoxParams::default()),
            red_standard(),
            Transform::default(),
        )
        .unwrap();
    assert_eq!(editor.scene().object_node_count(), 1);

    // Camera looks at the origin, so the screen centre lands on the box
    let camera = OrbitCamera::new(6.0, 0.3, 0.4, Vector3::new(0.0, 0.0, 0.0), 1.0);
    let picked = ObjectPicker::new().pick(
        (400.0, 400.0),
        (800.0, 800.0),
        &camera,
        editor.registry().pick_candidates(),
    );
    assert_eq!(picked, Some(id));
    editor.select(picked).unwrap();

    // Quarter turn on the Y ring: grab it at +X and sweep to -Z
    assert!(editor.set_gizmo_mode(GizmoMode::Rotate));
    assert!(editor.begin_gizmo_drag(&down_ray(1.5, 0.0)));
    assert!(editor.drag_gizmo(&down_ray(0.0, -1.5)).unwrap());
    assert!(editor.end_gizmo_drag());

    let rotated = *editor.registry().get(id).unwrap().transform();
    assert!((rotated.rotation.y - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    assert!(rotated.rotation.x.abs() < 1e-5 && rotated.rotation.z.abs() < 1e-5);
    assert_eq!(rotated.position, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(rotated.scale, Vector3::new(1.0, 1.0, 1.0));

    assert_eq!(editor.delete_selected().unwrap(), Some(id));
    assert!(editor.registry().is_empty());
    assert_eq!(editor.scene().object_node_count(), 0);
    assert_eq!(editor.selection(), None);
}

#[test]
fn test_clipboard_is_single_shot() {
    let mut editor = Editor::new(HeadlessBackend::new());
    let id = editor
        .create_object(
            ShapeDescriptor::Sphere(SphereParams::default()),
            red_standard(),
            Transform::default(),
        )
        .unwrap();
    editor.select(Some(id)).unwrap();
    assert!(editor.copy_selected());

    let pasted = editor.paste().unwrap().expect("first paste creates a copy");
    assert_ne!(pasted, id);
    assert_eq!(editor.paste().unwrap(), None);
    assert_eq!(editor.registry().len(), 2);

    let original = editor.registry().get(id).unwrap();
    let copy = editor.registry().get(pasted).unwrap();
    assert_eq!(copy.shape(), original.shape());
    assert_eq!(copy.material(), original.material());
}

#[test]
fn test_export_then_import_preserves_placement() {
    let mut editor = Editor::new(HeadlessBackend::new());
    let transform = Transform {
        position: Vector3::new(1.0, 2.0, -3.0),
        rotation: Vector3::new(0.3, -0.7, 1.1),
        scale: Vector3::new(1.5, 0.5, 2.0),
    };
    editor
        .create_object(
            ShapeDescriptor::Box(BoxParams::new(1.0, 2.0, 3.0)),
            red_standard(),
            transform,
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = editor.export_to_dir(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);

    let data = std::fs::read(&path).unwrap();
    let mut reloaded = Editor::new(HeadlessBackend::new());
    let ids = reloaded
        .import_asset(&AssetSource::Bytes {
            name: EXPORT_FILE_NAME.to_string(),
            data,
        })
        .unwrap();
    assert_eq!(ids.len(), 1);

    let mesh = reloaded.uploads().get(ids[0]).unwrap();
    assert!(matrices_close(&mesh.matrix(), &transform.matrix(), 1e-4));
    assert_eq!(mesh.geometry().triangle_count(), 12);
    assert_eq!(mesh.color(), Color::RED);
}

#[test]
fn test_refused_export_keeps_overlays() {
    let mut editor = Editor::new(HeadlessBackend::new());
    editor
        .create_object(
            ShapeDescriptor::Box(BoxParams::default()),
            red_standard(),
            Transform {
                scale: Vector3::new(0.0, 1.0, 1.0),
                ..Transform::default()
            },
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let err = editor.export_to_dir(dir.path()).unwrap_err();
    assert!(matches!(err, EditorError::ExportRefused(_)));
    assert!(!dir.path().join(EXPORT_FILE_NAME).exists());
    assert_eq!(editor.scene().overlays(), HelperOverlays::default());
}

#[test]
fn test_camera_is_locked_only_while_dragging() {
    let mut editor = Editor::new(HeadlessBackend::new());
    let id = editor
        .create_object(
            ShapeDescriptor::Box(BoxParams::default()),
            red_standard(),
            Transform::default(),
        )
        .unwrap();
    editor.select(Some(id)).unwrap();
    let mut camera = CameraSettings::default().build(1.0);
    let mut render_loop = RenderLoop::new();

    // Grab the X handle from above
    assert!(editor.begin_gizmo_drag(&down_ray(0.8, 0.0)));
    render_loop.tick(0.016, &mut editor, &mut camera, |_, _| Ok(()));
    assert!(camera.controller.is_suppressed());

    editor.drag_gizmo(&down_ray(1.3, 0.0)).unwrap();
    render_loop.tick(0.016, &mut editor, &mut camera, |_, _| Ok(()));
    assert!(camera.controller.is_suppressed());

    // Delete ends the drag with the button still held
    editor.dispatch(EditorCommand::DeleteSelected).unwrap();
    assert!(!editor.is_dragging());
    sync_camera_lock(&editor, &mut camera);
    assert!(!camera.controller.is_suppressed());
}
