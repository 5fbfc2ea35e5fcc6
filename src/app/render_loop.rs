//! Per-frame driver.
//!
//! One [`RenderLoop::tick`] runs the frame in a fixed order: clamp `dt`, update the camera,
//! apply finished imports, advance animation, then draw. Draw failures are logged and
//! counted; they never stop the loop.

use std::time::Instant;

use crate::editor::{Editor, ImportReport, RenderBackend};
use crate::gfx::camera::CameraManager;
use crate::gfx::rendering::FrameError;

/// Longest step fed to the camera and clock, in seconds. Longer gaps (window dragging,
/// breakpoints) are treated as one slow frame.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Lock camera input exactly while a gizmo drag is live. A drag can also end without a
/// button release, for example on a mode switch.
pub fn sync_camera_lock<B: RenderBackend>(editor: &Editor<B>, camera: &mut CameraManager) {
    let dragging = editor.is_dragging();
    if camera.controller.is_suppressed() != dragging {
        camera.controller.set_suppressed(dragging);
    }
}

#[derive(Debug, Default)]
pub struct RenderLoop {
    last_frame: Option<Instant>,
    frames_drawn: u64,
    frames_skipped: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, 0 on the first.
    pub fn frame_dt(&mut self, now: Instant) -> f32 {
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);
        dt
    }

    /// Run one frame and return the imports that finished during it.
    pub fn tick<B, F>(
        &mut self,
        dt: f32,
        editor: &mut Editor<B>,
        camera: &mut CameraManager,
        draw: F,
    ) -> Vec<ImportReport>
    where
        B: RenderBackend,
        F: FnOnce(&Editor<B>, &CameraManager) -> Result<(), FrameError>,
    {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        sync_camera_lock(editor, camera);
        camera.update(dt);
        let reports = editor.poll_imports();
        editor.advance(dt);

        match draw(editor, camera) {
            Ok(()) => self.frames_drawn += 1,
            Err(e) => {
                self.frames_skipped += 1;
                log::warn!("Skipped frame: {e}");
            }
        }
        reports
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraSettings;
    use crate::editor::{EditorCommand, HeadlessBackend};
    use crate::gfx::geometry::ShapeDescriptor;
    use crate::gfx::gizmos::GizmoMode;
    use crate::gfx::picking::Ray;
    use crate::gfx::resources::material::MaterialDescriptor;
    use crate::gfx::transform::Transform;
    use cgmath::Vector3;
    use crate::io::AssetSource;
    use std::time::Duration;

    const TRIANGLE_OBJ: &[u8] = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn test_tick_order_and_counts() {
        let mut render_loop = RenderLoop::new();
        let mut editor = Editor::new(HeadlessBackend::new());
        let mut camera = CameraSettings::default().build(1.0);

        let reports = render_loop.tick(0.016, &mut editor, &mut camera, |editor, _| {
            assert!((editor.elapsed() - 0.016).abs() < 1e-6);
            Ok(())
        });
        assert!(reports.is_empty());

        render_loop.tick(0.016, &mut editor, &mut camera, |_, _| {
            Err(FrameError::Other("lost device".to_string()))
        });
        assert_eq!(render_loop.frames_drawn(), 1);
        assert_eq!(render_loop.frames_skipped(), 1);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut render_loop = RenderLoop::new();
        let mut editor = Editor::new(HeadlessBackend::new());
        let mut camera = CameraSettings::default().build(1.0);

        render_loop.tick(5.0, &mut editor, &mut camera, |_, _| Ok(()));
        assert!((editor.elapsed() - MAX_FRAME_DT).abs() < 1e-6);
        render_loop.tick(f32::NAN, &mut editor, &mut camera, |_, _| Ok(()));
        render_loop.tick(-1.0, &mut editor, &mut camera, |_, _| Ok(()));
        assert!((editor.elapsed() - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_auto_rotate_advances_with_ticks() {
        let mut render_loop = RenderLoop::new();
        let mut editor = Editor::new(HeadlessBackend::new());
        let mut camera = CameraSettings::default().build(1.0);
        camera.controller.toggle_auto_rotate();
        let yaw = camera.camera.yaw;

        render_loop.tick(0.05, &mut editor, &mut camera, |_, _| Ok(()));
        let expected = yaw + camera.controller.auto_rotate_speed * 0.05;
        assert!((camera.camera.yaw - expected).abs() < 1e-4);
    }

    #[test]
    fn test_finished_imports_are_reported() {
        let mut render_loop = RenderLoop::new();
        let mut editor = Editor::new(HeadlessBackend::new());
        let mut camera = CameraSettings::default().build(1.0);

        editor
            .begin_import(AssetSource::Bytes {
                name: "tri.obj".to_string(),
                data: TRIANGLE_OBJ.to_vec(),
            })
            .unwrap();

        let mut reports = Vec::new();
        for _ in 0..500 {
            reports.extend(render_loop.tick(0.01, &mut editor, &mut camera, |_, _| Ok(())));
            if !reports.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(reports.len(), 1);
        assert!(reports[0].result.is_ok());
        assert_eq!(editor.uploads().len(), 1);
    }

    #[test]
    fn test_camera_unlocks_when_drag_ends_without_release() {
        let mut render_loop = RenderLoop::new();
        let mut editor = Editor::new(HeadlessBackend::new());
        let mut camera = CameraSettings::default().build(1.0);
        let id = editor
            .create_object(
                ShapeDescriptor::default(),
                MaterialDescriptor::default(),
                Transform::default(),
            )
            .unwrap();
        editor.select(Some(id)).unwrap();

        // Looking down -Z through the X handle
        let ray = Ray::new(Vector3::new(0.8, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(editor.begin_gizmo_drag(&ray));
        render_loop.tick(0.016, &mut editor, &mut camera, |_, _| Ok(()));
        assert!(camera.controller.is_suppressed());

        editor
            .dispatch(EditorCommand::SetGizmoMode(GizmoMode::Rotate))
            .unwrap();
        assert!(!editor.is_dragging());
        render_loop.tick(0.016, &mut editor, &mut camera, |_, _| Ok(()));
        assert!(!camera.controller.is_suppressed());
    }

    #[test]
    fn test_frame_dt() {
        let mut render_loop = RenderLoop::new();
        let start = Instant::now();
        assert_eq!(render_loop.frame_dt(start), 0.0);
        let dt = render_loop.frame_dt(start + Duration::from_millis(20));
        assert!((dt - 0.02).abs() < 1e-4);
    }
}
