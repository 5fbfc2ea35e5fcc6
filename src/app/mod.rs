//! Windowed editor application.
//!
//! [`EditorApp`] is the winit [`ApplicationHandler`]: it owns the window, the render
//! engine, the imgui layer and the [`Editor`], turns window input into
//! [`EditorCommand`]s, and drives frames through the [`RenderLoop`].

pub mod input;
pub mod render_loop;

pub use input::{command_for_key, ClickTracker, PointerGesture};
pub use render_loop::{sync_camera_lock, RenderLoop};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{ModifiersState, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::EditorSettings;
use crate::editor::{CommandOutcome, Editor, EditorCommand};
use crate::gfx::camera::CameraManager;
use crate::gfx::picking::Ray;
use crate::gfx::rendering::{overlay, GpuBackend, LineVertex, RenderEngine};
use crate::io::AssetSource;
use crate::ui::{editor_panel, PanelState, UiManager};

struct GpuState {
    window: Arc<Window>,
    engine: RenderEngine,
    ui: UiManager,
    editor: Editor<GpuBackend>,
}

pub struct EditorApp {
    settings: EditorSettings,
    initial_assets: Vec<PathBuf>,
    gpu: Option<GpuState>,
    camera: CameraManager,
    render_loop: RenderLoop,
    clicks: ClickTracker,
    panel: PanelState,
    cursor: (f32, f32),
    modifiers: ModifiersState,
    pending: Vec<EditorCommand>,
    startup_error: Option<anyhow::Error>,
}

impl EditorApp {
    pub fn new(settings: EditorSettings, initial_assets: Vec<PathBuf>) -> Self {
        let aspect = settings.window.width.max(1) as f32 / settings.window.height.max(1) as f32;
        let camera = settings.camera.build(aspect);
        let clicks = ClickTracker::new(
            settings.input.click_slop,
            Duration::from_millis(settings.input.double_click_ms),
        );
        let panel = PanelState::new(&settings.export.directory);

        Self {
            settings,
            initial_assets,
            gpu: None,
            camera,
            render_loop: RenderLoop::new(),
            clicks,
            panel,
            cursor: (0.0, 0.0),
            modifiers: ModifiersState::empty(),
            pending: Vec::new(),
            startup_error: None,
        }
    }

    /// Run the event loop until the window closes.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        log::info!(
            "Exiting after {} frames ({} skipped)",
            self.render_loop.frames_drawn(),
            self.render_loop.frames_skipped()
        );
        match self.startup_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<GpuState> {
        let window = Arc::new(event_loop.create_window(window_attributes(&self.settings))?);
        let (width, height) = window.inner_size().into();

        let engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.settings.window.vsync,
            self.settings.camera.overlay_style(),
        ))?;
        let mut ui = UiManager::new(engine.device(), engine.queue(), engine.surface_format(), &window);
        ui.update_display_size(width, height);

        let mut editor = Editor::new(engine.create_backend());
        editor.gizmo_mut().handle_length = self.settings.gizmo.handle_length;
        editor.set_center_imports(self.settings.import.center_on_bounds);
        for path in self.initial_assets.drain(..) {
            let result = editor.begin_import(AssetSource::Path(path));
            self.panel
                .record(&result.map(|()| CommandOutcome::ImportStarted));
        }

        self.camera.camera.resize_projection(width, height);
        Ok(GpuState {
            window,
            engine,
            ui,
            editor,
        })
    }

    fn flush_commands(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        for command in self.pending.drain(..) {
            let result = gpu.editor.dispatch(command);
            self.panel.record(&result);
        }
        sync_camera_lock(&gpu.editor, &mut self.camera);
    }

    fn on_left_button(&mut self, state: ElementState) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        match state {
            ElementState::Pressed => {
                let ray = pointer_ray(gpu, self.cursor, &self.camera);
                if gpu.editor.begin_gizmo_drag(&ray) {
                    sync_camera_lock(&gpu.editor, &mut self.camera);
                    self.clicks.cancel();
                } else {
                    self.clicks.press(self.cursor);
                }
            }
            ElementState::Released => {
                if gpu.editor.end_gizmo_drag() {
                    sync_camera_lock(&gpu.editor, &mut self.camera);
                    return;
                }
                match self.clicks.release(self.cursor, Instant::now()) {
                    Some(PointerGesture::Click) => {
                        let ray = pointer_ray(gpu, self.cursor, &self.camera);
                        self.pending.push(EditorCommand::Click(ray));
                    }
                    Some(PointerGesture::DoubleClick) => {
                        let enabled = self.camera.controller.toggle_auto_rotate();
                        log::info!("Auto-rotate {}", if enabled { "on" } else { "off" });
                    }
                    Some(PointerGesture::Drag) | None => {}
                }
            }
        }
    }

    fn on_cursor_moved(&mut self, position: (f32, f32)) {
        self.cursor = position;
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };
        if gpu.editor.is_dragging() {
            let ray = pointer_ray(gpu, position, &self.camera);
            self.pending.push(EditorCommand::DragGizmo(ray));
        } else {
            self.clicks.moved(position);
        }
    }

    fn on_key(&mut self, event: &KeyEvent) {
        self.camera.process_keyboard_event(event);
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        if let PhysicalKey::Code(code) = event.physical_key {
            if let Some(command) = command_for_key(code, self.modifiers) {
                self.pending.push(command);
            }
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let GpuState {
            window,
            engine,
            ui,
            editor,
        } = gpu;
        let window: &Window = window.as_ref();
        let panel = &mut self.panel;
        let pending = &mut self.pending;

        let dt = self.render_loop.frame_dt(Instant::now());
        let reports = self
            .render_loop
            .tick(dt, editor, &mut self.camera, |editor, camera| {
                engine.update_globals(&camera.camera.uniform, editor.lighting());
                let gizmo = gizmo_overlay(editor);
                let mut commands = Vec::new();
                engine.render_frame(
                    editor.scene().backend(),
                    editor.lighting().background_color,
                    &gizmo,
                    Some(|device: &wgpu::Device,
                          queue: &wgpu::Queue,
                          encoder: &mut wgpu::CommandEncoder,
                          view: &wgpu::TextureView| {
                        ui.draw(device, queue, encoder, window, view, |frame| {
                            editor_panel(frame, panel, editor, &mut commands)
                        });
                    }),
                )?;
                pending.extend(commands);
                Ok(())
            });

        for report in &reports {
            self.panel.record_import(report);
        }
        self.flush_commands();
    }
}

fn window_attributes(settings: &EditorSettings) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(settings.window.title.clone())
        .with_inner_size(LogicalSize::new(
            settings.window.width.max(1),
            settings.window.height.max(1),
        ))
}

fn pointer_ray(gpu: &GpuState, cursor: (f32, f32), camera: &CameraManager) -> Ray {
    let (width, height) = gpu.engine.surface_size();
    gpu.editor
        .picker()
        .screen_to_ray(cursor, (width as f32, height as f32), &camera.camera)
}

/// Gizmo handle lines for the current selection, if any.
fn gizmo_overlay(editor: &Editor<GpuBackend>) -> Vec<LineVertex> {
    let gizmo = editor.gizmo();
    editor
        .selection()
        .and_then(|id| editor.registry().get(id))
        .map(|object| {
            overlay::gizmo_lines(
                gizmo.mode(),
                object.transform().position,
                gizmo.handle_length,
                gizmo.active_axis(),
            )
        })
        .unwrap_or_default()
}

impl ApplicationHandler for EditorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                log::info!("Editor window ready");
                self.gpu = Some(gpu);
            }
            Err(e) => {
                log::error!("Failed to start editor: {e:#}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        // imgui gets first look at input; an active gizmo drag keeps the pointer
        let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        let captured = gpu.ui.handle_input(&gpu.window, &ui_event);
        let keyboard_captured = gpu.ui.wants_keyboard();
        let dragging = gpu.editor.is_dragging();

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                gpu.engine.resize(width, height);
                gpu.ui.update_display_size(width, height);
                self.camera.camera.resize_projection(width, height);
            }
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved((position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if captured && !dragging {
                    return;
                }
                self.camera.process_mouse_button(button, state);
                if button == MouseButton::Left {
                    self.on_left_button(state);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !keyboard_captured {
                    self.on_key(&event);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
        self.flush_commands();
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };
        if gpu.ui.wants_input() && !gpu.editor.is_dragging() {
            return;
        }
        self.camera.process_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = self.gpu.as_ref() {
            gpu.window.request_redraw();
        }
    }
}
