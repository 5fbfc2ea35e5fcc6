//! wgpu rendering engine for the editor viewport
//!
//! Owns the surface, depth buffer, pipelines and per-frame global uniforms. Scene nodes
//! live in a [`GpuBackend`] created from the engine's device; overlays (grid, axes and
//! gizmo) are line lists drawn after the meshes in the same pass.

use std::sync::Arc;
use thiserror::Error;
use wgpu::util::DeviceExt;

use super::gpu_backend::GpuBackend;
use super::overlay;
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::vertex::{LineVertex, MeshVertex};
use crate::editor::lighting::LightingState;
use crate::gfx::{
    camera::CameraUniform,
    resources::{material::Color, GlobalBindings, TextureResource},
};
use crate::wgpu_utils::binding_types;

const MESH_PIPELINE: &str = "Mesh";
const LINE_PIPELINE: &str = "Lines";
const INITIAL_GIZMO_CAPACITY: usize = 512;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("{0}")]
    Other(String),
}

/// Sizes of the static helper overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub axes_length: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            grid_divisions: 20,
            axes_length: 2.0,
        }
    }
}

struct LineBuffer {
    buffer: wgpu::Buffer,
    count: u32,
    capacity: usize,
}

impl LineBuffer {
    fn new_static(device: &wgpu::Device, label: &str, lines: &[LineVertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(lines),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            count: lines.len() as u32,
            capacity: lines.len(),
        }
    }

    fn new_dynamic(device: &wgpu::Device, label: &str, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<LineVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            count: 0,
            capacity,
        }
    }

    /// Upload `lines`, growing the buffer when they no longer fit.
    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, lines: &[LineVertex]) {
        if lines.len() > self.capacity {
            self.buffer.destroy();
            *self = Self::new_dynamic(device, "Gizmo Line Buffer", lines.len().next_power_of_two());
        }
        if !lines.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(lines));
        }
        self.count = lines.len() as u32;
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.buffer.slice(..));
        pass.draw(0..self.count, 0..1);
    }
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: wgpu::TextureFormat,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    node_layout: wgpu::BindGroupLayout,
    grid: LineBuffer,
    axes: LineBuffer,
    gizmo: LineBuffer,
}

impl RenderEngine {
    /// Create the engine for `window` and build every pipeline up front.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
        style: OverlayStyle,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");
        let global_bindings = GlobalBindings::new(&device);
        let node_layout = binding_types::uniform_layout(&device, "Node Bind Group Layout");

        let grid = LineBuffer::new_static(
            &device,
            "Grid Line Buffer",
            &overlay::grid_lines(style.grid_size, style.grid_divisions),
        );
        let axes = LineBuffer::new_static(
            &device,
            "Axes Line Buffer",
            &overlay::axes_lines(style.axes_length),
        );
        let gizmo = LineBuffer::new_dynamic(&device, "Gizmo Line Buffer", INITIAL_GIZMO_CAPACITY);

        let device: Arc<wgpu::Device> = Arc::new(device);
        let queue: Arc<wgpu::Queue> = Arc::new(queue);
        let mut pipeline_manager = PipelineManager::new(device.clone());

        pipeline_manager.load_shader("mesh", include_str!("shaders/mesh.wgsl"));
        pipeline_manager.load_shader("line", include_str!("shaders/line.wgsl"));

        pipeline_manager.register_pipeline(
            MESH_PIPELINE,
            PipelineConfig::default()
                .with_label("MESH")
                .with_shader("mesh")
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.layout().clone(),
                    node_layout.clone(),
                ])
                .with_vertex_layout(MeshVertex::desc())
                .with_depth(TextureResource::DEPTH_FORMAT, true)
                .with_color_target(format, Some(wgpu::BlendState::REPLACE)),
        );
        pipeline_manager.register_pipeline(
            LINE_PIPELINE,
            PipelineConfig::default()
                .with_label("LINES")
                .with_shader("line")
                .with_cull_mode(None)
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_bind_group_layouts(vec![global_bindings.layout().clone()])
                .with_vertex_layout(LineVertex::desc())
                .with_depth(TextureResource::DEPTH_FORMAT, false)
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING)),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            anyhow::bail!("failed to create pipelines: {}", errors.join("; "));
        }

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_bindings,
            node_layout,
            grid,
            axes,
            gizmo,
        })
    }

    /// Node store sharing this engine's device.
    pub fn create_backend(&self) -> GpuBackend {
        GpuBackend::new(
            self.device.clone(),
            self.queue.clone(),
            self.node_layout.clone(),
        )
    }

    pub fn update_globals(&mut self, camera: &CameraUniform, lighting: &LightingState) {
        self.global_bindings.update(&self.queue, camera, lighting);
    }

    /// Draw one frame: meshes, visible overlays, then the optional UI callback.
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame<F>(
        &mut self,
        backend: &GpuBackend,
        background: Color,
        gizmo_lines: &[LineVertex],
        ui_callback: Option<F>,
    ) -> Result<(), FrameError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let overlays = backend.overlays();
        let gizmo_lines = if overlays.gizmo { gizmo_lines } else { &[] };
        self.gizmo.write(&self.device, &self.queue, gizmo_lines);

        let mesh_pipeline = self
            .pipeline_manager
            .pipeline(MESH_PIPELINE)
            .ok_or_else(|| FrameError::Other(format!("pipeline '{MESH_PIPELINE}' missing")))?;
        let line_pipeline = self
            .pipeline_manager
            .pipeline(LINE_PIPELINE)
            .ok_or_else(|| FrameError::Other(format!("pipeline '{LINE_PIPELINE}' missing")))?;

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b] = background.to_array();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            render_pass.set_pipeline(mesh_pipeline);
            backend.draw(&mut render_pass);

            render_pass.set_pipeline(line_pipeline);
            if overlays.grid {
                self.grid.draw(&mut render_pass);
            }
            if overlays.axes {
                self.axes.draw(&mut render_pass);
            }
            self.gizmo.draw(&mut render_pass);
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resize the surface and depth buffer. Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = present_mode(enable);
        self.surface.configure(&self.device, &self.config);
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}
