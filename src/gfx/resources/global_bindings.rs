//! Per-frame uniforms shared by every draw: camera and scene lighting.
//!
//! Bound at group 0 in both the mesh and overlay pipelines.

use crate::{
    editor::lighting::LightingState,
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Must match `Globals` in the WGSL shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// Ambient rgb, pre-multiplied by intensity
    ambient: [f32; 4],
    /// Directional rgb and intensity in `w`
    light_color: [f32; 4],
    /// Directional light position, `w` unused
    light_position: [f32; 4],
}

impl GlobalUniform {
    pub fn new(camera: &CameraUniform, lighting: &LightingState) -> Self {
        let ambient = lighting.ambient.color.to_array().map(|c| c * lighting.ambient.intensity);
        let [r, g, b] = lighting.directional.color.to_array();
        let [x, y, z] = lighting.directional.position;
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: [ambient[0], ambient[1], ambient[2], 1.0],
            light_color: [r, g, b, lighting.directional.intensity],
            light_position: [x, y, z, 1.0],
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

pub struct GlobalBindings {
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    ubo: GlobalUBO,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = binding_types::uniform_layout(device, "Globals Bind Group Layout");
        let ubo = GlobalUBO::new_with_data(
            device,
            &GlobalUniform::new(&CameraUniform::default(), &LightingState::default()),
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            layout,
            bind_group,
            ubo,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, camera: &CameraUniform, lighting: &LightingState) {
        self.ubo
            .update_content(queue, GlobalUniform::new(camera, lighting));
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
