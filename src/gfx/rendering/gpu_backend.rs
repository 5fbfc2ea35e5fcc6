//! wgpu implementation of [`RenderBackend`].
//!
//! Each node owns its vertex, index and uniform buffers plus one bind group. Destroying a
//! node destroys the buffers immediately rather than waiting for the drop.

use cgmath::Matrix4;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;

use super::vertex::MeshVertex;
use crate::editor::scene_graph::{HelperOverlays, RenderBackend, RenderHandle};
use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::{MaterialDescriptor, MaterialKind};
use crate::wgpu_utils::UniformBuffer;

pub const SHADING_UNLIT: u32 = 0;
pub const SHADING_LAMBERT: u32 = 1;
pub const SHADING_SPECULAR: u32 = 2;
pub const SHADING_TOON: u32 = 3;

/// Shader branch for a material kind.
pub fn shading_mode(kind: MaterialKind) -> u32 {
    match kind {
        MaterialKind::Basic | MaterialKind::Matcap => SHADING_UNLIT,
        MaterialKind::Lambert => SHADING_LAMBERT,
        MaterialKind::Phong | MaterialKind::Standard | MaterialKind::Physical => SHADING_SPECULAR,
        MaterialKind::Toon => SHADING_TOON,
    }
}

/// Must match `Node` in `mesh.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    /// x: shading mode, yzw unused
    shading: [u32; 4],
}

impl NodeUniform {
    pub fn new(material: &MaterialDescriptor, transform: Matrix4<f32>) -> Self {
        let [r, g, b] = material.color.to_array();
        Self {
            model: transform.into(),
            color: [r, g, b, 1.0],
            shading: [shading_mode(material.kind), 0, 0, 0],
        }
    }

    fn set_material(&mut self, material: &MaterialDescriptor) {
        let [r, g, b] = material.color.to_array();
        self.color = [r, g, b, 1.0];
        self.shading[0] = shading_mode(material.kind);
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, geometry: &GeometryData) -> Self {
        let vertices = MeshVertex::interleave(geometry);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Node Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Node Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }

    fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

struct GpuNode {
    mesh: GpuMesh,
    uniform: NodeUniform,
    uniform_buffer: UniformBuffer<NodeUniform>,
    bind_group: wgpu::BindGroup,
    visible: bool,
}

pub struct GpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    node_layout: wgpu::BindGroupLayout,
    nodes: HashMap<RenderHandle, GpuNode>,
    next_handle: u64,
    overlays: HelperOverlays,
}

impl GpuBackend {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        node_layout: wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            device,
            queue,
            node_layout,
            nodes: HashMap::new(),
            next_handle: 0,
            overlays: HelperOverlays::default(),
        }
    }

    pub fn overlays(&self) -> HelperOverlays {
        self.overlays
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Record draw calls for every visible node. The mesh pipeline and globals must
    /// already be bound.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        for node in self.nodes.values().filter(|node| node.visible) {
            pass.set_bind_group(1, &node.bind_group, &[]);
            pass.set_vertex_buffer(0, node.mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(node.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..node.mesh.index_count, 0, 0..1);
        }
    }

    fn with_node(&mut self, handle: RenderHandle, f: impl FnOnce(&mut GpuNode, &wgpu::Queue)) {
        match self.nodes.get_mut(&handle) {
            Some(node) => f(node, &self.queue),
            None => log::warn!("Unknown render handle {}", handle.raw()),
        }
    }
}

impl RenderBackend for GpuBackend {
    fn create_node(
        &mut self,
        geometry: &GeometryData,
        material: &MaterialDescriptor,
        transform: Matrix4<f32>,
    ) -> RenderHandle {
        let uniform = NodeUniform::new(material, transform);
        let uniform_buffer = UniformBuffer::new_with_data(&self.device, &uniform);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Node Bind Group"),
            layout: &self.node_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.binding_resource(),
            }],
        });

        self.next_handle += 1;
        let handle = RenderHandle::from_raw(self.next_handle);
        self.nodes.insert(
            handle,
            GpuNode {
                mesh: GpuMesh::new(&self.device, geometry),
                uniform,
                uniform_buffer,
                bind_group,
                visible: true,
            },
        );
        handle
    }

    fn set_geometry(&mut self, handle: RenderHandle, geometry: &GeometryData) {
        let mesh = GpuMesh::new(&self.device, geometry);
        self.with_node(handle, |node, _| {
            node.mesh.destroy();
            node.mesh = mesh;
        });
    }

    fn set_material(&mut self, handle: RenderHandle, material: &MaterialDescriptor) {
        self.with_node(handle, |node, queue| {
            node.uniform.set_material(material);
            node.uniform_buffer.update_content(queue, node.uniform);
        });
    }

    fn set_transform(&mut self, handle: RenderHandle, transform: Matrix4<f32>) {
        self.with_node(handle, |node, queue| {
            node.uniform.model = transform.into();
            node.uniform_buffer.update_content(queue, node.uniform);
        });
    }

    fn set_visible(&mut self, handle: RenderHandle, visible: bool) {
        self.with_node(handle, |node, _| node.visible = visible);
    }

    fn destroy_node(&mut self, handle: RenderHandle) {
        if let Some(node) = self.nodes.remove(&handle) {
            node.mesh.destroy();
            node.uniform_buffer.destroy();
        }
    }

    fn set_overlays(&mut self, overlays: HelperOverlays) {
        self.overlays = overlays;
    }
}
