//! # Scene Graph Adapter
//!
//! Mirrors registry and upload membership into render nodes owned by a
//! [`RenderBackend`]. The adapter is the only place render handles are created or
//! destroyed, which keeps the one-node-per-live-entity rule in a single spot.
//!
//! Helper overlays (grid, axes, gizmo) are tracked here as well so export can hide
//! them through [`SceneGraph::suspend_overlays`] and have them come back on every
//! exit path.

use cgmath::Matrix4;
use std::collections::HashMap;

use super::registry::{ObjectId, ObjectRegistry, RegistryEvent};
use super::uploads::UploadId;
use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::MaterialDescriptor;

/// Opaque backend reference to one render node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(u64);

impl RenderHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Visibility of non-content overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelperOverlays {
    pub grid: bool,
    pub axes: bool,
    pub gizmo: bool,
}

impl HelperOverlays {
    pub const HIDDEN: HelperOverlays = HelperOverlays {
        grid: false,
        axes: false,
        gizmo: false,
    };
}

impl Default for HelperOverlays {
    fn default() -> Self {
        Self {
            grid: true,
            axes: true,
            gizmo: true,
        }
    }
}

/// Renderer-side node storage.
pub trait RenderBackend {
    fn create_node(
        &mut self,
        geometry: &GeometryData,
        material: &MaterialDescriptor,
        transform: Matrix4<f32>,
    ) -> RenderHandle;

    fn set_geometry(&mut self, handle: RenderHandle, geometry: &GeometryData);

    fn set_material(&mut self, handle: RenderHandle, material: &MaterialDescriptor);

    fn set_transform(&mut self, handle: RenderHandle, transform: Matrix4<f32>);

    fn set_visible(&mut self, handle: RenderHandle, visible: bool);

    /// Drop the node and release any GPU buffers tied to it.
    fn destroy_node(&mut self, handle: RenderHandle);

    fn set_overlays(&mut self, overlays: HelperOverlays);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Object(ObjectId),
    Upload(UploadId),
}

pub struct SceneGraph<B: RenderBackend> {
    backend: B,
    nodes: HashMap<NodeKey, RenderHandle>,
    overlays: HelperOverlays,
}

impl<B: RenderBackend> SceneGraph<B> {
    pub fn new(mut backend: B) -> Self {
        let overlays = HelperOverlays::default();
        backend.set_overlays(overlays);
        Self {
            backend,
            nodes: HashMap::new(),
            overlays,
        }
    }

    /// Bring render nodes in line with one registry mutation.
    pub fn apply(&mut self, event: &RegistryEvent, registry: &ObjectRegistry) {
        match event {
            RegistryEvent::Created { id, geometry } => {
                let Some(object) = registry.get(*id) else {
                    log::warn!("Created event for {id} which is no longer registered");
                    return;
                };
                self.insert(
                    NodeKey::Object(*id),
                    &geometry.data,
                    object.material(),
                    object.transform().matrix(),
                );
            }
            RegistryEvent::Updated {
                id,
                geometry,
                material_changed,
                transform_changed,
            } => {
                let (Some(handle), Some(object)) =
                    (self.handle_of(NodeKey::Object(*id)), registry.get(*id))
                else {
                    log::warn!("Update for {id} has no matching render node");
                    return;
                };
                if let Some(geometry) = geometry {
                    self.backend.set_geometry(handle, &geometry.data);
                }
                if *material_changed {
                    self.backend.set_material(handle, object.material());
                }
                if *transform_changed {
                    self.backend
                        .set_transform(handle, object.transform().matrix());
                }
            }
            RegistryEvent::Removed { id } => {
                if !self.remove(NodeKey::Object(*id)) {
                    log::warn!("Removed {id} had no render node");
                }
            }
        }
    }

    /// Create the node for `key`, replacing any node already registered under it.
    pub fn insert(
        &mut self,
        key: NodeKey,
        geometry: &GeometryData,
        material: &MaterialDescriptor,
        transform: Matrix4<f32>,
    ) -> RenderHandle {
        let handle = self.backend.create_node(geometry, material, transform);
        if let Some(previous) = self.nodes.insert(key, handle) {
            log::warn!("Replacing stale render node for {key:?}");
            self.backend.destroy_node(previous);
        }
        handle
    }

    /// Destroy the node for `key`. Returns whether one existed.
    pub fn remove(&mut self, key: NodeKey) -> bool {
        match self.nodes.remove(&key) {
            Some(handle) => {
                self.backend.destroy_node(handle);
                true
            }
            None => false,
        }
    }

    pub fn set_material(&mut self, key: NodeKey, material: &MaterialDescriptor) {
        if let Some(handle) = self.handle_of(key) {
            self.backend.set_material(handle, material);
        }
    }

    pub fn set_transform(&mut self, key: NodeKey, transform: Matrix4<f32>) {
        if let Some(handle) = self.handle_of(key) {
            self.backend.set_transform(handle, transform);
        }
    }

    pub fn set_visible(&mut self, key: NodeKey, visible: bool) {
        if let Some(handle) = self.handle_of(key) {
            self.backend.set_visible(handle, visible);
        }
    }

    pub fn handle_of(&self, key: NodeKey) -> Option<RenderHandle> {
        self.nodes.get(&key).copied()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes backing registry objects.
    pub fn object_node_count(&self) -> usize {
        self.nodes
            .keys()
            .filter(|key| matches!(key, NodeKey::Object(_)))
            .count()
    }

    pub fn overlays(&self) -> HelperOverlays {
        self.overlays
    }

    pub fn set_overlays(&mut self, overlays: HelperOverlays) {
        self.overlays = overlays;
        self.backend.set_overlays(overlays);
    }

    /// Hide every overlay until the returned guard is dropped.
    pub fn suspend_overlays(&mut self) -> OverlayGuard<'_, B> {
        let saved = self.overlays;
        self.set_overlays(HelperOverlays::HIDDEN);
        OverlayGuard { graph: self, saved }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// Restores the overlay state captured by [`SceneGraph::suspend_overlays`] on drop.
pub struct OverlayGuard<'a, B: RenderBackend> {
    graph: &'a mut SceneGraph<B>,
    saved: HelperOverlays,
}

impl<B: RenderBackend> OverlayGuard<'_, B> {
    pub fn graph(&self) -> &SceneGraph<B> {
        self.graph
    }
}

impl<B: RenderBackend> Drop for OverlayGuard<'_, B> {
    fn drop(&mut self) {
        self.graph.set_overlays(self.saved);
    }
}

/// Node record kept by [`HeadlessBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessNode {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub material: MaterialDescriptor,
    pub transform: Matrix4<f32>,
    pub visible: bool,
}

/// Overlay states kept by [`HeadlessBackend::overlay_history`].
pub const OVERLAY_HISTORY_LEN: usize = 8;

/// In-memory backend with no GPU, for tests and offline tools.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    nodes: HashMap<RenderHandle, HeadlessNode>,
    overlays: Option<HelperOverlays>,
    overlay_history: Vec<HelperOverlays>,
    destroyed: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, handle: RenderHandle) -> Option<&HeadlessNode> {
        self.nodes.get(&handle)
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    pub fn overlays(&self) -> Option<HelperOverlays> {
        self.overlays
    }

    /// The most recent overlay states pushed to the backend, oldest first. At most
    /// [`OVERLAY_HISTORY_LEN`] are kept.
    pub fn overlay_history(&self) -> &[HelperOverlays] {
        &self.overlay_history
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_node(
        &mut self,
        geometry: &GeometryData,
        material: &MaterialDescriptor,
        transform: Matrix4<f32>,
    ) -> RenderHandle {
        self.next_handle += 1;
        let handle = RenderHandle(self.next_handle);
        self.nodes.insert(
            handle,
            HeadlessNode {
                vertex_count: geometry.vertex_count(),
                triangle_count: geometry.triangle_count(),
                material: *material,
                transform,
                visible: true,
            },
        );
        handle
    }

    fn set_geometry(&mut self, handle: RenderHandle, geometry: &GeometryData) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.vertex_count = geometry.vertex_count();
            node.triangle_count = geometry.triangle_count();
        }
    }

    fn set_material(&mut self, handle: RenderHandle, material: &MaterialDescriptor) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.material = *material;
        }
    }

    fn set_transform(&mut self, handle: RenderHandle, transform: Matrix4<f32>) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.transform = transform;
        }
    }

    fn set_visible(&mut self, handle: RenderHandle, visible: bool) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.visible = visible;
        }
    }

    fn destroy_node(&mut self, handle: RenderHandle) {
        if self.nodes.remove(&handle).is_some() {
            self.destroyed += 1;
        }
    }

    fn set_overlays(&mut self, overlays: HelperOverlays) {
        self.overlays = Some(overlays);
        if self.overlay_history.len() == OVERLAY_HISTORY_LEN {
            self.overlay_history.remove(0);
        }
        self.overlay_history.push(overlays);
    }
}
