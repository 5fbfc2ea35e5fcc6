//! GPU resources and material descriptors
//!
//! Materials are plain data; the remaining modules own wgpu objects.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUniform};
pub use material::{Color, MaterialDescriptor, MaterialKind};
pub use texture_resource::TextureResource;
