//! Core rendering functionality
//!
//! Handles render pipelines, GPU node storage, helper overlays and frame rendering.

pub mod gpu_backend;
pub mod overlay;
pub mod pipeline_manager;
pub mod render_engine;
pub mod vertex;

pub use gpu_backend::GpuBackend;
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{FrameError, OverlayStyle, RenderEngine};
pub use vertex::{LineVertex, MeshVertex};
