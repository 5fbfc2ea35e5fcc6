//! # Graphics Module
//!
//! Camera, geometry, picking, gizmo and rendering building blocks for the editor.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Orbit camera with mouse controls and auto-rotate
//! - **Geometry** ([`geometry`]) - Procedural shape generation from descriptors
//! - **Picking** ([`picking`]) - Pointer rays and ray/AABB hit tests
//! - **Gizmos** ([`gizmos`]) - Transform handles and drag math
//! - **Rendering Pipeline** ([`rendering`]) - wgpu renderer and the GPU scene backend
//! - **Resources** ([`resources`]) - Materials and GPU uniform resources
//!
//! Everything except [`rendering`] and the GPU half of [`resources`] runs without a device,
//! which keeps the editor core testable headless.

pub mod camera;
pub mod geometry;
pub mod gizmos;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod transform;

pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
