//! # Procedural Geometry
//!
//! Maps a [`ShapeDescriptor`] to concrete triangle data. [`build`] is the single entry
//! point: it validates the descriptor (clamping angular ranges), then dispatches to the
//! generator for that kind.
//!
//! ## Supported Shapes
//!
//! - **Box**, **Plane**, **Circle**
//! - **Sphere**, **Capsule**, **Cylinder**, **Cone** (revolved profiles)
//! - **Torus**, **Torus knot**
//! - **Tetrahedron**, **Octahedron**, **Dodecahedron**, **Icosahedron** (with subdivision)
//!
//! ## Usage
//!
//! ```rust
//! use sceneforge::gfx::geometry::{build, BoxParams, ShapeDescriptor};
//!
//! let geometry = build(&ShapeDescriptor::Box(BoxParams::new(1.0, 2.0, 1.0))).unwrap();
//! assert_eq!(geometry.data.triangle_count(), 12);
//! ```

pub mod polyhedra;
pub mod primitives;
pub mod shape;

pub use polyhedra::*;
pub use primitives::*;
pub use shape::*;

use crate::gfx::picking::Aabb;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) {
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(uv);
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Two triangles `abd` and `bcd` covering the quad `abcd`.
    pub fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.push_triangle(a, b, d);
        self.push_triangle(b, c, d);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_vertices(&self.vertices)
    }
}

/// Built geometry together with the (clamped) descriptor it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Parameter echo of the input, with angular ranges clamped
    pub shape: ShapeDescriptor,
    pub data: GeometryData,
    /// Object-space bounds
    pub bounds: Aabb,
}

/// Validate `shape` and build its geometry.
///
/// # Errors
///
/// Returns [`ValidationError`] for non-positive or non-finite dimensions and for
/// segment counts under the kind's minimum.
pub fn build(shape: &ShapeDescriptor) -> Result<Geometry, ValidationError> {
    let shape = shape.validated()?;

    let data = match &shape {
        ShapeDescriptor::Box(p) => generate_box(p),
        ShapeDescriptor::Capsule(p) => generate_capsule(p),
        ShapeDescriptor::Cone(p) => generate_cone(p),
        ShapeDescriptor::Cylinder(p) => generate_cylinder(p),
        ShapeDescriptor::Tetrahedron(p) => generate_tetrahedron(p),
        ShapeDescriptor::Octahedron(p) => generate_octahedron(p),
        ShapeDescriptor::Dodecahedron(p) => generate_dodecahedron(p),
        ShapeDescriptor::Icosahedron(p) => generate_icosahedron(p),
        ShapeDescriptor::Sphere(p) => generate_sphere(p),
        ShapeDescriptor::Torus(p) => generate_torus(p),
        ShapeDescriptor::TorusKnot(p) => generate_torus_knot(p),
        ShapeDescriptor::Plane(p) => generate_plane(p),
        ShapeDescriptor::Circle(p) => generate_circle(p),
    };

    let bounds = data.bounds();
    Ok(Geometry {
        shape,
        data,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_build_echoes_parameters() {
        let shape = ShapeDescriptor::Sphere(SphereParams {
            radius: 2.0,
            width_segments: 12,
            height_segments: 6,
            ..SphereParams::default()
        });
        let geometry = build(&shape).unwrap();
        assert_eq!(geometry.shape, shape);
        assert!((geometry.bounds.size().y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_every_default_kind_builds() {
        for kind in ShapeKind::ALL {
            let geometry = build(&kind.default_descriptor()).unwrap();
            assert!(geometry.data.triangle_count() > 0, "{kind} produced no triangles");
            assert!(geometry.bounds.extent_axes(1e-6) >= 2);
        }
    }

    #[test]
    fn test_invalid_descriptor_is_rejected() {
        let shape = ShapeDescriptor::Torus(TorusParams {
            tube: -0.1,
            ..TorusParams::default()
        });
        assert!(matches!(
            build(&shape),
            Err(ValidationError::NonPositive { field: "tube", .. })
        ));
    }

    #[test]
    fn test_random_valid_boxes_echo_dimensions() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let params = BoxParams {
                width: rng.random_range(0.01..10.0),
                height: rng.random_range(0.01..10.0),
                depth: rng.random_range(0.01..10.0),
                width_segments: rng.random_range(1..5),
                height_segments: rng.random_range(1..5),
                depth_segments: rng.random_range(1..5),
            };
            let geometry = build(&ShapeDescriptor::Box(params)).unwrap();
            assert_eq!(geometry.shape, ShapeDescriptor::Box(params));
            let size = geometry.bounds.size();
            assert!((size.x - params.width).abs() < 1e-3);
            assert!((size.y - params.height).abs() < 1e-3);
            assert!((size.z - params.depth).abs() < 1e-3);
        }
    }
}
