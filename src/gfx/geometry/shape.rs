//! Shape descriptors and their validation rules.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::fmt;
use thiserror::Error;

/// Raised when a descriptor breaks a dimension or segment-count rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{subject} {field} must be greater than 0 (got {value})")]
    NonPositive {
        subject: &'static str,
        field: &'static str,
        value: f32,
    },
    #[error("{subject} {field} must be a finite number")]
    NotFinite {
        subject: &'static str,
        field: &'static str,
    },
    #[error("{subject} {field} must be at least {min} (got {value})")]
    TooFewSegments {
        subject: &'static str,
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("{subject} {field} must be at most {max} (got {value})")]
    TooManySegments {
        subject: &'static str,
        field: &'static str,
        max: u32,
        value: u32,
    },
}

/// Upper bound for every segment count, and for torus knot windings.
pub const MAX_SEGMENTS: u32 = 128;

/// Upper bound for polyhedron subdivision; each level quadruples the face count.
pub const MAX_DETAIL: u32 = 5;

/// Fieldless mirror of [`ShapeDescriptor`] used for menus and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Box,
    Capsule,
    Cone,
    Cylinder,
    Tetrahedron,
    Octahedron,
    Dodecahedron,
    Icosahedron,
    Sphere,
    Torus,
    TorusKnot,
    Plane,
    Circle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 13] = [
        ShapeKind::Box,
        ShapeKind::Capsule,
        ShapeKind::Cone,
        ShapeKind::Cylinder,
        ShapeKind::Tetrahedron,
        ShapeKind::Octahedron,
        ShapeKind::Dodecahedron,
        ShapeKind::Icosahedron,
        ShapeKind::Sphere,
        ShapeKind::Torus,
        ShapeKind::TorusKnot,
        ShapeKind::Plane,
        ShapeKind::Circle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Capsule => "capsule",
            ShapeKind::Cone => "cone",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Tetrahedron => "tetrahedron",
            ShapeKind::Octahedron => "octahedron",
            ShapeKind::Dodecahedron => "dodecahedron",
            ShapeKind::Icosahedron => "icosahedron",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Torus => "torus",
            ShapeKind::TorusKnot => "torus-knot",
            ShapeKind::Plane => "plane",
            ShapeKind::Circle => "circle",
        }
    }

    /// Descriptor with the kind's default parameters.
    pub fn default_descriptor(self) -> ShapeDescriptor {
        match self {
            ShapeKind::Box => ShapeDescriptor::Box(BoxParams::default()),
            ShapeKind::Capsule => ShapeDescriptor::Capsule(CapsuleParams::default()),
            ShapeKind::Cone => ShapeDescriptor::Cone(ConeParams::default()),
            ShapeKind::Cylinder => ShapeDescriptor::Cylinder(CylinderParams::default()),
            ShapeKind::Tetrahedron => ShapeDescriptor::Tetrahedron(PolyhedronParams::default()),
            ShapeKind::Octahedron => ShapeDescriptor::Octahedron(PolyhedronParams::default()),
            ShapeKind::Dodecahedron => ShapeDescriptor::Dodecahedron(PolyhedronParams::default()),
            ShapeKind::Icosahedron => ShapeDescriptor::Icosahedron(PolyhedronParams::default()),
            ShapeKind::Sphere => ShapeDescriptor::Sphere(SphereParams::default()),
            ShapeKind::Torus => ShapeDescriptor::Torus(TorusParams::default()),
            ShapeKind::TorusKnot => ShapeDescriptor::TorusKnot(TorusKnotParams::default()),
            ShapeKind::Plane => ShapeDescriptor::Plane(PlaneParams::default()),
            ShapeKind::Circle => ShapeDescriptor::Circle(CircleParams::default()),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxParams {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub depth_segments: u32,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        }
    }
}

impl BoxParams {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleParams {
    pub radius: f32,
    /// Length of the straight middle section
    pub length: f32,
    pub cap_segments: u32,
    pub radial_segments: u32,
}

impl Default for CapsuleParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            length: 1.0,
            cap_segments: 4,
            radial_segments: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConeParams {
    pub radius: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for ConeParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 1.0,
            radial_segments: 32,
            height_segments: 1,
            open_ended: false,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CylinderParams {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 1.0,
            radial_segments: 32,
            height_segments: 1,
            open_ended: false,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

/// Shared by the four platonic solids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolyhedronParams {
    pub radius: f32,
    /// Subdivision level; 0 keeps the base solid
    pub detail: u32,
}

impl Default for PolyhedronParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            detail: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereParams {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub phi_start: f32,
    pub phi_length: f32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
            phi_start: 0.0,
            phi_length: TAU,
            theta_start: 0.0,
            theta_length: PI,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorusParams {
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
    pub arc: f32,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            tube: 0.4,
            radial_segments: 12,
            tubular_segments: 48,
            arc: TAU,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorusKnotParams {
    pub radius: f32,
    pub tube: f32,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    /// Windings around the axis of rotational symmetry
    pub p: u32,
    /// Windings around the interior circle of the torus
    pub q: u32,
}

impl Default for TorusKnotParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            tube: 0.4,
            tubular_segments: 64,
            radial_segments: 8,
            p: 2,
            q: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneParams {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for PlaneParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            width_segments: 1,
            height_segments: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleParams {
    pub radius: f32,
    pub segments: u32,
    pub theta_start: f32,
    pub theta_length: f32,
}

impl Default for CircleParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            segments: 32,
            theta_start: 0.0,
            theta_length: TAU,
        }
    }
}

/// Declarative description of a parametric shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ShapeDescriptor {
    Box(BoxParams),
    Capsule(CapsuleParams),
    Cone(ConeParams),
    Cylinder(CylinderParams),
    Tetrahedron(PolyhedronParams),
    Octahedron(PolyhedronParams),
    Dodecahedron(PolyhedronParams),
    Icosahedron(PolyhedronParams),
    Sphere(SphereParams),
    Torus(TorusParams),
    TorusKnot(TorusKnotParams),
    Plane(PlaneParams),
    Circle(CircleParams),
}

impl Default for ShapeDescriptor {
    fn default() -> Self {
        ShapeDescriptor::Box(BoxParams::default())
    }
}

impl ShapeDescriptor {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeDescriptor::Box(_) => ShapeKind::Box,
            ShapeDescriptor::Capsule(_) => ShapeKind::Capsule,
            ShapeDescriptor::Cone(_) => ShapeKind::Cone,
            ShapeDescriptor::Cylinder(_) => ShapeKind::Cylinder,
            ShapeDescriptor::Tetrahedron(_) => ShapeKind::Tetrahedron,
            ShapeDescriptor::Octahedron(_) => ShapeKind::Octahedron,
            ShapeDescriptor::Dodecahedron(_) => ShapeKind::Dodecahedron,
            ShapeDescriptor::Icosahedron(_) => ShapeKind::Icosahedron,
            ShapeDescriptor::Sphere(_) => ShapeKind::Sphere,
            ShapeDescriptor::Torus(_) => ShapeKind::Torus,
            ShapeDescriptor::TorusKnot(_) => ShapeKind::TorusKnot,
            ShapeDescriptor::Plane(_) => ShapeKind::Plane,
            ShapeDescriptor::Circle(_) => ShapeKind::Circle,
        }
    }

    /// Check every rule and return a copy with angular parameters clamped to `[0, 2π]`.
    ///
    /// Dimensions and segment counts are never adjusted; a violation is an error.
    pub fn validated(&self) -> Result<ShapeDescriptor, ValidationError> {
        let rules = Rules::new(self.kind().label());
        let mut shape = *self;

        match &mut shape {
            ShapeDescriptor::Box(p) => {
                rules.positive("width", p.width)?;
                rules.positive("height", p.height)?;
                rules.positive("depth", p.depth)?;
                rules.segments("width segments", p.width_segments, 1)?;
                rules.segments("height segments", p.height_segments, 1)?;
                rules.segments("depth segments", p.depth_segments, 1)?;
            }
            ShapeDescriptor::Capsule(p) => {
                rules.positive("radius", p.radius)?;
                rules.positive("length", p.length)?;
                rules.segments("cap segments", p.cap_segments, 1)?;
                rules.segments("radial segments", p.radial_segments, 3)?;
            }
            ShapeDescriptor::Cone(p) => {
                rules.positive("radius", p.radius)?;
                rules.positive("height", p.height)?;
                rules.segments("radial segments", p.radial_segments, 3)?;
                rules.segments("height segments", p.height_segments, 1)?;
                p.theta_start = rules.angle("theta start", p.theta_start)?;
                p.theta_length = rules.angle("theta length", p.theta_length)?;
            }
            ShapeDescriptor::Cylinder(p) => {
                rules.non_negative("radius top", p.radius_top)?;
                rules.positive("radius bottom", p.radius_bottom)?;
                rules.positive("height", p.height)?;
                rules.segments("radial segments", p.radial_segments, 3)?;
                rules.segments("height segments", p.height_segments, 1)?;
                p.theta_start = rules.angle("theta start", p.theta_start)?;
                p.theta_length = rules.angle("theta length", p.theta_length)?;
            }
            ShapeDescriptor::Tetrahedron(p)
            | ShapeDescriptor::Octahedron(p)
            | ShapeDescriptor::Dodecahedron(p)
            | ShapeDescriptor::Icosahedron(p) => {
                rules.positive("radius", p.radius)?;
                rules.at_most("detail", p.detail, MAX_DETAIL)?;
            }
            ShapeDescriptor::Sphere(p) => {
                rules.positive("radius", p.radius)?;
                rules.segments("width segments", p.width_segments, 3)?;
                rules.segments("height segments", p.height_segments, 2)?;
                p.phi_start = rules.angle("phi start", p.phi_start)?;
                p.phi_length = rules.angle("phi length", p.phi_length)?;
                p.theta_start = rules.angle("theta start", p.theta_start)?;
                p.theta_length = rules.angle("theta length", p.theta_length)?;
            }
            ShapeDescriptor::Torus(p) => {
                rules.positive("radius", p.radius)?;
                rules.positive("tube", p.tube)?;
                rules.segments("radial segments", p.radial_segments, 3)?;
                rules.segments("tubular segments", p.tubular_segments, 3)?;
                p.arc = rules.angle("arc", p.arc)?;
            }
            ShapeDescriptor::TorusKnot(p) => {
                rules.positive("radius", p.radius)?;
                rules.positive("tube", p.tube)?;
                rules.segments("tubular segments", p.tubular_segments, 3)?;
                rules.segments("radial segments", p.radial_segments, 3)?;
                rules.segments("p", p.p, 1)?;
                rules.segments("q", p.q, 1)?;
            }
            ShapeDescriptor::Plane(p) => {
                rules.positive("width", p.width)?;
                rules.positive("height", p.height)?;
                rules.segments("width segments", p.width_segments, 1)?;
                rules.segments("height segments", p.height_segments, 1)?;
            }
            ShapeDescriptor::Circle(p) => {
                rules.positive("radius", p.radius)?;
                rules.segments("segments", p.segments, 3)?;
                p.theta_start = rules.angle("theta start", p.theta_start)?;
                p.theta_length = rules.angle("theta length", p.theta_length)?;
            }
        }

        Ok(shape)
    }
}

struct Rules {
    subject: &'static str,
}

impl Rules {
    fn new(subject: &'static str) -> Self {
        Self { subject }
    }

    fn finite(&self, field: &'static str, value: f32) -> Result<f32, ValidationError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValidationError::NotFinite {
                subject: self.subject,
                field,
            })
        }
    }

    fn positive(&self, field: &'static str, value: f32) -> Result<(), ValidationError> {
        if self.finite(field, value)? > 0.0 {
            Ok(())
        } else {
            Err(ValidationError::NonPositive {
                subject: self.subject,
                field,
                value,
            })
        }
    }

    fn non_negative(&self, field: &'static str, value: f32) -> Result<(), ValidationError> {
        if self.finite(field, value)? >= 0.0 {
            Ok(())
        } else {
            Err(ValidationError::NonPositive {
                subject: self.subject,
                field,
                value,
            })
        }
    }

    fn segments(&self, field: &'static str, value: u32, min: u32) -> Result<(), ValidationError> {
        if value < min {
            return Err(ValidationError::TooFewSegments {
                subject: self.subject,
                field,
                min,
                value,
            });
        }
        self.at_most(field, value, MAX_SEGMENTS)
    }

    fn at_most(&self, field: &'static str, value: u32, max: u32) -> Result<(), ValidationError> {
        if value <= max {
            Ok(())
        } else {
            Err(ValidationError::TooManySegments {
                subject: self.subject,
                field,
                max,
                value,
            })
        }
    }

    fn angle(&self, field: &'static str, value: f32) -> Result<f32, ValidationError> {
        Ok(self.finite(field, value)?.clamp(0.0, TAU))
    }
}
