//! # Object Transforms
//!
//! Two representations live here:
//!
//! - [`Transform`]: the editable position / Euler rotation / scale triple carried by every
//!   scene object. Rotation is stored as XYZ Euler angles in radians, the order a gizmo
//!   manipulates them in.
//! - [`WorldPose`]: translation / quaternion / scale, the form imported glTF nodes arrive in
//!   and the form written out on export.

use cgmath::{Matrix3, Matrix4, One, Quaternion, Rad, Rotation3, Vector3};

/// Position, XYZ Euler rotation (radians) and scale of a scene object in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotation as a quaternion, composed X then Y then Z (intrinsic XYZ order).
    pub fn quaternion(&self) -> Quaternion<f32> {
        let qx = Quaternion::from_angle_x(Rad(self.rotation.x));
        let qy = Quaternion::from_angle_y(Rad(self.rotation.y));
        let qz = Quaternion::from_angle_z(Rad(self.rotation.z));
        qx * qy * qz
    }

    /// Model matrix `T * R * S`.
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.quaternion())
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Replace the rotation with `rotation`, stored back as XYZ Euler angles.
    pub fn set_quaternion(&mut self, rotation: Quaternion<f32>) {
        self.rotation = euler_xyz(rotation);
    }

    pub fn to_pose(&self) -> WorldPose {
        WorldPose {
            translation: self.position,
            rotation: self.quaternion(),
            scale: self.scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Decomposed TRS transform with a quaternion rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPose {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl WorldPose {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Compose a child's local pose under this (parent) pose.
    ///
    /// Exact for uniform parent scale; shear from non-uniform parent scale is dropped,
    /// matching how a TRS node hierarchy is usually flattened.
    pub fn then(&self, local: &WorldPose) -> WorldPose {
        let scaled = Vector3::new(
            local.translation.x * self.scale.x,
            local.translation.y * self.scale.y,
            local.translation.z * self.scale.z,
        );
        WorldPose {
            translation: self.translation + self.rotation * scaled,
            rotation: self.rotation * local.rotation,
            scale: Vector3::new(
                self.scale.x * local.scale.x,
                self.scale.y * local.scale.y,
                self.scale.z * local.scale.z,
            ),
        }
    }
}

impl Default for WorldPose {
    fn default() -> Self {
        Self::identity()
    }
}

/// XYZ Euler angles (radians) of a rotation, inverse of [`Transform::quaternion`].
///
/// Near gimbal lock (`|y| = π/2`) the Z angle is folded into X.
pub fn euler_xyz(rotation: Quaternion<f32>) -> Vector3<f32> {
    // Column-major: m.c.r is row r of column c
    let m = Matrix3::from(rotation);
    let m13 = m.z.x.clamp(-1.0, 1.0);
    let y = m13.asin();
    if m13.abs() < 0.999_999 {
        Vector3::new((-m.z.y).atan2(m.z.z), y, (-m.y.x).atan2(m.x.x))
    } else {
        Vector3::new(m.y.z.atan2(m.y.y), y, 0.0)
    }
}

/// Element-wise absolute comparison of two matrices.
pub fn matrices_close(a: &Matrix4<f32>, b: &Matrix4<f32>, epsilon: f32) -> bool {
    let a: &[[f32; 4]; 4] = a.as_ref();
    let b: &[[f32; 4]; 4] = b.as_ref();
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .all(|(x, y)| (x - y).abs() <= epsilon)
}
