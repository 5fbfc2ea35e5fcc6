//! # Transform Gizmo
//!
//! A translate / rotate / scale handle set attached to at most one object.
//!
//! ## States
//!
//! - **Idle**: nothing attached. [`TransformGizmo::set_mode`] does nothing here.
//! - **Attached(mode)**: one object attached; the mode picks which handles are live.
//!
//! The gizmo only holds the object's id. Drags produce [`TransformDelta`]s; the caller
//! applies each one to the object right away through the registry.
//!
//! ## Drag math
//!
//! - **Translate**: closest point between the pointer ray and the axis line; the delta is
//!   the change in the axis parameter.
//! - **Rotate**: the pointer ray is intersected with the plane perpendicular to the axis;
//!   the delta is the signed angle between successive hit vectors, applied about the world
//!   axis of the grabbed ring.
//! - **Scale**: like translate, but the parameter change is divided by the handle length.

use crate::editor::registry::ObjectId;
use crate::gfx::picking::{Aabb, Ray};
use crate::gfx::transform::Transform;
use cgmath::{InnerSpace, Quaternion, Rad, Rotation3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub fn label(self) -> &'static str {
        match self {
            GizmoMode::Translate => "translate",
            GizmoMode::Rotate => "rotate",
            GizmoMode::Scale => "scale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    pub fn unit(self) -> Vector3<f32> {
        match self {
            GizmoAxis::X => Vector3::unit_x(),
            GizmoAxis::Y => Vector3::unit_y(),
            GizmoAxis::Z => Vector3::unit_z(),
        }
    }
}

/// Externally visible state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoState {
    Idle,
    Attached { id: ObjectId, mode: GizmoMode },
}

/// Incremental change produced by one drag step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformDelta {
    Translate(Vector3<f32>),
    /// Turn about a world axis, in radians
    Rotate { axis: Vector3<f32>, angle: f32 },
    Scale(Vector3<f32>),
}

impl TransformDelta {
    pub fn apply(&self, transform: &Transform) -> Transform {
        let mut next = *transform;
        match self {
            TransformDelta::Translate(d) => next.position += *d,
            TransformDelta::Rotate { axis, angle } => {
                let turn = Quaternion::from_axis_angle(*axis, Rad(*angle));
                next.set_quaternion(turn * transform.quaternion());
            }
            TransformDelta::Scale(d) => {
                next.scale += *d;
                next.scale.x = next.scale.x.max(0.0);
                next.scale.y = next.scale.y.max(0.0);
                next.scale.z = next.scale.z.max(0.0);
            }
        }
        next
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    axis: GizmoAxis,
    origin: Vector3<f32>,
    last_param: f32,
    last_vector: Vector3<f32>,
}

#[derive(Debug, Clone)]
pub struct TransformGizmo {
    mode: GizmoMode,
    attached: Option<ObjectId>,
    drag: Option<DragState>,
    /// World-space length of the axis handles (and radius of the rotate rings)
    pub handle_length: f32,
}

impl TransformGizmo {
    pub fn new(handle_length: f32) -> Self {
        Self {
            mode: GizmoMode::Translate,
            attached: None,
            drag: None,
            handle_length,
        }
    }

    pub fn state(&self) -> GizmoState {
        match self.attached {
            Some(id) => GizmoState::Attached {
                id,
                mode: self.mode,
            },
            None => GizmoState::Idle,
        }
    }

    pub fn attached(&self) -> Option<ObjectId> {
        self.attached
    }

    pub fn mode(&self) -> GizmoMode {
        self.mode
    }

    /// Attach to `id`, keeping the last used mode.
    pub fn attach(&mut self, id: ObjectId) {
        if self.attached != Some(id) {
            self.drag = None;
        }
        self.attached = Some(id);
    }

    pub fn detach(&mut self) {
        self.attached = None;
        self.drag = None;
    }

    /// Change mode while attached. Returns false (and changes nothing) when idle.
    pub fn set_mode(&mut self, mode: GizmoMode) -> bool {
        if self.attached.is_none() {
            return false;
        }
        if self.mode != mode {
            self.drag = None;
        }
        self.mode = mode;
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Which handle (if any) the ray hits for a gizmo centered at `origin`.
    pub fn hit_handle(&self, ray: &Ray, origin: Vector3<f32>) -> Option<GizmoAxis> {
        self.attached?;
        let length = self.handle_length;

        let mut best: Option<(GizmoAxis, f32)> = None;
        for axis in GizmoAxis::ALL {
            let hit = match self.mode {
                GizmoMode::Translate | GizmoMode::Scale => {
                    handle_bounds(axis, origin, length).intersect_ray(ray)
                }
                GizmoMode::Rotate => ring_hit(ray, axis, origin, length),
            };
            if let Some(t) = hit {
                if best.map_or(true, |(_, best_t)| t < best_t) {
                    best = Some((axis, t));
                }
            }
        }

        best.map(|(axis, _)| axis)
    }

    /// Start dragging `axis` from the pointer ray. Returns false if idle or the ray
    /// gives no usable reference point (parallel to the axis or its plane).
    pub fn begin_drag(&mut self, axis: GizmoAxis, ray: &Ray, transform: &Transform) -> bool {
        if self.attached.is_none() {
            return false;
        }

        let origin = transform.position;
        let mut drag = DragState {
            axis,
            origin,
            last_param: 0.0,
            last_vector: Vector3::new(0.0, 0.0, 0.0),
        };

        match self.mode {
            GizmoMode::Translate | GizmoMode::Scale => {
                let Some(param) = axis_parameter(ray, origin, axis.unit()) else {
                    return false;
                };
                drag.last_param = param;
            }
            GizmoMode::Rotate => {
                let Some(vector) = plane_vector(ray, origin, axis.unit()) else {
                    return false;
                };
                drag.last_vector = vector;
            }
        }

        self.drag = Some(drag);
        true
    }

    /// Advance the drag to a new pointer ray and return the incremental change.
    pub fn drag(&mut self, ray: &Ray) -> Option<TransformDelta> {
        let mode = self.mode;
        let handle_length = self.handle_length;
        let drag = self.drag.as_mut()?;
        let axis = drag.axis.unit();

        match mode {
            GizmoMode::Translate => {
                let param = axis_parameter(ray, drag.origin, axis)?;
                let delta = param - drag.last_param;
                // Follow the object so the grab offset along the axis stays constant
                drag.origin += axis * delta;
                Some(TransformDelta::Translate(axis * delta))
            }
            GizmoMode::Scale => {
                let param = axis_parameter(ray, drag.origin, axis)?;
                let delta = (param - drag.last_param) / handle_length.max(f32::EPSILON);
                drag.last_param = param;
                Some(TransformDelta::Scale(axis * delta))
            }
            GizmoMode::Rotate => {
                let vector = plane_vector(ray, drag.origin, axis)?;
                let previous = drag.last_vector;
                drag.last_vector = vector;
                let angle = previous.cross(vector).dot(axis).atan2(previous.dot(vector));
                Some(TransformDelta::Rotate { axis, angle })
            }
        }
    }

    /// Finish the current drag. Returns whether one was active.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Axis of the active drag, for highlighting.
    pub fn active_axis(&self) -> Option<GizmoAxis> {
        self.drag.map(|drag| drag.axis)
    }
}

impl Default for TransformGizmo {
    fn default() -> Self {
        Self::new(1.5)
    }
}

/// Thin box around an axis handle.
fn handle_bounds(axis: GizmoAxis, origin: Vector3<f32>, length: f32) -> Aabb {
    let thickness = length * 0.08;
    let tip = origin + axis.unit() * length;
    let pad = Vector3::new(thickness, thickness, thickness);
    let min = Vector3::new(origin.x.min(tip.x), origin.y.min(tip.y), origin.z.min(tip.z)) - pad;
    let max = Vector3::new(origin.x.max(tip.x), origin.y.max(tip.y), origin.z.max(tip.z)) + pad;
    Aabb::new(min, max)
}

fn ring_hit(ray: &Ray, axis: GizmoAxis, origin: Vector3<f32>, radius: f32) -> Option<f32> {
    let t = ray.intersect_plane(origin, axis.unit())?;
    if t < 0.0 {
        return None;
    }
    let distance = (ray.point_at(t) - origin).magnitude();
    ((distance - radius).abs() <= radius * 0.12).then_some(t)
}

/// Parameter `s` of the point on the line `origin + s * axis` closest to the ray.
fn axis_parameter(ray: &Ray, origin: Vector3<f32>, axis: Vector3<f32>) -> Option<f32> {
    let w0 = origin - ray.origin;
    let a = axis.dot(axis);
    let b = axis.dot(ray.direction);
    let c = ray.direction.dot(ray.direction);
    let d = axis.dot(w0);
    let e = ray.direction.dot(w0);

    let denom = a * c - b * b;
    if denom.abs() < 1e-6 {
        return None;
    }
    Some((b * e - c * d) / denom)
}

/// Vector from `origin` to where the ray meets the plane through `origin` normal to `axis`.
fn plane_vector(ray: &Ray, origin: Vector3<f32>, axis: Vector3<f32>) -> Option<Vector3<f32>> {
    let t = ray.intersect_plane(origin, axis)?;
    let v = ray.point_at(t) - origin;
    (v.magnitude2() > 1e-10).then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn id(n: u64) -> ObjectId {
        ObjectId::from_raw(n)
    }

    fn down_ray_at(x: f32, z: f32) -> Ray {
        Ray::new(Vector3::new(x, 5.0, z), Vector3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_state_transitions() {
        let mut gizmo = TransformGizmo::default();
        assert_eq!(gizmo.state(), GizmoState::Idle);

        assert!(!gizmo.set_mode(GizmoMode::Scale));
        assert_eq!(gizmo.mode(), GizmoMode::Translate);

        gizmo.attach(id(1));
        assert_eq!(
            gizmo.state(),
            GizmoState::Attached {
                id: id(1),
                mode: GizmoMode::Translate
            }
        );

        assert!(gizmo.set_mode(GizmoMode::Rotate));
        gizmo.detach();
        assert_eq!(gizmo.state(), GizmoState::Idle);

        // Re-attaching keeps the last mode
        gizmo.attach(id(2));
        assert_eq!(
            gizmo.state(),
            GizmoState::Attached {
                id: id(2),
                mode: GizmoMode::Rotate
            }
        );
    }

    #[test]
    fn test_translate_drag_follows_axis() {
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(id(1));
        let transform = Transform::default();

        // Ray looking down -Z crossing the X axis at x = 0.5
        let start = Ray::new(Vector3::new(0.5, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(gizmo.begin_drag(GizmoAxis::X, &start, &transform));

        let moved = Ray::new(Vector3::new(2.0, 0.3, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let delta = gizmo.drag(&moved).unwrap();
        let TransformDelta::Translate(d) = delta else {
            panic!("expected a translation");
        };
        assert!((d.x - 1.5).abs() < 1e-5);
        assert_eq!(d.y, 0.0);
        assert_eq!(d.z, 0.0);

        // Same pointer again yields no further motion
        let TransformDelta::Translate(again) = gizmo.drag(&moved).unwrap() else {
            panic!("expected a translation");
        };
        assert!(again.magnitude() < 1e-5);
    }

    #[test]
    fn test_rotate_drag_quarter_turn_about_y() {
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(id(1));
        assert!(gizmo.set_mode(GizmoMode::Rotate));
        let transform = Transform::default();

        assert!(gizmo.begin_drag(GizmoAxis::Y, &down_ray_at(1.0, 0.0), &transform));
        let delta = gizmo.drag(&down_ray_at(0.0, -1.0)).unwrap();
        let rotated = delta.apply(&transform);

        assert!((rotated.rotation.y - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(rotated.position, transform.position);
        assert_eq!(rotated.scale, transform.scale);
    }

    #[test]
    fn test_rotate_drag_turns_about_world_axis() {
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(id(1));
        gizmo.set_mode(GizmoMode::Rotate);
        let transform = Transform {
            rotation: Vector3::new(FRAC_PI_2, 0.0, 0.0),
            ..Transform::default()
        };

        assert!(gizmo.begin_drag(GizmoAxis::Y, &down_ray_at(1.0, 0.0), &transform));
        let rotated = gizmo
            .drag(&down_ray_at(0.0, -1.0))
            .unwrap()
            .apply(&transform);

        let expected = Quaternion::from_angle_y(Rad(FRAC_PI_2)) * transform.quaternion();
        let expected = Transform {
            rotation: crate::gfx::transform::euler_xyz(expected),
            ..transform
        };
        assert!(crate::gfx::transform::matrices_close(
            &rotated.matrix(),
            &expected.matrix(),
            1e-5
        ));
        // A local-Y increment would have left X untouched at 90 degrees
        assert!((rotated.rotation - Vector3::new(FRAC_PI_2, FRAC_PI_2, 0.0)).magnitude() > 1e-3);
    }

    #[test]
    fn test_scale_drag_never_goes_negative() {
        let mut gizmo = TransformGizmo::new(1.0);
        gizmo.attach(id(1));
        gizmo.set_mode(GizmoMode::Scale);
        let transform = Transform::default();

        let start = Ray::new(Vector3::new(1.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(gizmo.begin_drag(GizmoAxis::X, &start, &transform));
        let far_left = Ray::new(Vector3::new(-4.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let scaled = gizmo.drag(&far_left).unwrap().apply(&transform);
        assert_eq!(scaled.scale.x, 0.0);
        assert_eq!(scaled.scale.y, 1.0);
    }

    #[test]
    fn test_hit_handle_per_mode() {
        let mut gizmo = TransformGizmo::new(1.0);
        let origin = Vector3::new(0.0, 0.0, 0.0);
        let ray = down_ray_at(0.7, 0.0);
        assert_eq!(gizmo.hit_handle(&ray, origin), None);

        gizmo.attach(id(1));
        assert_eq!(gizmo.hit_handle(&ray, origin), Some(GizmoAxis::X));

        gizmo.set_mode(GizmoMode::Rotate);
        assert_eq!(gizmo.hit_handle(&down_ray_at(1.0, 0.0), origin), Some(GizmoAxis::Y));
        assert_eq!(gizmo.hit_handle(&down_ray_at(0.3, 0.0), origin), None);
    }

    #[test]
    fn test_detach_cancels_drag() {
        let mut gizmo = TransformGizmo::default();
        gizmo.attach(id(1));
        let start = Ray::new(Vector3::new(0.5, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(gizmo.begin_drag(GizmoAxis::X, &start, &Transform::default()));
        gizmo.detach();
        assert!(!gizmo.is_dragging());
        assert!(gizmo.drag(&start).is_none());
        assert!(!gizmo.end_drag());
    }
}
