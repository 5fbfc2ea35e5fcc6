//! # Object Picking System
//!
//! This module turns a pointer position into a world-space ray and finds the nearest
//! object whose bounding box the ray passes through.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: Convert screen coordinates to NDC, unproject the near and far
//!    planes through the inverse view-projection matrix
//! 2. **Ray-Box Intersection**: Slab test against each candidate's world-space AABB
//! 3. **Selection**: Keep the smallest ray parameter; on equal distance the earlier
//!    candidate (registry insertion order) wins
//!
//! Picking is read-only. Turning a hit into a selection is the caller's job.
//!
//! ## Usage
//!
//! ```no_run
//! use sceneforge::gfx::camera::orbit_camera::OrbitCamera;
//! use sceneforge::gfx::picking::{Aabb, ObjectPicker};
//! use cgmath::Vector3;
//!
//! let camera = OrbitCamera::default();
//! let unit = Aabb::new(Vector3::new(-0.5, -0.5, -0.5), Vector3::new(0.5, 0.5, 0.5));
//! let hit = ObjectPicker::new().pick((400.0, 300.0), (800.0, 600.0), &camera, [(7u64, unit)]);
//! ```

use crate::gfx::camera::orbit_camera::OrbitCamera;
use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Parameter at which the ray crosses the plane through `point` with `normal`.
    /// `None` when the ray runs parallel to the plane.
    pub fn intersect_plane(&self, point: Vector3<f32>, normal: Vector3<f32>) -> Option<f32> {
        let denom = self.direction.dot(normal);
        if denom.abs() < 1e-6 {
            return None;
        }
        Some((point - self.origin).dot(normal) / denom)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices. An empty slice yields a zero-size box at the origin.
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            let zero = Vector3::new(0.0, 0.0, 0.0);
            return Self::new(zero, zero);
        };

        let mut min = Vector3::from(*first);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            min.x = min.x.min(vertex[0]);
            min.y = min.y.min(vertex[1]);
            min.z = min.z.min(vertex[2]);
            max.x = max.x.max(vertex[0]);
            max.y = max.y.max(vertex[1]);
            max.z = max.z.max(vertex[2]);
        }

        Self::new(min, max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    /// Number of axes along which the box has a non-negligible extent.
    pub fn extent_axes(&self, epsilon: f32) -> usize {
        let size = self.size();
        [size.x, size.y, size.z]
            .iter()
            .filter(|extent| extent.is_finite() && **extent > epsilon)
            .count()
    }

    /// Test ray-AABB intersection
    /// Returns the distance to the entry point (or exit point when the origin is inside)
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Bounds of this box after applying `matrix`, computed from its 8 transformed corners
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed: Vec<[f32; 3]> = corners
            .iter()
            .map(|corner| {
                let p = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
                [p.x / p.w, p.y / p.w, p.z / p.w]
            })
            .collect();

        Self::from_vertices(&transformed)
    }
}

/// Result of a picking query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult<K> {
    /// Key of the picked candidate
    pub key: K,
    /// Ray parameter of the hit
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Ray-casting picker. Stateless; candidates are supplied per query.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectPicker;

impl ObjectPicker {
    pub fn new() -> Self {
        Self
    }

    /// Convert screen coordinates (pixels, origin top-left) to a world-space ray
    pub fn screen_to_ray(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) -> Ray {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = screen_size;

        let ndc_x = (2.0 * mouse_x) / screen_width.max(1.0) - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height.max(1.0);

        let view_proj = camera.projection_matrix() * camera.view_matrix();
        let Some(inv_view_proj) = view_proj.invert() else {
            log::warn!("Camera view-projection is singular; using camera forward ray");
            return Ray::new(camera.eye, camera.target - camera.eye);
        };

        // OpenGL-style projection: NDC depth runs -1 (near) to 1 (far)
        let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = world_near.truncate() / world_near.w;
        let far = world_far.truncate() / world_far.w;

        Ray::new(near, far - near)
    }

    /// Nearest candidate hit by `ray`, if any.
    pub fn pick_ray<K, I>(&self, ray: &Ray, candidates: I) -> Option<PickResult<K>>
    where
        K: Copy,
        I: IntoIterator<Item = (K, Aabb)>,
    {
        let mut closest: Option<PickResult<K>> = None;

        for (key, bounds) in candidates {
            let Some(distance) = bounds.intersect_ray(ray) else {
                continue;
            };

            // Strict comparison keeps the first candidate on ties
            if closest.map_or(true, |best| distance < best.distance) {
                closest = Some(PickResult {
                    key,
                    distance,
                    point: ray.point_at(distance),
                });
            }
        }

        closest
    }

    /// Pick the nearest candidate under a screen position
    pub fn pick<K, I>(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
        candidates: I,
    ) -> Option<K>
    where
        K: Copy,
        I: IntoIterator<Item = (K, Aabb)>,
    {
        let ray = self.screen_to_ray(screen_pos, screen_size, camera);
        self.pick_ray(&ray, candidates).map(|hit| hit.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vector3<f32>) -> Aabb {
        let half = Vector3::new(0.5, 0.5, 0.5);
        Aabb::new(center - half, center + half)
    }

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = Aabb::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(aabb.extent_axes(1e-6), 3);
    }

    #[test]
    fn test_aabb_union() {
        let left = unit_box_at(Vector3::new(-2.0, 0.0, 0.0));
        let merged = left.union(&unit_box_at(Vector3::new(2.0, 1.0, 0.0)));
        assert_eq!(merged.min, Vector3::new(-2.5, -0.5, -0.5));
        assert_eq!(merged.max, Vector3::new(2.5, 1.5, 0.5));
        assert_eq!(merged.center(), Vector3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let t = aabb.intersect_ray(&ray).expect("ray should hit");
        assert!((t - 4.0).abs() < 1e-5);

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());

        let behind = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&behind).is_none());
    }

    #[test]
    fn test_transform_translates_bounds() {
        let aabb = unit_box_at(Vector3::new(0.0, 0.0, 0.0));
        let moved = aabb.transform(&Matrix4::from_translation(Vector3::new(2.0, 0.0, 0.0)));
        assert!((moved.center().x - 2.0).abs() < 1e-6);
        assert!((moved.size().x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_pick_returns_nearer_of_overlapping_candidates() {
        let picker = ObjectPicker::new();
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let far = unit_box_at(Vector3::new(0.0, 0.0, -3.0));
        let near = unit_box_at(Vector3::new(0.0, 0.0, 2.0));

        for _ in 0..5 {
            let hit = picker.pick_ray(&ray, [(1u32, far), (2u32, near)]).unwrap();
            assert_eq!(hit.key, 2);
            assert!((hit.distance - 7.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_pick_ties_prefer_first_candidate() {
        let picker = ObjectPicker::new();
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let bounds = unit_box_at(Vector3::new(0.0, 0.0, 0.0));

        let hit = picker.pick_ray(&ray, [(5u32, bounds), (3u32, bounds)]).unwrap();
        assert_eq!(hit.key, 5);
    }

    #[test]
    fn test_pick_empty_space_returns_none() {
        let picker = ObjectPicker::new();
        let camera = OrbitCamera::default();
        let bounds = unit_box_at(Vector3::new(0.0, 0.0, 0.0));

        let hit = picker.pick((0.0, 0.0), (800.0, 600.0), &camera, [(1u32, bounds)]);
        assert!(hit.is_none());
    }

    #[test]
    fn test_screen_center_ray_points_at_target() {
        let picker = ObjectPicker::new();
        let camera = OrbitCamera::default();
        let ray = picker.screen_to_ray((400.0, 300.0), (800.0, 600.0), &camera);
        let to_target = (camera.target - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.9999);
    }
}
