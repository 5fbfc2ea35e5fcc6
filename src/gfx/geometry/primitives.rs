//! # Primitive Shape Generation
//!
//! One generator per parametric shape. Every generator expects parameters that already
//! passed [`ShapeDescriptor::validated`](super::ShapeDescriptor::validated) and produces
//! indexed triangles with counter-clockwise winding, unit normals and UVs.
//!
//! Shapes are centered on the origin with Y up. Flat shapes (plane, circle) face +Z.

use super::shape::{
    BoxParams, CapsuleParams, CircleParams, ConeParams, CylinderParams, PlaneParams,
    SphereParams, TorusKnotParams, TorusParams,
};
use super::GeometryData;
use cgmath::{InnerSpace, Vector3};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Normalize, falling back to `fallback` for zero-length input.
pub(crate) fn normalize_or(v: Vector3<f32>, fallback: Vector3<f32>) -> Vector3<f32> {
    let length = v.magnitude();
    if length > f32::EPSILON {
        v / length
    } else {
        fallback
    }
}

/// Axis-aligned box built from six subdivided faces.
pub fn generate_box(params: &BoxParams) -> GeometryData {
    let mut data = GeometryData::new();
    let (w, h, d) = (params.width, params.height, params.depth);
    let (ws, hs, ds) = (
        params.width_segments,
        params.height_segments,
        params.depth_segments,
    );

    // (u axis, v axis, w axis, u dir, v dir, face width, face height, face depth, grid)
    build_box_face(&mut data, [2, 1, 0], -1.0, -1.0, [d, h, w], [ds, hs]); // +x
    build_box_face(&mut data, [2, 1, 0], 1.0, -1.0, [d, h, -w], [ds, hs]); // -x
    build_box_face(&mut data, [0, 2, 1], 1.0, 1.0, [w, d, h], [ws, ds]); // +y
    build_box_face(&mut data, [0, 2, 1], 1.0, -1.0, [w, d, -h], [ws, ds]); // -y
    build_box_face(&mut data, [0, 1, 2], 1.0, -1.0, [w, h, d], [ws, hs]); // +z
    build_box_face(&mut data, [0, 1, 2], -1.0, -1.0, [w, h, -d], [ws, hs]); // -z

    data
}

fn build_box_face(
    data: &mut GeometryData,
    axes: [usize; 3],
    u_dir: f32,
    v_dir: f32,
    extent: [f32; 3],
    grid: [u32; 2],
) {
    let [u, v, w] = axes;
    let [width, height, depth] = extent;
    let [grid_x, grid_y] = grid;

    let segment_width = width / grid_x as f32;
    let segment_height = height / grid_y as f32;
    let (width_half, height_half, depth_half) = (width / 2.0, height / 2.0, depth / 2.0);
    let (grid_x1, grid_y1) = (grid_x + 1, grid_y + 1);
    let base = data.vertex_count() as u32;

    for iy in 0..grid_y1 {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..grid_x1 {
            let x = ix as f32 * segment_width - width_half;

            let mut position = [0.0; 3];
            position[u] = x * u_dir;
            position[v] = y * v_dir;
            position[w] = depth_half;

            let mut normal = [0.0; 3];
            normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };

            data.push_vertex(
                position,
                normal,
                [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
            );
        }
    }

    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = base + ix + grid_x1 * iy;
            let b = base + ix + grid_x1 * (iy + 1);
            let c = base + (ix + 1) + grid_x1 * (iy + 1);
            let d = base + (ix + 1) + grid_x1 * iy;
            data.push_quad(a, b, c, d);
        }
    }
}

/// UV sphere, optionally a partial one when the phi/theta ranges are narrowed.
pub fn generate_sphere(params: &SphereParams) -> GeometryData {
    let mut data = GeometryData::new();
    let (width_segments, height_segments) = (params.width_segments, params.height_segments);
    let theta_end = (params.theta_start + params.theta_length).min(PI);

    let mut grid = Vec::with_capacity(height_segments as usize + 1);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = params.theta_start + v * params.theta_length;
        let mut row = Vec::with_capacity(width_segments as usize + 1);

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = params.phi_start + u * params.phi_length;

            let position = Vector3::new(
                -params.radius * phi.cos() * theta.sin(),
                params.radius * theta.cos(),
                params.radius * phi.sin() * theta.sin(),
            );
            let normal = normalize_or(position, Vector3::unit_y());

            row.push(data.vertex_count() as u32);
            data.push_vertex(position.into(), normal.into(), [u, 1.0 - v]);
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];

            // Skip the zero-area triangles that would fan out of each pole
            if iy != 0 || params.theta_start > 0.0 {
                data.push_triangle(a, b, d);
            }
            if iy != height_segments as usize - 1 || theta_end < PI {
                data.push_triangle(b, c, d);
            }
        }
    }

    data
}

/// Truncated cone along Y; a zero `radius_top` makes a pointed cone.
pub fn generate_cylinder(params: &CylinderParams) -> GeometryData {
    let mut data = GeometryData::new();
    let half_height = params.height / 2.0;
    let radial = params.radial_segments;
    let slope = (params.radius_bottom - params.radius_top) / params.height;

    let mut rows = Vec::with_capacity(params.height_segments as usize + 1);
    for y in 0..=params.height_segments {
        let v = y as f32 / params.height_segments as f32;
        let radius = v * (params.radius_bottom - params.radius_top) + params.radius_top;
        let mut row = Vec::with_capacity(radial as usize + 1);

        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let theta = u * params.theta_length + params.theta_start;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let position = [
                radius * sin_theta,
                -v * params.height + half_height,
                radius * cos_theta,
            ];
            let normal = normalize_or(Vector3::new(sin_theta, slope, cos_theta), Vector3::unit_y());

            row.push(data.vertex_count() as u32);
            data.push_vertex(position, normal.into(), [u, 1.0 - v]);
        }
        rows.push(row);
    }

    for x in 0..radial as usize {
        for y in 0..params.height_segments as usize {
            let a = rows[y][x];
            let b = rows[y + 1][x];
            let c = rows[y + 1][x + 1];
            let d = rows[y][x + 1];
            data.push_quad(a, b, c, d);
        }
    }

    if !params.open_ended {
        if params.radius_top > 0.0 {
            build_cylinder_cap(&mut data, params, true);
        }
        if params.radius_bottom > 0.0 {
            build_cylinder_cap(&mut data, params, false);
        }
    }

    data
}

fn build_cylinder_cap(data: &mut GeometryData, params: &CylinderParams, top: bool) {
    let radius = if top {
        params.radius_top
    } else {
        params.radius_bottom
    };
    let sign = if top { 1.0 } else { -1.0 };
    let y = params.height / 2.0 * sign;
    let radial = params.radial_segments;

    // One center vertex per segment keeps the per-segment UVs independent
    let center_start = data.vertex_count() as u32;
    for _ in 0..radial {
        data.push_vertex([0.0, y, 0.0], [0.0, sign, 0.0], [0.5, 0.5]);
    }

    let rim_start = data.vertex_count() as u32;
    for x in 0..=radial {
        let u = x as f32 / radial as f32;
        let theta = u * params.theta_length + params.theta_start;
        let (sin_theta, cos_theta) = theta.sin_cos();
        data.push_vertex(
            [radius * sin_theta, y, radius * cos_theta],
            [0.0, sign, 0.0],
            [cos_theta * 0.5 + 0.5, sin_theta * 0.5 * sign + 0.5],
        );
    }

    for x in 0..radial {
        let center = center_start + x;
        let rim = rim_start + x;
        if top {
            data.push_triangle(rim, rim + 1, center);
        } else {
            data.push_triangle(rim + 1, rim, center);
        }
    }
}

/// Cone along Y with its apex at `+height / 2`.
pub fn generate_cone(params: &ConeParams) -> GeometryData {
    generate_cylinder(&CylinderParams {
        radius_top: 0.0,
        radius_bottom: params.radius,
        height: params.height,
        radial_segments: params.radial_segments,
        height_segments: params.height_segments,
        open_ended: params.open_ended,
        theta_start: params.theta_start,
        theta_length: params.theta_length,
    })
}

/// Capsule along Y: two hemispheres joined by a straight section of `length`.
pub fn generate_capsule(params: &CapsuleParams) -> GeometryData {
    let half_length = params.length / 2.0;
    let caps = params.cap_segments;

    // Profile rings from the top pole down to the bottom pole: (ring radius, y, normal r, normal y)
    let mut profile = Vec::with_capacity(2 * caps as usize + 2);
    for k in 0..=caps {
        let phi = k as f32 / caps as f32 * FRAC_PI_2;
        let (sin_phi, cos_phi) = phi.sin_cos();
        profile.push((
            params.radius * sin_phi,
            half_length + params.radius * cos_phi,
            sin_phi,
            cos_phi,
        ));
    }
    for k in 0..=caps {
        let phi = FRAC_PI_2 + k as f32 / caps as f32 * FRAC_PI_2;
        let (sin_phi, cos_phi) = phi.sin_cos();
        profile.push((
            params.radius * sin_phi,
            -half_length + params.radius * cos_phi,
            sin_phi,
            cos_phi,
        ));
    }

    lathe(&profile, params.radial_segments)
}

/// Revolve a profile (top to bottom) around the Y axis.
fn lathe(profile: &[(f32, f32, f32, f32)], radial: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let columns = radial + 1;
    let last = profile.len().saturating_sub(1).max(1) as f32;

    for (ring, &(radius, y, normal_r, normal_y)) in profile.iter().enumerate() {
        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let (sin_theta, cos_theta) = (u * TAU).sin_cos();
            data.push_vertex(
                [radius * sin_theta, y, radius * cos_theta],
                [normal_r * sin_theta, normal_y, normal_r * cos_theta],
                [u, 1.0 - ring as f32 / last],
            );
        }
    }

    for ring in 0..profile.len().saturating_sub(1) as u32 {
        for x in 0..radial {
            let a = ring * columns + x;
            let b = (ring + 1) * columns + x;
            let c = (ring + 1) * columns + x + 1;
            let d = ring * columns + x + 1;
            data.push_quad(a, b, c, d);
        }
    }

    data
}

/// Ring torus in the XY plane.
pub fn generate_torus(params: &TorusParams) -> GeometryData {
    let mut data = GeometryData::new();
    let (radial, tubular) = (params.radial_segments, params.tubular_segments);

    for j in 0..=radial {
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * params.arc;
            let v = j as f32 / radial as f32 * TAU;

            let center = Vector3::new(params.radius * u.cos(), params.radius * u.sin(), 0.0);
            let position = Vector3::new(
                (params.radius + params.tube * v.cos()) * u.cos(),
                (params.radius + params.tube * v.cos()) * u.sin(),
                params.tube * v.sin(),
            );
            let normal = normalize_or(position - center, Vector3::unit_z());

            data.push_vertex(
                position.into(),
                normal.into(),
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    let stride = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            data.push_quad(a, b, c, d);
        }
    }

    data
}

/// (p, q) torus knot swept with a circular tube.
pub fn generate_torus_knot(params: &TorusKnotParams) -> GeometryData {
    let mut data = GeometryData::new();
    let (tubular, radial) = (params.tubular_segments, params.radial_segments);
    let (p, q) = (params.p as f32, params.q as f32);

    let curve = |u: f32| -> Vector3<f32> {
        let (su, cu) = u.sin_cos();
        let qu_over_p = q / p * u;
        let cs = qu_over_p.cos();
        Vector3::new(
            params.radius * (2.0 + cs) * 0.5 * cu,
            params.radius * (2.0 + cs) * su * 0.5,
            params.radius * qu_over_p.sin() * 0.5,
        )
    };

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frame along the curve: tangent, then binormal and normal
        let tangent = p2 - p1;
        let binormal = normalize_or(tangent.cross(p2 + p1), Vector3::unit_z());
        let normal = normalize_or(binormal.cross(tangent), Vector3::unit_x());

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -params.tube * v.cos();
            let cy = params.tube * v.sin();

            let position = p1 + normal * cx + binormal * cy;
            let vertex_normal = normalize_or(position - p1, normal);

            data.push_vertex(
                position.into(),
                vertex_normal.into(),
                [i as f32 / tubular as f32, j as f32 / radial as f32],
            );
        }
    }

    let stride = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            data.push_quad(a, b, c, d);
        }
    }

    data
}

/// Subdivided rectangle in the XY plane facing +Z.
pub fn generate_plane(params: &PlaneParams) -> GeometryData {
    let mut data = GeometryData::new();
    let (grid_x, grid_y) = (params.width_segments, params.height_segments);
    let (width_half, height_half) = (params.width / 2.0, params.height / 2.0);
    let segment_width = params.width / grid_x as f32;
    let segment_height = params.height / grid_y as f32;

    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height_half;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width_half;
            data.push_vertex(
                [x, -y, 0.0],
                [0.0, 0.0, 1.0],
                [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
            );
        }
    }

    let stride = grid_x + 1;
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + stride * iy;
            let b = ix + stride * (iy + 1);
            let c = (ix + 1) + stride * (iy + 1);
            let d = (ix + 1) + stride * iy;
            data.push_quad(a, b, c, d);
        }
    }

    data
}

/// Disc (or sector) in the XY plane facing +Z.
pub fn generate_circle(params: &CircleParams) -> GeometryData {
    let mut data = GeometryData::new();
    data.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.5, 0.5]);

    for s in 0..=params.segments {
        let segment = params.theta_start + s as f32 / params.segments as f32 * params.theta_length;
        let (sin_s, cos_s) = segment.sin_cos();
        data.push_vertex(
            [params.radius * cos_s, params.radius * sin_s, 0.0],
            [0.0, 0.0, 1.0],
            [(cos_s + 1.0) / 2.0, (sin_s + 1.0) / 2.0],
        );
    }

    for i in 1..=params.segments {
        data.push_triangle(i, i + 1, 0);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::picking::Aabb;

    fn assert_well_formed(data: &GeometryData) {
        assert!(!data.indices.is_empty());
        assert_eq!(data.indices.len() % 3, 0);
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
        let count = data.vertex_count() as u32;
        assert!(data.indices.iter().all(|&i| i < count));
        for n in &data.normals {
            let length = Vector3::from(*n).magnitude();
            assert!((length - 1.0).abs() < 1e-3, "normal {n:?} is not unit length");
        }
    }

    fn assert_size(data: &GeometryData, expected: [f32; 3]) {
        let size = Aabb::from_vertices(&data.vertices).size();
        for (actual, expected) in [size.x, size.y, size.z].iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-4, "size {size:?} != {expected:?}");
        }
    }

    #[test]
    fn test_box_dimensions_and_counts() {
        let data = generate_box(&BoxParams::new(2.0, 3.0, 4.0));
        assert_well_formed(&data);
        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);
        assert_size(&data, [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_box_normals_point_outward() {
        let data = generate_box(&BoxParams::default());
        for (p, n) in data.vertices.iter().zip(&data.normals) {
            let dot = p[0] * n[0] + p[1] * n[1] + p[2] * n[2];
            assert!(dot > 0.0);
        }
    }

    #[test]
    fn test_subdivided_box_counts() {
        let params = BoxParams {
            width_segments: 2,
            height_segments: 3,
            depth_segments: 4,
            ..BoxParams::default()
        };
        let data = generate_box(&params);
        assert_well_formed(&data);
        assert_eq!(data.triangle_count(), 2 * 2 * (2 * 3 + 2 * 4 + 3 * 4));
    }

    #[test]
    fn test_sphere_skips_pole_triangles() {
        let params = SphereParams {
            width_segments: 8,
            height_segments: 4,
            ..SphereParams::default()
        };
        let data = generate_sphere(&params);
        assert_well_formed(&data);
        assert_eq!(data.vertex_count(), 9 * 5);
        assert_eq!(data.triangle_count(), 8 * 4 * 2 - 2 * 8);
        assert_size(&data, [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_cylinder_and_cone_extents() {
        let cylinder = generate_cylinder(&CylinderParams {
            radius_top: 0.5,
            radius_bottom: 1.0,
            height: 3.0,
            ..CylinderParams::default()
        });
        assert_well_formed(&cylinder);
        assert_size(&cylinder, [2.0, 3.0, 2.0]);

        let cone = generate_cone(&ConeParams::default());
        assert_well_formed(&cone);
        let bounds = Aabb::from_vertices(&cone.vertices);
        assert!((bounds.max.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_open_ended_cylinder_has_no_caps() {
        let closed = generate_cylinder(&CylinderParams::default());
        let open = generate_cylinder(&CylinderParams {
            open_ended: true,
            ..CylinderParams::default()
        });
        assert_eq!(closed.triangle_count() - open.triangle_count(), 2 * 32);
    }

    #[test]
    fn test_capsule_total_height() {
        let data = generate_capsule(&CapsuleParams {
            radius: 0.5,
            length: 2.0,
            ..CapsuleParams::default()
        });
        assert_well_formed(&data);
        assert_size(&data, [1.0, 3.0, 1.0]);
    }

    #[test]
    fn test_torus_extents() {
        let data = generate_torus(&TorusParams::default());
        assert_well_formed(&data);
        assert_size(&data, [2.8, 2.8, 0.8]);
    }

    #[test]
    fn test_torus_knot_is_well_formed() {
        let data = generate_torus_knot(&TorusKnotParams::default());
        assert_well_formed(&data);
        assert_eq!(data.vertex_count(), 65 * 9);
    }

    #[test]
    fn test_plane_and_circle_are_flat() {
        let plane = generate_plane(&PlaneParams {
            width: 4.0,
            height: 2.0,
            width_segments: 2,
            height_segments: 2,
        });
        assert_well_formed(&plane);
        assert_size(&plane, [4.0, 2.0, 0.0]);

        let circle = generate_circle(&CircleParams::default());
        assert_well_formed(&circle);
        assert_eq!(circle.triangle_count(), 32);
        assert_size(&circle, [2.0, 2.0, 0.0]);
    }
}
