//! Platonic solids with optional subdivision.
//!
//! Each solid starts from a base vertex/face table. Every face is split into
//! `(detail + 1)^2` triangles, every vertex is pushed onto the sphere of the
//! requested radius, and normals are per-face so the result keeps hard edges.

use super::primitives::normalize_or;
use super::shape::PolyhedronParams;
use super::GeometryData;
use cgmath::{InnerSpace, Vector3, VectorSpace};

const GOLDEN: f32 = 1.618_034;
const INV_GOLDEN: f32 = 1.0 / GOLDEN;

#[rustfmt::skip]
const TETRAHEDRON_VERTICES: [f32; 12] = [
    1.0, 1.0, 1.0,   -1.0, -1.0, 1.0,   -1.0, 1.0, -1.0,   1.0, -1.0, -1.0,
];
#[rustfmt::skip]
const TETRAHEDRON_FACES: [u32; 12] = [
    2, 1, 0,   0, 3, 2,   1, 3, 0,   2, 3, 1,
];

#[rustfmt::skip]
const OCTAHEDRON_VERTICES: [f32; 18] = [
    1.0, 0.0, 0.0,   -1.0, 0.0, 0.0,   0.0, 1.0, 0.0,
    0.0, -1.0, 0.0,   0.0, 0.0, 1.0,   0.0, 0.0, -1.0,
];
#[rustfmt::skip]
const OCTAHEDRON_FACES: [u32; 24] = [
    0, 2, 4,   0, 4, 3,   0, 3, 5,   0, 5, 2,
    1, 2, 5,   1, 5, 3,   1, 3, 4,   1, 4, 2,
];

#[rustfmt::skip]
const ICOSAHEDRON_VERTICES: [f32; 36] = [
    -1.0, GOLDEN, 0.0,   1.0, GOLDEN, 0.0,   -1.0, -GOLDEN, 0.0,   1.0, -GOLDEN, 0.0,
    0.0, -1.0, GOLDEN,   0.0, 1.0, GOLDEN,   0.0, -1.0, -GOLDEN,   0.0, 1.0, -GOLDEN,
    GOLDEN, 0.0, -1.0,   GOLDEN, 0.0, 1.0,   -GOLDEN, 0.0, -1.0,   -GOLDEN, 0.0, 1.0,
];
#[rustfmt::skip]
const ICOSAHEDRON_FACES: [u32; 60] = [
    0, 11, 5,   0, 5, 1,   0, 1, 7,   0, 7, 10,   0, 10, 11,
    1, 5, 9,   5, 11, 4,   11, 10, 2,   10, 7, 6,   7, 1, 8,
    3, 9, 4,   3, 4, 2,   3, 2, 6,   3, 6, 8,   3, 8, 9,
    4, 9, 5,   2, 4, 11,   6, 2, 10,   8, 6, 7,   9, 8, 1,
];

#[rustfmt::skip]
const DODECAHEDRON_VERTICES: [f32; 60] = [
    // (±1, ±1, ±1)
    -1.0, -1.0, -1.0,   -1.0, -1.0, 1.0,   -1.0, 1.0, -1.0,   -1.0, 1.0, 1.0,
    1.0, -1.0, -1.0,   1.0, -1.0, 1.0,   1.0, 1.0, -1.0,   1.0, 1.0, 1.0,
    // (0, ±1/φ, ±φ)
    0.0, -INV_GOLDEN, -GOLDEN,   0.0, -INV_GOLDEN, GOLDEN,
    0.0, INV_GOLDEN, -GOLDEN,   0.0, INV_GOLDEN, GOLDEN,
    // (±1/φ, ±φ, 0)
    -INV_GOLDEN, -GOLDEN, 0.0,   -INV_GOLDEN, GOLDEN, 0.0,
    INV_GOLDEN, -GOLDEN, 0.0,   INV_GOLDEN, GOLDEN, 0.0,
    // (±φ, 0, ±1/φ)
    -GOLDEN, 0.0, -INV_GOLDEN,   GOLDEN, 0.0, -INV_GOLDEN,
    -GOLDEN, 0.0, INV_GOLDEN,   GOLDEN, 0.0, INV_GOLDEN,
];
#[rustfmt::skip]
const DODECAHEDRON_FACES: [u32; 108] = [
    3, 11, 7,   3, 7, 15,   3, 15, 13,
    7, 19, 17,   7, 17, 6,   7, 6, 15,
    17, 4, 8,   17, 8, 10,   17, 10, 6,
    8, 0, 16,   8, 16, 2,   8, 2, 10,
    0, 12, 1,   0, 1, 18,   0, 18, 16,
    6, 10, 2,   6, 2, 13,   6, 13, 15,
    2, 16, 18,   2, 18, 3,   2, 3, 13,
    18, 1, 9,   18, 9, 11,   18, 11, 3,
    4, 14, 12,   4, 12, 0,   4, 0, 8,
    11, 9, 5,   11, 5, 19,   11, 19, 7,
    19, 5, 14,   19, 14, 4,   19, 4, 17,
    1, 12, 14,   1, 14, 5,   1, 5, 9,
];

pub fn generate_tetrahedron(params: &PolyhedronParams) -> GeometryData {
    polyhedron(&TETRAHEDRON_VERTICES, &TETRAHEDRON_FACES, params)
}

pub fn generate_octahedron(params: &PolyhedronParams) -> GeometryData {
    polyhedron(&OCTAHEDRON_VERTICES, &OCTAHEDRON_FACES, params)
}

pub fn generate_icosahedron(params: &PolyhedronParams) -> GeometryData {
    polyhedron(&ICOSAHEDRON_VERTICES, &ICOSAHEDRON_FACES, params)
}

pub fn generate_dodecahedron(params: &PolyhedronParams) -> GeometryData {
    polyhedron(&DODECAHEDRON_VERTICES, &DODECAHEDRON_FACES, params)
}

fn polyhedron(vertices: &[f32], faces: &[u32], params: &PolyhedronParams) -> GeometryData {
    let corner = |index: u32| {
        let i = index as usize * 3;
        Vector3::new(vertices[i], vertices[i + 1], vertices[i + 2])
    };

    let mut triangles = Vec::new();
    for face in faces.chunks_exact(3) {
        subdivide_face(
            corner(face[0]),
            corner(face[1]),
            corner(face[2]),
            params.detail,
            &mut triangles,
        );
    }

    let mut data = GeometryData::new();
    for [a, b, c] in triangles {
        let a = normalize_or(a, Vector3::unit_y()) * params.radius;
        let mut b = normalize_or(b, Vector3::unit_y()) * params.radius;
        let mut c = normalize_or(c, Vector3::unit_y()) * params.radius;

        let mut normal = normalize_or((b - a).cross(c - a), a);
        // Keep every face wound so its normal points away from the center
        if normal.dot(a + b + c) < 0.0 {
            std::mem::swap(&mut b, &mut c);
            normal = -normal;
        }

        let base = data.vertex_count() as u32;
        for p in [a, b, c] {
            data.push_vertex(p.into(), normal.into(), spherical_uv(p));
        }
        data.push_triangle(base, base + 1, base + 2);
    }

    data
}

/// Split triangle `abc` into a `(detail + 1)`-row grid of smaller triangles.
fn subdivide_face(
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
    detail: u32,
    out: &mut Vec<[Vector3<f32>; 3]>,
) {
    let cols = detail as usize + 1;
    let mut grid: Vec<Vec<Vector3<f32>>> = Vec::with_capacity(cols + 1);

    for i in 0..=cols {
        let t = i as f32 / cols as f32;
        let aj = a.lerp(c, t);
        let bj = b.lerp(c, t);
        let rows = cols - i;

        let row = (0..=rows)
            .map(|j| {
                if j == 0 && i == cols {
                    aj
                } else {
                    aj.lerp(bj, j as f32 / rows as f32)
                }
            })
            .collect();
        grid.push(row);
    }

    for i in 0..cols {
        for j in 0..(2 * (cols - i) - 1) {
            let k = j / 2;
            if j % 2 == 0 {
                out.push([grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                out.push([grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
}

fn spherical_uv(p: Vector3<f32>) -> [f32; 2] {
    let n = normalize_or(p, Vector3::unit_y());
    let u = n.z.atan2(-n.x) / (2.0 * std::f32::consts::PI) + 0.5;
    let v = n.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI + 0.5;
    [u, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(data: &GeometryData, faces: usize, radius: f32) {
        assert_eq!(data.triangle_count(), faces);
        for v in &data.vertices {
            assert!((Vector3::from(*v).magnitude() - radius).abs() < 1e-4);
        }
        for (tri, n) in data.indices.chunks_exact(3).zip(data.normals.chunks_exact(3)) {
            let a = Vector3::from(data.vertices[tri[0] as usize]);
            assert!(Vector3::from(n[0]).dot(a) > 0.0, "face normal points inward");
        }
    }

    #[test]
    fn test_base_face_counts() {
        let params = PolyhedronParams::default();
        check(&generate_tetrahedron(&params), 4, 1.0);
        check(&generate_octahedron(&params), 8, 1.0);
        check(&generate_icosahedron(&params), 20, 1.0);
        check(&generate_dodecahedron(&params), 36, 1.0);
    }

    #[test]
    fn test_detail_subdivides_each_face() {
        let params = PolyhedronParams {
            radius: 2.5,
            detail: 2,
        };
        check(&generate_icosahedron(&params), 20 * 9, 2.5);
        check(&generate_tetrahedron(&params), 4 * 9, 2.5);
    }
}
