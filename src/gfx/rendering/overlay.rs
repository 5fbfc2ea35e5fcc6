//! Line geometry for the helper overlays: ground grid, world axes and the transform gizmo.
//!
//! Everything here is CPU-side vertex generation for a `LineList` pipeline; each
//! consecutive vertex pair is one segment.

use cgmath::{InnerSpace, Vector3};

use super::vertex::LineVertex;
use crate::gfx::gizmos::{GizmoAxis, GizmoMode};

const GRID_COLOR: [f32; 3] = [0.55, 0.55, 0.55];
const GRID_CENTER_COLOR: [f32; 3] = [0.35, 0.35, 0.35];
const HIGHLIGHT: [f32; 3] = [1.0, 0.85, 0.1];
const RING_SEGMENTS: usize = 48;

pub fn axis_color(axis: GizmoAxis) -> [f32; 3] {
    match axis {
        GizmoAxis::X => [0.9, 0.2, 0.2],
        GizmoAxis::Y => [0.2, 0.8, 0.2],
        GizmoAxis::Z => [0.2, 0.4, 0.95],
    }
}

/// Square grid on the XZ plane, `size` wide with `divisions` cells per side.
pub fn grid_lines(size: f32, divisions: u32) -> Vec<LineVertex> {
    let divisions = divisions.max(1);
    let half = size / 2.0;
    let step = size / divisions as f32;
    let mut lines = Vec::with_capacity((divisions as usize + 1) * 4);

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;
        let color = if i * 2 == divisions {
            GRID_CENTER_COLOR
        } else {
            GRID_COLOR
        };
        lines.push(LineVertex::new([-half, 0.0, offset], color));
        lines.push(LineVertex::new([half, 0.0, offset], color));
        lines.push(LineVertex::new([offset, 0.0, -half], color));
        lines.push(LineVertex::new([offset, 0.0, half], color));
    }
    lines
}

/// World axes from the origin, `length` long.
pub fn axes_lines(length: f32) -> Vec<LineVertex> {
    GizmoAxis::ALL
        .into_iter()
        .flat_map(|axis| {
            let color = axis_color(axis);
            let tip = axis.unit() * length;
            [
                LineVertex::new([0.0, 0.0, 0.0], color),
                LineVertex::new(tip.into(), color),
            ]
        })
        .collect()
}

/// Gizmo handles at `origin`, with the `active` axis highlighted.
pub fn gizmo_lines(
    mode: GizmoMode,
    origin: Vector3<f32>,
    length: f32,
    active: Option<GizmoAxis>,
) -> Vec<LineVertex> {
    let mut lines = Vec::new();
    for axis in GizmoAxis::ALL {
        let color = if active == Some(axis) {
            HIGHLIGHT
        } else {
            axis_color(axis)
        };
        match mode {
            GizmoMode::Translate => {
                lines.push(LineVertex::new(origin.into(), color));
                lines.push(LineVertex::new((origin + axis.unit() * length).into(), color));
            }
            GizmoMode::Scale => {
                let tip = origin + axis.unit() * length;
                lines.push(LineVertex::new(origin.into(), color));
                lines.push(LineVertex::new(tip.into(), color));
                // Small tick across the tip marks scale handles
                let across = perpendicular(axis.unit()) * (length * 0.08);
                lines.push(LineVertex::new((tip - across).into(), color));
                lines.push(LineVertex::new((tip + across).into(), color));
            }
            GizmoMode::Rotate => ring(&mut lines, origin, axis.unit(), length, color),
        }
    }
    lines
}

fn ring(
    lines: &mut Vec<LineVertex>,
    center: Vector3<f32>,
    normal: Vector3<f32>,
    radius: f32,
    color: [f32; 3],
) {
    let u = perpendicular(normal);
    let v = normal.cross(u);
    let point = |i: usize| {
        let angle = i as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
        center + (u * angle.cos() + v * angle.sin()) * radius
    };
    for i in 0..RING_SEGMENTS {
        lines.push(LineVertex::new(point(i).into(), color));
        lines.push(LineVertex::new(point(i + 1).into(), color));
    }
}

fn perpendicular(axis: Vector3<f32>) -> Vector3<f32> {
    let helper = if axis.y.abs() < 0.9 {
        Vector3::unit_y()
    } else {
        Vector3::unit_x()
    };
    axis.cross(helper).normalize()
}
