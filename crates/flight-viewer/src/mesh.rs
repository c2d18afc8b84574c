//! Procedural geometry for the airplane model.
//!
//! The airplane is assembled from primitives: a red cylinder fuselage and
//! green box wings, generated as one indexed triangle mesh with
//! per-vertex normals and colors. The model is authored with the nose on
//! +X and sized in log units; the model matrix applies [`MODEL_SCALE`].

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::TAU;

/// Uniform scale applied to the whole model at render time.
pub const MODEL_SCALE: f32 = 0.5;

const FUSELAGE_RED: [f32; 3] = [1.0, 0.0, 0.0];
const WING_GREEN: [f32; 3] = [0.0, 1.0, 0.0];

/// Vertex layout for the aircraft pipeline. Must match `AIRCRAFT_WGSL`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// CPU-side indexed triangle mesh, ready for upload.
#[derive(Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn vertex(&mut self, pos: Vec3, normal: Vec3, color: [f32; 3]) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(MeshVertex {
            pos: pos.into(),
            normal: normal.into(),
            color,
        });
        idx
    }
}

/// The simplified airplane: fuselage cylinder, main wing, tail plane and
/// a vertical fin.
pub fn airplane() -> MeshData {
    let mut mesh = MeshData::default();
    push_cylinder_x(&mut mesh, Vec3::ZERO, 15.0, 50.0, 32, FUSELAGE_RED);
    push_box(
        &mut mesh,
        Vec3::new(5.0, 0.0, 0.0),
        Vec3::new(10.0, 80.0, 2.5),
        WING_GREEN,
    );
    push_box(
        &mut mesh,
        Vec3::new(-40.0, 0.0, 5.0),
        Vec3::new(7.0, 30.0, 2.0),
        WING_GREEN,
    );
    push_box(
        &mut mesh,
        Vec3::new(-42.0, 0.0, 16.0),
        Vec3::new(8.0, 2.0, 12.0),
        WING_GREEN,
    );
    mesh
}

/// Axis-aligned box with flat per-face normals.
fn push_box(mesh: &mut MeshData, center: Vec3, half: Vec3, color: [f32; 3]) {
    let axes = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::Z, Vec3::X, Vec3::Y),
    ];
    for (n, u, v) in axes {
        for sign in [1.0f32, -1.0] {
            let normal = n * sign;
            let face_center = center + normal * n.dot(half);
            let ue = u * u.dot(half);
            let ve = v * v.dot(half);

            let a = mesh.vertex(face_center - ue - ve, normal, color);
            let b = mesh.vertex(face_center + ue - ve, normal, color);
            let c = mesh.vertex(face_center + ue + ve, normal, color);
            let d = mesh.vertex(face_center - ue + ve, normal, color);
            mesh.indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
}

/// Capped cylinder along the X axis with smooth radial side normals.
fn push_cylinder_x(
    mesh: &mut MeshData,
    center: Vec3,
    radius: f32,
    half_len: f32,
    segments: u32,
    color: [f32; 3],
) {
    let side_base = mesh.vertices.len() as u32;
    for i in 0..segments {
        let angle = i as f32 / segments as f32 * TAU;
        let (sin, cos) = angle.sin_cos();
        let radial = Vec3::new(0.0, cos, sin);
        for x in [-half_len, half_len] {
            mesh.vertex(center + Vec3::X * x + radial * radius, radial, color);
        }
    }
    for i in 0..segments {
        let j = (i + 1) % segments;
        let (a0, a1) = (side_base + 2 * i, side_base + 2 * i + 1);
        let (b0, b1) = (side_base + 2 * j, side_base + 2 * j + 1);
        mesh.indices.extend_from_slice(&[a0, b0, b1, a0, b1, a1]);
    }

    for (x, normal) in [(-half_len, -Vec3::X), (half_len, Vec3::X)] {
        let apex = mesh.vertex(center + Vec3::X * x, normal, color);
        let ring_base = mesh.vertices.len() as u32;
        for i in 0..segments {
            let angle = i as f32 / segments as f32 * TAU;
            let (sin, cos) = angle.sin_cos();
            mesh.vertex(
                center + Vec3::new(x, cos * radius, sin * radius),
                normal,
                color,
            );
        }
        for i in 0..segments {
            let j = (i + 1) % segments;
            mesh.indices
                .extend_from_slice(&[apex, ring_base + i, ring_base + j]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_triangles_within_bounds() {
        let mesh = airplane();
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = airplane();
        for v in &mesh.vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < 1e-5, "normal length {len}");
        }
    }

    #[test]
    fn model_is_symmetric_across_the_fuselage() {
        let mesh = airplane();
        let max_y = mesh.vertices.iter().map(|v| v.pos[1]).fold(f32::MIN, f32::max);
        let min_y = mesh.vertices.iter().map(|v| v.pos[1]).fold(f32::MAX, f32::min);
        assert!((max_y + min_y).abs() < 1e-4);
    }

    #[test]
    fn cylinder_counts_match_segment_count() {
        let mut mesh = MeshData::default();
        push_cylinder_x(&mut mesh, Vec3::ZERO, 1.0, 1.0, 8, FUSELAGE_RED);
        // 2 side rings + 2 caps (apex + ring each).
        assert_eq!(mesh.vertices.len(), 2 * 8 + 2 * (8 + 1));
        // 2 triangles per side quad + 1 per cap wedge per cap.
        assert_eq!(mesh.indices.len(), (2 * 8 + 2 * 8) * 3);
    }
}
