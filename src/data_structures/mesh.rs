//! CPU-side triangle meshes.
//!
//! A [`Mesh`] is indexed triangle geometry with per-vertex normals and texture
//! coordinates plus an optional material handle. Meshes come either from the
//! glTF loader or from the procedural builders below, which the Hanoi scene
//! uses for its base, pegs and disks.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::material::MaterialId;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    /// Triangle list; every three entries index one face.
    pub indices: Vec<u32>,
    pub material: Option<MaterialId>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            material: None,
        }
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate faces as vertex triples, skipping faces with out-of-range indices.
    pub fn faces(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|f| {
            Some([
                self.vertices.get(f[0] as usize)?,
                self.vertices.get(f[1] as usize)?,
                self.vertices.get(f[2] as usize)?,
            ])
        })
    }

    /// Shift every vertex by `offset`.
    pub fn offset(mut self, offset: Vector3<f32>) -> Self {
        for v in &mut self.vertices {
            v.position[0] += offset.x;
            v.position[1] += offset.y;
            v.position[2] += offset.z;
        }
        self
    }

    /// Closed cylinder around the Y axis, centred on the origin.
    pub fn cylinder(radius: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // side
        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let normal = [cos, 0.0, sin];
            vertices.push(Vertex {
                position: [radius * cos, -half, radius * sin],
                normal,
                tex_coords: [u, 1.0],
            });
            vertices.push(Vertex {
                position: [radius * cos, half, radius * sin],
                normal,
                tex_coords: [u, 0.0],
            });
        }
        for i in 0..segments {
            let b = i * 2;
            indices.extend_from_slice(&[b, b + 1, b + 3, b, b + 3, b + 2]);
        }

        // caps
        for (y, ny) in [(half, 1.0), (-half, -1.0)] {
            let centre = vertices.len() as u32;
            vertices.push(Vertex {
                position: [0.0, y, 0.0],
                normal: [0.0, ny, 0.0],
                tex_coords: [0.5, 0.5],
            });
            for i in 0..=segments {
                let (sin, cos) = (i as f32 / segments as f32 * TAU).sin_cos();
                vertices.push(Vertex {
                    position: [radius * cos, y, radius * sin],
                    normal: [0.0, ny, 0.0],
                    tex_coords: [0.5 + cos * 0.5, 0.5 + sin * 0.5],
                });
            }
            for i in 0..segments {
                let a = centre + 1 + i;
                if ny > 0.0 {
                    indices.extend_from_slice(&[centre, a + 1, a]);
                } else {
                    indices.extend_from_slice(&[centre, a, a + 1]);
                }
            }
        }

        Self::new(vertices, indices)
    }

    /// Axis-aligned box centred on the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let h = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
        let axes = [
            Vector3::<f32>::unit_x(),
            -Vector3::unit_x(),
            Vector3::unit_y(),
            -Vector3::unit_y(),
            Vector3::unit_z(),
            -Vector3::unit_z(),
        ];
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for n in axes {
            // two axes spanning the face, ordered so the winding is counter-clockwise seen from outside
            let u = if n.y.abs() > 0.5 {
                Vector3::unit_z()
            } else {
                Vector3::unit_y()
            };
            let v = n.cross(u);
            let base = vertices.len() as u32;
            for (su, sv, tc) in [
                (-1.0, -1.0, [0.0, 1.0]),
                (1.0, -1.0, [1.0, 1.0]),
                (1.0, 1.0, [1.0, 0.0]),
                (-1.0, 1.0, [0.0, 0.0]),
            ] {
                let p = n + u * su + v * sv;
                vertices.push(Vertex {
                    position: [p.x * h.x, p.y * h.y, p.z * h.z],
                    normal: n.normalize().into(),
                    tex_coords: tc,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self::new(vertices, indices)
    }
}
