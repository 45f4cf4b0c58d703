//! Scene flattening
//!
//! Converts the scene arena into CPU-side vertex/index arrays each frame.
//! Solids are flat shaded (one normal per face), spheres are tessellated,
//! polylines become a line list with a zero normal so the shader leaves
//! them unlit.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::geometry::Solid;
use crate::scene::{MeshKind, PickTag, Scene, SceneMesh};

/// Latitude/longitude segments for handle and marker spheres.
const SPHERE_SEGMENTS: u32 = 12;

/// Lines and markers on the ground are lifted by this much to avoid z-fighting.
const GROUND_LIFT: f32 = 0.005;

const GROUND_COLOR: [f32; 4] = [0.35, 0.38, 0.35, 1.0];
const SOLID_COLOR: [f32; 4] = [0.8, 0.5, 0.5, 1.0];
const HANDLE_COLOR: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
const OUTLINE_COLOR: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
const PREVIEW_COLOR: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// GPU vertex: position, normal, color.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(Vertex, [u8; 40]);

impl Vertex {
    fn new(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color,
        }
    }
}

/// One frame's worth of geometry.
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    /// Triangle list vertices
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Line list vertices, two per segment
    pub lines: Vec<Vertex>,
}

impl SceneGeometry {
    pub fn from_scene(scene: &Scene) -> Self {
        let mut geometry = Self::default();
        for (_, mesh) in scene.iter() {
            geometry.push_mesh(mesh);
        }
        geometry
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn line_segment_count(&self) -> usize {
        self.lines.len() / 2
    }

    fn push_mesh(&mut self, mesh: &SceneMesh) {
        let color = color_for(mesh.tag);
        match &mesh.kind {
            MeshKind::Solid(solid) => self.push_solid(solid, mesh.offset, color),
            MeshKind::Sphere { center, diameter } => {
                let lift = if mesh.tag == PickTag::Marker { GROUND_LIFT } else { 0.0 };
                let center = *center + mesh.offset + Vec3::Y * lift;
                self.push_sphere(center, diameter * 0.5, color);
            }
            MeshKind::Ground { half_extent } => self.push_ground(*half_extent, mesh.offset),
            MeshKind::LineStrip { points, closed } => {
                self.push_line_strip(points, *closed, mesh.offset, color)
            }
        }
    }

    fn push_solid(&mut self, solid: &Solid, offset: Vec3, color: [f32; 4]) {
        for (tri, normal) in solid.triangles().zip(solid.face_normals()) {
            let base = self.vertices.len() as u32;
            for corner in tri {
                self.vertices.push(Vertex::new(corner + offset, *normal, color));
            }
            self.indices.extend_from_slice(&[base, base + 1, base + 2]);
        }
    }

    fn push_sphere(&mut self, center: Vec3, radius: f32, color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        let segments = SPHERE_SEGMENTS;

        for lat in 0..=segments {
            let theta = lat as f32 * std::f32::consts::PI / segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            for lon in 0..=segments {
                let phi = lon as f32 * std::f32::consts::TAU / segments as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();

                let normal = Vec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
                self.vertices.push(Vertex::new(center + normal * radius, normal, color));
            }
        }

        for lat in 0..segments {
            for lon in 0..segments {
                let first = base + lat * (segments + 1) + lon;
                let second = first + segments + 1;
                self.indices
                    .extend_from_slice(&[first, second, first + 1, second, second + 1, first + 1]);
            }
        }
    }

    fn push_ground(&mut self, half_extent: f32, offset: Vec3) {
        let base = self.vertices.len() as u32;
        let e = half_extent;
        for corner in [
            Vec3::new(-e, 0.0, -e),
            Vec3::new(-e, 0.0, e),
            Vec3::new(e, 0.0, e),
            Vec3::new(e, 0.0, -e),
        ] {
            self.vertices.push(Vertex::new(corner + offset, Vec3::Y, GROUND_COLOR));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn push_line_strip(&mut self, points: &[Vec3], closed: bool, offset: Vec3, color: [f32; 4]) {
        if points.len() < 2 {
            return;
        }
        let lifted = |p: Vec3| Vertex::new(p + offset + Vec3::Y * GROUND_LIFT, Vec3::ZERO, color);

        for pair in points.windows(2) {
            self.lines.push(lifted(pair[0]));
            self.lines.push(lifted(pair[1]));
        }
        if closed && points.len() > 2 {
            self.lines.push(lifted(points[points.len() - 1]));
            self.lines.push(lifted(points[0]));
        }
    }
}

fn color_for(tag: PickTag) -> [f32; 4] {
    match tag {
        PickTag::Ground => GROUND_COLOR,
        PickTag::Solid(_) => SOLID_COLOR,
        PickTag::VertexHandle(_) | PickTag::Marker => HANDLE_COLOR,
        PickTag::Outline(_) => OUTLINE_COLOR,
        PickTag::Preview => PREVIEW_COLOR,
    }
}
