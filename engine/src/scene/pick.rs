//! Ray picking against the arena.
//!
//! The nearest hit wins across all pickable meshes. Solids are tested per
//! triangle, spheres analytically, and the ground as a bounded plane.

use glam::Vec3;

use super::{MeshId, MeshKind, PickTag, Scene, SceneMesh};
use crate::camera::Ray;

/// Result of a successful pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub mesh: MeshId,
    pub tag: PickTag,
    /// World-space hit point
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
}

impl Scene {
    /// Nearest pickable mesh under `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        let mut closest: Option<PickHit> = None;

        for (id, mesh) in self.iter() {
            if !mesh.pickable {
                continue;
            }
            let Some(t) = intersect_mesh(ray, mesh) else {
                continue;
            };
            if closest.is_none_or(|hit| t < hit.distance) {
                closest = Some(PickHit {
                    mesh: id,
                    tag: mesh.tag,
                    point: ray.at(t),
                    distance: t,
                });
            }
        }

        closest
    }

    /// Where `ray` meets the ground square, ignoring everything above it.
    pub fn pick_ground(&self, ray: &Ray) -> Option<Vec3> {
        let mesh = self.mesh(self.ground_id())?;
        intersect_mesh(ray, mesh).map(|t| ray.at(t))
    }
}

fn intersect_mesh(ray: &Ray, mesh: &SceneMesh) -> Option<f32> {
    match &mesh.kind {
        MeshKind::Solid(solid) => {
            // Move the ray into the solid's local space instead of the solid.
            let local = Ray {
                origin: ray.origin - mesh.offset,
                direction: ray.direction,
            };
            solid
                .triangles()
                .filter_map(|[a, b, c]| local.intersect_triangle(a, b, c))
                .min_by(f32::total_cmp)
        }
        MeshKind::Sphere { center, diameter } => {
            ray.intersect_sphere(*center + mesh.offset, diameter * 0.5)
        }
        MeshKind::Ground { half_extent } => {
            let t = ray.intersect_horizontal_plane(mesh.offset.y)?;
            let hit = ray.at(t) - mesh.offset;
            (hit.x.abs() <= *half_extent && hit.z.abs() <= *half_extent).then_some(t)
        }
        MeshKind::LineStrip { .. } => None,
    }
}
