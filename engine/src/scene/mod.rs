//! Scene Arena
//!
//! Headless mesh storage standing in for a rendering engine. Meshes are
//! created from kernel solids, line strips and spheres, addressed by
//! [`MeshId`], moved by offset and disposed explicitly. The render shim
//! reads the arena each frame; it never decides anything.
//!
//! The ground quad is created with the scene and cannot be disposed.

mod pick;
pub mod tag;

pub use pick::PickHit;
pub use tag::{HandleLevel, PickTag, ShapeId, VertexRef};

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use tracing::{debug, warn};

use crate::geometry::Solid;

/// Handle to a mesh owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u32);

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh{}", self.0)
    }
}

// ============================================================================
// MESHES
// ============================================================================

/// Geometry held by a scene mesh, in local space.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshKind {
    Solid(Solid),
    LineStrip { points: Vec<Vec3>, closed: bool },
    Sphere { center: Vec3, diameter: f32 },
    /// Square on y = 0 spanning `[-half_extent, half_extent]` in x and z
    Ground { half_extent: f32 },
}

/// A mesh in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMesh {
    pub kind: MeshKind,
    /// World-space translation applied on top of the local geometry
    pub offset: Vec3,
    pub tag: PickTag,
    /// Whether [`Scene::pick`] considers this mesh
    pub pickable: bool,
}

// ============================================================================
// SCENE
// ============================================================================

#[derive(Debug)]
pub struct Scene {
    meshes: BTreeMap<MeshId, SceneMesh>,
    next_id: u32,
    ground: MeshId,
}

impl Scene {
    /// Create a scene holding only a ground square of the given half extent.
    pub fn new(ground_half_extent: f32) -> Self {
        let ground = MeshId(0);
        let mut meshes = BTreeMap::new();
        meshes.insert(
            ground,
            SceneMesh {
                kind: MeshKind::Ground {
                    half_extent: ground_half_extent,
                },
                offset: Vec3::ZERO,
                tag: PickTag::Ground,
                pickable: true,
            },
        );

        Self {
            meshes,
            next_id: 1,
            ground,
        }
    }

    fn insert(&mut self, mesh: SceneMesh) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        debug!(%id, tag = ?mesh.tag, "mesh created");
        self.meshes.insert(id, mesh);
        id
    }

    /// Add a kernel solid. Solids are always pickable.
    pub fn create_solid(&mut self, solid: Solid, tag: PickTag) -> MeshId {
        self.insert(SceneMesh {
            kind: MeshKind::Solid(solid),
            offset: Vec3::ZERO,
            tag,
            pickable: true,
        })
    }

    /// Add a polyline. Lines are never pickable.
    pub fn create_line_strip(&mut self, points: Vec<Vec3>, closed: bool, tag: PickTag) -> MeshId {
        self.insert(SceneMesh {
            kind: MeshKind::LineStrip { points, closed },
            offset: Vec3::ZERO,
            tag,
            pickable: false,
        })
    }

    pub fn create_sphere(
        &mut self,
        center: Vec3,
        diameter: f32,
        tag: PickTag,
        pickable: bool,
    ) -> MeshId {
        self.insert(SceneMesh {
            kind: MeshKind::Sphere { center, diameter },
            offset: Vec3::ZERO,
            tag,
            pickable,
        })
    }

    /// Remove a mesh. Returns `false` for unknown or already disposed ids.
    pub fn dispose(&mut self, id: MeshId) -> bool {
        if id == self.ground {
            warn!(%id, "refusing to dispose the ground");
            return false;
        }
        match self.meshes.remove(&id) {
            Some(mesh) => {
                debug!(%id, tag = ?mesh.tag, "mesh disposed");
                true
            }
            None => {
                warn!(%id, "dispose of unknown mesh");
                false
            }
        }
    }

    /// Shift a mesh by `delta` in world space.
    pub fn translate(&mut self, id: MeshId, delta: Vec3) -> bool {
        match self.meshes.get_mut(&id) {
            Some(mesh) => {
                mesh.offset += delta;
                true
            }
            None => false,
        }
    }

    /// Replace a mesh's translation outright.
    pub fn set_offset(&mut self, id: MeshId, offset: Vec3) -> bool {
        match self.meshes.get_mut(&id) {
            Some(mesh) => {
                mesh.offset = offset;
                true
            }
            None => false,
        }
    }

    /// Move a sphere so its world-space center is `center`, clearing its offset.
    pub fn set_sphere_center(&mut self, id: MeshId, center: Vec3) -> bool {
        match self.meshes.get_mut(&id) {
            Some(SceneMesh {
                kind: MeshKind::Sphere { center: c, .. },
                offset,
                ..
            }) => {
                *c = center;
                *offset = Vec3::ZERO;
                true
            }
            _ => false,
        }
    }

    pub fn mesh(&self, id: MeshId) -> Option<&SceneMesh> {
        self.meshes.get(&id)
    }

    pub fn contains(&self, id: MeshId) -> bool {
        self.meshes.contains_key(&id)
    }

    pub fn ground_id(&self) -> MeshId {
        self.ground
    }

    pub fn ground_half_extent(&self) -> f32 {
        match self.meshes.get(&self.ground) {
            Some(SceneMesh {
                kind: MeshKind::Ground { half_extent },
                ..
            }) => *half_extent,
            _ => 0.0,
        }
    }

    /// Number of live meshes, ground included.
    pub fn live_mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Meshes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &SceneMesh)> {
        self.meshes.iter().map(|(id, mesh)| (*id, mesh))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(10.0)
    }
}

// ============================================================================
// TESTS
// ============================================================================
