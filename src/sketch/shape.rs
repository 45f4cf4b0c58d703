//! Shape records
//!
//! A shape owns its point ring and every scene mesh built from it. The
//! state machine only ever holds a [`ShapeId`] or [`VertexRef`] into one.

use glam::Vec3;

use crate::scene::{HandleLevel, MeshId, ShapeId};

/// One vertex handle sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub mesh: MeshId,
    /// Committed world-space center
    pub position: Vec3,
}

/// Bottom and top handles of one ring vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePair {
    pub bottom: Handle,
    pub top: Handle,
}

impl HandlePair {
    pub fn get(&self, level: HandleLevel) -> &Handle {
        match level {
            HandleLevel::Bottom => &self.bottom,
            HandleLevel::Top => &self.top,
        }
    }

    pub fn get_mut(&mut self, level: HandleLevel) -> &mut Handle {
        match level {
            HandleLevel::Bottom => &mut self.bottom,
            HandleLevel::Top => &mut self.top,
        }
    }

    pub fn meshes(&self) -> [MeshId; 2] {
        [self.bottom.mesh, self.top.mesh]
    }
}

/// A closed polygon and whatever has been built from it.
///
/// Once extruded, `handles.len() == points.len()` and `handles[i]` sits
/// over `points[i]` in x/z.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub(crate) points: Vec<Vec3>,
    /// Line loop shown until the shape is extruded
    pub(crate) outline: Option<MeshId>,
    pub(crate) solid: Option<MeshId>,
    pub(crate) handles: Vec<HandlePair>,
}

impl Shape {
    pub(crate) fn new(id: ShapeId, points: Vec<Vec3>, outline: Option<MeshId>) -> Self {
        Self {
            id,
            points,
            outline,
            solid: None,
            handles: Vec::new(),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn outline(&self) -> Option<MeshId> {
        self.outline
    }

    pub fn solid(&self) -> Option<MeshId> {
        self.solid
    }

    pub fn handles(&self) -> &[HandlePair] {
        &self.handles
    }

    pub fn is_extruded(&self) -> bool {
        self.solid.is_some()
    }

    /// Every scene mesh this shape owns.
    pub fn meshes(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.outline
            .into_iter()
            .chain(self.solid)
            .chain(self.handles.iter().flat_map(|pair| pair.meshes()))
    }

    pub(crate) fn bottom_ring(&self) -> Vec<Vec3> {
        self.handles.iter().map(|pair| pair.bottom.position).collect()
    }

    pub(crate) fn top_ring(&self) -> Vec<Vec3> {
        self.handles.iter().map(|pair| pair.top.position).collect()
    }
}
