//! Pick tags
//!
//! Every scene mesh carries a tag set at creation so a pick result says
//! what was hit without inspecting mesh names.

use std::fmt;

/// Stable identifier of a shape in the sketch store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape{}", self.0)
    }
}

/// Which ring of an extruded solid a vertex handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleLevel {
    /// On the ground (y = 0)
    Bottom,
    /// At the extrusion height
    Top,
}

impl HandleLevel {
    /// The other handle of the same pair.
    pub fn partner(self) -> Self {
        match self {
            HandleLevel::Bottom => HandleLevel::Top,
            HandleLevel::Top => HandleLevel::Bottom,
        }
    }
}

/// Back-reference to a single vertex handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexRef {
    pub shape: ShapeId,
    /// Index into the shape's point ring
    pub index: usize,
    pub level: HandleLevel,
}

impl VertexRef {
    pub fn new(shape: ShapeId, index: usize, level: HandleLevel) -> Self {
        Self { shape, index, level }
    }
}

/// What a scene mesh represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickTag {
    Ground,
    /// Extruded prism of a shape
    Solid(ShapeId),
    /// Sphere marking one ring vertex of a solid
    VertexHandle(VertexRef),
    /// Closed line loop of a not yet extruded shape
    Outline(ShapeId),
    /// Sphere at a point of the polygon being drawn
    Marker,
    /// Open line strip through the points drawn so far
    Preview,
}
