//! Sketch errors
//!
//! All of these are recovered inside the editor: logged, then shown as a
//! notification.

use thiserror::Error;

use crate::geometry::GeometryError;
use crate::scene::ShapeId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    /// Not enough shapes or points to do anything.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },

    /// The kernel rejected a shape.
    #[error("extrusion of {shape} failed: {source}")]
    ExtrusionFailure {
        shape: ShapeId,
        #[source]
        source: GeometryError,
    },

    /// A committed edit would leave a shape with unusable coordinates.
    #[error("invalid vertex state: {0}")]
    InvalidVertexState(String),

    #[error("unknown shape {0}")]
    UnknownShape(ShapeId),
}
