//! Geometry Kernel
//!
//! Pure functions that turn a polygon ring into a closed prism mesh.
//! Nothing in here touches the scene; callers hand the resulting [`Solid`]
//! to [`crate::scene::Scene`] and own the returned handle.
//!
//! - [`extrude`] - ring + depth -> prism with flat caps
//! - [`rebuild_from_handles`] - independent bottom/top rings -> prism

pub mod extrude;

pub use extrude::{extrude, rebuild_from_handles, ring_signed_area, Solid, MIN_RING_POINTS};

use thiserror::Error;

/// Errors raised while building a solid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The ring is too short to enclose an area.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },

    /// Bottom and top rings have a different number of vertices.
    #[error("ring length mismatch: bottom has {bottom} points, top has {top}")]
    RingLengthMismatch { bottom: usize, top: usize },

    /// A ring vertex contains NaN or an infinite component.
    #[error("non-finite coordinate at ring index {index}")]
    NonFiniteCoordinate { index: usize },

    /// Extrusion depth is zero, negative or not finite.
    #[error("invalid extrusion depth: {0}")]
    InvalidDepth(f32),
}
