//! Camera Module
//!
//! Orbit camera and raycasting. Window-system agnostic: cursor positions come
//! in as plain floats and rays come out in world space.

pub mod orbit;
pub mod raycast;

pub use orbit::{OrbitCamera, OrbitMouseButton};
pub use raycast::{Ray, raycast_to_ground, raycast_to_plane};
