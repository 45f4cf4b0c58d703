//! Input Module
//!
//! Platform-agnostic mouse handling. The binary translates winit events
//! into calls on [`PointerAdapter`], which picks against the scene and
//! forwards [`PointerEvent`]s to the sketch editor.

pub mod mouse;
pub mod pointer;

pub use mouse::{ButtonState, MouseButton, Position};
pub use pointer::{
    HitEntity, PointerAdapter, PointerButton, PointerEvent, PointerInput, PointerPhase,
    PointerTarget,
};
