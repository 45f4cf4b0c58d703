//! Sketch Module
//!
//! The interactive prism sketcher: draw a polygon on the ground, close it,
//! extrude it into a solid, then move the solid or drag its vertices.
//!
//! - [`editor`] - the modal state machine
//! - [`store`] - completed shapes and the meshes they own
//! - [`presentation`] - mode indicator, notifications, cursor
//! - [`config`] - tunables loaded from `SKETCH_CONFIG`

pub mod config;
pub mod editor;
pub mod error;
pub mod mode;
pub mod presentation;
pub mod shape;
pub mod store;

pub use config::{ConfigError, SketchConfig, VertexPlacement};
pub use editor::SketchEditor;
pub use error::SketchError;
pub use mode::EditorMode;
pub use presentation::{CursorStyle, Notification, Presenter, format_mode_label};
pub use shape::{Handle, HandlePair, Shape};
pub use store::{ExtrusionSummary, ShapeStore};
