//! Prism Sketch Engine
//!
//! An interactive prism sketcher: click points on a ground plane to draw a
//! polygon, close it, extrude every closed polygon into a vertical prism,
//! then move whole prisms or drag their corner handles.
//!
//! # Modules
//!
//! - [`geometry`] - pure extrusion kernel (ring to triangulated prism)
//! - [`scene`] - mesh arena with picking, standing in for a render engine
//! - [`camera`] - orbit camera and ray casting
//! - [`input`] - raw mouse state and the pointer adapter
//! - [`render`] - wgpu shim that draws the scene arena
//! - [`sketch`] - editor state machine, shape store and presentation
//! - [`logging`] - tracing subscriber setup
//!
//! # Example
//!
//! ```ignore
//! use prism_sketch_engine::scene::Scene;
//! use prism_sketch_engine::sketch::{SketchConfig, SketchEditor};
//!
//! let config = SketchConfig::from_env();
//! let mut scene = Scene::new(config.ground_half_extent);
//! let mut editor = SketchEditor::new(config);
//!
//! editor.trigger_extrude(&mut scene, std::time::Instant::now());
//! assert_eq!(editor.presenter().notification().unwrap().message, "No shapes to extrude!");
//! ```

pub mod camera;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod render;
pub mod scene;

// Editor layer (located in src/sketch/ directory)
#[path = "../../src/sketch/mod.rs"]
pub mod sketch;

pub use camera::{OrbitCamera, Ray};
pub use geometry::{GeometryError, Solid, extrude};
pub use input::{PointerAdapter, PointerTarget};
pub use scene::{MeshId, Scene};
pub use sketch::{EditorMode, SketchConfig, SketchEditor};
