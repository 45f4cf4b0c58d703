//! Render Module
//!
//! - [`geometry`] - scene to vertex/index arrays
//! - [`uniforms`] - camera and light uniforms
//! - [`gpu`] - wgpu device, surface and pipelines

pub mod geometry;
pub mod gpu;
pub mod uniforms;

pub use geometry::{SceneGeometry, Vertex};
pub use gpu::{RenderError, SketchGpu};
pub use uniforms::SketchUniforms;
