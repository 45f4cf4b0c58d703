//! Uniform buffer layout shared with `shaders/sketch.wgsl`.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::camera::OrbitCamera;

/// Direction toward the key light.
const LIGHT_DIR: [f32; 3] = [0.4, 0.8, 0.3];
const AMBIENT: f32 = 0.3;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SketchUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub light_dir: [f32; 3],
    pub ambient: f32,
}

static_assertions::assert_eq_size!(SketchUniforms, [u8; 80]);

impl Default for SketchUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            light_dir: Vec3::from(LIGHT_DIR).normalize().to_array(),
            ambient: AMBIENT,
        }
    }
}

impl SketchUniforms {
    pub fn from_camera(camera: &OrbitCamera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            ..Self::default()
        }
    }
}
