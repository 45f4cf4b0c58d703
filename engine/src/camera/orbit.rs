//! Orbit Camera
//!
//! Spherical-coordinate camera looking at the sketch ground. It turns
//! cursor positions into world-space pointer rays and can be detached from
//! user control while a shape or vertex handle is being dragged.
//!
//! Controls:
//! - Middle mouse drag: Orbit (rotate around target)
//! - Right mouse drag: Pan (translate target point)
//! - Scroll wheel: Zoom (change distance from target)

use glam::{Mat4, Vec3};

use super::raycast::Ray;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default horizontal angle in degrees.
const DEFAULT_AZIMUTH: f32 = 30.0;
/// Default vertical angle in degrees.
const DEFAULT_ELEVATION: f32 = 45.0;
/// Default distance from target; frames the whole ground.
const DEFAULT_DISTANCE: f32 = 18.0;
/// Default field of view in degrees.
const DEFAULT_FOV: f32 = 45.0;
const DEFAULT_NEAR: f32 = 0.05;
const DEFAULT_FAR: f32 = 200.0;

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 80.0;

/// Elevation limits in degrees. Negative angles would look from under the ground.
const MIN_ELEVATION: f32 = 5.0;
const MAX_ELEVATION: f32 = 89.0;

/// Degrees per pixel of mouse movement.
const ORBIT_SENSITIVITY: f32 = 0.3;
/// Multiplied by distance for depth-proportional panning.
const PAN_SENSITIVITY: f32 = 0.002;
/// Fraction of the distance removed per scroll tick.
const SCROLL_FACTOR: f32 = 0.1;

// ============================================================================
// MOUSE BUTTON ENUM
// ============================================================================

/// Mouse buttons that drive the orbit camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitMouseButton {
    /// Orbit around the target.
    Middle,
    /// Pan the target.
    Right,
}

// ============================================================================
// ORBIT CAMERA
// ============================================================================

/// Orbit camera over the sketch ground. Y is up.
///
/// While control is detached, button and scroll input is ignored so a
/// shape drag never rotates the view underneath the pointer.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal angle in degrees (wraps around).
    pub azimuth: f32,
    /// Vertical angle in degrees.
    pub elevation: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// The point the camera orbits around.
    pub target: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    control_attached: bool,
    is_orbiting: bool,
    is_panning: bool,
    last_mouse: [f32; 2],
}

impl OrbitCamera {
    /// Create a camera looking down at the origin, with control attached.
    pub fn new(aspect: f32) -> Self {
        Self {
            azimuth: DEFAULT_AZIMUTH,
            elevation: DEFAULT_ELEVATION,
            distance: DEFAULT_DISTANCE,
            target: Vec3::ZERO,
            aspect,
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            control_attached: true,
            is_orbiting: false,
            is_panning: false,
            last_mouse: [0.0, 0.0],
        }
    }

    // ========================================================================
    // MATRICES
    // ========================================================================

    /// Eye position derived from (azimuth, elevation, distance).
    pub fn eye_position(&self) -> Vec3 {
        let azim_rad = self.azimuth.to_radians();
        let elev_rad = self.elevation.to_radians();

        let cos_elev = elev_rad.cos();
        let offset = Vec3::new(
            self.distance * cos_elev * azim_rad.sin(),
            self.distance * elev_rad.sin(),
            self.distance * cos_elev * azim_rad.cos(),
        );

        self.target + offset
    }

    /// Unit vector from the eye toward the target.
    pub fn view_direction(&self) -> Vec3 {
        (self.target - self.eye_position()).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Right-handed perspective with wgpu's [0, 1] depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a cursor position in physical pixels.
    ///
    /// `(0, 0)` is the top-left corner of the viewport.
    pub fn screen_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Option<Ray> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        let ndc_x = 2.0 * x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height;

        let inv_vp = self.view_projection_matrix().inverse();
        let near = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        let direction = far - near;
        if !direction.is_finite() || direction.length_squared() == 0.0 {
            return None;
        }
        Some(Ray::new(near, direction))
    }

    // ========================================================================
    // CONTROL ATTACHMENT
    // ========================================================================

    /// Give orbit/pan/zoom back to the user.
    ///
    /// Returns `false` if control was already attached.
    pub fn attach_control(&mut self) -> bool {
        if self.control_attached {
            return false;
        }
        self.control_attached = true;
        true
    }

    /// Take orbit/pan/zoom away from the user and stop any active drag.
    ///
    /// Returns `false` if control was already detached.
    pub fn detach_control(&mut self) -> bool {
        if !self.control_attached {
            return false;
        }
        self.control_attached = false;
        self.is_orbiting = false;
        self.is_panning = false;
        true
    }

    pub fn is_control_attached(&self) -> bool {
        self.control_attached
    }

    // ========================================================================
    // INPUT HANDLING
    // ========================================================================

    /// Start or stop an orbit/pan drag. Presses are ignored while detached.
    pub fn handle_mouse_drag(&mut self, button: OrbitMouseButton, pressed: bool) {
        if pressed && !self.control_attached {
            return;
        }
        match button {
            OrbitMouseButton::Middle => self.is_orbiting = pressed,
            OrbitMouseButton::Right => self.is_panning = pressed,
        }
    }

    /// Call on every cursor move. Always records the position for the next delta.
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        let dx = x - self.last_mouse[0];
        let dy = y - self.last_mouse[1];

        if self.is_orbiting {
            self.azimuth += dx * ORBIT_SENSITIVITY;
            self.elevation =
                (self.elevation - dy * ORBIT_SENSITIVITY).clamp(MIN_ELEVATION, MAX_ELEVATION);
        }

        if self.is_panning {
            self.pan(
                -dx * PAN_SENSITIVITY * self.distance,
                dy * PAN_SENSITIVITY * self.distance,
            );
        }

        self.last_mouse = [x, y];
    }

    /// Multiplicative zoom; positive delta zooms in.
    pub fn handle_scroll(&mut self, delta: f32) {
        if !self.control_attached {
            return;
        }
        self.distance *= 1.0 - delta * SCROLL_FACTOR;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Move the target along the camera's local right/up axes.
    fn pan(&mut self, dx: f32, dy: f32) {
        let forward = -self.view_direction();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        self.target += right * dx + up * dy;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// `true` while orbiting or panning.
    pub fn is_active(&self) -> bool {
        self.is_orbiting || self.is_panning
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

// ============================================================================
// TESTS
// ============================================================================
