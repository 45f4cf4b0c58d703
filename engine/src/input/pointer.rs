//! Pointer Adapter
//!
//! Turns raw button/cursor events into [`PointerEvent`]s carrying the picked
//! entity and world points, forwards them to a [`PointerTarget`], and keeps
//! the orbit camera's attachment in line with what the target asks for.
//!
//! Gesture rules:
//! - the left or right button that starts a gesture owns it until released
//! - other buttons pressed during a gesture are not forwarded
//! - the middle button only ever drives the camera
//! - attach/detach calls are issued only on an actual state change

use std::time::Instant;

use glam::Vec3;

use super::mouse::{ButtonState, MouseButton, Position};
use crate::camera::{OrbitCamera, OrbitMouseButton, Ray};
use crate::scene::{PickTag, Scene, ShapeId, VertexRef};

// ============================================================================
// EVENT TYPES
// ============================================================================

/// Buttons forwarded to the sketch editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button
    Primary,
    /// Right button
    Secondary,
}

impl PointerButton {
    pub fn from_mouse(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(PointerButton::Primary),
            MouseButton::Right => Some(PointerButton::Secondary),
            MouseButton::Middle | MouseButton::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// What the pointer ray hit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitEntity {
    Ground,
    Solid(ShapeId),
    VertexHandle(VertexRef),
    None,
}

impl From<PickTag> for HitEntity {
    fn from(tag: PickTag) -> Self {
        match tag {
            PickTag::Ground => HitEntity::Ground,
            PickTag::Solid(shape) => HitEntity::Solid(shape),
            PickTag::VertexHandle(vertex) => HitEntity::VertexHandle(vertex),
            PickTag::Outline(_) | PickTag::Marker | PickTag::Preview => HitEntity::None,
        }
    }
}

/// Everything the editor needs to know about one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub hit: HitEntity,
    /// Hit point on the picked entity
    pub world_point: Option<Vec3>,
    /// Where the ray meets the ground, ignoring solids and handles
    pub ground_point: Option<Vec3>,
    pub ray: Option<Ray>,
    /// Camera viewing direction (eye toward target)
    pub view_dir: Vec3,
    /// Gesture button, or `None` for hover moves
    pub button: Option<PointerButton>,
}

impl PointerInput {
    /// A sample that hit nothing.
    pub fn empty() -> Self {
        Self {
            hit: HitEntity::None,
            world_point: None,
            ground_point: None,
            ray: None,
            view_dir: Vec3::NEG_Y,
            button: None,
        }
    }

    /// A sample hitting the ground at `point`.
    pub fn on_ground(point: Vec3) -> Self {
        Self {
            hit: HitEntity::Ground,
            world_point: Some(point),
            ground_point: Some(point),
            ..Self::empty()
        }
    }

    /// A sample hitting a solid at `point`, over the ground at `ground`.
    pub fn on_solid(shape: ShapeId, point: Vec3, ground: Vec3) -> Self {
        Self {
            hit: HitEntity::Solid(shape),
            world_point: Some(point),
            ground_point: Some(ground),
            ..Self::empty()
        }
    }

    /// A sample hitting a vertex handle at `point`.
    pub fn on_handle(vertex: VertexRef, point: Vec3) -> Self {
        Self {
            hit: HitEntity::VertexHandle(vertex),
            world_point: Some(point),
            ground_point: Some(Vec3::new(point.x, 0.0, point.z)),
            ..Self::empty()
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_ray(mut self, ray: Ray) -> Self {
        self.view_dir = ray.direction;
        self.ray = Some(ray);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub input: PointerInput,
}

impl PointerEvent {
    pub fn down(input: PointerInput) -> Self {
        Self {
            phase: PointerPhase::Down,
            input,
        }
    }

    pub fn moved(input: PointerInput) -> Self {
        Self {
            phase: PointerPhase::Move,
            input,
        }
    }

    pub fn up(input: PointerInput) -> Self {
        Self {
            phase: PointerPhase::Up,
            input,
        }
    }
}

// ============================================================================
// TARGET TRAIT
// ============================================================================

/// Receiver of pointer events, usually the sketch editor.
pub trait PointerTarget {
    fn pointer_event(&mut self, event: PointerEvent, scene: &mut Scene, now: Instant);

    /// The gesture ended without a release (capture lost).
    fn pointer_cancel(&mut self, scene: &mut Scene, now: Instant);

    /// `true` while the camera must not react to the user.
    fn camera_locked(&self) -> bool;
}

// ============================================================================
// ADAPTER
// ============================================================================

#[derive(Debug, Clone)]
pub struct PointerAdapter {
    cursor: Position,
    viewport: [f32; 2],
    buttons: ButtonState,
    gesture: Option<PointerButton>,
}

impl PointerAdapter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cursor: Position::default(),
            viewport: [width as f32, height as f32],
            buttons: ButtonState::new(),
            gesture: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = [width as f32, height as f32];
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Button owning the current gesture, if any.
    pub fn gesture(&self) -> Option<PointerButton> {
        self.gesture
    }

    /// Pick under the current cursor and package the result.
    pub fn sample(
        &self,
        scene: &Scene,
        camera: &OrbitCamera,
        button: Option<PointerButton>,
    ) -> PointerInput {
        let ray = camera.screen_ray(self.cursor.x, self.cursor.y, self.viewport[0], self.viewport[1]);
        let hit = ray.as_ref().and_then(|r| scene.pick(r));

        PointerInput {
            hit: hit.map_or(HitEntity::None, |h| h.tag.into()),
            world_point: hit.map(|h| h.point),
            ground_point: ray.as_ref().and_then(|r| scene.pick_ground(r)),
            ray,
            view_dir: camera.view_direction(),
            button,
        }
    }

    pub fn cursor_moved<T: PointerTarget>(
        &mut self,
        x: f32,
        y: f32,
        target: &mut T,
        scene: &mut Scene,
        camera: &mut OrbitCamera,
        now: Instant,
    ) {
        self.cursor = Position::new(x, y);
        camera.handle_mouse_move(x, y);

        let input = self.sample(scene, camera, self.gesture);
        target.pointer_event(PointerEvent::moved(input), scene, now);
        Self::sync_camera(target.camera_locked(), camera);
    }

    pub fn button_changed<T: PointerTarget>(
        &mut self,
        button: MouseButton,
        pressed: bool,
        target: &mut T,
        scene: &mut Scene,
        camera: &mut OrbitCamera,
        now: Instant,
    ) {
        self.buttons.set(button, pressed);

        if button == MouseButton::Middle {
            camera.handle_mouse_drag(OrbitMouseButton::Middle, pressed);
            return;
        }
        if button == MouseButton::Right && !pressed {
            camera.handle_mouse_drag(OrbitMouseButton::Right, false);
        }

        let Some(pointer_button) = PointerButton::from_mouse(button) else {
            return;
        };

        if pressed {
            if self.gesture.is_some() {
                return;
            }
            self.gesture = Some(pointer_button);
            let input = self.sample(scene, camera, Some(pointer_button));
            target.pointer_event(PointerEvent::down(input), scene, now);
            Self::sync_camera(target.camera_locked(), camera);

            // Right-drag pans only when the press did not start an edit.
            if pointer_button == PointerButton::Secondary && camera.is_control_attached() {
                camera.handle_mouse_drag(OrbitMouseButton::Right, true);
            }
        } else {
            if self.gesture != Some(pointer_button) {
                return;
            }
            self.gesture = None;
            let input = self.sample(scene, camera, Some(pointer_button));
            target.pointer_event(PointerEvent::up(input), scene, now);
            Self::sync_camera(target.camera_locked(), camera);
        }
    }

    pub fn scrolled(&self, delta: f32, camera: &mut OrbitCamera) {
        camera.handle_scroll(delta);
    }

    /// Pointer left the window or focus was lost.
    pub fn capture_lost<T: PointerTarget>(
        &mut self,
        target: &mut T,
        scene: &mut Scene,
        camera: &mut OrbitCamera,
        now: Instant,
    ) {
        self.buttons.reset();
        camera.handle_mouse_drag(OrbitMouseButton::Middle, false);
        camera.handle_mouse_drag(OrbitMouseButton::Right, false);

        if self.gesture.take().is_some() {
            target.pointer_cancel(scene, now);
        }
        Self::sync_camera(target.camera_locked(), camera);
    }

    /// Bring the camera in line with the target's lock request.
    pub fn sync_camera(locked: bool, camera: &mut OrbitCamera) {
        if locked && camera.is_control_attached() {
            camera.detach_control();
        } else if !locked && !camera.is_control_attached() {
            camera.attach_control();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
