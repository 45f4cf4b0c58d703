//! End-to-end editor scenarios
//!
//! Drives the editor through the pointer adapter with a real orbit camera,
//! so every click goes through screen ray -> scene pick -> editor.

use std::time::{Duration, Instant};

use glam::Vec3;
use prism_sketch_engine::camera::{OrbitCamera, raycast_to_ground};
use prism_sketch_engine::input::{MouseButton, PointerAdapter};
use prism_sketch_engine::scene::{MeshKind, Scene};
use prism_sketch_engine::sketch::{EditorMode, Shape, SketchConfig, SketchEditor};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 800;
const EPSILON: f32 = 1e-3;

/// Square drawn in every scenario, counter-clockwise seen from above.
const SQUARE: [(f32, f32); 4] = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];

fn approx_eq(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

struct Rig {
    scene: Scene,
    editor: SketchEditor,
    camera: OrbitCamera,
    pointer: PointerAdapter,
    now: Instant,
}

impl Rig {
    fn new() -> Self {
        let config = SketchConfig::default();
        Self {
            scene: Scene::new(config.ground_half_extent),
            editor: SketchEditor::new(config),
            camera: OrbitCamera::new(WIDTH as f32 / HEIGHT as f32),
            pointer: PointerAdapter::new(WIDTH, HEIGHT),
            now: Instant::now(),
        }
    }

    /// Pixel position of a world point.
    fn screen(&self, world: Vec3) -> (f32, f32) {
        let ndc = self.camera.view_projection_matrix().project_point3(world);
        (
            (ndc.x + 1.0) * 0.5 * WIDTH as f32,
            (1.0 - ndc.y) * 0.5 * HEIGHT as f32,
        )
    }

    /// Ground point under the pixel covering `world`.
    fn ground_under(&self, world: Vec3) -> Vec3 {
        let (x, y) = self.screen(world);
        let ray = self
            .camera
            .screen_ray(x, y, WIDTH as f32, HEIGHT as f32)
            .unwrap();
        raycast_to_ground(&ray).unwrap()
    }

    fn move_to(&mut self, world: Vec3) {
        let (x, y) = self.screen(world);
        self.pointer.cursor_moved(
            x,
            y,
            &mut self.editor,
            &mut self.scene,
            &mut self.camera,
            self.now,
        );
    }

    fn button(&mut self, button: MouseButton, pressed: bool) {
        self.pointer.button_changed(
            button,
            pressed,
            &mut self.editor,
            &mut self.scene,
            &mut self.camera,
            self.now,
        );
    }

    fn click(&mut self, button: MouseButton, world: Vec3) {
        self.move_to(world);
        self.button(button, true);
        self.button(button, false);
    }

    fn capture_lost(&mut self) {
        self.pointer
            .capture_lost(&mut self.editor, &mut self.scene, &mut self.camera, self.now);
    }

    fn sync_camera(&mut self) {
        PointerAdapter::sync_camera(self.editor.camera_locked(), &mut self.camera);
    }

    fn draw_square(&mut self) {
        for (x, z) in SQUARE {
            self.click(MouseButton::Left, Vec3::new(x, 0.0, z));
        }
        self.click(MouseButton::Right, Vec3::new(1.0, 0.0, 1.0));
    }

    fn extrude(&mut self) {
        self.editor.trigger_extrude(&mut self.scene, self.now);
        self.sync_camera();
    }

    fn shape(&self) -> &Shape {
        self.editor.store().iter().next().unwrap()
    }

    fn solid_vertex_count(&self) -> usize {
        let id = self.shape().solid().unwrap();
        match &self.scene.mesh(id).unwrap().kind {
            MeshKind::Solid(solid) => solid.vertex_count(),
            other => panic!("expected a solid, got {other:?}"),
        }
    }

    fn message(&self) -> Option<&str> {
        self.editor
            .presenter()
            .notification()
            .map(|n| n.message.as_str())
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_draw_square_and_close() {
    let mut rig = Rig::new();
    rig.draw_square();

    assert_eq!(rig.editor.store().len(), 1);
    let shape = rig.shape();
    assert_eq!(shape.points().len(), 4);
    assert!(!shape.is_extruded());
    for (point, (x, z)) in shape.points().iter().zip(SQUARE) {
        assert!(approx_eq(*point, Vec3::new(x, 0.0, z)), "{point:?}");
    }

    // Markers and preview are gone, only ground + outline remain
    assert!(rig.editor.current_polygon().is_empty());
    assert_eq!(rig.scene.live_mesh_count(), 2);
    assert!(rig.camera.is_control_attached());
}

#[test]
fn test_extrude_square() {
    let mut rig = Rig::new();
    rig.draw_square();
    rig.extrude();

    assert_eq!(rig.editor.mode(), EditorMode::ExtrudeShape);
    assert_eq!(rig.message(), Some("Shape(s) extruded successfully!"));
    assert!(rig.shape().is_extruded());
    assert_eq!(rig.solid_vertex_count(), 8);
    assert_eq!(rig.shape().handles().len(), 4);
    assert!(rig.shape().outline().is_none());

    // ground + solid + 8 handles
    assert_eq!(rig.scene.live_mesh_count(), 10);
}

#[test]
fn test_move_drag_shifts_points_and_handles() {
    let mut rig = Rig::new();
    rig.draw_square();
    rig.extrude();
    rig.editor.enter_move_mode(&mut rig.scene);

    let before: Vec<Vec3> = rig.shape().points().to_vec();
    let handles_before: Vec<(Vec3, Vec3)> = rig
        .shape()
        .handles()
        .iter()
        .map(|h| (h.bottom.position, h.top.position))
        .collect();

    // Grab the middle of the top face
    let grab = Vec3::new(1.0, 3.0, 1.0);
    let anchor = rig.ground_under(grab);
    rig.move_to(grab);
    rig.button(MouseButton::Left, true);
    assert!(rig.editor.is_dragging());
    assert!(!rig.camera.is_control_attached());

    let delta = Vec3::new(2.0, 0.0, -1.0);
    rig.move_to(anchor + delta);
    rig.button(MouseButton::Left, false);

    assert!(!rig.editor.is_dragging());
    assert!(rig.camera.is_control_attached());

    let shape = rig.shape();
    for (after, before) in shape.points().iter().zip(&before) {
        assert!(approx_eq(*after, *before + delta), "{after:?} vs {before:?}");
    }
    for (pair, (bottom, top)) in shape.handles().iter().zip(&handles_before) {
        assert!(approx_eq(pair.bottom.position, *bottom + delta));
        assert!(approx_eq(pair.top.position, *top + delta));
        assert_eq!(pair.top.position.y, top.y);
    }
    assert_eq!(rig.solid_vertex_count(), 8);
    assert!(!rig.editor.scene_is_fresh());
}

#[test]
fn test_extrude_without_shapes() {
    let mut rig = Rig::new();
    rig.extrude();

    assert_eq!(rig.message(), Some("No shapes to extrude!"));
    assert!(rig.editor.presenter().notification().unwrap().is_error);
    assert!(rig.editor.store().is_empty());
    assert_eq!(rig.scene.live_mesh_count(), 1);
    assert!(rig.camera.is_control_attached());
}

#[test]
fn test_edit_bottom_vertex_rebuilds_solid() {
    let mut rig = Rig::new();
    rig.draw_square();
    rig.extrude();
    rig.editor.enter_edit_vertex_mode(&mut rig.scene);

    let before: Vec<Vec3> = rig.shape().points().to_vec();

    // Corner nearest the camera, index 2 in drawing order
    rig.move_to(Vec3::new(2.0, 0.0, 2.0));
    rig.button(MouseButton::Left, true);
    assert!(rig.editor.is_vertex_editing());
    assert_eq!(rig.editor.selected_vertex().map(|v| v.index), Some(2));
    assert!(!rig.camera.is_control_attached());

    let target = Vec3::new(3.0, 0.0, 2.5);
    rig.move_to(target);
    rig.button(MouseButton::Left, false);

    assert!(!rig.editor.is_vertex_editing());
    assert!(rig.camera.is_control_attached());

    let points = rig.shape().points();
    assert!(approx_eq(points[2], target), "{:?}", points[2]);
    for i in [0, 1, 3] {
        assert_eq!(points[i], before[i]);
    }
    assert!(approx_eq(rig.shape().handles()[2].bottom.position, target));
    assert_eq!(rig.solid_vertex_count(), 8);
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_reset_leaves_only_ground() {
    let mut rig = Rig::new();
    rig.draw_square();
    rig.extrude();
    rig.click(MouseButton::Left, Vec3::new(-3.0, 0.0, -3.0));
    rig.editor.enter_edit_vertex_mode(&mut rig.scene);

    rig.editor.reset(&mut rig.scene, rig.now);
    rig.sync_camera();

    assert_eq!(rig.scene.live_mesh_count(), 1);
    assert!(rig.editor.store().is_empty());
    assert_eq!(rig.editor.mode(), EditorMode::Draw);
    assert!(rig.editor.scene_is_fresh());
    assert_eq!(rig.message(), Some("Scene has been reset."));
    assert_eq!(rig.editor.presenter().mode_text(), "Current Mode: Draw");
}

#[test]
fn test_drawing_after_extrude_starts_over() {
    let mut rig = Rig::new();
    rig.draw_square();
    rig.extrude();
    rig.editor.enter_draw_mode(&mut rig.scene);

    rig.click(MouseButton::Left, Vec3::new(-4.0, 0.0, 1.0));

    assert!(rig.editor.store().is_empty());
    assert_eq!(rig.editor.current_polygon().len(), 1);
    assert_eq!(rig.message(), Some("Scene reset successfully."));
    // ground + one marker
    assert_eq!(rig.scene.live_mesh_count(), 2);
}

#[test]
fn test_second_extrude_is_refused() {
    let mut rig = Rig::new();
    rig.draw_square();
    rig.extrude();
    rig.editor.enter_move_mode(&mut rig.scene);

    rig.extrude();
    assert_eq!(rig.message(), Some("Shapes already exists! Clear them first."));
    assert_eq!(rig.editor.mode(), EditorMode::Move);
    assert_eq!(rig.scene.live_mesh_count(), 10);
}

#[test]
fn test_capture_loss_commits_move_and_releases_camera() {
    let mut rig = Rig::new();
    rig.draw_square();
    rig.extrude();
    rig.editor.enter_move_mode(&mut rig.scene);

    let grab = Vec3::new(1.0, 3.0, 1.0);
    let anchor = rig.ground_under(grab);
    rig.move_to(grab);
    rig.button(MouseButton::Left, true);
    rig.move_to(anchor + Vec3::new(1.0, 0.0, 0.0));
    assert!(!rig.camera.is_control_attached());

    rig.capture_lost();

    assert!(!rig.editor.is_dragging());
    assert!(rig.camera.is_control_attached());
    assert!(rig.pointer.gesture().is_none());
    assert!(approx_eq(rig.shape().points()[0], Vec3::new(1.0, 0.0, 0.0)));

    // A stray release after the capture loss changes nothing
    rig.button(MouseButton::Left, false);
    assert!(approx_eq(rig.shape().points()[0], Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn test_mode_switch_mid_drag_releases_camera() {
    let mut rig = Rig::new();
    rig.draw_square();
    rig.extrude();
    rig.editor.enter_edit_vertex_mode(&mut rig.scene);

    rig.move_to(Vec3::new(2.0, 0.0, 2.0));
    rig.button(MouseButton::Left, true);
    assert!(!rig.camera.is_control_attached());

    rig.editor.enter_move_mode(&mut rig.scene);
    rig.sync_camera();

    assert!(!rig.editor.is_vertex_editing());
    assert!(rig.camera.is_control_attached());
}

#[test]
fn test_right_drag_pans_when_nothing_is_grabbed() {
    let mut rig = Rig::new();
    rig.draw_square();
    rig.extrude();
    rig.editor.enter_move_mode(&mut rig.scene);

    rig.move_to(Vec3::new(-5.0, 0.0, -5.0));
    rig.button(MouseButton::Right, true);
    assert!(rig.camera.is_active());

    rig.button(MouseButton::Right, false);
    assert!(!rig.camera.is_active());
    assert!(!rig.editor.is_dragging());
}

#[test]
fn test_notification_expires_after_delay() {
    let mut rig = Rig::new();
    rig.extrude();
    assert!(rig.message().is_some());

    rig.editor.tick(rig.now + Duration::from_millis(1500));
    assert!(rig.message().is_some());

    rig.editor.tick(rig.now + Duration::from_secs(2));
    assert!(rig.message().is_none());
}
