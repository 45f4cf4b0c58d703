//! Sketch Editor
//!
//! The modal controller. Owns the in-progress polygon, the shape store and
//! the presenter, interprets pointer events according to the current mode,
//! and decides when the camera must be locked.
//!
//! Transitions happen only through the command methods
//! ([`SketchEditor::enter_draw_mode`] and friends). Leaving a mode ends any
//! gesture in flight: an active move is committed, a vertex selection is
//! dropped.

use std::time::{Duration, Instant};

use glam::Vec3;
use tracing::{debug, error, info, warn};

use super::config::{SketchConfig, VertexPlacement};
use super::mode::EditorMode;
use super::presentation::{CursorStyle, Presenter};
use super::store::{ExtrusionSummary, ShapeStore};
use crate::input::{HitEntity, PointerButton, PointerEvent, PointerInput, PointerPhase, PointerTarget};
use crate::scene::{MeshId, PickTag, Scene, ShapeId, VertexRef};

// ============================================================================
// MESSAGES
// ============================================================================

pub const MSG_SCENE_RESET_ON_DRAW: &str = "Scene reset successfully.";
pub const MSG_SCENE_RESET: &str = "Scene has been reset.";
pub const MSG_SHAPES_EXIST: &str = "Shapes already exists! Clear them first.";
pub const MSG_NO_SHAPES: &str = "No shapes to extrude!";
pub const MSG_INSUFFICIENT_POINTS: &str = "Insufficient points for extrusion.";
pub const MSG_EXTRUDED: &str = "Shape(s) extruded successfully!";
pub const MSG_EXTRUSION_FAILED: &str = "Extrusion failed!";
pub const MSG_NOTHING_TO_EDIT: &str = "No extruded shape to move or edit.";

// ============================================================================
// EDITOR
// ============================================================================

#[derive(Debug)]
pub struct SketchEditor {
    config: SketchConfig,
    mode: EditorMode,
    previous_mode: EditorMode,

    /// Points of the polygon being drawn, y = 0
    current_polygon: Vec<Vec3>,
    /// One marker sphere per drawn point
    markers: Vec<MeshId>,
    /// Open line through the drawn points
    preview_line: Option<MeshId>,

    store: ShapeStore,
    presenter: Presenter,

    is_dragging: bool,
    is_vertex_editing: bool,
    /// Last ground point of the active move
    drag_anchor: Option<Vec3>,
    /// Translation applied to the visuals since the move started
    drag_offset: Vec3,
    selected_shape: Option<ShapeId>,
    selected_vertex: Option<VertexRef>,

    extrusion_height: f32,
    /// `false` once something has been extruded or edited since the last reset
    scene_is_fresh: bool,
}

impl SketchEditor {
    pub fn new(config: SketchConfig) -> Self {
        let presenter = Presenter::new(Duration::from_secs_f32(
            config.notification_duration_secs.max(0.0),
        ));
        Self {
            extrusion_height: config.extrusion_height,
            config,
            mode: EditorMode::Draw,
            previous_mode: EditorMode::Draw,
            current_polygon: Vec::new(),
            markers: Vec::new(),
            preview_line: None,
            store: ShapeStore::new(),
            presenter,
            is_dragging: false,
            is_vertex_editing: false,
            drag_anchor: None,
            drag_offset: Vec3::ZERO,
            selected_shape: None,
            selected_vertex: None,
            scene_is_fresh: true,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn previous_mode(&self) -> EditorMode {
        self.previous_mode
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn current_polygon(&self) -> &[Vec3] {
        &self.current_polygon
    }

    pub fn markers(&self) -> &[MeshId] {
        &self.markers
    }

    pub fn preview_line(&self) -> Option<MeshId> {
        self.preview_line
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_vertex_editing(&self) -> bool {
        self.is_vertex_editing
    }

    pub fn selected_shape(&self) -> Option<ShapeId> {
        self.selected_shape
    }

    pub fn selected_vertex(&self) -> Option<VertexRef> {
        self.selected_vertex
    }

    pub fn extrusion_height(&self) -> f32 {
        self.extrusion_height
    }

    pub fn scene_is_fresh(&self) -> bool {
        self.scene_is_fresh
    }

    /// The camera must ignore the user while anything is being dragged.
    pub fn camera_locked(&self) -> bool {
        self.is_dragging || self.is_vertex_editing
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    pub fn enter_draw_mode(&mut self, scene: &mut Scene) {
        self.set_mode(EditorMode::Draw, scene);
    }

    pub fn enter_move_mode(&mut self, scene: &mut Scene) {
        self.set_mode(EditorMode::Move, scene);
    }

    pub fn enter_edit_vertex_mode(&mut self, scene: &mut Scene) {
        self.set_mode(EditorMode::EditVertex, scene);
    }

    /// Extrude every closed shape and switch to ExtrudeShape.
    ///
    /// Refused while the scene still holds earlier work.
    pub fn trigger_extrude(&mut self, scene: &mut Scene, now: Instant) {
        if !self.scene_is_fresh {
            self.presenter.notify(MSG_SHAPES_EXIST, true, now);
            return;
        }

        self.set_mode(EditorMode::ExtrudeShape, scene);

        if self.store.is_empty() {
            self.presenter.notify(MSG_NO_SHAPES, true, now);
            return;
        }

        match self
            .store
            .extrude_all(self.extrusion_height, self.config.handle_diameter, scene)
        {
            Ok(summary) => self.report_extrusion(&summary, now),
            Err(err) => {
                error!(error = %err, "extrusion failed");
                self.presenter.notify(MSG_EXTRUSION_FAILED, true, now);
            }
        }
        self.scene_is_fresh = false;
    }

    /// Dispose everything and go back to Draw.
    pub fn reset(&mut self, scene: &mut Scene, now: Instant) {
        self.clear_gesture();
        self.store.reset(scene);
        self.clear_drawing(scene);
        self.scene_is_fresh = true;

        info!("scene reset");
        self.presenter.notify(MSG_SCENE_RESET, false, now);
        self.set_mode(EditorMode::Draw, scene);
    }

    /// Advance presentation timers.
    pub fn tick(&mut self, now: Instant) {
        self.presenter.tick(now);
    }

    fn set_mode(&mut self, mode: EditorMode, scene: &mut Scene) {
        self.end_gesture(scene);
        self.presenter.set_cursor(CursorStyle::Default);

        self.previous_mode = self.mode;
        self.mode = mode;
        self.presenter.set_mode_indicator(mode);
        info!(from = %self.previous_mode, to = %mode, "mode changed");
    }

    fn report_extrusion(&mut self, summary: &ExtrusionSummary, now: Instant) {
        for failure in &summary.failures {
            error!(error = %failure, "shape extrusion failed");
        }

        if !summary.failures.is_empty() {
            self.presenter.notify(MSG_EXTRUSION_FAILED, true, now);
        } else if !summary.skipped.is_empty() {
            self.presenter.notify(MSG_INSUFFICIENT_POINTS, true, now);
        } else {
            self.presenter.notify(MSG_EXTRUDED, false, now);
        }
    }

    // ========================================================================
    // POINTER HANDLING
    // ========================================================================

    pub fn handle_pointer(&mut self, event: PointerEvent, scene: &mut Scene, now: Instant) {
        match event.phase {
            PointerPhase::Down => self.pointer_down(&event.input, scene, now),
            PointerPhase::Move => self.pointer_move(&event.input, scene),
            PointerPhase::Up => self.end_gesture(scene),
        }
    }

    /// The pointer was captured away mid-gesture; finish as if released.
    pub fn pointer_cancel(&mut self, scene: &mut Scene) {
        if self.camera_locked() {
            debug!("pointer capture lost");
        }
        self.end_gesture(scene);
    }

    fn pointer_down(&mut self, input: &PointerInput, scene: &mut Scene, now: Instant) {
        match self.mode {
            EditorMode::Draw => self.draw_down(input, scene, now),
            EditorMode::Move | EditorMode::EditVertex if self.store.is_empty() => {
                self.presenter.notify(MSG_NOTHING_TO_EDIT, true, now);
            }
            EditorMode::Move => {
                if let (HitEntity::Solid(shape), Some(PointerButton::Primary)) = (input.hit, input.button) {
                    self.begin_move(shape, input);
                }
            }
            EditorMode::EditVertex => {
                if let (HitEntity::VertexHandle(vertex), Some(PointerButton::Primary)) =
                    (input.hit, input.button)
                {
                    self.begin_vertex_edit(vertex);
                }
            }
            EditorMode::ExtrudeShape => {}
        }
    }

    fn pointer_move(&mut self, input: &PointerInput, scene: &mut Scene) {
        if self.is_dragging {
            self.drag_shape(input, scene);
        } else if self.is_vertex_editing {
            self.drag_vertex(input, scene);
        } else {
            self.update_hover_cursor(input);
        }
    }

    fn update_hover_cursor(&mut self, input: &PointerInput) {
        let cursor = match (self.mode, input.hit) {
            (EditorMode::Move, HitEntity::Solid(_)) => CursorStyle::Grab,
            (EditorMode::EditVertex, HitEntity::VertexHandle(_)) => CursorStyle::Grab,
            _ => CursorStyle::Default,
        };
        self.presenter.set_cursor(cursor);
    }

    // ------------------------------------------------------------------------
    // Draw
    // ------------------------------------------------------------------------

    fn draw_down(&mut self, input: &PointerInput, scene: &mut Scene, now: Instant) {
        if input.hit != HitEntity::Ground {
            return;
        }
        let Some(point) = input.ground_point.or(input.world_point) else {
            return;
        };

        if !self.scene_is_fresh {
            self.reset(scene, now);
            self.presenter.notify(MSG_SCENE_RESET_ON_DRAW, false, now);
        }
        self.scene_is_fresh = true;

        match input.button {
            Some(PointerButton::Primary) => self.append_point(point, scene),
            Some(PointerButton::Secondary) => self.close_polygon(scene),
            None => {}
        }
    }

    fn append_point(&mut self, point: Vec3, scene: &mut Scene) {
        let point = Vec3::new(point.x, 0.0, point.z);
        self.current_polygon.push(point);

        self.markers.push(scene.create_sphere(
            point,
            self.config.marker_diameter,
            PickTag::Marker,
            false,
        ));

        if let Some(old) = self.preview_line.take() {
            scene.dispose(old);
        }
        if self.current_polygon.len() >= 2 {
            self.preview_line = Some(scene.create_line_strip(
                self.current_polygon.clone(),
                false,
                PickTag::Preview,
            ));
        }
        debug!(points = self.current_polygon.len(), "point added");
    }

    fn close_polygon(&mut self, scene: &mut Scene) {
        if self.store.close_current_polygon(&self.current_polygon, scene).is_some() {
            self.clear_drawing(scene);
        }
    }

    fn clear_drawing(&mut self, scene: &mut Scene) {
        for marker in self.markers.drain(..) {
            scene.dispose(marker);
        }
        if let Some(line) = self.preview_line.take() {
            scene.dispose(line);
        }
        self.current_polygon.clear();
    }

    // ------------------------------------------------------------------------
    // Move
    // ------------------------------------------------------------------------

    fn begin_move(&mut self, shape: ShapeId, input: &PointerInput) {
        let Some(anchor) = input.ground_point.or(input.world_point) else {
            return;
        };
        self.selected_shape = Some(shape);
        self.drag_anchor = Some(anchor);
        self.drag_offset = Vec3::ZERO;
        self.is_dragging = true;
        self.presenter.set_cursor(CursorStyle::Grabbing);
        debug!(%shape, "move started");
    }

    fn drag_shape(&mut self, input: &PointerInput, scene: &mut Scene) {
        let (Some(shape), Some(anchor), Some(current)) =
            (self.selected_shape, self.drag_anchor, input.ground_point)
        else {
            return;
        };

        let delta = Vec3::new(current.x - anchor.x, 0.0, current.z - anchor.z);
        if let Err(err) = self.store.translate_shape(shape, delta, scene) {
            warn!(error = %err, "drag target vanished");
            self.clear_gesture();
            return;
        }
        self.drag_offset += delta;
        self.drag_anchor = Some(current);
    }

    fn finish_move(&mut self, scene: &mut Scene) {
        let offset = self.drag_offset;
        self.is_dragging = false;
        self.drag_anchor = None;
        self.drag_offset = Vec3::ZERO;

        let Some(shape) = self.selected_shape.take() else {
            return;
        };

        match self.store.commit_translation(shape, offset, scene) {
            Ok(()) => {
                debug!(%shape, dx = offset.x, dz = offset.z, "move committed");
                self.scene_is_fresh = false;
            }
            Err(err) => {
                error!(error = %err, "move rejected");
                if let Err(err) = self.store.discard_translation(shape, scene) {
                    warn!(error = %err, "rollback failed");
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Edit vertex
    // ------------------------------------------------------------------------

    fn begin_vertex_edit(&mut self, vertex: VertexRef) {
        self.selected_vertex = Some(vertex);
        self.selected_shape = Some(vertex.shape);
        self.is_vertex_editing = true;
        self.presenter.set_cursor(CursorStyle::Grabbing);
        debug!(shape = %vertex.shape, index = vertex.index, level = ?vertex.level, "vertex edit started");
    }

    fn drag_vertex(&mut self, input: &PointerInput, scene: &mut Scene) {
        let Some(vertex) = self.selected_vertex else {
            return;
        };
        let placement = self.config.vertex_placement;
        let Some(target) = self.vertex_target(vertex, placement, input) else {
            return;
        };

        if let Err(err) = self.store.move_vertex(vertex, target, placement, scene) {
            warn!(error = %err, "vertex edit rejected");
        }
    }

    /// Where the dragged handle should go for this pointer sample.
    fn vertex_target(
        &self,
        vertex: VertexRef,
        placement: VertexPlacement,
        input: &PointerInput,
    ) -> Option<Vec3> {
        match placement {
            VertexPlacement::GroundPlane => input.ground_point,
            VertexPlacement::ViewPlane => {
                let handle = self
                    .store
                    .get(vertex.shape)?
                    .handles()
                    .get(vertex.index)?
                    .get(vertex.level)
                    .position;
                let ray = input.ray?;
                let t = ray.intersect_plane(handle, -input.view_dir)?;
                Some(ray.at(t))
            }
        }
    }

    fn finish_vertex_edit(&mut self) {
        self.is_vertex_editing = false;
        self.selected_vertex = None;
        self.selected_shape = None;
        self.scene_is_fresh = false;
    }

    // ------------------------------------------------------------------------
    // Gesture lifetime
    // ------------------------------------------------------------------------

    /// Commit whatever is in flight and release the camera.
    fn end_gesture(&mut self, scene: &mut Scene) {
        if self.is_dragging {
            self.finish_move(scene);
            self.presenter.set_cursor(CursorStyle::Default);
        }
        if self.is_vertex_editing {
            self.finish_vertex_edit();
            self.presenter.set_cursor(CursorStyle::Default);
        }
    }

    /// Forget the gesture without committing anything.
    fn clear_gesture(&mut self) {
        self.is_dragging = false;
        self.is_vertex_editing = false;
        self.drag_anchor = None;
        self.drag_offset = Vec3::ZERO;
        self.selected_shape = None;
        self.selected_vertex = None;
        self.presenter.set_cursor(CursorStyle::Default);
    }
}

impl Default for SketchEditor {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}

impl PointerTarget for SketchEditor {
    fn pointer_event(&mut self, event: PointerEvent, scene: &mut Scene, now: Instant) {
        self.handle_pointer(event, scene, now);
    }

    fn pointer_cancel(&mut self, scene: &mut Scene, _now: Instant) {
        SketchEditor::pointer_cancel(self, scene);
    }

    fn camera_locked(&self) -> bool {
        SketchEditor::camera_locked(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================
