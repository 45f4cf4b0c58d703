//! Shape Store
//!
//! Authoritative list of completed shapes. Every mesh a shape owns is
//! created and disposed here, so nothing leaks when a solid is rebuilt or
//! the store is reset.

use glam::Vec3;
use tracing::{debug, info, warn};

use super::config::VertexPlacement;
use super::error::SketchError;
use super::shape::{Handle, HandlePair, Shape};
use crate::geometry::{self, MIN_RING_POINTS};
use crate::scene::{HandleLevel, PickTag, Scene, ShapeId, VertexRef};

/// Shapes need at least this many points to be attempted by `extrude_all`.
const MIN_EXTRUDE_POINTS: usize = 2;

/// Outcome of [`ShapeStore::extrude_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtrusionSummary {
    /// Shapes that now have a solid
    pub extruded: Vec<ShapeId>,
    /// Shapes with too few points to attempt
    pub skipped: Vec<ShapeId>,
    /// Kernel failures, one per failed shape
    pub failures: Vec<SketchError>,
}

impl ExtrusionSummary {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    next_id: u32,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: ShapeId) -> Result<&mut Shape, SketchError> {
        self.shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SketchError::UnknownShape(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    // ========================================================================
    // CREATION
    // ========================================================================

    /// Turn a drawn polygon into a shape with an outline loop.
    ///
    /// Fewer than three points is a silent no-op.
    pub fn close_current_polygon(&mut self, points: &[Vec3], scene: &mut Scene) -> Option<ShapeId> {
        if points.len() < MIN_RING_POINTS {
            debug!(points = points.len(), "polygon too short to close");
            return None;
        }

        let id = ShapeId(self.next_id);
        self.next_id += 1;

        let outline = scene.create_line_strip(points.to_vec(), true, PickTag::Outline(id));
        self.shapes.push(Shape::new(id, points.to_vec(), Some(outline)));

        info!(%id, points = points.len(), "shape closed");
        Some(id)
    }

    /// Extrude every shape by `depth`, giving each a solid and handle pairs.
    ///
    /// A failing shape does not stop the others; its error lands in the
    /// summary. Only an empty store is an error.
    pub fn extrude_all(
        &mut self,
        depth: f32,
        handle_diameter: f32,
        scene: &mut Scene,
    ) -> Result<ExtrusionSummary, SketchError> {
        if self.shapes.is_empty() {
            return Err(SketchError::InsufficientPoints {
                required: 1,
                actual: 0,
            });
        }

        let mut summary = ExtrusionSummary::default();

        for shape in &mut self.shapes {
            if shape.points.len() < MIN_EXTRUDE_POINTS {
                warn!(id = %shape.id, points = shape.points.len(), "skipping shape");
                summary.skipped.push(shape.id);
                continue;
            }

            let solid = match geometry::extrude(&shape.points, depth) {
                Ok(solid) => solid,
                Err(source) => {
                    warn!(id = %shape.id, error = %source, "extrusion failed");
                    summary.failures.push(SketchError::ExtrusionFailure {
                        shape: shape.id,
                        source,
                    });
                    continue;
                }
            };

            for mesh in shape.meshes().collect::<Vec<_>>() {
                scene.dispose(mesh);
            }
            shape.outline = None;
            shape.solid = Some(scene.create_solid(solid, PickTag::Solid(shape.id)));
            shape.handles = create_handles(shape.id, &shape.points, depth, handle_diameter, scene);

            summary.extruded.push(shape.id);
        }

        info!(
            extruded = summary.extruded.len(),
            skipped = summary.skipped.len(),
            failed = summary.failures.len(),
            "extrusion finished"
        );
        Ok(summary)
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Replace a shape's points. Returns `false` if nothing changed or the
    /// shape is unknown.
    pub fn update_shape_points(&mut self, id: ShapeId, new_points: &[Vec3]) -> bool {
        let Ok(shape) = self.get_mut(id) else {
            return false;
        };
        if shape.points.as_slice() == new_points {
            return false;
        }
        shape.points = new_points.to_vec();
        true
    }

    /// Shift every mesh of a shape by `delta` without touching its data.
    pub fn translate_shape(&mut self, id: ShapeId, delta: Vec3, scene: &mut Scene) -> Result<(), SketchError> {
        let shape = self.get_mut(id)?;
        for mesh in shape.meshes() {
            scene.translate(mesh, delta);
        }
        Ok(())
    }

    /// Put a shape's meshes back where its data says they are.
    pub fn discard_translation(&mut self, id: ShapeId, scene: &mut Scene) -> Result<(), SketchError> {
        let shape = self.get_mut(id)?;
        for mesh in shape.outline.into_iter().chain(shape.solid) {
            scene.set_offset(mesh, Vec3::ZERO);
        }
        for pair in &shape.handles {
            scene.set_sphere_center(pair.bottom.mesh, pair.bottom.position);
            scene.set_sphere_center(pair.top.mesh, pair.top.position);
        }
        Ok(())
    }

    /// Make a dragged translation permanent: points and handles move by
    /// `offset` in x/z and the solid is rebuilt in place.
    ///
    /// On error the shape's data is untouched; the caller decides whether
    /// to roll the visuals back.
    pub fn commit_translation(&mut self, id: ShapeId, offset: Vec3, scene: &mut Scene) -> Result<(), SketchError> {
        let shape = self.get_mut(id)?;
        let delta = Vec3::new(offset.x, 0.0, offset.z);

        let moved: Vec<Vec3> = shape.points.iter().map(|p| *p + delta).collect();
        if let Some(index) = moved.iter().position(|p| !p.is_finite()) {
            return Err(SketchError::InvalidVertexState(format!(
                "{id} point {index} would move to a non-finite position"
            )));
        }

        shape.points = moved;
        for pair in &mut shape.handles {
            pair.bottom.position += delta;
            pair.top.position += delta;
        }

        if shape.is_extruded() {
            self.rebuild(id, scene)
        } else {
            let shape = self.get_mut(id)?;
            if let Some(outline) = shape.outline.take() {
                scene.dispose(outline);
                shape.outline = Some(scene.create_line_strip(shape.points.clone(), true, PickTag::Outline(id)));
            }
            Ok(())
        }
    }

    /// Replace a shape's solid with one built from its current handles.
    ///
    /// The new solid is created before the old one is disposed; on failure
    /// the old solid stays.
    pub fn rebuild(&mut self, id: ShapeId, scene: &mut Scene) -> Result<(), SketchError> {
        let shape = self.get_mut(id)?;
        if shape.handles.is_empty() {
            return Err(SketchError::InvalidVertexState(format!("{id} has not been extruded")));
        }

        let solid = geometry::rebuild_from_handles(&shape.bottom_ring(), &shape.top_ring())
            .map_err(|source| SketchError::ExtrusionFailure { shape: id, source })?;

        let new_mesh = scene.create_solid(solid, PickTag::Solid(id));
        if let Some(old) = shape.solid.replace(new_mesh) {
            scene.dispose(old);
        }
        for pair in &shape.handles {
            scene.set_sphere_center(pair.bottom.mesh, pair.bottom.position);
            scene.set_sphere_center(pair.top.mesh, pair.top.position);
        }

        debug!(%id, "solid rebuilt");
        Ok(())
    }

    /// Move one vertex handle toward `target` and rebuild the solid.
    ///
    /// With [`VertexPlacement::GroundPlane`] both handles of the pair take
    /// the target's x/z and keep their heights. With
    /// [`VertexPlacement::ViewPlane`] the dragged handle goes exactly to
    /// `target` and its partner follows in x/z. Either way `points[i]`
    /// becomes the bottom handle's x/z at y = 0.
    pub fn move_vertex(
        &mut self,
        vertex: VertexRef,
        target: Vec3,
        placement: VertexPlacement,
        scene: &mut Scene,
    ) -> Result<(), SketchError> {
        if !target.is_finite() {
            return Err(SketchError::InvalidVertexState(format!(
                "{} vertex {} target is not finite",
                vertex.shape, vertex.index
            )));
        }

        let shape = self.get_mut(vertex.shape)?;
        let Some(pair) = shape.handles.get_mut(vertex.index) else {
            return Err(SketchError::InvalidVertexState(format!(
                "{} has no vertex {}",
                vertex.shape, vertex.index
            )));
        };
        let Some(saved_point) = shape.points.get(vertex.index).copied() else {
            return Err(SketchError::InvalidVertexState(format!(
                "{} points and handles are out of step",
                vertex.shape
            )));
        };
        let saved_pair = *pair;

        match placement {
            VertexPlacement::GroundPlane => {
                pair.bottom.position = Vec3::new(target.x, pair.bottom.position.y, target.z);
                pair.top.position = Vec3::new(target.x, pair.top.position.y, target.z);
            }
            VertexPlacement::ViewPlane => {
                pair.get_mut(vertex.level).position = target;
                let partner = pair.get_mut(vertex.level.partner());
                partner.position.x = target.x;
                partner.position.z = target.z;
            }
        }
        let bottom = pair.bottom.position;
        shape.points[vertex.index] = Vec3::new(bottom.x, 0.0, bottom.z);

        if let Err(err) = self.rebuild(vertex.shape, scene) {
            let shape = self.get_mut(vertex.shape)?;
            shape.handles[vertex.index] = saved_pair;
            shape.points[vertex.index] = saved_point;
            return Err(err);
        }
        Ok(())
    }

    /// Dispose everything and forget all shapes. Safe to call repeatedly.
    pub fn reset(&mut self, scene: &mut Scene) {
        for shape in self.shapes.drain(..) {
            for mesh in shape.meshes() {
                scene.dispose(mesh);
            }
        }
        debug!("shape store cleared");
    }
}

fn create_handles(
    id: ShapeId,
    points: &[Vec3],
    depth: f32,
    diameter: f32,
    scene: &mut Scene,
) -> Vec<HandlePair> {
    let mut handle = |index: usize, level: HandleLevel, position: Vec3| Handle {
        mesh: scene.create_sphere(
            position,
            diameter,
            PickTag::VertexHandle(VertexRef::new(id, index, level)),
            true,
        ),
        position,
    };

    points
        .iter()
        .enumerate()
        .map(|(i, p)| HandlePair {
            bottom: handle(i, HandleLevel::Bottom, Vec3::new(p.x, 0.0, p.z)),
            top: handle(i, HandleLevel::Top, Vec3::new(p.x, depth, p.z)),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MeshKind;

    const EPSILON: f32 = 1e-5;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]
    }

    fn extruded_square() -> (ShapeStore, Scene, ShapeId) {
        let mut scene = Scene::new(10.0);
        let mut store = ShapeStore::new();
        let id = store.close_current_polygon(&square(), &mut scene).unwrap();
        store.extrude_all(3.0, 0.2, &mut scene).unwrap();
        (store, scene, id)
    }

    fn solid_vertex_count(store: &ShapeStore, scene: &Scene, id: ShapeId) -> usize {
        let mesh = store.get(id).unwrap().solid().unwrap();
        match &scene.mesh(mesh).unwrap().kind {
            MeshKind::Solid(solid) => solid.vertex_count(),
            other => panic!("expected solid, got {other:?}"),
        }
    }

    #[test]
    fn test_close_requires_three_points() {
        let mut scene = Scene::new(10.0);
        let mut store = ShapeStore::new();
        assert!(store.close_current_polygon(&square()[..2], &mut scene).is_none());
        assert!(store.is_empty());
        assert_eq!(scene.live_mesh_count(), 1);

        let id = store.close_current_polygon(&square(), &mut scene).unwrap();
        let shape = store.get(id).unwrap();
        assert_eq!(shape.points().len(), 4);
        assert!(shape.outline().is_some());
        assert!(!shape.is_extruded());
    }

    #[test]
    fn test_extrude_builds_solid_and_handles() {
        let (store, scene, id) = extruded_square();
        let shape = store.get(id).unwrap();

        assert!(shape.outline().is_none());
        assert_eq!(shape.handles().len(), shape.points().len());
        assert_eq!(solid_vertex_count(&store, &scene, id), 8);

        for (pair, point) in shape.handles().iter().zip(shape.points()) {
            assert_eq!(pair.bottom.position, Vec3::new(point.x, 0.0, point.z));
            assert_eq!(pair.top.position, Vec3::new(point.x, 3.0, point.z));
        }
        // ground + solid + 8 handles
        assert_eq!(scene.live_mesh_count(), 10);
    }

    #[test]
    fn test_extrude_empty_store_fails() {
        let mut scene = Scene::new(10.0);
        let mut store = ShapeStore::new();
        assert!(matches!(
            store.extrude_all(3.0, 0.2, &mut scene),
            Err(SketchError::InsufficientPoints { .. })
        ));
        assert_eq!(scene.live_mesh_count(), 1);
    }

    #[test]
    fn test_extrude_collects_failures_and_continues() {
        let mut scene = Scene::new(10.0);
        let mut store = ShapeStore::new();
        let good = store.close_current_polygon(&square(), &mut scene).unwrap();
        let mut bad_points = square();
        bad_points[1].x = f32::INFINITY;
        let bad = store.close_current_polygon(&bad_points, &mut scene).unwrap();

        let summary = store.extrude_all(3.0, 0.2, &mut scene).unwrap();
        assert_eq!(summary.extruded, vec![good]);
        assert_eq!(summary.failures.len(), 1);
        assert!(matches!(
            summary.failures[0],
            SketchError::ExtrusionFailure { shape, .. } if shape == bad
        ));
        assert!(!store.get(bad).unwrap().is_extruded());
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_update_points_only_on_change() {
        let (mut store, _scene, id) = extruded_square();
        assert!(!store.update_shape_points(id, &square()));

        let mut changed = square();
        changed[2].z = 1.5;
        assert!(store.update_shape_points(id, &changed));
        assert_eq!(store.get(id).unwrap().points()[2].z, 1.5);

        let mut shorter = changed.clone();
        shorter.pop();
        assert!(store.update_shape_points(id, &shorter));
        assert!(!store.update_shape_points(ShapeId(99), &shorter));
    }

    #[test]
    fn test_commit_translation_moves_points_and_handles() {
        let (mut store, mut scene, id) = extruded_square();
        let offset = Vec3::new(2.0, 0.0, -1.0);

        store.translate_shape(id, offset, &mut scene).unwrap();
        store.commit_translation(id, offset, &mut scene).unwrap();

        let shape = store.get(id).unwrap();
        for (moved, original) in shape.points().iter().zip(square()) {
            assert!((*moved - (original + offset)).length() < EPSILON);
        }
        for pair in shape.handles() {
            assert!(pair.top.position.y == 3.0);
            let mesh = scene.mesh(pair.bottom.mesh).unwrap();
            assert_eq!(mesh.offset, Vec3::ZERO);
        }
        let solid = scene.mesh(shape.solid().unwrap()).unwrap();
        assert_eq!(solid.offset, Vec3::ZERO);
        assert_eq!(scene.live_mesh_count(), 10);
    }

    #[test]
    fn test_commit_translation_rejects_non_finite() {
        let (mut store, mut scene, id) = extruded_square();
        let offset = Vec3::new(f32::NAN, 0.0, 0.0);
        store.translate_shape(id, offset, &mut scene).unwrap();

        let err = store.commit_translation(id, offset, &mut scene).unwrap_err();
        assert!(matches!(err, SketchError::InvalidVertexState(_)));
        assert_eq!(store.get(id).unwrap().points(), square().as_slice());

        store.discard_translation(id, &mut scene).unwrap();
        let solid = store.get(id).unwrap().solid().unwrap();
        assert_eq!(scene.mesh(solid).unwrap().offset, Vec3::ZERO);
    }

    #[test]
    fn test_rebuild_replaces_solid_without_leak() {
        let (mut store, mut scene, id) = extruded_square();
        let before = store.get(id).unwrap().solid().unwrap();
        let count = scene.live_mesh_count();

        store.rebuild(id, &mut scene).unwrap();
        let after = store.get(id).unwrap().solid().unwrap();
        assert_ne!(before, after);
        assert!(!scene.contains(before));
        assert_eq!(scene.live_mesh_count(), count);
    }

    #[test]
    fn test_rebuild_requires_extrusion() {
        let mut scene = Scene::new(10.0);
        let mut store = ShapeStore::new();
        let id = store.close_current_polygon(&square(), &mut scene).unwrap();
        assert!(matches!(
            store.rebuild(id, &mut scene),
            Err(SketchError::InvalidVertexState(_))
        ));
        assert_eq!(
            store.rebuild(ShapeId(42), &mut scene),
            Err(SketchError::UnknownShape(ShapeId(42)))
        );
    }

    #[test]
    fn test_move_bottom_vertex_ground_plane() {
        let (mut store, mut scene, id) = extruded_square();
        let vertex = VertexRef::new(id, 1, HandleLevel::Bottom);

        store
            .move_vertex(vertex, Vec3::new(1.5, 0.0, -0.5), VertexPlacement::GroundPlane, &mut scene)
            .unwrap();

        let shape = store.get(id).unwrap();
        assert_eq!(shape.points()[1], Vec3::new(1.5, 0.0, -0.5));
        assert_eq!(shape.handles()[1].top.position, Vec3::new(1.5, 3.0, -0.5));
        for i in [0, 2, 3] {
            assert_eq!(shape.points()[i], square()[i]);
        }
        assert_eq!(solid_vertex_count(&store, &scene, id), 8);
    }

    #[test]
    fn test_move_top_vertex_view_plane() {
        let (mut store, mut scene, id) = extruded_square();
        let vertex = VertexRef::new(id, 2, HandleLevel::Top);

        store
            .move_vertex(vertex, Vec3::new(2.0, 4.0, 2.0), VertexPlacement::ViewPlane, &mut scene)
            .unwrap();

        let pair = store.get(id).unwrap().handles()[2];
        assert_eq!(pair.top.position, Vec3::new(2.0, 4.0, 2.0));
        assert_eq!(pair.bottom.position, Vec3::new(2.0, 0.0, 2.0));
        assert_eq!(store.get(id).unwrap().points()[2], Vec3::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn test_move_vertex_rejects_bad_input() {
        let (mut store, mut scene, id) = extruded_square();
        let out_of_range = VertexRef::new(id, 9, HandleLevel::Bottom);
        assert!(store
            .move_vertex(out_of_range, Vec3::ZERO, VertexPlacement::GroundPlane, &mut scene)
            .is_err());

        let vertex = VertexRef::new(id, 0, HandleLevel::Bottom);
        assert!(store
            .move_vertex(vertex, Vec3::splat(f32::NAN), VertexPlacement::GroundPlane, &mut scene)
            .is_err());
        assert_eq!(store.get(id).unwrap().points(), square().as_slice());
    }

    #[test]
    fn test_reset_disposes_everything() {
        let (mut store, mut scene, _) = extruded_square();
        store.close_current_polygon(&square(), &mut scene);

        store.reset(&mut scene);
        assert!(store.is_empty());
        assert_eq!(scene.live_mesh_count(), 1);

        store.reset(&mut scene);
        assert_eq!(scene.live_mesh_count(), 1);
    }
}
