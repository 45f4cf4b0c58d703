//! Prism Extrusion
//!
//! Builds a closed triangle mesh from a polygon ring lying on the ground
//! plane. The ring is read in the XZ plane; Y is up.
//!
//! # Vertex layout
//!
//! For a ring of `n` points the solid has exactly `2n` vertices:
//! indices `0..n` are the bottom ring, `n..2n` the top ring, both in ring
//! order. Triangles are emitted side walls first (`2n` of them), then the
//! bottom cap fan, then the top cap fan (`n - 2` each).
//!
//! Caps are a fan from vertex 0, so concave rings produce overlapping cap
//! triangles. That case is not detected.

use glam::Vec3;

use super::GeometryError;

/// Smallest ring that encloses an area.
pub const MIN_RING_POINTS: usize = 3;

// ============================================================================
// SOLID
// ============================================================================

/// A closed prism mesh produced by the kernel.
///
/// Positions are shared between triangles; normals are per triangle and
/// computed from the final index list.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    face_normals: Vec<Vec3>,
    ring_len: usize,
}

impl Solid {
    /// Shared vertex positions (bottom ring, then top ring).
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle list indices into [`Solid::positions`].
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// One unit normal per triangle, in triangle order.
    pub fn face_normals(&self) -> &[Vec3] {
        &self.face_normals
    }

    /// Number of points in the source ring.
    pub fn ring_len(&self) -> usize {
        self.ring_len
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Side wall triangles: two per ring edge.
    pub fn side_triangle_count(&self) -> usize {
        2 * self.ring_len
    }

    /// Cap triangles: one fan of `n - 2` per cap.
    pub fn cap_triangle_count(&self) -> usize {
        2 * (self.ring_len - 2)
    }

    pub fn bottom_ring(&self) -> &[Vec3] {
        &self.positions[..self.ring_len]
    }

    pub fn top_ring(&self) -> &[Vec3] {
        &self.positions[self.ring_len..]
    }

    /// Iterate over every triangle as three world-space corners.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Iterate over the side wall triangles only.
    pub fn side_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles().take(self.side_triangle_count())
    }

    /// Center of the vertex cloud.
    pub fn centroid(&self) -> Vec3 {
        let sum: Vec3 = self.positions.iter().copied().sum();
        sum / self.positions.len() as f32
    }
}

// ============================================================================
// KERNEL ENTRY POINTS
// ============================================================================

/// Extrude a ground ring straight up by `depth`.
///
/// The bottom cap sits at y = 0 and the top cap at y = `depth`, whatever the
/// ring's own Y values are.
pub fn extrude(ring: &[Vec3], depth: f32) -> Result<Solid, GeometryError> {
    if !depth.is_finite() || depth <= 0.0 {
        return Err(GeometryError::InvalidDepth(depth));
    }
    check_ring(ring)?;

    let bottom: Vec<Vec3> = ring.iter().map(|p| Vec3::new(p.x, 0.0, p.z)).collect();
    let top: Vec<Vec3> = ring.iter().map(|p| Vec3::new(p.x, depth, p.z)).collect();

    Ok(build_prism(bottom, top))
}

/// Rebuild a prism from independently positioned bottom and top rings.
///
/// Used after a single handle was dragged, when the two rings may no longer
/// be vertical translates of each other.
pub fn rebuild_from_handles(bottom: &[Vec3], top: &[Vec3]) -> Result<Solid, GeometryError> {
    if bottom.len() != top.len() {
        return Err(GeometryError::RingLengthMismatch {
            bottom: bottom.len(),
            top: top.len(),
        });
    }
    check_ring(bottom)?;
    check_ring(top)?;

    Ok(build_prism(bottom.to_vec(), top.to_vec()))
}

/// Twice-halved shoelace area of the ring projected onto XZ.
///
/// Positive when the ring winds so that the side wall triangles
/// `(b_i, t_i, b_i+1)` face outward.
pub fn ring_signed_area(ring: &[Vec3]) -> f32 {
    let n = ring.len();
    if n < MIN_RING_POINTS {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.z - b.x * a.z;
    }
    sum * 0.5
}

// ============================================================================
// INTERNALS
// ============================================================================

fn check_ring(ring: &[Vec3]) -> Result<(), GeometryError> {
    if ring.len() < MIN_RING_POINTS {
        return Err(GeometryError::InsufficientPoints {
            required: MIN_RING_POINTS,
            actual: ring.len(),
        });
    }
    if let Some(index) = ring.iter().position(|p| !p.is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate { index });
    }
    Ok(())
}

fn build_prism(bottom: Vec<Vec3>, top: Vec<Vec3>) -> Solid {
    let n = bottom.len();
    // Clockwise rings get every triangle flipped so normals still point out.
    let flip = ring_signed_area(&bottom) < 0.0;

    let mut positions = bottom;
    positions.extend(top);

    let b = |i: usize| i as u32;
    let t = |i: usize| (n + i) as u32;

    let mut indices = Vec::with_capacity((4 * n - 4) * 3);

    // Side walls
    for i in 0..n {
        let j = (i + 1) % n;
        push_triangle(&mut indices, [b(i), t(i), b(j)], flip);
        push_triangle(&mut indices, [b(j), t(i), t(j)], flip);
    }

    // Bottom cap (facing -Y)
    for i in 1..n - 1 {
        push_triangle(&mut indices, [b(0), b(i), b(i + 1)], flip);
    }

    // Top cap (facing +Y)
    for i in 1..n - 1 {
        push_triangle(&mut indices, [t(0), t(i + 1), t(i)], flip);
    }

    let face_normals = indices
        .chunks_exact(3)
        .map(|tri| {
            let p0 = positions[tri[0] as usize];
            let p1 = positions[tri[1] as usize];
            let p2 = positions[tri[2] as usize];
            (p1 - p0).cross(p2 - p0).normalize_or_zero()
        })
        .collect();

    Solid {
        positions,
        indices,
        face_normals,
        ring_len: n,
    }
}

fn push_triangle(indices: &mut Vec<u32>, tri: [u32; 3], flip: bool) {
    if flip {
        indices.extend_from_slice(&[tri[0], tri[2], tri[1]]);
    } else {
        indices.extend_from_slice(&tri);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]
    }

    /// Every normal should point away from the solid's centroid.
    fn assert_outward(solid: &Solid) {
        let center = solid.centroid();
        for (tri, normal) in solid.triangles().zip(solid.face_normals()) {
            let face_center = (tri[0] + tri[1] + tri[2]) / 3.0;
            let outward = (face_center - center).dot(*normal);
            assert!(outward > 0.0, "normal {normal:?} points inward at {face_center:?}");
        }
    }

    #[test]
    fn test_square_counts() {
        let solid = extrude(&square(), 3.0).unwrap();
        assert_eq!(solid.vertex_count(), 8);
        assert_eq!(solid.side_triangle_count(), 8);
        assert_eq!(solid.cap_triangle_count(), 4);
        assert_eq!(solid.triangle_count(), 12);
        assert_eq!(solid.face_normals().len(), 12);
    }

    #[test]
    fn test_caps_at_ground_and_depth() {
        let solid = extrude(&square(), 3.0).unwrap();
        assert!(solid.bottom_ring().iter().all(|p| p.y.abs() < EPSILON));
        assert!(solid.top_ring().iter().all(|p| (p.y - 3.0).abs() < EPSILON));
        for (b, t) in solid.bottom_ring().iter().zip(solid.top_ring()) {
            assert!((b.x - t.x).abs() < EPSILON);
            assert!((b.z - t.z).abs() < EPSILON);
        }
    }

    #[test]
    fn test_raised_ring_still_starts_at_ground() {
        let ring: Vec<Vec3> = square().iter().map(|p| *p + Vec3::Y * 0.01).collect();
        let solid = extrude(&ring, 2.0).unwrap();
        assert!(solid.bottom_ring().iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn test_normals_outward_counter_clockwise() {
        let solid = extrude(&square(), 3.0).unwrap();
        assert!(ring_signed_area(&square()) > 0.0);
        assert_outward(&solid);
    }

    #[test]
    fn test_normals_outward_clockwise() {
        let mut ring = square();
        ring.reverse();
        assert!(ring_signed_area(&ring) < 0.0);
        let solid = extrude(&ring, 3.0).unwrap();
        assert_outward(&solid);
    }

    #[test]
    fn test_cap_normals_vertical() {
        let solid = extrude(&square(), 1.0).unwrap();
        let caps = &solid.face_normals()[solid.side_triangle_count()..];
        let (bottom, top) = caps.split_at(solid.cap_triangle_count() / 2);
        assert!(bottom.iter().all(|n| (n.y + 1.0).abs() < EPSILON));
        assert!(top.iter().all(|n| (n.y - 1.0).abs() < EPSILON));
    }

    #[test]
    fn test_triangle_ring() {
        let ring = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        ];
        let solid = extrude(&ring, 1.5).unwrap();
        assert_eq!(solid.vertex_count(), 6);
        assert_eq!(solid.side_triangle_count(), 6);
        assert_eq!(solid.triangle_count(), 8);
        assert_outward(&solid);
    }

    #[test]
    fn test_too_few_points() {
        let ring = vec![Vec3::ZERO, Vec3::X];
        assert_eq!(
            extrude(&ring, 3.0),
            Err(GeometryError::InsufficientPoints {
                required: 3,
                actual: 2
            })
        );
        assert!(extrude(&[], 3.0).is_err());
    }

    #[test]
    fn test_invalid_depth() {
        assert_eq!(extrude(&square(), 0.0), Err(GeometryError::InvalidDepth(0.0)));
        assert!(extrude(&square(), -1.0).is_err());
        assert!(extrude(&square(), f32::NAN).is_err());
    }

    #[test]
    fn test_non_finite_point() {
        let mut ring = square();
        ring[2].x = f32::NAN;
        assert_eq!(
            extrude(&ring, 3.0),
            Err(GeometryError::NonFiniteCoordinate { index: 2 })
        );
    }

    #[test]
    fn test_rebuild_matches_extrude_for_vertical_rings() {
        let extruded = extrude(&square(), 3.0).unwrap();
        let rebuilt =
            rebuild_from_handles(extruded.bottom_ring(), extruded.top_ring()).unwrap();
        assert_eq!(extruded, rebuilt);
    }

    #[test]
    fn test_rebuild_with_diverged_top() {
        let bottom = square();
        let mut top: Vec<Vec3> = bottom.iter().map(|p| *p + Vec3::Y * 3.0).collect();
        top[1].y = 5.0;

        let solid = rebuild_from_handles(&bottom, &top).unwrap();
        assert_eq!(solid.vertex_count(), 8);
        assert_eq!(solid.top_ring()[1], Vec3::new(1.0, 5.0, 0.0));
        assert_eq!(solid.top_ring()[0], Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_rebuild_length_mismatch() {
        let bottom = square();
        let top = &bottom[..3];
        assert_eq!(
            rebuild_from_handles(&bottom, top),
            Err(GeometryError::RingLengthMismatch { bottom: 4, top: 3 })
        );
    }

    #[test]
    fn test_signed_area_of_unit_square() {
        assert!((ring_signed_area(&square()) - 1.0).abs() < EPSILON);
        assert_eq!(ring_signed_area(&square()[..2]), 0.0);
    }
}
