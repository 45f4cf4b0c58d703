//! Raycast Module
//!
//! World-space rays and the intersection tests used for pointer picking:
//! horizontal planes (the ground), arbitrary planes (view-facing drag
//! planes), spheres (vertex handles) and triangles (extruded solids).

use glam::Vec3;

/// Hits closer than this are treated as behind the ray origin.
const MIN_HIT_DISTANCE: f32 = 1e-4;

/// Below this a ray is considered parallel to a plane or triangle.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A half-line starting at `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point in world space
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect with the horizontal plane `y = height`.
    ///
    /// Returns the hit distance, or `None` if the ray is parallel to the
    /// plane or the plane lies behind the origin.
    pub fn intersect_horizontal_plane(&self, height: f32) -> Option<f32> {
        // Solve: origin.y + t * direction.y = height
        if self.direction.y.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= MIN_HIT_DISTANCE).then_some(t)
    }

    /// Intersect with the plane through `point` with normal `normal`.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
        let denom = normal.dot(self.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= MIN_HIT_DISTANCE).then_some(t)
    }

    /// Intersect with a sphere, returning the nearest positive distance.
    ///
    /// With a unit direction the quadratic reduces to
    /// `t^2 + 2t (oc . d) + (oc . oc - r^2) = 0`.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t1 = -b - sqrt_disc;
        let t2 = -b + sqrt_disc;

        if t1 > MIN_HIT_DISTANCE {
            Some(t1)
        } else if t2 > MIN_HIT_DISTANCE {
            // Origin is inside the sphere
            Some(t2)
        } else {
            None
        }
    }

    /// Moller-Trumbore ray/triangle test. Both faces count as hits.
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t >= MIN_HIT_DISTANCE).then_some(t)
    }
}

/// Intersect `ray` with the ground plane (y = 0) and return the hit point.
pub fn raycast_to_ground(ray: &Ray) -> Option<Vec3> {
    raycast_to_plane(ray, 0.0)
}

/// Intersect `ray` with the horizontal plane `y = plane_height`.
pub fn raycast_to_plane(ray: &Ray, plane_height: f32) -> Option<Vec3> {
    ray.intersect_horizontal_plane(plane_height)
        .map(|t| ray.at(t))
}
