//! Primitive geometric types and intersection algorithms
//!
//! Provides rays and triangles with the stateless intersection tests
//! shared by both spatial structures.

use crate::foundation::math::Vec3;
use crate::geometry::bounds::Aabb;

/// Numerical tolerance for the ray/triangle determinant and hit distance
const EPSILON: f32 = 1e-6;

/// A ray for picking and traversal queries
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray
    ///
    /// Not required to be normalized. Zero components are legal: grid
    /// traversal divides by them and the resulting IEEE infinities flow
    /// through the comparisons.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at parameter t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a nearest-hit ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray parameter of the closest intersection
    pub t: f32,
    /// Index of the hit triangle
    pub triangle: usize,
}

/// A triangle in world space
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Axis-aligned bounding box of the three vertices
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.v0.inf(&self.v1.inf(&self.v2)),
            self.v0.sup(&self.v1.sup(&self.v2)),
        )
    }

    /// Möller-Trumbore ray-triangle intersection
    ///
    /// Returns the ray parameter of the intersection, or `None` when the
    /// ray misses or runs parallel to the triangle plane. A degenerate
    /// (zero-area) triangle fails the determinant test and is rejected,
    /// never a crash.
    ///
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let pvec = ray.direction.cross(&edge2);
        let det = edge1.dot(&pvec);

        // Ray parallel to triangle, or degenerate triangle?
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray.origin - self.v0;
        let u = tvec.dot(&pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let qvec = tvec.cross(&edge1);
        let v = ray.direction.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(&qvec) * inv_det;
        if t > EPSILON {
            Some(t)
        } else {
            None
        }
    }
}
