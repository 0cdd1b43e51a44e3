//! Axis-aligned bounding volumes
//!
//! World-space boxes used as structure bounds, node volumes, and
//! conservative triangle extents during insertion.

use crate::foundation::math::Vec3;

/// Axis-aligned bounding box in world space
///
/// Invariant for non-empty boxes: `min <= max` componentwise. Degenerate
/// zero-volume boxes are legal (planar meshes produce them).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new box from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The empty box, inverted so min = +inf and max = -inf
    ///
    /// Including any point yields a valid box, and box overlap tests
    /// against the empty box always fail. A mesh with zero triangles
    /// bounds to exactly this value. The slab ray test does NOT reject
    /// it (each inverted slab spans the whole line), so structures guard
    /// the empty case by holding no triangles rather than by the box
    /// test.
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the box
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Grow the box to contain a point
    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Check if this box contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this box intersects another box
    ///
    /// Touching faces count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Slab-method ray intersection
    ///
    /// Returns the entry distance clamped to zero (the origin may sit
    /// inside the box), or `None` when the ray misses or the box lies
    /// fully behind the origin. Zero direction components divide to IEEE
    /// infinities, which participate in the min/max comparisons as-is.
    pub fn intersect_ray(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let t1 = (self.min.x - origin.x) / direction.x;
        let t2 = (self.max.x - origin.x) / direction.x;
        let t3 = (self.min.y - origin.y) / direction.y;
        let t4 = (self.max.y - origin.y) / direction.y;
        let t5 = (self.min.z - origin.z) / direction.z;
        let t6 = (self.max.z - origin.z) / direction.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if tmax < 0.0 || tmin > tmax {
            None
        } else {
            Some(tmin.max(0.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_enters_box() {
        let b = unit_box();
        let t = b
            .intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .expect("ray points at the box");
        assert_relative_eq!(t, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_origin_inside_box_clamps_to_zero() {
        let b = unit_box();
        let t = b
            .intersect_ray(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0))
            .expect("origin is inside");
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_box_behind_origin_misses() {
        let b = unit_box();
        assert!(b
            .intersect_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0))
            .is_none());
    }

    #[test]
    fn test_axis_aligned_ray_with_zero_components() {
        // Direction has two zero components; the slab divisions produce
        // infinities that must still yield a correct hit.
        let b = unit_box();
        let t = b
            .intersect_ray(Vec3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .expect("axis-aligned ray hits");
        assert_relative_eq!(t, 4.0, epsilon = 1e-5);

        // Same direction but offset outside the x slab: clean miss
        assert!(b
            .intersect_ray(Vec3::new(2.0, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .is_none());
    }

    #[test]
    fn test_degenerate_planar_box_is_hittable() {
        let b = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
        assert!(b
            .intersect_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0))
            .is_some());
    }

    #[test]
    fn test_empty_box_overlaps_nothing() {
        let b = Aabb::empty();
        assert!(!b.intersects(&unit_box()));
        assert!(!b.contains_point(Vec3::zeros()));
    }

    #[test]
    fn test_include_point_grows_empty_box() {
        let mut b = Aabb::empty();
        b.include_point(Vec3::new(1.0, 2.0, 3.0));
        b.include_point(Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let a = unit_box();
        let b = Aabb::new(Vec3::new(1.0, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&b));

        let c = Aabb::new(Vec3::new(1.1, -1.0, -1.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!a.intersects(&c));
    }
}
