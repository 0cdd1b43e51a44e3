//! Triangle soup geometry with on-access transformation
//!
//! Owns the vertex buffer, index buffer, and model transform, and hands
//! out world-space triangles one index at a time.

use crate::foundation::math::{Mat4, Point3, Vec3};
use crate::geometry::bounds::Aabb;
use crate::geometry::primitives::Triangle;

/// 3D vertex data consumed by the spatial structures
///
/// Standard position/normal/texture layout; only the position is used
/// here. `#[repr(C)]` keeps the layout stable for whatever renderer
/// shares the same buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Creates a vertex from a position, with zeroed attributes
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            normal: [0.0; 3],
            tex_coord: [0.0; 2],
        }
    }
}

/// Triangle soup with a model transform applied on access
///
/// World-space triangles are re-derived on every access instead of being
/// cached: each access costs three matrix-point multiplies. Caching
/// transformed positions at build time is a possible optimization if
/// profiling ever calls for it.
#[derive(Debug, Clone)]
pub struct MeshGeometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    transform: Mat4,
}

impl Default for MeshGeometry {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            transform: Mat4::identity(),
        }
    }
}

impl MeshGeometry {
    /// Creates an empty geometry with an identity transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the geometry wholesale
    ///
    /// Indices are consumed in triples; a trailing partial triple is
    /// dropped by `triangle_count`'s integer division, with no further
    /// validation at this layer.
    pub fn set_data(&mut self, vertices: &[Vertex], indices: &[u32], transform: Mat4) {
        self.vertices = vertices.to_vec();
        self.indices = indices.to_vec();
        self.transform = transform;
    }

    /// Number of whole triangles in the index buffer
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The model transform applied on access
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// World-space triangle at `index`
    ///
    /// Triangle `index` reads index-buffer slots `[3i, 3i+2]`. The index
    /// must be in `[0, triangle_count)`; the build pass is the only
    /// producer of triangle indices.
    pub fn triangle(&self, index: usize) -> Triangle {
        let base = index * 3;
        Triangle::new(
            self.transform_position(self.vertices[self.indices[base] as usize].position),
            self.transform_position(self.vertices[self.indices[base + 1] as usize].position),
            self.transform_position(self.vertices[self.indices[base + 2] as usize].position),
        )
    }

    fn transform_position(&self, p: [f32; 3]) -> Vec3 {
        self.transform
            .transform_point(&Point3::new(p[0], p[1], p[2]))
            .coords
    }

    /// Tightest world-space box containing every triangle
    ///
    /// Scans all triangles once, accumulating componentwise min/max over
    /// all three vertices of each. Zero triangles produce the inverted
    /// empty box; callers treat that as "nothing to hit".
    pub fn compute_bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for i in 0..self.triangle_count() {
            let tri = self.triangle(i);
            bounds.include_point(tri.v0);
            bounds.include_point(tri.v1);
            bounds.include_point(tri.v2);
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle_soup() -> (Vec<Vertex>, Vec<u32>) {
        (
            vec![
                Vertex::from_position(0.0, 0.0, 0.0),
                Vertex::from_position(1.0, 0.0, 0.0),
                Vertex::from_position(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_triangle_accessor_identity() {
        let (vertices, indices) = unit_triangle_soup();
        let mut geometry = MeshGeometry::new();
        geometry.set_data(&vertices, &indices, Mat4::identity());

        assert_eq!(geometry.triangle_count(), 1);
        let tri = geometry.triangle(0);
        assert_eq!(tri.v0, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(tri.v1, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(tri.v2, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_triangle_accessor_applies_transform() {
        let (vertices, indices) = unit_triangle_soup();
        let mut geometry = MeshGeometry::new();
        geometry.set_data(
            &vertices,
            &indices,
            Mat4::new_translation(&Vec3::new(10.0, 0.0, -2.0)),
        );

        let tri = geometry.triangle(0);
        assert_relative_eq!(tri.v0.x, 10.0, epsilon = 1e-6);
        assert_relative_eq!(tri.v1.x, 11.0, epsilon = 1e-6);
        assert_relative_eq!(tri.v2.z, -2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_trailing_partial_triple_is_dropped() {
        let (vertices, _) = unit_triangle_soup();
        let mut geometry = MeshGeometry::new();
        geometry.set_data(&vertices, &[0, 1, 2, 0, 1], Mat4::identity());

        assert_eq!(geometry.triangle_count(), 1);
    }

    #[test]
    fn test_bounds_cover_transformed_geometry() {
        let (vertices, indices) = unit_triangle_soup();
        let mut geometry = MeshGeometry::new();
        geometry.set_data(
            &vertices,
            &indices,
            Mat4::new_translation(&Vec3::new(5.0, 5.0, 5.0)),
        );

        let bounds = geometry.compute_bounds();
        assert_relative_eq!(bounds.min.x, 5.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.max.x, 6.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.max.y, 6.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.min.z, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_geometry_bounds_are_inverted() {
        let geometry = MeshGeometry::new();
        let bounds = geometry.compute_bounds();
        assert_eq!(bounds.min.x, f32::INFINITY);
        assert_eq!(bounds.max.x, f32::NEG_INFINITY);
    }
}
