//! Spatial acceleration structures
//!
//! Two interchangeable structures answer nearest-hit ray queries and
//! conservative box-overlap queries over a transformed triangle soup: a
//! uniform grid traversed by 3D DDA, and a lazily subdivided octree
//! descended depth-first.
//!
//! # Module Organization
//!
//! - [`grid`] - Fixed-resolution bucket grid with DDA ray traversal
//! - [`octree`] - Recursive octant subdivision with capacity and depth limits
//! - [`mesh`] - Owner type binding one mesh instance to one structure
//!
//! Both structures store a triangle in every cell or node its bounding
//! box overlaps, so box queries return a duplicated, conservative
//! superset of the true candidates. Callers filter further, or just test
//! emptiness.

pub mod grid;
pub mod mesh;
pub mod octree;

pub use grid::{GridConfig, UniformGrid};
pub use mesh::SpatialMesh;
pub use octree::{Octree, OctreeConfig, OctreeNode};

use crate::config::SpatialConfig;
use crate::foundation::math::Mat4;
use crate::geometry::{Aabb, Ray, RayHit, Vertex};

/// Abstract interface over the acceleration structures
///
/// The structure is chosen when the index is created and fixed from then
/// on; everything downstream dispatches through this trait.
pub trait SpatialIndex {
    /// Rebuild the index from scratch over the given geometry
    ///
    /// Computes the world bounding box, then inserts every triangle index
    /// in ascending order. Fully replaces prior state: building twice
    /// with the same inputs yields identical query results.
    fn build(&mut self, vertices: &[Vertex], indices: &[u32], transform: Mat4);

    /// Insert one triangle into every overlapping cell or node
    ///
    /// Called by [`build`](SpatialIndex::build) for each triangle index;
    /// insertion is conservative, keyed on the triangle's bounding box.
    fn insert(&mut self, triangle: usize);

    /// Closest intersecting triangle along the ray, if any
    ///
    /// Read-only over the structure.
    fn raycast(&self, ray: &Ray) -> Option<RayHit>;

    /// Triangles whose cell or node overlaps the query box
    ///
    /// A broad-phase result: duplicates and false positives are expected,
    /// false negatives are not. No per-triangle box test is performed.
    fn query_aabb(&self, aabb: &Aabb) -> Vec<usize>;
}

/// Selects which acceleration structure a mesh builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Uniform bucket grid traversed by 3D DDA
    Grid,
    /// Lazily subdivided octree
    Octree,
}

/// Create an empty index of the requested kind
pub fn create_index(kind: IndexKind, config: &SpatialConfig) -> Box<dyn SpatialIndex> {
    match kind {
        IndexKind::Grid => Box::new(UniformGrid::new(config.grid)),
        IndexKind::Octree => Box::new(Octree::new(config.octree)),
    }
}
