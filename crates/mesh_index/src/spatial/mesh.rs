//! Mesh-owned spatial index
//!
//! Binds one triangle soup to exactly one acceleration structure. Any
//! transform change rebuilds the structure wholesale; there is no
//! incremental update path.

use crate::config::SpatialConfig;
use crate::foundation::math::Mat4;
use crate::geometry::{Aabb, Ray, RayHit, Vertex};
use crate::spatial::{create_index, IndexKind, SpatialIndex};

/// A triangle mesh instance owning its spatial index
///
/// The index is exclusively owned, never shared between instances.
/// Rebuilding is atomic from the caller's perspective: the old structure
/// is dropped only after the replacement is fully built, and all calls
/// are synchronous on the calling thread.
pub struct SpatialMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    transform: Mat4,
    kind: IndexKind,
    config: SpatialConfig,
    index: Box<dyn SpatialIndex>,
    picked: bool,
}

impl SpatialMesh {
    /// Create a mesh instance and build its index at the identity transform
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        kind: IndexKind,
        config: &SpatialConfig,
    ) -> Self {
        let mut mesh = Self {
            vertices,
            indices,
            transform: Mat4::identity(),
            kind,
            config: *config,
            index: create_index(kind, config),
            picked: false,
        };
        mesh.rebuild();
        mesh
    }

    /// The structure currently answering queries
    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// Current model transform
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Replace the model transform and rebuild the index
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.rebuild();
    }

    /// Switch acceleration structure and rebuild
    pub fn set_index_kind(&mut self, kind: IndexKind) {
        self.kind = kind;
        self.index = create_index(kind, &self.config);
        self.rebuild();
    }

    /// Rebuild the index wholesale from the current geometry and transform
    pub fn rebuild(&mut self) {
        self.index
            .build(&self.vertices, &self.indices, self.transform);
    }

    /// Closest intersecting triangle along the ray, if any
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        self.index.raycast(ray)
    }

    /// Conservative superset of triangles overlapping the box
    pub fn query_aabb(&self, aabb: &Aabb) -> Vec<usize> {
        self.index.query_aabb(aabb)
    }

    /// Whether anything in the mesh potentially overlaps the box
    ///
    /// Collision consumers look only at emptiness of the candidate list.
    pub fn overlaps(&self, aabb: &Aabb) -> bool {
        !self.index.query_aabb(aabb).is_empty()
    }

    /// Mark or unmark this mesh as the picked one
    pub fn set_picked(&mut self, picked: bool) {
        self.picked = picked;
    }

    /// Whether this mesh is currently picked
    pub fn is_picked(&self) -> bool {
        self.picked
    }
}
