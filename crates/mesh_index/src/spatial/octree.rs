//! Octree spatial index
//!
//! Recursive axis-aligned subdivision with a per-node triangle capacity
//! and a depth limit. Nodes subdivide lazily when capacity is first
//! exceeded; a triangle overlapping several octants is inserted into all
//! of them.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Vec3};
use crate::geometry::{Aabb, MeshGeometry, Ray, RayHit, Vertex};
use crate::spatial::SpatialIndex;

/// Configuration for octree subdivision
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Triangles a node holds directly before it subdivides
    pub max_per_node: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_per_node: 16,
        }
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// World-space bounds of this node
    pub bounds: Aabb,

    /// Triangles stored directly in this node
    pub triangles: Vec<usize>,

    /// Child octants, present once the node has subdivided
    pub children: Option<Box<[OctreeNode; 8]>>,
}

impl OctreeNode {
    fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            triangles: Vec::new(),
            children: None,
        }
    }

    /// Bounds of one octant, splitting this node's box at its center
    ///
    /// Bits 0, 1 and 2 of the octant index select the upper half along
    /// x, y and z independently.
    fn octant_bounds(&self, octant: usize) -> Aabb {
        let c = self.bounds.center();
        let (min, max) = (self.bounds.min, self.bounds.max);
        Aabb::new(
            Vec3::new(
                if octant & 1 != 0 { c.x } else { min.x },
                if octant & 2 != 0 { c.y } else { min.y },
                if octant & 4 != 0 { c.z } else { min.z },
            ),
            Vec3::new(
                if octant & 1 != 0 { max.x } else { c.x },
                if octant & 2 != 0 { max.y } else { c.y },
                if octant & 4 != 0 { max.z } else { c.z },
            ),
        )
    }

    fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }
        self.children = Some(Box::new(std::array::from_fn(|i| {
            Self::new(self.octant_bounds(i))
        })));
    }

    /// Recursive conservative insertion
    ///
    /// The depth limit overrides capacity, and the capacity check comes
    /// before any look at existing children: a node below capacity takes
    /// the triangle directly and never recurses. Past capacity the node
    /// subdivides (once) and the triangle goes into every child whose box
    /// its bounding box overlaps.
    fn insert(&mut self, triangle: usize, tri_bounds: &Aabb, depth: u32, config: &OctreeConfig) {
        if depth == config.max_depth {
            self.triangles.push(triangle);
            return;
        }

        if self.triangles.len() < config.max_per_node {
            self.triangles.push(triangle);
            return;
        }

        self.subdivide();

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if tri_bounds.intersects(&child.bounds) {
                    child.insert(triangle, tri_bounds, depth + 1, config);
                }
            }
        }
    }

    /// Append this node's triangles and descend into overlapping children
    fn query(&self, aabb: &Aabb, results: &mut Vec<usize>) {
        if !self.bounds.intersects(aabb) {
            return;
        }

        results.extend_from_slice(&self.triangles);

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(aabb, results);
            }
        }
    }
}

/// Octree over the mesh bounding box
#[derive(Debug, Clone)]
pub struct Octree {
    geometry: MeshGeometry,
    bounds: Aabb,
    root: Option<OctreeNode>,
    config: OctreeConfig,
}

impl Octree {
    /// Create an empty octree with the given subdivision limits
    pub fn new(config: OctreeConfig) -> Self {
        Self {
            geometry: MeshGeometry::new(),
            bounds: Aabb::empty(),
            root: None,
            config,
        }
    }

    /// World bounding box of the indexed geometry
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Root node, once built
    pub fn root(&self) -> Option<&OctreeNode> {
        self.root.as_ref()
    }

    /// Depth-first descent sharing one best-hit record
    ///
    /// Every subtree whose box the ray touches is visited; there is no
    /// pruning against the best t found so far. Returns whether anything
    /// in this subtree improved the record.
    fn raycast_node(&self, node: &OctreeNode, ray: &Ray, best: &mut RayHit) -> bool {
        if node
            .bounds
            .intersect_ray(ray.origin, ray.direction)
            .is_none()
        {
            return false;
        }

        let mut hit = false;
        for &tri in &node.triangles {
            if let Some(t) = self.geometry.triangle(tri).intersect_ray(ray) {
                if t < best.t {
                    best.t = t;
                    best.triangle = tri;
                    hit = true;
                }
            }
        }

        if let Some(children) = &node.children {
            for child in children.iter() {
                hit |= self.raycast_node(child, ray, best);
            }
        }
        hit
    }
}

impl SpatialIndex for Octree {
    fn build(&mut self, vertices: &[Vertex], indices: &[u32], transform: Mat4) {
        self.geometry.set_data(vertices, indices, transform);
        self.bounds = self.geometry.compute_bounds();
        self.root = Some(OctreeNode::new(self.bounds));

        for i in 0..self.geometry.triangle_count() {
            self.insert(i);
        }

        debug!(
            "built octree over {} triangles (depth limit {}, {} per node)",
            self.geometry.triangle_count(),
            self.config.max_depth,
            self.config.max_per_node
        );
    }

    fn insert(&mut self, triangle: usize) {
        let tri_bounds = self.geometry.triangle(triangle).bounds();
        let config = self.config;
        if let Some(root) = self.root.as_mut() {
            root.insert(triangle, &tri_bounds, 0, &config);
        }
    }

    fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        let root = self.root.as_ref()?;

        // The record starts at infinity; the triangle field only means
        // something once a hit has flipped the flag.
        let mut best = RayHit {
            t: f32::INFINITY,
            triangle: 0,
        };
        if self.raycast_node(root, ray, &mut best) {
            Some(best)
        } else {
            None
        }
    }

    fn query_aabb(&self, aabb: &Aabb) -> Vec<usize> {
        let mut results = Vec::new();
        if let Some(root) = &self.root {
            root.query(aabb, &mut results);
        }
        results
    }
}
