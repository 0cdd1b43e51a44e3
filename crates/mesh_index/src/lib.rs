//! # Mesh Index
//!
//! Spatial indexing for triangle meshes with two interchangeable
//! acceleration structures: a uniform grid and an octree.
//!
//! ## Features
//!
//! - **Nearest-Hit Raycasts**: closest-triangle queries for picking
//! - **Box Overlap Queries**: conservative candidate lists for collision
//! - **Interchangeable Structures**: grid and octree behind one trait
//! - **Transform-Aware Geometry**: triangles transformed on access,
//!   rebuilt wholesale when the model transform changes
//!
//! ## Quick Start
//!
//! ```rust
//! use mesh_index::prelude::*;
//!
//! let vertices = vec![
//!     Vertex::from_position(0.0, 0.0, 0.0),
//!     Vertex::from_position(1.0, 0.0, 0.0),
//!     Vertex::from_position(0.0, 1.0, 0.0),
//! ];
//! let indices = vec![0, 1, 2];
//!
//! let config = SpatialConfig::default();
//! let mesh = SpatialMesh::new(vertices, indices, IndexKind::Octree, &config);
//!
//! let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0));
//! let hit = mesh.raycast(&ray).expect("ray passes through the triangle");
//! assert_eq!(hit.triangle, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod spatial;

pub use config::{ConfigError, SpatialConfig};
pub use geometry::{Aabb, MeshGeometry, Ray, RayHit, Triangle, Vertex};
pub use spatial::{GridConfig, IndexKind, Octree, OctreeConfig, SpatialIndex, SpatialMesh, UniformGrid};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::SpatialConfig,
        foundation::math::{Mat4, Vec3},
        geometry::{Aabb, Ray, RayHit, Vertex},
        spatial::{IndexKind, SpatialIndex, SpatialMesh},
    };
}
