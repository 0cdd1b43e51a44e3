//! Geometry primitives and mesh data
//!
//! Provides the transformed triangle soup the spatial structures index,
//! and the stateless intersection tests they share.
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, triangles, and ray/triangle intersection
//! - [`bounds`] - Axis-aligned bounding volumes
//! - [`mesh`] - Vertex data and the transform-aware triangle provider
//!
//! # Key Types
//!
//! - [`Ray`], [`Triangle`], [`RayHit`] - Query primitives
//! - [`Aabb`] - World-space bounding box
//! - [`Vertex`], [`MeshGeometry`] - Triangle soup with a model transform

pub mod bounds;
pub mod mesh;
pub mod primitives;

pub use bounds::Aabb;
pub use mesh::{MeshGeometry, Vertex};
pub use primitives::{Ray, RayHit, Triangle};
