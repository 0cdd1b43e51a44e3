//! Math utilities and types
//!
//! Provides fundamental math types for 3D geometry queries.

pub use nalgebra::{Matrix4, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3D integer vector type, used for grid cell coordinates
pub type IVec3 = Vector3<i32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;
