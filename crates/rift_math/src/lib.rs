//! # rift_math - Geometry for the Rift combat core
//!
//! Vectors and matrices come from [`glam`]; this crate adds the small amount
//! of geometry the colliders need on top:
//!
//! - [`Aabb`] axis-aligned boxes with the XZ shrink/inflate helpers used by hitboxes
//! - [`Ray`] with an unnormalized direction
//! - Möller-Trumbore [`ray_triangle`] intersection
//! - [`Transform`] carrying position, facing yaw and uniform scale

pub mod bounds;
pub mod intersect;
pub mod ray;
pub mod transform;

pub use glam::{Mat4, Vec2, Vec3};

pub use bounds::Aabb;
pub use intersect::{ray_triangle, TriangleHit, RAY_EPSILON};
pub use ray::Ray;
pub use transform::Transform;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bounds::Aabb;
    pub use crate::intersect::{ray_triangle, TriangleHit};
    pub use crate::ray::Ray;
    pub use crate::transform::Transform;
    pub use glam::{Mat4, Vec2, Vec3};
}
