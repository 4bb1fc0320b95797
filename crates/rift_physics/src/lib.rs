//! Rift Physics - terrain and character collision
//!
//! There is no rigid-body simulation here. Actors are kinematic: they move
//! by intent, fall under a constant gravity and follow the ground found by
//! casting a ray straight down into the terrain collider.
//!
//! # Architecture
//!
//! ```text
//!   .obj text ──► mesh::parse_obj ──► Vec<Triangle> ──► SpatialGrid (32x32 over XZ)
//!                      │ (empty / unreadable)                 │
//!                      ▼                                      ▼
//!               mesh::flat_floor                     TerrainCollider::ray_intersects
//!                                                             │
//!   CharacterCollider (local AABB ─► world AABB)              ▼
//!        │  check_collision / collision_offset       KinematicBody::settle
//!        └──────────────── push-out ─────────────────────────►
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rift_physics::prelude::*;
//!
//! let terrain = TerrainCollider::from_model(&TerrainModel::default(), None, &PhysicsConfig::default());
//! let ground = terrain.ground_height(Vec3::new(0.0, 0.0, 0.0), 500.0);
//! ```

pub mod character;
pub mod config;
pub mod error;
pub mod grid;
pub mod mesh;
pub mod motion;
pub mod terrain;

pub mod prelude {
    //! Common imports for collision functionality
    pub use crate::character::{CharacterCollider, ModelGeometry};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::grid::SpatialGrid;
    pub use crate::mesh::{TerrainModel, Triangle};
    pub use crate::motion::{KinematicBody, MotionParams};
    pub use crate::terrain::TerrainCollider;
    pub use rift_math::{Aabb, Ray, Transform, Vec3};
}

pub use prelude::*;
