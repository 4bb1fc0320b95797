//! # rift_core - Rift Core Primitives
//!
//! Entity handles shared by every other crate in the workspace.
//!
//! Entities never own each other. Anything that needs to refer to another
//! entity (an enemy's target, the attacker recorded on a damage event) stores
//! an [`EntityId`] and looks the entity up again every time it is used.

pub mod id;

pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{EntityId, EntityIdAllocator};
}
