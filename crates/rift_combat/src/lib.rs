//! Rift Combat - Health, Damage and Melee
//!
//! # Features
//!
//! - Health component that queues [`HealthEvent`]s instead of firing callbacks
//! - Diminishing-returns defense formula
//! - Crit rolls through an injected `rand` RNG
//! - AABB melee sweeps and radius hits against any [`Damageable`]
//!
//! # Example
//!
//! ```ignore
//! use rift_combat::prelude::*;
//!
//! let mut health = HealthComponent::new(100.0);
//! health.take_damage(25.0, Some(attacker));
//! for event in health.drain_events() {
//!     // Hurt, then Died (once), then Changed
//! }
//! ```

pub mod damage;
pub mod health;
pub mod melee;

pub mod prelude {
    pub use crate::damage::{calculate_damage, CombatStats};
    pub use crate::health::{HealthComponent, HealthEvent};
    pub use crate::melee::{execute_melee, execute_radius_hit, strike, Damageable, HitReport};
}

pub use prelude::*;
