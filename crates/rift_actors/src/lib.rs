//! Rift Actors - enemies, the boss, the player and the world they share
//!
//! Every actor is a body plus a [`rift_ai::StateMachine`] over it. States
//! never reach into other actors: they read a [`TargetView`] snapshot and
//! queue [`Strike`]s that the owning actor resolves after its state machine
//! has run. Health changes arrive as events drained at the start of the
//! owner's update.
//!
//! # Frame order
//!
//! ```text
//!   World::step(dt)
//!     pass 1: every collider ◄── transform
//!     pass 2: Player::update ──► Enemy::update (insertion order)
//!               │                    │
//!               │ events, FSM,       │ events, FSM, strikes,
//!               │ strikes, push-out, │ gravity + terrain,
//!               ▼ gravity + terrain  ▼ boss selector
//!     drop expired corpses
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rift_actors::prelude::*;
//!
//! let mut world = World::new(PhysicsConfig::default(), 7);
//! world.spawn_player(ActorProfile::player(), Vec3::ZERO);
//! world.spawn_enemy(ActorProfile::boss(), Vec3::new(300.0, 0.0, 0.0));
//! for _ in 0..600 {
//!     world.step(1.0 / 60.0);
//! }
//! ```

pub mod animation;
pub mod boss_states;
pub mod enemy;
pub mod enemy_states;
pub mod frame;
pub mod player;
pub mod player_states;
pub mod profile;
pub mod skills;
pub mod world;

pub mod prelude {
    pub use crate::animation::{Animator, ClipLibrary, DEFAULT_CLIP_DURATION};
    pub use crate::enemy::{BossStatus, Enemy, EnemyBody, NO_TARGET_DISTANCE, STAGGER_TIME};
    pub use crate::frame::{ActorFrame, Strike, TargetView};
    pub use crate::player::{MoveIntent, Player, PlayerBody, SkillCast};
    pub use crate::profile::{ActorKind, ActorProfile};
    pub use crate::skills::{SkillConfig, DEFAULT_SKILL};
    pub use crate::world::{ActorSnapshot, World};
    pub use rift_ai::BossTuning;
    pub use rift_combat::{Damageable, HitReport};
    pub use rift_core::EntityId;
    pub use rift_math::Vec3;
    pub use rift_physics::{PhysicsConfig, TerrainCollider, TerrainModel};
}

pub use prelude::*;
