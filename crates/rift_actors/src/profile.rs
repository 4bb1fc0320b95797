//! Behaviour profiles
//!
//! One struct describes every kind of actor. The kind selects which state
//! set is registered; the numbers tune it.

use rift_combat::CombatStats;
use rift_math::{Aabb, Vec3};
use serde::{Deserialize, Serialize};

/// Which state set an actor runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Enemy,
    Boss,
    Player,
}

/// Movement, perception and combat tuning for one actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorProfile {
    pub kind: ActorKind,
    /// Walk speed (units/s); the patrol and chase speed of enemies
    pub move_speed: f32,
    /// Run speed of the player
    pub run_speed: f32,
    /// Upward launch speed of a jump
    pub jump_speed: f32,
    /// Turn rate in degrees per second
    pub rotate_speed: f32,
    /// Distance at which a target is noticed
    pub view_range: f32,
    /// Distance from the birth position beyond which an enemy gives up
    pub max_chase_range: f32,
    /// Distance at which a melee attack starts
    pub attack_range: f32,
    pub max_health: f32,
    pub stats: CombatStats,
    /// Fraction of the model's X/Z extents kept by the collider
    pub collider_shrink: f32,
    pub gravity: f32,
    /// Seconds a corpse stays before removal
    pub corpse_time: f32,
    /// Model-space bounds; the physics default box is used when absent
    pub model_bounds: Option<Aabb>,
}

impl Default for ActorProfile {
    fn default() -> Self {
        Self::normal_enemy()
    }
}

impl ActorProfile {
    /// Regular melee enemy
    pub fn normal_enemy() -> Self {
        Self {
            kind: ActorKind::Enemy,
            move_speed: 50.0,
            run_speed: 50.0,
            jump_speed: 0.0,
            rotate_speed: 180.0,
            view_range: 200.0,
            max_chase_range: 1000.0,
            attack_range: 80.0,
            max_health: 100.0,
            stats: CombatStats::enemy(),
            collider_shrink: 0.4,
            gravity: 980.0,
            corpse_time: 1.5,
            model_bounds: Some(Aabb::new(Vec3::new(-110.0, 0.0, -110.0), Vec3::new(110.0, 180.0, 110.0))),
        }
    }

    /// Two-phase boss
    pub fn boss() -> Self {
        Self {
            kind: ActorKind::Boss,
            move_speed: 40.0,
            run_speed: 40.0,
            rotate_speed: 120.0,
            view_range: 500.0,
            max_chase_range: 500.0,
            corpse_time: 3.0,
            model_bounds: Some(Aabb::new(Vec3::new(-150.0, 0.0, -150.0), Vec3::new(150.0, 260.0, 150.0))),
            ..Self::normal_enemy()
        }
    }

    /// Player character
    pub fn player() -> Self {
        Self {
            kind: ActorKind::Player,
            move_speed: 140.0,
            run_speed: 240.0,
            jump_speed: 520.0,
            rotate_speed: 720.0,
            view_range: 0.0,
            max_chase_range: 0.0,
            attack_range: 0.0,
            max_health: 100.0,
            stats: CombatStats::player(),
            collider_shrink: 0.4,
            gravity: 1400.0,
            corpse_time: 0.0,
            model_bounds: None,
        }
    }

    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_model_bounds(mut self, bounds: Aabb) -> Self {
        self.model_bounds = Some(bounds);
        self
    }
}
