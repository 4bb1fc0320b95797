//! Per-frame context handed to actor states
//!
//! States never hold a reference to another actor. They read a snapshot of
//! their target taken at the start of the frame and queue strikes, which the
//! owning actor resolves right after its state machine has run.

use rift_combat::Damageable;
use rift_core::EntityId;
use rift_math::{Aabb, Vec3};

/// Snapshot of a target at the start of the owner's update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub id: EntityId,
    pub position: Vec3,
    pub aabb: Aabb,
    pub alive: bool,
}

impl TargetView {
    pub fn of<T: Damageable + ?Sized>(target: &T) -> Self {
        Self {
            id: target.entity_id(),
            position: target.world_position(),
            aabb: target.world_aabb(),
            alive: !target.is_dead(),
        }
    }
}

/// A hit a state wants delivered this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strike {
    /// Stat-based sweep of the owner's collider, inflated by its melee reach
    Melee,
    /// Flat damage to anything within `radius` of `origin`
    Radius { origin: Vec3, radius: f32, damage: f32 },
}

/// Context passed to every state callback
#[derive(Debug, Clone, Default)]
pub struct ActorFrame {
    pub target: Option<TargetView>,
    pub strikes: Vec<Strike>,
}

impl ActorFrame {
    /// The target, unless it is missing or dead
    pub fn live_target(&self) -> Option<&TargetView> {
        self.target.as_ref().filter(|t| t.alive)
    }

    /// Distance from `from` to the live target
    pub fn target_distance(&self, from: Vec3) -> Option<f32> {
        self.live_target().map(|t| from.distance(t.position))
    }

    pub fn strike(&mut self, strike: Strike) {
        self.strikes.push(strike);
    }

    pub(crate) fn take_strikes(&mut self) -> Vec<Strike> {
        std::mem::take(&mut self.strikes)
    }
}
