//! Health component and its event queue

use rift_core::EntityId;
use serde::{Deserialize, Serialize};

/// Events emitted by the health component.
///
/// A single `take_damage` call queues `Hurt`, then `Died` if that call
/// killed the owner, then `Changed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthEvent {
    /// Damage was taken
    Hurt {
        amount: f32,
        attacker: Option<EntityId>,
    },
    /// Health reached zero. Queued at most once per life.
    Died { attacker: Option<EntityId> },
    /// Current health changed
    Changed { current: f32, previous: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthComponent {
    /// Current health
    pub current: f32,
    /// Maximum health
    pub max: f32,
    /// Whether damage is ignored
    pub invincible: bool,
    /// Whether this entity is dead
    pub dead: bool,
    #[serde(skip)]
    events: Vec<HealthEvent>,
}

impl HealthComponent {
    /// Create a new health component at full health
    pub fn new(max_health: f32) -> Self {
        let max = max_health.max(0.0);
        Self {
            current: max,
            max,
            invincible: false,
            dead: false,
            events: Vec::new(),
        }
    }

    /// Apply damage. Ignored while invincible or dead; negative amounts count as zero.
    pub fn take_damage(&mut self, amount: f32, attacker: Option<EntityId>) {
        if self.invincible {
            log::trace!("Damage ignored: invincible");
            return;
        }
        if self.dead {
            log::trace!("Damage ignored: already dead");
            return;
        }

        let amount = amount.max(0.0);
        let previous = self.current;
        self.current = (self.current - amount).max(0.0);

        log::debug!(
            "Took {:.2} damage, health {:.2}/{:.2}",
            amount,
            self.current,
            self.max
        );

        self.events.push(HealthEvent::Hurt { amount, attacker });

        if self.current <= 0.0 && !self.dead {
            self.dead = true;
            self.events.push(HealthEvent::Died { attacker });
        }

        self.events.push(HealthEvent::Changed {
            current: self.current,
            previous,
        });
    }

    /// Restore health up to max. Ignored when dead.
    pub fn heal(&mut self, amount: f32) {
        if self.dead {
            return;
        }
        let previous = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.events.push(HealthEvent::Changed {
            current: self.current,
            previous,
        });
    }

    /// Change max health, clamping current health to it. Non-positive values are ignored.
    pub fn set_max(&mut self, max: f32) {
        if max <= 0.0 {
            log::warn!("Ignoring non-positive max health {}", max);
            return;
        }
        let previous = self.current;
        self.max = max;
        self.current = self.current.min(max);
        self.events.push(HealthEvent::Changed {
            current: self.current,
            previous,
        });
    }

    /// Set current health directly (clamped to `0..=max`). Positive health revives.
    pub fn set_current(&mut self, value: f32) {
        let previous = self.current;
        self.current = value.clamp(0.0, self.max);
        if self.current > 0.0 {
            self.dead = false;
        }
        self.events.push(HealthEvent::Changed {
            current: self.current,
            previous,
        });
    }

    /// Back to full health and alive (respawn)
    pub fn reset(&mut self) {
        let previous = self.current;
        self.current = self.max;
        self.dead = false;
        self.events.push(HealthEvent::Changed {
            current: self.current,
            previous,
        });
    }

    /// Refill to max without touching the dead flag
    pub fn full_heal(&mut self) {
        let previous = self.current;
        self.current = self.max;
        if previous != self.current {
            self.events.push(HealthEvent::Changed {
                current: self.current,
                previous,
            });
        }
    }

    pub fn set_invincible(&mut self, invincible: bool) {
        self.invincible = invincible;
    }

    /// Get health as a ratio (0.0 - 1.0)
    pub fn health_percent(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<HealthEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl Default for HealthComponent {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attacker() -> Option<EntityId> {
        Some(EntityId::from_raw(7))
    }

    #[test]
    fn test_damage_event_order() {
        let mut health = HealthComponent::new(100.0);
        health.take_damage(30.0, attacker());

        let events = health.drain_events();
        assert_eq!(
            events,
            vec![
                HealthEvent::Hurt { amount: 30.0, attacker: attacker() },
                HealthEvent::Changed { current: 70.0, previous: 100.0 },
            ]
        );
        assert!(health.drain_events().is_empty());
    }

    #[test]
    fn test_lethal_damage_emits_died_once() {
        let mut health = HealthComponent::new(50.0);
        health.take_damage(80.0, attacker());
        health.take_damage(10.0, attacker());

        let events = health.drain_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1], HealthEvent::Died { attacker: attacker() });
        assert_eq!(health.current, 0.0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_invincible_ignores_damage() {
        let mut health = HealthComponent::new(100.0);
        health.set_invincible(true);
        health.take_damage(30.0, None);
        assert_eq!(health.current, 100.0);
        assert!(!health.has_pending_events());
    }

    #[test]
    fn test_negative_damage_is_zero() {
        let mut health = HealthComponent::new(100.0);
        health.take_damage(-20.0, None);
        assert_eq!(health.current, 100.0);
        assert_eq!(
            health.drain_events()[0],
            HealthEvent::Hurt { amount: 0.0, attacker: None }
        );
    }

    #[test]
    fn test_heal_clamps_and_ignores_dead() {
        let mut health = HealthComponent::new(100.0);
        health.take_damage(40.0, None);
        health.heal(500.0);
        assert_eq!(health.current, 100.0);

        health.take_damage(100.0, None);
        health.heal(10.0);
        assert_eq!(health.current, 0.0);
    }

    #[test]
    fn test_reset_revives() {
        let mut health = HealthComponent::new(100.0);
        health.take_damage(100.0, None);
        health.reset();
        assert!(health.is_alive());
        assert_eq!(health.health_percent(), 1.0);
    }

    #[test]
    fn test_full_heal_without_change_is_silent() {
        let mut health = HealthComponent::new(100.0);
        health.full_heal();
        assert!(!health.has_pending_events());
        health.take_damage(50.0, None);
        health.drain_events();
        health.full_heal();
        assert_eq!(
            health.drain_events(),
            vec![HealthEvent::Changed { current: 100.0, previous: 50.0 }]
        );
    }

    #[test]
    fn test_set_max_clamps_current() {
        let mut health = HealthComponent::new(100.0);
        health.set_max(60.0);
        assert_eq!(health.current, 60.0);
        health.set_max(-1.0);
        assert_eq!(health.max, 60.0);
    }
}
