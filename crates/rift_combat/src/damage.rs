//! Combat stats and the defense formula

use serde::{Deserialize, Serialize};

/// Offensive and defensive numbers of one combatant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatStats {
    /// Base attack power
    pub attack_power: f32,
    /// Flat defense, see [`calculate_damage`]
    pub defense: f32,
    /// Chance of a critical hit (0.0 - 1.0)
    pub crit_rate: f32,
    /// Damage multiplier applied on a critical hit
    pub crit_damage: f32,
    /// Extra damage added to attack power
    pub weapon_damage: f32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            attack_power: 10.0,
            defense: 0.0,
            crit_rate: 0.05,
            crit_damage: 2.0,
            weapon_damage: 0.0,
        }
    }
}

impl CombatStats {
    /// Stats of a regular enemy
    pub fn enemy() -> Self {
        Self {
            attack_power: 10.0,
            defense: 5.0,
            crit_rate: 0.05,
            crit_damage: 1.5,
            weapon_damage: 0.0,
        }
    }

    /// Stats of the player character
    pub fn player() -> Self {
        Self {
            attack_power: 20.0,
            defense: 10.0,
            ..Default::default()
        }
    }

    pub fn with_attack_power(mut self, attack_power: f32) -> Self {
        self.attack_power = attack_power;
        self
    }

    pub fn with_defense(mut self, defense: f32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_crit(mut self, rate: f32, multiplier: f32) -> Self {
        self.crit_rate = rate;
        self.crit_damage = multiplier;
        self
    }

    /// Damage before crit and defense
    #[inline]
    pub fn raw_damage(&self) -> f32 {
        self.attack_power + self.weapon_damage
    }
}

/// Damage left after defense: `base * (1 - d / (d + 100))`, never below 1
pub fn calculate_damage(base: f32, defense: f32) -> f32 {
    let reduction = defense / (defense + 100.0);
    (base * (1.0 - reduction)).max(1.0)
}
