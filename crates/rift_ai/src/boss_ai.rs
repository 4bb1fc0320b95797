//! Boss skill selector
//!
//! Runs on a fixed think interval rather than every frame. Each decision
//! either forces the phase-two transition, starts a skill, or falls back to
//! chasing. Skill cooldowns tick down every update, whether or not the skill
//! is currently usable.

use crate::error::{AiError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Phase bit for the opening phase
pub const PHASE_ONE: u8 = 1;
/// Phase bit for the enraged phase
pub const PHASE_TWO: u8 = 2;

/// World units per metre
const fn metres(m: f32) -> f32 {
    m * 100.0
}

/// Static description of a selectable skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossSkill {
    pub name: String,
    /// Usable distance band, inclusive on both ends
    pub range_min: f32,
    pub range_max: f32,
    /// Seconds before the skill can be picked again
    pub cooldown: f32,
    /// Relative chance in the weighted draw
    pub weight: f32,
    /// Bitmask of phases the skill is available in
    pub phase_mask: u8,
}

impl BossSkill {
    pub fn new(name: impl Into<String>, range_min: f32, range_max: f32, cooldown: f32, weight: f32) -> Self {
        Self {
            name: name.into(),
            range_min,
            range_max,
            cooldown,
            weight,
            phase_mask: PHASE_ONE | PHASE_TWO,
        }
    }

    pub fn with_phase_mask(mut self, mask: u8) -> Self {
        self.phase_mask = mask;
        self
    }

    #[inline]
    pub fn available_in(&self, phase: u8) -> bool {
        self.phase_mask & phase != 0
    }

    #[inline]
    pub fn in_range(&self, distance: f32) -> bool {
        distance >= self.range_min && distance <= self.range_max
    }

    /// The stock four-skill table
    pub fn default_table() -> Vec<BossSkill> {
        vec![
            BossSkill::new("Combo3", 0.0, metres(0.5), 2.0, 1.0),
            BossSkill::new("DashSlash", metres(2.5), metres(3.0), 4.0, 0.9),
            BossSkill::new("GroundSlam", 0.0, metres(1.0), 6.0, 0.7),
            BossSkill::new("LeapSlam", metres(2.5), metres(5.0), 10.0, 1.2).with_phase_mask(PHASE_TWO),
        ]
    }
}

/// Boss decision and phase tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Seconds between decisions
    pub think_interval: f32,
    /// Health ratio at or below which phase two starts
    pub phase_two_threshold: f32,
    /// Beyond this distance phase two prefers the long-range skill
    pub long_range_threshold: f32,
    pub long_range_skill: String,
    pub phase_two_move_multiplier: f32,
    pub phase_two_damage_multiplier: f32,
    /// Length of the phase-change roar
    pub phase_change_duration: f32,
    /// Whether crossing the threshold through damage refills health once
    pub heal_on_phase_change: bool,
    pub skills: Vec<BossSkill>,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            think_interval: 0.1,
            phase_two_threshold: 0.5,
            long_range_threshold: metres(6.0),
            long_range_skill: "LeapSlam".to_string(),
            phase_two_move_multiplier: 1.2,
            phase_two_damage_multiplier: 1.15,
            phase_change_duration: 3.5,
            heal_on_phase_change: true,
            skills: BossSkill::default_table(),
        }
    }
}

impl BossTuning {
    /// Check every value the selector divides, draws or compares with
    pub fn validate(&self) -> Result<()> {
        if !self.think_interval.is_finite() || self.think_interval <= 0.0 {
            return Err(AiError::InvalidTuning(format!(
                "think_interval must be positive, got {}",
                self.think_interval
            )));
        }
        for skill in &self.skills {
            if !skill.weight.is_finite() {
                return Err(AiError::InvalidTuning(format!(
                    "skill {} has non-finite weight {}",
                    skill.name, skill.weight
                )));
            }
            if !skill.cooldown.is_finite() {
                return Err(AiError::InvalidTuning(format!(
                    "skill {} has non-finite cooldown {}",
                    skill.name, skill.cooldown
                )));
            }
            if skill.range_min.is_nan() || skill.range_max.is_nan() || skill.range_min > skill.range_max {
                return Err(AiError::InvalidTuning(format!(
                    "skill {} has an empty range {}..{}",
                    skill.name, skill.range_min, skill.range_max
                )));
            }
            if skill.phase_mask == 0 {
                return Err(AiError::InvalidTuning(format!(
                    "skill {} is not available in any phase",
                    skill.name
                )));
            }
        }
        let total: f32 = self.skills.iter().map(|s| s.weight.max(0.0)).sum();
        if !total.is_finite() {
            return Err(AiError::InvalidTuning("skill weights overflow".to_string()));
        }
        Ok(())
    }
}

/// What the selector reads from and writes to the boss it drives
pub trait BossHost {
    fn is_dead(&self) -> bool;

    /// Whether the boss is mid-action and must not be interrupted
    fn is_busy(&self) -> bool;

    fn phase(&self) -> u8;

    fn set_phase(&mut self, phase: u8);

    fn health_ratio(&self) -> f32;

    fn distance_to_target(&self) -> f32;

    fn set_pending_skill(&mut self, skill: &str);

    /// Ask the boss state machine to change state
    fn request_state(&mut self, state: &'static str);
}

/// Weighted draw over `candidates`.
///
/// Negative weights count as zero. If every weight is zero, or the total
/// is not finite, the first candidate wins; if rounding leaves a
/// remainder, the last one does.
pub fn pick_by_weight<'a, R>(candidates: &[&'a BossSkill], rng: &mut R) -> Option<&'a BossSkill>
where
    R: Rng + ?Sized,
{
    let first = *candidates.first()?;
    let sum: f32 = candidates.iter().map(|s| s.weight.max(0.0)).sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Some(first);
    }

    let mut r = rng.gen_range(0.0..=sum);
    for &skill in candidates {
        r -= skill.weight.max(0.0);
        if r <= 0.0 {
            return Some(skill);
        }
    }
    candidates.last().copied()
}

/// Cooldown-tracked skill selector for one boss
#[derive(Debug, Clone)]
pub struct BossAi {
    tuning: BossTuning,
    cooldowns: HashMap<String, f32>,
    think_timer: f32,
    enabled: bool,
}

impl BossAi {
    pub fn new(tuning: BossTuning) -> Self {
        let cooldowns = tuning.skills.iter().map(|s| (s.name.clone(), 0.0)).collect();
        Self {
            tuning,
            cooldowns,
            think_timer: 0.0,
            enabled: true,
        }
    }

    pub fn tuning(&self) -> &BossTuning {
        &self.tuning
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Seconds until `skill` can be picked again
    pub fn cooldown_remaining(&self, skill: &str) -> f32 {
        self.cooldowns.get(skill).copied().unwrap_or(0.0)
    }

    /// Advance cooldowns and, when the think interval has elapsed, make one decision
    pub fn update<H, R>(&mut self, host: &mut H, rng: &mut R, dt: f32)
    where
        H: BossHost + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.enabled {
            return;
        }

        for left in self.cooldowns.values_mut() {
            *left = (*left - dt).max(0.0);
        }

        if host.is_dead() || host.is_busy() {
            return;
        }

        self.think_timer += dt;
        if self.think_timer < self.tuning.think_interval {
            return;
        }
        self.think_timer = 0.0;

        self.decide(host, rng);
    }

    fn decide<H, R>(&mut self, host: &mut H, rng: &mut R)
    where
        H: BossHost + ?Sized,
        R: Rng + ?Sized,
    {
        if host.phase() == PHASE_ONE && host.health_ratio() <= self.tuning.phase_two_threshold {
            log::info!("Boss entering phase two");
            host.set_phase(PHASE_TWO);
            host.request_state("PhaseChange");
            return;
        }

        let distance = host.distance_to_target();
        let phase = host.phase();

        let candidates: Vec<&BossSkill> = self
            .tuning
            .skills
            .iter()
            .filter(|s| s.available_in(phase))
            .filter(|s| s.in_range(distance))
            .filter(|s| self.cooldowns.get(&s.name).copied().unwrap_or(0.0) <= 0.0)
            .collect();

        let long_range = (phase == PHASE_TWO && distance > self.tuning.long_range_threshold)
            .then(|| {
                candidates
                    .iter()
                    .find(|s| s.name == self.tuning.long_range_skill)
                    .copied()
            })
            .flatten();

        let pick = match long_range {
            Some(skill) => Some(skill),
            None => pick_by_weight(&candidates, rng),
        };

        match pick {
            Some(skill) => {
                let (name, cooldown) = (skill.name.clone(), skill.cooldown);
                log::debug!("Boss picked {} at distance {:.1}", name, distance);
                host.set_pending_skill(&name);
                host.request_state("Attack");
                self.cooldowns.insert(name, cooldown);
            }
            None => host.request_state("Chase"),
        }
    }
}

impl Default for BossAi {
    fn default() -> Self {
        Self::new(BossTuning::default())
    }
}
