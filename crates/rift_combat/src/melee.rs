//! Hit resolution against damageable actors

use crate::damage::{calculate_damage, CombatStats};
use crate::health::HealthComponent;
use rand::Rng;
use rift_core::EntityId;
use rift_math::{Aabb, Vec3};

/// Anything that can be hit: an entity with a world box and a health component
pub trait Damageable {
    fn entity_id(&self) -> EntityId;

    fn world_position(&self) -> Vec3;

    fn world_aabb(&self) -> Aabb;

    fn health(&self) -> &HealthComponent;

    fn health_mut(&mut self) -> &mut HealthComponent;

    /// Flat defense applied to stat-based strikes
    fn defense(&self) -> f32 {
        0.0
    }

    fn is_dead(&self) -> bool {
        self.health().is_dead()
    }
}

/// One landed hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReport {
    pub attacker: EntityId,
    pub target: EntityId,
    pub damage: f32,
    pub critical: bool,
}

/// Strike a single target with `stats`.
///
/// Returns `None` when the target is already dead. A crit multiplies the raw
/// damage before the target's defense is applied.
pub fn strike<T, R>(attacker: EntityId, stats: &CombatStats, target: &mut T, rng: &mut R) -> Option<HitReport>
where
    T: Damageable + ?Sized,
    R: Rng + ?Sized,
{
    if target.is_dead() {
        return None;
    }

    let mut total = stats.raw_damage();
    let critical = (rng.gen_range(0..100u32) as f32) < stats.crit_rate * 100.0;
    if critical {
        total *= stats.crit_damage;
        log::debug!("Critical hit on {}: {:.2}", target.entity_id(), total);
    }

    let damage = calculate_damage(total, target.defense());
    target.health_mut().take_damage(damage, Some(attacker));

    Some(HitReport {
        attacker,
        target: target.entity_id(),
        damage,
        critical,
    })
}

/// Sweep the attacker's box, inflated on X/Z by `reach`, across `targets`.
///
/// The attacker itself and dead targets are skipped. Every target whose
/// world box overlaps the sweep is struck; the reports list the hits.
pub fn execute_melee<'a, T, I, R>(
    attacker: EntityId,
    attacker_box: &Aabb,
    reach: f32,
    stats: &CombatStats,
    targets: I,
    rng: &mut R,
) -> Vec<HitReport>
where
    T: Damageable + ?Sized + 'a,
    I: IntoIterator<Item = &'a mut T>,
    R: Rng + ?Sized,
{
    let sweep = attacker_box.inflate_xz(reach);
    let mut hits = Vec::new();

    for target in targets {
        if target.entity_id() == attacker || target.is_dead() {
            continue;
        }

        if sweep.intersects(&target.world_aabb()) {
            if let Some(hit) = strike(attacker, stats, target, rng) {
                log::debug!("Melee {} -> {} for {:.2}", attacker, hit.target, hit.damage);
                hits.push(hit);
            }
        } else {
            log::trace!(
                "Melee {} missed {} at distance {:.1}",
                attacker,
                target.entity_id(),
                attacker_box.center().distance(target.world_position())
            );
        }
    }

    hits
}

/// Apply `damage` to `target` if it lies within `radius` of `origin`. Defense is not applied.
pub fn execute_radius_hit<T>(
    attacker: EntityId,
    origin: Vec3,
    radius: f32,
    damage: f32,
    target: &mut T,
) -> Option<HitReport>
where
    T: Damageable + ?Sized,
{
    if target.is_dead() {
        return None;
    }

    let distance = origin.distance(target.world_position());
    if distance > radius {
        log::debug!("Radius hit missed {} at {:.1} (radius {:.1})", target.entity_id(), distance, radius);
        return None;
    }

    target.health_mut().take_damage(damage, Some(attacker));
    Some(HitReport {
        attacker,
        target: target.entity_id(),
        damage,
        critical: false,
    })
}
