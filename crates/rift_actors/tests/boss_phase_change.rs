//! Boss crossing into phase two

use approx::assert_relative_eq;
use rift_actors::prelude::*;
use rift_ai::{PHASE_ONE, PHASE_TWO};
use rift_combat::HealthComponent;
use rift_math::Aabb;

const TARGET_ID: EntityId = EntityId::from_raw(100);

struct Target {
    position: Vec3,
    health: HealthComponent,
}

impl Target {
    fn at(x: f32) -> Self {
        Self {
            position: Vec3::new(x, 0.0, 0.0),
            health: HealthComponent::new(10_000.0),
        }
    }
}

impl Damageable for Target {
    fn entity_id(&self) -> EntityId {
        TARGET_ID
    }

    fn world_position(&self) -> Vec3 {
        self.position
    }

    fn world_aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position + Vec3::new(0.0, 90.0, 0.0), Vec3::new(10.0, 90.0, 10.0))
    }

    fn health(&self) -> &HealthComponent {
        &self.health
    }

    fn health_mut(&mut self) -> &mut HealthComponent {
        &mut self.health
    }
}

fn boss(heal_on_phase_change: bool) -> Enemy {
    let tuning = BossTuning {
        heal_on_phase_change,
        ..BossTuning::default()
    };
    let mut boss = Enemy::new_boss(
        EntityId::from_raw(1),
        ActorProfile::boss(),
        tuning,
        Vec3::ZERO,
        &PhysicsConfig::default(),
        99,
    );
    boss.set_target(Some(TARGET_ID));
    boss
}

fn phase(boss: &Enemy) -> Option<u8> {
    boss.boss_status().map(|b| b.phase)
}

#[test]
fn test_half_health_enters_phase_change_before_picking_a_skill() {
    let mut boss = boss(false);
    // In Combo3 range, so a skill would be picked if the phase check came second
    let mut target = Target::at(30.0);

    boss.health_mut().set_current(50.0);
    assert_relative_eq!(boss.health().health_percent(), 0.5);
    assert_eq!(phase(&boss), Some(PHASE_ONE));
    assert!(boss.boss_status().map_or(false, |b| !b.busy));

    let interval = boss.boss_ai().map_or(0.1, |ai| ai.tuning().think_interval);
    boss.update(Some(&mut target), None, interval);

    assert_eq!(phase(&boss), Some(PHASE_TWO));
    assert_eq!(boss.state_name(), Some("PhaseChange"));
    assert!(boss.boss_status().map_or(false, |b| b.busy && b.pending_skill().is_none()));
    assert_relative_eq!(boss.health().current, 50.0);
}

#[test]
fn test_phase_change_ignores_distance() {
    let mut boss = boss(false);
    let mut target = Target::at(5000.0);

    boss.health_mut().set_current(50.0);
    boss.update(Some(&mut target), None, 0.1);

    assert_eq!(phase(&boss), Some(PHASE_TWO));
    assert_eq!(boss.state_name(), Some("PhaseChange"));
}

#[test]
fn test_threshold_with_heal_refills_once() {
    let mut boss = boss(true);
    let mut target = Target::at(30.0);

    boss.health_mut().take_damage(60.0, Some(TARGET_ID));
    boss.update(Some(&mut target), None, 0.1);

    assert_eq!(phase(&boss), Some(PHASE_TWO));
    assert_eq!(boss.state_name(), Some("PhaseChange"));
    assert_relative_eq!(boss.health().current, 100.0);

    // Second crossing: no heal, and the roar is not interrupted
    boss.health_mut().take_damage(60.0, Some(TARGET_ID));
    boss.update(Some(&mut target), None, 0.1);
    assert_relative_eq!(boss.health().current, 40.0);
    assert_eq!(boss.state_name(), Some("PhaseChange"));
}

#[test]
fn test_roar_ends_with_buff_and_resumes_fighting() {
    let mut boss = boss(false);
    let mut target = Target::at(30.0);
    boss.health_mut().set_current(50.0);

    let dt = 1.0 / 60.0;
    let mut frames = 0;
    boss.update(Some(&mut target), None, 0.1);
    while boss.is_in_state("PhaseChange") && frames < 600 {
        boss.update(Some(&mut target), None, dt);
        frames += 1;
    }

    let seconds = frames as f32 * dt;
    assert_relative_eq!(seconds, 3.5, epsilon = 0.05);
    let Some(status) = boss.boss_status() else {
        panic!("boss lost its status");
    };
    assert_relative_eq!(status.move_multiplier, 1.2);
    assert_relative_eq!(status.damage_multiplier, 1.15);

    let mut hits = Vec::new();
    for _ in 0..180 {
        hits.extend(boss.update(Some(&mut target), None, dt));
    }
    assert!(!hits.is_empty());
    // 12 or 20 before the buff
    assert!(hits.iter().all(|h| h.damage > 13.0));
}

#[test]
fn test_dead_boss_makes_no_decisions() {
    let mut boss = boss(true);
    let mut target = Target::at(30.0);

    boss.health_mut().take_damage(1000.0, Some(TARGET_ID));
    for _ in 0..30 {
        boss.update(Some(&mut target), None, 0.1);
    }

    assert_eq!(boss.state_name(), Some("Dead"));
    assert_eq!(phase(&boss), Some(PHASE_ONE));
    assert_relative_eq!(target.health.current, 10_000.0);
}
