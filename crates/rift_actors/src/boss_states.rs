//! Boss states
//!
//! The boss never decides on its own which skill to use. `Chase` simply
//! walks at the target; the selector running after each update pushes the
//! boss into `Attack` or `PhaseChange`. `busy` marks the states the
//! selector must not interrupt.

use crate::enemy::EnemyBody;
use crate::enemy_states::Dead;
use crate::frame::{ActorFrame, Strike};
use crate::skills::{SkillConfig, DEFAULT_SKILL};
use rift_ai::{State, StateMachine, Transition};
use rift_math::Vec3;

const HIT_DURATION: f32 = 0.8;

pub(crate) fn register(fsm: &mut StateMachine<EnemyBody, ActorFrame>) {
    fsm.register(BossIdle);
    fsm.register(BossChase);
    fsm.register(PhaseChange::default());
    fsm.register(BossAttack::default());
    fsm.register(BossHit::default());
    fsm.register(Dead::default());
}

#[derive(Debug)]
pub struct BossIdle;

impl State<EnemyBody, ActorFrame> for BossIdle {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        body.set_busy(false);
        body.play("idle", true);
    }

    fn on_update(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame, _dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }
        Transition::Stay
    }
}

#[derive(Debug)]
pub struct BossChase;

impl State<EnemyBody, ActorFrame> for BossChase {
    fn name(&self) -> &'static str {
        "Chase"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        body.set_busy(false);
        body.play("chase", true);
    }

    fn on_update(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }
        let Some(target) = frame.live_target() else {
            return Transition::To("Idle");
        };

        let multiplier = body.boss.as_ref().map_or(1.0, |b| b.move_multiplier);
        body.step_toward(target.position, body.profile.move_speed * multiplier, dt);
        Transition::Stay
    }
}

/// Roar, then apply the phase-two buff
#[derive(Debug, Default)]
pub struct PhaseChange {
    timer: f32,
}

impl State<EnemyBody, ActorFrame> for PhaseChange {
    fn name(&self) -> &'static str {
        "PhaseChange"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        body.set_busy(true);
        body.motion.stop_horizontal();
        body.play("roar", false);
    }

    fn on_update(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }

        self.timer += dt;
        let Some(boss) = body.boss.as_mut() else {
            return Transition::To("Chase");
        };
        if self.timer < boss.phase_change_duration() {
            return Transition::Stay;
        }

        boss.apply_phase_two_buff();
        boss.busy = false;
        Transition::To("Chase")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Windup,
    Move,
    Active,
    Recovery,
}

/// Run the pending skill through its stages
#[derive(Debug)]
pub struct BossAttack {
    stage: Stage,
    timer: f32,
    struck: bool,
    skill: SkillConfig,
    start: Vec3,
    goal: Vec3,
}

impl Default for BossAttack {
    fn default() -> Self {
        Self {
            stage: Stage::Windup,
            timer: 0.0,
            struck: false,
            skill: SkillConfig::lookup(DEFAULT_SKILL),
            start: Vec3::ZERO,
            goal: Vec3::ZERO,
        }
    }
}

impl BossAttack {
    fn goto(&mut self, stage: Stage) {
        self.stage = stage;
        self.timer = 0.0;
        if stage == Stage::Active {
            self.struck = false;
        }
    }
}

impl State<EnemyBody, ActorFrame> for BossAttack {
    fn name(&self) -> &'static str {
        "Attack"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame) {
        self.stage = Stage::Windup;
        self.timer = 0.0;
        self.struck = false;
        body.set_busy(true);

        let pending = body.boss.as_mut().and_then(|b| b.take_pending_skill());
        self.skill = SkillConfig::lookup(pending.as_deref().unwrap_or(DEFAULT_SKILL));
        body.play(self.skill.clip, false);
        log::debug!("Boss {} starts {}", body.id, self.skill.name);

        self.start = body.position();
        self.goal = frame.live_target().map_or(self.start, |t| t.position);

        // A locked dash stops `dash_distance` short of where the target stood
        if self.skill.move_time > 0.0 && self.skill.lock_target {
            let mut to_target = self.goal - self.start;
            to_target.y = 0.0;
            if to_target.length_squared() > 1e-6 {
                let len = to_target.length();
                let travel = (len - self.skill.dash_distance).max(0.0);
                self.goal = self.start + to_target / len * travel;
            }
        }
    }

    fn on_update(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }

        self.timer += dt;
        match self.stage {
            Stage::Windup => {
                if self.timer >= self.skill.windup {
                    if self.skill.move_time > 0.0 {
                        self.goto(Stage::Move);
                    } else {
                        self.goto(Stage::Active);
                    }
                }
            }
            Stage::Move => {
                let t = (self.timer / self.skill.move_time.max(1e-4)).min(1.0);
                let mut position = self.start.lerp(self.goal, t);
                position.y = body.transform.position.y;
                body.transform.face_direction(self.goal - self.start);
                body.transform.position = position;

                if self.timer >= self.skill.move_time {
                    self.goto(Stage::Active);
                }
            }
            Stage::Active => {
                if !self.struck {
                    self.struck = true;
                    let multiplier = body.boss.as_ref().map_or(1.0, |b| b.damage_multiplier);
                    frame.strike(Strike::Radius {
                        origin: body.position(),
                        radius: self.skill.radius,
                        damage: self.skill.damage * multiplier,
                    });
                }
                if self.timer >= self.skill.active {
                    self.goto(Stage::Recovery);
                    if let Some(clip) = self.skill.recovery_clip() {
                        body.play(clip, false);
                    }
                }
            }
            Stage::Recovery => {
                if self.timer >= self.skill.recovery {
                    body.set_busy(false);
                    return Transition::To("Chase");
                }
            }
        }
        Transition::Stay
    }

    fn on_exit(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        body.set_busy(false);
    }
}

#[derive(Debug, Default)]
pub struct BossHit {
    timer: f32,
}

impl State<EnemyBody, ActorFrame> for BossHit {
    fn name(&self) -> &'static str {
        "Hit"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        body.set_busy(true);
        body.play("hited", false);
    }

    fn on_update(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }
        self.timer += dt;
        if self.timer >= HIT_DURATION {
            return Transition::To("Chase");
        }
        Transition::Stay
    }

    fn on_exit(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        body.set_busy(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ClipLibrary;
    use crate::profile::ActorProfile;
    use crate::Enemy;
    use approx::assert_relative_eq;
    use rift_ai::BossTuning;
    use rift_combat::{Damageable, HealthComponent};
    use rift_core::EntityId;
    use rift_math::Aabb;
    use rift_physics::PhysicsConfig;

    const DT: f32 = 1.0 / 60.0;

    struct Dummy {
        position: Vec3,
        health: HealthComponent,
    }

    impl Damageable for Dummy {
        fn entity_id(&self) -> EntityId {
            EntityId::from_raw(50)
        }
        fn world_position(&self) -> Vec3 {
            self.position
        }
        fn world_aabb(&self) -> Aabb {
            Aabb::from_center_half_extents(self.position, Vec3::splat(10.0))
        }
        fn health(&self) -> &HealthComponent {
            &self.health
        }
        fn health_mut(&mut self) -> &mut HealthComponent {
            &mut self.health
        }
    }

    fn dummy_at(x: f32) -> Dummy {
        Dummy {
            position: Vec3::new(x, 0.0, 0.0),
            health: HealthComponent::new(1000.0),
        }
    }

    fn boss() -> Enemy {
        let mut boss = Enemy::new_boss(
            EntityId::from_raw(1),
            ActorProfile::boss(),
            BossTuning::default(),
            Vec3::ZERO,
            &PhysicsConfig::default(),
            3,
        )
        .with_animator(Box::new(ClipLibrary::new()));
        boss.set_target(Some(EntityId::from_raw(50)));
        boss
    }

    #[test]
    fn test_chase_without_target_idles() {
        let mut boss = boss();
        boss.update::<Dummy>(None, None, DT);
        assert_eq!(boss.state_name(), Some("Idle"));
    }

    #[test]
    fn test_chase_moves_at_boss_speed() {
        let mut boss = boss();
        let mut dummy = dummy_at(2000.0);
        for _ in 0..60 {
            boss.update(Some(&mut dummy), None, DT);
        }
        assert_eq!(boss.state_name(), Some("Chase"));
        assert_relative_eq!(boss.position().x, 40.0, epsilon = 0.5);
    }

    #[test]
    fn test_close_target_gets_combo_and_takes_damage() {
        let mut boss = boss();
        let mut dummy = dummy_at(30.0);

        let mut hits = Vec::new();
        let mut attacked = false;
        for _ in 0..120 {
            hits.extend(boss.update(Some(&mut dummy), None, DT));
            attacked |= boss.is_in_state("Attack");
        }

        assert!(attacked);
        assert!(!hits.is_empty());
        // Radius hits ignore defense
        assert!(hits.iter().all(|h| h.damage == 12.0 || h.damage == 20.0));
        assert!(dummy.health.current < 1000.0);
    }

    fn force_skill(boss: &mut Enemy, skill: &str) {
        if let Some(status) = boss.body_mut().boss.as_mut() {
            status.set_pending_skill(skill);
        }
        boss.change_state("Attack");
    }

    #[test]
    fn test_dash_stops_short_of_locked_target() {
        let mut boss = boss();
        let mut dummy = dummy_at(280.0);
        force_skill(&mut boss, "DashSlash");

        for _ in 0..40 {
            boss.update(Some(&mut dummy), None, DT);
        }
        // Locked at 280, stops 200 short
        assert_relative_eq!(boss.position().x, 80.0, epsilon = 1.0);
    }

    #[test]
    fn test_unknown_pending_skill_runs_default() {
        let mut boss = boss();
        force_skill(&mut boss, "Teleport");
        assert!(boss.body().animator.current().map_or(false, |(clip, _)| clip == "combo3"));
    }

    #[test]
    fn test_busy_while_attacking() {
        let mut boss = boss();
        force_skill(&mut boss, "GroundSlam");
        assert!(boss.boss_status().map_or(false, |b| b.busy));

        boss.change_state("Chase");
        assert!(boss.boss_status().map_or(false, |b| !b.busy));
    }

    #[test]
    fn test_phase_change_applies_buff() {
        let mut boss = boss();
        boss.change_state("PhaseChange");
        assert!(boss.boss_status().map_or(false, |b| b.busy));

        for _ in 0..((3.5 / DT) as usize + 2) {
            boss.update::<Dummy>(None, None, DT);
        }

        let Some(status) = boss.boss_status() else {
            panic!("boss lost its status");
        };
        assert_relative_eq!(status.move_multiplier, 1.2);
        assert_relative_eq!(status.damage_multiplier, 1.15);
        assert_ne!(boss.state_name(), Some("PhaseChange"));
    }
}
