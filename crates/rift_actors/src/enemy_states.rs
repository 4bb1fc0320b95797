//! Normal enemy states
//!
//! ```text
//!   Idle ──timer──► Patrol ──timer/arrived──► Idle
//!    │                │
//!    └──── target in view ────► Chase ──in range──► Attack
//!                                 │  ▲                 │
//!              lost / too far ◄───┘  └──── cooldown ───┘
//!                    ▼
//!                  Return ──home──► Patrol
//! ```
//!
//! Every live state leaves for `Dead` once health runs out.

use crate::enemy::EnemyBody;
use crate::frame::{ActorFrame, Strike};
use rand::Rng;
use rift_ai::{State, StateMachine, Transition};
use rift_math::Vec3;
use std::f32::consts::TAU;

/// How close counts as having reached a patrol point or home
const ARRIVE_DISTANCE: f32 = 10.0;
const PATROL_RADIUS: f32 = 100.0;
/// Seconds into an attack when the hit lands
const ATTACK_HIT_TIME: f32 = 0.3;
const ATTACK_COOLDOWN: f32 = 3.0;
const HIT_DURATION: f32 = 0.5;

pub(crate) fn register(fsm: &mut StateMachine<EnemyBody, ActorFrame>) {
    fsm.register(Idle::default());
    fsm.register(Patrol::default());
    fsm.register(Chase);
    fsm.register(Attack::default());
    fsm.register(Hit::default());
    fsm.register(Dead::default());
    fsm.register(Return);
}

fn target_in_view(body: &EnemyBody, frame: &ActorFrame) -> bool {
    frame
        .target_distance(body.position())
        .map_or(false, |d| d <= body.profile.view_range)
}

#[derive(Debug, Default)]
pub struct Idle {
    timer: f32,
    duration: f32,
}

impl State<EnemyBody, ActorFrame> for Idle {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        self.duration = body.rng.gen_range(1.0f32..=3.0);
        body.motion.stop_horizontal();
        body.play("idle", true);
    }

    fn on_update(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }

        self.timer += dt;
        if self.timer >= self.duration {
            return Transition::To("Patrol");
        }
        if target_in_view(body, frame) {
            return Transition::To("Chase");
        }
        Transition::Stay
    }
}

/// Wander to a random point on a circle around the birth position
#[derive(Debug, Default)]
pub struct Patrol {
    timer: f32,
    duration: f32,
    goal: Vec3,
}

impl State<EnemyBody, ActorFrame> for Patrol {
    fn name(&self) -> &'static str {
        "Patrol"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        self.duration = body.rng.gen_range(3.0f32..=7.0);
        let angle = body.rng.gen_range(0.0f32..TAU);
        self.goal = body.birth + Vec3::new(angle.cos(), 0.0, angle.sin()) * PATROL_RADIUS;
        body.play("patrol", true);
    }

    fn on_update(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }

        self.timer += dt;
        if target_in_view(body, frame) {
            return Transition::To("Chase");
        }

        if body.can_move() {
            if body.horizontal_distance(self.goal) <= ARRIVE_DISTANCE {
                return Transition::To("Idle");
            }
            body.step_toward(self.goal, body.profile.move_speed, dt);
        }

        if self.timer >= self.duration {
            return Transition::To("Idle");
        }
        Transition::Stay
    }
}

#[derive(Debug)]
pub struct Chase;

impl State<EnemyBody, ActorFrame> for Chase {
    fn name(&self) -> &'static str {
        "Chase"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        body.play("chase", false);
    }

    fn on_update(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }

        let Some(target) = frame.live_target() else {
            return Transition::To("Return");
        };
        let goal = target.position;
        let position = body.position();

        if position.distance(body.birth) > body.profile.max_chase_range {
            log::debug!("{} gave up the chase", body.id);
            return Transition::To("Return");
        }

        let distance = position.distance(goal);
        if distance > body.profile.view_range {
            return Transition::To("Return");
        }
        if distance <= body.profile.attack_range && body.can_attack() {
            return Transition::To("Attack");
        }

        if body.can_move() {
            body.step_toward(goal, body.profile.move_speed, dt);
        }
        Transition::Stay
    }
}

/// One melee swing per cooldown period
#[derive(Debug, Default)]
pub struct Attack {
    timer: f32,
    struck: bool,
}

impl Attack {
    fn begin_swing(&mut self, body: &mut EnemyBody, frame: &ActorFrame) {
        self.timer = 0.0;
        self.struck = false;
        if let Some(target) = frame.live_target() {
            body.transform.face_direction(target.position - body.position());
        }
        body.play("attack", false);
    }
}

impl State<EnemyBody, ActorFrame> for Attack {
    fn name(&self) -> &'static str {
        "Attack"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame) {
        body.motion.stop_horizontal();
        self.begin_swing(body, frame);
    }

    fn on_update(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }

        self.timer += dt;
        if !self.struck && self.timer >= ATTACK_HIT_TIME {
            self.struck = true;
            if frame.live_target().is_some() {
                frame.strike(Strike::Melee);
            }
        }

        if self.timer < ATTACK_COOLDOWN {
            return Transition::Stay;
        }

        match frame.target_distance(body.position()) {
            Some(d) if d <= body.profile.view_range => {
                if body.can_attack() {
                    self.begin_swing(body, frame);
                    Transition::Stay
                } else {
                    Transition::To("Chase")
                }
            }
            _ => Transition::To("Return"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Hit {
    timer: f32,
}

impl State<EnemyBody, ActorFrame> for Hit {
    fn name(&self) -> &'static str {
        "Hit"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        body.play("hited", false);
    }

    fn on_update(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }

        self.timer += dt;
        if self.timer < HIT_DURATION {
            return Transition::Stay;
        }

        match frame.target_distance(body.position()) {
            None => Transition::To("Return"),
            Some(d) if d <= body.profile.attack_range => {
                if body.can_attack() {
                    Transition::To("Attack")
                } else {
                    Transition::To("Chase")
                }
            }
            Some(d) if d <= body.profile.view_range => Transition::To("Chase"),
            Some(_) => Transition::To("Return"),
        }
    }
}

/// Terminal state, shared with the boss. Flags the corpse for removal after `corpse_time`.
#[derive(Debug, Default)]
pub struct Dead {
    timer: f32,
}

impl State<EnemyBody, ActorFrame> for Dead {
    fn name(&self) -> &'static str {
        "Dead"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        self.timer = 0.0;
        body.set_busy(true);
        body.disable();
        body.play("dying", false);
    }

    fn on_update(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_removable() {
            return Transition::Stay;
        }
        self.timer += dt;
        if self.timer >= body.profile.corpse_time {
            log::debug!("{} ready for removal", body.id);
            body.mark_removable();
        }
        Transition::Stay
    }
}

/// Walk home, then resume patrolling
#[derive(Debug)]
pub struct Return;

impl State<EnemyBody, ActorFrame> for Return {
    fn name(&self) -> &'static str {
        "Return"
    }

    fn on_enter(&mut self, body: &mut EnemyBody, _frame: &mut ActorFrame) {
        body.play("patrol", true);
    }

    fn on_update(&mut self, body: &mut EnemyBody, frame: &mut ActorFrame, dt: f32) -> Transition {
        if body.is_dead() {
            return Transition::To("Dead");
        }
        if target_in_view(body, frame) {
            return Transition::To("Chase");
        }
        if !body.can_move() {
            return Transition::Stay;
        }

        let home = body.birth;
        if body.horizontal_distance(home) > ARRIVE_DISTANCE {
            body.step_toward(home, body.profile.move_speed, dt);
            return Transition::Stay;
        }

        body.transform.position.x = home.x;
        body.transform.position.z = home.z;
        Transition::To("Patrol")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::TargetView;
    use crate::profile::ActorProfile;
    use crate::Enemy;
    use rift_combat::Damageable;
    use rift_core::EntityId;
    use rift_math::Aabb;
    use rift_physics::PhysicsConfig;

    const DT: f32 = 1.0 / 60.0;

    /// Minimal target standing still at a fixed spot
    struct Dummy {
        id: EntityId,
        position: Vec3,
        health: rift_combat::HealthComponent,
    }

    impl Dummy {
        fn at(x: f32) -> Self {
            Self {
                id: EntityId::from_raw(99),
                position: Vec3::new(x, 0.0, 0.0),
                health: rift_combat::HealthComponent::new(100.0),
            }
        }
    }

    impl Damageable for Dummy {
        fn entity_id(&self) -> EntityId {
            self.id
        }
        fn world_position(&self) -> Vec3 {
            self.position
        }
        fn world_aabb(&self) -> Aabb {
            Aabb::from_center_half_extents(self.position + Vec3::new(0.0, 90.0, 0.0), Vec3::new(10.0, 90.0, 10.0))
        }
        fn health(&self) -> &rift_combat::HealthComponent {
            &self.health
        }
        fn health_mut(&mut self) -> &mut rift_combat::HealthComponent {
            &mut self.health
        }
    }

    fn hunter() -> Enemy {
        let mut enemy = Enemy::new(
            EntityId::from_raw(1),
            ActorProfile::normal_enemy(),
            Vec3::ZERO,
            &PhysicsConfig::default(),
            11,
        );
        enemy.set_target(Some(EntityId::from_raw(99)));
        enemy
    }

    #[test]
    fn test_idle_sees_target_and_chases() {
        let mut enemy = hunter();
        let mut dummy = Dummy::at(150.0);
        enemy.update(Some(&mut dummy), None, DT);
        assert_eq!(enemy.state_name(), Some("Chase"));
    }

    #[test]
    fn test_target_out_of_view_is_ignored() {
        let mut enemy = hunter();
        let mut dummy = Dummy::at(250.0);
        enemy.update(Some(&mut dummy), None, DT);
        assert_eq!(enemy.state_name(), Some("Idle"));
    }

    #[test]
    fn test_untracked_target_is_ignored() {
        let mut enemy = hunter();
        enemy.set_target(None);
        let mut dummy = Dummy::at(50.0);
        enemy.update(Some(&mut dummy), None, DT);
        assert_eq!(enemy.state_name(), Some("Idle"));
    }

    #[test]
    fn test_chase_closes_in_and_attacks() {
        let mut enemy = hunter();
        let mut dummy = Dummy::at(150.0);

        let mut hits = Vec::new();
        for _ in 0..(60 * 4) {
            hits.extend(enemy.update(Some(&mut dummy), None, DT));
        }

        // 70 units at 50/s, then a swing that lands 0.3 s later
        assert!(enemy.position().x > 60.0);
        assert!(!hits.is_empty());
        assert!(dummy.health.current < 100.0);
        assert!(hits.iter().all(|h| h.target == dummy.id));
    }

    #[test]
    fn test_attack_without_target_returns_home() {
        let mut enemy = hunter();
        let mut dummy = Dummy::at(60.0);
        enemy.update(Some(&mut dummy), None, DT);
        enemy.update(Some(&mut dummy), None, DT);
        assert_eq!(enemy.state_name(), Some("Attack"));

        dummy.health.take_damage(1000.0, None);
        for _ in 0..(60 * 3 + 5) {
            enemy.update(Some(&mut dummy), None, DT);
        }
        assert!(matches!(enemy.state_name(), Some("Return") | Some("Patrol")));
    }

    #[test]
    fn test_chase_gives_up_far_from_home() {
        let mut enemy = hunter();
        let mut dummy = Dummy::at(1150.0);
        enemy.body_mut().transform.position.x = 1010.0;
        enemy.change_state("Chase");
        enemy.update(Some(&mut dummy), None, DT);
        assert_eq!(enemy.state_name(), Some("Return"));
    }

    #[test]
    fn test_return_snaps_home_then_patrols() {
        let mut enemy = hunter();
        enemy.body_mut().transform.position = Vec3::new(30.0, 0.0, 0.0);
        enemy.change_state("Return");

        for _ in 0..60 {
            enemy.update::<Dummy>(None, None, DT);
            if enemy.is_in_state("Patrol") {
                break;
            }
        }
        assert_eq!(enemy.state_name(), Some("Patrol"));
        assert_eq!(enemy.position().x, 0.0);
        assert_eq!(enemy.position().z, 0.0);
    }

    #[test]
    fn test_patrol_stays_near_birth() {
        let mut enemy = hunter();
        enemy.change_state("Patrol");
        for _ in 0..(60 * 10) {
            enemy.update::<Dummy>(None, None, DT);
            assert!(enemy.body().horizontal_distance(Vec3::ZERO) <= PATROL_RADIUS + 1.0);
        }
    }

    #[test]
    fn test_target_view_reads_damageable() {
        let dummy = Dummy::at(5.0);
        let view = TargetView::of(&dummy);
        assert_eq!(view.id, dummy.id);
        assert!(view.alive);
        assert_eq!(view.position.x, 5.0);
    }
}
