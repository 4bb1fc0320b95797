//! Enemies and the boss
//!
//! Both run on the same body and update loop. The profile's kind decides
//! which state set is registered, and a boss additionally carries a
//! [`BossStatus`] and a [`BossAi`] that makes decisions after each update.

use crate::animation::{Animator, ClipLibrary};
use crate::frame::{ActorFrame, Strike, TargetView};
use crate::profile::{ActorKind, ActorProfile};
use crate::{boss_states, enemy_states};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rift_ai::{BossAi, BossHost, BossTuning, StateMachine, PHASE_ONE, PHASE_TWO};
use rift_combat::{execute_melee, execute_radius_hit, Damageable, HealthComponent, HealthEvent, HitReport};
use rift_core::EntityId;
use rift_math::{Aabb, Transform, Vec3};
use rift_physics::{CharacterCollider, KinematicBody, ModelGeometry, MotionParams, PhysicsConfig, TerrainCollider};

/// Distance the boss selector sees when there is no live target
pub const NO_TARGET_DISTANCE: f32 = 1.0e9;

/// Seconds a hurt enemy can neither move nor attack
pub const STAGGER_TIME: f32 = 0.5;

/// Phase, action lock and phase-two buffs of a boss
#[derive(Debug, Clone, PartialEq)]
pub struct BossStatus {
    pub phase: u8,
    /// Mid-action; the selector leaves the boss alone
    pub busy: bool,
    pub move_multiplier: f32,
    pub damage_multiplier: f32,
    pending_skill: Option<String>,
    healed_once: bool,
    phase_two_threshold: f32,
    heal_on_phase_change: bool,
    phase_change_duration: f32,
    phase_two_move_multiplier: f32,
    phase_two_damage_multiplier: f32,
}

impl BossStatus {
    pub fn from_tuning(tuning: &BossTuning) -> Self {
        Self {
            phase: PHASE_ONE,
            busy: false,
            move_multiplier: 1.0,
            damage_multiplier: 1.0,
            pending_skill: None,
            healed_once: false,
            phase_two_threshold: tuning.phase_two_threshold,
            heal_on_phase_change: tuning.heal_on_phase_change,
            phase_change_duration: tuning.phase_change_duration,
            phase_two_move_multiplier: tuning.phase_two_move_multiplier,
            phase_two_damage_multiplier: tuning.phase_two_damage_multiplier,
        }
    }

    pub fn pending_skill(&self) -> Option<&str> {
        self.pending_skill.as_deref()
    }

    pub fn set_pending_skill(&mut self, skill: impl Into<String>) {
        self.pending_skill = Some(skill.into());
    }

    pub fn take_pending_skill(&mut self) -> Option<String> {
        self.pending_skill.take()
    }

    pub fn phase_change_duration(&self) -> f32 {
        self.phase_change_duration
    }

    pub fn apply_phase_two_buff(&mut self) {
        self.move_multiplier = self.phase_two_move_multiplier;
        self.damage_multiplier = self.phase_two_damage_multiplier;
        log::info!(
            "Boss buffed: move x{:.2}, damage x{:.2}",
            self.move_multiplier,
            self.damage_multiplier
        );
    }
}

/// Everything enemy states read and write
#[derive(Debug)]
pub struct EnemyBody {
    pub id: EntityId,
    pub profile: ActorProfile,
    pub transform: Transform,
    pub motion: KinematicBody,
    pub params: MotionParams,
    pub collider: CharacterCollider,
    pub health: HealthComponent,
    /// Spawn point; patrols circle it and returns walk back to it
    pub birth: Vec3,
    pub boss: Option<BossStatus>,
    pub animator: Box<dyn Animator>,
    pub rng: StdRng,
    melee_reach: f32,
    can_move: bool,
    can_attack: bool,
    stagger: f32,
    removable: bool,
}

impl EnemyBody {
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn can_move(&self) -> bool {
        self.can_move && !self.is_dead()
    }

    pub fn can_attack(&self) -> bool {
        self.can_attack && !self.is_dead()
    }

    /// Suspend moving and attacking for `duration` seconds
    pub fn stagger(&mut self, duration: f32) {
        self.can_move = false;
        self.can_attack = false;
        self.stagger = duration;
    }

    fn tick_stagger(&mut self, dt: f32) {
        if self.stagger <= 0.0 {
            return;
        }
        self.stagger -= dt;
        if self.stagger <= 0.0 && !self.is_dead() {
            self.stagger = 0.0;
            self.can_move = true;
            self.can_attack = true;
        }
    }

    /// Permanently stop moving and attacking
    pub fn disable(&mut self) {
        self.can_move = false;
        self.can_attack = false;
        self.motion.stop_horizontal();
    }

    pub fn mark_removable(&mut self) {
        self.removable = true;
    }

    pub fn is_removable(&self) -> bool {
        self.removable
    }

    pub fn play(&mut self, clip: &str, looping: bool) {
        self.animator.play(clip, looping);
    }

    pub fn set_busy(&mut self, busy: bool) {
        if let Some(boss) = self.boss.as_mut() {
            boss.busy = busy;
        }
    }

    /// Distance to `point` on the XZ plane
    pub fn horizontal_distance(&self, point: Vec3) -> f32 {
        let d = point - self.transform.position;
        (d.x * d.x + d.z * d.z).sqrt()
    }

    /// Walk toward `goal` on the XZ plane without overshooting it
    pub fn step_toward(&mut self, goal: Vec3, speed: f32, dt: f32) {
        let mut dir = goal - self.transform.position;
        dir.y = 0.0;
        let len = dir.length();
        if len <= 1e-3 {
            return;
        }
        let dir = dir / len;
        let step = (speed * dt).min(len);
        self.transform.position += dir * step;
        self.transform.turn_toward(dir, self.profile.rotate_speed * dt);
    }
}

#[derive(Debug)]
struct BossBrain {
    ai: BossAi,
    rng: StdRng,
}

/// An enemy actor: body, state machine and, for a boss, its decision maker
#[derive(Debug)]
pub struct Enemy {
    body: EnemyBody,
    fsm: StateMachine<EnemyBody, ActorFrame>,
    frame: ActorFrame,
    brain: Option<BossBrain>,
    target: Option<EntityId>,
}

impl Enemy {
    /// Spawn an enemy of the profile's kind. A boss profile gets the default tuning.
    pub fn new(id: EntityId, profile: ActorProfile, position: Vec3, config: &PhysicsConfig, seed: u64) -> Self {
        match profile.kind {
            ActorKind::Boss => Self::new_boss(id, profile, BossTuning::default(), position, config, seed),
            ActorKind::Enemy => Self::build(id, profile, None, position, config, seed),
            ActorKind::Player => {
                log::warn!("Player profile used for enemy {}; spawning a normal enemy", id);
                let profile = ActorProfile {
                    kind: ActorKind::Enemy,
                    ..profile
                };
                Self::build(id, profile, None, position, config, seed)
            }
        }
    }

    pub fn new_boss(
        id: EntityId,
        profile: ActorProfile,
        tuning: BossTuning,
        position: Vec3,
        config: &PhysicsConfig,
        seed: u64,
    ) -> Self {
        let profile = ActorProfile {
            kind: ActorKind::Boss,
            ..profile
        };
        Self::build(id, profile, Some(tuning), position, config, seed)
    }

    fn build(
        id: EntityId,
        profile: ActorProfile,
        tuning: Option<BossTuning>,
        position: Vec3,
        config: &PhysicsConfig,
        seed: u64,
    ) -> Self {
        let model = profile.model_bounds.map(ModelGeometry::from_bounds).unwrap_or_default();
        let collider =
            CharacterCollider::calculate_bounding_box(&model, profile.collider_shrink, config.default_character_box);
        let transform = Transform::from_position(position);

        let mut body = EnemyBody {
            id,
            params: MotionParams::from_config(config, profile.gravity),
            health: HealthComponent::new(profile.max_health),
            boss: tuning.as_ref().map(BossStatus::from_tuning),
            profile,
            transform,
            motion: KinematicBody::default(),
            collider,
            birth: position,
            animator: Box::new(ClipLibrary::new()),
            rng: StdRng::seed_from_u64(seed),
            melee_reach: config.melee_reach,
            can_move: true,
            can_attack: true,
            stagger: 0.0,
            removable: false,
        };
        body.collider.update(&body.transform);

        let mut fsm = StateMachine::new();
        let initial = if tuning.is_some() {
            boss_states::register(&mut fsm);
            "Chase"
        } else {
            enemy_states::register(&mut fsm);
            "Idle"
        };

        let mut frame = ActorFrame::default();
        fsm.init(&mut body, &mut frame, initial);

        let brain = tuning.map(|tuning| BossBrain {
            ai: BossAi::new(tuning),
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
        });

        log::debug!("Spawned {:?} {} at {:?}", body.profile.kind, id, position);

        Self {
            body,
            fsm,
            frame,
            brain,
            target: None,
        }
    }

    /// Swap the animator, replaying the clip that is currently running
    pub fn with_animator(mut self, mut animator: Box<dyn Animator>) -> Self {
        if let Some((clip, looping)) = self.body.animator.current() {
            let clip = clip.to_string();
            animator.play(&clip, looping);
        }
        self.body.animator = animator;
        self
    }

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn kind(&self) -> ActorKind {
        self.body.profile.kind
    }

    pub fn is_boss(&self) -> bool {
        self.brain.is_some()
    }

    pub fn body(&self) -> &EnemyBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut EnemyBody {
        &mut self.body
    }

    pub fn boss_status(&self) -> Option<&BossStatus> {
        self.body.boss.as_ref()
    }

    pub fn boss_ai(&self) -> Option<&BossAi> {
        self.brain.as_ref().map(|b| &b.ai)
    }

    pub fn boss_ai_mut(&mut self) -> Option<&mut BossAi> {
        self.brain.as_mut().map(|b| &mut b.ai)
    }

    pub fn state_name(&self) -> Option<&'static str> {
        self.fsm.current_state_name()
    }

    pub fn is_in_state(&self, name: &str) -> bool {
        self.fsm.is_in_state(name)
    }

    pub fn position(&self) -> Vec3 {
        self.body.transform.position
    }

    pub fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    /// Corpse has lingered long enough to be dropped from the world
    pub fn is_removable(&self) -> bool {
        self.body.is_removable()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    /// Force a state change from outside the state machine
    pub fn change_state(&mut self, name: &str) -> bool {
        self.fsm.change_state(&mut self.body, &mut self.frame, name)
    }

    /// Re-derive the world box from the current transform
    pub fn refresh_collider(&mut self) {
        self.body.collider.update(&self.body.transform);
    }

    /// Advance one frame.
    ///
    /// `target` is ignored unless it is the entity this enemy is hunting.
    /// Strikes queued by the states land on it before this returns.
    pub fn update<T>(&mut self, target: Option<&mut T>, terrain: Option<&TerrainCollider>, dt: f32) -> Vec<HitReport>
    where
        T: Damageable + ?Sized,
    {
        let hunting = self.target;
        let mut target = target.filter(|t| Some(t.entity_id()) == hunting);
        self.frame.target = target.as_deref().map(TargetView::of);

        self.handle_health_events();
        self.body.tick_stagger(dt);
        self.fsm.update(&mut self.body, &mut self.frame, dt);
        let hits = self.resolve_strikes(target.as_deref_mut());

        let body = &mut self.body;
        body.motion.apply_gravity(&body.params, terrain.is_some(), dt);
        let old = body.transform.position;
        let proposed = body.motion.proposed(old, dt);
        body.transform.position = body.motion.settle(old, proposed, terrain, &body.params, dt);
        body.collider.update(&body.transform);

        if let Some(brain) = self.brain.as_mut() {
            let mut host = BossDriver {
                body: &mut self.body,
                fsm: &mut self.fsm,
                frame: &mut self.frame,
            };
            brain.ai.update(&mut host, &mut brain.rng, dt);
        }

        hits
    }

    fn handle_health_events(&mut self) {
        for event in self.body.health.drain_events() {
            match event {
                HealthEvent::Hurt { amount, attacker } => self.on_hurt(amount, attacker),
                HealthEvent::Died { attacker } => self.on_died(attacker),
                HealthEvent::Changed { .. } => self.on_health_changed(),
            }
        }
    }

    fn on_hurt(&mut self, amount: f32, attacker: Option<EntityId>) {
        if self.body.is_dead() {
            return;
        }
        log::debug!(
            "{} hurt for {:.1} by {}",
            self.body.id,
            amount,
            attacker.unwrap_or(EntityId::NULL)
        );

        if self.body.boss.is_some() {
            // The roar cannot be interrupted, or the phase-two buff would be lost
            if self.fsm.is_in_state("PhaseChange") {
                return;
            }
        } else {
            self.body.stagger(STAGGER_TIME);
        }
        self.change_state("Hit");
    }

    fn on_died(&mut self, attacker: Option<EntityId>) {
        log::info!("{} killed by {}", self.body.id, attacker.unwrap_or(EntityId::NULL));
        self.body.disable();
        self.change_state("Dead");
    }

    fn on_health_changed(&mut self) {
        let ratio = self.body.health.health_percent();
        let dead = self.body.is_dead();
        let Some(boss) = self.body.boss.as_mut() else {
            return;
        };
        if !boss.heal_on_phase_change || boss.healed_once || boss.phase != PHASE_ONE || dead {
            return;
        }
        if ratio > boss.phase_two_threshold {
            return;
        }

        boss.healed_once = true;
        boss.phase = PHASE_TWO;
        self.body.health.full_heal();
        log::info!("Boss {} crossed {:.0}% health: full heal and phase two", self.body.id, ratio * 100.0);
        self.change_state("PhaseChange");
    }

    fn resolve_strikes<T>(&mut self, mut target: Option<&mut T>) -> Vec<HitReport>
    where
        T: Damageable + ?Sized,
    {
        let mut hits = Vec::new();
        for strike in self.frame.take_strikes() {
            let Some(target) = target.as_deref_mut() else {
                log::trace!("{} struck at nothing", self.body.id);
                continue;
            };
            match strike {
                Strike::Melee => {
                    let body = &mut self.body;
                    hits.extend(execute_melee(
                        body.id,
                        body.collider.world_aabb(),
                        body.melee_reach,
                        &body.profile.stats,
                        std::iter::once(target),
                        &mut body.rng,
                    ));
                }
                Strike::Radius { origin, radius, damage } => {
                    hits.extend(execute_radius_hit(self.body.id, origin, radius, damage, target));
                }
            }
        }
        hits
    }
}

impl Damageable for Enemy {
    fn entity_id(&self) -> EntityId {
        self.body.id
    }

    fn world_position(&self) -> Vec3 {
        self.body.transform.position
    }

    fn world_aabb(&self) -> Aabb {
        *self.body.collider.world_aabb()
    }

    fn health(&self) -> &HealthComponent {
        &self.body.health
    }

    fn health_mut(&mut self) -> &mut HealthComponent {
        &mut self.body.health
    }

    fn defense(&self) -> f32 {
        self.body.profile.stats.defense
    }
}

/// The boss as seen by its selector
struct BossDriver<'a> {
    body: &'a mut EnemyBody,
    fsm: &'a mut StateMachine<EnemyBody, ActorFrame>,
    frame: &'a mut ActorFrame,
}

impl BossHost for BossDriver<'_> {
    fn is_dead(&self) -> bool {
        self.body.is_dead()
    }

    fn is_busy(&self) -> bool {
        self.body.boss.as_ref().map_or(false, |b| b.busy)
    }

    fn phase(&self) -> u8 {
        self.body.boss.as_ref().map_or(PHASE_ONE, |b| b.phase)
    }

    fn set_phase(&mut self, phase: u8) {
        if let Some(boss) = self.body.boss.as_mut() {
            boss.phase = phase;
        }
    }

    fn health_ratio(&self) -> f32 {
        self.body.health.health_percent()
    }

    fn distance_to_target(&self) -> f32 {
        self.frame
            .target_distance(self.body.position())
            .unwrap_or(NO_TARGET_DISTANCE)
    }

    fn set_pending_skill(&mut self, skill: &str) {
        if let Some(boss) = self.body.boss.as_mut() {
            boss.set_pending_skill(skill);
        }
    }

    fn request_state(&mut self, state: &'static str) {
        self.fsm.change_state(self.body, self.frame, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn enemy_at(x: f32) -> Enemy {
        Enemy::new(
            EntityId::from_raw(1),
            ActorProfile::normal_enemy(),
            Vec3::new(x, 0.0, 0.0),
            &PhysicsConfig::default(),
            7,
        )
    }

    #[test]
    fn test_normal_enemy_starts_idle() {
        let enemy = enemy_at(0.0);
        assert_eq!(enemy.state_name(), Some("Idle"));
        assert!(!enemy.is_boss());
        assert!(enemy.boss_status().is_none());
    }

    #[test]
    fn test_boss_starts_chasing() {
        let boss = Enemy::new(
            EntityId::from_raw(2),
            ActorProfile::boss(),
            Vec3::ZERO,
            &PhysicsConfig::default(),
            7,
        );
        assert_eq!(boss.state_name(), Some("Chase"));
        assert!(boss.is_boss());
        assert_eq!(boss.boss_status().map(|b| b.phase), Some(PHASE_ONE));
    }

    #[test]
    fn test_collider_shrinks_model_bounds() {
        let enemy = enemy_at(100.0);
        let local = enemy.body().collider.local_aabb();
        assert_relative_eq!(local.size().x, 88.0, epsilon = 1e-3);
        assert_relative_eq!(local.size().y, 180.0, epsilon = 1e-3);
        assert_relative_eq!(enemy.world_aabb().center().x, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_collider_without_model_uses_default_box() {
        let profile = ActorProfile {
            model_bounds: None,
            ..ActorProfile::normal_enemy()
        };
        let enemy = Enemy::new(EntityId::from_raw(3), profile, Vec3::ZERO, &PhysicsConfig::default(), 1);
        assert_relative_eq!(enemy.body().collider.local_aabb().size().x, 20.0, epsilon = 1e-3);
    }

    #[test]
    fn test_hurt_staggers_and_enters_hit() {
        let mut enemy = enemy_at(0.0);
        // Away from home so the walk back outlasts the test
        enemy.body_mut().transform.position.x = 200.0;
        enemy.health_mut().take_damage(10.0, None);
        enemy.update::<Enemy>(None, None, 0.016);

        assert_eq!(enemy.state_name(), Some("Hit"));
        assert!(!enemy.body().can_move());
        assert!(!enemy.body().can_attack());

        for _ in 0..40 {
            enemy.update::<Enemy>(None, None, 0.016);
        }
        assert!(enemy.body().can_attack());
        // No target after the stagger: head home
        assert_eq!(enemy.state_name(), Some("Return"));
    }

    #[test]
    fn test_lethal_damage_goes_to_dead() {
        let mut enemy = enemy_at(0.0);
        enemy.health_mut().take_damage(500.0, Some(EntityId::from_raw(9)));
        enemy.update::<Enemy>(None, None, 0.016);

        assert_eq!(enemy.state_name(), Some("Dead"));
        assert!(!enemy.body().can_move());
        assert!(!enemy.is_removable());

        for _ in 0..100 {
            enemy.update::<Enemy>(None, None, 0.016);
        }
        assert!(enemy.is_removable());
    }

    #[test]
    fn test_step_toward_does_not_overshoot() {
        let mut enemy = enemy_at(0.0);
        let goal = Vec3::new(3.0, 0.0, 4.0);
        enemy.body_mut().step_toward(goal, 1000.0, 1.0);
        assert_relative_eq!(enemy.position().x, 3.0, epsilon = 1e-4);
        assert_relative_eq!(enemy.position().z, 4.0, epsilon = 1e-4);
    }
}
