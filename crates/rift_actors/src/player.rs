//! The player character
//!
//! Input arrives as a [`MoveIntent`] plus discrete actions. The state
//! machine turns both into velocity and strikes; the update then resolves
//! strikes against the enemy list and pushes the player out of live enemies
//! before following the terrain.

use crate::animation::{Animator, ClipLibrary};
use crate::enemy::Enemy;
use crate::frame::{ActorFrame, Strike};
use crate::player_states;
use crate::profile::{ActorKind, ActorProfile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rift_ai::StateMachine;
use rift_combat::{execute_melee, execute_radius_hit, Damageable, HealthComponent, HealthEvent, HitReport};
use rift_core::EntityId;
use rift_math::{Aabb, Transform, Vec3};
use rift_physics::{CharacterCollider, KinematicBody, ModelGeometry, MotionParams, PhysicsConfig, TerrainCollider};

/// Skill uses available after a (re)spawn
pub const SKILL_CHARGES: u32 = 3;
/// Seconds between two skill casts
pub const SKILL_COOLDOWN: f32 = 5.0;
/// Health restored by a skill cast
pub const SKILL_HEAL: f32 = 20.0;

/// Desired movement for this frame, in world space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveIntent {
    /// Horizontal direction; zero means stand still
    pub direction: Vec3,
    pub run: bool,
}

impl MoveIntent {
    pub fn walk(direction: Vec3) -> Self {
        Self { direction, run: false }
    }

    pub fn run(direction: Vec3) -> Self {
        Self { direction, run: true }
    }

    /// Whether the intent asks for movement at all
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.direction.length_squared() > 1e-6
    }

    /// Normalized XZ direction, if moving
    pub fn horizontal(&self) -> Option<Vec3> {
        let dir = Vec3::new(self.direction.x, 0.0, self.direction.z);
        (dir.length_squared() > 1e-6).then(|| dir.normalize())
    }
}

/// Outcome of [`Player::cast_skill`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillCast {
    Cast { charges_left: u32 },
    OutOfCharges,
    CoolingDown,
    Dead,
}

/// Everything player states read and write
#[derive(Debug)]
pub struct PlayerBody {
    pub id: EntityId,
    pub profile: ActorProfile,
    pub transform: Transform,
    pub motion: KinematicBody,
    pub params: MotionParams,
    pub collider: CharacterCollider,
    pub health: HealthComponent,
    pub animator: Box<dyn Animator>,
    pub rng: StdRng,
    pub intent: MoveIntent,
    combo_buffered: bool,
    skill_charges: u32,
    skill_cooldown: f32,
    death_sequence_done: bool,
    melee_reach: f32,
}

impl PlayerBody {
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn play(&mut self, clip: &str, looping: bool) {
        self.animator.play(clip, looping);
    }

    /// Return the buffered combo input and clear it
    pub fn consume_combo(&mut self) -> bool {
        std::mem::take(&mut self.combo_buffered)
    }

    pub fn finish_death_sequence(&mut self) {
        if !self.death_sequence_done {
            log::info!("Player {} death sequence finished", self.id);
        }
        self.death_sequence_done = true;
    }

    /// `Move` when the intent asks for movement, else `Idle`
    pub(crate) fn locomotion_state(&self) -> &'static str {
        if self.intent.is_moving() {
            "Move"
        } else {
            "Idle"
        }
    }
}

/// The player actor
#[derive(Debug)]
pub struct Player {
    body: PlayerBody,
    fsm: StateMachine<PlayerBody, ActorFrame>,
    frame: ActorFrame,
}

impl Player {
    pub fn new(id: EntityId, profile: ActorProfile, position: Vec3, config: &PhysicsConfig, seed: u64) -> Self {
        if profile.kind != ActorKind::Player {
            log::warn!("{:?} profile used for player {}", profile.kind, id);
        }

        let model = profile.model_bounds.map(ModelGeometry::from_bounds).unwrap_or_default();
        let collider =
            CharacterCollider::calculate_bounding_box(&model, profile.collider_shrink, config.default_character_box);

        let mut body = PlayerBody {
            id,
            params: MotionParams::from_config(config, profile.gravity),
            health: HealthComponent::new(profile.max_health),
            profile,
            transform: Transform::from_position(position),
            motion: KinematicBody::default(),
            collider,
            animator: Box::new(ClipLibrary::new()),
            rng: StdRng::seed_from_u64(seed),
            intent: MoveIntent::default(),
            combo_buffered: false,
            skill_charges: SKILL_CHARGES,
            skill_cooldown: 0.0,
            death_sequence_done: false,
            melee_reach: config.melee_reach,
        };
        body.collider.update(&body.transform);

        let mut fsm = StateMachine::new();
        player_states::register(&mut fsm);
        let mut frame = ActorFrame::default();
        fsm.init(&mut body, &mut frame, "Idle");

        log::debug!("Spawned player {} at {:?}", id, position);
        Self { body, fsm, frame }
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

    pub fn body(&self) -> &PlayerBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut PlayerBody {
        &mut self.body
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

    pub fn is_grounded(&self) -> bool {
        self.body.motion.grounded
    }

    pub fn skill_charges(&self) -> u32 {
        self.body.skill_charges
    }

    pub fn skill_cooldown(&self) -> f32 {
        self.body.skill_cooldown
    }

    pub fn death_sequence_done(&self) -> bool {
        self.body.death_sequence_done
    }

    pub fn set_intent(&mut self, intent: MoveIntent) {
        self.body.intent = intent;
    }

    pub fn intent(&self) -> MoveIntent {
        self.body.intent
    }

    /// Force a state change from outside the state machine
    pub fn change_state(&mut self, name: &str) -> bool {
        self.fsm.change_state(&mut self.body, &mut self.frame, name)
    }

    pub fn refresh_collider(&mut self) {
        self.body.collider.update(&self.body.transform);
    }

    /// Jump if standing on the ground
    pub fn jump(&mut self) -> bool {
        if self.is_dead() || !self.body.motion.launch(self.body.profile.jump_speed) {
            return false;
        }
        self.change_state("Jump");
        true
    }

    pub fn roll(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.change_state("Roll")
    }

    /// Light attack. Mid-swing presses are buffered for the next combo step.
    pub fn attack_light(&mut self) {
        if self.is_dead() {
            return;
        }
        if self.fsm.current_state_name().map_or(false, |s| s.starts_with("Attack")) {
            self.body.combo_buffered = true;
            return;
        }
        self.body.combo_buffered = false;
        self.change_state("Attack1");
    }

    /// Spend a skill charge: heal and play the skill
    pub fn cast_skill(&mut self) -> SkillCast {
        if self.is_dead() {
            return SkillCast::Dead;
        }
        if self.body.skill_charges == 0 {
            log::info!("Player {} has no skill charges left", self.body.id);
            return SkillCast::OutOfCharges;
        }
        if self.body.skill_cooldown > 0.0 {
            log::debug!("Skill cooling down: {:.1}s", self.body.skill_cooldown);
            return SkillCast::CoolingDown;
        }

        self.body.skill_charges -= 1;
        self.body.skill_cooldown = SKILL_COOLDOWN;
        self.body.health.heal(SKILL_HEAL);
        self.change_state("Skill");
        log::debug!("Player {} cast skill, {} charges left", self.body.id, self.body.skill_charges);

        SkillCast::Cast {
            charges_left: self.body.skill_charges,
        }
    }

    /// Restore health and skills and return to Idle
    pub fn respawn(&mut self) {
        let body = &mut self.body;
        body.health.reset();
        // A respawn is not a hurt; drop whatever the reset queued
        body.health.drain_events();
        body.skill_charges = SKILL_CHARGES;
        body.skill_cooldown = 0.0;
        body.combo_buffered = false;
        body.death_sequence_done = false;
        body.motion.stop_horizontal();
        self.change_state("Idle");
        log::info!("Player {} respawned", self.body.id);
    }

    /// Advance one frame against `enemies`.
    ///
    /// Melee swings land on every live enemy in reach. Live enemies also
    /// block movement.
    pub fn update(&mut self, enemies: &mut [Enemy], terrain: Option<&TerrainCollider>, dt: f32) -> Vec<HitReport> {
        self.frame.target = None;
        self.handle_health_events();

        if self.body.skill_cooldown > 0.0 {
            self.body.skill_cooldown = (self.body.skill_cooldown - dt).max(0.0);
        }

        self.fsm.update(&mut self.body, &mut self.frame, dt);
        let hits = self.resolve_strikes(enemies);

        if self.body.is_dead() {
            return hits;
        }

        let body = &mut self.body;
        body.motion.apply_gravity(&body.params, terrain.is_some(), dt);
        let old = body.transform.position;
        let proposed = body.motion.proposed(old, dt);
        let blockers: Vec<Aabb> = enemies.iter().filter(|e| !e.is_dead()).map(|e| e.world_aabb()).collect();
        let proposed = body.collider.push_out(&body.transform, proposed, &blockers);
        body.transform.position = body.motion.settle(old, proposed, terrain, &body.params, dt);
        body.collider.update(&body.transform);

        hits
    }

    fn handle_health_events(&mut self) {
        for event in self.body.health.drain_events() {
            match event {
                HealthEvent::Hurt { amount, attacker } => {
                    if self.body.is_dead() {
                        continue;
                    }
                    log::debug!(
                        "Player hurt for {:.1} by {}",
                        amount,
                        attacker.unwrap_or(EntityId::NULL)
                    );
                    self.change_state("Hurt");
                }
                HealthEvent::Died { attacker } => {
                    log::info!("Player killed by {}", attacker.unwrap_or(EntityId::NULL));
                    self.body.motion.stop_horizontal();
                    self.change_state("Dead");
                }
                HealthEvent::Changed { .. } => {}
            }
        }
    }

    fn resolve_strikes(&mut self, enemies: &mut [Enemy]) -> Vec<HitReport> {
        let mut hits = Vec::new();
        for strike in self.frame.take_strikes() {
            match strike {
                Strike::Melee => {
                    let body = &mut self.body;
                    let targets = enemies.iter_mut().filter(|e| !e.is_dead());
                    let landed = execute_melee(
                        body.id,
                        body.collider.world_aabb(),
                        body.melee_reach,
                        &body.profile.stats,
                        targets,
                        &mut body.rng,
                    );
                    if landed.is_empty() {
                        log::trace!("Player swing hit nothing");
                    }
                    hits.extend(landed);
                }
                Strike::Radius { origin, radius, damage } => {
                    for enemy in enemies.iter_mut() {
                        hits.extend(execute_radius_hit(self.body.id, origin, radius, damage, enemy));
                    }
                }
            }
        }
        hits
    }
}

impl Damageable for Player {
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
