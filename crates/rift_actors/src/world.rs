//! Frame stepper
//!
//! The world owns every actor and the terrain. A step runs in two passes:
//! first every world box is rebuilt from its transform, then the player and
//! each enemy update in insertion order, each resolving its own strikes
//! before the next one starts. A boss's selector runs at the end of that
//! boss's own update. Corpses whose timer ran out are dropped between frames.

use crate::enemy::Enemy;
use crate::player::Player;
use crate::profile::{ActorKind, ActorProfile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rift_ai::BossTuning;
use rift_combat::{Damageable, HitReport};
use rift_core::{EntityId, EntityIdAllocator};
use rift_math::Vec3;
use rift_physics::{PhysicsConfig, TerrainCollider};
use std::collections::VecDeque;

/// Hits kept in the rolling log
const HIT_LOG_LEN: usize = 1024;

/// Observable state of one actor
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSnapshot {
    pub id: EntityId,
    pub kind: ActorKind,
    pub state: Option<&'static str>,
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
}

impl ActorSnapshot {
    fn of_player(player: &Player) -> Self {
        Self {
            id: player.id(),
            kind: ActorKind::Player,
            state: player.state_name(),
            position: player.position(),
            health: player.health().current,
            max_health: player.health().max,
            dead: player.is_dead(),
        }
    }

    fn of_enemy(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id(),
            kind: enemy.kind(),
            state: enemy.state_name(),
            position: enemy.position(),
            health: enemy.health().current,
            max_health: enemy.health().max,
            dead: enemy.is_dead(),
        }
    }
}

/// Terrain, actors and the frame clock
#[derive(Debug)]
pub struct World {
    config: PhysicsConfig,
    terrain: Option<TerrainCollider>,
    ids: EntityIdAllocator,
    player: Option<Player>,
    enemies: Vec<Enemy>,
    last_hits: Vec<HitReport>,
    hit_log: VecDeque<HitReport>,
    rng: StdRng,
    frame: u64,
    elapsed: f32,
}

impl World {
    /// Empty world over the plane `y = 0`
    pub fn new(config: PhysicsConfig, seed: u64) -> Self {
        Self {
            config,
            terrain: None,
            ids: EntityIdAllocator::new(),
            player: None,
            enemies: Vec::new(),
            last_hits: Vec::new(),
            hit_log: VecDeque::new(),
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
            elapsed: 0.0,
        }
    }

    pub fn with_terrain(mut self, terrain: TerrainCollider) -> Self {
        self.terrain = Some(terrain);
        self
    }

    pub fn set_terrain(&mut self, terrain: Option<TerrainCollider>) {
        self.terrain = terrain;
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn terrain(&self) -> Option<&TerrainCollider> {
        self.terrain.as_ref()
    }

    /// Spawn the player, replacing any existing one. Every enemy starts hunting it.
    pub fn spawn_player(&mut self, profile: ActorProfile, position: Vec3) -> EntityId {
        let id = self.ids.allocate();
        let seed = self.rng.gen::<u64>();
        let position = self.grounded(position);
        if self.player.is_some() {
            log::warn!("Replacing the existing player with {}", id);
        }
        self.player = Some(Player::new(id, profile, position, &self.config, seed));
        for enemy in &mut self.enemies {
            enemy.set_target(Some(id));
        }
        log::info!("Player {} spawned at {:?}", id, position);
        id
    }

    /// Spawn an enemy of the profile's kind
    pub fn spawn_enemy(&mut self, profile: ActorProfile, position: Vec3) -> EntityId {
        let id = self.ids.allocate();
        let seed = self.rng.gen::<u64>();
        let position = self.grounded(position);
        let enemy = Enemy::new(id, profile, position, &self.config, seed);
        self.add_enemy(enemy)
    }

    /// Spawn a boss with explicit tuning
    pub fn spawn_boss(&mut self, profile: ActorProfile, tuning: BossTuning, position: Vec3) -> EntityId {
        let id = self.ids.allocate();
        let seed = self.rng.gen::<u64>();
        let position = self.grounded(position);
        let boss = Enemy::new_boss(id, profile, tuning, position, &self.config, seed);
        self.add_enemy(boss)
    }

    fn add_enemy(&mut self, mut enemy: Enemy) -> EntityId {
        let id = enemy.id();
        enemy.set_target(self.player.as_ref().map(Player::id));
        log::info!("{:?} {} spawned at {:?}", enemy.kind(), id, enemy.position());
        self.enemies.push(enemy);
        id
    }

    /// Drop a spawn point onto the terrain below it, if any
    fn grounded(&self, position: Vec3) -> Vec3 {
        let ground = self
            .terrain
            .as_ref()
            .and_then(|t| t.ground_height(position, self.config.ground_probe_height));
        match ground {
            Some(y) => Vec3::new(position.x, y, position.z),
            None => position,
        }
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id() == id)
    }

    /// Current state name of any actor
    pub fn state_of(&self, id: EntityId) -> Option<&'static str> {
        match self.player.as_ref().filter(|p| p.id() == id) {
            Some(player) => player.state_name(),
            None => self.enemy(id).and_then(Enemy::state_name),
        }
    }

    pub fn position_of(&self, id: EntityId) -> Option<Vec3> {
        match self.player.as_ref().filter(|p| p.id() == id) {
            Some(player) => Some(player.position()),
            None => self.enemy(id).map(Enemy::position),
        }
    }

    /// Player first, then enemies in update order
    pub fn snapshot(&self) -> Vec<ActorSnapshot> {
        self.player
            .iter()
            .map(ActorSnapshot::of_player)
            .chain(self.enemies.iter().map(ActorSnapshot::of_enemy))
            .collect()
    }

    /// Hits landed during the last step
    pub fn last_hits(&self) -> &[HitReport] {
        &self.last_hits
    }

    /// Most recent hits, oldest first
    pub fn hit_log(&self) -> impl Iterator<Item = &HitReport> {
        self.hit_log.iter()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance one frame. Non-finite or non-positive steps are ignored.
    pub fn step(&mut self, dt: f32) -> &[HitReport] {
        self.last_hits.clear();
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("Ignoring frame step of {}", dt);
            return &self.last_hits;
        }

        if let Some(player) = self.player.as_mut() {
            player.refresh_collider();
        }
        for enemy in &mut self.enemies {
            enemy.refresh_collider();
        }

        let terrain = self.terrain.as_ref();
        if let Some(player) = self.player.as_mut() {
            self.last_hits.extend(player.update(&mut self.enemies, terrain, dt));
        }
        for enemy in &mut self.enemies {
            self.last_hits.extend(enemy.update(self.player.as_mut(), terrain, dt));
        }

        self.enemies.retain(|enemy| {
            if enemy.is_removable() {
                log::info!("Removing {:?} {}", enemy.kind(), enemy.id());
                return false;
            }
            true
        });

        for i in 0..self.last_hits.len() {
            let hit = self.last_hits[i];
            self.log_hit(hit);
        }

        self.frame += 1;
        self.elapsed += dt;
        &self.last_hits
    }

    /// Append to the rolling log, dropping the oldest hit when full
    fn log_hit(&mut self, hit: HitReport) {
        if self.hit_log.len() == HIT_LOG_LEN {
            self.hit_log.pop_front();
        }
        self.hit_log.push_back(hit);
    }
}
