//! Headless simulation driver
//!
//! Builds a [`World`] from a [`SimConfig`], steps it at a fixed rate and
//! logs what happened.

use crate::config::SimConfig;
use crate::error::Result;
use rift_actors::{ActorKind, ActorSnapshot, Damageable, Enemy, MoveIntent, World};
use rift_math::Vec3;
use rift_physics::TerrainCollider;

/// Fraction of the melee reach the autopilot closes before swinging
const AUTOPILOT_REACH_FRACTION: f32 = 0.8;

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    pub frames: u64,
    pub elapsed: f32,
    pub hits: usize,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub player_alive: bool,
    pub enemies_left: usize,
}

/// A configured world plus its clock
pub struct Simulation {
    config: SimConfig,
    world: World,
    hits: usize,
    damage_dealt: f32,
    damage_taken: f32,
}

impl Simulation {
    /// Validate the config, load the terrain and spawn every actor
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let mut world = World::new(config.physics.clone(), config.seed);
        if let Some(terrain) = &config.terrain {
            let model = terrain.model();
            let collider = TerrainCollider::from_model(&model, terrain.mesh.as_deref(), &config.physics);
            log::info!("Terrain ready: {} triangles", collider.triangle_count());
            world.set_terrain(Some(collider));
        }

        for spawn in &config.spawns {
            let profile = spawn.resolved_profile();
            match spawn.kind {
                ActorKind::Player => {
                    world.spawn_player(profile, spawn.position);
                }
                ActorKind::Enemy => {
                    world.spawn_enemy(profile, spawn.position);
                }
                ActorKind::Boss => {
                    world.spawn_boss(profile, config.boss.clone(), spawn.position);
                }
            }
        }

        Ok(Self {
            config,
            world,
            hits: 0,
            damage_dealt: 0.0,
            damage_taken: 0.0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Whether nothing further can happen: the player's death played out,
    /// or every enemy is gone
    pub fn is_finished(&self) -> bool {
        let player_done = self.world.player().map_or(false, |p| p.death_sequence_done());
        player_done || self.world.enemies().is_empty()
    }

    /// Advance one frame
    pub fn step(&mut self) {
        if self.config.autopilot {
            self.drive_player();
        }

        let player = self.world.player().map(|p| p.id());
        for hit in self.world.step(self.config.frame_time()) {
            self.hits += 1;
            if Some(hit.attacker) == player {
                self.damage_dealt += hit.damage;
            } else if Some(hit.target) == player {
                self.damage_taken += hit.damage;
            }
            log::debug!(
                "{} hit {} for {:.1}{}",
                hit.attacker,
                hit.target,
                hit.damage,
                if hit.critical { " (critical)" } else { "" }
            );
        }
    }

    /// Run the configured number of frames, stopping early once finished
    pub fn run(&mut self) -> SimReport {
        log::info!(
            "Running {} frames at {} fps with {} actors",
            self.config.frames,
            self.config.fps,
            self.world.snapshot().len()
        );

        for _ in 0..self.config.frames {
            self.step();
            let frame = self.world.frame_count();
            if self.config.report_every > 0 && frame % self.config.report_every == 0 {
                self.log_snapshot();
            }
            if self.is_finished() {
                log::info!("Simulation finished early at frame {}", frame);
                break;
            }
        }

        self.log_snapshot();
        let report = self.report();
        log::info!(
            "{} frames, {} hits, {:.0} damage dealt, {:.0} taken, player {}, {} enemies left",
            report.frames,
            report.hits,
            report.damage_dealt,
            report.damage_taken,
            if report.player_alive { "alive" } else { "down" },
            report.enemies_left
        );
        report
    }

    pub fn report(&self) -> SimReport {
        SimReport {
            frames: self.world.frame_count(),
            elapsed: self.world.elapsed(),
            hits: self.hits,
            damage_dealt: self.damage_dealt,
            damage_taken: self.damage_taken,
            player_alive: self.world.player().map_or(false, |p| !p.is_dead()),
            enemies_left: self.world.enemies().len(),
        }
    }

    fn log_snapshot(&self) {
        log::info!("Frame {} ({:.2}s)", self.world.frame_count(), self.world.elapsed());
        for actor in self.world.snapshot() {
            log::info!("  {}", describe(&actor));
        }
    }

    /// Walk toward the nearest living enemy; swing once it is in reach
    fn drive_player(&mut self) {
        let reach = self.world.config().melee_reach * AUTOPILOT_REACH_FRACTION;
        let Some(player) = self.world.player() else {
            return;
        };
        if player.is_dead() {
            return;
        }

        let from = player.position();
        let player_half = player.world_aabb().size().x * 0.5;
        let nearest = self
            .world
            .enemies()
            .iter()
            .filter(|e| !e.is_dead())
            .map(|e| (e.position(), gap(from, player_half, e)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some(player) = self.world.player_mut() else {
            return;
        };
        match nearest {
            Some((_, gap)) if gap <= reach => {
                player.set_intent(MoveIntent::default());
                player.attack_light();
            }
            Some((goal, _)) => {
                let direction = Vec3::new(goal.x - from.x, 0.0, goal.z - from.z);
                player.set_intent(MoveIntent::run(direction));
            }
            None => player.set_intent(MoveIntent::default()),
        }
    }
}

/// Horizontal space between the player's box and an enemy's box
fn gap(from: Vec3, player_half: f32, enemy: &Enemy) -> f32 {
    let to = enemy.position();
    let distance = Vec3::new(to.x - from.x, 0.0, to.z - from.z).length();
    distance - player_half - enemy.world_aabb().size().x * 0.5
}

fn describe(actor: &ActorSnapshot) -> String {
    format!(
        "{:?} {} {:<12} {:>5.0}/{:<5.0} at ({:.0}, {:.0}, {:.0}){}",
        actor.kind,
        actor.id,
        actor.state.unwrap_or("-"),
        actor.health,
        actor.max_health,
        actor.position.x,
        actor.position.y,
        actor.position.z,
        if actor.dead { " dead" } else { "" }
    )
}
