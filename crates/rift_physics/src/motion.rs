//! Ground-following kinematic motion
//!
//! Each frame an actor proposes `old + velocity * dt`, optionally adjusts it
//! (push-out), then settles it against the terrain: a downward probe from
//! `probe_height` above the proposal finds the ground. Rises smaller than
//! `max_step_height` are walked onto; anything taller is a wall and cancels
//! the horizontal move. While airborne above walkable ground the actor keeps
//! its ballistic height until it reaches the ground.

use crate::config::PhysicsConfig;
use crate::terrain::TerrainCollider;
use rift_math::Vec3;

/// Tunables for one actor's motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub gravity: f32,
    pub max_step_height: f32,
    pub probe_height: f32,
}

impl MotionParams {
    /// Motion params from the world config with an actor-specific gravity
    pub fn from_config(config: &PhysicsConfig, gravity: f32) -> Self {
        Self {
            gravity,
            max_step_height: config.max_step_height,
            probe_height: config.ground_probe_height,
        }
    }
}

impl Default for MotionParams {
    fn default() -> Self {
        let config = PhysicsConfig::default();
        Self::from_config(&config, config.gravity)
    }
}

/// Velocity and ground contact of a kinematic actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    pub velocity: Vec3,
    pub grounded: bool,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            grounded: true,
        }
    }
}

impl KinematicBody {
    /// Set the horizontal velocity, keeping the vertical component
    pub fn set_horizontal(&mut self, velocity: Vec3) {
        self.velocity.x = velocity.x;
        self.velocity.z = velocity.z;
    }

    pub fn stop_horizontal(&mut self) {
        self.velocity.x = 0.0;
        self.velocity.z = 0.0;
    }

    /// Leave the ground with an upward speed. Ignored while airborne.
    pub fn launch(&mut self, speed: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity.y = speed;
        self.grounded = false;
        true
    }

    /// Accumulate gravity. A grounded actor on terrain is held by the ground probe instead.
    pub fn apply_gravity(&mut self, params: &MotionParams, has_terrain: bool, dt: f32) {
        if self.grounded && has_terrain {
            return;
        }
        self.velocity.y -= params.gravity * dt;
    }

    /// Unresolved next position
    #[inline]
    pub fn proposed(&self, old: Vec3, dt: f32) -> Vec3 {
        old + self.velocity * dt
    }

    /// Resolve `proposed` against the terrain and return the final position.
    ///
    /// Without a terrain collider the plane `y = 0` is the floor.
    pub fn settle(
        &mut self,
        old: Vec3,
        proposed: Vec3,
        terrain: Option<&TerrainCollider>,
        params: &MotionParams,
        dt: f32,
    ) -> Vec3 {
        let Some(terrain) = terrain else {
            let mut pos = proposed;
            if pos.y <= 0.0 {
                pos.y = 0.0;
                self.velocity.y = 0.0;
                self.grounded = true;
            }
            return pos;
        };

        let Some(ground) = terrain.ground_height(proposed, params.probe_height) else {
            self.grounded = false;
            return proposed;
        };

        if ground - old.y < params.max_step_height {
            if !self.grounded && proposed.y > ground {
                // Still in the air above walkable ground
                return proposed;
            }
            if !self.grounded && self.velocity.y <= 0.0 {
                self.grounded = true;
                self.velocity.y = 0.0;
            }
            Vec3::new(proposed.x, ground, proposed.z)
        } else {
            // Wall: stay put horizontally and keep integrating vertically
            // against the ground under the old position
            let mut pos = old;
            pos.y += self.velocity.y * dt;
            if let Some(floor) = terrain.ground_height(old, params.probe_height) {
                if pos.y <= floor {
                    pos.y = floor;
                    self.grounded = true;
                    self.velocity.y = 0.0;
                }
            }
            pos
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TerrainModel;
    use approx::assert_relative_eq;

    // Flat floor at y=0 with a 100-high plateau for x >= 200
    const STEP_TERRAIN: &str = "\
v 0 0 0
v 200 0 0
v 200 0 400
v 0 0 400
v 200 100 0
v 400 100 0
v 400 100 400
v 200 100 400
f 1 2 3
f 1 3 4
f 5 6 7
f 5 7 8
";

    fn terrain() -> TerrainCollider {
        TerrainCollider::from_obj_str(STEP_TERRAIN, &TerrainModel::default(), &PhysicsConfig::default())
    }

    fn settle_once(body: &mut KinematicBody, terrain: Option<&TerrainCollider>, old: Vec3, dt: f32) -> Vec3 {
        let params = MotionParams::default();
        body.apply_gravity(&params, terrain.is_some(), dt);
        let proposed = body.proposed(old, dt);
        body.settle(old, proposed, terrain, &params, dt)
    }

    #[test]
    fn test_walks_on_flat_ground() {
        let terrain = terrain();
        let mut body = KinematicBody::default();
        body.set_horizontal(Vec3::new(100.0, 0.0, 0.0));
        let pos = settle_once(&mut body, Some(&terrain), Vec3::new(50.0, 0.0, 50.0), 0.1);
        assert_relative_eq!(pos.x, 60.0);
        assert_relative_eq!(pos.y, 0.0);
        assert!(body.grounded);
    }

    #[test]
    fn test_tall_rise_blocks_horizontal_move() {
        let terrain = terrain();
        let mut body = KinematicBody::default();
        body.set_horizontal(Vec3::new(100.0, 0.0, 0.0));
        let old = Vec3::new(195.0, 0.0, 50.0);
        let pos = settle_once(&mut body, Some(&terrain), old, 0.1);
        assert_relative_eq!(pos.x, 195.0);
        assert_relative_eq!(pos.y, 0.0);
    }

    #[test]
    fn test_jump_then_land() {
        let terrain = terrain();
        let mut body = KinematicBody::default();
        assert!(body.launch(520.0));
        assert!(!body.launch(520.0));

        let mut pos = Vec3::new(50.0, 0.0, 50.0);
        let mut peak: f32 = 0.0;
        for _ in 0..200 {
            pos = settle_once(&mut body, Some(&terrain), pos, 1.0 / 60.0);
            peak = peak.max(pos.y);
            if body.grounded {
                break;
            }
        }
        assert!(peak > 50.0);
        assert!(body.grounded);
        assert_relative_eq!(pos.y, 0.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_off_grid_is_airborne() {
        let terrain = terrain();
        let mut body = KinematicBody::default();
        let pos = settle_once(&mut body, Some(&terrain), Vec3::new(-50.0, 0.0, 50.0), 0.1);
        assert!(!body.grounded);
        assert_relative_eq!(pos.x, -50.0);
    }

    #[test]
    fn test_no_terrain_floor_is_zero() {
        let mut body = KinematicBody::default();
        body.grounded = false;
        let mut pos = Vec3::new(0.0, 30.0, 0.0);
        for _ in 0..60 {
            pos = settle_once(&mut body, None, pos, 1.0 / 30.0);
        }
        assert_eq!(pos.y, 0.0);
        assert!(body.grounded);
    }
}
