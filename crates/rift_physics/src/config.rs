//! Collision and motion configuration

use crate::error::{PhysicsError, Result};
use rift_math::{Aabb, Vec3};
use serde::{Deserialize, Serialize};

/// Collision world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units/s² (default: 980)
    pub gravity: f32,

    /// Highest ground rise an actor walks up in one step
    pub max_step_height: f32,

    /// Height above the feet that ground probes start from
    pub ground_probe_height: f32,

    /// Terrain grid columns (X)
    pub grid_columns: usize,

    /// Terrain grid rows (Z)
    pub grid_rows: usize,

    /// Added to the terrain grid cell size so degenerate extents still get a positive cell
    pub grid_cell_epsilon: f32,

    /// Local box used when a model has no usable bounds
    pub default_character_box: Aabb,

    /// How far a melee swing reaches past the attacker's box on X and Z
    pub melee_reach: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 980.0,
            max_step_height: 40.0,
            ground_probe_height: 500.0,
            grid_columns: 32,
            grid_rows: 32,
            grid_cell_epsilon: 0.1,
            default_character_box: Aabb::new(
                Vec3::new(-25.0, 0.0, -25.0),
                Vec3::new(25.0, 180.0, 25.0),
            ),
            melee_reach: 30.0,
        }
    }
}

impl PhysicsConfig {
    /// Finer terrain grid for large, dense meshes
    pub fn high_resolution() -> Self {
        Self {
            grid_columns: 128,
            grid_rows: 128,
            ..Default::default()
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set grid resolution
    pub fn with_grid(mut self, columns: usize, rows: usize) -> Self {
        self.grid_columns = columns;
        self.grid_rows = rows;
        self
    }

    /// Check the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.grid_columns == 0 || self.grid_rows == 0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "grid must have at least one cell, got {}x{}",
                self.grid_columns, self.grid_rows
            )));
        }
        if self.grid_cell_epsilon.is_nan() || self.grid_cell_epsilon <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "grid_cell_epsilon must be positive, got {}",
                self.grid_cell_epsilon
            )));
        }
        if self.gravity < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity is a magnitude and must not be negative, got {}",
                self.gravity
            )));
        }
        if self.default_character_box.is_degenerate() {
            return Err(PhysicsError::InvalidConfig(
                "default_character_box has no width".to_string(),
            ));
        }
        Ok(())
    }
}
