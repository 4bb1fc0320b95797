//! Simulation configuration
//!
//! Every section is optional; missing values fall back to the defaults
//! below.
//!
//! # Example Config File
//!
//! ```toml
//! fps = 60.0
//! frames = 1200
//! seed = 7
//!
//! [terrain]
//! mesh = "assets/arena.obj"
//! scale = 1.0
//! position = [0.0, 0.0, 0.0]
//! bounds = { min = [-2000.0, 0.0, -2000.0], max = [2000.0, 0.0, 2000.0] }
//!
//! [physics]
//! gravity = 980.0
//!
//! [boss]
//! heal_on_phase_change = false
//!
//! [[spawns]]
//! kind = "Player"
//! position = [0.0, 0.0, 0.0]
//!
//! [[spawns]]
//! kind = "Boss"
//! position = [400.0, 0.0, 0.0]
//! ```

use crate::error::{Result, RuntimeError};
use rift_actors::{ActorKind, ActorProfile};
use rift_ai::BossTuning;
use rift_math::{Aabb, Vec3};
use rift_physics::{PhysicsConfig, TerrainModel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the terrain comes from and where its model sits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// OBJ mesh; the flat floor over `bounds` is used when absent or unreadable
    pub mesh: Option<PathBuf>,
    pub bounds: Aabb,
    pub scale: f32,
    pub position: Vec3,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let model = TerrainModel::default();
        Self {
            mesh: None,
            bounds: model.bounds,
            scale: model.scale,
            position: model.position,
        }
    }
}

impl TerrainConfig {
    pub fn model(&self) -> TerrainModel {
        TerrainModel::new(self.bounds)
            .with_scale(self.scale)
            .with_position(self.position)
    }
}

/// One actor to place at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub kind: ActorKind,
    pub position: Vec3,
    /// Replaces the preset for `kind`
    #[serde(default)]
    pub profile: Option<ActorProfile>,
}

impl SpawnConfig {
    pub fn new(kind: ActorKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            profile: None,
        }
    }

    /// The override, or the preset for the kind. The spawn's kind always wins.
    pub fn resolved_profile(&self) -> ActorProfile {
        let profile = self.profile.clone().unwrap_or_else(|| match self.kind {
            ActorKind::Enemy => ActorProfile::normal_enemy(),
            ActorKind::Boss => ActorProfile::boss(),
            ActorKind::Player => ActorProfile::player(),
        });
        ActorProfile {
            kind: self.kind,
            ..profile
        }
    }
}

/// Top-level simulation config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Frames per simulated second
    pub fps: f32,
    /// Frames to run
    pub frames: u64,
    pub seed: u64,
    /// Log a snapshot every this many frames; 0 logs only the final one
    pub report_every: u64,
    /// Drive the player toward the nearest enemy and swing when close
    pub autopilot: bool,
    /// Absent: the plane `y = 0` is the floor
    pub terrain: Option<TerrainConfig>,
    pub physics: PhysicsConfig,
    pub boss: BossTuning,
    pub spawns: Vec<SpawnConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            frames: 1800,
            seed: 7,
            report_every: 300,
            autopilot: true,
            terrain: Some(TerrainConfig::default()),
            physics: PhysicsConfig::default(),
            boss: BossTuning::default(),
            spawns: vec![
                SpawnConfig::new(ActorKind::Player, Vec3::ZERO),
                SpawnConfig::new(ActorKind::Enemy, Vec3::new(150.0, 0.0, 0.0)),
                SpawnConfig::new(ActorKind::Enemy, Vec3::new(-150.0, 0.0, 120.0)),
                SpawnConfig::new(ActorKind::Boss, Vec3::new(0.0, 0.0, 450.0)),
            ],
        }
    }
}

impl SimConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, &path.display().to_string())?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate config text. `origin` names the source in errors.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| RuntimeError::ConfigParse {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(RuntimeError::InvalidConfig(format!("fps must be positive, got {}", self.fps)));
        }
        let players = self.spawns.iter().filter(|s| s.kind == ActorKind::Player).count();
        if players > 1 {
            return Err(RuntimeError::InvalidConfig(format!(
                "at most one player spawn is allowed, got {}",
                players
            )));
        }
        self.physics.validate()?;
        self.boss.validate()?;
        Ok(())
    }

    #[inline]
    pub fn frame_time(&self) -> f32 {
        1.0 / self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.frame_time(), 1.0 / 60.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let text = r#"
            frames = 10
            seed = 3

            [physics]
            gravity = 500.0

            [boss]
            heal_on_phase_change = false

            [[spawns]]
            kind = "Boss"
            position = [100.0, 0.0, 0.0]
        "#;
        let config = SimConfig::parse(text, "inline").unwrap();

        assert_eq!(config.frames, 10);
        assert_eq!(config.seed, 3);
        assert_relative_eq!(config.fps, 60.0);
        assert_relative_eq!(config.physics.gravity, 500.0);
        assert_relative_eq!(config.physics.max_step_height, 40.0);
        assert!(!config.boss.heal_on_phase_change);
        assert_relative_eq!(config.boss.phase_two_threshold, 0.5);
        assert_eq!(config.spawns.len(), 1);
        assert_eq!(config.spawns[0].kind, ActorKind::Boss);
        assert_relative_eq!(config.spawns[0].position.x, 100.0);
    }

    #[test]
    fn test_spawn_profile_override() {
        let text = r#"
            [[spawns]]
            kind = "Enemy"
            position = [0.0, 0.0, 0.0]
            profile = { max_health = 40.0, move_speed = 80.0 }
        "#;
        let config = SimConfig::parse(text, "inline").unwrap();
        let profile = config.spawns[0].resolved_profile();
        assert_relative_eq!(profile.max_health, 40.0);
        assert_relative_eq!(profile.move_speed, 80.0);
        assert_relative_eq!(profile.view_range, 200.0);

        let boss = SpawnConfig {
            profile: Some(ActorProfile::normal_enemy()),
            ..SpawnConfig::new(ActorKind::Boss, Vec3::ZERO)
        };
        assert_eq!(boss.resolved_profile().kind, ActorKind::Boss);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SimConfig::parse("fps = 0.0", "inline"),
            Err(RuntimeError::InvalidConfig(_))
        ));
        assert!(matches!(
            SimConfig::parse("[physics]\ngrid_columns = 0", "inline"),
            Err(RuntimeError::Physics(_))
        ));

        let two_players = r#"
            [[spawns]]
            kind = "Player"
            position = [0.0, 0.0, 0.0]
            [[spawns]]
            kind = "Player"
            position = [10.0, 0.0, 0.0]
        "#;
        assert!(SimConfig::parse(two_players, "inline").is_err());
    }

    #[test]
    fn test_rejects_unbounded_skill_weight() {
        let text = r#"
            [[boss.skills]]
            name = "Crush"
            range_min = 0.0
            range_max = 100.0
            cooldown = 1.0
            weight = inf
            phase_mask = 3

            [[boss.skills]]
            name = "Sweep"
            range_min = 0.0
            range_max = 100.0
            cooldown = 1.0
            weight = 1.0
            phase_mask = 3
        "#;
        assert!(matches!(SimConfig::parse(text, "inline"), Err(RuntimeError::Ai(_))));

        let zero_think = SimConfig {
            boss: BossTuning {
                think_interval: 0.0,
                ..BossTuning::default()
            },
            ..SimConfig::default()
        };
        assert!(matches!(zero_think.validate(), Err(RuntimeError::Ai(_))));
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = SimConfig::parse("frames = \"many\"", "arena.toml").unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigParse { .. }));
        assert!(err.to_string().contains("arena.toml"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigIo { .. }));
    }
}
