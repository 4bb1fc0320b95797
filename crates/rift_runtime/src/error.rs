//! Runtime errors

use rift_ai::AiError;
use rift_physics::PhysicsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for a simulation
    #[error("Failed to parse config {origin}: {source}")]
    ConfigParse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// Values that parse but cannot run
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Ai(#[from] AiError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
