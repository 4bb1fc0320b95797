//! Error types for the collision system

use std::path::PathBuf;
use thiserror::Error;

/// Collision system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Terrain mesh file could not be read
    #[error("Failed to read terrain mesh {path}: {source}")]
    MeshIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Mesh text contained no usable faces
    #[error("Terrain mesh produced no triangles")]
    EmptyMesh,

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for collision operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
