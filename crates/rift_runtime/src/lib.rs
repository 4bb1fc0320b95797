//! Rift Runtime - headless driver for the combat simulation
//!
//! Loads a [`SimConfig`], builds the world it describes and steps it at a
//! fixed frame rate. The `rift-sim` binary is a thin wrapper around
//! [`Simulation::run`].

pub mod config;
pub mod error;
pub mod sim;

pub mod prelude {
    pub use crate::config::{SimConfig, SpawnConfig, TerrainConfig};
    pub use crate::error::{Result, RuntimeError};
    pub use crate::sim::{SimReport, Simulation};
}

pub use prelude::*;
