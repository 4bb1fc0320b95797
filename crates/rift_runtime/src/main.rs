//! rift-sim
//!
//! ```text
//! rift-sim [config.toml]
//! ```
//!
//! Without a path the built-in arena is used. Set `RUST_LOG=debug` to see
//! every hit.

use rift_runtime::{Result, SimConfig, Simulation};
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(Path::new(&path))?,
        None => {
            log::info!("No config given, using the default arena");
            SimConfig::default()
        }
    };

    let mut sim = Simulation::new(config)?;
    sim.run();
    Ok(())
}
