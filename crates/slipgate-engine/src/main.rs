//! # Slipgate
//!
//! Headless driver for the Slipgate movement simulation.
//!
//! This binary owns everything outside the simulation core:
//! - Config: TOML configuration with defaults and validation
//! - Timing: wall-clock frame pacing and an optional fixed timestep
//! - Script: a deterministic input sequence replacing live devices
//! - Overlay: text debug output for each simulated second

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod overlay;
mod script;
mod timing;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("slipgate=info".parse()?)
                .add_directive("slipgate_sim=info".parse()?),
        )
        .init();

    info!("Slipgate starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Run the demo loop
    app::run()?;

    info!("Slipgate shutdown complete");
    Ok(())
}
