//! Engine configuration.
//!
//! Provides configurable parameters for timing, the scripted demo, the
//! camera, and the movement tunables forwarded to the simulation.
//! Configuration can be loaded from and saved to a TOML file.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use slipgate_sim::player::MovementConfig;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "slipgate.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Timing Settings ===
    /// Target frames per second for the demo loop
    pub target_fps: u32,
    /// Largest frame delta fed to the simulation, in seconds
    pub max_dt: f32,
    /// Step the simulation at a fixed rate instead of the frame delta
    pub fixed_timestep: bool,
    /// Fixed timestep delta in seconds (when `fixed_timestep` is on)
    pub fixed_dt: f32,

    // === Demo Settings ===
    /// How long the scripted demo runs, in seconds
    pub demo_duration: f32,
    /// Show the debug overlay (F3 toggles it mid-run)
    pub overlay: bool,
    /// Seconds between overlay dumps
    pub overlay_interval: f32,
    /// Player spawn position
    pub spawn: Vec3,

    // === Camera Settings ===
    /// Mouse sensitivity in degrees per count
    pub mouse_sensitivity: f32,
    /// Invert Y axis
    pub invert_y: bool,

    // === Movement Settings ===
    /// Movement tunables forwarded to the player controller
    pub movement: MovementConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Timing
            target_fps: 60,
            max_dt: 0.25,
            fixed_timestep: false,
            fixed_dt: 1.0 / 60.0,

            // Demo
            demo_duration: 6.0,
            overlay: true,
            overlay_interval: 0.5,
            spawn: Vec3::new(1.0, 0.0, 3.0),

            // Camera
            mouse_sensitivity: 0.1,
            invert_y: false,

            // Movement
            movement: MovementConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to the default file location.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(Self::config_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default configuration file path: `slipgate.toml` in the working
    /// directory, so a demo run leaves an editable template behind.
    fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Timing
        self.target_fps = self.target_fps.clamp(30, 240);
        self.max_dt = finite_or(self.max_dt, 0.25).clamp(0.05, 1.0);
        self.fixed_dt = finite_or(self.fixed_dt, 1.0 / 60.0).clamp(0.001, 0.1);

        // Demo
        self.demo_duration = finite_or(self.demo_duration, 6.0).clamp(1.0, 600.0);
        self.overlay_interval = finite_or(self.overlay_interval, 0.5).clamp(0.1, 10.0);
        if !self.spawn.is_finite() {
            self.spawn = Self::default().spawn;
        }

        // Camera
        self.mouse_sensitivity = finite_or(self.mouse_sensitivity, 0.1).clamp(0.01, 5.0);

        // Movement
        self.movement.validate();
    }
}

/// Replace a non-finite value with its fallback before clamping.
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
