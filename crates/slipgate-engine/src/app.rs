//! Application lifecycle management.
//!
//! The demo loop that ties configuration, timing, the scripted input, the
//! camera, and the player simulation together.

use anyhow::Result;
use tracing::{info, warn};

use slipgate_sim::camera::Camera;
use slipgate_sim::diagnostics::TracingSink;
use slipgate_sim::input::{InputMapper, KeyCode};
use slipgate_sim::player::Player;

use crate::config::EngineConfig;
use crate::overlay::OverlaySnapshot;
use crate::script::DemoScript;
use crate::timing::{FpsCounter, FrameTiming};

/// Keys the scripted demo can press.
const DEMO_KEYS: &[KeyCode] = &[
    KeyCode::W,
    KeyCode::A,
    KeyCode::S,
    KeyCode::D,
    KeyCode::Space,
    KeyCode::LShift,
    KeyCode::F,
    KeyCode::F3,
];

/// Demo application state.
struct App {
    /// Engine configuration
    config: EngineConfig,

    // === Simulation ===
    /// The player being driven
    player: Player,
    /// First-person camera orientation
    camera: Camera,
    /// Key state and action bindings
    input: InputMapper,
    /// Scripted key sequence
    script: DemoScript,
    /// Diagnostics sink for the simulation
    diag: TracingSink,

    // === Timing ===
    /// Frame timing
    timing: FrameTiming,
    /// FPS counter for the overlay
    fps_counter: FpsCounter,

    // === Demo Progress ===
    /// Simulated seconds since the demo started
    elapsed: f32,
    /// Seconds since the last overlay dump
    overlay_timer: f32,
    /// Whether the overlay is visible
    show_overlay: bool,
    /// Label of the phase that was active last tick
    current_phase: Option<&'static str>,
}

impl App {
    /// Creates a new application instance.
    fn new(config: EngineConfig) -> Self {
        let player = Player::with_config(config.spawn, config.movement.clone());
        let camera = Camera::with_settings(config.mouse_sensitivity, config.invert_y);
        let timing = FrameTiming::new(config.target_fps)
            .with_max_dt(config.max_dt)
            .with_fixed_dt(config.fixed_dt);

        Self {
            show_overlay: config.overlay,
            config,
            player,
            camera,
            input: InputMapper::new(),
            script: DemoScript::standard(),
            diag: TracingSink::new(),
            timing,
            fps_counter: FpsCounter::new(),
            elapsed: 0.0,
            overlay_timer: 0.0,
            current_phase: None,
        }
    }

    /// Advance the simulation by one tick.
    fn tick(&mut self, dt: f32) {
        // Feed the scripted key holds for this instant into the mapper
        let held = self.script.keys_at(self.elapsed);
        for key in DEMO_KEYS {
            self.input.update_key(*key, held.contains(key));
        }

        let label = self.script.label_at(self.elapsed);
        if label != self.current_phase {
            if let Some(label) = label {
                info!("Demo phase: {label}");
            }
            self.current_phase = label;
        }

        let frame = self.input.sample();

        if frame.toggle_fly {
            self.player.toggle_cheat_flying();
            info!(
                "Cheat fly: {}",
                if self.player.is_cheat_flying() {
                    "ON"
                } else {
                    "OFF"
                }
            );
        }
        if frame.toggle_overlay {
            self.show_overlay = !self.show_overlay;
            info!(
                "Overlay: {}",
                if self.show_overlay { "ON" } else { "OFF" }
            );
        }

        self.player.set_sprinting(frame.sprinting);
        if frame.jump {
            self.player.jump();
        }

        // Steering first, then physics, once per tick
        let wish = frame.wish_direction(&self.camera);
        self.player.wish_move(wish, dt, &self.diag);
        self.player.update(dt, &self.diag);

        self.input.end_frame();
        self.elapsed += dt;
        self.overlay_timer += dt;
    }

    /// Log the overlay if it is visible and the cadence has elapsed.
    fn maybe_dump_overlay(&mut self, fps: f32) {
        if !self.show_overlay || self.overlay_timer < self.config.overlay_interval {
            return;
        }
        self.overlay_timer = 0.0;

        let snapshot = OverlaySnapshot::capture(&self.player, fps);
        for line in snapshot.lines() {
            info!("  {line}");
        }
    }
}

/// Runs the demo loop.
pub fn run() -> Result<()> {
    // Load configuration: an explicit path argument wins over the default
    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    config.validate();

    info!("Configuration loaded:");
    info!("  Target FPS: {}", config.target_fps);
    info!("  Demo duration: {:.1}s", config.demo_duration);
    info!("  Fixed timestep: {}", config.fixed_timestep);
    info!(
        "  Spawn: ({:.1}, {:.1}, {:.1})",
        config.spawn.x, config.spawn.y, config.spawn.z
    );

    let mut app = App::new(config);
    app.timing.reset();

    while app.elapsed < app.config.demo_duration {
        let dt = app.timing.delta_time();
        let fps = app.fps_counter.tick();

        // A coarse clock can report a zero delta; skip the frame rather
        // than hand the simulation a timestep it will refuse
        if dt > 0.0 {
            if app.config.fixed_timestep {
                let fixed_dt = app.timing.fixed_dt();
                let steps = app.timing.accumulate(dt);
                for _ in 0..steps {
                    app.tick(fixed_dt);
                }
            } else {
                app.tick(dt);
            }

            app.maybe_dump_overlay(fps);
        }

        app.timing.sleep_remainder();
    }

    info!("Demo complete after {:.2} simulated seconds", app.elapsed);
    let summary = OverlaySnapshot::capture(&app.player, app.fps_counter.fps());
    for line in summary.lines() {
        info!("  {line}");
    }

    // Leave an editable config template behind
    if let Err(e) = app.config.save() {
        warn!("Failed to save config: {e}");
    }

    Ok(())
}
