//! Player movement controller.
//!
//! Quake-style kinematics: per-frame intent arrives as a world-space wish
//! direction, acceleration projects velocity toward it, ground friction
//! bleeds speed off, gravity and a flat ground plane close the loop. The
//! external loop calls [`Player::wish_move`] then [`Player::update`] once
//! per frame, in that order.
//!
//! Numeric safety is part of the contract: invalid timesteps and corrupted
//! components never halt the simulation. Problems are reported to the
//! injected [`DiagnosticsSink`] and the state degrades to the nearest safe
//! value.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::{DiagnosticLevel, DiagnosticsSink};

/// Errors reported by movement operations.
///
/// None of these are returned to callers; they are delivered to the
/// injected [`DiagnosticsSink`] while the operation degrades to a no-op or
/// a sanitized result.
#[derive(Debug, Clone, Error)]
pub enum MovementError {
    /// Frame delta was NaN, infinite, or not positive
    #[error("invalid timestep: {dt}")]
    InvalidTimestep {
        /// The rejected delta in seconds
        dt: f32,
    },

    /// Wish direction contained a non-finite component
    #[error("invalid wish direction: {wish_dir}")]
    InvalidWishDirection {
        /// The rejected direction vector
        wish_dir: Vec3,
    },

    /// A state component went non-finite after integration and was zeroed
    #[error("non-finite {axis} component in {quantity:?}, reset to zero")]
    NonFiniteComponent {
        /// Which vector quantity was affected
        quantity: VectorQuantity,
        /// Axis label (x, y, or z)
        axis: char,
    },

    /// External state write rejected, prior state retained
    #[error("rejected {quantity:?} write: {value} has a non-finite component")]
    RejectedStateWrite {
        /// Which vector quantity the write targeted
        quantity: VectorQuantity,
        /// The rejected value
        value: Vec3,
    },
}

/// Vector quantities named in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorQuantity {
    /// World-space position in meters
    Position,
    /// World-space velocity in meters per second
    Velocity,
}

/// Movement tuning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walk speed in m/s
    pub move_speed: f32,
    /// Sprint speed in m/s
    pub sprint_speed: f32,
    /// Initial upward velocity of a jump in m/s
    pub jump_strength: f32,
    /// Gravity acceleration in m/s^2 (positive = downward)
    pub gravity: f32,
    /// Ground acceleration rate, scaled by wish speed
    pub ground_acceleration: f32,
    /// Air acceleration rate in m/s^2, unscaled
    pub air_acceleration: f32,
    /// Ground friction coefficient in 1/s
    pub friction: f32,
    /// Speed floor for the friction drop so deceleration reaches zero in
    /// finite time
    pub stop_speed: f32,
    /// Horizontal speed cap in m/s; never applied while cheat-flying
    pub max_velocity: f32,
    /// Height of the ground plane in meters
    pub ground_level: f32,
    /// Wish speed multiplier while cheat-flying
    pub fly_speed_multiplier: f32,
    /// Squared-length threshold below which a wish vector counts as zero;
    /// also the speed floor below which friction snaps to a full stop
    pub epsilon: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            sprint_speed: 7.5,
            jump_strength: 5.0,
            gravity: 9.8,
            ground_acceleration: 10.0,
            air_acceleration: 10.0,
            friction: 2.0,
            stop_speed: 1.0,
            max_velocity: 20.0,
            ground_level: 0.0,
            fly_speed_multiplier: 1.5,
            epsilon: 1e-6,
        }
    }
}

impl MovementConfig {
    /// Validate and clamp configuration values to sensible ranges.
    ///
    /// Non-finite fields are replaced by their defaults before clamping, so
    /// a corrupt config file cannot poison the simulation.
    pub fn validate(&mut self) {
        let defaults = Self::default();

        self.move_speed = finite_or(self.move_speed, defaults.move_speed).clamp(0.1, 100.0);
        self.sprint_speed = finite_or(self.sprint_speed, defaults.sprint_speed)
            .clamp(0.1, 200.0)
            .max(self.move_speed);
        self.jump_strength =
            finite_or(self.jump_strength, defaults.jump_strength).clamp(0.0, 100.0);
        self.gravity = finite_or(self.gravity, defaults.gravity).clamp(0.0, 100.0);
        self.ground_acceleration =
            finite_or(self.ground_acceleration, defaults.ground_acceleration).clamp(0.1, 1000.0);
        self.air_acceleration =
            finite_or(self.air_acceleration, defaults.air_acceleration).clamp(0.1, 1000.0);
        self.friction = finite_or(self.friction, defaults.friction).clamp(0.0, 100.0);
        self.stop_speed = finite_or(self.stop_speed, defaults.stop_speed).clamp(0.0, 10.0);
        self.max_velocity = finite_or(self.max_velocity, defaults.max_velocity).clamp(1.0, 1000.0);
        self.ground_level = finite_or(self.ground_level, defaults.ground_level);
        self.fly_speed_multiplier =
            finite_or(self.fly_speed_multiplier, defaults.fly_speed_multiplier).clamp(1.0, 10.0);
        self.epsilon = finite_or(self.epsilon, defaults.epsilon).clamp(1e-12, 1e-2);
    }
}

/// Returns `value` if finite, `fallback` otherwise.
fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// The player entity: kinematic state plus movement behavior.
///
/// Three mutually exclusive modes:
/// - grounded (`is_grounded`)
/// - airborne (not grounded, not flying)
/// - flying (`is_cheat_flying`; gravity and ground clamping suspended)
///
/// The grounded flag is derived each [`Player::update`] from the position
/// against the ground plane; external callers cannot set it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Position in world space, meters
    position: Vec3,
    /// Velocity in meters per second
    velocity: Vec3,
    /// Whether the player is on the ground plane
    grounded: bool,
    /// Whether sprint speed is selected
    sprinting: bool,
    /// Whether cheat-fly mode is active
    cheat_flying: bool,
    /// Movement tuning
    config: MovementConfig,
}

impl Player {
    /// Create a new player at the given position with default tuning.
    ///
    /// Spawns airborne; the first [`Player::update`] derives the grounded
    /// state from the ground plane.
    #[must_use]
    pub fn new(start_position: Vec3) -> Self {
        Self::with_config(start_position, MovementConfig::default())
    }

    /// Create a new player with custom tuning.
    #[must_use]
    pub fn with_config(start_position: Vec3, config: MovementConfig) -> Self {
        Self {
            position: start_position,
            velocity: Vec3::ZERO,
            grounded: false,
            sprinting: false,
            cheat_flying: false,
            config,
        }
    }

    /// Get the player's position. Returns a copy; mutating it does not
    /// touch the simulation state.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Get the player's velocity. Returns a copy.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Speed over the ground plane, ignoring vertical velocity.
    #[must_use]
    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }

    /// Whether the player is on the ground plane.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether sprint speed is selected.
    #[must_use]
    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    /// Whether cheat-fly mode is active.
    #[must_use]
    pub fn is_cheat_flying(&self) -> bool {
        self.cheat_flying
    }

    /// Get the movement tuning.
    #[must_use]
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Get mutable access to the movement tuning.
    pub fn config_mut(&mut self) -> &mut MovementConfig {
        &mut self.config
    }

    /// Override the player's position (spawn, respawn, teleport).
    ///
    /// A vector with any non-finite component is rejected wholesale: prior
    /// state is retained and a severe diagnostic is reported. Writing a
    /// position below the ground plane is legal; the next [`Player::update`]
    /// clamps it.
    pub fn set_position<D: DiagnosticsSink>(&mut self, position: Vec3, diag: &D) {
        if !position.is_finite() {
            diag.report(
                DiagnosticLevel::Severe,
                &MovementError::RejectedStateWrite {
                    quantity: VectorQuantity::Position,
                    value: position,
                },
            );
            return;
        }
        self.position = position;
    }

    /// Override the player's velocity.
    ///
    /// Same rejection contract as [`Player::set_position`].
    pub fn set_velocity<D: DiagnosticsSink>(&mut self, velocity: Vec3, diag: &D) {
        if !velocity.is_finite() {
            diag.report(
                DiagnosticLevel::Severe,
                &MovementError::RejectedStateWrite {
                    quantity: VectorQuantity::Velocity,
                    value: velocity,
                },
            );
            return;
        }
        self.velocity = velocity;
    }

    /// Select or deselect sprint speed.
    pub fn set_sprinting(&mut self, sprinting: bool) {
        self.sprinting = sprinting;
    }

    /// Flip the sprint flag.
    pub fn toggle_sprint(&mut self) {
        self.sprinting = !self.sprinting;
    }

    /// Flip cheat-fly mode.
    ///
    /// Entering the mode zeroes vertical velocity and clears the grounded
    /// flag; gravity and ground clamping stay suspended until toggled off.
    pub fn toggle_cheat_flying(&mut self) {
        self.cheat_flying = !self.cheat_flying;
        if self.cheat_flying {
            self.velocity.y = 0.0;
            self.grounded = false;
        }
    }

    /// Jump: set vertical velocity to `jump_strength` and leave the ground.
    ///
    /// Valid when grounded, and also while cheat-flying where it doubles as
    /// the ascent control. Anything else is a silent no-op, not an error.
    pub fn jump(&mut self) {
        if self.grounded || self.cheat_flying {
            self.velocity.y = self.config.jump_strength;
            self.grounded = false;
        }
    }

    /// Per-frame steering toward a world-space wish direction.
    ///
    /// `wish_dir` need not be normalized; its y component is ignored. A
    /// vector shorter than the zero threshold means "no movement", which
    /// still applies ground friction. Ground friction always runs before
    /// acceleration, so a grounded player both coasts to a stop and fights
    /// friction while walking.
    pub fn wish_move<D: DiagnosticsSink>(&mut self, wish_dir: Vec3, dt: f32, diag: &D) {
        if !valid_timestep(dt) {
            diag.report(
                DiagnosticLevel::Warning,
                &MovementError::InvalidTimestep { dt },
            );
            return;
        }

        let wish_ok = wish_dir.is_finite();
        if !wish_ok {
            diag.report(
                DiagnosticLevel::Warning,
                &MovementError::InvalidWishDirection { wish_dir },
            );
        }

        if self.grounded {
            self.apply_friction(dt);
        }

        if wish_ok {
            // Horizontal intent only
            let flat = Vec3::new(wish_dir.x, 0.0, wish_dir.z);
            if flat.length_squared() >= self.config.epsilon {
                let wish = flat.normalize_or_zero();
                let mut wish_speed = if self.sprinting {
                    self.config.sprint_speed
                } else {
                    self.config.move_speed
                };
                if self.cheat_flying {
                    wish_speed *= self.config.fly_speed_multiplier;
                }

                let (accel, scale) = if self.grounded {
                    (self.config.ground_acceleration, wish_speed)
                } else {
                    (self.config.air_acceleration, 1.0)
                };
                self.accelerate(wish, wish_speed, accel, scale, dt);
            }
        }

        sanitize_vector(&mut self.velocity, VectorQuantity::Velocity, diag);

        if !self.cheat_flying {
            self.clamp_horizontal_speed();
        }
    }

    /// Per-frame physics independent of player intent: gravity, position
    /// integration, and ground-plane resolution.
    pub fn update<D: DiagnosticsSink>(&mut self, dt: f32, diag: &D) {
        if !valid_timestep(dt) {
            diag.report(
                DiagnosticLevel::Warning,
                &MovementError::InvalidTimestep { dt },
            );
            return;
        }

        if !self.cheat_flying {
            self.velocity.y -= self.config.gravity * dt;
        }

        self.position += self.velocity * dt;

        sanitize_vector(&mut self.velocity, VectorQuantity::Velocity, diag);
        sanitize_vector(&mut self.position, VectorQuantity::Position, diag);

        // Ground plane: clamp and re-derive the grounded flag
        if self.position.y <= self.config.ground_level && !self.cheat_flying {
            self.position.y = self.config.ground_level;
            if self.velocity.y <= 0.0 {
                self.velocity.y = 0.0;
            }
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Projection-based acceleration toward `wish_speed` along `wish_dir`.
    ///
    /// The projection test means acceleration stops once the velocity
    /// component along the wish direction reaches the target, without
    /// snapping, and permits speed retention when strafing off-axis.
    fn accelerate(&mut self, wish_dir: Vec3, wish_speed: f32, accel: f32, scale: f32, dt: f32) {
        let current_speed = self.velocity.dot(wish_dir);
        let add_speed = wish_speed - current_speed;
        if add_speed <= 0.0 {
            return;
        }
        let accel_speed = (accel * dt * scale).min(add_speed);
        self.velocity += wish_dir * accel_speed;
    }

    /// Grounded deceleration. The stop-speed floor keeps the drop from
    /// shrinking with the speed, so the player reaches an exact stop in
    /// finite time. Vertical velocity is untouched.
    fn apply_friction(&mut self, dt: f32) {
        let speed = self.horizontal_speed();
        if speed < self.config.epsilon {
            self.velocity.x = 0.0;
            self.velocity.z = 0.0;
            return;
        }

        let control = speed.max(self.config.stop_speed);
        let drop = control * self.config.friction * dt;
        let new_speed = (speed - drop).max(0.0);

        let ratio = new_speed / speed;
        self.velocity.x *= ratio;
        self.velocity.z *= ratio;
    }

    /// Uniform rescale of the horizontal components down to `max_velocity`.
    fn clamp_horizontal_speed(&mut self) {
        let max = self.config.max_velocity;
        let horizontal_sq = self.velocity.x * self.velocity.x + self.velocity.z * self.velocity.z;
        if horizontal_sq > max * max {
            let ratio = max / horizontal_sq.sqrt();
            self.velocity.x *= ratio;
            self.velocity.z *= ratio;
        }
    }
}

/// A usable frame delta is finite and strictly positive.
fn valid_timestep(dt: f32) -> bool {
    dt.is_finite() && dt > 0.0
}

/// Zero any non-finite component, reporting each offending axis. Finite
/// axes are left alone.
fn sanitize_vector<D: DiagnosticsSink>(vector: &mut Vec3, quantity: VectorQuantity, diag: &D) {
    if !vector.x.is_finite() {
        diag.report(
            DiagnosticLevel::Warning,
            &MovementError::NonFiniteComponent { quantity, axis: 'x' },
        );
        vector.x = 0.0;
    }
    if !vector.y.is_finite() {
        diag.report(
            DiagnosticLevel::Warning,
            &MovementError::NonFiniteComponent { quantity, axis: 'y' },
        );
        vector.y = 0.0;
    }
    if !vector.z.is_finite() {
        diag.report(
            DiagnosticLevel::Warning,
            &MovementError::NonFiniteComponent { quantity, axis: 'z' },
        );
        vector.z = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;

    const DT: f32 = 1.0 / 60.0;

    /// A player standing on the ground plane at the origin.
    fn grounded_player() -> (Player, RecordingSink) {
        let mut player = Player::new(Vec3::ZERO);
        let sink = RecordingSink::new();
        player.update(DT, &sink);
        assert!(player.is_grounded());
        sink.clear();
        (player, sink)
    }

    #[test]
    fn test_player_creation() {
        let player = Player::new(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(player.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(player.velocity(), Vec3::ZERO);
        assert!(!player.is_grounded());
        assert!(!player.is_sprinting());
        assert!(!player.is_cheat_flying());
    }

    #[test]
    fn test_player_with_config() {
        let config = MovementConfig {
            move_speed: 3.0,
            ..Default::default()
        };
        let player = Player::with_config(Vec3::ZERO, config);
        assert_eq!(player.config().move_speed, 3.0);
    }

    #[test]
    fn test_default_tuning() {
        let config = MovementConfig::default();
        assert_eq!(config.move_speed, 5.0);
        assert_eq!(config.sprint_speed, 7.5);
        assert_eq!(config.jump_strength, 5.0);
        assert_eq!(config.gravity, 9.8);
        assert_eq!(config.friction, 2.0);
        assert_eq!(config.stop_speed, 1.0);
        assert_eq!(config.max_velocity, 20.0);
        assert_eq!(config.fly_speed_multiplier, 1.5);
    }

    #[test]
    fn test_config_validate_clamps() {
        let mut config = MovementConfig {
            move_speed: -4.0,
            sprint_speed: 0.2,
            gravity: f32::NAN,
            max_velocity: 0.0,
            epsilon: f32::INFINITY,
            ..Default::default()
        };
        config.validate();

        assert_eq!(config.move_speed, 0.1);
        // Sprint can never be slower than walking
        assert!(config.sprint_speed >= config.move_speed);
        assert_eq!(config.gravity, 9.8);
        assert_eq!(config.max_velocity, 1.0);
        assert_eq!(config.epsilon, 1e-6);
    }

    #[test]
    fn test_settles_onto_ground_plane() {
        let mut player = Player::new(Vec3::ZERO);
        let sink = RecordingSink::new();
        assert!(!player.is_grounded());

        player.update(DT, &sink);

        assert!(player.is_grounded());
        assert_eq!(player.position().y, 0.0);
        assert_eq!(player.velocity().y, 0.0);
    }

    #[test]
    fn test_wish_move_accelerates_toward_wish_speed() {
        let (mut player, sink) = grounded_player();

        player.wish_move(Vec3::NEG_Z, DT, &sink);

        // One tick of ground acceleration: accel * dt * wish_speed
        let expected = 10.0 * DT * 5.0;
        assert!((player.horizontal_speed() - expected).abs() < 1e-4);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_walk_speed_converges_and_never_exceeds() {
        let (mut player, sink) = grounded_player();

        for _ in 0..200 {
            player.wish_move(Vec3::NEG_Z, DT, &sink);
            assert!(player.horizontal_speed() <= 5.0 + 1e-3);
        }
        assert!((player.horizontal_speed() - 5.0).abs() < 0.2);
    }

    #[test]
    fn test_sprint_approaches_sprint_speed() {
        let (mut player, sink) = grounded_player();
        player.set_sprinting(true);

        for _ in 0..200 {
            player.wish_move(Vec3::NEG_Z, DT, &sink);
            assert!(player.horizontal_speed() <= 7.5 + 1e-3);
        }
        assert!((player.horizontal_speed() - 7.5).abs() < 0.2);
    }

    #[test]
    fn test_wish_move_normalizes_input() {
        let (mut a, sink_a) = grounded_player();
        let (mut b, sink_b) = grounded_player();

        a.wish_move(Vec3::new(0.0, 0.0, -10.0), DT, &sink_a);
        b.wish_move(Vec3::new(0.0, 0.0, -1.0), DT, &sink_b);

        assert!((a.velocity() - b.velocity()).length() < 1e-5);
    }

    #[test]
    fn test_wish_move_ignores_vertical_intent() {
        let (mut player, sink) = grounded_player();

        // Pure vertical wish is "no movement"
        player.wish_move(Vec3::new(0.0, 5.0, 0.0), DT, &sink);
        assert_eq!(player.velocity(), Vec3::ZERO);

        // Mixed wish only steers horizontally
        player.wish_move(Vec3::new(1.0, 9.0, 0.0), DT, &sink);
        assert!(player.velocity().x > 0.0);
        assert_eq!(player.velocity().y, 0.0);
    }

    #[test]
    fn test_friction_decreases_strictly_to_exact_zero() {
        let (mut player, sink) = grounded_player();
        player.set_velocity(Vec3::new(6.0, 0.0, 0.0), &sink);

        let mut last = player.horizontal_speed();
        let mut ticks = 0;
        while player.horizontal_speed() > 0.0 {
            player.wish_move(Vec3::ZERO, DT, &sink);
            let speed = player.horizontal_speed();
            assert!(speed < last, "friction must strictly decrease speed");
            last = speed;
            ticks += 1;
            assert!(ticks < 1000, "friction never converged");
        }

        assert_eq!(player.horizontal_speed(), 0.0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_friction_skipped_while_airborne() {
        let mut player = Player::new(Vec3::new(0.0, 10.0, 0.0));
        let sink = RecordingSink::new();
        player.set_velocity(Vec3::new(4.0, 0.0, 0.0), &sink);

        player.wish_move(Vec3::ZERO, DT, &sink);

        assert_eq!(player.velocity().x, 4.0);
    }

    #[test]
    fn test_air_acceleration_is_unscaled() {
        let mut player = Player::new(Vec3::new(0.0, 10.0, 0.0));
        let sink = RecordingSink::new();

        player.wish_move(Vec3::NEG_Z, DT, &sink);

        // One tick of air acceleration: accel * dt
        let expected = 10.0 * DT;
        assert!((player.horizontal_speed() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_jump_from_ground() {
        let (mut player, _sink) = grounded_player();

        player.jump();

        assert_eq!(player.velocity().y, 5.0);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_jump_ignored_while_airborne() {
        let mut player = Player::new(Vec3::new(0.0, 10.0, 0.0));

        player.jump();

        assert_eq!(player.velocity().y, 0.0);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_jump_is_fly_ascent() {
        let (mut player, _sink) = grounded_player();
        player.toggle_cheat_flying();

        player.jump();

        assert_eq!(player.velocity().y, 5.0);
    }

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let (mut player, sink) = grounded_player();
        player.jump();

        // 2 s covers the full arc at default tuning (~1.02 s)
        for _ in 0..120 {
            player.update(DT, &sink);
        }

        assert!(player.is_grounded());
        assert_eq!(player.position().y, 0.0);
        assert_eq!(player.velocity().y, 0.0);
    }

    #[test]
    fn test_one_meter_drop_lands_in_one_second() {
        let mut player = Player::new(Vec3::new(0.0, 1.0, 0.0));
        let sink = RecordingSink::new();

        player.update(1.0, &sink);

        assert_eq!(player.position().y, 0.0);
        assert_eq!(player.velocity().y, 0.0);
        assert!(player.is_grounded());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_ground_clamp_keeps_upward_velocity() {
        let (mut player, sink) = grounded_player();
        // Below the plane and rising: the clamp grounds the player but
        // must not cancel the ascent
        player.set_position(Vec3::new(0.0, -1.0, 0.0), &sink);
        player.set_velocity(Vec3::new(0.0, 3.0, 0.0), &sink);

        player.update(DT, &sink);

        assert_eq!(player.position().y, 0.0);
        assert!(player.velocity().y > 0.0);
        assert!(player.is_grounded());

        // The retained ascent lifts the player off again next tick
        player.update(DT, &sink);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_gravity_integration_while_airborne() {
        let mut player = Player::new(Vec3::new(0.0, 10.0, 0.0));
        let sink = RecordingSink::new();

        player.update(0.5, &sink);

        assert!((player.velocity().y - (-4.9)).abs() < 1e-4);
        assert!((player.position().y - 7.55).abs() < 1e-3);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_speed_cap_applies_horizontally() {
        let (mut player, sink) = grounded_player();
        player.set_velocity(Vec3::new(30.0, 9.0, 0.0), &sink);

        player.wish_move(Vec3::ZERO, DT, &sink);

        assert!(player.horizontal_speed() <= 20.0 + 1e-3);
        // Vertical velocity is never touched by the cap
        assert_eq!(player.velocity().y, 9.0);
    }

    #[test]
    fn test_speed_cap_bounds_over_tuned_config() {
        let config = MovementConfig {
            move_speed: 50.0,
            sprint_speed: 50.0,
            ..Default::default()
        };
        let mut player = Player::with_config(Vec3::ZERO, config);
        let sink = RecordingSink::new();
        player.update(DT, &sink);

        for _ in 0..100 {
            player.wish_move(Vec3::NEG_Z, DT, &sink);
            assert!(player.horizontal_speed() <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn test_speed_cap_skipped_while_flying() {
        let (mut player, sink) = grounded_player();
        player.toggle_cheat_flying();
        player.set_velocity(Vec3::new(30.0, 0.0, 0.0), &sink);

        player.wish_move(Vec3::ZERO, DT, &sink);

        assert_eq!(player.horizontal_speed(), 30.0);
    }

    #[test]
    fn test_fly_speed_multiplier() {
        let (mut player, sink) = grounded_player();
        player.toggle_cheat_flying();
        player.set_sprinting(true);

        // Flying with sprint: wish speed is 7.5 * 1.5 = 11.25
        for _ in 0..200 {
            player.wish_move(Vec3::NEG_Z, DT, &sink);
        }

        assert!((player.horizontal_speed() - 11.25).abs() < 0.05);
    }

    #[test]
    fn test_toggle_cheat_flying_zeroes_vertical_velocity() {
        let (mut player, _sink) = grounded_player();
        player.jump();
        assert_eq!(player.velocity().y, 5.0);

        player.toggle_cheat_flying();

        assert!(player.is_cheat_flying());
        assert_eq!(player.velocity().y, 0.0);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_flying_suspends_gravity_and_clamp() {
        let (mut player, sink) = grounded_player();
        player.toggle_cheat_flying();
        player.set_position(Vec3::new(0.0, -3.0, 0.0), &sink);

        player.update(0.5, &sink);

        assert_eq!(player.velocity().y, 0.0);
        assert_eq!(player.position().y, -3.0);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_leaving_fly_mode_resumes_gravity() {
        let (mut player, sink) = grounded_player();
        player.toggle_cheat_flying();
        player.set_position(Vec3::new(0.0, 5.0, 0.0), &sink);
        player.toggle_cheat_flying();

        player.update(0.1, &sink);

        assert!(player.velocity().y < 0.0);
    }

    #[test]
    fn test_update_rejects_invalid_timestep() {
        let (mut player, sink) = grounded_player();
        player.set_velocity(Vec3::new(2.0, 0.0, 0.0), &sink);
        let position = player.position();
        let velocity = player.velocity();

        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, 0.0, -0.1] {
            player.update(dt, &sink);
        }

        assert_eq!(player.position(), position);
        assert_eq!(player.velocity(), velocity);
        assert_eq!(sink.len(), 5);
        assert!(!sink.has_severe());
    }

    #[test]
    fn test_wish_move_rejects_invalid_timestep() {
        let (mut player, sink) = grounded_player();
        player.set_velocity(Vec3::new(2.0, 0.0, 0.0), &sink);
        let velocity = player.velocity();

        for dt in [f32::NAN, f32::INFINITY, 0.0, -1.0] {
            player.wish_move(Vec3::NEG_Z, dt, &sink);
        }

        assert_eq!(player.velocity(), velocity);
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn test_wish_move_non_finite_wish_still_applies_friction() {
        let (mut player, sink) = grounded_player();
        player.set_velocity(Vec3::new(3.0, 0.0, 0.0), &sink);

        player.wish_move(Vec3::new(f32::NAN, 0.0, 0.0), DT, &sink);

        let speed = player.horizontal_speed();
        assert!(speed > 0.0 && speed < 3.0);
        assert_eq!(sink.len(), 1);
        let reports = sink.reports();
        assert!(reports[0].1.contains("invalid wish direction"));
    }

    #[test]
    fn test_update_zeroes_only_offending_axis() {
        let (mut player, sink) = grounded_player();
        player.set_velocity(Vec3::new(2.0, 0.0, 0.0), &sink);
        player.config_mut().gravity = f32::INFINITY;

        player.update(DT, &sink);

        // x axis survives; y went non-finite and was reset
        assert_eq!(player.velocity().x, 2.0);
        assert_eq!(player.velocity().y, 0.0);
        assert!((player.position().x - 2.0 * DT).abs() < 1e-6);
        assert_eq!(player.position().y, 0.0);
        // One report for velocity.y, one for position.y
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_set_position_rejects_non_finite() {
        let (mut player, sink) = grounded_player();
        let before = player.position();

        player.set_position(Vec3::new(f32::NAN, 1.0, 2.0), &sink);

        assert_eq!(player.position(), before);
        assert!(sink.has_severe());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_set_velocity_rejects_non_finite() {
        let (mut player, sink) = grounded_player();

        player.set_velocity(Vec3::new(0.0, f32::INFINITY, 0.0), &sink);

        assert_eq!(player.velocity(), Vec3::ZERO);
        assert!(sink.has_severe());
    }

    #[test]
    fn test_set_position_below_ground_clamps_on_next_update() {
        let (mut player, sink) = grounded_player();

        player.set_position(Vec3::new(0.0, -5.0, 0.0), &sink);
        assert_eq!(player.position().y, -5.0);

        player.update(DT, &sink);
        assert_eq!(player.position().y, 0.0);
        assert!(player.is_grounded());
    }

    #[test]
    fn test_sprint_toggle() {
        let (mut player, _sink) = grounded_player();
        assert!(!player.is_sprinting());

        player.toggle_sprint();
        assert!(player.is_sprinting());

        player.set_sprinting(false);
        assert!(!player.is_sprinting());
    }

    #[test]
    fn test_sprint_single_tick_at_coarse_dt() {
        let (mut player, sink) = grounded_player();
        player.set_sprinting(true);

        // accel * dt * wish_speed = 10 * 0.1 * 7.5 covers the whole
        // add_speed in one tick at this dt
        player.wish_move(Vec3::NEG_Z, 0.1, &sink);

        assert!((player.horizontal_speed() - 7.5).abs() < 1e-4);
    }

    #[test]
    fn test_strafe_retains_speed_past_wish_speed() {
        let mut player = Player::new(Vec3::new(0.0, 50.0, 0.0));
        let sink = RecordingSink::new();
        player.set_velocity(Vec3::new(7.0, 0.0, 0.0), &sink);

        // Wish perpendicular to travel: projection is zero, so air
        // acceleration adds speed on top of the existing 7 m/s
        player.wish_move(Vec3::NEG_Z, DT, &sink);

        assert!(player.horizontal_speed() > 7.0);
        assert_eq!(player.velocity().x, 7.0);
    }
}
