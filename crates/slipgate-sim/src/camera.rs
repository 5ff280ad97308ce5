//! First-person camera orientation.
//!
//! Pure math: yaw/pitch state driven by mouse deltas, and the derived
//! basis vectors the input mapper and presentation layer consume. No
//! cursor handling or windowing here; the engine feeds deltas in.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Yaw looking down negative Z, the conventional spawn orientation.
const INITIAL_YAW_DEG: f32 = -90.0;

/// Pitch limit keeping the view off the vertical poles.
const PITCH_LIMIT_DEG: f32 = 89.0;

/// First-person camera: orientation plus eye placement over the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Yaw in degrees; -90 faces negative Z
    yaw_deg: f32,
    /// Pitch in degrees, clamped to ±89
    pitch_deg: f32,
    /// Degrees of rotation per unit of mouse delta
    sensitivity: f32,
    /// Invert vertical look
    invert_y: bool,
    /// Eye height above the player position, meters
    eye_height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            yaw_deg: INITIAL_YAW_DEG,
            pitch_deg: 0.0,
            sensitivity: 0.1,
            invert_y: false,
            eye_height: 1.0,
        }
    }
}

impl Camera {
    /// Create a camera with the default orientation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with explicit look settings.
    #[must_use]
    pub fn with_settings(sensitivity: f32, invert_y: bool) -> Self {
        Self {
            sensitivity,
            invert_y,
            ..Self::default()
        }
    }

    /// Current yaw in degrees.
    #[must_use]
    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    /// Current pitch in degrees.
    #[must_use]
    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    /// Apply a mouse movement in screen coordinates (positive `dy` is
    /// downward). Non-finite deltas are ignored.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }

        self.yaw_deg += dx * self.sensitivity;

        let pitch_delta = dy * self.sensitivity;
        if self.invert_y {
            self.pitch_deg += pitch_delta;
        } else {
            self.pitch_deg -= pitch_delta;
        }
        self.pitch_deg = self.pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// View direction from yaw and pitch, unit length.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Movement-plane forward: the view direction flattened onto the
    /// ground plane and renormalized. Pitch never affects walk direction.
    #[must_use]
    pub fn flat_forward(&self) -> Vec3 {
        let forward = self.forward();
        Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero()
    }

    /// Movement-plane right vector.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.flat_forward().cross(Vec3::Y).normalize_or_zero()
    }

    /// Eye position for a player standing at `player_position`.
    #[must_use]
    pub fn eye_position(&self, player_position: Vec3) -> Vec3 {
        player_position + Vec3::Y * self.eye_height
    }

    /// Right-handed view matrix for the presentation layer.
    #[must_use]
    pub fn view_matrix(&self, player_position: Vec3) -> Mat4 {
        let eye = self.eye_position(player_position);
        Mat4::look_at_rh(eye, eye + self.forward(), Vec3::Y)
    }
}
