//! Text debug overlay.
//!
//! Formats the same readout the original on-screen overlay drew, as plain
//! strings for the log. Capturing into a snapshot first keeps the display
//! values of one frame together.

use glam::Vec3;
use slipgate_sim::player::Player;

/// Snapshot of the values the overlay displays.
#[derive(Debug, Clone)]
pub struct OverlaySnapshot {
    /// Frames per second
    pub fps: f32,
    /// Player position
    pub position: Vec3,
    /// Player velocity
    pub velocity: Vec3,
    /// Horizontal ground speed
    pub horizontal_speed: f32,
    /// On the ground plane
    pub grounded: bool,
    /// Sprint held
    pub sprinting: bool,
    /// Cheat-fly mode active
    pub cheat_flying: bool,
}

impl OverlaySnapshot {
    /// Capture the current player state and FPS reading.
    #[must_use]
    pub fn capture(player: &Player, fps: f32) -> Self {
        Self {
            fps,
            position: player.position(),
            velocity: player.velocity(),
            horizontal_speed: player.horizontal_speed(),
            grounded: player.is_grounded(),
            sprinting: player.is_sprinting(),
            cheat_flying: player.is_cheat_flying(),
        }
    }

    /// Format the overlay as one string per display line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("FPS: {:.0}", self.fps),
            format!(
                "Position: ({:.2}, {:.2}, {:.2})",
                self.position.x, self.position.y, self.position.z
            ),
            format!(
                "Velocity: ({:.2}, {:.2}, {:.2})",
                self.velocity.x, self.velocity.y, self.velocity.z
            ),
            format!("Speed: {:.2} m/s", self.horizontal_speed),
            format!("Grounded: {}", self.grounded),
            format!("Sprinting: {}", self.sprinting),
            format!("Cheat Flying: {}", self.cheat_flying),
        ]
    }
}
