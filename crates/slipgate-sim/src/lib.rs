//! # Slipgate Sim
//!
//! Simulation core for Slipgate.
//!
//! This crate provides the CPU-side movement simulation and its direct
//! collaborators:
//! - Player controller with Quake-style kinematics (acceleration, friction,
//!   gravity, ground plane, cheat-fly)
//! - Input mapping with rebindable actions and edge detection
//! - First-person camera orientation math
//! - Injected diagnostics sink for numeric-safety reporting
//!
//! No windowing, rendering, or device I/O lives here; the engine binary
//! drives the simulation and owns all platform concerns.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod camera;
pub mod diagnostics;
pub mod input;
pub mod player;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::camera::*;
    pub use crate::diagnostics::*;
    pub use crate::input::*;
    pub use crate::player::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_walk_tick_moves_player() {
        let mut player = Player::new(Vec3::ZERO);
        let sink = RecordingSink::new();
        player.update(1.0 / 60.0, &sink); // settle onto the ground plane

        player.wish_move(Vec3::new(0.0, 0.0, -1.0), 0.1, &sink);
        player.update(0.1, &sink);

        assert!(player.position().z < 0.0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_jump_and_land() {
        let mut player = Player::new(Vec3::ZERO);
        let sink = RecordingSink::new();
        player.update(1.0 / 60.0, &sink);

        player.jump();
        assert!(!player.is_grounded());

        // Two seconds covers the full jump arc at default tuning
        for _ in 0..120 {
            player.update(1.0 / 60.0, &sink);
        }

        assert!(player.is_grounded());
        assert_eq!(player.position().y, 0.0);
    }

    #[test]
    fn test_input_frame_feeds_wish_direction() {
        let mut mapper = InputMapper::new();
        let camera = Camera::new();
        mapper.update_key(KeyCode::W, true);

        let frame = mapper.sample();
        let wish = frame.wish_direction(&camera);

        assert!(wish.length() > 0.99);
        assert_eq!(wish.y, 0.0);
    }
}
