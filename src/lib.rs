//! Chicken Run - An endless-runner chase game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, chaser AI, spawners, collisions, game phases)
//! - `renderer`: WebGPU rendering of the simulation snapshot
//! - `hud`: Score/overlay text derived from the snapshot
//! - `audio`: Sound collaborator and background music request tracking
//! - `settings`: Read-only player preferences

pub mod audio;
pub mod highscores;
pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::{HighScore, HighScoreOutcome};
pub use settings::Settings;

/// Game configuration constants
///
/// Screen space: origin top-left, y grows downward. All distances are in
/// canvas pixels and already include the world zoom factor `SCALE`.
pub mod consts {
    /// Fixed simulation timestep (one display refresh at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per refresh to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (a hidden tab pauses game time)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World zoom factor
    pub const SCALE: f32 = 1.5;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Ground strip
    pub const GROUND_HEIGHT: f32 = 38.0 * SCALE;
    pub const GROUND_Y: f32 = CANVAS_HEIGHT - GROUND_HEIGHT;

    /// World scroll speed (pixels per frame)
    pub const SCROLL_SPEED: f32 = 2.5 * SCALE;
    /// Hedge layer moves at 40% of the world speed
    pub const HEDGE_PARALLAX: f32 = 0.4;

    /// Player (the chicken) - fixed horizontally, the world scrolls instead
    pub const PLAYER_X: f32 = 100.0 * SCALE;
    pub const PLAYER_SIZE: f32 = 30.0 * SCALE;
    pub const JUMP_FORCE: f32 = 13.0 * SCALE;
    pub const DOUBLE_JUMP_FORCE: f32 = 9.0 * SCALE;
    pub const GRAVITY: f32 = 0.6 * SCALE;

    /// Chaser (the biker)
    pub const CHASER_SIZE: f32 = 90.0 * SCALE * 1.5 * 0.6;
    pub const CHASER_START_X: f32 = -CHASER_SIZE;
    pub const CHASER_FOLLOW_DISTANCE: f32 = 70.0 * SCALE;
    /// Jump window: an obstacle between these forward offsets triggers a jump
    pub const CHASER_JUMP_WINDOW_NEAR: f32 = 40.0 * SCALE;
    pub const CHASER_JUMP_WINDOW_FAR: f32 = 80.0 * SCALE;
    /// Double jump window (forward of chaser.x) for tall obstacles
    pub const CHASER_DOUBLE_JUMP_WINDOW: f32 = 60.0 * SCALE;
    pub const TALL_OBSTACLE_HEIGHT: f32 = 70.0 * SCALE;

    /// Obstacles
    pub const OBSTACLE_WIDTH: f32 = 30.0 * SCALE;
    pub const MAX_OBSTACLES: usize = 10;
    /// Seconds before the first obstacle of a run
    pub const INITIAL_OBSTACLE_DELAY: f32 = 0.5;
    /// Seconds between subsequent obstacles
    pub const OBSTACLE_INTERVAL: f32 = 1.5;

    /// Collision forgiveness: the player box shrinks by this on every side
    pub const COLLISION_BUFFER: f32 = 5.0 * SCALE;

    /// Score ticks up once per interval (seconds)
    pub const SCORE_INTERVAL: f32 = 0.1;
    /// Points for eating a bug
    pub const BUG_POINTS: u64 = 10;
    /// Bug must be this close to the player to be pecked
    pub const BUG_EAT_RADIUS: f32 = 50.0 * SCALE;
    /// Seconds between bug spawn attempts (uniform range)
    pub const BUG_SPAWN_MIN: f32 = 4.0;
    pub const BUG_SPAWN_MAX: f32 = 8.0;
    /// Retry delay after a worm spawn was rejected (uniform range)
    pub const BUG_RETRY_MIN: f32 = 1.0;
    pub const BUG_RETRY_MAX: f32 = 3.0;
    /// Worm arrival lane beyond the right edge
    pub const WORM_LANE_LENGTH: f32 = 100.0 * SCALE;
    pub const WORM_WIDTH: f32 = 32.0 * SCALE;
    pub const WORM_HEIGHT: f32 = 14.0 * SCALE;
    pub const FLYER_RADIUS: f32 = 12.0 * SCALE;

    /// Floating text rises this many pixels per frame
    pub const FLOAT_TEXT_RISE: f32 = 1.0 * SCALE;
    /// Alpha lost per frame
    pub const FLOAT_TEXT_FADE: f32 = 0.02;

    /// Score flash period when beating the session high score (seconds)
    pub const SCORE_FLASH_INTERVAL: f32 = 1.0;
}

/// Resting y (top edge) for a body of the given height standing on the ground
#[inline]
pub fn ground_rest_y(height: f32) -> f32 {
    consts::GROUND_Y - height
}

#[cfg(test)]
mod tests {
    use super::consts::*;
    use super::*;

    #[test]
    fn test_player_rests_on_ground() {
        assert_eq!(ground_rest_y(PLAYER_SIZE), CANVAS_HEIGHT - 38.0 * SCALE - 30.0 * SCALE);
    }

    #[test]
    fn test_pursuit_target_is_on_screen() {
        assert!(PLAYER_X - CHASER_FOLLOW_DISTANCE > 0.0);
        assert!(CHASER_START_X < 0.0);
    }
}
