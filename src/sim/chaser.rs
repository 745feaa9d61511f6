//! Chaser AI
//!
//! The biker enters from off-screen, closes in to a fixed distance behind the
//! chicken, then stays pinned there. Obstacles are handled with a lookahead
//! window instead of path planning: one band triggers a jump, a shorter band
//! triggers the air jump for tall obstacles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Body;
use super::state::Obstacle;
use crate::consts::*;

/// Chaser entry state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChaserIntro {
    /// Running in from off-screen until x reaches 0
    Intro,
    /// Advancing until it reaches the follow distance
    ClosingDistance,
    /// Pinned at the follow distance
    Pursuing,
}

/// The pursuing NPC
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chaser {
    pub body: Body,
    /// Horizontal gap kept behind the player while pursuing
    pub follow_distance: f32,
    pub intro: ChaserIntro,
    /// Obstacle the current/last jump was started for
    pub jumped_for: Option<u32>,
}

impl Default for Chaser {
    fn default() -> Self {
        Self::new()
    }
}

impl Chaser {
    pub fn new() -> Self {
        Self {
            body: Body::new(
                CHASER_START_X,
                Vec2::splat(CHASER_SIZE),
                JUMP_FORCE,
                DOUBLE_JUMP_FORCE,
                GRAVITY,
            ),
            follow_distance: CHASER_FOLLOW_DISTANCE,
            intro: ChaserIntro::Intro,
            jumped_for: None,
        }
    }

    /// Back off-screen, replaying the intro
    pub fn reset(&mut self) {
        self.body.reset(CHASER_START_X);
        self.intro = ChaserIntro::Intro;
        self.jumped_for = None;
    }

    /// Steady-pursuit x for a player at `player_x`
    pub fn pursuit_x(&self, player_x: f32) -> f32 {
        player_x - self.follow_distance
    }

    pub fn is_pursuing(&self) -> bool {
        self.intro == ChaserIntro::Pursuing
    }

    /// Horizontal positioning for one frame
    pub fn update_position(&mut self, player_x: f32, scroll_speed: f32) {
        let target = self.pursuit_x(player_x);
        match self.intro {
            ChaserIntro::Intro => {
                self.body.pos.x += scroll_speed;
                if self.body.pos.x >= 0.0 {
                    self.body.pos.x = 0.0;
                    self.intro = ChaserIntro::ClosingDistance;
                }
            }
            ChaserIntro::ClosingDistance => {
                // Clamp so the chaser lands exactly on the target instead of passing it
                self.body.pos.x = (self.body.pos.x + scroll_speed).min(target);
                if self.body.pos.x >= target {
                    self.intro = ChaserIntro::Pursuing;
                    log::debug!("Chaser pursuing at x={}", self.body.pos.x);
                }
            }
            ChaserIntro::Pursuing => {
                self.body.pos.x = target;
            }
        }
    }

    /// First obstacle inside the jump window that hasn't been jumped for yet
    fn obstacle_in_jump_window<'a>(&self, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
        let x = self.body.pos.x;
        obstacles.iter().find(|o| {
            o.pos.x > x + CHASER_JUMP_WINDOW_NEAR
                && o.pos.x < x + CHASER_JUMP_WINDOW_FAR
                && self.jumped_for != Some(o.id)
        })
    }

    /// A tall obstacle close ahead that needs the air jump
    fn tall_obstacle_ahead(&self, obstacles: &[Obstacle]) -> bool {
        let x = self.body.pos.x;
        obstacles.iter().any(|o| {
            o.pos.x > x && o.pos.x < x + CHASER_DOUBLE_JUMP_WINDOW && o.size.y > TALL_OBSTACLE_HEIGHT
        })
    }

    /// Jump decisions plus vertical physics for one frame
    pub fn update_jumps(&mut self, obstacles: &[Obstacle]) {
        if self.is_pursuing() && !self.body.jumping {
            if let Some(id) = self.obstacle_in_jump_window(obstacles).map(|o| o.id) {
                self.body.jump();
                self.jumped_for = Some(id);
            }
        }

        if self.body.jumping {
            self.body.integrate();

            let descending = self.body.vel_y > 0.0;
            if self.is_pursuing()
                && descending
                && !self.body.double_jumped
                && self.tall_obstacle_ahead(obstacles)
            {
                self.body.double_jump();
            }

            self.body.land_if_grounded();
        }
    }

    /// Full chaser update for one frame
    pub fn update(&mut self, player_x: f32, obstacles: &[Obstacle], scroll_speed: f32) {
        self.update_position(player_x, scroll_speed);
        self.update_jumps(obstacles);
    }
}
