//! Vertical jump physics
//!
//! Per-frame integration for bodies that stand on the ground and jump:
//! `vel_y += gravity`, then `y += vel_y`. Nothing moves horizontally here;
//! the world scrolls past the player instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ground_rest_y;

/// Result of an ascend request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AscendOutcome {
    /// Body left the ground
    Jumped,
    /// Second impulse while airborne
    DoubleJumped,
    /// Already used both jumps this airborne period
    Ignored,
}

/// A ground-standing body that can jump and double jump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (pixels per frame, negative is up)
    pub vel_y: f32,
    pub jumping: bool,
    pub double_jumped: bool,
    pub jump_force: f32,
    pub double_jump_force: f32,
    pub gravity: f32,
}

impl Body {
    /// Create a grounded body at horizontal position `x`
    pub fn new(x: f32, size: Vec2, jump_force: f32, double_jump_force: f32, gravity: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground_rest_y(size.y)),
            size,
            vel_y: 0.0,
            jumping: false,
            double_jumped: false,
            jump_force,
            double_jump_force,
            gravity,
        }
    }

    /// Resting y (top edge) when standing on the ground
    pub fn rest_y(&self) -> f32 {
        ground_rest_y(self.size.y)
    }

    pub fn is_grounded(&self) -> bool {
        !self.jumping
    }

    /// Start a jump if grounded
    pub fn jump(&mut self) -> bool {
        if self.jumping {
            return false;
        }
        self.jumping = true;
        self.vel_y = -self.jump_force;
        true
    }

    /// Second impulse if airborne and not yet used
    pub fn double_jump(&mut self) -> bool {
        if !self.jumping || self.double_jumped {
            return false;
        }
        self.double_jumped = true;
        self.vel_y = -self.double_jump_force;
        true
    }

    /// Player-style ascend: jump when grounded, double jump when airborne
    pub fn ascend(&mut self) -> AscendOutcome {
        if self.jump() {
            AscendOutcome::Jumped
        } else if self.double_jump() {
            AscendOutcome::DoubleJumped
        } else {
            AscendOutcome::Ignored
        }
    }

    /// Apply gravity and move one frame
    pub fn integrate(&mut self) {
        self.vel_y += self.gravity;
        self.pos.y += self.vel_y;
    }

    /// Clamp to the ground and clear jump state once the rest height is reached
    pub fn land_if_grounded(&mut self) -> bool {
        let rest = self.rest_y();
        if self.pos.y >= rest {
            self.pos.y = rest;
            self.jumping = false;
            self.double_jumped = false;
            self.vel_y = 0.0;
            true
        } else {
            false
        }
    }

    /// Full physics step for one frame
    pub fn step(&mut self) {
        if self.jumping {
            self.integrate();
            self.land_if_grounded();
        }
    }

    /// Put the body back on the ground at `x`, at rest
    pub fn reset(&mut self, x: f32) {
        self.pos = Vec2::new(x, self.rest_y());
        self.vel_y = 0.0;
        self.jumping = false;
        self.double_jumped = false;
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    fn player() -> Body {
        Body::new(
            PLAYER_X,
            Vec2::splat(PLAYER_SIZE),
            JUMP_FORCE,
            DOUBLE_JUMP_FORCE,
            GRAVITY,
        )
    }

    #[test]
    fn test_ascend_sequence() {
        let mut p = player();
        assert_eq!(p.ascend(), AscendOutcome::Jumped);
        assert_eq!(p.vel_y, -JUMP_FORCE);
        assert_eq!(p.ascend(), AscendOutcome::DoubleJumped);
        assert_eq!(p.vel_y, -DOUBLE_JUMP_FORCE);
        assert_eq!(p.ascend(), AscendOutcome::Ignored);
        assert_eq!(p.vel_y, -DOUBLE_JUMP_FORCE);
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let mut p = player();
        let rest = p.rest_y();
        p.jump();
        let mut frames = 0;
        while p.jumping {
            p.step();
            frames += 1;
            assert!(frames < 200, "never landed");
        }
        assert_eq!(p.pos.y, rest);
        assert_eq!(p.vel_y, 0.0);
        assert!(!p.double_jumped);
        // Apex is above the ground, so the jump took a while
        assert!(frames > 10);
    }

    #[test]
    fn test_double_jump_resets_after_landing() {
        let mut p = player();
        p.ascend();
        p.ascend();
        while p.jumping {
            p.step();
        }
        // A fresh airborne period allows both jumps again
        assert_eq!(p.ascend(), AscendOutcome::Jumped);
        assert_eq!(p.ascend(), AscendOutcome::DoubleJumped);
    }

    #[test]
    fn test_grounded_step_is_noop() {
        let mut p = player();
        let before = p.pos;
        p.step();
        assert_eq!(p.pos, before);
    }

    proptest! {
        #[test]
        fn prop_grounded_body_rests_on_ground(presses in proptest::collection::vec(any::<bool>(), 0..400)) {
            let mut p = player();
            for press in presses {
                if press {
                    p.ascend();
                }
                p.step();
                if !p.jumping {
                    prop_assert_eq!(p.pos.y, p.rest_y());
                }
                prop_assert!(p.pos.y <= p.rest_y());
            }
        }
    }
}
