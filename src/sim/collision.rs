//! Collision detection between the player and obstacles
//!
//! Plain axis-aligned boxes. The player's box is pulled in on every side by
//! `COLLISION_BUFFER` so near-misses don't end the run.

use glam::Vec2;

use super::physics::Body;
use super::state::{GameEvent, GameState, Obstacle};
use crate::consts::*;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Pull every edge inward by `amount`
    pub fn shrunk(&self, amount: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(amount),
            max: self.max - Vec2::splat(amount),
        }
    }

    /// Strict overlap: touching edges don't count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Forgiving hitbox for the player
pub fn player_hitbox(player: &Body) -> Aabb {
    Aabb::from_pos_size(player.pos, player.size).shrunk(COLLISION_BUFFER)
}

/// Check if the player touches an obstacle
pub fn player_hits_obstacle(player: &Body, obstacle: &Obstacle) -> bool {
    let obstacle_box = Aabb::from_pos_size(obstacle.pos, obstacle.size);
    player_hitbox(player).overlaps(&obstacle_box)
}

/// Test the player against every live obstacle.
///
/// Sets the terminal flag on the first hit and emits `Crashed` once; returns
/// true only on that first hit. Overlaps while already crashed are ignored.
pub fn resolve(state: &mut GameState) -> bool {
    if state.crashed {
        return false;
    }

    let hit = state
        .obstacles
        .iter()
        .find(|o| player_hits_obstacle(&state.player, o))
        .map(|o| (o.id, o.kind));

    match hit {
        Some((id, kind)) => {
            log::info!("Crashed into {} #{} at score {}", kind.as_str(), id, state.score);
            state.crashed = true;
            state.emit(GameEvent::Crashed);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, ObstacleKind};

    fn state_with_obstacle_at(x: f32) -> GameState {
        let mut state = GameState::new(11);
        state.phase = GamePhase::Playing;
        let id = state.next_entity_id();
        let mut o = Obstacle::at_right_edge(id, ObstacleKind::Gnome);
        o.pos.x = x;
        state.obstacles.push(o);
        state
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::from_pos_size(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Aabb::from_pos_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Aabb::from_pos_size(Vec2::new(9.0, 9.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
    }

    #[test]
    fn test_buffer_forgives_near_miss() {
        // Obstacle's left edge inside the player's visual box but within the buffer
        let x = PLAYER_X + PLAYER_SIZE - COLLISION_BUFFER * 0.5;
        let state = state_with_obstacle_at(x);
        assert!(!player_hits_obstacle(&state.player, &state.obstacles[0]));

        let x = PLAYER_X + PLAYER_SIZE - COLLISION_BUFFER * 2.0;
        let state = state_with_obstacle_at(x);
        assert!(player_hits_obstacle(&state.player, &state.obstacles[0]));
    }

    #[test]
    fn test_airborne_player_clears_obstacle() {
        let mut state = state_with_obstacle_at(PLAYER_X);
        state.player.pos.y = state.obstacles[0].pos.y - PLAYER_SIZE;
        assert!(!resolve(&mut state));
        assert!(!state.crashed);
    }

    #[test]
    fn test_crash_is_idempotent() {
        let mut state = state_with_obstacle_at(PLAYER_X);
        assert!(resolve(&mut state));
        assert!(state.crashed);
        assert!(!resolve(&mut state));
        assert!(!resolve(&mut state));
        let crashes = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::Crashed)
            .count();
        assert_eq!(crashes, 1);
        assert!(state.crashed);
    }
}
