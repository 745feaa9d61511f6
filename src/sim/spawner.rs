//! Obstacle and bug spawners
//!
//! Both are driven by `IntervalTrigger`s over simulated time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{BugKind, GameState, Obstacle, ObstacleKind};
use super::timer::IntervalTrigger;
use crate::consts::*;

/// Timer plus cap for obstacle generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpawner {
    pub timer: IntervalTrigger,
    /// The starter obstacle has been placed this run
    pub started: bool,
    /// Spawns are suppressed at or above this many live obstacles
    pub max_active: usize,
}

impl Default for ObstacleSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleSpawner {
    pub fn new() -> Self {
        Self {
            timer: IntervalTrigger::new(INITIAL_OBSTACLE_DELAY),
            started: false,
            max_active: MAX_OBSTACLES,
        }
    }

    /// Re-arm for a new run (starter obstacle after the initial delay)
    pub fn reset(&mut self) {
        self.timer.rearm(INITIAL_OBSTACLE_DELAY);
        self.started = false;
    }

    /// Advance the timer; returns the kind to spawn this frame, if any.
    /// A suppressed spawn still consumes the timer.
    pub fn update<R: Rng>(&mut self, dt: f32, active: usize, rng: &mut R) -> Option<ObstacleKind> {
        if !self.timer.tick(dt) {
            return None;
        }

        let kind = if self.started {
            ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())]
        } else {
            ObstacleKind::STARTER
        };

        if active >= self.max_active {
            log::debug!("Obstacle spawn suppressed ({} active)", active);
            return None;
        }

        if !self.started {
            self.started = true;
            self.timer.rearm(OBSTACLE_INTERVAL);
        }
        Some(kind)
    }
}

/// Outcome of a bug spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BugSpawn {
    /// Timer not elapsed or bug already active
    Waiting,
    /// Worm lane was blocked; retry later
    Deferred,
    Spawned(BugKind),
}

/// Randomized timer gating the next bug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugSpawner {
    pub timer: IntervalTrigger,
}

impl BugSpawner {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self {
            timer: IntervalTrigger::randomized(rng, BUG_SPAWN_MIN, BUG_SPAWN_MAX),
        }
    }

    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.timer.rearm_random(rng, BUG_SPAWN_MIN, BUG_SPAWN_MAX);
    }
}

/// Does any obstacle occupy the worm's arrival lane at ground level?
pub fn worm_lane_blocked(obstacles: &[Obstacle]) -> bool {
    let lane_start = CANVAS_WIDTH;
    let lane_end = CANVAS_WIDTH + WORM_LANE_LENGTH;
    obstacles.iter().any(|o| {
        o.bottom() > GROUND_Y - 2.0 * SCALE && o.pos.x < lane_end && o.right() > lane_start
    })
}

/// Spawn, move and retire obstacles for one frame
pub fn update_obstacles(state: &mut GameState, dt: f32) {
    let active = state.obstacles.len();
    let spawn = state.obstacle_spawner.update(dt, active, &mut state.rng);

    if let Some(kind) = spawn {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::at_right_edge(id, kind));
        log::trace!("Spawned obstacle {} ({})", id, kind.as_str());
    }

    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= SCROLL_SPEED;
    }
    state.obstacles.retain(|o| !o.is_off_screen());
}

/// Height for a new bug of `kind`
fn bug_spawn_y<R: Rng>(kind: BugKind, rng: &mut R) -> f32 {
    if kind.is_ground_crawler() {
        // On the grass, roughly level with the chicken's middle
        GROUND_Y - PLAYER_SIZE / 2.0 + 10.0 * SCALE
    } else {
        // Anywhere the chicken can reach with a double jump
        let min_y = GROUND_Y - PLAYER_SIZE * 2.2 * SCALE;
        let max_y = GROUND_Y - FLYER_RADIUS;
        rng.random_range(min_y..max_y)
    }
}

/// Attempt a bug spawn, then move the bug and its floating text one frame
pub fn update_bug(state: &mut GameState, dt: f32) -> BugSpawn {
    state.bug_spawner.timer.accumulate(dt);

    let mut outcome = BugSpawn::Waiting;
    if !state.bug.active && state.bug_spawner.timer.is_past() {
        let kind = BugKind::ALL[state.rng.random_range(0..BugKind::ALL.len())];
        let timer = &mut state.bug_spawner.timer;

        if kind.is_ground_crawler() && worm_lane_blocked(&state.obstacles) {
            timer.rearm_random(&mut state.rng, BUG_RETRY_MIN, BUG_RETRY_MAX);
            log::debug!("Worm spawn deferred ({:.2}s)", timer.interval);
            outcome = BugSpawn::Deferred;
        } else {
            let y = bug_spawn_y(kind, &mut state.rng);
            state.bug.spawn(kind, y);
            timer.rearm_random(&mut state.rng, BUG_SPAWN_MIN, BUG_SPAWN_MAX);
            outcome = BugSpawn::Spawned(kind);
        }
    }

    state.bug.advance();
    state.bug.update_float_text();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_first_obstacle_is_starter_after_initial_delay() {
        let mut spawner = ObstacleSpawner::new();
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(spawner.update(0.4, 0, &mut rng), None);
        assert_eq!(spawner.update(0.1, 0, &mut rng), Some(ObstacleKind::STARTER));
        assert!(spawner.started);
        assert_eq!(spawner.timer.interval, OBSTACLE_INTERVAL);
    }

    #[test]
    fn test_subsequent_obstacles_on_interval() {
        let mut spawner = ObstacleSpawner::new();
        let mut rng = Pcg32::seed_from_u64(2);
        spawner.update(INITIAL_OBSTACLE_DELAY, 0, &mut rng);
        assert_eq!(spawner.update(1.0, 1, &mut rng), None);
        assert!(spawner.update(0.5, 1, &mut rng).is_some());
    }

    #[test]
    fn test_suppressed_spawn_still_resets_timer() {
        let mut spawner = ObstacleSpawner::new();
        let mut rng = Pcg32::seed_from_u64(3);
        spawner.update(INITIAL_OBSTACLE_DELAY, 0, &mut rng);
        assert_eq!(spawner.update(OBSTACLE_INTERVAL, MAX_OBSTACLES, &mut rng), None);
        assert_eq!(spawner.timer.elapsed, 0.0);
        // Next spawn needs a full interval again
        assert_eq!(spawner.update(OBSTACLE_INTERVAL * 0.5, 0, &mut rng), None);
    }

    #[test]
    fn test_obstacles_retired_only_past_left_edge() {
        let mut state = playing_state(4);
        let id = state.next_entity_id();
        let mut o = Obstacle::at_right_edge(id, ObstacleKind::Gnome);
        // One frame away from the right edge crossing x = 0
        o.pos.x = -OBSTACLE_WIDTH + SCROLL_SPEED;
        state.obstacles.push(o);

        update_obstacles(&mut state, 0.0);
        assert_eq!(state.obstacles.len(), 1, "right edge exactly at 0 stays");
        update_obstacles(&mut state, 0.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_cap_scenario_twenty_seconds() {
        let mut state = playing_state(5);
        let ticks = (20.0 / SIM_DT) as usize;
        let mut spawned_ids = std::collections::HashSet::new();
        for _ in 0..ticks {
            update_obstacles(&mut state, SIM_DT);
            assert!(state.obstacles.len() <= MAX_OBSTACLES);
            for o in &state.obstacles {
                spawned_ids.insert(o.id);
                assert!(o.right() >= 0.0);
            }
        }
        // Roughly one obstacle per interval over 20 seconds
        assert!(spawned_ids.len() >= 12);
    }

    #[test]
    fn test_cap_enforced_with_small_cap() {
        let mut state = playing_state(6);
        state.obstacle_spawner.max_active = 2;
        for _ in 0..(20.0 / SIM_DT) as usize {
            update_obstacles(&mut state, SIM_DT);
            assert!(state.obstacles.len() <= 2);
        }
    }

    #[test]
    fn test_worm_lane_detection() {
        let mut o = Obstacle::at_right_edge(1, ObstacleKind::Gnome);
        assert!(worm_lane_blocked(std::slice::from_ref(&o)));
        o.pos.x = CANVAS_WIDTH - OBSTACLE_WIDTH - 1.0;
        assert!(!worm_lane_blocked(std::slice::from_ref(&o)));
        o.pos.x = CANVAS_WIDTH + WORM_LANE_LENGTH + 1.0;
        assert!(!worm_lane_blocked(std::slice::from_ref(&o)));
    }

    #[test]
    fn test_bug_spawn_waits_for_timer() {
        let mut state = playing_state(7);
        state.bug_spawner.timer.rearm(5.0);
        assert_eq!(update_bug(&mut state, 4.0), BugSpawn::Waiting);
        assert!(!state.bug.active);
        // Exactly at the threshold is not enough
        assert_eq!(update_bug(&mut state, 1.0), BugSpawn::Waiting);
        assert!(matches!(update_bug(&mut state, 0.01), BugSpawn::Spawned(_) | BugSpawn::Deferred));
    }

    #[test]
    fn test_bug_placement_rules() {
        for seed in 0..64 {
            let mut state = playing_state(seed);
            state.bug_spawner.timer.accumulate(100.0);
            if let BugSpawn::Spawned(kind) = update_bug(&mut state, 0.0) {
                let bug = &state.bug;
                assert!(bug.active);
                assert_eq!(bug.speed, kind.speed());
                if kind.is_ground_crawler() {
                    assert_eq!(bug.pos.y, GROUND_Y - PLAYER_SIZE / 2.0 + 10.0 * SCALE);
                    assert_eq!(bug.speed, SCROLL_SPEED);
                } else {
                    assert!(bug.pos.y >= GROUND_Y - PLAYER_SIZE * 2.2 * SCALE);
                    assert!(bug.pos.y < GROUND_Y - FLYER_RADIUS);
                }
                // Placed just beyond the right edge, then moved once
                assert_eq!(bug.pos.x, CANVAS_WIDTH + kind.half_extent() - bug.speed);
                assert!((BUG_SPAWN_MIN..BUG_SPAWN_MAX).contains(&state.bug_spawner.timer.interval));
            }
        }
    }

    #[test]
    fn test_only_one_bug_at_a_time() {
        let mut state = playing_state(8);
        state.bug.spawn(BugKind::Slow, 250.0);
        state.bug_spawner.timer.accumulate(100.0);
        assert_eq!(update_bug(&mut state, 0.0), BugSpawn::Waiting);
        assert_eq!(state.bug.kind, BugKind::Slow);
    }

    proptest! {
        #[test]
        fn prop_worm_never_spawns_into_obstacle(seed in any::<u64>(), xs in proptest::collection::vec(CANVAS_WIDTH - 60.0..CANVAS_WIDTH + 200.0f32, 0..4)) {
            let mut state = playing_state(seed);
            for x in xs {
                let id = state.next_entity_id();
                let mut o = Obstacle::at_right_edge(id, ObstacleKind::Post);
                o.pos.x = x;
                state.obstacles.push(o);
            }
            let blocked = worm_lane_blocked(&state.obstacles);
            for _ in 0..16 {
                state.bug = Default::default();
                state.bug_spawner.timer.accumulate(100.0);
                let outcome = update_bug(&mut state, 0.0);
                if blocked {
                    prop_assert_ne!(outcome, BugSpawn::Spawned(BugKind::Worm));
                }
                if outcome == BugSpawn::Deferred {
                    prop_assert!(blocked);
                    prop_assert!((BUG_RETRY_MIN..BUG_RETRY_MAX).contains(&state.bug_spawner.timer.interval));
                }
            }
        }
    }
}
