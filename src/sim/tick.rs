//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision;
use super::physics::AscendOutcome;
use super::spawner::{update_bug, update_obstacles};
use super::state::{FloatingText, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Space/Enter/click/tap: menus advance, peck while playing
    pub advance: bool,
    /// ArrowUp/W/upper-half touch: jump, then double jump
    pub ascend: bool,
    /// Demo mode - a simple autopilot generates the inputs
    pub autopilot: bool,
}

/// Discrete input fed to the phase dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Advance,
    Ascend,
}

/// Side effect of a dispatch table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// First user gesture: background music may start
    RequestMusic,
    /// Full run reset before (re)entering Playing
    ResetRun,
    /// Eat attempt on the bug
    Peck,
    /// Jump or double jump
    Ascend,
}

/// Phase dispatch table: `(phase, input) -> (next phase, effect)`
pub fn transition(phase: GamePhase, input: InputKind) -> (GamePhase, Effect) {
    use GamePhase::*;
    use InputKind::*;

    match (phase, input) {
        (Start, Advance) => (Info, Effect::RequestMusic),
        (Info, Advance) => (Playing, Effect::ResetRun),
        (Playing, Advance) => (Playing, Effect::Peck),
        (Playing, Ascend) => (Playing, Effect::Ascend),
        (GameOver, Advance) => (Playing, Effect::ResetRun),
        (Start | Info | GameOver, Ascend) => (phase, Effect::None),
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // A crash detected last tick ends the run; nothing else happens this tick
    if state.phase == GamePhase::Playing && state.crashed {
        enter_game_over(state);
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    if input.advance {
        dispatch(state, InputKind::Advance);
    }
    if input.ascend {
        dispatch(state, InputKind::Ascend);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    if state.score_timer.tick(dt) {
        state.score += 1;
    }

    state.player.step();
    let player_x = state.player.pos.x;
    state.chaser.update(player_x, &state.obstacles, SCROLL_SPEED);

    update_obstacles(state, dt);
    collision::resolve(state);
    update_bug(state, dt);
}

/// Look up and apply one dispatch table entry
fn dispatch(state: &mut GameState, input: InputKind) {
    let (next, effect) = transition(state.phase, input);

    match effect {
        Effect::None => {}
        Effect::RequestMusic => state.emit(GameEvent::MusicRequested),
        Effect::ResetRun => {
            state.reset_run();
            log::info!("Run started");
        }
        Effect::Peck => peck(state),
        Effect::Ascend => match state.player.ascend() {
            AscendOutcome::Jumped => state.emit(GameEvent::Jumped),
            AscendOutcome::DoubleJumped => state.emit(GameEvent::DoubleJumped),
            AscendOutcome::Ignored => {}
        },
    }

    state.set_phase(next);
}

/// Try to eat the bug
fn peck(state: &mut GameState) {
    state.emit(GameEvent::Pecked);

    if !state.bug.within_reach(state.player.pos) {
        return;
    }

    state.bug.eaten = true;
    state.bug.active = false;
    state.bug.float_text = Some(FloatingText::new(
        state.bug.pos,
        format!("+{}", BUG_POINTS),
    ));
    state.score += BUG_POINTS;
    log::debug!("Ate {:?} bug, score {}", state.bug.kind, state.score);
    state.emit(GameEvent::BugEaten { points: BUG_POINTS });
}

/// Playing -> GameOver. The high score is recorded here exactly once per run.
fn enter_game_over(state: &mut GameState) {
    let outcome = state.high_score.record(state.score);
    state.last_result = Some(outcome);
    state.set_phase(GamePhase::GameOver);

    if outcome.new_high {
        log::info!("Game over: score {} (new high score)", outcome.score);
    } else {
        log::info!(
            "Game over: score {} (high score {})",
            outcome.score,
            outcome.high_score
        );
    }
    state.emit(GameEvent::GameOver(outcome));
}

/// Demo-mode input generation: skip menus, jump obstacles, peck nearby bugs
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Start | GamePhase::Info | GamePhase::GameOver => {
            input.advance = true;
        }
        GamePhase::Playing => {
            let player = &state.player;
            let ahead = |near: f32, far: f32| {
                state.obstacles.iter().find(|o| {
                    o.right() > player.pos.x + near && o.pos.x < player.right() + far
                })
            };

            if player.is_grounded() {
                input.ascend = ahead(0.0, 40.0 * SCALE).is_some();
            } else if player.vel_y > 0.0 && !player.double_jumped {
                // Falling onto something taller than we are high
                input.ascend = ahead(0.0, 10.0 * SCALE)
                    .map(|o| player.bottom() > o.pos.y)
                    .unwrap_or(false);
            }

            input.advance = state.bug.within_reach(player.pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BugKind, Obstacle, ObstacleKind};

    fn advance() -> TickInput {
        TickInput {
            advance: true,
            ..Default::default()
        }
    }

    fn ascend() -> TickInput {
        TickInput {
            ascend: true,
            ..Default::default()
        }
    }

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(&mut state, &advance(), SIM_DT);
        tick(&mut state, &advance(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        state.events.clear();
        state
    }

    fn place_obstacle(state: &mut GameState, x: f32) {
        let id = state.next_entity_id();
        let mut o = Obstacle::at_right_edge(id, ObstacleKind::Gnome);
        o.pos.x = x;
        state.obstacles.push(o);
    }

    #[test]
    fn test_dispatch_table() {
        use GamePhase::*;
        assert_eq!(
            transition(Start, InputKind::Advance),
            (Info, Effect::RequestMusic)
        );
        assert_eq!(
            transition(Info, InputKind::Advance),
            (Playing, Effect::ResetRun)
        );
        assert_eq!(
            transition(GameOver, InputKind::Advance),
            (Playing, Effect::ResetRun)
        );
        assert_eq!(
            transition(Playing, InputKind::Ascend),
            (Playing, Effect::Ascend)
        );
        for phase in [Start, Info, GameOver] {
            assert_eq!(transition(phase, InputKind::Ascend), (phase, Effect::None));
        }
    }

    #[test]
    fn test_tick_menus_to_playing() {
        let mut state = GameState::new(12345);

        // No input - stays on the splash
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Start);

        tick(&mut state, &advance(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Info);
        assert!(state.events.contains(&GameEvent::MusicRequested));

        // Ascend does nothing on the info screen
        tick(&mut state, &ascend(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Info);
        assert_eq!(state.player.pos.y, state.player.rest_y());

        tick(&mut state, &advance(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_world_frozen_outside_playing() {
        let mut state = GameState::new(1);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.obstacles.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.chaser.body.pos.x, CHASER_START_X);
    }

    #[test]
    fn test_ascend_three_presses() {
        let mut state = playing_state(2);

        tick(&mut state, &ascend(), SIM_DT);
        assert!(state.player.jumping);
        assert_eq!(state.player.vel_y, -JUMP_FORCE + GRAVITY);
        assert!(state.events.contains(&GameEvent::Jumped));

        tick(&mut state, &ascend(), SIM_DT);
        assert!(state.player.double_jumped);
        assert_eq!(state.player.vel_y, -DOUBLE_JUMP_FORCE + GRAVITY);
        assert!(state.events.contains(&GameEvent::DoubleJumped));

        // Third press is ignored; only gravity acts
        let before = state.player.vel_y;
        state.events.clear();
        tick(&mut state, &ascend(), SIM_DT);
        assert_eq!(state.player.vel_y, before + GRAVITY);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_score_ticks_every_interval() {
        let mut state = playing_state(3);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        // 0.1 s per point, some substeps land just under the threshold
        assert!((8..=10).contains(&state.score), "score {}", state.score);
    }

    #[test]
    fn test_crash_then_game_over_records_high_score() {
        let mut state = playing_state(4);
        state.score = 37;
        place_obstacle(&mut state, PLAYER_X + 10.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.crashed);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::Crashed));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        let result = state.last_result.expect("game over result");
        assert_eq!(result.score, 37);
        assert_eq!(result.high_score, 37);
        assert!(result.new_high);
        assert_eq!(state.high_score.best(), 37);

        // Further ticks in GameOver don't record again
        state.events.clear();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_terminal_tick_ignores_inputs() {
        let mut state = playing_state(5);
        place_obstacle(&mut state, PLAYER_X);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.crashed);

        // Advance on the terminal tick must not restart the run
        tick(&mut state, &advance(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.crashed);
        assert!(!state.events.contains(&GameEvent::Pecked));
    }

    #[test]
    fn test_restart_resets_run_but_keeps_high_score() {
        let mut state = playing_state(6);
        state.score = 12;
        place_obstacle(&mut state, PLAYER_X);
        tick(&mut state, &TickInput::default(), SIM_DT);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        // Ascend in GameOver is a no-op
        tick(&mut state, &ascend(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &advance(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.crashed);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(!state.bug.active);
        assert!(!state.obstacle_spawner.started);
        assert_eq!(state.high_score.best(), 12);
        assert!(state.chaser.body.pos.x < 0.0, "chaser replays its intro");
    }

    #[test]
    fn test_second_run_lower_score_is_not_new_high() {
        let mut state = playing_state(7);
        state.score = 50;
        place_obstacle(&mut state, PLAYER_X);
        tick(&mut state, &TickInput::default(), SIM_DT);
        tick(&mut state, &TickInput::default(), SIM_DT);
        tick(&mut state, &advance(), SIM_DT);

        state.score = 20;
        place_obstacle(&mut state, PLAYER_X);
        tick(&mut state, &TickInput::default(), SIM_DT);
        tick(&mut state, &TickInput::default(), SIM_DT);
        let result = state.last_result.expect("game over result");
        assert!(!result.new_high);
        assert_eq!(result.high_score, 50);
    }

    #[test]
    fn test_peck_eats_bug_in_reach() {
        let mut state = playing_state(8);
        state.bug.spawn(BugKind::Slow, 0.0);
        state.bug.pos = state.player.pos + glam::Vec2::new(10.0, 10.0);
        let score = state.score;

        tick(&mut state, &advance(), SIM_DT);
        assert!(state.bug.eaten);
        assert!(!state.bug.active);
        assert!(state.score >= score + BUG_POINTS);
        assert!(state.events.contains(&GameEvent::BugEaten { points: BUG_POINTS }));
        let text = state.bug.float_text.as_ref().expect("bonus text");
        assert_eq!(text.text, "+10");
    }

    #[test]
    fn test_touching_bug_without_peck_is_not_eaten() {
        let mut state = playing_state(8);
        state.bug.spawn(BugKind::Slow, 0.0);

        for _ in 0..30 {
            // Keep the bug sitting on the chicken
            state.bug.pos = state.player.pos;
            tick(&mut state, &TickInput::default(), SIM_DT);
        }

        assert!(state.bug.active);
        assert!(!state.bug.eaten);
        assert!(state.bug.float_text.is_none());
        // Only score ticks over half a second, no bonus
        assert!(state.score < BUG_POINTS);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::BugEaten { .. }))
        );
    }

    #[test]
    fn test_peck_misses_distant_bug() {
        let mut state = playing_state(9);
        state.bug.spawn(BugKind::Normal, 0.0);
        state.bug.pos = state.player.pos + glam::Vec2::new(BUG_EAT_RADIUS * 2.0, 0.0);

        tick(&mut state, &advance(), SIM_DT);
        assert!(state.bug.is_visible());
        assert!(state.events.contains(&GameEvent::Pecked));
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::BugEaten { .. })));
    }

    #[test]
    fn test_deterministic() {
        let mut a = GameState::new(42);
        let mut b = GameState::new(42);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(oa.kind, ob.kind);
            assert_eq!(oa.pos, ob.pos);
        }
        assert_eq!(a.bug.pos, b.bug.pos);
    }

    #[test]
    fn test_autopilot_leaves_menus_and_scores() {
        let mut state = GameState::new(10);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.time_ticks > 0);
        assert!(state.score > 0 || state.high_score.is_set());
    }
}
