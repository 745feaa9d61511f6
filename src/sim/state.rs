//! Game state and core simulation types
//!
//! Everything the simulation owns lives in one `GameState` aggregate that is
//! passed by `&mut` into each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chaser::Chaser;
use super::physics::Body;
use super::spawner::{BugSpawner, ObstacleSpawner};
use super::timer::IntervalTrigger;
use crate::consts::*;
use crate::highscores::{HighScore, HighScoreOutcome};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Splash screen, waiting for advance
    Start,
    /// Instructions screen, waiting for advance
    Info,
    /// Simulation running
    Playing,
    /// Run ended, waiting for advance to restart
    GameOver,
}

/// Obstacle types (garden decorations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Leaves,
    Gnome,
    BirdBath,
    Statue,
    Post,
    TallPost,
}

impl ObstacleKind {
    /// Uniform spawn pool
    pub const ALL: [ObstacleKind; 6] = [
        ObstacleKind::Leaves,
        ObstacleKind::Gnome,
        ObstacleKind::BirdBath,
        ObstacleKind::Statue,
        ObstacleKind::Post,
        ObstacleKind::TallPost,
    ];

    /// First obstacle of every run
    pub const STARTER: ObstacleKind = ObstacleKind::Leaves;

    pub fn height(&self) -> f32 {
        match self {
            ObstacleKind::Leaves => PLAYER_SIZE * 0.9,
            ObstacleKind::Gnome => 50.0 * SCALE,
            ObstacleKind::BirdBath => PLAYER_SIZE * 1.8,
            // Needs a double jump
            ObstacleKind::Statue => PLAYER_SIZE * 1.5 * 1.8,
            ObstacleKind::Post => 70.0 * SCALE,
            ObstacleKind::TallPost => 90.0 * SCALE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Leaves => "leaves",
            ObstacleKind::Gnome => "gnome",
            ObstacleKind::BirdBath => "birdbath",
            ObstacleKind::Statue => "statue",
            ObstacleKind::Post => "post",
            ObstacleKind::TallPost => "tall-post",
        }
    }
}

/// An obstacle sitting on the ground and scrolling left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    /// New obstacle at the right screen edge with its base on the ground line
    pub fn at_right_edge(id: u32, kind: ObstacleKind) -> Self {
        let height = kind.height();
        Self {
            id,
            kind,
            pos: Vec2::new(CANVAS_WIDTH, GROUND_Y - height),
            size: Vec2::new(OBSTACLE_WIDTH, height),
        }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Trailing edge has passed the left screen edge
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Bug (collectible) types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BugKind {
    Normal,
    Fast,
    Slow,
    /// Crawls along the grass at world speed
    Worm,
}

impl BugKind {
    pub const ALL: [BugKind; 4] = [BugKind::Normal, BugKind::Fast, BugKind::Slow, BugKind::Worm];

    /// Horizontal speed in pixels per frame
    pub fn speed(&self) -> f32 {
        match self {
            BugKind::Normal => 4.5 * SCALE,
            BugKind::Fast => 4.0 * SCALE,
            BugKind::Slow => SCROLL_SPEED - 0.5 * SCALE,
            BugKind::Worm => SCROLL_SPEED,
        }
    }

    pub fn is_ground_crawler(&self) -> bool {
        matches!(self, BugKind::Worm)
    }

    /// Collision/visual size: diameter box for flyers, sprite box for the worm
    pub fn size(&self) -> Vec2 {
        match self {
            BugKind::Worm => Vec2::new(WORM_WIDTH, WORM_HEIGHT),
            _ => Vec2::splat(FLYER_RADIUS * 2.0),
        }
    }

    /// Distance from the centre to the leading/trailing edge
    pub fn half_extent(&self) -> f32 {
        self.size().x / 2.0
    }
}

/// Transient "+10" style text that rises and fades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub alpha: f32,
    /// Vertical speed per frame (negative rises)
    pub vel_y: f32,
}

impl FloatingText {
    pub fn new(pos: Vec2, text: impl Into<String>) -> Self {
        Self {
            pos,
            text: text.into(),
            alpha: 1.0,
            vel_y: -FLOAT_TEXT_RISE,
        }
    }

    /// Advance one frame; returns false once fully faded
    pub fn update(&mut self) -> bool {
        self.pos.y += self.vel_y;
        self.alpha -= FLOAT_TEXT_FADE;
        self.alpha > 0.0
    }
}

/// The single bonus bug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub active: bool,
    pub eaten: bool,
    pub kind: BugKind,
    /// Centre
    pub pos: Vec2,
    pub speed: f32,
    /// Bonus text from the last time a bug was eaten
    pub float_text: Option<FloatingText>,
}

impl Default for Bug {
    fn default() -> Self {
        Self {
            active: false,
            eaten: false,
            kind: BugKind::Normal,
            pos: Vec2::ZERO,
            speed: BugKind::Normal.speed(),
            float_text: None,
        }
    }
}

impl Bug {
    /// Activate as `kind` just beyond the right edge at height `y`
    pub fn spawn(&mut self, kind: BugKind, y: f32) {
        self.active = true;
        self.eaten = false;
        self.kind = kind;
        self.pos = Vec2::new(CANVAS_WIDTH + kind.half_extent(), y);
        self.speed = kind.speed();
    }

    /// Live and not yet eaten
    pub fn is_visible(&self) -> bool {
        self.active && !self.eaten
    }

    /// Within pecking range of `point`
    pub fn within_reach(&self, point: Vec2) -> bool {
        self.is_visible() && self.pos.distance(point) < BUG_EAT_RADIUS
    }

    /// Move one frame; deactivates once fully past the left edge
    pub fn advance(&mut self) {
        if !self.active {
            return;
        }
        self.pos.x -= self.speed;
        if self.pos.x + self.kind.half_extent() < 0.0 {
            self.active = false;
        }
    }

    /// Advance the attached floating text, dropping it once faded
    pub fn update_float_text(&mut self) {
        if let Some(text) = self.float_text.as_mut() {
            if !text.update() {
                self.float_text = None;
            }
        }
    }
}

/// Events emitted during a tick for the shell (audio, logging, animation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Phase changed
    Phase { from: GamePhase, to: GamePhase },
    /// Background music should start (first user gesture)
    MusicRequested,
    /// Player left the ground
    Jumped,
    /// Player used the air jump
    DoubleJumped,
    /// Player pecked (advance while playing)
    Pecked,
    /// Player ate the bug
    BugEaten { points: u64 },
    /// Player hit an obstacle (terminal state reached)
    Crashed,
    /// Run ended and the session high score was updated
    GameOver(HighScoreOutcome),
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Score of the current (or last) run
    pub score: u64,
    /// Session high score (memory only)
    pub high_score: HighScore,
    /// Result of the most recent GameOver entry
    pub last_result: Option<HighScoreOutcome>,
    /// Terminal flag set by the collision resolver
    pub crashed: bool,
    /// Simulation tick counter (Playing only)
    pub time_ticks: u64,
    pub player: Body,
    pub chaser: Chaser,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub bug: Bug,
    pub score_timer: IntervalTrigger,
    pub obstacle_spawner: ObstacleSpawner,
    pub bug_spawner: BugSpawner,
    /// Events from the last ticks, drained by the shell
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session in the Start phase
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bug_spawner = BugSpawner::new(&mut rng);
        Self {
            seed,
            rng,
            phase: GamePhase::Start,
            score: 0,
            high_score: HighScore::new(),
            last_result: None,
            crashed: false,
            time_ticks: 0,
            player: new_player(),
            chaser: Chaser::new(),
            obstacles: Vec::new(),
            bug: Bug::default(),
            score_timer: IntervalTrigger::new(SCORE_INTERVAL),
            obstacle_spawner: ObstacleSpawner::new(),
            bug_spawner,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Record an event for the shell
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Change phase, emitting a `Phase` event
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            log::debug!("Phase {:?} -> {:?}", from, to);
            self.phase = to;
            self.emit(GameEvent::Phase { from, to });
        }
    }

    /// Reset everything belonging to a run. The session high score survives.
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.crashed = false;
        self.time_ticks = 0;
        self.obstacles.clear();
        self.player.reset(PLAYER_X);
        self.chaser.reset();
        self.bug = Bug::default();
        self.score_timer = IntervalTrigger::new(SCORE_INTERVAL);
        self.obstacle_spawner.reset();
        self.bug_spawner.reset(&mut self.rng);
    }
}

fn new_player() -> Body {
    Body::new(
        PLAYER_X,
        Vec2::splat(PLAYER_SIZE),
        JUMP_FORCE,
        DOUBLE_JUMP_FORCE,
        GRAVITY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_start() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(!state.bug.active);
        assert_eq!(state.player.pos.y, state.player.rest_y());
    }

    #[test]
    fn test_obstacle_base_on_ground() {
        for kind in ObstacleKind::ALL {
            let o = Obstacle::at_right_edge(1, kind);
            assert_eq!(o.bottom(), GROUND_Y);
            assert_eq!(o.pos.x, CANVAS_WIDTH);
        }
    }

    #[test]
    fn test_only_statue_and_tall_post_need_double_jump() {
        let tall: Vec<_> = ObstacleKind::ALL
            .iter()
            .filter(|k| k.height() > TALL_OBSTACLE_HEIGHT)
            .copied()
            .collect();
        assert_eq!(tall, vec![ObstacleKind::Statue, ObstacleKind::TallPost]);
    }

    #[test]
    fn test_floating_text_fades_out() {
        let mut text = FloatingText::new(Vec2::new(10.0, 100.0), "+10");
        let mut frames = 0;
        while text.update() {
            frames += 1;
        }
        assert!((48..=50).contains(&frames));
        assert!(text.pos.y < 100.0);
    }

    #[test]
    fn test_bug_leaves_screen() {
        let mut bug = Bug::default();
        bug.spawn(BugKind::Fast, 250.0);
        assert!(bug.is_visible());
        for _ in 0..1000 {
            bug.advance();
        }
        assert!(!bug.active);
        assert!(bug.pos.x + bug.kind.half_extent() < 0.0);
    }

    #[test]
    fn test_reset_run_keeps_high_score() {
        let mut state = GameState::new(3);
        state.score = 50;
        state.high_score.record(50);
        state.crashed = true;
        state.obstacles.push(Obstacle::at_right_edge(9, ObstacleKind::Gnome));
        state.reset_run();
        assert_eq!(state.score, 0);
        assert!(!state.crashed);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.high_score.best(), 50);
    }
}
