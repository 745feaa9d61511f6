//! Sprite animation and background scrolling
//!
//! Frame counters advance on simulated time through `IntervalTrigger`s, so a
//! paused refresh loop freezes animation along with the game.

use crate::consts::{HEDGE_PARALLAX, SCROLL_SPEED};
use crate::sim::{BugKind, GameEvent, GamePhase, IntervalTrigger, Snapshot};

/// Looping or one-shot frame counter
#[derive(Debug, Clone)]
pub struct SpriteAnim {
    pub frame: u32,
    pub frames: u32,
    timer: IntervalTrigger,
    one_shot: bool,
    finished: bool,
}

impl SpriteAnim {
    pub fn looping(frames: u32, frame_secs: f32) -> Self {
        Self {
            frame: 0,
            frames,
            timer: IntervalTrigger::new(frame_secs),
            one_shot: false,
            finished: false,
        }
    }

    pub fn one_shot(frames: u32, frame_secs: f32) -> Self {
        Self {
            finished: true,
            one_shot: true,
            ..Self::looping(frames, frame_secs)
        }
    }

    /// Rewind to frame 0
    pub fn restart(&mut self) {
        self.frame = 0;
        self.timer.reset();
        self.finished = false;
    }

    /// One-shot animation has played through
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn update(&mut self, dt: f32) {
        if self.finished {
            return;
        }
        self.timer.accumulate(dt);
        if !self.timer.is_past() {
            return;
        }
        self.timer.reset();
        self.frame += 1;
        if self.frame >= self.frames {
            self.frame = 0;
            if self.one_shot {
                self.finished = true;
            }
        }
    }
}

/// Which chicken animation is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChickenPose {
    Walk,
    Fly,
    Idle,
    Peck,
}

impl ChickenPose {
    /// Peck beats game-over idle, which beats airborne, which beats walking
    pub fn select(pecking: bool, phase: GamePhase, airborne: bool) -> Self {
        if pecking {
            ChickenPose::Peck
        } else if phase != GamePhase::Playing {
            ChickenPose::Idle
        } else if airborne {
            ChickenPose::Fly
        } else {
            ChickenPose::Walk
        }
    }
}

/// Ground and hedge scroll positions
#[derive(Debug, Clone, Default)]
pub struct Scroll {
    pub ground: f32,
    pub hedge: f32,
}

impl Scroll {
    /// Advance one frame, wrapping each layer at its tile width
    pub fn advance(&mut self, ground_tile: f32, hedge_tile: f32) {
        self.ground = (self.ground - SCROLL_SPEED) % ground_tile;
        self.hedge = (self.hedge - SCROLL_SPEED * HEDGE_PARALLAX) % hedge_tile;
    }
}

/// All presentation-side animation state
#[derive(Debug, Clone)]
pub struct Animator {
    pub chicken_walk: SpriteAnim,
    pub chicken_fly: SpriteAnim,
    pub chicken_idle: SpriteAnim,
    pub chicken_peck: SpriteAnim,
    pub biker_run: SpriteAnim,
    pub worm: SpriteAnim,
    pub dragonfly: SpriteAnim,
    pub scroll: Scroll,
    pub pose: ChickenPose,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    /// Ground texture repeat width
    pub const GROUND_TILE: f32 = 96.0;
    /// Hedge texture repeat width
    pub const HEDGE_TILE: f32 = 160.0;

    pub fn new() -> Self {
        Self {
            chicken_walk: SpriteAnim::looping(4, 0.09),
            chicken_fly: SpriteAnim::looping(5, 0.09),
            chicken_idle: SpriteAnim::looping(5, 0.12),
            chicken_peck: SpriteAnim::one_shot(8, 0.06),
            biker_run: SpriteAnim::looping(6, 0.09),
            worm: SpriteAnim::looping(8, 0.16),
            dragonfly: SpriteAnim::looping(4, 0.08),
            scroll: Scroll::default(),
            pose: ChickenPose::Idle,
        }
    }

    /// React to simulation events from the last substeps
    pub fn handle_event(&mut self, event: &GameEvent) {
        if matches!(event, GameEvent::Pecked) && self.chicken_peck.is_finished() {
            self.chicken_peck.restart();
        }
    }

    /// Advance one fixed step of presentation time
    pub fn step(&mut self, snap: &Snapshot, dt: f32) {
        let playing = snap.phase == GamePhase::Playing;
        if playing {
            self.scroll.advance(Self::GROUND_TILE, Self::HEDGE_TILE);
        }

        let pecking = !self.chicken_peck.is_finished();
        self.pose = ChickenPose::select(pecking, snap.phase, snap.player.airborne);
        match self.pose {
            ChickenPose::Peck => self.chicken_peck.update(dt),
            ChickenPose::Idle => self.chicken_idle.update(dt),
            ChickenPose::Fly => self.chicken_fly.update(dt),
            ChickenPose::Walk => self.chicken_walk.update(dt),
        }

        if playing {
            self.biker_run.update(dt);
        }

        match snap.bug.as_ref().map(|b| b.kind) {
            Some(BugKind::Worm) => self.worm.update(dt),
            Some(_) => self.dragonfly.update(dt),
            None => {}
        }
    }

    /// Current chicken frame and frame count
    pub fn chicken_frame(&self) -> (u32, u32) {
        let anim = match self.pose {
            ChickenPose::Peck => &self.chicken_peck,
            ChickenPose::Idle => &self.chicken_idle,
            ChickenPose::Fly => &self.chicken_fly,
            ChickenPose::Walk => &self.chicken_walk,
        };
        (anim.frame, anim.frames)
    }
}
