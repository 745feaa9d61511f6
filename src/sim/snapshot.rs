//! Read-only view of the simulation for presentation

use glam::Vec2;
use serde::Serialize;

use super::chaser::ChaserIntro;
use super::physics::Body;
use super::state::{BugKind, FloatingText, GamePhase, GameState, ObstacleKind};
use crate::highscores::HighScoreOutcome;

/// Position and pose of a jumping body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyView {
    pub pos: Vec2,
    pub size: Vec2,
    pub airborne: bool,
    pub double_jumped: bool,
}

impl From<&Body> for BodyView {
    fn from(body: &Body) -> Self {
        Self {
            pos: body.pos,
            size: body.size,
            airborne: body.jumping,
            double_jumped: body.double_jumped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BugView {
    pub kind: BugKind,
    /// Centre
    pub pos: Vec2,
    pub size: Vec2,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub crashed: bool,
    pub last_result: Option<HighScoreOutcome>,
    pub time_ticks: u64,
    pub player: BodyView,
    pub chaser: BodyView,
    pub chaser_intro: ChaserIntro,
    pub obstacles: Vec<ObstacleView>,
    /// Visible bug, if any
    pub bug: Option<BugView>,
    pub floating_texts: Vec<FloatingText>,
}

impl GameState {
    /// Capture the current state for rendering. Never mutates the simulation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score.best(),
            crashed: self.crashed,
            last_result: self.last_result,
            time_ticks: self.time_ticks,
            player: BodyView::from(&self.player),
            chaser: BodyView::from(&self.chaser.body),
            chaser_intro: self.chaser.intro,
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    pos: o.pos,
                    size: o.size,
                })
                .collect(),
            bug: self.bug.is_visible().then(|| BugView {
                kind: self.bug.kind,
                pos: self.bug.pos,
                size: self.bug.kind.size(),
            }),
            floating_texts: self.bug.float_text.iter().cloned().collect(),
        }
    }
}
