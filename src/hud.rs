//! HUD and overlay text
//!
//! Pure formatting of what the DOM overlay shows. The shell copies the
//! resulting `HudView` into elements; nothing here touches the page.

use crate::consts::SCORE_FLASH_INTERVAL;
use crate::sim::{GamePhase, IntervalTrigger, Snapshot};

/// Default HUD text colour
pub const TEXT_COLOR: &str = "#000";
/// Flash/new-high-score colour
pub const HIGHLIGHT_COLOR: &str = "#f4941b";
/// Game-over text colour
pub const END_TEXT_COLOR: &str = "#fef1df";

/// Full-screen overlay for the current phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Start,
    Info,
    GameOver {
        your_score: String,
        high_score: String,
        new_high: bool,
    },
}

impl Overlay {
    /// DOM id of the overlay element, if any
    pub fn element_id(&self) -> Option<&'static str> {
        match self {
            Overlay::None => None,
            Overlay::Start => Some("start-screen"),
            Overlay::Info => Some("info-screen"),
            Overlay::GameOver { .. } => Some("game-over-screen"),
        }
    }
}

/// Everything the HUD shows this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score: String,
    /// Only once a high score exists
    pub high_score: Option<String>,
    pub score_color: &'static str,
    pub overlay: Overlay,
}

/// Stateful HUD: owns the score flash timer
#[derive(Debug, Clone)]
pub struct Hud {
    flash: IntervalTrigger,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            flash: IntervalTrigger::new(SCORE_FLASH_INTERVAL),
        }
    }

    /// The running score beats an existing high score
    fn is_beating_high(snap: &Snapshot) -> bool {
        snap.high_score > 0 && snap.score > snap.high_score
    }

    /// Advance the flash timer by `dt` seconds and build the view
    pub fn update(&mut self, snap: &Snapshot, dt: f32) -> HudView {
        let mut score_color = TEXT_COLOR;
        if snap.phase == GamePhase::Playing && Self::is_beating_high(snap) {
            self.flash.accumulate(dt);
            if self.flash.is_past() {
                self.flash.reset();
            }
            // Second half of each interval is highlighted
            if self.flash.progress() >= 0.5 {
                score_color = HIGHLIGHT_COLOR;
            }
        }

        HudView {
            score: format!("Score: {}", snap.score),
            high_score: (snap.high_score > 0).then(|| format!("High Score: {}", snap.high_score)),
            score_color,
            overlay: overlay_for(snap),
        }
    }
}

fn overlay_for(snap: &Snapshot) -> Overlay {
    match snap.phase {
        GamePhase::Start => Overlay::Start,
        GamePhase::Info => Overlay::Info,
        GamePhase::Playing => Overlay::None,
        GamePhase::GameOver => {
            let (score, high, new_high) = match snap.last_result {
                Some(r) => (r.score, r.high_score, r.new_high),
                None => (snap.score, snap.high_score, false),
            };
            let high_score = if new_high {
                format!("NEW HIGH SCORE: {}", score)
            } else {
                format!("HIGH SCORE: {}", high)
            };
            Overlay::GameOver {
                your_score: format!("YOUR SCORE: {}", score),
                high_score,
                new_high,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScoreOutcome;
    use crate::sim::GameState;

    fn playing_snapshot(score: u64, high: u64) -> Snapshot {
        let mut state = GameState::new(1);
        state.phase = GamePhase::Playing;
        state.high_score.record(high);
        state.score = score;
        state.snapshot()
    }

    #[test]
    fn test_score_lines() {
        let mut hud = Hud::new();
        let view = hud.update(&playing_snapshot(12, 0), 0.016);
        assert_eq!(view.score, "Score: 12");
        assert_eq!(view.high_score, None);

        let view = hud.update(&playing_snapshot(12, 40), 0.016);
        assert_eq!(view.high_score.as_deref(), Some("High Score: 40"));
        assert_eq!(view.overlay, Overlay::None);
    }

    #[test]
    fn test_flash_only_when_beating_high() {
        let mut hud = Hud::new();
        let below = playing_snapshot(10, 40);
        for _ in 0..120 {
            assert_eq!(hud.update(&below, 0.016).score_color, TEXT_COLOR);
        }

        let above = playing_snapshot(50, 40);
        let colors: Vec<_> = (0..120).map(|_| hud.update(&above, 0.016).score_color).collect();
        assert!(colors.contains(&TEXT_COLOR));
        assert!(colors.contains(&HIGHLIGHT_COLOR));
    }

    #[test]
    fn test_game_over_new_high_text() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::GameOver;
        state.score = 37;
        state.last_result = Some(HighScoreOutcome {
            score: 37,
            high_score: 37,
            new_high: true,
        });
        let view = Hud::new().update(&state.snapshot(), 0.0);
        assert_eq!(
            view.overlay,
            Overlay::GameOver {
                your_score: "YOUR SCORE: 37".into(),
                high_score: "NEW HIGH SCORE: 37".into(),
                new_high: true,
            }
        );
    }

    #[test]
    fn test_game_over_regular_high_text() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::GameOver;
        state.last_result = Some(HighScoreOutcome {
            score: 8,
            high_score: 30,
            new_high: false,
        });
        let view = Hud::new().update(&state.snapshot(), 0.0);
        match &view.overlay {
            Overlay::GameOver { high_score, .. } => assert_eq!(high_score, "HIGH SCORE: 30"),
            other => panic!("unexpected overlay {:?}", other),
        }
        assert_eq!(view.overlay.element_id(), Some("game-over-screen"));
    }
}
