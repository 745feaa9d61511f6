//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod chaser;
pub mod collision;
pub mod physics;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use chaser::{Chaser, ChaserIntro};
pub use collision::{Aabb, player_hits_obstacle};
pub use physics::{AscendOutcome, Body};
pub use snapshot::{BodyView, BugView, ObstacleView, Snapshot};
pub use spawner::{BugSpawn, BugSpawner, ObstacleSpawner};
pub use state::{
    Bug, BugKind, FloatingText, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind,
};
pub use tick::{Effect, InputKind, TickInput, tick, transition};
pub use timer::IntervalTrigger;
