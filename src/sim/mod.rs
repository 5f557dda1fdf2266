//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives as explicit millisecond timestamps
//! - Randomness only through a `RandomSource`
//! - Stable iteration order (targets sorted by ID)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod game;
pub mod input;
pub mod level;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod sweep;
pub mod tick;
pub mod timer;

pub use autoplay::Autopilot;
pub use game::Game;
pub use input::HitOutcome;
pub use level::{LevelConfig, LevelTable, LevelTableError};
pub use rng::{PcgSource, RandomSource, SequenceSource};
pub use spawn::{base_lifetime_ms, lifetime_ms, roll_kind};
pub use state::{
    GameEvent, GamePhase, RoundStats, Session, Snapshot, Target, TargetKind, TargetView,
};
pub use sweep::SweepReport;
pub use tick::{TickInput, step};
pub use timer::{IntervalTimer, RunEpoch, TickToken};
