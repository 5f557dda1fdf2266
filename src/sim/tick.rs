//! Frame step
//!
//! Drivers that buffer input between frames (the native autoplay loop, tests)
//! hand it over as a `TickInput` and call `step` once per frame.

use super::game::Game;
use super::state::GamePhase;

/// Input gathered since the last frame, applied in field order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start (or restart) a round
    pub start: bool,
    /// Open/close the settings overlay
    pub toggle_pause: bool,
    /// Target ids clicked, in click order
    pub hits: Vec<u32>,
    /// Clicks that landed on empty space
    pub misses: u32,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        !self.start && !self.toggle_pause && self.hits.is_empty() && self.misses == 0
    }
}

/// Apply one frame's input, then run whichever loops are due
pub fn step(game: &mut Game, input: &TickInput, now: u64) {
    if input.start && game.phase() != GamePhase::Playing {
        game.start(now);
    }
    if input.toggle_pause {
        game.toggle_pause(now);
    }
    for &id in &input.hits {
        game.hit_target(id, now);
    }
    for _ in 0..input.misses {
        game.miss(now);
    }
    game.update(now);
}
