//! Idle/demo autopilot
//!
//! Plays the game on its own: waits a human-ish reaction time after a target
//! appears, then clicks it, sometimes fumbling into empty space. Traps are
//! left alone unless the autopilot is careless.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::game::Game;
use super::state::TargetKind;
use super::tick::TickInput;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Chance (0-1) a shot lands instead of missing
    pub accuracy: f64,
    /// Minimum target age before it gets clicked
    pub reaction_ms: u64,
    /// Chance (0-1) of clicking a trap that's ready
    pub trap_blindness: f64,
    rng: Pcg32,
}

impl Autopilot {
    pub fn new(seed: u64, accuracy: f64, reaction_ms: u64) -> Self {
        Self {
            accuracy: accuracy.clamp(0.0, 1.0),
            reaction_ms,
            trap_blindness: 0.05,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Decide this frame's clicks. At most one shot per frame.
    pub fn plan(&mut self, game: &Game, now: u64) -> TickInput {
        let mut input = TickInput::default();
        if !game.is_running() {
            return input;
        }

        // Oldest ready target first: it's the closest to expiring
        let ready = game
            .targets()
            .iter()
            .filter(|t| t.age(now) >= self.reaction_ms)
            .find(|t| t.kind != TargetKind::Trap || self.rng.random::<f64>() < self.trap_blindness);

        if let Some(target) = ready {
            if self.rng.random::<f64>() < self.accuracy {
                input.hits.push(target.id);
            } else {
                input.misses = 1;
            }
        }
        input
    }
}
