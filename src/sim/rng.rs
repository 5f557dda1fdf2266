//! Random sources for spawn rolls
//!
//! The simulation never touches a global RNG. Everything random (target kind,
//! position, hype quotes) is drawn through a `RandomSource`, so a seed fully
//! determines a run and tests can script exact rolls.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A stream of uniform rolls in [0, 1)
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform value in [lo, hi)
    fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f64() as f32 * (hi - lo)
    }

    /// Uniform index in [0, len)
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// Seeded PCG32 generator used in real play
#[derive(Debug, Clone)]
pub struct PcgSource {
    seed: u64,
    rng: Pcg32,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for PcgSource {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of rolls, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceSource {
    rolls: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Rolls are clamped into [0, 1) so scripted values can't escape the contract
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        let rolls: Vec<f64> = rolls
            .into_iter()
            .map(|r| r.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { rolls, cursor: 0 }
    }

    /// A source that always yields the same roll
    pub fn constant(roll: f64) -> Self {
        Self::new([roll])
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll
    }
}
