//! Cyber Aim - a browser reflex/aim trainer
//!
//! Core modules:
//! - `sim`: Deterministic session simulation (state machine, spawning, expiry, input)
//! - `highscores`: Single persisted best score
//! - `settings`: Player preferences (volume, crosshair theme)
//! - `audio`: Web Audio cues (wasm32 only)

pub mod highscores;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use highscores::{HighScoreStore, MemoryStore};
pub use settings::{CrosshairColor, Settings};

/// Game configuration constants
pub mod consts {
    /// Health ceiling (and starting health)
    pub const MAX_HEALTH: u32 = 100;
    /// Combo multiplier ceiling
    pub const MAX_COMBO: u32 = 10;
    /// Highest level in the level table
    pub const MAX_LEVEL: u8 = 5;

    /// Health lost on a click that lands on nothing
    pub const MISS_PENALTY: u32 = 5;
    /// Health lost on clicking a trap
    pub const TRAP_PENALTY: u32 = 30;
    /// Health lost per Standard/Gold target that expires
    pub const EXPIRY_PENALTY: u32 = 10;
    /// Health regained per successful hit
    pub const HIT_HEAL: u32 = 2;
    /// Health regained on level up
    pub const LEVEL_UP_HEAL: u32 = 20;

    /// Base points before the combo multiplier
    pub const STANDARD_POINTS: u64 = 100;
    pub const GOLD_POINTS: u64 = 300;

    /// Target lifetime at level 0; each level shaves off `LIFETIME_LEVEL_DECREMENT_MS`
    pub const BASE_LIFETIME_MS: u64 = 3000;
    pub const LIFETIME_LEVEL_DECREMENT_MS: u64 = 200;
    /// Traps linger longer, gold vanishes faster
    pub const TRAP_LIFETIME_BONUS_MS: u64 = 1000;
    pub const GOLD_LIFETIME_PENALTY_MS: u64 = 500;
    /// No target ever lives shorter than this
    pub const MIN_LIFETIME_MS: u64 = 200;

    /// Expiry sweep period
    pub const SWEEP_PERIOD_MS: u64 = 100;

    /// Spawn box in percent of the play area (keeps targets off the edges)
    pub const SPAWN_X_MIN: f32 = 10.0;
    pub const SPAWN_X_MAX: f32 = 90.0;
    pub const SPAWN_Y_MIN: f32 = 15.0;
    pub const SPAWN_Y_MAX: f32 = 85.0;

    /// Combo above which a hit may trigger a hype quote
    pub const HYPE_COMBO_THRESHOLD: u32 = 4;
    /// Roll that must be exceeded for the quote to show
    pub const HYPE_ROLL: f64 = 0.7;
    /// How long hype text and hit particles stay on screen
    pub const FLASH_DURATION_MS: u64 = 800;
}
