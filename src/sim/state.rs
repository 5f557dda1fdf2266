//! Session state and core simulation types
//!
//! Everything the presentation layer reads lives here: the session scalars,
//! the targets, the events emitted on transitions and the snapshot handed out
//! each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing running
    Menu,
    /// Active round
    Playing,
    /// Round ended (health hit zero)
    GameOver,
}

/// Target types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    Standard,
    /// Worth triple, expires sooner
    Gold,
    /// Must not be clicked; expiring is harmless
    Trap,
}

impl TargetKind {
    /// Points before the combo multiplier (traps score nothing)
    pub fn base_points(&self) -> u64 {
        match self {
            TargetKind::Standard => STANDARD_POINTS,
            TargetKind::Gold => GOLD_POINTS,
            TargetKind::Trap => 0,
        }
    }

    /// Whether letting this target expire costs health
    pub fn penalized_on_expiry(&self) -> bool {
        !matches!(self, TargetKind::Trap)
    }

    /// On-screen radius in CSS pixels (used for pointer hit-testing)
    pub fn radius_px(&self) -> f32 {
        match self {
            TargetKind::Standard => 40.0,
            TargetKind::Gold => 32.0,
            TargetKind::Trap => 48.0,
        }
    }
}

/// A clickable target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub kind: TargetKind,
    /// Center in percent of the play area
    pub position: Vec2,
    /// Spawn timestamp (ms)
    pub created_at: u64,
    pub lifetime_ms: u64,
}

impl Target {
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.age(now) >= self.lifetime_ms
    }

    /// Fraction of lifetime left, 1.0 at spawn down to 0.0 at expiry
    pub fn remaining_fraction(&self, now: u64) -> f32 {
        if self.lifetime_ms == 0 {
            return 0.0;
        }
        let left = self.lifetime_ms.saturating_sub(self.age(now));
        left as f32 / self.lifetime_ms as f32
    }
}

/// Per-round counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    pub targets_spawned: u32,
    pub hits: u32,
    pub gold_hits: u32,
    pub misses: u32,
    pub traps_hit: u32,
    /// Standard/Gold targets that ran out (traps are never counted here)
    pub targets_expired: u32,
    /// Traps left alone until they vanished
    pub traps_avoided: u32,
    pub best_combo: u32,
}

impl RoundStats {
    /// Hits over all shots taken (hits + misses + traps), 0.0 before the first shot
    pub fn accuracy(&self) -> f32 {
        let shots = self.hits + self.misses + self.traps_hit;
        if shots == 0 {
            0.0
        } else {
            self.hits as f32 / shots as f32
        }
    }
}

/// Mutable scalars for one play-through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    pub score: u64,
    /// Best score ever recorded (persisted)
    pub high_score: u64,
    pub health: u32,
    pub combo: u32,
    pub level: u8,
    /// Settings overlay is open; timers are stopped
    pub paused: bool,
    pub stats: RoundStats,
}

impl Session {
    pub fn new(high_score: u64) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            high_score,
            health: MAX_HEALTH,
            combo: 1,
            level: 1,
            paused: false,
            stats: RoundStats {
                best_combo: 1,
                ..Default::default()
            },
        }
    }

    /// Back to round-start values. The high score survives.
    pub fn reset_round(&mut self) {
        *self = Self::new(self.high_score);
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused
    }

    pub fn damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = (self.health + amount).min(MAX_HEALTH);
    }

    pub fn break_combo(&mut self) {
        self.combo = 1;
    }

    pub fn bump_combo(&mut self) {
        self.combo = (self.combo + 1).min(MAX_COMBO);
        self.stats.best_combo = self.stats.best_combo.max(self.combo);
    }

    /// Award `base` points at the current multiplier, returns points gained
    pub fn award(&mut self, base: u64) -> u64 {
        let points = base * self.combo as u64;
        self.score = self.score.saturating_add(points);
        points
    }
}

/// Transient notifications for audio/visual feedback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Spawned { id: u32, kind: TargetKind, position: Vec2 },
    Hit { id: u32, kind: TargetKind, points: u64, combo: u32 },
    TrapHit { id: u32, damage: u32 },
    Miss { damage: u32 },
    /// One sweep's worth of expirations
    Expired { count: u32, traps_avoided: u32, damage: u32 },
    LevelUp { level: u8, name: String },
    GameOver { score: u64, new_record: bool },
    /// Big overlay text ("LEVEL UP!", "GODLIKE!", ...)
    Hype { text: &'static str },
}

/// A target as seen by the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetView {
    pub id: u32,
    pub kind: TargetKind,
    pub x: f32,
    pub y: f32,
    pub lifetime_ms: u64,
    /// 1.0 fresh, 0.0 about to expire
    pub remaining: f32,
}

/// Read-only view of the whole game for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub session: Session,
    pub level_name: String,
    pub targets: Vec<TargetView>,
}
