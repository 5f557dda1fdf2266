//! Spawn scheduler
//!
//! Each time the spawn timer fires, one target is created. Its kind comes from
//! a single roll against the level's trap/gold odds, its lifetime from the
//! level, and its position from two independent rolls inside the spawn box.

use glam::Vec2;

use super::game::Game;
use super::level::LevelConfig;
use super::rng::RandomSource;
use super::state::{GameEvent, Target, TargetKind};
use crate::consts::*;

/// Lifetime of a Standard target at `level`, never below `MIN_LIFETIME_MS`
pub fn base_lifetime_ms(level: u8) -> u64 {
    BASE_LIFETIME_MS
        .saturating_sub(level as u64 * LIFETIME_LEVEL_DECREMENT_MS)
        .max(MIN_LIFETIME_MS)
}

/// Lifetime for a target of `kind` at `level`
pub fn lifetime_ms(kind: TargetKind, level: u8) -> u64 {
    let base = base_lifetime_ms(level);
    let lifetime = match kind {
        TargetKind::Standard => base,
        TargetKind::Trap => base + TRAP_LIFETIME_BONUS_MS,
        TargetKind::Gold => base.saturating_sub(GOLD_LIFETIME_PENALTY_MS),
    };
    lifetime.max(MIN_LIFETIME_MS)
}

/// Map a roll in [0, 1) to a target kind.
///
/// Traps occupy the bottom of the range and gold the top, so with
/// `trap=0.1, gold=0.15`: `[0, 0.1)` is a trap, `(0.85, 1)` is gold.
pub fn roll_kind(roll: f64, config: &LevelConfig) -> TargetKind {
    if roll < config.trap_probability {
        TargetKind::Trap
    } else if roll > 1.0 - config.gold_probability {
        TargetKind::Gold
    } else {
        TargetKind::Standard
    }
}

/// Random point inside the spawn box (percent coordinates)
pub fn roll_position(rng: &mut dyn RandomSource) -> Vec2 {
    let x = rng.range_f32(SPAWN_X_MIN, SPAWN_X_MAX);
    let y = rng.range_f32(SPAWN_Y_MIN, SPAWN_Y_MAX);
    Vec2::new(x, y)
}

impl Game {
    /// Create one target at `now` using the current level's odds
    pub(super) fn spawn_target(&mut self, now: u64) {
        let level = self.session.level;
        let roll = self.rng.next_f64();
        let kind = roll_kind(roll, self.levels.get(level));
        let position = roll_position(self.rng.as_mut());
        let lifetime_ms = lifetime_ms(kind, level);

        let id = self.next_target_id();
        log::debug!(
            "Spawned {:?} #{} at ({:.1}, {:.1}) for {}ms",
            kind,
            id,
            position.x,
            position.y,
            lifetime_ms
        );

        // Ids are monotonic, so pushing keeps the set sorted
        self.targets.push(Target {
            id,
            kind,
            position,
            created_at: now,
            lifetime_ms,
        });
        self.session.stats.targets_spawned += 1;
        self.events.push(GameEvent::Spawned { id, kind, position });
    }
}
