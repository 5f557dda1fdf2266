//! Expiry sweeper
//!
//! Every `SWEEP_PERIOD_MS` the target set is split into survivors and expired
//! targets. Expired Standard/Gold targets cost health; expired traps are free
//! (the player was right to leave them). All penalties from one sweep land as
//! a single health update followed by a single combo reset.

use super::game::Game;
use super::state::{GameEvent, Target};
use crate::consts::EXPIRY_PENALTY;

/// What one sweep removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Standard/Gold targets that timed out
    pub expired: u32,
    /// Traps that timed out
    pub traps_avoided: u32,
}

impl SweepReport {
    pub fn damage(&self) -> u32 {
        self.expired * EXPIRY_PENALTY
    }

    pub fn is_empty(&self) -> bool {
        self.expired == 0 && self.traps_avoided == 0
    }
}

/// Remove expired targets in place, keeping survivor order
pub fn remove_expired(targets: &mut Vec<Target>, now: u64) -> SweepReport {
    let mut report = SweepReport::default();
    targets.retain(|t| {
        if !t.is_expired(now) {
            return true;
        }
        if t.kind.penalized_on_expiry() {
            report.expired += 1;
        } else {
            report.traps_avoided += 1;
        }
        false
    });
    report
}

impl Game {
    /// Run one sweep at `now`
    pub(super) fn sweep_expired(&mut self, now: u64) -> SweepReport {
        let report = remove_expired(&mut self.targets, now);
        if report.is_empty() {
            return report;
        }

        let stats = &mut self.session.stats;
        stats.targets_expired += report.expired;
        stats.traps_avoided += report.traps_avoided;

        let damage = report.damage();
        if damage > 0 {
            self.session.damage(damage);
            self.session.break_combo();
        }
        log::debug!(
            "Sweep at {}ms: {} expired, {} traps avoided, -{} health",
            now,
            report.expired,
            report.traps_avoided,
            damage
        );

        self.events.push(GameEvent::Expired {
            count: report.expired,
            traps_avoided: report.traps_avoided,
            damage,
        });
        self.check_game_over();
        report
    }
}
