//! Input resolver
//!
//! Turns a click into a hit, a trap or a miss and applies the outcome to the
//! session in one step. A click on a target that's already gone (expired in
//! the same frame, or double-clicked) resolves to nothing.

use glam::Vec2;

use super::game::Game;
use super::state::{GameEvent, TargetKind};
use crate::consts::*;

const HYPE_QUOTES: [&str; 5] = ["FASTER!", "UNREAL!", "GODLIKE!", "DONT BLINK!", "KEEP GOING!"];

/// Result of clicking a live target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Standard/Gold hit; combo is the multiplier after the hit
    Scored {
        kind: TargetKind,
        points: u64,
        combo: u32,
    },
    /// Clicked a trap
    Trap { damage: u32 },
}

impl Game {
    /// Resolve a click on target `id`. Returns `None` if the game isn't
    /// running or the target no longer exists.
    pub fn hit_target(&mut self, id: u32, now: u64) -> Option<HitOutcome> {
        if !self.is_running() {
            return None;
        }
        let idx = self.targets.binary_search_by_key(&id, |t| t.id).ok()?;
        let target = self.targets.remove(idx);

        let outcome = match target.kind {
            TargetKind::Trap => {
                self.session.damage(TRAP_PENALTY);
                self.session.break_combo();
                self.session.stats.traps_hit += 1;
                log::debug!("Trap #{} hit at {}ms", id, now);
                self.events.push(GameEvent::TrapHit {
                    id,
                    damage: TRAP_PENALTY,
                });
                self.events.push(GameEvent::Hype {
                    text: "SYSTEM ERROR!",
                });
                HitOutcome::Trap {
                    damage: TRAP_PENALTY,
                }
            }
            kind => {
                let combo_before = self.session.combo;
                let points = self.session.award(kind.base_points());
                self.session.bump_combo();
                self.session.heal(HIT_HEAL);

                let stats = &mut self.session.stats;
                stats.hits += 1;
                if kind == TargetKind::Gold {
                    stats.gold_hits += 1;
                }

                let combo = self.session.combo;
                self.events.push(GameEvent::Hit {
                    id,
                    kind,
                    points,
                    combo,
                });
                if combo_before > HYPE_COMBO_THRESHOLD && self.rng.next_f64() > HYPE_ROLL {
                    let text = HYPE_QUOTES[self.rng.index(HYPE_QUOTES.len())];
                    self.events.push(GameEvent::Hype { text });
                }
                HitOutcome::Scored {
                    kind,
                    points,
                    combo,
                }
            }
        };

        self.check_level_up();
        self.check_game_over();
        Some(outcome)
    }

    /// Resolve a click that landed on empty space.
    /// Returns false if the game isn't running.
    pub fn miss(&mut self, now: u64) -> bool {
        if !self.is_running() {
            return false;
        }
        self.session.damage(MISS_PENALTY);
        self.session.break_combo();
        self.session.stats.misses += 1;
        log::debug!("Miss at {}ms", now);
        self.events.push(GameEvent::Miss {
            damage: MISS_PENALTY,
        });
        self.check_game_over();
        true
    }

    /// Topmost target under a pointer at `(px, py)` CSS pixels in a play area
    /// of `width` x `height`. Later spawns draw on top, so they win.
    pub fn target_at(&self, px: f32, py: f32, width: f32, height: f32) -> Option<u32> {
        let pointer = Vec2::new(px, py);
        self.targets
            .iter()
            .rev()
            .find(|t| {
                let center = Vec2::new(t.position.x / 100.0 * width, t.position.y / 100.0 * height);
                center.distance(pointer) <= t.kind.radius_px()
            })
            .map(|t| t.id)
    }

    /// Resolve a raw pointer press: a hit if it lands on a target, otherwise a miss
    pub fn click(&mut self, px: f32, py: f32, width: f32, height: f32, now: u64) -> Option<HitOutcome> {
        match self.target_at(px, py, width, height) {
            Some(id) => self.hit_target(id, now),
            None => {
                self.miss(now);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::level::LevelTable;
    use crate::sim::rng::SequenceSource;
    use crate::sim::state::GamePhase;

    /// Running game with one Standard target (id 1) at the center
    fn game_with_target() -> Game {
        let mut game = Game::new(
            LevelTable::default(),
            Box::new(SequenceSource::new([0.5, 0.5, 0.5])),
            Box::new(MemoryStore::default()),
        );
        game.start(0);
        game.update(0);
        game.drain_events();
        game
    }

    #[test]
    fn test_standard_hit_scores_and_heals() {
        let mut game = game_with_target();
        game.session.health = 50;

        let outcome = game.hit_target(1, 10);
        assert_eq!(
            outcome,
            Some(HitOutcome::Scored {
                kind: TargetKind::Standard,
                points: 100,
                combo: 2
            })
        );
        assert_eq!(game.session().score, 100);
        assert_eq!(game.session().health, 52);
        assert!(game.targets().is_empty());
    }

    #[test]
    fn test_hit_on_missing_target_is_noop() {
        let mut game = game_with_target();
        assert!(game.hit_target(1, 10).is_some());
        let before = game.session().clone();
        assert_eq!(game.hit_target(1, 11), None);
        assert_eq!(game.hit_target(999, 12), None);
        assert_eq!(game.session(), &before);
    }

    #[test]
    fn test_miss_penalizes_and_resets_combo() {
        let mut game = game_with_target();
        game.session.combo = 6;
        assert!(game.miss(10));
        assert_eq!(game.session().health, MAX_HEALTH - MISS_PENALTY);
        assert_eq!(game.session().combo, 1);
        assert_eq!(game.session().stats.misses, 1);
        // Targets untouched
        assert_eq!(game.targets().len(), 1);
    }

    #[test]
    fn test_input_ignored_outside_play() {
        let mut game = game_with_target();
        game.pause(10);
        assert!(!game.miss(11));
        assert_eq!(game.hit_target(1, 11), None);
        assert_eq!(game.targets().len(), 1);

        game.quit_to_menu();
        assert_eq!(game.phase(), GamePhase::Menu);
        assert!(!game.miss(12));
    }

    #[test]
    fn test_hype_quote_needs_high_combo_and_lucky_roll() {
        let mut game = game_with_target();
        game.session.combo = 5;
        // Rolls continue cycling 0.5, which is below the hype roll
        game.hit_target(1, 10);
        assert!(!game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Hype { .. })));
    }

    #[test]
    fn test_target_at_maps_percent_to_pixels() {
        let game = game_with_target();
        // Target sits at (50%, 50%) -> (400, 300) on an 800x600 area
        assert_eq!(game.target_at(400.0, 300.0, 800.0, 600.0), Some(1));
        assert_eq!(game.target_at(435.0, 300.0, 800.0, 600.0), Some(1));
        assert_eq!(game.target_at(460.0, 300.0, 800.0, 600.0), None);
    }

    #[test]
    fn test_click_on_empty_space_is_a_miss() {
        let mut game = game_with_target();
        assert_eq!(game.click(5.0, 5.0, 800.0, 600.0, 10), None);
        assert_eq!(game.session().stats.misses, 1);
        assert!(game.click(400.0, 300.0, 800.0, 600.0, 11).is_some());
        assert_eq!(game.session().stats.hits, 1);
    }
}
