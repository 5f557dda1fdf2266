//! The session state machine
//!
//! `Game` owns every piece of mutable state: the session scalars, the target
//! set, both timers and the pending event queue. Each public method is one
//! atomic step against that state; there is no other way to mutate it.
//!
//! ```text
//! Menu --start--> Playing --health 0--> GameOver --start--> Playing
//!                   |  ^
//!             pause |  | resume
//!                   v  |
//!              Playing(paused)
//! ```

use super::level::{LevelConfig, LevelTable};
use super::rng::{PcgSource, RandomSource};
use super::state::{GameEvent, GamePhase, Session, Snapshot, Target, TargetView};
use super::timer::{IntervalTimer, RunEpoch, TickToken};
use crate::consts::*;
use crate::highscores::HighScoreStore;

pub struct Game {
    pub(super) levels: LevelTable,
    pub(super) session: Session,
    /// Active targets, sorted by id
    pub(super) targets: Vec<Target>,
    pub(super) rng: Box<dyn RandomSource>,
    store: Box<dyn HighScoreStore>,
    pub(super) spawn_timer: IntervalTimer,
    pub(super) sweep_timer: IntervalTimer,
    epoch: RunEpoch,
    /// Set while paused so target ages can be frozen
    paused_at: Option<u64>,
    /// Time left until the next spawn when the pause began
    spawn_remaining: Option<u64>,
    pub(super) events: Vec<GameEvent>,
    next_id: u32,
}

impl Game {
    /// Create a game in the Menu phase. The high score is read from `store` once, here.
    pub fn new(
        levels: LevelTable,
        rng: Box<dyn RandomSource>,
        store: Box<dyn HighScoreStore>,
    ) -> Self {
        let high_score = store.load();
        log::info!("Loaded high score: {}", high_score);
        Self {
            levels,
            session: Session::new(high_score),
            targets: Vec::new(),
            rng,
            store,
            spawn_timer: IntervalTimer::default(),
            sweep_timer: IntervalTimer::default(),
            epoch: RunEpoch::default(),
            paused_at: None,
            spawn_remaining: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Default level table with a PCG source seeded from `seed`
    pub fn seeded(seed: u64, store: Box<dyn HighScoreStore>) -> Self {
        Self::new(LevelTable::default(), Box::new(PcgSource::new(seed)), store)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Active targets in spawn order
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn level_config(&self) -> &LevelConfig {
        self.levels.get(self.session.level)
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    /// Playing and not paused
    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    /// Token for deferred tick callbacks of the current run
    pub fn tick_token(&self) -> TickToken {
        self.epoch.token()
    }

    /// Allocate a new target ID
    pub(super) fn next_target_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a fresh round from Menu or GameOver (also restarts a round in progress)
    pub fn start(&mut self, now: u64) {
        self.session.reset_round();
        self.session.phase = GamePhase::Playing;
        self.targets.clear();
        self.paused_at = None;
        self.spawn_remaining = None;
        self.epoch.bump();
        self.arm_timers(now);

        log::info!("Round started at level 1 ({})", self.level_config().name);
        self.events.push(GameEvent::Started);
        self.events.push(GameEvent::Hype { text: "START!" });
    }

    /// Open the settings overlay: stop both loops and freeze target ages
    pub fn pause(&mut self, now: u64) {
        if !self.is_running() {
            return;
        }
        self.session.paused = true;
        self.paused_at = Some(now);
        self.spawn_remaining = self
            .spawn_timer
            .next_due()
            .map(|due| due.saturating_sub(now));
        self.stop_timers();
        log::debug!("Paused at {}ms", now);
        self.events.push(GameEvent::Paused);
    }

    /// Close the settings overlay and pick up where we left off
    pub fn resume(&mut self, now: u64) {
        if self.session.phase != GamePhase::Playing || !self.session.paused {
            return;
        }
        let frozen_for = self
            .paused_at
            .take()
            .map(|at| now.saturating_sub(at))
            .unwrap_or(0);
        for target in &mut self.targets {
            target.created_at += frozen_for;
        }
        // Keep the spawn cadence: whatever was left of the interval still applies
        let spawn_due = self.spawn_remaining.take().map(|left| now + left);
        self.session.paused = false;
        self.epoch.bump();
        self.arm_timers(now);
        if let Some(due) = spawn_due {
            self.spawn_timer.arm_at(due);
        }
        log::debug!("Resumed after {}ms", frozen_for);
        self.events.push(GameEvent::Resumed);
    }

    pub fn toggle_pause(&mut self, now: u64) {
        if self.session.paused {
            self.resume(now);
        } else {
            self.pause(now);
        }
    }

    /// Abandon the current round and return to the title screen.
    /// The high score is only ever recorded on game over, not here.
    pub fn quit_to_menu(&mut self) {
        if self.session.phase == GamePhase::Menu {
            return;
        }
        self.stop_timers();
        self.paused_at = None;
        self.spawn_remaining = None;
        self.session.paused = false;
        self.session.phase = GamePhase::Menu;
        self.targets.clear();
        log::info!("Returned to menu");
    }

    /// Run whichever loops are due. Does nothing unless Playing and unpaused.
    pub fn update(&mut self, now: u64) {
        self.sweep_tick_at(now);
        self.spawn_tick_at(now);
    }

    /// Token-checked `update` for deferred callbacks.
    /// Returns false (and does nothing) if the token predates a stop.
    pub fn advance(&mut self, token: TickToken, now: u64) -> bool {
        if !self.epoch.is_current(token) || !self.is_running() {
            return false;
        }
        self.update(now);
        true
    }

    /// Scheduler entry point for hosts that drive the two loops separately
    pub fn spawn_tick(&mut self, token: TickToken, now: u64) -> bool {
        if !self.epoch.is_current(token) || !self.is_running() {
            return false;
        }
        self.spawn_tick_at(now);
        true
    }

    /// Sweeper entry point for hosts that drive the two loops separately
    pub fn sweep_tick(&mut self, token: TickToken, now: u64) -> bool {
        if !self.epoch.is_current(token) || !self.is_running() {
            return false;
        }
        self.sweep_tick_at(now);
        true
    }

    fn spawn_tick_at(&mut self, now: u64) {
        if !self.is_running() {
            return;
        }
        let interval = self.level_config().spawn_interval_ms;
        if self.spawn_timer.fire(now, interval) {
            self.spawn_target(now);
        }
    }

    fn sweep_tick_at(&mut self, now: u64) {
        if !self.is_running() {
            return;
        }
        if self.sweep_timer.fire(now, SWEEP_PERIOD_MS) {
            self.sweep_expired(now);
        }
    }

    /// Everything the presentation layer needs for one frame
    pub fn snapshot(&self, now: u64) -> Snapshot {
        let now = self.paused_at.unwrap_or(now);
        Snapshot {
            session: self.session.clone(),
            level_name: self.level_config().name.clone(),
            targets: self
                .targets
                .iter()
                .map(|t| TargetView {
                    id: t.id,
                    kind: t.kind,
                    x: t.position.x,
                    y: t.position.y,
                    lifetime_ms: t.lifetime_ms,
                    remaining: t.remaining_fraction(now),
                })
                .collect(),
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Level up once if the current threshold has been reached.
    /// Call after every score change.
    pub(super) fn check_level_up(&mut self) {
        if self.session.phase != GamePhase::Playing || self.session.level >= MAX_LEVEL {
            return;
        }
        let Some(threshold) = self.levels.threshold(self.session.level) else {
            return;
        };
        if self.session.score < threshold {
            return;
        }

        self.session.level += 1;
        self.session.heal(LEVEL_UP_HEAL);
        let name = self.level_config().name.clone();
        log::info!(
            "Level up: {} ({}) at score {}",
            self.session.level,
            name,
            self.session.score
        );
        self.events.push(GameEvent::LevelUp {
            level: self.session.level,
            name,
        });
        self.events.push(GameEvent::Hype { text: "LEVEL UP!" });
    }

    /// End the round if health is gone. Guarded on phase so it fires once.
    pub(super) fn check_game_over(&mut self) {
        if self.session.phase != GamePhase::Playing || self.session.health > 0 {
            return;
        }

        self.session.phase = GamePhase::GameOver;
        self.stop_timers();

        let score = self.session.score;
        let new_record = score > self.session.high_score;
        if new_record {
            self.session.high_score = score;
            self.store.save(score);
        }
        log::info!(
            "Game over: score {} (best {}){}",
            score,
            self.session.high_score,
            if new_record { " - new record!" } else { "" }
        );
        self.events.push(GameEvent::GameOver { score, new_record });
        if new_record {
            self.events.push(GameEvent::Hype { text: "NEW RECORD!" });
        }
    }

    fn arm_timers(&mut self, now: u64) {
        // First spawn is immediate; first sweep one period in
        self.spawn_timer.arm_at(now);
        self.sweep_timer.arm_at(now + SWEEP_PERIOD_MS);
    }

    fn stop_timers(&mut self) {
        self.spawn_timer.cancel();
        self.sweep_timer.cancel();
        self.epoch.bump();
    }
}
