// Scenario tests for the session loop, driven with scripted rolls and explicit
// timestamps so every spawn, expiry and transition is predictable.

use cyber_aim::consts::*;
use cyber_aim::sim::{
    Game, GameEvent, GamePhase, HitOutcome, LevelConfig, LevelTable, SequenceSource, TargetKind,
};
use cyber_aim::{HighScoreStore, MemoryStore};

/// Rolls for one Standard spawn at the center (kind, x, y)
const STANDARD: [f64; 3] = [0.5, 0.5, 0.5];
/// Rolls for one Gold spawn at the center
const GOLD: [f64; 3] = [0.95, 0.5, 0.5];

fn scripted(spawns: &[[f64; 3]], store: MemoryStore) -> Game {
    let rolls: Vec<f64> = spawns.iter().flatten().copied().collect();
    Game::new(
        LevelTable::default(),
        Box::new(SequenceSource::new(rolls)),
        Box::new(store),
    )
}

/// Default table except level 1 spawns nothing but traps
fn trap_levels() -> LevelTable {
    let mut levels: Vec<LevelConfig> = LevelTable::default().iter().cloned().collect();
    levels[0].trap_probability = 1.0;
    levels[0].gold_probability = 0.0;
    LevelTable::new(levels).unwrap()
}

fn miss_times(game: &mut Game, times: u32, now: u64) {
    for _ in 0..times {
        game.miss(now);
    }
}

#[test]
fn standard_hit_at_level_one() {
    let mut game = scripted(&[STANDARD], MemoryStore::default());
    game.start(0);
    game.update(0);
    let id = game.targets()[0].id;

    let outcome = game.hit_target(id, 50);
    assert_eq!(
        outcome,
        Some(HitOutcome::Scored {
            kind: TargetKind::Standard,
            points: 100,
            combo: 2
        })
    );
    let session = game.session();
    assert_eq!(session.score, 100);
    assert_eq!(session.combo, 2);
    // +2 is capped at full health
    assert_eq!(session.health, MAX_HEALTH);
}

#[test]
fn gold_hit_at_combo_three() {
    let mut game = scripted(&[STANDARD, STANDARD, GOLD], MemoryStore::default());
    game.start(0);

    game.update(0);
    game.hit_target(game.targets()[0].id, 10);
    game.update(1_200);
    game.hit_target(game.targets()[0].id, 1_210);
    assert_eq!(game.session().combo, 3);
    assert_eq!(game.session().score, 300);

    game.update(2_400);
    let gold = game.targets()[0].clone();
    assert_eq!(gold.kind, TargetKind::Gold);
    game.hit_target(gold.id, 2_410);

    assert_eq!(game.session().score, 300 + 900);
    assert_eq!(game.session().combo, 4);
    // 1200 crosses the ROOKIE threshold
    assert_eq!(game.session().level, 2);
}

#[test]
fn trap_at_low_health_ends_the_round() {
    let mut game = Game::new(
        trap_levels(),
        Box::new(SequenceSource::new(STANDARD)),
        Box::new(MemoryStore::default()),
    );
    game.start(0);
    game.update(0);
    let trap = game.targets()[0].clone();
    assert_eq!(trap.kind, TargetKind::Trap);
    assert_eq!(trap.lifetime_ms, 2800 + TRAP_LIFETIME_BONUS_MS);

    miss_times(&mut game, 16, 10);
    assert_eq!(game.session().health, 20);

    assert_eq!(
        game.hit_target(trap.id, 20),
        Some(HitOutcome::Trap {
            damage: TRAP_PENALTY
        })
    );
    assert_eq!(game.session().health, 0);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(game.session().combo, 1);
}

#[test]
fn two_expiries_in_one_sweep_apply_once() {
    let mut game = scripted(&[STANDARD], MemoryStore::default());
    game.start(0);
    game.update(0); // #1, expires at 2800
    game.update(1_200); // #2, expires at 4000
    game.update(2_400); // #3
    let newest = game.targets().last().unwrap().id;
    game.hit_target(newest, 2_400);
    assert_eq!(game.session().combo, 2);
    game.drain_events();

    // No frames between 2400 and 4000: one sweep sees both expiries
    game.update(4_000);
    assert_eq!(game.session().health, MAX_HEALTH - 2 * EXPIRY_PENALTY);
    assert_eq!(game.session().combo, 1);

    let expiries: Vec<GameEvent> = game
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::Expired { .. }))
        .collect();
    assert_eq!(
        expiries,
        vec![GameEvent::Expired {
            count: 2,
            traps_avoided: 0,
            damage: 20
        }]
    );
    assert_eq!(game.session().stats.targets_expired, 2);
}

#[test]
fn expired_traps_cost_nothing() {
    let mut game = Game::new(
        trap_levels(),
        Box::new(SequenceSource::new(STANDARD)),
        Box::new(MemoryStore::default()),
    );
    game.start(0);
    game.update(0);
    game.hit_target(999, 1); // nothing there
    game.drain_events();

    // Trap lives 3800ms; poll through its expiry
    let mut now = 0;
    while now <= 3_800 {
        game.update(now);
        now += 100;
    }
    let stats = &game.session().stats;
    assert!(stats.traps_avoided >= 1);
    assert_eq!(stats.targets_expired, 0);
    assert_eq!(game.session().health, MAX_HEALTH);
}

#[test]
fn restart_after_game_over_resets_round() {
    let mut game = scripted(&[STANDARD], MemoryStore::default());
    game.start(0);
    game.update(0);
    game.hit_target(game.targets()[0].id, 10);
    game.update(1_200);
    miss_times(&mut game, 20, 1_300);
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert!(!game.targets().is_empty());

    game.start(5_000);
    let session = game.session();
    assert_eq!(session.phase, GamePhase::Playing);
    assert_eq!(session.score, 0);
    assert_eq!(session.health, MAX_HEALTH);
    assert_eq!(session.combo, 1);
    assert_eq!(session.level, 1);
    assert!(game.targets().is_empty());
    // The record from the first round survives
    assert_eq!(session.high_score, 100);
}

#[test]
fn game_over_fires_exactly_once() {
    let mut game = scripted(&[STANDARD], MemoryStore::default());
    game.start(0);
    miss_times(&mut game, 40, 10);
    game.update(10_000);

    let events = game.drain_events();
    let game_overs = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .count();
    assert_eq!(game_overs, 1);
    assert_eq!(game.session().stats.misses, 20);
    assert_eq!(game.phase(), GamePhase::GameOver);
}

#[test]
fn high_score_needs_a_strictly_better_round() {
    let store = MemoryStore::with_raw("300");
    let mut game = scripted(&[STANDARD], store.clone());
    assert_eq!(game.session().high_score, 300);

    // Tie the record: 100 + 200
    game.start(0);
    game.update(0);
    game.hit_target(game.targets()[0].id, 10);
    game.update(1_200);
    game.hit_target(game.targets()[0].id, 1_210);
    assert_eq!(game.session().score, 300);
    miss_times(&mut game, 20, 1_300);

    assert_eq!(game.phase(), GamePhase::GameOver);
    assert_eq!(game.session().high_score, 300);
    assert_eq!(store.raw().as_deref(), Some("300"));
    assert!(game.drain_events().contains(&GameEvent::GameOver {
        score: 300,
        new_record: false
    }));

    // Beat it by one more hit
    game.start(10_000);
    for i in 0..3 {
        let now = 10_000 + i * 1_200;
        game.update(now);
        game.hit_target(game.targets()[0].id, now + 10);
    }
    assert_eq!(game.session().score, 600);
    // Not recorded until the round actually ends
    assert_eq!(store.load(), 300);

    miss_times(&mut game, 20, 14_000);
    assert_eq!(game.session().high_score, 600);
    assert_eq!(store.load(), 600);
}

#[test]
fn quitting_does_not_record_high_score() {
    let store = MemoryStore::default();
    let mut game = scripted(&[STANDARD], store.clone());
    game.start(0);
    game.update(0);
    game.hit_target(game.targets()[0].id, 10);
    game.quit_to_menu();

    assert_eq!(game.phase(), GamePhase::Menu);
    assert_eq!(game.session().high_score, 0);
    assert_eq!(store.raw(), None);
}

#[test]
fn stale_tick_token_is_a_noop() {
    let mut game = scripted(&[STANDARD], MemoryStore::default());
    game.start(0);
    let token = game.tick_token();
    assert!(game.advance(token, 0));
    assert_eq!(game.targets().len(), 1);

    miss_times(&mut game, 20, 50);
    assert_eq!(game.phase(), GamePhase::GameOver);

    // A frame callback queued before game over fires late
    assert!(!game.advance(token, 1_200));
    assert!(!game.spawn_tick(token, 1_200));
    assert!(!game.sweep_tick(token, 1_200));
    assert_eq!(game.session().stats.targets_spawned, 1);

    // Tokens from before a restart stay dead
    game.start(2_000);
    assert!(!game.advance(token, 2_000));
    assert!(game.advance(game.tick_token(), 2_000));
}

#[test]
fn pause_freezes_spawns_and_expiry() {
    let mut game = scripted(&[STANDARD], MemoryStore::default());
    game.start(0);
    game.update(0);
    let token = game.tick_token();

    game.pause(1_000);
    assert!(!game.advance(token, 5_000));
    assert!(!game.advance(game.tick_token(), 5_000));
    let snapshot = game.snapshot(50_000);
    // Age frozen at 1000 of 2800
    assert!((snapshot.targets[0].remaining - 1_800.0 / 2_800.0).abs() < 1e-4);

    game.resume(60_000);
    // 1800ms of life left, 200ms of spawn interval left
    game.update(60_199);
    assert_eq!(game.session().stats.targets_spawned, 1);
    game.update(60_200);
    assert_eq!(game.session().stats.targets_spawned, 2);
    // Expires at 61800; the first sweep after that is at 61899
    game.update(61_799);
    assert_eq!(game.session().stats.targets_expired, 0);
    game.update(61_899);
    assert_eq!(game.session().stats.targets_expired, 1);
}

#[test]
fn snapshot_exposes_session_and_targets() {
    let mut game = scripted(&[GOLD], MemoryStore::with_raw("7"));
    game.start(0);
    game.update(0);

    let snapshot = game.snapshot(1_150);
    assert_eq!(snapshot.level_name, "ROOKIE");
    assert_eq!(snapshot.session.high_score, 7);
    assert_eq!(snapshot.targets.len(), 1);
    let view = &snapshot.targets[0];
    assert_eq!(view.kind, TargetKind::Gold);
    assert_eq!((view.x, view.y), (50.0, 50.0));
    assert!((view.remaining - 0.5).abs() < 1e-4);

    // Serializable for JS consumers
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"level_name\":\"ROOKIE\""));
}

#[test]
fn custom_level_table_from_json() {
    let json = r#"[
        {"name": "ONE", "spawn_interval_ms": 100, "trap_probability": 0.0, "gold_probability": 1.0, "score_threshold": 100},
        {"name": "TWO", "spawn_interval_ms": 100, "trap_probability": 0.0, "gold_probability": 0.0, "score_threshold": 200},
        {"name": "THREE", "spawn_interval_ms": 100, "trap_probability": 0.0, "gold_probability": 0.0, "score_threshold": 5000},
        {"name": "FOUR", "spawn_interval_ms": 100, "trap_probability": 0.0, "gold_probability": 0.0, "score_threshold": 6000},
        {"name": "FIVE", "spawn_interval_ms": 100, "trap_probability": 0.0, "gold_probability": 0.0}
    ]"#;
    let levels = LevelTable::from_json(json).unwrap();
    let mut game = Game::new(
        levels,
        Box::new(SequenceSource::new(STANDARD)),
        Box::new(MemoryStore::default()),
    );
    game.start(0);
    game.update(0);
    game.update(100);
    assert_eq!(game.targets().len(), 2);
    assert!(game.targets().iter().all(|t| t.kind == TargetKind::Gold));

    // 300 points clears both ONE's and TWO's thresholds, but a single
    // score change only ever advances one level
    game.hit_target(game.targets()[0].id, 110);
    assert_eq!(game.session().score, 300);
    assert_eq!(game.session().level, 2);
    assert_eq!(game.level_config().name, "TWO");

    // The next score change picks up the pending crossing
    game.hit_target(game.targets()[0].id, 120);
    assert_eq!(game.session().level, 3);
}

#[test]
fn level_up_heals_and_announces() {
    let mut game = scripted(&[GOLD], MemoryStore::default());
    game.start(0);
    miss_times(&mut game, 10, 0);
    assert_eq!(game.session().health, 50);

    // 300 (x1) + 600 (x2) + 900 (x3) = 1800 crosses 1000 on the third hit
    for i in 0..3 {
        let now = i * 1_200;
        game.update(now);
        game.hit_target(game.targets()[0].id, now + 10);
    }
    let session = game.session();
    assert_eq!(session.score, 1_800);
    assert_eq!(session.level, 2);
    assert_eq!(session.health, 50 + 3 * HIT_HEAL + LEVEL_UP_HEAL);

    let events = game.drain_events();
    assert!(events.contains(&GameEvent::LevelUp {
        level: 2,
        name: "SOLDIER".to_string()
    }));
    assert!(events.contains(&GameEvent::Hype { text: "LEVEL UP!" }));
}
