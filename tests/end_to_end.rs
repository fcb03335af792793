//! Full sessions driven through the public API

use glam::Vec2;
use pepper_rush::consts::SIM_DT;
use pepper_rush::sim::{GameEvent, GameOverReason, Pepper, Tier};
use pepper_rush::{Command, Game, JsonFileStore, MemoryStore, Store, Tuning};

/// Put a resting pepper on top of the basket
fn drop_on_basket<S: Store>(game: &mut Game<S>, id: u32, tier: Tier, good: bool) {
    let world = game.world_mut().expect("session running");
    let pos = world.basket.pos();
    let now = world.clock.elapsed;
    world.peppers.push(Pepper {
        id,
        tier,
        good,
        pos,
        vel: Vec2::ZERO,
        rotation: 0.0,
        angular_vel: 0.0,
        spawned_at: now,
        ttl: 6.0,
    });
}

#[test]
fn catch_sixteen_then_three_bads() {
    let mut game = Game::new(MemoryStore::new(), Tuning::default(), 42).unwrap();
    game.start_stage(1).unwrap();

    let mut events = Vec::new();
    drop_on_basket(&mut game, 1000, Tier::Extreme, true);
    events.extend(game.update(SIM_DT));
    for i in 0..15 {
        drop_on_basket(&mut game, 1001 + i, Tier::Mild, true);
        events.extend(game.update(SIM_DT));
    }

    let snapshot = game.snapshot().unwrap();
    assert_eq!(snapshot.score, 350);
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.peppers_collected, 16);
    assert_eq!(snapshot.lives, 3);

    for i in 0..3 {
        drop_on_basket(&mut game, 2000 + i, Tier::Medium, false);
        events.extend(game.update(SIM_DT));
    }
    assert!(game.snapshot().unwrap().game_over);

    // Later frames and a second end are no-ops
    events.extend(game.update(SIM_DT));
    assert!(!game.end_session());
    game.post(Command::Tap);
    events.extend(game.update(SIM_DT));

    let game_overs: Vec<&GameEvent> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .collect();
    assert_eq!(
        game_overs,
        vec![&GameEvent::GameOver {
            reason: GameOverReason::OutOfLives
        }]
    );

    let store = game.into_store();
    let history = store.load_score_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score, 350);
    assert_eq!(history[0].level, 1);
    assert_eq!(history[0].peppers_collected, 16);
    assert_eq!(store.load_high_score(), 350);
    assert_eq!(store.load_currency_balance(), 350);

    let achievements = store.load_achievements();
    let unlocked: Vec<&str> = achievements
        .iter()
        .filter(|a| a.unlocked)
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(unlocked, vec!["first_steps", "spice_collector"]);
}

#[test]
fn countdown_ends_an_idle_session() {
    let tuning = Tuning {
        session_seconds: 3,
        ..Tuning::default()
    };
    let mut game = Game::new(MemoryStore::new(), tuning, 5).unwrap();
    game.start_stage(1).unwrap();

    // 4 simulated seconds at 60 FPS
    for _ in 0..240 {
        game.update(1.0 / 60.0);
    }
    let snapshot = game.snapshot().unwrap();
    assert!(snapshot.game_over);
    assert_eq!(snapshot.time_remaining, 0);
    assert!(snapshot.peppers.is_empty());
    assert_eq!(game.last_summary().unwrap().reason, GameOverReason::OutOfTime);
    assert_eq!(game.history().len(), 1);
}

#[test]
fn same_seed_same_session() {
    let run = || {
        let mut game = Game::new(MemoryStore::new(), Tuning::default(), 99).unwrap();
        game.start_stage(1).unwrap();
        for frame in 0..600 {
            if frame % 90 == 0 {
                game.post(Command::Tap);
            }
            game.update(1.0 / 60.0);
        }
        game.snapshot().unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn records_survive_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    let mut game = Game::new(JsonFileStore::new(dir.path()), Tuning::default(), 1).unwrap();
    game.start_stage(1).unwrap();
    drop_on_basket(&mut game, 1000, Tier::Hot, true);
    game.update(SIM_DT);
    for i in 0..3 {
        drop_on_basket(&mut game, 2000 + i, Tier::Mild, false);
        game.update(SIM_DT);
    }
    assert_eq!(game.complete_stage().unwrap(), Some(2));
    game.rename_player("Chili").unwrap();
    drop(game);

    let game = Game::new(JsonFileStore::new(dir.path()), Tuning::default(), 2).unwrap();
    assert_eq!(game.high_score(), 50);
    assert_eq!(game.balance(), 50);
    assert!(game.levels().is_unlocked(2));
    assert_eq!(game.settings().player_name, "Chili");
    assert_eq!(game.history().records[0].player_name, "Chili");
    assert!(game.achievements().get("first_steps").unwrap().unlocked);
}

#[test]
fn abandoned_sessions_leave_no_trace_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    let mut game = Game::new(JsonFileStore::new(dir.path()), Tuning::default(), 3).unwrap();
    for _ in 0..3 {
        game.start_stage(1).unwrap();
    }
    drop_on_basket(&mut game, 1000, Tier::Extreme, true);
    game.update(SIM_DT);
    game.post(Command::Quit);
    game.update(SIM_DT);
    assert!(game.snapshot().is_none());
    game.start_stage(1).unwrap();
    drop(game.into_store());

    let game = Game::new(JsonFileStore::new(dir.path()), Tuning::default(), 4).unwrap();
    assert!(game.history().is_empty());
    assert_eq!(game.high_score(), 0);
    assert_eq!(game.balance(), 0);
    assert!(!game.achievements().get("first_steps").unwrap().unlocked);
}
