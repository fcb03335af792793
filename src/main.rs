//! Pepper Rush - headless runner
//!
//! Plays one session with a simple tap bot at 60 FPS and logs the outcome.
//! Records are kept in the local data directory unless `--memory` is given.
//!
//! Usage: `pepper-rush [--stage N] [--seed N] [--tuning FILE] [--memory]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use pepper_rush::sim::GameEvent;
    use pepper_rush::{Command, Game, JsonFileStore, MemoryStore, Snapshot, SortOrder, Store, Tuning};

    /// Frames per second the bot plays at
    const FPS: f32 = 60.0;
    /// Give up after this many simulated seconds
    const MAX_SECONDS: f32 = 600.0;
    /// Bad items closer than this make the bot reverse
    const DANGER_RADIUS: f32 = 110.0;
    /// Minimum time between taps (seconds)
    const TAP_COOLDOWN: f32 = 0.5;

    struct Options {
        stage: i32,
        seed: u64,
        tuning: Option<String>,
        memory: bool,
    }

    fn parse_args() -> Options {
        let mut options = Options {
            stage: 1,
            seed: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            tuning: None,
            memory: false,
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stage" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(stage) => options.stage = stage,
                    None => log::warn!("--stage needs a number"),
                },
                "--seed" => match args.next().and_then(|v| v.parse().ok()) {
                    Some(seed) => options.seed = seed,
                    None => log::warn!("--seed needs a number"),
                },
                "--tuning" => options.tuning = args.next(),
                "--memory" => options.memory = true,
                other => log::warn!("Ignoring unknown argument {:?}", other),
            }
        }
        options
    }

    fn load_tuning(path: Option<&str>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path, e);
                    Tuning::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    /// Reverse when a bad item is close to the basket
    fn wants_tap(snapshot: &Snapshot) -> bool {
        snapshot
            .peppers
            .iter()
            .filter(|p| !p.good)
            .any(|p| p.pos.distance(snapshot.basket.pos) < DANGER_RADIUS)
    }

    fn play<S: Store>(store: S, options: &Options) {
        let tuning = load_tuning(options.tuning.as_deref());
        let mut game = match Game::new(store, tuning, options.seed) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Unusable tuning: {}", e);
                return;
            }
        };

        if let Err(e) = game.start_stage(options.stage) {
            log::error!("Cannot start stage {}: {}", options.stage, e);
            return;
        }

        let frame_dt = 1.0 / FPS;
        let mut elapsed = 0.0;
        let mut since_tap = TAP_COOLDOWN;
        while game.is_session_active() && elapsed < MAX_SECONDS {
            if since_tap >= TAP_COOLDOWN && game.snapshot().is_some_and(|s| wants_tap(&s)) {
                game.post(Command::Tap);
                since_tap = 0.0;
            }
            for event in game.update(frame_dt) {
                match event {
                    GameEvent::Collected { tier, points, .. } => {
                        log::debug!("+{} ({})", points, tier.as_str())
                    }
                    GameEvent::Hit { lives_left, .. } => log::info!("Ouch! {} lives left", lives_left),
                    _ => {}
                }
            }
            elapsed += frame_dt;
            since_tap += frame_dt;
        }
        game.abandon_session();

        if let Some(summary) = game.last_summary() {
            log::info!(
                "Final score {} (level {}, {} peppers, {:?})",
                summary.record.score,
                summary.record.level,
                summary.record.peppers_collected,
                summary.reason
            );
            if summary.new_high_score {
                log::info!("New high score!");
            }
            for title in &summary.unlocked_achievements {
                log::info!("Achievement: {}", title);
            }
        }
        let stats = game.career_stats();
        log::info!(
            "Career: {} games, best {}, average {}, player level {}",
            stats.games_played,
            stats.best_score,
            stats.average_score,
            stats.player_level
        );
        if let Some(best) = game.leaderboard(SortOrder::Score).first() {
            log::info!("Top score: {} by {}", best.score, best.player_name);
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Pepper Rush (headless) starting...");

        let options = parse_args();
        if options.memory {
            play(MemoryStore::new(), &options);
            return;
        }
        match JsonFileStore::open_default() {
            Ok(store) => play(store, &options),
            Err(e) => {
                log::warn!("{}, keeping records in memory", e);
                play(MemoryStore::new(), &options);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web
}
