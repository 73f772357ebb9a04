//! Meadow Runner entry point
//!
//! The browser build is driven from JS through `platform::web`. Natively this
//! runs a headless autopilot session and prints the resulting leaderboard.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use meadow_runner::sim::{GameEvent, SessionPhase, Viewport};
    use meadow_runner::{Game, MemoryStore, platform::now_ms};

    env_logger::init();
    log::info!("Meadow Runner (native) starting...");

    let args: Vec<String> = std::env::args().collect();
    let runs: u32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(3);
    let seed: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(7);

    let mut game = Game::new(MemoryStore::new(), Viewport::new(1280.0, 720.0), seed);
    let frame_ms = 1000.0 / 60.0;
    let mut now = 0.0;

    for run in 0..runs {
        game.start();
        // Later runs react a little later, so they eventually crash
        let reaction_px = 70.0 - run as f32 * 25.0;

        for _ in 0..(60 * 120) {
            let state = game.state();
            let player = state.player();
            let threat = state
                .obstacles()
                .iter()
                .map(|o| o.pos.x - (player.pos.x + player.size.x))
                .filter(|gap| *gap >= 0.0)
                .fold(f32::MAX, f32::min);
            if threat < reaction_px {
                game.jump();
            }

            now += frame_ms;
            let events = game.frame(now);
            if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
                break;
            }
        }

        if game.phase() == SessionPhase::Running {
            log::info!("Run {} survived the time limit", run + 1);
        }
        let name = format!("bot-{}", run + 1);
        let rank = game.save_score(&name, now_ms());
        println!(
            "{}: score {} distance {} rank {:?}",
            name,
            game.state().score,
            game.state().distance,
            rank
        );
    }

    println!("\nLeaderboard:");
    for (i, entry) in game.ledger().entries().iter().enumerate() {
        println!("{:>2}. {:<10} {:>6} pts {:>6} m", i + 1, entry.name, entry.score, entry.distance);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
