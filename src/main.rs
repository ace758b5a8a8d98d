// Plays one bot-versus-bot game, logging every decision
//
// Usage:
//   quoridor-bot [difficulty_0] [difficulty_1] [seed]
//
// Searches run on tokio's blocking pool through Bot::get_move, one search
// context per player.

use log::{error, info};
use std::env;
use std::process;
use std::time::Instant;

use quoridor_bot::bot::Bot;
use quoridor_bot::config::Config;
use quoridor_bot::debug_logger::DebugLogger;
use quoridor_bot::difficulty::Difficulty;
use quoridor_bot::simple_profiler;
use quoridor_bot::types::GameState;

fn parse_args(config: &Config) -> Result<([Difficulty; 2], u64), String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let difficulty = |i: usize| -> Result<Difficulty, String> {
        args.get(i)
            .map(|s| s.parse())
            .unwrap_or(Ok(Difficulty::Medium))
    };
    let seed = match args.get(2) {
        Some(s) => s
            .parse::<u64>()
            .map_err(|e| format!("Invalid seed '{}': {}", s, e))?,
        None => config.selfplay.default_seed,
    };

    Ok(([difficulty(0)?, difficulty(1)?], seed))
}

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let config = Config::load_or_default();
    let (difficulties, seed) = match parse_args(&config) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: quoridor-bot [difficulty_0] [difficulty_1] [seed]");
            process::exit(1);
        }
    };

    info!(
        "Starting game: {} vs {} (seed {})",
        difficulties[0], difficulties[1], seed
    );

    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let max_plies = config.selfplay.max_plies;
    let bot = Bot::new(config);
    let contexts = [
        Bot::new_context(Some(seed)),
        Bot::new_context(Some(seed.wrapping_add(1))),
    ];

    let mut state = GameState::new_standard();
    let mut pending_writes = Vec::new();
    let started = Instant::now();

    for p in 0..2 {
        bot.start(&state, p, difficulties[p]);
    }

    for ply in 0..max_plies {
        let player = state.side_to_move;
        let report = match bot
            .get_move(&state, player, difficulties[player], contexts[player].clone())
            .await
        {
            Ok(report) => report,
            Err(e) => {
                error!("{}", e);
                break;
            }
        };

        pending_writes.extend(logger.log_decision(
            ply,
            player,
            difficulties[player],
            state.clone(),
            &report,
        ));

        let Some(mv) = report.best_move else {
            error!("Player {} has no legal move: forced resignation", player);
            break;
        };

        state.apply_move(mv);
        info!(
            "Ply {}: player {} plays {} (walls left: {} / {})",
            ply, player, mv, state.players[0].walls_remaining, state.players[1].walls_remaining
        );

        if state.winner().is_some() {
            break;
        }
    }

    for p in 0..2 {
        bot.end(&state, p);
    }

    for handle in pending_writes {
        let _ = handle.await;
    }

    simple_profiler::print_report(started.elapsed().as_millis() as u64);
}
