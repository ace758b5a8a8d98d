//! Runs a seeded series of bot-versus-bot games in parallel
//!
//! Every game gets its own pair of search contexts, so games never see each
//! other's cached evaluations.
//!
//! Usage: arena <games> <difficulty_0> <difficulty_1> [base_seed]

use parking_lot::Mutex;
use rayon::prelude::*;
use std::env;
use std::process;
use std::time::Instant;

use quoridor_bot::bot::Bot;
use quoridor_bot::config::Config;
use quoridor_bot::difficulty::Difficulty;
use quoridor_bot::selfplay::{play_game, GameOutcome};
use quoridor_bot::simple_profiler;

#[derive(Debug, Default)]
struct Tally {
    wins: [usize; 2],
    forced_losses: usize,
    unfinished: usize,
    total_plies: usize,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <games> <difficulty_0> <difficulty_1> [base_seed]", args[0]);
        eprintln!("Example: {} 20 medium hard 7", args[0]);
        eprintln!(
            "Difficulties: {}",
            Difficulty::all().map(|d| d.as_str()).join(", ")
        );
        process::exit(1);
    }

    let parsed = (|| -> Result<(usize, [Difficulty; 2], u64), String> {
        let games = args[1]
            .parse::<usize>()
            .map_err(|e| format!("Invalid game count '{}': {}", args[1], e))?;
        let difficulties = [args[2].parse::<Difficulty>()?, args[3].parse::<Difficulty>()?];
        let base_seed = match args.get(4) {
            Some(s) => s
                .parse::<u64>()
                .map_err(|e| format!("Invalid seed '{}': {}", s, e))?,
            None => 0,
        };
        Ok((games, difficulties, base_seed))
    })();

    let (games, difficulties, base_seed) = parsed.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let config = Config::load_or_default();
    let max_plies = config.selfplay.max_plies;
    let bot = Bot::new(config);
    let tally = Mutex::new(Tally::default());
    let started = Instant::now();

    println!("\n═══════════════════════════════════════════════════════════");
    println!("                      ARENA");
    println!("═══════════════════════════════════════════════════════════");
    println!("Games:        {}", games);
    println!("Player 0:     {}", difficulties[0]);
    println!("Player 1:     {}", difficulties[1]);
    println!("Threads:      {}", rayon::current_num_threads());
    println!("═══════════════════════════════════════════════════════════\n");

    (0..games).into_par_iter().for_each(|game| {
        let seed = base_seed.wrapping_add(game as u64 * 2);
        let record = play_game(&bot, difficulties, [seed, seed + 1], max_plies);

        let mut t = tally.lock();
        t.total_plies += record.moves.len();
        match record.outcome {
            GameOutcome::Won(p) => t.wins[p] += 1,
            GameOutcome::ForcedLoss(p) => {
                t.forced_losses += 1;
                t.wins[1 - p] += 1;
            }
            GameOutcome::Unfinished => t.unfinished += 1,
        }
        println!(
            "Game {:>3}: {:?} in {} plies",
            game,
            record.outcome,
            record.moves.len()
        );
    });

    let t = tally.into_inner();
    let avg_plies = if games > 0 { t.total_plies as f64 / games as f64 } else { 0.0 };

    println!("\n═══════════════════════════════════════════════════════════");
    println!("Player 0 ({}) wins:   {}", difficulties[0], t.wins[0]);
    println!("Player 1 ({}) wins:   {}", difficulties[1], t.wins[1]);
    println!("Forced resignations:  {}", t.forced_losses);
    println!("Unfinished:           {}", t.unfinished);
    println!("Average plies:        {:.1}", avg_plies);
    println!("Wall time:            {}ms", started.elapsed().as_millis());
    println!("═══════════════════════════════════════════════════════════\n");

    simple_profiler::print_report(started.elapsed().as_millis() as u64);
}
