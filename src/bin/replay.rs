// Standalone replay tool for analyzing Quoridor decision logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all plies
//   --plies <p1,p2>        Replay specific plies (comma-separated)
//   --validate             Check logged moves against acceptable ones
//   --seed <n>             Seed for every replayed search (default 0)
//   --verbose              Show detailed output for each ply
//   --config <path>        Path to Quoridor.toml (default: Quoridor.toml)

use std::env;
use std::process;

use quoridor_bot::config::Config;
use quoridor_bot::replay::ReplayEngine;
use quoridor_bot::types::Move;

fn print_usage() {
    eprintln!("Quoridor Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all plies in the log");
    eprintln!("  --plies <P1,P2,...>     Replay specific plies (comma-separated)");
    eprintln!("  --validate <P:M,...>    Validate logged moves (format: ply:move|move,...)");
    eprintln!("  --seed <N>              Seed for replayed searches (default: 0)");
    eprintln!("  --verbose               Show detailed output for each ply");
    eprintln!("  --config <path>         Path to Quoridor.toml (default: Quoridor.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay quoridor_debug.jsonl --all");
    eprintln!("  replay quoridor_debug.jsonl --plies 4,10");
    eprintln!("  replay quoridor_debug.jsonl --validate 0:e7,3:d6h|e6");
}

fn parse_plies(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid ply number '{}': {}", p, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u32, Vec<Move>)>, String> {
    s.split(',')
        .map(|pair| {
            let (ply, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'ply:move'", pair))?;

            let ply = ply
                .parse::<u32>()
                .map_err(|e| format!("Invalid ply number '{}': {}", ply, e))?;

            // Several acceptable moves separated by '|'
            let moves = moves
                .split('|')
                .map(|m| m.trim().parse::<Move>())
                .collect::<Result<Vec<_>, _>>()?;

            Ok((ply, moves))
        })
        .collect()
}

enum Mode {
    All,
    Plies(Vec<u32>),
    Validate(Vec<(u32, Vec<Move>)>),
}

fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> &'a str {
    match args.get(i + 1) {
        Some(v) => v,
        None => {
            eprintln!("Error: {} requires an argument", name);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(if args.iter().any(|a| a == "--help") { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Quoridor.toml".to_string();
    let mut verbose = false;
    let mut seed = 0u64;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--plies" => {
                let plies = parse_plies(option_value(&args, i, "--plies")).unwrap_or_else(|e| {
                    eprintln!("Error parsing plies: {}", e);
                    process::exit(1);
                });
                mode = Some(Mode::Plies(plies));
                i += 1;
            }
            "--validate" => {
                let expected = parse_expected_moves(option_value(&args, i, "--validate"))
                    .unwrap_or_else(|e| {
                        eprintln!("Error parsing expected moves: {}", e);
                        process::exit(1);
                    });
                mode = Some(Mode::Validate(expected));
                i += 1;
            }
            "--seed" => {
                let value = option_value(&args, i, "--seed");
                seed = value.parse().unwrap_or_else(|e| {
                    eprintln!("Error: invalid seed '{}': {}", value, e);
                    process::exit(1);
                });
                i += 1;
            }
            "--config" => {
                config_path = option_value(&args, i, "--config").to_string();
                i += 1;
            }
            "--verbose" => verbose = true,
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all, --plies, or --validate");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose, seed);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} plies...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Plies(plies) => {
            println!("Replaying {} specific ply(s)...\n", plies.len());
            match engine.replay_plies(&entries, &plies) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(expected) => {
            println!("Validating {} expected move(s)...\n", expected.len());
            match engine.validate_expected_moves(&entries, &expected) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
