// Replay module for analyzing logged decisions and debugging move choice
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Re-run the engine on each logged snapshot with its logged decision inputs
// 3. Compare logged vs replayed moves
// 4. Generate a summary report

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::difficulty::Difficulty;
use crate::search::{think_with_inputs, think_with_report, DecisionInputs, SearchContext};
use crate::types::{GameState, Move};

/// Represents a single log entry from the decision JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub ply: u32,
    pub player: usize,
    pub difficulty: Difficulty,
    pub chosen_move: Option<String>,
    /// Seed and avoid cell of the live decision; absent in older logs
    #[serde(default)]
    pub inputs: Option<DecisionInputs>,
    /// Transposition entries the live search started with
    #[serde(default)]
    pub table_entries: usize,
    pub state: GameState,
    pub timestamp: String,
}

/// Result of replaying a single decision
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub ply: u32,
    pub original_move: Option<Move>,
    pub replayed_move: Option<Move>,
    pub matches: bool,
    pub replayed_score: i32,
    pub search_depth: u8,
    pub computation_time_ms: u128,
    /// The live search started from a non-empty table; replay always starts
    /// cold, so a mismatch here may come from cached values alone
    pub warm_table: bool,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_plies: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub warm_table_mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing decision logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
    seed: u64,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration.
    /// Every replayed decision uses a fresh context. Entries carrying decision
    /// inputs are replayed with them; older entries fall back to `seed`.
    pub fn new(config: Config, verbose: bool, seed: u64) -> Self {
        ReplayEngine {
            config,
            verbose,
            seed,
        }
    }

    /// Loads all log entries from a JSONL file, ordered by ply
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        // Writes are asynchronous, so lines may land out of order
        entries.sort_by_key(|e| e.ply);

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying ply {}...", entry.ply);
        }

        if entry.player > 1 {
            return Err(format!("Ply {}: invalid player index {}", entry.ply, entry.player));
        }

        let original_move = entry
            .chosen_move
            .as_deref()
            .map(str::parse::<Move>)
            .transpose()?;

        let mut ctx = SearchContext::with_seed(self.seed);
        let report = match entry.inputs {
            Some(inputs) => think_with_inputs(
                &entry.state,
                entry.player,
                entry.difficulty,
                &mut ctx,
                &self.config,
                inputs,
            ),
            None => think_with_report(
                &entry.state,
                entry.player,
                entry.difficulty,
                &mut ctx,
                &self.config,
            ),
        };

        let matches = original_move == report.best_move;
        let result = ReplayResult {
            ply: entry.ply,
            original_move,
            replayed_move: report.best_move,
            matches,
            replayed_score: report.score,
            search_depth: report.depth_reached,
            computation_time_ms: report.elapsed_ms,
            warm_table: entry.table_entries > 0,
        };

        if self.verbose {
            if matches {
                info!(
                    "Ply {}: ✓ MATCH - {} (score: {}, depth: {}, time: {}ms)",
                    entry.ply,
                    describe(result.replayed_move),
                    result.replayed_score,
                    result.search_depth,
                    result.computation_time_ms
                );
            } else {
                warn!(
                    "Ply {}: ✗ MISMATCH - Original: {}, Replayed: {} (score: {}, depth: {}, time: {}ms)",
                    entry.ply,
                    describe(result.original_move),
                    describe(result.replayed_move),
                    result.replayed_score,
                    result.search_depth,
                    result.computation_time_ms
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay ply {}: {}", entry.ply, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific plies from a log file
    pub fn replay_plies(
        &self,
        entries: &[LogEntry],
        plies: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for ply in plies {
            let entry = entries
                .iter()
                .find(|e| e.ply == *ply)
                .ok_or_else(|| format!("Ply {} not found in log file", ply))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to replay ply {}: {}", ply, e),
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_plies = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let match_rate = if total_plies > 0 {
            (matches as f64 / total_plies as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_plies,
            matches,
            mismatches: total_plies - matches,
            warm_table_mismatches: results.iter().filter(|r| !r.matches && r.warm_table).count(),
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Plies:    {}", stats.total_plies);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("  warm table:   {}", stats.warm_table_mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let n = results.len() as f64;
            let avg_time = results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>() / n;
            let avg_depth = results.iter().map(|r| r.search_depth as f64).sum::<f64>() / n;

            println!("Average Search Depth:       {:.1}", avg_depth);
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Ply {}: {} → {} (score: {}, depth: {}, time: {}ms){}",
                    result.ply,
                    describe(result.original_move),
                    describe(result.replayed_move),
                    result.replayed_score,
                    result.search_depth,
                    result.computation_time_ms,
                    if result.warm_table { " [warm table]" } else { "" }
                );
            }
            println!();
        }
    }

    /// Validates that logged moves at given plies are among the acceptable ones
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u32, Vec<Move>)], // (ply, acceptable_moves)
    ) -> Result<(), String> {
        for (ply, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.ply == *ply)
                .ok_or_else(|| format!("Ply {} not found in log", ply))?;

            let actual = entry
                .chosen_move
                .as_deref()
                .ok_or_else(|| format!("Ply {}: no move was logged", ply))?
                .parse::<Move>()?;

            if !acceptable.contains(&actual) {
                return Err(format!(
                    "Ply {}: Expected one of {:?}, but got {}",
                    ply,
                    acceptable.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
                    actual
                ));
            }
        }

        Ok(())
    }
}

fn describe(mv: Option<Move>) -> String {
    mv.map(|m| m.to_string()).unwrap_or_else(|| "none".to_string())
}
