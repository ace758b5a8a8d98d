// Configuration module for reading Quoridor.toml
// This module provides OOP-style configuration management for the Quoridor bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub difficulty: DifficultyConfig,
    pub move_generation: MoveGenerationConfig,
    pub scores: ScoresConfig,
    pub debug: DebugConfig,
    pub selfplay: SelfPlayConfig,
}

/// Timing and deadline constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub think_budget_ms: u64,
    pub node_check_interval: u64,
}

/// Search working-set and root-selection constants
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub tt_max_entries: usize,
    pub killer_moves_per_depth: usize,
    pub killer_bonus: i32,
    pub pv_bonus: i32,
    pub certain_win_threshold: i32,
    pub avoid_penalty: i32,
    pub jitter: i32,
}

/// Depth caps and weakening per difficulty level
#[derive(Debug, Deserialize, Clone)]
pub struct DifficultyConfig {
    pub easy_depth: u8,
    pub medium_depth: u8,
    pub hard_depth: u8,
    pub impossible_depth: u8,
    pub easy_random_move_probability: f64,
}

/// Move generation and ordering constants
#[derive(Debug, Deserialize, Clone)]
pub struct MoveGenerationConfig {
    // Wall candidate window, relative to each pawn's cell
    pub wall_window_before: i8,
    pub wall_window_after: i8,
    pub center_slots: Vec<[i8; 2]>,

    // Ordering priorities
    pub pawn_step_priority: i32,
    pub pawn_jump_priority: i32,
    pub pawn_forward_bonus: i32,
    pub wall_gain_priority: i32,
    pub wall_big_gain_bonus: i32,
}

/// Evaluation constants
#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    pub win_score: i32,
    pub distance_weight: f64,
    pub urgency_horizon: f64,
    pub urgency_exponent: f64,
    pub urgency_weight: f64,
    pub wall_value_base: f64,
    pub wall_threat_distance: u32,
    pub wall_threat_weight: f64,
    pub opponent_wall_factor: f64,
    pub center_column: i8,
    pub center_weight: f64,
    pub tempo_bonus: f64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

/// Self-play driver configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SelfPlayConfig {
    pub max_plies: u32,
    pub default_seed: u64,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Quoridor.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Quoridor.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Quoridor.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Quoridor.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                think_budget_ms: 2000,
                node_check_interval: 256,
            },
            search: SearchConfig {
                tt_max_entries: 200_000,
                killer_moves_per_depth: 2,
                killer_bonus: 10_000,
                pv_bonus: 1_000_000,
                certain_win_threshold: 900_000,
                avoid_penalty: 40,
                jitter: 1,
            },
            difficulty: DifficultyConfig {
                easy_depth: 2,
                medium_depth: 3,
                hard_depth: 5,
                impossible_depth: 20,
                easy_random_move_probability: 0.3,
            },
            move_generation: MoveGenerationConfig {
                wall_window_before: 2,
                wall_window_after: 1,
                center_slots: vec![[3, 3], [3, 4], [4, 3], [4, 4]],
                pawn_step_priority: 100,
                pawn_jump_priority: 150,
                pawn_forward_bonus: 50,
                wall_gain_priority: 100,
                wall_big_gain_bonus: 1000,
            },
            scores: ScoresConfig {
                win_score: 1_000_000,
                distance_weight: 100.0,
                urgency_horizon: 9.0,
                urgency_exponent: 1.5,
                urgency_weight: 10.0,
                wall_value_base: 35.0,
                wall_threat_distance: 6,
                wall_threat_weight: 15.0,
                opponent_wall_factor: 0.8,
                center_column: 4,
                center_weight: 4.0,
                tempo_bonus: 50.0,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "quoridor_debug.jsonl".to_string(),
            },
            selfplay: SelfPlayConfig {
                max_plies: 200,
                default_seed: 42,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Quoridor.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.timing.think_budget_ms, 2000);
        assert_eq!(config.difficulty.impossible_depth, 20);
        assert_eq!(config.scores.win_score, 1_000_000);
    }

    #[test]
    fn test_quoridor_toml_can_be_parsed() {
        let result = Config::from_file("Quoridor.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Quoridor.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config =
            Config::from_file("Quoridor.toml").expect("Quoridor.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        // Timing
        assert_eq!(
            file_config.timing.think_budget_ms,
            hardcoded.timing.think_budget_ms
        );
        assert_eq!(
            file_config.timing.node_check_interval,
            hardcoded.timing.node_check_interval
        );

        // Search
        assert_eq!(
            file_config.search.tt_max_entries,
            hardcoded.search.tt_max_entries
        );
        assert_eq!(
            file_config.search.avoid_penalty,
            hardcoded.search.avoid_penalty
        );
        assert_eq!(
            file_config.search.certain_win_threshold,
            hardcoded.search.certain_win_threshold
        );

        // Difficulty
        assert_eq!(file_config.difficulty.easy_depth, hardcoded.difficulty.easy_depth);
        assert_eq!(file_config.difficulty.medium_depth, hardcoded.difficulty.medium_depth);
        assert_eq!(file_config.difficulty.hard_depth, hardcoded.difficulty.hard_depth);
        assert_eq!(
            file_config.difficulty.impossible_depth,
            hardcoded.difficulty.impossible_depth
        );

        // Move generation
        assert_eq!(
            file_config.move_generation.center_slots,
            hardcoded.move_generation.center_slots
        );
        assert_eq!(
            file_config.move_generation.wall_window_before,
            hardcoded.move_generation.wall_window_before
        );

        // Scores
        assert_eq!(file_config.scores.win_score, hardcoded.scores.win_score);
        assert_eq!(
            file_config.scores.wall_value_base,
            hardcoded.scores.wall_value_base
        );
        assert_eq!(
            file_config.scores.opponent_wall_factor,
            hardcoded.scores.opponent_wall_factor
        );
    }

    #[test]
    fn test_load_or_default_works() {
        let config = Config::load_or_default();
        assert_eq!(config.move_generation.pawn_step_priority, 100);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
