// Difficulty levels and what they mean for the search

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::DifficultyConfig;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Impossible,
}

/// Search limits derived from a difficulty level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub max_depth: u8,
    /// Chance of skipping the search and playing a random pawn move
    pub random_move_probability: f64,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 4] {
        [
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Impossible,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Impossible => "impossible",
        }
    }

    pub fn profile(&self, config: &DifficultyConfig) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                max_depth: config.easy_depth,
                random_move_probability: config.easy_random_move_probability,
            },
            Difficulty::Medium => DifficultyProfile {
                max_depth: config.medium_depth,
                random_move_probability: 0.0,
            },
            Difficulty::Hard => DifficultyProfile {
                max_depth: config.hard_depth,
                random_move_probability: 0.0,
            },
            // Effectively unbounded; the deadline ends the search
            Difficulty::Impossible => DifficultyProfile {
                max_depth: config.impossible_depth,
                random_move_probability: 0.0,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "impossible" => Ok(Difficulty::Impossible),
            _ => Err(format!("Invalid difficulty: {}", s)),
        }
    }
}
