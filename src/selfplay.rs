// Self-play driver: two bots, one context each, until someone reaches their goal

use log::{info, warn};

use crate::bot::Bot;
use crate::difficulty::Difficulty;
use crate::search::SearchContext;
use crate::types::{GameState, Move};

/// How a self-play game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// A pawn reached its goal row
    Won(usize),
    /// The player had no move and resigned
    ForcedLoss(usize),
    /// Ply cap reached without a winner
    Unfinished,
}

impl GameOutcome {
    pub fn winner(&self) -> Option<usize> {
        match *self {
            GameOutcome::Won(p) => Some(p),
            GameOutcome::ForcedLoss(p) => Some(GameState::opponent(p)),
            GameOutcome::Unfinished => None,
        }
    }
}

/// Full record of a finished game
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub outcome: GameOutcome,
    pub moves: Vec<Move>,
    pub final_state: GameState,
}

/// Plays one game from the standard position.
/// Player `i` searches at `difficulties[i]` with a context seeded by `seeds[i]`.
pub fn play_game(
    bot: &Bot,
    difficulties: [Difficulty; 2],
    seeds: [u64; 2],
    max_plies: u32,
) -> GameRecord {
    let mut contexts = seeds.map(SearchContext::with_seed);
    let mut state = GameState::new_standard();
    let mut moves = Vec::new();

    for ply in 0..max_plies {
        let player = state.side_to_move;
        let chosen = bot.think(&state, player, difficulties[player], &mut contexts[player]);

        let Some(mv) = chosen else {
            warn!("Ply {}: player {} has no move, resigning", ply, player);
            return GameRecord {
                outcome: GameOutcome::ForcedLoss(player),
                moves,
                final_state: state,
            };
        };

        state.apply_move(mv);
        moves.push(mv);

        if let Some(winner) = state.winner() {
            info!("Player {} wins after {} plies", winner, ply + 1);
            return GameRecord {
                outcome: GameOutcome::Won(winner),
                moves,
                final_state: state,
            };
        }
    }

    info!("No winner after {} plies", max_plies);
    GameRecord {
        outcome: GameOutcome::Unfinished,
        moves,
        final_state: state,
    }
}
