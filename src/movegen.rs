// Move generation
//
// Pawn moves follow the full jump rules. Wall moves are deliberately limited to
// a window around each pawn plus a few centre slots, and only placements that
// lengthen the opponent's shortest path are kept.

use std::collections::HashSet;

use crate::config::MoveGenerationConfig;
use crate::connectivity::{distance, is_edge_blocked, is_placement_legal};
use crate::profile;
use crate::types::{Cell, Direction, GameState, Move, Orientation, ScoredMove, SLOT_SIZE};

/// Legal pawn moves for `player`, including straight and diagonal jumps
pub fn generate_pawn_moves(
    state: &GameState,
    player: usize,
    config: &MoveGenerationConfig,
) -> Vec<ScoredMove> {
    let own = state.players[player].position;
    let opponent = state.players[GameState::opponent(player)].position;
    let mut moves = Vec::with_capacity(5);

    let priority_for = |target: Cell, base: i32| -> i32 {
        if is_closer_to_goal(own, target, player) {
            base + config.pawn_forward_bonus
        } else {
            base
        }
    };

    for dir in Direction::all() {
        let next = dir.apply(&own);
        if !next.on_board() || is_edge_blocked(&state.walls, own, dir) {
            continue;
        }

        if next != opponent {
            moves.push(ScoredMove {
                mv: Move::Pawn { to: next },
                priority: priority_for(next, config.pawn_step_priority),
            });
            continue;
        }

        // Opponent adjacent: straight jump if nothing is behind them
        let behind = dir.apply(&opponent);
        if behind.on_board() && !is_edge_blocked(&state.walls, opponent, dir) {
            moves.push(ScoredMove {
                mv: Move::Pawn { to: behind },
                priority: priority_for(behind, config.pawn_jump_priority),
            });
            continue;
        }

        for side in dir.perpendicular() {
            let diagonal = side.apply(&opponent);
            if !diagonal.on_board()
                || diagonal == own
                || is_edge_blocked(&state.walls, opponent, side)
            {
                continue;
            }
            moves.push(ScoredMove {
                mv: Move::Pawn { to: diagonal },
                priority: priority_for(diagonal, config.pawn_jump_priority),
            });
        }
    }

    moves
}

/// Candidate wall placements for `player` that strictly lengthen the
/// opponent's path without cutting anyone off
pub fn generate_wall_moves(
    state: &GameState,
    player: usize,
    config: &MoveGenerationConfig,
) -> Vec<ScoredMove> {
    profile!("wall_gen", {
        let opponent = GameState::opponent(player);
        let base_distance = distance(state, opponent);

        let mut scratch = state.clone();
        let mut moves = Vec::new();

        for slot in candidate_slots(state, config) {
            for orientation in Orientation::both() {
                if state.walls.conflicts(orientation, slot) {
                    continue;
                }

                scratch.walls.set(orientation, slot);
                let gain = if is_placement_legal(&scratch) {
                    distance(&scratch, opponent) as i32 - base_distance as i32
                } else {
                    0
                };
                scratch.walls.clear(orientation, slot);

                if gain <= 0 {
                    continue;
                }

                let mut priority = gain * config.wall_gain_priority;
                if gain >= 2 {
                    priority += config.wall_big_gain_bonus;
                }
                moves.push(ScoredMove {
                    mv: Move::Wall { slot, orientation },
                    priority,
                });
            }
        }

        moves
    })
}

/// All moves for `player`, killer moves boosted, highest priority first
pub fn generate_moves(
    state: &GameState,
    player: usize,
    killers: &[Move],
    killer_bonus: i32,
    config: &MoveGenerationConfig,
) -> Vec<ScoredMove> {
    profile!("move_gen", {
        let mut moves = generate_pawn_moves(state, player, config);

        if state.players[player].walls_remaining > 0 {
            moves.extend(generate_wall_moves(state, player, config));
        }

        for m in moves.iter_mut() {
            if killers.contains(&m.mv) {
                m.priority += killer_bonus;
            }
        }

        moves.sort_by(|a, b| b.priority.cmp(&a.priority));
        moves
    })
}

/// Wall slots worth testing: a window around each pawn plus the centre slots,
/// in a stable order without duplicates
fn candidate_slots(state: &GameState, config: &MoveGenerationConfig) -> Vec<Cell> {
    let mut seen = HashSet::new();
    let mut slots = Vec::new();

    for p in &state.players {
        let Cell { row, col } = p.position;
        let rows = (row - config.wall_window_before).max(0)
            ..=(row + config.wall_window_after).min(SLOT_SIZE - 1);
        for r in rows {
            let cols = (col - config.wall_window_before).max(0)
                ..=(col + config.wall_window_after).min(SLOT_SIZE - 1);
            for c in cols {
                let slot = Cell::new(r, c);
                if seen.insert(slot) {
                    slots.push(slot);
                }
            }
        }
    }

    for &[r, c] in &config.center_slots {
        let slot = Cell::new(r, c);
        if slot.is_slot() && seen.insert(slot) {
            slots.push(slot);
        }
    }

    slots
}

fn is_closer_to_goal(from: Cell, to: Cell, player: usize) -> bool {
    let goal = GameState::goal_row(player);
    (to.row - goal).abs() < (from.row - goal).abs()
}
