// Connectivity checker
//
// Breadth-first reachability from a pawn to its goal row. The edge-blocking
// rule here defines every legality and distance decision in the engine.

use std::collections::VecDeque;

use crate::profile;
use crate::types::{Cell, Direction, GameState, Orientation, WallGrid, BOARD_SIZE};

/// Distance returned when the goal row cannot be reached
pub const UNREACHABLE: u32 = 1000;

const CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Whether a wall blocks the step from `cell` in `direction`.
/// Leaving the board is not reported here; callers bound-check the target.
pub fn is_edge_blocked(walls: &WallGrid, cell: Cell, direction: Direction) -> bool {
    let Cell { row: r, col: c } = cell;
    match direction {
        Direction::Right => {
            walls.has(Orientation::Vertical, Cell::new(r - 1, c))
                || walls.has(Orientation::Vertical, Cell::new(r, c))
        }
        Direction::Left => {
            walls.has(Orientation::Vertical, Cell::new(r - 1, c - 1))
                || walls.has(Orientation::Vertical, Cell::new(r, c - 1))
        }
        Direction::Down => {
            walls.has(Orientation::Horizontal, Cell::new(r, c - 1))
                || walls.has(Orientation::Horizontal, Cell::new(r, c))
        }
        Direction::Up => {
            walls.has(Orientation::Horizontal, Cell::new(r - 1, c - 1))
                || walls.has(Orientation::Horizontal, Cell::new(r - 1, c))
        }
    }
}

/// Shortest number of steps from the player's pawn to its goal row, ignoring
/// pawns. Returns `UNREACHABLE` when walls cut every path.
pub fn distance(state: &GameState, player: usize) -> u32 {
    profile!("bfs", {
        let start = state.players[player].position;
        let goal = GameState::goal_row(player);

        let mut visited = [false; CELLS];
        let mut queue = VecDeque::with_capacity(CELLS);
        visited[index(start)] = true;
        queue.push_back((start, 0u32));

        while let Some((cell, dist)) = queue.pop_front() {
            if cell.row == goal {
                return dist;
            }

            for dir in Direction::all() {
                let next = dir.apply(&cell);
                if !next.on_board() || visited[index(next)] {
                    continue;
                }
                if is_edge_blocked(&state.walls, cell, dir) {
                    continue;
                }
                visited[index(next)] = true;
                queue.push_back((next, dist + 1));
            }
        }

        UNREACHABLE
    })
}

pub fn has_path(state: &GameState, player: usize) -> bool {
    distance(state, player) != UNREACHABLE
}

/// A wall layout is legal only if both players can still reach their goal rows
pub fn is_placement_legal(state: &GameState) -> bool {
    has_path(state, 0) && has_path(state, 1)
}

#[inline]
fn index(cell: Cell) -> usize {
    cell.row as usize * BOARD_SIZE as usize + cell.col as usize
}
