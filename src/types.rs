// Quoridor board types
// Board cells, wall bitsets, players, moves and the game state snapshot

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of cells along each side of the board
pub const BOARD_SIZE: i8 = 9;

/// Number of wall slots along each side of the slot grid
pub const SLOT_SIZE: i8 = 8;

/// Walls each player starts with
pub const WALLS_PER_PLAYER: u8 = 10;

/// 2D coordinate on the board (or on the slot grid for walls)
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Cell {
    pub row: i8,
    pub col: i8,
}

impl Cell {
    pub const fn new(row: i8, col: i8) -> Self {
        Cell { row, col }
    }

    /// True if the cell lies on the 9x9 board
    pub fn on_board(&self) -> bool {
        self.row >= 0 && self.row < BOARD_SIZE && self.col >= 0 && self.col < BOARD_SIZE
    }

    /// True if the coordinate addresses a slot of the 8x8 wall grid
    pub fn is_slot(&self) -> bool {
        self.row >= 0 && self.row < SLOT_SIZE && self.col >= 0 && self.col < SLOT_SIZE
    }
}

impl fmt::Display for Cell {
    /// Column letter followed by row digit, e.g. `e8`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col as u8) as char, self.row)
    }
}

impl FromStr for Cell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(format!("Invalid cell '{}': expected column letter and row digit", s));
        }

        let col = bytes[0].to_ascii_lowercase();
        let row = bytes[1];
        if !(b'a'..=b'i').contains(&col) || !(b'0'..=b'8').contains(&row) {
            return Err(format!("Invalid cell '{}': out of range", s));
        }

        Ok(Cell::new((row - b'0') as i8, (col - b'a') as i8))
    }
}

/// The four orthogonal movement directions. Row 0 is the top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// The two directions at right angles to this one
    pub fn perpendicular(&self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    /// Calculates the neighbouring cell when moving in this direction
    pub fn apply(&self, cell: &Cell) -> Cell {
        match self {
            Direction::Up => Cell::new(cell.row - 1, cell.col),
            Direction::Down => Cell::new(cell.row + 1, cell.col),
            Direction::Left => Cell::new(cell.row, cell.col - 1),
            Direction::Right => Cell::new(cell.row, cell.col + 1),
        }
    }
}

/// Wall orientation
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn both() -> [Orientation; 2] {
        [Orientation::Horizontal, Orientation::Vertical]
    }

    pub fn as_char(&self) -> char {
        match self {
            Orientation::Horizontal => 'h',
            Orientation::Vertical => 'v',
        }
    }
}

/// Both wall grids packed as 8x8 bitsets, bit index `row * 8 + col`
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WallGrid {
    pub horizontal: u64,
    pub vertical: u64,
}

impl WallGrid {
    #[inline]
    fn bit(slot: Cell) -> u64 {
        1u64 << (slot.row as u32 * SLOT_SIZE as u32 + slot.col as u32)
    }

    fn grid(&self, orientation: Orientation) -> u64 {
        match orientation {
            Orientation::Horizontal => self.horizontal,
            Orientation::Vertical => self.vertical,
        }
    }

    fn grid_mut(&mut self, orientation: Orientation) -> &mut u64 {
        match orientation {
            Orientation::Horizontal => &mut self.horizontal,
            Orientation::Vertical => &mut self.vertical,
        }
    }

    /// Whether a wall segment occupies the slot. Off-grid slots are never occupied.
    #[inline]
    pub fn has(&self, orientation: Orientation, slot: Cell) -> bool {
        slot.is_slot() && self.grid(orientation) & Self::bit(slot) != 0
    }

    pub fn set(&mut self, orientation: Orientation, slot: Cell) {
        *self.grid_mut(orientation) |= Self::bit(slot);
    }

    pub fn clear(&mut self, orientation: Orientation, slot: Cell) {
        *self.grid_mut(orientation) &= !Self::bit(slot);
    }

    /// True if a wall at `slot` would overlap or cross an existing one
    pub fn conflicts(&self, orientation: Orientation, slot: Cell) -> bool {
        if !slot.is_slot() {
            return true;
        }

        let (before, after) = match orientation {
            Orientation::Horizontal => (
                Cell::new(slot.row, slot.col - 1),
                Cell::new(slot.row, slot.col + 1),
            ),
            Orientation::Vertical => (
                Cell::new(slot.row - 1, slot.col),
                Cell::new(slot.row + 1, slot.col),
            ),
        };
        let crossing = match orientation {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        };

        self.has(orientation, slot)
            || self.has(orientation, before)
            || self.has(orientation, after)
            || self.has(crossing, slot)
    }

    pub fn count(&self) -> u32 {
        self.horizontal.count_ones() + self.vertical.count_ones()
    }
}

/// One pawn and its remaining wall inventory
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Player {
    pub position: Cell,
    pub walls_remaining: u8,
}

/// A move: either a pawn relocation or a wall placement, never both
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Move {
    Pawn { to: Cell },
    Wall { slot: Cell, orientation: Orientation },
}

impl Move {
    pub fn pawn(row: i8, col: i8) -> Self {
        Move::Pawn { to: Cell::new(row, col) }
    }

    pub fn wall(row: i8, col: i8, orientation: Orientation) -> Self {
        Move::Wall {
            slot: Cell::new(row, col),
            orientation,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Move::Wall { .. })
    }

    /// Destination cell of a pawn move
    pub fn target(&self) -> Option<Cell> {
        match self {
            Move::Pawn { to } => Some(*to),
            Move::Wall { .. } => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pawn { to } => write!(f, "{}", to),
            Move::Wall { slot, orientation } => write!(f, "{}{}", slot, orientation.as_char()),
        }
    }
}

impl FromStr for Move {
    type Err = String;

    /// Parses `e4` (pawn) or `d3h` / `d3v` (wall)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() {
            return Err(format!("Invalid move notation: {}", s));
        }
        match s.len() {
            2 => Ok(Move::Pawn { to: s.parse()? }),
            3 => {
                let slot: Cell = s[..2].parse()?;
                if !slot.is_slot() {
                    return Err(format!("Invalid wall '{}': slot outside the 8x8 grid", s));
                }
                let orientation = match &s[2..] {
                    "h" | "H" => Orientation::Horizontal,
                    "v" | "V" => Orientation::Vertical,
                    other => return Err(format!("Invalid wall orientation: {}", other)),
                };
                Ok(Move::Wall { slot, orientation })
            }
            _ => Err(format!("Invalid move notation: {}", s)),
        }
    }
}

/// A move paired with its ordering priority. Priority is search-only data.
#[derive(Debug, Clone, Copy)]
pub struct ScoredMove {
    pub mv: Move,
    pub priority: i32,
}

/// Information needed to reverse an applied move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undo {
    Pawn { player: usize, from: Cell },
    Wall {
        player: usize,
        slot: Cell,
        orientation: Orientation,
        walls_before: u8,
    },
}

/// Canonical, hashable encoding of a game state for the transposition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub side_to_move: u8,
    pub positions: [(i8, i8); 2],
    pub walls_remaining: [u8; 2],
    pub horizontal: u64,
    pub vertical: u64,
}

/// Complete game state snapshot handed to the engine
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub walls: WallGrid,
    pub players: [Player; 2],
    pub side_to_move: usize,
}

impl GameState {
    /// Standard opening position: player 0 at (8,4) heading for row 0,
    /// player 1 at (0,4) heading for row 8, ten walls each
    pub fn new_standard() -> Self {
        GameState {
            walls: WallGrid::default(),
            players: [
                Player {
                    position: Cell::new(BOARD_SIZE - 1, BOARD_SIZE / 2),
                    walls_remaining: WALLS_PER_PLAYER,
                },
                Player {
                    position: Cell::new(0, BOARD_SIZE / 2),
                    walls_remaining: WALLS_PER_PLAYER,
                },
            ],
            side_to_move: 0,
        }
    }

    /// Index of the other player
    #[inline]
    pub fn opponent(player: usize) -> usize {
        1 - player
    }

    /// Row a player must reach to win
    #[inline]
    pub fn goal_row(player: usize) -> i8 {
        if player == 0 {
            0
        } else {
            BOARD_SIZE - 1
        }
    }

    /// Cell a player starts the game on
    pub fn start_cell(player: usize) -> Cell {
        if player == 0 {
            Cell::new(BOARD_SIZE - 1, BOARD_SIZE / 2)
        } else {
            Cell::new(0, BOARD_SIZE / 2)
        }
    }

    pub fn has_reached_goal(&self, player: usize) -> bool {
        self.players[player].position.row == Self::goal_row(player)
    }

    /// The player whose pawn stands on its goal row, if any
    pub fn winner(&self) -> Option<usize> {
        (0..2).find(|&p| self.has_reached_goal(p))
    }

    pub fn key(&self) -> StateKey {
        let [a, b] = self.players;
        StateKey {
            side_to_move: self.side_to_move as u8,
            positions: [
                (a.position.row, a.position.col),
                (b.position.row, b.position.col),
            ],
            walls_remaining: [a.walls_remaining, b.walls_remaining],
            horizontal: self.walls.horizontal,
            vertical: self.walls.vertical,
        }
    }

    /// Applies a move for the side to move and passes the turn.
    /// No legality check: callers apply generated moves only.
    pub fn apply_move(&mut self, mv: Move) -> Undo {
        let player = self.side_to_move;
        let undo = match mv {
            Move::Pawn { to } => {
                let from = self.players[player].position;
                self.players[player].position = to;
                Undo::Pawn { player, from }
            }
            Move::Wall { slot, orientation } => {
                let walls_before = self.players[player].walls_remaining;
                self.walls.set(orientation, slot);
                self.players[player].walls_remaining = walls_before.saturating_sub(1);
                Undo::Wall {
                    player,
                    slot,
                    orientation,
                    walls_before,
                }
            }
        };
        self.side_to_move = Self::opponent(player);
        undo
    }

    /// Exactly reverses the matching `apply_move`
    pub fn undo_move(&mut self, undo: Undo) {
        match undo {
            Undo::Pawn { player, from } => {
                self.players[player].position = from;
                self.side_to_move = player;
            }
            Undo::Wall {
                player,
                slot,
                orientation,
                walls_before,
            } => {
                self.walls.clear(orientation, slot);
                self.players[player].walls_remaining = walls_before;
                self.side_to_move = player;
            }
        }
    }
}
