// Search engine
//
// Iterative-deepening minimax with alpha-beta pruning, an exact-value
// transposition table and killer moves, bounded by a wall-clock deadline.
// All mutable working data lives in a SearchContext owned by one game.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::difficulty::Difficulty;
use crate::evaluation::evaluate;
use crate::movegen::{generate_moves, generate_pawn_moves};
use crate::simple_profiler;
use crate::types::{Cell, GameState, Move, ScoredMove, StateKey};
use crate::profile;

/// Larger than any evaluation, small enough to negate and offset safely
const INFINITY: i32 = i32::MAX / 2;

/// Raised when the deadline passes mid-search; unwinds to the deepening loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTimeout;

#[derive(Debug, Clone, Copy)]
struct TTEntry {
    depth: u8,
    value: i32,
}

/// Everything besides the position and the table that shapes one decision.
/// Logged with each decision so replay can rebuild it.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionInputs {
    /// Seeds the jitter draws and easy-mode random play of this decision only
    pub seed: u64,
    /// Root moves landing here are penalised
    pub avoid: Cell,
}

/// Per-game search working data for one player: transposition table, killer
/// moves, the game-level random source and our own pawn history.
///
/// Table values are scored from the owner's point of view, so a context
/// belongs to the first player that thinks with it.
pub struct SearchContext {
    transposition: HashMap<StateKey, TTEntry>,
    killers: Vec<Vec<Move>>,
    rng: StdRng,
    history: Vec<Cell>,
    owner: Option<usize>,
}

impl SearchContext {
    /// Creates a context seeded from the operating system
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates a context with a fixed seed, for reproducible play
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        SearchContext {
            transposition: HashMap::new(),
            killers: Vec::new(),
            rng,
            history: Vec::new(),
            owner: None,
        }
    }

    pub fn tt_len(&self) -> usize {
        self.transposition.len()
    }

    /// Distinct cells our pawn has occupied at the start of each think
    pub fn history(&self) -> &[Cell] {
        &self.history
    }

    /// Player this context searches for, once it has been used
    pub fn owner(&self) -> Option<usize> {
        self.owner
    }

    /// Prepares the context for a new think call by `player` standing on
    /// `position` and draws this decision's inputs
    fn begin_think(&mut self, player: usize, position: Cell, tt_max_entries: usize) -> DecisionInputs {
        match self.owner {
            Some(owner) if owner != player => {
                warn!(
                    "Context of player {} reused for player {}: discarding its table and history",
                    owner, player
                );
                self.transposition.clear();
                self.history.clear();
                self.owner = Some(player);
            }
            Some(_) => {}
            None => self.owner = Some(player),
        }

        if self.transposition.len() > tt_max_entries {
            debug!(
                "Clearing transposition table ({} entries)",
                self.transposition.len()
            );
            self.transposition.clear();
        }
        if self.history.last() != Some(&position) {
            self.history.push(position);
        }

        DecisionInputs {
            seed: self.rng.random(),
            avoid: self.avoid_cell(player),
        }
    }

    /// The cell we stood on before the current one, or our start cell
    fn avoid_cell(&self, player: usize) -> Cell {
        match self.history.len() {
            n if n >= 2 => self.history[n - 2],
            _ => GameState::start_cell(player),
        }
    }

    fn killers_at(&self, depth: u8) -> &[Move] {
        self.killers
            .get(depth as usize)
            .map(|k| k.as_slice())
            .unwrap_or(&[])
    }

    fn record_killer(&mut self, depth: u8, mv: Move, max_per_depth: usize) {
        let depth = depth as usize;
        if self.killers.len() <= depth {
            self.killers.resize_with(depth + 1, Vec::new);
        }
        let slot = &mut self.killers[depth];
        if slot.contains(&mv) {
            return;
        }
        slot.insert(0, mv);
        slot.truncate(max_per_depth);
    }
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one think call
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth_reached: u8,
    pub nodes: u64,
    pub elapsed_ms: u128,
    pub timed_out: bool,
    pub random_pick: bool,
    pub inputs: DecisionInputs,
    /// Transposition entries carried over from earlier thinks
    pub table_entries: usize,
}

impl SearchReport {
    fn empty(start: Instant, inputs: DecisionInputs, table_entries: usize) -> Self {
        SearchReport {
            best_move: None,
            score: 0,
            depth_reached: 0,
            nodes: 0,
            elapsed_ms: start.elapsed().as_millis(),
            timed_out: false,
            random_pick: false,
            inputs,
            table_entries,
        }
    }
}

/// Chooses a move for `bot` in `state` at the given difficulty.
///
/// Returns `None` only when no legal move exists, which callers must treat as
/// a forced loss.
pub fn think(
    state: &GameState,
    bot: usize,
    difficulty: Difficulty,
    ctx: &mut SearchContext,
    config: &Config,
) -> Option<Move> {
    think_with_report(state, bot, difficulty, ctx, config).best_move
}

/// Same as `think`, with search statistics
pub fn think_with_report(
    state: &GameState,
    bot: usize,
    difficulty: Difficulty,
    ctx: &mut SearchContext,
    config: &Config,
) -> SearchReport {
    let inputs = ctx.begin_think(bot, state.players[bot].position, config.search.tt_max_entries);
    think_with_inputs(state, bot, difficulty, ctx, config, inputs)
}

/// Runs one decision from explicit inputs instead of drawing them from the
/// context. With the same table contents the result is the same move.
pub fn think_with_inputs(
    state: &GameState,
    bot: usize,
    difficulty: Difficulty,
    ctx: &mut SearchContext,
    config: &Config,
    inputs: DecisionInputs,
) -> SearchReport {
    let start = Instant::now();
    let deadline = start + Duration::from_millis(config.timing.think_budget_ms);
    let limits = difficulty.profile(&config.difficulty);
    let table_entries = ctx.transposition.len();
    let mut rng = StdRng::seed_from_u64(inputs.seed);

    ctx.killers.clear();

    let mut work = state.clone();
    work.side_to_move = bot;

    let root_moves = generate_moves(&work, bot, &[], 0, &config.move_generation);
    if root_moves.is_empty() {
        warn!("No legal moves for player {}: forced loss", bot);
        return SearchReport::empty(start, inputs, table_entries);
    }

    if limits.random_move_probability > 0.0
        && rng.random_bool(limits.random_move_probability.clamp(0.0, 1.0))
    {
        let pawn_moves = generate_pawn_moves(&work, bot, &config.move_generation);
        let mv = if pawn_moves.is_empty() {
            root_moves[0].mv
        } else {
            pawn_moves[rng.random_range(0..pawn_moves.len())].mv
        };
        info!("Player {}: random {} move {}", bot, difficulty, mv);
        return SearchReport {
            best_move: Some(mv),
            random_pick: true,
            ..SearchReport::empty(start, inputs, table_entries)
        };
    }

    let mut searcher = Searcher {
        ctx,
        config,
        rng,
        root_player: bot,
        deadline,
        nodes: 0,
    };

    let mut report = SearchReport::empty(start, inputs, table_entries);
    let mut best: Option<(Move, i32)> = None;

    for depth in 1..=limits.max_depth {
        if Instant::now() >= deadline {
            report.timed_out = true;
            break;
        }

        let pv = best.map(|(mv, _)| mv);
        let result = profile!("iteration", {
            searcher.search_root(&mut work, depth, pv, inputs.avoid)
        });

        match result {
            Ok(Some((mv, score))) => {
                debug!(
                    "Depth {}: best {} score {} ({} nodes, {}ms)",
                    depth,
                    mv,
                    score,
                    searcher.nodes,
                    start.elapsed().as_millis()
                );
                best = Some((mv, score));
                report.depth_reached = depth;

                if score.abs() >= config.search.certain_win_threshold {
                    debug!("Decisive score at depth {}, stopping", depth);
                    break;
                }
            }
            Ok(None) => break,
            Err(SearchTimeout) => {
                debug!("Depth {} aborted by deadline", depth);
                report.timed_out = true;
                break;
            }
        }
    }

    // Nothing finished in time: fall back to the best-ordered move
    let (mv, score) = best.unwrap_or((root_moves[0].mv, 0));

    report.best_move = Some(mv);
    report.score = score;
    report.nodes = searcher.nodes;
    report.elapsed_ms = start.elapsed().as_millis();

    simple_profiler::merge_thread_local();

    info!(
        "Player {} ({}): chose {} (score: {}, depth: {}, nodes: {}, time: {}ms)",
        bot, difficulty, mv, score, report.depth_reached, report.nodes, report.elapsed_ms
    );

    report
}

/// One think call's search: borrows the game's context for its duration
struct Searcher<'a> {
    ctx: &'a mut SearchContext,
    config: &'a Config,
    rng: StdRng,
    root_player: usize,
    deadline: Instant,
    nodes: u64,
}

impl Searcher<'_> {
    /// Full-depth search of every root move. Root-only adjustments (the
    /// avoid-cell penalty and tie-break jitter) are applied here, never cached.
    fn search_root(
        &mut self,
        state: &mut GameState,
        depth: u8,
        pv: Option<Move>,
        avoid: Cell,
    ) -> Result<Option<(Move, i32)>, SearchTimeout> {
        let config = self.config;
        let search = &config.search;
        let mut moves = generate_moves(
            state,
            self.root_player,
            self.ctx.killers_at(depth),
            search.killer_bonus,
            &config.move_generation,
        );
        if let Some(pv) = pv {
            for m in moves.iter_mut().filter(|m| m.mv == pv) {
                m.priority += search.pv_bonus;
            }
            moves.sort_by(|a, b| b.priority.cmp(&a.priority));
        }

        // (move, score, jitter)
        let mut best: Option<(Move, i32, i32)> = None;

        for ScoredMove { mv, .. } in moves {
            let penalty = if mv.target() == Some(avoid) {
                search.avoid_penalty
            } else {
                0
            };
            let jitter = self.rng.random_range(-search.jitter..=search.jitter);

            // Anything at or below this cannot beat the current best once penalised
            let floor = match best {
                Some((_, s, _)) => s.saturating_add(penalty).saturating_sub(1),
                None => -INFINITY,
            };

            let undo = state.apply_move(mv);
            let result = self.minimax(state, depth - 1, floor, INFINITY, false);
            state.undo_move(undo);
            let score = result? - penalty;

            let better = match best {
                None => true,
                Some((_, s, j)) => score > s || (score == s && jitter > j),
            };
            if better {
                best = Some((mv, score, jitter));
            }
        }

        Ok(best.map(|(mv, score, _)| (mv, score)))
    }

    fn minimax(
        &mut self,
        state: &mut GameState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Result<i32, SearchTimeout> {
        self.nodes += 1;
        let interval = self.config.timing.node_check_interval.max(1);
        if self.nodes % interval == 0 && Instant::now() >= self.deadline {
            return Err(SearchTimeout);
        }

        let config = self.config;
        let scores = &config.scores;
        if depth == 0 {
            return Ok(evaluate(state, self.root_player, scores));
        }
        if state.winner().is_some() {
            // Prefer the quicker win and the slower loss
            let value = evaluate(state, self.root_player, scores);
            return Ok(if value > 0 {
                value + depth as i32
            } else {
                value - depth as i32
            });
        }

        let key = state.key();
        let cached = self
            .ctx
            .transposition
            .get(&key)
            .filter(|e| e.depth >= depth)
            .map(|e| e.value);
        simple_profiler::record_tt_lookup(cached.is_some());
        if let Some(value) = cached {
            return Ok(value);
        }

        let mover = if maximizing {
            self.root_player
        } else {
            GameState::opponent(self.root_player)
        };
        let moves = generate_moves(
            state,
            mover,
            self.ctx.killers_at(depth),
            config.search.killer_bonus,
            &config.move_generation,
        );
        if moves.is_empty() {
            return Ok(evaluate(state, self.root_player, scores));
        }

        let mut best = if maximizing { -INFINITY } else { INFINITY };

        for ScoredMove { mv, .. } in moves {
            let undo = profile!("apply_move", { state.apply_move(mv) });
            let result = self.minimax(state, depth - 1, alpha, beta, !maximizing);
            state.undo_move(undo);
            let score = result?;

            let cutoff = if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
                best >= beta
            } else {
                best = best.min(score);
                beta = beta.min(best);
                best <= alpha
            };

            if cutoff {
                simple_profiler::record_cutoff();
                self.ctx
                    .record_killer(depth, mv, config.search.killer_moves_per_depth);
                break;
            }
        }

        self.ctx
            .transposition
            .insert(key, TTEntry { depth, value: best });

        Ok(best)
    }
}
