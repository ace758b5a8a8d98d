// Quoridor bot facade
//
// Holds the static configuration and exposes the engine to callers, either
// synchronously (think) or from async code without blocking the runtime
// (get_move). Each game brings its own SearchContext.

use log::{error, info};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::Config;
use crate::difficulty::Difficulty;
use crate::search::{self, SearchContext, SearchReport};
use crate::types::{GameState, Move};

/// Search context shared between an async caller and the blocking worker
pub type SharedContext = Arc<Mutex<SearchContext>>;

/// Quoridor bot with OOP-style API
/// Takes static configuration and exposes the move decision
#[derive(Clone)]
pub struct Bot {
    config: Arc<Config>,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fresh per-game context wrapped for use with `get_move`
    pub fn new_context(seed: Option<u64>) -> SharedContext {
        let ctx = match seed {
            Some(seed) => SearchContext::with_seed(seed),
            None => SearchContext::new(),
        };
        Arc::new(Mutex::new(ctx))
    }

    /// Called when a game starts
    pub fn start(&self, state: &GameState, player: usize, difficulty: Difficulty) {
        info!(
            "GAME START: player {} at {} on {}",
            player, state.players[player].position, difficulty
        );
    }

    /// Called when a game ends
    pub fn end(&self, state: &GameState, player: usize) {
        match state.winner() {
            Some(w) if w == player => info!("GAME OVER: player {} won", player),
            Some(w) => info!("GAME OVER: player {} lost to player {}", player, w),
            None => info!("GAME OVER: player {} without a winner", player),
        }
    }

    /// Blocking move decision. Runs for at most the configured think budget.
    ///
    /// # Returns
    /// * `Option<Move>` - The chosen move, or `None` when no legal move exists
    pub fn think(
        &self,
        state: &GameState,
        player: usize,
        difficulty: Difficulty,
        ctx: &mut SearchContext,
    ) -> Option<Move> {
        search::think(state, player, difficulty, ctx, &self.config)
    }

    /// Blocking move decision with search statistics
    pub fn think_with_report(
        &self,
        state: &GameState,
        player: usize,
        difficulty: Difficulty,
        ctx: &mut SearchContext,
    ) -> SearchReport {
        search::think_with_report(state, player, difficulty, ctx, &self.config)
    }

    /// Computes the next move on the blocking thread pool so async callers
    /// keep serving other work while the search runs
    ///
    /// # Arguments
    /// * `state` - Snapshot of the current game
    /// * `player` - Index of the player to move
    /// * `difficulty` - Search strength
    /// * `ctx` - This game's search context
    ///
    /// # Returns
    /// * `Result<SearchReport, String>` - Search result, or an error if the worker failed
    pub async fn get_move(
        &self,
        state: &GameState,
        player: usize,
        difficulty: Difficulty,
        ctx: SharedContext,
    ) -> Result<SearchReport, String> {
        let state = state.clone();
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            let mut ctx = ctx.lock();
            search::think_with_report(&state, player, difficulty, &mut ctx, &config)
        })
        .await
        .map_err(|e| {
            error!("Search worker failed: {}", e);
            format!("Search worker failed: {}", e)
        })
    }
}
