//! Search Tests
//!
//! think() behaviour across difficulties: timing, reproducibility, decisive
//! moves, forced losses and per-game context handling.

use std::time::{Duration, Instant};

use quoridor_bot::bot::Bot;
use quoridor_bot::config::Config;
use quoridor_bot::connectivity::is_placement_legal;
use quoridor_bot::difficulty::Difficulty;
use quoridor_bot::movegen::generate_moves;
use quoridor_bot::search::{
    think, think_with_inputs, think_with_report, DecisionInputs, SearchContext,
};
use quoridor_bot::selfplay::{play_game, GameOutcome};
use quoridor_bot::types::{Cell, GameState, Move, Orientation};

fn fast_config() -> Config {
    let mut config = Config::default_hardcoded();
    config.timing.think_budget_ms = 300;
    config
}

/// Budget large enough that fixed-depth levels always finish every iteration
fn unhurried_config() -> Config {
    let mut config = Config::default_hardcoded();
    config.timing.think_budget_ms = 60_000;
    config
}

fn midgame() -> GameState {
    let mut state = GameState::new_standard();
    state.players[0].position = Cell::new(5, 3);
    state.players[1].position = Cell::new(3, 5);
    state.players[0].walls_remaining = 7;
    state.players[1].walls_remaining = 8;
    state.walls.set(Orientation::Horizontal, Cell::new(4, 2));
    state.walls.set(Orientation::Vertical, Cell::new(2, 5));
    state.walls.set(Orientation::Horizontal, Cell::new(6, 6));
    state
}

/// Pawn on (4,4) with the way up sealed over columns 3-5 and no walls left
/// for anyone. Left and right are mirror images; down is clearly worse.
fn sideways_choice() -> GameState {
    let mut state = GameState::new_standard();
    state.players[0].position = Cell::new(4, 4);
    state.players[0].walls_remaining = 0;
    state.players[1].walls_remaining = 0;
    state.walls.set(Orientation::Horizontal, Cell::new(3, 3));
    state.walls.set(Orientation::Horizontal, Cell::new(3, 4));
    state
}

/// One-ply search so every root score is an exact evaluation
fn one_ply_config() -> Config {
    let mut config = unhurried_config();
    config.difficulty.medium_depth = 1;
    config
}

fn decide(state: &GameState, config: &Config, seed: u64, avoid: Cell) -> Option<Move> {
    think_with_inputs(
        state,
        0,
        Difficulty::Medium,
        &mut SearchContext::with_seed(seed),
        config,
        DecisionInputs { seed, avoid },
    )
    .best_move
}

#[test]
fn test_impossible_returns_within_deadline() {
    let config = Config::default_hardcoded();
    let state = midgame();
    let mut ctx = SearchContext::with_seed(1);

    let start = Instant::now();
    let mv = think(&state, 0, Difficulty::Impossible, &mut ctx, &config);
    let elapsed = start.elapsed();

    assert!(mv.is_some());
    assert!(
        elapsed < Duration::from_millis(3500),
        "Search took {:?}",
        elapsed
    );
}

#[test]
fn test_same_seed_same_move() {
    let config = unhurried_config();
    let state = midgame();

    for difficulty in [Difficulty::Easy, Difficulty::Medium] {
        let a = think(&state, 0, difficulty, &mut SearchContext::with_seed(9), &config);
        let b = think(&state, 0, difficulty, &mut SearchContext::with_seed(9), &config);
        assert_eq!(a, b, "{} should be reproducible", difficulty);
    }
}

#[test]
fn test_takes_winning_step() {
    let config = fast_config();
    let mut state = GameState::new_standard();
    state.players[0].position = Cell::new(1, 6);

    for difficulty in [Difficulty::Medium, Difficulty::Hard] {
        let report = think_with_report(
            &state,
            0,
            difficulty,
            &mut SearchContext::with_seed(3),
            &config,
        );
        assert_eq!(report.best_move, Some(Move::pawn(0, 6)));
        assert!(report.score >= config.search.certain_win_threshold);
    }
}

#[test]
fn test_player_one_takes_winning_step() {
    let config = fast_config();
    let mut state = GameState::new_standard();
    state.players[1].position = Cell::new(7, 2);
    state.side_to_move = 1;

    let mv = think(
        &state,
        1,
        Difficulty::Medium,
        &mut SearchContext::with_seed(3),
        &config,
    );
    assert_eq!(mv, Some(Move::pawn(8, 2)));
}

#[test]
fn test_blocks_opponent_about_to_win() {
    let config = unhurried_config();
    let mut state = GameState::new_standard();
    // Opponent is one step from row 8; we are far from row 0
    state.players[1].position = Cell::new(7, 4);
    state.players[0].position = Cell::new(8, 0);

    let mv = think(
        &state,
        0,
        Difficulty::Medium,
        &mut SearchContext::with_seed(5),
        &config,
    )
    .expect("a move exists");
    assert!(mv.is_wall(), "Expected a blocking wall, got {}", mv);

    let mut after = state.clone();
    after.apply_move(mv);
    let replies = generate_moves(&after, 1, &[], 0, &config.move_generation);
    assert!(replies
        .iter()
        .all(|m| m.mv.target().map_or(true, |c| c.row != 8)));
}

#[test]
fn test_no_legal_move_returns_none() {
    let config = fast_config();
    let mut state = GameState::new_standard();
    state.players[0].position = Cell::new(8, 0);
    state.players[0].walls_remaining = 0;
    state.walls.set(Orientation::Horizontal, Cell::new(7, 0));
    state.walls.set(Orientation::Vertical, Cell::new(7, 0));

    let report = think_with_report(
        &state,
        0,
        Difficulty::Hard,
        &mut SearchContext::with_seed(0),
        &config,
    );
    assert_eq!(report.best_move, None);
    assert_eq!(report.nodes, 0);
}

#[test]
fn test_easy_sometimes_plays_random_pawn_move() {
    let config = fast_config();
    let state = midgame();

    let random_picks: Vec<Move> = (0..30)
        .map(|seed| {
            think_with_report(
                &state,
                0,
                Difficulty::Easy,
                &mut SearchContext::with_seed(seed),
                &config,
            )
        })
        .filter(|r| r.random_pick)
        .filter_map(|r| r.best_move)
        .collect();

    assert!(!random_picks.is_empty());
    assert!(random_picks.iter().all(|m| !m.is_wall()));
}

#[test]
fn test_harder_levels_never_pick_randomly() {
    let config = unhurried_config();
    let state = midgame();

    for seed in 0..2 {
        let report = think_with_report(
            &state,
            0,
            Difficulty::Medium,
            &mut SearchContext::with_seed(seed),
            &config,
        );
        assert!(!report.random_pick);
        assert_eq!(report.depth_reached, 3);
    }
}

#[test]
fn test_search_leaves_state_untouched() {
    let config = fast_config();
    let state = midgame();
    let snapshot = state.clone();

    let _ = think(&state, 1, Difficulty::Hard, &mut SearchContext::with_seed(2), &config);
    assert_eq!(state, snapshot);
}

#[test]
fn test_context_keeps_history_and_cache() {
    let config = unhurried_config();
    let mut state = GameState::new_standard();
    let mut ctx = SearchContext::with_seed(4);

    let first = think(&state, 0, Difficulty::Medium, &mut ctx, &config);
    assert!(ctx.tt_len() > 0);
    assert_eq!(ctx.history(), &[Cell::new(8, 4)]);

    // Asking twice from the same square does not grow the history
    let _ = think(&state, 0, Difficulty::Medium, &mut ctx, &config);
    assert_eq!(ctx.history().len(), 1);

    if let Some(mv @ Move::Pawn { .. }) = first {
        state.apply_move(mv);
        state.side_to_move = 0;
        let _ = think(&state, 0, Difficulty::Medium, &mut ctx, &config);
        assert_eq!(ctx.history().len(), 2);
    }
}

#[test]
fn test_apply_and_undo_restore_state() {
    let config = Config::default_hardcoded();
    let mut state = midgame();
    let snapshot = state.clone();

    for player in 0..2 {
        state.side_to_move = player;
        let before = state.clone();
        for m in generate_moves(&state, player, &[], 0, &config.move_generation) {
            let undo = state.apply_move(m.mv);
            assert_ne!(state, before);
            state.undo_move(undo);
            assert_eq!(state, before, "undo of {} did not restore state", m.mv);
        }
    }

    state.side_to_move = snapshot.side_to_move;
    assert_eq!(state, snapshot);
}

#[test]
fn test_selfplay_moves_are_always_legal() {
    let bot = Bot::new(fast_config());
    let record = play_game(&bot, [Difficulty::Easy, Difficulty::Medium], [11, 12], 30);

    let mut state = GameState::new_standard();
    for mv in &record.moves {
        let player = state.side_to_move;
        let legal = generate_moves(&state, player, &[], 0, &bot.config().move_generation);
        assert!(legal.iter().any(|m| m.mv == *mv), "{} is not a legal move", mv);
        if let Move::Wall { slot, orientation } = *mv {
            assert!(!state.walls.conflicts(orientation, slot));
            assert!(state.players[player].walls_remaining > 0);
        }
        state.apply_move(*mv);
        assert!(is_placement_legal(&state), "{} cut a player off", mv);
    }

    assert_eq!(state, record.final_state);
    if let GameOutcome::Won(winner) = record.outcome {
        assert!(record.final_state.has_reached_goal(winner));
    }
}

#[test]
fn test_equal_moves_split_by_jitter() {
    let config = one_ply_config();
    let state = sideways_choice();
    let nowhere = Cell::new(0, 0);

    let chosen: Vec<Move> = (0..40)
        .filter_map(|seed| decide(&state, &config, seed, nowhere))
        .collect();

    let (left, right) = (Move::pawn(4, 3), Move::pawn(4, 5));
    assert!(chosen.iter().all(|m| *m == left || *m == right));
    assert!(chosen.contains(&left) && chosen.contains(&right));
}

#[test]
fn test_avoid_cell_breaks_the_tie() {
    let config = one_ply_config();
    let state = sideways_choice();

    for seed in 0..10 {
        assert_eq!(
            decide(&state, &config, seed, Cell::new(4, 3)),
            Some(Move::pawn(4, 5))
        );
        assert_eq!(
            decide(&state, &config, seed, Cell::new(4, 5)),
            Some(Move::pawn(4, 3))
        );
    }
}

#[test]
fn test_stepping_back_is_penalised_in_play() {
    let config = one_ply_config();
    let mut state = sideways_choice();
    let mut ctx = SearchContext::with_seed(8);

    // Arrive on (4,4) from (4,3): going straight back would tie with (4,5)
    state.players[0].position = Cell::new(4, 3);
    let _ = think(&state, 0, Difficulty::Medium, &mut ctx, &config);
    state.players[0].position = Cell::new(4, 4);

    for _ in 0..5 {
        let mv = think(&state, 0, Difficulty::Medium, &mut ctx, &config);
        assert_eq!(mv, Some(Move::pawn(4, 5)));
    }
}

#[test]
fn test_jitter_never_beats_a_real_difference() {
    let mut config = one_ply_config();
    // Left now scores exactly one point more than right
    config.scores.center_column = 3;
    config.scores.center_weight = 0.5;
    let state = sideways_choice();

    for seed in 0..20 {
        assert_eq!(
            decide(&state, &config, seed, Cell::new(0, 0)),
            Some(Move::pawn(4, 3)),
            "seed {}",
            seed
        );
    }
}

#[test]
fn test_table_cleared_past_its_bound() {
    let state = midgame();

    let mut bounded = unhurried_config();
    bounded.search.tt_max_entries = 10;
    let mut ctx = SearchContext::with_seed(6);
    let _ = think(&state, 0, Difficulty::Medium, &mut ctx, &bounded);
    assert!(ctx.tt_len() > 10);
    let second = think_with_report(&state, 0, Difficulty::Medium, &mut ctx, &bounded);
    assert_eq!(second.table_entries, 0, "oversized table should start empty");

    let roomy = unhurried_config();
    let mut ctx = SearchContext::with_seed(6);
    let _ = think(&state, 0, Difficulty::Medium, &mut ctx, &roomy);
    let before = ctx.tt_len();
    let second = think_with_report(&state, 0, Difficulty::Medium, &mut ctx, &roomy);
    assert_eq!(second.table_entries, before, "table within bound is kept");
}

#[test]
fn test_zero_budget_falls_back_to_best_ordered_move() {
    let mut config = Config::default_hardcoded();
    config.timing.think_budget_ms = 0;
    let state = midgame();

    let report = think_with_report(
        &state,
        0,
        Difficulty::Impossible,
        &mut SearchContext::with_seed(0),
        &config,
    );
    let ordered = generate_moves(&state, 0, &[], 0, &config.move_generation);

    assert!(report.timed_out);
    assert_eq!(report.depth_reached, 0);
    assert_eq!(report.best_move, Some(ordered[0].mv));
}

#[test]
fn test_context_sticks_to_its_player() {
    let config = fast_config();
    let state = GameState::new_standard();
    let mut ctx = SearchContext::with_seed(13);

    let _ = think(&state, 0, Difficulty::Easy, &mut ctx, &config);
    assert_eq!(ctx.owner(), Some(0));
    assert_eq!(ctx.history(), &[Cell::new(8, 4)]);

    // Switching sides discards the first player's table and history
    let _ = think(&state, 1, Difficulty::Easy, &mut ctx, &config);
    assert_eq!(ctx.owner(), Some(1));
    assert_eq!(ctx.history(), &[Cell::new(0, 4)]);
}

#[tokio::test]
async fn test_get_move_runs_off_the_runtime() {
    let bot = Bot::new(unhurried_config());
    let ctx = Bot::new_context(Some(21));
    let state = GameState::new_standard();

    let report = bot
        .get_move(&state, 0, Difficulty::Medium, ctx.clone())
        .await
        .expect("worker should not fail");

    assert!(report.best_move.is_some());
    assert!(ctx.lock().tt_len() > 0);
}
