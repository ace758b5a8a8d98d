//! Evaluation Tests
//!
//! Terminal scores, the symmetric opening and individual evaluation terms.

use quoridor_bot::config::Config;
use quoridor_bot::evaluation::evaluate;
use quoridor_bot::types::{Cell, GameState, Orientation};

fn scores() -> quoridor_bot::config::ScoresConfig {
    Config::default_hardcoded().scores
}

#[test]
fn test_opening_position_is_symmetric() {
    let state = GameState::new_standard();
    let scores = scores();

    // Equal race; only the discounted opponent walls tip the balance
    assert_eq!(evaluate(&state, 0, &scores), 70);
    assert_eq!(evaluate(&state, 1, &scores), 70);
}

#[test]
fn test_goal_reached_dominates_everything() {
    let mut state = GameState::new_standard();
    state.players[0].position = Cell::new(0, 0);
    state.players[0].walls_remaining = 0;
    state.walls.set(Orientation::Horizontal, Cell::new(5, 5));
    let scores = scores();

    assert_eq!(evaluate(&state, 0, &scores), 1_000_000);
    assert_eq!(evaluate(&state, 1, &scores), -1_000_000);
}

#[test]
fn test_cut_off_player_scores_half_loss() {
    let mut state = GameState::new_standard();
    // Box player 0 into the bottom-left corner
    state.players[0].position = Cell::new(8, 0);
    state.walls.set(Orientation::Horizontal, Cell::new(7, 0));
    state.walls.set(Orientation::Vertical, Cell::new(7, 0));
    let scores = scores();

    assert_eq!(evaluate(&state, 0, &scores), -500_000);
    assert_eq!(evaluate(&state, 1, &scores), 500_000);
}

#[test]
fn test_longer_own_path_lowers_score() {
    let scores = scores();
    let open = GameState::new_standard();
    let mut blocked = open.clone();
    blocked.walls.set(Orientation::Horizontal, Cell::new(7, 3));

    assert!(evaluate(&blocked, 0, &scores) < evaluate(&open, 0, &scores));
    assert!(evaluate(&blocked, 1, &scores) > evaluate(&open, 1, &scores));
}

#[test]
fn test_walls_worth_more_when_opponent_close() {
    let mut state = GameState::new_standard();
    state.players[0].position = Cell::new(3, 4);
    state.players[1].position = Cell::new(4, 0);
    let scores = scores();

    // distance term 100, urgency (6^1.5 - 5^1.5) * 10 = 35.17,
    // walls 10 * 65 - 10 * 65 * 0.8 = 130, tempo 50
    assert_eq!(evaluate(&state, 0, &scores), 315);
}

#[test]
fn test_off_centre_column_penalised() {
    let scores = scores();
    let centre = GameState::new_standard();
    let mut side = centre.clone();
    side.players[0].position = Cell::new(8, 1);

    assert_eq!(
        evaluate(&centre, 0, &scores) - evaluate(&side, 0, &scores),
        12
    );
}
