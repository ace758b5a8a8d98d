// Static evaluation of a position from one player's point of view

use crate::config::ScoresConfig;
use crate::connectivity::{distance, UNREACHABLE};
use crate::profile;
use crate::types::GameState;

/// Scores `state` for `perspective`. Positive favours `perspective`.
///
/// Terminal positions return `±win_score` regardless of anything else.
/// Otherwise the score combines the path-length race, a progressive urgency
/// term, the value of the remaining walls, a small centre-column preference
/// and a tempo bonus when already ahead.
pub fn evaluate(state: &GameState, perspective: usize, scores: &ScoresConfig) -> i32 {
    profile!("eval", {
        let opponent = GameState::opponent(perspective);

        if state.has_reached_goal(perspective) {
            return scores.win_score;
        }
        if state.has_reached_goal(opponent) {
            return -scores.win_score;
        }

        let d_self = distance(state, perspective);
        let d_opp = distance(state, opponent);

        if d_self == UNREACHABLE {
            return -scores.win_score / 2;
        }
        if d_opp == UNREACHABLE {
            return scores.win_score / 2;
        }

        let (ds, dop) = (d_self as f64, d_opp as f64);
        let mut score = (dop - ds) * scores.distance_weight;

        let urgency = |d: f64| {
            (scores.urgency_horizon - d).max(0.0).powf(scores.urgency_exponent) * scores.urgency_weight
        };
        score += urgency(ds) - urgency(dop);

        let mut wall_value = scores.wall_value_base;
        if d_opp < scores.wall_threat_distance {
            wall_value += (scores.wall_threat_distance - d_opp) as f64 * scores.wall_threat_weight;
        }
        score += state.players[perspective].walls_remaining as f64 * wall_value;
        score -= state.players[opponent].walls_remaining as f64
            * wall_value
            * scores.opponent_wall_factor;

        let column = state.players[perspective].position.col;
        score -= (scores.center_column - column).abs() as f64 * scores.center_weight;

        if d_self < d_opp {
            score += scores.tempo_bonus;
        }

        score.round() as i32
    })
}
