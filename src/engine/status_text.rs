use crate::engine::search::{SearchReason, SearchResult};

pub const FALLBACK_TITLE: &str = "Checking solvability";
pub const FALLBACK_MESSAGE: &str = concat!(
    "Background checker unavailable. ",
    "Running inline with reduced limits; the UI may be unresponsive."
);

pub fn build_check_status(result: &SearchResult) -> String {
    let stats = format!(
        "{} states in {} ms",
        result.states_explored, result.duration_ms
    );
    match result.reason {
        SearchReason::Solved => {
            let length = result.solution_moves.as_ref().map_or(0, Vec::len);
            format!("Solvable: found a {length}-move solution ({stats}).")
        }
        SearchReason::LikelySolved => format!(
            "Likely solvable: cleared {} cards before stopping ({stats}).",
            result.best_cards_cleared
        ),
        SearchReason::Exhausted if result.proven_unsolvable => {
            format!("Not solvable from this position ({stats}).")
        }
        SearchReason::Exhausted => {
            format!("No more progress without backtracking. Try a deep check ({stats}).")
        }
        SearchReason::CycleDetected => {
            format!("Play loops back to an earlier position. Try a deep check ({stats}).")
        }
        SearchReason::StateLimit => {
            format!("Inconclusive: state limit reached ({stats}).")
        }
        SearchReason::TimeLimit => {
            format!("Inconclusive: time limit reached ({stats}).")
        }
    }
}
