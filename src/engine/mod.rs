pub mod apply;
pub mod movegen;
pub mod moves;
pub mod normalize;
pub mod playback;
pub mod profile;
pub mod search;
pub mod status_text;

pub use apply::apply_move;
pub use movegen::list_candidate_moves;
pub use moves::{CandidateMove, Move, MovePriority, PileRef};
pub use normalize::{clone_state, normalize_state};
pub use playback::SolutionPlayback;
pub use profile::CheckProfile;
pub use search::{check_solvable, SearchLimits, SearchReason, SearchResult};

#[cfg(test)]
mod tests;
