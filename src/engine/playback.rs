use crate::engine::moves::Move;
use crate::engine::normalize::normalize_state;
use crate::engine::search::SearchResult;
use crate::game::GameState;

#[derive(Debug, Clone)]
struct ScriptedStep {
    key: String,
    mv: Move,
}

/// Replays a proven line as hints. Each recorded step pairs the key of the
/// state it starts from with the move to play there.
#[derive(Debug, Clone, Default)]
pub struct SolutionPlayback {
    steps: Vec<ScriptedStep>,
    cursor: usize,
}

impl SolutionPlayback {
    pub fn from_result(result: &SearchResult) -> Option<Self> {
        let mut playback = Self::default();
        playback.arm(result).then_some(playback)
    }

    /// Loads the line from a solved result. Returns `false` and leaves the
    /// playback cleared when there is no usable line.
    pub fn arm(&mut self, result: &SearchResult) -> bool {
        self.clear();
        let (Some(moves), Some(keys)) = (&result.solution_moves, &result.solution_state_keys)
        else {
            return false;
        };
        if !result.solved || keys.len() != moves.len() + 1 {
            return false;
        }
        self.steps = keys
            .iter()
            .zip(moves)
            .map(|(key, mv)| ScriptedStep {
                key: key.clone(),
                mv: *mv,
            })
            .collect();
        true
    }

    pub fn clear(&mut self) {
        self.steps.clear();
        self.cursor = 0;
    }

    pub fn is_armed(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.steps.len().saturating_sub(self.cursor)
    }

    pub fn next_hint(&mut self, state: &GameState) -> Option<Move> {
        let key = normalize_state(state);
        let at_cursor = self
            .steps
            .get(self.cursor)
            .is_some_and(|step| step.key == key);
        let index = if at_cursor {
            self.cursor
        } else {
            self.steps.iter().position(|step| step.key == key)?
        };
        self.cursor = index + 1;
        Some(self.steps[index].mv)
    }
}
