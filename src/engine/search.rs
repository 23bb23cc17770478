use std::collections::{HashMap, HashSet};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::apply::apply_move;
use crate::engine::movegen::list_candidate_moves;
use crate::engine::moves::{CandidateMove, Move, MovePriority};
use crate::engine::normalize::{clone_state, normalize_state};
use crate::game::{GameState, VariantRules};

pub const DEFAULT_LIKELY_SOLVED_THRESHOLD: usize = 20;
pub const FALLBACK_BUDGET_DIVISOR: u64 = 4;

fn default_likely_solved_threshold() -> usize {
    DEFAULT_LIKELY_SOLVED_THRESHOLD
}

/// Budgets and mode for one check. `relaxed_search` selects the backtracking
/// search; otherwise the greedy pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLimits {
    pub max_states: usize,
    pub max_duration_ms: u64,
    #[serde(default)]
    pub relaxed_search: bool,
    #[serde(default = "default_likely_solved_threshold")]
    pub likely_solved_threshold: usize,
}

impl SearchLimits {
    pub const fn quick(max_states: usize, max_duration_ms: u64) -> Self {
        Self {
            max_states,
            max_duration_ms,
            relaxed_search: false,
            likely_solved_threshold: DEFAULT_LIKELY_SOLVED_THRESHOLD,
        }
    }

    pub const fn deep(max_states: usize, max_duration_ms: u64) -> Self {
        Self {
            relaxed_search: true,
            ..Self::quick(max_states, max_duration_ms)
        }
    }

    pub const fn with_threshold(self, likely_solved_threshold: usize) -> Self {
        Self {
            likely_solved_threshold,
            ..self
        }
    }

    /// Reduced budgets for a check that has to run on the caller's thread.
    pub fn for_fallback(self) -> Self {
        let divisor = FALLBACK_BUDGET_DIVISOR as usize;
        Self {
            max_states: (self.max_states / divisor).max(1),
            max_duration_ms: (self.max_duration_ms / FALLBACK_BUDGET_DIVISOR).max(1),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchReason {
    Solved,
    Exhausted,
    StateLimit,
    TimeLimit,
    CycleDetected,
    LikelySolved,
}

impl SearchReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchReason::Solved => "solved",
            SearchReason::Exhausted => "exhausted",
            SearchReason::StateLimit => "state-limit",
            SearchReason::TimeLimit => "time-limit",
            SearchReason::CycleDetected => "cycle-detected",
            SearchReason::LikelySolved => "likely-solved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub solved: bool,
    pub reason: SearchReason,
    pub states_explored: usize,
    pub duration_ms: u64,
    pub proven_unsolvable: bool,
    pub best_cards_cleared: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_moves: Option<Vec<Move>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_state_keys: Option<Vec<String>>,
}

/// Runs the check selected by `limits`. Never fails: running out of budget or
/// options is reported through [`SearchReason`].
pub fn check_solvable(
    state: &GameState,
    rules: &VariantRules,
    limits: &SearchLimits,
) -> SearchResult {
    debug!(
        game = rules.id,
        relaxed = limits.relaxed_search,
        max_states = limits.max_states,
        max_duration_ms = limits.max_duration_ms,
        "solvability check started"
    );
    let result = if limits.relaxed_search {
        deep_search(state, rules, limits)
    } else {
        quick_check(state, rules, limits)
    };
    debug!(
        game = rules.id,
        reason = result.reason.as_str(),
        states = result.states_explored,
        duration_ms = result.duration_ms,
        cleared = result.best_cards_cleared,
        "solvability check finished"
    );
    result
}

struct Budget {
    started: Instant,
    max_states: usize,
    max_duration_ms: u64,
}

impl Budget {
    fn new(limits: &SearchLimits) -> Self {
        Self {
            started: Instant::now(),
            max_states: limits.max_states,
            max_duration_ms: limits.max_duration_ms,
        }
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn exceeded(&self, explored: usize) -> Option<SearchReason> {
        if explored >= self.max_states {
            Some(SearchReason::StateLimit)
        } else if self.elapsed_ms() >= self.max_duration_ms {
            Some(SearchReason::TimeLimit)
        } else {
            None
        }
    }
}

fn unsolved(
    reason: SearchReason,
    explored: usize,
    best_cleared: usize,
    budget: &Budget,
    limits: &SearchLimits,
) -> SearchResult {
    let likely = best_cleared >= limits.likely_solved_threshold;
    SearchResult {
        solved: false,
        reason: if likely {
            SearchReason::LikelySolved
        } else {
            reason
        },
        states_explored: explored,
        duration_ms: budget.elapsed_ms(),
        proven_unsolvable: !likely && reason == SearchReason::Exhausted && limits.relaxed_search,
        best_cards_cleared: best_cleared,
        solution_moves: None,
        solution_state_keys: None,
    }
}

fn solved(
    explored: usize,
    best_cleared: usize,
    budget: &Budget,
    moves: Vec<Move>,
    keys: Vec<String>,
) -> SearchResult {
    SearchResult {
        solved: true,
        reason: SearchReason::Solved,
        states_explored: explored,
        duration_ms: budget.elapsed_ms(),
        proven_unsolvable: false,
        best_cards_cleared: best_cleared,
        solution_moves: Some(moves),
        solution_state_keys: Some(keys),
    }
}

/// The move the greedy pass takes: a removal when one exists, otherwise a
/// stock action.
fn greedy_pick(candidates: &[CandidateMove]) -> Option<Move> {
    candidates
        .iter()
        .find(|candidate| candidate.is_greedy_removal())
        .or_else(|| {
            candidates.iter().find(|candidate| {
                matches!(
                    candidate.priority,
                    MovePriority::Draw | MovePriority::Recycle
                )
            })
        })
        .map(|candidate| candidate.mv)
}

pub fn quick_check(state: &GameState, rules: &VariantRules, limits: &SearchLimits) -> SearchResult {
    let budget = Budget::new(limits);
    let mut current = clone_state(state);
    let root_key = normalize_state(&current);
    let mut seen: HashSet<String> = HashSet::from([root_key.clone()]);
    let mut moves: Vec<Move> = Vec::new();
    let mut keys = vec![root_key];
    let mut explored = 0_usize;
    let mut best_cleared = current.cards_cleared(rules);

    loop {
        if let Some(reason) = budget.exceeded(explored) {
            return unsolved(reason, explored, best_cleared, &budget, limits);
        }
        explored += 1;

        if current.is_solved(rules) {
            return solved(explored, best_cleared, &budget, moves, keys);
        }

        let candidates = list_candidate_moves(&current, rules);
        let Some(next) = greedy_pick(&candidates)
            .and_then(|mv| apply_move(&current, &mv, rules).map(|next| (mv, next)))
        else {
            return unsolved(SearchReason::Exhausted, explored, best_cleared, &budget, limits);
        };
        let (mv, next) = next;

        let key = normalize_state(&next);
        if !seen.insert(key.clone()) {
            // A repeat means the greedy line can only loop from here.
            return SearchResult {
                reason: SearchReason::CycleDetected,
                ..unsolved(SearchReason::CycleDetected, explored, best_cleared, &budget, limits)
            };
        }
        best_cleared = best_cleared.max(next.cards_cleared(rules));
        moves.push(mv);
        keys.push(key);
        current = next;
    }
}

struct Node {
    state: GameState,
    key: String,
    trail: Option<usize>,
    depth: u32,
}

struct Link {
    parent: Option<usize>,
    mv: Move,
    key: String,
}

#[derive(Default)]
struct Trail {
    links: Vec<Link>,
}

impl Trail {
    fn push(&mut self, parent: Option<usize>, mv: Move, key: String) -> usize {
        self.links.push(Link { parent, mv, key });
        self.links.len() - 1
    }

    fn unwind(&self, tip: Option<usize>, root_key: &str) -> (Vec<Move>, Vec<String>) {
        let mut moves = Vec::new();
        let mut keys = Vec::new();
        let mut cursor = tip;
        while let Some(index) = cursor {
            let Some(link) = self.links.get(index) else {
                break;
            };
            moves.push(link.mv);
            keys.push(link.key.clone());
            cursor = link.parent;
        }
        keys.push(root_key.to_string());
        moves.reverse();
        keys.reverse();
        (moves, keys)
    }
}

pub fn deep_search(state: &GameState, rules: &VariantRules, limits: &SearchLimits) -> SearchResult {
    let budget = Budget::new(limits);
    let root_key = normalize_state(state);
    let mut best_depth: HashMap<String, u32> = HashMap::new();
    let mut trail = Trail::default();
    let mut stack = vec![Node {
        state: clone_state(state),
        key: root_key.clone(),
        trail: None,
        depth: 0,
    }];
    let mut explored = 0_usize;
    let mut best_cleared = state.cards_cleared(rules);

    loop {
        let Some(node) = stack.pop() else {
            return unsolved(SearchReason::Exhausted, explored, best_cleared, &budget, limits);
        };
        if let Some(reason) = budget.exceeded(explored) {
            return unsolved(reason, explored, best_cleared, &budget, limits);
        }

        if best_depth
            .get(&node.key)
            .is_some_and(|depth| *depth <= node.depth)
        {
            continue;
        }
        best_depth.insert(node.key.clone(), node.depth);
        explored += 1;
        best_cleared = best_cleared.max(node.state.cards_cleared(rules));

        if node.state.is_solved(rules) {
            let (moves, keys) = trail.unwind(node.trail, &root_key);
            return solved(explored, best_cleared, &budget, moves, keys);
        }

        let child_depth = node.depth + 1;
        for candidate in list_candidate_moves(&node.state, rules).iter().rev() {
            let Some(next) = apply_move(&node.state, &candidate.mv, rules) else {
                continue;
            };
            let key = normalize_state(&next);
            if best_depth
                .get(&key)
                .is_some_and(|depth| *depth <= child_depth)
            {
                continue;
            }
            let link = trail.push(node.trail, candidate.mv, key.clone());
            stack.push(Node {
                state: next,
                key,
                trail: Some(link),
                depth: child_depth,
            });
        }
    }
}
