use crate::engine::apply::{accepts_on_tableau, foundation_for, run_limit};
use crate::engine::moves::{CandidateMove, Move, MovePriority, PileRef};
use crate::game::{
    can_stack_on_tableau, is_complete_run, pyramid_exposed, ranks_adjacent, BuildMode, Card,
    FoundationMode, GameState, Layout, SequenceMode, StockMode, VariantRules,
};

/// Every legal move from `state`, stably sorted by [`MovePriority`]. Within a
/// band the order is the fixed generation order, so the list is deterministic.
pub fn list_candidate_moves(state: &GameState, rules: &VariantRules) -> Vec<CandidateMove> {
    let mut moves = Vec::new();
    match rules.layout {
        Layout::Tableau => {
            foundation_moves(state, rules, &mut moves);
            tableau_run_moves(state, rules, &mut moves);
            waste_to_tableau_moves(state, rules, &mut moves);
            cell_moves(state, rules, &mut moves);
        }
        Layout::Golf => golf_moves(state, rules, &mut moves),
        Layout::Pyramid => pyramid_moves(state, rules, &mut moves),
    }
    stock_moves(state, rules, &mut moves);
    moves.sort_by_key(|candidate| candidate.priority);
    moves
}

fn push(moves: &mut Vec<CandidateMove>, mv: Move, priority: MovePriority) {
    moves.push(CandidateMove::new(mv, priority));
}

fn foundation_moves(state: &GameState, rules: &VariantRules, moves: &mut Vec<CandidateMove>) {
    if rules.foundation_mode == FoundationMode::CompleteRun {
        let run_len = rules.foundation_complete_len();
        let Some(foundation) = state.foundations.iter().position(Vec::is_empty) else {
            return;
        };
        for (col, pile) in state.tableau.iter().enumerate() {
            if pile.len() >= run_len && is_complete_run(&pile[pile.len() - run_len..], rules) {
                let from = PileRef::Tableau(col);
                push(moves, Move::ToFoundation { from, foundation }, MovePriority::Foundation);
            }
        }
        return;
    }

    let mut sources: Vec<(PileRef, Card)> = Vec::new();
    for (col, pile) in state.tableau.iter().enumerate() {
        if let Some(card) = pile.last() {
            sources.push((PileRef::Tableau(col), *card));
        }
    }
    if let Some(card) = state.waste_top() {
        sources.push((PileRef::Waste, *card));
    }
    for (cell, slot) in state.cells.iter().enumerate() {
        if let Some(card) = slot {
            sources.push((PileRef::Cell(cell), *card));
        }
    }

    for (from, card) in sources {
        if let Some(foundation) = foundation_for(state, rules, &card) {
            push(moves, Move::ToFoundation { from, foundation }, MovePriority::Foundation);
        }
    }
}

fn movable_run_start(pile: &[Card], rules: &VariantRules) -> Option<usize> {
    let top = pile.len().checked_sub(1)?;
    if !pile[top].face_up {
        return None;
    }
    let mut start = top;
    match rules.sequence_mode {
        SequenceMode::SingleCard => {}
        SequenceMode::AnyFaceUp => {
            while start > 0 && pile[start - 1].face_up {
                start -= 1;
            }
        }
        SequenceMode::Suit | SequenceMode::Alternating => {
            let build_mode = match rules.sequence_mode {
                SequenceMode::Suit => BuildMode::Suit,
                _ => BuildMode::Alternating,
            };
            while start > 0
                && can_stack_on_tableau(Some(&pile[start - 1]), &pile[start], build_mode, rules)
            {
                start -= 1;
            }
        }
    }
    Some(start)
}

fn tableau_run_moves(state: &GameState, rules: &VariantRules, moves: &mut Vec<CandidateMove>) {
    for (src, pile) in state.tableau.iter().enumerate() {
        let Some(run_start) = movable_run_start(pile, rules) else {
            continue;
        };
        for start in run_start..pile.len() {
            let lead = &pile[start];
            let count = pile.len() - start;
            let exposes = start == 0 || !pile[start - 1].face_up;
            let priority = if exposes {
                MovePriority::Reveal
            } else {
                MovePriority::Shuffle
            };

            let mut tried_empty = false;
            for dst in 0..state.tableau.len() {
                if dst == src {
                    continue;
                }
                let dst_empty = state.tableau[dst].is_empty();
                if dst_empty {
                    // A whole column into an empty one changes nothing; one empty
                    // target stands for all of them.
                    if start == 0 || tried_empty {
                        continue;
                    }
                    tried_empty = true;
                }
                if count > run_limit(state, rules, dst)
                    || !accepts_on_tableau(state, rules, dst, lead)
                {
                    continue;
                }
                push(moves, Move::TableauToTableau { src, dst, count }, priority);
            }
        }
    }
}

fn waste_to_tableau_moves(state: &GameState, rules: &VariantRules, moves: &mut Vec<CandidateMove>) {
    if !rules.waste_to_tableau {
        return;
    }
    let Some(card) = state.waste_top() else {
        return;
    };
    let mut tried_empty = false;
    for dst in 0..state.tableau.len() {
        if state.tableau[dst].is_empty() {
            if tried_empty {
                continue;
            }
            tried_empty = true;
        }
        if accepts_on_tableau(state, rules, dst, card) {
            push(moves, Move::WasteToTableau { dst }, MovePriority::Shuffle);
        }
    }
}

fn cell_moves(state: &GameState, rules: &VariantRules, moves: &mut Vec<CandidateMove>) {
    if state.cells.is_empty() {
        return;
    }

    for (cell, slot) in state.cells.iter().enumerate() {
        let Some(card) = slot else {
            continue;
        };
        let mut tried_empty = false;
        for dst in 0..state.tableau.len() {
            if state.tableau[dst].is_empty() {
                if tried_empty {
                    continue;
                }
                tried_empty = true;
            }
            if accepts_on_tableau(state, rules, dst, card) {
                push(moves, Move::CellToTableau { cell, dst }, MovePriority::Shuffle);
            }
        }
    }

    let Some(cell) = state.cells.iter().position(Option::is_none) else {
        return;
    };
    for (src, pile) in state.tableau.iter().enumerate() {
        let Some(top) = pile.last() else {
            continue;
        };
        if !top.face_up {
            continue;
        }
        let exposes = pile.len() >= 2 && !pile[pile.len() - 2].face_up;
        let priority = if exposes {
            MovePriority::Reveal
        } else {
            MovePriority::Shuffle
        };
        push(moves, Move::TableauToCell { src, cell }, priority);
    }
}

fn golf_moves(state: &GameState, rules: &VariantRules, moves: &mut Vec<CandidateMove>) {
    let waste_top = state.waste_top();
    for (col, pile) in state.tableau.iter().enumerate() {
        let Some(card) = pile.last() else {
            continue;
        };
        let playable = waste_top
            .map(|top| ranks_adjacent(top.rank, card.rank, rules.top_rank, rules.wrap_ranks))
            .unwrap_or(true);
        if card.face_up && playable {
            let mv = Move::RemoveExposed {
                first: PileRef::Tableau(col),
                second: None,
            };
            push(moves, mv, MovePriority::Foundation);
        }
    }
}

fn pyramid_moves(state: &GameState, rules: &VariantRules, moves: &mut Vec<CandidateMove>) {
    let mut exposed: Vec<(PileRef, u8)> = (0..state.cells.len())
        .filter(|slot| pyramid_exposed(&state.cells, *slot))
        .filter_map(|slot| state.cell(slot).map(|card| (PileRef::Cell(slot), card.rank)))
        .collect();
    if let Some(card) = state.waste_top() {
        exposed.push((PileRef::Waste, card.rank));
    }

    for (index, (first, rank)) in exposed.iter().enumerate() {
        if *rank == rules.top_rank {
            let mv = Move::RemoveExposed {
                first: *first,
                second: None,
            };
            push(moves, mv, MovePriority::Foundation);
            continue;
        }
        for (second, other) in exposed.iter().skip(index + 1) {
            if rank.checked_add(*other) == Some(rules.top_rank) {
                let mv = Move::RemoveExposed {
                    first: *first,
                    second: Some(*second),
                };
                push(moves, mv, MovePriority::Foundation);
            }
        }
    }
}

fn stock_moves(state: &GameState, rules: &VariantRules, moves: &mut Vec<CandidateMove>) {
    match rules.stock_mode {
        StockMode::None => {}
        StockMode::ToWaste { .. } => {
            if !state.stock.is_empty() {
                push(moves, Move::DrawStock, MovePriority::Draw);
            } else if !state.waste.is_empty() && rules.can_recycle(state.recycles) {
                push(moves, Move::RecycleWaste, MovePriority::Recycle);
            }
        }
        StockMode::DealToColumns { .. } => {
            if !state.stock.is_empty() && !state.tableau.is_empty() {
                push(moves, Move::DealStock, MovePriority::Draw);
            }
        }
    }
}
