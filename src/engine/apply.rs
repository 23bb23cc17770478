use crate::engine::moves::{Move, PileRef};
use crate::engine::normalize::clone_state;
use crate::game::{
    can_fill_empty, can_place_on_foundation, can_stack_on_tableau, is_complete_run,
    is_valid_sequence, pyramid_exposed, ranks_adjacent, supermove_limit, Card, FoundationMode,
    GameState, Layout, StockMode, VariantRules,
};

/// Applies `mv` to a copy of `state`. Returns `None` when the move is not legal
/// against this state; the input is never modified.
pub fn apply_move(state: &GameState, mv: &Move, rules: &VariantRules) -> Option<GameState> {
    let mut next = clone_state(state);
    let applied = match *mv {
        Move::TableauToTableau { src, dst, count } => {
            move_tableau_run(&mut next, rules, src, dst, count)
        }
        Move::ToFoundation { from, foundation } => match rules.foundation_mode {
            FoundationMode::Ascending => move_to_foundation(&mut next, rules, from, foundation),
            FoundationMode::CompleteRun => lift_complete_run(&mut next, rules, from, foundation),
        },
        Move::WasteToTableau { dst } => move_waste_to_tableau(&mut next, rules, dst),
        Move::TableauToCell { src, cell } => move_tableau_to_cell(&mut next, rules, src, cell),
        Move::CellToTableau { cell, dst } => move_cell_to_tableau(&mut next, rules, cell, dst),
        Move::DrawStock => draw_stock(&mut next, rules),
        Move::DealStock => deal_stock(&mut next, rules),
        Move::RecycleWaste => recycle_waste(&mut next, rules),
        Move::RemoveExposed { first, second } => match rules.layout {
            Layout::Golf if second.is_none() => remove_to_golf_waste(&mut next, rules, first),
            Layout::Pyramid => remove_pyramid_cards(&mut next, rules, first, second),
            _ => false,
        },
    };
    applied.then_some(next)
}

pub(crate) fn accepts_on_tableau(
    state: &GameState,
    rules: &VariantRules,
    dst: usize,
    card: &Card,
) -> bool {
    match state.tableau.get(dst) {
        None => false,
        Some(pile) if pile.is_empty() => can_fill_empty(card, rules),
        Some(pile) => can_stack_on_tableau(pile.last(), card, rules.build_mode, rules),
    }
}

pub(crate) fn foundation_for(
    state: &GameState,
    rules: &VariantRules,
    card: &Card,
) -> Option<usize> {
    let started = state
        .foundations
        .iter()
        .position(|pile| !pile.is_empty() && can_place_on_foundation(card, pile, rules));
    started.or_else(|| {
        state
            .foundations
            .iter()
            .position(|pile| pile.is_empty() && can_place_on_foundation(card, pile, rules))
    })
}

pub(crate) fn run_limit(state: &GameState, rules: &VariantRules, dst: usize) -> usize {
    if !rules.supermove {
        return usize::MAX;
    }
    let dst_empty = state.tableau_len(dst) == Some(0);
    supermove_limit(state.free_cells(), state.empty_columns(), dst_empty)
}

fn move_tableau_run(
    state: &mut GameState,
    rules: &VariantRules,
    src: usize,
    dst: usize,
    count: usize,
) -> bool {
    if rules.layout != Layout::Tableau || src == dst || dst >= state.tableau.len() {
        return false;
    }
    let Some(len) = state.tableau_len(src) else {
        return false;
    };
    if count == 0 || count > len || count > run_limit(state, rules, dst) {
        return false;
    }
    let start = len - count;
    let run = &state.tableau[src][start..];
    if !is_valid_sequence(run, rules.sequence_mode, rules) {
        return false;
    }
    let lead = run[0];
    if !accepts_on_tableau(state, rules, dst, &lead) {
        return false;
    }

    let moved = state.tableau[src].split_off(start);
    state.tableau[dst].extend(moved);
    state.reveal_tableau_top(src);
    true
}

fn top_of(state: &GameState, from: PileRef) -> Option<Card> {
    match from {
        PileRef::Tableau(col) => state.tableau_top(col).copied(),
        PileRef::Cell(cell) => state.cell(cell).copied(),
        PileRef::Waste => state.waste_top().copied(),
    }
}

fn take_top(state: &mut GameState, from: PileRef) -> Option<Card> {
    match from {
        PileRef::Tableau(col) => {
            let card = state.tableau.get_mut(col)?.pop()?;
            state.reveal_tableau_top(col);
            Some(card)
        }
        PileRef::Cell(cell) => state.cells.get_mut(cell)?.take(),
        PileRef::Waste => state.waste.pop(),
    }
}

fn move_to_foundation(
    state: &mut GameState,
    rules: &VariantRules,
    from: PileRef,
    foundation: usize,
) -> bool {
    if rules.layout != Layout::Tableau {
        return false;
    }
    let Some(card) = top_of(state, from) else {
        return false;
    };
    let Some(pile) = state.foundations.get(foundation) else {
        return false;
    };
    if !can_place_on_foundation(&card, pile, rules) {
        return false;
    }
    let Some(card) = take_top(state, from) else {
        return false;
    };
    state.foundations[foundation].push(card);
    true
}

fn lift_complete_run(
    state: &mut GameState,
    rules: &VariantRules,
    from: PileRef,
    foundation: usize,
) -> bool {
    let PileRef::Tableau(col) = from else {
        return false;
    };
    if state.foundations.get(foundation).map(Vec::is_empty) != Some(true) {
        return false;
    }
    let run_len = rules.foundation_complete_len();
    let Some(len) = state.tableau_len(col) else {
        return false;
    };
    if len < run_len || !is_complete_run(&state.tableau[col][len - run_len..], rules) {
        return false;
    }

    let mut run = state.tableau[col].split_off(len - run_len);
    run.reverse();
    state.foundations[foundation] = run;
    state.reveal_tableau_top(col);
    true
}

fn move_waste_to_tableau(state: &mut GameState, rules: &VariantRules, dst: usize) -> bool {
    if !rules.waste_to_tableau {
        return false;
    }
    let Some(card) = state.waste_top().copied() else {
        return false;
    };
    if !accepts_on_tableau(state, rules, dst, &card) {
        return false;
    }
    state.waste.pop();
    state.tableau[dst].push(card);
    true
}

fn move_tableau_to_cell(
    state: &mut GameState,
    rules: &VariantRules,
    src: usize,
    cell: usize,
) -> bool {
    if rules.layout != Layout::Tableau || state.cells.get(cell) != Some(&None) {
        return false;
    }
    let Some(card) = state.tableau_top(src).copied() else {
        return false;
    };
    if !card.face_up {
        return false;
    }
    state.tableau[src].pop();
    state.reveal_tableau_top(src);
    state.cells[cell] = Some(card);
    true
}

fn move_cell_to_tableau(
    state: &mut GameState,
    rules: &VariantRules,
    cell: usize,
    dst: usize,
) -> bool {
    if rules.layout != Layout::Tableau {
        return false;
    }
    let Some(card) = state.cell(cell).copied() else {
        return false;
    };
    if !accepts_on_tableau(state, rules, dst, &card) {
        return false;
    }
    state.cells[cell] = None;
    state.tableau[dst].push(card);
    true
}

fn draw_stock(state: &mut GameState, rules: &VariantRules) -> bool {
    let StockMode::ToWaste { draw } = rules.stock_mode else {
        return false;
    };
    if state.stock.is_empty() {
        return false;
    }
    for _ in 0..draw.max(1) {
        let Some(mut card) = state.stock.pop() else {
            break;
        };
        card.face_up = true;
        state.waste.push(card);
    }
    true
}

fn deal_stock(state: &mut GameState, rules: &VariantRules) -> bool {
    let StockMode::DealToColumns { columns } = rules.stock_mode else {
        return false;
    };
    if state.stock.is_empty() || state.tableau.is_empty() {
        return false;
    }
    for pile in state.tableau.iter_mut().take(columns) {
        let Some(mut card) = state.stock.pop() else {
            break;
        };
        card.face_up = true;
        pile.push(card);
    }
    true
}

fn recycle_waste(state: &mut GameState, rules: &VariantRules) -> bool {
    if !state.stock.is_empty() || state.waste.is_empty() || !rules.can_recycle(state.recycles) {
        return false;
    }
    while let Some(mut card) = state.waste.pop() {
        card.face_up = false;
        state.stock.push(card);
    }
    if rules.max_recycles.is_some() {
        state.recycles += 1;
    }
    true
}

fn remove_to_golf_waste(state: &mut GameState, rules: &VariantRules, from: PileRef) -> bool {
    let PileRef::Tableau(col) = from else {
        return false;
    };
    let Some(card) = state.tableau_top(col).copied() else {
        return false;
    };
    let playable = state
        .waste_top()
        .map(|top| ranks_adjacent(top.rank, card.rank, rules.top_rank, rules.wrap_ranks))
        .unwrap_or(true);
    if !card.face_up || !playable {
        return false;
    }
    state.tableau[col].pop();
    state.waste.push(card);
    true
}

fn pyramid_card(state: &GameState, pile: PileRef) -> Option<Card> {
    match pile {
        PileRef::Cell(slot) if pyramid_exposed(&state.cells, slot) => state.cell(slot).copied(),
        PileRef::Waste => state.waste_top().copied(),
        _ => None,
    }
}

fn remove_pyramid_cards(
    state: &mut GameState,
    rules: &VariantRules,
    first: PileRef,
    second: Option<PileRef>,
) -> bool {
    if state.foundations.is_empty() || Some(first) == second {
        return false;
    }
    let Some(first_card) = pyramid_card(state, first) else {
        return false;
    };
    let total = match second {
        None => Some(first_card.rank),
        Some(pile) => match pyramid_card(state, pile) {
            Some(card) => first_card.rank.checked_add(card.rank),
            None => return false,
        },
    };
    if total != Some(rules.top_rank) {
        return false;
    }

    for pile in std::iter::once(first).chain(second) {
        let Some(mut card) = take_top(state, pile) else {
            return false;
        };
        card.face_up = true;
        state.foundations[0].push(card);
    }
    true
}
