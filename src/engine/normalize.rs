use crate::game::{Card, GameState};

const RANK_KEYS: &[u8] = b"A23456789TJQK";
const KNIGHT_RANK_KEYS: &[u8] = b"A23456789TJNQK";
const HIDDEN_TOKEN: &str = "##";
const EMPTY_CELL_TOKEN: &str = "..";
const PILE_SEPARATOR: char = '|';
const GROUP_SEPARATOR: char = '/';

pub fn clone_state(state: &GameState) -> GameState {
    state.clone()
}

/// Serializes every pile group in a fixed order. Two states with the same
/// arrangement always produce the same key.
pub fn normalize_state(state: &GameState) -> String {
    let capacity = state.card_count() * 2 + state.tableau.len() + state.foundations.len() + 16;
    let mut key = String::with_capacity(capacity);
    let ranks = if state.top_rank == 14 {
        KNIGHT_RANK_KEYS
    } else {
        RANK_KEYS
    };

    push_piles(&mut key, &state.foundations, ranks);
    key.push(GROUP_SEPARATOR);
    push_piles(&mut key, &state.tableau, ranks);
    key.push(GROUP_SEPARATOR);
    for (index, cell) in state.cells.iter().enumerate() {
        if index > 0 {
            key.push(PILE_SEPARATOR);
        }
        match cell {
            Some(card) => push_card(&mut key, card, ranks),
            None => key.push_str(EMPTY_CELL_TOKEN),
        }
    }
    key.push(GROUP_SEPARATOR);
    push_pile(&mut key, &state.stock, ranks);
    key.push(GROUP_SEPARATOR);
    push_pile(&mut key, &state.waste, ranks);
    key.push(GROUP_SEPARATOR);
    key.push_str(&state.recycles.to_string());
    key
}

fn push_piles(key: &mut String, piles: &[Vec<Card>], ranks: &[u8]) {
    for (index, pile) in piles.iter().enumerate() {
        if index > 0 {
            key.push(PILE_SEPARATOR);
        }
        push_pile(key, pile, ranks);
    }
}

fn push_pile(key: &mut String, pile: &[Card], ranks: &[u8]) {
    for card in pile {
        push_card(key, card, ranks);
    }
}

fn push_card(key: &mut String, card: &Card, ranks: &[u8]) {
    if !card.face_up {
        key.push_str(HIDDEN_TOKEN);
        return;
    }
    let rank = usize::from(card.rank)
        .checked_sub(1)
        .and_then(|index| ranks.get(index))
        .map(|byte| char::from(*byte))
        .unwrap_or('?');
    key.push(rank);
    key.push_str(card.suit.short());
}
