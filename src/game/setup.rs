use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::rules::{DealPattern, Layout, StockMode, VariantRules};
use super::*;

/// Deals a fresh game for `rules`; the same seed always yields the same deal.
pub fn deal(rules: &VariantRules, seed: u64) -> GameState {
    let mut deck = full_deck(rules);
    let mut rng = StdRng::seed_from_u64(seed);
    deck.shuffle(&mut rng);

    let mut game = GameState::empty(rules);
    let mut draw = deck.into_iter();

    match rules.deal {
        DealPattern::Triangle { extra_face_up } => {
            for (col, pile) in game.tableau.iter_mut().enumerate() {
                let depth = if col == 0 { 1 } else { col + 1 + extra_face_up };
                for row in 0..depth {
                    if let Some(mut card) = draw.next() {
                        card.face_up = row >= col;
                        pile.push(card);
                    }
                }
            }
        }
        DealPattern::Rows { rows } => {
            for _ in 0..rows {
                for pile in game.tableau.iter_mut() {
                    if let Some(card) = draw.next() {
                        pile.push(face_up(card));
                    }
                }
            }
        }
        DealPattern::RoundRobin { kings_to_bottom } => {
            let columns = game.tableau.len().max(1);
            for (index, card) in draw.by_ref().enumerate() {
                if let Some(pile) = game.tableau.get_mut(index % columns) {
                    pile.push(face_up(card));
                }
            }
            if kings_to_bottom {
                for pile in game.tableau.iter_mut() {
                    sink_kings(pile, rules.top_rank);
                }
            }
        }
        DealPattern::CoveredRows {
            covered_columns,
            covered_rows,
        } => {
            let reserve = match rules.stock_mode {
                StockMode::DealToColumns { columns } => columns,
                _ => 0,
            };
            let columns = game.tableau.len().max(1);
            let dealt = rules.deck_size().saturating_sub(reserve);
            for index in 0..dealt {
                let (row, col) = (index / columns, index % columns);
                let Some(mut card) = draw.next() else {
                    break;
                };
                card.face_up = !(col < covered_columns && row < covered_rows);
                if let Some(pile) = game.tableau.get_mut(col) {
                    pile.push(card);
                }
            }
        }
        DealPattern::Pyramid => {
            for slot in game.cells.iter_mut() {
                *slot = draw.next().map(face_up);
            }
        }
    }

    if rules.layout == Layout::Golf {
        if let Some(card) = draw.next() {
            game.waste.push(face_up(card));
        }
    }

    for mut card in draw {
        card.face_up = false;
        game.stock.push(card);
    }

    game
}

fn sink_kings(pile: &mut Vec<Card>, top_rank: u8) {
    let (mut kings, others): (Vec<Card>, Vec<Card>) =
        pile.drain(..).partition(|card| card.rank == top_rank);
    kings.extend(others);
    *pile = kings;
}

fn face_up(mut card: Card) -> Card {
    card.face_up = true;
    card
}

pub fn full_deck(rules: &VariantRules) -> Vec<Card> {
    let mut deck = Vec::with_capacity(rules.deck_size());
    for _ in 0..rules.decks {
        for suit in Suit::ALL {
            for rank in 1..=rules.top_rank {
                deck.push(Card::hidden(suit, rank));
            }
        }
    }
    deck
}
