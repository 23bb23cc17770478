use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rules::VariantRules;
use super::{full_deck, rank_label_for, Card, GameState, Suit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub suit: String,
    #[serde(default)]
    pub val: String,
    pub rank: u8,
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tableau: Vec<Vec<CardRecord>>,
    #[serde(default)]
    pub foundations: Vec<Vec<CardRecord>>,
    #[serde(default)]
    pub cells: Vec<Option<CardRecord>>,
    #[serde(default)]
    pub stock: Vec<CardRecord>,
    #[serde(default)]
    pub waste: Vec<CardRecord>,
    #[serde(default)]
    pub recycles: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("unknown game `{0}`")]
    UnknownGame(String),
    #[error("unknown suit `{suit}` in {pile}")]
    BadSuit { pile: String, suit: String },
    #[error("rank {rank} out of range 1..={top_rank} in {pile}")]
    BadRank { pile: String, rank: u8, top_rank: u8 },
    #[error("{group}: expected {expected} piles, found {found}")]
    PileCount {
        group: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("snapshot holds {found} cards, deck has {expected}")]
    CardCount { expected: usize, found: usize },
    #[error("card {card} appears more often than the deck allows")]
    DuplicateCard { card: String },
}

impl CardRecord {
    pub fn from_card(card: &Card, top_rank: u8) -> Self {
        Self {
            suit: card.suit.symbol().to_string(),
            val: rank_label_for(card.rank, top_rank).to_string(),
            rank: card.rank,
            hidden: !card.face_up,
        }
    }

    fn decode(&self, pile: &str, rules: &VariantRules) -> Result<Card, SnapshotError> {
        let suit = Suit::from_symbol(&self.suit).ok_or_else(|| SnapshotError::BadSuit {
            pile: pile.to_string(),
            suit: self.suit.clone(),
        })?;
        if !(1..=rules.top_rank).contains(&self.rank) {
            return Err(SnapshotError::BadRank {
                pile: pile.to_string(),
                rank: self.rank,
                top_rank: rules.top_rank,
            });
        }
        Ok(Card {
            suit,
            rank: self.rank,
            face_up: !self.hidden,
        })
    }
}

impl Snapshot {
    pub fn from_state(state: &GameState, rules: &VariantRules) -> Self {
        let encode = |pile: &[Card]| {
            pile.iter()
                .map(|card| CardRecord::from_card(card, rules.top_rank))
                .collect::<Vec<_>>()
        };
        Self {
            tableau: state.tableau.iter().map(|pile| encode(pile)).collect(),
            foundations: state.foundations.iter().map(|pile| encode(pile)).collect(),
            cells: state
                .cells
                .iter()
                .map(|cell| {
                    cell.as_ref()
                        .map(|card| CardRecord::from_card(card, rules.top_rank))
                })
                .collect(),
            stock: encode(&state.stock),
            waste: encode(&state.waste),
            recycles: state.recycles,
        }
    }

    /// Decodes into an owned search state. A missing foundation group defaults
    /// to empty; the cards must make up exactly one copy of the variant's deck.
    pub fn to_state(&self, rules: &VariantRules) -> Result<GameState, SnapshotError> {
        if self.tableau.len() != rules.columns {
            return Err(SnapshotError::PileCount {
                group: "tableau",
                expected: rules.columns,
                found: self.tableau.len(),
            });
        }
        let mut state = GameState::empty(rules);

        for (col, pile) in self.tableau.iter().enumerate() {
            state.tableau[col] = decode_pile(pile, &format!("tableau {col}"), rules)?;
        }

        if !self.foundations.is_empty() {
            if self.foundations.len() != rules.foundations {
                return Err(SnapshotError::PileCount {
                    group: "foundations",
                    expected: rules.foundations,
                    found: self.foundations.len(),
                });
            }
            for (index, pile) in self.foundations.iter().enumerate() {
                state.foundations[index] =
                    decode_pile(pile, &format!("foundation {index}"), rules)?;
            }
        }

        if self.cells.len() != rules.cells {
            return Err(SnapshotError::PileCount {
                group: "cells",
                expected: rules.cells,
                found: self.cells.len(),
            });
        }
        for (index, cell) in self.cells.iter().enumerate() {
            state.cells[index] = cell
                .as_ref()
                .map(|record| record.decode(&format!("cell {index}"), rules))
                .transpose()?;
        }

        state.stock = decode_pile(&self.stock, "stock", rules)?;
        state.waste = decode_pile(&self.waste, "waste", rules)?;
        state.recycles = self.recycles;

        let found = state.card_count();
        if found != rules.deck_size() {
            return Err(SnapshotError::CardCount {
                expected: rules.deck_size(),
                found,
            });
        }
        check_deck(&state, rules)?;
        Ok(state)
    }
}

fn check_deck(state: &GameState, rules: &VariantRules) -> Result<(), SnapshotError> {
    let mut remaining: BTreeMap<(Suit, u8), usize> = BTreeMap::new();
    for card in full_deck(rules) {
        *remaining.entry(card.identity()).or_default() += 1;
    }
    for (suit, rank) in state.card_multiset() {
        match remaining.get_mut(&(suit, rank)) {
            Some(count) if *count > 0 => *count -= 1,
            _ => {
                let card = Card::new(suit, rank).label();
                return Err(SnapshotError::DuplicateCard { card });
            }
        }
    }
    Ok(())
}

fn decode_pile(
    records: &[CardRecord],
    pile: &str,
    rules: &VariantRules,
) -> Result<Vec<Card>, SnapshotError> {
    records
        .iter()
        .map(|record| record.decode(pile, rules))
        .collect()
}
