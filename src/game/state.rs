use super::rules::{Layout, VariantRules};
use super::variants::{GOLF_COLUMN_DEPTH, PYRAMID_ROWS};
use super::{Card, Suit};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    pub tableau: Vec<Vec<Card>>,
    pub foundations: Vec<Vec<Card>>,
    pub cells: Vec<Option<Card>>,
    pub stock: Vec<Card>,
    pub waste: Vec<Card>,
    /// Waste recycles used; only counted when the variant limits them.
    pub recycles: u32,
    /// Highest rank of the deck in play, 14 when knights are dealt.
    pub top_rank: u8,
}

impl GameState {
    pub fn empty(rules: &VariantRules) -> Self {
        Self {
            tableau: vec![Vec::new(); rules.columns],
            foundations: vec![Vec::new(); rules.foundations],
            cells: vec![None; rules.cells],
            stock: Vec::new(),
            waste: Vec::new(),
            recycles: 0,
            top_rank: rules.top_rank,
        }
    }

    pub fn tableau_top(&self, col: usize) -> Option<&Card> {
        self.tableau.get(col).and_then(|pile| pile.last())
    }

    pub fn tableau_len(&self, col: usize) -> Option<usize> {
        self.tableau.get(col).map(Vec::len)
    }

    pub fn waste_top(&self) -> Option<&Card> {
        self.waste.last()
    }

    pub fn cell(&self, index: usize) -> Option<&Card> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    pub fn free_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn empty_columns(&self) -> usize {
        self.tableau.iter().filter(|pile| pile.is_empty()).count()
    }

    pub fn hidden_tableau_count(&self) -> usize {
        self.tableau
            .iter()
            .flat_map(|pile| pile.iter())
            .filter(|card| !card.face_up)
            .count()
    }

    pub fn tableau_card_count(&self) -> usize {
        self.tableau.iter().map(Vec::len).sum()
    }

    pub fn foundation_card_count(&self) -> usize {
        self.foundations.iter().map(Vec::len).sum()
    }

    pub fn card_count(&self) -> usize {
        self.tableau_card_count()
            + self.foundation_card_count()
            + self.cells.iter().flatten().count()
            + self.stock.len()
            + self.waste.len()
    }

    pub fn card_multiset(&self) -> Vec<(Suit, u8)> {
        let mut cards: Vec<(Suit, u8)> = self
            .tableau
            .iter()
            .chain(self.foundations.iter())
            .flat_map(|pile| pile.iter())
            .chain(self.cells.iter().flatten())
            .chain(self.stock.iter())
            .chain(self.waste.iter())
            .map(Card::identity)
            .collect();
        cards.sort();
        cards
    }

    /// Progress measure behind the "likely solved" classification.
    pub fn cards_cleared(&self, rules: &VariantRules) -> usize {
        match rules.layout {
            Layout::Tableau | Layout::Pyramid => self.foundation_card_count(),
            Layout::Golf => (rules.columns * GOLF_COLUMN_DEPTH)
                .saturating_sub(self.tableau_card_count()),
        }
    }

    pub fn is_solved(&self, rules: &VariantRules) -> bool {
        match rules.layout {
            Layout::Tableau => {
                self.tableau.iter().all(Vec::is_empty)
                    && self.cells.iter().all(Option::is_none)
                    && self.stock.is_empty()
                    && self.waste.is_empty()
            }
            Layout::Golf => self.tableau.iter().all(Vec::is_empty),
            Layout::Pyramid => self.cells.iter().all(Option::is_none),
        }
    }

    pub(crate) fn reveal_tableau_top(&mut self, col: usize) {
        if let Some(card) = self.tableau.get_mut(col).and_then(|pile| pile.last_mut()) {
            card.face_up = true;
        }
    }
}

pub fn pyramid_coords(slot: usize) -> Option<(usize, usize)> {
    let mut start = 0;
    for row in 0..PYRAMID_ROWS {
        let width = row + 1;
        if slot < start + width {
            return Some((row, slot - start));
        }
        start += width;
    }
    None
}

pub fn pyramid_slot(row: usize, pos: usize) -> Option<usize> {
    if row >= PYRAMID_ROWS || pos > row {
        return None;
    }
    Some(row * (row + 1) / 2 + pos)
}

/// A pyramid card is exposed once both cards overlapping it are gone.
pub fn pyramid_exposed(cells: &[Option<Card>], slot: usize) -> bool {
    if cells.get(slot).and_then(Option::as_ref).is_none() {
        return false;
    }
    let Some((row, pos)) = pyramid_coords(slot) else {
        return false;
    };
    let covered = |child_pos: usize| {
        pyramid_slot(row + 1, child_pos)
            .and_then(|child| cells.get(child))
            .map(Option::is_some)
            .unwrap_or(false)
    };
    !covered(pos) && !covered(pos + 1)
}
