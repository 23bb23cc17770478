use super::{Card, Suit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Tableau,
    Golf,
    Pyramid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildMode {
    Suit,
    Alternating,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceMode {
    SingleCard,
    Suit,
    Alternating,
    AnyFaceUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmptyFill {
    AnyCard,
    KingOnly,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoundationMode {
    Ascending,
    /// Whole king-to-ace suit runs lifted off the tableau at once.
    CompleteRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockMode {
    None,
    ToWaste { draw: u8 },
    DealToColumns { columns: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealPattern {
    /// Column `n` gets `n` face-down cards under one face-up card; every column
    /// after the first also gets `extra_face_up` more.
    Triangle { extra_face_up: usize },
    Rows { rows: usize },
    RoundRobin { kings_to_bottom: bool },
    /// Full rows, except the top-left block which is dealt face down.
    CoveredRows {
        covered_columns: usize,
        covered_rows: usize,
    },
    Pyramid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantRules {
    pub id: &'static str,
    pub label: &'static str,
    pub layout: Layout,
    pub deal: DealPattern,
    pub build_mode: BuildMode,
    pub sequence_mode: SequenceMode,
    pub empty_fill: EmptyFill,
    pub foundation_mode: FoundationMode,
    pub foundation_start: u8,
    pub top_rank: u8,
    pub foundations: usize,
    pub columns: usize,
    pub cells: usize,
    pub stock_mode: StockMode,
    /// `None` allows unlimited recycles.
    pub max_recycles: Option<u32>,
    pub waste_to_tableau: bool,
    /// FreeCell run limit: `(free cells + 1) * 2^(empty columns)`.
    pub supermove: bool,
    pub wrap_ranks: bool,
    pub decks: u8,
}

impl VariantRules {
    pub fn deck_size(&self) -> usize {
        usize::from(self.decks) * Suit::ALL.len() * usize::from(self.top_rank)
    }

    pub fn can_recycle(&self, recycles_used: u32) -> bool {
        match self.stock_mode {
            StockMode::ToWaste { .. } => self
                .max_recycles
                .map(|limit| recycles_used < limit)
                .unwrap_or(true),
            _ => false,
        }
    }

    pub fn foundation_complete_len(&self) -> usize {
        usize::from(self.top_rank.saturating_sub(self.foundation_start)) + 1
    }
}

fn rank_in_range(card: &Card, rules: &VariantRules) -> bool {
    (1..=rules.top_rank).contains(&card.rank)
}

/// `lower` sits directly below `upper` in rank, optionally wrapping Ace under King.
pub fn descends(upper: u8, lower: u8, top_rank: u8, wrap: bool) -> bool {
    if lower.checked_add(1) == Some(upper) {
        return true;
    }
    wrap && upper == 1 && lower == top_rank
}

pub fn ranks_adjacent(a: u8, b: u8, top_rank: u8, wrap: bool) -> bool {
    let valid = 1..=top_rank;
    if !valid.contains(&a) || !valid.contains(&b) {
        return false;
    }
    descends(a, b, top_rank, wrap) || descends(b, a, top_rank, wrap)
}

pub fn can_place_on_foundation(card: &Card, pile: &[Card], rules: &VariantRules) -> bool {
    if !card.face_up || !rank_in_range(card, rules) {
        return false;
    }
    match pile.last() {
        None => card.rank == rules.foundation_start,
        Some(top) => {
            top.suit == card.suit && top.rank < rules.top_rank && card.rank == top.rank + 1
        }
    }
}

pub fn can_stack_on_tableau(
    target: Option<&Card>,
    moving: &Card,
    build_mode: BuildMode,
    rules: &VariantRules,
) -> bool {
    let Some(target) = target else {
        return false;
    };
    if !target.face_up || !moving.face_up {
        return false;
    }
    // Out-of-range ranks never stack.
    if !rank_in_range(target, rules) || !rank_in_range(moving, rules) {
        return false;
    }
    if !descends(target.rank, moving.rank, rules.top_rank, rules.wrap_ranks) {
        return false;
    }
    match build_mode {
        BuildMode::Suit => target.suit == moving.suit,
        BuildMode::Alternating => target.color() != moving.color(),
        BuildMode::Any => true,
    }
}

pub fn can_fill_empty(card: &Card, rules: &VariantRules) -> bool {
    if !card.face_up || !rank_in_range(card, rules) {
        return false;
    }
    match rules.empty_fill {
        EmptyFill::AnyCard => true,
        EmptyFill::KingOnly => card.rank == rules.top_rank,
        EmptyFill::None => false,
    }
}

pub fn is_valid_sequence(
    cards: &[Card],
    sequence_mode: SequenceMode,
    rules: &VariantRules,
) -> bool {
    if cards.is_empty() || cards.iter().any(|card| !card.face_up) {
        return false;
    }
    let linked = |build_mode: BuildMode| {
        cards
            .windows(2)
            .all(|pair| can_stack_on_tableau(Some(&pair[0]), &pair[1], build_mode, rules))
    };
    if !cards.iter().all(|card| rank_in_range(card, rules)) {
        return false;
    }
    match sequence_mode {
        SequenceMode::SingleCard => cards.len() == 1,
        SequenceMode::Suit => linked(BuildMode::Suit),
        SequenceMode::Alternating => linked(BuildMode::Alternating),
        SequenceMode::AnyFaceUp => true,
    }
}

pub fn is_complete_run(cards: &[Card], rules: &VariantRules) -> bool {
    cards.len() == rules.foundation_complete_len()
        && cards.first().map(|card| card.rank) == Some(rules.top_rank)
        && is_valid_sequence(cards, SequenceMode::Suit, rules)
}

pub fn supermove_limit(free_cells: usize, empty_columns: usize, dst_empty: bool) -> usize {
    let columns = if dst_empty {
        empty_columns.saturating_sub(1)
    } else {
        empty_columns
    };
    (free_cells + 1).saturating_mul(1_usize << columns.min(16))
}
