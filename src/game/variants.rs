use super::rules::{
    BuildMode, DealPattern, EmptyFill, FoundationMode, Layout, SequenceMode, StockMode,
    VariantRules,
};

pub const KLONDIKE: VariantRules = VariantRules {
    id: "klondike",
    label: "Klondike",
    layout: Layout::Tableau,
    deal: DealPattern::Triangle { extra_face_up: 0 },
    build_mode: BuildMode::Alternating,
    sequence_mode: SequenceMode::Alternating,
    empty_fill: EmptyFill::KingOnly,
    foundation_mode: FoundationMode::Ascending,
    foundation_start: 1,
    top_rank: 13,
    foundations: 4,
    columns: 7,
    cells: 0,
    stock_mode: StockMode::ToWaste { draw: 1 },
    max_recycles: None,
    waste_to_tableau: true,
    supermove: false,
    wrap_ranks: false,
    decks: 1,
};

pub const KLONDIKE_DRAW_THREE: VariantRules = VariantRules {
    id: "klondike-3",
    label: "Klondike (Draw 3)",
    stock_mode: StockMode::ToWaste { draw: 3 },
    ..KLONDIKE
};

pub const FREECELL: VariantRules = VariantRules {
    id: "freecell",
    label: "FreeCell",
    deal: DealPattern::RoundRobin {
        kings_to_bottom: false,
    },
    empty_fill: EmptyFill::AnyCard,
    columns: 8,
    cells: 4,
    stock_mode: StockMode::None,
    waste_to_tableau: false,
    supermove: true,
    ..KLONDIKE
};

pub const BAKERS_DOZEN: VariantRules = VariantRules {
    id: "bakers-dozen",
    label: "Baker's Dozen",
    deal: DealPattern::RoundRobin {
        kings_to_bottom: true,
    },
    build_mode: BuildMode::Any,
    sequence_mode: SequenceMode::SingleCard,
    empty_fill: EmptyFill::None,
    columns: 13,
    stock_mode: StockMode::None,
    waste_to_tableau: false,
    ..KLONDIKE
};

pub const FORTY_THIEVES: VariantRules = VariantRules {
    id: "forty-thieves",
    label: "Forty Thieves",
    deal: DealPattern::Rows { rows: 4 },
    build_mode: BuildMode::Suit,
    sequence_mode: SequenceMode::SingleCard,
    empty_fill: EmptyFill::AnyCard,
    foundations: 8,
    columns: 10,
    max_recycles: Some(0),
    decks: 2,
    ..KLONDIKE
};

pub const SCORPION: VariantRules = VariantRules {
    id: "scorpion",
    label: "Scorpion",
    deal: DealPattern::CoveredRows {
        covered_columns: 4,
        covered_rows: 3,
    },
    build_mode: BuildMode::Suit,
    sequence_mode: SequenceMode::AnyFaceUp,
    foundation_mode: FoundationMode::CompleteRun,
    stock_mode: StockMode::DealToColumns { columns: 3 },
    waste_to_tableau: false,
    ..KLONDIKE
};

pub const YUKON: VariantRules = VariantRules {
    id: "yukon",
    label: "Yukon",
    deal: DealPattern::Triangle { extra_face_up: 4 },
    sequence_mode: SequenceMode::AnyFaceUp,
    stock_mode: StockMode::None,
    waste_to_tableau: false,
    ..KLONDIKE
};

pub const GOLF: VariantRules = VariantRules {
    id: "golf",
    label: "Golf",
    layout: Layout::Golf,
    deal: DealPattern::Rows {
        rows: GOLF_COLUMN_DEPTH,
    },
    build_mode: BuildMode::Any,
    sequence_mode: SequenceMode::SingleCard,
    empty_fill: EmptyFill::None,
    foundations: 0,
    columns: 7,
    max_recycles: Some(0),
    waste_to_tableau: false,
    ..KLONDIKE
};

pub const GOLF_WRAP: VariantRules = VariantRules {
    id: "golf-wrap",
    label: "Golf (King-Ace wrap)",
    wrap_ranks: true,
    ..GOLF
};

pub const PYRAMID: VariantRules = VariantRules {
    id: "pyramid",
    label: "Pyramid",
    layout: Layout::Pyramid,
    deal: DealPattern::Pyramid,
    build_mode: BuildMode::Any,
    sequence_mode: SequenceMode::SingleCard,
    empty_fill: EmptyFill::None,
    foundations: 1,
    columns: 0,
    cells: PYRAMID_SLOTS,
    max_recycles: Some(2),
    waste_to_tableau: false,
    ..KLONDIKE
};

pub const PYRAMID_ROWS: usize = 7;
pub const PYRAMID_SLOTS: usize = PYRAMID_ROWS * (PYRAMID_ROWS + 1) / 2;
pub const GOLF_COLUMN_DEPTH: usize = 5;

static VARIANTS: [VariantRules; 10] = [
    KLONDIKE,
    KLONDIKE_DRAW_THREE,
    FREECELL,
    BAKERS_DOZEN,
    FORTY_THIEVES,
    SCORPION,
    YUKON,
    GOLF,
    GOLF_WRAP,
    PYRAMID,
];

pub fn all_variants() -> &'static [VariantRules] {
    &VARIANTS
}

pub fn variant_for_id(id: &str) -> Option<&'static VariantRules> {
    VARIANTS.iter().find(|rules| rules.id == id)
}
