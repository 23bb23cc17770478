mod rules;
mod setup;
mod snapshot;
mod state;
mod types;
mod variants;

pub use rules::{
    can_fill_empty, can_place_on_foundation, can_stack_on_tableau, descends, is_complete_run,
    is_valid_sequence, ranks_adjacent, supermove_limit, BuildMode, DealPattern, EmptyFill,
    FoundationMode, Layout, SequenceMode, StockMode, VariantRules,
};
pub use setup::{deal, full_deck};
pub use snapshot::{CardRecord, Snapshot, SnapshotError};
pub use state::{pyramid_coords, pyramid_exposed, pyramid_slot, GameState};
pub use types::{rank_label, rank_label_for, Card, Color, Suit};
pub use variants::{
    all_variants, variant_for_id, BAKERS_DOZEN, FORTY_THIEVES, FREECELL, GOLF, GOLF_COLUMN_DEPTH,
    GOLF_WRAP, KLONDIKE, KLONDIKE_DRAW_THREE, PYRAMID, PYRAMID_ROWS, PYRAMID_SLOTS, SCORPION, YUKON,
};
