use crate::engine::search::{SearchLimits, DEFAULT_LIKELY_SOLVED_THRESHOLD};
use crate::game::{Layout, VariantRules};

/// Per-variant check budgets. Inline fallback runs derive theirs through
/// [`SearchLimits::for_fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckProfile {
    pub quick: SearchLimits,
    pub deep: SearchLimits,
}

pub const TABLEAU_CHECK_PROFILE: CheckProfile = CheckProfile {
    quick: SearchLimits::quick(50_000, 1_500),
    deep: SearchLimits::deep(400_000, 12_000),
};

pub const GOLF_CHECK_PROFILE: CheckProfile = CheckProfile {
    quick: SearchLimits::quick(20_000, 1_000),
    deep: SearchLimits::deep(250_000, 8_000),
};

pub const PYRAMID_CHECK_PROFILE: CheckProfile = CheckProfile {
    quick: SearchLimits::quick(20_000, 1_000),
    deep: SearchLimits::deep(300_000, 10_000),
};

impl CheckProfile {
    pub fn for_variant(rules: &VariantRules) -> Self {
        match rules.layout {
            Layout::Tableau => {
                // Tableau games clear the whole deck into foundations; twenty cards is
                // far from done there.
                TABLEAU_CHECK_PROFILE.with_threshold(rules.deck_size() * 3 / 4)
            }
            Layout::Golf => GOLF_CHECK_PROFILE.with_threshold(DEFAULT_LIKELY_SOLVED_THRESHOLD),
            Layout::Pyramid => {
                PYRAMID_CHECK_PROFILE.with_threshold(DEFAULT_LIKELY_SOLVED_THRESHOLD)
            }
        }
    }

    pub fn limits(&self, deep: bool) -> SearchLimits {
        if deep {
            self.deep
        } else {
            self.quick
        }
    }

    fn with_threshold(self, threshold: usize) -> Self {
        Self {
            quick: self.quick.with_threshold(threshold),
            deep: self.deep.with_threshold(threshold),
        }
    }
}
