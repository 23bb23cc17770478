use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PileRef {
    Tableau(usize),
    Cell(usize),
    Waste,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Move {
    TableauToTableau {
        src: usize,
        dst: usize,
        count: usize,
    },
    ToFoundation {
        from: PileRef,
        foundation: usize,
    },
    WasteToTableau {
        dst: usize,
    },
    TableauToCell {
        src: usize,
        cell: usize,
    },
    CellToTableau {
        cell: usize,
        dst: usize,
    },
    DrawStock,
    DealStock,
    RecycleWaste,
    RemoveExposed {
        first: PileRef,
        second: Option<PileRef>,
    },
}

/// Search ordering bands, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MovePriority {
    Foundation = 0,
    Reveal = 1,
    Shuffle = 2,
    Draw = 3,
    Recycle = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateMove {
    pub mv: Move,
    pub priority: MovePriority,
}

impl CandidateMove {
    pub fn new(mv: Move, priority: MovePriority) -> Self {
        Self { mv, priority }
    }

    pub fn is_greedy_removal(&self) -> bool {
        self.priority == MovePriority::Foundation
    }
}

impl Move {
    pub fn describe(&self) -> String {
        match self {
            Move::TableauToTableau { src, dst, count } => {
                format!("Move {count} card(s) T{} -> T{}", src + 1, dst + 1)
            }
            Move::ToFoundation { from, foundation } => {
                format!("Move {} to foundation F{}", describe_pile(from), foundation + 1)
            }
            Move::WasteToTableau { dst } => format!("Move waste to T{}", dst + 1),
            Move::TableauToCell { src, cell } => {
                format!("Move T{} top card to cell C{}", src + 1, cell + 1)
            }
            Move::CellToTableau { cell, dst } => {
                format!("Move cell C{} to T{}", cell + 1, dst + 1)
            }
            Move::DrawStock => "Draw from stock".to_string(),
            Move::DealStock => "Deal stock onto the tableau".to_string(),
            Move::RecycleWaste => "Recycle waste into stock".to_string(),
            Move::RemoveExposed { first, second } => match second {
                Some(second) => format!(
                    "Remove {} with {}",
                    describe_pile(first),
                    describe_pile(second)
                ),
                None => format!("Remove {}", describe_pile(first)),
            },
        }
    }
}

fn describe_pile(pile: &PileRef) -> String {
    match pile {
        PileRef::Tableau(col) => format!("T{}", col + 1),
        PileRef::Cell(cell) => format!("C{}", cell + 1),
        PileRef::Waste => "waste".to_string(),
    }
}
