#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Diamonds | Suit::Hearts)
    }

    pub fn color(self) -> Color {
        if self.is_red() {
            Color::Red
        } else {
            Color::Black
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
            Suit::Spades => "S",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Clubs => "♣",
            Suit::Diamonds => "♦",
            Suit::Hearts => "♥",
            Suit::Spades => "♠",
        }
    }

    /// Accepts either the card symbol or the single-letter short form.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "♣" | "C" | "c" => Some(Suit::Clubs),
            "♦" | "D" | "d" => Some(Suit::Diamonds),
            "♥" | "H" | "h" => Some(Suit::Hearts),
            "♠" | "S" | "s" => Some(Suit::Spades),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: u8,
    pub face_up: bool,
}

impl Card {
    pub const fn new(suit: Suit, rank: u8) -> Self {
        Self {
            suit,
            rank,
            face_up: true,
        }
    }

    pub const fn hidden(suit: Suit, rank: u8) -> Self {
        Self {
            suit,
            rank,
            face_up: false,
        }
    }

    pub fn label(&self) -> String {
        format!("{}{}", rank_label(self.rank), self.suit.short())
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn color_red(&self) -> bool {
        self.suit.is_red()
    }

    pub fn identity(&self) -> (Suit, u8) {
        (self.suit, self.rank)
    }
}

pub fn rank_label(rank: u8) -> &'static str {
    match rank {
        1 => "A",
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        10 => "10",
        11 => "J",
        12 => "Q",
        13 => "K",
        _ => "?",
    }
}

/// Rank label for decks that slot a Knight between Jack and Queen (top rank 14).
pub fn rank_label_for(rank: u8, top_rank: u8) -> &'static str {
    if top_rank != 14 {
        return rank_label(rank);
    }
    match rank {
        12 => "C",
        13 => "Q",
        14 => "K",
        _ => rank_label(rank),
    }
}
