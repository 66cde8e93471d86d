use std::fmt::Display;

/// The rank of a standard playing card, ordered from `Two` up to `Ace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Every rank in pack order.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn is_ace(self) -> bool {
        self == Rank::Ace
    }

    pub fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    /// Short symbol used when displaying a card, i.e. "A", "K", "10", "2".
    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    /// Pip value for the numbered ranks, `None` for faces and aces.
    fn pips(self) -> Option<u8> {
        match self {
            Rank::Two => Some(2),
            Rank::Three => Some(3),
            Rank::Four => Some(4),
            Rank::Five => Some(5),
            Rank::Six => Some(6),
            Rank::Seven => Some(7),
            Rank::Eight => Some(8),
            Rank::Nine => Some(9),
            Rank::Ten => Some(10),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Diamonds,
    Clubs,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Diamonds, Suit::Clubs, Suit::Hearts, Suit::Spades];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Diamonds => "D",
            Suit::Clubs => "C",
            Suit::Hearts => "H",
            Suit::Spades => "S",
        }
    }
}

/// Decides the numeric value a card carries, and which alternate values a card may be given later on.
pub trait CardValueAssigner {
    /// The value a freshly created card of `rank` and `suit` starts with.
    fn value_for(&self, rank: Rank, suit: Suit) -> u8;
    /// Whether a card of `rank` and `suit` is allowed to carry `value`.
    fn can_assign(&self, rank: Rank, suit: Suit, value: u8) -> bool;
}

pub const FACE_CARD_VALUE: u8 = 10;
pub const ACE_HIGH_VALUE: u8 = 11;
pub const ACE_LOW_VALUE: u8 = 1;

/// Assigns standard blackjack values: numbered cards count their pips, faces count ten and aces count eleven,
/// aces being the only rank that may be switched to one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackjackValueAssigner;

impl CardValueAssigner for BlackjackValueAssigner {
    fn value_for(&self, rank: Rank, _suit: Suit) -> u8 {
        match rank.pips() {
            Some(pips) => pips,
            None if rank.is_face() => FACE_CARD_VALUE,
            None => ACE_HIGH_VALUE,
        }
    }

    fn can_assign(&self, rank: Rank, _suit: Suit, value: u8) -> bool {
        rank.is_ace() && (value == ACE_HIGH_VALUE || value == ACE_LOW_VALUE)
    }
}

/// A single playing card. Cards are plain values, copying one never shares state with the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
    value: u8,
}

impl Card {
    /// Associated function to create a new card whose value is given by `assigner`.
    pub fn new<A: CardValueAssigner + ?Sized>(rank: Rank, suit: Suit, assigner: &A) -> Card {
        Card {
            rank,
            suit,
            value: assigner.value_for(rank, suit),
        }
    }

    /// Shorthand for a card valued with the `BlackjackValueAssigner`.
    pub fn blackjack(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit, &BlackjackValueAssigner)
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Switches the card to `value` if `assigner` permits it for this card, returns whether the value was changed.
    /// Overriding with the value already held is accepted and leaves the card as it was.
    pub fn override_value<A: CardValueAssigner + ?Sized>(&mut self, value: u8, assigner: &A) -> bool {
        if !assigner.can_assign(self.rank, self.suit, value) {
            return false;
        }
        self.value = value;
        true
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}
