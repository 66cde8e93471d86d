use crate::card::{Card, CardValueAssigner, Rank, Suit};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;

/// How a shoe reorders its cards when asked to shuffle.
#[derive(Debug, Clone)]
enum ShoeOrder {
    Random(StdRng),
    /// The cards keep the order they were loaded in, used to replay fixed card sequences.
    Stacked,
}

/// An ordered pile of one or more decks that cards are drawn from and returned to.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: VecDeque<Card>,
    order: ShoeOrder,
}

impl Shoe {
    /// Associated function to create a new shoe of `decks` standard decks, shuffled with entropy from the OS.
    pub fn new<A: CardValueAssigner + ?Sized>(decks: usize, assigner: &A) -> Shoe {
        Shoe::with_rng(decks, assigner, StdRng::from_entropy())
    }

    /// Associated function to create a new shoe whose shuffles are reproducible from `seed`.
    pub fn with_seed<A: CardValueAssigner + ?Sized>(decks: usize, assigner: &A, seed: u64) -> Shoe {
        Shoe::with_rng(decks, assigner, StdRng::seed_from_u64(seed))
    }

    fn with_rng<A: CardValueAssigner + ?Sized>(decks: usize, assigner: &A, rng: StdRng) -> Shoe {
        let mut cards = VecDeque::with_capacity(decks * 52);
        for _ in 0..decks {
            cards.extend(Shoe::standard_deck(assigner));
        }
        Shoe {
            cards,
            order: ShoeOrder::Random(rng),
        }
    }

    /// The 52 cards of one deck, grouped by rank from `Two` to `Ace`.
    pub fn standard_deck<A: CardValueAssigner + ?Sized>(assigner: &A) -> Vec<Card> {
        Rank::ALL
            .iter()
            .flat_map(|rank| Suit::ALL.iter().map(move |suit| Card::new(*rank, *suit, assigner)))
            .collect()
    }

    /// A shoe that deals `cards` front to back and never reorders them.
    pub fn stacked(cards: Vec<Card>) -> Shoe {
        Shoe {
            cards: cards.into(),
            order: ShoeOrder::Stacked,
        }
    }

    /// Randomly permutes the cards currently in the shoe. Stacked shoes are left untouched.
    pub fn shuffle(&mut self) {
        if let ShoeOrder::Random(rng) = &mut self.order {
            self.cards.make_contiguous().shuffle(rng);
        }
    }

    /// Moves the top `position` cards to the bottom, keeping their relative order.
    pub fn cut(&mut self, position: usize) {
        if self.cards.is_empty() {
            return;
        }
        let position = position % self.cards.len();
        self.cards.rotate_left(position);
    }

    /// Removes and returns the top card, `None` once the shoe has run out.
    pub fn pull_top_card(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Places `cards` at the bottom of the shoe in the order given.
    pub fn return_cards<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
