use crate::error::BlackjackGameError;
use blackjack_cards::prelude::*;
use serde::Serialize;
use std::fmt::Display;

/// The settlement state of a hand. A hand starts `InProgress` and moves to exactly one of the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HandOutcome {
    InProgress,
    Won,
    Lost,
    Pushed,
}

/// A set of drawn cards together with the money riding on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    bet: Money,
    outcome: HandOutcome,
    is_split: bool,
    is_doubled_down: bool,
}

impl Hand {
    /// Associated function to create a new, empty hand carrying `bet`.
    pub fn new(bet: Money) -> Hand {
        Hand {
            cards: Vec::new(),
            bet,
            outcome: HandOutcome::InProgress,
            is_split: false,
            is_doubled_down: false,
        }
    }

    /// Associated function to create a hand already holding `cards`, mostly useful for scripting hands in tests.
    pub fn with_cards(bet: Money, cards: Vec<Card>) -> Hand {
        Hand {
            cards,
            ..Hand::new(bet)
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn bet(&self) -> Money {
        self.bet
    }

    pub fn outcome(&self) -> HandOutcome {
        self.outcome
    }

    pub fn is_split(&self) -> bool {
        self.is_split
    }

    pub fn is_doubled_down(&self) -> bool {
        self.is_doubled_down
    }

    pub fn take_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Every candidate total of the hand, see `card_values`.
    pub fn values(&self) -> Vec<u32> {
        card_values(&self.cards)
    }

    pub fn best_value(&self) -> u32 {
        best_value(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    /// A natural is two cards worth 21 that did not come out of a split.
    pub fn is_natural(&self) -> bool {
        !self.is_split && is_natural(&self.cards)
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2
            && self.cards[0].rank() == self.cards[1].rank()
            && !self.is_split
            && !self.is_doubled_down
    }

    /// Method that moves the second card into a new hand carrying the same bet. Both hands are marked as split.
    /// Fails without touching the hand when `can_split` is false.
    pub fn split(&mut self) -> Result<Hand, BlackjackGameError> {
        if !self.can_split() {
            return Err(BlackjackGameError::InvalidSplit);
        }
        let card = self.cards.pop().ok_or(BlackjackGameError::InvalidSplit)?;
        self.is_split = true;
        Ok(Hand {
            cards: vec![card],
            bet: self.bet,
            outcome: HandOutcome::InProgress,
            is_split: true,
            is_doubled_down: false,
        })
    }

    pub fn can_double_down(&self, cash: Money) -> bool {
        cash >= self.bet && !self.is_busted() && !self.is_split && !self.is_doubled_down
    }

    /// Method that doubles the bet on the hand, returns the extra amount that must be charged to the player.
    pub fn double_down(&mut self, cash: Money) -> Result<Money, BlackjackGameError> {
        if !self.can_double_down(cash) {
            return Err(BlackjackGameError::InvalidDoubleDown);
        }
        let extra = self.bet;
        self.bet += extra;
        self.is_doubled_down = true;
        Ok(extra)
    }

    /// A hand may take another card unless it is busted, is a split hand of aces or has been doubled down.
    pub fn can_hit(&self) -> bool {
        let split_aces = self.is_split && self.cards.first().map_or(false, |c| c.rank().is_ace());
        !self.is_busted() && !split_aces && !self.is_doubled_down
    }

    /// Method that settles the hand against the dealer's best value. Only an unsettled hand can be settled.
    pub fn settle(&mut self, dealer_value: u32) -> Result<HandOutcome, BlackjackGameError> {
        if self.outcome != HandOutcome::InProgress {
            return Err(BlackjackGameError::OutcomeAlreadySettled);
        }
        self.outcome = settle_outcome(self.best_value(), dealer_value);
        Ok(self.outcome)
    }

    /// Empties the hand of its cards, leaving bet and outcome in place.
    pub fn take_cards(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }
}

/// Decides the outcome of a player total against a dealer total. A busted player loses even when the dealer busts too.
pub fn settle_outcome(player_value: u32, dealer_value: u32) -> HandOutcome {
    if player_value > BEST_HAND_VALUE {
        HandOutcome::Lost
    } else if dealer_value > BEST_HAND_VALUE {
        HandOutcome::Won
    } else if player_value == dealer_value {
        HandOutcome::Pushed
    } else if player_value > dealer_value {
        HandOutcome::Won
    } else {
        HandOutcome::Lost
    }
}

impl Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cards = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "[{}] bet: ${} outcome: {:?}", cards, self.bet, self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn card(rank: Rank) -> Card {
        Card::blackjack(rank, Suit::Hearts)
    }

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::with_cards(
            Money::from_units(10),
            ranks.iter().map(|r| card(*r)).collect(),
        )
    }

    #[test]
    fn split_moves_one_card_and_keeps_bet() {
        let mut first = hand(&[Rank::Eight, Rank::Eight]);
        let second = first.split().unwrap();
        assert_eq!(first.cards().len(), 1);
        assert_eq!(second.cards().len(), 1);
        assert_eq!(first.bet(), second.bet());
        assert!(first.is_split() && second.is_split());
        assert_eq!(second.outcome(), HandOutcome::InProgress);
    }

    #[test]
    fn split_fails_without_mutating() {
        let mut mixed = hand(&[Rank::Eight, Rank::Nine]);
        assert_eq!(mixed.split(), Err(BlackjackGameError::InvalidSplit));
        assert_eq!(mixed, hand(&[Rank::Eight, Rank::Nine]));

        let mut three = hand(&[Rank::Two, Rank::Two, Rank::Two]);
        assert!(three.split().is_err());
        assert_eq!(three.cards().len(), 3);
    }

    #[test]
    fn split_hands_cannot_split_again() {
        let mut first = hand(&[Rank::Ace, Rank::Ace]);
        let _second = first.split().unwrap();
        first.take_card(card(Rank::Ace));
        assert!(!first.can_split());
    }

    #[test]
    fn double_down_rules() {
        let mut h = hand(&[Rank::Five, Rank::Six]);
        assert!(!h.can_double_down(Money::from_units(5)));
        let extra = h.double_down(Money::from_units(10)).unwrap();
        assert_eq!(extra, Money::from_units(10));
        assert_eq!(h.bet(), Money::from_units(20));
        assert!(h.double_down(Money::from_units(100)).is_err());
        h.take_card(card(Rank::Nine));
        assert!(!h.can_hit());
    }

    #[test]
    fn split_aces_stop_after_one_card() {
        let mut first = hand(&[Rank::Ace, Rank::Ace]);
        let _second = first.split().unwrap();
        first.take_card(card(Rank::Five));
        assert!(!first.can_hit());
        assert!(!first.can_double_down(Money::from_units(100)));

        let mut eights = hand(&[Rank::Eight, Rank::Eight]);
        let _other = eights.split().unwrap();
        eights.take_card(card(Rank::Two));
        assert!(eights.can_hit());
    }

    #[test]
    fn naturals_exclude_split_hands() {
        assert!(hand(&[Rank::Ace, Rank::Queen]).is_natural());
        let mut aces = hand(&[Rank::Ace, Rank::Ace]);
        let _other = aces.split().unwrap();
        aces.take_card(card(Rank::King));
        assert_eq!(aces.best_value(), 21);
        assert!(!aces.is_natural());
        assert!(!hand(&[Rank::Seven, Rank::Seven, Rank::Seven]).is_natural());
    }

    #[test]
    fn settle_only_once() {
        let mut h = hand(&[Rank::King, Rank::Nine]);
        assert_eq!(h.settle(18), Ok(HandOutcome::Won));
        assert_eq!(h.settle(18), Err(BlackjackGameError::OutcomeAlreadySettled));
        assert_eq!(h.outcome(), HandOutcome::Won);
    }

    #[test]
    fn busted_player_loses_to_busted_dealer() {
        let mut h = hand(&[Rank::King, Rank::Nine, Rank::Five]);
        assert_eq!(h.settle(24), Ok(HandOutcome::Lost));
    }

    #[test]
    fn archived_copy_is_independent() {
        let live = hand(&[Rank::Two, Rank::Three]);
        let mut copy = live.clone();
        copy.take_card(card(Rank::Four));
        assert_eq!(live.cards().len(), 2);
        assert_eq!(copy.cards().len(), 3);
    }

    proptest! {
        #[test]
        fn settlement_rule(player in 4u32..=30, dealer in 4u32..=30) {
            let outcome = settle_outcome(player, dealer);
            let expected = if player > 21 {
                HandOutcome::Lost
            } else if dealer > 21 {
                HandOutcome::Won
            } else if player == dealer {
                HandOutcome::Pushed
            } else if player > dealer {
                HandOutcome::Won
            } else {
                HandOutcome::Lost
            };
            prop_assert_eq!(outcome, expected);
        }
    }
}
