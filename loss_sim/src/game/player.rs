use crate::error::BlackjackGameError;
use crate::game::hand::{Hand, HandOutcome};
use crate::game::strategy::PlayerStrategy;
use crate::game::table::TableSettings;
use blackjack_cards::prelude::*;
use std::fmt::Display;
use tracing::trace;

/// A settled hand as it stood at the end of a round, together with the player's cash once the round was paid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandRecord {
    pub hand: Hand,
    pub cash_after_outcome: Money,
}

/// Struct for a simulated player. Every decision is delegated to its `PlayerStrategy`.
#[derive(Debug)]
pub struct Player {
    seat: usize,
    strategy: Box<dyn PlayerStrategy>,
    starting_cash: Money,
    cash: Money,
    hands: Vec<Hand>,
    history: Vec<HandRecord>,
    active_hand: usize,
    at_table: bool,
}

impl Player {
    /// Associated function to create a new `Player` sitting in `seat` with `starting_cash`.
    pub fn new(seat: usize, strategy: Box<dyn PlayerStrategy>, starting_cash: Money) -> Player {
        Player {
            seat,
            strategy,
            starting_cash,
            cash: starting_cash,
            hands: Vec::new(),
            history: Vec::new(),
            active_hand: 0,
            at_table: true,
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn label(&self) -> &str {
        self.strategy.label()
    }

    pub fn starting_cash(&self) -> Money {
        self.starting_cash
    }

    pub fn cash(&self) -> Money {
        self.cash
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn hands_mut(&mut self) -> &mut [Hand] {
        &mut self.hands
    }

    /// Every hand the player has settled so far, oldest first.
    pub fn history(&self) -> &[HandRecord] {
        &self.history
    }

    pub fn is_at_table(&self) -> bool {
        self.at_table
    }

    /// Method that asks the strategy for an opening bet, validates it against the table and the player's cash and
    /// places it on a fresh hand.
    pub fn place_initial_bet(&mut self, table: &TableSettings) -> Result<Money, BlackjackGameError> {
        let bet = self.strategy.initial_bet(&self.history, self.cash, table);
        if bet < table.minimum_bet {
            return Err(BlackjackGameError::BetBelowMinimum {
                bet,
                minimum: table.minimum_bet,
            });
        }
        if bet > table.maximum_bet {
            return Err(BlackjackGameError::BetAboveMaximum {
                bet,
                maximum: table.maximum_bet,
            });
        }
        if bet > self.cash {
            return Err(BlackjackGameError::InsufficientCash {
                bet,
                cash: self.cash,
            });
        }
        self.cash -= bet;
        self.hands = vec![Hand::new(bet)];
        self.active_hand = 0;
        Ok(bet)
    }

    /// Method to receive a card on the active hand.
    pub fn take_card(&mut self, card: Card) -> Result<(), BlackjackGameError> {
        let hand = self
            .hands
            .get_mut(self.active_hand)
            .ok_or(BlackjackGameError::NoActiveHand)?;
        hand.take_card(card);
        Ok(())
    }

    /// Method that plays the active hands until one of them needs a card. Returns `true` when the caller has to
    /// deliver a card with `take_card`, `false` once every hand is finished.
    ///
    /// Splits and double downs are charged to the player's cash as they happen. A split hand holding a single
    /// card always asks for a card before anything else is decided for it.
    pub fn play_turn(&mut self, dealer_visible: &Card) -> Result<bool, BlackjackGameError> {
        while let Some(hand) = self.hands.get(self.active_hand) {
            if hand.cards().len() < 2 {
                return Ok(true);
            }

            if self.strategy.should_split(hand, dealer_visible)
                && hand.can_split()
                && self.cash >= hand.bet()
            {
                let split_off = self.hands[self.active_hand].split()?;
                self.cash -= split_off.bet();
                self.hands.insert(self.active_hand + 1, split_off);
                trace!(seat = self.seat, hand = self.active_hand, "split hand");
                continue;
            }

            if self.strategy.should_double_down(hand, dealer_visible) && hand.can_double_down(self.cash) {
                let extra = self.hands[self.active_hand].double_down(self.cash)?;
                self.cash -= extra;
                trace!(seat = self.seat, hand = self.active_hand, "double down");
                return Ok(true);
            }

            if self.strategy.should_hit(hand, dealer_visible) && hand.can_hit() {
                return Ok(true);
            }

            self.active_hand += 1;
        }
        Ok(false)
    }

    /// Adds `amount` to the player's cash.
    pub fn credit(&mut self, amount: Money) {
        self.cash += amount;
    }

    /// Archives a copy of every current hand into the history, tagged with the cash held now.
    pub fn save_current_hands(&mut self) {
        let cash = self.cash;
        self.history.extend(self.hands.iter().map(|hand| HandRecord {
            hand: hand.clone(),
            cash_after_outcome: cash,
        }));
    }

    /// Removes and returns the cards of every current hand.
    pub fn take_cards(&mut self) -> Vec<Card> {
        self.hands.iter_mut().flat_map(|hand| hand.take_cards()).collect()
    }

    pub fn clear_current_hands(&mut self) {
        self.hands.clear();
        self.active_hand = 0;
    }

    /// Method that lets the strategy decide whether the player stays for another round. Returns `true` if they stay.
    pub fn leave_table_or_stay(&mut self, table: &TableSettings) -> bool {
        self.at_table = !self.strategy.should_leave_table(self.cash, table);
        self.at_table
    }

    /// The highest cash the player held after any settled hand, or the starting cash if none were played.
    pub fn max_cash_after_outcome(&self) -> Money {
        self.history
            .iter()
            .map(|record| record.cash_after_outcome)
            .max()
            .unwrap_or(self.starting_cash)
    }

    /// Number of settled hands with the given outcome.
    pub fn count_outcomes(&self, outcome: HandOutcome) -> usize {
        self.history
            .iter()
            .filter(|record| record.hand.outcome() == outcome)
            .count()
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const width: usize = 80;
        const text_width: usize = "max cash after outcome".len() + 20;
        const num_width: usize = width - text_width;
        write!(
            f,
            "{}{}\n\
            {:<text_width$}{:>num_width$}\n\
            {:<text_width$}{:>num_width$}\n\
            {:<text_width$}{:>num_width$}\n\
            {:<text_width$}{:>num_width$}\n",
            "player: ",
            self.label(),
            "seat",
            self.seat,
            "hands played",
            self.history.len(),
            "cash",
            self.cash,
            "max cash after outcome",
            self.max_cash_after_outcome(),
        )
    }
}
