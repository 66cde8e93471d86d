//! Module that focuses on playing rounds of blackjack. `GameManager` sequences the steps of a single round,
//! the `Dealer` drives it for the players registered at its table, and `TableSimulation` keeps playing rounds
//! until everyone has left.

pub mod dealer;
pub mod hand;
pub mod player;
pub mod strategy;
pub mod table;

pub mod prelude {
    pub use super::dealer::{Dealer, RoundPhase, RoundReport};
    pub use super::hand::{settle_outcome, Hand, HandOutcome};
    pub use super::player::{HandRecord, Player};
    pub use super::strategy::prelude::*;
    pub use super::table::{TableSettings, TableSimulation};
    pub use super::{payout_for, GameManager};
}

use crate::error::BlackjackGameError;
use blackjack_cards::prelude::*;
use hand::{Hand, HandOutcome};
use player::Player;
use strategy::DealerStrategy;
use table::TableSettings;
use tracing::trace;

/// The amount returned to a player for a settled hand. Lost hands return nothing since the bet was charged when
/// it was placed, a natural pays 3 to 2 rounded to the cent.
pub fn payout_for(hand: &Hand) -> Result<Money, BlackjackGameError> {
    match hand.outcome() {
        HandOutcome::InProgress => Err(BlackjackGameError::HandInProgress),
        HandOutcome::Won if hand.is_natural() => Ok(hand.bet().scale_rounded(5, 2)),
        HandOutcome::Won => Ok(hand.bet() * 2),
        HandOutcome::Pushed => Ok(hand.bet()),
        HandOutcome::Lost => Ok(Money::ZERO),
    }
}

/// Stateless sequencer for the steps of a round. Each method is one step, the `Dealer` decides which steps run.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameManager;

impl GameManager {
    fn draw(shoe: &mut Shoe) -> Result<Card, BlackjackGameError> {
        shoe.pull_top_card().ok_or(BlackjackGameError::EmptyShoe)
    }

    /// Method that has every player place an opening bet, returns the total amount wagered.
    pub fn place_your_bets(
        &self,
        players: &mut [Player],
        table: &TableSettings,
    ) -> Result<Money, BlackjackGameError> {
        if players.is_empty() {
            return Err(BlackjackGameError::NoRegisteredPlayers);
        }
        let mut total = Money::ZERO;
        for player in players.iter_mut() {
            total += player.place_initial_bet(table)?;
        }
        Ok(total)
    }

    /// Deals one card to each player and then one to the dealer, twice over.
    pub fn deal_initial_cards(
        &self,
        players: &mut [Player],
        dealer_cards: &mut Vec<Card>,
        shoe: &mut Shoe,
    ) -> Result<(), BlackjackGameError> {
        for _ in 0..2 {
            for player in players.iter_mut() {
                player.take_card(GameManager::draw(shoe)?)?;
            }
            dealer_cards.push(GameManager::draw(shoe)?);
        }
        Ok(())
    }

    /// Method that lets each player in turn play out all of their hands, delivering cards whenever they ask for one.
    pub fn players_play(
        &self,
        players: &mut [Player],
        dealer_visible: &Card,
        shoe: &mut Shoe,
    ) -> Result<(), BlackjackGameError> {
        for player in players.iter_mut() {
            while player.play_turn(dealer_visible)? {
                player.take_card(GameManager::draw(shoe)?)?;
            }
        }
        Ok(())
    }

    pub fn dealer_plays(
        &self,
        dealer_cards: &mut Vec<Card>,
        strategy: &dyn DealerStrategy,
        shoe: &mut Shoe,
    ) -> Result<(), BlackjackGameError> {
        while strategy.should_hit(dealer_cards) {
            dealer_cards.push(GameManager::draw(shoe)?);
        }
        Ok(())
    }

    /// Settles every player hand against the dealer's best value.
    pub fn determine_hand_outcomes(
        &self,
        players: &mut [Player],
        dealer_value: u32,
    ) -> Result<(), BlackjackGameError> {
        for player in players.iter_mut() {
            for hand in player.hands_mut() {
                let outcome = hand.settle(dealer_value)?;
                trace!(?outcome, value = hand.best_value(), dealer_value, "settled hand");
            }
        }
        Ok(())
    }

    /// Method that credits every player with the payout of their settled hands. Returns the total paid out.
    pub fn pay_out_or_collect(&self, players: &mut [Player]) -> Result<Money, BlackjackGameError> {
        let mut total = Money::ZERO;
        for player in players.iter_mut() {
            let payout = player
                .hands()
                .iter()
                .map(payout_for)
                .sum::<Result<Money, BlackjackGameError>>()?;
            player.credit(payout);
            total += payout;
        }
        Ok(total)
    }

    pub fn save_current_hand_results(&self, players: &mut [Player]) {
        for player in players.iter_mut() {
            player.save_current_hands();
        }
    }

    /// Returns every card on the table to the bottom of the shoe.
    pub fn collect_cards(&self, players: &mut [Player], dealer_cards: &mut Vec<Card>, shoe: &mut Shoe) {
        for player in players.iter_mut() {
            shoe.return_cards(player.take_cards());
        }
        shoe.return_cards(dealer_cards.drain(..));
    }

    pub fn clear_hands(&self, players: &mut [Player], dealer_cards: &mut Vec<Card>) {
        for player in players.iter_mut() {
            player.clear_current_hands();
        }
        dealer_cards.clear();
    }

    /// Method that asks every player whether they stay, and removes those who leave. Players are removed from the
    /// back of the list so the remaining indices never shift while departures are processed.
    pub fn determine_departures(&self, players: &mut Vec<Player>, table: &TableSettings) -> Vec<Player> {
        let leaving: Vec<usize> = players
            .iter_mut()
            .enumerate()
            .filter_map(|(i, player)| (!player.leave_table_or_stay(table)).then_some(i))
            .collect();
        let mut departed: Vec<Player> = leaving
            .into_iter()
            .rev()
            .map(|i| {
                let player = players.remove(i);
                trace!(seat = player.seat(), cash = %player.cash(), "player left the table");
                player
            })
            .collect();
        departed.reverse();
        departed
    }
}
