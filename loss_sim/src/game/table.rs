use crate::error::BlackjackGameError;
use crate::game::dealer::Dealer;
use crate::game::player::Player;
use blackjack_cards::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The house rules of a table. They never change once the table is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    pub minimum_bet: Money,
    pub maximum_bet: Money,
    pub max_seats: usize,
}

impl TableSettings {
    pub fn new(minimum_bet: Money, maximum_bet: Money, max_seats: usize) -> TableSettings {
        TableSettings {
            minimum_bet,
            maximum_bet,
            max_seats,
        }
    }
}

/// Struct for one simulated table: a dealer and the players seated with it.
#[derive(Debug)]
pub struct TableSimulation {
    dealer: Dealer,
    seated: usize,
    rounds_played: usize,
}

impl TableSimulation {
    pub fn new(dealer: Dealer) -> TableSimulation {
        TableSimulation {
            dealer,
            seated: 0,
            rounds_played: 0,
        }
    }

    pub fn settings(&self) -> &TableSettings {
        self.dealer.settings()
    }

    pub fn seated_players(&self) -> usize {
        self.seated
    }

    /// Method that seats `player` at the table, failing once every seat is taken.
    pub fn seat(&mut self, player: Player) -> Result<(), BlackjackGameError> {
        let max_seats = self.dealer.settings().max_seats;
        if self.seated >= max_seats {
            return Err(BlackjackGameError::TableFull { max_seats });
        }
        self.dealer.register(player);
        self.seated += 1;
        Ok(())
    }

    /// Method that keeps playing rounds until every player has left, then returns all of the players that were
    /// seated, ordered by seat, so their hand histories can be read.
    pub fn run_until_all_players_leave(mut self) -> Result<Vec<Player>, BlackjackGameError> {
        if self.seated == 0 {
            return Err(BlackjackGameError::NoSeatedPlayers);
        }
        while !self.dealer.registered_players().is_empty() {
            let report = self.dealer.play_single_round()?;
            self.rounds_played += 1;
            if !report.departed.is_empty() {
                debug!(
                    round = self.rounds_played,
                    seats = ?report.departed,
                    "players left the table"
                );
            }
        }
        debug!(rounds = self.rounds_played, "all players have left the table");
        Ok(self.dealer.into_players())
    }
}
