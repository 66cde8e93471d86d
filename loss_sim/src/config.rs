//! Configuration of a simulation batch: the table rules, the shoe and the players every run starts from.

use crate::error::ConfigError;
use crate::game::strategy::{create_player_strategy, BasicMinimumStrategy};
use crate::game::table::TableSettings;
use blackjack_cards::prelude::Money;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MINIMUM_BET: Money = Money::from_units(10);
pub const DEFAULT_MAXIMUM_BET: Money = Money::from_units(100);
pub const DEFAULT_MAX_SEATS: usize = 1;
pub const DEFAULT_DECK_COUNT: usize = 4;
pub const DEFAULT_STARTING_CASH: Money = Money::from_units(200);
pub const DEFAULT_RUN_COUNT: usize = 1000;

/// One seat to fill at the start of every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProperties {
    pub strategy: String,
    pub starting_cash: Money,
}

impl PlayerProperties {
    pub fn new<S: Into<String>>(strategy: S, starting_cash: Money) -> PlayerProperties {
        PlayerProperties {
            strategy: strategy.into(),
            starting_cash,
        }
    }
}

/// The template every run of a batch is built from. Runs never share the objects built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationProperties {
    pub minimum_bet: Money,
    pub maximum_bet: Money,
    pub max_seats: usize,
    pub deck_count: usize,
    pub players: Vec<PlayerProperties>,
    /// When set, run `i` of a batch shuffles its shoe from `seed + i`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationProperties {
    /// Associated method for returning a new `SimulationPropertiesBuilder`. Anything left unset falls back to a
    /// 10/100 table with one seat, a four deck shoe and a single `BasicMinimum` player holding 200.
    pub fn builder() -> SimulationPropertiesBuilder {
        SimulationPropertiesBuilder::default()
    }

    /// Reads and validates properties from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<SimulationProperties, ConfigError> {
        let contents = fs::read_to_string(path)?;
        SimulationProperties::from_json_str(&contents)
    }

    /// Parses and validates properties from a JSON document.
    pub fn from_json_str(json: &str) -> Result<SimulationProperties, ConfigError> {
        let properties: SimulationProperties = serde_json::from_str(json)?;
        properties.validate()?;
        Ok(properties)
    }

    pub fn table_settings(&self) -> TableSettings {
        TableSettings::new(self.minimum_bet, self.maximum_bet, self.max_seats)
    }

    /// Method that checks the properties before any run is started.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_bet <= Money::ZERO {
            return Err(ConfigError::NonPositiveMinimumBet(self.minimum_bet));
        }
        if self.maximum_bet < self.minimum_bet {
            return Err(ConfigError::MaximumBetBelowMinimum {
                minimum: self.minimum_bet,
                maximum: self.maximum_bet,
            });
        }
        if self.max_seats < 1 {
            return Err(ConfigError::NoSeats);
        }
        if self.deck_count < 1 {
            return Err(ConfigError::NoDecks);
        }
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        if self.players.len() > self.max_seats {
            return Err(ConfigError::TooManyPlayers {
                players: self.players.len(),
                max_seats: self.max_seats,
            });
        }
        for player in &self.players {
            if player.starting_cash.is_negative() {
                return Err(ConfigError::NegativeStartingCash(player.starting_cash));
            }
            if player.starting_cash < self.minimum_bet {
                return Err(ConfigError::StartingCashBelowMinimum {
                    cash: player.starting_cash,
                    minimum: self.minimum_bet,
                });
            }
            create_player_strategy(&player.strategy)?;
        }
        Ok(())
    }

    /// Strategy labels in the order they first appear among the players.
    pub fn strategy_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for player in &self.players {
            if !labels.contains(&player.strategy.as_str()) {
                labels.push(&player.strategy);
            }
        }
        labels
    }
}

impl Default for SimulationProperties {
    fn default() -> Self {
        SimulationProperties {
            minimum_bet: DEFAULT_MINIMUM_BET,
            maximum_bet: DEFAULT_MAXIMUM_BET,
            max_seats: DEFAULT_MAX_SEATS,
            deck_count: DEFAULT_DECK_COUNT,
            players: vec![PlayerProperties::new(
                BasicMinimumStrategy::LABEL,
                DEFAULT_STARTING_CASH,
            )],
            seed: None,
        }
    }
}

/// Struct to implement builder pattern for `SimulationProperties`
#[derive(Debug, Clone, Default)]
pub struct SimulationPropertiesBuilder {
    minimum_bet: Option<Money>,
    maximum_bet: Option<Money>,
    max_seats: Option<usize>,
    deck_count: Option<usize>,
    players: Option<Vec<PlayerProperties>>,
    seed: Option<u64>,
}

impl SimulationPropertiesBuilder {
    /// Method for setting the minimum bet for the table
    pub fn minimum_bet(&mut self, bet: Money) -> &mut Self {
        self.minimum_bet = Some(bet);
        self
    }

    pub fn maximum_bet(&mut self, bet: Money) -> &mut Self {
        self.maximum_bet = Some(bet);
        self
    }

    pub fn max_seats(&mut self, seats: usize) -> &mut Self {
        self.max_seats = Some(seats);
        self
    }

    /// Method for choosing the number of decks in the shoe
    pub fn deck_count(&mut self, decks: usize) -> &mut Self {
        self.deck_count = Some(decks);
        self
    }

    /// Method for adding a player seat, replaces the default player the first time it is called.
    pub fn player<S: Into<String>>(&mut self, strategy: S, starting_cash: Money) -> &mut Self {
        self.players
            .get_or_insert_with(Vec::new)
            .push(PlayerProperties::new(strategy, starting_cash));
        self
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Method for building a validated `SimulationProperties` object.
    pub fn build(&mut self) -> Result<SimulationProperties, ConfigError> {
        let defaults = SimulationProperties::default();
        let properties = SimulationProperties {
            minimum_bet: self.minimum_bet.unwrap_or(defaults.minimum_bet),
            maximum_bet: self.maximum_bet.unwrap_or(defaults.maximum_bet),
            max_seats: self.max_seats.unwrap_or(defaults.max_seats),
            deck_count: self.deck_count.unwrap_or(defaults.deck_count),
            players: self.players.clone().unwrap_or(defaults.players),
            seed: self.seed.or(defaults.seed),
        };
        properties.validate()?;
        Ok(properties)
    }
}
