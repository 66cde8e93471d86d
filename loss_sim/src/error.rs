use blackjack_cards::prelude::Money;
use thiserror::Error;

/// Errors raised while a round of blackjack is being played. Each one is a broken precondition or a shoe that
/// ran dry, so the affected run is aborted rather than recovered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlackjackGameError {
    #[error("the shoe ran out of cards")]
    EmptyShoe,
    #[error("a round cannot start without registered players")]
    NoRegisteredPlayers,
    #[error("the table cannot run without seated players")]
    NoSeatedPlayers,
    #[error("the table is full, it seats at most {max_seats} players")]
    TableFull { max_seats: usize },
    #[error("bet of {bet} is below the table minimum of {minimum}")]
    BetBelowMinimum { bet: Money, minimum: Money },
    #[error("bet of {bet} is above the table maximum of {maximum}")]
    BetAboveMaximum { bet: Money, maximum: Money },
    #[error("bet of {bet} exceeds the available cash of {cash}")]
    InsufficientCash { bet: Money, cash: Money },
    #[error("hand cannot be split")]
    InvalidSplit,
    #[error("hand cannot be doubled down")]
    InvalidDoubleDown,
    #[error("hand has not been settled yet")]
    HandInProgress,
    #[error("hand outcome has already been settled")]
    OutcomeAlreadySettled,
    #[error("player has no active hand")]
    NoActiveHand,
}

/// Validation failures for a `SimulationProperties` template, raised before any run starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("maximum bet {maximum} is below the minimum bet {minimum}")]
    MaximumBetBelowMinimum { minimum: Money, maximum: Money },
    #[error("minimum bet must be positive, got {0}")]
    NonPositiveMinimumBet(Money),
    #[error("a table needs at least one seat")]
    NoSeats,
    #[error("a shoe needs at least one deck")]
    NoDecks,
    #[error("at least one player must be configured")]
    NoPlayers,
    #[error("{players} players configured for a table of {max_seats} seats")]
    TooManyPlayers { players: usize, max_seats: usize },
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
    #[error("starting cash cannot be negative, got {0}")]
    NegativeStartingCash(Money),
    #[error("starting cash {cash} cannot cover the minimum bet {minimum}")]
    StartingCashBelowMinimum { cash: Money, minimum: Money },
    #[error("run count must be at least one")]
    ZeroRuns,
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised by the statistics and report sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("could not write statistics: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize statistics: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("simulation #{run_index} failed: {source}")]
    Run {
        run_index: usize,
        #[source]
        source: BlackjackGameError,
    },
    #[error(transparent)]
    Sink(#[from] SinkError),
}
