//! Decision policies for players and dealers, and the registry that builds player policies from their labels.

use crate::error::ConfigError;
use crate::game::hand::{Hand, HandOutcome};
use crate::game::player::HandRecord;
use crate::game::table::TableSettings;
use blackjack_cards::prelude::*;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::Debug;

pub mod prelude {
    pub use super::{
        create_player_strategy, registered_strategies, BasicMinimumStrategy, DealerStrategy,
        MartingaleStrategy, PlayerStrategy, StandardDealerStrategy,
    };
}

/// The decisions a player delegates to its strategy. Every method is a pure function of its arguments.
pub trait PlayerStrategy: Send + Debug {
    /// Label used to group players into statistics records.
    fn label(&self) -> &str;
    /// Required method, the amount to bet at the start of a round given the player's settled hands so far.
    fn initial_bet(&self, history: &[HandRecord], cash: Money, table: &TableSettings) -> Money;
    fn should_split(&self, hand: &Hand, dealer_visible: &Card) -> bool;
    fn should_double_down(&self, hand: &Hand, dealer_visible: &Card) -> bool;
    fn should_hit(&self, hand: &Hand, dealer_visible: &Card) -> bool;
    fn should_leave_table(&self, cash: Money, table: &TableSettings) -> bool;
}

/// The single decision a dealer makes.
pub trait DealerStrategy: Send + Debug {
    fn should_hit(&self, cards: &[Card]) -> bool;
}

/// Hits while every candidate total is below the stand value, so it stops as soon as any total reaches 17 to 21.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDealerStrategy;

impl DealerStrategy for StandardDealerStrategy {
    fn should_hit(&self, cards: &[Card]) -> bool {
        card_values(cards).iter().all(|v| *v < DEALER_STAND_VALUE)
    }
}

fn hits_like_dealer(hand: &Hand) -> bool {
    hand.values().iter().all(|v| *v < DEALER_STAND_VALUE)
}

fn doubles_on_eleven(hand: &Hand) -> bool {
    let values = hand.values();
    values.contains(&11) && !values.contains(&BEST_HAND_VALUE)
}

fn splits_aces(hand: &Hand) -> bool {
    hand.cards().len() == 2 && hand.cards().iter().all(|c| c.rank().is_ace())
}

/// Bets the table minimum every round and otherwise plays the dealer's rule: double down on 11, split aces only,
/// leave once cash drops below the minimum bet.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicMinimumStrategy;

impl BasicMinimumStrategy {
    pub const LABEL: &'static str = "BasicMinimum";
}

impl PlayerStrategy for BasicMinimumStrategy {
    fn label(&self) -> &str {
        BasicMinimumStrategy::LABEL
    }

    fn initial_bet(&self, _history: &[HandRecord], _cash: Money, table: &TableSettings) -> Money {
        table.minimum_bet
    }

    fn should_split(&self, hand: &Hand, _dealer_visible: &Card) -> bool {
        splits_aces(hand)
    }

    fn should_double_down(&self, hand: &Hand, _dealer_visible: &Card) -> bool {
        doubles_on_eleven(hand)
    }

    fn should_hit(&self, hand: &Hand, _dealer_visible: &Card) -> bool {
        hits_like_dealer(hand)
    }

    fn should_leave_table(&self, cash: Money, table: &TableSettings) -> bool {
        cash < table.minimum_bet
    }
}

/// Plays like `BasicMinimumStrategy` but doubles its previous bet after every lost hand, falling back to the
/// table minimum after a win or a push.
#[derive(Debug, Clone, Copy, Default)]
pub struct MartingaleStrategy;

impl MartingaleStrategy {
    pub const LABEL: &'static str = "Martingale";
}

impl PlayerStrategy for MartingaleStrategy {
    fn label(&self) -> &str {
        MartingaleStrategy::LABEL
    }

    fn initial_bet(&self, history: &[HandRecord], cash: Money, table: &TableSettings) -> Money {
        match history.last() {
            Some(record) if record.hand.outcome() == HandOutcome::Lost => (record.hand.bet() * 2)
                .min(table.maximum_bet)
                .min(cash)
                .max(table.minimum_bet),
            _ => table.minimum_bet,
        }
    }

    fn should_split(&self, hand: &Hand, _dealer_visible: &Card) -> bool {
        splits_aces(hand)
    }

    fn should_double_down(&self, hand: &Hand, _dealer_visible: &Card) -> bool {
        doubles_on_eleven(hand)
    }

    fn should_hit(&self, hand: &Hand, _dealer_visible: &Card) -> bool {
        hits_like_dealer(hand)
    }

    fn should_leave_table(&self, cash: Money, table: &TableSettings) -> bool {
        cash < table.minimum_bet
    }
}

type StrategyConstructor = fn() -> Box<dyn PlayerStrategy>;

fn basic_minimum() -> Box<dyn PlayerStrategy> {
    Box::new(BasicMinimumStrategy)
}

fn martingale() -> Box<dyn PlayerStrategy> {
    Box::new(MartingaleStrategy)
}

lazy_static! {
    static ref PLAYER_STRATEGIES: HashMap<&'static str, StrategyConstructor> = {
        let mut strategies: HashMap<&'static str, StrategyConstructor> = HashMap::new();
        strategies.insert(BasicMinimumStrategy::LABEL, basic_minimum);
        strategies.insert(MartingaleStrategy::LABEL, martingale);
        strategies
    };
}

/// Function that builds a player strategy from its label.
pub fn create_player_strategy(label: &str) -> Result<Box<dyn PlayerStrategy>, ConfigError> {
    PLAYER_STRATEGIES
        .get(label)
        .map(|constructor| constructor())
        .ok_or_else(|| ConfigError::UnknownStrategy(label.to_string()))
}

/// The labels of every registered player strategy, sorted.
pub fn registered_strategies() -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = PLAYER_STRATEGIES.keys().copied().collect();
    labels.sort_unstable();
    labels
}
