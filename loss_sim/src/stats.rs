//! Aggregation of finished runs into per-strategy statistics.

use crate::config::SimulationProperties;
use crate::game::hand::HandOutcome;
use crate::game::player::Player;
use blackjack_cards::prelude::Money;
use serde::Serialize;
use std::fmt::Display;

/// Raw sums for one strategy. Every field is a plain sum, so totals can be folded in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyTotals {
    pub label: String,
    pub starting_cash: Money,
    pub hands_played: u64,
    pub hands_won: u64,
    pub hands_lost: u64,
    pub hands_pushed: u64,
    pub naturals_won: u64,
    pub total_wagered: Money,
    pub total_cash_lost: Money,
}

impl StrategyTotals {
    pub fn new<S: Into<String>>(label: S, starting_cash: Money) -> StrategyTotals {
        StrategyTotals {
            label: label.into(),
            starting_cash,
            hands_played: 0,
            hands_won: 0,
            hands_lost: 0,
            hands_pushed: 0,
            naturals_won: 0,
            total_wagered: Money::ZERO,
            total_cash_lost: Money::ZERO,
        }
    }

    /// Method that adds the settled hands of a finished player to the totals.
    pub fn record_player(&mut self, player: &Player) {
        let history = player.history();
        self.hands_played += history.len() as u64;
        self.hands_won += player.count_outcomes(HandOutcome::Won) as u64;
        self.hands_lost += player.count_outcomes(HandOutcome::Lost) as u64;
        self.hands_pushed += player.count_outcomes(HandOutcome::Pushed) as u64;
        self.naturals_won += history
            .iter()
            .filter(|record| record.hand.outcome() == HandOutcome::Won && record.hand.is_natural())
            .count() as u64;
        self.total_wagered += history.iter().map(|record| record.hand.bet()).sum::<Money>();
        self.total_cash_lost += player.starting_cash() - player.cash();
    }
}

/// Collects the players of every run of a batch. Owned by the coordinating thread only.
#[derive(Debug, Clone)]
pub struct BatchAccumulator {
    run_count: usize,
    totals: Vec<StrategyTotals>,
}

impl BatchAccumulator {
    /// Associated function to create an accumulator with one slot per strategy in `properties`, in the order the
    /// strategies first appear. A slot's starting cash is the combined starting cash of its seats.
    pub fn new(properties: &SimulationProperties, run_count: usize) -> BatchAccumulator {
        let totals = properties
            .strategy_labels()
            .into_iter()
            .map(|label| {
                let starting_cash = properties
                    .players
                    .iter()
                    .filter(|p| p.strategy == label)
                    .map(|p| p.starting_cash)
                    .sum();
                StrategyTotals::new(label, starting_cash)
            })
            .collect();
        BatchAccumulator {
            run_count,
            totals,
        }
    }

    /// Folds the finished players of one run into the totals of their strategies.
    pub fn fold_run(&mut self, players: &[Player]) {
        for player in players {
            if let Some(totals) = self.totals.iter_mut().find(|t| t.label == player.label()) {
                totals.record_player(player);
            }
        }
    }

    pub fn totals(&self) -> &[StrategyTotals] {
        &self.totals
    }

    /// Method that derives the statistics of every strategy, in the order of the template.
    pub fn finish(self) -> Vec<StrategyStatistics> {
        let run_count = self.run_count;
        self.totals
            .into_iter()
            .map(|totals| StrategyStatistics::from_totals(totals, run_count))
            .collect()
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// The statistics of one strategy over a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyStatistics {
    pub strategy: String,
    pub starting_cash: Money,
    pub run_count: usize,
    pub hands_played: u64,
    pub hands_won: u64,
    pub hands_lost: u64,
    pub hands_pushed: u64,
    pub naturals_won: u64,
    pub total_money_bet: Money,
    pub total_money_lost: Money,
    pub average_bet: f64,
    pub average_count_of_hands_until_broke: f64,
    pub average_money_lost_per_hand: f64,
    pub won_hands_percent: f64,
    pub lost_hands_percent: f64,
    pub pushed_hands_percent: f64,
    pub loss_rate: f64,
}

impl StrategyStatistics {
    /// Derives the averages and rates from the raw totals. Every ratio with a zero denominator is reported as 0.
    pub fn from_totals(totals: StrategyTotals, run_count: usize) -> StrategyStatistics {
        let hands = totals.hands_played as f64;
        let average_bet = ratio(totals.total_wagered.as_f64(), hands);
        let average_count_of_hands_until_broke = ratio(hands, run_count as f64);
        StrategyStatistics {
            average_bet,
            average_count_of_hands_until_broke,
            average_money_lost_per_hand: ratio(totals.total_cash_lost.as_f64(), hands),
            won_hands_percent: ratio(totals.hands_won as f64, hands),
            lost_hands_percent: ratio(totals.hands_lost as f64, hands),
            pushed_hands_percent: ratio(totals.hands_pushed as f64, hands),
            loss_rate: ratio(average_bet, totals.starting_cash.as_f64()) * average_count_of_hands_until_broke,
            strategy: totals.label,
            starting_cash: totals.starting_cash,
            run_count,
            hands_played: totals.hands_played,
            hands_won: totals.hands_won,
            hands_lost: totals.hands_lost,
            hands_pushed: totals.hands_pushed,
            naturals_won: totals.naturals_won,
            total_money_bet: totals.total_wagered,
            total_money_lost: totals.total_cash_lost,
        }
    }
}

impl Display for StrategyStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const width: usize = 80;
        const text_width: usize = "average count of hands until broke".len() + 12;
        const num_width: usize = width - text_width;
        let body = format!(
            "{}{}\n\
        {:<text_width$}{:>num_width$}\n\
        {:<text_width$}{:>num_width$}\n\
        {:<text_width$}{:>num_width$}\n\
        {:<text_width$}{:>num_width$}\n\
        {:<text_width$}{:>num_width$}\n\
        {:<text_width$}{:>num_width$}\n\
        {:<text_width$}{:>num_width$}\n\
        {:<text_width$}{:>num_width$}\n\
        {:<text_width$}{:>num_width$}\n\
        {:<text_width$}{:>num_width$.2}\n\
        {:<text_width$}{:>num_width$.2}\n\
        {:<text_width$}{:>num_width$.2}\n\
        {:<text_width$}{:>num_width$.4}\n\
        {:<text_width$}{:>num_width$.4}\n\
        {:<text_width$}{:>num_width$.4}\n\
        {:<text_width$}{:>num_width$.4}\n",
            "strategy: ",
            self.strategy,
            "starting cash",
            self.starting_cash,
            "simulations run",
            self.run_count,
            "total hands played",
            self.hands_played,
            "hands won",
            self.hands_won,
            "hands lost",
            self.hands_lost,
            "hands pushed",
            self.hands_pushed,
            "naturals won",
            self.naturals_won,
            "total money bet",
            self.total_money_bet,
            "total money lost",
            self.total_money_lost,
            "average bet",
            self.average_bet,
            "average count of hands until broke",
            self.average_count_of_hands_until_broke,
            "average money lost per hand",
            self.average_money_lost_per_hand,
            "won hands percent",
            self.won_hands_percent,
            "lost hands percent",
            self.lost_hands_percent,
            "pushed hands percent",
            self.pushed_hands_percent,
            "loss rate",
            self.loss_rate
        );
        write!(f, "{}", body)
    }
}
