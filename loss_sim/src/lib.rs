//! Simulates many independent blackjack tables to measure how quickly a betting and playing strategy loses its
//! starting cash.

pub mod config;
pub mod error;
pub mod game;
pub mod stats;
pub mod write;

use blackjack_cards::prelude::*;
use config::SimulationProperties;
use error::{ConfigError, SimulationError};
use game::dealer::Dealer;
use game::player::Player;
use game::strategy::{create_player_strategy, StandardDealerStrategy};
use game::table::TableSimulation;
use rayon::prelude::*;
use stats::{BatchAccumulator, StrategyStatistics};
use tracing::{debug, error, info};
use write::{ReportSink, StatisticsSink};

pub mod prelude {
    pub use super::config::{PlayerProperties, SimulationProperties, SimulationPropertiesBuilder};
    pub use super::error::{BlackjackGameError, ConfigError, SimulationError, SinkError};
    pub use super::game::prelude::*;
    pub use super::stats::{BatchAccumulator, StrategyStatistics, StrategyTotals};
    pub use super::write::{
        ConsoleReporter, JsonStatisticsSink, MemoryStatisticsSink, ReportSink, StatisticsSink,
        TracingReporter,
    };
    pub use super::{build_table_simulation, run_single_simulation, SimulationRunner};
    pub use blackjack_cards::prelude::*;
}

/// Function that builds a fresh table for run `run_index` from `properties`: a new shoe, a new dealer and one
/// new player per configured seat. When the properties carry a seed the shoe is seeded with `seed + run_index`.
pub fn build_table_simulation(
    properties: &SimulationProperties,
    run_index: usize,
) -> Result<TableSimulation, SimulationError> {
    let shoe = match properties.seed {
        Some(seed) => Shoe::with_seed(
            properties.deck_count,
            &BlackjackValueAssigner,
            seed.wrapping_add(run_index as u64),
        ),
        None => Shoe::new(properties.deck_count, &BlackjackValueAssigner),
    };
    let dealer = Dealer::new(
        properties.table_settings(),
        shoe,
        Box::new(StandardDealerStrategy),
    );
    let mut table = TableSimulation::new(dealer);
    for (seat, player_properties) in properties.players.iter().enumerate() {
        let strategy = create_player_strategy(&player_properties.strategy)?;
        let player = Player::new(seat, strategy, player_properties.starting_cash);
        table
            .seat(player)
            .map_err(|source| SimulationError::Run { run_index, source })?;
    }
    Ok(table)
}

/// Function that plays one complete run and returns every player that took part in it.
pub fn run_single_simulation(
    properties: &SimulationProperties,
    run_index: usize,
) -> Result<Vec<Player>, SimulationError> {
    let table = build_table_simulation(properties, run_index)?;
    let players = table
        .run_until_all_players_leave()
        .map_err(|source| SimulationError::Run { run_index, source })?;
    debug!(run = run_index, "simulation finished");
    Ok(players)
}

/// Runs batches of independent simulations and hands the aggregated statistics to its sinks.
///
/// Each run is built from scratch and executed on the rayon thread pool. The batch waits for every run to finish
/// before anything is aggregated, and a single failed run fails the whole batch.
pub struct SimulationRunner<S: StatisticsSink, R: ReportSink> {
    statistics_sink: S,
    report_sink: R,
}

impl<S: StatisticsSink, R: ReportSink> SimulationRunner<S, R> {
    pub fn new(statistics_sink: S, report_sink: R) -> SimulationRunner<S, R> {
        SimulationRunner {
            statistics_sink,
            report_sink,
        }
    }

    pub fn statistics_sink(&self) -> &S {
        &self.statistics_sink
    }

    /// Method that runs `run_count` simulations of `properties` and returns one statistics record per strategy,
    /// in the order the strategies first appear among the configured players.
    pub fn run(
        &mut self,
        properties: &SimulationProperties,
        run_count: usize,
    ) -> Result<Vec<StrategyStatistics>, SimulationError> {
        if run_count == 0 {
            return Err(ConfigError::ZeroRuns.into());
        }
        properties.validate()?;
        info!(
            runs = run_count,
            players = properties.players.len(),
            decks = properties.deck_count,
            "starting simulation batch"
        );

        let finished = (0..run_count)
            .into_par_iter()
            .map(|run_index| run_single_simulation(properties, run_index))
            .collect::<Result<Vec<Vec<Player>>, SimulationError>>()
            .map_err(|e| {
                error!(error = %e, "simulation batch failed");
                e
            })?;

        let mut accumulator = BatchAccumulator::new(properties, run_count);
        for (run_index, players) in finished.iter().enumerate() {
            for player in players {
                self.report_sink.print_single_run_outcome(run_index, player)?;
            }
            accumulator.fold_run(players);
        }
        let statistics = accumulator.finish();

        self.statistics_sink.save(&statistics)?;
        self.report_sink.print_summary(&statistics)?;
        info!(
            runs = run_count,
            strategies = statistics.len(),
            "simulation batch complete"
        );
        Ok(statistics)
    }
}
