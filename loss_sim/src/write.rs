//! Destinations for the results of a batch: statistics sinks keep the aggregated records, report sinks present
//! them.

use crate::error::SinkError;
use crate::game::player::Player;
use crate::stats::StrategyStatistics;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Receives the statistics of a batch, exactly once per batch.
pub trait StatisticsSink {
    fn save(&mut self, statistics: &[StrategyStatistics]) -> Result<(), SinkError>;
}

/// Presents the results of a batch.
pub trait ReportSink {
    fn print_summary(&mut self, statistics: &[StrategyStatistics]) -> Result<(), SinkError>;

    /// Called once per finished run and player, does nothing unless a sink wants per-run output.
    fn print_single_run_outcome(&mut self, _run_index: usize, _player: &Player) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Writes the statistics of a batch as a pretty printed JSON array.
pub struct JsonStatisticsSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonStatisticsSink<W> {
    pub fn new(writer: W) -> JsonStatisticsSink<W> {
        JsonStatisticsSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> StatisticsSink for JsonStatisticsSink<W> {
    fn save(&mut self, statistics: &[StrategyStatistics]) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut self.writer, statistics)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every saved batch in memory. Clones share the same storage, so a clone handed to a runner can be read
/// back afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatisticsSink {
    batches: Arc<Mutex<Vec<Vec<StrategyStatistics>>>>,
}

impl MemoryStatisticsSink {
    pub fn new() -> MemoryStatisticsSink {
        MemoryStatisticsSink::default()
    }

    /// Every batch saved so far, oldest first.
    pub fn batches(&self) -> Vec<Vec<StrategyStatistics>> {
        match self.batches.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn last_batch(&self) -> Option<Vec<StrategyStatistics>> {
        self.batches().pop()
    }
}

impl StatisticsSink for MemoryStatisticsSink {
    fn save(&mut self, statistics: &[StrategyStatistics]) -> Result<(), SinkError> {
        let mut guard = match self.batches.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(statistics.to_vec());
        Ok(())
    }
}

/// Writes fixed width text tables. With `verbose` set, it also writes a line for every finished run.
pub struct ConsoleReporter<W: Write> {
    writer: W,
    verbose: bool,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(writer: W, verbose: bool) -> ConsoleReporter<W> {
        ConsoleReporter { writer, verbose }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for ConsoleReporter<W> {
    fn print_summary(&mut self, statistics: &[StrategyStatistics]) -> Result<(), SinkError> {
        const width: usize = 80;
        let run_count = statistics.first().map_or(0, |s| s.run_count);
        writeln!(self.writer, "{}", "-".repeat(width))?;
        writeln!(
            self.writer,
            "{:-^width$}",
            format!("ran {} simulations", run_count)
        )?;
        for stats in statistics {
            write!(self.writer, "{}", stats)?;
            writeln!(self.writer, "{}", "-".repeat(width))?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn print_single_run_outcome(&mut self, run_index: usize, player: &Player) -> Result<(), SinkError> {
        if !self.verbose {
            return Ok(());
        }
        writeln!(
            self.writer,
            "Simulation {} ended in {} hands for {} in seat {}. Max cash: ${}",
            run_index + 1,
            player.history().len(),
            player.label(),
            player.seat(),
            player.max_cash_after_outcome()
        )?;
        Ok(())
    }
}

/// Reports through `tracing` events instead of writing anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ReportSink for TracingReporter {
    fn print_summary(&mut self, statistics: &[StrategyStatistics]) -> Result<(), SinkError> {
        for stats in statistics {
            info!(
                strategy = %stats.strategy,
                runs = stats.run_count,
                hands = stats.hands_played,
                average_bet = stats.average_bet,
                average_hands_until_broke = stats.average_count_of_hands_until_broke,
                won = stats.won_hands_percent,
                lost = stats.lost_hands_percent,
                pushed = stats.pushed_hands_percent,
                loss_rate = stats.loss_rate,
                "strategy summary"
            );
        }
        Ok(())
    }

    fn print_single_run_outcome(&mut self, run_index: usize, player: &Player) -> Result<(), SinkError> {
        debug!(
            run = run_index + 1,
            seat = player.seat(),
            strategy = player.label(),
            hands = player.history().len(),
            max_cash = %player.max_cash_after_outcome(),
            "simulation ended"
        );
        Ok(())
    }
}
