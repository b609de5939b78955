//! CSV reader for the reading log.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

use crate::reading::{Metric, PollutantReading};

/// All readings loaded from the log, in file order.
#[derive(Debug, Clone, Default)]
pub struct ReadingLog {
    pub readings: Vec<PollutantReading>,
}

impl ReadingLog {
    /// Load readings from a CSV file.
    ///
    /// The first row must be the header. Malformed rows are skipped with a
    /// warning; blank lines are ignored.
    pub fn from_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .context(format!("Failed to open reading log: {}", path.display()))?;

        let mut readings = Vec::new();
        for (index, row) in reader.deserialize::<PollutantReading>().enumerate() {
            match row {
                Ok(reading) => readings.push(reading),
                Err(e) => {
                    // +2: header line and 1-based numbering
                    warn!("Skipping malformed log row {}: {}", index + 2, e);
                }
            }
        }

        Ok(Self { readings })
    }

    /// The most recently appended reading.
    pub fn latest(&self) -> Option<&PollutantReading> {
        self.readings.last()
    }

    /// Readings sorted by timestamp, newest first.
    pub fn newest_first(&self) -> Vec<&PollutantReading> {
        let mut sorted: Vec<&PollutantReading> = self.readings.iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }

    /// Readings sorted by timestamp, oldest first.
    pub fn chronological(&self) -> Vec<&PollutantReading> {
        let mut sorted: Vec<&PollutantReading> = self.readings.iter().collect();
        sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        sorted
    }

    /// All values of one numeric column, in file order.
    pub fn column_values(&self, metric: Metric) -> Vec<f64> {
        self.readings.iter().map(|r| r.metric(metric)).collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
