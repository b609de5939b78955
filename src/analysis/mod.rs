//! Statistics and chart visualization for the reading log.
//!
//! This module provides:
//! - Statistics per log column and AQI status counts
//! - The historical trend chart (file or in-memory pixels)
//! - A box plot panel per column
//! - JSON export of statistics

pub mod charts;
pub mod config;
pub mod export;
pub mod statistics;

pub use config::ChartConfig;
pub use statistics::LogStats;

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::records::ReadingLog;

/// Files written by [`generate_report`].
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub trend_chart: PathBuf,
    pub box_plot: PathBuf,
    pub statistics: PathBuf,
}

/// Runs the full report pipeline: calculate stats, draw charts, export JSON.
pub fn generate_report(log: &ReadingLog, output_dir: &Path, config: &ChartConfig) -> Result<ReportFiles> {
    if log.is_empty() {
        return Err(anyhow!("No readings in log"));
    }

    fs::create_dir_all(output_dir)
        .context(format!("Failed to create report directory: {}", output_dir.display()))?;

    let files = ReportFiles {
        trend_chart: output_dir.join("aqi_trend.png"),
        box_plot: output_dir.join("box_plot.png"),
        statistics: output_dir.join("statistics.json"),
    };

    let stats = LogStats::from_log(log);

    charts::generate_trend_chart(log, &files.trend_chart, config)?;
    charts::generate_box_plot(&stats, &files.box_plot, config)?;
    info!("Charts saved in {}", output_dir.display());

    export::export_to_json(&stats, &files.statistics)?;
    info!("Statistics JSON saved: {}", files.statistics.display());

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_log_is_error() {
        let dir = tempdir().unwrap();
        let result = generate_report(&ReadingLog::default(), dir.path(), &ChartConfig::default());
        assert!(result.is_err());
        assert!(!dir.path().join("statistics.json").exists());
    }
}
