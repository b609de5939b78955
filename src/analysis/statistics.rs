//! Statistics over the reading log.
//!
//! Calculates mean, median, min, max, standard deviation and quartiles per
//! column, plus how often each AQI status occurred.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::aqi::AqiStatus;
use crate::reading::Metric;
use crate::records::ReadingLog;

/// Statistics for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct MetricStats {
    /// Column label (PM25, Final_AQI, ...)
    pub metric: String,
    /// Number of values
    pub count: usize,
    /// Arithmetic mean (average)
    pub mean: f64,
    /// Median (middle value)
    pub median: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Standard deviation (population)
    pub std_dev: f64,
    /// First quartile (25th percentile)
    pub quartile_1: f64,
    /// Third quartile (75th percentile)
    pub quartile_3: f64,
}

/// The most recent reading, as shown in the dashboard header.
#[derive(Debug, Clone, Serialize)]
pub struct LatestReading {
    pub filename: String,
    pub timestamp: NaiveDateTime,
    pub final_aqi: u32,
    pub status: AqiStatus,
}

/// Statistics for the whole log.
#[derive(Debug, Clone, Serialize)]
pub struct LogStats {
    pub total_readings: usize,
    pub latest: Option<LatestReading>,
    /// Readings per AQI status
    pub status_counts: BTreeMap<AqiStatus, usize>,
    /// One entry per column, Final_AQI first
    pub columns: Vec<MetricStats>,
}

impl LogStats {
    pub fn from_log(log: &ReadingLog) -> Self {
        let columns = Metric::ALL
            .iter()
            .map(|&metric| calculate_metric_stats(metric.label(), &log.column_values(metric)))
            .collect();

        let mut status_counts = BTreeMap::new();
        for reading in &log.readings {
            *status_counts
                .entry(AqiStatus::from_aqi(reading.final_aqi))
                .or_insert(0) += 1;
        }

        let latest = log.latest().map(|r| LatestReading {
            filename: r.filename.clone(),
            timestamp: r.timestamp,
            final_aqi: r.final_aqi,
            status: AqiStatus::from_aqi(r.final_aqi),
        });

        LogStats {
            total_readings: log.len(),
            latest,
            status_counts,
            columns,
        }
    }

    pub fn column(&self, metric: Metric) -> Option<&MetricStats> {
        self.columns.iter().find(|c| c.metric == metric.label())
    }
}

/// Calculate statistics for a single column of values.
fn calculate_metric_stats(metric: &str, values: &[f64]) -> MetricStats {
    if values.is_empty() {
        return MetricStats {
            metric: metric.to_string(),
            count: 0,
            mean: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            std_dev: 0.0,
            quartile_1: 0.0,
            quartile_3: 0.0,
        };
    }

    let count = values.len();

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = values.iter().sum::<f64>() / count as f64;

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    MetricStats {
        metric: metric.to_string(),
        count,
        mean,
        median: calculate_percentile(&sorted, 50.0),
        min: sorted[0],
        max: sorted[count - 1],
        std_dev: variance.sqrt(),
        quartile_1: calculate_percentile(&sorted, 25.0),
        quartile_3: calculate_percentile(&sorted, 75.0),
    }
}

/// Percentile of sorted values using linear interpolation.
fn calculate_percentile(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let index = (percentile / 100.0) * (n - 1) as f64;
    let lower = sorted[index.floor() as usize];
    let upper = sorted[index.ceil() as usize];
    lower + (upper - lower) * index.fract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{Pollutant, PollutantReading, PollutantValues};

    fn log_with_aqi(aqis: &[u32]) -> ReadingLog {
        ReadingLog {
            readings: aqis
                .iter()
                .enumerate()
                .map(|(i, &aqi)| {
                    let values = PollutantValues { pm25: i as f64, ..Default::default() };
                    PollutantReading::new(format!("{}.jpg", i), values, aqi)
                })
                .collect(),
        }
    }

    #[test]
    fn test_mean_and_median() {
        let stats = calculate_metric_stats("PM25", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((stats.mean - 3.0).abs() < 0.001);
        assert!((stats.median - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_median_even() {
        let stats = calculate_metric_stats("PM25", &[4.0, 1.0, 3.0, 2.0]);
        assert!((stats.median - 2.5).abs() < 0.001);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn test_std_dev_and_quartiles() {
        // Variance of 1..=5 around 3 is 2
        let stats = calculate_metric_stats("PM25", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((stats.std_dev - 1.414).abs() < 0.01);
        assert!((stats.quartile_1 - 2.0).abs() < 0.001);
        assert!((stats.quartile_3 - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_values() {
        let stats = calculate_metric_stats("CO", &[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, 0.0);
    }

    #[test]
    fn test_log_stats() {
        let stats = LogStats::from_log(&log_with_aqi(&[40, 45, 150, 420]));

        assert_eq!(stats.total_readings, 4);
        assert_eq!(stats.columns.len(), 5);
        assert_eq!(stats.columns[0].metric, "Final_AQI");
        assert_eq!(stats.status_counts[&AqiStatus::Good], 2);
        assert_eq!(stats.status_counts[&AqiStatus::Moderate], 1);
        assert_eq!(stats.status_counts[&AqiStatus::Severe], 1);
        assert!(!stats.status_counts.contains_key(&AqiStatus::Poor));

        let latest = stats.latest.as_ref().unwrap();
        assert_eq!(latest.final_aqi, 420);
        assert_eq!(latest.status, AqiStatus::Severe);

        let pm25 = stats.column(Metric::Pollutant(Pollutant::Pm25)).unwrap();
        assert_eq!(pm25.max, 3.0);
    }

    #[test]
    fn test_empty_log() {
        let stats = LogStats::from_log(&ReadingLog::default());
        assert_eq!(stats.total_readings, 0);
        assert!(stats.latest.is_none());
        assert!(stats.status_counts.is_empty());
    }
}
