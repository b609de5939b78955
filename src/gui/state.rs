//! Dashboard state management.
//!
//! Holds the loaded reading log, its statistics and the upload status.

use std::path::Path;
use std::time::Instant;

use tracing::warn;

use crate::analysis::LogStats;
use crate::reading::PollutantReading;
use crate::records::ReadingLog;

/// Upload processing status for display.
#[derive(Clone, Debug, Default)]
pub enum ProcessStatus {
    /// Waiting for an image
    #[default]
    Idle,
    /// OCR running on a background thread
    Processing { filename: String, start_time: Instant },
    /// Last upload was logged
    Done(PollutantReading),
    /// Last upload failed
    Error(String),
}

impl ProcessStatus {
    pub fn status_text(&self) -> String {
        match self {
            Self::Idle => "Ready".to_string(),
            Self::Processing { filename, start_time } => {
                format!("Processing {} ({}s)", filename, start_time.elapsed().as_secs())
            }
            Self::Done(reading) => {
                format!("Logged {} -> AQI {}", reading.filename, reading.final_aqi)
            }
            Self::Error(msg) => format!("Error: {}", msg),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Processing { .. })
    }
}

/// Dashboard state.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Loaded log. `None` when missing, unreadable or empty.
    pub log: Option<ReadingLog>,
    /// Statistics of `log`.
    pub stats: Option<LogStats>,
    /// Image path typed into the upload field.
    pub upload_path: String,
    pub status: ProcessStatus,
    /// Set when the trend chart texture must be redrawn.
    pub chart_dirty: bool,
}

impl DashboardState {
    /// Reload the log from disk. Any failure leaves the dashboard in prompt mode.
    pub fn reload(&mut self, log_path: &Path) {
        let log = match ReadingLog::from_csv(log_path) {
            Ok(log) if !log.is_empty() => Some(log),
            Ok(_) => None,
            Err(e) => {
                if log_path.exists() {
                    warn!("Could not load reading log: {:#}", e);
                }
                None
            }
        };

        self.stats = log.as_ref().map(LogStats::from_log);
        self.log = log;
        self.chart_dirty = true;
    }

    pub fn has_data(&self) -> bool {
        self.log.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::PollutantValues;
    use crate::records::append_reading;
    use tempfile::tempdir;

    #[test]
    fn test_reload_missing_log() {
        let dir = tempdir().unwrap();
        let mut state = DashboardState::default();
        state.reload(&dir.path().join("aqi_logs.csv"));

        assert!(!state.has_data());
        assert!(state.stats.is_none());
    }

    #[test]
    fn test_reload_with_readings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aqi_logs.csv");
        append_reading(&path, &PollutantReading::new("a.jpg", PollutantValues::default(), 0)).unwrap();
        append_reading(&path, &PollutantReading::new("b.jpg", PollutantValues::default(), 120)).unwrap();

        let mut state = DashboardState::default();
        state.reload(&path);

        assert!(state.has_data());
        assert!(state.chart_dirty);
        let stats = state.stats.unwrap();
        assert_eq!(stats.total_readings, 2);
        assert_eq!(stats.latest.unwrap().filename, "b.jpg");
    }

    #[test]
    fn test_status_text() {
        assert!(!ProcessStatus::Idle.is_running());
        let running = ProcessStatus::Processing {
            filename: "x.png".to_string(),
            start_time: Instant::now(),
        };
        assert!(running.is_running());
        assert!(running.status_text().starts_with("Processing x.png"));
        assert_eq!(ProcessStatus::Error("boom".into()).status_text(), "Error: boom");
    }
}
