//! Application configuration.
//!
//! Loads settings from config.json. Every section falls back to defaults when
//! the file or a field is missing, so a partial file only overrides what it
//! names. The loaded config is passed explicitly to the pipeline, the report
//! and the dashboard.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::analysis::config::ChartConfig;
use crate::reading::Pollutant;

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ocr: OcrConfig,
    pub layout: LayoutConfig,
    pub storage: StorageConfig,
    pub chart: ChartConfig,
}

/// Tesseract invocation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Explicit path to the tesseract executable. Searched on PATH when unset.
    pub executable: Option<PathBuf>,
    /// Explicit tessdata directory.
    pub tessdata_dir: Option<PathBuf>,
    /// Trained data language
    pub language: String,
    /// Page segmentation mode. 11 = sparse text, suited to scattered readouts.
    pub psm: u8,
    /// Characters the engine may emit
    pub allowlist: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            executable: None,
            tessdata_dir: None,
            language: "eng".to_string(),
            psm: 11,
            allowlist: "0123456789.".to_string(),
        }
    }
}

/// Where the readouts sit on the monitor display.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Left edge of the readout column as a fraction of image width (exclusive)
    pub band_min: f64,
    /// Right edge of the readout column (exclusive)
    pub band_max: f64,
    /// Pollutants of the bottom-most readouts, top to bottom
    pub fields: Vec<Pollutant>,
    /// Detections below this confidence (0.0-1.0) are ignored
    pub min_confidence: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            band_min: 0.35,
            band_max: 0.65,
            fields: vec![Pollutant::Pm25, Pollutant::Pm10, Pollutant::Co, Pollutant::Co2],
            min_confidence: 0.0,
        }
    }
}

/// File locations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Append-only reading log
    pub log_path: PathBuf,
    /// Folder scanned in batch mode
    pub input_dir: PathBuf,
    /// Output folder for charts and statistics
    pub report_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("aqi_logs.csv"),
            input_dir: PathBuf::from("input_images"),
            report_dir: PathBuf::from("report"),
        }
    }
}

impl AppConfig {
    /// Load config from file, or return defaults if the file is missing or invalid.
    pub fn load(config_path: &Path) -> Self {
        if !config_path.exists() {
            info!("{} not found. Using default config.", config_path.display());
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    info!("Config loaded from {}", config_path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}. Using defaults.", config_path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}. Using defaults.", config_path.display(), e);
                Self::default()
            }
        }
    }

    /// Save default config to file (for reference).
    pub fn save_default(config_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;
        fs::write(config_path, json)
            .context(format!("Failed to write {}", config_path.display()))?;
        Ok(())
    }
}
