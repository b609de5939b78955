use anyhow::{anyhow, Result};
use regex::Regex;
use std::cmp::Ordering;
use tracing::debug;

use crate::config::LayoutConfig;
use crate::ocr::Detection;
use crate::reading::{Pollutant, PollutantValues};

/// Digits with at most one decimal point: "12", "1.5", "5.", ".5".
const NUMERIC_PATTERN: &str = r"^([0-9]+\.?[0-9]*|\.[0-9]+)$";

/// Assigns pollutant values from the detections of one image.
pub trait ReadingLayout {
    fn assign(&self, detections: &[Detection], width: u32, height: u32) -> PollutantValues;
}

/// Readouts stacked in a vertical column around the middle of the display.
///
/// Numeric detections whose center lies strictly inside the band are sorted
/// top to bottom and the bottom-most ones are assigned to the configured
/// fields in order. Nothing checks that a number really belongs to the field
/// it lands in: a display with a different layout gets wrong values silently.
#[derive(Clone, Debug)]
pub struct CenterColumnLayout {
    band_min: f64,
    band_max: f64,
    fields: Vec<Pollutant>,
    min_confidence: f32,
    numeric: Regex,
}

impl CenterColumnLayout {
    pub fn new(config: &LayoutConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.band_min)
            || !(0.0..=1.0).contains(&config.band_max)
            || config.band_min >= config.band_max
        {
            return Err(anyhow!(
                "Invalid center band ({}, {}): expected 0 <= min < max <= 1",
                config.band_min,
                config.band_max
            ));
        }

        Ok(Self {
            band_min: config.band_min,
            band_max: config.band_max,
            fields: config.fields.clone(),
            min_confidence: config.min_confidence,
            numeric: Regex::new(NUMERIC_PATTERN)?,
        })
    }

    /// True for digits with at most one decimal point.
    pub fn is_numeric(&self, text: &str) -> bool {
        self.numeric.is_match(text)
    }

    /// Numeric values inside the band as (center_y, value), sorted top to bottom.
    pub fn column_values(&self, detections: &[Detection], width: u32) -> Vec<(f64, f64)> {
        let left = self.band_min * width as f64;
        let right = self.band_max * width as f64;

        let mut values: Vec<(f64, f64)> = detections
            .iter()
            .filter(|d| d.confidence >= self.min_confidence)
            .filter(|d| self.is_numeric(&d.text))
            .filter_map(|d| {
                let value = d.text.parse::<f64>().ok()?;
                let center = d.center();
                (left < center.x && center.x < right).then_some((center.y, value))
            })
            .collect();

        values.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        });
        values
    }
}

impl ReadingLayout for CenterColumnLayout {
    fn assign(&self, detections: &[Detection], width: u32, _height: u32) -> PollutantValues {
        let column = self.column_values(detections, width);
        let mut values = PollutantValues::default();

        if self.fields.is_empty() || column.len() < self.fields.len() {
            debug!(
                "Found {} numeric readouts, need {}. Using zeros.",
                column.len(),
                self.fields.len()
            );
            return values;
        }

        let bottom = &column[column.len() - self.fields.len()..];
        for (&pollutant, &(_, value)) in self.fields.iter().zip(bottom) {
            values.set(pollutant, value);
        }

        debug!("Assigned readouts: {:?}", values);
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: u32 = 1000;
    const HEIGHT: u32 = 800;

    fn layout() -> CenterColumnLayout {
        CenterColumnLayout::new(&LayoutConfig::default()).unwrap()
    }

    /// A 40x20 detection centered at (cx, cy).
    fn at(cx: f64, cy: f64, text: &str) -> Detection {
        Detection::from_rect(cx - 20.0, cy - 10.0, 40.0, 20.0, text, 0.9)
    }

    #[test]
    fn test_is_numeric() {
        let layout = layout();
        assert!(layout.is_numeric("12"));
        assert!(layout.is_numeric("1.5"));
        assert!(layout.is_numeric("5."));
        assert!(layout.is_numeric(".5"));
        assert!(!layout.is_numeric("."));
        assert!(!layout.is_numeric("1.2.3"));
        assert!(!layout.is_numeric("12a"));
        assert!(!layout.is_numeric(""));
        // Arabic-Indic three
        assert!(!layout.is_numeric("\u{0663}"));
    }

    #[test]
    fn test_last_four_assigned_in_order() {
        let detections = vec![
            at(500.0, 100.0, "10"),
            at(500.0, 200.0, "20"),
            at(500.0, 300.0, "30"),
            at(500.0, 400.0, "40"),
            at(500.0, 500.0, "50"),
        ];

        let values = layout().assign(&detections, WIDTH, HEIGHT);
        assert_eq!(values.pm25, 20.0);
        assert_eq!(values.pm10, 30.0);
        assert_eq!(values.co, 40.0);
        assert_eq!(values.co2, 50.0);
    }

    #[test]
    fn test_sorted_by_vertical_position() {
        // Detection order does not matter, only center_y
        let detections = vec![
            at(500.0, 400.0, "415"),
            at(500.0, 100.0, "35"),
            at(500.0, 300.0, "0.9"),
            at(500.0, 200.0, "48"),
        ];

        let values = layout().assign(&detections, WIDTH, HEIGHT);
        assert_eq!(values, PollutantValues { pm25: 35.0, pm10: 48.0, co: 0.9, co2: 415.0 });
    }

    #[test]
    fn test_outside_band_excluded() {
        let detections = vec![
            at(500.0, 100.0, "10"),
            at(500.0, 200.0, "20"),
            at(500.0, 300.0, "30"),
            at(500.0, 400.0, "40"),
            // Units column and label column
            at(800.0, 500.0, "99"),
            at(100.0, 600.0, "77"),
        ];

        let values = layout().assign(&detections, WIDTH, HEIGHT);
        assert_eq!(values, PollutantValues { pm25: 10.0, pm10: 20.0, co: 30.0, co2: 40.0 });
    }

    #[test]
    fn test_band_edges_are_exclusive() {
        let detections = vec![
            at(350.0, 100.0, "1"),
            at(650.0, 200.0, "2"),
            at(500.0, 300.0, "3"),
            at(500.0, 400.0, "4"),
            at(500.0, 500.0, "5"),
        ];

        // Only three survive
        let values = layout().assign(&detections, WIDTH, HEIGHT);
        assert_eq!(values, PollutantValues::default());
    }

    #[test]
    fn test_non_numeric_excluded() {
        let detections = vec![
            at(500.0, 100.0, "1.2.3"),
            at(500.0, 200.0, "12"),
            at(500.0, 300.0, "."),
            at(500.0, 400.0, "34"),
            at(500.0, 500.0, "5.6"),
            at(500.0, 600.0, "789"),
        ];

        let values = layout().assign(&detections, WIDTH, HEIGHT);
        assert_eq!(values, PollutantValues { pm25: 12.0, pm10: 34.0, co: 5.6, co2: 789.0 });
    }

    #[test]
    fn test_fewer_than_four_defaults_to_zero() {
        let detections = vec![
            at(500.0, 100.0, "10"),
            at(500.0, 200.0, "20"),
            at(500.0, 300.0, "30"),
        ];

        let values = layout().assign(&detections, WIDTH, HEIGHT);
        assert_eq!(values, PollutantValues::default());
    }

    #[test]
    fn test_no_detections() {
        assert_eq!(layout().assign(&[], WIDTH, HEIGHT), PollutantValues::default());
    }

    #[test]
    fn test_custom_field_order_and_band() {
        let config = LayoutConfig {
            band_min: 0.1,
            band_max: 0.3,
            fields: vec![Pollutant::Pm10, Pollutant::Pm25],
            min_confidence: 0.0,
        };
        let layout = CenterColumnLayout::new(&config).unwrap();
        let detections = vec![
            at(200.0, 100.0, "60"),
            at(200.0, 200.0, "25"),
            at(500.0, 300.0, "999"),
        ];

        let values = layout.assign(&detections, WIDTH, HEIGHT);
        assert_eq!(values, PollutantValues { pm10: 60.0, pm25: 25.0, ..Default::default() });
    }

    #[test]
    fn test_min_confidence_filters() {
        let config = LayoutConfig {
            min_confidence: 0.5,
            ..LayoutConfig::default()
        };
        let layout = CenterColumnLayout::new(&config).unwrap();
        let mut detections = vec![
            at(500.0, 100.0, "10"),
            at(500.0, 200.0, "20"),
            at(500.0, 300.0, "30"),
            at(500.0, 400.0, "40"),
        ];
        detections[3].confidence = 0.2;

        assert_eq!(layout.assign(&detections, WIDTH, HEIGHT), PollutantValues::default());
    }

    #[test]
    fn test_invalid_band_rejected() {
        let config = LayoutConfig {
            band_min: 0.7,
            band_max: 0.3,
            ..LayoutConfig::default()
        };
        assert!(CenterColumnLayout::new(&config).is_err());
    }
}
