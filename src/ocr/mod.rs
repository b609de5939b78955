//! Text detection over monitor photographs.
//!
//! The pipeline only depends on the [`TextDetector`] trait. The Tesseract
//! backend is constructed once at startup and passed in.

pub mod engine;
pub mod setup;

pub use engine::TesseractDetector;
pub use setup::{ensure_tessdata, TesseractPaths};

use anyhow::Result;
use image::DynamicImage;

/// A point in image pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A recognized text fragment.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Corners clockwise from top-left
    pub bbox: [Point; 4],
    pub text: String,
    /// Recognition confidence, 0.0 to 1.0
    pub confidence: f32,
}

impl Detection {
    /// Builds a detection from an axis-aligned box.
    pub fn from_rect(left: f64, top: f64, width: f64, height: f64, text: &str, confidence: f32) -> Self {
        Self {
            bbox: [
                Point::new(left, top),
                Point::new(left + width, top),
                Point::new(left + width, top + height),
                Point::new(left, top + height),
            ],
            text: text.to_string(),
            confidence,
        }
    }

    /// Average of the four corners.
    pub fn center(&self) -> Point {
        let (sx, sy) = self
            .bbox
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / 4.0, sy / 4.0)
    }
}

/// An OCR engine that finds text fragments in an image.
pub trait TextDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_of_rect() {
        let d = Detection::from_rect(10.0, 20.0, 30.0, 10.0, "12", 0.9);
        assert_eq!(d.center(), Point::new(25.0, 25.0));
    }

    #[test]
    fn test_center_of_skewed_quad() {
        let d = Detection {
            bbox: [
                Point::new(0.0, 0.0),
                Point::new(10.0, 2.0),
                Point::new(12.0, 12.0),
                Point::new(2.0, 10.0),
            ],
            text: "5".to_string(),
            confidence: 1.0,
        };
        assert_eq!(d.center(), Point::new(6.0, 6.0));
    }
}
