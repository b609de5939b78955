//! Mapping OCR detections to pollutant fields.

pub mod classifier;

pub use classifier::{CenterColumnLayout, ReadingLayout};
