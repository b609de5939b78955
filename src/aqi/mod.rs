//! AQI computation from pollutant concentrations.
//!
//! This module provides:
//! - CPCB breakpoint tables for PM2.5, PM10 and CO
//! - Piecewise-linear sub-index calculation and the overall AQI
//! - Six-level status categories with display colors

pub mod breakpoints;
pub mod calculator;
pub mod status;

pub use breakpoints::Breakpoint;
pub use calculator::{final_aqi, get_sub_index, sub_index, SATURATED_INDEX};
pub use status::AqiStatus;
