//! Sub-index and overall AQI calculation.

use super::breakpoints::table_for;
use crate::reading::{Pollutant, PollutantValues};

/// Index returned for concentrations above the last band of a table.
pub const SATURATED_INDEX: f64 = 500.0;

/// Pollutants that contribute to the overall AQI. CO2 is recorded only.
const AQI_POLLUTANTS: [Pollutant; 3] = [Pollutant::Pm25, Pollutant::Pm10, Pollutant::Co];

/// Sub-index for a pollutant given by its column label ("PM25", "PM10", "CO").
///
/// Returns 0 for non-positive concentrations and for labels without a
/// breakpoint table.
pub fn get_sub_index(concentration: f64, pollutant: &str) -> f64 {
    match Pollutant::from_label(pollutant) {
        Some(p) => sub_index(concentration, p),
        None => 0.0,
    }
}

/// Piecewise-linear sub-index of one concentration.
///
/// The first band with `conc_lo <= c <= conc_hi` wins. A value that matches
/// no band gets 500, both above the table and in the rounding gap between two
/// bands (PM2.5 30.5).
pub fn sub_index(concentration: f64, pollutant: Pollutant) -> f64 {
    let Some(table) = table_for(pollutant) else {
        return 0.0;
    };
    if concentration.is_nan() || concentration <= 0.0 {
        return 0.0;
    }

    table
        .iter()
        .find(|band| band.contains(concentration))
        .map_or(SATURATED_INDEX, |band| band.interpolate(concentration))
}

/// Overall AQI: the maximum of the PM2.5, PM10 and CO sub-indices, halves
/// rounded to even.
pub fn final_aqi(values: &PollutantValues) -> u32 {
    let max = AQI_POLLUTANTS
        .iter()
        .map(|&p| sub_index(values.get(p), p))
        .fold(0.0_f64, f64::max);
    max.round_ties_even() as u32
}
