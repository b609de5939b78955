//! Indian CPCB breakpoint tables.

use crate::reading::Pollutant;

/// One concentration band and the index band it maps to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoint {
    pub conc_lo: f64,
    pub conc_hi: f64,
    pub index_lo: f64,
    pub index_hi: f64,
}

impl Breakpoint {
    const fn new(conc_lo: f64, conc_hi: f64, index_lo: f64, index_hi: f64) -> Self {
        Self {
            conc_lo,
            conc_hi,
            index_lo,
            index_hi,
        }
    }

    pub fn contains(&self, concentration: f64) -> bool {
        self.conc_lo <= concentration && concentration <= self.conc_hi
    }

    /// Linear interpolation of the index inside this band.
    pub fn interpolate(&self, concentration: f64) -> f64 {
        let slope = (self.index_hi - self.index_lo) / (self.conc_hi - self.conc_lo);
        self.index_lo + slope * (concentration - self.conc_lo)
    }
}

/// PM2.5, 24-hour average (µg/m³).
const PM25: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 30.0, 0.0, 50.0),
    Breakpoint::new(31.0, 60.0, 51.0, 100.0),
    Breakpoint::new(61.0, 90.0, 101.0, 200.0),
    Breakpoint::new(91.0, 120.0, 201.0, 300.0),
    Breakpoint::new(121.0, 250.0, 301.0, 400.0),
    Breakpoint::new(250.0, 500.0, 401.0, 500.0),
];

/// PM10, 24-hour average (µg/m³).
const PM10: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 50.0, 0.0, 50.0),
    Breakpoint::new(51.0, 100.0, 51.0, 100.0),
    Breakpoint::new(101.0, 250.0, 101.0, 200.0),
    Breakpoint::new(251.0, 350.0, 201.0, 300.0),
    Breakpoint::new(351.0, 430.0, 301.0, 400.0),
    Breakpoint::new(430.0, 500.0, 401.0, 500.0),
];

/// CO, 8-hour average (mg/m³, displayed as ppm by the monitor).
const CO: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 1.0, 0.0, 50.0),
    Breakpoint::new(1.1, 2.0, 51.0, 100.0),
    Breakpoint::new(2.1, 10.0, 101.0, 200.0),
    Breakpoint::new(10.1, 17.0, 201.0, 300.0),
    Breakpoint::new(17.1, 34.0, 301.0, 400.0),
    Breakpoint::new(34.1, 100.0, 401.0, 500.0),
];

/// Returns the ordered bands for a pollutant, or `None` if it has no table (CO2).
pub fn table_for(pollutant: Pollutant) -> Option<&'static [Breakpoint]> {
    match pollutant {
        Pollutant::Pm25 => Some(&PM25),
        Pollutant::Pm10 => Some(&PM10),
        Pollutant::Co => Some(&CO),
        Pollutant::Co2 => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_ordered() {
        for pollutant in [Pollutant::Pm25, Pollutant::Pm10, Pollutant::Co] {
            let table = table_for(pollutant).unwrap();
            assert_eq!(table[0].conc_lo, 0.0);
            for pair in table.windows(2) {
                assert!(pair[0].conc_hi <= pair[1].conc_lo, "{} bands overlap", pollutant);
                assert!(pair[0].index_hi < pair[1].index_lo);
            }
        }
    }

    #[test]
    fn test_co2_has_no_table() {
        assert!(table_for(Pollutant::Co2).is_none());
    }

    #[test]
    fn test_interpolate_endpoints() {
        let band = Breakpoint::new(61.0, 90.0, 101.0, 200.0);
        assert!((band.interpolate(61.0) - 101.0).abs() < 1e-9);
        assert!((band.interpolate(90.0) - 200.0).abs() < 1e-9);
    }
}
