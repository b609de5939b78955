//! AQI status categories for display.

use serde::Serialize;
use std::fmt;

/// CPCB AQI category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AqiStatus {
    Good,
    Satisfactory,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Severe,
}

impl AqiStatus {
    pub const ALL: [AqiStatus; 6] = [
        Self::Good,
        Self::Satisfactory,
        Self::Moderate,
        Self::Poor,
        Self::VeryPoor,
        Self::Severe,
    ];

    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Satisfactory,
            101..=200 => Self::Moderate,
            201..=300 => Self::Poor,
            301..=400 => Self::VeryPoor,
            _ => Self::Severe,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Satisfactory => "Satisfactory",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Severe => "Severe",
        }
    }

    /// Banner color [R, G, B].
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Good => [0x00, 0xe4, 0x00],
            Self::Satisfactory => [0x92, 0xd0, 0x50],
            Self::Moderate => [0xff, 0xff, 0x00],
            Self::Poor => [0xff, 0x99, 0x00],
            Self::VeryPoor => [0xff, 0x00, 0x00],
            Self::Severe => [0x7e, 0x00, 0x23],
        }
    }

    /// Color as a `#rrggbb` string.
    pub fn hex_color(&self) -> String {
        let [r, g, b] = self.color();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl fmt::Display for AqiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(AqiStatus::from_aqi(0), AqiStatus::Good);
        assert_eq!(AqiStatus::from_aqi(50), AqiStatus::Good);
        assert_eq!(AqiStatus::from_aqi(51), AqiStatus::Satisfactory);
        assert_eq!(AqiStatus::from_aqi(100), AqiStatus::Satisfactory);
        assert_eq!(AqiStatus::from_aqi(200), AqiStatus::Moderate);
        assert_eq!(AqiStatus::from_aqi(300), AqiStatus::Poor);
        assert_eq!(AqiStatus::from_aqi(400), AqiStatus::VeryPoor);
        assert_eq!(AqiStatus::from_aqi(401), AqiStatus::Severe);
        assert_eq!(AqiStatus::from_aqi(500), AqiStatus::Severe);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(AqiStatus::Good.hex_color(), "#00e400");
        assert_eq!(AqiStatus::Severe.hex_color(), "#7e0023");
        assert_eq!(AqiStatus::VeryPoor.label(), "Very Poor");
    }
}
