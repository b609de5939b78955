//! Reading types shared by the extractor, the AQI calculator and the log.

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Pollutants shown on the monitor display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "PM25")]
    Pm25,
    #[serde(rename = "PM10")]
    Pm10,
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "CO2")]
    Co2,
}

impl Pollutant {
    pub const ALL: [Pollutant; 4] = [Self::Pm25, Self::Pm10, Self::Co, Self::Co2];

    /// Column label used in the CSV log ("PM25", "PM10", "CO", "CO2").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pm25 => "PM25",
            Self::Pm10 => "PM10",
            Self::Co => "CO",
            Self::Co2 => "CO2",
        }
    }

    /// Human-readable name for the dashboard.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pm25 => "PM 2.5",
            Self::Pm10 => "PM 10",
            Self::Co => "CO",
            Self::Co2 => "CO2",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Pm25 | Self::Pm10 => "µg/m³",
            Self::Co | Self::Co2 => "ppm",
        }
    }

    /// Looks up a pollutant by its column label. Case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Concentrations assigned from one image. Missing values stay at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PollutantValues {
    pub pm25: f64,
    pub pm10: f64,
    pub co: f64,
    pub co2: f64,
}

impl PollutantValues {
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::Co => self.co,
            Pollutant::Co2 => self.co2,
        }
    }

    pub fn set(&mut self, pollutant: Pollutant, value: f64) {
        match pollutant {
            Pollutant::Pm25 => self.pm25 = value,
            Pollutant::Pm10 => self.pm10 = value,
            Pollutant::Co => self.co = value,
            Pollutant::Co2 => self.co2 = value,
        }
    }
}

/// One row of the reading log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Timestamp", serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "PM25")]
    pub pm25: f64,
    #[serde(rename = "PM10")]
    pub pm10: f64,
    #[serde(rename = "CO")]
    pub co: f64,
    #[serde(rename = "CO2")]
    pub co2: f64,
    #[serde(rename = "Final_AQI", deserialize_with = "deserialize_aqi")]
    pub final_aqi: u32,
}

/// Log timestamp format: ISO-8601 with microseconds.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

fn serialize_timestamp<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// Accepts integer or float AQI cells ("200" or "199.99").
fn deserialize_aqi<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value.round() as u32)
    } else {
        Err(de::Error::custom(format!("invalid AQI value: {}", value)))
    }
}

impl PollutantReading {
    /// Creates a reading stamped with the current local time, to the microsecond.
    pub fn new(filename: impl Into<String>, values: PollutantValues, final_aqi: u32) -> Self {
        let now = Local::now().naive_local().trunc_subsecs(6);
        Self::with_timestamp(filename, now, values, final_aqi)
    }

    pub fn with_timestamp(
        filename: impl Into<String>,
        timestamp: NaiveDateTime,
        values: PollutantValues,
        final_aqi: u32,
    ) -> Self {
        Self {
            filename: filename.into(),
            timestamp,
            pm25: values.pm25,
            pm10: values.pm10,
            co: values.co,
            co2: values.co2,
            final_aqi,
        }
    }

    pub fn values(&self) -> PollutantValues {
        PollutantValues {
            pm25: self.pm25,
            pm10: self.pm10,
            co: self.co,
            co2: self.co2,
        }
    }

    /// Value of a log column as f64.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Pollutant(p) => self.values().get(p),
            Metric::FinalAqi => self.final_aqi as f64,
        }
    }
}

/// A numeric column of the reading log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Pollutant(Pollutant),
    FinalAqi,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::FinalAqi,
        Metric::Pollutant(Pollutant::Pm25),
        Metric::Pollutant(Pollutant::Pm10),
        Metric::Pollutant(Pollutant::Co),
        Metric::Pollutant(Pollutant::Co2),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Pollutant(p) => p.label(),
            Metric::FinalAqi => "Final_AQI",
        }
    }
}
