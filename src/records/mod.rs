//! Append-only reading log.
//!
//! Each processed image adds one row with the columns
//! `Filename, Timestamp, PM25, PM10, CO, CO2, Final_AQI`. Rows are never
//! rewritten. Writers take no lock, so two processes appending at the same
//! time can interleave rows.

pub mod csv_reader;
pub mod csv_writer;

pub use csv_reader::ReadingLog;
pub use csv_writer::{append_reading, append_readings, reset_log};
