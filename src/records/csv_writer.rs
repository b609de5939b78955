//! CSV writer for the reading log.
//!
//! Opens the file in append mode for each write, so readings from earlier
//! runs survive a crash midway through a batch.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::reading::PollutantReading;

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Appends readings to the log. Writes the header first if the file is new or empty.
pub fn append_readings(path: &Path, readings: &[PollutantReading]) -> Result<()> {
    ensure_parent_dir(path)?;
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open reading log for append")?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);

    for reading in readings {
        writer
            .serialize(reading)
            .context(format!("Failed to write row for {}", reading.filename))?;
    }

    writer.flush().context("Failed to flush reading log")?;
    Ok(())
}

pub fn append_reading(path: &Path, reading: &PollutantReading) -> Result<()> {
    append_readings(path, std::slice::from_ref(reading))
}

/// Truncates the log. The next append writes a fresh header.
pub fn reset_log(path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    File::create(path).context("Failed to truncate reading log")?;
    Ok(())
}
