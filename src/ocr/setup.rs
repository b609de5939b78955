use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::paths;

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

/// Install locations checked when tesseract is not on PATH.
const COMMON_EXECUTABLES: [&str; 5] = [
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

const COMMON_TESSDATA: [&str; 6] = [
    r"C:\Program Files\Tesseract-OCR\tessdata",
    r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/local/share/tessdata",
    "/opt/homebrew/share/tessdata",
];

#[derive(Clone, Debug)]
pub struct TesseractPaths {
    pub executable: PathBuf,
    /// `None` lets tesseract use its compiled-in data path.
    pub tessdata: Option<PathBuf>,
}

fn traineddata_file(language: &str) -> String {
    format!("{}.traineddata", language)
}

fn has_traineddata(dir: &Path, language: &str) -> bool {
    dir.join(traineddata_file(language)).exists()
}

/// Finds the Tesseract executable: configured path, then PATH, then common locations.
pub fn find_tesseract_executable(config: &OcrConfig) -> Result<PathBuf> {
    if let Some(exe) = &config.executable {
        if exe.exists() {
            return Ok(exe.clone());
        }
        warn!("Configured tesseract not found at {}", exe.display());
    }

    if let Ok(output) = Command::new("tesseract").arg("--version").output() {
        if output.status.success() {
            return Ok(PathBuf::from("tesseract"));
        }
    }

    COMMON_EXECUTABLES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .ok_or_else(|| anyhow!("Tesseract not found. Please install Tesseract-OCR."))
}

/// Finds a tessdata directory holding the configured language.
pub fn find_tessdata_dir(config: &OcrConfig) -> Option<PathBuf> {
    let language = config.language.as_str();

    if let Some(dir) = &config.tessdata_dir {
        if has_traineddata(dir, language) {
            return Some(dir.clone());
        }
        warn!("{} missing from configured tessdata {}", traineddata_file(language), dir.display());
    }

    let local = paths::get_tessdata_dir();
    if has_traineddata(&local, language) {
        return Some(local);
    }

    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        let prefix = PathBuf::from(prefix);
        for candidate in [prefix.clone(), prefix.join("tessdata")] {
            if has_traineddata(&candidate, language) {
                return Some(candidate);
            }
        }
    }

    COMMON_TESSDATA
        .iter()
        .map(PathBuf::from)
        .find(|p| has_traineddata(p, language))
}

/// Locates Tesseract and makes sure trained data for the configured language
/// exists, downloading it into the app data directory if necessary.
pub fn ensure_tessdata(config: &OcrConfig) -> Result<TesseractPaths> {
    let executable = find_tesseract_executable(config)?;
    info!("Tesseract found at: {}", executable.display());

    if let Some(tessdata) = find_tessdata_dir(config) {
        info!("Trained data found in: {}", tessdata.display());
        return Ok(TesseractPaths {
            executable,
            tessdata: Some(tessdata),
        });
    }

    info!("{} not found locally, downloading...", traineddata_file(&config.language));
    let tessdata = paths::get_tessdata_dir();
    fs::create_dir_all(&tessdata)
        .context(format!("Failed to create {}", tessdata.display()))?;
    download_tessdata(&tessdata, &config.language)?;

    Ok(TesseractPaths {
        executable,
        tessdata: Some(tessdata),
    })
}

/// Downloads trained data for one language from the tessdata repository.
fn download_tessdata(tessdata_dir: &Path, language: &str) -> Result<()> {
    let file_name = traineddata_file(language);
    let url = format!("{}/{}", TESSDATA_REPO, file_name);
    let target = tessdata_dir.join(&file_name);

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let response = client
        .get(&url)
        .header("User-Agent", "aqi-vision")
        .send()
        .context(format!("Failed to request {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to download {}: HTTP {}",
            file_name,
            response.status()
        ));
    }

    let bytes = response.bytes()?;
    let mut file = fs::File::create(&target)
        .context(format!("Failed to create {}", target.display()))?;
    file.write_all(&bytes)?;

    info!("Downloaded {} ({} bytes)", file_name, bytes.len());
    Ok(())
}
