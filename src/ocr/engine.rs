use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::debug;

use super::setup::{find_tessdata_dir, find_tesseract_executable, TesseractPaths};
use super::{Detection, TextDetector};
use crate::config::OcrConfig;

/// Tesseract CLI backend.
///
/// Paths are resolved once in [`TesseractDetector::new`]; each `detect` call
/// spawns one tesseract process.
#[derive(Clone, Debug)]
pub struct TesseractDetector {
    paths: TesseractPaths,
    language: String,
    psm: u8,
    allowlist: String,
}

impl TesseractDetector {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let paths = TesseractPaths {
            executable: find_tesseract_executable(config)?,
            tessdata: find_tessdata_dir(config),
        };
        Ok(Self::with_paths(paths, config))
    }

    pub fn with_paths(paths: TesseractPaths, config: &OcrConfig) -> Self {
        Self {
            paths,
            language: config.language.clone(),
            psm: config.psm,
            allowlist: config.allowlist.clone(),
        }
    }

    pub fn paths(&self) -> &TesseractPaths {
        &self.paths
    }
}

impl TextDetector for TesseractDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let gray = image.to_luma8();

        let temp_input = NamedTempFile::with_suffix(".png")?;
        gray.save(temp_input.path())
            .context("Failed to write OCR input image")?;

        // Tesseract appends .tsv to the output base
        let temp_output = NamedTempFile::new()?;
        let output_base = temp_output.path().to_string_lossy().to_string();

        let mut command = Command::new(&self.paths.executable);
        command.arg(temp_input.path()).arg(&output_base);
        if let Some(tessdata) = &self.paths.tessdata {
            command.arg("--tessdata-dir").arg(tessdata);
        }
        let output = command
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("-c")
            .arg(format!("tessedit_char_whitelist={}", self.allowlist))
            .arg("tsv")
            .output()
            .context("Failed to run tesseract")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        let tsv_path = format!("{}.tsv", output_base);
        let tsv_content = std::fs::read_to_string(&tsv_path)
            .map_err(|e| anyhow!("Failed to read Tesseract output: {}", e))?;
        let _ = std::fs::remove_file(&tsv_path);

        let detections = parse_tsv_output(&tsv_content);
        debug!("Tesseract returned {} words", detections.len());
        Ok(detections)
    }
}

/// Parses word rows of Tesseract TSV output into detections.
fn parse_tsv_output(tsv: &str) -> Vec<Detection> {
    let mut detections = Vec::new();

    for line in tsv.lines().skip(1) {
        // level, page_num, block_num, par_num, line_num, word_num,
        // left, top, width, height, conf, text
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        // Level 5 = word
        if fields[0].parse::<i32>().unwrap_or(-1) != 5 {
            continue;
        }

        let text = fields[11].trim();
        let conf: f32 = fields[10].parse().unwrap_or(-1.0);
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let geometry: Option<Vec<f64>> = fields[6..10].iter().map(|f| f.parse().ok()).collect();
        let Some(geometry) = geometry else {
            continue;
        };

        detections.push(Detection::from_rect(
            geometry[0],
            geometry[1],
            geometry[2],
            geometry[3],
            text,
            conf / 100.0,
        ));
    }

    detections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::Point;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn test_parse_words() {
        let tsv = format!(
            "{}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t\n\
             5\t1\t1\t1\t1\t1\t300\t100\t40\t20\t91.5\t35\n\
             5\t1\t1\t1\t2\t1\t290\t140\t60\t20\t88\t0.8\n",
            HEADER
        );

        let detections = parse_tsv_output(&tsv);
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].text, "35");
        assert!((detections[0].confidence - 0.915).abs() < 1e-6);
        assert_eq!(detections[0].bbox[0], Point::new(300.0, 100.0));
        assert_eq!(detections[0].bbox[2], Point::new(340.0, 120.0));
        assert_eq!(detections[1].center(), Point::new(320.0, 150.0));
    }

    #[test]
    fn test_parse_skips_empty_and_unscored() {
        let tsv = format!(
            "{}\n\
             5\t1\t1\t1\t1\t1\t300\t100\t40\t20\t-1\t12\n\
             5\t1\t1\t1\t1\t2\t300\t100\t40\t20\t90\t \n\
             5\t1\t1\t1\t1\t3\tx\t100\t40\t20\t90\t7\n\
             4\t1\t1\t1\t1\t0\t300\t100\t40\t20\t90\t12\n",
            HEADER
        );

        assert!(parse_tsv_output(&tsv).is_empty());
    }

    #[test]
    fn test_parse_short_rows_ignored() {
        let tsv = format!("{}\n5\t1\t1\n", HEADER);
        assert!(parse_tsv_output(&tsv).is_empty());
    }
}
