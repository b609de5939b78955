//! Image to reading pipeline, shared by the upload and batch entry points.

use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::aqi::final_aqi;
use crate::config::AppConfig;
use crate::extract::{CenterColumnLayout, ReadingLayout};
use crate::ocr::{TesseractDetector, TextDetector};
use crate::reading::PollutantReading;

/// Extensions accepted in batch mode (compared case-insensitively).
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Returns true for .jpg, .jpeg and .png files.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Supported image files directly inside `folder`, sorted by name.
pub fn image_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder)
        .context(format!("Failed to read folder: {}", folder.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Turns monitor photographs into logged readings.
pub struct AqiDetector<D, L> {
    detector: D,
    layout: L,
}

impl AqiDetector<TesseractDetector, CenterColumnLayout> {
    /// Builds the Tesseract-backed pipeline from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let detector = TesseractDetector::new(&config.ocr)?;
        debug!("Using tesseract at {}", detector.paths().executable.display());
        let layout = CenterColumnLayout::new(&config.layout)?;
        Ok(Self::new(detector, layout))
    }
}

impl<D: TextDetector, L: ReadingLayout> AqiDetector<D, L> {
    pub fn new(detector: D, layout: L) -> Self {
        Self { detector, layout }
    }

    /// Runs OCR on a decoded image and computes its reading.
    pub fn process_image(&self, image: &DynamicImage, filename: &str) -> Result<PollutantReading> {
        let detections = self.detector.detect(image)?;
        let values = self
            .layout
            .assign(&detections, image.width(), image.height());
        let aqi = final_aqi(&values);
        Ok(PollutantReading::new(filename, values, aqi))
    }

    /// Loads an image file and computes its reading.
    pub fn process_file(&self, path: &Path) -> Result<PollutantReading> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Not a file path: {}", path.display()))?;
        let image = image::open(path)
            .context(format!("Failed to load image: {}", path.display()))?;
        self.process_image(&image, &filename)
    }

    /// Processes every supported image in a folder.
    ///
    /// Files that fail to decode or to OCR are skipped with a warning.
    pub fn scan_folder(&self, folder: &Path) -> Result<Vec<PollutantReading>> {
        let files = image_files(folder)?;
        info!("Found {} images in {}", files.len(), folder.display());

        let mut readings = Vec::with_capacity(files.len());
        for path in files {
            match self.process_file(&path) {
                Ok(reading) => {
                    info!("{} -> AQI: {}", reading.filename, reading.final_aqi);
                    readings.push(reading);
                }
                Err(e) => {
                    warn!("Skipping {}: {:#}", path.display(), e);
                }
            }
        }

        Ok(readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ocr::Detection;
    use crate::reading::PollutantValues;
    use image::RgbImage;
    use tempfile::tempdir;

    /// Returns a fixed column of readouts centered horizontally.
    struct FakeDetector {
        texts: Vec<&'static str>,
    }

    impl TextDetector for FakeDetector {
        fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
            let cx = image.width() as f64 / 2.0;
            Ok(self
                .texts
                .iter()
                .enumerate()
                .map(|(i, text)| Detection::from_rect(cx - 5.0, 10.0 * i as f64, 10.0, 8.0, text, 0.9))
                .collect())
        }
    }

    struct FailingDetector;

    impl TextDetector for FailingDetector {
        fn detect(&self, _image: &DynamicImage) -> Result<Vec<Detection>> {
            Err(anyhow!("engine unavailable"))
        }
    }

    fn monitor_detector() -> AqiDetector<FakeDetector, CenterColumnLayout> {
        // AQI, PM2.5, PM10, CO, CO2 from top to bottom
        let fake = FakeDetector {
            texts: vec!["35", "12", "48", "0.6", "415"],
        };
        AqiDetector::new(fake, CenterColumnLayout::new(&LayoutConfig::default()).unwrap())
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.jpg")));
        assert!(is_supported_image(Path::new("b.JPEG")));
        assert!(is_supported_image(Path::new("dir/c.Png")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[test]
    fn test_process_image() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(200, 100));
        let reading = monitor_detector().process_image(&image, "upload.png").unwrap();

        assert_eq!(reading.filename, "upload.png");
        assert_eq!(reading.pm25, 12.0);
        assert_eq!(reading.pm10, 48.0);
        assert_eq!(reading.co, 0.6);
        assert_eq!(reading.co2, 415.0);
        // PM25 12 -> 20, PM10 48 -> 48, CO 0.6 -> 30
        assert_eq!(reading.final_aqi, 48);
    }

    #[test]
    fn test_process_image_insufficient_detections() {
        let fake = FakeDetector { texts: vec!["12", "48"] };
        let detector = AqiDetector::new(fake, CenterColumnLayout::new(&LayoutConfig::default()).unwrap());
        let image = DynamicImage::ImageRgb8(RgbImage::new(200, 100));

        let reading = detector.process_image(&image, "blurry.jpg").unwrap();
        assert_eq!(reading.values(), PollutantValues::default());
        assert_eq!(reading.final_aqi, 0);
    }

    #[test]
    fn test_scan_folder_skips_unreadable_and_other_files() {
        let dir = tempdir().unwrap();
        RgbImage::new(100, 80).save(dir.path().join("a.png")).unwrap();
        RgbImage::new(100, 80).save(dir.path().join("b.JPG")).unwrap();
        fs::write(dir.path().join("broken.jpeg"), b"not an image").unwrap();
        fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

        let readings = monitor_detector().scan_folder(dir.path()).unwrap();

        let names: Vec<&str> = readings.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.JPG"]);
        assert!(readings.iter().all(|r| r.final_aqi == 48));
    }

    #[test]
    fn test_scan_folder_skips_ocr_failures() {
        let dir = tempdir().unwrap();
        RgbImage::new(100, 80).save(dir.path().join("a.png")).unwrap();

        let detector = AqiDetector::new(
            FailingDetector,
            CenterColumnLayout::new(&LayoutConfig::default()).unwrap(),
        );
        assert!(detector.scan_folder(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_folder_is_error() {
        let dir = tempdir().unwrap();
        assert!(monitor_detector().scan_folder(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn test_process_file_propagates_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"garbage").unwrap();
        assert!(monitor_detector().process_file(&path).is_err());
    }
}
