//! Dashboard window.
//!
//! Shows the latest AQI status, the latest concentrations, the trend chart
//! and the full reading log, and accepts new monitor images.

pub mod render;
pub mod state;

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use eframe::egui::{self, TextureHandle, Vec2};
use tracing::{info, warn};

use crate::analysis::charts::render_trend_rgb;
use crate::config::AppConfig;
use crate::extract::CenterColumnLayout;
use crate::ocr::TesseractDetector;
use crate::pipeline::{is_supported_image, AqiDetector};
use crate::reading::PollutantReading;
use crate::records::append_reading;

use state::{DashboardState, ProcessStatus};

type Detector = AqiDetector<TesseractDetector, CenterColumnLayout>;

/// Pixel size of the in-window trend chart.
const CHART_SIZE: (u32, u32) = (900, 400);

/// Main dashboard application struct.
pub struct DashboardApp {
    config: AppConfig,
    state: DashboardState,
    /// OCR pipeline, or the reason it could not be built.
    detector: Result<Arc<Detector>, String>,
    /// Result channel of the running upload.
    pending: Option<Receiver<Result<PollutantReading>>>,
    chart: Option<TextureHandle>,
}

impl DashboardApp {
    pub fn new(config: AppConfig) -> Self {
        let detector = AqiDetector::from_config(&config)
            .map(Arc::new)
            .map_err(|e| {
                warn!("OCR pipeline unavailable: {:#}", e);
                format!("{:#}", e)
            });

        let mut state = DashboardState::default();
        state.reload(&config.storage.log_path);

        Self {
            config,
            state,
            detector,
            pending: None,
            chart: None,
        }
    }

    /// Start OCR on a background thread; the reading is appended to the log there.
    fn start_processing(&mut self, path: PathBuf) {
        if self.state.status.is_running() {
            return;
        }

        let detector = match &self.detector {
            Ok(detector) => Arc::clone(detector),
            Err(e) => {
                self.state.status = ProcessStatus::Error(e.clone());
                return;
            }
        };

        if !is_supported_image(&path) {
            self.state.status =
                ProcessStatus::Error(format!("Unsupported file type: {}", path.display()));
            return;
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let log_path = self.config.storage.log_path.clone();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let result = detector.process_file(&path).and_then(|reading| {
                append_reading(&log_path, &reading)?;
                Ok(reading)
            });
            // Receiver may be gone if the window closed
            let _ = tx.send(result);
        });

        info!("Dashboard: processing {}", filename);
        self.state.status = ProcessStatus::Processing {
            filename,
            start_time: Instant::now(),
        };
        self.pending = Some(rx);
    }

    /// Poll the running upload.
    fn update_process_status(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(anyhow!("Processing thread stopped")),
        };
        self.pending = None;

        match result {
            Ok(reading) => {
                info!("Dashboard: {} -> AQI: {}", reading.filename, reading.final_aqi);
                self.state.status = ProcessStatus::Done(reading);
                self.state.reload(&self.config.storage.log_path);
            }
            Err(e) => {
                warn!("Dashboard: processing failed: {:#}", e);
                self.state.status = ProcessStatus::Error(format!("{:#}", e));
            }
        }
    }

    /// Redraw the trend chart texture after the log changed.
    fn refresh_chart(&mut self, ctx: &egui::Context) {
        if !self.state.chart_dirty {
            return;
        }
        self.state.chart_dirty = false;

        let Some(log) = &self.state.log else {
            self.chart = None;
            return;
        };

        let (width, height) = CHART_SIZE;
        match render_trend_rgb(log, width, height, &self.config.chart) {
            Ok(pixels) => {
                let image =
                    egui::ColorImage::from_rgb([width as usize, height as usize], &pixels);
                self.chart = Some(ctx.load_texture("trend_chart", image, egui::TextureOptions::LINEAR));
            }
            Err(e) => {
                warn!("Failed to render trend chart: {:#}", e);
                self.chart = None;
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().find_map(|file| file.path) {
            self.state.upload_path = path.display().to_string();
            self.start_processing(path);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.update_process_status();
        self.refresh_chart(ctx);

        if self.state.status.is_running() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("AQI Vision Dashboard");
            ui.add_space(12.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                let detector_error = self.detector.as_ref().err().map(String::as_str);
                if render::render_upload(ui, &mut self.state, detector_error) {
                    let path = PathBuf::from(self.state.upload_path.trim());
                    self.start_processing(path);
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                match (&self.state.log, &self.state.stats) {
                    (Some(log), Some(stats)) => {
                        render::render_status_header(ui, stats);
                        if let Some(latest) = log.latest() {
                            render::render_metrics(ui, latest);
                        }
                        render::render_trend(ui, self.chart.as_ref());
                        render::render_history(ui, log);
                    }
                    _ => render::render_prompt(ui),
                }
            });
        });
    }
}

/// Run the dashboard. Blocks until the window is closed.
pub fn run_dashboard(config: AppConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(1000.0, 800.0))
            .with_min_inner_size(Vec2::new(600.0, 400.0))
            .with_title("AQI Vision Dashboard")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    info!("Dashboard: opening window");

    eframe::run_native(
        "AQI Vision Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
    .map_err(|e| anyhow!("Dashboard failed: {}", e))
}
