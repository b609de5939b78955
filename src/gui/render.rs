//! Dashboard rendering functions.
//!
//! Contains UI layout and component rendering logic.

use eframe::egui::{self, Color32, RichText, TextureHandle, Vec2};

use super::state::{DashboardState, ProcessStatus};
use crate::analysis::LogStats;
use crate::aqi::AqiStatus;
use crate::reading::{Pollutant, PollutantReading};
use crate::records::ReadingLog;

fn status_fill(status: AqiStatus) -> Color32 {
    let [r, g, b] = status.color();
    Color32::from_rgb(r, g, b)
}

/// Dark categories get white text on the banner.
fn status_text_color(status: AqiStatus) -> Color32 {
    match status {
        AqiStatus::VeryPoor | AqiStatus::Severe => Color32::WHITE,
        _ => Color32::BLACK,
    }
}

/// Render the banner for the latest reading, colored by AQI category.
pub fn render_status_header(ui: &mut egui::Ui, stats: &LogStats) {
    let Some(latest) = &stats.latest else {
        return;
    };

    let text_color = status_text_color(latest.status);
    egui::Frame::none()
        .fill(status_fill(latest.status))
        .inner_margin(12.0)
        .rounding(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!("Current Status: {}", latest.status))
                        .size(24.0)
                        .strong()
                        .color(text_color),
                );
                ui.label(
                    RichText::new(format!("AQI {}", latest.final_aqi))
                        .size(18.0)
                        .color(text_color),
                );
                ui.label(
                    RichText::new(format!(
                        "{} at {}",
                        latest.filename,
                        latest.timestamp.format("%Y-%m-%d %H:%M:%S")
                    ))
                    .color(text_color),
                );
            });
        });
}

/// Render the latest concentrations side by side.
pub fn render_metrics(ui: &mut egui::Ui, reading: &PollutantReading) {
    ui.add_space(8.0);
    ui.columns(Pollutant::ALL.len(), |columns| {
        for (column, pollutant) in columns.iter_mut().zip(Pollutant::ALL) {
            column.vertical_centered(|ui| {
                ui.label(RichText::new(pollutant.display_name()).strong());
                ui.label(RichText::new(format!("{}", reading.values().get(pollutant))).size(20.0));
                ui.label(RichText::new(pollutant.unit()).small());
            });
        }
    });
}

/// Render the trend chart texture scaled to the panel width.
pub fn render_trend(ui: &mut egui::Ui, texture: Option<&TextureHandle>) {
    ui.add_space(8.0);
    ui.separator();
    ui.heading("Historical Trend");
    ui.add_space(4.0);

    match texture {
        Some(texture) => {
            let [w, h] = texture.size();
            let width = ui.available_width().min(w as f32);
            let height = width * h as f32 / w.max(1) as f32;
            ui.image((texture.id(), Vec2::new(width, height)));
        }
        None => {
            ui.label(RichText::new("Trend chart unavailable").color(Color32::GRAY));
        }
    }
}

/// Render the reading log as a table, newest first.
pub fn render_history(ui: &mut egui::Ui, log: &ReadingLog) {
    ui.add_space(8.0);
    ui.separator();
    ui.heading("Reading Log");
    ui.add_space(4.0);

    egui::ScrollArea::horizontal().show(ui, |ui| {
        egui::Grid::new("reading_log")
            .striped(true)
            .num_columns(7)
            .show(ui, |ui| {
                for header in ["Filename", "Timestamp", "PM25", "PM10", "CO", "CO2", "Final_AQI"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for reading in log.newest_first() {
                    let status = AqiStatus::from_aqi(reading.final_aqi);
                    ui.label(reading.filename.as_str());
                    ui.label(reading.timestamp.format("%Y-%m-%d %H:%M:%S").to_string());
                    ui.label(format!("{}", reading.pm25));
                    ui.label(format!("{}", reading.pm10));
                    ui.label(format!("{}", reading.co));
                    ui.label(format!("{}", reading.co2));
                    ui.label(
                        RichText::new(reading.final_aqi.to_string())
                            .strong()
                            .color(status_fill(status)),
                    );
                    ui.end_row();
                }
            });
    });
}

/// Render the upload panel.
/// Returns true when Process Image was clicked.
pub fn render_upload(ui: &mut egui::Ui, state: &mut DashboardState, detector_error: Option<&str>) -> bool {
    let mut process_clicked = false;

    ui.heading("Upload Monitor Image");
    ui.add_space(4.0);
    ui.label("Drop a JPG or PNG onto the window, or enter its path:");

    ui.horizontal(|ui| {
        ui.add_sized(
            [ui.available_width() - 120.0, 20.0],
            egui::TextEdit::singleline(&mut state.upload_path).hint_text("path/to/monitor.jpg"),
        );

        let can_process = !state.status.is_running()
            && detector_error.is_none()
            && !state.upload_path.trim().is_empty();
        ui.add_enabled_ui(can_process, |ui| {
            if ui.button(RichText::new("Process Image").size(16.0)).clicked() {
                process_clicked = true;
            }
        });
    });

    if let Some(error) = detector_error {
        ui.label(RichText::new(format!("OCR unavailable: {}", error)).color(Color32::from_rgb(200, 0, 0)));
    }

    let status_color = match &state.status {
        ProcessStatus::Idle => Color32::GRAY,
        ProcessStatus::Processing { .. } => Color32::from_rgb(0, 120, 200),
        ProcessStatus::Done(_) => Color32::from_rgb(0, 150, 0),
        ProcessStatus::Error(_) => Color32::from_rgb(200, 0, 0),
    };
    ui.horizontal(|ui| {
        if state.status.is_running() {
            ui.spinner();
        }
        ui.label(RichText::new(state.status.status_text()).color(status_color));
    });

    process_clicked
}

/// Shown instead of the dashboard while there is no data.
pub fn render_prompt(ui: &mut egui::Ui) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new("Upload an image in the panel above to start generating data.")
                .size(18.0)
                .color(Color32::GRAY),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_text_contrast() {
        assert_eq!(status_text_color(AqiStatus::Good), Color32::BLACK);
        assert_eq!(status_text_color(AqiStatus::Severe), Color32::WHITE);
        assert_eq!(status_fill(AqiStatus::Good), Color32::from_rgb(0, 0xe4, 0));
    }
}
