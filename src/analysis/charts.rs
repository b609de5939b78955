//! Chart generation using plotters.
//!
//! Draws the historical trend of Final_AQI, PM25 and PM10, and a box plot
//! panel per log column. Styling comes from the `chart` config section.

use super::config::ChartConfig;
use super::statistics::{LogStats, MetricStats};
use crate::reading::{Metric, Pollutant, PollutantReading};
use crate::records::ReadingLog;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Columns drawn on the trend chart, in legend order.
const TREND_METRICS: [Metric; 3] = [
    Metric::FinalAqi,
    Metric::Pollutant(Pollutant::Pm25),
    Metric::Pollutant(Pollutant::Pm10),
];

fn rgb(color: [u8; 3]) -> RGBColor {
    RGBColor(color[0], color[1], color[2])
}

fn trend_color(metric: Metric, config: &ChartConfig) -> RGBColor {
    match metric {
        Metric::Pollutant(Pollutant::Pm25) => rgb(config.colors.pm25_line),
        Metric::Pollutant(Pollutant::Pm10) => rgb(config.colors.pm10_line),
        _ => rgb(config.colors.aqi_line),
    }
}

/// Seconds since `base` for each reading.
fn time_offsets(base: NaiveDateTime, readings: &[&PollutantReading]) -> Vec<f64> {
    readings
        .iter()
        .map(|r| (r.timestamp - base).num_milliseconds() as f64 / 1000.0)
        .collect()
}

/// X axis range with a little padding. A single instant gets one minute either side.
fn x_range(offsets: &[f64]) -> (f64, f64) {
    let min = offsets.iter().copied().fold(f64::INFINITY, f64::min);
    let max = offsets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let span = max - min;
    if span <= 0.0 {
        (min - 60.0, max + 60.0)
    } else {
        (min - span * 0.02, max + span * 0.02)
    }
}

/// Upper bound of the y axis: 10% headroom, at least 10.
fn y_upper(readings: &[&PollutantReading]) -> f64 {
    let max = readings
        .iter()
        .flat_map(|r| TREND_METRICS.iter().map(move |&m| r.metric(m)))
        .fold(0.0, f64::max);
    (max * 1.1).max(10.0)
}

/// Axis label for an offset in seconds from `base`.
fn format_offset(base: NaiveDateTime, seconds: f64) -> String {
    let at = base + Duration::milliseconds((seconds * 1000.0) as i64);
    at.format("%m-%d %H:%M").to_string()
}

/// Draws the trend chart onto any plotters backend.
fn draw_trend<DB>(root: &DrawingArea<DB, Shift>, log: &ReadingLog, config: &ChartConfig) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&rgb(config.colors.light_gray_bg))?;

    let readings = log.chronological();
    let Some(first) = readings.first() else {
        return Ok(());
    };

    let base = first.timestamp;
    let offsets = time_offsets(base, &readings);
    let (x_min, x_max) = x_range(&offsets);
    let grid_color = rgb(config.colors.grid_color);

    let mut chart = ChartBuilder::on(root)
        .caption(
            "Historical AQI Data Trend",
            ("sans-serif", config.font.title_size),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_upper(&readings))
        .context("Failed to build trend chart")?;

    let label_formatter = |x: &f64| format_offset(base, *x);
    chart
        .configure_mesh()
        .x_desc("Timestamp")
        .y_desc("Concentration / Index")
        .x_labels(6)
        .x_label_formatter(&label_formatter)
        .axis_desc_style(("sans-serif", config.font.axis_label_size))
        .light_line_style(grid_color)
        .bold_line_style(grid_color.mix(0.8))
        .draw()
        .context("Failed to draw mesh")?;

    for metric in TREND_METRICS {
        let color = trend_color(metric, config);
        let points: Vec<(f64, f64)> = offsets
            .iter()
            .zip(&readings)
            .map(|(&x, r)| (x, r.metric(metric)))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(metric.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        // Markers
        chart.draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 3, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", config.font.legend_size))
        .draw()
        .context("Failed to draw legend")?;

    Ok(())
}

/// Renders the trend chart to a PNG file.
pub fn generate_trend_chart(log: &ReadingLog, output_path: &Path, config: &ChartConfig) -> Result<()> {
    let root = BitMapBackend::new(
        output_path,
        (config.layout.trend_width, config.layout.trend_height),
    )
    .into_drawing_area();

    draw_trend(&root, log, config)?;

    root.present().context("Failed to save trend chart")?;
    Ok(())
}

/// Renders the trend chart into an RGB pixel buffer of `width * height * 3` bytes.
pub fn render_trend_rgb(log: &ReadingLog, width: u32, height: u32, config: &ChartConfig) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_trend(&root, log, config)?;
        root.present().context("Failed to render trend chart")?;
    }
    Ok(buffer)
}

/// Draw one box plot panel with its own y scale.
fn draw_box_plot(
    area: &DrawingArea<BitMapBackend, Shift>,
    stats: &MetricStats,
    config: &ChartConfig,
) -> Result<()> {
    let light_gray_bg = rgb(config.colors.light_gray_bg);
    let grid_color = rgb(config.colors.grid_color);
    let box_color = rgb(config.colors.box_primary);
    let whisker_color = RGBColor(100, 100, 100);

    area.fill(&light_gray_bg)?;

    if stats.count == 0 {
        return Ok(());
    }

    let range = stats.max - stats.min;
    let padding = if range > 0.0 { range * 0.1 } else { stats.max.abs().max(1.0) * 0.1 };
    let y_min = (stats.min - padding).max(0.0);
    let y_max = stats.max + padding;

    let caption = format!("{} (n = {})", stats.metric, stats.count);
    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", config.font.box_plot_caption_size))
        .margin(15)
        .x_label_area_size(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0f64..2.0f64, y_min..y_max)
        .context("Failed to build box plot")?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_label_formatter(&|y| format!("{:.1}", y))
        .light_line_style(grid_color)
        .bold_line_style(grid_color.mix(0.8))
        .draw()
        .context("Failed to draw mesh")?;

    let x_center = 1.0;
    let box_width = 0.4;
    let cap_width = 0.25;

    // Box fill (Q1 to Q3)
    chart.draw_series(std::iter::once(Rectangle::new(
        [
            (x_center - box_width, stats.quartile_1),
            (x_center + box_width, stats.quartile_3),
        ],
        box_color.mix(0.5).filled(),
    )))?;

    // Box outline
    chart.draw_series(std::iter::once(Rectangle::new(
        [
            (x_center - box_width, stats.quartile_1),
            (x_center + box_width, stats.quartile_3),
        ],
        box_color.stroke_width(2),
    )))?;

    // Median
    chart.draw_series(std::iter::once(PathElement::new(
        vec![
            (x_center - box_width, stats.median),
            (x_center + box_width, stats.median),
        ],
        RGBColor(200, 50, 50).stroke_width(3),
    )))?;

    // Whiskers and caps
    let whiskers = [
        vec![(x_center, stats.min), (x_center, stats.quartile_1)],
        vec![(x_center, stats.quartile_3), (x_center, stats.max)],
        vec![(x_center - cap_width, stats.min), (x_center + cap_width, stats.min)],
        vec![(x_center - cap_width, stats.max), (x_center + cap_width, stats.max)],
    ];
    chart.draw_series(
        whiskers
            .into_iter()
            .map(|line| PathElement::new(line, whisker_color.stroke_width(2))),
    )?;

    Ok(())
}

/// Generate a box plot with one panel per log column, side by side.
pub fn generate_box_plot(stats: &LogStats, output_path: &Path, config: &ChartConfig) -> Result<()> {
    let root = BitMapBackend::new(
        output_path,
        (config.layout.box_plot_width, config.layout.box_plot_height),
    )
    .into_drawing_area();
    root.fill(&WHITE)
        .context("Failed to fill chart background")?;

    let panels = root.split_evenly((1, stats.columns.len().max(1)));
    for (panel, column) in panels.iter().zip(&stats.columns) {
        draw_box_plot(panel, column, config)?;
    }

    root.present().context("Failed to save box plot")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::PollutantValues;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn reading(timestamp: NaiveDateTime, pm25: f64, pm10: f64, aqi: u32) -> PollutantReading {
        let values = PollutantValues { pm25, pm10, ..Default::default() };
        PollutantReading::with_timestamp("a.jpg", timestamp, values, aqi)
    }

    #[test]
    fn test_time_offsets() {
        let a = reading(at(10, 0), 0.0, 0.0, 0);
        let b = reading(at(10, 30), 0.0, 0.0, 0);
        assert_eq!(time_offsets(at(10, 0), &[&a, &b]), vec![0.0, 1800.0]);
    }

    #[test]
    fn test_x_range() {
        assert_eq!(x_range(&[0.0, 100.0]), (-2.0, 102.0));
        assert_eq!(x_range(&[5.0]), (-55.0, 65.0));
        assert_eq!(x_range(&[]), (0.0, 1.0));
    }

    #[test]
    fn test_y_upper() {
        let a = reading(at(10, 0), 12.0, 300.0, 250);
        assert!((y_upper(&[&a]) - 330.0).abs() < 1e-9);

        let quiet = reading(at(10, 0), 1.0, 2.0, 2);
        assert_eq!(y_upper(&[&quiet]), 10.0);
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(at(10, 0), 5400.0), "03-04 11:30");
    }

    #[test]
    fn test_render_empty_log_fills_background() {
        let config = ChartConfig::default();
        let buffer = render_trend_rgb(&ReadingLog::default(), 40, 20, &config).unwrap();

        assert_eq!(buffer.len(), 40 * 20 * 3);
        assert_eq!(&buffer[..3], &config.colors.light_gray_bg);
    }
}
