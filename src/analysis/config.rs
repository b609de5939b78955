//! Chart styling, read from the `chart` section of config.json.

use serde::{Deserialize, Serialize};

/// Chart configuration with all customizable values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Font sizes
    pub font: FontConfig,
    /// Colors (RGB values)
    pub colors: ColorConfig,
    /// Image dimensions
    pub layout: ChartLayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub title_size: u32,
    pub axis_label_size: u32,
    pub legend_size: u32,
    pub box_plot_caption_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Final_AQI trend line [R, G, B]
    pub aqi_line: [u8; 3],
    /// PM25 trend line
    pub pm25_line: [u8; 3],
    /// PM10 trend line
    pub pm10_line: [u8; 3],
    /// Box plot fill and outline
    pub box_primary: [u8; 3],
    /// Plot area background
    pub light_gray_bg: [u8; 3],
    /// Grid line color
    pub grid_color: [u8; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayoutConfig {
    pub trend_width: u32,
    pub trend_height: u32,
    pub box_plot_width: u32,
    pub box_plot_height: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            title_size: 28,
            axis_label_size: 14,
            legend_size: 14,
            box_plot_caption_size: 16,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            aqi_line: [231, 76, 60],   // #E74C3C
            pm25_line: [52, 152, 219], // #3498DB
            pm10_line: [243, 156, 18], // #F39C12
            box_primary: [230, 126, 34],
            light_gray_bg: [245, 245, 245],
            grid_color: [220, 220, 220],
        }
    }
}

impl Default for ChartLayoutConfig {
    fn default() -> Self {
        Self {
            trend_width: 1000,
            trend_height: 500,
            box_plot_width: 1200,
            box_plot_height: 500,
        }
    }
}
