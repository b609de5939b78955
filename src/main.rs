//! AQI Vision
//!
//! Reads pollutant concentrations off photographs of air-quality monitors,
//! computes the CPCB Air Quality Index and keeps a CSV history with charts
//! and a desktop dashboard.

mod analysis;
mod aqi;
mod config;
mod extract;
mod gui;
mod logging;
mod ocr;
mod paths;
mod pipeline;
mod reading;
mod records;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use aqi::AqiStatus;
use config::AppConfig;
use pipeline::AqiDetector;
use reading::Pollutant;
use records::ReadingLog;

#[derive(Parser)]
#[command(name = "aqi-vision", version, about = "AQI readings from air monitor photos")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Reading log CSV (overrides the configured path)
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every image in a folder and append the readings to the log
    Scan {
        /// Folder with .jpg/.jpeg/.png images
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Truncate the log before writing
        #[arg(long)]
        fresh: bool,
    },
    /// Process one image, append it to the log and print the result
    Process { image: PathBuf },
    /// Write statistics and charts for the log
    Report {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Open the desktop dashboard
    Dashboard,
    /// Locate Tesseract and download trained data if missing
    Setup,
    /// Write the default configuration file
    InitConfig,
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    paths::ensure_directories().context("Failed to create application directories")?;
    logging::init()?;
    logging::install_panic_hook();

    if let Commands::InitConfig = cli.command {
        AppConfig::save_default(&cli.config)?;
        println!("Wrote default configuration to {}", cli.config.display());
        return Ok(());
    }

    let mut config = AppConfig::load(&cli.config);
    if let Some(log) = cli.log {
        config.storage.log_path = log;
    }

    match cli.command {
        Commands::Scan { folder, fresh } => scan(&config, folder, fresh),
        Commands::Process { image } => process(&config, image),
        Commands::Report { out } => report(&config, out),
        Commands::Dashboard => {
            info!("Starting dashboard...");
            gui::run_dashboard(config)
        }
        Commands::Setup => setup(&config),
        Commands::InitConfig => Ok(()),
    }
}

fn scan(config: &AppConfig, folder: Option<PathBuf>, fresh: bool) -> Result<()> {
    let folder = folder.unwrap_or_else(|| config.storage.input_dir.clone());
    let log_path = &config.storage.log_path;
    let detector = AqiDetector::from_config(config)?;

    let readings = detector.scan_folder(&folder)?;

    if fresh {
        records::reset_log(log_path)?;
    }
    records::append_readings(log_path, &readings)?;

    info!(
        "Logged {} readings to {}",
        readings.len(),
        log_path.display()
    );
    println!("Processed {} images -> {}", readings.len(), log_path.display());
    Ok(())
}

fn process(config: &AppConfig, image: PathBuf) -> Result<()> {
    let detector = AqiDetector::from_config(config)?;
    let reading = detector.process_file(&image)?;
    records::append_reading(&config.storage.log_path, &reading)?;

    let status = AqiStatus::from_aqi(reading.final_aqi);
    info!("{} -> AQI: {}", reading.filename, reading.final_aqi);

    println!("File:      {}", reading.filename);
    println!("Timestamp: {}", reading.timestamp.format("%Y-%m-%d %H:%M:%S"));
    for pollutant in Pollutant::ALL {
        println!(
            "{:<10} {} {}",
            format!("{}:", pollutant.display_name()),
            reading.values().get(pollutant),
            pollutant.unit()
        );
    }
    println!("AQI:       {} ({})", reading.final_aqi, status);
    Ok(())
}

fn report(config: &AppConfig, out: Option<PathBuf>) -> Result<()> {
    let out = out.unwrap_or_else(|| config.storage.report_dir.clone());
    let log = ReadingLog::from_csv(&config.storage.log_path)?;
    info!("Loaded {} readings from {}", log.len(), config.storage.log_path.display());

    let files = analysis::generate_report(&log, &out, &config.chart)?;

    println!("Trend chart: {}", files.trend_chart.display());
    println!("Box plot:    {}", files.box_plot.display());
    println!("Statistics:  {}", files.statistics.display());
    Ok(())
}

fn setup(config: &AppConfig) -> Result<()> {
    let paths = ocr::ensure_tessdata(&config.ocr)?;

    println!("Tesseract: {}", paths.executable.display());
    match &paths.tessdata {
        Some(dir) => println!("Tessdata:  {}", dir.display()),
        None => println!("Tessdata:  (built-in default)"),
    }
    Ok(())
}
