//! CivicLayer CLI - Command-line interface
//!
//! This binary provides a command-line interface to the CivicLayer
//! library: listing the layer manifest, loading individual datasets, and
//! dropping analysis probes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use civiclayer::config::Settings;
use civiclayer::logging;

mod commands;
mod error;
mod manifest;

use error::CliError;

#[derive(Parser)]
#[command(name = "civiclayer")]
#[command(about = "Explore civic datasets and run radius analyses", long_about = None)]
#[command(version = civiclayer::VERSION)]
struct Cli {
    /// Directory holding the CSV/GeoJSON dataset files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every layer in the manifest with its state
    Layers,

    /// Load one layer and print its summary, legend, and first rows
    Show {
        /// Layer id as printed by `layers`
        layer_id: String,
    },

    /// Drop an analysis probe and report the facilities within the radius
    Probe {
        /// Probe center latitude in decimal degrees
        #[arg(long)]
        lat: f64,

        /// Probe center longitude in decimal degrees
        #[arg(long)]
        lng: f64,

        /// Analysis radius in meters
        #[arg(long, default_value = "2000")]
        radius: f64,

        /// Layer ids to enable before probing (repeatable)
        #[arg(long = "enable")]
        enable: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut settings = Settings::default();
    settings.data_dir = cli.data_dir;

    let _logging_guard = match logging::init_logging(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    let result = match cli.command {
        Command::Layers => commands::run_layers(&settings),
        Command::Show { layer_id } => commands::run_show(&settings, &layer_id).await,
        Command::Probe {
            lat,
            lng,
            radius,
            enable,
        } => commands::run_probe(&settings, lat, lng, radius, &enable).await,
    };

    if let Err(e) = result {
        e.exit();
    }
}
