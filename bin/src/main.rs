//! orderflow CLI - E-commerce order dataset ingestion.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "orderflow")]
#[command(about = "Fetch, transform and persist e-commerce order datasets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the ingestion pipeline: fetch, transform, save
    Run {
        /// Number of rows to request from the API
        #[arg(long, default_value = "5000")]
        rows: u32,

        /// Dataset type to request
        #[arg(long, default_value = "ecommerce")]
        dataset_type: String,

        /// Output directory for the Parquet files
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Maximum fetch attempts before giving up
        #[arg(long, default_value = "3")]
        max_attempts: u32,
    },
}

/// Initializes the tracing subscriber, honoring `RUST_LOG`-style filters.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    // .env is optional; real environment variables win.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            rows,
            dataset_type,
            output,
            max_attempts,
        } => commands::run::run(&dataset_type, rows, &output, max_attempts).await,
    };

    if let Err(e) = result {
        error!("pipeline failed: {:#}", e);
        std::process::exit(1);
    }
}
