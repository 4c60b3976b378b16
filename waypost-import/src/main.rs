//! waypost-import - PoI ingestion command line
//!
//! Imports point-of-interest records from CSV, JSON or XML files into the
//! catalogue database, upserting by external id.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waypost_import::ImportOrchestrator;

/// Command-line arguments for waypost-import
#[derive(Parser, Debug)]
#[command(name = "waypost-import")]
#[command(about = "Point-of-interest importer for Waypost")]
#[command(version)]
struct Args {
    /// Path to the catalogue database (falls back to config / OS default)
    #[arg(short, long, env = "WAYPOST_DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import PoI data from one or more files
    Import {
        /// Path to file(s) to import
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Clear existing data before import
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypost_import=info,waypost_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let cli_database = args.database.as_ref().and_then(|p| p.to_str());
    let db_path = waypost_common::config::resolve_database_path(cli_database)
        .context("Failed to resolve database path")?;
    info!("Database: {}", db_path.display());

    let pool = waypost_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    match args.command {
        Command::Import { files, clear } => {
            let orchestrator = ImportOrchestrator::new(pool);
            let report = orchestrator.run(&files, clear).await?;

            for file in &report.files {
                match &file.outcome {
                    Ok(stats) => println!(
                        "Successfully imported {} records from {}",
                        stats.created,
                        file.path.display()
                    ),
                    Err(message) => {
                        println!("Error importing {}: {}", file.path.display(), message)
                    }
                }
            }
            println!("Total records imported: {}", report.total_created);

            // Row-level skips never fail the process; only a batch in which
            // nothing at all was readable does
            if report.all_failed() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
