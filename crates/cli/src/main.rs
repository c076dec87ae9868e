//! Scriptorium CLI — the main entry point.
//!
//! Commands:
//! - `onboard`      — Write a default config and create the history directory
//! - `doctor`       — Diagnose configuration and provider access
//! - `generate`     — Draft a new essay and save it
//! - `show`         — Print a saved essay
//! - `history`      — List saved essays, newest first
//! - `expand`       — Lengthen one section and save a new record
//! - `rewrite`      — Restructure one section and save a new record
//! - `export`       — Render a saved essay to PDF
//! - `export-json`  — Copy a saved record to another file

use clap::{Parser, Subcommand};
use scriptorium_core::{AcademicLevel, CitationStyle, Section};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "scriptorium",
    about = "Scriptorium — draft academic essays with a hosted LLM",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and the history directory
    Onboard,

    /// Diagnose configuration and provider access
    Doctor,

    /// Generate a new essay
    Generate {
        /// Subject of the essay
        #[arg(short, long)]
        topic: String,

        /// secondary, undergraduate or graduate
        #[arg(short, long, default_value = "undergraduate")]
        level: AcademicLevel,

        /// apa or abnt
        #[arg(short, long, default_value = "apa")]
        style: CitationStyle,

        /// Print the essay without saving it
        #[arg(long)]
        no_save: bool,

        /// Also export the saved essay to PDF
        #[arg(long, conflicts_with = "no_save")]
        pdf: bool,
    },

    /// Print a saved essay
    Show {
        /// Record path, file name or document id
        key: String,

        /// Print only this section
        #[arg(long)]
        section: Option<Section>,
    },

    /// List saved essays, newest first
    History,

    /// Lengthen one section by about half and save a new record
    Expand {
        /// Record path, file name or document id
        key: String,

        /// introduction, body or conclusion
        #[arg(long)]
        section: Section,
    },

    /// Restructure one section and save a new record
    Rewrite {
        /// Record path, file name or document id
        key: String,

        /// introduction, body or conclusion
        #[arg(long)]
        section: Section,
    },

    /// Render a saved essay to PDF
    Export {
        /// Record path, file name or document id
        key: String,

        /// Output file (defaults to the history directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a copy of a saved record as JSON
    ExportJson {
        /// Record path, file name or document id
        key: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Generate {
            topic,
            level,
            style,
            no_save,
            pdf,
        } => commands::generate::run(&topic, level, style, !no_save, pdf).await?,
        Commands::Show { key, section } => commands::show::run(&key, section).await?,
        Commands::History => commands::history::run().await?,
        Commands::Expand { key, section } => {
            commands::edit::run(&key, section, commands::edit::EditMode::Expand).await?
        }
        Commands::Rewrite { key, section } => {
            commands::edit::run(&key, section, commands::edit::EditMode::Rewrite).await?
        }
        Commands::Export { key, output } => commands::export::pdf(&key, output).await?,
        Commands::ExportJson { key, output } => commands::export::json(&key, output).await?,
    }

    Ok(())
}
