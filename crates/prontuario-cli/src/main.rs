//! # prontuario CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prontuario_cli::categories::run_categories;
use prontuario_cli::check::{run_check, CheckArgs};
use prontuario_cli::classify::{run_classify, ClassifyArgs};
use prontuario_cli::list::{run_list, ListArgs};

/// Prontuario Sanzioni — municipal violations catalog.
///
/// Browses catalog data files with the same filter and ordering as the
/// service, classifies category labels and validates data files.
#[derive(Parser, Debug)]
#[command(name = "prontuario", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Filter and sort records, then print them with the stats line.
    List(ListArgs),

    /// Print the color tag and badge classes of category labels.
    Classify(ClassifyArgs),

    /// Print the category table.
    Categories,

    /// Validate every record of a data file.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::List(args) => run_list(&args),
        Commands::Classify(args) => run_classify(&args),
        Commands::Categories => run_categories(),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
