//! Vellum CLI - CMS engine.
//!
//! Provides commands for:
//! - `build`: Export published pages and posts as static HTML
//! - `publish`: Send a rendered document to the publish collaborator
//! - `export` / `import`: Round-trip the whole data set through a JSON file
//! - `seed`: Write default content into a fresh data directory

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ExportArgs, ImportArgs, PublishArgs, SeedArgs};
use output::Output;

/// Vellum - CMS engine.
#[derive(Parser)]
#[command(name = "vellum", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export published pages and posts as static HTML.
    Build(BuildArgs),
    /// Send a rendered document to the publish collaborator.
    Publish(PublishArgs),
    /// Export the whole data set to a JSON file.
    Export(ExportArgs),
    /// Import a previously exported JSON data set.
    Import(ImportArgs),
    /// Write default content into a fresh data directory.
    Seed(SeedArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Build(args) => args.verbose,
        Commands::Publish(args) => args.verbose,
        _ => false,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Publish(args) => args.execute(),
        Commands::Export(args) => args.execute(),
        Commands::Import(args) => args.execute(),
        Commands::Seed(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
