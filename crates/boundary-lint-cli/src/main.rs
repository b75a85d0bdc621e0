//! boundary-lint CLI tool.
//!
//! Usage:
//! ```bash
//! boundary-lint check [OPTIONS] [PATH]
//! boundary-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Import boundary linter for TypeScript projects
#[derive(Parser)]
#[command(name = "boundary-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check imports against the configured boundaries
    Check {
        /// Project root to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Rewrite fixable import specifiers in place
        #[arg(long)]
        fix: bool,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Source snippets with labels.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { path, format, fix } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let has_errors = commands::check::run(&path, format, fix, &source)?;
            if has_errors {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
