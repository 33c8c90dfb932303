//! modhead CLI - header profile files from the terminal
//!
//! This CLI lets you:
//! - Compile a profile file into request rule JSON
//! - Validate profiles the way the editor does before saving
//! - See which profiles compile, at what priority, and how each header is emitted
//! - Add, remove, toggle and reorder profiles

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{compile, explain, profile, validate};

/// modhead CLI application
#[derive(Parser)]
#[command(name = "modhead")]
#[command(about = "modhead - request header profiles compiler", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json)
    #[arg(short, long, value_enum, default_value_t = output::OutputFormat::Table)]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Compile a profile file into rule JSON
    Compile(compile::CompileArgs),

    /// Validate every profile in a file
    Validate {
        /// Profile file
        file: PathBuf,
    },

    /// Show how each profile compiles
    Explain {
        /// Profile file
        file: PathBuf,
    },

    /// Edit a profile file
    Profile {
        /// Profile file
        #[arg(short, long, env = "MODHEAD_PROFILES", default_value = "profiles.json")]
        file: PathBuf,

        #[command(subcommand)]
        command: profile::ProfileCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let result = match cli.command {
        Commands::Compile(args) => compile::execute(args).await,
        Commands::Validate { file } => validate::execute(&file, cli.output).await,
        Commands::Explain { file } => explain::execute(&file, cli.output).await,
        Commands::Profile { file, command } => profile::execute(command, &file, cli.output).await,
    };

    if let Err(e) = result {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
