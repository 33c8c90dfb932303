//! modheadd - keeps installed request rules in sync with header profiles
//!
//! The daemon:
//! - Watches the profile store for edits (in-process or on disk)
//! - Recompiles the full profile list on every change
//! - Replaces the installed rule set in one all-or-nothing update
//! - Retries failed installs with backoff

use clap::Parser;
use modhead_daemon::config::{DaemonConfig, EngineConfig, StorageConfig};
use modhead_daemon::error::DaemonError;
use modhead_daemon::Daemon;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// modhead daemon CLI
#[derive(Parser)]
#[command(name = "modheadd")]
#[command(about = "modhead daemon - header profile rule sync", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MODHEAD_CONFIG")]
    config: Option<String>,

    /// Profile file to watch (overrides the configured storage)
    #[arg(short, long, env = "MODHEAD_PROFILES")]
    profiles: Option<PathBuf>,

    /// Rule file to write (overrides the configured engine)
    #[arg(short, long, env = "MODHEAD_RULES_OUT")]
    rules_out: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "MODHEAD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "MODHEAD_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }
    if let Some(path) = cli.profiles {
        config.storage = StorageConfig::File { path };
    }
    if let Some(path) = cli.rules_out {
        let max_rules = match config.engine {
            EngineConfig::Memory { max_rules } | EngineConfig::File { max_rules, .. } => max_rules,
        };
        config.engine = EngineConfig::File { path, max_rules };
    }

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        storage = ?config.storage,
        engine = ?config.engine,
        "Starting modhead daemon"
    );

    let daemon = Daemon::new(config).await?;
    daemon.run().await?;

    Ok(())
}
