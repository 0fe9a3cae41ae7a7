//! FileVault - Minimal Authenticated HTTP File Vault
//!
//! Stores uploaded files in a single flat directory and serves them back
//! over HTTP, gated behind a shared Basic credential pair.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filevault::api::{AppState, HttpServer};
use filevault::auth::Credentials;
use filevault::config::VaultConfig;
use filevault::error::Result;

/// FileVault - Minimal Authenticated HTTP File Vault
#[derive(Parser)]
#[command(name = "filevault")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "filevault.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the vault server
    Start,

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "filevault.toml")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Start => run_start(cli.config).await,
        Commands::Init { output } => run_init(output),
        Commands::Validate => run_validate(cli.config),
    }
}

/// Initialize logging
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Start the vault server
async fn run_start(config_path: PathBuf) -> Result<()> {
    tracing::info!("Starting FileVault...");

    // Load configuration, falling back to defaults when no file exists
    let config = if config_path.exists() {
        match VaultConfig::from_file(&config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("Failed to load configuration from {:?}: {}", config_path, e);
                return Err(e);
            }
        }
    } else {
        tracing::info!("No configuration file at {:?}, using defaults", config_path);
        VaultConfig::default()
    };

    // Credentials come from the environment; an unset or empty pair is a
    // startup error, never an open vault
    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Refusing to start: {}", e);
            return Err(e);
        }
    };
    tracing::info!("Vault user: {}", credentials.username);

    // Ensure the vault root exists
    if let Err(e) = std::fs::create_dir_all(config.vault_root()) {
        tracing::error!(
            "Failed to create vault directory {:?}: {}",
            config.vault_root(),
            e
        );
        return Err(e.into());
    }
    tracing::info!("Vault root: {:?}", config.vault_root());

    let state = AppState::new(&config, credentials);
    let server = HttpServer::new(config.server.clone(), state);
    server.start().await
}

/// Write a default configuration file
fn run_init(output: PathBuf) -> Result<()> {
    let config = VaultConfig::default();
    let content = toml::to_string_pretty(&config)?;
    std::fs::write(&output, content)?;
    println!("Wrote configuration to {:?}", output);
    Ok(())
}

/// Validate a configuration file
fn run_validate(config_path: PathBuf) -> Result<()> {
    let config = VaultConfig::from_file(&config_path)?;
    println!(
        "Configuration OK: bind {}, vault root {:?}, upload cap {} MiB",
        config.server.bind_address,
        config.vault_root(),
        config.storage.max_upload_mb
    );
    Ok(())
}
