use crate::config::{AppConfig, RunMode};
use crate::errors::{AppError, AppResult};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

pub mod commands;

/// Rollup Compression Overhead Analyser
#[derive(Parser)]
#[command(name = "rollup-compression-research")]
#[command(about = "Compare transaction sizes against compressed-size estimates and overhead models")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ./config.toml, optional)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the phase selected by the configured `mode`
    Run,
    /// Analyse a record file against the overhead models
    Analyse(commands::analyse::AnalyseCommand),
    /// Extract records from a JSON-RPC endpoint
    Extract(commands::extract::ExtractCommand),
}

/// Load configuration from `path` or the default `config` file
pub fn load_config(path: Option<&PathBuf>) -> AppResult<AppConfig> {
    let loaded = match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    loaded.map_err(|e| AppError::Config(e.to_string()))
}

pub async fn run() -> AppResult<()> {
    // Initialise tracing subscriber to capture info!() macros
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .try_init();

    let cli = Cli::parse();
    let app_config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run => {
            info!("Running configured mode: {:?}", app_config.mode);
            match app_config.mode {
                RunMode::Analyse => commands::analyse::AnalyseCommand::default().run(&app_config),
                RunMode::Extract => {
                    commands::extract::ExtractCommand::default()
                        .run(&app_config)
                        .await
                }
            }
        }
        Commands::Analyse(command) => command.run(&app_config),
        Commands::Extract(command) => command.run(&app_config).await,
    }
}
