//! CLI command definitions and dispatch.

pub mod migrate;
pub mod status;
pub mod track;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use presence_core::config::AppConfig;
use presence_core::error::AppError;
use presence_database::{PresenceStore, PresenceStoreManager};

use crate::output::OutputFormat;

/// Presence Hub: shared online/offline presence
#[derive(Debug, Parser)]
#[command(name = "presence-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Show one user's presence
    Status(status::StatusArgs),
    /// List presence records
    List(status::ListArgs),
    /// Run a live tracking session driven from stdin
    Track(track::TrackArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(&self.config).await,
            Commands::Status(args) => status::show(args, &self.config, self.format).await,
            Commands::List(args) => status::list(args, &self.config, self.format).await,
            Commands::Track(args) => track::execute(args, &self.config).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: open the configured presence store
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn PresenceStore>, AppError> {
    Ok(PresenceStoreManager::new(config).await?.store())
}
