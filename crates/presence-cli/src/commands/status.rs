//! Presence inspection commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use presence_core::error::AppError;
use presence_entity::PresenceRecord;

use crate::output::{self, OutputFormat};

/// Arguments for `status`
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// User ID to look up
    pub user_id: String,
}

/// Arguments for `list`
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show users currently online
    #[arg(long)]
    pub online: bool,
}

/// Presence display row for table output
#[derive(Debug, Serialize, Tabled)]
struct PresenceRow {
    /// User ID
    user_id: String,
    /// Online or offline
    status: String,
    /// Last confirmed activity
    last_seen: String,
    /// Time of the last write
    updated_at: String,
    /// Caller location, when the primary endpoint saw one
    location: String,
}

impl From<&PresenceRecord> for PresenceRow {
    fn from(r: &PresenceRecord) -> Self {
        Self {
            user_id: r.user_id.clone(),
            status: r.status().to_string(),
            last_seen: r.last_seen.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: r.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            location: r.location.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Show one user's presence
pub async fn show(args: &StatusArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::open_store(&config).await?;

    let record = store
        .find_by_user(&args.user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No presence for user {}", args.user_id)))?;

    output::print_item(&PresenceRow::from(&record), format);
    Ok(())
}

/// List presence records
pub async fn list(args: &ListArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let store = super::open_store(&config).await?;

    let records = store.list(args.online).await?;
    let rows: Vec<PresenceRow> = records.iter().map(PresenceRow::from).collect();
    output::print_list(&rows, format);

    if format == OutputFormat::Table && !rows.is_empty() {
        let online = records.iter().filter(|r| r.is_online).count();
        output::print_kv("Online", &format!("{online}/{}", rows.len()));
    }
    Ok(())
}
