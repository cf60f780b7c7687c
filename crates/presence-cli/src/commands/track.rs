//! Live tracking session driven from stdin.
//!
//! Each input line becomes a page event:
//!
//! | line                  | event                              |
//! |-----------------------|------------------------------------|
//! | `activity [dom-event]`| interaction (default `mousemove`)  |
//! | `hide` / `show`       | visibility change                  |
//! | `offline`             | forced offline write               |
//! | `status`              | print the local status             |
//! | `quit` or EOF         | unload: beacon, then exit          |

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use presence_client::{
    HttpBeacon, HttpPresenceGateway, InteractionKind, PresenceTracker, Visibility,
};
use presence_core::error::AppError;
use presence_database::{MemoryPresenceStore, PresenceStore};

use crate::output;

/// Arguments for `track`
#[derive(Debug, Args)]
pub struct TrackArgs {
    /// User ID to track
    #[arg(long)]
    pub user: String,

    /// Presence API base URL (overrides `tracker.base_url`)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Heartbeat interval in milliseconds (overrides `tracker.heartbeat_interval_ms`)
    #[arg(long)]
    pub heartbeat_ms: Option<u64>,
}

/// Time left for the detached beacon request before the process exits.
const BEACON_FLUSH: Duration = Duration::from_millis(500);

enum Line {
    Activity(InteractionKind),
    Visibility(Visibility),
    Offline,
    Status,
    Quit,
    Unknown,
}

fn parse_line(line: &str) -> Line {
    let mut words = line.split_whitespace();
    match words.next() {
        Some("activity") => Line::Activity(
            words
                .next()
                .and_then(InteractionKind::from_dom_event)
                .unwrap_or(InteractionKind::PointerMove),
        ),
        Some("hide") => Line::Visibility(Visibility::Hidden),
        Some("show") => Line::Visibility(Visibility::Visible),
        Some("offline") => Line::Offline,
        Some("status") => Line::Status,
        Some("quit") | Some("exit") => Line::Quit,
        _ => Line::Unknown,
    }
}

/// Run the session until `quit`, EOF, or Ctrl+C.
pub async fn execute(args: &TrackArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    let mut tracker_config = config.tracker.clone();
    tracker_config.user_id = args.user.clone();
    tracker_config.enabled = true;
    if let Some(base_url) = &args.base_url {
        tracker_config.base_url = base_url.clone();
    }
    if let Some(ms) = args.heartbeat_ms {
        tracker_config.heartbeat_interval_ms = ms;
    }

    let fallback: Arc<dyn PresenceStore> = match super::open_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            output::print_warning(&format!("Fallback store unavailable, using memory: {e}"));
            Arc::new(MemoryPresenceStore::new())
        }
    };

    let gateway = Arc::new(HttpPresenceGateway::new(&tracker_config)?);
    let beacon = Arc::new(HttpBeacon::new(&tracker_config)?);
    output::print_kv("User", &tracker_config.user_id);
    output::print_kv("API", &tracker_config.base_url);

    let (handle, task) = PresenceTracker::spawn(tracker_config, gateway, fallback, beacon);

    let mut status = handle.subscribe();
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let current = *status.borrow_and_update();
            output::print_kv("Status", current.as_str());
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.map_err(AppError::from)?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        match parse_line(&line) {
            Line::Activity(kind) => {
                handle.interaction(kind);
            }
            Line::Visibility(visibility) => {
                handle.set_visibility(visibility);
            }
            Line::Offline => {
                let outcome = handle.mark_offline().await;
                output::print_kv("Offline", &format!("{outcome:?}"));
            }
            Line::Status => output::print_kv("Status", handle.status().as_str()),
            Line::Quit => break,
            Line::Unknown => output::print_warning(
                "expected one of: activity [event], hide, show, offline, status, quit",
            ),
        }
    }

    handle.unload();
    task.await
        .map_err(|e| AppError::internal(format!("Tracking session panicked: {e}")))?;
    tokio::time::sleep(BEACON_FLUSH).await;

    output::print_success("Session ended.");
    Ok(())
}
