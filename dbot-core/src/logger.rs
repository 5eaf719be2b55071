//! Logging setup for the bot process: plain-text lines teed to stdout and a log file.
//!
//! Line shape: `2026-01-31 12:00:00.123  INFO generation::orchestrator: generation completed
//! record_id=... image_count=1`.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::{format::Writer, time::FormatTime, writer::MakeWriterExt},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Filter used when `RUST_LOG` is unset. sqlx logs every statement at info, and the HTTP
/// stacks under reqwest/axum/teloxide are chatty at debug.
pub const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn,hyper=warn,hyper_util=warn,reqwest=warn";

/// Local wall-clock time with milliseconds; throttled sends are spaced by a few hundred ms.
struct LocalMillis;

impl FormatTime for LocalMillis {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Opens `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. Level comes from `RUST_LOG`, else [`DEFAULT_LOG_FILTER`];
/// load `.env` before calling. Fails when a subscriber is already installed.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    let file = Arc::new(open_log_file(log_file_path)?);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout.and(file))
        .with_timer(LocalMillis)
        .with_target(true)
        .with_ansi(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    tracing::info!(log_file = log_file_path, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_open_log_file_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("nested").join("bot.log");

        open_log_file(path.to_str().unwrap()).unwrap();

        assert!(path.exists());
    }
}
