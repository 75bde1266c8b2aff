//! Tracing subscriber setup shared by the binaries.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogTarget;

/// Install the global subscriber.
///
/// `RUST_LOG` controls filtering (default `info`). The returned guard must be
/// held for the life of the process so buffered lines are flushed.
///
/// # Errors
/// Returns error if the log file cannot be opened.
pub fn init(target: &LogTarget) -> std::io::Result<WorkerGuard> {
    let (writer, guard) = match target {
        LogTarget::File(path) => {
            if let Some(parent) = Path::new(path).parent() {
                // Best-effort: a missing directory surfaces as the open error below.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_appender::non_blocking(file)
        }
        LogTarget::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    Ok(guard)
}
