//! docrank-dashboard: terminal client for the recommendation service.

use std::io::IsTerminal;

use anyhow::{Context, Result};

use docrank::config::{self, ClientConfig};
use docrank::tui::App;

fn main() -> Result<()> {
    // Logging to the terminal would corrupt the TUI (alternate screen):
    // interactive sessions log to a file unless DOCRANK_LOG_MODE says otherwise.
    let interactive = std::io::stdout().is_terminal();
    let target = config::log_target(|key| std::env::var(key).ok(), interactive);
    let _guard = docrank::logging::init(&target).context("Failed to initialise logging")?;

    let config = ClientConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, "Starting docrank dashboard...");

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("docrank dashboard shutdown complete.");
    Ok(())
}
