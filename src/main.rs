//! docrank: doctor recommendation service
//!
//! Loads the classifier, scaler and roster once, then serves the HTTP API.

use std::sync::Arc;

use anyhow::{Context, Result};

use docrank::adapters::ArtifactSet;
use docrank::application::Recommender;
use docrank::config::{self, ServiceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // The service owns no terminal UI; `auto` resolves to stdout.
    let target = config::log_target(|key| std::env::var(key).ok(), false);
    let _guard = docrank::logging::init(&target).context("Failed to initialise logging")?;

    let config = ServiceConfig::from_env()?;
    tracing::info!(
        artifact_dir = %config.artifact_dir.display(),
        require_manifest = config.require_manifest,
        "Starting docrank..."
    );

    // Refuse to start without a complete, valid artifact set.
    let artifacts = ArtifactSet::load(&config.artifact_dir, config.require_manifest)
        .with_context(|| format!("Failed to load artifacts from {:?}", config.artifact_dir))?;

    let service = Arc::new(Recommender::new(
        Arc::new(artifacts.classifier),
        Arc::new(artifacts.scaler),
        artifacts.roster,
    ));

    docrank::api::serve(service, config.bind_addr)
        .await
        .with_context(|| format!("Server on {} failed", config.bind_addr))?;

    tracing::info!("docrank shutdown complete.");
    Ok(())
}
