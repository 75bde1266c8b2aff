//! Artifact manifest utility.
//!
//! Hashes the classifier, scaler and roster files in an artifact directory
//! and writes `manifest.json` next to them. The service verifies the
//! manifest at startup (mandatory with `DOCRANK_REQUIRE_MANIFEST=1`).
//!
//! # Usage
//!
//! ```bash
//! docrank-manifest <artifact_dir>
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use docrank::adapters::artifacts::{ArtifactManifest, MANIFEST_FILE};

fn usage() -> String {
    "Usage: docrank-manifest <artifact_dir>".to_string()
}

fn parse_args() -> Result<PathBuf> {
    let mut artifact_dir: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => bail!(usage()),
            _ if artifact_dir.is_none() => artifact_dir = Some(PathBuf::from(arg)),
            _ => bail!(usage()),
        }
    }

    artifact_dir.ok_or_else(|| anyhow::anyhow!(usage()))
}

fn main() -> Result<()> {
    let artifact_dir = parse_args()?;

    let manifest = ArtifactManifest::build(&artifact_dir)
        .with_context(|| format!("Failed to hash artifacts in {artifact_dir:?}"))?;
    manifest
        .verify(&artifact_dir)
        .context("Artifact set is incomplete")?;

    let path = artifact_dir.join(MANIFEST_FILE);
    let json = serde_json::to_vec_pretty(&manifest)?;
    fs::write(&path, json).with_context(|| format!("Failed to write {path:?}"))?;

    println!("Wrote {}", path.display());
    for (name, digest) in &manifest.files {
        println!("  {name}  sha256:{digest}");
    }
    Ok(())
}
