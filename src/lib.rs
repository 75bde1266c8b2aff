//! # docrank
//!
//! Doctor recommendation: ranks a fixed roster of doctors for a patient
//! profile using a pretrained binary classifier.
//!
//! This crate provides:
//! - An HTTP service (`docrank`) that loads the model, scaler and roster
//!   artifacts once and serves top-N recommendations
//! - A terminal dashboard (`docrank-dashboard`) that submits patient data
//!   to the service and renders the ranking
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (PatientProfile, DoctorRecord, FeatureVector)
//! - `ports`: Trait definitions for the classifier and scaler
//! - `adapters`: Concrete implementations (linear model, artifact loading)
//! - `application`: The scoring and ranking use case
//! - `api`: HTTP surface (axum)
//! - `client` / `tui`: Dashboard HTTP client and terminal interface

pub mod adapters;
pub mod api;
pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod tui;

pub use domain::{DoctorRecord, PatientProfile, ScoredDoctor};

/// Result type for docrank operations
pub type Result<T> = std::result::Result<T, DocrankError>;

/// Main error type for docrank
#[derive(Debug, thiserror::Error)]
pub enum DocrankError {
    #[error("Artifact loading failed: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Invalid patient data: {0}")]
    Validation(#[from] domain::ValidationError),

    #[error("Recommendation failed: {0}")]
    Recommend(#[from] application::RecommendError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
