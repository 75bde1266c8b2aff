//! Adapters layer: Concrete implementations of ports.
//!
//! - `linear`: logistic-regression classifier and fitted scalers
//! - `artifacts`: startup loading and integrity checks of the artifact set

pub mod artifacts;
pub mod linear;

pub use artifacts::{ArtifactError, ArtifactSet};
