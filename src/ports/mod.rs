//! Ports layer: Trait definitions for external collaborators.
//!
//! The pretrained classifier and scaler are injected through these traits
//! so the ranking logic can run against deterministic stubs in tests.

mod classifier;
mod scaler;

pub use classifier::{Classifier, ModelError};
pub use scaler::Scaler;
