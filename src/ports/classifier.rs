//! Classifier port: the pretrained binary model that scores a feature vector.
//!
//! The model is opaque to the application; only the positive-class
//! probability is consumed.

use crate::domain::FeatureVector;

/// Errors raised by classifier or scaler implementations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("non-finite value in model input at column {0}")]
    NonFiniteInput(usize),

    #[error("classifier returned invalid probability {0}")]
    InvalidProbability(f64),

    #[error("scaler produced non-finite output at column {0}")]
    NonFiniteOutput(usize),

    #[error("model backend failure: {0}")]
    Backend(String),
}

/// Trait for probability-predicting binary classifiers.
///
/// Implementations must be deterministic: the same vector always yields
/// the same probability.
pub trait Classifier: Send + Sync {
    /// Probability of the positive class for one feature row.
    ///
    /// # Errors
    /// Returns `ModelError` if the input cannot be scored.
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}
