//! Linear adapter: logistic-regression classifier and fitted column scalers.
//!
//! Both are parameter sets exported by the training pipeline and loaded
//! from JSON. They implement the `Classifier` and `Scaler` ports.
//!
//! # Artifact shapes
//!
//! ```json
//! { "kind": "logistic_regression",
//!   "feature_names": ["age", "gender", ...],
//!   "coefficients": [0.4, ...],
//!   "intercept": -1.2 }
//!
//! { "kind": "standard", "mean": [..4], "scale": [..4] }
//! { "kind": "min_max",  "min":  [..4], "scale": [..4] }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::features::FEATURE_NAMES;
use crate::domain::{FeatureVector, FEATURE_COUNT, SCALED_COLUMN_COUNT};
use crate::ports::{Classifier, ModelError, Scaler};

/// Classifier artifact, tagged by model family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    LogisticRegression(LogisticRegression),
}

impl ClassifierArtifact {
    /// Validate and unwrap the fitted model.
    ///
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn into_model(self) -> Result<LogisticRegression, String> {
        match self {
            Self::LogisticRegression(model) => {
                model.validate()?;
                Ok(model)
            }
        }
    }
}

/// Logistic-regression parameters as exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Column names the model was fitted on; checked against `FEATURE_NAMES` when present.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    /// Check parameter shapes against the feature layout.
    ///
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {FEATURE_COUNT} coefficients, got {}",
                self.coefficients.len()
            ));
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(format!("coefficient {i} is not finite"));
        }
        if !self.intercept.is_finite() {
            return Err("intercept is not finite".into());
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES) {
                return Err(format!(
                    "feature_names {names:?} do not match expected order {FEATURE_NAMES:?}"
                ));
            }
        }
        Ok(())
    }

    fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_slice())
            .fold(self.intercept, |acc, (c, x)| acc + c * x)
    }
}

impl Classifier for LogisticRegression {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        if let Some(i) = features.as_slice().iter().position(|x| !x.is_finite()) {
            return Err(ModelError::NonFiniteInput(i));
        }
        let p = sigmoid(self.decision_function(features));
        if !(0.0..=1.0).contains(&p) {
            return Err(ModelError::InvalidProbability(p));
        }
        Ok(p)
    }
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// A fitted per-column transform over the four scaled columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedScaler {
    /// `(x - mean) / scale`
    Standard {
        mean: [f64; SCALED_COLUMN_COUNT],
        scale: [f64; SCALED_COLUMN_COUNT],
    },
    /// `x * scale + min`
    MinMax {
        min: [f64; SCALED_COLUMN_COUNT],
        scale: [f64; SCALED_COLUMN_COUNT],
    },
}

impl FittedScaler {
    /// Check fitted parameters are usable.
    ///
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let (offset, scale) = match self {
            Self::Standard { mean, scale } => (mean, scale),
            Self::MinMax { min, scale } => (min, scale),
        };
        if let Some(i) = offset.iter().chain(scale).position(|v| !v.is_finite()) {
            return Err(format!("parameter {i} is not finite"));
        }
        if let Self::Standard { scale, .. } = self {
            if let Some(i) = scale.iter().position(|&s| s == 0.0) {
                return Err(format!("standard scale for column {i} is zero"));
            }
        }
        Ok(())
    }
}

impl Scaler for FittedScaler {
    fn transform(
        &self,
        columns: [f64; SCALED_COLUMN_COUNT],
    ) -> Result<[f64; SCALED_COLUMN_COUNT], ModelError> {
        let mut out = [0.0; SCALED_COLUMN_COUNT];
        for (i, x) in columns.into_iter().enumerate() {
            out[i] = match self {
                Self::Standard { mean, scale } => (x - mean[i]) / scale[i],
                Self::MinMax { min, scale } => x * scale[i] + min[i],
            };
            if !out[i].is_finite() {
                return Err(ModelError::NonFiniteOutput(i));
            }
        }
        Ok(out)
    }
}
