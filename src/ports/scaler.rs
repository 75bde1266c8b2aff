//! Scaler port: the pre-fitted transform for the numeric feature columns.

use super::ModelError;
use crate::domain::SCALED_COLUMN_COUNT;

/// Trait for a fitted column transform.
///
/// Input columns arrive in `SCALED_COLUMNS` order
/// (age, years_experience, rating, success_rate) and must come back in
/// the same order.
pub trait Scaler: Send + Sync {
    /// Transform one row of the scaled columns using the fitted parameters.
    ///
    /// # Errors
    /// Returns `ModelError` if the transform cannot be applied.
    fn transform(
        &self,
        columns: [f64; SCALED_COLUMN_COUNT],
    ) -> Result<[f64; SCALED_COLUMN_COUNT], ModelError>;
}
