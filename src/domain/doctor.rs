//! Doctor roster records and scored results.

use serde::{Deserialize, Serialize};

/// Identifier of a doctor as it appears in the roster artifact.
///
/// Rosters exported from tabular data carry either numeric or string ids;
/// both are preserved verbatim in responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DoctorId {
    Numeric(i64),
    Text(String),
}

impl std::fmt::Display for DoctorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One entry of the static doctor roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub specialty: String,
    pub specialty_code: i64,
    pub location: String,

    /// Years in practice (>= 0)
    pub years_experience: f64,

    pub rating: f64,

    /// Historical success rate in [0, 1]
    pub success_rate: f64,
}

impl DoctorRecord {
    /// Validate numeric fields of a roster row.
    ///
    /// # Errors
    /// Returns all problems found as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.years_experience.is_finite() || self.years_experience < 0.0 {
            errors.push(format!(
                "years_experience {} must be a non-negative number",
                self.years_experience
            ));
        }
        if !self.rating.is_finite() {
            errors.push(format!("rating {} must be finite", self.rating));
        }
        if !(0.0..=1.0).contains(&self.success_rate) {
            errors.push(format!(
                "success_rate {} out of range [0, 1]",
                self.success_rate
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A roster doctor with its predicted score for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoctor {
    pub doctor_id: DoctorId,
    pub doctor_name: String,
    pub specialty: String,
    pub years_experience: f64,
    pub rating: f64,
    pub success_rate: f64,

    /// Positive-class probability rounded to 3 decimals
    pub score: f64,
}

impl ScoredDoctor {
    /// Attach a raw probability to a doctor, rounding it for output.
    #[must_use]
    pub fn new(doctor: &DoctorRecord, probability: f64) -> Self {
        Self {
            doctor_id: doctor.doctor_id.clone(),
            doctor_name: doctor.doctor_name.clone(),
            specialty: doctor.specialty.clone(),
            years_experience: doctor.years_experience,
            rating: doctor.rating,
            success_rate: doctor.success_rate,
            score: round_score(probability),
        }
    }
}

/// Round a probability to 3 decimal places.
#[must_use]
pub fn round_score(probability: f64) -> f64 {
    (probability * 1000.0).round() / 1000.0
}
