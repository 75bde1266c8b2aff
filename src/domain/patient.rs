//! Patient profile submitted with a recommendation request.

use serde::{Deserialize, Serialize};

/// Conditions value meaning "no chronic condition" (compared case-insensitively).
pub const NO_CONDITION_SENTINEL: &str = "none";

/// Errors raised while building a [`PatientProfile`] from caller input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("age must be a positive integer, got {0}")]
    Age(i64),

    #[error("gender must be 0 (female) or 1 (male), got {0}")]
    Gender(i64),

    #[error("top_n must be a positive integer, got {0}")]
    TopN(i64),
}

/// Binary gender code used by the classifier (0 = female, 1 = male).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    Female,
    Male,
}

impl Gender {
    /// Numeric code fed to the feature vector.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }

    /// Parse a wire gender code.
    ///
    /// # Errors
    /// Returns `ValidationError::Gender` for anything other than 0 or 1.
    pub fn from_code(code: i64) -> Result<Self, ValidationError> {
        match code {
            0 => Ok(Self::Female),
            1 => Ok(Self::Male),
            other => Err(ValidationError::Gender(other)),
        }
    }

    /// The other option, for toggle-style inputs.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Female => Self::Male,
            Self::Male => Self::Female,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Female => write!(f, "Female"),
            Self::Male => write!(f, "Male"),
        }
    }
}

/// Patient data for a single recommendation request.
///
/// Built per request, never stored. Free-text fields (`location`,
/// `chronic_conditions`) must not be logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    /// Age in years (>= 1)
    pub age: u32,

    /// Gender code
    pub gender: Gender,

    /// Free-text city/location, compared case-insensitively to the doctor's
    pub location: String,

    /// Free-text chronic conditions, or the `"none"` sentinel
    pub chronic_conditions: String,

    /// Number of doctors to return (>= 1)
    pub top_n: usize,

    /// When the request was received
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl PatientProfile {
    /// Validate raw caller input and build a profile.
    ///
    /// # Errors
    /// Returns the first `ValidationError` found (age, then gender, then top_n).
    pub fn new(
        age: i64,
        gender: i64,
        location: impl Into<String>,
        chronic_conditions: impl Into<String>,
        top_n: i64,
    ) -> Result<Self, ValidationError> {
        let age = u32::try_from(age)
            .ok()
            .filter(|&a| a >= 1)
            .ok_or(ValidationError::Age(age))?;
        let gender = Gender::from_code(gender)?;
        let top_n = usize::try_from(top_n)
            .ok()
            .filter(|&n| n >= 1)
            .ok_or(ValidationError::TopN(top_n))?;

        Ok(Self {
            age,
            gender,
            location: location.into(),
            chronic_conditions: chronic_conditions.into(),
            top_n,
            received_at: chrono::Utc::now(),
        })
    }

    /// Whether the patient reported any chronic condition.
    #[must_use]
    pub fn has_chronic_condition(&self) -> bool {
        self.chronic_conditions.to_lowercase() != NO_CONDITION_SENTINEL
    }
}
