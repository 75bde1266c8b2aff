//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: patient input, roster records, scored results
//! and the feature encoding shared by every classifier.

mod doctor;
pub mod features;
mod patient;

pub use doctor::{round_score, DoctorId, DoctorRecord, ScoredDoctor};
pub use features::{FeatureVector, FEATURE_COUNT, SCALED_COLUMNS, SCALED_COLUMN_COUNT};
pub use patient::{Gender, PatientProfile, ValidationError, NO_CONDITION_SENTINEL};
