//! Feature encoding of a (patient, doctor) pair.
//!
//! Column order is fixed and must match the classifier artifact:
//! age, gender, location_match, has_chronic, condition_match,
//! years_experience, rating, success_rate, experience_level, specialty_code.

use serde::{Deserialize, Serialize};

use super::doctor::DoctorRecord;
use super::patient::PatientProfile;

/// Width of the feature vector.
pub const FEATURE_COUNT: usize = 10;

/// Number of columns rescaled by the scaler.
pub const SCALED_COLUMN_COUNT: usize = 4;

/// Positions rescaled by the scaler: age, years_experience, rating, success_rate.
pub const SCALED_COLUMNS: [usize; SCALED_COLUMN_COUNT] = [0, 5, 6, 7];

/// Column names in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "gender",
    "location_match",
    "has_chronic",
    "condition_match",
    "years_experience",
    "rating",
    "success_rate",
    "experience_level",
    "specialty_code",
];

/// Band a doctor's experience: <=5 -> 0, <=10 -> 1, <=20 -> 2, otherwise 3.
#[must_use]
pub fn experience_level(years_experience: f64) -> u8 {
    if years_experience <= 5.0 {
        0
    } else if years_experience <= 10.0 {
        1
    } else if years_experience <= 20.0 {
        2
    } else {
        3
    }
}

/// Case-insensitive location equality.
#[must_use]
pub fn location_match(patient: &PatientProfile, doctor: &DoctorRecord) -> bool {
    patient.location.to_lowercase() == doctor.location.to_lowercase()
}

/// The doctor's specialty appears in the patient's reported conditions.
///
/// Always false when the patient reported no condition.
#[must_use]
pub fn condition_match(patient: &PatientProfile, doctor: &DoctorRecord) -> bool {
    patient.has_chronic_condition()
        && patient
            .chronic_conditions
            .to_lowercase()
            .contains(&doctor.specialty.to_lowercase())
}

/// Numeric input row for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Encode a (patient, doctor) pair before scaling.
    #[must_use]
    pub fn unscaled(patient: &PatientProfile, doctor: &DoctorRecord) -> Self {
        Self([
            f64::from(patient.age),
            f64::from(patient.gender.code()),
            flag(location_match(patient, doctor)),
            flag(patient.has_chronic_condition()),
            flag(condition_match(patient, doctor)),
            doctor.years_experience,
            doctor.rating,
            doctor.success_rate,
            f64::from(experience_level(doctor.years_experience)),
            doctor.specialty_code as f64,
        ])
    }

    /// The four scaler input columns, in `SCALED_COLUMNS` order.
    #[must_use]
    pub fn scaled_columns(&self) -> [f64; SCALED_COLUMN_COUNT] {
        SCALED_COLUMNS.map(|i| self.0[i])
    }

    /// Overwrite the four scaler columns, leaving the other six untouched.
    pub fn set_scaled_columns(&mut self, values: [f64; SCALED_COLUMN_COUNT]) {
        for (column, value) in SCALED_COLUMNS.into_iter().zip(values) {
            self.0[column] = value;
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DoctorId;

    fn patient(location: &str, conditions: &str) -> PatientProfile {
        PatientProfile::new(35, 1, location, conditions, 3).expect("valid profile")
    }

    fn doctor(location: &str, specialty: &str, years: f64) -> DoctorRecord {
        DoctorRecord {
            doctor_id: DoctorId::Numeric(1),
            doctor_name: "Dr. Test".into(),
            specialty: specialty.into(),
            specialty_code: 4,
            location: location.into(),
            years_experience: years,
            rating: 4.2,
            success_rate: 0.8,
        }
    }

    #[test]
    fn test_experience_bands_are_upper_inclusive() {
        assert_eq!(experience_level(0.0), 0);
        assert_eq!(experience_level(5.0), 0);
        assert_eq!(experience_level(6.0), 1);
        assert_eq!(experience_level(10.0), 1);
        assert_eq!(experience_level(11.0), 2);
        assert_eq!(experience_level(20.0), 2);
        assert_eq!(experience_level(21.0), 3);
        assert_eq!(experience_level(5.5), 1);
    }

    #[test]
    fn test_location_match_is_case_insensitive() {
        assert!(location_match(
            &patient("Lahore", "none"),
            &doctor("lahore", "cardiology", 3.0)
        ));
        assert!(!location_match(
            &patient("Lahore", "none"),
            &doctor("Karachi", "cardiology", 3.0)
        ));
    }

    #[test]
    fn test_condition_match() {
        let p = patient("Lahore", "Diabetes");
        assert!(condition_match(&p, &doctor("Lahore", "diabetes", 3.0)));
        assert!(!condition_match(&p, &doctor("Lahore", "cardiology", 3.0)));
    }

    #[test]
    fn test_none_sentinel_disables_condition_features() {
        for sentinel in ["none", "NONE", "None"] {
            let p = patient("Lahore", sentinel);
            // "none" contains "none": still no match because has_chronic is false
            let v = FeatureVector::unscaled(&p, &doctor("Lahore", "none", 3.0));
            assert_eq!(v.0[3], 0.0);
            assert_eq!(v.0[4], 0.0);
        }
    }

    #[test]
    fn test_unscaled_vector_layout() {
        let p = patient("Lahore", "Diabetes and hypertension");
        let d = doctor("LAHORE", "Diabetes", 12.0);
        let v = FeatureVector::unscaled(&p, &d);
        assert_eq!(
            v.0,
            [35.0, 1.0, 1.0, 1.0, 1.0, 12.0, 4.2, 0.8, 2.0, 4.0]
        );
        assert_eq!(v.scaled_columns(), [35.0, 12.0, 4.2, 0.8]);
    }

    #[test]
    fn test_set_scaled_columns_touches_only_scaled_positions() {
        let p = patient("Lahore", "Diabetes");
        let d = doctor("Karachi", "cardiology", 25.0);
        let mut v = FeatureVector::unscaled(&p, &d);
        let before = v;

        v.set_scaled_columns([-1.0, -2.0, -3.0, -4.0]);

        assert_eq!(v.scaled_columns(), [-1.0, -2.0, -3.0, -4.0]);
        for i in (0..FEATURE_COUNT).filter(|i| !SCALED_COLUMNS.contains(i)) {
            assert_eq!(v.0[i], before.0[i], "column {i} must be untouched");
        }
    }
}
