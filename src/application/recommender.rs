//! Recommendation service: scores the roster for a patient and ranks it.
//!
//! For every doctor the service:
//! 1. Encodes the (patient, doctor) pair as a feature vector
//! 2. Rescales the four numeric columns with the fitted scaler
//! 3. Asks the classifier for the positive-class probability
//!
//! then sorts by score and keeps the top N. The roster, classifier and scaler
//! are shared read-only across requests.

use std::sync::Arc;

use crate::domain::{DoctorRecord, FeatureVector, PatientProfile, ScoredDoctor};
use crate::ports::{Classifier, ModelError, Scaler};

use super::ranking::rank_top_n;

/// Errors raised while scoring a request. The whole request fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecommendError {
    #[error("failed to score doctor {doctor_id}: {source}")]
    Scoring {
        doctor_id: String,
        #[source]
        source: ModelError,
    },
}

/// Artifact load status reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStatus {
    pub model_loaded: bool,
    pub doctors_loaded: bool,
}

impl ServiceStatus {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.model_loaded && self.doctors_loaded
    }
}

/// Service for ranking doctors against a patient profile.
pub struct Recommender<C, S>
where
    C: Classifier,
    S: Scaler,
{
    classifier: Arc<C>,
    scaler: Arc<S>,
    roster: Arc<[DoctorRecord]>,
}

impl<C, S> Recommender<C, S>
where
    C: Classifier,
    S: Scaler,
{
    /// Create a new recommender over a fixed roster.
    pub fn new(classifier: Arc<C>, scaler: Arc<S>, roster: Vec<DoctorRecord>) -> Self {
        Self {
            classifier,
            scaler,
            roster: roster.into(),
        }
    }

    /// The roster every request is scored against.
    #[must_use]
    pub fn roster(&self) -> &[DoctorRecord] {
        &self.roster
    }

    /// Artifacts are loaded before construction; an empty roster is the only
    /// degraded state left to report.
    #[must_use]
    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            model_loaded: true,
            doctors_loaded: !self.roster.is_empty(),
        }
    }

    /// Build the scaled classifier input for one doctor.
    ///
    /// # Errors
    /// Returns `ModelError` if the scaler rejects the row.
    pub fn features_for(
        &self,
        patient: &PatientProfile,
        doctor: &DoctorRecord,
    ) -> Result<FeatureVector, ModelError> {
        let mut features = FeatureVector::unscaled(patient, doctor);
        let scaled = self.scaler.transform(features.scaled_columns())?;
        features.set_scaled_columns(scaled);
        Ok(features)
    }

    /// Score one doctor for a patient.
    ///
    /// # Errors
    /// Returns `RecommendError::Scoring` if the scaler or classifier fails.
    pub fn score(
        &self,
        patient: &PatientProfile,
        doctor: &DoctorRecord,
    ) -> Result<ScoredDoctor, RecommendError> {
        let probability = self
            .features_for(patient, doctor)
            .and_then(|features| self.classifier.predict_proba(&features))
            .and_then(|p| {
                if (0.0..=1.0).contains(&p) {
                    Ok(p)
                } else {
                    Err(ModelError::InvalidProbability(p))
                }
            })
            .map_err(|source| RecommendError::Scoring {
                doctor_id: doctor.doctor_id.to_string(),
                source,
            })?;

        Ok(ScoredDoctor::new(doctor, probability))
    }

    /// Rank the full roster for a patient and return the top `patient.top_n`.
    ///
    /// Equal scores keep roster order.
    ///
    /// # Errors
    /// Returns the first scoring error; no partial results are returned.
    pub fn recommend(&self, patient: &PatientProfile) -> Result<Vec<ScoredDoctor>, RecommendError> {
        let scored = self
            .roster
            .iter()
            .map(|doctor| self.score(patient, doctor))
            .collect::<Result<Vec<_>, _>>()?;

        let top = rank_top_n(scored, patient.top_n);

        tracing::debug!(
            roster = self.roster.len(),
            top_n = patient.top_n,
            returned = top.len(),
            best = top.first().map(|d| d.score),
            "Ranked roster"
        );

        Ok(top)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapters::linear::FittedScaler;
    use crate::domain::{DoctorId, SCALED_COLUMN_COUNT};
    use std::sync::Mutex;

    /// Scaler that leaves columns untouched.
    pub(crate) struct IdentityScaler;

    impl Scaler for IdentityScaler {
        fn transform(
            &self,
            columns: [f64; SCALED_COLUMN_COUNT],
        ) -> Result<[f64; SCALED_COLUMN_COUNT], ModelError> {
            Ok(columns)
        }
    }

    /// Classifier with a fixed probability per specialty code, recording its inputs.
    pub(crate) struct StubClassifier {
        pub by_specialty_code: Vec<(i64, f64)>,
        pub seen: Mutex<Vec<FeatureVector>>,
    }

    impl StubClassifier {
        pub(crate) fn new(by_specialty_code: Vec<(i64, f64)>) -> Self {
            Self {
                by_specialty_code,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Classifier for StubClassifier {
        fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(*features);
            }
            let code = features.0[9] as i64;
            self.by_specialty_code
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, p)| *p)
                .ok_or_else(|| ModelError::Backend(format!("no stub probability for code {code}")))
        }
    }

    pub(crate) fn doctor(id: i64, specialty: &str, code: i64, location: &str, years: f64) -> DoctorRecord {
        DoctorRecord {
            doctor_id: DoctorId::Numeric(id),
            doctor_name: format!("Dr. {specialty} {id}"),
            specialty: specialty.into(),
            specialty_code: code,
            location: location.into(),
            years_experience: years,
            rating: 4.5,
            success_rate: 0.9,
        }
    }

    pub(crate) fn three_doctor_roster() -> Vec<DoctorRecord> {
        vec![
            doctor(1, "Cardiology", 1, "Karachi", 22.0),
            doctor(2, "Diabetes", 2, "Lahore", 12.0),
            doctor(3, "Dermatology", 3, "Lahore", 4.0),
        ]
    }

    fn patient(top_n: i64) -> PatientProfile {
        PatientProfile::new(35, 1, "Lahore", "Diabetes", top_n).expect("valid profile")
    }

    fn service(probs: Vec<(i64, f64)>) -> Recommender<StubClassifier, IdentityScaler> {
        Recommender::new(
            Arc::new(StubClassifier::new(probs)),
            Arc::new(IdentityScaler),
            three_doctor_roster(),
        )
    }

    #[test]
    fn test_end_to_end_top_two() {
        let svc = service(vec![(1, 0.41), (2, 0.87654), (3, 0.62)]);
        let top = svc.recommend(&patient(2)).expect("should rank");

        let ids: Vec<_> = top.iter().map(|d| d.doctor_id.clone()).collect();
        assert_eq!(ids, vec![DoctorId::Numeric(2), DoctorId::Numeric(3)]);
        assert!((top[0].score - 0.877).abs() < f64::EPSILON);
        assert!((top[1].score - 0.62).abs() < f64::EPSILON);
    }

    #[test]
    fn test_feature_vectors_reach_classifier_in_roster_order() {
        let svc = service(vec![(1, 0.1), (2, 0.2), (3, 0.3)]);
        svc.recommend(&patient(3)).unwrap();

        let seen = svc.classifier.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        // Diabetes doctor in Lahore: location and condition both match
        assert_eq!(seen[1].0, [35.0, 1.0, 1.0, 1.0, 1.0, 12.0, 4.5, 0.9, 2.0, 2.0]);
        // Cardiology in Karachi: neither matches, top experience band
        assert_eq!(seen[0].0[2], 0.0);
        assert_eq!(seen[0].0[4], 0.0);
        assert_eq!(seen[0].0[8], 3.0);
    }

    #[test]
    fn test_scaler_applies_to_four_columns_only() {
        let scaler = FittedScaler::Standard {
            mean: [35.0, 12.0, 4.5, 0.9],
            scale: [1.0, 1.0, 1.0, 1.0],
        };
        let svc = Recommender::new(
            Arc::new(StubClassifier::new(vec![(2, 0.5)])),
            Arc::new(scaler),
            vec![doctor(2, "Diabetes", 2, "Lahore", 12.0)],
        );

        let features = svc.features_for(&patient(1), &svc.roster()[0]).unwrap();
        assert_eq!(features.0, [0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 2.0, 2.0]);
    }

    #[test]
    fn test_top_n_larger_than_roster_returns_all() {
        let svc = service(vec![(1, 0.3), (2, 0.2), (3, 0.1)]);
        let top = svc.recommend(&patient(10)).unwrap();
        assert_eq!(top.len(), 3);
        assert!(top.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_roster_order() {
        let svc = service(vec![(1, 0.5), (2, 0.5), (3, 0.5)]);
        let top = svc.recommend(&patient(3)).unwrap();
        let ids: Vec<_> = top.iter().map(|d| d.doctor_id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let svc = service(vec![(1, 0.33), (2, 0.66), (3, 0.99)]);
        let p = patient(3);
        let first = svc.recommend(&p).unwrap();
        let second = svc.recommend(&p).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_classifier_failure_fails_whole_request() {
        // No probability for code 3
        let svc = service(vec![(1, 0.3), (2, 0.2)]);
        let err = svc.recommend(&patient(1)).unwrap_err();
        let RecommendError::Scoring { doctor_id, source } = err;
        assert_eq!(doctor_id, "3");
        assert!(matches!(source, ModelError::Backend(_)));
    }

    #[test]
    fn test_out_of_range_probability_is_rejected() {
        let svc = service(vec![(1, 0.3), (2, 1.2), (3, 0.1)]);
        let err = svc.recommend(&patient(3)).unwrap_err();
        assert!(err.to_string().contains("invalid probability"));
    }

    #[test]
    fn test_status_reports_empty_roster() {
        let svc = Recommender::new(
            Arc::new(StubClassifier::new(vec![])),
            Arc::new(IdentityScaler),
            vec![],
        );
        assert!(!svc.status().is_healthy());
        assert!(svc.recommend(&patient(3)).unwrap().is_empty());
    }
}
