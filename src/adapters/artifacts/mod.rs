//! Artifact loader: reads the classifier, scaler and roster at startup.
//!
//! # Layout
//!
//! The artifact directory holds three JSON files produced by the training
//! pipeline:
//!
//! - `doctor_model.json`: classifier parameters
//! - `scaler.json`: fitted scaler for the four numeric columns
//! - `doctors_data.json`: the doctor roster
//!
//! # Integrity
//!
//! An optional `manifest.json` binds the artifact files by SHA-256. When it
//! is present every listed file must match; when `require_manifest` is set a
//! missing manifest is an error. `docrank-manifest` writes the manifest.
//!
//! Any failure here is fatal: the service must not serve traffic without a
//! complete, verified artifact set.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::linear::{ClassifierArtifact, FittedScaler, LogisticRegression};
use crate::domain::DoctorRecord;

pub const CLASSIFIER_FILE: &str = "doctor_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ROSTER_FILE: &str = "doctors_data.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Files a manifest must bind.
pub const ARTIFACT_FILES: [&str; 3] = [CLASSIFIER_FILE, SCALER_FILE, ROSTER_FILE];

/// Supported manifest version.
const MANIFEST_VERSION: u32 = 1;

/// Errors that can occur while loading artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact directory not found: {0:?}")]
    MissingDirectory(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {artifact}: {reason}")]
    Invalid { artifact: &'static str, reason: String },

    #[error("{file} does not match manifest (expected sha256 {expected}, got {actual})")]
    Integrity {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("manifest.json required but not found in {0:?}")]
    ManifestRequired(PathBuf),
}

/// SHA-256 bindings of the artifact files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    #[serde(default)]
    pub created_at: Option<i64>,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Hash every artifact file present in `dir`.
    ///
    /// # Errors
    /// Returns error if a file cannot be read or none are present.
    pub fn build(dir: &Path) -> Result<Self, ArtifactError> {
        let mut files = BTreeMap::new();
        for name in ARTIFACT_FILES {
            let path = dir.join(name);
            if path.exists() {
                files.insert(name.to_string(), sha256_hex(&read_bytes(&path)?));
            }
        }
        if files.is_empty() {
            return Err(ArtifactError::Invalid {
                artifact: MANIFEST_FILE,
                reason: format!("no artifact files found in {dir:?}"),
            });
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            created_at: Some(chrono::Utc::now().timestamp()),
            files,
        })
    }

    /// Check every bound file in `dir` against its recorded hash.
    ///
    /// # Errors
    /// Returns `ArtifactError::Integrity` on the first mismatch.
    pub fn verify(&self, dir: &Path) -> Result<(), ArtifactError> {
        if self.version != MANIFEST_VERSION {
            return Err(ArtifactError::Invalid {
                artifact: MANIFEST_FILE,
                reason: format!("unsupported manifest version {}", self.version),
            });
        }
        // Only the known artifact names are resolved against `dir`.
        for name in ARTIFACT_FILES {
            let expected = self.files.get(name).ok_or_else(|| ArtifactError::Invalid {
                artifact: MANIFEST_FILE,
                reason: format!("manifest does not bind {name}"),
            })?;
            let actual = sha256_hex(&read_bytes(&dir.join(name))?);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(ArtifactError::Integrity {
                    file: name.to_string(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// The immutable artifact set the service runs on.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub classifier: LogisticRegression,
    pub scaler: FittedScaler,
    pub roster: Vec<DoctorRecord>,
    /// Whether a manifest was present and verified.
    pub verified: bool,
}

impl ArtifactSet {
    /// Load and validate all artifacts from `dir`.
    ///
    /// # Errors
    /// Returns error if any artifact is missing, unreadable, malformed or
    /// fails manifest verification.
    pub fn load(dir: &Path, require_manifest: bool) -> Result<Self, ArtifactError> {
        if !dir.is_dir() {
            return Err(ArtifactError::MissingDirectory(dir.to_path_buf()));
        }

        let verified = verify_manifest(dir, require_manifest)?;

        let classifier = read_json::<ClassifierArtifact>(&dir.join(CLASSIFIER_FILE))?
            .into_model()
            .map_err(|reason| ArtifactError::Invalid {
                artifact: CLASSIFIER_FILE,
                reason,
            })?;

        let scaler: FittedScaler = read_json(&dir.join(SCALER_FILE))?;
        scaler.validate().map_err(|reason| ArtifactError::Invalid {
            artifact: SCALER_FILE,
            reason,
        })?;

        let roster: Vec<DoctorRecord> = read_json(&dir.join(ROSTER_FILE))?;
        for (row, doctor) in roster.iter().enumerate() {
            doctor.validate().map_err(|errors| ArtifactError::Invalid {
                artifact: ROSTER_FILE,
                reason: format!("row {row} (doctor {}): {}", doctor.doctor_id, errors.join(", ")),
            })?;
        }

        tracing::info!(
            dir = ?dir,
            doctors = roster.len(),
            verified,
            "Loaded recommendation artifacts"
        );

        Ok(Self {
            classifier,
            scaler,
            roster,
            verified,
        })
    }
}

fn verify_manifest(dir: &Path, require_manifest: bool) -> Result<bool, ArtifactError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        if require_manifest {
            tracing::error!("Artifact manifest not found at {:?}", manifest_path);
            return Err(ArtifactError::ManifestRequired(dir.to_path_buf()));
        }
        tracing::warn!(
            "No {MANIFEST_FILE} in {:?}; loading artifacts without integrity check",
            dir
        );
        return Ok(false);
    }

    let manifest: ArtifactManifest = read_json(&manifest_path)?;
    manifest.verify(dir)?;
    tracing::info!("Artifact manifest verified ({} files)", manifest.files.len());
    Ok(true)
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) const CLASSIFIER_JSON: &str = r#"{
        "kind": "logistic_regression",
        "feature_names": ["age", "gender", "location_match", "has_chronic", "condition_match",
                          "years_experience", "rating", "success_rate", "experience_level", "specialty_code"],
        "coefficients": [0.05, 0.0, 1.2, 0.3, 2.1, 0.4, 0.6, 0.8, 0.1, 0.0],
        "intercept": -1.5
    }"#;

    pub(crate) const SCALER_JSON: &str =
        r#"{"kind": "standard", "mean": [42.0, 12.0, 4.1, 0.82], "scale": [15.0, 7.5, 0.4, 0.08]}"#;

    pub(crate) const ROSTER_JSON: &str = r#"[
        {"doctor_id": 1, "doctor_name": "Dr. Ayesha Khan", "specialty": "Diabetes",
         "specialty_code": 2, "location": "Lahore", "years_experience": 12,
         "rating": 4.7, "success_rate": 0.91},
        {"doctor_id": 2, "doctor_name": "Dr. Bilal Ahmed", "specialty": "Cardiology",
         "specialty_code": 1, "location": "Karachi", "years_experience": 22,
         "rating": 4.4, "success_rate": 0.87},
        {"doctor_id": 3, "doctor_name": "Dr. Sana Malik", "specialty": "Dermatology",
         "specialty_code": 3, "location": "lahore", "years_experience": 4,
         "rating": 4.1, "success_rate": 0.78}
    ]"#;

    pub(crate) fn write_artifacts(dir: &Path) {
        fs::write(dir.join(CLASSIFIER_FILE), CLASSIFIER_JSON).unwrap();
        fs::write(dir.join(SCALER_FILE), SCALER_JSON).unwrap();
        fs::write(dir.join(ROSTER_FILE), ROSTER_JSON).unwrap();
    }

    fn write_manifest(dir: &Path) {
        let manifest = ArtifactManifest::build(dir).unwrap();
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_vec_pretty(&manifest).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_load_complete_set() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path());

        let set = ArtifactSet::load(tmp.path(), false).expect("should load");
        assert_eq!(set.roster.len(), 3);
        assert_eq!(set.classifier.coefficients.len(), 10);
        assert!(!set.verified);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = ArtifactSet::load(&tmp.path().join("absent"), false).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingDirectory(_)));
    }

    #[test]
    fn test_missing_artifact_is_fatal() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path());
        fs::remove_file(tmp.path().join(SCALER_FILE)).unwrap();

        let err = ArtifactSet::load(tmp.path(), false).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
        assert!(err.to_string().contains(SCALER_FILE));
    }

    #[test]
    fn test_corrupt_artifact_is_fatal() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path());
        fs::write(tmp.path().join(CLASSIFIER_FILE), b"\x80\x04not json").unwrap();

        let err = ArtifactSet::load(tmp.path(), false).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }

    #[test]
    fn test_invalid_roster_row_is_fatal() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path());
        fs::write(
            tmp.path().join(ROSTER_FILE),
            r#"[{"doctor_id": "X", "doctor_name": "Dr. X", "specialty": "ENT",
                "specialty_code": 9, "location": "Quetta", "years_experience": 3,
                "rating": 4.0, "success_rate": 1.7}]"#,
        )
        .unwrap();

        let err = ArtifactSet::load(tmp.path(), false).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { artifact: ROSTER_FILE, .. }));
        assert!(err.to_string().contains("success_rate"));
    }

    #[test]
    fn test_manifest_verifies_and_detects_tampering() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path());
        write_manifest(tmp.path());

        let set = ArtifactSet::load(tmp.path(), true).expect("should verify");
        assert!(set.verified);

        fs::write(tmp.path().join(ROSTER_FILE), "[]").unwrap();
        let err = ArtifactSet::load(tmp.path(), true).unwrap_err();
        assert!(matches!(err, ArtifactError::Integrity { .. }));
    }

    #[test]
    fn test_required_manifest_missing() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path());

        let err = ArtifactSet::load(tmp.path(), true).unwrap_err();
        assert!(matches!(err, ArtifactError::ManifestRequired(_)));
    }

    #[test]
    fn test_bundled_model_directory_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("model");
        let set = ArtifactSet::load(&dir, false).expect("bundled artifacts should load");
        assert_eq!(set.roster.len(), 12);
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
