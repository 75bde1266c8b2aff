//! Request/response bodies of the HTTP API, shared with the dashboard client.

use serde::{Deserialize, Serialize};

use crate::domain::{PatientProfile, ScoredDoctor, ValidationError};

/// Default number of doctors returned when `top_n` is omitted.
pub const DEFAULT_TOP_N: i64 = 3;

fn default_top_n() -> i64 {
    DEFAULT_TOP_N
}

/// `POST /recommend_top_n` body.
///
/// Integers are accepted as signed so out-of-range values reach validation
/// instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub age: i64,
    pub gender: i64,
    pub location: String,
    pub chronic_conditions: String,
    #[serde(default = "default_top_n")]
    pub top_n: i64,
}

impl TryFrom<RecommendRequest> for PatientProfile {
    type Error = ValidationError;

    fn try_from(req: RecommendRequest) -> Result<Self, Self::Error> {
        PatientProfile::new(
            req.age,
            req.gender,
            req.location,
            req.chronic_conditions,
            req.top_n,
        )
    }
}

/// `GET /` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub model_loaded: bool,
    pub doctors_loaded: bool,
    pub status: String,
}

/// `POST /recommend_top_n` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub top_doctors: Vec<ScoredDoctor>,
}

/// Error body for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
