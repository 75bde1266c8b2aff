//! Liveness and health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::api::types::{HealthResponse, RootResponse};
use crate::application::Recommender;
use crate::ports::{Classifier, Scaler};

pub const LIVENESS_MESSAGE: &str = "Doctor Recommendation API is live";

/// `GET /` liveness check.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: LIVENESS_MESSAGE.to_string(),
    })
}

/// `GET /health` reports whether the model and roster are loaded.
pub async fn check<C, S>(State(service): State<Arc<Recommender<C, S>>>) -> Json<HealthResponse>
where
    C: Classifier + 'static,
    S: Scaler + 'static,
{
    let status = service.status();

    Json(HealthResponse {
        model_loaded: status.model_loaded,
        doctors_loaded: status.doctors_loaded,
        status: if status.is_healthy() { "healthy" } else { "degraded" }.to_string(),
    })
}
