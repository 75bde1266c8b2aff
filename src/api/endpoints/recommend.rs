//! Top-N recommendation endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{RecommendRequest, RecommendResponse};
use crate::application::Recommender;
use crate::domain::PatientProfile;
use crate::ports::{Classifier, Scaler};

/// `POST /recommend_top_n` scores the roster and returns the best `top_n`.
///
/// Patient free text (location, conditions) is never logged.
pub async fn recommend<C, S>(
    State(service): State<Arc<Recommender<C, S>>>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError>
where
    C: Classifier + 'static,
    S: Scaler + 'static,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("recommend", %request_id);

    async move {
        let Json(request) = body?;
        let patient = PatientProfile::try_from(request)?;
        let top_n = patient.top_n;

        let top_doctors = service.recommend(&patient)?;

        tracing::info!(top_n, returned = top_doctors.len(), "Recommendation served");

        Ok(Json(RecommendResponse { top_doctors }))
    }
    .instrument(span)
    .await
}
