//! API router.
//!
//! Returns a `Router` with the recommender as shared state. Every request is
//! traced through `tower_http::trace::TraceLayer`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::application::Recommender;
use crate::ports::{Classifier, Scaler};

/// Build the API router over a loaded recommender.
pub fn build_router<C, S>(service: Arc<Recommender<C, S>>) -> Router
where
    C: Classifier + 'static,
    S: Scaler + 'static,
{
    Router::new()
        .route("/", get(endpoints::health::root))
        .route("/health", get(endpoints::health::check::<C, S>))
        .route(
            "/recommend_top_n",
            post(endpoints::recommend::recommend::<C, S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifacts::tests::write_artifacts;
    use crate::adapters::ArtifactSet;
    use crate::application::test_support::{three_doctor_roster, IdentityScaler, StubClassifier};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn stub_router(probs: Vec<(i64, f64)>) -> Router {
        build_router(Arc::new(Recommender::new(
            Arc::new(StubClassifier::new(probs)),
            Arc::new(IdentityScaler),
            three_doctor_roster(),
        )))
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/recommend_top_n")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn patient(top_n: Option<i64>) -> String {
        let mut body = json!({
            "age": 35,
            "gender": 1,
            "location": "Lahore",
            "chronic_conditions": "Diabetes"
        });
        if let Some(n) = top_n {
            body["top_n"] = json!(n);
        }
        body.to_string()
    }

    #[tokio::test]
    async fn root_reports_liveness() {
        let response = stub_router(vec![]).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["message"], endpoints::health::LIVENESS_MESSAGE);
    }

    #[tokio::test]
    async fn health_reports_loaded_artifacts() {
        let response = stub_router(vec![]).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["model_loaded"], true);
        assert_eq!(json["doctors_loaded"], true);
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn health_degraded_on_empty_roster() {
        let app = build_router(Arc::new(Recommender::new(
            Arc::new(StubClassifier::new(vec![])),
            Arc::new(IdentityScaler),
            Vec::new(),
        )));
        let json = json_body(app.oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(json["doctors_loaded"], false);
        assert_eq!(json["status"], "degraded");
    }

    #[tokio::test]
    async fn recommend_returns_sorted_top_n() {
        let app = stub_router(vec![(1, 0.41), (2, 0.87654), (3, 0.62)]);
        let response = app.oneshot(post_json(patient(Some(2)))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        let top = json["top_doctors"].as_array().unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0]["doctor_id"], 2);
        assert_eq!(top[0]["score"], 0.877);
        assert_eq!(top[1]["doctor_id"], 3);
        assert_eq!(top[1]["score"], 0.62);
        assert!(top[0].get("specialty_code").is_none());
    }

    #[tokio::test]
    async fn recommend_defaults_to_three() {
        let app = stub_router(vec![(1, 0.1), (2, 0.2), (3, 0.3)]);
        let json = json_body(app.oneshot(post_json(patient(None))).await.unwrap()).await;
        assert_eq!(json["top_doctors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn recommend_rejects_non_positive_top_n() {
        let app = stub_router(vec![(1, 0.1), (2, 0.2), (3, 0.3)]);
        let response = app.oneshot(post_json(patient(Some(0)))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_body(response).await;
        assert!(json["detail"].as_str().unwrap().contains("top_n"));
    }

    #[tokio::test]
    async fn recommend_rejects_malformed_body() {
        let app = stub_router(vec![]);
        let response = app
            .oneshot(post_json(r#"{"age": "thirty"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_body(response).await;
        assert!(json["detail"].is_string());
    }

    #[tokio::test]
    async fn scoring_failure_is_500_with_detail() {
        // No probability for specialty code 3.
        let app = stub_router(vec![(1, 0.1), (2, 0.2)]);
        let response = app.oneshot(post_json(patient(Some(1)))).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(
            json["detail"],
            "failed to score doctor 3: model backend failure: no stub probability for code 3"
        );
    }

    #[tokio::test]
    async fn recommend_with_loaded_artifacts() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path());
        let set = ArtifactSet::load(tmp.path(), false).unwrap();
        let app = build_router(Arc::new(Recommender::new(
            Arc::new(set.classifier),
            Arc::new(set.scaler),
            set.roster,
        )));

        let json = json_body(app.oneshot(post_json(patient(Some(3)))).await.unwrap()).await;
        let top = json["top_doctors"].as_array().unwrap();
        let ids: Vec<i64> = top.iter().map(|d| d["doctor_id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let scores: Vec<f64> = top.iter().map(|d| d["score"].as_f64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }
}
