//! HTTP API for the recommendation service.
//!
//! Three routes, all JSON:
//! - `GET /` liveness message
//! - `GET /health` artifact load status
//! - `POST /recommend_top_n` ranked doctors for a patient profile
//!
//! Errors are returned as `{"detail": "..."}`.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::build_router;
pub use server::serve;
pub use types::{HealthResponse, RecommendRequest, RecommendResponse, RootResponse};
