//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the recommendation use case.

mod ranking;
mod recommender;

pub use ranking::rank_top_n;
pub use recommender::{RecommendError, Recommender, ServiceStatus};

#[cfg(test)]
pub(crate) use recommender::tests as test_support;
