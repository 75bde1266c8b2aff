//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with service liveness and health
//! - Patient details form
//! - Ranked results table with a success-rate chart

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use worker::{RecommendationProgress, RecommendationWorker, ServiceProbe, WorkerHandle};
