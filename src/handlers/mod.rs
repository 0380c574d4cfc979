mod health;
mod metrics;
mod register;
mod session;
mod stats;
mod survey;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use register::register_email_handler;
pub use session::session_handler;
pub use stats::{catalog_handler, stats_handler, stats_summary_handler};
pub use survey::submit_survey_handler;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

// creating the router with routes
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/register-email", post(register_email_handler))
        .route("/api/avaliacoes", post(submit_survey_handler))
        .route("/api/avaliacoes/stats", get(stats_handler))
        .route("/api/avaliacoes/stats/resumo", get(stats_summary_handler))
        .route("/api/perguntas", get(catalog_handler))
        .route("/api/auth/session", get(session_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
