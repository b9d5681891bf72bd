pub mod health;
pub mod metrics;
pub mod risk;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub use health::health_check;
pub use metrics::metrics_handler;
pub use risk::{
    assess_snapshot, get_history, get_signals, list_scenarios, record_observation,
    reset_history, score_snapshot, ScoreRequest, ScoreResponse,
};

pub fn create_risk_routes() -> Router<AppState> {
    Router::new()
        .route("/observations", post(record_observation))
        .route("/score", post(score_snapshot))
        .route("/assess", post(assess_snapshot))
        .route("/history", get(get_history))
        .route("/history/reset", post(reset_history))
        .route("/signals", get(get_signals))
        .route("/scenarios", get(list_scenarios))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", create_risk_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
