use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::models::{Alert, RiskLevel, RiskScore, Snapshot};
use crate::risk::ScenarioDescriptor;
use crate::services::{HistoryView, RecordSummary, SignalReport};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub snapshot: Snapshot,
    /// External search-trend or news attention surge.
    #[serde(default)]
    pub attention_spike: bool,
    /// Sentiment of user-reported news in [-1, 1], averaged into
    /// `public_sentiment`.
    #[serde(default)]
    pub user_sentiment: Option<f64>,
}

impl ScoreRequest {
    fn into_snapshot(self) -> Result<(Snapshot, bool), AppError> {
        let mut snapshot = self.snapshot;
        if let Some(user_sentiment) = self.user_sentiment {
            if !(-1.0..=1.0).contains(&user_sentiment) {
                return Err(AppError::ValidationError(format!(
                    "user_sentiment must be within [-1, 1], got {}",
                    user_sentiment
                )));
            }
            snapshot.blend_sentiment(user_sentiment);
        }
        Ok((snapshot, self.attention_spike))
    }
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
    #[serde(flatten)]
    pub risk: RiskScore,
}

pub async fn record_observation(
    State(state): State<AppState>,
    Json(snapshot): Json<Snapshot>,
) -> Json<RecordSummary> {
    Json(state.engine.record_observation(&snapshot).await)
}

/// Score without recording or alerting.
pub async fn score_snapshot(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let (snapshot, attention_spike) = request.into_snapshot()?;
    let risk = state.engine.score(&snapshot, attention_spike).await?;

    Ok(Json(ScoreResponse {
        level: state.alerts.classify(risk.score),
        alert: None,
        risk,
    }))
}

/// Full cycle: record, score, alert.
pub async fn assess_snapshot(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let (snapshot, attention_spike) = request.into_snapshot()?;
    let risk = state.engine.assess(&snapshot, attention_spike).await?;
    state.metrics.observe_assessment(&risk);

    let alert = state.alerts.process(&risk).await;
    if alert.is_some() {
        state.metrics.observe_alert();
    }

    Ok(Json(ScoreResponse {
        level: state.alerts.classify(risk.score),
        alert,
        risk,
    }))
}

pub async fn get_history(State(state): State<AppState>) -> Json<HistoryView> {
    Json(state.engine.history().await)
}

pub async fn reset_history(State(state): State<AppState>) -> StatusCode {
    info!("History reset requested");
    state.engine.reset().await;
    StatusCode::NO_CONTENT
}

pub async fn get_signals(State(state): State<AppState>) -> Json<SignalReport> {
    Json(state.engine.signals().await)
}

pub async fn list_scenarios(State(state): State<AppState>) -> Json<Vec<ScenarioDescriptor>> {
    Json(state.engine.scorer().scenarios().describe())
}
