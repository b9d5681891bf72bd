use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::ScoringSettings;
use crate::models::{Indicator, RiskScore, ScoreRecord, Snapshot};
use crate::risk::{
    detect_anomalies, momentum, momentum_features, HistoryStore, MomentumFeatures, Normalizer,
    RiskError, RiskScorer, ScenarioRuleSet, HISTORY_CAPACITY,
};

/// Number of assessed scores kept for display.
pub const RECENT_SCORES_CAPACITY: usize = 7;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordSummary {
    pub recorded: Vec<Indicator>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub indicators: BTreeMap<Indicator, Vec<f64>>,
    pub recent_scores: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignalReport {
    pub momentum: BTreeMap<Indicator, f64>,
    /// Anomaly flags for the most recently recorded snapshot.
    pub anomalies: BTreeMap<Indicator, bool>,
    pub features: MomentumFeatures,
}

#[derive(Debug, Default)]
struct EngineState {
    history: HistoryStore,
    recent_snapshots: VecDeque<Snapshot>,
    recent_scores: VecDeque<ScoreRecord>,
}

impl EngineState {
    fn record(&mut self, snapshot: &Snapshot) -> RecordSummary {
        let mut summary = RecordSummary::default();

        for (key, value) in snapshot.iter() {
            match key.parse::<Indicator>() {
                Ok(indicator) if value.is_finite() => {
                    self.history.record(indicator, value);
                    summary.recorded.push(indicator);
                }
                Ok(indicator) => {
                    warn!("Skipping non-finite value {} for {}", value, indicator);
                    summary.skipped.push(key.to_string());
                }
                Err(_) => {
                    debug!("Ignoring untracked snapshot key {}", key);
                    summary.skipped.push(key.to_string());
                }
            }
        }

        self.recent_snapshots.push_back(snapshot.clone());
        while self.recent_snapshots.len() > HISTORY_CAPACITY {
            self.recent_snapshots.pop_front();
        }

        summary
    }

    fn remember_score(&mut self, risk: &RiskScore) {
        self.recent_scores.push_back(ScoreRecord::from(risk));
        while self.recent_scores.len() > RECENT_SCORES_CAPACITY {
            self.recent_scores.pop_front();
        }
    }
}

/// Process-wide scoring service: owns the rolling history and serializes
/// access to it across concurrent callers.
pub struct RiskEngine {
    scorer: RiskScorer,
    state: RwLock<EngineState>,
}

impl RiskEngine {
    pub fn new(scorer: RiskScorer) -> Self {
        Self {
            scorer,
            state: RwLock::new(EngineState::default()),
        }
    }

    pub fn from_settings(settings: &ScoringSettings) -> Self {
        let scorer = RiskScorer::new(Normalizer::new(settings.scaler), ScenarioRuleSet::baseline())
            .with_attention_bump(settings.attention_bump);
        Self::new(scorer)
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Append every tracked, finite value in `snapshot` to the history.
    pub async fn record_observation(&self, snapshot: &Snapshot) -> RecordSummary {
        let mut state = self.state.write().await;
        let summary = state.record(snapshot);
        debug!(
            "Recorded {} indicators, skipped {}",
            summary.recorded.len(),
            summary.skipped.len()
        );
        summary
    }

    /// Score against the current history without modifying it.
    pub async fn score(
        &self,
        snapshot: &Snapshot,
        attention_spike: bool,
    ) -> Result<RiskScore, RiskError> {
        let state = self.state.read().await;
        self.scorer.score(snapshot, &state.history, attention_spike)
    }

    /// One full observation cycle: validate, record, score.
    ///
    /// The snapshot is checked before anything is recorded, so a rejected
    /// snapshot leaves the history untouched.
    pub async fn assess(
        &self,
        snapshot: &Snapshot,
        attention_spike: bool,
    ) -> Result<RiskScore, RiskError> {
        self.scorer.check_snapshot(snapshot)?;

        let mut state = self.state.write().await;
        state.record(snapshot);
        let risk = self.scorer.score(snapshot, &state.history, attention_spike)?;
        state.remember_score(&risk);

        info!(
            "Assessed risk score {:.3} (triggered: [{}])",
            risk.score,
            risk.triggered_scenarios.join(", ")
        );
        Ok(risk)
    }

    pub async fn history(&self) -> HistoryView {
        let state = self.state.read().await;
        HistoryView {
            indicators: Indicator::ALL
                .iter()
                .map(|i| (*i, state.history.values(*i)))
                .filter(|(_, values)| !values.is_empty())
                .collect(),
            recent_scores: state.recent_scores.iter().cloned().collect(),
        }
    }

    pub async fn signals(&self) -> SignalReport {
        let state = self.state.read().await;
        let window: Vec<Snapshot> = state.recent_snapshots.iter().cloned().collect();
        let anomalies = window
            .last()
            .map(|latest| detect_anomalies(latest, &state.history))
            .unwrap_or_default();

        SignalReport {
            momentum: momentum(&state.history),
            anomalies,
            features: momentum_features(&window),
        }
    }

    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        *state = EngineState::default();
        info!("Risk engine history reset");
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(RiskScorer::default())
    }
}
