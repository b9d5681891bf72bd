use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Indicator;

/// Risk contribution of one indicator to the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorContribution {
    pub indicator: Indicator,
    pub raw_value: f64,
    /// Directional risk contribution in [0,1], before weighting.
    pub contribution: f64,
    pub weight: f64,
    pub weighted: f64,
}

/// Final composite score in [0,1] with the scenarios that moved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub score: f64,
    /// Triggered scenario names, in rule declaration order.
    pub triggered_scenarios: Vec<String>,
    pub base_score: f64,
    pub attention_adjustment: f64,
    pub scenario_adjustment: f64,
    pub contributions: Vec<IndicatorContribution>,
}

impl RiskScore {
    pub fn value(&self) -> f64 {
        self.score
    }

    /// The `(score, triggered_names)` pair downstream consumers work with.
    pub fn into_parts(self) -> (f64, Vec<String>) {
        (self.score, self.triggered_scenarios)
    }
}

/// A scored assessment kept in the engine's recent-activity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub triggered_scenarios: Vec<String>,
}

impl From<&RiskScore> for ScoreRecord {
    fn from(risk: &RiskScore) -> Self {
        Self {
            timestamp: Utc::now(),
            score: risk.score,
            triggered_scenarios: risk.triggered_scenarios.clone(),
        }
    }
}
