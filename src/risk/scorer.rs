use std::collections::HashSet;
use tracing::debug;

use crate::models::{Indicator, IndicatorContribution, RiskDirection, RiskScore, Snapshot};
use crate::risk::{HistoryStore, Normalizer, RiskError, ScenarioRuleSet};
use crate::utils::math::clamp_unit;

/// Added to the base score when an external attention spike is reported.
pub const DEFAULT_ATTENTION_BUMP: f64 = 0.05;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Composite weights per indicator. Always sums to 1.0.
#[derive(Debug, Clone)]
pub struct WeightTable {
    entries: Vec<(Indicator, f64)>,
}

impl WeightTable {
    pub fn new(entries: Vec<(Indicator, f64)>) -> Result<Self, RiskError> {
        let mut seen = HashSet::new();
        for (indicator, weight) in &entries {
            if !seen.insert(*indicator) {
                return Err(RiskError::InvalidWeights {
                    message: format!("duplicate weight for {}", indicator),
                });
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(RiskError::InvalidWeights {
                    message: format!(
                        "weight for {} must be non-negative, got {}",
                        indicator, weight
                    ),
                });
            }
        }

        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RiskError::InvalidWeights {
                message: format!("weights must sum to 1.0, got {}", total),
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(Indicator, f64)] {
        &self.entries
    }

    pub fn weight(&self, indicator: Indicator) -> Option<f64> {
        self.entries
            .iter()
            .find(|(i, _)| *i == indicator)
            .map(|(_, w)| *w)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            entries: Indicator::ALL.iter().map(|i| (*i, i.weight())).collect(),
        }
    }
}

/// Risk contribution of a sentiment score: -1 maps to 1, +1 maps to 0.
pub fn sentiment_contribution(sentiment: f64) -> f64 {
    let sentiment = sentiment.clamp(-1.0, 1.0);
    1.0 - ((sentiment + 1.0) / 2.0)
}

/// Single-pass composite scorer. Reads history, never writes it.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    weights: WeightTable,
    normalizer: Normalizer,
    scenarios: ScenarioRuleSet,
    attention_bump: f64,
}

impl RiskScorer {
    pub fn new(normalizer: Normalizer, scenarios: ScenarioRuleSet) -> Self {
        Self {
            weights: WeightTable::default(),
            normalizer,
            scenarios,
            attention_bump: DEFAULT_ATTENTION_BUMP,
        }
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_attention_bump(mut self, attention_bump: f64) -> Self {
        self.attention_bump = attention_bump;
        self
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn scenarios(&self) -> &ScenarioRuleSet {
        &self.scenarios
    }

    /// Ensure every weighted indicator is present with a finite value.
    pub fn check_snapshot(&self, snapshot: &Snapshot) -> Result<(), RiskError> {
        for (indicator, _) in self.weights.entries() {
            snapshot.require(*indicator)?;
        }
        Ok(())
    }

    /// Directional risk contribution of one raw value, in [0,1].
    pub fn contribution(&self, indicator: Indicator, raw: f64, history: &HistoryStore) -> f64 {
        match indicator.direction() {
            RiskDirection::Direct => self.normalizer.normalize_indicator(indicator, raw, history),
            RiskDirection::Inverse => {
                1.0 - self.normalizer.normalize_indicator(indicator, raw, history)
            }
            RiskDirection::Sentiment => sentiment_contribution(raw),
        }
    }

    pub fn score(
        &self,
        snapshot: &Snapshot,
        history: &HistoryStore,
        attention_spike: bool,
    ) -> Result<RiskScore, RiskError> {
        let mut contributions = Vec::with_capacity(self.weights.entries().len());
        for (indicator, weight) in self.weights.entries() {
            let raw = snapshot.require(*indicator)?;
            let contribution = self.contribution(*indicator, raw, history);
            contributions.push(IndicatorContribution {
                indicator: *indicator,
                raw_value: raw,
                contribution,
                weight: *weight,
                weighted: contribution * weight,
            });
        }

        let base_score: f64 = contributions.iter().map(|c| c.weighted).sum();
        let attention_adjustment = if attention_spike { self.attention_bump } else { 0.0 };
        let outcome = self.scenarios.evaluate(snapshot);

        let score = clamp_unit(base_score + attention_adjustment + outcome.adjustment);

        debug!(
            "Risk score {:.4} (base {:.4}, attention {:.2}, scenarios {:.2}: [{}])",
            score,
            base_score,
            attention_adjustment,
            outcome.adjustment,
            outcome.triggered.join(", ")
        );

        Ok(RiskScore {
            score,
            triggered_scenarios: outcome.triggered,
            base_score,
            attention_adjustment,
            scenario_adjustment: outcome.adjustment,
            contributions,
        })
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(Normalizer::default(), ScenarioRuleSet::baseline())
    }
}
