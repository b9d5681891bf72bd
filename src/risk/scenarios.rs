use serde::Serialize;
use tracing::debug;

use crate::models::{Indicator, Snapshot};
use crate::risk::RiskError;

/// Predicate over raw (unnormalized) snapshot values.
pub type ScenarioPredicate = fn(&Snapshot) -> Result<bool, RiskError>;

/// A named condition that adds a fixed amount of risk when it holds.
#[derive(Debug, Clone)]
pub struct ScenarioRule {
    name: String,
    impact: f64,
    predicate: ScenarioPredicate,
}

impl ScenarioRule {
    pub fn new(
        name: impl Into<String>,
        impact: f64,
        predicate: ScenarioPredicate,
    ) -> Result<Self, RiskError> {
        let name = name.into();
        if !impact.is_finite() || impact < 0.0 {
            return Err(RiskError::InvalidRule {
                message: format!(
                    "impact of '{}' must be a non-negative number, got {}",
                    name, impact
                ),
            });
        }
        Ok(Self { name, impact, predicate })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn impact(&self) -> f64 {
        self.impact
    }

    pub fn check(&self, snapshot: &Snapshot) -> Result<bool, RiskError> {
        (self.predicate)(snapshot)
    }
}

/// Combined effect of all rules on one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub adjustment: f64,
    pub triggered: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioDescriptor {
    pub name: String,
    pub impact: f64,
}

/// Ordered rule collection; every rule is checked independently.
#[derive(Debug, Clone)]
pub struct ScenarioRuleSet {
    rules: Vec<ScenarioRule>,
}

impl ScenarioRuleSet {
    pub fn new(rules: Vec<ScenarioRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Domain heuristics shipped with the engine.
    pub fn baseline() -> Self {
        let rule = |name: &str, impact: f64, predicate: ScenarioPredicate| ScenarioRule {
            name: name.to_string(),
            impact,
            predicate,
        };

        Self::new(vec![
            rule("high_interest_low_confidence", 0.05, high_interest_low_confidence),
            rule("political_uncertainty", 0.03, political_uncertainty),
            rule("inflation_unemployment_pressure", 0.07, inflation_unemployment_pressure),
            rule("currency_volatility", 0.05, currency_volatility),
            rule(
                "negative_sentiment_political_uncertainty",
                0.04,
                negative_sentiment_political_uncertainty,
            ),
        ])
    }

    pub fn push(&mut self, rule: ScenarioRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[ScenarioRule] {
        &self.rules
    }

    pub fn describe(&self) -> Vec<ScenarioDescriptor> {
        self.rules
            .iter()
            .map(|rule| ScenarioDescriptor {
                name: rule.name.clone(),
                impact: rule.impact,
            })
            .collect()
    }

    /// Evaluate every rule in declaration order. A rule whose predicate
    /// fails counts as not triggered.
    pub fn evaluate(&self, snapshot: &Snapshot) -> ScenarioOutcome {
        let mut outcome = ScenarioOutcome::default();

        for rule in &self.rules {
            match rule.check(snapshot) {
                Ok(true) => {
                    outcome.adjustment += rule.impact;
                    outcome.triggered.push(rule.name.clone());
                }
                Ok(false) => {}
                Err(e) => {
                    debug!("Scenario '{}' could not be evaluated, skipping: {}", rule.name, e);
                }
            }
        }

        outcome
    }
}

impl Default for ScenarioRuleSet {
    fn default() -> Self {
        Self::baseline()
    }
}

fn high_interest_low_confidence(s: &Snapshot) -> Result<bool, RiskError> {
    Ok(s.require(Indicator::InterestRate)? > 0.5
        && s.require(Indicator::ConfidenceIndexChange)? < -0.01)
}

fn political_uncertainty(s: &Snapshot) -> Result<bool, RiskError> {
    Ok(s.require(Indicator::PoliticalUncertainty)? > 0.8)
}

fn inflation_unemployment_pressure(s: &Snapshot) -> Result<bool, RiskError> {
    Ok(s.require(Indicator::InflationGap)? > 0.15 && s.require(Indicator::UnemploymentRate)? > 0.11)
}

fn currency_volatility(s: &Snapshot) -> Result<bool, RiskError> {
    Ok(s.require(Indicator::CurrencyVolatility)? > 0.04)
}

fn negative_sentiment_political_uncertainty(s: &Snapshot) -> Result<bool, RiskError> {
    Ok(s.require(Indicator::PublicSentiment)? < -0.3
        && s.require(Indicator::PoliticalUncertainty)? > 0.8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_triggering_snapshot() -> Snapshot {
        Snapshot::new()
            .with(Indicator::InterestRate, 0.60)
            .with(Indicator::ConfidenceIndexChange, -0.03)
            .with(Indicator::PoliticalUncertainty, 0.90)
            .with(Indicator::InflationGap, 0.20)
            .with(Indicator::UnemploymentRate, 0.12)
            .with(Indicator::CurrencyVolatility, 0.05)
            .with(Indicator::PublicSentiment, -0.6)
    }

    #[test]
    fn test_all_baseline_rules_trigger_in_order() {
        let outcome = ScenarioRuleSet::baseline().evaluate(&all_triggering_snapshot());

        assert_eq!(
            outcome.triggered,
            vec![
                "high_interest_low_confidence",
                "political_uncertainty",
                "inflation_unemployment_pressure",
                "currency_volatility",
                "negative_sentiment_political_uncertainty",
            ]
        );
        assert!((outcome.adjustment - 0.24).abs() < 1e-12);
    }

    #[test]
    fn test_calm_snapshot_triggers_nothing() {
        let snapshot = Snapshot::new()
            .with(Indicator::InterestRate, 0.40)
            .with(Indicator::ConfidenceIndexChange, 0.01)
            .with(Indicator::PoliticalUncertainty, 0.50)
            .with(Indicator::InflationGap, 0.05)
            .with(Indicator::UnemploymentRate, 0.08)
            .with(Indicator::CurrencyVolatility, 0.01)
            .with(Indicator::PublicSentiment, 0.2);

        let outcome = ScenarioRuleSet::baseline().evaluate(&snapshot);
        assert_eq!(outcome, ScenarioOutcome::default());
    }

    #[test]
    fn test_missing_key_is_not_triggered_and_evaluation_continues() {
        // No interest rate: the first rule errors, the others still run.
        let snapshot = Snapshot::new()
            .with(Indicator::PoliticalUncertainty, 0.9)
            .with(Indicator::CurrencyVolatility, 0.08);

        let outcome = ScenarioRuleSet::baseline().evaluate(&snapshot);
        assert_eq!(outcome.triggered, vec!["political_uncertainty", "currency_volatility"]);
        assert!((outcome.adjustment - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_value_is_not_triggered() {
        let snapshot = Snapshot::new().with(Indicator::PoliticalUncertainty, f64::NAN);
        let outcome = ScenarioRuleSet::baseline().evaluate(&snapshot);
        assert!(outcome.triggered.is_empty());
    }

    #[test]
    fn test_custom_rule_rejects_negative_impact() {
        fn always(_: &Snapshot) -> Result<bool, RiskError> {
            Ok(true)
        }

        assert!(matches!(
            ScenarioRule::new("relief", -0.1, always),
            Err(RiskError::InvalidRule { .. })
        ));

        let mut rules = ScenarioRuleSet::empty();
        rules.push(ScenarioRule::new("always", 0.5, always).unwrap());
        rules.push(ScenarioRule::new("again", 0.7, always).unwrap());
        let outcome = rules.evaluate(&Snapshot::new());
        assert!((outcome.adjustment - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_describe_lists_rules() {
        let described = ScenarioRuleSet::baseline().describe();
        assert_eq!(described.len(), 5);
        assert_eq!(described[2].name, "inflation_unemployment_pressure");
        assert_eq!(described[2].impact, 0.07);
    }
}
