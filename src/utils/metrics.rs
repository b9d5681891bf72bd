use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::AppError;
use crate::models::RiskScore;

/// Prometheus collectors for the scoring service.
#[derive(Clone)]
pub struct EngineMetrics {
    registry: Registry,
    risk_score: Gauge,
    assessments_total: IntCounter,
    scenario_triggers_total: IntCounterVec,
    alerts_total: IntCounter,
}

impl EngineMetrics {
    pub fn new() -> Result<Self, AppError> {
        let registry = Registry::new();

        let risk_score = Gauge::new("doom_watch_risk_score", "Most recent composite risk score")?;
        let assessments_total = IntCounter::new(
            "doom_watch_assessments_total",
            "Number of completed assessment cycles",
        )?;
        let scenario_triggers_total = IntCounterVec::new(
            Opts::new(
                "doom_watch_scenario_triggers_total",
                "Number of times each scenario rule triggered",
            ),
            &["scenario"],
        )?;
        let alerts_total = IntCounter::new("doom_watch_alerts_total", "Number of alerts raised")?;

        registry.register(Box::new(risk_score.clone()))?;
        registry.register(Box::new(assessments_total.clone()))?;
        registry.register(Box::new(scenario_triggers_total.clone()))?;
        registry.register(Box::new(alerts_total.clone()))?;

        Ok(Self {
            registry,
            risk_score,
            assessments_total,
            scenario_triggers_total,
            alerts_total,
        })
    }

    pub fn observe_assessment(&self, risk: &RiskScore) {
        self.risk_score.set(risk.score);
        self.assessments_total.inc();
        for scenario in &risk.triggered_scenarios {
            self.scenario_triggers_total
                .with_label_values(&[scenario.as_str()])
                .inc();
        }
    }

    pub fn observe_alert(&self) {
        self.alerts_total.inc();
    }

    /// Render all collectors in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String, AppError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| AppError::InternalError(format!("metrics are not valid UTF-8: {}", e)))
    }
}
