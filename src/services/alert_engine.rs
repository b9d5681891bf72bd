use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::AlertSettings;
use crate::error::AppError;
use crate::models::{Alert, CreateAlert, RiskLevel, RiskScore};

/// Destination for raised alerts (chat bot, webhook, pager, ...).
#[async_trait]
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, alert: &Alert) -> Result<(), AppError>;
}

/// Writes alerts to the log. Always registered by the server.
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), AppError> {
        warn!("ALERT [{}] {}: {}", alert.level, alert.title, alert.message);
        Ok(())
    }
}

/// Classifies scores into risk levels and raises alerts for high risk.
pub struct AlertEngine {
    settings: AlertSettings,
    sinks: Vec<Arc<dyn AlertSink>>,
}

impl AlertEngine {
    pub fn new(settings: AlertSettings) -> Self {
        Self {
            settings,
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn classify(&self, score: f64) -> RiskLevel {
        if score > self.settings.high_threshold {
            RiskLevel::High
        } else if score > self.settings.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Build an alert if the score is in the high band.
    pub fn evaluate(&self, risk: &RiskScore) -> Option<Alert> {
        match self.classify(risk.score) {
            RiskLevel::High => Some(Alert::new(CreateAlert {
                level: RiskLevel::High,
                score: risk.score,
                threshold: self.settings.high_threshold,
                triggered_scenarios: risk.triggered_scenarios.clone(),
            })),
            _ => None,
        }
    }

    /// Evaluate and dispatch to every sink. Delivery failures are logged,
    /// never returned.
    pub async fn process(&self, risk: &RiskScore) -> Option<Alert> {
        match self.classify(risk.score) {
            RiskLevel::Low => info!("Risk level low ({:.2})", risk.score),
            RiskLevel::Medium => {
                warn!("Risk level medium ({:.2}), monitor developments", risk.score)
            }
            RiskLevel::High => warn!("Risk level high ({:.2})", risk.score),
        }

        let alert = self.evaluate(risk)?;
        for sink in &self.sinks {
            if let Err(e) = sink.deliver(&alert).await {
                error!("Failed to deliver alert {} via {}: {}", alert.id, sink.name(), e);
            }
        }

        Some(alert)
    }
}
