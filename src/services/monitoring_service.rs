use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{error, info};

use crate::error::AppError;
use crate::models::{Alert, RiskScore};
use crate::services::{AlertEngine, RiskEngine, SnapshotSource};
use crate::utils::EngineMetrics;

/// Periodically pulls a snapshot from a source and runs a full assessment.
pub struct MonitoringService {
    engine: Arc<RiskEngine>,
    alerts: Arc<AlertEngine>,
    metrics: Arc<EngineMetrics>,
    source: Arc<dyn SnapshotSource>,
    interval: Duration,
}

impl MonitoringService {
    pub fn new(
        engine: Arc<RiskEngine>,
        alerts: Arc<AlertEngine>,
        metrics: Arc<EngineMetrics>,
        source: Arc<dyn SnapshotSource>,
        interval: Duration,
    ) -> Self {
        Self {
            engine,
            alerts,
            metrics,
            source,
            interval,
        }
    }

    pub async fn start_monitoring(&self) -> Result<(), AppError> {
        info!("Starting risk monitoring service (every {:?})", self.interval);

        let mut interval = time::interval(self.interval);

        loop {
            interval.tick().await;

            if let Err(e) = self.run_cycle().await {
                error!("Error during monitoring cycle: {}", e);
            }
        }
    }

    /// Fetch, assess and alert once.
    pub async fn run_cycle(&self) -> Result<(RiskScore, Option<Alert>), AppError> {
        let snapshot = self.source.fetch().await?;
        let risk = self.engine.assess(&snapshot, false).await?;
        self.metrics.observe_assessment(&risk);

        let alert = self.alerts.process(&risk).await;
        if alert.is_some() {
            self.metrics.observe_alert();
        }

        Ok((risk, alert))
    }
}
