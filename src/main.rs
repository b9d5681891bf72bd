use doom_watch::{
    config::Settings,
    handlers::create_router,
    services::{AlertEngine, LogAlertSink, MonitoringService, RiskEngine, SimulatedSource},
    utils::{init_tracing, EngineMetrics},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    init_tracing(&settings.logging);

    info!("Starting Doom Watch risk indicator");
    info!(
        "Scoring with {} scaling, alert threshold {:.2}",
        settings.scoring.scaler, settings.alerts.high_threshold
    );

    let engine = Arc::new(RiskEngine::from_settings(&settings.scoring));
    let alerts =
        Arc::new(AlertEngine::new(settings.alerts.clone()).with_sink(Arc::new(LogAlertSink)));
    let metrics = Arc::new(EngineMetrics::new()?);
    let state = AppState::new(engine.clone(), alerts.clone(), metrics.clone());

    let monitoring_handle = if settings.monitoring.enabled {
        let service = MonitoringService::new(
            engine,
            alerts,
            metrics,
            Arc::new(SimulatedSource::new(settings.monitoring.seed)),
            Duration::from_secs(settings.monitoring.interval_seconds),
        );
        tokio::spawn(async move {
            if let Err(e) = service.start_monitoring().await {
                error!("Monitoring service failed: {}", e);
            }
        })
    } else {
        tokio::spawn(async {
            info!("Background monitoring disabled");
            std::future::pending::<()>().await
        })
    };

    let addr = format!("{}:{}", settings.api.host, settings.api.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server running on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, create_router(state)).await {
            error!("Web server error: {}", e);
        }
    });

    tokio::select! {
        _ = monitoring_handle => {
            error!("Monitoring service stopped unexpectedly");
        }
        _ = server_handle => {
            error!("Web server stopped unexpectedly");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down Doom Watch");
    Ok(())
}
