pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod risk;
pub mod services;
pub mod utils;

use std::sync::Arc;

pub use error::types::*;

use crate::services::{AlertEngine, RiskEngine};
use crate::utils::EngineMetrics;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RiskEngine>,
    pub alerts: Arc<AlertEngine>,
    pub metrics: Arc<EngineMetrics>,
}

impl AppState {
    pub fn new(
        engine: Arc<RiskEngine>,
        alerts: Arc<AlertEngine>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            engine,
            alerts,
            metrics,
        }
    }
}
