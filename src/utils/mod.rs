pub mod logging;
pub mod math;
pub mod metrics;

pub use logging::init_tracing;
pub use metrics::EngineMetrics;
