pub mod alert_engine;
pub mod data_source;
pub mod monitoring_service;
pub mod risk_engine;

pub use alert_engine::*;
pub use data_source::*;
pub use monitoring_service::*;
pub use risk_engine::*;
