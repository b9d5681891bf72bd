// Risk engine error types
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Unknown indicator: {name}")]
    UnknownIndicator { name: String },

    #[error("Missing required indicator: {name}")]
    MissingIndicator { name: String },

    #[error("Invalid value for indicator {name}: {value}")]
    InvalidValue { name: String, value: f64 },

    #[error("Malformed weight table: {message}")]
    InvalidWeights { message: String },

    #[error("Invalid scenario rule: {message}")]
    InvalidRule { message: String },
}

impl RiskError {
    /// Whether the error stems from the caller's snapshot rather than from
    /// engine configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RiskError::MissingIndicator { .. } | RiskError::InvalidValue { .. }
        )
    }
}
