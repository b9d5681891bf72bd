use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AppError;
use crate::risk::{ScalingMode, DEFAULT_ATTENTION_BUMP};

const ENV_PREFIX: &str = "DOOM_WATCH";
const DEFAULT_CONFIG_FILE: &str = "config/doom_watch";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub scoring: ScoringSettings,
    pub alerts: AlertSettings,
    pub monitoring: MonitoringSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub scaler: ScalingMode,
    pub attention_bump: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub medium_threshold: f64,
    pub high_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringSettings {
    pub enabled: bool,
    pub interval_seconds: u64,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ScoringSettings {
    fn default() -> Self {
        ScoringSettings {
            scaler: ScalingMode::MinMax,
            attention_bump: DEFAULT_ATTENTION_BUMP,
        }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        AlertSettings {
            medium_threshold: 0.55,
            high_threshold: 0.75,
        }
    }
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        MonitoringSettings {
            enabled: false,
            interval_seconds: 60,
            seed: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Settings {
    /// Load settings from `config/doom_watch.*` (optional) and
    /// `DOOM_WATCH__SECTION__FIELD` environment variables.
    pub fn new() -> Result<Self, AppError> {
        Self::load(None)
    }

    /// Load settings, reading `path` instead of the default file if given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let alerts = &self.alerts;
        if !(alerts.medium_threshold > 0.0
            && alerts.medium_threshold < alerts.high_threshold
            && alerts.high_threshold <= 1.0)
        {
            return Err(AppError::ConfigError(format!(
                "alert thresholds must satisfy 0 < medium < high <= 1 (medium={}, high={})",
                alerts.medium_threshold, alerts.high_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.scoring.attention_bump) {
            return Err(AppError::ConfigError(format!(
                "attention_bump must be within [0, 1], got {}",
                self.scoring.attention_bump
            )));
        }

        if self.monitoring.interval_seconds == 0 {
            return Err(AppError::ConfigError(
                "monitoring.interval_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
