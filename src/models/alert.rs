use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub level: RiskLevel,
    pub score: f64,
    pub threshold: f64,
    pub triggered_scenarios: Vec<String>,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CreateAlert {
    pub level: RiskLevel,
    pub score: f64,
    pub threshold: f64,
    pub triggered_scenarios: Vec<String>,
}

impl Alert {
    pub fn new(create_alert: CreateAlert) -> Self {
        let title = match create_alert.level {
            RiskLevel::High => "High Economic Risk".to_string(),
            RiskLevel::Medium => "Elevated Economic Risk".to_string(),
            RiskLevel::Low => "Economic Risk Notice".to_string(),
        };

        let mut message = format!(
            "Risk score {:.2} exceeds the {} threshold of {:.2}",
            create_alert.score, create_alert.level, create_alert.threshold
        );
        if !create_alert.triggered_scenarios.is_empty() {
            message.push_str(&format!(
                " (scenarios: {})",
                create_alert.triggered_scenarios.join(", ")
            ));
        }

        Self {
            id: Uuid::new_v4(),
            level: create_alert.level,
            score: create_alert.score,
            threshold: create_alert.threshold,
            triggered_scenarios: create_alert.triggered_scenarios,
            title,
            message,
            created_at: Utc::now(),
        }
    }
}
