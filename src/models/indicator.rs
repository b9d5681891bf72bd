use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::risk::RiskError;

/// Summary statistics used to normalize one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl IndicatorStats {
    pub const fn new(min: f64, max: f64, mean: f64, std: f64) -> Self {
        Self { min, max, mean, std }
    }
}

/// How an indicator's normalized value maps onto risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskDirection {
    /// Higher raw value means higher risk.
    Direct,
    /// Higher raw value means lower risk; the complement is used.
    Inverse,
    /// Sentiment score in [-1, 1], remapped affinely instead of normalized.
    Sentiment,
}

/// The closed set of macroeconomic signals tracked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Indicator {
    #[serde(rename = "faiz_orani")]
    InterestRate,
    #[serde(rename = "doviz_kur_volatilite")]
    CurrencyVolatility,
    #[serde(rename = "enflasyon_farki")]
    InflationGap,
    #[serde(rename = "issizlik_orani")]
    UnemploymentRate,
    #[serde(rename = "otomotiv_talep_degisimi")]
    AutomotiveDemandChange,
    #[serde(rename = "global_ticaret_gerilimi_index")]
    GlobalTradeTension,
    #[serde(rename = "politik_belirsizlik_skoru")]
    PoliticalUncertainty,
    #[serde(rename = "guven_endeksi_degisimi")]
    ConfidenceIndexChange,
    #[serde(rename = "public_sentiment")]
    PublicSentiment,
}

impl Indicator {
    pub const ALL: [Indicator; 9] = [
        Indicator::InterestRate,
        Indicator::CurrencyVolatility,
        Indicator::InflationGap,
        Indicator::UnemploymentRate,
        Indicator::AutomotiveDemandChange,
        Indicator::GlobalTradeTension,
        Indicator::PoliticalUncertainty,
        Indicator::ConfidenceIndexChange,
        Indicator::PublicSentiment,
    ];

    /// Stable snapshot key for this indicator.
    pub fn key(&self) -> &'static str {
        match self {
            Indicator::InterestRate => "faiz_orani",
            Indicator::CurrencyVolatility => "doviz_kur_volatilite",
            Indicator::InflationGap => "enflasyon_farki",
            Indicator::UnemploymentRate => "issizlik_orani",
            Indicator::AutomotiveDemandChange => "otomotiv_talep_degisimi",
            Indicator::GlobalTradeTension => "global_ticaret_gerilimi_index",
            Indicator::PoliticalUncertainty => "politik_belirsizlik_skoru",
            Indicator::ConfidenceIndexChange => "guven_endeksi_degisimi",
            Indicator::PublicSentiment => "public_sentiment",
        }
    }

    /// Fixed reference statistics, used while no history exists.
    pub fn reference_stats(&self) -> IndicatorStats {
        match self {
            Indicator::InterestRate => IndicatorStats::new(0.0, 1.0, 0.5, 0.1),
            Indicator::CurrencyVolatility => IndicatorStats::new(0.0, 0.1, 0.03, 0.02),
            Indicator::InflationGap => IndicatorStats::new(0.0, 0.3, 0.1, 0.05),
            Indicator::UnemploymentRate => IndicatorStats::new(0.0, 0.2, 0.1, 0.03),
            Indicator::AutomotiveDemandChange => IndicatorStats::new(-0.2, 0.1, -0.05, 0.07),
            Indicator::GlobalTradeTension => IndicatorStats::new(0.0, 1.0, 0.5, 0.2),
            Indicator::PoliticalUncertainty => IndicatorStats::new(0.0, 1.0, 0.7, 0.15),
            Indicator::ConfidenceIndexChange => IndicatorStats::new(-0.05, 0.05, -0.01, 0.02),
            Indicator::PublicSentiment => IndicatorStats::new(-1.0, 1.0, 0.0, 0.5),
        }
    }

    /// Composite weight in the baseline weight table.
    pub fn weight(&self) -> f64 {
        match self {
            Indicator::InterestRate => 0.15,
            Indicator::CurrencyVolatility => 0.20,
            Indicator::InflationGap => 0.20,
            Indicator::UnemploymentRate => 0.10,
            Indicator::AutomotiveDemandChange => 0.08,
            Indicator::GlobalTradeTension => 0.05,
            Indicator::PoliticalUncertainty => 0.07,
            Indicator::ConfidenceIndexChange => 0.05,
            Indicator::PublicSentiment => 0.10,
        }
    }

    pub fn direction(&self) -> RiskDirection {
        match self {
            Indicator::AutomotiveDemandChange | Indicator::ConfidenceIndexChange => {
                RiskDirection::Inverse
            }
            Indicator::PublicSentiment => RiskDirection::Sentiment,
            _ => RiskDirection::Direct,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Indicator {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Indicator::ALL
            .iter()
            .copied()
            .find(|indicator| indicator.key() == s)
            .ok_or_else(|| RiskError::UnknownIndicator { name: s.to_string() })
    }
}
