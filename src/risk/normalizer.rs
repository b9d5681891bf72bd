use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{Indicator, IndicatorStats};
use crate::risk::{HistoryStore, RiskError};
use crate::utils::math::{clamp_unit, logistic};

/// Result of min-max scaling when the reference range is empty (`max == min`).
pub const DEGENERATE_RANGE_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMode {
    #[default]
    MinMax,
    ZScore,
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingMode::MinMax => f.write_str("minmax"),
            ScalingMode::ZScore => f.write_str("zscore"),
        }
    }
}

impl FromStr for ScalingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minmax" => Ok(ScalingMode::MinMax),
            "zscore" => Ok(ScalingMode::ZScore),
            other => Err(format!("unknown scaling mode: {}", other)),
        }
    }
}

/// Statistics to normalize `indicator` against: the rolling history when
/// any exists, the fixed reference otherwise.
pub fn resolve_statistics(indicator: Indicator, history: &HistoryStore) -> IndicatorStats {
    history
        .stats(indicator)
        .unwrap_or_else(|| indicator.reference_stats())
}

/// Maps raw indicator values into [0,1].
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    mode: ScalingMode,
}

impl Normalizer {
    pub fn new(mode: ScalingMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ScalingMode {
        self.mode
    }

    /// Normalize a value for the indicator named `name`.
    ///
    /// Fails only when `name` is not a known indicator.
    pub fn normalize(
        &self,
        name: &str,
        value: f64,
        history: &HistoryStore,
    ) -> Result<f64, RiskError> {
        let indicator: Indicator = name.parse()?;
        Ok(self.normalize_indicator(indicator, value, history))
    }

    pub fn normalize_indicator(
        &self,
        indicator: Indicator,
        value: f64,
        history: &HistoryStore,
    ) -> f64 {
        let stats = resolve_statistics(indicator, history);
        self.scale(value, &stats)
    }

    /// Scale against explicit statistics. Always within [0,1].
    pub fn scale(&self, value: f64, stats: &IndicatorStats) -> f64 {
        match self.mode {
            ScalingMode::ZScore => {
                let z = if stats.std == 0.0 {
                    0.0
                } else {
                    (value - stats.mean) / stats.std
                };
                clamp_unit(logistic(z))
            }
            ScalingMode::MinMax => {
                let range = stats.max - stats.min;
                if range == 0.0 {
                    return DEGENERATE_RANGE_SCORE;
                }
                clamp_unit((value - stats.min) / range)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minmax_against_reference_stats() {
        let normalizer = Normalizer::default();
        let history = HistoryStore::new();

        let value = normalizer.normalize("faiz_orani", 0.55, &history).unwrap();
        assert!((value - 0.55).abs() < 1e-12);

        let value = normalizer
            .normalize("otomotiv_talep_degisimi", 0.0, &history)
            .unwrap();
        assert!((value - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_minmax_clamps_out_of_range_values() {
        let normalizer = Normalizer::new(ScalingMode::MinMax);
        let history = HistoryStore::new();

        assert_eq!(normalizer.normalize("doviz_kur_volatilite", 0.9, &history).unwrap(), 1.0);
        assert_eq!(normalizer.normalize("doviz_kur_volatilite", -0.5, &history).unwrap(), 0.0);
    }

    // Equal min and max used to divide by zero; it now scores the midpoint.
    #[test]
    fn test_minmax_degenerate_range_returns_midpoint() {
        let normalizer = Normalizer::new(ScalingMode::MinMax);
        let stats = IndicatorStats::new(0.3, 0.3, 0.3, 0.0);
        assert_eq!(normalizer.scale(0.3, &stats), DEGENERATE_RANGE_SCORE);
        assert_eq!(normalizer.scale(5.0, &stats), 0.5);

        let mut history = HistoryStore::new();
        history.record(Indicator::InterestRate, 0.42);
        assert_eq!(
            normalizer.normalize("faiz_orani", 0.9, &history).unwrap(),
            0.5
        );
    }

    #[test]
    fn test_zscore_zero_std_is_exactly_half() {
        let normalizer = Normalizer::new(ScalingMode::ZScore);
        let stats = IndicatorStats::new(0.0, 1.0, 0.5, 0.0);
        assert_eq!(normalizer.scale(0.9, &stats), 0.5);
    }

    #[test]
    fn test_zscore_flat_history_is_exactly_half() {
        let normalizer = Normalizer::new(ScalingMode::ZScore);
        for count in [3, 6] {
            let mut history = HistoryStore::new();
            for _ in 0..count {
                history.record(Indicator::InterestRate, 0.1);
            }
            assert_eq!(normalizer.normalize("faiz_orani", 0.55, &history).unwrap(), 0.5);
            assert_eq!(normalizer.normalize("faiz_orani", 0.1, &history).unwrap(), 0.5);
        }
    }

    #[test]
    fn test_zscore_is_logistic_of_z() {
        let normalizer = Normalizer::new(ScalingMode::ZScore);
        let history = HistoryStore::new();

        // faiz_orani: mean 0.5, std 0.1 -> z = 1
        let value = normalizer.normalize("faiz_orani", 0.6, &history).unwrap();
        assert!((value - 1.0 / (1.0 + (-1.0f64).exp())).abs() < 1e-12);

        let at_mean = normalizer.normalize("faiz_orani", 0.5, &history).unwrap();
        assert_eq!(at_mean, 0.5);
    }

    #[test]
    fn test_history_overrides_reference_stats() {
        let normalizer = Normalizer::new(ScalingMode::MinMax);
        let mut history = HistoryStore::new();
        for value in [0.10, 0.20, 0.30] {
            history.record(Indicator::InflationGap, value);
        }

        let stats = resolve_statistics(Indicator::InflationGap, &history);
        assert_eq!(stats.min, 0.10);
        assert_eq!(stats.max, 0.30);

        let value = normalizer.normalize("enflasyon_farki", 0.25, &history).unwrap();
        assert!((value - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_indicator_is_an_error() {
        let normalizer = Normalizer::default();
        let err = normalizer
            .normalize("dolar_endeksi", 0.1, &HistoryStore::new())
            .unwrap_err();
        assert_eq!(
            err,
            RiskError::UnknownIndicator {
                name: "dolar_endeksi".to_string()
            }
        );
    }

    #[test]
    fn test_nan_input_maps_to_midpoint() {
        let history = HistoryStore::new();
        for mode in [ScalingMode::MinMax, ScalingMode::ZScore] {
            let value = Normalizer::new(mode)
                .normalize("faiz_orani", f64::NAN, &history)
                .unwrap();
            assert_eq!(value, 0.5);
        }
    }

    #[test]
    fn test_scaling_mode_parsing() {
        assert_eq!("ZScore".parse::<ScalingMode>().unwrap(), ScalingMode::ZScore);
        assert_eq!("minmax".parse::<ScalingMode>().unwrap(), ScalingMode::MinMax);
        assert!("robust".parse::<ScalingMode>().is_err());
    }
}
