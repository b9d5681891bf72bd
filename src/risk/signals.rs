// Auxiliary trend and anomaly signals derived from the rolling history
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Indicator, Snapshot};
use crate::risk::{resolve_statistics, HistoryStore};
use crate::utils::math::{mean, sample_std_dev};

/// Z-score magnitude above which a value is flagged.
pub const ANOMALY_Z_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MomentumFeatures {
    /// Mean change across indicators between the first and last snapshot.
    pub trend: f64,
    /// Dispersion of the later half of the window minus the earlier half.
    pub vol_acceleration: f64,
}

/// Latest change per indicator: last value minus the one before it.
pub fn momentum(history: &HistoryStore) -> BTreeMap<Indicator, f64> {
    Indicator::ALL
        .iter()
        .map(|indicator| {
            let values = history.values(*indicator);
            let change = match values.as_slice() {
                [.., previous, last] => last - previous,
                _ => 0.0,
            };
            (*indicator, change)
        })
        .collect()
}

/// Flag indicators whose value lies more than two standard deviations from
/// the resolved mean. Indicators missing from the snapshot are left out.
pub fn detect_anomalies(snapshot: &Snapshot, history: &HistoryStore) -> BTreeMap<Indicator, bool> {
    Indicator::ALL
        .iter()
        .filter_map(|indicator| {
            let value = snapshot.require(*indicator).ok()?;
            let stats = resolve_statistics(*indicator, history);
            let z = if stats.std == 0.0 {
                0.0
            } else {
                ((value - stats.mean) / stats.std).abs()
            };
            Some((*indicator, z > ANOMALY_Z_THRESHOLD))
        })
        .collect()
}

/// Trend and volatility acceleration over a chronological window of snapshots.
/// Missing indicator values count as zero.
pub fn momentum_features(window: &[Snapshot]) -> MomentumFeatures {
    if window.len() < 2 {
        return MomentumFeatures::default();
    }

    let rows: Vec<Vec<f64>> = window
        .iter()
        .map(|snapshot| {
            Indicator::ALL
                .iter()
                .map(|i| snapshot.value(*i).filter(|v| v.is_finite()).unwrap_or(0.0))
                .collect()
        })
        .collect();

    let (first, last) = (&rows[0], &rows[rows.len() - 1]);
    let deltas: Vec<f64> = last.iter().zip(first).map(|(l, f)| l - f).collect();
    let trend = mean(&deltas);

    let mid = rows.len() / 2;
    let flatten = |rows: &[Vec<f64>]| -> Vec<f64> { rows.iter().flatten().copied().collect() };
    let first_std = if mid > 1 {
        sample_std_dev(&flatten(&rows[..mid]))
    } else {
        0.0
    };
    let last_std = sample_std_dev(&flatten(&rows[mid..]));

    MomentumFeatures {
        trend,
        vol_acceleration: last_std - first_std,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentum_needs_two_points() {
        let mut history = HistoryStore::new();
        history.record(Indicator::InterestRate, 0.40);
        assert_eq!(momentum(&history)[&Indicator::InterestRate], 0.0);

        history.record(Indicator::InterestRate, 0.45);
        history.record(Indicator::InterestRate, 0.52);
        let change = momentum(&history)[&Indicator::InterestRate];
        assert!((change - 0.07).abs() < 1e-12);
        assert_eq!(momentum(&history)[&Indicator::InflationGap], 0.0);
    }

    #[test]
    fn test_detect_anomalies_against_reference_stats() {
        // faiz_orani: mean 0.5, std 0.1
        let snapshot = Snapshot::new()
            .with(Indicator::InterestRate, 0.75)
            .with(Indicator::UnemploymentRate, 0.11);

        let flags = detect_anomalies(&snapshot, &HistoryStore::new());
        assert_eq!(flags.get(&Indicator::InterestRate), Some(&true));
        assert_eq!(flags.get(&Indicator::UnemploymentRate), Some(&false));
        assert!(!flags.contains_key(&Indicator::PublicSentiment));
    }

    #[test]
    fn test_flat_history_is_never_anomalous() {
        let mut history = HistoryStore::new();
        history.record(Indicator::InterestRate, 0.5);
        history.record(Indicator::InterestRate, 0.5);

        let snapshot = Snapshot::new().with(Indicator::InterestRate, 0.99);
        assert!(!detect_anomalies(&snapshot, &history)[&Indicator::InterestRate]);
    }

    #[test]
    fn test_momentum_features_short_window() {
        assert_eq!(momentum_features(&[]), MomentumFeatures::default());
        assert_eq!(momentum_features(&[Snapshot::new()]), MomentumFeatures::default());
    }

    #[test]
    fn test_momentum_features_trend() {
        let start: Snapshot = Indicator::ALL.iter().map(|i| (*i, 0.0)).collect();
        let end: Snapshot = Indicator::ALL.iter().map(|i| (*i, 0.9)).collect();

        let features = momentum_features(&[start.clone(), start, end]);
        assert!((features.trend - 0.9).abs() < 1e-12);
        // earlier half has a single row, so only the later half contributes
        assert!(features.vol_acceleration > 0.0);
    }
}
