use proptest::prelude::*;
use doom_watch::{
    models::{Indicator, Snapshot},
    risk::{
        sentiment_contribution, HistoryStore, Normalizer, RiskScorer, ScalingMode, HISTORY_CAPACITY,
    },
    utils::math::population_std_dev,
};

// Property-based checks for the scoring invariants

fn scaling_mode() -> impl Strategy<Value = ScalingMode> {
    prop_oneof![Just(ScalingMode::MinMax), Just(ScalingMode::ZScore)]
}

fn indicator() -> impl Strategy<Value = Indicator> {
    prop::sample::select(Indicator::ALL.to_vec())
}

fn raw_value() -> impl Strategy<Value = f64> {
    -1_000.0..1_000.0f64
}

fn snapshot() -> impl Strategy<Value = Snapshot> {
    prop::collection::vec(-2.0..2.0f64, Indicator::ALL.len()).prop_map(|values| {
        Indicator::ALL.iter().copied().zip(values).collect()
    })
}

proptest! {
    #[test]
    fn test_normalized_values_are_unit_bounded(
        mode in scaling_mode(),
        target in indicator(),
        history_values in prop::collection::vec(raw_value(), 0..20),
        value in raw_value(),
    ) {
        let mut history = HistoryStore::new();
        for v in &history_values {
            history.record(target, *v);
        }

        let normalized = Normalizer::new(mode).normalize(target.key(), value, &history).unwrap();
        prop_assert!((0.0..=1.0).contains(&normalized));
    }

    #[test]
    fn test_score_is_unit_bounded(
        mode in scaling_mode(),
        past in prop::collection::vec(snapshot(), 0..15),
        current in snapshot(),
        attention_spike in any::<bool>(),
    ) {
        let scorer = RiskScorer::new(Normalizer::new(mode), Default::default());
        let mut history = HistoryStore::new();
        for snapshot in &past {
            for indicator in Indicator::ALL {
                if let Some(value) = snapshot.value(indicator) {
                    history.record(indicator, value);
                }
            }
        }

        let risk = scorer.score(&current, &history, attention_spike).unwrap();
        prop_assert!((0.0..=1.0).contains(&risk.score));
        prop_assert!(risk.triggered_scenarios.len() <= scorer.scenarios().rules().len());
    }

    #[test]
    fn test_history_window_never_exceeds_capacity(
        values in prop::collection::vec(raw_value(), 0..40),
    ) {
        let mut history = HistoryStore::new();
        for v in &values {
            history.record(Indicator::InflationGap, *v);
        }

        let kept = history.values(Indicator::InflationGap);
        prop_assert_eq!(kept.len(), values.len().min(HISTORY_CAPACITY));
        prop_assert_eq!(&kept[..], &values[values.len() - kept.len()..]);
    }

    #[test]
    fn test_sentiment_contribution_is_monotonic(a in -5.0..5.0f64, b in -5.0..5.0f64) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(sentiment_contribution(low) >= sentiment_contribution(high));
        prop_assert!((0.0..=1.0).contains(&sentiment_contribution(a)));
    }

    #[test]
    fn test_population_std_dev_is_non_negative(
        values in prop::collection::vec(raw_value(), 0..30),
    ) {
        prop_assert!(population_std_dev(&values) >= 0.0);
    }
}
