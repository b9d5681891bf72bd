use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::{Indicator, Snapshot};

/// Supplier of raw indicator snapshots (live APIs, feeds, simulation).
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, AppError>;
}

/// Values that, once drawn, are reused by every later fetch.
#[derive(Debug, Clone, Copy)]
struct StickyValues {
    interest_rate: f64,
    unemployment_rate: f64,
    currency_volatility: f64,
}

/// Randomized stand-in for live data acquisition.
pub struct SimulatedSource {
    rng: Mutex<StdRng>,
    sticky: Mutex<Option<StickyValues>>,
}

impl SimulatedSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng: Mutex::new(rng),
            sticky: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SnapshotSource for SimulatedSource {
    async fn fetch(&self) -> Result<Snapshot, AppError> {
        let mut rng = self.rng.lock().await;
        let mut sticky = self.sticky.lock().await;

        let cached = match *sticky {
            Some(values) => values,
            None => {
                let values = StickyValues {
                    interest_rate: rng.gen_range(0.40..0.60),
                    unemployment_rate: rng.gen_range(0.08..0.12),
                    currency_volatility: rng.gen_range(0.01..0.05),
                };
                *sticky = Some(values);
                values
            }
        };

        // Inflation gap is the spread between simulated CPI and PPI
        let cpi = rng.gen_range(0.40f64..0.70) * 100.0;
        let ppi = cpi * rng.gen_range(0.8f64..1.2);

        Ok(Snapshot::new()
            .with(Indicator::PublicSentiment, rng.gen_range(-1.0..=1.0))
            .with(Indicator::InterestRate, cached.interest_rate)
            .with(Indicator::InflationGap, ((cpi - ppi) / 100.0).abs())
            .with(Indicator::UnemploymentRate, cached.unemployment_rate)
            .with(Indicator::CurrencyVolatility, cached.currency_volatility)
            .with(Indicator::AutomotiveDemandChange, rng.gen_range(-0.15..0.05))
            .with(Indicator::GlobalTradeTension, rng.gen_range(0.5..1.0))
            .with(Indicator::PoliticalUncertainty, rng.gen_range(0.6..1.0))
            .with(Indicator::ConfidenceIndexChange, rng.gen_range(-0.03..0.02)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{HistoryStore, Normalizer, RiskScorer, ScalingMode};

    #[tokio::test]
    async fn test_simulated_snapshot_is_complete_and_in_range() {
        let source = SimulatedSource::new(Some(42));
        let snapshot = source.fetch().await.unwrap();

        assert!(RiskScorer::default().check_snapshot(&snapshot).is_ok());
        let rate = snapshot.value(Indicator::InterestRate).unwrap();
        assert!((0.40..0.60).contains(&rate));
        let gap = snapshot.value(Indicator::InflationGap).unwrap();
        assert!((0.0..=0.2).contains(&gap));
    }

    #[tokio::test]
    async fn test_cached_indicators_stick_across_fetches() {
        let source = SimulatedSource::new(Some(7));
        let first = source.fetch().await.unwrap();
        let second = source.fetch().await.unwrap();

        for indicator in [
            Indicator::InterestRate,
            Indicator::UnemploymentRate,
            Indicator::CurrencyVolatility,
        ] {
            assert_eq!(first.value(indicator), second.value(indicator));
        }
    }

    #[tokio::test]
    async fn test_sticky_indicators_score_at_zscore_midpoint() {
        let source = SimulatedSource::new(Some(11));
        let normalizer = Normalizer::new(ScalingMode::ZScore);
        let mut history = HistoryStore::new();

        for _ in 0..6 {
            let snapshot = source.fetch().await.unwrap();
            for indicator in Indicator::ALL {
                if let Some(value) = snapshot.value(indicator) {
                    history.record(indicator, value);
                }
            }
        }

        let latest = source.fetch().await.unwrap();
        for indicator in [
            Indicator::InterestRate,
            Indicator::UnemploymentRate,
            Indicator::CurrencyVolatility,
        ] {
            let value = latest.value(indicator).unwrap();
            assert_eq!(normalizer.normalize_indicator(indicator, value, &history), 0.5);
        }
    }

    #[tokio::test]
    async fn test_seeded_sources_agree() {
        let a = SimulatedSource::new(Some(2024)).fetch().await.unwrap();
        let b = SimulatedSource::new(Some(2024)).fetch().await.unwrap();
        assert_eq!(a, b);
    }
}
