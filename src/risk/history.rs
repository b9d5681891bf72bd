use std::collections::{HashMap, VecDeque};

use crate::models::{Indicator, IndicatorStats};
use crate::utils::math::{mean, population_std_dev};

/// Number of observations kept per indicator.
pub const HISTORY_CAPACITY: usize = 12;

/// Rolling window of the most recent raw values for every indicator.
///
/// Values are kept oldest first; once a window is full the oldest value is
/// evicted on every append.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    windows: HashMap<Indicator, VecDeque<f64>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, indicator: Indicator, value: f64) {
        let window = self
            .windows
            .entry(indicator)
            .or_insert_with(|| VecDeque::with_capacity(HISTORY_CAPACITY + 1));
        window.push_back(value);
        while window.len() > HISTORY_CAPACITY {
            window.pop_front();
        }
    }

    /// Statistics over the stored window, or `None` if nothing was recorded.
    /// Standard deviation is the population one (divides by N) and is exactly
    /// zero for a flat window.
    pub fn stats(&self, indicator: Indicator) -> Option<IndicatorStats> {
        let window = self.windows.get(&indicator).filter(|w| !w.is_empty())?;
        let values: Vec<f64> = window.iter().copied().collect();

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Rounding in the mean leaves a residue of ~1e-17 on identical values
        let std = if max == min {
            0.0
        } else {
            population_std_dev(&values)
        };

        Some(IndicatorStats {
            min,
            max,
            mean: mean(&values),
            std,
        })
    }

    pub fn values(&self, indicator: Indicator) -> Vec<f64> {
        self.windows
            .get(&indicator)
            .map(|w| w.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, indicator: Indicator) -> usize {
        self.windows.get(&indicator).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.windows.values().all(VecDeque::is_empty)
    }

    pub fn reset(&mut self) {
        self.windows.clear();
    }
}
