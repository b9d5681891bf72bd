use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Indicator;
use crate::risk::RiskError;

/// One observation cycle: raw indicator values keyed by indicator name.
///
/// Keys that do not name a known indicator are kept but ignored by scoring
/// and by the history store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<String, f64>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, indicator: Indicator, value: f64) -> Self {
        self.set(indicator, value);
        self
    }

    pub fn set(&mut self, indicator: Indicator, value: f64) {
        self.values.insert(indicator.key().to_string(), value);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        self.get(indicator.key())
    }

    /// Finite value for `indicator`, or the reason it is unusable.
    pub fn require(&self, indicator: Indicator) -> Result<f64, RiskError> {
        match self.value(indicator) {
            None => Err(RiskError::MissingIndicator {
                name: indicator.key().to_string(),
            }),
            Some(value) if !value.is_finite() => Err(RiskError::InvalidValue {
                name: indicator.key().to_string(),
                value,
            }),
            Some(value) => Ok(value),
        }
    }

    /// Average a user-supplied sentiment reading into `public_sentiment`.
    /// An absent reading counts as neutral.
    pub fn blend_sentiment(&mut self, user_sentiment: f64) {
        let current = self.value(Indicator::PublicSentiment).unwrap_or(0.0);
        self.set(Indicator::PublicSentiment, (current + user_sentiment) / 2.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Indicator, f64)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (Indicator, f64)>>(iter: T) -> Self {
        let mut snapshot = Snapshot::new();
        for (indicator, value) in iter {
            snapshot.set(indicator, value);
        }
        snapshot
    }
}
