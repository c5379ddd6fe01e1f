//! Median split of numeric features into categorical tokens.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::record::{validate_features, Record};
use crate::stats::median;

/// Side of the median a value falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Value at or above the median.
    High,
    /// Value below the median.
    Low,
}

impl Level {
    /// Classify `value` against `threshold` (ties count as high).
    pub fn of(value: f64, threshold: f64) -> Self {
        if value >= threshold {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::High => f.write_str("high"),
            Level::Low => f.write_str("low"),
        }
    }
}

/// Render the token for a feature at a level, e.g. `generosity:high`.
pub fn token(feature: &str, level: Level) -> String {
    format!("{feature}:{level}")
}

/// A set of tokens. Repeated tokens collapse; order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Transaction {
    items: BTreeSet<String>,
}

impl Transaction {
    /// Empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token. Returns `false` if it was already present.
    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        self.items.insert(item.into())
    }

    /// Whether the transaction contains `item`.
    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    /// Tokens in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the transaction has no tokens.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Transaction {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Output of [`discretize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discretized {
    /// One transaction per input record, in input order.
    pub transactions: Vec<Transaction>,
    /// Median used to split each feature.
    pub medians: BTreeMap<String, f64>,
}

/// Median of each feature over the records that have a value for it.
///
/// A feature with no valid values gets median `0.0`.
pub fn feature_medians(records: &[Record], features: &[&str]) -> BTreeMap<String, f64> {
    features
        .iter()
        .map(|&f| {
            let values: Vec<f64> = records.iter().filter_map(|r| r.value(f)).collect();
            (f.to_string(), median(&values))
        })
        .collect()
}

/// Turn records into `feature:high|low` transactions.
///
/// A record contributes a token for each feature it has a value for; missing
/// features are skipped rather than treated as an error.
pub fn discretize(records: &[Record], features: &[&str]) -> Result<Discretized> {
    validate_features(features)?;

    let medians = feature_medians(records, features);
    let transactions = records
        .iter()
        .map(|record| {
            features
                .iter()
                .filter_map(|&f| {
                    let value = record.value(f)?;
                    Some(token(f, Level::of(value, medians[f])))
                })
                .collect::<Transaction>()
        })
        .collect::<Vec<_>>();

    debug!(
        records = records.len(),
        features = features.len(),
        "discretized records into transactions"
    );

    Ok(Discretized {
        transactions,
        medians,
    })
}
