//! Frequent single and pair itemsets.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::discretize::Transaction;
use crate::error::{Error, Result};

/// A frequent itemset and the number of transactions containing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itemset {
    /// Tokens, sorted.
    pub items: Vec<String>,
    /// Transactions containing every token.
    pub count: usize,
}

impl Itemset {
    /// Fraction of `n_transactions` containing this itemset (`0.0` when empty).
    pub fn support(&self, n_transactions: usize) -> f64 {
        if n_transactions == 0 {
            0.0
        } else {
            self.count as f64 / n_transactions as f64
        }
    }
}

/// Frequent 1- and 2-itemsets.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FrequentItemsets {
    /// Frequent single tokens (L1), sorted by token.
    pub singles: Vec<Itemset>,
    /// Frequent token pairs (L2).
    pub pairs: Vec<Itemset>,
    /// Number of transactions mined.
    pub num_transactions: usize,
}

impl FrequentItemsets {
    /// Count of a frequent single token.
    pub fn single_count(&self, token: &str) -> Option<usize> {
        self.singles
            .iter()
            .find(|s| s.items[0] == token)
            .map(|s| s.count)
    }
}

/// Bounded Apriori: frequent singles, then frequent pairs of frequent singles.
#[derive(Debug, Clone)]
pub struct Apriori {
    min_support: f64,
}

impl Apriori {
    /// Create a miner with the given minimum support in `(0, 1]`.
    pub fn new(min_support: f64) -> Self {
        Self { min_support }
    }

    /// Minimum support.
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    fn is_frequent(&self, count: usize, n: usize) -> bool {
        count as f64 / n as f64 >= self.min_support
    }

    /// Mine frequent singles and pairs.
    ///
    /// Ties at exactly `min_support` count as frequent. No transactions means
    /// no frequent itemsets.
    pub fn mine(&self, transactions: &[Transaction]) -> Result<FrequentItemsets> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(Error::invalid_parameter(
                "min_support",
                format!("must be in (0, 1], got {}", self.min_support),
            ));
        }

        let n = transactions.len();
        if n == 0 {
            return Ok(FrequentItemsets::default());
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for tx in transactions {
            for item in tx.iter() {
                *counts.entry(item).or_insert(0) += 1;
            }
        }

        let singles: Vec<Itemset> = counts
            .into_iter()
            .filter(|&(_, c)| self.is_frequent(c, n))
            .map(|(item, count)| Itemset {
                items: vec![item.to_string()],
                count,
            })
            .collect();

        // Singles are sorted, so (a, b) with a < b is already the canonical order.
        let mut pairs = Vec::new();
        for (i, a) in singles.iter().enumerate() {
            for b in &singles[i + 1..] {
                let (a, b) = (&a.items[0], &b.items[0]);
                let count = transactions
                    .iter()
                    .filter(|tx| tx.contains(a) && tx.contains(b))
                    .count();
                if self.is_frequent(count, n) {
                    pairs.push(Itemset {
                        items: vec![a.clone(), b.clone()],
                        count,
                    });
                }
            }
        }

        debug!(
            transactions = n,
            min_support = self.min_support,
            singles = singles.len(),
            pairs = pairs.len(),
            "mined frequent itemsets"
        );

        Ok(FrequentItemsets {
            singles,
            pairs,
            num_transactions: n,
        })
    }
}
