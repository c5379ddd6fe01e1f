//! Directional rules from frequent pairs.

use serde::Serialize;
use tracing::debug;

use super::apriori::FrequentItemsets;
use crate::error::{Error, Result};
use crate::stats::round_to;

/// An association rule `antecedent → consequent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    /// Left-hand side (one token).
    pub antecedent: Vec<String>,
    /// Right-hand side (one token).
    pub consequent: Vec<String>,
    /// Fraction of transactions containing both sides.
    pub support: f64,
    /// Fraction of antecedent transactions that also contain the consequent.
    pub confidence: f64,
    /// Confidence relative to the consequent's base rate.
    pub lift: f64,
}

impl Rule {
    /// Copy with support, confidence and lift rounded for display.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            antecedent: self.antecedent.clone(),
            consequent: self.consequent.clone(),
            support: round_to(self.support, decimals),
            confidence: round_to(self.confidence, decimals),
            lift: round_to(self.lift, decimals),
        }
    }
}

/// Generates both directions of each frequent pair, filtered by confidence.
#[derive(Debug, Clone)]
pub struct RuleGenerator {
    min_confidence: f64,
}

impl RuleGenerator {
    /// Create a generator with the given minimum confidence in `(0, 1]`.
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    /// Minimum confidence.
    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Derive rules from frequent pairs.
    ///
    /// Each pair `{a, b}` yields `a → b` and `b → a` independently, so a pair
    /// produces zero, one, or two rules. Rules come out in pair order, `a → b`
    /// before `b → a`.
    pub fn generate(&self, frequent: &FrequentItemsets) -> Result<Vec<Rule>> {
        if !(self.min_confidence > 0.0 && self.min_confidence <= 1.0) {
            return Err(Error::invalid_parameter(
                "min_confidence",
                format!("must be in (0, 1], got {}", self.min_confidence),
            ));
        }

        // Denominators are clamped to 1 so hand-built itemsets cannot divide by zero.
        let n = frequent.num_transactions.max(1) as f64;
        let count_of = |token: &str| frequent.single_count(token).unwrap_or(0).max(1) as f64;

        let mut rules = Vec::new();
        for pair in &frequent.pairs {
            let [a, b] = match pair.items.as_slice() {
                [a, b] => [a, b],
                _ => continue,
            };
            let joint = pair.count as f64;
            let support = joint / n;
            let (count_a, count_b) = (count_of(a), count_of(b));

            for (lhs, rhs, count_lhs, count_rhs) in [(a, b, count_a, count_b), (b, a, count_b, count_a)] {
                let confidence = joint / count_lhs;
                if confidence < self.min_confidence {
                    continue;
                }
                rules.push(Rule {
                    antecedent: vec![lhs.clone()],
                    consequent: vec![rhs.clone()],
                    support,
                    confidence,
                    lift: confidence / (count_rhs / n),
                });
            }
        }

        debug!(
            pairs = frequent.pairs.len(),
            min_confidence = self.min_confidence,
            rules = rules.len(),
            "generated association rules"
        );
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::associate::{Apriori, Transaction};
    use proptest::prelude::*;

    fn tx(items: &[&str]) -> Transaction {
        items.iter().copied().collect()
    }

    #[test]
    fn both_directions_when_confident() {
        let transactions = vec![tx(&["a", "b"]), tx(&["a", "b"]), tx(&["a"]), tx(&["b", "c"])];
        let frequent = Apriori::new(0.5).mine(&transactions).unwrap();
        let rules = RuleGenerator::new(0.6).generate(&frequent).unwrap();

        assert_eq!(rules.len(), 2);
        let ab = &rules[0];
        assert_eq!(ab.antecedent, vec!["a".to_string()]);
        assert_eq!(ab.consequent, vec!["b".to_string()]);
        assert!((ab.support - 0.5).abs() < 1e-12);
        assert!((ab.confidence - 2.0 / 3.0).abs() < 1e-12);
        // lift = (2/3) / (3/4)
        assert!((ab.lift - 8.0 / 9.0).abs() < 1e-12);

        let ba = &rules[1];
        assert_eq!(ba.antecedent, vec!["b".to_string()]);
        assert_eq!(ba.consequent, vec!["a".to_string()]);
    }

    #[test]
    fn one_direction_only() {
        // count(a) = 2, count(b) = 4, joint = 2: a → b has confidence 1, b → a 0.5.
        let transactions = vec![tx(&["a", "b"]), tx(&["a", "b"]), tx(&["b"]), tx(&["b"])];
        let frequent = Apriori::new(0.5).mine(&transactions).unwrap();
        let rules = RuleGenerator::new(0.8).generate(&frequent).unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].antecedent, vec!["a".to_string()]);
        assert_eq!(rules[0].confidence, 1.0);
        assert_eq!(rules[0].lift, 1.0);
    }

    #[test]
    fn rounding_is_presentation_only() {
        let rule = Rule {
            antecedent: vec!["a".into()],
            consequent: vec!["b".into()],
            support: 0.33333,
            confidence: 0.66666,
            lift: 1.23456,
        };
        let shown = rule.rounded(3);
        assert_eq!(shown.support, 0.333);
        assert_eq!(shown.confidence, 0.667);
        assert_eq!(shown.lift, 1.235);
        assert_eq!(rule.confidence, 0.66666);
    }

    #[test]
    fn min_confidence_out_of_range() {
        let frequent = FrequentItemsets::default();
        assert!(RuleGenerator::new(0.0).generate(&frequent).is_err());
        assert!(RuleGenerator::new(1.01).generate(&frequent).is_err());
    }

    proptest! {
        #[test]
        fn confidence_times_antecedent_count_is_pair_count(
            transactions in proptest::collection::vec(
                proptest::collection::btree_set("[a-e]", 0..5)
                    .prop_map(|s| s.into_iter().collect::<Transaction>()),
                1..40,
            ),
            min_support in 0.05f64..0.6,
            min_confidence in 0.05f64..1.0,
        ) {
            let frequent = Apriori::new(min_support).mine(&transactions).unwrap();
            let rules = RuleGenerator::new(min_confidence).generate(&frequent).unwrap();
            let n = frequent.num_transactions as f64;

            for rule in &rules {
                let lhs = &rule.antecedent[0];
                let rhs = &rule.consequent[0];
                let count_lhs = frequent.single_count(lhs).unwrap() as f64;
                let count_rhs = frequent.single_count(rhs).unwrap() as f64;
                let pair = frequent
                    .pairs
                    .iter()
                    .find(|p| p.items.contains(lhs) && p.items.contains(rhs))
                    .unwrap();

                prop_assert!((rule.confidence * count_lhs - pair.count as f64).abs() < 1e-9);
                prop_assert!((rule.support - pair.count as f64 / n).abs() < 1e-12);
                prop_assert!((rule.lift - rule.confidence / (count_rhs / n)).abs() < 1e-9);
                prop_assert!(rule.confidence >= min_confidence);
            }
        }
    }
}
