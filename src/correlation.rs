//! Live correlation between a target metric and candidate factors.
//!
//! For each factor the engine reports three numbers:
//!
//! | Measure | Range | Meaning |
//! |---------|-------|---------|
//! | coefficient | [-1, 1] | Pearson correlation over the valid pairs |
//! | support | [0, 1] | Fraction of pairs whose median split agrees with the sign |
//! | coverage | [0, 1] | Fraction of target records that also have the factor |
//!
//! *Support* borrows the association-rule idea for a continuous relationship:
//! split each series at its median into high and low halves. With a positive
//! coefficient a pair agrees when both values sit on the same side; with a
//! negative coefficient, when they sit on opposite sides.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{validate_features, Record};
use crate::stats::{median, round_to};

/// Strength bucket of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    /// Below the moderate threshold.
    Weak,
    /// At least the moderate threshold.
    Moderate,
    /// At least the strong threshold.
    Strong,
}

/// Thresholds on `|r|` for [`Significance`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceThresholds {
    /// `|r| >= strong` is strong.
    pub strong: f64,
    /// `|r| >= moderate` is moderate.
    pub moderate: f64,
}

impl Default for SignificanceThresholds {
    fn default() -> Self {
        Self {
            strong: 0.7,
            moderate: 0.4,
        }
    }
}

impl SignificanceThresholds {
    /// Classify a coefficient.
    pub fn classify(&self, coefficient: f64) -> Significance {
        let r = coefficient.abs();
        if r >= self.strong {
            Significance::Strong
        } else if r >= self.moderate {
            Significance::Moderate
        } else {
            Significance::Weak
        }
    }
}

/// Correlation of one factor against the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// Candidate factor.
    pub factor_a: String,
    /// Target metric.
    pub factor_b: String,
    /// Pearson coefficient.
    pub coefficient: f64,
    /// Median-split agreement with the coefficient's sign.
    pub support: f64,
    /// Valid pairs over attempted pairs.
    pub coverage: f64,
    /// Strength bucket.
    pub significance: Significance,
}

impl CorrelationResult {
    /// Copy with the numeric fields rounded for display.
    pub fn rounded(&self, decimals: u32) -> Self {
        Self {
            coefficient: round_to(self.coefficient, decimals),
            support: round_to(self.support, decimals),
            coverage: round_to(self.coverage, decimals),
            ..self.clone()
        }
    }
}

/// Pearson correlation via the sum-of-products formula.
///
/// Pairs up `x` and `y` position by position (extra values in the longer
/// slice are ignored). A zero denominator, e.g. a constant series, gives 0.
///
/// ```rust
/// use glean::correlation::pearson;
///
/// let x = [1.0, 2.0, 3.0, 4.0];
/// assert!((pearson(&x, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
/// assert!((pearson(&x, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
/// assert_eq!(pearson(&x, &[5.0, 5.0, 5.0, 5.0]), 0.0);
/// ```
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        sum_x += a;
        sum_y += b;
        sum_xy += a * b;
        sum_x2 += a * a;
        sum_y2 += b * b;
    }

    let n = n as f64;
    let num = n * sum_xy - sum_x * sum_y;
    let den = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();
    if den == 0.0 || !den.is_finite() {
        return 0.0;
    }
    // Cancellation can push the ratio a hair outside [-1, 1].
    (num / den).clamp(-1.0, 1.0)
}

/// Fraction of pairs whose median-split halves agree with the sign of `coefficient`.
pub fn median_split_support(x: &[f64], y: &[f64], coefficient: f64) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let (mx, my) = (median(&x[..n]), median(&y[..n]));

    let agreeing = x
        .iter()
        .zip(y)
        .filter(|&(&a, &b)| {
            let same_side = (a >= mx) == (b >= my);
            if coefficient >= 0.0 {
                same_side
            } else {
                !same_side
            }
        })
        .count();

    agreeing as f64 / n as f64
}

/// Correlates a target feature with candidate factors over one partition.
#[derive(Debug, Clone, Default)]
pub struct CorrelationEngine {
    thresholds: SignificanceThresholds,
}

impl CorrelationEngine {
    /// Engine with the default thresholds (0.7 strong, 0.4 moderate).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom significance thresholds.
    pub fn with_thresholds(mut self, thresholds: SignificanceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Correlate `target` with every factor in `factors`.
    ///
    /// The attempted pairing is every record with a valid target value; a
    /// factor's coverage is the share of those records that also have a valid
    /// value for that factor. Records are expected to come from one partition.
    pub fn correlate(
        &self,
        records: &[Record],
        target: &str,
        factors: &[&str],
    ) -> Result<Vec<CorrelationResult>> {
        validate_features(factors)?;
        if target.is_empty() {
            return Err(Error::InvalidFeatureList("empty target feature".to_string()));
        }
        if factors.contains(&target) {
            return Err(Error::InvalidFeatureList(format!(
                "target '{target}' is also listed as a factor"
            )));
        }

        let attempted: Vec<(&Record, f64)> = records
            .iter()
            .filter_map(|r| r.value(target).map(|t| (r, t)))
            .collect();

        let results: Vec<CorrelationResult> = factors
            .iter()
            .map(|&factor| {
                let (ys, xs): (Vec<f64>, Vec<f64>) = attempted
                    .iter()
                    .filter_map(|&(r, t)| r.value(factor).map(|v| (t, v)))
                    .unzip();

                let coefficient = pearson(&xs, &ys);
                let coverage = if attempted.is_empty() {
                    0.0
                } else {
                    xs.len() as f64 / attempted.len() as f64
                };

                CorrelationResult {
                    factor_a: factor.to_string(),
                    factor_b: target.to_string(),
                    coefficient,
                    support: median_split_support(&xs, &ys, coefficient),
                    coverage,
                    significance: self.thresholds.classify(coefficient),
                }
            })
            .collect();

        debug!(
            records = records.len(),
            attempted = attempted.len(),
            factors = factors.len(),
            target,
            "computed live correlations"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(label: &str, values: &[(&str, f64)]) -> Record {
        values
            .iter()
            .fold(Record::new(label), |r, &(f, v)| r.with_value(f, v))
    }

    #[test]
    fn classify_thresholds_are_inclusive() {
        let t = SignificanceThresholds::default();
        assert_eq!(t.classify(0.7), Significance::Strong);
        assert_eq!(t.classify(-0.69), Significance::Moderate);
        assert_eq!(t.classify(0.4), Significance::Moderate);
        assert_eq!(t.classify(0.39), Significance::Weak);
    }

    #[test]
    fn pearson_empty_and_constant() {
        assert_eq!(pearson(&[], &[]), 0.0);
        assert_eq!(pearson(&[1.0, 1.0], &[2.0, 3.0]), 0.0);
    }

    #[test]
    fn support_follows_sign() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(median_split_support(&x, &y, 1.0), 1.0);
        assert_eq!(median_split_support(&x, &y, -1.0), 0.0);
        assert_eq!(median_split_support(&[], &[], 1.0), 0.0);
    }

    #[test]
    fn correlate_skips_missing_pairs() {
        let records = vec![
            rec("a", &[("score", 1.0), ("gdp", 1.0), ("corr", 4.0)]),
            rec("b", &[("score", 2.0), ("gdp", 2.0), ("corr", 3.0)]),
            rec("c", &[("score", 3.0), ("gdp", 3.0)]),
            rec("d", &[("score", 4.0), ("gdp", 4.0), ("corr", 1.0)]),
            rec("e", &[("gdp", 100.0), ("corr", 100.0)]),
        ];

        let out = CorrelationEngine::new()
            .correlate(&records, "score", &["gdp", "corr"])
            .unwrap();
        assert_eq!(out.len(), 2);

        let gdp = &out[0];
        assert_eq!(gdp.factor_a, "gdp");
        assert_eq!(gdp.factor_b, "score");
        assert!((gdp.coefficient - 1.0).abs() < 1e-12);
        assert_eq!(gdp.coverage, 1.0);
        assert_eq!(gdp.support, 1.0);
        assert_eq!(gdp.significance, Significance::Strong);

        let corr = &out[1];
        assert!(corr.coefficient < -0.9);
        assert_eq!(corr.coverage, 0.75);
        // corr = [4, 3, 1] vs score = [1, 2, 4]; the (3, 2) pair sits on the same side.
        assert!((corr.support - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn no_target_values_means_zero_everything() {
        let records = vec![rec("a", &[("gdp", 1.0)])];
        let out = CorrelationEngine::new().correlate(&records, "score", &["gdp"]).unwrap();
        assert_eq!(out[0].coefficient, 0.0);
        assert_eq!(out[0].coverage, 0.0);
        assert_eq!(out[0].support, 0.0);
        assert_eq!(out[0].significance, Significance::Weak);
    }

    #[test]
    fn target_in_factor_list_is_rejected() {
        let err = CorrelationEngine::new().correlate(&[], "score", &["score"]);
        assert!(matches!(err, Err(Error::InvalidFeatureList(_))));
    }

    #[test]
    fn rounded_copy() {
        let r = CorrelationResult {
            factor_a: "a".into(),
            factor_b: "b".into(),
            coefficient: 0.123456,
            support: 0.98765,
            coverage: 1.0,
            significance: Significance::Weak,
        };
        let shown = r.rounded(3);
        assert_eq!(shown.coefficient, 0.123);
        assert_eq!(shown.support, 0.988);
        assert_eq!(shown.factor_a, "a");
    }

    proptest! {
        #[test]
        fn pearson_is_symmetric_and_bounded(
            pairs in proptest::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 0..50),
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let r = pearson(&x, &y);
            prop_assert_eq!(r, pearson(&y, &x));
            prop_assert!((-1.0..=1.0).contains(&r));
        }

        #[test]
        fn support_and_coverage_are_fractions(
            rows in proptest::collection::vec(
                (proptest::option::of(-10.0f64..10.0), proptest::option::of(-10.0f64..10.0)),
                0..40,
            ),
        ) {
            let records: Vec<Record> = rows
                .iter()
                .enumerate()
                .map(|(i, &(t, f))| Record::new(i.to_string()).with_optional("t", t).with_optional("f", f))
                .collect();
            let out = CorrelationEngine::new().correlate(&records, "t", &["f"]).unwrap();
            for r in out {
                prop_assert!((0.0..=1.0).contains(&r.support));
                prop_assert!((0.0..=1.0).contains(&r.coverage));
                prop_assert!((-1.0..=1.0).contains(&r.coefficient));
            }
        }
    }
}
