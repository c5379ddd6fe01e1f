//! The operations a dashboard back-end calls.
//!
//! [`Engine`] ties the pieces together: records in, presentation-ready reports
//! out. It holds only configuration, so one engine can serve concurrent
//! callers; each call works on its own inputs and allocates its own output.

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::associate::{discretize, Apriori, Rule, RuleGenerator};
use crate::cluster::{silhouette, Cluster, Kmeans, ZScore};
use crate::config::EngineConfig;
use crate::correlation::{CorrelationEngine, CorrelationResult};
use crate::error::{Error, Result};
use crate::record::{ingest, validate_features, FeatureMatrix, Record};
use crate::stats::round_to;
use crate::summary::{score_distribution, BandCount};

/// Association rules mined from a set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationReport {
    /// Rules meeting both thresholds, rounded for display.
    pub rules: Vec<Rule>,
    /// Number of transactions (one per record).
    pub num_transactions: usize,
    /// Median used to split each feature.
    pub medians: BTreeMap<String, f64>,
}

/// Named clusters from a k-means run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterReport {
    /// One entry per cluster id `0..k`, empty clusters included.
    pub clusters: Vec<Cluster>,
    /// Lloyd iterations performed.
    pub iterations: usize,
    /// Whether assignments stopped changing before the iteration cap.
    pub converged: bool,
    /// Within-cluster sum of squares in z-score space.
    pub inertia: f64,
    /// Mean silhouette coefficient in z-score space.
    pub silhouette: f64,
    /// Records left out for missing a feature.
    pub dropped: usize,
}

/// Correlations of candidate factors against a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    /// One result per factor, in the order requested.
    pub correlations: Vec<CorrelationResult>,
}

/// Configured entry point for mining, clustering, and correlation.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine after validating `config`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Convert raw JSON rows into records using the configured schema.
    pub fn ingest(&self, rows: &[Value]) -> Result<Vec<Record>> {
        ingest(rows, &self.config.schema)
    }

    /// Discretize `features` at their medians and mine pairwise rules.
    ///
    /// Thresholds left as `None` take the configured defaults. An empty record
    /// set is reported as [`Error::InsufficientData`].
    pub fn mine_associations(
        &self,
        records: &[Record],
        features: &[&str],
        min_support: Option<f64>,
        min_confidence: Option<f64>,
    ) -> Result<AssociationReport> {
        validate_features(features)?;
        if records.is_empty() {
            return Err(Error::InsufficientData {
                required: 1,
                available: 0,
            });
        }

        let min_support = min_support.unwrap_or(self.config.association.min_support);
        let min_confidence = min_confidence.unwrap_or(self.config.association.min_confidence);
        debug!(
            records = records.len(),
            features = features.len(),
            min_support,
            min_confidence,
            "mining associations"
        );

        let discretized = discretize(records, features)?;
        let frequent = Apriori::new(min_support).mine(&discretized.transactions)?;
        let rules = RuleGenerator::new(min_confidence).generate(&frequent)?;

        info!(
            transactions = frequent.num_transactions,
            frequent_items = frequent.singles.len(),
            frequent_pairs = frequent.pairs.len(),
            rules = rules.len(),
            "association mining complete"
        );

        Ok(AssociationReport {
            rules: rules.iter().map(|r| r.rounded(self.config.decimals)).collect(),
            num_transactions: frequent.num_transactions,
            medians: discretized.medians,
        })
    }

    /// Cluster records on z-scored `features` and name each cluster.
    ///
    /// Records missing any feature are dropped first. Fewer remaining records
    /// than `k` is reported as [`Error::InsufficientData`]. Names are read off
    /// the rounded centroid and skip features that are constant over the
    /// clustered records. `max_iter` of
    /// `None` uses the configured cap. Seeding draws from `rng`.
    pub fn run_kmeans<R: Rng + ?Sized>(
        &self,
        records: &[Record],
        features: &[&str],
        k: usize,
        max_iter: Option<usize>,
        rng: &mut R,
    ) -> Result<ClusterReport> {
        let matrix = FeatureMatrix::from_records(records, features)?;
        if matrix.dropped > 0 {
            warn!(
                dropped = matrix.dropped,
                kept = matrix.labels.len(),
                "records missing a clustering feature were dropped"
            );
        }

        let n = matrix.labels.len();
        let kmeans = Kmeans::new(k).with_max_iter(max_iter.unwrap_or(self.config.clustering.max_iter));
        kmeans.validate(n)?;

        let (scaler, normalized) = ZScore::fit_transform(&matrix.data)?;
        let fit = kmeans.fit(&normalized, rng)?;
        let namer = self.config.naming.namer();
        let decimals = self.config.decimals;

        // A feature with the same value everywhere tells no cluster apart.
        let distinguishing: Vec<&str> = features
            .iter()
            .enumerate()
            .filter(|&(j, _)| !scaler.is_constant(j))
            .map(|(_, &f)| f)
            .collect();

        let mut members: Vec<Vec<String>> = vec![Vec::new(); k];
        for (label, &c) in matrix.labels.iter().zip(&fit.labels) {
            members[c].push(label.clone());
        }

        let clusters: Vec<Cluster> = members
            .into_iter()
            .enumerate()
            .map(|(id, members)| {
                let centroid: BTreeMap<String, f64> = features
                    .iter()
                    .zip(fit.centroids.row(id))
                    .map(|(&f, &z)| (f.to_string(), round_to(z, decimals)))
                    .collect();
                Cluster {
                    id,
                    name: namer.name(&distinguishing, &centroid),
                    description: self.config.clustering.description.clone(),
                    centroid,
                    size: members.len(),
                    members,
                }
            })
            .collect();

        info!(
            k,
            points = n,
            iterations = fit.iterations,
            converged = fit.converged,
            "k-means clustering complete"
        );

        Ok(ClusterReport {
            silhouette: round_to(silhouette(&normalized, &fit.labels), decimals),
            inertia: round_to(fit.inertia, decimals),
            iterations: fit.iterations,
            converged: fit.converged,
            dropped: matrix.dropped,
            clusters,
        })
    }

    /// Correlate `target` with each of `factors` over `records`.
    ///
    /// Callers pass a single partition (e.g. one year) of records.
    pub fn live_correlations(
        &self,
        records: &[Record],
        target: &str,
        factors: &[&str],
    ) -> Result<CorrelationReport> {
        let correlations = CorrelationEngine::new()
            .with_thresholds(self.config.significance)
            .correlate(records, target, factors)?;

        info!(factors = factors.len(), target, "live correlations complete");
        Ok(CorrelationReport {
            correlations: correlations
                .iter()
                .map(|c| c.rounded(self.config.decimals))
                .collect(),
        })
    }

    /// Count records per configured score band.
    pub fn score_distribution(&self, records: &[Record], feature: &str) -> Result<Vec<BandCount>> {
        score_distribution(records, feature, &self.config.bands)
    }
}
