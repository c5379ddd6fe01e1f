//! # glean
//!
//! In-process data mining for well-being analytics: association rules between
//! discretized factors, k-means clustering of records with readable cluster
//! names, and live correlations against a target metric.
//!
//! Everything is pure computation over in-memory [`Record`]s. Persistence,
//! transport, and partition selection belong to the caller.
//!
//! ```rust
//! use glean::{Engine, Record};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let records: Vec<Record> = [("a", 0.0), ("b", 1.0), ("c", 10.0), ("d", 11.0)]
//!     .into_iter()
//!     .map(|(label, f)| Record::new(label).with_value("f", f))
//!     .collect();
//!
//! let engine = Engine::default();
//! let mut rng = StdRng::seed_from_u64(42);
//! let report = engine.run_kmeans(&records, &["f"], 2, None, &mut rng).unwrap();
//!
//! let mut sizes: Vec<usize> = report.clusters.iter().map(|c| c.size).collect();
//! sizes.sort();
//! assert_eq!(sizes, vec![2, 2]);
//! ```

pub mod associate;
pub mod cluster;
pub mod config;
pub mod correlation;
pub mod engine;
/// Error types used across `glean`.
pub mod error;
pub mod record;
pub mod stats;
pub mod summary;
pub mod wellbeing;


pub use associate::{Apriori, FrequentItemsets, Itemset, Rule, RuleGenerator, Transaction};
pub use cluster::{Cluster, ClusterNamer, Clustering, Kmeans, KmeansFit, ZScore};
pub use config::{AssociationConfig, ClusteringConfig, EngineConfig, NamingConfig};
pub use correlation::{pearson, CorrelationEngine, CorrelationResult, Significance};
pub use engine::{AssociationReport, ClusterReport, CorrelationReport, Engine};
pub use error::{Error, Result};
pub use record::{FeatureMatrix, Record, RecordSchema};
pub use summary::{BandCount, GroupAverage, PartitionSummary, RankOrder, Ranked, ScoreBand, TrendPoint};
