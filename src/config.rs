//! Engine configuration.
//!
//! Every section has defaults matching the dashboard's behavior, so a config
//! file only needs to name what it changes:
//!
//! ```rust
//! use glean::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "association": { "min_support": 0.2 } }"#).unwrap();
//! assert_eq!(config.association.min_support, 0.2);
//! assert_eq!(config.association.min_confidence, 0.6);
//! assert_eq!(config.clustering.max_iter, 100);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterNamer;
use crate::correlation::SignificanceThresholds;
use crate::error::{Error, Result};
use crate::record::RecordSchema;
use crate::summary::ScoreBand;
use crate::wellbeing;

/// Default thresholds for association mining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationConfig {
    /// Minimum itemset support in `(0, 1]`.
    pub min_support: f64,
    /// Minimum rule confidence in `(0, 1]`.
    pub min_confidence: f64,
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            min_support: 0.3,
            min_confidence: 0.6,
        }
    }
}

/// K-means defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Iteration cap when the caller gives none.
    pub max_iter: usize,
    /// Description attached to every produced cluster.
    pub description: String,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_iter: crate::cluster::DEFAULT_MAX_ITER,
            description: "K-means over normalized factors (z-score); name reflects strongest factors"
                .to_string(),
        }
    }
}

/// Cluster naming rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Display label per feature.
    pub labels: BTreeMap<String, String>,
    /// Features whose zero deviation reads as "Low".
    pub inverted: Vec<String>,
    /// Separator between the phrases of a name.
    pub separator: String,
    /// Number of features in a name.
    pub top: usize,
    /// Name for a cluster without centroid values.
    pub default_name: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            labels: wellbeing::LABELS
                .iter()
                .map(|&(f, l)| (f.to_string(), l.to_string()))
                .collect(),
            inverted: vec![wellbeing::CORRUPTION.to_string()],
            separator: " • ".to_string(),
            top: 2,
            default_name: "Cluster".to_string(),
        }
    }
}

impl NamingConfig {
    /// Build the namer described by this config.
    pub fn namer(&self) -> ClusterNamer {
        let namer = self
            .labels
            .iter()
            .fold(ClusterNamer::new(), |n, (f, l)| n.with_label(f.as_str(), l.as_str()));
        self.inverted
            .iter()
            .fold(namer, |n, f| n.with_inverted(f.as_str()))
            .with_separator(self.separator.as_str())
            .with_top(self.top)
            .with_default_name(self.default_name.as_str())
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Keys used when ingesting raw rows.
    pub schema: RecordSchema,
    /// Association mining defaults.
    pub association: AssociationConfig,
    /// K-means defaults.
    pub clustering: ClusteringConfig,
    /// Cluster naming rules.
    pub naming: NamingConfig,
    /// Correlation strength thresholds.
    pub significance: SignificanceThresholds,
    /// Score bands for distributions, highest first.
    pub bands: Vec<ScoreBand>,
    /// Decimals kept in reports.
    pub decimals: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema: RecordSchema::default(),
            association: AssociationConfig::default(),
            clustering: ClusteringConfig::default(),
            naming: NamingConfig::default(),
            significance: SignificanceThresholds::default(),
            bands: ScoreBand::happiness_defaults(),
            decimals: 3,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON and validate. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        let fraction = |name: &str, v: f64| {
            if v > 0.0 && v <= 1.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig(format!("{name} must be in (0, 1], got {v}")))
            }
        };
        fraction("association.min_support", self.association.min_support)?;
        fraction("association.min_confidence", self.association.min_confidence)?;

        if self.clustering.max_iter == 0 {
            return Err(Error::InvalidConfig("clustering.max_iter must be at least 1".into()));
        }
        if self.naming.top == 0 {
            return Err(Error::InvalidConfig("naming.top must be at least 1".into()));
        }

        let t = &self.significance;
        if !(0.0 <= t.moderate && t.moderate <= t.strong && t.strong <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "significance thresholds must satisfy 0 <= moderate <= strong <= 1, got {} and {}",
                t.moderate, t.strong
            )));
        }

        if self.bands.is_empty() {
            return Err(Error::InvalidConfig("bands must not be empty".into()));
        }
        if self.bands.windows(2).any(|w| !(w[0].min > w[1].min)) {
            return Err(Error::InvalidConfig(
                "bands must have strictly descending lower bounds".into(),
            ));
        }

        if self.decimals > 12 {
            return Err(Error::InvalidConfig(format!(
                "decimals must be at most 12, got {}",
                self.decimals
            )));
        }
        Ok(())
    }
}
