//! Human-readable cluster names from centroid deviations.

use std::collections::{BTreeMap, BTreeSet};

use crate::wellbeing;

/// Names a cluster after the features whose centroid deviates most from the mean.
///
/// Each of the top features becomes `"High <label>"` or `"Low <label>"`. For an
/// *inverted* feature, a zero deviation reads as `"Low"` rather than `"High"`;
/// the well-being preset inverts perceived corruption, where sitting at or
/// below the mean is the expected, desirable side.
///
/// ```rust
/// use std::collections::BTreeMap;
/// use glean::cluster::ClusterNamer;
///
/// let namer = ClusterNamer::wellbeing();
/// let centroid: BTreeMap<String, f64> = [
///     ("economy_gdp_per_capita".to_string(), 1.4),
///     ("generosity".to_string(), 0.1),
///     ("perceptions_of_corruption".to_string(), -0.9),
/// ]
/// .into_iter()
/// .collect();
///
/// let features = ["economy_gdp_per_capita", "generosity", "perceptions_of_corruption"];
/// assert_eq!(namer.name(&features, &centroid), "High Economy • Low Corruption");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNamer {
    labels: BTreeMap<String, String>,
    inverted: BTreeSet<String>,
    separator: String,
    top: usize,
    default_name: String,
}

impl Default for ClusterNamer {
    fn default() -> Self {
        Self {
            labels: BTreeMap::new(),
            inverted: BTreeSet::new(),
            separator: " • ".to_string(),
            top: 2,
            default_name: "Cluster".to_string(),
        }
    }
}

impl ClusterNamer {
    /// Namer with no labels or inversions; features are named verbatim.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for the World Happiness Report factors.
    pub fn wellbeing() -> Self {
        wellbeing::LABELS
            .iter()
            .fold(Self::new(), |namer, &(feature, label)| namer.with_label(feature, label))
            .with_inverted(wellbeing::CORRUPTION)
    }

    /// Set the display label of a feature.
    pub fn with_label(mut self, feature: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(feature.into(), label.into());
        self
    }

    /// Mark a feature as inverted.
    pub fn with_inverted(mut self, feature: impl Into<String>) -> Self {
        self.inverted.insert(feature.into());
        self
    }

    /// Set the separator between phrases.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set how many features make up a name.
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top.max(1);
        self
    }

    /// Set the name used for an empty centroid.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    /// Display label of a feature (the feature name when unlabeled).
    pub fn label<'a>(&'a self, feature: &'a str) -> &'a str {
        self.labels.get(feature).map_or(feature, String::as_str)
    }

    /// Whether a feature is inverted.
    pub fn is_inverted(&self, feature: &str) -> bool {
        self.inverted.contains(feature)
    }

    /// Name a centroid given in z-score units.
    ///
    /// Features are ranked by descending absolute deviation; ties keep the
    /// order of `features`. Features absent from the centroid are ignored.
    pub fn name(&self, features: &[&str], centroid: &BTreeMap<String, f64>) -> String {
        let mut ranked: Vec<(&str, f64)> = features
            .iter()
            .filter_map(|&f| centroid.get(f).map(|&z| (f, z)))
            .collect();
        if ranked.is_empty() {
            return self.default_name.clone();
        }
        ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

        ranked
            .iter()
            .take(self.top)
            .map(|&(feature, z)| {
                let high = if self.is_inverted(feature) { z > 0.0 } else { z >= 0.0 };
                let side = if high { "High" } else { "Low" };
                format!("{side} {}", self.label(feature))
            })
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn top_two_by_absolute_deviation() {
        let namer = ClusterNamer::new().with_label("a", "Alpha");
        let c = centroid(&[("a", -2.0), ("b", 0.5), ("c", 1.5)]);
        assert_eq!(namer.name(&["a", "b", "c"], &c), "Low Alpha • High c");
    }

    #[test]
    fn zero_deviation_depends_on_inversion() {
        let namer = ClusterNamer::new().with_inverted("bad").with_top(1);
        assert_eq!(namer.name(&["good"], &centroid(&[("good", 0.0)])), "High good");
        assert_eq!(namer.name(&["bad"], &centroid(&[("bad", 0.0)])), "Low bad");
        assert_eq!(namer.name(&["bad"], &centroid(&[("bad", 0.3)])), "High bad");
        assert_eq!(namer.name(&["bad"], &centroid(&[("bad", -0.3)])), "Low bad");
    }

    #[test]
    fn negative_zero_reads_as_zero() {
        let namer = ClusterNamer::new().with_top(1);
        let rounded = crate::stats::round_to(-0.0004, 3);
        assert_eq!(namer.name(&["a"], &centroid(&[("a", rounded)])), "High a");
    }

    #[test]
    fn ties_keep_feature_order() {
        let namer = ClusterNamer::new();
        let c = centroid(&[("x", 1.0), ("y", -1.0), ("z", 1.0)]);
        assert_eq!(namer.name(&["z", "y", "x"], &c), "High z • Low y");
    }

    #[test]
    fn empty_centroid_gets_default_name() {
        let namer = ClusterNamer::new().with_default_name("Group");
        assert_eq!(namer.name(&["a"], &BTreeMap::new()), "Group");
        assert_eq!(ClusterNamer::new().name(&[], &BTreeMap::new()), "Cluster");
    }

    #[test]
    fn wellbeing_preset() {
        let namer = ClusterNamer::wellbeing().with_separator(" / ");
        assert_eq!(namer.label(wellbeing::HEALTH), "Health");
        assert!(namer.is_inverted(wellbeing::CORRUPTION));
        let c = centroid(&[(wellbeing::FREEDOM, -1.1), (wellbeing::CORRUPTION, 1.3)]);
        assert_eq!(
            namer.name(&[wellbeing::FREEDOM, wellbeing::CORRUPTION], &c),
            "High Corruption / Low Freedom"
        );
    }
}
