//! Typed input records.
//!
//! Dashboard rows arrive as loosely shaped key/value maps. They are converted
//! into [`Record`]s exactly once, at ingestion: every value that is null,
//! non-numeric, or non-finite is dropped there, so the algorithms downstream
//! only ever see "a number" or "no value".

use std::collections::{BTreeMap, HashSet};

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Which keys of a raw row carry the record label, partition key, and group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSchema {
    /// Key holding the identifying label (e.g. the country name).
    pub label_key: String,
    /// Key holding the integer partition (e.g. the survey year).
    pub partition_key: String,
    /// Key holding the categorical group (e.g. the region).
    pub group_key: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            label_key: "country_name".to_string(),
            partition_key: "year".to_string(),
            group_key: "region".to_string(),
        }
    }
}

/// One observation: a label, an optional partition key, an optional group,
/// and numeric features.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    label: String,
    partition: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    values: BTreeMap<String, f64>,
}

impl Record {
    /// Create a record with no feature values.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            partition: None,
            group: None,
            values: BTreeMap::new(),
        }
    }

    /// Set the partition key.
    pub fn with_partition(mut self, partition: i64) -> Self {
        self.partition = Some(partition);
        self
    }

    /// Set the group. Blank names are treated as missing.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        let group = group.into();
        let trimmed = group.trim();
        self.group = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Set a feature value. Non-finite values are treated as missing.
    pub fn with_value(mut self, feature: impl Into<String>, value: f64) -> Self {
        if value.is_finite() {
            self.values.insert(feature.into(), value);
        }
        self
    }

    /// Set a feature value that may be missing.
    pub fn with_optional(self, feature: impl Into<String>, value: Option<f64>) -> Self {
        match value {
            Some(v) => self.with_value(feature, v),
            None => self,
        }
    }

    /// Identifying label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Partition key, if any.
    pub fn partition(&self) -> Option<i64> {
        self.partition
    }

    /// Group, if any.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Value of `feature`, or `None` if it is missing.
    pub fn value(&self, feature: &str) -> Option<f64> {
        self.values.get(feature).copied()
    }

    /// All present feature values, ordered by feature name.
    pub fn values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Convert one raw JSON row.
    ///
    /// The row must be an object whose label key holds a string. A string
    /// under the group key becomes the group. Every other key is a candidate
    /// feature: numbers are kept, numeric strings are parsed, and anything
    /// else is dropped.
    pub fn from_json(row: &Value, schema: &RecordSchema) -> std::result::Result<Self, String> {
        let obj = row
            .as_object()
            .ok_or_else(|| format!("expected an object, found {}", kind(row)))?;

        let label = match obj.get(&schema.label_key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(format!(
                    "label '{}' must be a string, found {}",
                    schema.label_key,
                    kind(other)
                ))
            }
            None => return Err(format!("missing label '{}'", schema.label_key)),
        };

        let mut record = Record::new(label);
        record.partition = obj.get(&schema.partition_key).and_then(parse_partition);
        if let Some(Value::String(group)) = obj.get(&schema.group_key) {
            record = record.with_group(group.as_str());
        }

        for (key, value) in obj {
            if *key == schema.label_key || *key == schema.partition_key || *key == schema.group_key {
                continue;
            }
            record = record.with_optional(key.clone(), parse_numeric(value));
        }

        Ok(record)
    }
}

/// Convert a batch of raw rows into records.
///
/// Fails on the first row that is not an object or has no label; bad feature
/// values never fail ingestion.
pub fn ingest(rows: &[Value], schema: &RecordSchema) -> Result<Vec<Record>> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            Record::from_json(row, schema).map_err(|reason| Error::MalformedRecord { index, reason })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(rows = rows.len(), "ingested records");
    Ok(records)
}

/// Check that a feature list is non-empty and free of duplicates.
pub fn validate_features(features: &[&str]) -> Result<()> {
    if features.is_empty() {
        return Err(Error::InvalidFeatureList("no features given".to_string()));
    }
    let mut seen = HashSet::with_capacity(features.len());
    for &f in features {
        if f.is_empty() {
            return Err(Error::InvalidFeatureList("empty feature name".to_string()));
        }
        if !seen.insert(f) {
            return Err(Error::InvalidFeatureList(format!("duplicate feature '{f}'")));
        }
    }
    Ok(())
}

/// Dense feature matrix built from the records that have every feature.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Rows aligned with `labels`, columns aligned with the feature list.
    pub data: Array2<f64>,
    /// Labels of the kept records.
    pub labels: Vec<String>,
    /// Number of records dropped for missing a feature.
    pub dropped: usize,
}

impl FeatureMatrix {
    /// Build the matrix, dropping records that miss any of `features`.
    pub fn from_records(records: &[Record], features: &[&str]) -> Result<Self> {
        validate_features(features)?;

        let d = features.len();
        let mut flat = Vec::with_capacity(records.len() * d);
        let mut labels = Vec::with_capacity(records.len());

        for record in records {
            let row: Option<Vec<f64>> = features.iter().map(|f| record.value(f)).collect();
            if let Some(row) = row {
                flat.extend(row);
                labels.push(record.label().to_string());
            }
        }

        let n = labels.len();
        let found = flat.len();
        let data = Array2::from_shape_vec((n, d), flat).map_err(|_| Error::DimensionMismatch {
            expected: n * d,
            found,
        })?;

        Ok(Self {
            data,
            labels,
            dropped: records.len() - n,
        })
    }
}

fn parse_numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn parse_partition(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_keeps_only_numeric_values() {
        let row = json!({
            "country_name": "Finland",
            "year": 2020,
            "happiness_score": 7.8,
            "generosity": "0.12",
            "social_support": null,
            "freedom_to_make_life_choices": "n/a",
            "region": "Western Europe",
            "flag": true,
        });

        let record = Record::from_json(&row, &RecordSchema::default()).unwrap();
        assert_eq!(record.label(), "Finland");
        assert_eq!(record.partition(), Some(2020));
        assert_eq!(record.value("happiness_score"), Some(7.8));
        assert_eq!(record.value("generosity"), Some(0.12));
        assert_eq!(record.value("social_support"), None);
        assert_eq!(record.value("freedom_to_make_life_choices"), None);
        assert_eq!(record.group(), Some("Western Europe"));
        assert_eq!(record.value("region"), None);
        assert_eq!(record.value("flag"), None);
        assert_eq!(record.values().count(), 2);
    }

    #[test]
    fn partition_accepts_strings_and_whole_floats() {
        let schema = RecordSchema::default();
        let a = Record::from_json(&json!({"country_name": "A", "year": "2019"}), &schema).unwrap();
        let b = Record::from_json(&json!({"country_name": "B", "year": 2018.0}), &schema).unwrap();
        let c = Record::from_json(&json!({"country_name": "C", "year": 2018.5}), &schema).unwrap();
        assert_eq!(a.partition(), Some(2019));
        assert_eq!(b.partition(), Some(2018));
        assert_eq!(c.partition(), None);
    }

    #[test]
    fn ingest_reports_index_of_malformed_row() {
        let rows = vec![
            json!({"country_name": "A", "x": 1}),
            json!({"x": 2}),
            json!([1, 2]),
        ];
        let err = ingest(&rows, &RecordSchema::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { index: 1, .. }));
    }

    #[test]
    fn custom_schema_keys() {
        let schema = RecordSchema {
            label_key: "name".to_string(),
            partition_key: "period".to_string(),
            group_key: "bloc".to_string(),
        };
        let record =
            Record::from_json(&json!({"name": "n", "period": 3, "bloc": "north", "v": 1.5}), &schema).unwrap();
        assert_eq!(record.label(), "n");
        assert_eq!(record.partition(), Some(3));
        assert_eq!(record.group(), Some("north"));
        assert_eq!(record.value("v"), Some(1.5));
    }

    #[test]
    fn blank_or_non_string_groups_are_missing() {
        let schema = RecordSchema::default();
        let blank = Record::from_json(&json!({"country_name": "A", "region": "   "}), &schema).unwrap();
        let numeric = Record::from_json(&json!({"country_name": "B", "region": 4}), &schema).unwrap();
        let padded = Record::new("C").with_group("  Africa ");
        assert_eq!(blank.group(), None);
        assert_eq!(numeric.group(), None);
        assert_eq!(numeric.value("region"), None);
        assert_eq!(padded.group(), Some("Africa"));
    }

    #[test]
    fn non_finite_values_are_missing() {
        let record = Record::new("x")
            .with_value("a", f64::NAN)
            .with_value("b", f64::INFINITY)
            .with_optional("c", None)
            .with_value("d", 1.0);
        assert_eq!(record.value("a"), None);
        assert_eq!(record.value("b"), None);
        assert_eq!(record.value("c"), None);
        assert_eq!(record.value("d"), Some(1.0));
    }

    #[test]
    fn feature_list_validation() {
        assert!(validate_features(&["a", "b"]).is_ok());
        assert!(matches!(validate_features(&[]), Err(Error::InvalidFeatureList(_))));
        assert!(matches!(validate_features(&["a", "a"]), Err(Error::InvalidFeatureList(_))));
        assert!(matches!(validate_features(&["a", ""]), Err(Error::InvalidFeatureList(_))));
    }

    #[test]
    fn feature_matrix_drops_incomplete_records() {
        let records = vec![
            Record::new("a").with_value("x", 1.0).with_value("y", 2.0),
            Record::new("b").with_value("x", 3.0),
            Record::new("c").with_value("x", 5.0).with_value("y", 6.0),
        ];
        let m = FeatureMatrix::from_records(&records, &["x", "y"]).unwrap();
        assert_eq!(m.data.shape(), &[2, 2]);
        assert_eq!(m.labels, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(m.dropped, 1);
        assert_eq!(m.data[[1, 1]], 6.0);
    }
}
