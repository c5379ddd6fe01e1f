//! Descriptive summaries per partition (e.g. per survey year).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{validate_features, Record};
use crate::stats::mean;

/// Largest partition key present, if any record has one.
pub fn latest_partition(records: &[Record]) -> Option<i64> {
    records.iter().filter_map(Record::partition).max()
}

/// Records belonging to `partition`.
pub fn select_partition(records: &[Record], partition: i64) -> Vec<Record> {
    records
        .iter()
        .filter(|r| r.partition() == Some(partition))
        .cloned()
        .collect()
}

/// Per-partition record count and feature means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionSummary {
    /// Partition key.
    pub partition: i64,
    /// Records in the partition.
    pub count: usize,
    /// Mean of each feature over the records that have it.
    pub averages: BTreeMap<String, f64>,
}

/// Summaries for every partition, in ascending partition order.
///
/// Records without a partition key are ignored. A feature with no valid value
/// in a partition is left out of that partition's averages.
pub fn partition_averages(records: &[Record], features: &[&str]) -> Result<Vec<PartitionSummary>> {
    validate_features(features)?;

    let mut groups: BTreeMap<i64, Vec<&Record>> = BTreeMap::new();
    for record in records {
        if let Some(p) = record.partition() {
            groups.entry(p).or_default().push(record);
        }
    }

    Ok(groups
        .into_iter()
        .map(|(partition, members)| {
            let averages = features
                .iter()
                .filter_map(|&f| {
                    let values: Vec<f64> = members.iter().filter_map(|r| r.value(f)).collect();
                    mean(&values).map(|m| (f.to_string(), m))
                })
                .collect();
            PartitionSummary {
                partition,
                count: members.len(),
                averages,
            }
        })
        .collect())
}

/// Mean of a target feature over the records of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    /// Group name (e.g. the region).
    pub group: String,
    /// Records averaged.
    pub count: usize,
    /// Mean target value.
    pub average: f64,
}

/// Average `target` per group over the records of `partition`.
///
/// A record without a group borrows the group its label carries elsewhere in
/// `records` (first occurrence wins), so a year that lost its region column
/// can still be grouped. Missing or zero targets are skipped, as are records
/// with no group at all. Output is ordered by group name.
pub fn group_averages(records: &[Record], partition: i64, target: &str) -> Result<Vec<GroupAverage>> {
    validate_features(&[target])?;

    let mut known: BTreeMap<&str, &str> = BTreeMap::new();
    for record in records {
        if let Some(group) = record.group() {
            known.entry(record.label()).or_insert(group);
        }
    }

    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in records.iter().filter(|r| r.partition() == Some(partition)) {
        let Some(value) = record.value(target).filter(|&v| v != 0.0) else {
            continue;
        };
        let Some(group) = record.group().or_else(|| known.get(record.label()).copied()) else {
            continue;
        };
        let entry = sums.entry(group).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    Ok(sums
        .into_iter()
        .map(|(group, (sum, count))| GroupAverage {
            group: group.to_string(),
            count,
            average: sum / count as f64,
        })
        .collect())
}

/// One point of a label's series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Partition key.
    pub partition: i64,
    /// Feature value in that partition.
    pub value: f64,
}

/// Values of `feature` for the records labelled `label`, by ascending partition.
///
/// Records without a partition or a value are skipped.
pub fn label_trend(records: &[Record], label: &str, feature: &str) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = records
        .iter()
        .filter(|r| r.label() == label)
        .filter_map(|r| {
            Some(TrendPoint {
                partition: r.partition()?,
                value: r.value(feature)?,
            })
        })
        .collect();
    points.sort_by_key(|p| p.partition);
    points
}

/// A named score band with an inclusive lower bound.
///
/// Values below the last band's bound still count toward the last band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    /// Display name.
    pub name: String,
    /// Inclusive lower bound.
    pub min: f64,
}

impl ScoreBand {
    /// Create a band.
    pub fn new(name: impl Into<String>, min: f64) -> Self {
        Self {
            name: name.into(),
            min,
        }
    }

    /// World Happiness Report bands: 7+, 6+, 5+, 4+, and everything below.
    pub fn happiness_defaults() -> Vec<Self> {
        vec![
            Self::new("Very Happy Countries", 7.0),
            Self::new("Happy Countries", 6.0),
            Self::new("Moderately Happy Countries", 5.0),
            Self::new("Less Happy Countries", 4.0),
            Self::new("Unhappy Countries", 0.0),
        ]
    }
}

/// Number of records in one band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCount {
    /// Band name.
    pub name: String,
    /// Records falling in the band.
    pub count: usize,
}

/// Count records of `feature` per band.
///
/// Bands must be listed with strictly descending lower bounds. A value goes
/// to the first band whose bound it meets; values below every bound go to the
/// last band. Records without the feature are not counted.
pub fn score_distribution(records: &[Record], feature: &str, bands: &[ScoreBand]) -> Result<Vec<BandCount>> {
    if bands.is_empty() {
        return Err(Error::invalid_parameter("bands", "at least one band is required"));
    }
    if bands.windows(2).any(|w| !(w[0].min > w[1].min)) {
        return Err(Error::invalid_parameter(
            "bands",
            "lower bounds must be strictly descending",
        ));
    }

    let mut counts = vec![0usize; bands.len()];
    for value in records.iter().filter_map(|r| r.value(feature)) {
        let idx = bands
            .iter()
            .position(|b| value >= b.min)
            .unwrap_or(bands.len() - 1);
        counts[idx] += 1;
    }

    Ok(bands
        .iter()
        .zip(counts)
        .map(|(b, count)| BandCount {
            name: b.name.clone(),
            count,
        })
        .collect())
}

/// Ranking direction for [`rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Highest values first.
    Top,
    /// Lowest values first.
    Bottom,
}

/// A ranked record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    /// Record label.
    pub label: String,
    /// Value of the ranked feature.
    pub value: f64,
}

/// The `limit` highest or lowest records by `feature`.
///
/// Equal values keep input order.
pub fn rank(records: &[Record], feature: &str, limit: usize, order: RankOrder) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = records
        .iter()
        .filter_map(|r| {
            r.value(feature).map(|value| Ranked {
                label: r.label().to_string(),
                value,
            })
        })
        .collect();

    ranked.sort_by(|a, b| match order {
        RankOrder::Top => b.value.total_cmp(&a.value),
        RankOrder::Bottom => a.value.total_cmp(&b.value),
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(label: &str, year: i64, score: Option<f64>) -> Record {
        Record::new(label)
            .with_partition(year)
            .with_optional("score", score)
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("a", 2019, Some(7.5)),
            rec("b", 2019, Some(6.0)),
            rec("c", 2019, Some(3.2)),
            rec("d", 2020, Some(5.5)),
            rec("e", 2020, None),
            Record::new("f").with_value("score", 9.0),
        ]
    }

    #[test]
    fn latest_and_select() {
        let records = sample();
        assert_eq!(latest_partition(&records), Some(2020));
        assert_eq!(latest_partition(&[]), None);

        let y2019 = select_partition(&records, 2019);
        assert_eq!(y2019.len(), 3);
        assert!(y2019.iter().all(|r| r.partition() == Some(2019)));
    }

    #[test]
    fn averages_ignore_missing_values() {
        let out = partition_averages(&sample(), &["score", "other"]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].partition, 2019);
        assert_eq!(out[0].count, 3);
        assert!((out[0].averages["score"] - 5.566_666_666_666_667).abs() < 1e-12);
        assert!(!out[0].averages.contains_key("other"));
        assert_eq!(out[1].count, 2);
        assert_eq!(out[1].averages["score"], 5.5);
    }

    #[test]
    fn distribution_uses_inclusive_lower_bounds() {
        let out = score_distribution(&sample(), "score", &ScoreBand::happiness_defaults()).unwrap();
        let counts: Vec<usize> = out.iter().map(|b| b.count).collect();
        // 7.5 and 9.0 | 6.0 | 5.5 | - | 3.2
        assert_eq!(counts, vec![2, 1, 1, 0, 1]);
        assert_eq!(out[0].name, "Very Happy Countries");
    }

    #[test]
    fn distribution_rejects_unordered_bands() {
        let bands = vec![ScoreBand::new("low", 1.0), ScoreBand::new("high", 5.0)];
        assert!(score_distribution(&[], "score", &bands).is_err());
        assert!(score_distribution(&[], "score", &[]).is_err());
    }

    #[test]
    fn values_below_every_bound_land_in_last_band() {
        let bands = vec![ScoreBand::new("high", 5.0), ScoreBand::new("mid", 2.0)];
        let records = vec![Record::new("x").with_value("score", 0.5)];
        let out = score_distribution(&records, "score", &bands).unwrap();
        assert_eq!(out[1].count, 1);
    }

    #[test]
    fn rank_top_and_bottom() {
        let records = sample();
        let top = rank(&records, "score", 2, RankOrder::Top);
        assert_eq!(
            top.iter().map(|r| r.label.as_str()).collect::<Vec<_>>(),
            vec!["f", "a"]
        );
        let bottom = rank(&records, "score", 10, RankOrder::Bottom);
        assert_eq!(bottom.len(), 5);
        assert_eq!(bottom[0].label, "c");
    }

    #[test]
    fn group_averages_borrow_groups_from_other_partitions() {
        let records = vec![
            rec("fi", 2019, Some(7.8)).with_group("Western Europe"),
            rec("ng", 2019, Some(4.9)).with_group("Sub-Saharan Africa"),
            rec("fi", 2020, Some(7.6)),
            rec("dk", 2020, Some(7.4)).with_group("Western Europe"),
            rec("ng", 2020, Some(5.1)),
            rec("zz", 2020, Some(3.0)),
            rec("ke", 2020, Some(0.0)).with_group("Sub-Saharan Africa"),
            rec("ug", 2020, None).with_group("Sub-Saharan Africa"),
        ];

        let out = group_averages(&records, 2020, "score").unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].group, "Sub-Saharan Africa");
        assert_eq!(out[0].count, 1);
        assert_eq!(out[0].average, 5.1);
        assert_eq!(out[1].group, "Western Europe");
        assert_eq!(out[1].count, 2);
        assert!((out[1].average - 7.5).abs() < 1e-12);

        assert!(group_averages(&records, 2031, "score").unwrap().is_empty());
        assert!(group_averages(&records, 2020, "").is_err());
    }

    #[test]
    fn label_trend_is_ordered_by_partition() {
        let records = vec![
            rec("fi", 2021, Some(7.8)),
            rec("dk", 2019, Some(7.6)),
            rec("fi", 2019, Some(7.7)),
            rec("fi", 2020, None),
            Record::new("fi").with_value("score", 9.9),
            rec("fi", 2018, Some(7.6)),
        ];
        let trend = label_trend(&records, "fi", "score");
        let partitions: Vec<i64> = trend.iter().map(|p| p.partition).collect();
        assert_eq!(partitions, vec![2018, 2019, 2021]);
        assert_eq!(trend[2].value, 7.8);
        assert!(label_trend(&records, "se", "score").is_empty());
    }
}
