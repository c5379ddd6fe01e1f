//! The seam between clustering algorithms and record data.

use crate::error::Result;
use crate::record::{FeatureMatrix, Record};

/// A hard partition of points into [`n_clusters`](Clustering::n_clusters) groups.
pub trait Clustering {
    /// Cluster index per row of `data`.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// Number of clusters produced.
    fn n_clusters(&self) -> usize;

    /// Cluster records on raw (unscaled) `features`.
    ///
    /// Records missing any feature are skipped. Returns `(label, cluster)`
    /// pairs in record order.
    fn fit_predict_records(&self, records: &[Record], features: &[&str]) -> Result<Vec<(String, usize)>> {
        let matrix = FeatureMatrix::from_records(records, features)?;
        let rows: Vec<Vec<f64>> = matrix.data.rows().into_iter().map(|r| r.to_vec()).collect();
        let assignments = self.fit_predict(&rows)?;
        Ok(matrix.labels.into_iter().zip(assignments).collect())
    }
}
