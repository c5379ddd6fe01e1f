//! Grouping records by normalized multi-factor similarity.
//!
//! The pipeline is:
//!
//! 1. [`ZScore`] standardizes each feature column, so a factor measured on a
//!    large scale cannot dominate the distance.
//! 2. [`Kmeans`] partitions the standardized rows.
//! 3. [`ClusterNamer`] labels each centroid by its strongest deviations, e.g.
//!    `"High Economy • Low Corruption"`.
//! 4. [`inertia`] and [`silhouette`] report how tight the result is.
//!
//! ## K-means
//!
//! Assign each point to the nearest centroid, then move each centroid to the
//! mean of its points. Repeat until no point changes cluster.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! ## Z-scores and naming
//!
//! Centroids live in standardized space: a centroid coordinate of `+1.2` for
//! economy means "1.2 standard deviations above the average record". That is
//! what makes the names comparable across factors.
//!
//! ## Usage
//!
//! ```rust
//! use glean::cluster::{Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(7).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//! ```

mod kmeans;
mod naming;
mod normalize;
mod quality;
mod traits;

pub use kmeans::{Kmeans, KmeansFit, DEFAULT_MAX_ITER};
pub use naming::ClusterNamer;
pub use normalize::ZScore;
pub use quality::{inertia, silhouette};
pub use traits::Clustering;

use std::collections::BTreeMap;

use serde::Serialize;

/// A named cluster of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// Cluster index, `0..k`.
    pub id: usize,
    /// Name derived from the centroid.
    pub name: String,
    /// Free-text description of how the cluster was formed.
    pub description: String,
    /// Centroid coordinate per feature, in z-score units.
    pub centroid: BTreeMap<String, f64>,
    /// Labels of the member records.
    pub members: Vec<String>,
    /// Number of members.
    pub size: usize,
}
