//! K-means clustering.
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS).
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids via k-means++
//! 2. **Assign**: Each point → nearest centroid
//! 3. **Update**: Each centroid → mean of assigned points
//! 4. Repeat until no assignment changes, or `max_iter` is reached
//!
//! WCSS never increases from one iteration to the next and there are finitely
//! many partitions, so the loop terminates even without the iteration cap.
//!
//! ## K-means++ Initialization
//!
//! 1. Choose first centroid uniformly at random
//! 2. Choose next centroid with probability proportional to D(x)²
//!    (squared distance to nearest existing centroid)
//!
//! Provides provable O(log k) approximation to optimal WCSS.
//!
//! # Randomness
//!
//! Seeding is the only random step. [`Kmeans::fit`] takes the generator as an
//! argument, so identical input and an identically seeded generator always
//! give identical labels.
//!
//! # Empty clusters
//!
//! A centroid that loses all its points keeps its previous position; its
//! cluster is reported with size 0 rather than re-seeded or dropped.

use super::quality::inertia;
use super::traits::Clustering;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;
use tracing::{debug, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 100;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Random seed used by [`Clustering::fit_predict`].
    seed: Option<u64>,
}

/// Result of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansFit {
    /// Final centroids, one row per cluster.
    pub centroids: Array2<f64>,
    /// Cluster index per input point.
    pub labels: Vec<usize>,
    /// Lloyd iterations performed.
    pub iterations: usize,
    /// Whether the last iteration changed no assignment.
    pub converged: bool,
    /// Within-cluster sum of squared distances.
    pub inertia: f64,
}

impl KmeansFit {
    /// Number of points per cluster, including empty clusters.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.nrows()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Maximum iterations.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Check `k`, `max_iter`, and that `n` points are enough for `k` clusters.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.k < 2 {
            return Err(Error::invalid_parameter(
                "k",
                format!("must be at least 2, got {}", self.k),
            ));
        }
        if self.max_iter == 0 {
            return Err(Error::invalid_parameter("max_iter", "must be at least 1"));
        }
        if n < self.k {
            return Err(Error::InsufficientData {
                required: self.k,
                available: n,
            });
        }
        Ok(())
    }

    /// Initialize centroids using k-means++ algorithm.
    fn init_centroids<R: Rng + ?Sized>(&self, data: &Array2<f64>, rng: &mut R) -> Array2<f64> {
        let n = data.nrows();
        let d = data.ncols();
        let mut centroids = Array2::zeros((self.k, d));

        // First centroid: random point
        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        // Remaining centroids: k-means++ selection
        for i in 1..self.k {
            let distances: Vec<f64> = data
                .rows()
                .into_iter()
                .map(|point| {
                    (0..i)
                        .map(|c| squared_distance(&point, &centroids.row(c)))
                        .fold(f64::MAX, f64::min)
                })
                .collect();

            // Sample proportional to squared distance
            let total: f64 = distances.iter().sum();
            if total == 0.0 {
                let idx = rng.random_range(0..n);
                centroids.row_mut(i).assign(&data.row(idx));
                continue;
            }

            let threshold = rng.random::<f64>() * total;
            let mut cumsum = 0.0;
            // Fallback for rounding: the last point with any weight.
            let mut selected = distances.iter().rposition(|&d| d > 0.0).unwrap_or(0);

            for (j, &d) in distances.iter().enumerate() {
                cumsum += d;
                if cumsum > threshold {
                    selected = j;
                    break;
                }
            }

            centroids.row_mut(i).assign(&data.row(selected));
        }

        centroids
    }

    /// Run k-means on a (normally standardized) matrix with an injected RNG.
    ///
    /// Requires `2 <= k <= n`; fewer points than clusters is reported as
    /// [`Error::InsufficientData`].
    pub fn fit<R: Rng + ?Sized>(&self, data: &Array2<f64>, rng: &mut R) -> Result<KmeansFit> {
        let (n, d) = data.dim();
        self.validate(n)?;

        debug!(n, d, k = self.k, max_iter = self.max_iter, "running k-means");

        let mut centroids = self.init_centroids(data, rng);
        let mut labels = vec![0usize; n];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            // Assignment step
            let assigned = assign(data, &centroids);
            let changed = assigned
                .iter()
                .zip(labels.iter())
                .filter(|(a, b)| a != b)
                .count();
            labels = assigned;

            // Update step
            let mut sums = Array2::<f64>::zeros((self.k, d));
            let mut counts = vec![0usize; self.k];
            for (point, &label) in data.rows().into_iter().zip(labels.iter()) {
                let mut row = sums.row_mut(label);
                row += &point;
                counts[label] += 1;
            }
            for (c, &count) in counts.iter().enumerate() {
                if count > 0 {
                    let mean = &sums.row(c) / count as f64;
                    centroids.row_mut(c).assign(&mean);
                }
            }

            trace!(iteration = iterations, changed, "k-means iteration");

            if changed == 0 {
                converged = true;
                break;
            }
        }

        let fit = KmeansFit {
            inertia: inertia(data, &labels, &centroids),
            centroids,
            labels,
            iterations,
            converged,
        };

        let empty = fit.cluster_sizes().iter().filter(|&&s| s == 0).count();
        if empty > 0 {
            warn!(empty, k = self.k, "k-means finished with empty clusters");
        }
        debug!(
            iterations,
            converged,
            inertia = fit.inertia,
            "k-means finished"
        );

        Ok(fit)
    }
}

/// Nearest-centroid index per point; ties go to the lower index.
fn assign(data: &Array2<f64>, centroids: &Array2<f64>) -> Vec<usize> {
    let nearest = |point: ArrayView1<'_, f64>| {
        let mut best_cluster = 0;
        let mut best_dist = f64::MAX;
        for (k, centroid) in centroids.rows().into_iter().enumerate() {
            let dist = squared_distance(&point, &centroid);
            if dist < best_dist {
                best_dist = dist;
                best_cluster = k;
            }
        }
        best_cluster
    };

    #[cfg(feature = "parallel")]
    {
        (0..data.nrows())
            .into_par_iter()
            .map(|i| nearest(data.row(i)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        data.rows().into_iter().map(nearest).collect()
    }
}

/// Compute squared Euclidean distance.
pub(crate) fn squared_distance(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }

        let n = data.len();
        let d = data[0].len();

        // Convert to ndarray
        let mut flat: Vec<f64> = Vec::with_capacity(n * d);
        for point in data {
            if point.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: point.len(),
                });
            }
            flat.extend(point);
        }
        let data_arr = Array2::from_shape_vec((n, d), flat).map_err(|_| Error::DimensionMismatch {
            expected: n * d,
            found: data.iter().map(Vec::len).sum(),
        })?;

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        Ok(self.fit(&data_arr, &mut rng)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
