//! Internal quality measures for a hard partition.
//!
//! | Measure | Range | Best |
//! |---------|-------|------|
//! | [`inertia`] | [0, ∞) | lower |
//! | [`silhouette`] | [-1, 1] | higher |

use ndarray::Array2;

use super::kmeans::squared_distance;

/// Within-cluster sum of squared distances to the assigned centroid.
pub fn inertia(data: &Array2<f64>, labels: &[usize], centroids: &Array2<f64>) -> f64 {
    data.rows()
        .into_iter()
        .zip(labels)
        .filter(|(_, label)| **label < centroids.nrows())
        .map(|(point, label)| squared_distance(&point, &centroids.row(*label)))
        .sum()
}

/// Mean silhouette coefficient over all points.
///
/// For point `i` with mean intra-cluster distance `a(i)` and smallest mean
/// distance to another non-empty cluster `b(i)`:
///
/// ```text
/// s(i) = (b(i) - a(i)) / max(a(i), b(i))
/// ```
///
/// Points in singleton clusters score 0. Returns 0 for fewer than two points
/// or when only one cluster is non-empty.
pub fn silhouette(data: &Array2<f64>, labels: &[usize]) -> f64 {
    let n = data.nrows().min(labels.len());
    if n < 2 {
        return 0.0;
    }
    let n_clusters = labels[..n].iter().max().map_or(0, |&m| m + 1);

    let mut total = 0.0;
    for i in 0..n {
        let point = data.row(i);
        let mut sums = vec![0.0; n_clusters];
        let mut counts = vec![0usize; n_clusters];

        for j in (0..n).filter(|&j| j != i) {
            sums[labels[j]] += squared_distance(&point, &data.row(j)).sqrt();
            counts[labels[j]] += 1;
        }

        let own = labels[i];
        if counts[own] == 0 {
            continue;
        }
        let a = sums[own] / counts[own] as f64;
        let b = (0..n_clusters)
            .filter(|&c| c != own && counts[c] > 0)
            .map(|c| sums[c] / counts[c] as f64)
            .fold(f64::INFINITY, f64::min);

        if b.is_finite() && a.max(b) > 0.0 {
            total += (b - a) / a.max(b);
        }
    }

    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn inertia_sums_squared_distances() {
        let data = array![[0.0], [2.0], [10.0]];
        let centroids = array![[1.0], [10.0]];
        assert_eq!(inertia(&data, &[0, 0, 1], &centroids), 2.0);
    }

    #[test]
    fn silhouette_of_separated_clusters_is_high() {
        let data = array![[0.0], [1.0], [10.0], [11.0]];
        let s = silhouette(&data, &[0, 0, 1, 1]);
        assert!(s > 0.8, "silhouette {s}");

        let bad = silhouette(&data, &[0, 1, 0, 1]);
        assert!(bad < 0.0, "silhouette {bad}");
    }

    #[test]
    fn silhouette_degenerate_cases() {
        let data = array![[0.0], [1.0]];
        assert_eq!(silhouette(&data, &[0, 0]), 0.0);
        assert_eq!(silhouette(&array![[0.0]], &[0]), 0.0);
        // Singleton clusters contribute 0.
        assert_eq!(silhouette(&data, &[0, 1]), 0.0);
    }
}
