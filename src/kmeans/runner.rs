//! K-means++ seeding and Lloyd iterations.

use super::config::KmeansConfig;
use crate::assign::{nearest, squared_distance, Coordinate, Point};
use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KmeansFit {
    /// Final centroids; index is the cluster id.
    pub centroids: Vec<Coordinate>,

    /// Nearest-centroid label per point (unconstrained).
    pub labels: Vec<usize>,

    /// Lloyd iterations executed.
    pub iterations: usize,

    /// Whether the centroids settled within tolerance.
    pub converged: bool,

    /// Sum of squared distances to the nearest centroid.
    pub inertia: f64,
}

/// Unconstrained k-means on point coordinates.
///
/// Produces the centroids consumed by [`AssignRunner`](crate::assign::AssignRunner).
/// Point weights are ignored here; capacity is handled by the assignment
/// step.
///
/// # Examples
///
/// ```
/// use u_geocluster::assign::Point;
/// use u_geocluster::kmeans::{Kmeans, KmeansConfig};
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(0.1, 0.1),
///     Point::new(10.0, 10.0),
///     Point::new(10.1, 10.1),
/// ];
/// let fit = Kmeans::new(KmeansConfig::new(2)).fit(&points).unwrap();
/// assert_eq!(fit.labels[0], fit.labels[1]);
/// assert_ne!(fit.labels[0], fit.labels[2]);
/// ```
#[derive(Debug, Clone)]
pub struct Kmeans {
    config: KmeansConfig,
}

impl Kmeans {
    /// Creates a k-means model.
    pub fn new(config: KmeansConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &KmeansConfig {
        &self.config
    }

    /// Fits centroids to `points`.
    #[instrument(
        name = "kmeans",
        skip_all,
        fields(n_points = points.len(), k = self.config.n_clusters)
    )]
    pub fn fit(&self, points: &[Point]) -> Result<KmeansFit> {
        self.config.validate()?;
        let k = self.config.n_clusters;
        if k > points.len() {
            return Err(Error::InvalidConfig(format!(
                "n_clusters ({k}) exceeds number of points ({})",
                points.len()
            )));
        }
        for (index, point) in points.iter().enumerate() {
            point.validate(index)?;
        }

        let coords: Vec<Coordinate> = points.iter().map(|p| p.coord).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut centroids = plus_plus_init(&coords, k, &mut rng);

        let mut labels = self.assign_nearest(&coords, &centroids);
        let mut iterations = 0usize;
        let mut converged = false;
        let tol_sq = self.config.tolerance * self.config.tolerance;

        while iterations < self.config.max_iterations {
            let updated = update_centroids(&coords, &labels, &centroids);
            let max_shift = centroids
                .iter()
                .zip(&updated)
                .map(|(a, b)| squared_distance(a, b))
                .fold(0.0, f64::max);

            centroids = updated;
            labels = self.assign_nearest(&coords, &centroids);
            iterations += 1;

            if max_shift <= tol_sq {
                converged = true;
                break;
            }
        }

        let inertia = coords
            .iter()
            .zip(&labels)
            .map(|(p, &c)| squared_distance(p, &centroids[c]))
            .sum();

        debug!(iterations, converged, inertia, "k-means finished");

        Ok(KmeansFit {
            centroids,
            labels,
            iterations,
            converged,
            inertia,
        })
    }

    fn assign_nearest(&self, coords: &[Coordinate], centroids: &[Coordinate]) -> Vec<usize> {
        let label = |p: &Coordinate| nearest(p, centroids).unwrap_or(0);

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            return coords.par_iter().map(label).collect();
        }

        coords.iter().map(label).collect()
    }
}

/// k-means++ seeding: each next seed is drawn with probability
/// proportional to its squared distance from the nearest existing seed.
fn plus_plus_init<R: Rng>(coords: &[Coordinate], k: usize, rng: &mut R) -> Vec<Coordinate> {
    let n = coords.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(coords[rng.random_range(0..n)]);

    let mut d2: Vec<f64> = coords
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = d2.iter().sum();
        let next = if total > 0.0 {
            pick_weighted(&d2, rng.random::<f64>() * total)
        } else {
            // All remaining points coincide with a seed.
            rng.random_range(0..n)
        };

        let seed = coords[next];
        for (d, p) in d2.iter_mut().zip(coords) {
            *d = d.min(squared_distance(p, &seed));
        }
        centroids.push(seed);
    }

    centroids
}

/// Index whose cumulative weight interval contains `target`.
///
/// If rounding leaves `target` past the end, returns the last index with a
/// positive weight, never an existing seed. `weights` must have a positive
/// entry.
fn pick_weighted(weights: &[f64], mut target: f64) -> usize {
    for (i, &w) in weights.iter().enumerate() {
        if target < w {
            return i;
        }
        target -= w;
    }
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Mean of each cluster's members. Empty clusters keep their centroid.
fn update_centroids(
    coords: &[Coordinate],
    labels: &[usize],
    centroids: &[Coordinate],
) -> Vec<Coordinate> {
    let k = centroids.len();
    let mut sums = vec![(0.0f64, 0.0f64); k];
    let mut counts = vec![0usize; k];

    for (p, &c) in coords.iter().zip(labels) {
        sums[c].0 += p.lon;
        sums[c].1 += p.lat;
        counts[c] += 1;
    }

    (0..k)
        .map(|c| {
            if counts[c] == 0 {
                centroids[c]
            } else {
                let n = counts[c] as f64;
                Coordinate::new(sums[c].0 / n, sums[c].1 / n)
            }
        })
        .collect()
}
