//! Post-run reporting over an [`AssignResult`].
//!
//! Fallback commits never raise errors. Whether the final partition honors
//! its limits is read off the result afterwards, via [`AssignResult::violations`].

use super::distance::squared_distance;
use super::runner::AssignResult;
use super::types::{Coordinate, Point};

/// Occupancy and headroom of one cluster after a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterReport {
    /// Cluster id.
    pub cluster: usize,
    /// Points assigned.
    pub stops: usize,
    /// Summed weight assigned.
    pub weight: f64,
    /// Declared stop limit, if any.
    pub stop_limit: Option<usize>,
    /// Declared weight limit, if any.
    pub weight_limit: Option<f64>,
}

impl ClusterReport {
    /// Stops left before the limit (negative when exceeded).
    pub fn stop_headroom(&self) -> Option<i128> {
        self.stop_limit.map(|limit| limit as i128 - self.stops as i128)
    }

    /// Weight left before the limit (negative when exceeded).
    pub fn weight_headroom(&self) -> Option<f64> {
        self.weight_limit.map(|limit| limit - self.weight)
    }
}

/// A limit exceeded in the final partition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LimitViolation {
    /// Cluster holds more points than its stop limit.
    Stops {
        cluster: usize,
        count: usize,
        limit: usize,
    },
    /// Cluster holds more weight than its weight limit.
    Weight {
        cluster: usize,
        weight: f64,
        limit: f64,
    },
}

impl LimitViolation {
    /// The offending cluster.
    pub fn cluster(&self) -> usize {
        match *self {
            LimitViolation::Stops { cluster, .. } | LimitViolation::Weight { cluster, .. } => {
                cluster
            }
        }
    }
}

impl AssignResult {
    /// Number of clusters in the run.
    pub fn n_clusters(&self) -> usize {
        self.stop_counts.len()
    }

    /// Input indices of the points assigned to `cluster`, in input order.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Per-cluster occupancy against the limits applied in the run.
    pub fn cluster_reports(&self) -> Vec<ClusterReport> {
        (0..self.n_clusters())
            .map(|cluster| ClusterReport {
                cluster,
                stops: self.stop_counts[cluster],
                weight: self.weight_sums[cluster],
                stop_limit: self.limits.stop_limit(cluster),
                weight_limit: self.limits.weight_limit(cluster),
            })
            .collect()
    }

    /// Every limit exceeded by the final partition, by cluster id.
    ///
    /// Empty whenever no fallback commit happened.
    pub fn violations(&self) -> Vec<LimitViolation> {
        let mut out = Vec::new();
        for report in self.cluster_reports() {
            if let Some(limit) = report.stop_limit {
                if report.stops > limit {
                    out.push(LimitViolation::Stops {
                        cluster: report.cluster,
                        count: report.stops,
                        limit,
                    });
                }
            }
            if let Some(limit) = report.weight_limit {
                if report.weight > limit {
                    out.push(LimitViolation::Weight {
                        cluster: report.cluster,
                        weight: report.weight,
                        limit,
                    });
                }
            }
        }
        out
    }

    /// Whether every cluster ends within its limits.
    pub fn is_feasible(&self) -> bool {
        self.violations().is_empty()
    }

    /// Sum of squared distances from each point to its assigned centroid.
    ///
    /// `points` and `centroids` must be the inputs of the run. Returns
    /// `None` when their lengths do not match the run.
    pub fn within_cluster_sse(&self, points: &[Point], centroids: &[Coordinate]) -> Option<f64> {
        if points.len() != self.labels.len() || centroids.len() != self.n_clusters() {
            return None;
        }
        let sse = points
            .iter()
            .zip(&self.labels)
            .map(|(p, &label)| squared_distance(&p.coord, &centroids[label]))
            .sum();
        Some(sse)
    }
}
