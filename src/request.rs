//! Serializable request/response envelopes (`serde` feature).
//!
//! Used by the JavaScript bindings, and usable by any host that feeds the
//! engine from JSON or another serde format.

use crate::assign::{AssignConfig, AssignResult, AssignRunner, CapacityLimits, Coordinate, Point};
use crate::error::Result;
use crate::kmeans::{Kmeans, KmeansConfig};
use serde::{Deserialize, Serialize};

/// Assign points to known centroids.
///
/// `limits` and `config` may be omitted (no limits, default config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub points: Vec<Point>,
    pub centroids: Vec<Coordinate>,
    #[serde(default)]
    pub limits: CapacityLimits,
    #[serde(default)]
    pub config: Option<AssignConfig>,
}

impl AssignRequest {
    /// Runs the assignment.
    pub fn run(&self) -> Result<AssignResult> {
        let config = self.config.clone().unwrap_or_default();
        AssignRunner::run(&self.points, &self.centroids, &self.limits, &config)
    }
}

/// Discover `n_clusters` centroids with k-means, then assign.
///
/// `seed` overrides the k-means default seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub points: Vec<Point>,
    pub n_clusters: usize,
    #[serde(default)]
    pub limits: CapacityLimits,
    #[serde(default)]
    pub config: Option<AssignConfig>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Centroids found by k-means and the constrained assignment against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub centroids: Vec<Coordinate>,
    pub assignment: AssignResult,
}

impl PlanRequest {
    /// Fits centroids, then runs the assignment.
    pub fn run(&self) -> Result<PlanResponse> {
        let mut kmeans_config = KmeansConfig::new(self.n_clusters);
        if let Some(seed) = self.seed {
            kmeans_config = kmeans_config.with_seed(seed);
        }
        let fit = Kmeans::new(kmeans_config).fit(&self.points)?;

        let config = self.config.clone().unwrap_or_default();
        let assignment = AssignRunner::run(&self.points, &fit.centroids, &self.limits, &config)?;

        Ok(PlanResponse {
            centroids: fit.centroids,
            assignment,
        })
    }
}
