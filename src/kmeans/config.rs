//! K-means configuration.

use crate::error::{Error, Result};

/// Configuration for k-means centroid discovery.
///
/// # Examples
///
/// ```
/// use u_geocluster::kmeans::KmeansConfig;
///
/// let config = KmeansConfig::new(6)
///     .with_max_iterations(1)
///     .with_seed(7);
/// assert_eq!(config.n_clusters, 6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KmeansConfig {
    /// Number of clusters (K).
    pub n_clusters: usize,

    /// Maximum Lloyd iterations after seeding. 0 returns the seeds as-is.
    pub max_iterations: usize,

    /// Stop once no centroid moves farther than this.
    pub tolerance: f64,

    /// Random seed for k-means++ seeding.
    pub seed: u64,

    /// Assign points to centroids in parallel (needs the `parallel` feature).
    pub parallel: bool,
}

impl KmeansConfig {
    /// Creates a config for `n_clusters` clusters with default settings.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iterations: 100,
            tolerance: 1e-9,
            seed: 42,
            parallel: false,
        }
    }

    /// Sets the maximum number of Lloyd iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the centroid movement tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel point assignment.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::NoClusters);
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
