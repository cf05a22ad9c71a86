//! Error types.

use std::fmt;
use thiserror::Error;

/// Capacity resource named in a shortfall error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resource {
    /// Number of stops (points) per cluster.
    Stops,
    /// Cumulative point weight per cluster.
    Weight,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Stops => f.write_str("stops"),
            Resource::Weight => f.write_str("weight"),
        }
    }
}

/// Errors returned by the assignment engine and its collaborators.
///
/// Every variant is raised before any point is processed; a run either
/// fails up front or produces a complete labeling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Declared limits cannot hold every point (or all the weight).
    #[error(
        "{resource} capacity too small: data totals {total}, limits allow only {capacity} \
         (short by {})",
        .total - .capacity
    )]
    CapacityShortfall {
        /// Which limit family is short.
        resource: Resource,
        /// Total demand in the input (point count or summed weight).
        total: f64,
        /// Sum of the declared limits.
        capacity: f64,
    },

    /// A per-cluster sequence has the wrong length.
    #[error("shape mismatch for {what}: expected {expected} entries, found {found}")]
    ShapeMismatch {
        /// Name of the offending sequence.
        what: &'static str,
        /// Number of centroids (K).
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// A point carries a non-finite coordinate or an invalid weight.
    #[error("invalid point at index {index}: {reason}")]
    InvalidPoint {
        /// Input index of the point.
        index: usize,
        /// Human-readable explanation.
        reason: &'static str,
    },

    /// A centroid carries a non-finite coordinate.
    #[error("invalid centroid at index {index}: non-finite coordinate")]
    InvalidCentroid {
        /// Cluster id of the centroid.
        index: usize,
    },

    /// A weight limit is negative or non-finite.
    #[error("invalid limit for cluster {index}: {reason}")]
    InvalidLimit {
        /// Cluster id of the limit.
        index: usize,
        /// Human-readable explanation.
        reason: &'static str,
    },

    /// Points were given but there is no cluster to put them in.
    #[error("no clusters: at least one centroid is required")]
    NoClusters,

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
