//! Capacity-constrained geographic clustering.
//!
//! Partitions delivery/service points into a fixed number of route
//! clusters that are geographically compact and respect per-cluster
//! limits on stop count and cumulative weight.
//!
//! - **Assignment** ([`assign`]): given centroids and limits, commits each
//!   point to its nearest cluster with room left, falling back to the
//!   least-overflowing cluster when none has room. Single pass, greedy,
//!   deterministic.
//! - **K-means** ([`kmeans`]): unconstrained centroid discovery that feeds
//!   the assignment step. Any other source of centroids works too.
//!
//! # Example
//!
//! ```
//! use u_geocluster::assign::{assign, CapacityLimits, Coordinate, Point};
//!
//! let points = vec![
//!     Point::new(0.0, 0.0).with_weight(5.0),
//!     Point::new(0.2, 0.1).with_weight(5.0),
//!     Point::new(9.8, 0.0).with_weight(3.0),
//! ];
//! let centroids = [Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 0.0)];
//! let limits = CapacityLimits::none().with_weights(vec![6.0, 10.0]);
//!
//! let result = assign(&points, &centroids, &limits).unwrap();
//! assert_eq!(result.labels, vec![0, 1, 1]);
//! assert!(result.is_feasible());
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for all public data types, plus the
//!   `request` envelopes.
//! - `parallel`: rayon-backed batch runs and k-means assignment.
//! - `wasm`: JavaScript bindings.

pub mod assign;
pub mod error;
pub mod kmeans;

#[cfg(feature = "serde")]
pub mod request;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Resource, Result};
