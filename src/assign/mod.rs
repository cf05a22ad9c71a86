//! Capacity-constrained cluster assignment.
//!
//! Assigns each point to one of `K` clusters given fixed centroids and
//! optional per-cluster limits on stop count and cumulative weight.
//!
//! # Algorithm
//!
//! Points are processed once, in input order:
//!
//! 1. Rank clusters by squared distance from the point to each centroid
//!    (ties by cluster id).
//! 2. Commit the point to the first cluster in that ranking that can
//!    still take it without exceeding a limit.
//! 3. If no cluster can, commit it to the cluster whose limits would be
//!    exceeded the least (ties go to the nearer cluster).
//!
//! Every point therefore receives a label. The ledger of per-cluster
//! occupancy only grows; there is no backtracking.
//!
//! The result is order-dependent: earlier points claim tight clusters
//! first. This is a greedy heuristic, not an optimal solver.
//!
//! # Complexity
//!
//! O(n · K log K) for n points and K clusters.
//!
//! # Preconditions
//!
//! Before any point is processed the run is rejected when limit lengths
//! differ from `K`, when a coordinate or weight is not finite, or when the
//! summed limits cannot hold every point or all of the weight. Overflow
//! caused by the greedy order is not an error; inspect
//! [`AssignResult::violations`] instead.

mod config;
mod distance;
mod feasibility;
mod ledger;
mod report;
mod runner;
mod types;

pub use config::{AssignConfig, LimitOrder};
pub use distance::{nearest, rank, squared_distance};
pub use feasibility::{is_feasible, overflow, Overflow, OverflowPolicy};
pub use ledger::{CapacityLedger, ClusterLoad};
pub use report::{ClusterReport, LimitViolation};
pub use runner::{assign, AssignJob, AssignResult, AssignRunner, Commit, CommitKind};
pub use types::{CapacityLimits, Coordinate, Point};
