//! Assignment driver.
//!
//! [`AssignRunner`] walks the points in input order and commits each one
//! exactly once: to the nearest feasible cluster when there is one,
//! otherwise to the cluster with the least overflow.

use super::config::{AssignConfig, LimitOrder};
use super::distance::rank;
use super::feasibility::{is_feasible, overflow, Overflow, OverflowPolicy};
use super::ledger::{CapacityLedger, ClusterLoad};
use super::types::{CapacityLimits, Coordinate, Point};
use crate::error::{Error, Resource, Result};
use tracing::{debug, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How a point ended up in its cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommitKind {
    /// The cluster had room for the point.
    Feasible,
    /// No cluster had room; the least-overflow cluster took it anyway.
    Fallback,
}

/// One committed point, recorded when
/// [`AssignConfig::record_history`] is set.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Commit {
    /// Input index of the point.
    pub point: usize,
    /// Cluster the point was committed to.
    pub cluster: usize,
    /// Feasible or fallback commit.
    pub kind: CommitKind,
    /// Overflow caused by the commit (zero for feasible commits).
    pub overflow: Overflow,
    /// Cluster occupancy right after the commit.
    pub load_after: ClusterLoad,
}

/// Result of an assignment run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignResult {
    /// Cluster id per point, parallel to the input points.
    pub labels: Vec<usize>,

    /// Final number of points per cluster.
    pub stop_counts: Vec<usize>,

    /// Final summed weight per cluster.
    pub weight_sums: Vec<f64>,

    /// Number of points committed through the least-overflow fallback.
    pub fallback_count: usize,

    /// Limits as applied during the run (after [`LimitOrder`] pairing).
    pub limits: CapacityLimits,

    /// Per-point commit log. Empty unless history recording was enabled.
    pub history: Vec<Commit>,
}

/// One independent assignment problem, for batch execution.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignJob {
    /// Points to assign, in processing order.
    pub points: Vec<Point>,
    /// Cluster centroids.
    pub centroids: Vec<Coordinate>,
    /// Capacity limits.
    #[cfg_attr(feature = "serde", serde(default))]
    pub limits: CapacityLimits,
}

/// Executes capacity-constrained assignment.
///
/// # Usage
///
/// ```
/// use u_geocluster::assign::{AssignConfig, AssignRunner, CapacityLimits, Coordinate, Point};
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 1.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 1.0),
/// ];
/// let centroids = [Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 0.0)];
/// let limits = CapacityLimits::none().with_stops(vec![1, 3]);
///
/// let result = AssignRunner::run(&points, &centroids, &limits, &AssignConfig::default()).unwrap();
/// assert_eq!(result.labels, vec![0, 1, 1, 1]);
/// assert_eq!(result.stop_counts, vec![1, 3]);
/// ```
pub struct AssignRunner;

impl AssignRunner {
    /// Runs one assignment.
    ///
    /// Input is validated up front; on error no point is processed. Point
    /// order matters: earlier points get first claim on tight clusters.
    #[instrument(
        name = "assign",
        skip_all,
        fields(n_points = points.len(), n_clusters = centroids.len())
    )]
    pub fn run(
        points: &[Point],
        centroids: &[Coordinate],
        limits: &CapacityLimits,
        config: &AssignConfig,
    ) -> Result<AssignResult> {
        config.validate()?;

        let limits = match config.limit_order {
            LimitOrder::AsGiven => limits.clone(),
            LimitOrder::Descending => limits.sorted_descending(),
        };

        check_preconditions(points, centroids, &limits, config.default_weight)?;

        Ok(drive(points, centroids, limits, config))
    }

    /// Runs independent jobs, each with its own ledger.
    ///
    /// Results are returned in job order. With the `parallel` feature the
    /// jobs run concurrently; points within a job are still processed
    /// strictly in sequence.
    pub fn run_batch(jobs: &[AssignJob], config: &AssignConfig) -> Vec<Result<AssignResult>> {
        let run_job = |job: &AssignJob| Self::run(&job.points, &job.centroids, &job.limits, config);

        #[cfg(feature = "parallel")]
        {
            jobs.par_iter().map(run_job).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            jobs.iter().map(run_job).collect()
        }
    }
}

/// Assigns points with the default configuration.
///
/// Shorthand for [`AssignRunner::run`] with [`AssignConfig::default`].
pub fn assign(
    points: &[Point],
    centroids: &[Coordinate],
    limits: &CapacityLimits,
) -> Result<AssignResult> {
    AssignRunner::run(points, centroids, limits, &AssignConfig::default())
}

/// Rejects inputs that cannot produce a meaningful run.
fn check_preconditions(
    points: &[Point],
    centroids: &[Coordinate],
    limits: &CapacityLimits,
    default_weight: f64,
) -> Result<()> {
    let k = centroids.len();
    if k == 0 && !points.is_empty() {
        return Err(Error::NoClusters);
    }
    limits.validate_shape(k)?;

    if let Some(index) = centroids.iter().position(|c| !c.is_finite()) {
        return Err(Error::InvalidCentroid { index });
    }
    for (index, point) in points.iter().enumerate() {
        point.validate(index)?;
    }

    if let Some(stops) = &limits.stops {
        // Widened so near-`usize::MAX` limits cannot overflow the total.
        let capacity: u128 = stops.iter().map(|&s| s as u128).sum();
        if points.len() as u128 > capacity {
            return Err(Error::CapacityShortfall {
                resource: Resource::Stops,
                total: points.len() as f64,
                capacity: capacity as f64,
            });
        }
    }
    if let Some(weights) = &limits.weights {
        let capacity: f64 = weights.iter().sum();
        let total: f64 = points.iter().map(|p| p.weight_or(default_weight)).sum();
        if total > capacity {
            return Err(Error::CapacityShortfall {
                resource: Resource::Weight,
                total,
                capacity,
            });
        }
    }
    Ok(())
}

/// Outcome of the ranked walk for one point.
struct Decision {
    cluster: usize,
    kind: CommitKind,
    overflow: Overflow,
}

/// Walks `ranked` nearest-first and picks the commit target.
///
/// Returns the first feasible cluster. If none is feasible, returns the
/// cluster with the smallest overflow score over the whole list; ties go
/// to the earlier (nearer) cluster. `ranked` must be non-empty.
fn decide(
    ranked: &[usize],
    weight: f64,
    ledger: &CapacityLedger,
    limits: &CapacityLimits,
    policy: &OverflowPolicy,
) -> Decision {
    let mut best: Option<(usize, Overflow, f64)> = None;

    for &cluster in ranked {
        if is_feasible(cluster, weight, ledger, limits) {
            return Decision {
                cluster,
                kind: CommitKind::Feasible,
                overflow: Overflow::default(),
            };
        }

        let over = overflow(cluster, weight, ledger, limits);
        let score = policy.score(&over);
        if best.is_none_or(|(_, _, best_score)| score < best_score) {
            best = Some((cluster, over, score));
        }
    }

    let (cluster, overflow, _) = best.unwrap_or((ranked[0], Overflow::default(), 0.0));
    Decision {
        cluster,
        kind: CommitKind::Fallback,
        overflow,
    }
}

/// The single-pass greedy loop. Assumes validated input.
pub(crate) fn drive(
    points: &[Point],
    centroids: &[Coordinate],
    limits: CapacityLimits,
    config: &AssignConfig,
) -> AssignResult {
    debug!(
        stop_limits = limits.stops.is_some(),
        weight_limits = limits.weights.is_some(),
        "starting constrained assignment"
    );

    let mut ledger = CapacityLedger::new(centroids.len());
    let mut labels = Vec::with_capacity(points.len());
    let mut history = Vec::with_capacity(if config.record_history {
        points.len()
    } else {
        0
    });
    let mut fallback_count = 0usize;

    for (index, point) in points.iter().enumerate() {
        let weight = point.weight_or(config.default_weight);
        let ranked = rank(&point.coord, centroids);
        let decision = decide(&ranked, weight, &ledger, &limits, &config.policy);

        if decision.kind == CommitKind::Fallback {
            fallback_count += 1;
            warn!(
                point = index,
                cluster = decision.cluster,
                stop_overflow = decision.overflow.stops,
                weight_overflow = decision.overflow.weight,
                "no feasible cluster; committing to least-overflow cluster"
            );
        }

        let load_after = ledger.commit(decision.cluster, weight);
        labels.push(decision.cluster);

        if config.record_history {
            history.push(Commit {
                point: index,
                cluster: decision.cluster,
                kind: decision.kind,
                overflow: decision.overflow,
                load_after,
            });
        }
    }

    debug!(
        assigned = labels.len(),
        fallbacks = fallback_count,
        "constrained assignment finished"
    );

    AssignResult {
        labels,
        stop_counts: ledger.stop_counts(),
        weight_sums: ledger.weight_sums(),
        fallback_count,
        limits,
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lon: f64, lat: f64) -> Coordinate {
        Coordinate::new(lon, lat)
    }

    fn unit_points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn history_config() -> AssignConfig {
        AssignConfig::default().with_history(true)
    }

    #[test]
    fn test_nearest_first_when_unconstrained() {
        let points = unit_points(&[(0.0, 0.0), (9.0, 0.0), (1.0, 1.0), (11.0, -1.0)]);
        let centroids = [c(0.0, 0.0), c(10.0, 0.0)];
        let result = assign(&points, &centroids, &CapacityLimits::none()).unwrap();
        assert_eq!(result.labels, vec![0, 1, 0, 1]);
        assert_eq!(result.stop_counts, vec![2, 2]);
        assert_eq!(result.fallback_count, 0);
    }

    #[test]
    fn test_full_cluster_pushes_point_to_next_nearest() {
        let points = unit_points(&[(0.0, 0.0), (0.0, 1.0), (10.0, 0.0), (10.0, 1.0)]);
        let centroids = [c(0.0, 0.0), c(10.0, 0.0)];
        let limits = CapacityLimits::none().with_stops(vec![1, 3]);

        let result = assign(&points, &centroids, &limits).unwrap();
        assert_eq!(result.labels, vec![0, 1, 1, 1]);
        assert_eq!(result.stop_counts, vec![1, 3]);
        assert_eq!(result.weight_sums, vec![1.0, 3.0]);
        assert_eq!(result.fallback_count, 0);
    }

    #[test]
    fn test_single_cluster_overflow_commits_anyway() {
        // Stop limits summing below the point count are rejected by `run`,
        // so this exercises the driver directly.
        let points = unit_points(&[(0.0, 0.0), (0.5, 0.5)]);
        let centroids = [c(0.0, 0.0)];
        let limits = CapacityLimits::none().with_stops(vec![1]);

        let result = drive(&points, &centroids, limits, &history_config());
        assert_eq!(result.labels, vec![0, 0]);
        assert_eq!(result.stop_counts, vec![2]);
        assert_eq!(result.fallback_count, 1);
        assert_eq!(result.history[0].kind, CommitKind::Feasible);
        assert_eq!(result.history[1].kind, CommitKind::Fallback);
        assert_eq!(result.history[1].overflow.stops, 1);
    }

    #[test]
    fn test_fallback_prefers_least_overflow_over_distance() {
        let points = vec![
            Point::new(0.0, 0.0).with_weight(4.0),
            Point::new(0.0, 0.0).with_weight(4.0),
            Point::new(0.0, 0.0).with_weight(2.0),
        ];
        let centroids = [c(0.0, 0.0), c(10.0, 0.0)];
        let limits = CapacityLimits::none().with_weights(vec![4.5, 5.5]);

        let result = AssignRunner::run(&points, &centroids, &limits, &history_config()).unwrap();
        // Third point: cluster 0 would overflow by 1.5, cluster 1 by 0.5.
        assert_eq!(result.labels, vec![0, 1, 1]);
        assert_eq!(result.weight_sums, vec![4.0, 6.0]);
        assert_eq!(result.fallback_count, 1);
        assert!((result.history[2].overflow.weight - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fallback_tie_goes_to_nearer_cluster() {
        let points = vec![
            Point::new(0.0, 0.0).with_weight(4.0),
            Point::new(0.0, 0.0).with_weight(4.0),
            Point::new(0.0, 0.0).with_weight(2.0),
        ];
        let centroids = [c(0.0, 0.0), c(10.0, 0.0)];
        let limits = CapacityLimits::none().with_weights(vec![5.0, 5.0]);

        let result = assign(&points, &centroids, &limits).unwrap();
        assert_eq!(result.labels, vec![0, 1, 0]);
        assert_eq!(result.fallback_count, 1);
    }

    #[test]
    fn test_policy_changes_fallback_choice() {
        // Cluster 0: over by 1 stop only. Cluster 1: within stops, over by
        // 3 weight. Equal coefficients pick cluster 0; ignoring stops
        // picks cluster 0 too; ignoring weight picks cluster 1.
        let points = vec![
            Point::new(0.0, 0.0).with_weight(1.0),
            Point::new(10.0, 0.0).with_weight(1.0),
            Point::new(0.0, 0.0).with_weight(4.0),
        ];
        let centroids = [c(0.0, 0.0), c(10.0, 0.0)];
        let limits = CapacityLimits::none()
            .with_stops(vec![1, 2])
            .with_weights(vec![10.0, 2.0]);

        let default = assign(&points, &centroids, &limits).unwrap();
        assert_eq!(default.labels[2], 0);

        let config = AssignConfig::default().with_policy(OverflowPolicy::new(0.0, 1.0));
        let by_weight = AssignRunner::run(&points, &centroids, &limits, &config).unwrap();
        assert_eq!(by_weight.labels[2], 0);

        let config = AssignConfig::default().with_policy(OverflowPolicy::new(1.0, 0.0));
        let by_stops = AssignRunner::run(&points, &centroids, &limits, &config).unwrap();
        assert_eq!(by_stops.labels[2], 1);
    }

    #[test]
    fn test_stop_shortfall_rejected() {
        let points = unit_points(&[(0.0, 0.0); 10]);
        let centroids = [c(0.0, 0.0), c(1.0, 1.0)];
        let limits = CapacityLimits::none().with_stops(vec![3, 3]);

        let err = assign(&points, &centroids, &limits).unwrap_err();
        assert_eq!(
            err,
            Error::CapacityShortfall {
                resource: Resource::Stops,
                total: 10.0,
                capacity: 6.0,
            }
        );
    }

    #[test]
    fn test_huge_stop_limits_do_not_overflow() {
        let points = unit_points(&[(0.0, 0.0), (10.0, 0.0)]);
        let centroids = [c(0.0, 0.0), c(10.0, 0.0)];
        let limits = CapacityLimits::none().with_stops(vec![usize::MAX, 1]);

        let result = assign(&points, &centroids, &limits).unwrap();
        assert_eq!(result.labels, vec![0, 1]);
        assert!(result.is_feasible());

        let limits = CapacityLimits::none().with_stops(vec![usize::MAX, usize::MAX]);
        assert!(assign(&points, &centroids, &limits).is_ok());
    }

    #[test]
    fn test_weight_shortfall_rejected() {
        let points = vec![
            Point::new(0.0, 0.0).with_weight(5.0),
            Point::new(0.0, 0.0).with_weight(6.0),
        ];
        let centroids = [c(0.0, 0.0)];
        let limits = CapacityLimits::none().with_weights(vec![10.0]);

        let err = assign(&points, &centroids, &limits).unwrap_err();
        assert!(matches!(
            err,
            Error::CapacityShortfall {
                resource: Resource::Weight,
                ..
            }
        ));
    }

    #[test]
    fn test_unweighted_points_count_default_weight() {
        let points = unit_points(&[(0.0, 0.0); 3]);
        let centroids = [c(0.0, 0.0)];
        let limits = CapacityLimits::none().with_weights(vec![5.0]);

        let config = AssignConfig::default().with_default_weight(2.0);
        let err = AssignRunner::run(&points, &centroids, &limits, &config).unwrap_err();
        assert!(matches!(err, Error::CapacityShortfall { .. }));

        let result = assign(&points, &centroids, &limits).unwrap();
        assert_eq!(result.weight_sums, vec![3.0]);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let points = unit_points(&[(0.0, 0.0)]);
        let centroids = [c(0.0, 0.0), c(1.0, 0.0)];

        let limits = CapacityLimits::none().with_stops(vec![5]);
        assert!(matches!(
            assign(&points, &centroids, &limits),
            Err(Error::ShapeMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));

        let limits = CapacityLimits::none().with_weights(vec![5.0, 5.0, 5.0]);
        assert!(matches!(
            assign(&points, &centroids, &limits),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let points = vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)];
        let centroids = [c(0.0, 0.0)];
        assert_eq!(
            assign(&points, &centroids, &CapacityLimits::none()).unwrap_err(),
            Error::InvalidPoint {
                index: 1,
                reason: "non-finite coordinate"
            }
        );

        let points = vec![Point::new(0.0, 0.0)];
        let centroids = [c(0.0, 0.0), c(f64::INFINITY, 0.0)];
        assert_eq!(
            assign(&points, &centroids, &CapacityLimits::none()).unwrap_err(),
            Error::InvalidCentroid { index: 1 }
        );
    }

    #[test]
    fn test_no_clusters() {
        let points = unit_points(&[(0.0, 0.0)]);
        assert_eq!(
            assign(&points, &[], &CapacityLimits::none()).unwrap_err(),
            Error::NoClusters
        );
    }

    #[test]
    fn test_empty_points() {
        let centroids = [c(0.0, 0.0), c(1.0, 1.0)];
        let limits = CapacityLimits::none().with_stops(vec![0, 0]);
        let result = assign(&[], &centroids, &limits).unwrap();
        assert!(result.labels.is_empty());
        assert_eq!(result.stop_counts, vec![0, 0]);
        assert_eq!(result.weight_sums, vec![0.0, 0.0]);
    }

    #[test]
    fn test_descending_limit_order() {
        // Limits given smallest-first; descending pairing gives cluster 0
        // the room for both nearby points.
        let points = unit_points(&[(0.0, 0.0), (0.0, 1.0), (10.0, 0.0)]);
        let centroids = [c(0.0, 0.0), c(10.0, 0.0)];
        let limits = CapacityLimits::none().with_stops(vec![1, 2]);

        let as_given = assign(&points, &centroids, &limits).unwrap();
        assert_eq!(as_given.labels, vec![0, 1, 1]);

        let config = AssignConfig::default().with_limit_order(LimitOrder::Descending);
        let sorted = AssignRunner::run(&points, &centroids, &limits, &config).unwrap();
        assert_eq!(sorted.labels, vec![0, 0, 1]);
        assert_eq!(sorted.limits.stops, Some(vec![2, 1]));
    }

    #[test]
    fn test_history_tracks_running_loads() {
        let points = unit_points(&[(0.0, 0.0), (0.0, 1.0), (10.0, 0.0), (10.0, 1.0)]);
        let centroids = [c(0.0, 0.0), c(10.0, 0.0)];
        let limits = CapacityLimits::none().with_stops(vec![2, 2]);

        let result = AssignRunner::run(&points, &centroids, &limits, &history_config()).unwrap();
        assert_eq!(result.history.len(), 4);
        let stops_after: Vec<usize> = result.history.iter().map(|h| h.load_after.stops).collect();
        assert_eq!(stops_after, vec![1, 2, 1, 2]);
        assert!(result
            .history
            .iter()
            .all(|h| h.kind == CommitKind::Feasible && h.overflow.is_zero()));
    }

    #[test]
    fn test_history_off_by_default() {
        let points = unit_points(&[(0.0, 0.0)]);
        let result = assign(&points, &[c(0.0, 0.0)], &CapacityLimits::none()).unwrap();
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AssignConfig::default().with_default_weight(f64::NAN);
        let err = AssignRunner::run(&[], &[], &CapacityLimits::none(), &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_run_batch_isolated_ledgers() {
        let job = AssignJob {
            points: unit_points(&[(0.0, 0.0), (0.0, 1.0)]),
            centroids: vec![c(0.0, 0.0), c(5.0, 0.0)],
            limits: CapacityLimits::none().with_stops(vec![1, 1]),
        };
        let bad = AssignJob {
            points: unit_points(&[(0.0, 0.0), (0.0, 1.0)]),
            centroids: vec![c(0.0, 0.0)],
            limits: CapacityLimits::none().with_stops(vec![1]),
        };

        let results =
            AssignRunner::run_batch(&[job.clone(), bad, job], &AssignConfig::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().labels, vec![0, 1]);
        assert!(results[1].is_err());
        assert_eq!(results[0], results[2]);
    }
}
