//! Feasibility checks and overflow scoring.
//!
//! A cluster is *feasible* for a point when committing the point keeps the
//! cluster within both of its declared limits. When no cluster is feasible
//! the runner falls back to the cluster with the smallest *overflow*, the
//! amount by which the commit would exceed the limits.

use super::ledger::CapacityLedger;
use super::types::CapacityLimits;

/// Returns `true` if `cluster` can take one more point of `weight`.
///
/// The stop check is strict (`stops < limit`); the weight check allows
/// filling a cluster exactly to its limit (`weight + w <= limit`). Absent
/// limit families are not checked.
#[inline]
pub fn is_feasible(
    cluster: usize,
    weight: f64,
    ledger: &CapacityLedger,
    limits: &CapacityLimits,
) -> bool {
    let load = ledger.load(cluster);
    let stops_ok = limits
        .stop_limit(cluster)
        .is_none_or(|limit| load.stops < limit);
    let weight_ok = limits
        .weight_limit(cluster)
        .is_none_or(|limit| load.weight + weight <= limit);
    stops_ok && weight_ok
}

/// How far a candidate commit would exceed each limit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Overflow {
    /// Stops beyond the stop limit (0 if within or unbounded).
    pub stops: usize,
    /// Weight beyond the weight limit (0 if within or unbounded).
    pub weight: f64,
}

impl Overflow {
    /// Whether the commit would stay within all limits.
    pub fn is_zero(&self) -> bool {
        self.stops == 0 && self.weight <= 0.0
    }
}

/// Computes the overflow of committing a point of `weight` to `cluster`.
pub fn overflow(
    cluster: usize,
    weight: f64,
    ledger: &CapacityLedger,
    limits: &CapacityLimits,
) -> Overflow {
    let load = ledger.load(cluster);
    let stops = limits
        .stop_limit(cluster)
        .map_or(0, |limit| (load.stops + 1).saturating_sub(limit));
    let weight = limits
        .weight_limit(cluster)
        .map_or(0.0, |limit| (load.weight + weight - limit).max(0.0));
    Overflow { stops, weight }
}

/// Collapses an [`Overflow`] into the scalar used to rank fallback clusters.
///
/// The default coefficients (1.0, 1.0) add stop overflow and weight
/// overflow as-is. Stops and weight have different units, so callers with
/// heavy loads may want to rescale one side.
///
/// # Examples
///
/// ```
/// use u_geocluster::assign::{Overflow, OverflowPolicy};
///
/// let o = Overflow { stops: 1, weight: 2.5 };
/// assert_eq!(OverflowPolicy::default().score(&o), 3.5);
/// assert_eq!(OverflowPolicy::new(10.0, 0.0).score(&o), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverflowPolicy {
    /// Multiplier for stop overflow.
    pub stop_coef: f64,
    /// Multiplier for weight overflow.
    pub weight_coef: f64,
}

impl OverflowPolicy {
    /// Creates a policy with explicit coefficients.
    pub fn new(stop_coef: f64, weight_coef: f64) -> Self {
        Self {
            stop_coef,
            weight_coef,
        }
    }

    /// Scalar overflow score. Lower is better.
    #[inline]
    pub fn score(&self, overflow: &Overflow) -> f64 {
        self.stop_coef * overflow.stops as f64 + self.weight_coef * overflow.weight
    }
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}
