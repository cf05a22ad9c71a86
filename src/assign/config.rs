//! Assignment configuration.

use super::feasibility::OverflowPolicy;
use crate::error::{Error, Result};

/// How limit sequences are matched to cluster ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LimitOrder {
    /// `limit[c]` applies to cluster `c`.
    #[default]
    AsGiven,

    /// Each limit family is sorted largest-first before the run, so
    /// cluster 0 receives the largest budget, cluster 1 the next, and so on.
    ///
    /// Useful when limits describe a fleet of vehicles rather than
    /// specific clusters.
    Descending,
}

/// Configuration for a capacity-constrained assignment run.
///
/// # Examples
///
/// ```
/// use u_geocluster::assign::{AssignConfig, LimitOrder, OverflowPolicy};
///
/// let config = AssignConfig::default()
///     .with_policy(OverflowPolicy::new(1.0, 0.1))
///     .with_limit_order(LimitOrder::Descending)
///     .with_history(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignConfig {
    /// Coefficients for collapsing overflow into a fallback score.
    pub policy: OverflowPolicy,

    /// Pairing of limit entries with clusters.
    pub limit_order: LimitOrder,

    /// Record one [`Commit`](super::Commit) per point.
    pub record_history: bool,

    /// Weight of points that carry none.
    pub default_weight: f64,
}

impl Default for AssignConfig {
    fn default() -> Self {
        Self {
            policy: OverflowPolicy::default(),
            limit_order: LimitOrder::AsGiven,
            record_history: false,
            default_weight: 1.0,
        }
    }
}

impl AssignConfig {
    /// Sets the overflow scoring policy.
    pub fn with_policy(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets how limit entries are paired with clusters.
    pub fn with_limit_order(mut self, order: LimitOrder) -> Self {
        self.limit_order = order;
        self
    }

    /// Enables or disables per-point commit recording.
    pub fn with_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    /// Sets the weight used for points that carry none.
    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let OverflowPolicy {
            stop_coef,
            weight_coef,
        } = self.policy;
        if !stop_coef.is_finite() || stop_coef < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "stop_coef must be finite and non-negative, got {stop_coef}"
            )));
        }
        if !weight_coef.is_finite() || weight_coef < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "weight_coef must be finite and non-negative, got {weight_coef}"
            )));
        }
        if !self.default_weight.is_finite() || self.default_weight < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "default_weight must be finite and non-negative, got {}",
                self.default_weight
            )));
        }
        Ok(())
    }
}
