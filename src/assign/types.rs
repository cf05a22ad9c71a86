//! Input data model: coordinates, points, capacity limits.

use crate::error::{Error, Result};

/// A `(longitude, latitude)` pair.
///
/// Used both for point positions and for cluster centroids. Distances are
/// planar (squared Euclidean on raw degrees), which is adequate for the
/// city-scale extents this crate targets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Longitude (x axis).
    pub lon: f64,
    /// Latitude (y axis).
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// A delivery/service point.
///
/// The weight is optional; points without one count as
/// [`AssignConfig::default_weight`](super::AssignConfig::default_weight)
/// (unit weight unless configured otherwise).
///
/// # Examples
///
/// ```
/// use u_geocluster::assign::Point;
///
/// let p = Point::new(126.97, 37.56).with_weight(12.5);
/// assert_eq!(p.weight, Some(12.5));
/// assert_eq!(Point::new(0.0, 0.0).weight_or(1.0), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Position of the point.
    pub coord: Coordinate,
    /// Load carried by the point, if known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: Option<f64>,
}

impl Point {
    /// Creates an unweighted point.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            coord: Coordinate::new(lon, lat),
            weight: None,
        }
    }

    /// Sets the point weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Returns the weight, falling back to `default` when absent.
    #[inline]
    pub fn weight_or(&self, default: f64) -> f64 {
        self.weight.unwrap_or(default)
    }

    /// Checks coordinates and weight. `index` is only used for the error.
    pub(crate) fn validate(&self, index: usize) -> Result<()> {
        if !self.coord.is_finite() {
            return Err(Error::InvalidPoint {
                index,
                reason: "non-finite coordinate",
            });
        }
        if let Some(w) = self.weight {
            if !w.is_finite() {
                return Err(Error::InvalidPoint {
                    index,
                    reason: "non-finite weight",
                });
            }
            if w < 0.0 {
                return Err(Error::InvalidPoint {
                    index,
                    reason: "negative weight",
                });
            }
        }
        Ok(())
    }
}

/// Per-cluster capacity limits.
///
/// Either family may be absent, in which case that dimension is unbounded.
/// When present, a sequence must have exactly one entry per centroid.
///
/// # Examples
///
/// ```
/// use u_geocluster::assign::CapacityLimits;
///
/// let limits = CapacityLimits::none()
///     .with_stops(vec![20, 20, 15])
///     .with_weights(vec![300.0, 250.0, 235.0]);
/// assert_eq!(limits.stop_limit(2), Some(15));
/// assert_eq!(limits.weight_limit(0), Some(300.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapacityLimits {
    /// Maximum stop count per cluster.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stops: Option<Vec<usize>>,
    /// Maximum cumulative weight per cluster.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weights: Option<Vec<f64>>,
}

impl CapacityLimits {
    /// No limits at all (plain nearest-centroid assignment).
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets the stop-count limits.
    pub fn with_stops(mut self, stops: Vec<usize>) -> Self {
        self.stops = Some(stops);
        self
    }

    /// Sets the weight limits.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Stop limit of `cluster`, or `None` when unbounded.
    #[inline]
    pub fn stop_limit(&self, cluster: usize) -> Option<usize> {
        self.stops.as_ref().map(|s| s[cluster])
    }

    /// Weight limit of `cluster`, or `None` when unbounded.
    #[inline]
    pub fn weight_limit(&self, cluster: usize) -> Option<f64> {
        self.weights.as_ref().map(|w| w[cluster])
    }

    /// Sorts both limit families in descending order.
    pub(crate) fn sorted_descending(&self) -> Self {
        let stops = self.stops.clone().map(|mut s| {
            s.sort_unstable_by(|a, b| b.cmp(a));
            s
        });
        let weights = self.weights.clone().map(|mut w| {
            w.sort_by(|a, b| b.total_cmp(a));
            w
        });
        Self { stops, weights }
    }

    /// Checks lengths against `k` and weight values for sanity.
    pub(crate) fn validate_shape(&self, k: usize) -> Result<()> {
        if let Some(s) = &self.stops {
            if s.len() != k {
                return Err(Error::ShapeMismatch {
                    what: "stop limits",
                    expected: k,
                    found: s.len(),
                });
            }
        }
        if let Some(w) = &self.weights {
            if w.len() != k {
                return Err(Error::ShapeMismatch {
                    what: "weight limits",
                    expected: k,
                    found: w.len(),
                });
            }
            for (index, &limit) in w.iter().enumerate() {
                if !limit.is_finite() {
                    return Err(Error::InvalidLimit {
                        index,
                        reason: "non-finite weight limit",
                    });
                }
                if limit < 0.0 {
                    return Err(Error::InvalidLimit {
                        index,
                        reason: "negative weight limit",
                    });
                }
            }
        }
        Ok(())
    }
}
