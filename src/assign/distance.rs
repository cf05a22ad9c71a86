//! Distance evaluation and nearest-first cluster ranking.

use super::types::Coordinate;

/// Squared Euclidean distance between two coordinates.
#[inline]
pub fn squared_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let dx = a.lon - b.lon;
    let dy = a.lat - b.lat;
    dx * dx + dy * dy
}

/// Ranks clusters from nearest to farthest centroid.
///
/// Returns cluster ids (centroid indices) sorted by ascending squared
/// distance to `point`. Ties keep ascending cluster id, since the sort is
/// stable over an id-ordered sequence.
///
/// Inputs must be finite; the runner validates this before ranking.
///
/// # Examples
///
/// ```
/// use u_geocluster::assign::{rank, Coordinate};
///
/// let centroids = [Coordinate::new(10.0, 0.0), Coordinate::new(0.0, 0.0)];
/// assert_eq!(rank(&Coordinate::new(1.0, 0.0), &centroids), vec![1, 0]);
/// ```
pub fn rank(point: &Coordinate, centroids: &[Coordinate]) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = centroids
        .iter()
        .enumerate()
        .map(|(c, centroid)| (c, squared_distance(point, centroid)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.into_iter().map(|(c, _)| c).collect()
}

/// Index of the nearest centroid, or `None` for an empty set.
pub fn nearest(point: &Coordinate, centroids: &[Coordinate]) -> Option<usize> {
    centroids
        .iter()
        .enumerate()
        .map(|(c, centroid)| (c, squared_distance(point, centroid)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}
