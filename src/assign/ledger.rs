//! Running per-cluster occupancy.

/// Occupancy of a single cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterLoad {
    /// Number of points committed so far.
    pub stops: usize,
    /// Summed weight of points committed so far.
    pub weight: f64,
}

/// Capacity ledger for one assignment run.
///
/// Counters start at zero and only ever grow: a commit is final and no
/// point is moved out of a cluster afterwards. Each run owns a fresh
/// ledger, so independent runs never share occupancy.
///
/// # Examples
///
/// ```
/// use u_geocluster::assign::CapacityLedger;
///
/// let mut ledger = CapacityLedger::new(2);
/// ledger.commit(1, 4.0);
/// ledger.commit(1, 2.5);
/// assert_eq!(ledger.load(1).stops, 2);
/// assert_eq!(ledger.load(1).weight, 6.5);
/// assert_eq!(ledger.load(0).stops, 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityLedger {
    loads: Vec<ClusterLoad>,
}

impl CapacityLedger {
    /// Creates a zeroed ledger for `n_clusters` clusters.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            loads: vec![ClusterLoad::default(); n_clusters],
        }
    }

    /// Number of clusters tracked.
    pub fn n_clusters(&self) -> usize {
        self.loads.len()
    }

    /// Current occupancy of `cluster`.
    #[inline]
    pub fn load(&self, cluster: usize) -> ClusterLoad {
        self.loads[cluster]
    }

    /// Records one point of `weight` in `cluster` and returns the new load.
    pub fn commit(&mut self, cluster: usize, weight: f64) -> ClusterLoad {
        let load = &mut self.loads[cluster];
        load.stops += 1;
        load.weight += weight;
        *load
    }

    /// Total points committed across all clusters.
    pub fn total_stops(&self) -> usize {
        self.loads.iter().map(|l| l.stops).sum()
    }

    /// Total weight committed across all clusters.
    pub fn total_weight(&self) -> f64 {
        self.loads.iter().map(|l| l.weight).sum()
    }

    /// Final stop counts, indexed by cluster id.
    pub fn stop_counts(&self) -> Vec<usize> {
        self.loads.iter().map(|l| l.stops).collect()
    }

    /// Final weight sums, indexed by cluster id.
    pub fn weight_sums(&self) -> Vec<f64> {
        self.loads.iter().map(|l| l.weight).collect()
    }

    /// All loads, indexed by cluster id.
    pub fn loads(&self) -> &[ClusterLoad] {
        &self.loads
    }
}
