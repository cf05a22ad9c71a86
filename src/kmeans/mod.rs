//! Unconstrained k-means for centroid discovery.
//!
//! The assignment engine takes centroids as input and does not care where
//! they come from. This module is one such source: k-means++ seeding
//! followed by Lloyd iterations, with a fixed seed for reproducible runs.
//!
//! ```
//! use u_geocluster::assign::{AssignRunner, AssignConfig, CapacityLimits, Point};
//! use u_geocluster::kmeans::{Kmeans, KmeansConfig};
//!
//! let points: Vec<Point> = (0..12)
//!     .map(|i| Point::new((i % 4) as f64, (i / 4) as f64))
//!     .collect();
//! let fit = Kmeans::new(KmeansConfig::new(3)).fit(&points).unwrap();
//! let limits = CapacityLimits::none().with_stops(vec![4, 4, 4]);
//! let result =
//!     AssignRunner::run(&points, &fit.centroids, &limits, &AssignConfig::default()).unwrap();
//! assert!(result.stop_counts.iter().all(|&n| n <= 4));
//! ```
//!
//! # References
//!
//! - Lloyd (1982), "Least squares quantization in PCM"
//! - Arthur & Vassilvitskii (2007), "k-means++: The Advantages of Careful Seeding"

mod config;
mod runner;

pub use config::KmeansConfig;
pub use runner::{Kmeans, KmeansFit};
