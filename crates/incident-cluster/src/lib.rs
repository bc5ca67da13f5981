//! Incident Clustering Engine
//!
//! Groups incident reports into density clusters for map display:
//! - First-fit assignment in input order with running-mean centroids
//! - Zoom-derived clustering radius
//! - Deterministic danger-weighted color ramp for cluster circles

mod cluster;
mod color;

pub use cluster::{build_clusters, CategoryCounts, Cluster, ClusterConfig};
pub use color::{cluster_color, Rgb};
