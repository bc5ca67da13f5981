//! First-fit density clustering

use geo_core::{distance, Coordinate};
use incident_model::{Category, IncidentReport};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Clustering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Zoom level at or above which callers should render individual
    /// markers instead of cluster circles (advisory; clusters are always
    /// returned)
    pub marker_switch_zoom: u8,
    /// Base display radius for cluster circles in meters
    pub display_radius_base_m: f64,
    /// Display radius growth per sqrt(member count)
    pub display_radius_scale_m: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            marker_switch_zoom: 13,
            display_radius_base_m: 200.0,
            display_radius_scale_m: 60.0,
        }
    }
}

impl ClusterConfig {
    /// Clustering radius in meters for a map zoom level; wider at low zoom
    pub fn radius_for_zoom(&self, zoom: u8) -> f64 {
        if zoom < 10 {
            4000.0
        } else if zoom < 12 {
            2000.0
        } else if zoom < 14 {
            900.0
        } else {
            300.0
        }
    }

    /// Whether the caller should draw per-report markers at this zoom
    pub fn prefers_markers(&self, zoom: u8) -> bool {
        zoom >= self.marker_switch_zoom
    }
}

/// Per-category report counts within a cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub danger: usize,
    pub caution: usize,
    pub safe: usize,
}

impl CategoryCounts {
    /// Total reports counted
    pub fn total(&self) -> usize {
        self.danger + self.caution + self.safe
    }

    fn add(&mut self, category: Category) {
        match category {
            Category::Danger => self.danger += 1,
            Category::Caution => self.caution += 1,
            Category::Safe => self.safe += 1,
        }
    }
}

/// A density cluster of incident reports
///
/// Built fresh per invocation, never persisted. The centroid is the running
/// mean of member locations.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// Running-mean centroid of member locations
    pub centroid: Coordinate,
    /// Member reports in join order
    pub members: Vec<IncidentReport>,
    /// Per-category counts over the members
    pub counts: CategoryCounts,
}

impl Cluster {
    fn new(report: IncidentReport) -> Self {
        let mut counts = CategoryCounts::default();
        counts.add(report.category);
        Self {
            centroid: report.location,
            members: vec![report],
            counts,
        }
    }

    fn absorb(&mut self, report: IncidentReport) {
        let n = (self.members.len() + 1) as f64;
        // Incremental running mean; members are near each other so the
        // planar average of degrees is adequate here
        self.centroid.lat += (report.location.lat - self.centroid.lat) / n;
        self.centroid.lon += (report.location.lon - self.centroid.lon) / n;
        self.counts.add(report.category);
        self.members.push(report);
    }

    /// Display radius in meters for drawing the cluster circle
    pub fn display_radius_m(&self, config: &ClusterConfig) -> f64 {
        config.display_radius_base_m + (self.members.len() as f64).sqrt() * config.display_radius_scale_m
    }
}

/// Group reports into clusters within `radius_m` of a cluster centroid
///
/// Reports are visited in input order and join the first cluster whose
/// centroid is within radius (first-fit, not nearest-fit), so output depends
/// on input order. Every report lands in exactly one cluster.
pub fn build_clusters(reports: &[IncidentReport], radius_m: f64) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();

    for report in reports {
        let found = clusters
            .iter_mut()
            .find(|c| distance(c.centroid, report.location) < radius_m);

        match found {
            Some(cluster) => cluster.absorb(report.clone()),
            None => clusters.push(Cluster::new(report.clone())),
        }
    }

    debug!(
        reports = reports.len(),
        clusters = clusters.len(),
        radius_m,
        "built incident clusters"
    );
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn report(lat: f64, lon: f64, category: Category) -> IncidentReport {
        IncidentReport {
            id: Uuid::new_v4(),
            category,
            location: Coordinate::new(lat, lon).unwrap(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_nearby_reports_merge() {
        let reports = vec![
            report(28.6139, 77.2090, Category::Danger),
            report(28.6140, 77.2091, Category::Caution),
        ];
        let clusters = build_clusters(&reports, 900.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].counts.danger, 1);
        assert_eq!(clusters[0].counts.caution, 1);
    }

    #[test]
    fn test_distant_reports_split() {
        let reports = vec![
            report(28.6139, 77.2090, Category::Danger),
            report(28.7041, 77.1025, Category::Safe),
        ];
        let clusters = build_clusters(&reports, 900.0);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_every_report_in_exactly_one_cluster() {
        let mut reports = Vec::new();
        for i in 0..25 {
            let lat = 28.0 + (i as f64) * 0.01;
            reports.push(report(lat, 77.0, Category::Caution));
        }
        let clusters = build_clusters(&reports, 2000.0);
        let total: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, reports.len());
    }

    #[test]
    fn test_centroid_is_running_mean() {
        let reports = vec![
            report(28.0000, 77.0000, Category::Safe),
            report(28.0020, 77.0000, Category::Safe),
        ];
        let clusters = build_clusters(&reports, 4000.0);
        assert_eq!(clusters.len(), 1);
        assert!((clusters[0].centroid.lat - 28.0010).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_radius_lookup() {
        let config = ClusterConfig::default();
        assert_eq!(config.radius_for_zoom(8), 4000.0);
        assert_eq!(config.radius_for_zoom(11), 2000.0);
        assert_eq!(config.radius_for_zoom(13), 900.0);
        assert_eq!(config.radius_for_zoom(16), 300.0);
    }

    #[test]
    fn test_marker_switch() {
        let config = ClusterConfig::default();
        assert!(!config.prefers_markers(12));
        assert!(config.prefers_markers(13));
    }

    #[test]
    fn test_display_radius_grows_with_members() {
        let config = ClusterConfig::default();
        let reports = vec![report(28.0, 77.0, Category::Safe)];
        let clusters = build_clusters(&reports, 1000.0);
        assert!((clusters[0].display_radius_m(&config) - 260.0).abs() < 1e-9);
    }
}
