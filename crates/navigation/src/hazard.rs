//! Hazard-zone detection with per-report deduplication

use geo_core::{distance, Coordinate};
use incident_model::{Category, IncidentReport, ReportKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hazard-zone thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardConfig {
    /// Outer radius at which an approaching alert fires (meters)
    pub approach_m: f64,
    /// Inner radius at which an entered alert fires (meters)
    pub entry_m: f64,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            approach_m: 200.0,
            entry_m: 50.0,
        }
    }
}

/// Zone stage relative to the tracked report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneStage {
    Approaching,
    Entered,
}

/// The hazard currently being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneAlert {
    /// Identity of the tracked report
    pub key: ReportKey,
    /// Last announced stage for that report
    pub stage: ZoneStage,
}

/// A zone transition worth speaking
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneAnnouncement {
    pub category: Category,
    pub stage: ZoneStage,
    pub text: String,
}

fn announcement(category: Category, stage: ZoneStage) -> ZoneAnnouncement {
    let text = match (category, stage) {
        (Category::Danger, ZoneStage::Approaching) => {
            "Warning. You are approaching a reported danger zone."
        }
        (Category::Danger, ZoneStage::Entered) => {
            "Caution. You have entered a reported danger zone. Stay alert."
        }
        (Category::Caution, ZoneStage::Approaching) => {
            "Heads up. You are approaching a reported caution area."
        }
        (Category::Caution, ZoneStage::Entered) => "You have entered a reported caution area.",
        // Safe reports never form zones
        (Category::Safe, _) => "",
    };
    ZoneAnnouncement {
        category,
        stage,
        text: text.to_string(),
    }
}

/// Tracks the nearest hazard across position updates
///
/// Each report is announced at most once per stage; moving outside the
/// approach radius clears the tracker silently (no "left the zone" prompt).
#[derive(Debug, Default)]
pub struct HazardTracker {
    active: Option<ZoneAlert>,
}

impl HazardTracker {
    /// Current tracked alert, if any
    pub fn active(&self) -> Option<&ZoneAlert> {
        self.active.as_ref()
    }

    /// Drop tracking state (session stop)
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Evaluate hazard zones for a position update
    ///
    /// Danger reports take priority over caution reports when both are in
    /// approach range. Returns an announcement only on a new report or a
    /// stage escalation, never once per tick.
    pub fn update(
        &mut self,
        position: Coordinate,
        reports: &[IncidentReport],
        config: &HazardConfig,
    ) -> Option<ZoneAnnouncement> {
        let nearest = |category: Category| {
            reports
                .iter()
                .filter(|r| r.category == category)
                .map(|r| (r, distance(position, r.location)))
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        };

        let danger = nearest(Category::Danger).filter(|(_, d)| *d <= config.approach_m);
        let caution = nearest(Category::Caution).filter(|(_, d)| *d <= config.approach_m);
        let candidate = danger.or(caution);

        let Some((report, dist)) = candidate else {
            if self.active.take().is_some() {
                debug!("left hazard zone, tracking cleared");
            }
            return None;
        };

        let stage = if dist <= config.entry_m {
            ZoneStage::Entered
        } else {
            ZoneStage::Approaching
        };
        let key = report.key();

        match &mut self.active {
            Some(alert) if alert.key == key => {
                if alert.stage == ZoneStage::Approaching && stage == ZoneStage::Entered {
                    alert.stage = ZoneStage::Entered;
                    debug!(?key, "entered hazard zone");
                    Some(announcement(report.category, ZoneStage::Entered))
                } else {
                    None
                }
            }
            _ => {
                self.active = Some(ZoneAlert { key, stage });
                debug!(?key, ?stage, distance_m = dist, "tracking hazard zone");
                Some(announcement(report.category, stage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn report(lat: f64, lon: f64, category: Category) -> IncidentReport {
        IncidentReport {
            id: Uuid::new_v4(),
            category,
            location: coord(lat, lon),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    // ~1 degree latitude = 111.2 km, so 0.001 deg = ~111 m
    fn offset_m(meters: f64) -> f64 {
        meters / 111_195.0
    }

    #[test]
    fn test_approach_then_enter_announced_once_each() {
        let reports = vec![report(0.0, 0.0, Category::Danger)];
        let config = HazardConfig::default();
        let mut tracker = HazardTracker::default();

        let mut announcements = Vec::new();
        for meters in [300.0, 150.0, 140.0, 40.0, 10.0] {
            if let Some(a) = tracker.update(coord(offset_m(meters), 0.0), &reports, &config) {
                announcements.push(a);
            }
        }

        assert_eq!(announcements.len(), 2);
        assert_eq!(announcements[0].stage, ZoneStage::Approaching);
        assert_eq!(announcements[1].stage, ZoneStage::Entered);
    }

    #[test]
    fn test_no_alert_outside_approach() {
        let reports = vec![report(0.0, 0.0, Category::Danger)];
        let mut tracker = HazardTracker::default();
        let out = tracker.update(
            coord(offset_m(500.0), 0.0),
            &reports,
            &HazardConfig::default(),
        );
        assert!(out.is_none());
        assert!(tracker.active().is_none());
    }

    #[test]
    fn test_leaving_clears_silently() {
        let reports = vec![report(0.0, 0.0, Category::Caution)];
        let config = HazardConfig::default();
        let mut tracker = HazardTracker::default();

        assert!(tracker
            .update(coord(offset_m(150.0), 0.0), &reports, &config)
            .is_some());
        // Moving back out produces no announcement and drops the tracker
        let out = tracker.update(coord(offset_m(400.0), 0.0), &reports, &config);
        assert!(out.is_none());
        assert!(tracker.active().is_none());
    }

    #[test]
    fn test_reapproach_announces_again() {
        let reports = vec![report(0.0, 0.0, Category::Danger)];
        let config = HazardConfig::default();
        let mut tracker = HazardTracker::default();

        tracker.update(coord(offset_m(150.0), 0.0), &reports, &config);
        tracker.update(coord(offset_m(400.0), 0.0), &reports, &config);
        let again = tracker.update(coord(offset_m(150.0), 0.0), &reports, &config);
        assert!(again.is_some());
    }

    #[test]
    fn test_danger_wins_over_caution() {
        let reports = vec![
            report(offset_m(120.0), 0.0, Category::Caution),
            report(0.0, 0.0, Category::Danger),
        ];
        let out = HazardTracker::default()
            .update(
                coord(offset_m(60.0), 0.0),
                &reports,
                &HazardConfig::default(),
            )
            .unwrap();
        assert_eq!(out.category, Category::Danger);
    }

    #[test]
    fn test_direct_entry_announced_as_entered() {
        let reports = vec![report(0.0, 0.0, Category::Danger)];
        let out = HazardTracker::default()
            .update(
                coord(offset_m(30.0), 0.0),
                &reports,
                &HazardConfig::default(),
            )
            .unwrap();
        assert_eq!(out.stage, ZoneStage::Entered);
    }

    #[test]
    fn test_safe_reports_ignored() {
        let reports = vec![report(0.0, 0.0, Category::Safe)];
        let out = HazardTracker::default().update(
            coord(offset_m(30.0), 0.0),
            &reports,
            &HazardConfig::default(),
        );
        assert!(out.is_none());
    }

    #[test]
    fn test_switching_to_new_report_announces() {
        let first = report(0.0, 0.0, Category::Danger);
        let second = report(offset_m(1000.0), 0.0, Category::Danger);
        let reports = vec![first, second];
        let config = HazardConfig::default();
        let mut tracker = HazardTracker::default();

        tracker.update(coord(offset_m(150.0), 0.0), &reports, &config);
        // Move into range of the second report only
        let out = tracker.update(coord(offset_m(900.0), 0.0), &reports, &config);
        assert!(out.is_some());
    }
}
