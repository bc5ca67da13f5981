//! Safety scoring and ranking

use crate::RouteGeometry;
use geo_core::is_near_polyline;
use incident_model::{Category, IncidentReport};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Corridor half-width around the route polyline in meters
    pub tolerance_m: f64,
    /// Weight of a danger report in the penalty sum
    pub danger_weight: f64,
    /// Weight of a caution report in the penalty sum
    pub caution_weight: f64,
    /// Credit of a safe report against the penalty sum
    pub safe_weight: f64,
    /// Score penalty per weighted report unit
    pub penalty_per_unit: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            tolerance_m: 1000.0,
            danger_weight: 3.0,
            caution_weight: 2.0,
            safe_weight: 1.0,
            penalty_per_unit: 10.0,
        }
    }
}

impl ScorerConfig {
    /// Heavier penalty per weighted report
    pub fn strict() -> Self {
        Self {
            penalty_per_unit: 15.0,
            ..Default::default()
        }
    }

    /// Lighter penalty, for areas with dense reporting
    pub fn lenient() -> Self {
        Self {
            penalty_per_unit: 5.0,
            ..Default::default()
        }
    }
}

/// Per-route tally of nearby reports and the derived 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyScore {
    pub danger_count: usize,
    pub caution_count: usize,
    pub safe_count: usize,
    /// 0 (high risk) to 100 (no hazards nearby)
    pub score: f64,
}

impl SafetyScore {
    /// Derive the clamped score from category counts
    ///
    /// score = clamp(0, 100, 100 - penalty * max(0, 3*danger + 2*caution - safe))
    pub fn from_counts(danger: usize, caution: usize, safe: usize, config: &ScorerConfig) -> Self {
        let weighted = danger as f64 * config.danger_weight + caution as f64 * config.caution_weight
            - safe as f64 * config.safe_weight;
        let score = (100.0 - weighted.max(0.0) * config.penalty_per_unit).clamp(0.0, 100.0);
        Self {
            danger_count: danger,
            caution_count: caution,
            safe_count: safe,
            score,
        }
    }

    /// Human-readable safety band for the score
    pub fn label(&self) -> SafetyLabel {
        SafetyLabel::for_score(self.score)
    }
}

/// Safety band shown next to a ranked route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyLabel {
    VerySafe,
    Safe,
    Moderate,
    Caution,
    HighRisk,
}

impl SafetyLabel {
    /// Band for a 0-100 score
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::VerySafe
        } else if score >= 60.0 {
            Self::Safe
        } else if score >= 40.0 {
            Self::Moderate
        } else if score >= 20.0 {
            Self::Caution
        } else {
            Self::HighRisk
        }
    }

    /// Display text
    pub fn text(&self) -> &'static str {
        match self {
            Self::VerySafe => "Very Safe",
            Self::Safe => "Safe",
            Self::Moderate => "Moderate",
            Self::Caution => "Caution",
            Self::HighRisk => "High Risk",
        }
    }
}

/// A route with its safety score and post-sort rank
#[derive(Debug, Clone)]
pub struct RankedRoute {
    pub geometry: RouteGeometry,
    pub safety: SafetyScore,
    /// 0 is the recommended (safest) route
    pub rank: usize,
}

/// Score one route against the incident set
///
/// Pure function of its inputs; reports whose location falls within the
/// corridor are tallied by category.
pub fn score_route(
    route: &RouteGeometry,
    reports: &[IncidentReport],
    config: &ScorerConfig,
) -> SafetyScore {
    let mut danger = 0;
    let mut caution = 0;
    let mut safe = 0;

    for report in reports {
        if is_near_polyline(report.location, &route.coordinates, config.tolerance_m) {
            match report.category {
                Category::Danger => danger += 1,
                Category::Caution => caution += 1,
                Category::Safe => safe += 1,
            }
        }
    }

    SafetyScore::from_counts(danger, caution, safe, config)
}

/// Score all candidates and sort them safest-first
///
/// The sort is stable: identical scores keep the provider's original order,
/// and rank is the post-sort index.
pub fn rank_routes(
    routes: Vec<RouteGeometry>,
    reports: &[IncidentReport],
    config: &ScorerConfig,
) -> Vec<RankedRoute> {
    let mut ranked: Vec<RankedRoute> = routes
        .into_iter()
        .map(|geometry| {
            let safety = score_route(&geometry, reports, config);
            RankedRoute {
                geometry,
                safety,
                rank: 0,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.safety
            .score
            .partial_cmp(&a.safety.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (i, route) in ranked.iter_mut().enumerate() {
        route.rank = i;
    }

    debug!(candidates = ranked.len(), "ranked candidate routes");
    ranked
}
