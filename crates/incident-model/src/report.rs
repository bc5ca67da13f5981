//! Incident report types

use chrono::{DateTime, Utc};
use geo_core::Coordinate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity category of a safety report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Danger,
    Caution,
    Safe,
}

impl Category {
    /// Lenient parse; report sources historically mix case and use
    /// "severity" synonyms
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "danger" | "high" => Some(Self::Danger),
            "caution" | "medium" => Some(Self::Caution),
            "safe" | "low" => Some(Self::Safe),
            _ => None,
        }
    }
}

/// A user-submitted safety incident at a geolocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReport {
    /// Stable id assigned by the report collaborator
    pub id: Uuid,
    /// Severity category
    pub category: Category,
    /// Where the incident was observed
    pub location: Coordinate,
    /// Free-form description
    pub description: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl IncidentReport {
    /// Identity key used for hazard-zone tracking across position updates
    pub fn key(&self) -> ReportKey {
        ReportKey::Id(self.id)
    }
}

/// Stable report identity for deduplicating zone alerts
///
/// Prefers the report id; sources without ids fall back to a composite of
/// the coordinates rounded to ~1 m precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKey {
    Id(Uuid),
    Position { lat_e5: i64, lon_e5: i64 },
}

impl ReportKey {
    /// Coordinate-derived key for reports lacking a stable id
    pub fn from_location(location: Coordinate) -> Self {
        Self::Position {
            lat_e5: (location.lat * 1e5).round() as i64,
            lon_e5: (location.lon * 1e5).round() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_lenient() {
        assert_eq!(Category::parse("Danger"), Some(Category::Danger));
        assert_eq!(Category::parse(" caution "), Some(Category::Caution));
        assert_eq!(Category::parse("SAFE"), Some(Category::Safe));
        assert_eq!(Category::parse("unknown"), None);
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Danger).unwrap();
        assert_eq!(json, "\"danger\"");
    }

    #[test]
    fn test_position_key_stable() {
        let a = Coordinate::new(28.61390, 77.20900).unwrap();
        let b = Coordinate::new(28.613901, 77.209001).unwrap();
        assert_eq!(ReportKey::from_location(a), ReportKey::from_location(b));
    }
}
