//! Route geometry as returned by a routing provider

use geo_core::Coordinate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a route geometry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A route needs at least an origin and a destination point
    #[error("route has {0} points, need at least 2")]
    TooFewPoints(usize),
}

/// One provider-native maneuver step
///
/// The maneuver is kept as the provider's raw string ("turn left",
/// "roundabout", ...); the instruction generator parses it leniently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeStep {
    /// Where the maneuver happens
    pub location: Coordinate,
    /// Provider maneuver type string
    pub maneuver: String,
    /// Provider instruction text
    pub text: String,
    /// Distance covered by this step in meters
    pub distance_m: f64,
}

/// An ordered path of coordinates from origin to destination
///
/// Produced by the external routing provider and immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGeometry {
    /// Path from origin to destination, at least 2 points
    pub coordinates: Vec<Coordinate>,
    /// Total route length in meters
    pub total_distance_m: f64,
    /// Provider travel-time estimate in seconds
    pub total_time_s: f64,
    /// Per-step maneuver data when the provider supplies it
    pub native_steps: Option<Vec<NativeStep>>,
}

impl RouteGeometry {
    /// Create a route geometry, rejecting paths with fewer than 2 points
    pub fn new(
        coordinates: Vec<Coordinate>,
        total_distance_m: f64,
        total_time_s: f64,
        native_steps: Option<Vec<NativeStep>>,
    ) -> Result<Self, RouteError> {
        if coordinates.len() < 2 {
            return Err(RouteError::TooFewPoints(coordinates.len()));
        }
        Ok(Self {
            coordinates,
            total_distance_m,
            total_time_s,
            native_steps,
        })
    }

    /// Origin point
    pub fn origin(&self) -> Coordinate {
        self.coordinates[0]
    }

    /// Destination point
    pub fn destination(&self) -> Coordinate {
        *self.coordinates.last().expect("validated at construction")
    }
}
