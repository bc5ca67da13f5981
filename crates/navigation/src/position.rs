//! Position sensor types

use geo_core::Coordinate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One sample from the device position sensor
///
/// Arrives asynchronously at irregular intervals, typically every 1-5 s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Reported location
    pub location: Coordinate,
    /// Sensor heading in degrees when the device provides one
    pub heading: Option<f64>,
    /// Reported accuracy radius in meters
    pub accuracy_m: Option<f64>,
}

impl PositionSample {
    /// Sample with location only
    pub fn at(location: Coordinate) -> Self {
        Self {
            location,
            heading: None,
            accuracy_m: None,
        }
    }
}

/// Position stream failures
///
/// Surfaced to the caller; the session driver stops the active session as
/// if the user had cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position fix timed out")]
    Timeout,

    #[error("position sensor unavailable: {0}")]
    Unavailable(String),
}
