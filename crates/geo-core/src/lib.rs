//! Geo Core
//!
//! Spherical geometry primitives used throughout the navigation engine:
//! - Validated coordinates (rejects NaN and out-of-range degrees)
//! - Great-circle distance and initial bearing
//! - Cross-track (point-to-segment) distance
//! - Polyline proximity checks

mod coordinate;
mod spherical;

pub use coordinate::{Coordinate, GeoError};
pub use spherical::{
    along_track_distance, angular_delta, bearing, distance, is_near_polyline,
    point_to_segment_distance, polyline_length, EARTH_RADIUS_M,
};
