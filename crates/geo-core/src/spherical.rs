//! Great-circle distance, bearing, and cross-track computations

use crate::Coordinate;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Segments shorter than this (in degrees per axis) are treated as points
const DEGENERATE_SEGMENT_DEG: f64 = 1e-5;

/// Great-circle distance between two coordinates in meters (haversine)
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat_rad();
    let phi2 = b.lat_rad();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial compass bearing from `a` to `b` in degrees, [0, 360)
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat_rad();
    let phi2 = b.lat_rad();
    let dlambda = (b.lon - a.lon).to_radians();

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Signed shortest angular path from `from` to `to` in degrees, (-180, 180]
pub fn angular_delta(from: f64, to: f64) -> f64 {
    let mut diff = (to - from) % 360.0;
    if diff > 180.0 {
        diff -= 360.0;
    }
    if diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

/// Distance in meters from point `p` to the great-circle segment `start`..`end`
///
/// Returns the cross-track distance when the along-track projection of `p`
/// falls within the segment, otherwise the distance to the nearer endpoint.
/// Degenerate segments fall back to point-to-point distance.
pub fn point_to_segment_distance(p: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    if (start.lat - end.lat).abs() < DEGENERATE_SEGMENT_DEG
        && (start.lon - end.lon).abs() < DEGENERATE_SEGMENT_DEG
    {
        return distance(p, start);
    }

    let d_start = distance(p, start);
    let d_end = distance(p, end);
    let seg_len = distance(start, end);

    let bearing_seg = bearing(start, end).to_radians();
    let bearing_point = bearing(start, p).to_radians();

    // Cross-track and along-track distances on the sphere
    let angular = d_start / EARTH_RADIUS_M;
    let cross_track = (angular.sin() * (bearing_point - bearing_seg).sin()).asin() * EARTH_RADIUS_M;
    let along_ratio = (angular.cos() / (cross_track / EARTH_RADIUS_M).cos()).clamp(-1.0, 1.0);
    let along_track = along_ratio.acos() * EARTH_RADIUS_M;

    // Projection behind the start or past the end: nearest endpoint wins
    if (bearing_point - bearing_seg).cos() < 0.0 {
        return d_start;
    }
    if along_track > seg_len {
        return d_end;
    }

    cross_track.abs()
}

/// Along-track distance in meters from `start` of the projection of `p`
/// onto the segment `start`..`end`, clamped to [0, segment length]
///
/// Projections behind the start return 0 and past the end return the
/// segment length; degenerate segments project to the start.
pub fn along_track_distance(p: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    if (start.lat - end.lat).abs() < DEGENERATE_SEGMENT_DEG
        && (start.lon - end.lon).abs() < DEGENERATE_SEGMENT_DEG
    {
        return 0.0;
    }

    let seg_len = distance(start, end);
    let bearing_seg = bearing(start, end).to_radians();
    let bearing_point = bearing(start, p).to_radians();
    if (bearing_point - bearing_seg).cos() < 0.0 {
        return 0.0;
    }

    let angular = distance(p, start) / EARTH_RADIUS_M;
    let cross_track = (angular.sin() * (bearing_point - bearing_seg).sin()).asin() * EARTH_RADIUS_M;
    let along_ratio = (angular.cos() / (cross_track / EARTH_RADIUS_M).cos()).clamp(-1.0, 1.0);
    (along_ratio.acos() * EARTH_RADIUS_M).min(seg_len)
}

/// True when `p` lies within `tolerance_m` of any segment of the polyline
///
/// Short-circuits on the first segment within tolerance; this runs once per
/// report per candidate route during scoring.
pub fn is_near_polyline(p: Coordinate, coordinates: &[Coordinate], tolerance_m: f64) -> bool {
    coordinates
        .windows(2)
        .any(|pair| point_to_segment_distance(p, pair[0], pair[1]) <= tolerance_m)
}

/// Total length of a polyline in meters
pub fn polyline_length(coordinates: &[Coordinate]) -> f64 {
    coordinates.windows(2).map(|pair| distance(pair[0], pair[1])).sum()
}
