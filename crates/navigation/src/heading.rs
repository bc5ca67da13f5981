//! Heading smoothing filter

use geo_core::angular_delta;

/// Fraction of the heading delta applied per update
const BLEND: f64 = 0.3;

/// Blend the current heading toward a target heading
///
/// Applies 30% of the shortest angular delta per update, which keeps the
/// marker from jittering on noisy sensor headings. Pure function of its
/// inputs; wraparound at 0/360 follows the shortest path.
pub fn smooth_heading(current: f64, target: f64) -> f64 {
    let next = current + angular_delta(current, target) * BLEND;
    (next % 360.0 + 360.0) % 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blends_toward_target() {
        let next = smooth_heading(0.0, 100.0);
        assert!((next - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_change_at_target() {
        assert_eq!(smooth_heading(90.0, 90.0), 90.0);
    }

    #[test]
    fn test_wraps_shortest_path_clockwise() {
        // 350 -> 10 is +20 degrees, not -340
        let next = smooth_heading(350.0, 10.0);
        assert!((next - 356.0).abs() < 1e-9);
    }

    #[test]
    fn test_wraps_shortest_path_counterclockwise() {
        // 10 -> 350 is -20 degrees
        let next = smooth_heading(10.0, 350.0);
        assert!((next - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_converges_over_updates() {
        let mut heading = 0.0;
        for _ in 0..30 {
            heading = smooth_heading(heading, 90.0);
        }
        assert!((heading - 90.0).abs() < 0.1);
    }

    #[test]
    fn test_stays_in_range() {
        let next = smooth_heading(359.0, 5.0);
        assert!((0.0..360.0).contains(&next));
    }
}
