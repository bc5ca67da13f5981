//! Maneuver instruction derivation

use crate::phrase::phrase_distance;
use geo_core::{angular_delta, bearing, distance, Coordinate};
use route_scorer::RouteGeometry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Classified maneuver at an instruction point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverType {
    Depart,
    TurnLeft,
    TurnRight,
    UTurn,
    Continue,
    Arrive,
}

impl ManeuverType {
    /// Lenient parse of provider maneuver strings ("turn-left",
    /// "end of road", ...)
    pub fn parse(s: &str) -> Self {
        let cleaned = s.trim().to_ascii_lowercase().replace('-', " ");
        match cleaned.as_str() {
            "depart" | "start" => Self::Depart,
            "arrive" | "destination" => Self::Arrive,
            "turn left" => Self::TurnLeft,
            "turn right" => Self::TurnRight,
            "uturn" | "u turn" | "turn around" => Self::UTurn,
            "continue" | "straight" => Self::Continue,
            other if other.contains("left") => Self::TurnLeft,
            other if other.contains("right") => Self::TurnRight,
            _ => Self::Continue,
        }
    }
}

/// One turn-by-turn guidance unit
///
/// Produced once per route selection; the navigation session treats the
/// sequence as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    /// Where the maneuver happens
    pub point: Coordinate,
    /// Display text
    pub text: String,
    /// Classified maneuver
    pub maneuver: ManeuverType,
    /// Distance covered since the previous instruction in meters
    pub distance_m: f64,
    /// First instruction of the route
    pub is_start: bool,
    /// Inserted between start and destination
    pub is_intermediate: bool,
    /// Last instruction of the route
    pub is_destination: bool,
}

/// Instruction generation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionConfig {
    /// Bearing change that triggers a turn instruction (degrees)
    pub turn_threshold_deg: f64,
    /// Bearing change treated as a turn-around rather than a turn (degrees)
    pub uturn_threshold_deg: f64,
    /// Accumulated distance that forces a continue instruction (meters)
    pub distance_cap_m: f64,
    /// Vertex stride that forces an instruction on long straight roads
    pub vertex_stride: usize,
}

impl Default for InstructionConfig {
    fn default() -> Self {
        Self {
            turn_threshold_deg: 45.0,
            uturn_threshold_deg: 120.0,
            distance_cap_m: 500.0,
            vertex_stride: 20,
        }
    }
}

impl InstructionConfig {
    /// More talkative preset for dense city grids
    pub fn dense() -> Self {
        Self {
            turn_threshold_deg: 25.0,
            distance_cap_m: 300.0,
            ..Default::default()
        }
    }
}

/// Derive instructions from a raw coordinate sequence
///
/// Emits a depart instruction at the first point, an arrive instruction at
/// the last (distance = total route length), and intermediate instructions
/// whenever the bearing change at a vertex exceeds the turn threshold, the
/// accumulated distance exceeds the cap, or the vertex stride elapses.
/// Sequences shorter than 2 points produce no instructions.
pub fn generate(
    coordinates: &[Coordinate],
    total_distance_m: f64,
    config: &InstructionConfig,
) -> Vec<Instruction> {
    if coordinates.len() < 2 {
        return Vec::new();
    }

    let mut instructions = Vec::new();

    instructions.push(Instruction {
        point: coordinates[0],
        text: "Start navigation and follow the route".to_string(),
        maneuver: ManeuverType::Depart,
        distance_m: 0.0,
        is_start: true,
        is_intermediate: false,
        is_destination: false,
    });

    let mut accumulated_m = 0.0;

    for i in 1..coordinates.len() - 1 {
        let prev = coordinates[i - 1];
        let curr = coordinates[i];
        let next = coordinates[i + 1];

        accumulated_m += distance(prev, curr);

        let incoming = bearing(prev, curr);
        let outgoing = bearing(curr, next);
        // Signed shortest path handles the 0/360 seam; negative is a left turn
        let delta = angular_delta(incoming, outgoing);
        let magnitude = delta.abs();

        let should_emit = magnitude > config.turn_threshold_deg
            || accumulated_m > config.distance_cap_m
            || i % config.vertex_stride == 0;
        if !should_emit {
            continue;
        }

        let (maneuver, text) = if magnitude > config.turn_threshold_deg
            && magnitude < config.uturn_threshold_deg
        {
            if delta > 0.0 {
                (ManeuverType::TurnRight, "Turn right".to_string())
            } else {
                (ManeuverType::TurnLeft, "Turn left".to_string())
            }
        } else if magnitude >= config.uturn_threshold_deg {
            (ManeuverType::UTurn, "Make a U-turn".to_string())
        } else if accumulated_m > config.distance_cap_m {
            (
                ManeuverType::Continue,
                format!("Continue for {}", phrase_distance(accumulated_m)),
            )
        } else {
            (ManeuverType::Continue, "Continue straight".to_string())
        };

        instructions.push(Instruction {
            point: curr,
            text,
            maneuver,
            distance_m: accumulated_m,
            is_start: false,
            is_intermediate: true,
            is_destination: false,
        });
        accumulated_m = 0.0;
    }

    instructions.push(Instruction {
        point: *coordinates.last().expect("length checked above"),
        text: "You have reached your destination".to_string(),
        maneuver: ManeuverType::Arrive,
        distance_m: total_distance_m,
        is_start: false,
        is_intermediate: false,
        is_destination: true,
    });

    debug!(
        vertices = coordinates.len(),
        instructions = instructions.len(),
        "generated instructions from polyline"
    );
    instructions
}

/// Convert provider-native steps into the instruction sequence
///
/// Returns `None` when the route carries no usable steps, in which case the
/// caller should fall back to [`generate`].
pub fn from_native_steps(route: &RouteGeometry) -> Option<Vec<Instruction>> {
    let steps = route.native_steps.as_ref()?;
    if steps.is_empty() {
        return None;
    }

    let last = steps.len() - 1;
    let instructions = steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let maneuver = ManeuverType::parse(&step.maneuver);
            Instruction {
                point: step.location,
                text: step.text.clone(),
                maneuver,
                distance_m: step.distance_m,
                is_start: i == 0,
                is_intermediate: i != 0 && i != last,
                is_destination: i == last,
            }
        })
        .collect();
    Some(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_scorer::NativeStep;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_empty_and_single_point() {
        let config = InstructionConfig::default();
        assert!(generate(&[], 0.0, &config).is_empty());
        assert!(generate(&[coord(0.0, 0.0)], 0.0, &config).is_empty());
    }

    #[test]
    fn test_starts_and_ends_correctly() {
        let coords = vec![coord(0.0, 0.0), coord(0.01, 0.0), coord(0.02, 0.0)];
        let instructions = generate(&coords, 2200.0, &InstructionConfig::default());
        assert!(instructions.first().unwrap().is_start);
        assert_eq!(instructions.first().unwrap().maneuver, ManeuverType::Depart);
        assert!(instructions.last().unwrap().is_destination);
        assert_eq!(instructions.last().unwrap().maneuver, ManeuverType::Arrive);
        assert_eq!(instructions.last().unwrap().distance_m, 2200.0);
    }

    #[test]
    fn test_right_turn_detected() {
        // North then east: +90 degree bearing change
        let coords = vec![coord(0.0, 0.0), coord(0.01, 0.0), coord(0.01, 0.01)];
        let instructions = generate(&coords, 2200.0, &InstructionConfig::default());
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[1].maneuver, ManeuverType::TurnRight);
    }

    #[test]
    fn test_left_turn_detected() {
        // North then west: -90 degree bearing change
        let coords = vec![coord(0.0, 0.0), coord(0.01, 0.0), coord(0.01, -0.01)];
        let instructions = generate(&coords, 2200.0, &InstructionConfig::default());
        assert_eq!(instructions[1].maneuver, ManeuverType::TurnLeft);
    }

    #[test]
    fn test_turn_classified_across_north_seam() {
        // Heading ~350 then ~10 is a right turn despite the raw bearing drop
        let coords = vec![coord(0.0, 0.0), coord(0.01, -0.0018), coord(0.02, 0.0)];
        let config = InstructionConfig {
            turn_threshold_deg: 15.0,
            ..Default::default()
        };
        let instructions = generate(&coords, 4400.0, &config);
        assert_eq!(instructions[1].maneuver, ManeuverType::TurnRight);
    }

    #[test]
    fn test_uturn_detected() {
        // North then back south
        let coords = vec![coord(0.0, 0.0), coord(0.01, 0.0), coord(0.0001, 0.0)];
        let instructions = generate(&coords, 2200.0, &InstructionConfig::default());
        assert_eq!(instructions[1].maneuver, ManeuverType::UTurn);
    }

    #[test]
    fn test_distance_cap_forces_continue() {
        // Straight line with ~1.1 km between vertices
        let coords = vec![coord(0.0, 0.0), coord(0.01, 0.0), coord(0.02, 0.0)];
        let instructions = generate(&coords, 2200.0, &InstructionConfig::default());
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[1].maneuver, ManeuverType::Continue);
        assert!(instructions[1].text.starts_with("Continue for"));
    }

    #[test]
    fn test_vertex_stride_breaks_silence() {
        // Many short straight segments, below the distance cap
        let coords: Vec<Coordinate> = (0..60).map(|i| coord(f64::from(i) * 0.0001, 0.0)).collect();
        let instructions = generate(&coords, 650.0, &InstructionConfig::default());
        // depart + stride hits at i=20 and i=40 + arrive
        assert!(instructions.len() >= 4, "got {}", instructions.len());
    }

    #[test]
    fn test_native_steps_preferred() {
        let route = RouteGeometry::new(
            vec![coord(0.0, 0.0), coord(0.01, 0.0)],
            1100.0,
            120.0,
            Some(vec![
                NativeStep {
                    location: coord(0.0, 0.0),
                    maneuver: "depart".to_string(),
                    text: "Head north".to_string(),
                    distance_m: 0.0,
                },
                NativeStep {
                    location: coord(0.01, 0.0),
                    maneuver: "arrive".to_string(),
                    text: "Arrive".to_string(),
                    distance_m: 1100.0,
                },
            ]),
        )
        .unwrap();
        let instructions = from_native_steps(&route).unwrap();
        assert_eq!(instructions.len(), 2);
        assert!(instructions[0].is_start);
        assert!(instructions[1].is_destination);
    }

    #[test]
    fn test_native_steps_absent() {
        let route = RouteGeometry::new(
            vec![coord(0.0, 0.0), coord(0.01, 0.0)],
            1100.0,
            120.0,
            None,
        )
        .unwrap();
        assert!(from_native_steps(&route).is_none());
    }

    #[test]
    fn test_maneuver_parse_lenient() {
        assert_eq!(ManeuverType::parse("turn-left"), ManeuverType::TurnLeft);
        assert_eq!(ManeuverType::parse("Sharp Right"), ManeuverType::TurnRight);
        assert_eq!(ManeuverType::parse("roundabout"), ManeuverType::Continue);
        assert_eq!(ManeuverType::parse("destination"), ManeuverType::Arrive);
    }
}
