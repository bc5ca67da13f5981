//! Distance phrasing and spoken prompt catalogue

use crate::ManeuverType;

/// Phrase a distance for display and speech
///
/// <20 m reads as "a short distance"; <100 m rounds to the nearest 10 m;
/// <1000 m rounds to the nearest 50 m; beyond that kilometers to one
/// decimal with a trailing ".0" dropped.
pub fn phrase_distance(meters: f64) -> String {
    if meters < 20.0 {
        "a short distance".to_string()
    } else if meters < 100.0 {
        format!("{} meters", ((meters / 10.0).round() * 10.0) as i64)
    } else if meters < 1000.0 {
        format!("{} meters", ((meters / 50.0).round() * 50.0) as i64)
    } else {
        let km = meters / 1000.0;
        let formatted = format!("{km:.1}");
        let trimmed = formatted.strip_suffix(".0").unwrap_or(&formatted);
        format!("{trimmed} kilometers")
    }
}

/// Full spoken phrase for an upcoming maneuver
pub fn spoken_instruction(maneuver: ManeuverType, distance_m: f64, road: Option<&str>) -> String {
    let rounded = phrase_distance(distance_m);
    let onto = road.map(|r| format!(" onto {r}")).unwrap_or_default();

    match maneuver {
        ManeuverType::Depart => format!("Start navigation and follow the route for {rounded}"),
        ManeuverType::Arrive => {
            if distance_m < 50.0 {
                "You have arrived at your destination".to_string()
            } else {
                format!("Approaching destination - {rounded} remaining")
            }
        }
        ManeuverType::TurnLeft => format!("In {rounded}, turn left{onto}"),
        ManeuverType::TurnRight => format!("In {rounded}, turn right{onto}"),
        ManeuverType::UTurn => format!("In {rounded}, make a U-turn"),
        ManeuverType::Continue => format!("Continue straight for {rounded}"),
    }
}

/// Short urgency prompt when a maneuver is close
///
/// Returns `None` outside the 80 m prompt window.
pub fn proximity_prompt(distance_to_next_m: f64, maneuver: ManeuverType) -> Option<String> {
    if distance_to_next_m < 30.0 {
        let text = match maneuver {
            ManeuverType::TurnLeft => "Prepare to turn left now",
            ManeuverType::TurnRight => "Prepare to turn right now",
            ManeuverType::Arrive => "Arriving at destination",
            _ => "Prepare for maneuver now",
        };
        Some(text.to_string())
    } else if distance_to_next_m < 80.0 {
        let rounded = distance_to_next_m.round() as i64;
        let text = match maneuver {
            ManeuverType::Arrive => format!("Approaching destination in {rounded} meters"),
            _ => format!("Prepare to turn in {rounded} meters"),
        };
        Some(text)
    } else {
        None
    }
}
