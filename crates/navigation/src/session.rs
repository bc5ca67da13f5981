//! Navigation session state machine

use crate::hazard::{HazardConfig, HazardTracker, ZoneAlert};
use crate::heading::smooth_heading;
use crate::position::PositionSample;
use geo_core::{
    along_track_distance, bearing, distance, point_to_segment_distance, polyline_length, Coordinate,
};
use incident_model::IncidentReport;
use instruction_gen::{
    generate, proximity_prompt, spoken_instruction, Instruction, InstructionConfig,
};
use route_scorer::RouteGeometry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use voice::{SpeechSink, VoiceService};

/// Session tuning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Fallback average speed for remaining-time estimates (km/h), used
    /// when the provider supplied no total time
    pub average_speed_kmh: f64,
    /// Hold the current instruction while the destination is further away
    /// than this (meters)
    pub destination_hold_m: f64,
    /// Snap back to the previous instruction when the nearest one is the
    /// destination but still further than this (meters)
    pub destination_snap_m: f64,
    /// Speak the arrival prompt inside this radius (meters)
    pub arrival_announce_m: f64,
    /// Speak proximity prompts inside this radius (meters)
    pub proximity_prompt_m: f64,
    /// Speak the full maneuver phrase inside this radius (meters)
    pub instruction_speech_m: f64,
    /// Announce "navigation started" once the first real instruction is
    /// inside this radius (meters)
    pub started_announce_m: f64,
    /// Hazard-zone thresholds
    pub hazard: HazardConfig,
    /// Progress re-evaluation tick for the async driver (seconds)
    pub tick_interval_s: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            average_speed_kmh: 40.0,
            destination_hold_m: 50.0,
            destination_snap_m: 100.0,
            arrival_announce_m: 25.0,
            proximity_prompt_m: 80.0,
            instruction_speech_m: 100.0,
            started_announce_m: 1000.0,
            hazard: HazardConfig::default(),
            tick_interval_s: 2.0,
        }
    }
}

/// Progress update emitted to the UI after every position update or tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavUpdate {
    /// Text of the next instruction to follow
    pub next_instruction: String,
    /// Distance to the next maneuver point (meters)
    pub distance_to_next_m: f64,
    /// Remaining route distance (meters)
    pub distance_remaining_m: f64,
    /// Remaining travel time estimate (seconds)
    pub time_remaining_s: f64,
}

/// Mutable state of an active session
struct ActiveState {
    route: RouteGeometry,
    instructions: Vec<Instruction>,
    current_instruction: usize,
    next_instruction: usize,
    distance_to_next_m: f64,
    distance_remaining_m: f64,
    time_remaining_s: f64,
    last_position: Option<PositionSample>,
    heading_deg: f64,
    hazards: HazardTracker,
    incidents: Vec<IncidentReport>,
    announced_start: bool,
}

/// Live navigation tracker: idle -> active -> idle
///
/// The session core is synchronous and driven by explicit calls, which
/// keeps it unit-testable without simulating real time; [`crate::SessionDriver`]
/// wraps it with the position subscription and progress timer.
pub struct NavigationSession<S: SpeechSink> {
    config: NavigationConfig,
    voice: VoiceService<S>,
    active: Option<ActiveState>,
}

impl<S: SpeechSink> NavigationSession<S> {
    /// Create an idle session
    pub fn new(config: NavigationConfig, voice: VoiceService<S>) -> Self {
        Self {
            config,
            voice,
            active: None,
        }
    }

    /// Whether a navigation is in progress
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Smoothed marker heading in degrees
    pub fn heading(&self) -> Option<f64> {
        self.active.as_ref().map(|s| s.heading_deg)
    }

    /// Hazard currently being tracked, if any
    pub fn active_zone_alert(&self) -> Option<&ZoneAlert> {
        self.active.as_ref().and_then(|s| s.hazards.active())
    }

    /// Index of the instruction the position is closest to
    pub fn current_instruction(&self) -> Option<usize> {
        self.active.as_ref().map(|s| s.current_instruction)
    }

    /// Last computed progress snapshot
    ///
    /// Reflects the same instruction selection as the most recent
    /// `handle_position`, destination hold included.
    pub fn progress(&self) -> Option<NavUpdate> {
        let state = self.active.as_ref()?;
        let next = state.instructions.get(state.next_instruction)?;
        Some(NavUpdate {
            next_instruction: next.text.clone(),
            distance_to_next_m: state.distance_to_next_m,
            distance_remaining_m: state.distance_remaining_m,
            time_remaining_s: state.time_remaining_s,
        })
    }

    /// Voice toggle passthrough
    pub fn set_voice_enabled(&mut self, enabled: bool) {
        self.voice.set_enabled(enabled);
    }

    /// Begin navigating a route
    ///
    /// The incident snapshot is fixed for the lifetime of the session; the
    /// caller supplies a fresh one on restart. An already-active session is
    /// stopped first so two sessions never race on the same UI state.
    pub fn start(
        &mut self,
        route: RouteGeometry,
        instructions: Vec<Instruction>,
        incidents: Vec<IncidentReport>,
    ) -> NavUpdate {
        if self.active.is_some() {
            info!("restarting navigation session");
            self.stop();
        }

        // Instruction tracking indexes into this list, so an empty one from
        // a degenerate provider falls back to polyline-derived guidance
        let instructions = if instructions.is_empty() {
            generate(
                &route.coordinates,
                route.total_distance_m,
                &InstructionConfig::default(),
            )
        } else {
            instructions
        };

        let update = NavUpdate {
            next_instruction: "Starting navigation... Follow the route.".to_string(),
            distance_to_next_m: 0.0,
            distance_remaining_m: route.total_distance_m,
            time_remaining_s: route.total_time_s,
        };

        self.active = Some(ActiveState {
            distance_to_next_m: 0.0,
            distance_remaining_m: route.total_distance_m,
            time_remaining_s: route.total_time_s,
            current_instruction: 0,
            next_instruction: 1.min(instructions.len().saturating_sub(1)),
            last_position: None,
            heading_deg: 0.0,
            hazards: HazardTracker::default(),
            incidents,
            announced_start: false,
            route,
            instructions,
        });

        info!("navigation session started");
        self.voice
            .speak("Navigation starting. Please follow the route.", false);
        update
    }

    /// Process a position sample; returns the UI update, or `None` when idle
    pub fn handle_position(&mut self, sample: PositionSample) -> Option<NavUpdate> {
        let state = self.active.as_mut()?;

        // 1. Heading: prefer the sensor's, else derive from movement
        let target_heading = sample.heading.or_else(|| {
            state
                .last_position
                .map(|prev| bearing(prev.location, sample.location))
        });
        if let Some(target) = target_heading {
            state.heading_deg = smooth_heading(state.heading_deg, target);
        }

        // 2. Remaining distance/time from the closest point on the polyline
        let (remaining_m, remaining_s) =
            remaining_progress(&state.route, sample.location, &self.config);
        state.distance_remaining_m = remaining_m;
        state.time_remaining_s = remaining_s;

        // 3. Current/next instruction
        let (current, next_index) =
            select_instructions(&state.instructions, sample.location, &self.config);
        state.current_instruction = current;
        state.next_instruction = next_index;
        let next = &state.instructions[next_index];
        let distance_to_next = distance(sample.location, next.point);
        state.distance_to_next_m = distance_to_next;

        // 4. Voice guidance for the upcoming maneuver
        if !next.is_start {
            if !state.announced_start && distance_to_next < self.config.started_announce_m {
                state.announced_start = true;
                self.voice.speak("Navigation started. Follow the route.", false);
            }

            if next.is_destination && distance_to_next < self.config.arrival_announce_m {
                self.voice.speak("You have arrived at your destination", false);
            } else {
                if distance_to_next < self.config.proximity_prompt_m {
                    if let Some(prompt) = proximity_prompt(distance_to_next, next.maneuver) {
                        self.voice.speak(&prompt, false);
                    }
                }
                if distance_to_next < self.config.instruction_speech_m {
                    let phrase = spoken_instruction(next.maneuver, distance_to_next, None);
                    self.voice.speak(&phrase, false);
                }
            }
        }

        // 5. Hazard zones, independent of instruction tracking
        if let Some(alert) =
            state
                .hazards
                .update(sample.location, &state.incidents, &self.config.hazard)
        {
            self.voice.speak(&alert.text, false);
        }

        state.last_position = Some(sample);

        debug!(
            instruction = next_index,
            distance_to_next_m = distance_to_next,
            remaining_m,
            "position update processed"
        );

        Some(NavUpdate {
            next_instruction: next.text.clone(),
            distance_to_next_m: distance_to_next,
            distance_remaining_m: remaining_m,
            time_remaining_s: remaining_s,
        })
    }

    /// Re-evaluate progress with the last known position
    ///
    /// Called by the driver timer so UI text keeps moving between sensor
    /// samples; a session with no fix yet produces nothing.
    pub fn tick(&mut self) -> Option<NavUpdate> {
        let last = self.active.as_ref()?.last_position?;
        self.handle_position(last)
    }

    /// End navigation
    ///
    /// Cancels any in-flight utterance and clears all state. Idempotent:
    /// stopping an idle session returns `None`.
    pub fn stop(&mut self) -> Option<NavUpdate> {
        let state = self.active.take()?;
        self.voice.cancel();
        info!("navigation session stopped");
        Some(NavUpdate {
            next_instruction: "Navigation ended".to_string(),
            distance_to_next_m: 0.0,
            distance_remaining_m: state.distance_remaining_m,
            time_remaining_s: 0.0,
        })
    }
}

/// Remaining route distance and time from a position
///
/// Projects the position onto the closest route segment, sums from the
/// projection point to the destination, and adds the perpendicular offset
/// to the route. Progress inside a segment counts, so remaining distance
/// shrinks continuously even on sparse polylines. Time scales the provider
/// estimate by remaining fraction, falling back to the configured average
/// speed.
fn remaining_progress(
    route: &RouteGeometry,
    position: Coordinate,
    config: &NavigationConfig,
) -> (f64, f64) {
    let coords = &route.coordinates;

    let mut nearest_seg = 0;
    let mut offset_m = f64::MAX;
    for (i, pair) in coords.windows(2).enumerate() {
        let d = point_to_segment_distance(position, pair[0], pair[1]);
        if d < offset_m {
            offset_m = d;
            nearest_seg = i;
        }
    }

    let seg_start = coords[nearest_seg];
    let seg_end = coords[nearest_seg + 1];
    let ahead_m =
        (distance(seg_start, seg_end) - along_track_distance(position, seg_start, seg_end)).max(0.0);
    let remaining_m = ahead_m + polyline_length(&coords[nearest_seg + 1..]) + offset_m;

    let remaining_s = if route.total_time_s > 0.0 && route.total_distance_m > 0.0 {
        route.total_time_s * (remaining_m / route.total_distance_m).min(1.0)
    } else {
        remaining_m / (config.average_speed_kmh / 3.6)
    };

    (remaining_m, remaining_s)
}

/// Pick the current instruction and the one to announce next
///
/// The current instruction is the nearest one; when that is the destination
/// but the position is still far off-route, step back one. The next
/// instruction holds at the current one while the destination is still
/// beyond the hold radius.
fn select_instructions(
    instructions: &[Instruction],
    position: Coordinate,
    config: &NavigationConfig,
) -> (usize, usize) {
    let last = instructions.len() - 1;

    let mut closest = 0;
    let mut min_d = f64::MAX;
    for (i, instruction) in instructions.iter().enumerate() {
        let d = distance(position, instruction.point);
        if d < min_d {
            min_d = d;
            closest = i;
        }
    }

    if closest == last && min_d > config.destination_snap_m {
        closest = last.saturating_sub(1);
    }

    let next = if closest < last {
        let candidate = closest + 1;
        let far_from_destination = instructions[candidate].is_destination
            && distance(position, instructions[candidate].point) > config.destination_hold_m;
        if far_from_destination {
            closest
        } else {
            candidate
        }
    } else {
        closest
    };

    (closest, next)
}
