//! Navigation Session
//!
//! Stateful tracking of a moving position against a chosen route:
//! - Heading smoothing over an unreliable sensor stream
//! - Remaining distance/time from the closest point on the route polyline
//! - Current/next instruction selection with voice guidance
//! - Hazard-zone entry/exit detection with per-report deduplication
//! - An async driver that owns the position subscription and progress timer

mod driver;
mod hazard;
mod heading;
mod position;
mod session;

pub use driver::{SessionDriver, SessionError, SessionHandle};
pub use hazard::{HazardConfig, HazardTracker, ZoneAlert, ZoneAnnouncement, ZoneStage};
pub use heading::smooth_heading;
pub use position::{PositionError, PositionSample};
pub use session::{NavUpdate, NavigationConfig, NavigationSession};
