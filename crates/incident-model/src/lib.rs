//! Incident Model
//!
//! User-submitted, geolocated safety observations. Reports are created by an
//! external collaborator and only ever read by the engine.

mod report;

pub use report::{Category, IncidentReport, ReportKey};
