//! Async session runner
//!
//! Owns the position subscription and the progress timer so the session
//! core stays synchronous. Updates flow out over a channel; a watch
//! channel requests shutdown.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::position::{PositionError, PositionSample};
use crate::session::{NavUpdate, NavigationSession};
use incident_model::IncidentReport;
use instruction_gen::Instruction;
use route_scorer::RouteGeometry;
use voice::SpeechSink;

/// Driver run failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Position(#[from] PositionError),
}

/// Remote control for a running driver
pub struct SessionHandle {
    shutdown: watch::Sender<bool>,
}

impl SessionHandle {
    /// Request the driver to stop; safe to call after it already exited
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }
}

/// Runs a [`NavigationSession`] against a live position stream
///
/// The driver starts the session on `run`, forwards every position sample
/// into it, and re-evaluates progress on a fixed timer between samples.
/// Position stream errors stop the session and surface as the run result.
pub struct SessionDriver<S: SpeechSink> {
    session: NavigationSession<S>,
    route: RouteGeometry,
    instructions: Vec<Instruction>,
    incidents: Vec<IncidentReport>,
    positions: mpsc::Receiver<Result<PositionSample, PositionError>>,
    updates: mpsc::Sender<NavUpdate>,
    shutdown: watch::Receiver<bool>,
    tick_interval: Duration,
}

impl<S: SpeechSink> SessionDriver<S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: NavigationSession<S>,
        route: RouteGeometry,
        instructions: Vec<Instruction>,
        incidents: Vec<IncidentReport>,
        positions: mpsc::Receiver<Result<PositionSample, PositionError>>,
        updates: mpsc::Sender<NavUpdate>,
        tick_interval: Duration,
    ) -> (Self, SessionHandle) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let driver = Self {
            session,
            route,
            instructions,
            incidents,
            positions,
            updates,
            shutdown: shutdown_rx,
            tick_interval,
        };
        (driver, SessionHandle { shutdown: shutdown_tx })
    }

    /// Drive the session until the stream ends, the handle stops it, or
    /// the position stream fails
    pub async fn run(mut self) -> Result<(), SessionError> {
        let first = self.session.start(
            self.route.clone(),
            self.instructions.clone(),
            self.incidents.clone(),
        );
        let _ = self.updates.send(first).await;

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first interval tick fires immediately; swallow it
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        info!("session driver shutdown requested");
                        break;
                    }
                }
                sample = self.positions.recv() => {
                    match sample {
                        Some(Ok(sample)) => {
                            if let Some(update) = self.session.handle_position(sample) {
                                let _ = self.updates.send(update).await;
                            }
                        }
                        Some(Err(err)) => {
                            warn!(%err, "position stream failed, stopping session");
                            if let Some(update) = self.session.stop() {
                                let _ = self.updates.send(update).await;
                            }
                            return Err(err.into());
                        }
                        None => {
                            info!("position stream closed");
                            break;
                        }
                    }
                }
                _ = ticker.tick() => {
                    if let Some(update) = self.session.tick() {
                        let _ = self.updates.send(update).await;
                    }
                }
            }
        }

        if let Some(update) = self.session.stop() {
            let _ = self.updates.send(update).await;
        }
        Ok(())
    }
}
