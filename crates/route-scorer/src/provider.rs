//! Routing provider contract

use crate::{rank_routes, RankedRoute, ScorerConfig};
use geo_core::Coordinate;
use incident_model::IncidentReport;
use thiserror::Error;
use tracing::warn;

/// Failures from the external routing provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider found no route between the points
    #[error("no route found between the requested points")]
    NoRoutes,

    /// Transport or upstream service failure
    #[error("routing provider failed: {0}")]
    Upstream(String),
}

/// External routing service returning candidate geometries
///
/// Implementations wrap whatever transport the host uses; the engine only
/// sees coordinate paths with distance/time totals.
pub trait RouteProvider {
    /// Fetch one or more alternative routes between two points
    fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl std::future::Future<Output = Result<Vec<crate::RouteGeometry>, ProviderError>> + Send;
}

/// Fetch candidates from the provider and rank them by safety
///
/// Provider failure (including "no route found") degrades to an empty
/// ranked list so the caller can show a "no route" state; it never
/// propagates as a fault.
pub async fn plan_and_rank<P: RouteProvider>(
    provider: &P,
    origin: Coordinate,
    destination: Coordinate,
    reports: &[IncidentReport],
    config: &ScorerConfig,
) -> Vec<RankedRoute> {
    match provider.routes(origin, destination).await {
        Ok(routes) => rank_routes(routes, reports, config),
        Err(err) => {
            warn!(%err, "route planning failed, returning no routes");
            Vec::new()
        }
    }
}
