//! Route Safety Scorer
//!
//! Scores and ranks alternative route geometries against the incident set:
//! - Tallies reports within a tolerance corridor of each route polyline
//! - Maps the tally to a 0-100 safety score
//! - Stable-sorts alternatives so the safest route is rank 0
//!
//! Also owns the routing-provider contract; provider failure surfaces as an
//! empty ranked list, never a panic.

mod provider;
mod route;
mod score;

pub use provider::{plan_and_rank, ProviderError, RouteProvider};
pub use route::{NativeStep, RouteError, RouteGeometry};
pub use score::{rank_routes, score_route, RankedRoute, SafetyLabel, SafetyScore, ScorerConfig};
