//! Route Safety Navigation - Simulation Entry Point
//!
//! Plans routes between two fixed points over a synthetic incident set,
//! ranks them by safety, then replays a drive along the safest route
//! through the navigation session with spoken guidance on stdout.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use geo_core::{distance, polyline_length, Coordinate};
use incident_cluster::{build_clusters, cluster_color, ClusterConfig};
use incident_model::{Category, IncidentReport};
use instruction_gen::{from_native_steps, generate, InstructionConfig};
use navigation::{
    NavigationConfig, NavigationSession, PositionError, PositionSample, SessionDriver,
};
use route_scorer::{plan_and_rank, ProviderError, RouteGeometry, RouteProvider, ScorerConfig};
use voice::{SpeechSink, VoiceConfig, VoiceService};

/// Simulation parameters, overridable via NAV_SIM_* environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SimConfig {
    /// Simulated travel speed (km/h)
    speed_kmh: f64,
    /// Seconds of simulated travel between position samples
    sample_interval_s: f64,
    /// Map zoom used for the cluster overview
    zoom: u8,
    /// Spoken guidance on stdout
    voice: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            speed_kmh: 40.0,
            sample_interval_s: 2.0,
            zoom: 12,
            voice: true,
        }
    }
}

impl SimConfig {
    fn load() -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::Config::try_from(&SimConfig::default())?)
            .add_source(config::File::with_name("nav-sim").required(false))
            .add_source(config::Environment::with_prefix("NAV_SIM"))
            .build()
            .context("building simulation config")?
            .try_deserialize()
            .context("deserializing simulation config")
    }
}

/// Prints spoken guidance instead of synthesizing it
struct ConsoleSink;

impl SpeechSink for ConsoleSink {
    fn speak(&mut self, text: &str) {
        println!("  [voice] {text}");
    }

    fn cancel(&mut self) {}
}

/// Offline provider returning two hand-drawn alternatives
///
/// The direct route passes close to the danger reports; the detour swings
/// east around them.
struct SyntheticProvider;

impl RouteProvider for SyntheticProvider {
    async fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<RouteGeometry>, ProviderError> {
        let mk = |points: Vec<(f64, f64)>, time_s: f64| {
            let coords: Vec<Coordinate> = points
                .into_iter()
                .map(|(lat, lon)| Coordinate::new(lat, lon).expect("synthetic coordinate"))
                .collect();
            let total = polyline_length(&coords);
            RouteGeometry::new(coords, total, time_s, None)
                .map_err(|e| ProviderError::Upstream(e.to_string()))
        };

        let (o, d) = ((origin.lat, origin.lon), (destination.lat, destination.lon));
        let direct = mk(vec![o, (0.010, 0.000), (0.020, 0.000), d], 300.0)?;
        let detour = mk(
            vec![o, (0.008, 0.012), (0.018, 0.014), (0.026, 0.008), d],
            420.0,
        )?;
        Ok(vec![direct, detour])
    }
}

fn report(lat: f64, lon: f64, category: Category, description: &str) -> IncidentReport {
    IncidentReport {
        id: Uuid::new_v4(),
        category,
        location: Coordinate::new(lat, lon).expect("synthetic report location"),
        description: description.to_string(),
        created_at: Utc::now(),
    }
}

fn synthetic_reports() -> Vec<IncidentReport> {
    vec![
        report(0.012, 0.001, Category::Danger, "Armed robbery reported"),
        report(0.013, -0.001, Category::Danger, "Street fight"),
        report(0.018, 0.002, Category::Caution, "Poor street lighting"),
        report(0.009, 0.013, Category::Safe, "Police patrol nearby"),
        report(0.020, 0.013, Category::Caution, "Pothole on the shoulder"),
    ]
}

/// Resample the route polyline at a fixed step so samples arrive the way a
/// position sensor would
fn sample_points(route: &RouteGeometry, step_m: f64) -> Vec<Coordinate> {
    let mut samples = vec![route.origin()];
    let mut carried = 0.0;
    for pair in route.coordinates.windows(2) {
        let seg = distance(pair[0], pair[1]);
        if seg <= 0.0 {
            continue;
        }
        let mut along = step_m - carried;
        while along < seg {
            let t = along / seg;
            let lat = pair[0].lat + (pair[1].lat - pair[0].lat) * t;
            let lon = pair[0].lon + (pair[1].lon - pair[0].lon) * t;
            if let Ok(point) = Coordinate::new(lat, lon) {
                samples.push(point);
            }
            along += step_m;
        }
        carried = (carried + seg) % step_m;
    }
    samples.push(route.destination());
    samples
}

fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Route Safety Navigation Sim v{} ===", env!("CARGO_PKG_VERSION"));
    let sim = SimConfig::load()?;
    info!(speed_kmh = sim.speed_kmh, zoom = sim.zoom, "simulation config loaded");

    let reports = synthetic_reports();

    // Incident overview the way the map would draw it at this zoom
    let cluster_config = ClusterConfig::default();
    let clusters = build_clusters(&reports, cluster_config.radius_for_zoom(sim.zoom));
    for cluster in &clusters {
        info!(
            members = cluster.counts.total(),
            color = %cluster_color(cluster.counts).to_hex(),
            radius_m = cluster.display_radius_m(&cluster_config),
            lat = cluster.centroid.lat,
            lon = cluster.centroid.lon,
            "incident cluster",
        );
    }

    // Plan and rank the alternatives
    let origin = Coordinate::new(0.0, 0.0).context("origin")?;
    let destination = Coordinate::new(0.03, 0.0).context("destination")?;
    let ranked = plan_and_rank(
        &SyntheticProvider,
        origin,
        destination,
        &reports,
        &ScorerConfig::default(),
    )
    .await;
    anyhow::ensure!(!ranked.is_empty(), "no route between origin and destination");

    for route in &ranked {
        info!(
            rank = route.rank,
            score = route.safety.score,
            label = route.safety.label().text(),
            distance_m = route.geometry.total_distance_m,
            "route candidate",
        );
    }

    let best = &ranked[0];
    let instructions = from_native_steps(&best.geometry).unwrap_or_else(|| {
        generate(
            &best.geometry.coordinates,
            best.geometry.total_distance_m,
            &InstructionConfig::default(),
        )
    });
    info!(count = instructions.len(), "instructions generated");

    // Replay the drive through the session driver
    let voice = VoiceService::new(
        ConsoleSink,
        VoiceConfig {
            enabled: sim.voice,
            ..VoiceConfig::default()
        },
    );
    let nav_config = NavigationConfig::default();
    let tick = Duration::from_secs_f64(nav_config.tick_interval_s);
    let session = NavigationSession::new(nav_config, voice);

    let (pos_tx, pos_rx) = mpsc::channel::<Result<PositionSample, PositionError>>(16);
    let (update_tx, mut update_rx) = mpsc::channel(16);
    let (driver, _handle) = SessionDriver::new(
        session,
        best.geometry.clone(),
        instructions,
        reports,
        pos_rx,
        update_tx,
        tick,
    );
    let driver_task = tokio::spawn(driver.run());

    let step_m = sim.speed_kmh / 3.6 * sim.sample_interval_s;
    let route_for_playback = best.geometry.clone();
    let feeder = tokio::spawn(async move {
        for point in sample_points(&route_for_playback, step_m) {
            if pos_tx.send(Ok(PositionSample::at(point))).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        // Dropping the sender ends the session
    });

    while let Some(update) = update_rx.recv().await {
        info!(
            next = %update.next_instruction,
            to_next_m = update.distance_to_next_m.round(),
            remaining_m = update.distance_remaining_m.round(),
            remaining_s = update.time_remaining_s.round(),
            "progress",
        );
    }

    feeder.await.context("position feeder")?;
    driver_task.await.context("session driver")??;
    info!("simulation complete");
    Ok(())
}
