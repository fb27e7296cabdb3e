//! Headless driver that paces a soup the way a display loop would.

mod report;
mod telemetry;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use soup_core::{Position, RunId, RunnerConfig, SoupConfig, Species};
use soup_world::Simulation;
use std::sync::Arc;
use std::time::Instant;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    telemetry::init_telemetry(config.runner.otel_endpoint.as_deref())?;

    let run_id = RunId::new();
    info!(
        %run_id,
        width = config.world.width,
        height = config.world.height,
        seed = config.world.seed,
        "Starting soup runner"
    );

    let sim = Arc::new(Mutex::new(Simulation::new(&config)));
    {
        let mut sim = sim.lock();
        seed_soup(&mut sim, config.runner.seed_strokes, config.world.seed)?;
        sim.emit_population_metrics();
    }

    let mut frame_loop = tokio::spawn(run_frame_loop(sim.clone(), config.runner.clone()));

    tokio::select! {
        result = &mut frame_loop => {
            match result {
                Ok(()) => info!("Generation limit reached"),
                Err(e) => error!("Frame loop failed: {}", e),
            }
        }
        _ = shutdown_signal() => {
            frame_loop.abort();
        }
    }

    report::RunSummary::collect(run_id, &sim.lock()).emit();

    telemetry::shutdown_telemetry();

    Ok(())
}

fn load_config() -> Result<SoupConfig> {
    match std::env::var("SOUP_CONFIG") {
        Ok(path) => SoupConfig::load(&path).with_context(|| format!("loading config from {}", path)),
        Err(_) => Ok(SoupConfig::default()),
    }
}

/// Scatter spawn gestures of random species over the grid
fn seed_soup(sim: &mut Simulation, strokes: usize, seed: u64) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut painted = 0;
    for _ in 0..strokes {
        let center = Position::new(rng.gen_range(0..sim.width()), rng.gen_range(0..sim.height()));
        sim.select_species(Species::random_living(&mut rng))?;
        painted += sim.spawn(center);
    }
    info!(strokes, painted, "Soup seeded");
    Ok(())
}

async fn run_frame_loop(sim: Arc<Mutex<Simulation>>, config: RunnerConfig) {
    let mut frames = interval(Duration::from_millis(config.frame_interval_ms.max(1)));
    let started = Instant::now();
    let mut extinct = false;

    loop {
        frames.tick().await;
        let now = started.elapsed().as_secs_f64() * 1000.0;

        match advance(&sim, now, &config, &mut extinct) {
            FrameOutcome::Idle | FrameOutcome::Stepped => {}
            FrameOutcome::Finished => return,
        }
    }
}

enum FrameOutcome {
    Idle,
    Stepped,
    Finished,
}

/// One display frame: give the clock a chance to step, then report
fn advance(sim: &Mutex<Simulation>, now: f64, config: &RunnerConfig, extinct: &mut bool) -> FrameOutcome {
    let mut sim = sim.lock();
    if sim.tick(now).is_none() {
        return FrameOutcome::Idle;
    }

    let generation = sim.generation();
    if config.census_interval > 0 && generation % config.census_interval == 0 {
        sim.emit_population_metrics();
    }

    let live = sim.census().live_cells;
    if live == 0 && !*extinct {
        warn!(generation, "Soup went extinct");
    }
    *extinct = live == 0;

    if config.max_generations > 0 && generation >= config.max_generations {
        return FrameOutcome::Finished;
    }
    FrameOutcome::Stepped
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
