use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use fruitfall_sim::Simulation;
use fruitfall_sim::config::SimConfig;

use fruitfall_runner::frontend::{Autopilot, HeadlessFrontend};
use fruitfall_runner::session::{SessionCommand, run_session};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SimConfig::load();
    match serde_json::to_string(&config) {
        Ok(json) => tracing::debug!(config = %json, "Effective config"),
        Err(e) => tracing::warn!(error = %e, "Could not render config"),
    }

    let max_frames = std::env::var("FRUITFALL_MAX_FRAMES")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());

    tracing::info!(seed = config.seed, level = config.start_level, "Fruitfall runner starting");

    let mut sim = Simulation::new(config);
    let mut frontend = HeadlessFrontend::new(Autopilot::default());

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cmd_tx.send(SessionCommand::Stop);
        }
    });

    let summary = run_session(&mut sim, &mut frontend, max_frames, cmd_rx).await;
    let state = sim.state();
    tracing::info!(
        frames = summary.frames,
        score = summary.last_score,
        lives = frontend.lives,
        finished = summary.finished,
        level = state.level_number(),
        phase = ?state.phase,
        "Fruitfall runner finished"
    );
}
