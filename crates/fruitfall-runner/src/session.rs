use std::time::Duration;

use tokio::sync::mpsc;

use fruitfall_core::frame::run_frame;
use fruitfall_core::frontend::Frontend;
use fruitfall_core::game_trait::{FrameSimulation, GameEvent};

/// Commands accepted by a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Pause,
    Resume,
    Stop,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: u64,
    pub last_score: u32,
    pub finished: bool,
}

/// Drive `sim` at its tick rate until it finishes, `max_frames` elapse or a
/// `Stop` arrives. Commands are handled before the next tick. Late ticks
/// are skipped rather than bunched.
pub async fn run_session<S, F>(
    sim: &mut S,
    frontend: &mut F,
    max_frames: Option<u64>,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
) -> SessionSummary
where
    S: FrameSimulation,
    F: Frontend,
{
    let tick_interval = Duration::from_secs_f32(1.0 / sim.tick_rate());
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut summary = SessionSummary::default();
    loop {
        tokio::select! {
            biased;

            cmd = cmd_rx.recv() => match cmd {
                Some(SessionCommand::Pause) => {
                    tracing::info!("Session paused");
                    sim.pause();
                },
                Some(SessionCommand::Resume) => {
                    tracing::info!("Session resumed");
                    sim.resume();
                },
                Some(SessionCommand::Stop) | None => {
                    tracing::info!(frames = summary.frames, "Session stopped");
                    break;
                },
            },
            _ = interval.tick() => {
                let events = run_frame(sim, frontend);
                summary.frames += 1;
                for event in &events {
                    if let GameEvent::ScoreChanged { score } = event {
                        summary.last_score = *score;
                    }
                }
                if sim.is_finished() {
                    summary.finished = true;
                    break;
                }
                if max_frames.is_some_and(|max| summary.frames >= max) {
                    break;
                }
            }
        }
    }
    summary
}
