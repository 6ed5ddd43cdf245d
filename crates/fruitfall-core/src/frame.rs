use crate::frontend::{Frontend, Hud};
use crate::game_trait::{FrameSimulation, GameEvent};

/// Run one full frame: poll input, advance the simulation, sync the HUD,
/// then draw. Returns the frame's events for callers that want to log them.
pub fn run_frame<S, F>(sim: &mut S, frontend: &mut F) -> Vec<GameEvent>
where
    S: FrameSimulation + ?Sized,
    F: Frontend,
{
    let input = frontend.input_state();
    let events = sim.step(&input);
    for event in &events {
        dispatch_event(event, frontend);
    }
    sim.render(frontend);
    events
}

/// Forward a single simulation event to the HUD layer.
pub fn dispatch_event<H: Hud + ?Sized>(event: &GameEvent, hud: &mut H) {
    match event {
        GameEvent::ScoreChanged { score } => hud.report_score(*score),
        GameEvent::LivesChanged { lives } => hud.report_lives(*lives),
        GameEvent::BossDefeated { message } => hud.on_boss_defeated(message),
        GameEvent::LevelComplete { score, .. } => hud.on_level_complete(*score),
        GameEvent::GameOver { score } => hud.on_game_over(*score),
        GameEvent::LevelStarted { level } => {
            tracing::debug!(level, "Level started");
        },
        GameEvent::PlayerDied { lives_left } => {
            tracing::debug!(lives_left, "Player died");
        },
        GameEvent::GameWon { score } => {
            tracing::info!(score, "All levels cleared");
        },
    }
}
