pub mod combat;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod hazards;
pub mod level;
pub mod level_gen;
pub mod physics;
pub mod render;
pub mod scoring;
pub mod state;

use rand::SeedableRng;
use rand::rngs::StdRng;

use fruitfall_core::frontend::{Canvas, DefaultAtlas, SpriteAtlas};
use fruitfall_core::game_trait::{FrameSimulation, GameEvent, InputState};
use fruitfall_core::simulation_boilerplate;

use combat::Approach;
use config::SimConfig;
use entities::{DeathCause, Player, SpriteSizes};
use hazards::HazardSet;
use level::{FINAL_LEVEL, LEVEL_LENGTH};
use level_gen::{LevelGenerator, level_seed};
use scoring::HudMirror;
use state::{Phase, SimulationState, Transition};

/// The Fruitfall simulation: one player, five levels.
pub struct Simulation {
    config: SimConfig,
    sizes: SpriteSizes,
    generator: LevelGenerator,
    state: SimulationState,
    rng: StdRng,
    hud: HudMirror,
    paused: bool,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self::with_atlas(config, &DefaultAtlas)
    }

    /// Sprite sizes are read from `atlas` once, here.
    pub fn with_atlas(config: SimConfig, atlas: &dyn SpriteAtlas) -> Self {
        let sizes = SpriteSizes::from_atlas(atlas);
        let generator = LevelGenerator::new(sizes, config.clone());
        let level = config.start_level.clamp(1, FINAL_LEVEL);
        let lives = config.initial_lives();
        let mut rng = StdRng::seed_from_u64(level_seed(config.seed, level));
        let mut state = build_state(&config, &generator, &sizes, &mut rng, level, 0, lives, false);
        state.pending = Some(Transition::Start);
        Self {
            config,
            sizes,
            generator,
            state,
            rng,
            hud: HudMirror::default(),
            paused: false,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Direct access for frontends that script the world (and for tests).
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn load_level(&mut self, level: u32, respawn: bool) {
        let score = self.state.player.score;
        let lives = self.state.player.lives;
        self.rng = StdRng::seed_from_u64(level_seed(self.config.seed, level));
        self.state = build_state(
            &self.config,
            &self.generator,
            &self.sizes,
            &mut self.rng,
            level,
            score,
            lives,
            respawn,
        );
    }

    fn apply_transition(&mut self, transition: Transition, events: &mut Vec<GameEvent>) {
        match transition {
            Transition::Start => {
                tracing::info!(level = self.state.level_number(), "Run started");
                events.push(GameEvent::LevelStarted {
                    level: self.state.level_number(),
                });
                self.hud = HudMirror::default();
            },
            Transition::Reset => {
                let level = self.state.level_number();
                tracing::debug!(level, lives = self.state.player.lives, "Resetting level");
                self.load_level(level, true);
            },
            Transition::Advance => {
                let level = self.state.level_number() + 1;
                tracing::info!(level, "Advancing");
                self.load_level(level, false);
                events.push(GameEvent::LevelStarted { level });
            },
        }
        self.sync_hud(events);
    }

    fn sync_hud(&mut self, events: &mut Vec<GameEvent>) {
        if let Some(score) = self.hud.score_changed(self.state.player.score) {
            events.push(GameEvent::ScoreChanged { score });
        }
        if let Some(lives) = self.hud.lives_changed(self.state.player.lives) {
            events.push(GameEvent::LivesChanged { lives });
        }
    }

    fn update_player(&mut self, input: &InputState) {
        let state = &mut self.state;
        physics::step_player(&mut state.player, input, &state.level, &state.tuning);
        state
            .hazards
            .resolve_player_surfaces(&mut state.player, state.tuning.landing_tolerance);
        state.player.tick_timers();
    }

    fn update_enemies(&mut self, approach: Approach) {
        let state = &mut self.state;
        let player_x = state.player.body.center_x();
        for enemy in &mut state.enemies {
            let thrown =
                enemy.update(&state.level, &state.tuning, player_x, &mut self.rng, self.sizes.peel);
            if let Some(peel) = thrown {
                state.hazards.spawn_peel(peel);
            }
        }
        combat::resolve_enemy_contacts(&mut state.player, approach, &mut state.enemies);
        state.enemies.retain(|e| e.active);
    }

    fn update_bosses(&mut self, approach: Approach, events: &mut Vec<GameEvent>) {
        let state = &mut self.state;
        for boss in &mut state.bosses {
            let fired = boss.update(
                &state.level,
                &state.tuning,
                &state.player.body,
                &mut self.rng,
                self.sizes.missile,
            );
            if let Some(missile) = fired {
                state.hazards.spawn_missile(missile);
            }
        }
        let report = combat::resolve_boss_contacts(
            &mut state.player,
            approach,
            &mut state.bosses,
            &mut state.defeated,
        );
        for kind in report.defeated {
            events.push(GameEvent::BossDefeated {
                message: kind.defeat_message().to_string(),
            });
        }
    }

    fn update_camera(&mut self) {
        let state = &mut self.state;
        let view = state.tuning.canvas_width;
        let target = state.player.body.x - view / 3.0;
        state.camera_x = target.clamp(0.0, (LEVEL_LENGTH - view).max(0.0));
    }

    fn check_outcome(&mut self, events: &mut Vec<GameEvent>) {
        if !self.state.player.is_alive {
            self.handle_death(events);
            return;
        }

        let state = &mut self.state;
        let end = state.level.level_end;
        let crossed = end.is_crossed_by(state.player.body.x, state.player.body.right());
        if !crossed || !state.bosses_cleared() {
            return;
        }
        let level = state.level.number;
        let score = state.player.score;
        tracing::info!(level, score, "Level complete");
        events.push(GameEvent::LevelComplete { level, score });
        if level >= FINAL_LEVEL {
            state.phase = Phase::Won;
            events.push(GameEvent::GameWon { score });
        } else {
            state.pending = Some(Transition::Advance);
        }
    }

    fn handle_death(&mut self, events: &mut Vec<GameEvent>) {
        let player = &mut self.state.player;
        let forced = matches!(
            player.death_cause,
            Some(DeathCause::Boss(kind)) if kind.forces_game_over()
        );
        player.lives = scoring::lives_after_death(player.lives, forced);
        tracing::info!(cause = ?player.death_cause, lives = player.lives, "Player died");
        events.push(GameEvent::PlayerDied {
            lives_left: player.lives,
        });
        self.sync_hud(events);

        let state = &mut self.state;
        if state.player.lives == 0 {
            state.phase = Phase::GameOver;
            events.push(GameEvent::GameOver {
                score: state.player.score,
            });
        } else {
            state.pending = Some(Transition::Reset);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_state(
    config: &SimConfig,
    generator: &LevelGenerator,
    sizes: &SpriteSizes,
    rng: &mut StdRng,
    level: u32,
    score: u32,
    lives: u32,
    respawn: bool,
) -> SimulationState {
    let tuning = config.tuning(level);
    let generated = generator.generate(level, rng);
    let ground_y = tuning.ground_y();
    let player = if respawn {
        Player::respawn(ground_y, sizes.player, &tuning, score, lives)
    } else {
        Player::spawn(ground_y, sizes.player, &tuning, score, lives)
    };
    SimulationState {
        hazards: HazardSet::for_level(level, ground_y),
        level: generated.layout,
        seed: config.seed,
        frame: 0,
        phase: Phase::Playing,
        pending: None,
        player,
        enemies: generated.enemies,
        bosses: generated.bosses,
        defeated: Default::default(),
        tuning,
        camera_x: 0.0,
    }
}

impl FrameSimulation for Simulation {
    fn step(&mut self, input: &InputState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.paused {
            return events;
        }
        if let Some(transition) = self.state.pending.take() {
            self.apply_transition(transition, &mut events);
        }
        if self.state.is_finished() {
            return events;
        }

        self.state.frame += 1;
        self.update_player(input);
        // Stomps are judged on how the player arrived, before any bounce.
        let approach = Approach::of(&self.state.player);
        self.update_enemies(approach);
        self.update_bosses(approach, &mut events);
        {
            let state = &mut self.state;
            state
                .hazards
                .update(&mut state.player, &state.level, &state.tuning, &self.sizes);
        }
        self.update_camera();
        if self.state.player.is_alive {
            self.sync_hud(&mut events);
        }
        self.check_outcome(&mut events);
        events
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let commands = render::draw_list(&self.state);
        render::present(&commands, canvas);
    }

    simulation_boilerplate!(state_type: SimulationState);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruitfall_core::test_helpers;

    fn sim() -> Simulation {
        Simulation::new(SimConfig::default())
    }

    #[test]
    fn first_step_announces_level_and_hud() {
        let mut s = sim();
        let events = s.step(&InputState::default());
        assert_eq!(events[0], GameEvent::LevelStarted { level: 1 });
        assert!(events.contains(&GameEvent::ScoreChanged { score: 0 }));
        assert!(events.contains(&GameEvent::LivesChanged { lives: 3 }));
        assert!(s.step(&InputState::default()).is_empty());
    }

    #[test]
    fn start_level_is_respected() {
        let s = Simulation::new(SimConfig {
            start_level: 4,
            ..Default::default()
        });
        assert_eq!(s.state().level_number(), 4);
        assert_eq!(s.state().bosses.len(), 2);
    }

    #[test]
    fn camera_follows_player_inside_level() {
        let mut s = sim();
        s.step(&InputState::default());
        s.state_mut().player.body.x = 3000.0;
        s.step(&InputState::default());
        let view = s.state().tuning.canvas_width;
        assert!((s.state().camera_x - (s.state().player.body.x - view / 3.0)).abs() < 1e-3);

        s.state_mut().player.body.x = 7900.0;
        s.step(&InputState::default());
        assert_eq!(s.state().camera_x, LEVEL_LENGTH - view);
    }

    #[test]
    fn contract_step_advances_state() {
        test_helpers::contract_step_advances_state(&mut sim());
    }

    #[test]
    fn contract_pause_stops_updates() {
        test_helpers::contract_pause_stops_updates(&mut sim());
    }

    #[test]
    fn contract_snapshot_roundtrip_preserves() {
        test_helpers::contract_snapshot_roundtrip_preserves(&mut sim());
    }

    #[test]
    fn contract_garbage_snapshot_ignored() {
        test_helpers::contract_garbage_snapshot_ignored(&mut sim());
    }
}
