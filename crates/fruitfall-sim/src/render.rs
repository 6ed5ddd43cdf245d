use fruitfall_core::frontend::{Canvas, SpriteKind};

use crate::geometry::Rect;
use crate::level::ObstacleKind;
use crate::state::SimulationState;

/// Extra world units drawn past each screen edge.
const CULL_MARGIN: f32 = 100.0;
/// Invulnerable player is hidden every other span of this many frames.
const BLINK_FRAMES: u32 = 5;

/// One sprite to draw, already in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub sprite: SpriteKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub flip: bool,
}

struct DrawList {
    camera_x: f32,
    view_right: f32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    fn push(&mut self, sprite: SpriteKind, rect: Rect, flip: bool) {
        if rect.right() < self.camera_x - CULL_MARGIN || rect.x > self.view_right + CULL_MARGIN {
            return;
        }
        self.commands.push(DrawCommand {
            sprite,
            x: rect.x - self.camera_x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
            flip,
        });
    }
}

/// Back-to-front draw commands for everything near the camera.
pub fn draw_list(state: &SimulationState) -> Vec<DrawCommand> {
    let mut list = DrawList {
        camera_x: state.camera_x,
        view_right: state.camera_x + state.tuning.canvas_width,
        commands: Vec::new(),
    };

    for platform in state.level.platforms.iter() {
        let sprite = if platform.is_ground() {
            SpriteKind::Ground
        } else {
            SpriteKind::Platform
        };
        list.push(sprite, platform.rect(), false);
    }
    for obstacle in &state.level.obstacles {
        let sprite = match obstacle.kind {
            ObstacleKind::Rock => SpriteKind::Rock,
            ObstacleKind::Lava => SpriteKind::Lava,
        };
        list.push(sprite, obstacle.rect(), false);
    }

    let hazards = &state.hazards;
    for pool in &hazards.syrup {
        list.push(SpriteKind::Syrup, pool.rect(), false);
    }
    for belt in &hazards.conveyors {
        list.push(SpriteKind::Conveyor, belt.rect(), belt.direction < 0.0);
    }
    for ledge in hazards.collapsing.iter().filter(|l| l.is_solid()) {
        list.push(SpriteKind::CollapsingPlatform, ledge.rect(), false);
    }
    for hook in &hazards.hooks {
        list.push(SpriteKind::Hook, hook.rect(), false);
    }
    for slicer in &hazards.slicers {
        list.push(SpriteKind::Slicer, slicer.rect(), false);
    }

    let end = state.level.level_end;
    list.push(
        SpriteKind::LevelEnd,
        Rect::new(end.left(), state.tuning.ground_y() - end.height, end.width, end.height),
        false,
    );

    for enemy in state.enemies.iter().filter(|e| e.active) {
        list.push(enemy.kind.sprite(), enemy.body.rect(), enemy.body.vx < 0.0);
    }
    for boss in state.bosses.iter().filter(|b| b.active) {
        list.push(boss.kind.sprite(), boss.body.rect(), boss.direction < 0.0);
    }

    for barrel in &hazards.barrels {
        list.push(SpriteKind::Barrel, barrel.rect(), false);
    }
    for peel in hazards.peels.iter().filter(|p| p.active) {
        list.push(SpriteKind::BananaPeel, peel.rect(), false);
    }
    for missile in &hazards.missiles {
        list.push(SpriteKind::Missile, missile.rect(), missile.velocity_x < 0.0);
    }

    let player = &state.player;
    let blink_hidden =
        player.is_invulnerable() && (player.invulnerable_timer / BLINK_FRAMES) % 2 == 1;
    if player.is_alive && !blink_hidden {
        list.push(SpriteKind::Player, player.body.rect(), player.facing_left);
    }

    list.commands
}

/// Send draw commands to the canvas. Failures are logged and skipped.
/// Returns the number of failed draws.
pub fn present(commands: &[DrawCommand], canvas: &mut dyn Canvas) -> usize {
    let mut failed = 0;
    for cmd in commands {
        if let Err(e) = canvas.draw_sprite(cmd.sprite, cmd.x, cmd.y, cmd.w, cmd.h, cmd.flip) {
            failed += 1;
            tracing::warn!(sprite = ?cmd.sprite, error = %e, "Draw call failed");
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Simulation;
    use crate::config::SimConfig;
    use fruitfall_core::frontend::DrawError;

    struct FailingCanvas {
        calls: usize,
    }

    impl Canvas for FailingCanvas {
        fn draw_sprite(
            &mut self,
            sprite: SpriteKind,
            _x: f32,
            _y: f32,
            _w: f32,
            _h: f32,
            _flip: bool,
        ) -> Result<(), DrawError> {
            self.calls += 1;
            Err(DrawError::MissingSprite(sprite))
        }
    }

    #[test]
    fn far_entities_are_culled() {
        let sim = Simulation::new(SimConfig::default());
        let commands = draw_list(sim.state());
        assert!(commands.iter().any(|c| c.sprite == SpriteKind::Player));
        // Bosses wait at the far end of the level.
        assert!(!commands.iter().any(|c| c.sprite == SpriteKind::Boss));
        assert!(commands.iter().all(|c| c.x + c.w >= -CULL_MARGIN));
    }

    #[test]
    fn coordinates_are_screen_space() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.state_mut().camera_x = 50.0;
        let player_x = sim.state().player.body.x;
        let cmd = draw_list(sim.state())
            .into_iter()
            .find(|c| c.sprite == SpriteKind::Player)
            .unwrap();
        assert_eq!(cmd.x, player_x - 50.0);
    }

    #[test]
    fn invulnerable_player_blinks() {
        let mut sim = Simulation::new(SimConfig::default());
        let has_player = |sim: &Simulation| {
            draw_list(sim.state())
                .iter()
                .any(|c| c.sprite == SpriteKind::Player)
        };
        sim.state_mut().player.invulnerable_timer = BLINK_FRAMES;
        assert!(!has_player(&sim));
        sim.state_mut().player.invulnerable_timer = BLINK_FRAMES * 2;
        assert!(has_player(&sim));
    }

    #[test]
    fn failed_draws_are_counted_not_fatal() {
        let sim = Simulation::new(SimConfig::default());
        let commands = draw_list(sim.state());
        let mut canvas = FailingCanvas { calls: 0 };
        assert_eq!(present(&commands, &mut canvas), commands.len());
        assert_eq!(canvas.calls, commands.len());
    }
}
