use fruitfall_core::game_trait::InputState;

use crate::config::LevelTuning;
use crate::entities::{Body, DeathCause, Player};
use crate::geometry::{Buffer, Penetration, PushOut, Rect, overlaps};
use crate::level::{
    BOSS_AREA_START, LEVEL_LENGTH, LevelLayout, Obstacle, ObstacleKind, PlatformArena, PlatformId,
};

/// Lava forgives 5 px at the sides and needs 5 px of depth before it kills.
pub const LAVA_BUFFER: Buffer = Buffer {
    top: 0.0,
    right: 5.0,
    bottom: 5.0,
    left: 5.0,
};

/// Pre-motion edges of a body, captured before integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrevEdges {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
}

impl PrevEdges {
    pub fn of(body: &Body) -> Self {
        Self {
            x: body.x,
            top: body.y,
            bottom: body.bottom(),
        }
    }
}

/// How a single surface resolved against a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceContact {
    Landed,
    Ceiling,
    Side,
}

/// Apply gravity, then move by velocity.
pub fn integrate(body: &mut Body, gravity: f32) {
    body.vy += gravity;
    body.x += body.vx;
    body.y += body.vy;
}

/// Restore a body that picked up a non-finite position or velocity.
/// Returns true if the guard fired.
pub fn sanitize(body: &mut Body, prev: PrevEdges) -> bool {
    if body.is_finite() {
        return false;
    }
    tracing::warn!(x = body.x, y = body.y, "Non-finite body state, restoring previous position");
    body.x = if prev.x.is_finite() { prev.x } else { 0.0 };
    body.y = if prev.top.is_finite() { prev.top } else { 0.0 };
    body.vx = 0.0;
    body.vy = 0.0;
    true
}

/// Resolve one solid surface using the direction inferred from the
/// pre-collision trajectory. The first qualifying branch wins.
pub fn resolve_surface(
    body: &mut Body,
    prev: PrevEdges,
    surface: &Rect,
    tolerance: f32,
) -> Option<SurfaceContact> {
    if !overlaps(&body.rect(), surface, Buffer::NONE) {
        return None;
    }
    if body.vy > 0.0 && prev.bottom <= surface.y + tolerance {
        body.y = surface.y - body.h;
        body.vy = 0.0;
        Some(SurfaceContact::Landed)
    } else if body.vy < 0.0 && prev.top >= surface.bottom() {
        body.y = surface.bottom();
        body.vy = 0.0;
        Some(SurfaceContact::Ceiling)
    } else if body.vx > 0.0 {
        body.x = surface.x - body.w;
        Some(SurfaceContact::Side)
    } else if body.vx < 0.0 {
        body.x = surface.right();
        Some(SurfaceContact::Side)
    } else {
        None
    }
}

/// Summary of platform contacts for one body this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlatformContacts {
    pub landed_on: Option<PlatformId>,
    pub ceiling: bool,
    pub side: bool,
}

/// Resolve a body against every platform. Ground is always tested;
/// floating platforms are ignored once the body is inside the boss arena.
pub fn resolve_platforms(
    body: &mut Body,
    prev: PrevEdges,
    platforms: &PlatformArena,
    tolerance: f32,
) -> PlatformContacts {
    let mut contacts = PlatformContacts::default();
    for platform in platforms.iter() {
        if !platform.is_ground() && body.x > BOSS_AREA_START {
            continue;
        }
        match resolve_surface(body, prev, &platform.rect(), tolerance) {
            Some(SurfaceContact::Landed) => contacts.landed_on = Some(platform.id),
            Some(SurfaceContact::Ceiling) => contacts.ceiling = true,
            Some(SurfaceContact::Side) => contacts.side = true,
            None => {},
        }
    }
    contacts
}

/// Summary of obstacle contacts for one body this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObstacleContacts {
    pub lava: bool,
    pub landed: bool,
    pub side: bool,
}

/// Resolve a body against obstacles. Lava stops resolution immediately;
/// rocks take the landing case first, then the minimum-penetration axis.
pub fn resolve_obstacles(
    body: &mut Body,
    prev: PrevEdges,
    obstacles: &[Obstacle],
    tolerance: f32,
) -> ObstacleContacts {
    let mut contacts = ObstacleContacts::default();
    for obstacle in obstacles {
        let rect = obstacle.rect();
        match obstacle.kind {
            ObstacleKind::Lava => {
                if overlaps(&body.rect(), &rect, LAVA_BUFFER) {
                    contacts.lava = true;
                    return contacts;
                }
            },
            ObstacleKind::Rock => {
                if !overlaps(&body.rect(), &rect, Buffer::NONE) {
                    continue;
                }
                if body.vy > 0.0 && prev.bottom <= rect.y + tolerance {
                    body.y = rect.y - body.h;
                    body.vy = 0.0;
                    contacts.landed = true;
                    continue;
                }
                let pen = Penetration::between(&body.rect(), &rect);
                match pen.min_axis() {
                    PushOut::Left => {
                        body.x -= pen.left;
                        contacts.side = true;
                    },
                    PushOut::Right => {
                        body.x += pen.right;
                        contacts.side = true;
                    },
                    PushOut::Up => {
                        body.y -= pen.top;
                        if body.vy > 0.0 {
                            body.vy = 0.0;
                        }
                        contacts.landed = true;
                    },
                    PushOut::Down => {
                        body.y += pen.bottom;
                        if body.vy < 0.0 {
                            body.vy = 0.0;
                        }
                    },
                }
            },
        }
    }
    contacts
}

/// Below the bottom of the canvas.
pub fn fell_out_of_world(body: &Body, canvas_height: f32) -> bool {
    body.y > canvas_height
}

/// What happened to the player during its physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStep {
    pub platforms: PlatformContacts,
    pub obstacles: ObstacleContacts,
}

impl PlayerStep {
    pub fn landed(&self) -> bool {
        self.platforms.landed_on.is_some() || self.obstacles.landed
    }
}

/// Full physics step for the player against static level geometry.
/// Factory surfaces are resolved afterwards by the hazard set.
pub fn step_player(
    player: &mut Player,
    input: &InputState,
    layout: &LevelLayout,
    tuning: &LevelTuning,
) -> PlayerStep {
    let mut step = PlayerStep::default();
    if !player.is_alive {
        return step;
    }

    player.record_previous_edges();
    let prev = PrevEdges::of(&player.body);
    player.apply_input(input);
    integrate(&mut player.body, tuning.gravity);
    let max_x = (LEVEL_LENGTH - player.body.w).max(0.0);
    player.body.x = player.body.x.clamp(0.0, max_x);
    sanitize(&mut player.body, prev);

    step.platforms = resolve_platforms(
        &mut player.body,
        prev,
        &layout.platforms,
        tuning.landing_tolerance,
    );
    if step.platforms.landed_on.is_some() {
        player.land();
    }

    step.obstacles = resolve_obstacles(
        &mut player.body,
        prev,
        &layout.obstacles,
        tuning.landing_tolerance,
    );
    if step.obstacles.lava {
        player.kill(DeathCause::Lava);
        return step;
    }
    if step.obstacles.landed {
        player.land();
    }

    if fell_out_of_world(&player.body, tuning.canvas_height) {
        player.kill(DeathCause::Fall);
    }
    step
}
