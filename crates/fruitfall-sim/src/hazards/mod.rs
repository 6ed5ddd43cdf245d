pub mod devices;
pub mod factory;
pub mod projectiles;

use serde::{Deserialize, Serialize};

use crate::config::LevelTuning;
use crate::entities::{DeathCause, Player, SpriteSizes};
use crate::geometry::{Buffer, overlaps};
use crate::level::{FACTORY_LEVEL, LevelLayout};
use crate::physics::{self, PrevEdges, SurfaceContact};

pub use devices::{
    CollapseState, CollapsingPlatform, ConveyorBelt, FactoryHook, RotatingSlicer, SYRUP_SLOWDOWN,
    SyrupPool,
};
pub use projectiles::{BananaBarrel, BananaPeel, BarrelSpawner, Missile};

/// Every hazard and projectile in the active level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardSet {
    pub conveyors: Vec<ConveyorBelt>,
    pub syrup: Vec<SyrupPool>,
    pub slicers: Vec<RotatingSlicer>,
    pub collapsing: Vec<CollapsingPlatform>,
    pub hooks: Vec<FactoryHook>,
    pub spawners: Vec<BarrelSpawner>,
    pub barrels: Vec<BananaBarrel>,
    pub peels: Vec<BananaPeel>,
    pub missiles: Vec<Missile>,
}

impl HazardSet {
    /// Fresh hazards for `level`. Only the factory level has fixed machinery.
    pub fn for_level(level: u32, ground_y: f32) -> Self {
        if level == FACTORY_LEVEL {
            factory::build(ground_y)
        } else {
            Self::default()
        }
    }

    /// Player interaction with factory surfaces after level geometry has
    /// been resolved: syrup slowdown, belts, crumbling ledges and hooks.
    pub fn resolve_player_surfaces(&mut self, player: &mut Player, tolerance: f32) {
        if !player.is_alive {
            return;
        }
        let prev = PrevEdges {
            x: player.body.x,
            top: player.prev_top,
            bottom: player.prev_bottom,
        };

        let in_syrup = self
            .syrup
            .iter()
            .any(|pool| overlaps(&player.body.rect(), &pool.rect(), Buffer::NONE));
        player.move_speed = if in_syrup {
            player.base_move_speed * SYRUP_SLOWDOWN
        } else {
            player.base_move_speed
        };

        let mut landed = false;
        for belt in &self.conveyors {
            if physics::resolve_surface(&mut player.body, prev, &belt.rect(), tolerance)
                == Some(SurfaceContact::Landed)
            {
                player.body.x += belt.drag();
                landed = true;
            }
        }
        for ledge in self.collapsing.iter_mut().filter(|p| p.is_solid()) {
            if physics::resolve_surface(&mut player.body, prev, &ledge.rect(), tolerance)
                == Some(SurfaceContact::Landed)
            {
                ledge.trigger();
                landed = true;
            }
        }
        for hook in &self.hooks {
            if physics::resolve_surface(&mut player.body, prev, &hook.rect(), tolerance)
                == Some(SurfaceContact::Landed)
            {
                player.body.x += hook.last_dx;
                landed = true;
            }
        }
        if landed {
            player.land();
        }
    }

    pub fn spawn_peel(&mut self, peel: BananaPeel) {
        self.peels.push(peel);
    }

    pub fn spawn_missile(&mut self, missile: Missile) {
        self.missiles.push(missile);
    }

    /// Advance every hazard one frame and apply hazard contact to the player.
    pub fn update(
        &mut self,
        player: &mut Player,
        layout: &LevelLayout,
        tuning: &LevelTuning,
        sizes: &SpriteSizes,
    ) {
        for slicer in &mut self.slicers {
            slicer.update();
        }
        for ledge in &mut self.collapsing {
            ledge.update();
        }
        for hook in &mut self.hooks {
            hook.update();
        }
        for spawner in &mut self.spawners {
            if let Some(barrel) = spawner.update(sizes.barrel) {
                self.barrels.push(barrel);
            }
        }

        let conveyors = &self.conveyors;
        self.barrels
            .retain_mut(|b| b.update(layout, conveyors, tuning.gravity, tuning.canvas_height));
        for peel in &mut self.peels {
            peel.update(layout, tuning.canvas_height);
        }
        self.missiles.retain_mut(|m| m.update(layout, tuning.canvas_height));

        if player.is_alive {
            self.apply_contacts(player);
        }
        self.peels.retain(|p| p.active);
    }

    fn apply_contacts(&mut self, player: &mut Player) {
        let rect = player.body.rect();
        if self
            .slicers
            .iter()
            .any(|s| s.active && overlaps(&rect, &s.rect(), Buffer::NONE))
        {
            player.hurt(DeathCause::Slicer);
        }
        if self.barrels.iter().any(|b| overlaps(&rect, &b.rect(), Buffer::NONE)) {
            player.hurt(DeathCause::Barrel);
        }

        let before = self.missiles.len();
        self.missiles.retain(|m| !overlaps(&rect, &m.rect(), Buffer::NONE));
        if self.missiles.len() != before {
            player.hurt(DeathCause::Missile);
        }

        if let Some(peel) = self
            .peels
            .iter_mut()
            .find(|p| p.active && overlaps(&rect, &p.rect(), Buffer::NONE))
        {
            peel.active = false;
            player.start_slide();
        }
    }
}
