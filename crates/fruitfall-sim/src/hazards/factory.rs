use super::HazardSet;
use super::devices::{CollapsingPlatform, ConveyorBelt, FactoryHook, RotatingSlicer, SyrupPool};
use super::projectiles::{BARREL_INTERVAL_MS, BarrelSpawner};

// (x, height above ground, width, height, direction, speed)
const CONVEYORS: [(f32, f32, f32, f32, f32, f32); 3] = [
    (6100.0, 120.0, 200.0, 20.0, 1.0, 2.0),
    (6500.0, 180.0, 220.0, 20.0, -1.0, 2.5),
    (6950.0, 140.0, 200.0, 20.0, 1.0, 3.0),
];

// (x, height above ground, width, height)
const SYRUP: [(f32, f32, f32, f32); 2] = [(6300.0, 10.0, 150.0, 10.0), (6800.0, 10.0, 120.0, 10.0)];

// (x, height above ground, width, height, active ms, inactive ms)
const SLICERS: [(f32, f32, f32, f32, f32, f32); 2] = [
    (6420.0, 60.0, 50.0, 60.0, 3000.0, 2000.0),
    (7150.0, 60.0, 50.0, 60.0, 2500.0, 2500.0),
];

const COLLAPSING: [(f32, f32, f32, f32); 2] =
    [(6700.0, 240.0, 120.0, 20.0), (7050.0, 260.0, 100.0, 20.0)];

// (x, height above ground, width, height, swing speed, swing range)
const HOOKS: [(f32, f32, f32, f32, f32, f32); 2] = [
    (6250.0, 320.0, 60.0, 15.0, 0.03, 0.6),
    (6900.0, 340.0, 60.0, 15.0, 0.025, 0.5),
];

const BARREL_SPAWNERS: [(f32, f32); 1] = [(6120.0, 220.0)];

/// Factory hazards laid out relative to the ground line.
pub fn build(ground_y: f32) -> HazardSet {
    HazardSet {
        conveyors: CONVEYORS
            .iter()
            .map(|&(x, up, w, h, direction, speed)| ConveyorBelt {
                x,
                y: ground_y - up,
                w,
                h,
                direction,
                speed,
            })
            .collect(),
        syrup: SYRUP
            .iter()
            .map(|&(x, up, w, h)| SyrupPool {
                x,
                y: ground_y - up,
                w,
                h,
            })
            .collect(),
        slicers: SLICERS
            .iter()
            .map(|&(x, up, w, h, on, off)| RotatingSlicer::new(x, ground_y - up, w, h, on, off))
            .collect(),
        collapsing: COLLAPSING
            .iter()
            .map(|&(x, up, w, h)| CollapsingPlatform::new(x, ground_y - up, w, h))
            .collect(),
        hooks: HOOKS
            .iter()
            .map(|&(x, up, w, h, speed, range)| {
                FactoryHook::new(x, ground_y - up, w, h, speed, range)
            })
            .collect(),
        spawners: BARREL_SPAWNERS
            .iter()
            .map(|&(x, up)| BarrelSpawner::new(x, ground_y - up, BARREL_INTERVAL_MS))
            .collect(),
        ..HazardSet::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{BOSS_AREA_START, FACTORY_START};

    #[test]
    fn every_device_sits_inside_the_factory() {
        let set = build(550.0);
        let xs = set
            .conveyors
            .iter()
            .map(|c| (c.x, c.w))
            .chain(set.syrup.iter().map(|s| (s.x, s.w)))
            .chain(set.slicers.iter().map(|s| (s.x, s.w)))
            .chain(set.collapsing.iter().map(|c| (c.x, c.w)))
            .chain(set.hooks.iter().map(|h| (h.x, h.w)));
        for (x, w) in xs {
            assert!(x >= FACTORY_START && x + w + 60.0 < BOSS_AREA_START, "device at {x}");
        }
    }

    #[test]
    fn rebuild_resets_state() {
        let mut a = build(550.0);
        a.slicers[0].update();
        a.collapsing[0].trigger();
        assert_ne!(a, build(550.0));
        assert_eq!(build(550.0), build(550.0));
    }
}
