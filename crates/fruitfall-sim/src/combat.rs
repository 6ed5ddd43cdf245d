use crate::entities::boss::HitOutcome;
use crate::entities::{Boss, BossKind, DeathCause, DefeatedBosses, Enemy, Player};
use crate::geometry::{Buffer, Rect, overlaps};
use crate::scoring::{BOSS_DEFEAT_BONUS, BOSS_HIT_POINTS, ENEMY_STOMP_POINTS};

/// Share of an enemy's height, measured from its top, that counts as a stomp.
pub const ENEMY_STOMP_FRACTION: f32 = 1.0 / 4.0;
pub const BOSS_STOMP_FRACTION: f32 = 1.0 / 3.0;
/// Bounce strength after a stomp, relative to jump power.
pub const STOMP_BOUNCE: f32 = 0.7;

/// How the player arrived this frame, captured before any contact is
/// resolved. A bounce from one stomp must not turn the next overlap into a
/// side hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    pub vy: f32,
    pub prev_bottom: f32,
}

impl Approach {
    pub fn of(player: &Player) -> Self {
        Self {
            vy: player.body.vy,
            prev_bottom: player.prev_bottom,
        }
    }

    /// Descending, with the pre-motion bottom edge inside the top `fraction`
    /// of the target.
    pub fn is_stomp(&self, target: &Rect, fraction: f32) -> bool {
        self.vy > 0.0 && self.prev_bottom <= target.y + target.h * fraction
    }
}

/// Stomp or be hurt by every active enemy touching the player.
/// Returns the points earned.
pub fn resolve_enemy_contacts(
    player: &mut Player,
    approach: Approach,
    enemies: &mut [Enemy],
) -> u32 {
    let mut points = 0;
    for enemy in enemies.iter_mut().filter(|e| e.active) {
        if !player.is_alive {
            break;
        }
        let target = enemy.body.rect();
        if !overlaps(&player.body.rect(), &target, Buffer::NONE) {
            continue;
        }
        if approach.is_stomp(&target, ENEMY_STOMP_FRACTION) {
            enemy.deactivate();
            player.bounce(STOMP_BOUNCE);
            player.add_score(ENEMY_STOMP_POINTS);
            points += ENEMY_STOMP_POINTS;
        } else {
            player.hurt(DeathCause::Enemy(enemy.kind));
        }
    }
    points
}

/// Bosses defeated during this frame's contact pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BossContactReport {
    pub points: u32,
    pub defeated: Vec<BossKind>,
}

pub fn resolve_boss_contacts(
    player: &mut Player,
    approach: Approach,
    bosses: &mut [Boss],
    defeated: &mut DefeatedBosses,
) -> BossContactReport {
    let mut report = BossContactReport::default();
    for boss in bosses.iter_mut().filter(|b| b.active) {
        if !player.is_alive {
            break;
        }
        let target = boss.body.rect();
        if !overlaps(&player.body.rect(), &target, Buffer::NONE) {
            continue;
        }
        if !approach.is_stomp(&target, BOSS_STOMP_FRACTION) {
            player.hurt(DeathCause::Boss(boss.kind));
            continue;
        }

        player.bounce(STOMP_BOUNCE);
        match boss.register_hit() {
            HitOutcome::Ignored => {},
            HitOutcome::Hit => {
                player.add_score(BOSS_HIT_POINTS);
                report.points += BOSS_HIT_POINTS;
                tracing::debug!(kind = ?boss.kind, hits = boss.hits, "Boss hit");
            },
            HitOutcome::Defeated => {
                player.add_score(BOSS_HIT_POINTS);
                report.points += BOSS_HIT_POINTS;
                if defeated.mark(boss.kind) {
                    player.add_score(BOSS_DEFEAT_BONUS);
                    report.points += BOSS_DEFEAT_BONUS;
                    report.defeated.push(boss.kind);
                }
                tracing::info!(kind = ?boss.kind, "Boss defeated");
            },
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelTuning;
    use crate::entities::EnemyKind;
    use crate::entities::boss::BOSS_INVULNERABLE_FRAMES;
    use fruitfall_core::frontend::SpriteKind;

    const GROUND_Y: f32 = 550.0;

    fn player() -> Player {
        Player::spawn(GROUND_Y, SpriteKind::Player.default_size(), &LevelTuning::default(), 0, 3)
    }

    /// Player falling onto a target whose top is at `top`, with the previous
    /// bottom `above` px over it.
    fn falling_onto(x: f32, top: f32, above: f32) -> Player {
        let mut p = player();
        p.body.x = x;
        p.prev_bottom = top - above;
        p.body.y = top - p.body.h + 4.0;
        p.body.vy = 5.0;
        p
    }

    fn enemy(x: f32) -> Enemy {
        Enemy::on_ground(
            EnemyKind::Strawberry,
            x,
            GROUND_Y,
            SpriteKind::Strawberry.default_size(),
            -1.0,
        )
    }

    fn boss(kind: BossKind) -> Boss {
        Boss::spawn(kind, 7700.0, GROUND_Y, kind.sprite().default_size())
    }

    #[test]
    fn stomp_kills_enemy_and_bounces() {
        let mut enemies = vec![enemy(500.0)];
        let top = enemies[0].body.y;
        let mut p = falling_onto(500.0, top, 2.0);
        let approach = Approach::of(&p);
        let points = resolve_enemy_contacts(&mut p, approach, &mut enemies);
        assert_eq!(points, ENEMY_STOMP_POINTS);
        assert_eq!(p.score, 100);
        assert!(!enemies[0].active);
        assert_eq!(p.body.vy, p.jump_power * STOMP_BOUNCE);
        assert!(p.is_alive);
    }

    #[test]
    fn landing_on_two_enemies_stomps_both() {
        let mut enemies = vec![enemy(500.0), enemy(530.0)];
        let top = enemies[0].body.y;
        let mut p = falling_onto(510.0, top, 2.0);
        let approach = Approach::of(&p);
        let points = resolve_enemy_contacts(&mut p, approach, &mut enemies);
        assert_eq!(points, 2 * ENEMY_STOMP_POINTS);
        assert!(enemies.iter().all(|e| !e.active));
        assert!(p.is_alive);
        assert!(p.body.vy < 0.0);
    }

    #[test]
    fn side_contact_kills_player() {
        let mut enemies = vec![enemy(500.0)];
        let mut p = player();
        p.body.x = 470.0;
        p.body.vx = 5.0;
        let approach = Approach::of(&p);
        let points = resolve_enemy_contacts(&mut p, approach, &mut enemies);
        assert_eq!(points, 0);
        assert!(!p.is_alive);
        assert_eq!(p.death_cause, Some(DeathCause::Enemy(EnemyKind::Strawberry)));
        assert!(enemies[0].active);
    }

    #[test]
    fn invulnerable_player_survives_and_can_still_stomp() {
        let mut enemies = vec![enemy(500.0), enemy(900.0)];
        let mut p = player();
        p.invulnerable_timer = 40;
        p.body.x = 470.0;
        let approach = Approach::of(&p);
        resolve_enemy_contacts(&mut p, approach, &mut enemies);
        assert!(p.is_alive);

        let top = enemies[1].body.y;
        let mut p = falling_onto(900.0, top, 1.0);
        p.invulnerable_timer = 40;
        let approach = Approach::of(&p);
        assert_eq!(resolve_enemy_contacts(&mut p, approach, &mut enemies), ENEMY_STOMP_POINTS);
    }

    #[test]
    fn descending_below_threshold_is_not_a_stomp() {
        let e = enemy(500.0);
        let target = e.body.rect();
        let mut p = falling_onto(500.0, target.y, 0.0);
        p.prev_bottom = target.y + target.h * ENEMY_STOMP_FRACTION + 1.0;
        assert!(!Approach::of(&p).is_stomp(&target, ENEMY_STOMP_FRACTION));
        p.prev_bottom = target.y + target.h * ENEMY_STOMP_FRACTION;
        assert!(Approach::of(&p).is_stomp(&target, ENEMY_STOMP_FRACTION));
    }

    #[test]
    fn final_boss_stomp_pays_hit_and_bonus_once() {
        let mut bosses = vec![boss(BossKind::Primary)];
        bosses[0].hits = bosses[0].hits_required - 1;
        let mut flags = DefeatedBosses::default();
        let top = bosses[0].body.y;
        let mut p = falling_onto(7720.0, top, 2.0);
        let approach = Approach::of(&p);
        let report = resolve_boss_contacts(&mut p, approach, &mut bosses, &mut flags);
        assert_eq!(report.points, BOSS_HIT_POINTS + BOSS_DEFEAT_BONUS);
        assert_eq!(report.defeated, vec![BossKind::Primary]);
        assert!(!bosses[0].active && bosses[0].defeated);
        assert!(flags.primary);

        // Inactive boss is skipped on the next frame.
        let mut p = falling_onto(7720.0, top, 2.0);
        let approach = Approach::of(&p);
        let again = resolve_boss_contacts(&mut p, approach, &mut bosses, &mut flags);
        assert_eq!(again, BossContactReport::default());
    }

    #[test]
    fn invulnerable_boss_only_bounces() {
        let mut bosses = vec![boss(BossKind::Primary)];
        bosses[0].invulnerable_timer = BOSS_INVULNERABLE_FRAMES;
        let mut flags = DefeatedBosses::default();
        let top = bosses[0].body.y;
        let mut p = falling_onto(7720.0, top, 2.0);
        let approach = Approach::of(&p);
        let report = resolve_boss_contacts(&mut p, approach, &mut bosses, &mut flags);
        assert_eq!(report.points, 0);
        assert_eq!(bosses[0].hits, 0);
        assert!(p.body.vy < 0.0);
        assert!(p.is_alive);
    }

    #[test]
    fn second_boss_side_contact_is_recorded() {
        let mut bosses = vec![boss(BossKind::Second)];
        let mut flags = DefeatedBosses::default();
        let mut p = player();
        p.body.x = 7680.0;
        p.body.y = GROUND_Y - p.body.h;
        let approach = Approach::of(&p);
        resolve_boss_contacts(&mut p, approach, &mut bosses, &mut flags);
        assert_eq!(p.death_cause, Some(DeathCause::Boss(BossKind::Second)));
        assert!(BossKind::Second.forces_game_over());
    }
}
