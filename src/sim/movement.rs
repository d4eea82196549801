//! Regular enemy movement and status timers

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{AiMode, Enemy, EntityId};
use crate::consts::{RETREAT_ARRIVAL_DISTANCE, RETREAT_MARGIN};
use crate::tuning::{ArenaTuning, EnemyBaseTuning, SteeringTuning};
use crate::{normalize_angle, polar_to_cartesian, step_toward};

/// Advance status timers and move one non-boss enemy
pub fn update_enemy(
    enemy: &mut Enemy,
    player_pos: Vec2,
    dt: f32,
    base: &EnemyBaseTuning,
    arena: &ArenaTuning,
    crowd: &[(EntityId, Vec2)],
    speed_mod: f32,
    rng: &mut Pcg32,
) {
    enemy.attack_cooldown = (enemy.attack_cooldown - dt).max(0.0);

    if enemy.is_frozen {
        enemy.vel = Vec2::ZERO;
        enemy.freeze_timer -= dt;
        if enemy.freeze_timer <= 0.0 {
            enemy.is_frozen = false;
            enemy.freeze_timer = 0.0;
        }
        return;
    }

    if enemy.is_slowed {
        enemy.slow_timer -= dt;
        if enemy.slow_timer <= 0.0 {
            enemy.is_slowed = false;
            enemy.slow_timer = 0.0;
            enemy.slow_ratio = 1.0;
        }
    }

    let start = enemy.pos;
    let speed = enemy.effective_speed() * speed_mod;

    match enemy.ai {
        AiMode::Chase => {
            let step = (speed * dt).min(enemy.pos.distance(player_pos));
            let heading = chase_direction(enemy, player_pos, crowd, &base.steering, false);
            enemy.pos += heading * step;
        }
        AiMode::Wander => {
            enemy.wander_timer -= dt;
            if enemy.wander_timer <= 0.0 || enemy.wander_dir == Vec2::ZERO {
                enemy.wander_timer = base.wander_interval;
                enemy.wander_dir = wander_direction(enemy.pos, arena, rng);
            }
            enemy.pos += enemy.wander_dir * speed * base.wander_speed_ratio * dt;
        }
        AiMode::Retreat => {
            let exit = Vec2::new(enemy.pos.x, -RETREAT_MARGIN);
            enemy.pos = step_toward(enemy.pos, exit, speed * base.retreat_speed_ratio * dt);
            if enemy.pos.distance(exit) <= RETREAT_ARRIVAL_DISTANCE {
                enemy.escaped = true;
            }
        }
        AiMode::Circle => {
            enemy.orbit_angle = normalize_angle(enemy.orbit_angle + base.circle_orbit_speed * dt);
            let target = player_pos + polar_to_cartesian(base.circle_orbit_radius, enemy.orbit_angle);
            let catch_up = if enemy.pos.distance(target) > base.circle_orbit_radius {
                2.0
            } else {
                1.0
            };
            enemy.pos = step_toward(enemy.pos, target, speed * catch_up * dt);
        }
    }

    if dt > 0.0 {
        enemy.vel = (enemy.pos - start) / dt;
    }
}

/// Heading for a chaser: straight at the player, bent toward an id-based
/// slot on the flank ring when close, plus separation from `crowd`
///
/// `crowd` holds positions sampled before anyone moved this tick. Returns
/// zero when the enemy sits exactly on the player.
pub fn chase_direction(
    enemy: &Enemy,
    player_pos: Vec2,
    crowd: &[(EntityId, Vec2)],
    steering: &SteeringTuning,
    is_boss: bool,
) -> Vec2 {
    let to_player = player_pos - enemy.pos;
    let distance = to_player.length();
    if distance <= f32::EPSILON {
        return Vec2::ZERO;
    }
    let mut direction = to_player / distance;

    if steering.flank_enabled && distance < steering.flank_distance {
        let angle = (enemy.id % 360) as f32 * std::f32::consts::PI / 180.0;
        let slot = player_pos + polar_to_cartesian(steering.flank_distance, angle);
        let flank = (slot - enemy.pos).normalize_or_zero() * steering.flank_weight;
        direction = (direction + flank).normalize_or_zero();
    }

    let (radius, strength) = if is_boss {
        (
            steering.separation_radius * steering.boss_separation_radius_mult,
            steering.separation_strength * steering.boss_separation_strength_mult,
        )
    } else {
        (steering.separation_radius, steering.separation_strength)
    };
    let mut push = Vec2::ZERO;
    if radius > 0.0 {
        for &(id, pos) in crowd {
            if id == enemy.id {
                continue;
            }
            let away = enemy.pos - pos;
            let gap = away.length();
            if gap > 0.0 && gap < radius {
                let falloff = (radius - gap) / radius;
                push += away / gap * falloff * falloff;
            }
        }
    }
    push *= strength;

    // A strong push outweighs the pull toward the player
    let magnitude = push.length();
    let weight = if magnitude > 1.0 {
        (1.0 - magnitude * 0.3).max(0.3)
    } else {
        1.0
    };
    (direction * weight + push).normalize_or_zero()
}

/// Random heading, or straight back in if the enemy is outside the arena
fn wander_direction(pos: Vec2, arena: &ArenaTuning, rng: &mut Pcg32) -> Vec2 {
    let outside = pos.x < 0.0 || pos.y < 0.0 || pos.x > arena.width || pos.y > arena.height;
    if outside {
        let center = Vec2::new(arena.width * 0.5, arena.height * 0.5);
        return (center - pos).normalize_or_zero();
    }
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    polar_to_cartesian(1.0, angle)
}
