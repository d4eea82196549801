//! Collision detection
//!
//! Everything is a circle. Tests run in registry order (ascending id) and only
//! report contacts; damage is applied by the caller.

use glam::Vec2;

use super::state::{Enemy, EntityId, Hazard, Player, Projectile};
use crate::tuning::ArenaTuning;

/// A contact found this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEvent {
    ProjectileHit {
        projectile: EntityId,
        enemy: EntityId,
        damage: f32,
    },
    /// Enemy body attack on the player
    EnemyContact { enemy: EntityId, damage: f32 },
    /// Kamikaze detonation on the player
    ContactExplosion { enemy: EntityId, damage: f32 },
    HazardHit { hazard: EntityId, damage: f32 },
}

#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Projectile vs enemy hits
///
/// A non-piercing projectile dies on its first hit. A piercing one records
/// each enemy it passes through and never hits the same enemy twice.
pub fn resolve(projectiles: &mut [Projectile], enemies: &[Enemy]) -> Vec<CollisionEvent> {
    projectiles
        .iter_mut()
        .flat_map(|projectile| resolve_projectile(projectile, enemies))
        .collect()
}

/// Hits for a single projectile against the enemies alive right now
///
/// The tick applies each projectile's damage before testing the next one,
/// so a bullet never spends itself on an enemy killed earlier in the tick.
pub fn resolve_projectile(projectile: &mut Projectile, enemies: &[Enemy]) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    if !projectile.alive {
        return events;
    }

    for enemy in enemies.iter().filter(|e| e.is_alive()) {
        if projectile.hit_enemies.contains(&enemy.id) {
            continue;
        }
        if !circles_overlap(projectile.pos, projectile.radius, enemy.pos, enemy.radius) {
            continue;
        }

        projectile.hit_enemies.insert(enemy.id);
        events.push(CollisionEvent::ProjectileHit {
            projectile: projectile.id,
            enemy: enemy.id,
            damage: projectile.damage,
        });
        if !projectile.piercing {
            projectile.alive = false;
            break;
        }
    }

    events
}

/// Enemy vs player contacts
///
/// Updates the cosmetic `is_burning` flag on every alive enemy. Attacks are
/// gated by each enemy's `attack_cooldown`, which restarts at `cooldown`.
/// Frozen enemies never attack. Kamikazes detonate and die.
pub fn resolve_player_contacts(player: &Player, enemies: &mut [Enemy], cooldown: f32) -> Vec<CollisionEvent> {
    let mut events = Vec::new();

    for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
        let touching = circles_overlap(player.pos, player.radius, enemy.pos, enemy.radius);
        enemy.is_burning = touching;
        if !touching || enemy.is_frozen {
            continue;
        }

        if let Some(damage) = enemy.contact_explosion {
            enemy.hp = 0.0;
            events.push(CollisionEvent::ContactExplosion { enemy: enemy.id, damage });
            continue;
        }

        if enemy.attack_cooldown <= 0.0 {
            enemy.attack_cooldown = cooldown;
            events.push(CollisionEvent::EnemyContact {
                enemy: enemy.id,
                damage: enemy.damage,
            });
        }
    }

    events
}

/// Hazard vs player hits; each hazard is consumed by its hit
pub fn resolve_hazards(player: &Player, hazards: &mut [Hazard]) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    for hazard in hazards.iter_mut().filter(|h| h.alive) {
        if circles_overlap(player.pos, player.radius, hazard.pos, hazard.radius) {
            hazard.alive = false;
            events.push(CollisionEvent::HazardHit {
                hazard: hazard.id,
                damage: hazard.damage,
            });
        }
    }
    events
}

/// Outside the playfield by more than `margin`
pub fn out_of_bounds(pos: Vec2, arena: &ArenaTuning, margin: f32) -> bool {
    pos.x < -margin || pos.y < -margin || pos.x > arena.width + margin || pos.y > arena.height + margin
}
