//! Kill rewards and pickup collection

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::circles_overlap;
use super::spawn::{EnemySpawn, SpawnRequest, enemy_stats};
use super::state::{AiMode, Enemy, GameEvent, GameRecord, Pickup, PickupKind, Player, push_sound};
use crate::audio::SoundEffect;
use crate::consts::PICKUP_RADIUS;
use crate::tuning::{EnemyKind, RewardTuning, Tuning};

/// Pickup the caller should add to the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupSpawn {
    pub kind: PickupKind,
    pub pos: Vec2,
}

/// Drops for one combat kill
///
/// `coin_modifier` is the active event's coin multiplier (1.0 without one).
pub fn on_enemy_killed(enemy: &Enemy, rewards: &RewardTuning, coin_modifier: f32, rng: &mut Pcg32) -> Vec<PickupSpawn> {
    let coins = (rewards.base_coin_count as f32 * enemy.coin_multiplier * coin_modifier).floor().max(0.0) as u32;
    let mut drops: Vec<PickupSpawn> = (0..coins)
        .map(|_| PickupSpawn {
            kind: PickupKind::Coin,
            pos: enemy.pos,
        })
        .collect();

    if rng.random::<f32>() < rewards.heal_drop_chance {
        drops.push(PickupSpawn {
            kind: PickupKind::Heal,
            pos: enemy.pos,
        });
    }
    drops
}

/// Normal enemies a dying summoner leaves behind
pub fn summon_on_death(enemy: &Enemy, tuning: &Tuning, wave: u32, rng: &mut Pcg32) -> Vec<SpawnRequest> {
    if enemy.summon_on_death == 0 {
        return Vec::new();
    }
    let rewards = &tuning.rewards;
    let stats = enemy_stats(tuning, EnemyKind::Normal, wave);
    let spread = rewards.summon_spread.max(0.0);
    (0..enemy.summon_on_death)
        .map(|_| {
            let offset = if spread > 0.0 {
                Vec2::new(rng.random_range(-spread..=spread), rng.random_range(-spread..=spread))
            } else {
                Vec2::ZERO
            };
            SpawnRequest::Enemy(EnemySpawn {
                ai: AiMode::Chase,
                max_hp: Some(stats.hp * rewards.summon_hp_ratio),
                ..EnemySpawn::new(EnemyKind::Normal, enemy.pos + offset)
            })
        })
        .collect()
}

/// Collect every pickup touching the player. Collected pickups are removed.
pub fn collect_pickups(
    player: &mut Player,
    pickups: &mut Vec<Pickup>,
    record: &mut GameRecord,
    rewards: &RewardTuning,
    events: &mut Vec<GameEvent>,
) -> usize {
    let mut collected = 0;
    for pickup in pickups.iter_mut().filter(|p| !p.collected) {
        if !circles_overlap(player.pos, player.radius, pickup.pos, PICKUP_RADIUS) {
            continue;
        }
        pickup.collected = true;
        collected += 1;
        match pickup.kind {
            PickupKind::Coin => {
                record.coins += rewards.coin_value;
                push_sound(events, SoundEffect::CoinPickup);
            }
            PickupKind::Heal => {
                player.heal(rewards.heal_amount);
                push_sound(events, SoundEffect::HealPickup);
            }
        }
    }
    pickups.retain(|p| !p.collected);
    collected
}
