//! Boss AI
//!
//! Each boss carries a `BossBrain`: an HP-driven phase that only escalates, an
//! irreversible berserk flag, three probabilistic patterns on independent
//! cooldowns, and a burn burst on a strict interval.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::spawn::{EnemySpawn, SpawnRequest};
use super::movement::chase_direction;
use super::state::{AiMode, Enemy, EntityId};
use crate::tuning::{BossTuning, EnemyKind, Tuning};
use crate::{normalize_angle, polar_to_cartesian, step_toward};

/// What the boss is doing right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossPattern {
    /// Chase the player
    Idle,
    CircleStrafe { angle: f32, remaining: f32 },
    Charge { direction: Vec2, remaining: f32 },
    /// Minions were called this tick
    Summon,
    /// Burn projectiles were fired this tick
    BurnBurst,
}

/// Patterns chosen by roll, in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Summon,
    Charge,
    CircleStrafe,
}

impl PatternKind {
    pub const ORDER: [PatternKind; 3] = [PatternKind::Summon, PatternKind::Charge, PatternKind::CircleStrafe];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternTimer {
    pub kind: PatternKind,
    pub cooldown: f32,
    pub elapsed: f32,
}

impl PatternTimer {
    pub fn is_ready(&self) -> bool {
        self.elapsed >= self.cooldown
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossBrain {
    pub name: String,
    pub wave: u32,
    pub phase: u8,
    pub current_pattern: BossPattern,
    pub timers: [PatternTimer; 3],
    pub burn_timer: f32,
    pub berserk: bool,
}

impl BossBrain {
    pub fn new(name: String, wave: u32, tuning: &BossTuning) -> Self {
        let timers = PatternKind::ORDER.map(|kind| PatternTimer {
            kind,
            cooldown: pattern_cooldown(kind, tuning),
            elapsed: 0.0,
        });
        Self {
            name,
            wave,
            phase: 0,
            current_pattern: BossPattern::Idle,
            timers,
            burn_timer: 0.0,
            berserk: false,
        }
    }
}

fn pattern_cooldown(kind: PatternKind, tuning: &BossTuning) -> f32 {
    match kind {
        PatternKind::Summon => tuning.summon.cooldown,
        PatternKind::Charge => tuning.charge.cooldown,
        PatternKind::CircleStrafe => tuning.circle_strafe.cooldown,
    }
}

fn pattern_chance(kind: PatternKind, tuning: &BossTuning) -> f32 {
    match kind {
        PatternKind::Summon => tuning.summon.chance,
        PatternKind::Charge => tuning.charge.chance,
        PatternKind::CircleStrafe => tuning.circle_strafe.chance,
    }
}

/// Phase for an HP ratio: 0 above the first threshold, then 1, then 2
pub fn phase_for_ratio(ratio: f32, thresholds: [f32; 2]) -> u8 {
    if ratio <= thresholds[1] {
        2
    } else if ratio <= thresholds[0] {
        1
    } else {
        0
    }
}

/// Raise the phase if the HP ratio calls for it. Returns true on change.
pub fn update_phase(brain: &mut BossBrain, ratio: f32, thresholds: [f32; 2]) -> bool {
    let phase = phase_for_ratio(ratio, thresholds).max(brain.phase);
    let changed = phase != brain.phase;
    brain.phase = phase;
    changed
}

/// Hazard the caller should add to the registry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub ttl: f32,
}

/// Side effects of one boss update
#[derive(Debug, Clone, Default)]
pub struct BossActions {
    pub summons: Vec<SpawnRequest>,
    pub hazards: Vec<HazardSpawn>,
    pub triggered: Option<PatternKind>,
    pub phase_changed: bool,
    pub went_berserk: bool,
}

/// Advance one boss by `dt`: phase, berserk, pattern selection, and movement
pub fn update_boss(
    enemy: &mut Enemy,
    player_pos: Vec2,
    dt: f32,
    tuning: &Tuning,
    crowd: &[(EntityId, Vec2)],
    speed_mod: f32,
    rng: &mut Pcg32,
) -> BossActions {
    let mut actions = BossActions::default();
    let Some(mut brain) = enemy.boss.take() else {
        return actions;
    };
    let bosses = &tuning.bosses;

    let ratio = enemy.hp_ratio();
    if update_phase(&mut brain, ratio, bosses.phase_thresholds) {
        log::debug!("{} enters phase {}", brain.name, brain.phase);
        actions.phase_changed = true;
    }
    if !brain.berserk && ratio <= bosses.berserk.hp_threshold {
        brain.berserk = true;
        enemy.speed = enemy.base_speed * bosses.berserk.speed_mult;
        enemy.damage = enemy.base_damage * bosses.berserk.damage_mult;
        log::debug!("{} goes berserk", brain.name);
        actions.went_berserk = true;
    }

    if matches!(brain.current_pattern, BossPattern::Summon | BossPattern::BurnBurst) {
        brain.current_pattern = BossPattern::Idle;
    }
    enemy.attack_cooldown = (enemy.attack_cooldown - dt).max(0.0);
    for timer in &mut brain.timers {
        timer.elapsed += dt;
    }

    if brain.current_pattern == BossPattern::Idle {
        for timer in &mut brain.timers {
            if !timer.is_ready() {
                continue;
            }
            if rng.random::<f32>() >= pattern_chance(timer.kind, bosses) {
                continue;
            }
            timer.elapsed = 0.0;
            actions.triggered = Some(timer.kind);
            break;
        }
    }

    if let Some(kind) = actions.triggered {
        log::debug!("{} uses {:?}", brain.name, kind);
        brain.current_pattern = match kind {
            PatternKind::Summon => {
                actions.summons = summon_minions(enemy, brain.wave, bosses, rng);
                BossPattern::Summon
            }
            PatternKind::Charge => BossPattern::Charge {
                direction: (player_pos - enemy.pos).normalize_or_zero(),
                remaining: bosses.charge.duration,
            },
            PatternKind::CircleStrafe => {
                let offset = enemy.pos - player_pos;
                BossPattern::CircleStrafe {
                    angle: offset.y.atan2(offset.x),
                    remaining: bosses.circle_strafe.duration,
                }
            }
        };
    }

    let burst = &bosses.burn_burst;
    brain.burn_timer += dt;
    if burst.fire_interval > 0.0 && brain.burn_timer >= burst.fire_interval {
        brain.burn_timer -= burst.fire_interval;
        let count = burst.projectile_count.max(1);
        for i in 0..count {
            let angle = i as f32 * std::f32::consts::TAU / count as f32;
            let dir = polar_to_cartesian(1.0, angle);
            actions.hazards.push(HazardSpawn {
                pos: enemy.pos,
                vel: dir * burst.projectile_speed,
                radius: burst.radius,
                damage: burst.damage,
                ttl: burst.lifetime,
            });
        }
        if brain.current_pattern == BossPattern::Idle {
            brain.current_pattern = BossPattern::BurnBurst;
        }
    }

    let start = enemy.pos;
    let speed = enemy.speed * speed_mod;
    brain.current_pattern = match brain.current_pattern {
        BossPattern::Charge { direction, remaining } => {
            enemy.pos += direction * enemy.base_speed * bosses.charge.speed_mult * dt;
            let remaining = remaining - dt;
            if remaining > 0.0 {
                BossPattern::Charge { direction, remaining }
            } else {
                BossPattern::Idle
            }
        }
        BossPattern::CircleStrafe { angle, remaining } => {
            let strafe = &bosses.circle_strafe;
            let angle = normalize_angle(angle + strafe.orbit_speed * dt);
            let target = player_pos + polar_to_cartesian(strafe.orbit_radius, angle);
            enemy.pos = step_toward(enemy.pos, target, speed * 2.0 * dt);
            let remaining = remaining - dt;
            if remaining > 0.0 {
                BossPattern::CircleStrafe { angle, remaining }
            } else {
                BossPattern::Idle
            }
        }
        pattern => {
            let step = (speed * dt).min(enemy.pos.distance(player_pos));
            let heading = chase_direction(enemy, player_pos, crowd, &tuning.enemy.steering, true);
            enemy.pos += heading * step;
            pattern
        }
    };
    if dt > 0.0 {
        enemy.vel = (enemy.pos - start) / dt;
    }

    enemy.boss = Some(brain);
    actions
}

fn summon_minions(boss: &Enemy, wave: u32, tuning: &BossTuning, rng: &mut Pcg32) -> Vec<SpawnRequest> {
    let summon = &tuning.summon;
    let count = summon.counts.get(&wave).copied().unwrap_or(summon.default_count);
    let spread = summon.spread.max(0.0);
    (0..count)
        .map(|_| {
            let offset = if spread > 0.0 {
                Vec2::new(rng.random_range(-spread..=spread), rng.random_range(-spread..=spread))
            } else {
                Vec2::ZERO
            };
            SpawnRequest::Enemy(EnemySpawn {
                ai: AiMode::Chase,
                owner: Some(boss.id),
                max_hp: Some(boss.max_hp * summon.minion_hp_ratio),
                counts_for_wave: false,
                ..EnemySpawn::new(EnemyKind::Normal, boss.pos + offset)
            })
        })
        .collect()
}
