//! Damage pipeline
//!
//! Per hit, in order: execute check, base damage, elemental status (frost,
//! chain lightning), then the death cascade (explosion, static field) on the
//! enemy's first alive-to-dead transition. Secondary damage is raw and never
//! cascades further.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Enemy, EntityId, GameEvent, SkillSet, StaticField, push_effect, push_sound};
use crate::audio::SoundEffect;
use crate::fx::{EffectKind, EffectParams};
use crate::tuning::SkillTuning;

/// Borrowed pieces of the game state a hit needs
pub struct DamageContext<'a> {
    pub skills: &'a SkillTuning,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
}

/// What one hit did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageReport {
    /// The target went from alive to dead on this hit
    pub enemy_died: bool,
    pub executed: bool,
    /// Damage applications, the primary hit included
    pub applications: u32,
    pub lightning_hits: Vec<EntityId>,
    pub explosion_hits: Vec<EntityId>,
    /// Enemies other than the target killed by secondary damage
    pub secondary_kills: Vec<EntityId>,
    /// Zone to register (the caller assigns its id)
    pub static_field: Option<StaticField>,
}

/// Raw subtraction with no skills applied. Returns true if this killed the enemy.
pub fn apply_raw(enemy: &mut Enemy, amount: f32) -> bool {
    if !enemy.is_alive() {
        return false;
    }
    enemy.hp = (enemy.hp - amount).max(0.0);
    enemy.hp <= 0.0
}

/// Apply a hit of `amount` to `enemies[target]`
///
/// `source` is the attacker's skill set; `None` means a plain hit.
pub fn apply_damage(
    ctx: &mut DamageContext<'_>,
    enemies: &mut [Enemy],
    target: usize,
    amount: f32,
    source: Option<&SkillSet>,
) -> DamageReport {
    let mut report = DamageReport::default();
    let Some(enemy) = enemies.get_mut(target) else {
        return report;
    };
    if !enemy.is_alive() {
        return report;
    }
    report.applications = 1;

    let hit_pos = enemy.pos;
    let is_boss = enemy.is_boss();
    if is_boss {
        push_sound(ctx.events, SoundEffect::BossHit);
        push_effect(ctx.events, EffectKind::BossHit, hit_pos, EffectParams::default());
    } else {
        push_sound(ctx.events, SoundEffect::EnemyHit);
        push_effect(ctx.events, EffectKind::Hit, hit_pos, EffectParams::default());
    }

    let default_skills = SkillSet::default();
    let skills = source.unwrap_or(&default_skills);

    if let Some(execute) = skills.execute {
        let ratio_after = (enemy.hp - amount) / enemy.max_hp;
        if ratio_after <= execute.threshold {
            enemy.hp = 0.0;
            report.executed = true;
            report.enemy_died = true;
            push_effect(ctx.events, EffectKind::Execute, hit_pos, EffectParams::default());
            return report;
        }
    }

    enemy.hp = (enemy.hp - amount).max(0.0);
    let died = enemy.hp <= 0.0;
    report.enemy_died = died;

    if let Some(frost) = skills.frost {
        if !is_boss && !died {
            enemy.is_slowed = true;
            enemy.slow_ratio = frost.slow_ratio;
            enemy.slow_timer = ctx.skills.frost_duration;
            if frost.deep_freeze_chance > 0.0 && ctx.rng.random::<f32>() < frost.deep_freeze_chance {
                enemy.is_frozen = true;
                enemy.freeze_timer = ctx.skills.deep_freeze_duration;
                push_effect(
                    ctx.events,
                    EffectKind::Freeze,
                    hit_pos,
                    EffectParams::default().with_duration(ctx.skills.deep_freeze_duration),
                );
            }
        }
    }

    if let Some(lightning) = skills.lightning {
        chain_lightning(ctx, enemies, target, amount, lightning.chain_count, &mut report);
    }

    if died {
        if let Some(explosive) = skills.explosive {
            explode(ctx, enemies, target, amount, explosive.chain_explosion, &mut report);
        }
        if skills.static_field {
            let field = &ctx.skills.static_field;
            report.static_field = Some(StaticField {
                id: 0,
                pos: hit_pos,
                radius: field.radius,
                remaining: field.duration,
                damage_per_sec: field.damage_per_sec,
                tick_interval: field.tick_interval,
                accumulator: 0.0,
            });
            push_effect(
                ctx.events,
                EffectKind::StaticField,
                hit_pos,
                EffectParams::radius(field.radius).with_duration(field.duration),
            );
        }
    }

    report
}

/// Hop from the hit enemy to the nearest unvisited enemy in range, up to `chain_count` times
fn chain_lightning(
    ctx: &mut DamageContext<'_>,
    enemies: &mut [Enemy],
    origin: usize,
    amount: f32,
    chain_count: u32,
    report: &mut DamageReport,
) {
    let range = ctx.skills.lightning.chain_range;
    let chain_damage = amount * ctx.skills.lightning.damage_ratio;
    let mut visited = vec![origin];
    let mut current = origin;

    for _ in 0..chain_count {
        let from = enemies[current].pos;
        let next = enemies
            .iter()
            .enumerate()
            .filter(|(i, e)| e.is_alive() && !visited.contains(i))
            .map(|(i, e)| (i, e.pos.distance(from)))
            .filter(|&(_, d)| d <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i);
        let Some(next) = next else {
            break;
        };

        visited.push(next);
        let link = &mut enemies[next];
        report.applications += 1;
        report.lightning_hits.push(link.id);
        push_effect(ctx.events, EffectKind::Lightning, from, EffectParams::beam(link.pos));
        if apply_raw(link, chain_damage) {
            report.secondary_kills.push(link.id);
        }
        current = next;
    }
}

/// One shallow blast around a dying enemy
fn explode(
    ctx: &mut DamageContext<'_>,
    enemies: &mut [Enemy],
    origin: usize,
    amount: f32,
    chain_explosion: bool,
    report: &mut DamageReport,
) {
    let center = enemies[origin].pos;
    let radius = ctx.skills.explosive.radius;
    let blast = amount * ctx.skills.explosive.damage_ratio;

    push_sound(ctx.events, SoundEffect::Explosion);
    push_effect(ctx.events, EffectKind::Explosion, center, EffectParams::radius(radius));

    for (i, enemy) in enemies.iter_mut().enumerate() {
        if i == origin || !enemy.is_alive() || enemy.pos.distance(center) > radius {
            continue;
        }
        report.applications += 1;
        report.explosion_hits.push(enemy.id);
        if apply_raw(enemy, blast) {
            report.secondary_kills.push(enemy.id);
            if chain_explosion {
                push_effect(ctx.events, EffectKind::ChainExplosion, enemy.pos, EffectParams::default());
            }
        }
    }
}

/// Age static fields and deal their damage ticks. Expired fields are removed.
///
/// Returns the number of damage applications.
pub fn tick_static_fields(fields: &mut Vec<StaticField>, enemies: &mut [Enemy], dt: f32) -> u32 {
    let mut applications = 0;
    for field in fields.iter_mut() {
        let step = dt.min(field.remaining.max(0.0));
        field.remaining -= dt;
        field.accumulator += step;
        while field.tick_interval > 0.0 && field.accumulator >= field.tick_interval {
            field.accumulator -= field.tick_interval;
            let damage = field.damage_per_sec * field.tick_interval;
            for enemy in enemies.iter_mut() {
                if enemy.is_alive() && enemy.pos.distance(field.pos) <= field.radius {
                    apply_raw(enemy, damage);
                    applications += 1;
                }
            }
        }
    }
    fields.retain(|f| f.remaining > 0.0);
    applications
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::boss::BossBrain;
    use crate::sim::state::{ExecuteSkill, ExplosiveSkill, FrostSkill, LightningSkill};
    use crate::tuning::{EnemyKind, Tuning};
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn enemy(id: EntityId, x: f32, hp: f32) -> Enemy {
        let mut e = Enemy::new(id, EnemyKind::Normal, Vec2::new(x, 0.0), 10.0, hp, 100.0, 10.0);
        e.max_hp = hp;
        e
    }

    struct Fixture {
        tuning: Tuning,
        rng: Pcg32,
        events: Vec<GameEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                tuning: Tuning::default(),
                rng: Pcg32::seed_from_u64(42),
                events: Vec::new(),
            }
        }

        fn ctx(&mut self) -> DamageContext<'_> {
            DamageContext {
                skills: &self.tuning.skills,
                rng: &mut self.rng,
                events: &mut self.events,
            }
        }
    }

    #[test]
    fn test_execute_kills_below_threshold() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(1, 0.0, 100.0)];
        enemies[0].hp = 12.0;
        let skills = SkillSet {
            execute: Some(ExecuteSkill { threshold: 0.15 }),
            ..SkillSet::default()
        };
        let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 10.0, Some(&skills));
        assert!(report.executed);
        assert!(report.enemy_died);
        assert_eq!(enemies[0].hp, 0.0);
    }

    #[test]
    fn test_execute_skips_elemental_effects() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(1, 0.0, 100.0), enemy(2, 50.0, 100.0)];
        enemies[0].hp = 20.0;
        let skills = SkillSet {
            execute: Some(ExecuteSkill::default()),
            lightning: Some(LightningSkill { chain_count: 3 }),
            explosive: Some(ExplosiveSkill::default()),
            ..SkillSet::default()
        };
        let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 10.0, Some(&skills));
        assert!(report.executed);
        assert_eq!(report.applications, 1);
        assert_eq!(enemies[1].hp, 100.0);
    }

    #[test]
    fn test_damage_to_dead_enemy_is_noop() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(1, 0.0, 50.0)];
        enemies[0].hp = 0.0;
        let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 10.0, None);
        assert_eq!(report, DamageReport::default());
        assert!(fx.events.is_empty());

        let report = apply_damage(&mut fx.ctx(), &mut enemies, 7, 10.0, None);
        assert_eq!(report, DamageReport::default());
    }

    #[test]
    fn test_base_damage_floors_at_zero() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(1, 0.0, 20.0)];
        let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 30.0, None);
        assert!(report.enemy_died);
        assert_eq!(enemies[0].hp, 0.0);
    }

    #[test]
    fn test_isolated_chain_lightning_hits_once() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(1, 0.0, 100.0), enemy(2, 5000.0, 100.0)];
        let skills = SkillSet {
            lightning: Some(LightningSkill { chain_count: 2 }),
            ..SkillSet::default()
        };
        let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 30.0, Some(&skills));
        assert_eq!(report.applications, 1);
        assert!(report.lightning_hits.is_empty());
        assert_eq!(enemies[1].hp, 100.0);
    }

    #[test]
    fn test_chain_lightning_picks_nearest_and_never_revisits() {
        let mut fx = Fixture::new();
        let mut enemies = vec![
            enemy(1, 0.0, 100.0),
            enemy(2, 200.0, 100.0),
            enemy(3, 100.0, 100.0),
            enemy(4, 300.0, 100.0),
        ];
        let skills = SkillSet {
            lightning: Some(LightningSkill { chain_count: 2 }),
            ..SkillSet::default()
        };
        let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 30.0, Some(&skills));
        assert_eq!(report.lightning_hits, vec![3, 2]);
        assert_eq!(report.applications, 3);
        assert!((enemies[2].hp - (100.0 - 21.0)).abs() < 1e-4);
        assert_eq!(enemies[3].hp, 100.0);
    }

    #[test]
    fn test_frost_slows_and_skips_bosses() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(1, 0.0, 100.0), enemy(2, 500.0, 1000.0)];
        enemies[1].boss = Some(BossBrain::new("Boss".to_string(), 10, &fx.tuning.bosses));
        let skills = SkillSet {
            frost: Some(FrostSkill::default()),
            ..SkillSet::default()
        };
        apply_damage(&mut fx.ctx(), &mut enemies, 0, 10.0, Some(&skills));
        apply_damage(&mut fx.ctx(), &mut enemies, 1, 10.0, Some(&skills));
        assert!(enemies[0].is_slowed);
        assert_eq!(enemies[0].slow_timer, 2.0);
        assert!(!enemies[0].is_frozen);
        assert!(!enemies[1].is_slowed);
    }

    #[test]
    fn test_deep_freeze_certain_roll() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(1, 0.0, 100.0)];
        let skills = SkillSet {
            frost: Some(FrostSkill {
                slow_ratio: 0.5,
                deep_freeze_chance: 1.0,
            }),
            ..SkillSet::default()
        };
        apply_damage(&mut fx.ctx(), &mut enemies, 0, 10.0, Some(&skills));
        assert!(enemies[0].is_frozen);
        assert_eq!(enemies[0].freeze_timer, 1.5);
    }

    #[test]
    fn test_explosion_is_shallow() {
        let mut fx = Fixture::new();
        // Target dies; neighbour dies to the blast; the one past it is out of the
        // first blast's radius and must stay untouched.
        let mut enemies = vec![enemy(1, 0.0, 10.0), enemy(2, 250.0, 5.0), enemy(3, 500.0, 5.0)];
        let skills = SkillSet {
            explosive: Some(ExplosiveSkill { chain_explosion: true }),
            ..SkillSet::default()
        };
        let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 20.0, Some(&skills));
        assert!(report.enemy_died);
        assert_eq!(report.explosion_hits, vec![2]);
        assert_eq!(report.secondary_kills, vec![2]);
        assert_eq!(enemies[2].hp, 5.0);
        let chain_bursts = fx
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Effect { kind: EffectKind::ChainExplosion, .. }))
            .count();
        assert_eq!(chain_bursts, 1);
    }

    #[test]
    fn test_no_cascade_without_death() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(1, 0.0, 100.0), enemy(2, 10.0, 100.0)];
        let skills = SkillSet {
            explosive: Some(ExplosiveSkill::default()),
            static_field: true,
            ..SkillSet::default()
        };
        let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 10.0, Some(&skills));
        assert!(!report.enemy_died);
        assert!(report.static_field.is_none());
        assert_eq!(enemies[1].hp, 100.0);
    }

    #[test]
    fn test_static_field_ticks_then_expires() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(1, 0.0, 20.0), enemy(2, 50.0, 100.0)];
        let skills = SkillSet {
            static_field: true,
            ..SkillSet::default()
        };
        let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 30.0, Some(&skills));
        assert_eq!(
            report.static_field,
            Some(StaticField {
                id: 0,
                pos: Vec2::ZERO,
                radius: 180.0,
                remaining: 3.0,
                damage_per_sec: 10.0,
                tick_interval: 0.5,
                accumulator: 0.0,
            })
        );
        let mut fields: Vec<StaticField> = report.static_field.into_iter().collect();
        assert_eq!(fields.len(), 1);

        // 10 dps in 0.5 s ticks over 3 s: six ticks of 5
        for _ in 0..20 {
            tick_static_fields(&mut fields, &mut enemies, 0.25);
        }
        assert!(fields.is_empty());
        assert!((enemies[1].hp - 70.0).abs() < 1e-3, "hp {}", enemies[1].hp);
    }

    proptest! {
        #[test]
        fn prop_lightning_bounded_by_chain_count(
            xs in proptest::collection::vec(0.0f32..600.0, 1..12),
            chain_count in 0u32..6,
        ) {
            let mut fx = Fixture::new();
            let mut enemies: Vec<Enemy> = xs
                .iter()
                .enumerate()
                .map(|(i, &x)| enemy(i as EntityId + 1, x, 1000.0))
                .collect();
            let skills = SkillSet {
                lightning: Some(LightningSkill { chain_count }),
                ..SkillSet::default()
            };
            let report = apply_damage(&mut fx.ctx(), &mut enemies, 0, 10.0, Some(&skills));
            prop_assert!(report.lightning_hits.len() <= chain_count as usize);
            let mut seen = report.lightning_hits.clone();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), report.lightning_hits.len());
            prop_assert!(!report.lightning_hits.contains(&1));
        }
    }
}
