//! Spawn scheduling
//!
//! Turns wave configuration and elapsed time into spawn requests. Regular
//! waves spawn on a capped timer; boss waves follow their `BossPolicy`.

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_pcg::Pcg32;

use super::boss::BossBrain;
use super::state::{AiMode, Enemy, EntityId};
use crate::consts::RETREAT_MARGIN;
use crate::tuning::{ArenaTuning, BossPolicy, EnemyKind, Tuning, WaveScaling};

/// Spawn one regular enemy
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub ai: AiMode,
    pub owner: Option<EntityId>,
    /// Overrides the scaled max HP
    pub max_hp: Option<f32>,
    pub counts_for_wave: bool,
    pub delay: f32,
}

impl EnemySpawn {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            ai: AiMode::Chase,
            owner: None,
            max_hp: None,
            counts_for_wave: true,
            delay: 0.0,
        }
    }
}

/// Spawn one boss
#[derive(Debug, Clone, PartialEq)]
pub struct BossSpawn {
    pub name: String,
    pub wave: u32,
    pub pos: Vec2,
    pub delay: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpawnRequest {
    Enemy(EnemySpawn),
    Boss(BossSpawn),
}

impl SpawnRequest {
    pub fn delay(&self) -> f32 {
        match self {
            SpawnRequest::Enemy(spec) => spec.delay,
            SpawnRequest::Boss(spec) => spec.delay,
        }
    }

    pub fn without_delay(mut self) -> Self {
        match &mut self {
            SpawnRequest::Enemy(spec) => spec.delay = 0.0,
            SpawnRequest::Boss(spec) => spec.delay = 0.0,
        }
        self
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, SpawnRequest::Boss(_))
    }
}

/// One-shot spawn flags, reset at every wave start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnGuards {
    /// Single-boss policy: the boss has been requested
    pub boss_spawned: bool,
    /// Sequential policy: bosses requested so far
    pub sequential_spawned: u32,
    /// Cleanup stragglers requested so far
    pub cleanup_respawns: u32,
}

/// What the scheduler needs to know about the current wave
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub tuning: &'a Tuning,
    pub wave: u32,
    pub alive: usize,
    /// Seconds since the wave started
    pub elapsed: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    timer: f32,
    cleanup_timer: f32,
    halted: bool,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart timers for a fresh wave
    pub fn reset_for_wave(&mut self) {
        self.timer = 0.0;
        self.cleanup_timer = 0.0;
        self.halted = false;
    }

    /// Stop all further spawning this wave
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Spawn decisions for one tick of active combat
    pub fn tick(
        &mut self,
        ctx: &SpawnContext<'_>,
        guards: &mut SpawnGuards,
        dt: f32,
        rng: &mut Pcg32,
    ) -> Vec<SpawnRequest> {
        if self.halted {
            return Vec::new();
        }
        let scaling = ctx.tuning.wave(ctx.wave);
        match scaling.boss {
            Some(BossPolicy::Sequential { count }) => self.tick_sequential(ctx, guards, count, rng),
            Some(BossPolicy::Single) => self.tick_single(ctx, guards),
            None => self.tick_regular(ctx, scaling, dt, rng),
        }
    }

    fn tick_regular(
        &mut self,
        ctx: &SpawnContext<'_>,
        scaling: &WaveScaling,
        dt: f32,
        rng: &mut Pcg32,
    ) -> Vec<SpawnRequest> {
        let interval = ctx.tuning.rules.base_spawn_interval / scaling.spawn_rate;
        self.timer += dt;

        if ctx.alive >= scaling.max_concurrent {
            self.timer = self.timer.min(interval);
            return Vec::new();
        }
        if self.timer < interval {
            return Vec::new();
        }
        self.timer = (self.timer - interval).min(interval);

        let kind = pick_enemy_kind(&scaling.distribution, ctx.wave, rng);
        let ai = if rng.random::<f32>() < scaling.chase_prob {
            AiMode::Chase
        } else {
            AiMode::Wander
        };
        let pos = edge_position(&ctx.tuning.arena, rng);
        vec![SpawnRequest::Enemy(EnemySpawn {
            ai,
            ..EnemySpawn::new(kind, pos)
        })]
    }

    fn tick_sequential(
        &mut self,
        ctx: &SpawnContext<'_>,
        guards: &mut SpawnGuards,
        count: u32,
        rng: &mut Pcg32,
    ) -> Vec<SpawnRequest> {
        let index = guards.sequential_spawned;
        if index >= count {
            return Vec::new();
        }
        if ctx.elapsed < index as f32 * ctx.tuning.rules.boss_sequential_delay {
            return Vec::new();
        }
        guards.sequential_spawned += 1;

        let arena = &ctx.tuning.arena;
        let margin = RETREAT_MARGIN.min(arena.width * 0.5);
        let x = rng.random_range(margin..=arena.width - margin);
        let name = format!("{} #{}", ctx.tuning.bosses.name_for_wave(ctx.wave), index + 1);
        vec![SpawnRequest::Boss(BossSpawn {
            name,
            wave: ctx.wave,
            pos: Vec2::new(x, -RETREAT_MARGIN),
            delay: 0.0,
        })]
    }

    fn tick_single(&mut self, ctx: &SpawnContext<'_>, guards: &mut SpawnGuards) -> Vec<SpawnRequest> {
        if guards.boss_spawned {
            return Vec::new();
        }
        guards.boss_spawned = true;

        vec![SpawnRequest::Boss(BossSpawn {
            name: ctx.tuning.bosses.name_for_wave(ctx.wave),
            wave: ctx.wave,
            pos: Vec2::new(ctx.tuning.arena.width * 0.5, -RETREAT_MARGIN),
            delay: 0.0,
        })]
    }

    /// Straggler spawns while survivors retreat
    pub fn tick_cleanup(
        &mut self,
        tuning: &Tuning,
        alive_respawned: usize,
        guards: &mut SpawnGuards,
        dt: f32,
        rng: &mut Pcg32,
    ) -> Option<SpawnRequest> {
        let rules = &tuning.rules;
        if guards.cleanup_respawns >= rules.cleanup_respawn_budget {
            return None;
        }
        self.cleanup_timer -= dt;
        if self.cleanup_timer > 0.0 || alive_respawned >= rules.cleanup_respawn_max_alive {
            return None;
        }
        self.cleanup_timer = rules.cleanup_respawn_interval;
        guards.cleanup_respawns += 1;

        let pos = edge_position(&tuning.arena, rng);
        Some(SpawnRequest::Enemy(EnemySpawn {
            ai: AiMode::Circle,
            ..EnemySpawn::new(EnemyKind::Respawned, pos)
        }))
    }
}

fn pick_enemy_kind(distribution: &[(EnemyKind, f32)], wave: u32, rng: &mut Pcg32) -> EnemyKind {
    match WeightedIndex::new(distribution.iter().map(|(_, w)| w.max(0.0))) {
        Ok(index) => distribution[index.sample(rng)].0,
        Err(_) => {
            log::warn!("Wave {wave} has no usable enemy distribution, spawning Normal");
            EnemyKind::Normal
        }
    }
}

/// Random point just outside one of the four playfield edges
pub fn edge_position(arena: &ArenaTuning, rng: &mut Pcg32) -> Vec2 {
    let pad = arena.spawn_padding;
    match rng.random_range(0..4u8) {
        0 => Vec2::new(rng.random_range(0.0..=arena.width), -pad),
        1 => Vec2::new(rng.random_range(0.0..=arena.width), arena.height + pad),
        2 => Vec2::new(-pad, rng.random_range(0.0..=arena.height)),
        _ => Vec2::new(arena.width + pad, rng.random_range(0.0..=arena.height)),
    }
}

/// Scaled stats for an enemy type in a wave
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub hp: f32,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub coin_multiplier: f32,
}

pub fn enemy_stats(tuning: &Tuning, kind: EnemyKind, wave: u32) -> EnemyStats {
    let base = &tuning.enemy;
    let archetype = tuning.enemy_type(kind);
    let scaling = tuning.wave(wave);
    EnemyStats {
        hp: base.base_hp * archetype.hp_mult * scaling.hp_mult,
        speed: base.base_speed * archetype.speed_mult * scaling.speed_mult,
        damage: base.base_damage * archetype.damage_mult * scaling.damage_mult,
        radius: base.radius * archetype.size_mult,
        coin_multiplier: archetype.coin_mult,
    }
}

pub fn build_enemy(id: EntityId, spec: &EnemySpawn, tuning: &Tuning, wave: u32) -> Enemy {
    let stats = enemy_stats(tuning, spec.kind, wave);
    let hp = spec.max_hp.unwrap_or(stats.hp).max(1.0);
    let archetype = tuning.enemy_type(spec.kind);

    let mut enemy = Enemy::new(id, spec.kind, spec.pos, stats.radius, hp, stats.speed, stats.damage);
    enemy.ai = spec.ai;
    enemy.owner = spec.owner;
    enemy.counts_for_wave = spec.counts_for_wave;
    enemy.coin_multiplier = stats.coin_multiplier;
    enemy.summon_on_death = archetype.summon_on_death;
    enemy.contact_explosion = archetype.contact_explosion;
    enemy
}

pub fn build_boss(id: EntityId, spec: &BossSpawn, tuning: &Tuning) -> Enemy {
    let base = &tuning.enemy;
    let scaling = tuning.wave(spec.wave);
    let mut boss = Enemy::new(
        id,
        EnemyKind::Normal,
        spec.pos,
        base.radius * tuning.bosses.size_mult,
        base.base_hp * scaling.hp_mult,
        base.base_speed * scaling.speed_mult,
        base.base_damage * scaling.damage_mult,
    );
    boss.coin_multiplier = tuning.bosses.coin_multiplier;
    boss.boss = Some(BossBrain::new(spec.name.clone(), spec.wave, &tuning.bosses));
    boss
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn ctx(tuning: &Tuning, wave: u32, alive: usize, elapsed: f32) -> SpawnContext<'_> {
        SpawnContext {
            tuning,
            wave,
            alive,
            elapsed,
        }
    }

    #[test]
    fn test_regular_spawn_interval() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scheduler = SpawnScheduler::new();
        let mut guards = SpawnGuards::default();
        // Wave 1: 1.5 / 0.8 = 1.875 s
        let c = ctx(&tuning, 1, 0, 0.0);
        assert!(scheduler.tick(&c, &mut guards, 1.8, &mut rng).is_empty());
        let requests = scheduler.tick(&c, &mut guards, 0.1, &mut rng);
        assert_eq!(requests.len(), 1);
        match &requests[0] {
            SpawnRequest::Enemy(spec) => assert_eq!(spec.kind, EnemyKind::Normal),
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn test_cap_holds_timer_until_slot_frees() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scheduler = SpawnScheduler::new();
        let mut guards = SpawnGuards::default();
        let cap = tuning.wave(1).max_concurrent;

        for _ in 0..10 {
            let capped = ctx(&tuning, 1, cap, 0.0);
            assert!(scheduler.tick(&capped, &mut guards, 1.0, &mut rng).is_empty());
        }
        let freed = ctx(&tuning, 1, cap - 1, 0.0);
        assert_eq!(scheduler.tick(&freed, &mut guards, 0.0, &mut rng).len(), 1);
        // Backlog is not carried over
        assert!(scheduler.tick(&freed, &mut guards, 0.0, &mut rng).is_empty());
    }

    #[test]
    fn test_halted_scheduler_is_silent() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scheduler = SpawnScheduler::new();
        let mut guards = SpawnGuards::default();
        scheduler.halt();
        assert!(scheduler.tick(&ctx(&tuning, 1, 0, 0.0), &mut guards, 10.0, &mut rng).is_empty());
        scheduler.reset_for_wave();
        assert!(!scheduler.is_halted());
    }

    #[test]
    fn test_sequential_bosses_follow_delay() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut scheduler = SpawnScheduler::new();
        let mut guards = SpawnGuards::default();

        let first = scheduler.tick(&ctx(&tuning, 5, 0, 0.0), &mut guards, 0.016, &mut rng);
        assert_eq!(first.len(), 1);
        assert!(first[0].is_boss());
        assert!(scheduler.tick(&ctx(&tuning, 5, 1, 2.9), &mut guards, 0.016, &mut rng).is_empty());
        assert_eq!(scheduler.tick(&ctx(&tuning, 5, 1, 3.0), &mut guards, 0.016, &mut rng).len(), 1);
        assert_eq!(scheduler.tick(&ctx(&tuning, 5, 2, 6.0), &mut guards, 0.016, &mut rng).len(), 1);
        assert!(scheduler.tick(&ctx(&tuning, 5, 3, 60.0), &mut guards, 0.016, &mut rng).is_empty());
        assert_eq!(guards.sequential_spawned, 3);
    }

    #[test]
    fn test_single_boss_spawns_above_top_center() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut scheduler = SpawnScheduler::new();
        let mut guards = SpawnGuards::default();
        let requests = scheduler.tick(&ctx(&tuning, 10, 0, 0.0), &mut guards, 0.016, &mut rng);
        match requests.as_slice() {
            [SpawnRequest::Boss(spec)] => {
                assert_eq!(spec.pos, Vec2::new(tuning.arena.width * 0.5, -RETREAT_MARGIN));
                assert_eq!(spec.name, "The Void Core");
            }
            other => panic!("unexpected requests {other:?}"),
        }
    }

    #[test]
    fn test_cleanup_respawns_respect_budget_and_alive_cap() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut scheduler = SpawnScheduler::new();
        let mut guards = SpawnGuards::default();
        let max_alive = tuning.rules.cleanup_respawn_max_alive;

        assert!(scheduler.tick_cleanup(&tuning, max_alive, &mut guards, 1.0, &mut rng).is_none());
        let mut spawned = 0;
        for _ in 0..100 {
            if let Some(SpawnRequest::Enemy(spec)) = scheduler.tick_cleanup(&tuning, 0, &mut guards, 2.0, &mut rng) {
                assert_eq!(spec.ai, AiMode::Circle);
                assert_eq!(spec.kind, EnemyKind::Respawned);
                spawned += 1;
            }
        }
        assert_eq!(spawned, tuning.rules.cleanup_respawn_budget);
    }

    #[test]
    fn test_edge_positions_are_offscreen() {
        let arena = Tuning::default().arena;
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let p = edge_position(&arena, &mut rng);
            let inside = p.x > 0.0 && p.x < arena.width && p.y > 0.0 && p.y < arena.height;
            assert!(!inside, "{p:?} is inside the arena");
        }
    }

    #[test]
    fn test_build_enemy_applies_type_and_wave_scaling() {
        let tuning = Tuning::default();
        let tank = build_enemy(1, &EnemySpawn::new(EnemyKind::Tank, Vec2::ZERO), &tuning, 6);
        assert!((tank.max_hp - 80.0 * 3.0 * 2.5).abs() < 1e-3);
        assert!((tank.speed - 120.0 * 0.5 * 1.2).abs() < 1e-3);

        let summoner = build_enemy(2, &EnemySpawn::new(EnemyKind::Summoner, Vec2::ZERO), &tuning, 9);
        assert_eq!(summoner.summon_on_death, 2);
        let kamikaze = build_enemy(3, &EnemySpawn::new(EnemyKind::Kamikaze, Vec2::ZERO), &tuning, 12);
        assert_eq!(kamikaze.contact_explosion, Some(20.0));
    }

    proptest! {
        #[test]
        fn prop_single_boss_wave_issues_one_request(polls in 1usize..50, seed in any::<u64>()) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut scheduler = SpawnScheduler::new();
            let mut guards = SpawnGuards::default();
            let c = ctx(&tuning, 15, 0, 0.0);
            let bosses: usize = (0..polls)
                .map(|_| scheduler.tick(&c, &mut guards, 0.0, &mut rng).iter().filter(|r| r.is_boss()).count())
                .sum();
            prop_assert_eq!(bosses, 1);
        }
    }
}
