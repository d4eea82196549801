//! Game state and core simulation types
//!
//! Everything one run owns lives in `GameState`. Entity collections are kept
//! sorted by id so every pass iterates in the same order.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::boss::BossBrain;
use super::random_event::ActiveEvent;
use super::spawn::{self, SpawnGuards, SpawnRequest, SpawnScheduler};
use super::wave::Wave;
use crate::audio::SoundEffect;
use crate::fx::{EffectKind, EffectParams};
use crate::tuning::{EnemyKind, Tuning, TuningError};

pub type EntityId = u32;

/// Enemy movement behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMode {
    Chase,
    Wander,
    /// Head off the top of the playfield
    Retreat,
    /// Orbit the player
    Circle,
}

/// A regular enemy, minion, or boss
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub base_damage: f32,
    /// Contact damage after boss berserk scaling
    pub damage: f32,
    pub base_speed: f32,
    /// Movement speed before slow and event modifiers
    pub speed: f32,
    pub is_frozen: bool,
    pub freeze_timer: f32,
    pub is_slowed: bool,
    pub slow_timer: f32,
    pub slow_ratio: f32,
    /// Cosmetic: currently touching the player
    pub is_burning: bool,
    pub ai: AiMode,
    pub wander_dir: Vec2,
    pub wander_timer: f32,
    pub orbit_angle: f32,
    pub coin_multiplier: f32,
    /// Set once when the kill is accounted
    pub kill_counted: bool,
    /// Left the playfield while retreating
    pub escaped: bool,
    /// Removed without a kill (minions of a dead boss)
    pub despawned: bool,
    /// Boss that summoned this minion
    pub owner: Option<EntityId>,
    pub counts_for_wave: bool,
    /// Seconds until the next contact attack is allowed
    pub attack_cooldown: f32,
    pub summon_on_death: u32,
    pub contact_explosion: Option<f32>,
    pub boss: Option<BossBrain>,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, radius: f32, hp: f32, speed: f32, damage: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius,
            hp,
            max_hp: hp,
            base_damage: damage,
            damage,
            base_speed: speed,
            speed,
            is_frozen: false,
            freeze_timer: 0.0,
            is_slowed: false,
            slow_timer: 0.0,
            slow_ratio: 1.0,
            is_burning: false,
            ai: AiMode::Chase,
            wander_dir: Vec2::ZERO,
            wander_timer: 0.0,
            orbit_angle: 0.0,
            coin_multiplier: 1.0,
            kill_counted: false,
            escaped: false,
            despawned: false,
            owner: None,
            counts_for_wave: true,
            attack_cooldown: 0.0,
            summon_on_death: 0,
            contact_explosion: None,
            boss: None,
        }
    }

    /// Still on the field and fighting
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0 && !self.escaped && !self.despawned
    }

    /// Died in combat (as opposed to escaping or despawning)
    #[inline]
    pub fn is_killed(&self) -> bool {
        self.hp <= 0.0 && !self.escaped && !self.despawned
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        }
    }

    /// Movement speed with the current slow applied
    pub fn effective_speed(&self) -> f32 {
        if self.is_slowed {
            self.speed * self.slow_ratio
        } else {
            self.speed
        }
    }
}

/// Player bullet
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub piercing: bool,
    /// Enemies already hit by this projectile
    pub hit_enemies: BTreeSet<EntityId>,
    pub alive: bool,
}

/// Boss burn projectile aimed at the player
#[derive(Debug, Clone)]
pub struct Hazard {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Remaining lifetime in seconds
    pub ttl: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Coin,
    Heal,
}

#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub collected: bool,
}

/// Damage-over-time zone left behind by a static-field kill
#[derive(Debug, Clone, PartialEq)]
pub struct StaticField {
    pub id: EntityId,
    pub pos: Vec2,
    pub radius: f32,
    pub remaining: f32,
    pub damage_per_sec: f32,
    pub tick_interval: f32,
    pub accumulator: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecuteSkill {
    /// HP ratio at or below which a hit kills outright
    pub threshold: f32,
}

impl Default for ExecuteSkill {
    fn default() -> Self {
        Self { threshold: 0.15 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrostSkill {
    /// Speed multiplier while slowed
    pub slow_ratio: f32,
    /// Chance per hit to freeze outright (0 disables)
    pub deep_freeze_chance: f32,
}

impl Default for FrostSkill {
    fn default() -> Self {
        Self {
            slow_ratio: 0.5,
            deep_freeze_chance: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightningSkill {
    pub chain_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExplosiveSkill {
    /// Extra visual on each enemy the explosion kills
    pub chain_explosion: bool,
}

/// Skills the player has acquired
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSet {
    pub execute: Option<ExecuteSkill>,
    pub frost: Option<FrostSkill>,
    pub lightning: Option<LightningSkill>,
    pub explosive: Option<ExplosiveSkill>,
    pub static_field: bool,
    pub piercing: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub skills: SkillSet,
    /// Seconds until the next shot
    pub fire_timer: f32,
}

impl Player {
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

/// Run-wide totals shared with the host
#[derive(Debug, Clone, Default)]
pub struct GameRecord {
    /// Credits from wave clears
    pub score: u64,
    pub coins: u64,
    pub kill_count: u64,
    pub current_wave: u32,
    pub last_wave_credits: u64,
    pub active_event: Option<ActiveEvent>,
    /// One-shot flags reset at every wave start
    pub guards: SpawnGuards,
}

/// Presentation event queued during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundEffect),
    Effect {
        kind: EffectKind,
        pos: Vec2,
        params: EffectParams,
    },
}

/// Queue a sound
pub fn push_sound(events: &mut Vec<GameEvent>, sound: SoundEffect) {
    events.push(GameEvent::Sound(sound));
}

/// Queue a visual effect
pub fn push_effect(events: &mut Vec<GameEvent>, kind: EffectKind, pos: Vec2, params: EffectParams) {
    events.push(GameEvent::Effect { kind, pos, params });
}

/// A spawn request waiting out its delay
#[derive(Debug, Clone)]
pub struct PendingSpawn {
    pub request: SpawnRequest,
    pub remaining: f32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulated seconds (after time scaling)
    pub time: f32,
    pub time_ticks: u64,
    pub player: Player,
    /// Sorted by id
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub hazards: Vec<Hazard>,
    pub pickups: Vec<Pickup>,
    pub static_fields: Vec<StaticField>,
    pub pending_spawns: Vec<PendingSpawn>,
    pub wave: Wave,
    pub record: GameRecord,
    pub scheduler: SpawnScheduler,
    /// Presentation events from the last committed tick
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Create a new run in wave 1's preparation phase
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;

        let player = Player {
            pos: Vec2::new(tuning.arena.width * 0.5, tuning.arena.height * 0.5),
            radius: tuning.player.radius,
            hp: tuning.player.max_hp,
            max_hp: tuning.player.max_hp,
            skills: SkillSet::default(),
            fire_timer: 0.0,
        };

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            time: 0.0,
            time_ticks: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            hazards: Vec::new(),
            pickups: Vec::new(),
            static_fields: Vec::new(),
            pending_spawns: Vec::new(),
            wave: Wave::new(1),
            record: GameRecord {
                current_wave: 1,
                ..GameRecord::default()
            },
            scheduler: SpawnScheduler::new(),
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Materialize a spawn request, or park it if it carries a delay
    pub fn spawn(&mut self, request: SpawnRequest) -> Option<EntityId> {
        let delay = request.delay();
        if delay > 0.0 {
            self.pending_spawns.push(PendingSpawn {
                request: request.without_delay(),
                remaining: delay,
            });
            return None;
        }

        let id = self.next_entity_id();
        let enemy = match &request {
            SpawnRequest::Enemy(spec) => spawn::build_enemy(id, spec, &self.tuning, self.wave.number),
            SpawnRequest::Boss(spec) => {
                log::info!("Boss '{}' enters wave {}", spec.name, spec.wave);
                push_sound(&mut self.events, SoundEffect::BossSpawn);
                spawn::build_boss(id, spec, &self.tuning)
            }
        };
        log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", enemy.kind, id, enemy.pos.x, enemy.pos.y);
        push_effect(
            &mut self.events,
            EffectKind::SpawnPortal,
            enemy.pos,
            EffectParams::radius(enemy.radius),
        );
        self.enemies.push(enemy);
        Some(id)
    }

    /// Advance delayed spawns and materialize the ones that are due
    pub fn advance_pending_spawns(&mut self, dt: f32) {
        if self.pending_spawns.is_empty() {
            return;
        }
        let mut due = Vec::new();
        self.pending_spawns.retain_mut(|pending| {
            pending.remaining -= dt;
            if pending.remaining <= 0.0 {
                due.push(pending.request.clone());
                false
            } else {
                true
            }
        });
        for request in due {
            self.spawn(request);
        }
    }

    pub fn spawn_pickup(&mut self, kind: PickupKind, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        self.pickups.push(Pickup {
            id,
            kind,
            pos,
            collected: false,
        });
        id
    }

    /// Fire a bullet from the player toward `aim`
    pub fn fire_projectile(&mut self, aim: Vec2) -> Option<EntityId> {
        let dir = (aim - self.player.pos).normalize_or_zero();
        if dir == Vec2::ZERO {
            return None;
        }
        let id = self.next_entity_id();
        let bullet = &self.tuning.player;
        self.projectiles.push(Projectile {
            id,
            pos: self.player.pos,
            vel: dir * bullet.bullet_speed,
            radius: bullet.bullet_radius,
            damage: bullet.bullet_damage,
            piercing: self.player.skills.piercing,
            hit_enemies: BTreeSet::new(),
            alive: true,
        });
        Some(id)
    }

    pub fn alive_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    pub fn enemy_index(&self, id: EntityId) -> Option<usize> {
        self.enemies.binary_search_by_key(&id, |e| e.id).ok()
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.hazards.sort_by_key(|h| h.id);
        self.pickups.sort_by_key(|p| p.id);
        self.static_fields.sort_by_key(|f| f.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::EnemySpawn;
    use crate::sim::wave::WavePhase;

    #[test]
    fn test_new_state_starts_in_prepare() {
        let state = GameState::new(7, Tuning::default()).unwrap();
        assert_eq!(state.wave.number, 1);
        assert_eq!(state.wave.phase, WavePhase::Prepare);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_new_state_rejects_missing_first_wave() {
        let mut tuning = Tuning::default();
        tuning.waves.remove(&1);
        assert!(matches!(
            GameState::new(7, tuning),
            Err(TuningError::MissingFirstWave)
        ));
    }

    #[test]
    fn test_entity_ids_are_unique_and_increasing() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_delayed_spawn_waits_in_queue() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        let request = SpawnRequest::Enemy(EnemySpawn {
            delay: 0.5,
            ..EnemySpawn::new(EnemyKind::Normal, Vec2::new(10.0, 10.0))
        });
        assert_eq!(state.spawn(request), None);
        assert_eq!(state.pending_spawns.len(), 1);

        state.advance_pending_spawns(0.25);
        assert!(state.enemies.is_empty());
        state.advance_pending_spawns(0.25);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.pending_spawns.is_empty());
    }

    #[test]
    fn test_fire_projectile_needs_direction() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        let at_player = state.player.pos;
        assert_eq!(state.fire_projectile(at_player), None);
        let id = state.fire_projectile(at_player + Vec2::X);
        assert!(id.is_some());
        assert!(state.projectiles[0].vel.x > 0.0);
    }

    #[test]
    fn test_enemy_liveness_flags() {
        let mut enemy = Enemy::new(1, EnemyKind::Normal, Vec2::ZERO, 10.0, 50.0, 100.0, 10.0);
        assert!(enemy.is_alive());
        enemy.escaped = true;
        assert!(!enemy.is_alive());
        assert!(!enemy.is_killed());
        enemy.escaped = false;
        enemy.hp = 0.0;
        assert!(enemy.is_killed());
    }
}
