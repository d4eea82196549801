//! Combat simulation module
//!
//! All gameplay logic lives here. This module must stay headless:
//! - Fixed timestep only
//! - One seeded RNG for every random decision
//! - Stable iteration order (by entity ID)
//! - No rendering, audio, or platform dependencies (events are queued instead)

pub mod boss;
pub mod collision;
pub mod damage;
pub mod movement;
pub mod random_event;
pub mod rewards;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod wave;

pub use boss::{BossBrain, BossPattern, PatternKind};
pub use collision::{CollisionEvent, circles_overlap};
pub use damage::{DamageContext, DamageReport, apply_damage};
pub use random_event::{ActiveEvent, Modifiers, RandomEvent};
pub use spawn::{BossSpawn, EnemySpawn, SpawnGuards, SpawnRequest, SpawnScheduler};
pub use state::{
    AiMode, Enemy, EntityId, ExecuteSkill, ExplosiveSkill, FrostSkill, GameEvent, GameRecord, GameState, Hazard,
    LightningSkill, Pickup, PickupKind, Player, Projectile, SkillSet, StaticField,
};
pub use tick::{TickInput, tick};
pub use wave::{Wave, WavePhase, advance_to_next_wave, check_wave_clear, continue_from_boss_clear, start_wave};
