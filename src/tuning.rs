//! Data-driven game balance
//!
//! Every number the simulation consults lives here. Tables are read-only once
//! loaded; `Default` reproduces the shipped 20-wave campaign and
//! `Tuning::from_json` accepts the same shape as an override file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration problems that make a run impossible to start
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("wave scaling table is empty")]
    EmptyWaveTable,
    #[error("wave scaling table has no entry for wave 1")]
    MissingFirstWave,
    #[error("wave {wave} has an empty or zero-weight enemy distribution")]
    InvalidDistribution { wave: u32 },
    #[error("`{field}` must be greater than zero")]
    NonPositive { field: &'static str },
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read tuning: {0}")]
    Io(#[from] std::io::Error),
}

/// Regular enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Tank,
    Runner,
    Summoner,
    Shielded,
    Kamikaze,
    /// Red stragglers that circle the player during wave cleanup
    Respawned,
}

/// Per-archetype multipliers and abilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTypeTuning {
    pub hp_mult: f32,
    pub speed_mult: f32,
    pub damage_mult: f32,
    pub coin_mult: f32,
    pub size_mult: f32,
    /// Normal enemies spawned when this one is killed
    #[serde(default)]
    pub summon_on_death: u32,
    /// Damage dealt when touching the player; the enemy dies doing so
    #[serde(default)]
    pub contact_explosion: Option<f32>,
}

impl EnemyTypeTuning {
    const fn plain(hp_mult: f32, speed_mult: f32, damage_mult: f32, coin_mult: f32, size_mult: f32) -> Self {
        Self {
            hp_mult,
            speed_mult,
            damage_mult,
            coin_mult,
            size_mult,
            summon_on_death: 0,
            contact_explosion: None,
        }
    }
}

/// How a boss wave puts its bosses on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPolicy {
    /// Up to `count` bosses, one every `WaveRules::boss_sequential_delay` seconds
    Sequential { count: u32 },
    /// Exactly one boss, guarded by a per-wave flag
    Single,
}

/// Difficulty scaling and spawn configuration for one wave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveScaling {
    pub hp_mult: f32,
    pub speed_mult: f32,
    pub damage_mult: f32,
    /// Divides the base spawn interval (higher spawns faster)
    pub spawn_rate: f32,
    pub target_kills: u32,
    /// Probability a regular spawn chases rather than wanders
    pub chase_prob: f32,
    /// Maximum simultaneously alive enemies
    pub max_concurrent: usize,
    /// Weighted enemy-type table for regular spawns
    pub distribution: Vec<(EnemyKind, f32)>,
    /// Present on boss waves
    #[serde(default)]
    pub boss: Option<BossPolicy>,
}

/// Used only if the table is somehow empty at runtime (validation forbids it)
static FALLBACK_WAVE: WaveScaling = WaveScaling {
    hp_mult: 1.0,
    speed_mult: 1.0,
    damage_mult: 1.0,
    spawn_rate: 1.0,
    target_kills: 10,
    chase_prob: 1.0,
    max_concurrent: 5,
    distribution: Vec::new(),
    boss: None,
};

/// Playfield bounds (origin top-left, y grows downward)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
    /// Distance outside the edge where regular enemies appear
    pub spawn_padding: f32,
}

/// Baseline stats before type and wave multipliers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBaseTuning {
    pub base_hp: f32,
    pub base_speed: f32,
    pub base_damage: f32,
    pub radius: f32,
    /// Seconds between contact attacks on the player
    pub attack_cooldown: f32,
    pub wander_interval: f32,
    pub wander_speed_ratio: f32,
    pub retreat_speed_ratio: f32,
    pub circle_orbit_radius: f32,
    pub circle_orbit_speed: f32,
    #[serde(default)]
    pub steering: SteeringTuning,
}

/// Crowd behaviour for chasers: flank slots around the player and
/// separation from nearby enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteeringTuning {
    pub flank_enabled: bool,
    /// Chasers closer than this bend toward their own slot on a ring of this radius
    pub flank_distance: f32,
    pub flank_weight: f32,
    pub separation_radius: f32,
    pub separation_strength: f32,
    /// Bosses push harder and from further away
    pub boss_separation_radius_mult: f32,
    pub boss_separation_strength_mult: f32,
}

impl Default for SteeringTuning {
    fn default() -> Self {
        Self {
            flank_enabled: true,
            flank_distance: 200.0,
            flank_weight: 0.5,
            separation_radius: 100.0,
            separation_strength: 1.2,
            boss_separation_radius_mult: 3.0,
            boss_separation_strength_mult: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub max_hp: f32,
    pub radius: f32,
    pub bullet_damage: f32,
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub fire_cooldown: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BerserkTuning {
    pub hp_threshold: f32,
    pub speed_mult: f32,
    pub damage_mult: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleStrafeTuning {
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub duration: f32,
    pub cooldown: f32,
    pub chance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeTuning {
    pub speed_mult: f32,
    pub duration: f32,
    pub cooldown: f32,
    pub chance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummonTuning {
    /// Minions per summon, keyed by boss wave
    pub counts: BTreeMap<u32, u32>,
    pub default_count: u32,
    pub cooldown: f32,
    pub chance: f32,
    /// Minion max HP as a fraction of the boss's max HP
    pub minion_hp_ratio: f32,
    /// Half-width of the square minions appear in around the boss
    pub spread: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnBurstTuning {
    pub projectile_count: u32,
    pub fire_interval: f32,
    pub projectile_speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub lifetime: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossTuning {
    /// HP ratios at or below which phase 1 and phase 2 begin
    pub phase_thresholds: [f32; 2],
    pub berserk: BerserkTuning,
    pub circle_strafe: CircleStrafeTuning,
    pub charge: ChargeTuning,
    pub summon: SummonTuning,
    pub burn_burst: BurnBurstTuning,
    pub size_mult: f32,
    pub coin_multiplier: f32,
    /// Display names keyed by boss wave
    pub names: BTreeMap<u32, String>,
}

impl BossTuning {
    pub fn name_for_wave(&self, wave: u32) -> String {
        self.names
            .get(&wave)
            .cloned()
            .unwrap_or_else(|| format!("Boss Wave {wave}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosiveTuning {
    pub radius: f32,
    pub damage_ratio: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightningTuning {
    pub chain_range: f32,
    pub damage_ratio: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticFieldTuning {
    pub radius: f32,
    pub duration: f32,
    pub damage_per_sec: f32,
    pub tick_interval: f32,
}

/// Elemental skill parameters shared by every player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillTuning {
    pub explosive: ExplosiveTuning,
    pub lightning: LightningTuning,
    pub static_field: StaticFieldTuning,
    /// Slow duration in seconds
    pub frost_duration: f32,
    /// Freeze duration in seconds
    pub deep_freeze_duration: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardTuning {
    pub base_coin_count: u32,
    pub coin_value: u64,
    pub heal_drop_chance: f32,
    pub heal_amount: f32,
    /// Credits granted on wave clear
    pub wave_clear_credits: BTreeMap<u32, u64>,
    pub default_wave_credits: u64,
    /// HP fraction of enemies spawned by a dying summoner
    pub summon_hp_ratio: f32,
    pub summon_spread: f32,
}

impl RewardTuning {
    pub fn credits_for_wave(&self, wave: u32) -> u64 {
        self.wave_clear_credits
            .get(&wave)
            .copied()
            .unwrap_or(self.default_wave_credits)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTuning {
    pub chance_per_wave: f32,
    pub min_wave: u32,
    pub blood_moon_duration: f32,
    pub blood_moon_speed_mult: f32,
    pub blood_moon_coin_mult: f32,
    pub treasure_rain_duration: f32,
    pub treasure_rain_interval: f32,
    pub healing_winds_duration: f32,
    pub healing_winds_hp_per_sec: f32,
    pub bullet_time_duration: f32,
    pub bullet_time_scale: f32,
}

/// Wave lifecycle rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveRules {
    pub final_wave: u32,
    /// Seconds between regular spawns at spawn rate 1.0
    pub base_spawn_interval: f32,
    pub boss_sequential_delay: f32,
    /// Seconds in Prepare before the wave starts by itself
    pub prepare_duration: f32,
    /// Enter Cleanup (survivors retreat) instead of advancing immediately
    pub cleanup_phase: bool,
    /// Respawned stragglers allowed per cleanup
    pub cleanup_respawn_budget: u32,
    pub cleanup_respawn_max_alive: usize,
    pub cleanup_respawn_interval: f32,
}

/// Complete balance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub enemy: EnemyBaseTuning,
    pub enemy_types: BTreeMap<EnemyKind, EnemyTypeTuning>,
    pub waves: BTreeMap<u32, WaveScaling>,
    pub bosses: BossTuning,
    pub skills: SkillTuning,
    pub rewards: RewardTuning,
    pub events: EventTuning,
    pub rules: WaveRules,
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the conditions that make a run impossible to start
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.waves.is_empty() {
            return Err(TuningError::EmptyWaveTable);
        }
        if !self.waves.contains_key(&1) {
            return Err(TuningError::MissingFirstWave);
        }
        for (&wave, scaling) in &self.waves {
            if scaling.spawn_rate <= 0.0 {
                return Err(TuningError::NonPositive {
                    field: "waves.spawn_rate",
                });
            }
            let total: f32 = scaling.distribution.iter().map(|(_, w)| w.max(0.0)).sum();
            if scaling.boss.is_none() && total <= 0.0 {
                return Err(TuningError::InvalidDistribution { wave });
            }
        }
        if self.rules.base_spawn_interval <= 0.0 {
            return Err(TuningError::NonPositive {
                field: "rules.base_spawn_interval",
            });
        }
        if self.enemy.base_hp <= 0.0 {
            return Err(TuningError::NonPositive {
                field: "enemy.base_hp",
            });
        }
        if self.skills.static_field.tick_interval <= 0.0 {
            return Err(TuningError::NonPositive {
                field: "skills.static_field.tick_interval",
            });
        }
        Ok(())
    }

    /// Scaling for a wave, reusing the last defined entry past the end of the table
    pub fn wave(&self, wave: u32) -> &WaveScaling {
        if let Some(scaling) = self.waves.get(&wave) {
            return scaling;
        }
        self.waves
            .range(..=wave)
            .next_back()
            .or_else(|| self.waves.iter().next())
            .map(|(_, scaling)| scaling)
            .unwrap_or(&FALLBACK_WAVE)
    }

    /// True when the wave has its own table entry
    pub fn is_defined(&self, wave: u32) -> bool {
        self.waves.contains_key(&wave)
    }

    pub fn is_boss_wave(&self, wave: u32) -> bool {
        self.wave(wave).boss.is_some()
    }

    pub fn enemy_type(&self, kind: EnemyKind) -> EnemyTypeTuning {
        self.enemy_types
            .get(&kind)
            .cloned()
            .unwrap_or(EnemyTypeTuning::plain(1.0, 1.0, 1.0, 1.0, 1.0))
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena: ArenaTuning {
                width: 1280.0,
                height: 720.0,
                spawn_padding: 50.0,
            },
            player: PlayerTuning {
                max_hp: 100.0,
                radius: 20.0,
                bullet_damage: 30.0,
                bullet_speed: 700.0,
                bullet_radius: 6.0,
                fire_cooldown: 0.3,
            },
            enemy: EnemyBaseTuning {
                base_hp: 80.0,
                base_speed: 120.0,
                base_damage: 10.0,
                radius: 24.0,
                attack_cooldown: 2.0,
                wander_interval: 2.0,
                wander_speed_ratio: 0.5,
                retreat_speed_ratio: 0.5,
                circle_orbit_radius: 80.0,
                circle_orbit_speed: 2.0,
                steering: SteeringTuning::default(),
            },
            enemy_types: default_enemy_types(),
            waves: default_waves(),
            bosses: BossTuning {
                phase_thresholds: [0.66, 0.33],
                berserk: BerserkTuning {
                    hp_threshold: 0.25,
                    speed_mult: 1.8,
                    damage_mult: 1.5,
                },
                circle_strafe: CircleStrafeTuning {
                    orbit_radius: 250.0,
                    orbit_speed: 1.5,
                    duration: 5.0,
                    cooldown: 10.0,
                    chance: 0.35,
                },
                charge: ChargeTuning {
                    speed_mult: 3.0,
                    duration: 1.5,
                    cooldown: 8.0,
                    chance: 0.4,
                },
                summon: SummonTuning {
                    counts: BTreeMap::from([(5, 2), (10, 3), (15, 4), (20, 5)]),
                    default_count: 2,
                    cooldown: 15.0,
                    chance: 0.3,
                    minion_hp_ratio: 0.15,
                    spread: 100.0,
                },
                burn_burst: BurnBurstTuning {
                    projectile_count: 8,
                    fire_interval: 5.0,
                    projectile_speed: 200.0,
                    damage: 15.0,
                    radius: 20.0,
                    lifetime: 5.0,
                },
                size_mult: 3.0,
                coin_multiplier: 1.0,
                names: BTreeMap::from([
                    (5, "The Swarm Queen".to_string()),
                    (10, "The Void Core".to_string()),
                    (15, "The Dark Commander".to_string()),
                    (20, "The Final Overlord".to_string()),
                ]),
            },
            skills: SkillTuning {
                explosive: ExplosiveTuning {
                    radius: 300.0,
                    damage_ratio: 0.5,
                },
                lightning: LightningTuning {
                    chain_range: 250.0,
                    damage_ratio: 0.7,
                },
                static_field: StaticFieldTuning {
                    radius: 180.0,
                    duration: 3.0,
                    damage_per_sec: 10.0,
                    tick_interval: 0.5,
                },
                frost_duration: 2.0,
                deep_freeze_duration: 1.5,
            },
            rewards: RewardTuning {
                base_coin_count: 5,
                coin_value: 1,
                heal_drop_chance: 0.1,
                heal_amount: 15.0,
                wave_clear_credits: BTreeMap::from([
                    (1, 150),
                    (2, 180),
                    (3, 220),
                    (4, 280),
                    (5, 800),
                    (6, 300),
                    (7, 350),
                    (8, 400),
                    (9, 500),
                    (10, 1200),
                    (11, 500),
                    (12, 600),
                    (13, 700),
                    (14, 800),
                    (15, 2000),
                    (16, 900),
                    (17, 1000),
                    (18, 1200),
                    (19, 1500),
                    (20, 3000),
                ]),
                default_wave_credits: 100,
                summon_hp_ratio: 0.3,
                summon_spread: 50.0,
            },
            events: EventTuning {
                chance_per_wave: 0.7,
                min_wave: 2,
                blood_moon_duration: 60.0,
                blood_moon_speed_mult: 1.5,
                blood_moon_coin_mult: 2.0,
                treasure_rain_duration: 20.0,
                treasure_rain_interval: 0.5,
                healing_winds_duration: 25.0,
                healing_winds_hp_per_sec: 2.0,
                bullet_time_duration: 15.0,
                bullet_time_scale: 0.6,
            },
            rules: WaveRules {
                final_wave: 20,
                base_spawn_interval: 1.5,
                boss_sequential_delay: 3.0,
                prepare_duration: 3.0,
                cleanup_phase: true,
                cleanup_respawn_budget: 5,
                cleanup_respawn_max_alive: 5,
                cleanup_respawn_interval: 1.5,
            },
        }
    }
}

fn default_enemy_types() -> BTreeMap<EnemyKind, EnemyTypeTuning> {
    BTreeMap::from([
        (EnemyKind::Normal, EnemyTypeTuning::plain(1.0, 1.0, 1.0, 1.0, 1.0)),
        (EnemyKind::Tank, EnemyTypeTuning::plain(3.0, 0.5, 1.5, 2.0, 1.3)),
        (EnemyKind::Runner, EnemyTypeTuning::plain(0.5, 2.0, 0.7, 1.5, 0.8)),
        (
            EnemyKind::Summoner,
            EnemyTypeTuning {
                summon_on_death: 2,
                ..EnemyTypeTuning::plain(1.2, 0.8, 0.8, 2.5, 1.1)
            },
        ),
        (EnemyKind::Shielded, EnemyTypeTuning::plain(1.5, 0.9, 1.0, 2.0, 1.0)),
        (
            EnemyKind::Kamikaze,
            EnemyTypeTuning {
                contact_explosion: Some(20.0),
                ..EnemyTypeTuning::plain(0.8, 1.5, 3.0, 1.5, 0.9)
            },
        ),
        (EnemyKind::Respawned, EnemyTypeTuning::plain(1.0, 1.0, 1.0, 1.5, 1.0)),
    ])
}

#[allow(clippy::too_many_arguments)]
fn wave_row(
    hp_mult: f32,
    speed_mult: f32,
    spawn_rate: f32,
    target_kills: u32,
    chase_prob: f32,
    damage_mult: f32,
    max_concurrent: usize,
    distribution: &[(EnemyKind, f32)],
    boss: Option<BossPolicy>,
) -> WaveScaling {
    WaveScaling {
        hp_mult,
        speed_mult,
        damage_mult,
        spawn_rate,
        target_kills,
        chase_prob,
        max_concurrent,
        distribution: distribution.to_vec(),
        boss,
    }
}

fn default_waves() -> BTreeMap<u32, WaveScaling> {
    use EnemyKind::*;

    let normal_only: &[(EnemyKind, f32)] = &[(Normal, 1.0)];
    let sequential = Some(BossPolicy::Sequential { count: 3 });
    let single = Some(BossPolicy::Single);

    BTreeMap::from([
        // Act 1
        (1, wave_row(1.0, 0.8, 0.8, 10, 0.3, 1.0, 5, normal_only, None)),
        (2, wave_row(1.3, 0.9, 1.0, 11, 0.4, 1.0, 7, normal_only, None)),
        (3, wave_row(1.6, 1.0, 1.1, 12, 0.5, 1.0, 10, normal_only, None)),
        (4, wave_row(2.0, 1.1, 1.2, 13, 0.6, 1.0, 12, normal_only, None)),
        (5, wave_row(50.0, 0.6, 1.0, 3, 1.0, 3.0, 4, normal_only, sequential)),
        // Act 2
        (6, wave_row(2.5, 1.2, 1.3, 14, 0.7, 1.0, 15, &[(Normal, 0.7), (Tank, 0.3)], None)),
        (
            7,
            wave_row(3.0, 1.3, 1.4, 15, 0.75, 1.0, 18, &[(Normal, 0.6), (Tank, 0.2), (Runner, 0.2)], None),
        ),
        (
            8,
            wave_row(4.0, 1.4, 1.5, 16, 0.8, 1.0, 20, &[(Normal, 0.5), (Tank, 0.25), (Runner, 0.25)], None),
        ),
        (
            9,
            wave_row(
                5.0,
                1.5,
                1.6,
                17,
                0.85,
                1.0,
                23,
                &[(Normal, 0.4), (Tank, 0.2), (Runner, 0.2), (Summoner, 0.2)],
                None,
            ),
        ),
        (10, wave_row(60.0, 1.8, 1.0, 1, 1.0, 2.5, 2, normal_only, single)),
        // Act 3
        (
            11,
            wave_row(
                6.5,
                1.6,
                1.7,
                18,
                0.85,
                1.2,
                25,
                &[(Normal, 0.3), (Tank, 0.2), (Runner, 0.2), (Summoner, 0.15), (Shielded, 0.15)],
                None,
            ),
        ),
        (
            12,
            wave_row(
                8.0,
                1.7,
                1.8,
                19,
                0.88,
                1.2,
                27,
                &[
                    (Normal, 0.25),
                    (Tank, 0.15),
                    (Runner, 0.2),
                    (Summoner, 0.15),
                    (Shielded, 0.15),
                    (Kamikaze, 0.1),
                ],
                None,
            ),
        ),
        (
            13,
            wave_row(
                10.0,
                1.8,
                1.9,
                20,
                0.9,
                1.3,
                30,
                &[
                    (Normal, 0.2),
                    (Tank, 0.15),
                    (Runner, 0.2),
                    (Summoner, 0.15),
                    (Shielded, 0.15),
                    (Kamikaze, 0.15),
                ],
                None,
            ),
        ),
        (
            14,
            wave_row(
                12.5,
                1.9,
                2.0,
                21,
                0.92,
                1.3,
                32,
                &[
                    (Normal, 0.15),
                    (Tank, 0.15),
                    (Runner, 0.2),
                    (Summoner, 0.2),
                    (Shielded, 0.15),
                    (Kamikaze, 0.15),
                ],
                None,
            ),
        ),
        (15, wave_row(90.0, 2.3, 1.5, 1, 1.0, 3.0, 3, normal_only, single)),
        // Act 4
        (
            16,
            wave_row(
                15.0,
                2.0,
                2.1,
                23,
                0.93,
                1.4,
                35,
                &[
                    (Normal, 0.1),
                    (Tank, 0.2),
                    (Runner, 0.2),
                    (Summoner, 0.2),
                    (Shielded, 0.15),
                    (Kamikaze, 0.15),
                ],
                None,
            ),
        ),
        (
            17,
            wave_row(
                18.0,
                2.1,
                2.2,
                25,
                0.95,
                1.5,
                38,
                &[
                    (Normal, 0.1),
                    (Tank, 0.2),
                    (Runner, 0.2),
                    (Summoner, 0.2),
                    (Shielded, 0.15),
                    (Kamikaze, 0.15),
                ],
                None,
            ),
        ),
        (
            18,
            wave_row(
                22.0,
                2.2,
                2.3,
                27,
                0.97,
                1.6,
                40,
                &[
                    (Normal, 0.05),
                    (Tank, 0.2),
                    (Runner, 0.2),
                    (Summoner, 0.2),
                    (Shielded, 0.2),
                    (Kamikaze, 0.15),
                ],
                None,
            ),
        ),
        (
            19,
            wave_row(
                27.0,
                2.3,
                2.4,
                30,
                0.98,
                1.7,
                45,
                &[
                    (Normal, 0.05),
                    (Tank, 0.15),
                    (Runner, 0.2),
                    (Summoner, 0.2),
                    (Shielded, 0.2),
                    (Kamikaze, 0.2),
                ],
                None,
            ),
        ),
        (20, wave_row(120.0, 2.5, 1.0, 1, 1.0, 3.5, 1, normal_only, single)),
    ])
}
