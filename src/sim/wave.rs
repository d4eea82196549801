//! Wave lifecycle
//!
//! `Prepare -> Running -> Cleanup -> {BossClear | next Prepare | Victory}`,
//! with `Defeat` reachable from any combat phase. Kills are accounted here
//! exactly once per enemy, and accounted enemies leave the registry in the
//! same pass.

use glam::Vec2;
use rand::Rng;

use super::random_event::{self, ActiveEvent};
use super::rewards;
use super::spawn::SpawnGuards;
use super::state::{AiMode, GameState, PickupKind, push_sound};
use crate::audio::SoundEffect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    /// Breather before the wave starts
    Prepare,
    /// Active combat
    Running,
    /// Kill target reached; survivors retreat
    Cleanup,
    /// Checkpoint after a boss wave
    BossClear,
    Victory,
    Defeat,
}

#[derive(Debug, Clone)]
pub struct Wave {
    pub number: u32,
    pub target_kills: u32,
    pub current_kills: u32,
    pub phase: WavePhase,
    /// Simulation time the wave started
    pub started_at: f32,
    /// Seconds spent in Prepare
    pub prepare_elapsed: f32,
}

impl Wave {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            target_kills: 0,
            current_kills: 0,
            phase: WavePhase::Prepare,
            started_at: 0.0,
            prepare_elapsed: 0.0,
        }
    }

    /// Running or Cleanup
    pub fn is_combat(&self) -> bool {
        matches!(self.phase, WavePhase::Running | WavePhase::Cleanup)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, WavePhase::Victory | WavePhase::Defeat)
    }

    pub fn elapsed(&self, now: f32) -> f32 {
        (now - self.started_at).max(0.0)
    }
}

/// Kill target reached
pub fn check_wave_clear(wave: &Wave) -> bool {
    wave.current_kills >= wave.target_kills
}

/// Begin the prepared wave. Returns false if the wave is not in Prepare.
pub fn start_wave(state: &mut GameState) -> bool {
    if state.wave.phase != WavePhase::Prepare {
        log::warn!("start_wave called in {:?}", state.wave.phase);
        return false;
    }
    let number = state.wave.number;
    if !state.tuning.is_defined(number) {
        log::warn!("No scaling entry for wave {number}, using the last defined entry");
    }
    let scaling = state.tuning.wave(number);
    let target_kills = scaling.target_kills;
    let is_boss_wave = scaling.boss.is_some();

    state.enemies.clear();
    state.projectiles.clear();
    state.hazards.clear();
    state.static_fields.clear();
    state.pending_spawns.clear();
    state.record.guards = SpawnGuards::default();
    state.scheduler.reset_for_wave();

    state.wave.current_kills = 0;
    state.wave.target_kills = target_kills;
    state.wave.started_at = state.time;
    state.wave.prepare_elapsed = 0.0;
    state.wave.phase = WavePhase::Running;
    state.record.current_wave = number;

    state.record.active_event = random_event::try_trigger(number, is_boss_wave, &state.tuning.events, &mut state.rng);
    if let Some(ActiveEvent { kind, .. }) = state.record.active_event {
        log::info!("Random event: {} on wave {number}", kind.name());
    }

    log::info!("Wave {number} started (target {target_kills} kills)");
    push_sound(&mut state.events, SoundEffect::WaveStart);
    true
}

/// Grant the wave-clear credits and move on. Returns the new phase.
pub fn advance_to_next_wave(state: &mut GameState) -> WavePhase {
    let number = state.wave.number;
    let credits = state.tuning.rewards.credits_for_wave(number);
    state.record.score += credits;
    state.record.last_wave_credits = credits;
    state.scheduler.halt();
    push_sound(&mut state.events, SoundEffect::WaveClear);

    if state.tuning.is_boss_wave(number) {
        log::info!("Boss wave {number} cleared (+{credits} credits)");
        state.wave.phase = WavePhase::BossClear;
    } else if number >= state.tuning.rules.final_wave {
        enter_victory(state);
    } else {
        log::info!("Wave {number} cleared (+{credits} credits)");
        prepare_wave(state, number + 1);
    }
    state.wave.phase
}

/// Leave the boss checkpoint
pub fn continue_from_boss_clear(state: &mut GameState) -> WavePhase {
    if state.wave.phase != WavePhase::BossClear {
        return state.wave.phase;
    }
    let number = state.wave.number;
    if number >= state.tuning.rules.final_wave {
        enter_victory(state);
    } else {
        prepare_wave(state, number + 1);
    }
    state.wave.phase
}

fn prepare_wave(state: &mut GameState, number: u32) {
    state.wave = Wave::new(number);
    state.record.current_wave = number;
}

fn enter_victory(state: &mut GameState) {
    log::info!("Victory after wave {}", state.wave.number);
    state.wave.phase = WavePhase::Victory;
    push_sound(&mut state.events, SoundEffect::Victory);
}

/// Send survivors away and clear the floor
pub fn enter_cleanup(state: &mut GameState) {
    state.scheduler.halt();
    state.wave.phase = WavePhase::Cleanup;
    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        enemy.ai = AiMode::Retreat;
    }
    state.pickups.clear();
    log::info!("Wave {} target reached, cleaning up", state.wave.number);
}

/// Per-pass accounting totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KillTally {
    pub kills: u32,
    pub escaped: u32,
    pub despawned: u32,
}

/// Count every newly dead enemy once, hand out rewards, and remove everything
/// that has left the fight
pub fn account_kills(state: &mut GameState) -> KillTally {
    let mut tally = KillTally::default();
    let mut drops = Vec::new();
    let mut summons = Vec::new();
    let mut dead_bosses = Vec::new();
    let coin_modifier = random_event::modifiers(state.record.active_event.as_ref(), &state.tuning.events).coin_drop;

    for enemy in state.enemies.iter_mut() {
        if enemy.escaped {
            tally.escaped += 1;
            continue;
        }
        if !enemy.is_killed() {
            continue;
        }
        debug_assert!(!enemy.kill_counted, "enemy {} counted twice", enemy.id);
        if enemy.kill_counted {
            continue;
        }
        enemy.kill_counted = true;

        state.record.kill_count += 1;
        if enemy.counts_for_wave {
            state.wave.current_kills += 1;
        }
        tally.kills += 1;

        if enemy.is_boss() {
            push_sound(&mut state.events, SoundEffect::BossDeath);
            dead_bosses.push(enemy.id);
        } else {
            push_sound(&mut state.events, SoundEffect::EnemyDeath);
        }
        drops.extend(rewards::on_enemy_killed(enemy, &state.tuning.rewards, coin_modifier, &mut state.rng));
        summons.extend(rewards::summon_on_death(enemy, &state.tuning, state.wave.number, &mut state.rng));
    }

    if !dead_bosses.is_empty() {
        for minion in state.enemies.iter_mut().filter(|e| e.is_alive()) {
            if minion.owner.is_some_and(|owner| dead_bosses.contains(&owner)) {
                minion.despawned = true;
                tally.despawned += 1;
            }
        }
    }

    state.enemies.retain(|e| e.is_alive());

    for drop in drops {
        state.spawn_pickup(drop.kind, drop.pos);
    }
    for request in summons {
        state.spawn(request);
    }
    tally
}

/// Drop treasure-rain coins at random points inside the arena
pub fn drop_treasure(state: &mut GameState, count: u32) {
    for _ in 0..count {
        let arena = &state.tuning.arena;
        let pos = Vec2::new(
            state.rng.random_range(0.0..=arena.width),
            state.rng.random_range(0.0..=arena.height),
        );
        state.spawn_pickup(PickupKind::Coin, pos);
    }
}

/// Caller requests that can move the wave forward
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionInput {
    pub start_wave: bool,
    pub continue_run: bool,
}

/// Apply whichever transition the current phase calls for
pub fn poll_transitions(state: &mut GameState, input: TransitionInput, dt: f32) {
    if state.wave.is_combat() && state.player.is_dead() {
        log::info!("Player died on wave {}", state.wave.number);
        state.wave.phase = WavePhase::Defeat;
        state.scheduler.halt();
        push_sound(&mut state.events, SoundEffect::GameOver);
        return;
    }

    match state.wave.phase {
        WavePhase::Prepare => {
            state.wave.prepare_elapsed += dt;
            if input.start_wave || state.wave.prepare_elapsed >= state.tuning.rules.prepare_duration {
                start_wave(state);
            }
        }
        WavePhase::Running => {
            if check_wave_clear(&state.wave) {
                state.scheduler.halt();
                if state.tuning.rules.cleanup_phase {
                    enter_cleanup(state);
                } else {
                    advance_to_next_wave(state);
                }
            }
        }
        WavePhase::Cleanup => {
            if state.alive_enemy_count() == 0 && state.pending_spawns.is_empty() {
                advance_to_next_wave(state);
            }
        }
        WavePhase::BossClear => {
            if input.continue_run {
                continue_from_boss_clear(state);
            }
        }
        WavePhase::Victory | WavePhase::Defeat => {}
    }
}
