//! Fixed timestep simulation tick
//!
//! One call advances the whole combat core by `dt`. Presentation events are
//! queued on the state and only leave it through `GameState::drain_events`.

use glam::Vec2;

use super::boss::update_boss;
use super::collision::{self, CollisionEvent};
use super::damage::{self, DamageContext};
use super::movement::update_enemy;
use super::random_event::{self, Modifiers};
use super::rewards;
use super::spawn::SpawnContext;
use super::state::{EntityId, GameState, Hazard, push_effect, push_sound};
use super::wave::{self, TransitionInput, WavePhase};
use crate::audio::SoundEffect;
use crate::consts::PROJECTILE_CULL_MARGIN;
use crate::fx::{EffectKind, EffectParams};
use crate::tuning::EnemyKind;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Where the player is (host-driven movement)
    pub player_pos: Option<Vec2>,
    /// Aim point; the player fires whenever the weapon is ready
    pub aim: Option<Vec2>,
    /// Start the prepared wave now
    pub start_wave: bool,
    /// Leave the boss-clear checkpoint
    pub continue_run: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.wave.is_over() {
        return;
    }

    let mods = random_event::modifiers(state.record.active_event.as_ref(), &state.tuning.events);
    let dt = dt * mods.time_scale;
    state.time += dt;
    state.time_ticks += 1;

    let transitions = TransitionInput {
        start_wave: input.start_wave,
        continue_run: input.continue_run,
    };

    update_player(state, input, dt);

    if !state.wave.is_combat() {
        wave::poll_transitions(state, transitions, dt);
        state.normalize_order();
        return;
    }

    run_spawning(state, dt);
    move_entities(state, dt, &mods);
    resolve_collisions(state);

    damage::tick_static_fields(&mut state.static_fields, &mut state.enemies, dt);

    rewards::collect_pickups(
        &mut state.player,
        &mut state.pickups,
        &mut state.record,
        &state.tuning.rewards,
        &mut state.events,
    );

    let effects = random_event::update(&mut state.record.active_event, dt, &state.tuning.events);
    if effects.heal > 0.0 {
        state.player.heal(effects.heal);
    }
    wave::drop_treasure(state, effects.coin_drops);
    if let Some(ended) = effects.ended {
        log::info!("Random event ended: {}", ended.name());
    }

    wave::account_kills(state);
    wave::poll_transitions(state, transitions, dt);

    state.projectiles.retain(|p| p.alive);
    state.hazards.retain(|h| h.alive);
    state.normalize_order();
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(pos) = input.player_pos {
        let arena = &state.tuning.arena;
        state.player.pos = pos.clamp(Vec2::ZERO, Vec2::new(arena.width, arena.height));
    }

    state.player.fire_timer = (state.player.fire_timer - dt).max(0.0);
    if state.wave.phase != WavePhase::Running && state.wave.phase != WavePhase::Cleanup {
        return;
    }
    if let Some(aim) = input.aim {
        if state.player.fire_timer <= 0.0 && state.fire_projectile(aim).is_some() {
            state.player.fire_timer = state.tuning.player.fire_cooldown;
        }
    }
}

fn run_spawning(state: &mut GameState, dt: f32) {
    match state.wave.phase {
        WavePhase::Running => {
            let ctx = SpawnContext {
                tuning: &state.tuning,
                wave: state.wave.number,
                alive: state.alive_enemy_count(),
                elapsed: state.wave.elapsed(state.time),
            };
            let requests = state.scheduler.tick(&ctx, &mut state.record.guards, dt, &mut state.rng);
            for request in requests {
                state.spawn(request);
            }
        }
        WavePhase::Cleanup => {
            let alive_respawned = state
                .enemies
                .iter()
                .filter(|e| e.is_alive() && e.kind == EnemyKind::Respawned)
                .count();
            if let Some(request) =
                state
                    .scheduler
                    .tick_cleanup(&state.tuning, alive_respawned, &mut state.record.guards, dt, &mut state.rng)
            {
                state.spawn(request);
            }
        }
        _ => {}
    }
    state.advance_pending_spawns(dt);
}

fn move_entities(state: &mut GameState, dt: f32, mods: &Modifiers) {
    let player_pos = state.player.pos;
    let crowd: Vec<(EntityId, Vec2)> = state
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| (e.id, e.pos))
        .collect();
    let mut summons = Vec::new();
    let mut hazards = Vec::new();

    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        if enemy.is_boss() {
            let actions = update_boss(
                enemy,
                player_pos,
                dt,
                &state.tuning,
                &crowd,
                mods.enemy_speed,
                &mut state.rng,
            );
            if actions.phase_changed || actions.went_berserk {
                push_effect(
                    &mut state.events,
                    EffectKind::Shockwave,
                    enemy.pos,
                    EffectParams::radius(enemy.radius * 2.0),
                );
            }
            if !actions.hazards.is_empty() {
                push_effect(&mut state.events, EffectKind::BurnBurst, enemy.pos, EffectParams::default());
            }
            summons.extend(actions.summons);
            hazards.extend(actions.hazards);
        } else {
            update_enemy(
                enemy,
                player_pos,
                dt,
                &state.tuning.enemy,
                &state.tuning.arena,
                &crowd,
                mods.enemy_speed,
                &mut state.rng,
            );
        }
    }

    for request in summons {
        state.spawn(request);
    }
    for spawn in hazards {
        let id = state.next_entity_id();
        state.hazards.push(Hazard {
            id,
            pos: spawn.pos,
            vel: spawn.vel,
            radius: spawn.radius,
            damage: spawn.damage,
            ttl: spawn.ttl,
            alive: true,
        });
    }

    let arena = &state.tuning.arena;
    for projectile in state.projectiles.iter_mut().filter(|p| p.alive) {
        projectile.pos += projectile.vel * dt;
        if collision::out_of_bounds(projectile.pos, arena, PROJECTILE_CULL_MARGIN) {
            projectile.alive = false;
        }
    }
    for hazard in state.hazards.iter_mut().filter(|h| h.alive) {
        hazard.pos += hazard.vel * dt;
        hazard.ttl -= dt;
        if hazard.ttl <= 0.0 || collision::out_of_bounds(hazard.pos, arena, PROJECTILE_CULL_MARGIN) {
            hazard.alive = false;
        }
    }
}

fn resolve_collisions(state: &mut GameState) {
    let skills = state.player.skills.clone();
    let mut fields = Vec::new();

    // One projectile at a time, so later bullets see earlier kills
    for i in 0..state.projectiles.len() {
        let hits = collision::resolve_projectile(&mut state.projectiles[i], &state.enemies);
        for event in hits {
            let CollisionEvent::ProjectileHit { enemy, damage, .. } = event else {
                continue;
            };
            let Some(index) = state.enemy_index(enemy) else {
                continue;
            };
            let mut ctx = DamageContext {
                skills: &state.tuning.skills,
                rng: &mut state.rng,
                events: &mut state.events,
            };
            let report = damage::apply_damage(&mut ctx, &mut state.enemies, index, damage, Some(&skills));
            fields.extend(report.static_field);
        }
    }
    for mut field in fields {
        field.id = state.next_entity_id();
        state.static_fields.push(field);
    }

    let mut player_hits =
        collision::resolve_player_contacts(&state.player, &mut state.enemies, state.tuning.enemy.attack_cooldown);
    player_hits.extend(collision::resolve_hazards(&state.player, &mut state.hazards));

    for event in player_hits {
        match event {
            CollisionEvent::EnemyContact { damage, .. } | CollisionEvent::HazardHit { damage, .. } => {
                state.player.take_damage(damage);
                push_sound(&mut state.events, SoundEffect::PlayerHit);
            }
            CollisionEvent::ContactExplosion { enemy, damage } => {
                state.player.take_damage(damage);
                push_sound(&mut state.events, SoundEffect::Explosion);
                push_sound(&mut state.events, SoundEffect::PlayerHit);
                if let Some(index) = state.enemy_index(enemy) {
                    let pos = state.enemies[index].pos;
                    push_effect(&mut state.events, EffectKind::Explosion, pos, EffectParams::default());
                }
            }
            CollisionEvent::ProjectileHit { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::spawn::EnemySpawn;
    use crate::sim::spawn::SpawnRequest;
    use crate::sim::state::Projectile;
    use crate::tuning::Tuning;
    use std::collections::BTreeSet;

    fn quiet_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.events.chance_per_wave = 0.0;
        tuning
    }

    /// Running wave 1 with no scheduled spawns
    fn empty_arena(seed: u64) -> GameState {
        let mut state = GameState::new(seed, quiet_tuning()).unwrap();
        wave::start_wave(&mut state);
        state.scheduler.halt();
        state
    }

    fn parked_enemy(state: &mut GameState, pos: Vec2, hp: f32) -> EntityId {
        let id = state
            .spawn(SpawnRequest::Enemy(EnemySpawn {
                max_hp: Some(hp),
                ..EnemySpawn::new(EnemyKind::Normal, pos)
            }))
            .unwrap();
        let index = state.enemy_index(id).unwrap();
        state.enemies[index].speed = 0.0;
        id
    }

    fn parked_bullet(state: &mut GameState, pos: Vec2, damage: f32) {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: 6.0,
            damage,
            piercing: false,
            hit_enemies: BTreeSet::new(),
            alive: true,
        });
    }

    #[test]
    fn test_tick_prepare_to_running() {
        let mut state = GameState::new(12345, quiet_tuning()).unwrap();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.wave.phase, WavePhase::Prepare);

        let input = TickInput {
            start_wave: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.wave.phase, WavePhase::Running);
    }

    #[test]
    fn test_tick_stops_after_defeat() {
        let mut state = GameState::new(1, quiet_tuning()).unwrap();
        state.wave.phase = WavePhase::Defeat;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_bullet_kills_enemy_and_drops_coins() {
        let mut state = GameState::new(5, quiet_tuning()).unwrap();
        wave::start_wave(&mut state);
        state.scheduler.halt();
        let target = state.player.pos + Vec2::new(200.0, 0.0);
        state.spawn(SpawnRequest::Enemy(EnemySpawn {
            max_hp: Some(30.0),
            ..EnemySpawn::new(EnemyKind::Normal, target)
        }));
        state.enemies[0].speed = 0.0;

        let input = TickInput {
            aim: Some(target),
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
            if state.record.kill_count > 0 {
                break;
            }
        }
        assert_eq!(state.record.kill_count, 1);
        assert_eq!(state.wave.current_kills, 1);
        assert!(state.enemies.is_empty());
        assert!(state.pickups.len() >= 5);
    }

    #[test]
    fn test_contact_damage_hits_player() {
        let mut state = GameState::new(5, quiet_tuning()).unwrap();
        wave::start_wave(&mut state);
        state.scheduler.halt();
        let pos = state.player.pos;
        state.spawn(SpawnRequest::Enemy(EnemySpawn::new(EnemyKind::Normal, pos)));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.player.hp < state.player.max_hp);
        let after_first = state.player.hp;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.hp, after_first);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, Tuning::default()).unwrap();
        let mut state2 = GameState::new(99999, Tuning::default()).unwrap();
        let input = TickInput {
            aim: Some(Vec2::new(640.0, 0.0)),
            start_wave: true,
            ..Default::default()
        };

        for _ in 0..600 {
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        assert_eq!(state1.record.kill_count, state2.record.kill_count);
        for (a, b) in state1.enemies.iter().zip(&state2.enemies) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn test_stacked_bullets_in_one_tick_count_one_kill() {
        let mut state = empty_arena(21);
        let pos = Vec2::new(300.0, 200.0);
        parked_enemy(&mut state, pos, 30.0);
        for _ in 0..4 {
            parked_bullet(&mut state, pos, 30.0);
        }

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.record.kill_count, 1);
        assert_eq!(state.wave.current_kills, 1);
        assert!(state.enemies.is_empty());
        // The first bullet kills; the rest find nothing alive to hit
        assert_eq!(state.projectiles.len(), 3);
    }

    #[test]
    fn test_bullet_skips_enemy_killed_earlier_in_tick() {
        let mut state = empty_arena(22);
        let first = parked_enemy(&mut state, Vec2::new(300.0, 200.0), 30.0);
        let second = parked_enemy(&mut state, Vec2::new(330.0, 200.0), 100.0);
        parked_bullet(&mut state, Vec2::new(315.0, 200.0), 30.0);
        parked_bullet(&mut state, Vec2::new(315.0, 200.0), 30.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemy_index(first).is_none());
        let index = state.enemy_index(second).unwrap();
        assert_eq!(state.enemies[index].hp, 70.0);
        assert!(state.projectiles.is_empty());
    }
}
