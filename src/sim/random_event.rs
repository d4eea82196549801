//! Random wave events
//!
//! Rolled once at wave start on eligible waves. At most one event is active.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::tuning::EventTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomEvent {
    /// Faster enemies, double coins
    BloodMoon,
    /// Coins fall from the sky
    TreasureRain,
    /// Player regenerates
    HealingWinds,
    /// Simulation slows down
    BulletTime,
}

impl RandomEvent {
    pub const ALL: [RandomEvent; 4] = [
        RandomEvent::BloodMoon,
        RandomEvent::TreasureRain,
        RandomEvent::HealingWinds,
        RandomEvent::BulletTime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RandomEvent::BloodMoon => "Blood Moon",
            RandomEvent::TreasureRain => "Treasure Rain",
            RandomEvent::HealingWinds => "Healing Winds",
            RandomEvent::BulletTime => "Bullet Time",
        }
    }

    pub fn duration(self, tuning: &EventTuning) -> f32 {
        match self {
            RandomEvent::BloodMoon => tuning.blood_moon_duration,
            RandomEvent::TreasureRain => tuning.treasure_rain_duration,
            RandomEvent::HealingWinds => tuning.healing_winds_duration,
            RandomEvent::BulletTime => tuning.bullet_time_duration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEvent {
    pub kind: RandomEvent,
    pub remaining: f32,
    /// Treasure rain drop timer
    pub drop_timer: f32,
}

impl ActiveEvent {
    pub fn new(kind: RandomEvent, tuning: &EventTuning) -> Self {
        Self {
            kind,
            remaining: kind.duration(tuning),
            drop_timer: 0.0,
        }
    }
}

/// Multipliers the rest of the tick applies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifiers {
    pub enemy_speed: f32,
    pub coin_drop: f32,
    pub time_scale: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            enemy_speed: 1.0,
            coin_drop: 1.0,
            time_scale: 1.0,
        }
    }
}

pub fn modifiers(active: Option<&ActiveEvent>, tuning: &EventTuning) -> Modifiers {
    let mut mods = Modifiers::default();
    match active.map(|e| e.kind) {
        Some(RandomEvent::BloodMoon) => {
            mods.enemy_speed = tuning.blood_moon_speed_mult;
            mods.coin_drop = tuning.blood_moon_coin_mult;
        }
        Some(RandomEvent::BulletTime) => mods.time_scale = tuning.bullet_time_scale,
        _ => {}
    }
    mods
}

/// Roll for an event at wave start
pub fn try_trigger(wave: u32, is_boss_wave: bool, tuning: &EventTuning, rng: &mut Pcg32) -> Option<ActiveEvent> {
    if is_boss_wave || wave < tuning.min_wave {
        return None;
    }
    if !rng.random_bool(f64::from(tuning.chance_per_wave.clamp(0.0, 1.0))) {
        return None;
    }
    let kind = RandomEvent::ALL[rng.random_range(0..RandomEvent::ALL.len())];
    Some(ActiveEvent::new(kind, tuning))
}

/// Per-tick output of the active event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventEffects {
    pub heal: f32,
    /// Treasure coins to drop this tick
    pub coin_drops: u32,
    pub ended: Option<RandomEvent>,
}

/// Advance the active event, clearing it once its duration runs out
pub fn update(active: &mut Option<ActiveEvent>, dt: f32, tuning: &EventTuning) -> EventEffects {
    let mut effects = EventEffects::default();
    let Some(event) = active.as_mut() else {
        return effects;
    };

    let step = dt.min(event.remaining.max(0.0));
    match event.kind {
        RandomEvent::HealingWinds => effects.heal = tuning.healing_winds_hp_per_sec * step,
        RandomEvent::TreasureRain => {
            event.drop_timer += step;
            while tuning.treasure_rain_interval > 0.0 && event.drop_timer >= tuning.treasure_rain_interval {
                event.drop_timer -= tuning.treasure_rain_interval;
                effects.coin_drops += 1;
            }
        }
        RandomEvent::BloodMoon | RandomEvent::BulletTime => {}
    }

    event.remaining -= dt;
    if event.remaining <= 0.0 {
        effects.ended = Some(event.kind);
        *active = None;
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;

    #[test]
    fn test_no_events_on_boss_or_early_waves() {
        let mut tuning = Tuning::default().events;
        tuning.chance_per_wave = 1.0;
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(try_trigger(1, false, &tuning, &mut rng).is_none());
        assert!(try_trigger(5, true, &tuning, &mut rng).is_none());
        assert!(try_trigger(2, false, &tuning, &mut rng).is_some());
    }

    #[test]
    fn test_zero_chance_never_triggers() {
        let mut tuning = Tuning::default().events;
        tuning.chance_per_wave = 0.0;
        let mut rng = Pcg32::seed_from_u64(1);
        assert!((0..100).all(|_| try_trigger(3, false, &tuning, &mut rng).is_none()));
    }

    #[test]
    fn test_blood_moon_modifiers() {
        let tuning = Tuning::default().events;
        let event = ActiveEvent::new(RandomEvent::BloodMoon, &tuning);
        let mods = modifiers(Some(&event), &tuning);
        assert_eq!(mods.enemy_speed, 1.5);
        assert_eq!(mods.coin_drop, 2.0);
        assert_eq!(mods.time_scale, 1.0);
        assert_eq!(modifiers(None, &tuning), Modifiers::default());
    }

    #[test]
    fn test_treasure_rain_drops_on_interval_then_ends() {
        let tuning = Tuning::default().events;
        let mut active = Some(ActiveEvent::new(RandomEvent::TreasureRain, &tuning));
        let mut drops = 0;
        let mut ended = None;
        for _ in 0..100 {
            let effects = update(&mut active, 0.25, &tuning);
            drops += effects.coin_drops;
            if effects.ended.is_some() {
                ended = effects.ended;
                break;
            }
        }
        assert_eq!(ended, Some(RandomEvent::TreasureRain));
        assert!(active.is_none());
        assert_eq!(drops, 40);
    }

    #[test]
    fn test_healing_winds_heal_rate() {
        let tuning = Tuning::default().events;
        let mut active = Some(ActiveEvent::new(RandomEvent::HealingWinds, &tuning));
        let effects = update(&mut active, 0.5, &tuning);
        assert!((effects.heal - 1.0).abs() < 1e-6);
        assert!(active.is_some());
    }
}
