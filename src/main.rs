//! Wave Combat headless runner
//!
//! Plays a full seeded campaign with a simple autopilot and reports the
//! outcome. Usage: `wave-combat [seed] [tuning.json]`

use std::collections::BTreeMap;

use glam::Vec2;

use wave_combat::consts::*;
use wave_combat::hooks::{self, RecordingSink};
use wave_combat::sim::{
    ExplosiveSkill, GameState, LightningSkill, SkillSet, TickInput, WavePhase, tick,
};
use wave_combat::{Tuning, TuningError};

/// Hard stop for runs that never resolve (one hour of game time)
const MAX_TICKS: u64 = 60 * 60 * 60;

/// Runner holding the game and its frame accumulator
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    audio: RecordingSink,
    fx: RecordingSink,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        let mut state = GameState::new(seed, tuning)?;
        state.player.skills = SkillSet {
            lightning: Some(LightningSkill { chain_count: 2 }),
            explosive: Some(ExplosiveSkill::default()),
            piercing: true,
            ..SkillSet::default()
        };
        Ok(Self {
            state,
            accumulator: 0.0,
            input: TickInput::default(),
            audio: RecordingSink::default(),
            fx: RecordingSink::default(),
        })
    }

    /// Aim at the nearest living enemy and keep the run moving
    fn autopilot(&mut self) {
        let player = self.state.player.pos;
        self.input.aim = self
            .state
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .min_by(|a, b| a.pos.distance(player).total_cmp(&b.pos.distance(player)))
            .map(|e| e.pos);
        self.input.start_wave = self.state.wave.phase == WavePhase::Prepare;
        self.input.continue_run = self.state.wave.phase == WavePhase::BossClear;
        self.input.player_pos = Some(Vec2::new(
            self.state.tuning.arena.width * 0.5,
            self.state.tuning.arena.height * 0.75,
        ));
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.autopilot();
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        let events = self.state.drain_events();
        hooks::dispatch(events, &mut self.audio, &mut self.fx);
    }
}

fn load_tuning(path: Option<&str>) -> Result<Tuning, TuningError> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Tuning::from_json(&json)
        }
        None => Ok(Tuning::default()),
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match load_tuning(args.get(2).map(String::as_str)) {
        Ok(tuning) => tuning,
        Err(err) => {
            log::error!("Invalid tuning: {err}");
            std::process::exit(1);
        }
    };

    let mut game = match Game::new(seed, tuning) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Cannot start run: {err}");
            std::process::exit(1);
        }
    };
    log::info!("Wave Combat headless run starting (seed {seed})");

    // 60 fps frames, one tick each
    while !game.state.wave.is_over() && game.state.time_ticks < MAX_TICKS {
        game.update(SIM_DT);
    }

    let record = &game.state.record;
    println!("Outcome:     {:?}", game.state.wave.phase);
    println!("Wave:        {}", game.state.wave.number);
    println!("Kills:       {}", record.kill_count);
    println!("Credits:     {}", record.score);
    println!("Coins:       {}", record.coins);
    println!("Player HP:   {:.0}/{:.0}", game.state.player.hp, game.state.player.max_hp);

    let mut sounds: BTreeMap<&str, usize> = BTreeMap::new();
    for name in &game.audio.sounds {
        *sounds.entry(name.as_str()).or_default() += 1;
    }
    for (name, count) in sounds {
        println!("  {name:<12} x{count}");
    }
    println!("Effects:     {}", game.fx.effects.len());
}
