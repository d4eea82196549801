//! Dispatch of committed tick events to the presentation hooks

use glam::Vec2;

use crate::audio::AudioSink;
use crate::fx::{EffectParams, EffectSink};
use crate::sim::GameEvent;

/// Forward a drained event batch to the audio and effect backends, in order
pub fn dispatch<I>(events: I, audio: &mut dyn AudioSink, fx: &mut dyn EffectSink)
where
    I: IntoIterator<Item = GameEvent>,
{
    for event in events {
        match event {
            GameEvent::Sound(sound) => audio.play_sfx(sound.as_str()),
            GameEvent::Effect { kind, pos, params } => fx.spawn_effect(kind.as_str(), pos, &params),
        }
    }
}

/// Sink that ignores everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play_sfx(&mut self, _name: &str) {}
}

impl EffectSink for NullSink {
    fn spawn_effect(&mut self, _kind: &str, _position: Vec2, _params: &EffectParams) {}
}

/// Sink that records every call, for assertions
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub sounds: Vec<String>,
    pub effects: Vec<(String, Vec2)>,
}

impl RecordingSink {
    pub fn played(&self, name: &str) -> usize {
        self.sounds.iter().filter(|s| s.as_str() == name).count()
    }

    pub fn spawned(&self, kind: &str) -> usize {
        self.effects.iter().filter(|(k, _)| k.as_str() == kind).count()
    }
}

impl AudioSink for RecordingSink {
    fn play_sfx(&mut self, name: &str) {
        self.sounds.push(name.to_string());
    }
}

impl EffectSink for RecordingSink {
    fn spawn_effect(&mut self, kind: &str, position: Vec2, _params: &EffectParams) {
        self.effects.push((kind.to_string(), position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::fx::EffectKind;

    #[test]
    fn test_dispatch_routes_by_event_type() {
        let events = vec![
            GameEvent::Sound(SoundEffect::EnemyHit),
            GameEvent::Effect {
                kind: EffectKind::Explosion,
                pos: Vec2::new(10.0, 20.0),
                params: EffectParams::radius(300.0),
            },
            GameEvent::Sound(SoundEffect::Explosion),
        ];
        let mut audio = RecordingSink::default();
        let mut fx = RecordingSink::default();
        dispatch(events, &mut audio, &mut fx);

        assert_eq!(audio.sounds, vec!["enemy_hit", "explosion"]);
        assert_eq!(fx.effects, vec![("explosion".to_string(), Vec2::new(10.0, 20.0))]);
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        dispatch(
            vec![GameEvent::Sound(SoundEffect::Victory)],
            &mut NullSink,
            &mut sink,
        );
    }
}
