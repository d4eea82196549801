//! Audio hooks
//!
//! The simulation never plays sound itself. It queues `SoundEffect`s and the
//! host forwards them by name to whatever backend implements `AudioSink`.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Bullet hits a regular enemy
    EnemyHit,
    /// Regular enemy dies
    EnemyDeath,
    /// Bullet hits a boss
    BossHit,
    /// Boss dies
    BossDeath,
    /// Boss enters the field
    BossSpawn,
    /// Player takes damage
    PlayerHit,
    /// Explosive rounds or kamikaze detonation
    Explosion,
    CoinPickup,
    HealPickup,
    /// Wave kill target reached
    WaveClear,
    /// Wave begins
    WaveStart,
    /// Final wave cleared
    Victory,
    /// Player died
    GameOver,
}

impl SoundEffect {
    /// Name handed to the audio backend
    pub fn as_str(self) -> &'static str {
        match self {
            SoundEffect::EnemyHit => "enemy_hit",
            SoundEffect::EnemyDeath => "enemy_death",
            SoundEffect::BossHit => "boss_hit",
            SoundEffect::BossDeath => "boss_death",
            SoundEffect::BossSpawn => "boss_spawn",
            SoundEffect::PlayerHit => "player_hit",
            SoundEffect::Explosion => "explosion",
            SoundEffect::CoinPickup => "coin_pickup",
            SoundEffect::HealPickup => "heal_pickup",
            SoundEffect::WaveClear => "wave_clear",
            SoundEffect::WaveStart => "wave_start",
            SoundEffect::Victory => "victory",
            SoundEffect::GameOver => "game_over",
        }
    }
}

/// Fire-and-forget audio backend
pub trait AudioSink {
    fn play_sfx(&mut self, name: &str);
}

/// Volume/mute gate in front of another sink
///
/// Sounds are dropped entirely while the effective volume is zero.
pub struct AudioMixer<S> {
    inner: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioMixer<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: AudioSink> AudioSink for AudioMixer<S> {
    fn play_sfx(&mut self, name: &str) {
        if self.effective_volume() <= 0.0 {
            return;
        }
        self.inner.play_sfx(name);
    }
}
