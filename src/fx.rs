//! Visual effect hooks

use glam::Vec2;

/// Visual effects the simulation asks the renderer for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Hit,
    BossHit,
    Explosion,
    /// Extra burst on each enemy killed by an explosion
    ChainExplosion,
    /// Bolt between two chain-lightning links
    Lightning,
    /// Boss phase change or berserk
    Shockwave,
    SpawnPortal,
    StaticField,
    Freeze,
    Execute,
    BurnBurst,
}

impl EffectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::Hit => "hit",
            EffectKind::BossHit => "boss_hit",
            EffectKind::Explosion => "explosion",
            EffectKind::ChainExplosion => "chain_explosion",
            EffectKind::Lightning => "lightning",
            EffectKind::Shockwave => "shockwave",
            EffectKind::SpawnPortal => "spawn_portal",
            EffectKind::StaticField => "static_field",
            EffectKind::Freeze => "freeze",
            EffectKind::Execute => "execute",
            EffectKind::BurnBurst => "burn_burst",
        }
    }
}

/// Optional effect parameters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectParams {
    pub radius: Option<f32>,
    /// Second endpoint for beam-style effects
    pub target: Option<Vec2>,
    pub duration: Option<f32>,
}

impl EffectParams {
    pub fn radius(radius: f32) -> Self {
        Self {
            radius: Some(radius),
            ..Self::default()
        }
    }

    pub fn beam(target: Vec2) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Fire-and-forget visual effect backend
pub trait EffectSink {
    fn spawn_effect(&mut self, kind: &str, position: Vec2, params: &EffectParams);
}
