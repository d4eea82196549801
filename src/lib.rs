//! Wave Combat - combat resolution and wave/boss orchestration core
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (collisions, damage, spawning, boss AI, wave state)
//! - `tuning`: Data-driven game balance
//! - `audio` / `fx`: Fire-and-forget presentation hooks
//! - `hooks`: Dispatch of committed tick events to the presentation hooks

pub mod audio;
pub mod fx;
pub mod hooks;
pub mod sim;
pub mod tuning;

pub use audio::{AudioSink, SoundEffect};
pub use fx::{EffectKind, EffectParams, EffectSink};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Simulation constants that are not balance data
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Pickup collection radius
    pub const PICKUP_RADIUS: f32 = 16.0;
    /// Distance at which a retreating enemy counts as having left the field
    pub const RETREAT_ARRIVAL_DISTANCE: f32 = 5.0;
    /// How far above the playfield retreating enemies head
    pub const RETREAT_MARGIN: f32 = 100.0;
    /// Projectiles are culled once this far outside the playfield
    pub const PROJECTILE_CULL_MARGIN: f32 = 50.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Move `pos` toward `target` by at most `step`, never overshooting
#[inline]
pub fn step_toward(pos: Vec2, target: Vec2, step: f32) -> Vec2 {
    let to_target = target - pos;
    let distance = to_target.length();
    if distance <= step || distance <= f32::EPSILON {
        target
    } else {
        pos + to_target / distance * step
    }
}
