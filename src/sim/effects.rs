//! Cosmetic effect requests emitted by the simulation
//!
//! The simulation never draws or shakes anything itself. It appends requests
//! here and the `fx` subsystem turns them into particles, markers and shake.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Semantic color identifiers, resolved to real colors by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSlot {
    Ball,
    Enemy,
    HealthPack,
    Death,
    Marker,
}

/// A single cosmetic request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Radial particle burst
    Burst {
        pos: Vec2,
        color: ColorSlot,
        count: u32,
        speed: f32,
    },
    /// Short-lived ring marking a contact point
    Marker { pos: Vec2 },
    /// Screen shake of `magnitude` pixels for `duration` seconds
    Shake { magnitude: f32, duration: f32 },
    /// "Wave N" banner shown during the slow-motion window
    WaveBanner { wave: u32, duration: f32 },
}

impl Effect {
    /// Burst + marker + shake used for every screen-edge bounce
    pub fn wall_hit(pos: Vec2, count: u32, speed: f32, shake: f32, duration: f32) -> [Effect; 3] {
        [
            Effect::Burst {
                pos,
                color: ColorSlot::Ball,
                count,
                speed,
            },
            Effect::Marker { pos },
            Effect::Shake {
                magnitude: shake,
                duration,
            },
        ]
    }
}
