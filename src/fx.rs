//! Cosmetic effects: particles, contact markers, screen shake and the wave banner
//!
//! Fed by [`Effect`] requests drained from the simulation. Nothing here feeds
//! back into gameplay, and it draws from its own RNG stream so cosmetics never
//! perturb a seeded run.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::{ColorSlot, Effect};

/// Maximum live particles
pub const MAX_PARTICLES: usize = 256;

/// Downward pull on particles (pixels/s²)
const PARTICLE_GRAVITY: f32 = 700.0;

/// Seconds a contact marker stays visible
const MARKER_LIFE: f32 = 0.6;

/// PCG stream id for cosmetics, distinct from the gameplay stream
const FX_STREAM: u64 = 0xf0f0;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ColorSlot,
    /// Total lifetime in seconds
    pub life: f32,
    pub age: f32,
    pub size: f32,
}

impl Particle {
    /// Opacity, fading linearly from 1 to 0 over the lifetime
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / self.life).clamp(0.0, 1.0)
    }
}

/// Expanding ring left where the ball hit something
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub pos: Vec2,
    pub age: f32,
    pub life: f32,
}

impl Marker {
    /// 0 when fresh, 1 when about to expire
    pub fn progress(&self) -> f32 {
        (self.age / self.life).clamp(0.0, 1.0)
    }
}

/// Active "Wave N" banner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub wave: u32,
    pub until: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shake {
    magnitude: f32,
    until: f64,
}

/// All cosmetic state, aged once per frame
#[derive(Debug, Clone)]
pub struct Cosmetics {
    rng: Pcg32,
    /// Real seconds seen by this subsystem
    clock: f64,
    pub particles: Vec<Particle>,
    pub markers: Vec<Marker>,
    pub banner: Option<Banner>,
    shake: Option<Shake>,
}

impl Cosmetics {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::new(seed, FX_STREAM),
            clock: 0.0,
            particles: Vec::new(),
            markers: Vec::new(),
            banner: None,
            shake: None,
        }
    }

    /// Turn pending requests into live effects
    pub fn consume(&mut self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            match effect {
                Effect::Burst {
                    pos,
                    color,
                    count,
                    speed,
                } => self.burst(pos, color, count, speed),
                Effect::Marker { pos } => self.markers.push(Marker {
                    pos,
                    age: 0.0,
                    life: MARKER_LIFE,
                }),
                Effect::Shake {
                    magnitude,
                    duration,
                } => {
                    // A stronger or longer shake replaces a weaker one
                    let until = self.clock + duration as f64;
                    let keep = self
                        .shake
                        .is_some_and(|s| s.until >= until && s.magnitude >= magnitude);
                    if !keep {
                        self.shake = Some(Shake { magnitude, until });
                    }
                }
                Effect::WaveBanner { wave, duration } => {
                    self.banner = Some(Banner {
                        wave,
                        until: self.clock + duration as f64,
                    });
                }
            }
        }
    }

    fn burst(&mut self, pos: Vec2, color: ColorSlot, count: u32, speed: f32) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                // Remove oldest particles to make room
                self.particles.remove(0);
            }
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let spd = speed * (0.6 + self.rng.random::<f32>() * 0.9);
            self.particles.push(Particle {
                pos,
                vel: Vec2::from_angle(angle) * spd,
                color,
                life: 0.45 + self.rng.random::<f32>() * 0.45,
                age: 0.0,
                size: 2.0 + self.rng.random::<f32>() * 3.0,
            });
        }
    }

    /// Age everything. Particles and markers run on physics time, so they slow
    /// down with the world; shake and banner expire on real time.
    pub fn update(&mut self, real_dt: f32, physics_dt: f32) {
        self.clock += real_dt as f64;

        for p in self.particles.iter_mut() {
            p.age += physics_dt;
            p.vel.y += PARTICLE_GRAVITY * physics_dt;
            p.pos += p.vel * physics_dt;
        }
        self.particles.retain(|p| p.age < p.life);

        for m in self.markers.iter_mut() {
            m.age += physics_dt;
        }
        self.markers.retain(|m| m.age < m.life);

        if self.shake.is_some_and(|s| self.clock >= s.until) {
            self.shake = None;
        }
        if self.banner.is_some_and(|b| self.clock >= b.until) {
            self.banner = None;
        }
    }

    /// Current shake amplitude in pixels (0 when idle)
    pub fn shake_magnitude(&self) -> f32 {
        self.shake.map_or(0.0, |s| s.magnitude)
    }

    /// Random screen offset within the current shake amplitude
    pub fn shake_offset(&mut self) -> Vec2 {
        let mag = self.shake_magnitude();
        if mag <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.rng.random_range(-1.0..=1.0) * mag,
            self.rng.random_range(-1.0..=1.0) * mag,
        )
    }

    /// Drop every live effect (used on reset)
    pub fn clear(&mut self) {
        self.particles.clear();
        self.markers.clear();
        self.banner = None;
        self.shake = None;
    }
}
