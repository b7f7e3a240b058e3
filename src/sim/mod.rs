//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Seeded RNG only, re-seeded on every reset
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering or platform dependencies; cosmetics leave as [`Effect`] requests

pub mod collision;
pub mod effects;
pub mod geometry;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::BallHit;
pub use effects::{ColorSlot, Effect};
pub use geometry::{CollisionResult, Segment, Shape};
pub use spawner::{spawn_collision_test, spawn_health_pack, spawn_obstacle, update_waves};
pub use state::{
    Arena, Ball, Ground, HealthPack, LifeState, Obstacle, SlowMotion, Snapshot, WaveState, Wobble, World,
};
pub use tick::{StepOutcome, TickInput, update};
