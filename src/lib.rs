//! Ground Control - tilt the ground, bounce the ball, survive the waves
//!
//! Core modules:
//! - `sim`: Simulation core (geometry, physics, collisions, spawning, waves)
//! - `fx`: Cosmetic effects driven by simulation effect requests
//! - `game`: Lifecycle and frame driver (start, pause, death reset)
//! - `settings`: Player-tunable options

pub mod fx;
pub mod game;
pub mod settings;
pub mod sim;

pub use game::{Action, Game, Phase, RenderView};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default play area size in pixels
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Largest frame delta the driver will integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward acceleration on the ball (pixels/s²)
    pub const GRAVITY: f32 = 1400.0;
    /// Bounce factor for walls and ground
    pub const RESTITUTION: f32 = 0.7;
    /// Tangential velocity kept on a ground contact
    pub const GROUND_FRICTION: f32 = 0.995;
    /// Horizontal velocity kept per step (rolling resistance)
    pub const ROLLING_DAMPING: f32 = 0.999;
    /// Horizontal velocity kept on a bottom-edge bounce
    pub const FLOOR_DAMPING: f32 = 0.98;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 18.0;
    pub const BALL_MAX_HEALTH: f32 = 100.0;

    /// Ground defaults (fractions of the arena)
    pub const GROUND_LENGTH_FACTOR: f32 = 1.8;
    pub const GROUND_REST_Y: f32 = 0.72;
    pub const GROUND_MIN_Y: f32 = 0.35;
    pub const GROUND_MAX_Y: f32 = 0.9;
    pub const GROUND_MAX_ANGLE: f32 = 1.0;
    pub const GROUND_ELEVATION_SPEED: f32 = 260.0;
    pub const GROUND_ANGLE_SPEED: f32 = std::f32::consts::PI * 0.6;

    /// Obstacle defaults
    pub const OBSTACLE_SIZE: f32 = 34.0;
    /// Collision radius of an obstacle as a fraction of its size
    pub const OBSTACLE_RADIUS_FACTOR: f32 = 0.9;
    /// Per-step blend toward the velocity target
    pub const OBSTACLE_VELOCITY_BLEND: f32 = 0.08;
    /// Obstacles beyond this horizontal margin are removed
    pub const OFFSCREEN_MARGIN: f32 = 200.0;
    pub const BALL_OBSTACLE_RESTITUTION: f32 = 0.78;
    pub const OBSTACLE_OBSTACLE_RESTITUTION: f32 = 0.72;

    /// Health pack defaults
    pub const HEALTH_PACK_RADIUS: f32 = 14.0;
    pub const HEALTH_PACK_HEAL: f32 = 28.0;
    pub const HEALTH_PACK_SPAWN_CHANCE: f64 = 0.9;
    pub const HEALTH_PACK_BOB: f32 = 8.0;
    pub const HEALTH_PACK_MARGIN: f32 = 12.0;

    /// Wave progression
    pub const WAVE_DURATION: f64 = 12.0;
    /// Slack on the wave timer so summed frame deltas reach the duration on time
    pub const WAVE_TIME_EPSILON: f64 = 1e-6;
    pub const BASE_SPAWN_INTERVAL: f64 = 1.4;
    pub const MIN_SPAWN_INTERVAL: f64 = 0.3;
    pub const SPAWN_INTERVAL_DECAY: f64 = 0.92;
    pub const BASE_OBSTACLE_SPEED: f32 = 220.0;
    pub const MAX_OBSTACLE_SPEED: f32 = 800.0;
    pub const OBSTACLE_SPEED_STEP: f32 = 18.0;

    /// Wave transition slow motion
    pub const SLOW_MO_SCALE: f32 = 0.52;
    pub const SLOW_MO_DURATION: f64 = 1.4;

    /// Delay between death and the automatic reset (seconds)
    pub const DEATH_RESET_DELAY: f64 = 0.7;

    /// Smallest distance used when normalizing a contact
    pub const CONTACT_EPSILON: f32 = 0.0001;
}
