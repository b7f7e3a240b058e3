//! Simulation state and entity types
//!
//! Everything the simulation mutates lives in [`World`]. Components receive it
//! (or the parts they need) explicitly; there is no ambient game state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Effect;
use super::geometry::{Segment, Shape, compute_shape_points};
use crate::consts::*;
use crate::settings::Settings;

/// Play area in pixels, origin top-left, y pointing down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// The player's ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
}

impl Ball {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            health: BALL_MAX_HEALTH,
            max_health: BALL_MAX_HEALTH,
        }
    }

    /// Health in [0, 1] for the HUD bar
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Apply damage, never dropping below zero. Returns true if this killed the ball.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.health > 0.0;
        self.health = (self.health - amount).max(0.0);
        was_alive && self.health <= 0.0
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// The tiltable ground segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub center: Vec2,
    pub length: f32,
    /// Radians, positive tilts the right end down
    pub angle: f32,
    pub thickness: f32,
    pub elevation_speed: f32,
    pub angle_speed: f32,
}

impl Ground {
    pub fn new(arena: &Arena, thickness: f32) -> Self {
        Self {
            center: Vec2::new(arena.width * 0.5, arena.height * GROUND_REST_Y),
            length: arena.width * GROUND_LENGTH_FACTOR,
            angle: 0.0,
            thickness,
            elevation_speed: GROUND_ELEVATION_SPEED,
            angle_speed: GROUND_ANGLE_SPEED,
        }
    }

    /// Endpoints of the centerline
    pub fn endpoints(&self) -> (Vec2, Vec2) {
        let half = Vec2::from_angle(self.angle) * (self.length / 2.0);
        (self.center - half, self.center + half)
    }

    /// The ground as a thick segment for collision
    pub fn segment(&self) -> Segment {
        let (a, b) = self.endpoints();
        Segment::new(a, b).with_thickness(self.thickness)
    }

    /// Keep angle and elevation inside their allowed ranges
    pub fn clamp(&mut self, arena: &Arena) {
        self.angle = self.angle.clamp(-GROUND_MAX_ANGLE, GROUND_MAX_ANGLE);
        self.center.y = self
            .center
            .y
            .clamp(arena.height * GROUND_MIN_Y, arena.height * GROUND_MAX_Y);
    }
}

/// Sinusoidal bob parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wobble {
    /// Radians per second
    pub freq: f32,
    /// Pixels
    pub magnitude: f32,
    /// Radians
    pub phase: f32,
}

impl Wobble {
    /// Vertical offset at real time `clock`
    #[inline]
    pub fn offset(&self, clock: f64) -> f32 {
        ((clock * self.freq as f64) as f32 + self.phase).sin() * self.magnitude
    }
}

/// A moving enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Collided/rendered position (y includes the bob)
    pub pos: Vec2,
    /// Vertical position before the bob is added
    pub base_y: f32,
    pub size: f32,
    pub shape: Shape,
    pub rotation: f32,
    pub rot_speed: f32,
    pub vel: Vec2,
    pub vel_target: Vec2,
    pub wobble: Wobble,
    /// Clock time of the last steering change
    pub last_change: f64,
    /// Seconds between steering changes
    pub change_interval: f64,
    /// Point the obstacle is steering toward
    pub target: Vec2,
    /// Fraction of the global obstacle speed used when steering
    pub speed_fraction: f32,
    /// Extra factor on the vertical steering component
    pub vertical_damping: f32,
    /// World-space outline, empty for circles
    pub points: Vec<Vec2>,
}

impl Obstacle {
    /// Radius used for circle tests and obstacle-obstacle contacts
    pub fn collision_radius(&self) -> f32 {
        self.size * OBSTACLE_RADIUS_FACTOR
    }

    /// Rebuild the cached outline from shape, position and rotation
    pub fn refresh_points(&mut self) {
        match compute_shape_points(self.shape, self.pos, self.size, self.rotation) {
            Some(points) => self.points = points,
            None => self.points.clear(),
        }
    }

    /// Move by `delta`, keeping the bob baseline and outline in step
    pub fn shift(&mut self, delta: Vec2) {
        self.pos += delta;
        self.base_y += delta.y;
        self.refresh_points();
    }
}

/// A floating health pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPack {
    pub id: u32,
    pub pos: Vec2,
    pub base_y: f32,
    pub radius: f32,
    pub vel: Vec2,
    pub wobble: Wobble,
    pub heal: f32,
}

/// Wave progression and spawn timers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveState {
    /// Current wave (1-based)
    pub wave: u32,
    /// Real seconds survived in this wave
    pub wave_time: f64,
    pub enemies_spawned: u32,
    /// Seconds between obstacle spawns
    pub spawn_interval: f64,
    /// Global obstacle cruise speed (pixels/s)
    pub obstacle_speed: f32,
    pub last_obstacle_spawn: f64,
    /// Seconds between health pack rolls
    pub health_pack_interval: f64,
    pub last_health_pack_spawn: f64,
}

impl WaveState {
    /// Wave 1 with both spawn timers primed to fire on the first step
    pub fn new(clock: f64, health_pack_interval: f64) -> Self {
        Self {
            wave: 1,
            wave_time: 0.0,
            enemies_spawned: 0,
            spawn_interval: BASE_SPAWN_INTERVAL,
            obstacle_speed: BASE_OBSTACLE_SPEED,
            last_obstacle_spawn: clock - BASE_SPAWN_INTERVAL,
            health_pack_interval,
            last_health_pack_spawn: clock - health_pack_interval,
        }
    }

    /// Enemies this wave may spawn
    pub fn enemy_target(&self, enemies_base: i32) -> u32 {
        (enemies_base as i64 + self.wave as i64 - 1).max(1) as u32
    }
}

/// Temporary physics slow-down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowMotion {
    pub scale: f32,
    /// Clock time at which `scale` returns to 1
    pub until: Option<f64>,
}

impl Default for SlowMotion {
    fn default() -> Self {
        Self {
            scale: 1.0,
            until: None,
        }
    }
}

impl SlowMotion {
    pub fn trigger(&mut self, now: f64, scale: f32, duration: f64) {
        self.scale = scale;
        self.until = Some(now + duration);
    }

    /// Expire the window if its deadline has passed, returning the active scale
    pub fn refresh(&mut self, now: f64) -> f32 {
        if let Some(until) = self.until {
            if now > until {
                self.scale = 1.0;
                self.until = None;
            }
        }
        self.scale
    }
}

/// Whether the ball is still in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    Dead,
}

/// Read-only copy of the simulation for renderers and tests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub clock: f64,
    pub ball: Ball,
    pub ground: Ground,
    pub obstacles: Vec<Obstacle>,
    pub health_packs: Vec<HealthPack>,
    pub waves: WaveState,
    pub slow_motion: SlowMotion,
    pub life: LifeState,
    pub palette_hue: u16,
}

/// The complete simulation context
#[derive(Debug, Clone)]
pub struct World {
    pub arena: Arena,
    pub settings: Settings,
    /// Run seed; reset re-seeds the RNG from it
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Real seconds since the last reset (not slowed by slow motion)
    pub clock: f64,
    pub ball: Ball,
    pub ground: Ground,
    pub obstacles: Vec<Obstacle>,
    pub health_packs: Vec<HealthPack>,
    pub waves: WaveState,
    pub slow_motion: SlowMotion,
    pub life: LifeState,
    /// Base hue for the ground/ball palette, drawn at reset
    pub palette_hue: u16,
    /// Cosmetic requests produced since the last drain
    pub effects: Vec<Effect>,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64, settings: Settings, arena: Arena) -> Self {
        let settings = settings.clamped();
        let ground = Ground::new(&arena, settings.ground_thickness_px());
        let mut world = Self {
            arena,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock: 0.0,
            ball: Ball::new(Vec2::ZERO),
            ground,
            obstacles: Vec::new(),
            health_packs: Vec::new(),
            waves: WaveState::new(0.0, settings.health_pack_interval_sec as f64),
            slow_motion: SlowMotion::default(),
            life: LifeState::Alive,
            palette_hue: 0,
            effects: Vec::new(),
            next_id: 1,
            settings,
        };
        world.reset();
        world
    }

    /// Back to the start-of-game state, keeping seed and settings
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.clock = 0.0;
        self.ground = Ground::new(&self.arena, self.settings.ground_thickness_px());
        self.ball = Ball::new(self.ground.center + Vec2::new(-120.0, -100.0));
        self.obstacles.clear();
        self.health_packs.clear();
        self.waves = WaveState::new(self.clock, self.settings.health_pack_interval_sec as f64);
        self.slow_motion = SlowMotion::default();
        self.life = LifeState::Alive;
        self.effects.clear();
        self.next_id = 1;
        self.palette_hue = self.rng.random_range(0..360);
    }

    /// Swap settings in place, updating only the fields derived from them
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings.clamped();
        self.ground.thickness = self.settings.ground_thickness_px();
        self.waves.health_pack_interval = self.settings.health_pack_interval_sec as f64;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    /// Take all pending cosmetic requests
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// "Wave N · T.Ts" badge text
    pub fn wave_badge(&self) -> String {
        format!("Wave {} · {:.1}s", self.waves.wave, self.waves.wave_time)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            clock: self.clock,
            ball: self.ball.clone(),
            ground: self.ground.clone(),
            obstacles: self.obstacles.clone(),
            health_packs: self.health_packs.clone(),
            waves: self.waves.clone(),
            slow_motion: self.slow_motion,
            life: self.life,
            palette_hue: self.palette_hue,
        }
    }
}
