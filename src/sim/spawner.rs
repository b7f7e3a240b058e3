//! Obstacle / health pack spawning and the wave state machine
//!
//! Waves advance on survival time alone. Each wave raises obstacle speed,
//! shortens the spawn interval and allows one more enemy.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::effects::Effect;
use super::geometry::Shape;
use super::state::{Arena, HealthPack, Obstacle, WaveState, Wobble, World};
use crate::consts::*;

/// Uniform sample in [0, 1)
#[inline]
pub(crate) fn unit(rng: &mut Pcg32) -> f32 {
    rng.random::<f32>()
}

/// Uniform sample in [-0.5, 0.5) scaled by `span`
#[inline]
pub(crate) fn centered(rng: &mut Pcg32, span: f32) -> f32 {
    (unit(rng) - 0.5) * span
}

impl WaveState {
    /// Add survival time. Returns true if the wave advanced (at most once per call).
    pub fn advance_time(&mut self, dt: f32, now: f64) -> bool {
        self.wave_time += dt as f64;
        if self.wave_time + WAVE_TIME_EPSILON >= WAVE_DURATION {
            self.next_wave(now);
            true
        } else {
            false
        }
    }

    /// Move to the next wave and tighten difficulty
    pub fn next_wave(&mut self, now: f64) {
        self.wave += 1;
        self.wave_time = 0.0;
        self.enemies_spawned = 0;
        self.obstacle_speed = (self.obstacle_speed + OBSTACLE_SPEED_STEP).min(MAX_OBSTACLE_SPEED);
        self.spawn_interval = (self.spawn_interval * SPAWN_INTERVAL_DECAY).max(MIN_SPAWN_INTERVAL);
        // First enemy of the new wave may appear immediately
        self.last_obstacle_spawn = now - self.spawn_interval;
    }

    /// Obstacle timer tick. Restarts the timer whenever the interval elapsed.
    pub fn obstacle_timer_elapsed(&mut self, now: f64) -> bool {
        if now - self.last_obstacle_spawn > self.spawn_interval {
            self.last_obstacle_spawn = now;
            true
        } else {
            false
        }
    }

    /// Health pack timer tick
    pub fn health_pack_timer_elapsed(&mut self, now: f64) -> bool {
        if now - self.last_health_pack_spawn > self.health_pack_interval {
            self.last_health_pack_spawn = now;
            true
        } else {
            false
        }
    }
}

/// Run spawn timers and the wave transition for one step
///
/// `dt` is real time; slow motion does not stretch a wave.
pub fn update_waves(world: &mut World, dt: f32) {
    let now = world.clock;

    if world.waves.obstacle_timer_elapsed(now) {
        let target = world.waves.enemy_target(world.settings.enemies_base);
        if world.waves.enemies_spawned < target {
            spawn_obstacle(world);
            world.waves.enemies_spawned += 1;
        }
    }

    if world.waves.advance_time(dt, now) {
        on_wave_start(world);
    }

    if world.waves.health_pack_timer_elapsed(now) && world.rng.random_bool(HEALTH_PACK_SPAWN_CHANCE) {
        spawn_health_pack(world);
    }
}

/// Side effects of a wave transition on the rest of the world
fn on_wave_start(world: &mut World) {
    let wave = world.waves.wave;
    log::info!(
        "Wave {}: speed={:.0}, spawn interval={:.2}s, enemies={}",
        wave,
        world.waves.obstacle_speed,
        world.waves.spawn_interval,
        world.waves.enemy_target(world.settings.enemies_base)
    );

    world.ball.health = world.ball.max_health;
    world
        .slow_motion
        .trigger(world.clock, SLOW_MO_SCALE, SLOW_MO_DURATION);
    world.effects.push(Effect::WaveBanner {
        wave,
        duration: SLOW_MO_DURATION as f32,
    });
}

/// Spawn one obstacle just past a random side edge
pub fn spawn_obstacle(world: &mut World) {
    let id = world.next_entity_id();
    let obstacle = new_edge_obstacle(
        id,
        &mut world.rng,
        &world.arena,
        world.waves.obstacle_speed,
        world.clock,
    );
    log::debug!(
        "Spawned {:?} #{} at ({:.0}, {:.0})",
        obstacle.shape,
        obstacle.id,
        obstacle.pos.x,
        obstacle.pos.y
    );
    world.obstacles.push(obstacle);
}

fn new_edge_obstacle(id: u32, rng: &mut Pcg32, arena: &Arena, speed: f32, now: f64) -> Obstacle {
    let from_left = rng.random_bool(0.5);
    let offset = 60.0 + unit(rng) * 120.0;
    let x = if from_left { -offset } else { arena.width + offset };
    let base_y = 60.0 + unit(rng) * (arena.height * 0.7);
    let phase = unit(rng) * std::f32::consts::TAU;
    let shape = Shape::ALL[rng.random_range(0..Shape::ALL.len())];

    // Head toward the play area
    let cruise = speed * (0.6 + unit(rng) * 0.6);
    let vx = if from_left { cruise } else { -cruise };
    let vy = centered(rng, 20.0);
    let vy_target = centered(rng, 20.0);

    let wobble = Wobble {
        freq: 1.5 + unit(rng) * 3.0,
        magnitude: 8.0 + unit(rng) * 28.0,
        phase,
    };
    let change_interval = 0.8 + unit(rng) as f64 * 1.6;
    let rotation = centered(rng, 0.6);
    let rot_speed = centered(rng, 1.2);
    let target = Vec2::new(unit(rng) * arena.width, 40.0 + unit(rng) * (arena.height - 80.0));
    let speed_fraction = 0.35 + unit(rng) * 0.8;
    let vertical_damping = 0.7 + unit(rng) * 0.6;

    let mut obstacle = Obstacle {
        id,
        pos: Vec2::new(x, base_y),
        base_y,
        size: OBSTACLE_SIZE,
        shape,
        rotation,
        rot_speed,
        vel: Vec2::new(vx, vy),
        vel_target: Vec2::new(vx, vy_target),
        wobble,
        last_change: now,
        change_interval,
        target,
        speed_fraction,
        vertical_damping,
        points: Vec::new(),
    };
    obstacle.refresh_points();
    obstacle
}

/// Spawn one health pack somewhere in the upper part of the screen
pub fn spawn_health_pack(world: &mut World) {
    let id = world.next_entity_id();
    let rng = &mut world.rng;
    let arena = world.arena;

    let x = 40.0 + unit(rng) * (arena.width - 80.0);
    let y = 40.0 + unit(rng) * (arena.height * 0.5);
    let vel = Vec2::new(centered(rng, 40.0), centered(rng, 20.0));
    let wobble = Wobble {
        freq: 1.0 + unit(rng) * 4.0,
        magnitude: HEALTH_PACK_BOB,
        phase: unit(rng) * std::f32::consts::TAU,
    };

    log::debug!("Spawned health pack #{} at ({:.0}, {:.0})", id, x, y);
    world.health_packs.push(HealthPack {
        id,
        pos: Vec2::new(x, y),
        base_y: y,
        radius: HEALTH_PACK_RADIUS,
        vel,
        wobble,
        heal: HEALTH_PACK_HEAL,
    });
}

/// Debug helper: two overlapping circles and a triangle right by the ball
pub fn spawn_collision_test(world: &mut World) {
    let center = Vec2::new(world.arena.width * 0.5, world.arena.height * 0.35);
    let s = OBSTACLE_SIZE;
    let now = world.clock;

    let ids = [world.next_entity_id(), world.next_entity_id(), world.next_entity_id()];
    world.obstacles.push(scripted_obstacle(
        ids[0],
        center - Vec2::new(s * 0.3, 0.0),
        Shape::Circle,
        Vec2::new(10.0, 0.0),
        Vec2::new(60.0, 0.0),
        0.0,
        0.2,
        center + Vec2::new(200.0, 0.0),
        now,
    ));
    world.obstacles.push(scripted_obstacle(
        ids[1],
        center + Vec2::new(s * 0.3, 0.0),
        Shape::Circle,
        Vec2::new(-10.0, 0.0),
        Vec2::new(-60.0, 0.0),
        0.0,
        -0.2,
        center - Vec2::new(200.0, 0.0),
        now,
    ));
    world.obstacles.push(scripted_obstacle(
        ids[2],
        center + Vec2::new(-160.0, 40.0),
        Shape::Triangle,
        Vec2::new(30.0, 0.0),
        Vec2::new(30.0, 0.0),
        0.2,
        0.1,
        center + Vec2::new(160.0, 40.0),
        now,
    ));

    world.ball.pos = center + Vec2::new(0.0, 80.0);
    world.ball.vel = Vec2::new(0.0, -40.0);
    log::info!("Spawned collision test set");
}

/// Fixed-parameter obstacle for the collision test set
#[allow(clippy::too_many_arguments)]
fn scripted_obstacle(
    id: u32,
    pos: Vec2,
    shape: Shape,
    vel: Vec2,
    vel_target: Vec2,
    rotation: f32,
    rot_speed: f32,
    target: Vec2,
    now: f64,
) -> Obstacle {
    let mut obstacle = Obstacle {
        id,
        pos,
        base_y: pos.y,
        size: OBSTACLE_SIZE,
        shape,
        rotation,
        rot_speed,
        vel,
        vel_target,
        wobble: Wobble {
            freq: 2.0,
            magnitude: 6.0,
            phase: 0.0,
        },
        last_change: now,
        change_interval: 1.2,
        target,
        speed_fraction: 1.0,
        vertical_damping: 1.0,
        points: Vec::new(),
    };
    obstacle.refresh_points();
    obstacle
}
