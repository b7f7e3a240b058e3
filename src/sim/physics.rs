//! Integration of the ball, ground, obstacles and health packs
//!
//! Gameplay motion uses the slowed `physics_dt`; bobbing and steering timers
//! run on the real clock so slow motion does not freeze the wobble.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::effects::Effect;
use super::geometry::{circle_segment_collision, normalize};
use super::spawner::{centered, unit};
use super::state::{Arena, Ball, Ground, HealthPack, Obstacle};
use super::tick::TickInput;
use crate::consts::*;

/// Move the ground from the player's intents, then clamp it
pub fn apply_ground_input(ground: &mut Ground, input: &TickInput, arena: &Arena, dt: f32) {
    if input.up {
        ground.center.y -= ground.elevation_speed * dt;
    }
    if input.down {
        ground.center.y += ground.elevation_speed * dt;
    }
    if input.rotate_left {
        ground.angle -= ground.angle_speed * dt;
    }
    if input.rotate_right {
        ground.angle += ground.angle_speed * dt;
    }
    ground.clamp(arena);
}

/// Gravity and explicit Euler position update
pub fn integrate_ball(ball: &mut Ball, dt: f32) {
    ball.vel.y += GRAVITY * dt;
    ball.pos += ball.vel * dt;
}

/// Bounce the ball off all four screen edges
pub fn ball_wall_collisions(ball: &mut Ball, arena: &Arena, effects: &mut Vec<Effect>) {
    let r = ball.radius;

    if ball.pos.x - r < 0.0 {
        ball.pos.x = r;
        ball.vel.x = -ball.vel.x * RESTITUTION;
        effects.extend(Effect::wall_hit(ball.pos, 10, 160.0, 6.0, 0.3));
    }
    if ball.pos.x + r > arena.width {
        ball.pos.x = arena.width - r;
        ball.vel.x = -ball.vel.x * RESTITUTION;
        effects.extend(Effect::wall_hit(ball.pos, 10, 160.0, 6.0, 0.3));
    }
    if ball.pos.y - r < 0.0 {
        ball.pos.y = r;
        ball.vel.y = -ball.vel.y * RESTITUTION;
        effects.extend(Effect::wall_hit(ball.pos, 8, 120.0, 5.0, 0.22));
    }
    if ball.pos.y + r > arena.height {
        ball.pos.y = arena.height - r;
        ball.vel.y = -ball.vel.y * RESTITUTION;
        // Keeps the ball from skating along the floor forever
        ball.vel.x *= FLOOR_DAMPING;
        effects.extend(Effect::wall_hit(ball.pos, 10, 160.0, 6.0, 0.3));
    }
}

/// Push the ball out of the ground and bounce it. Returns true on contact.
pub fn ball_ground_collision(ball: &mut Ball, ground: &Ground) -> bool {
    let contact = circle_segment_collision(ball.pos, ball.radius, &ground.segment());
    if !contact.hit {
        return false;
    }

    let n = contact.normal;
    ball.pos += n * contact.penetration;

    let tangent = Vec2::new(-n.y, n.x);
    let vn = ball.vel.dot(n);
    let vt = ball.vel.dot(tangent);
    ball.vel = n * (-vn * RESTITUTION) + tangent * (vt * GROUND_FRICTION);
    true
}

/// Full ball step: gravity, walls, ground, rolling resistance
pub fn step_ball(ball: &mut Ball, ground: &Ground, arena: &Arena, dt: f32, effects: &mut Vec<Effect>) {
    integrate_ball(ball, dt);
    ball_wall_collisions(ball, arena, effects);
    ball_ground_collision(ball, ground);
    ball.vel.x *= ROLLING_DAMPING;
}

/// Advance one obstacle: velocity smoothing, motion, bob, steering, spin, outline
pub fn step_obstacle(
    obstacle: &mut Obstacle,
    rng: &mut Pcg32,
    arena: &Arena,
    cruise_speed: f32,
    now: f64,
    dt: f32,
) {
    // First-order low-pass toward the target; never quite arrives
    obstacle.vel += (obstacle.vel_target - obstacle.vel) * OBSTACLE_VELOCITY_BLEND;

    obstacle.pos.x += obstacle.vel.x * dt;
    obstacle.base_y += obstacle.vel.y * dt;
    obstacle.pos.y = obstacle.base_y + obstacle.wobble.offset(now);

    if now - obstacle.last_change > obstacle.change_interval {
        retarget(obstacle, rng, arena, now);
    }
    steer(obstacle, cruise_speed);

    obstacle.rotation += obstacle.rot_speed * dt;
    obstacle.refresh_points();
}

/// Pick a new steering target and reshuffle wobble, spin and pace
pub fn retarget(obstacle: &mut Obstacle, rng: &mut Pcg32, arena: &Arena, now: f64) {
    obstacle.target = Vec2::new(
        -80.0 + unit(rng) * (arena.width + 160.0),
        40.0 + unit(rng) * (arena.height - 80.0),
    );
    obstacle.wobble.freq = 0.8 + unit(rng) * 5.0;
    obstacle.wobble.magnitude = 6.0 + unit(rng) * 30.0;
    obstacle.rot_speed = centered(rng, 1.2);
    obstacle.last_change = now;
    obstacle.change_interval = 0.6 + unit(rng) as f64 * 2.0;
    obstacle.speed_fraction = 0.35 + unit(rng) * 0.8;
    obstacle.vertical_damping = 0.7 + unit(rng) * 0.6;
}

/// Point the velocity target at the steering target
pub fn steer(obstacle: &mut Obstacle, cruise_speed: f32) {
    let dir = normalize(obstacle.target - obstacle.pos);
    let speed = cruise_speed * obstacle.speed_fraction;
    obstacle.vel_target = Vec2::new(dir.x * speed, dir.y * speed * obstacle.vertical_damping);
}

/// Drift, bob and bounce a health pack inside the screen margins
pub fn step_health_pack(pack: &mut HealthPack, arena: &Arena, now: f64, dt: f32) {
    pack.pos.x += pack.vel.x * dt;
    pack.base_y += pack.vel.y * dt;

    let min = HEALTH_PACK_MARGIN;
    if pack.pos.x < min {
        pack.pos.x = min;
        pack.vel.x = pack.vel.x.abs();
    }
    if pack.pos.x > arena.width - min {
        pack.pos.x = arena.width - min;
        pack.vel.x = -pack.vel.x.abs();
    }
    if pack.base_y < min {
        pack.base_y = min;
        pack.vel.y = pack.vel.y.abs();
    }
    if pack.base_y > arena.height - min {
        pack.base_y = arena.height - min;
        pack.vel.y = -pack.vel.y.abs();
    }

    pack.pos.y = pack.base_y + pack.wobble.offset(now);
}
