//! Contact resolution between the ball, obstacles and health packs
//!
//! Obstacles are not static: ball and obstacle exchange momentum through an
//! impulse weighted by inverse mass, with masses approximated from size.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::effects::{ColorSlot, Effect};
use super::geometry::{CollisionResult, Shape, circle_circle_collision, polygon_collision_info};
use super::spawner::centered;
use super::state::{Arena, Ball, HealthPack, Obstacle};
use crate::consts::*;

/// What a ball-obstacle check did to the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallHit {
    Miss,
    Hit,
    /// This contact took the last of the ball's health
    Killed,
}

#[inline]
fn ball_mass(ball: &Ball) -> f32 {
    (ball.radius * ball.radius * 0.12).max(6.0)
}

#[inline]
fn obstacle_mass(obstacle: &Obstacle) -> f32 {
    (obstacle.size * obstacle.size * 0.02).max(8.0)
}

/// Contact between ball and obstacle, normal pointing from obstacle to ball
pub fn ball_obstacle_contact(ball: &Ball, obstacle: &Obstacle) -> Option<CollisionResult> {
    match obstacle.shape {
        Shape::Circle => {
            let hit = circle_circle_collision(ball.pos, ball.radius, obstacle.pos, obstacle.collision_radius());
            hit.hit.then_some(hit)
        }
        _ => polygon_collision_info(ball.pos, ball.radius, &obstacle.points),
    }
}

/// Separate ball and obstacle and exchange momentum along the contact normal
pub fn resolve_ball_obstacle(ball: &mut Ball, obstacle: &mut Obstacle, contact: &CollisionResult) {
    let n = contact.normal;
    let inv_ball = 1.0 / ball_mass(ball);
    let inv_obstacle = 1.0 / obstacle_mass(obstacle);
    let inv_sum = inv_ball + inv_obstacle;

    ball.pos += n * (inv_ball / inv_sum * contact.penetration);
    obstacle.shift(-n * (inv_obstacle / inv_sum * contact.penetration));

    // Separating contacts keep their velocities
    let vel_along = (ball.vel - obstacle.vel).dot(n);
    if vel_along < 0.0 {
        let j = -(1.0 + BALL_OBSTACLE_RESTITUTION) * vel_along / inv_sum;
        ball.vel += n * (j * inv_ball);
        obstacle.vel -= n * (j * inv_obstacle);
    }
}

/// Full ball-vs-obstacle interaction: contact, response, damage and effects
pub fn ball_obstacle_collision(
    ball: &mut Ball,
    obstacle: &mut Obstacle,
    rng: &mut Pcg32,
    damage: f32,
    effects: &mut Vec<Effect>,
) -> BallHit {
    let Some(contact) = ball_obstacle_contact(ball, obstacle) else {
        return BallHit::Miss;
    };

    let contact_point = match obstacle.shape {
        Shape::Circle => obstacle.pos + contact.normal * (obstacle.size * 0.45),
        _ => ball.pos - contact.normal * (ball.radius - contact.penetration * 0.5),
    };

    resolve_ball_obstacle(ball, obstacle, &contact);
    obstacle.rot_speed += centered(rng, 2.0);

    effects.push(Effect::Burst {
        pos: contact_point,
        color: ColorSlot::Ball,
        count: 8,
        speed: 140.0,
    });

    if ball.take_damage(damage) {
        effects.push(Effect::Burst {
            pos: ball.pos,
            color: ColorSlot::Death,
            count: 28,
            speed: 220.0,
        });
        BallHit::Killed
    } else {
        BallHit::Hit
    }
}

/// Push apart and bounce one overlapping obstacle pair. Returns true on contact.
pub fn resolve_obstacle_pair(a: &mut Obstacle, b: &mut Obstacle) -> bool {
    let delta = b.pos - a.pos;
    let dist_sq = delta.length_squared();
    let min_dist = a.collision_radius() + b.collision_radius();
    if dist_sq >= min_dist * min_dist {
        return false;
    }

    let dist = dist_sq.sqrt();
    let n = if dist < CONTACT_EPSILON { Vec2::X } else { delta / dist };
    let penetration = min_dist - dist;

    let inv_a = 1.0 / a.size.max(8.0);
    let inv_b = 1.0 / b.size.max(8.0);
    let inv_sum = inv_a + inv_b;

    a.shift(-n * (inv_a / inv_sum * penetration));
    b.shift(n * (inv_b / inv_sum * penetration));

    let vel_along = (b.vel - a.vel).dot(n);
    if vel_along < 0.0 {
        let j = -(1.0 + OBSTACLE_OBSTACLE_RESTITUTION) * vel_along / inv_sum;
        a.vel -= n * (j * inv_a);
        b.vel += n * (j * inv_b);
    }
    true
}

/// All-pairs obstacle contacts (n is small, O(n²) is fine)
pub fn resolve_obstacle_pairs(obstacles: &mut [Obstacle]) -> usize {
    let mut contacts = 0;
    for i in 0..obstacles.len() {
        let (head, tail) = obstacles.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if resolve_obstacle_pair(a, b) {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Heal from and remove every pack the ball overlaps. Returns the number collected.
pub fn collect_health_packs(ball: &mut Ball, packs: &mut Vec<HealthPack>, effects: &mut Vec<Effect>) -> usize {
    let before = packs.len();
    packs.retain(|pack| {
        let reach = ball.radius + pack.radius;
        if ball.pos.distance_squared(pack.pos) > reach * reach {
            return true;
        }
        ball.heal(pack.heal);
        effects.push(Effect::Burst {
            pos: pack.pos,
            color: ColorSlot::HealthPack,
            count: 10,
            speed: 160.0,
        });
        false
    });
    before - packs.len()
}

/// Drop obstacles that wandered past the horizontal margins
pub fn remove_offscreen(obstacles: &mut Vec<Obstacle>, arena: &Arena) -> usize {
    let before = obstacles.len();
    let min_x = -OFFSCREEN_MARGIN;
    let max_x = arena.width + OFFSCREEN_MARGIN;
    obstacles.retain(|o| o.pos.x >= min_x && o.pos.x <= max_x);
    before - obstacles.len()
}
