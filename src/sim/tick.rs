//! One simulation step
//!
//! Composes ground input, ball integration, wave scheduling, health packs,
//! obstacle motion and all contact resolution in a fixed order.

use serde::{Deserialize, Serialize};

use super::collision::{BallHit, ball_obstacle_collision, collect_health_packs, remove_offscreen, resolve_obstacle_pairs};
use super::physics::{apply_ground_input, step_ball, step_health_pack, step_obstacle};
use super::spawner::update_waves;
use super::state::{LifeState, World};

/// Held-key intents sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

/// What a call to [`update`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// World advanced normally
    Stepped,
    /// The ball died during this step
    Died,
    /// Nothing happened because the ball was already dead
    Idle,
}

/// Advance the world by `dt` real seconds
pub fn update(world: &mut World, input: &TickInput, dt: f32) -> StepOutcome {
    if world.life == LifeState::Dead {
        return StepOutcome::Idle;
    }

    apply_ground_input(&mut world.ground, input, &world.arena, dt);

    world.clock += dt as f64;
    let time_scale = world.slow_motion.refresh(world.clock);
    let physics_dt = dt * time_scale;
    let now = world.clock;

    step_ball(&mut world.ball, &world.ground, &world.arena, physics_dt, &mut world.effects);

    update_waves(world, dt);

    for pack in world.health_packs.iter_mut() {
        step_health_pack(pack, &world.arena, now, physics_dt);
    }
    collect_health_packs(&mut world.ball, &mut world.health_packs, &mut world.effects);

    let damage = world.settings.damage();
    let cruise_speed = world.waves.obstacle_speed;
    let mut died = false;
    for obstacle in world.obstacles.iter_mut() {
        step_obstacle(obstacle, &mut world.rng, &world.arena, cruise_speed, now, physics_dt);
        let hit = ball_obstacle_collision(&mut world.ball, obstacle, &mut world.rng, damage, &mut world.effects);
        if hit == BallHit::Killed {
            died = true;
            break;
        }
    }

    if died {
        world.life = LifeState::Dead;
        log::info!(
            "Ball destroyed in wave {} after {:.1}s",
            world.waves.wave,
            world.clock
        );
    } else {
        resolve_obstacle_pairs(&mut world.obstacles);
    }

    let removed = remove_offscreen(&mut world.obstacles, &world.arena);
    if removed > 0 {
        log::debug!("Removed {} off-screen obstacles", removed);
    }

    if died { StepOutcome::Died } else { StepOutcome::Stepped }
}
