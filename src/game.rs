//! Game lifecycle and frame driver
//!
//! Owns the [`World`] and the cosmetic layer, turns wall-clock timestamps into
//! clamped frame deltas, and gates stepping on the current [`Phase`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::fx::{Banner, Cosmetics, Marker, Particle};
use crate::settings::Settings;
use crate::sim::{
    Arena, Ball, Ground, HealthPack, Obstacle, Segment, StepOutcome, TickInput, World, spawn_collision_test, update,
};

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Built but not started
    Ready,
    Running,
    Paused,
    /// Ball destroyed; the run restarts automatically at `reset_at`
    Dead { reset_at: f64 },
}

/// Discrete (edge-triggered) player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Restart,
    TogglePause,
    /// Debug: drop a scripted set of overlapping obstacles near the ball
    SpawnCollisionTest,
}

/// Read-only view handed to a renderer each frame
#[derive(Debug, Clone)]
pub struct RenderView<'a> {
    pub phase: Phase,
    pub ball: &'a Ball,
    pub ground: &'a Ground,
    pub ground_segment: Segment,
    pub obstacles: &'a [Obstacle],
    pub health_packs: &'a [HealthPack],
    pub particles: &'a [Particle],
    pub markers: &'a [Marker],
    pub shake_magnitude: f32,
    pub banner: Option<Banner>,
    pub wave_badge: String,
    /// Ball health in [0, 1]
    pub health_fraction: f32,
    pub palette_hue: u16,
}

/// A running game: simulation plus cosmetics plus lifecycle
#[derive(Debug, Clone)]
pub struct Game {
    pub world: World,
    pub fx: Cosmetics,
    phase: Phase,
    /// Timestamp of the last frame; `None` means the next frame only re-baselines
    last_time: Option<f64>,
}

impl Game {
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self::with_arena(seed, settings, Arena::default())
    }

    pub fn with_arena(seed: u64, settings: Settings, arena: Arena) -> Self {
        Self {
            world: World::new(seed, settings, arena),
            fx: Cosmetics::new(seed),
            phase: Phase::Ready,
            last_time: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Begin a fresh run
    pub fn start(&mut self) {
        self.reset();
    }

    /// Reinitialize the world and resume stepping
    pub fn reset(&mut self) {
        self.world.reset();
        self.fx.clear();
        self.phase = Phase::Running;
        self.last_time = None;
        log::info!("Game reset (seed {})", self.world.seed);
    }

    /// Fresh run under a different seed
    pub fn restart_with_seed(&mut self, seed: u64) {
        self.world.seed = seed;
        self.fx = Cosmetics::new(seed);
        self.reset();
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            self.last_time = None;
            log::info!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn handle(&mut self, action: Action) {
        match action {
            Action::Restart => self.reset(),
            Action::TogglePause => self.toggle_pause(),
            Action::SpawnCollisionTest => {
                if self.world.is_alive() {
                    spawn_collision_test(&mut self.world);
                }
            }
        }
    }

    /// Change settings live, keeping the current run
    pub fn apply_settings(&mut self, settings: Settings) {
        self.world.apply_settings(settings);
        log::info!("Settings applied: {:?}", self.world.settings);
    }

    /// Frame delta since the last call, clamped; `None` on a baseline frame
    fn frame_dt(&mut self, now: f64) -> Option<f32> {
        if !now.is_finite() {
            log::warn!("Ignoring non-finite frame timestamp {}", now);
            return None;
        }
        let last = self.last_time.replace(now)?;
        let dt = (now - last) as f32;
        if !dt.is_finite() {
            return Some(0.0);
        }
        Some(dt.clamp(0.0, MAX_FRAME_DT))
    }

    /// Drive one display frame at wall-clock time `now` (seconds)
    pub fn frame(&mut self, now: f64, input: &TickInput) -> Phase {
        match self.phase {
            Phase::Ready | Phase::Paused => {
                self.last_time = None;
            }
            Phase::Dead { reset_at } => {
                if let Some(dt) = self.frame_dt(now) {
                    self.fx.update(dt, dt);
                }
                if now >= reset_at {
                    self.reset();
                    self.last_time = Some(now);
                }
            }
            Phase::Running => {
                let Some(dt) = self.frame_dt(now) else {
                    return self.phase;
                };

                let outcome = update(&mut self.world, input, dt);
                self.fx.consume(self.world.drain_effects());
                self.fx.update(dt, dt * self.world.slow_motion.scale);

                if outcome == StepOutcome::Died {
                    self.phase = Phase::Dead {
                        reset_at: now + DEATH_RESET_DELAY,
                    };
                    log::info!("Died in wave {}, restarting in {:.1}s", self.world.waves.wave, DEATH_RESET_DELAY);
                }
            }
        }
        self.phase
    }

    pub fn view(&self) -> RenderView<'_> {
        RenderView {
            phase: self.phase,
            ball: &self.world.ball,
            ground: &self.world.ground,
            ground_segment: self.world.ground.segment(),
            obstacles: &self.world.obstacles,
            health_packs: &self.world.health_packs,
            particles: &self.fx.particles,
            markers: &self.fx.markers,
            shake_magnitude: self.fx.shake_magnitude(),
            banner: self.fx.banner,
            wave_badge: self.world.wave_badge(),
            health_fraction: self.world.ball.health_fraction(),
            palette_hue: self.world.palette_hue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Shape, Wobble};
    use glam::Vec2;

    const FRAME: f64 = 1.0 / 60.0;

    fn started(seed: u64) -> Game {
        let mut game = Game::new(seed, Settings::default());
        game.start();
        game
    }

    /// Park a circle obstacle right against the ball
    fn park_obstacle_on_ball(game: &mut Game) {
        let pos = game.world.ball.pos + Vec2::new(40.0, 0.0);
        let mut o = Obstacle {
            id: game.world.next_entity_id(),
            pos,
            base_y: pos.y,
            size: OBSTACLE_SIZE,
            shape: Shape::Circle,
            rotation: 0.0,
            rot_speed: 0.0,
            vel: Vec2::ZERO,
            vel_target: Vec2::ZERO,
            wobble: Wobble {
                freq: 0.0,
                magnitude: 0.0,
                phase: 0.0,
            },
            last_change: 0.0,
            change_interval: 1000.0,
            target: pos,
            speed_fraction: 0.0,
            vertical_damping: 1.0,
            points: Vec::new(),
        };
        o.refresh_points();
        game.world.obstacles.push(o);
    }

    #[test]
    fn test_ready_does_not_step() {
        let mut game = Game::new(1, Settings::default());
        let input = TickInput::default();
        assert_eq!(game.frame(0.0, &input), Phase::Ready);
        assert_eq!(game.frame(1.0, &input), Phase::Ready);
        assert_eq!(game.world.clock, 0.0);
    }

    #[test]
    fn test_first_frame_only_baselines() {
        let mut game = started(2);
        let input = TickInput::default();
        game.frame(10.0, &input);
        assert_eq!(game.world.clock, 0.0);
        game.frame(10.0 + FRAME, &input);
        assert!((game.world.clock - FRAME).abs() < 1e-6);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game = started(3);
        let input = TickInput::default();
        game.frame(5.0, &input);
        game.frame(8.0, &input);
        assert!((game.world.clock - MAX_FRAME_DT as f64).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_timestamp_is_skipped() {
        let mut game = started(12);
        let input = TickInput::default();
        game.frame(1.0, &input);
        game.frame(f64::NAN, &input);
        game.frame(f64::INFINITY, &input);
        assert_eq!(game.world.clock, 0.0);

        game.frame(1.0 + FRAME, &input);
        assert!((game.world.clock - FRAME).abs() < 1e-6);
        assert!(game.world.ball.pos.is_finite());
        assert!(game.world.ball.vel.is_finite());
    }

    #[test]
    fn test_pause_does_not_integrate_paused_time() {
        let mut game = started(4);
        let input = TickInput::default();
        game.frame(0.0, &input);
        game.frame(0.05, &input);
        let before = game.world.snapshot();

        game.pause();
        assert_eq!(game.frame(3.0, &input), Phase::Paused);
        assert_eq!(game.world.snapshot(), before);

        game.resume();
        // Re-baseline: no jump over the paused interval
        game.frame(60.0, &input);
        assert_eq!(game.world.snapshot(), before);
        game.frame(60.05, &input);
        assert!((game.world.clock - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_toggle_pause_action() {
        let mut game = started(5);
        game.handle(Action::TogglePause);
        assert_eq!(game.phase(), Phase::Paused);
        game.handle(Action::TogglePause);
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn test_death_resets_after_delay() {
        let mut game = started(6);
        let input = TickInput::default();
        game.world.ball.health = 1.0;
        game.world.ball.vel = Vec2::ZERO;
        park_obstacle_on_ball(&mut game);

        game.frame(1.0, &input);
        let phase = game.frame(1.0 + FRAME, &input);
        let Phase::Dead { reset_at } = phase else {
            panic!("expected death, got {:?}", phase);
        };
        assert!((reset_at - (1.0 + FRAME + DEATH_RESET_DELAY)).abs() < 1e-9);
        assert!(!game.world.is_alive());

        // Still dead before the deadline, world frozen
        let clock = game.world.clock;
        assert!(matches!(game.frame(1.3, &input), Phase::Dead { .. }));
        assert_eq!(game.world.clock, clock);

        assert_eq!(game.frame(reset_at + 0.01, &input), Phase::Running);
        assert!(game.world.is_alive());
        assert_eq!(game.world.ball.health, game.world.ball.max_health);
        assert_eq!(game.world.clock, 0.0);

        // Stepping resumes on the very next frame
        game.frame(reset_at + 0.01 + FRAME, &input);
        assert!(game.world.clock > 0.0);
    }

    #[test]
    fn test_restart_action_after_death() {
        let mut game = started(7);
        game.world.ball.health = 1.0;
        park_obstacle_on_ball(&mut game);
        game.frame(0.0, &TickInput::default());
        game.frame(FRAME, &TickInput::default());
        assert!(matches!(game.phase(), Phase::Dead { .. }));

        game.handle(Action::Restart);
        assert_eq!(game.phase(), Phase::Running);
        assert!(game.world.is_alive());
    }

    #[test]
    fn test_collision_test_action_adds_obstacles() {
        let mut game = started(8);
        let before = game.world.obstacles.len();
        game.handle(Action::SpawnCollisionTest);
        assert_eq!(game.world.obstacles.len(), before + 3);
    }

    #[test]
    fn test_restart_with_seed() {
        let mut game = started(9);
        game.restart_with_seed(99);
        let fresh = Game::new(99, Settings::default());
        assert_eq!(game.world.snapshot(), fresh.world.snapshot());
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn test_view_reflects_world() {
        let mut game = started(10);
        game.world.ball.health = 25.0;
        let view = game.view();
        assert_eq!(view.wave_badge, "Wave 1 · 0.0s");
        assert_eq!(view.health_fraction, 0.25);
        assert_eq!(view.ground_segment.thickness, game.world.ground.thickness);
        assert_eq!(view.shake_magnitude, 0.0);
        assert!(view.banner.is_none());
        assert_eq!(view.phase, Phase::Running);
    }

    #[test]
    fn test_apply_settings_live() {
        let mut game = started(11);
        game.apply_settings(Settings {
            ground_thickness: 80,
            ..Default::default()
        });
        assert_eq!(game.view().ground.thickness, 80.0);
        assert_eq!(game.phase(), Phase::Running);
    }
}
