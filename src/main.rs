//! Ground Control headless runner
//!
//! Drives the game at 60 fps with a simple autopilot that tilts the ground to
//! roll the ball back toward the middle, logging wave progress and printing a
//! JSON summary at the end.
//!
//! Usage: `ground-control [SECONDS] [SEED] [SETTINGS_JSON]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ground_control::sim::{TickInput, World};
    use ground_control::{Game, Phase, Settings};
    use serde::Serialize;

    const FPS: f64 = 60.0;
    const DEFAULT_SECONDS: f64 = 60.0;
    const DEFAULT_SEED: u64 = 42;

    /// End-of-run report
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Summary {
        seed: u64,
        seconds: f64,
        deaths: u32,
        wave: u32,
        best_wave: u32,
        health: f32,
        obstacles: usize,
        health_packs: usize,
        settings: Settings,
    }

    /// Tilt toward an angle that rolls the ball back to the center
    fn autopilot(world: &World) -> TickInput {
        let half_width = world.arena.width * 0.5;
        let offset = (world.ball.pos.x - half_width) / half_width;
        let desired = (-offset * 0.5).clamp(-0.5, 0.5);
        let angle = world.ground.angle;

        TickInput {
            rotate_right: angle < desired - 0.05,
            rotate_left: angle > desired + 0.05,
            ..Default::default()
        }
    }

    fn load_settings(path: Option<&str>) -> Settings {
        let Some(path) = path else {
            return Settings::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => Settings::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Failed to read settings from {}: {}", path, e);
                Settings::default()
            }
        }
    }

    pub fn run() {
        env_logger::init();

        let args: Vec<String> = std::env::args().skip(1).collect();
        let seconds = args
            .first()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_SECONDS);
        let seed = args
            .get(1)
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEED);
        let settings = load_settings(args.get(2).map(String::as_str));

        log::info!("Ground Control (headless) starting: {:.0}s, seed {}", seconds, seed);

        let mut game = Game::new(seed, settings);
        game.start();

        let frames = (seconds * FPS).round() as u64;
        let mut deaths = 0;
        let mut best_wave = 1;
        let mut last_wave = 1;

        for frame in 0..=frames {
            let now = frame as f64 / FPS;
            let input = autopilot(&game.world);
            let was_dead = matches!(game.phase(), Phase::Dead { .. });
            let phase = game.frame(now, &input);

            if !was_dead && matches!(phase, Phase::Dead { .. }) {
                deaths += 1;
            }
            let wave = game.world.waves.wave;
            if wave != last_wave {
                best_wave = best_wave.max(wave);
                last_wave = wave;
            }
        }

        let view = game.view();
        log::info!("{} | health {:.0}%", view.wave_badge, view.health_fraction * 100.0);

        let summary = Summary {
            seed,
            seconds,
            deaths,
            wave: game.world.waves.wave,
            best_wave,
            health: game.world.ball.health,
            obstacles: game.world.obstacles.len(),
            health_packs: game.world.health_packs.len(),
            settings: game.world.settings.clone(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on the web; embedders drive `Game` directly
}
