//! Headless frame driver.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};
use vignette_core::GameTime;
use vignette_ecs::{SystemRegistry, WorldService};
use vignette_script::{register_systems, Shared, Zone, ZoneService};
use vignette_state::StateStack;

use crate::settings::{RunSettings, Settings};
use crate::states::BootState;

/// Owns the world, the state stack and the shared zone environment.
pub struct App {
    time: GameTime,
    service: WorldService,
    states: StateStack,
    environment: Shared<ZoneService>,
    run: RunSettings,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        let environment = ZoneService::shared();
        let mut registry = SystemRegistry::new();
        register_systems(&mut registry, environment.clone());
        debug!("Registered {} systems", registry.len());

        Self {
            time: GameTime::new(settings.time.clone()),
            service: WorldService::new(registry),
            states: StateStack::new(),
            environment,
            run: settings.run.clone(),
        }
    }

    /// Start the state stack with a boot state for `zone`.
    pub fn start(&mut self, zone: Zone) {
        let boot = BootState::new(self.environment.clone(), zone);
        self.states = StateStack::with_initial(Box::new(boot));
        self.states.start(&mut self.service);
    }

    pub fn is_running(&self) -> bool {
        !self.states.is_empty()
    }

    /// Advance one frame by `raw_delta` real seconds.
    pub fn frame(&mut self, raw_delta: f32) {
        self.time.update(raw_delta);
        let dt = self.time.delta_time;
        self.service.update();
        self.service.update_timed(dt);
        self.states.update(&mut self.service, dt);
    }

    /// Run frames until the state stack empties or the frame limit is hit.
    /// Returns the number of frames run.
    pub fn run(&mut self) -> u64 {
        let target = Duration::from_secs_f32(self.run.fixed_delta.max(0.0));
        let mut frames = 0;
        let mut last = Instant::now();

        while self.is_running() {
            if self.run.max_frames > 0 && frames >= self.run.max_frames {
                info!("Frame limit {} reached", self.run.max_frames);
                break;
            }

            let raw_delta = if self.run.realtime {
                let spent = last.elapsed();
                if spent < target {
                    thread::sleep(target - spent);
                }
                let now = Instant::now();
                let delta = now.duration_since(last).as_secs_f32();
                last = now;
                delta
            } else {
                self.run.fixed_delta
            };

            self.frame(raw_delta);
            frames += 1;
        }
        frames
    }

    /// Pop every state in order and drop all systems.
    pub fn shutdown(&mut self) {
        self.states.stop(&mut self.service);
        self.service.clear_systems();
        info!(
            "Shut down after {} frames ({:.2}s game time)",
            self.time.frame_count, self.time.total_time
        );
    }

    pub fn service(&self) -> &WorldService {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vignette_script::{Environment, ScreenFade};

    const DEMO_ZONE: &str = include_str!("../assets/zones/intro.json");

    fn headless(max_frames: u64) -> Settings {
        let mut settings = Settings::default();
        settings.run.realtime = false;
        settings.run.max_frames = max_frames;
        settings
    }

    #[test]
    fn demo_zone_runs_to_completion() {
        let zone = Zone::from_json(DEMO_ZONE).expect("demo zone parses");
        let mut app = App::new(&headless(10_000));
        app.start(zone);

        let frames = app.run();
        assert!(frames < 10_000, "demo never finished");
        assert!(!app.is_running());
        assert_eq!(app.service().system_count(), 0);
        assert_eq!(app.service().world().entity_count(), 0);
        assert_eq!(
            app.service().world().resource::<ScreenFade>().map(|f| f.alpha),
            Some(1.0)
        );
        assert!(app.environment.read().current().is_none());
    }

    #[test]
    fn frame_limit_stops_the_loop() {
        let zone = Zone::from_json(DEMO_ZONE).expect("demo zone parses");
        let mut app = App::new(&headless(5));
        app.start(zone);

        assert_eq!(app.run(), 5);
        assert!(app.is_running());
        assert_eq!(app.service().system_count(), 4);
        assert!(app.environment.read().generation() > 0);

        app.shutdown();
        assert!(!app.is_running());
        assert_eq!(app.service().system_count(), 0);
    }
}
