//! Tux Fly headless runner
//!
//! Runs the game loop for a few seconds with an auto-pilot tapping from a
//! separate input thread, logs frames and audio cues, then prints the final
//! state as JSON. Usage: `tuxfly [settings.json] [seconds] [cadence]`, where
//! cadence is `independent` or `legacy`.

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use tuxfly::audio::AudioManager;
use tuxfly::renderer::{Scene, shapes, vertex};
use tuxfly::sim::{Command, SimulationState};
use tuxfly::{Scheduler, Settings, SpawnCadence};

/// Logs a line per second of frames
struct LogRenderer {
    frames: u64,
    every: u64,
}

impl tuxfly::renderer::Renderer for LogRenderer {
    fn render(&mut self, state: &SimulationState) {
        self.frames += 1;
        if self.frames % self.every != 0 {
            return;
        }
        let scene = Scene::from_state(state);
        let (pipes, actor) = shapes::scene_vertices(&scene);
        log::info!(
            "frame {} | {} | y={:.1} | {} pipe verts, {} actor bytes | {}",
            self.frames,
            scene.hud_text(),
            state.actor.pos.y,
            pipes.len(),
            vertex::as_bytes(&actor).len(),
            scene.overlay.lines().join(" / "),
        );
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tux Fly (headless) starting...");

    let mut args = std::env::args().skip(1);
    let mut settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    let seconds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5);
    if let Some(arg) = args.next() {
        match SpawnCadence::from_str(&arg) {
            Some(cadence) => settings.spawn_cadence = cadence,
            None => {
                log::error!("Unknown spawn cadence {arg:?}");
                return ExitCode::FAILURE;
            }
        }
    }
    log::info!("Spawn cadence: {}", settings.spawn_cadence.as_str());

    let renderer = LogRenderer {
        frames: 0,
        every: u64::from(settings.tick_rate),
    };
    let mut scheduler = match Scheduler::new(&settings, renderer, AudioManager::default()) {
        Ok(scheduler) => scheduler,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = scheduler.start() {
        log::error!("{err}");
        return ExitCode::FAILURE;
    }

    // Auto-pilot on its own input thread: flap whenever the actor sinks
    // below the middle of the screen, restart after a crash
    let mid = settings.screen_height / 2.0;
    let run_for = Duration::from_secs(seconds);
    thread::scope(|scope| {
        let scheduler = &scheduler;
        scope.spawn(move || {
            let begin = Instant::now();
            while begin.elapsed() < run_for {
                let (y, terminal) = scheduler.with_view(|s| (s.actor.pos.y, s.terminal));
                if terminal || y > mid {
                    scheduler.submit_input(Command::Tap);
                }
                thread::sleep(Duration::from_millis(120));
            }
        });
    });

    if let Err(err) = scheduler.stop() {
        log::error!("{err}");
        return ExitCode::FAILURE;
    }

    let view = scheduler.current_view();
    log::info!("Final score {} after {} ticks", view.score, view.ticks);
    if view.field.is_suspended() {
        log::warn!("Pipe spawning was suspended at exit");
    }
    match serde_json::to_string_pretty(&Scene::from_state(&view)) {
        Ok(json) => println!("{json}"),
        Err(err) => log::warn!("Could not serialize final scene: {err}"),
    }
    ExitCode::SUCCESS
}
