//! Drives the threaded game loop end to end with recording collaborators.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tuxfly::audio::{AudioBackend, AudioManager, SoundEffect};
use tuxfly::renderer::{Overlay, Scene};
use tuxfly::sim::{Command, GameEvent, SimulationState};
use tuxfly::{Pacing, Scheduler, SchedulerState, Settings};

/// What the renderer saw on each frame
#[derive(Debug, Clone)]
struct Frame {
    ticks: u64,
    y: f32,
    terminal: bool,
    overlay: Overlay,
}

fn recording_renderer() -> (
    Arc<Mutex<Vec<Frame>>>,
    impl FnMut(&SimulationState) + Send + 'static,
) {
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&frames);
    let renderer = move |state: &SimulationState| {
        let scene = Scene::from_state(state);
        sink.lock().unwrap().push(Frame {
            ticks: state.ticks,
            y: state.actor.pos.y,
            terminal: state.terminal,
            overlay: scene.overlay,
        });
    };
    (frames, renderer)
}

#[test]
fn loop_ticks_renders_and_stops() {
    let settings = Settings {
        tick_rate: 240,
        ..Default::default()
    };
    let (frames, renderer) = recording_renderer();
    let (tx, rx) = mpsc::channel();
    let mut scheduler = Scheduler::new(&settings, renderer, tx).unwrap();

    scheduler.start().unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Running);

    // Input thread taps a few times
    let input = scheduler.input_handle();
    let tapper = thread::spawn(move || {
        for _ in 0..5 {
            input.submit(Command::Tap);
            thread::sleep(Duration::from_millis(20));
        }
    });
    tapper.join().unwrap();
    thread::sleep(Duration::from_millis(50));

    scheduler.stop().unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Stopped);

    let frames = frames.lock().unwrap().clone();
    assert!(frames.len() > 5, "only {} frames rendered", frames.len());

    let max_y = settings.screen_height - settings.actor_height;
    for frame in &frames {
        assert!(frame.y >= 0.0 && frame.y <= max_y);
        if frame.terminal {
            assert_eq!(frame.overlay, Overlay::GameOver);
        }
    }

    let events: Vec<GameEvent> = rx.try_iter().collect();
    assert!(events.contains(&GameEvent::Impulse));

    // Nothing moves after stop
    let view = scheduler.current_view();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(scheduler.current_view().ticks, view.ticks);
}

#[test]
fn stop_interrupts_the_pacing_sleep() {
    // One tick per two seconds: stop must not wait out the sleep
    let settings = Settings {
        tick_rate: 1,
        ..Default::default()
    };
    let mut scheduler = Scheduler::new(
        &settings,
        |_: &SimulationState| {},
        tuxfly::scheduler::NullSink,
    )
    .unwrap();
    scheduler.start().unwrap();
    thread::sleep(Duration::from_millis(50));

    let begin = Instant::now();
    scheduler.stop().unwrap();
    assert!(begin.elapsed() < Duration::from_millis(500));
    assert_eq!(scheduler.current_view().ticks, 1);
}

#[test]
fn restart_after_stop() {
    let settings = Settings {
        tick_rate: 200,
        ..Default::default()
    };
    let mut scheduler =
        Scheduler::new(&settings, |_: &SimulationState| {}, tuxfly::scheduler::NullSink).unwrap();

    scheduler.start().unwrap();
    thread::sleep(Duration::from_millis(30));
    scheduler.stop().unwrap();
    let first = scheduler.current_view().ticks;
    assert!(first > 0);

    scheduler.start().unwrap();
    thread::sleep(Duration::from_millis(30));
    scheduler.stop().unwrap();
    assert!(scheduler.current_view().ticks > first);
}

#[test]
fn fixed_step_pacing_keeps_running() {
    let settings = Settings {
        tick_rate: 120,
        pacing: Pacing::FixedStep { max_substeps: 4 },
        ..Default::default()
    };
    let (frames, renderer) = recording_renderer();
    let mut scheduler = Scheduler::new(&settings, renderer, tuxfly::scheduler::NullSink).unwrap();
    scheduler.start().unwrap();
    thread::sleep(Duration::from_millis(100));
    scheduler.stop().unwrap();

    let frames = frames.lock().unwrap();
    assert!(!frames.is_empty());
    // Tick counts seen by the renderer never go backwards
    assert!(frames.windows(2).all(|w| w[0].ticks <= w[1].ticks || w[1].ticks == 0));
}

#[derive(Clone, Default)]
struct SharedRecorder(Arc<Mutex<(Vec<SoundEffect>, Vec<Option<f32>>)>>);

impl AudioBackend for SharedRecorder {
    fn play(&mut self, effect: SoundEffect, _volume: f32) {
        self.0.lock().unwrap().0.push(effect);
    }

    fn set_music(&mut self, volume: Option<f32>) {
        self.0.lock().unwrap().1.push(volume);
    }
}

#[test]
fn audio_follows_loop() {
    let settings = Settings {
        tick_rate: 240,
        ..Default::default()
    };
    let recorder = SharedRecorder::default();
    let audio = AudioManager::new(recorder.clone());
    let mut scheduler = Scheduler::new(&settings, |_: &SimulationState| {}, audio).unwrap();

    scheduler.submit_input(Command::Impulse);
    scheduler.start().unwrap();
    thread::sleep(Duration::from_millis(40));
    scheduler.stop().unwrap();

    let (effects, music) = recorder.0.lock().unwrap().clone();
    assert_eq!(effects.first(), Some(&SoundEffect::Flap));
    assert!(matches!(music.first(), Some(Some(_))));
    assert_eq!(music.last(), Some(&None));
}
