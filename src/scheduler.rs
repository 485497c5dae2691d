//! Fixed-rate loop driver
//!
//! Runs the simulation on its own thread at `tick_rate` Hz. Each iteration
//! takes the pending command, ticks, dispatches events and renders, all
//! while holding the session lock, so neither the renderer nor
//! [`Scheduler::current_view`] can observe a half-updated state.
//!
//! Input arrives from other threads through a single-slot cell: the latest
//! command wins and at most one is consumed per tick.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::{ConfigError, SchedulerError};
use crate::renderer::Renderer;
use crate::settings::{Pacing, Settings};
use crate::sim::{Command, GameEvent, SimulationState, Simulator};

/// Loop driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// Receives tick notifications (audio, UI). Fire-and-forget.
pub trait EventSink: Send {
    fn on_event(&mut self, event: &GameEvent);

    /// Called when the loop starts and after it has stopped
    fn on_lifecycle(&mut self, _state: SchedulerState) {}
}

impl EventSink for Sender<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        // Receiver gone means nobody is listening any more
        let _ = self.send(*event);
    }
}

/// Sink that drops every event
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &GameEvent) {}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking renderer must not wedge stop() or the input thread
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single-slot, overwrite-on-write command cell
#[derive(Debug, Default)]
pub struct CommandCell {
    slot: Mutex<Option<Command>>,
}

impl CommandCell {
    /// Replace any unconsumed command
    pub fn submit(&self, command: Command) {
        *lock(&self.slot) = Some(command);
    }

    /// Consume the pending command, if any
    pub fn take(&self) -> Option<Command> {
        lock(&self.slot).take()
    }
}

struct Session {
    simulator: Simulator,
    state: SimulationState,
    renderer: Box<dyn Renderer>,
    sink: Box<dyn EventSink>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Run `ticks` ticks then render once. The pending command is taken once,
    /// up front, and only the first tick sees it; a frame with no ticks
    /// leaves it queued.
    fn frame(&mut self, commands: &CommandCell, ticks: u32) {
        let mut pending = if ticks > 0 { commands.take() } else { None };
        for _ in 0..ticks {
            let input = pending.take();
            self.events.clear();
            crate::sim::tick(
                &mut self.state,
                input,
                self.simulator.rules(),
                &mut self.events,
            );
            for event in &self.events {
                self.sink.on_event(event);
            }
        }
        self.renderer.render(&self.state);
    }
}

struct Shared {
    session: Mutex<Session>,
    commands: CommandCell,
    running: Mutex<bool>,
    wake: Condvar,
}

impl Shared {
    fn is_running(&self) -> bool {
        *lock(&self.running)
    }

    /// Sleep up to `timeout`, waking early on stop. Returns false once stopped.
    fn pace(&self, timeout: Duration) -> bool {
        let running = lock(&self.running);
        let (running, _) = self
            .wake
            .wait_timeout_while(running, timeout, |running| *running)
            .unwrap_or_else(PoisonError::into_inner);
        *running
    }
}

/// Cloneable handle for feeding input from another thread
#[derive(Clone)]
pub struct InputHandle {
    shared: Arc<Shared>,
}

impl InputHandle {
    /// Non-blocking; overwrites any command not yet consumed
    pub fn submit(&self, command: Command) {
        self.shared.commands.submit(command);
    }
}

/// Fixed-rate game loop
pub struct Scheduler {
    shared: Arc<Shared>,
    budget: Duration,
    pacing: Pacing,
    worker: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new<R, E>(settings: &Settings, renderer: R, sink: E) -> Result<Self, ConfigError>
    where
        R: Renderer + 'static,
        E: EventSink + 'static,
    {
        settings.validate()?;
        let session = Session {
            simulator: Simulator::new(settings),
            state: SimulationState::new(settings),
            renderer: Box::new(renderer),
            sink: Box::new(sink),
            events: Vec::new(),
        };
        Ok(Self {
            shared: Arc::new(Shared {
                session: Mutex::new(session),
                commands: CommandCell::default(),
                running: Mutex::new(false),
                wake: Condvar::new(),
            }),
            budget: settings.tick_budget(),
            pacing: settings.pacing,
            worker: None,
        })
    }

    pub fn state(&self) -> SchedulerState {
        if self.worker.is_some() && self.shared.is_running() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// Spawn the loop thread. Errors if it is already running; never spawns twice.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        if self.worker.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        *lock(&self.shared.running) = true;
        lock(&self.shared.session)
            .sink
            .on_lifecycle(SchedulerState::Running);

        let shared = Arc::clone(&self.shared);
        let budget = self.budget;
        let pacing = self.pacing;
        let spawned = std::thread::Builder::new()
            .name("tuxfly-loop".into())
            .spawn(move || run_loop(&shared, budget, pacing));

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                log::info!("Game loop started ({:?} per tick, {:?})", budget, pacing);
                Ok(())
            }
            Err(err) => {
                *lock(&self.shared.running) = false;
                lock(&self.shared.session)
                    .sink
                    .on_lifecycle(SchedulerState::Stopped);
                Err(SchedulerError::Spawn(err))
            }
        }
    }

    /// Stop the loop and wait for the thread to exit. No-op when stopped.
    ///
    /// The loop only checks for stop between iterations, so the state is
    /// always left on a tick boundary.
    pub fn stop(&mut self) -> Result<(), SchedulerError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        *lock(&self.shared.running) = false;
        self.shared.wake.notify_all();
        let joined = worker.join();

        lock(&self.shared.session)
            .sink
            .on_lifecycle(SchedulerState::Stopped);
        log::info!("Game loop stopped");

        joined.map_err(|_| SchedulerError::WorkerPanicked)
    }

    /// Queue a command for the next tick (latest wins)
    pub fn submit_input(&self, command: Command) {
        self.shared.commands.submit(command);
    }

    pub fn input_handle(&self) -> InputHandle {
        InputHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Copy of the latest fully-ticked state
    pub fn current_view(&self) -> SimulationState {
        lock(&self.shared.session).state.clone()
    }

    /// Borrow the latest fully-ticked state without copying it.
    /// Blocks the loop for as long as `f` runs.
    pub fn with_view<T>(&self, f: impl FnOnce(&SimulationState) -> T) -> T {
        f(&lock(&self.shared.session).state)
    }

    /// New screen size, applied between ticks
    pub fn resize(&self, width: f32, height: f32) {
        lock(&self.shared.session).state.set_viewport(width, height);
        log::info!("Viewport resized to {width}x{height}");
    }

    /// Run one tick + render on the calling thread, without pacing.
    /// For hosts that drive their own frame clock.
    pub fn step(&self) {
        lock(&self.shared.session).frame(&self.shared.commands, 1);
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::warn!("Game loop ended badly: {err}");
        }
    }
}

fn run_loop(shared: &Shared, budget: Duration, pacing: Pacing) {
    let mut last = Instant::now();
    let mut accumulator = Duration::ZERO;

    while shared.is_running() {
        let frame_start = Instant::now();

        let ticks = match pacing {
            Pacing::Sleep => 1,
            Pacing::FixedStep { max_substeps } => {
                accumulator += frame_start - last;
                last = frame_start;
                let mut ticks = 0;
                while accumulator >= budget && ticks < max_substeps {
                    accumulator -= budget;
                    ticks += 1;
                }
                // Drop backlog we could not catch up on (spiral of death)
                if ticks == max_substeps {
                    accumulator = accumulator.min(budget);
                }
                ticks
            }
        };

        lock(&shared.session).frame(&shared.commands, ticks);

        let elapsed = frame_start.elapsed();
        if elapsed > budget {
            log::debug!("Frame overran budget: {:?} > {:?}", elapsed, budget);
        }
        if !shared.pace(budget.saturating_sub(elapsed)) {
            break;
        }
    }
}
