//! Tux Fly - a fixed-cadence side-scrolling avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, collisions, scoring)
//! - `scheduler`: Fixed-rate loop driver, input cell and snapshot access
//! - `renderer`: Drawable scene description handed to the host's renderer
//! - `audio`: Mapping from game events to sound cues
//! - `settings`: Data-driven game tuning

pub mod audio;
pub mod error;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SchedulerError};
pub use scheduler::{EventSink, Scheduler, SchedulerState};
pub use settings::{Pacing, Settings, SpawnCadence};

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Ticks per second
    pub const TICK_RATE: u32 = 60;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 1200.0;

    /// Actor defaults
    pub const ACTOR_X: f32 = 200.0;
    pub const ACTOR_START_Y: f32 = 500.0;
    pub const ACTOR_WIDTH: f32 = 120.0;
    pub const ACTOR_HEIGHT: f32 = 100.0;
    pub const ACTOR_FRAME_COUNT: u32 = 4;
    /// Ticks each animation frame stays on screen
    pub const FRAME_PERIOD_TICKS: u32 = 5;

    /// Physics (per tick, screen space with y pointing down)
    pub const GRAVITY: f32 = 1.2;
    pub const IMPULSE: f32 = -25.0;

    /// Pipe defaults
    pub const GAP_HEIGHT: f32 = 500.0;
    pub const PIPE_WIDTH: f32 = 160.0;
    pub const PIPE_SPEED: f32 = 12.0;
    pub const SPAWN_INTERVAL_TICKS: u32 = 90;
}
