//! Error types
//!
//! The simulation itself is total; only configuration and the loop driver's
//! lifecycle can fail.

use thiserror::Error;

/// Invalid or unreadable settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("screen size must be positive and finite, got {width}x{height}")]
    ScreenSize { width: f32, height: f32 },

    #[error("actor size must be positive and finite, got {width}x{height}")]
    ActorSize { width: f32, height: f32 },

    #[error("gap height must be positive and finite, got {0}")]
    GapHeight(f32),

    #[error("`{0}` must be non-zero")]
    ZeroField(&'static str),

    /// The gap centre range `[gap, height - gap)` is empty
    #[error("screen height {screen_height} leaves no room for a {gap_height} gap")]
    GapTooLarge { screen_height: f32, gap_height: f32 },
}

/// Loop driver lifecycle errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("the game loop is already running")]
    AlreadyRunning,

    #[error("failed to spawn the game loop thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("the game loop thread panicked")]
    WorkerPanicked,
}
