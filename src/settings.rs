//! Game settings
//!
//! Everything tunable about a session lives here: screen geometry, actor
//! physics, pipe layout, spawn cadence and loop pacing. Settings are plain
//! serde data so a host can ship them as JSON next to its assets.

use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Which counter drives the pipe spawn check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnCadence {
    /// Dedicated spawn counter, one pipe every `spawn_interval` ticks
    #[default]
    Independent,
    /// Legacy cadence: `animation counter % spawn_interval == 0`.
    /// The animation counter wraps every `frame_period` ticks, so this spawns
    /// far more often than the interval suggests.
    AnimationCounter,
}

impl SpawnCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnCadence::Independent => "independent",
            SpawnCadence::AnimationCounter => "animation-counter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "independent" => Some(SpawnCadence::Independent),
            "animation-counter" | "animation" | "legacy" => Some(SpawnCadence::AnimationCounter),
            _ => None,
        }
    }
}

/// How the loop driver deals with frames that overrun the tick budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Pacing {
    /// One tick per frame, sleep off the rest of the budget.
    /// Overruns are not compensated; the game slows down under load.
    #[default]
    Sleep,
    /// Accumulate wall time and run up to `max_substeps` ticks per frame
    FixedStep { max_substeps: u32 },
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Actor ===
    /// Fixed horizontal position of the actor's left edge
    pub actor_x: f32,
    /// Vertical position on session start and after a reset
    pub actor_start_y: f32,
    /// Hit box size (every animation frame shares it)
    pub actor_width: f32,
    pub actor_height: f32,
    pub frame_count: u32,
    /// Ticks per animation frame
    pub frame_period: u32,
    /// Added to vertical velocity every tick (pixels/tick²)
    pub gravity: f32,
    /// Velocity set by a flap (negative is up)
    pub impulse: f32,

    // === Pipes ===
    pub gap_height: f32,
    pub pipe_width: f32,
    /// Horizontal scroll per tick
    pub pipe_speed: f32,
    pub spawn_interval: u32,
    pub spawn_cadence: SpawnCadence,

    // === Loop ===
    pub tick_rate: u32,
    pub pacing: Pacing,
    /// Seed for gap placement
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            actor_x: ACTOR_X,
            actor_start_y: ACTOR_START_Y,
            actor_width: ACTOR_WIDTH,
            actor_height: ACTOR_HEIGHT,
            frame_count: ACTOR_FRAME_COUNT,
            frame_period: FRAME_PERIOD_TICKS,
            gravity: GRAVITY,
            impulse: IMPULSE,

            gap_height: GAP_HEIGHT,
            pipe_width: PIPE_WIDTH,
            pipe_speed: PIPE_SPEED,
            spawn_interval: SPAWN_INTERVAL_TICKS,
            spawn_cadence: SpawnCadence::Independent,

            tick_rate: TICK_RATE,
            pacing: Pacing::Sleep,
            seed: 0x7ef1_1e5e,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the loop cannot run with at all.
    ///
    /// Gap fit is not checked here: the screen can be resized at runtime, so
    /// the spawner checks it against the current size (see [`Settings::check_gap`]).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(positive(self.screen_width) && positive(self.screen_height)) {
            return Err(ConfigError::ScreenSize {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if !(positive(self.actor_width) && positive(self.actor_height)) {
            return Err(ConfigError::ActorSize {
                width: self.actor_width,
                height: self.actor_height,
            });
        }
        if !positive(self.gap_height) {
            return Err(ConfigError::GapHeight(self.gap_height));
        }
        if self.frame_count == 0 {
            return Err(ConfigError::ZeroField("frame_count"));
        }
        if self.frame_period == 0 {
            return Err(ConfigError::ZeroField("frame_period"));
        }
        if self.spawn_interval == 0 {
            return Err(ConfigError::ZeroField("spawn_interval"));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroField("tick_rate"));
        }
        if let Pacing::FixedStep { max_substeps: 0 } = self.pacing {
            return Err(ConfigError::ZeroField("max_substeps"));
        }
        Ok(())
    }

    /// Whether a gap of `gap_height` can be placed on a screen `screen_height` tall.
    /// Non-finite sizes never fit.
    pub fn check_gap(screen_height: f32, gap_height: f32) -> Result<(), ConfigError> {
        if screen_height.is_finite()
            && gap_height.is_finite()
            && screen_height > 2.0 * gap_height
        {
            Ok(())
        } else {
            Err(ConfigError::GapTooLarge {
                screen_height,
                gap_height,
            })
        }
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    pub fn actor_size(&self) -> Vec2 {
        Vec2::new(self.actor_width, self.actor_height)
    }

    /// Wall time budget for one tick + render
    pub fn tick_budget(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.tick_rate.max(1) as u64)
    }
}

/// Finite and above zero; NaN and infinities fail
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
