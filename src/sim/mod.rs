//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call, no wall-clock time
//! - Seeded RNG only
//! - Pipes iterated in spawn order
//! - No rendering or platform dependencies

pub mod field;
pub mod rect;
pub mod state;
pub mod tick;

pub use field::{ObstacleField, SpawnOutcome};
pub use rect::Rect;
pub use state::{Actor, GameEvent, Obstacle, PipeLayout, SimulationState};
pub use tick::{Command, Rules, Simulator, tick};
