//! Fixed timestep simulation tick
//!
//! Advances a [`SimulationState`] by exactly one tick. Step order is fixed:
//! input, physics, animation, spawn, scroll, collision, scoring, removal,
//! boundary clamp.

use serde::{Deserialize, Serialize};

use super::field::SpawnOutcome;
use super::state::{GameEvent, PipeLayout, SimulationState};
use crate::settings::{Settings, SpawnCadence};

/// Player command consumed at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Flap
    Impulse,
    /// Restart a finished session
    Reset,
    /// Whatever a touch means right now: flap while alive, reset when over
    Tap,
}

impl Command {
    /// Resolve [`Command::Tap`] against the terminal flag
    pub fn resolve(self, terminal: bool) -> Command {
        match self {
            Command::Tap if terminal => Command::Reset,
            Command::Tap => Command::Impulse,
            other => other,
        }
    }
}

/// Fixed per-session rules the simulator applies every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    pub frame_period: u32,
    pub spawn_interval: u32,
    pub spawn_cadence: SpawnCadence,
    pub pipes: PipeLayout,
}

impl Rules {
    pub fn new(settings: &Settings) -> Self {
        Self {
            frame_period: settings.frame_period.max(1),
            spawn_interval: settings.spawn_interval.max(1),
            spawn_cadence: settings.spawn_cadence,
            pipes: PipeLayout::new(settings),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

/// Advance the game state by one tick.
///
/// Never fails: the only fallible step (placing a gap) turns into a
/// [`GameEvent::SpawnSuspended`] notification. Events are appended to `events`.
pub fn tick(
    state: &mut SimulationState,
    input: Option<Command>,
    rules: &Rules,
    events: &mut Vec<GameEvent>,
) {
    let command = input.map(|c| c.resolve(state.terminal));

    // World is frozen once the session is over; only a reset moves it
    if state.terminal {
        if command == Some(Command::Reset) {
            state.reset();
            events.push(GameEvent::Restarted);
            log::info!("Session reset");
        }
        return;
    }

    state.ticks += 1;

    // Flap overrides the current fall instead of adding to it
    let flapped = command == Some(Command::Impulse);
    if flapped {
        state.actor.flap();
        events.push(GameEvent::Impulse);
    }
    state.actor.integrate(flapped);
    state.actor.advance_animation(rules.frame_period);

    let spawn_due = match rules.spawn_cadence {
        SpawnCadence::Independent => state.field.spawn_due(rules.spawn_interval),
        SpawnCadence::AnimationCounter => state.actor.frame_ticks % rules.spawn_interval == 0,
    };
    if spawn_due {
        spawn(state, rules, events);
    }

    state.field.advance_all();

    // One crash per tick, however many pipes overlap the actor
    let bounds = state.actor.bounds();
    if state.field.iter().any(|o| o.collides_with(&bounds)) {
        end_session(state, events);
    }

    let actor_x = state.actor.pos.x;
    for obstacle in state.field.iter_mut() {
        if obstacle.try_score(actor_x) {
            state.score += 1;
            events.push(GameEvent::Scored { score: state.score });
        }
    }

    let removed = state.field.remove_off_screen();
    if removed > 0 {
        log::trace!("Removed {removed} off-screen pipes");
    }

    // Ceiling stops the actor; touching the floor ends the session
    if state.actor.pos.y < 0.0 {
        state.actor.pos.y = 0.0;
    }
    let max_y = state.actor.max_y(state.screen.y);
    if state.actor.pos.y >= max_y {
        state.actor.pos.y = max_y;
        end_session(state, events);
    }
}

fn spawn(state: &mut SimulationState, rules: &Rules, events: &mut Vec<GameEvent>) {
    match state.field.spawn(&mut state.rng, state.screen, &rules.pipes) {
        SpawnOutcome::Spawned { id, resumed } => {
            if resumed {
                log::info!("Pipe spawning resumed");
                events.push(GameEvent::SpawnResumed);
            }
            log::trace!("Spawned pipe {id}");
        }
        SpawnOutcome::Suspended {
            first: true,
            screen_height,
            gap_height,
        } => events.push(GameEvent::SpawnSuspended {
            screen_height,
            gap_height,
        }),
        SpawnOutcome::Suspended { first: false, .. } => {}
    }
}

fn end_session(state: &mut SimulationState, events: &mut Vec<GameEvent>) {
    if state.terminal {
        return;
    }
    state.terminal = true;
    events.push(GameEvent::Crash { score: state.score });
    log::info!("Game over after {} ticks, score {}", state.ticks, state.score);
}

/// Owns the rules and runs ticks against a state
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    rules: Rules,
}

impl Simulator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            rules: Rules::new(settings),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Run one tick and return the notifications it produced
    pub fn tick(&self, state: &mut SimulationState, input: Option<Command>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        tick(state, input, &self.rules, &mut events);
        events
    }
}
