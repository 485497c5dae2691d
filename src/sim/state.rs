//! Game state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives in [`SimulationState`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::ObstacleField;
use super::rect::Rect;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Notifications emitted by a tick for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A flap was applied
    Impulse,
    /// The session ended (pipe or floor). At most one per tick.
    Crash { score: u64 },
    /// A pipe was passed
    Scored { score: u64 },
    /// A terminal session was reset
    Restarted,
    /// Spawning stopped because the gap does not fit the screen
    SpawnSuspended { screen_height: f32, gap_height: f32 },
    /// Spawning works again after a suspension
    SpawnResumed,
}

/// The player-controlled flyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub vel: f32,
    pub gravity: f32,
    /// Velocity a flap sets (negative is up)
    pub impulse: f32,
    /// Hit box size
    pub size: Vec2,
    pub frame_index: u32,
    pub frame_count: u32,
    /// Ticks since the last frame change; wraps at the frame period
    pub frame_ticks: u32,
    start_y: f32,
}

impl Actor {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pos: Vec2::new(settings.actor_x, settings.actor_start_y),
            vel: 0.0,
            gravity: settings.gravity,
            impulse: settings.impulse,
            size: settings.actor_size(),
            frame_index: 0,
            frame_count: settings.frame_count.max(1),
            frame_ticks: 0,
            start_y: settings.actor_start_y,
        }
    }

    /// Current hit box
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Set velocity to the impulse. Absolute, not added to the current fall.
    pub fn flap(&mut self) {
        self.vel = self.impulse;
    }

    /// One semi-implicit Euler step. Gravity is skipped on the tick of a flap
    /// so the flap velocity is exactly the impulse.
    pub fn integrate(&mut self, flapped: bool) {
        if !flapped {
            self.vel += self.gravity;
        }
        self.pos.y += self.vel;
    }

    /// Count a tick toward the animation; step the frame every `frame_period`
    pub fn advance_animation(&mut self, frame_period: u32) {
        self.frame_ticks += 1;
        if self.frame_ticks >= frame_period {
            self.frame_index = (self.frame_index + 1) % self.frame_count;
            self.frame_ticks = 0;
        }
    }

    /// Lowest y the actor may reach
    pub fn max_y(&self, screen_height: f32) -> f32 {
        (screen_height - self.size.y).max(0.0)
    }

    /// Back to the start position, at rest, first frame
    pub fn reset(&mut self) {
        self.pos.y = self.start_y;
        self.vel = 0.0;
        self.frame_index = 0;
        self.frame_ticks = 0;
    }
}

/// Pipe geometry shared by every spawned obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeLayout {
    pub gap_height: f32,
    pub width: f32,
    pub speed: f32,
}

impl PipeLayout {
    pub fn new(settings: &Settings) -> Self {
        Self {
            gap_height: settings.gap_height,
            width: settings.pipe_width,
            speed: settings.pipe_speed,
        }
    }
}

/// A pipe pair with a gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Vertical centre of the gap, fixed at spawn
    pub gap_center: f32,
    pub gap_height: f32,
    pub width: f32,
    pub speed: f32,
    /// Bottom of the screen at spawn time; the bottom pipe reaches down to it
    pub floor: f32,
    pub scored: bool,
}

impl Obstacle {
    /// New pipe at the right screen edge with a gap centre drawn uniformly
    /// from `[gap_height, screen_height - gap_height)`.
    pub fn spawn<R: Rng>(
        rng: &mut R,
        id: u32,
        screen: Vec2,
        layout: &PipeLayout,
    ) -> Result<Self, ConfigError> {
        Settings::check_gap(screen.y, layout.gap_height)?;
        let gap_center = rng.random_range(layout.gap_height..screen.y - layout.gap_height);
        Ok(Self {
            id,
            x: screen.x,
            gap_center,
            gap_height: layout.gap_height,
            width: layout.width,
            speed: layout.speed,
            floor: screen.y,
            scored: false,
        })
    }

    /// Scroll left by one tick
    pub fn advance(&mut self) {
        self.x -= self.speed;
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn top_pipe(&self) -> Rect {
        Rect::new(self.x, 0.0, self.right_edge(), self.gap_center - self.gap_height / 2.0)
    }

    pub fn bottom_pipe(&self) -> Rect {
        Rect::new(
            self.x,
            self.gap_center + self.gap_height / 2.0,
            self.right_edge(),
            self.floor,
        )
    }

    pub fn collides_with(&self, bounds: &Rect) -> bool {
        bounds.intersects(&self.top_pipe()) || bounds.intersects(&self.bottom_pipe())
    }

    /// Fully left of the screen
    pub fn is_off_screen(&self) -> bool {
        self.right_edge() < 0.0
    }

    /// Mark as scored if the trailing edge is behind `actor_x`.
    /// Returns true only on the tick the flag flips.
    pub fn try_score(&mut self, actor_x: f32) -> bool {
        if self.scored || self.right_edge() >= actor_x {
            return false;
        }
        self.scored = true;
        true
    }
}

/// The whole world for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Seed the gap RNG started from
    pub seed: u64,
    pub rng: Pcg32,
    /// Screen size in pixels
    pub screen: Vec2,
    pub actor: Actor,
    pub field: ObstacleField,
    pub score: u64,
    /// Game over; only a reset clears it
    pub terminal: bool,
    /// Ticks simulated since the session (re)started
    pub ticks: u64,
}

impl SimulationState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            screen: settings.screen_size(),
            actor: Actor::new(settings),
            field: ObstacleField::new(),
            score: 0,
            terminal: false,
            ticks: 0,
        }
    }

    /// Start over: actor back home, no pipes, zero score, alive.
    /// The RNG keeps running so the next session gets fresh gaps.
    pub fn reset(&mut self) {
        self.actor.reset();
        self.field.clear();
        self.score = 0;
        self.terminal = false;
        self.ticks = 0;
    }

    /// Apply a new screen size (surface resized). Takes effect on the next tick.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.screen = Vec2::new(width, height);
        let max_y = self.actor.max_y(height);
        if self.actor.pos.y > max_y {
            self.actor.pos.y = max_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PipeLayout {
        PipeLayout {
            gap_height: 500.0,
            width: 160.0,
            speed: 12.0,
        }
    }

    fn obstacle_at(x: f32, gap_center: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            gap_center,
            gap_height: 500.0,
            width: 160.0,
            speed: 12.0,
            floor: 1200.0,
            scored: false,
        }
    }

    #[test]
    fn test_gravity_then_flap() {
        let mut actor = Actor::new(&Settings::default());
        actor.integrate(false);
        assert!((actor.vel - 1.2).abs() < 1e-5);
        assert!((actor.pos.y - 501.2).abs() < 1e-4);

        actor.flap();
        actor.integrate(true);
        assert_eq!(actor.vel, -25.0);
        assert!((actor.pos.y - 476.2).abs() < 1e-4);
    }

    #[test]
    fn test_animation_wraps() {
        let mut actor = Actor::new(&Settings::default());
        for _ in 0..4 {
            actor.advance_animation(5);
        }
        assert_eq!(actor.frame_index, 0);
        assert_eq!(actor.frame_ticks, 4);

        actor.advance_animation(5);
        assert_eq!(actor.frame_index, 1);
        assert_eq!(actor.frame_ticks, 0);

        for _ in 0..15 {
            actor.advance_animation(5);
        }
        assert_eq!(actor.frame_index, 0); // 4 frames, wrapped
    }

    #[test]
    fn test_spawn_gap_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let screen = Vec2::new(800.0, 1200.0);
        for id in 0..200 {
            let obs = Obstacle::spawn(&mut rng, id, screen, &layout()).unwrap();
            assert_eq!(obs.x, 800.0);
            assert!(obs.gap_center >= 500.0 && obs.gap_center < 700.0);
            assert!(obs.top_pipe().bottom < obs.bottom_pipe().top);
            assert!(!obs.scored);
        }
    }

    #[test]
    fn test_spawn_rejects_tight_screen() {
        let mut rng = Pcg32::seed_from_u64(7);
        let result = Obstacle::spawn(&mut rng, 1, Vec2::new(800.0, 1000.0), &layout());
        assert!(matches!(result, Err(ConfigError::GapTooLarge { .. })));
    }

    #[test]
    fn test_spawn_rejects_non_finite_screen() {
        let mut rng = Pcg32::seed_from_u64(7);
        for height in [f32::NAN, f32::INFINITY] {
            let result = Obstacle::spawn(&mut rng, 1, Vec2::new(800.0, height), &layout());
            assert!(matches!(result, Err(ConfigError::GapTooLarge { .. })));
        }
    }

    #[test]
    fn test_pipe_rects() {
        let obs = obstacle_at(300.0, 600.0);
        assert_eq!(obs.top_pipe(), Rect::new(300.0, 0.0, 460.0, 350.0));
        assert_eq!(obs.bottom_pipe(), Rect::new(300.0, 850.0, 460.0, 1200.0));
    }

    #[test]
    fn test_actor_in_gap_does_not_collide() {
        let obs = obstacle_at(150.0, 600.0);
        let inside = Rect::new(200.0, 500.0, 320.0, 600.0);
        assert!(!obs.collides_with(&inside));

        let clipping_top = Rect::new(200.0, 300.0, 320.0, 400.0);
        assert!(obs.collides_with(&clipping_top));

        let clipping_bottom = Rect::new(200.0, 800.0, 320.0, 900.0);
        assert!(obs.collides_with(&clipping_bottom));
    }

    #[test]
    fn test_scores_once() {
        let mut obs = obstacle_at(100.0, 600.0);
        assert!(!obs.try_score(200.0)); // right edge 260 not yet past
        obs.x = 30.0;
        assert!(obs.try_score(200.0));
        assert!(!obs.try_score(200.0));
        assert!(obs.scored);
    }

    #[test]
    fn test_off_screen_threshold() {
        let mut obs = obstacle_at(-160.0, 600.0);
        assert!(!obs.is_off_screen()); // right edge exactly 0
        obs.advance();
        assert!(obs.is_off_screen());
    }

    #[test]
    fn test_reset_restores_start() {
        let settings = Settings::default();
        let mut state = SimulationState::new(&settings);
        state.actor.pos.y = 42.0;
        state.actor.vel = 9.0;
        state.actor.frame_index = 3;
        state.score = 5;
        state.terminal = true;
        state.ticks = 100;

        state.reset();
        assert_eq!(state.actor.pos.y, 500.0);
        assert_eq!(state.actor.vel, 0.0);
        assert_eq!(state.actor.frame_index, 0);
        assert_eq!(state.score, 0);
        assert!(!state.terminal);
        assert_eq!(state.ticks, 0);
        assert!(state.field.is_empty());
    }

    #[test]
    fn test_viewport_shrink_pulls_actor_up() {
        let mut state = SimulationState::new(&Settings::default());
        state.set_viewport(800.0, 400.0);
        assert_eq!(state.screen, Vec2::new(800.0, 400.0));
        assert_eq!(state.actor.pos.y, 300.0);
    }
}
