//! Drawable scene description
//!
//! A [`Scene`] is what a frame looks like, in screen pixels, without saying
//! how to draw it: which sprites go where, in back-to-front order, plus the
//! HUD text and which overlay (title / game over) is up.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vertex::colors;
use crate::sim::{Rect, SimulationState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    /// The flyer, showing animation frame `frame` of `frames`
    Actor { frame: u32, frames: u32 },
    Pipe,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub rect: Rect,
    /// Draw the texture upside down (top pipes)
    pub flip_y: bool,
}

/// Screen-wide message on top of the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    /// Fresh session, nothing simulated yet
    Title,
    GameOver,
    None,
}

impl Overlay {
    pub fn lines(&self) -> &'static [&'static str] {
        match self {
            Overlay::Title => &["Tap to start"],
            Overlay::GameOver => &["GAME OVER", "Tap to restart"],
            Overlay::None => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub screen: Vec2,
    pub background: [f32; 4],
    /// Back to front: pipes in spawn order, then the actor
    pub sprites: Vec<Sprite>,
    pub score: u64,
    pub overlay: Overlay,
}

impl Scene {
    pub fn from_state(state: &SimulationState) -> Self {
        let mut sprites = Vec::with_capacity(state.field.len() * 2 + 1);
        for obstacle in state.field.iter() {
            sprites.push(Sprite {
                kind: SpriteKind::Pipe,
                rect: obstacle.top_pipe(),
                flip_y: true,
            });
            sprites.push(Sprite {
                kind: SpriteKind::Pipe,
                rect: obstacle.bottom_pipe(),
                flip_y: false,
            });
        }
        sprites.push(Sprite {
            kind: SpriteKind::Actor {
                frame: state.actor.frame_index,
                frames: state.actor.frame_count,
            },
            rect: state.actor.bounds(),
            flip_y: false,
        });

        let overlay = if state.terminal {
            Overlay::GameOver
        } else if state.ticks == 0 {
            Overlay::Title
        } else {
            Overlay::None
        };

        Self {
            screen: state.screen,
            background: colors::SKY,
            sprites,
            score: state.score,
            overlay,
        }
    }

    pub fn hud_text(&self) -> String {
        format!("Score: {}", self.score)
    }
}
