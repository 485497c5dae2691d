//! Rendering boundary
//!
//! The core does not draw. Each frame the scheduler hands the host's
//! [`Renderer`] a read-only view of the state; [`scene`] turns that view into
//! a backend-neutral description and [`shapes`] tessellates it for a GPU.

pub mod scene;
pub mod shapes;
pub mod vertex;

pub use scene::{Overlay, Scene, Sprite, SpriteKind};
pub use vertex::Vertex;

use crate::sim::SimulationState;

/// Draws one consistent post-tick state. Must not keep references across frames.
pub trait Renderer: Send {
    fn render(&mut self, state: &SimulationState);
}

impl<F> Renderer for F
where
    F: FnMut(&SimulationState) + Send,
{
    fn render(&mut self, state: &SimulationState) {
        self(state)
    }
}

/// Renderer that draws nothing (headless simulation)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &SimulationState) {}
}
