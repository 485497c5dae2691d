//! Shape generation for 2D primitives
//!
//! Every sprite becomes a textured quad (two triangles). UVs address a
//! texture per sprite kind; actor frames sit side by side in one strip.

use super::scene::{Scene, Sprite, SpriteKind};
use super::vertex::{Vertex, colors};
use crate::sim::Rect;

/// Texture coordinates for a sprite: (u0, v0, u1, v1)
fn sprite_uv(sprite: &Sprite) -> (f32, f32, f32, f32) {
    let (u0, u1) = match sprite.kind {
        SpriteKind::Actor { frame, frames } => {
            let frames = frames.max(1) as f32;
            let frame = frame as f32;
            (frame / frames, (frame + 1.0) / frames)
        }
        SpriteKind::Pipe => (0.0, 1.0),
    };
    if sprite.flip_y {
        (u0, 1.0, u1, 0.0)
    } else {
        (u0, 0.0, u1, 1.0)
    }
}

/// Generate vertices for a textured quad
pub fn quad(rect: &Rect, uv: (f32, f32, f32, f32), color: [f32; 4]) -> [Vertex; 6] {
    let (u0, v0, u1, v1) = uv;
    let tl = Vertex::new(rect.left, rect.top, u0, v0, color);
    let tr = Vertex::new(rect.right, rect.top, u1, v0, color);
    let bl = Vertex::new(rect.left, rect.bottom, u0, v1, color);
    let br = Vertex::new(rect.right, rect.bottom, u1, v1, color);
    [tl, bl, tr, tr, bl, br]
}

/// Generate vertices for one sprite; empty rectangles produce nothing
pub fn sprite(sprite: &Sprite) -> Option<[Vertex; 6]> {
    if sprite.rect.is_empty() {
        return None;
    }
    let color = match sprite.kind {
        SpriteKind::Actor { .. } => colors::ACTOR,
        SpriteKind::Pipe => colors::PIPE,
    };
    Some(quad(&sprite.rect, sprite_uv(sprite), color))
}

/// Vertices for every sprite in the scene, grouped by kind so a backend can
/// draw pipes and the actor with one texture bind each.
/// Returns (pipe vertices, actor vertices).
pub fn scene_vertices(scene: &Scene) -> (Vec<Vertex>, Vec<Vertex>) {
    let mut pipes = Vec::with_capacity(scene.sprites.len() * 6);
    let mut actor = Vec::with_capacity(6);
    for s in &scene.sprites {
        let Some(verts) = sprite(s) else { continue };
        match s.kind {
            SpriteKind::Pipe => pipes.extend_from_slice(&verts),
            SpriteKind::Actor { .. } => actor.extend_from_slice(&verts),
        }
    }
    (pipes, actor)
}
