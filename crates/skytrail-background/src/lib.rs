//! Animated backgrounds for skytrail.
//!
//! Two independent effects, each drawing on its own surface:
//! a flock of airplanes trailing fading smoke, and a drifting point network
//! joined by lines and faint triangles that shies away from the pointer.
//! Simulations emit draw commands; [`render`] paints them onto a ratatui
//! braille canvas.

pub mod animations;
mod color;
pub mod render;
pub mod sprite;
mod state;

pub use animations::Effect;
pub use animations::airplanes::{Airplane, AirplaneField, SmokeDot, smoke_opacity};
pub use animations::network::{
    Point, PointNetwork, Reflection, Triangle, build_triangles, connections, point_count,
    repulsion,
};
pub use color::terminal_color;
pub use sprite::{Sprite, SpriteError, SpriteLoader};
pub use state::{BackgroundState, SurfaceFrame};
