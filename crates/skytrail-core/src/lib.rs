//! Core types shared by the skytrail crates.
//!
//! Simulations speak in viewport pixels (origin top-left, y down) and emit
//! [`DrawCommand`]s; the renderer decides how those reach a surface.

mod draw;
mod effect;
mod viewport;

pub use draw::{DrawCommand, Rgba, SpriteTransform};
pub use effect::{EffectSelection, SurfaceId};
pub use viewport::{FrameContext, Pointer, Viewport};
