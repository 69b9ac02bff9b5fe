//! Per-frame simulations.
//!
//! Each effect owns its entities, re-seeds on resize and turns one `tick`
//! into a list of draw commands for its surface.

pub mod airplanes;
pub mod network;

use rand::Rng;
use rand::rngs::StdRng;
use skytrail_config::UniformRange;
use skytrail_core::{DrawCommand, FrameContext, SurfaceId, Viewport};

/// A self-contained animation bound to one surface.
pub trait Effect {
    /// Surface this effect draws on.
    fn surface(&self) -> SurfaceId;

    /// Capture new viewport dimensions and re-seed every entity.
    fn resize(&mut self, viewport: Viewport, rng: &mut StdRng);

    /// Advance one frame and return what to draw.
    fn tick(&mut self, ctx: &FrameContext) -> Vec<DrawCommand>;
}

/// Sample `[range.min, range.max)`.
pub(crate) fn sample<R: Rng>(rng: &mut R, range: UniformRange) -> f32 {
    rng.gen_range(range.min..range.max)
}

/// Sample `[0, extent)`, or 0 for an empty extent.
pub(crate) fn sample_extent<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.gen_range(0.0..extent)
    } else {
        0.0
    }
}
