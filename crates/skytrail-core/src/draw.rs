//! Draw commands emitted by the simulations.

use serde::{Deserialize, Serialize};

/// RGB color with a straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Composite this color over an opaque backdrop.
    pub fn over(self, backdrop: Rgba) -> Rgba {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Rgba::rgb(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }
}

/// Placement of a sprite on the surface.
///
/// Equivalent to translating to `(x, y)`, rotating by `rotation`, scaling
/// by `(scale_x, scale_y)` and drawing the image centred at the origin as a
/// `size` by `size` square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteTransform {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub size: f32,
}

impl SpriteTransform {
    /// Map normalized image coordinates (`0.0..=1.0` on both axes, y down)
    /// to surface pixels.
    pub fn apply(&self, u: f32, v: f32) -> (f32, f32) {
        let lx = (u - 0.5) * self.size * self.scale_x;
        let ly = (v - 0.5) * self.size * self.scale_y;
        let (sin, cos) = self.rotation.sin_cos();
        (
            self.x + lx * cos - ly * sin,
            self.y + lx * sin + ly * cos,
        )
    }

    /// Radius of a circle around `(x, y)` that contains the whole sprite.
    pub fn extent(&self) -> f32 {
        let half_w = self.size * self.scale_x.abs() / 2.0;
        let half_h = self.size * self.scale_y.abs() / 2.0;
        (half_w * half_w + half_h * half_h).sqrt()
    }
}

/// A single drawing operation on a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Wipe the surface.
    Clear,
    FillCircle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgba,
    },
    StrokeLine {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgba,
    },
    FillTriangle {
        vertices: [(f32, f32); 3],
        color: Rgba,
    },
    Sprite(SpriteTransform),
}
