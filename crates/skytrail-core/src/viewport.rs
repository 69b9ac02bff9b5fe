//! Viewport geometry, per-frame context and pointer tracking.

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether the point lies inside the viewport, edges included.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// Clamp a point into the viewport.
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (x.clamp(0.0, self.width), y.clamp(0.0, self.height))
    }
}

/// Information handed to every `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameContext {
    /// Wall-clock milliseconds since the animation started.
    pub now_ms: u64,
    /// Whether the sprite asset has finished loading, polled once per frame.
    pub sprite_ready: bool,
}

impl FrameContext {
    pub const fn at(now_ms: u64) -> Self {
        Self {
            now_ms,
            sprite_ready: false,
        }
    }

    pub const fn with_sprite_ready(self, sprite_ready: bool) -> Self {
        Self {
            sprite_ready,
            ..self
        }
    }
}

/// Last known cursor position, or absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pointer {
    position: Option<(f32, f32)>,
}

impl Pointer {
    /// Record a pointer move.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = Some((x, y));
    }

    /// The pointer left the surface.
    pub fn leave(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_clamp() {
        let vp = Viewport::new(100.0, 50.0);
        assert_eq!(vp.clamp(-3.0, 70.0), (0.0, 50.0));
        assert_eq!(vp.clamp(20.0, 10.0), (20.0, 10.0));
        assert!(vp.contains(100.0, 0.0));
        assert!(!vp.contains(100.5, 0.0));
    }

    #[test]
    fn test_pointer_move_and_leave() {
        let mut pointer = Pointer::default();
        assert!(!pointer.is_present());

        pointer.move_to(4.0, 8.0);
        assert_eq!(pointer.position(), Some((4.0, 8.0)));

        pointer.leave();
        assert_eq!(pointer.position(), None);
    }
}
