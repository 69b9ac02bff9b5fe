//! Paints draw commands onto a ratatui braille canvas.
//!
//! Commands use viewport pixels with y pointing down; the canvas has y
//! pointing up, so every coordinate is flipped on the way in.

use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::canvas::{Context, Line, Painter, Shape};
use skytrail_core::{DrawCommand, Rgba, SpriteTransform, Viewport};

use crate::color::{is_invisible, terminal_color};
use crate::sprite::Sprite;

/// Braille dots per terminal cell, horizontally and vertically.
const DOTS_PER_CELL: (f32, f32) = (2.0, 4.0);

/// Filled disc sampled at dot resolution.
struct Disc {
    x: f64,
    y: f64,
    radius: f64,
    step: (f64, f64),
    color: Color,
}

impl Shape for Disc {
    fn draw(&self, painter: &mut Painter) {
        if let Some((px, py)) = painter.get_point(self.x, self.y) {
            painter.paint(px, py, self.color);
        }

        let r2 = self.radius * self.radius;
        let mut y = self.y - self.radius;
        while y <= self.y + self.radius {
            let mut x = self.x - self.radius;
            while x <= self.x + self.radius {
                let (dx, dy) = (x - self.x, y - self.y);
                if dx * dx + dy * dy <= r2
                    && let Some((px, py)) = painter.get_point(x, y)
                {
                    painter.paint(px, py, self.color);
                }
                x += self.step.0;
            }
            y += self.step.1;
        }
    }
}

fn span(values: [f64; 3]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Filled triangle sampled at dot resolution.
struct FilledTriangle {
    vertices: [(f64, f64); 3],
    step: (f64, f64),
    color: Color,
}

impl FilledTriangle {
    fn contains(&self, x: f64, y: f64) -> bool {
        let [a, b, c] = self.vertices;
        let edge = |p: (f64, f64), q: (f64, f64)| (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0);
        let (d1, d2, d3) = (edge(a, b), edge(b, c), edge(c, a));
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }
}

impl Shape for FilledTriangle {
    fn draw(&self, painter: &mut Painter) {
        let (min_x, max_x) = span(self.vertices.map(|v| v.0));
        let (min_y, max_y) = span(self.vertices.map(|v| v.1));

        let mut y = min_y;
        while y <= max_y {
            let mut x = min_x;
            while x <= max_x {
                if self.contains(x, y)
                    && let Some((px, py)) = painter.get_point(x, y)
                {
                    painter.paint(px, py, self.color);
                }
                x += self.step.0;
            }
            y += self.step.1;
        }
    }
}

/// Visible sprite pixels already placed on the canvas.
struct SpriteStamp {
    dots: Vec<(f64, f64, Color)>,
}

impl Shape for SpriteStamp {
    fn draw(&self, painter: &mut Painter) {
        for &(x, y, color) in &self.dots {
            if let Some((px, py)) = painter.get_point(x, y) {
                painter.paint(px, py, color);
            }
        }
    }
}

/// Maps one surface's draw commands onto a canvas of a given cell area.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePainter<'a> {
    viewport: Viewport,
    backdrop: Rgba,
    /// Size of one braille dot in viewport pixels.
    dot: (f64, f64),
    sprite: Option<&'a Sprite>,
}

impl<'a> SurfacePainter<'a> {
    pub fn new(viewport: Viewport, area: Rect, backdrop: Rgba, sprite: Option<&'a Sprite>) -> Self {
        let cols = (area.width.max(1) as f32) * DOTS_PER_CELL.0;
        let rows = (area.height.max(1) as f32) * DOTS_PER_CELL.1;
        Self {
            viewport,
            backdrop,
            dot: (
                (viewport.width / cols).max(f32::EPSILON) as f64,
                (viewport.height / rows).max(f32::EPSILON) as f64,
            ),
            sprite,
        }
    }

    /// Canvas x bounds matching the viewport.
    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.viewport.width as f64]
    }

    /// Canvas y bounds matching the viewport.
    pub fn y_bounds(&self) -> [f64; 2] {
        [0.0, self.viewport.height as f64]
    }

    /// Viewport pixel to canvas coordinate.
    fn flip(&self, x: f32, y: f32) -> (f64, f64) {
        (x as f64, (self.viewport.height - y) as f64)
    }

    fn sprite_stamp(&self, sprite: &Sprite, transform: &SpriteTransform) -> SpriteStamp {
        let dots = sprite
            .samples()
            .iter()
            .filter(|s| !is_invisible(s.color, self.backdrop))
            .map(|s| {
                let (x, y) = transform.apply(s.u, s.v);
                let (x, y) = self.flip(x, y);
                (x, y, terminal_color(s.color, self.backdrop))
            })
            .collect();
        SpriteStamp { dots }
    }

    /// Paint every command in order; later commands cover earlier ones.
    pub fn paint(&self, ctx: &mut Context, commands: &[DrawCommand]) {
        for command in commands {
            match command {
                // The canvas starts blank every frame; a clear only opens a new layer.
                DrawCommand::Clear => ctx.layer(),
                DrawCommand::FillCircle {
                    x,
                    y,
                    radius,
                    color,
                } => {
                    if is_invisible(*color, self.backdrop) {
                        continue;
                    }
                    let (x, y) = self.flip(*x, *y);
                    ctx.draw(&Disc {
                        x,
                        y,
                        radius: *radius as f64,
                        step: self.dot,
                        color: terminal_color(*color, self.backdrop),
                    });
                }
                DrawCommand::StrokeLine {
                    from, to, color, ..
                } => {
                    let (x1, y1) = self.flip(from.0, from.1);
                    let (x2, y2) = self.flip(to.0, to.1);
                    ctx.draw(&Line {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: terminal_color(*color, self.backdrop),
                    });
                }
                DrawCommand::FillTriangle { vertices, color } => {
                    if is_invisible(*color, self.backdrop) {
                        continue;
                    }
                    ctx.draw(&FilledTriangle {
                        vertices: vertices.map(|(x, y)| self.flip(x, y)),
                        step: self.dot,
                        color: terminal_color(*color, self.backdrop),
                    });
                }
                DrawCommand::Sprite(transform) => {
                    if let Some(sprite) = self.sprite {
                        ctx.draw(&self.sprite_stamp(sprite, transform));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use ratatui::buffer::Buffer;
    use ratatui::symbols::Marker;
    use ratatui::widgets::Widget;
    use ratatui::widgets::canvas::Canvas;

    fn render(commands: &[DrawCommand], sprite: Option<&Sprite>) -> Buffer {
        let area = Rect::new(0, 0, 10, 5);
        let viewport = Viewport::new(80.0, 80.0);
        let painter = SurfacePainter::new(viewport, area, Rgba::BLACK, sprite);
        let mut buf = Buffer::empty(area);
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(painter.x_bounds())
            .y_bounds(painter.y_bounds())
            .paint(|ctx| painter.paint(ctx, commands))
            .render(area, &mut buf);
        buf
    }

    fn colored_cells(buf: &Buffer, color: Color) -> usize {
        buf.content().iter().filter(|cell| cell.fg == color).count()
    }

    #[test]
    fn test_disc_paints_its_color() {
        let buf = render(
            &[
                DrawCommand::Clear,
                DrawCommand::FillCircle {
                    x: 40.0,
                    y: 40.0,
                    radius: 6.0,
                    color: Rgba::WHITE,
                },
            ],
            None,
        );
        assert!(colored_cells(&buf, Color::Rgb(255, 255, 255)) > 0);
    }

    #[test]
    fn test_invisible_smoke_is_skipped() {
        let buf = render(
            &[DrawCommand::FillCircle {
                x: 40.0,
                y: 40.0,
                radius: 6.0,
                color: Rgba::WHITE.with_alpha(0.0),
            }],
            None,
        );
        assert_eq!(colored_cells(&buf, Color::Rgb(0, 0, 0)), 0);
    }

    #[test]
    fn test_triangle_and_line_are_blended() {
        let buf = render(
            &[
                DrawCommand::StrokeLine {
                    from: (0.0, 5.0),
                    to: (80.0, 5.0),
                    width: 0.5,
                    color: Rgba::rgba(180, 180, 180, 0.4),
                },
                DrawCommand::FillTriangle {
                    vertices: [(10.0, 30.0), (70.0, 30.0), (40.0, 75.0)],
                    color: Rgba::rgb(200, 0, 0),
                },
            ],
            None,
        );
        assert!(colored_cells(&buf, Color::Rgb(72, 72, 72)) > 0);
        assert!(colored_cells(&buf, Color::Rgb(200, 0, 0)) > 0);
    }

    #[test]
    fn test_sprite_needs_loaded_asset() {
        let transform = SpriteTransform {
            x: 40.0,
            y: 40.0,
            rotation: 0.0,
            scale_x: 2.5,
            scale_y: 1.5,
            size: 16.0,
        };
        let commands = [DrawCommand::Sprite(transform)];

        let empty = render(&commands, None);
        assert_eq!(colored_cells(&empty, Color::Rgb(0, 200, 255)), 0);

        let image = RgbaImage::from_pixel(4, 4, image::Rgba([0, 200, 255, 255]));
        let sprite = Sprite::from_image(&image).unwrap();
        let drawn = render(&commands, Some(&sprite));
        assert!(colored_cells(&drawn, Color::Rgb(0, 200, 255)) > 0);
    }

    #[test]
    fn test_dot_size_follows_area() {
        let painter = SurfacePainter::new(
            Viewport::new(160.0, 160.0),
            Rect::new(0, 0, 20, 10),
            Rgba::BLACK,
            None,
        );
        assert_eq!(painter.dot, (4.0, 4.0));
        assert_eq!(painter.flip(10.0, 0.0), (10.0, 160.0));
    }
}
