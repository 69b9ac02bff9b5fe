//! Drifting point network with cursor repulsion (stateful).

use rand::Rng;
use rand::rngs::StdRng;
use skytrail_config::{NetworkSettings, UniformRange};
use skytrail_core::{DrawCommand, FrameContext, Pointer, SurfaceId, Viewport};

use super::{Effect, sample, sample_extent};

/// A single drifting vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Which velocity components were reflected during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reflection {
    pub x: bool,
    pub y: bool,
}

impl Point {
    /// Move by the velocity and bounce off the viewport edges.
    pub fn advance(&mut self, viewport: Viewport) -> Reflection {
        self.x += self.vx;
        self.y += self.vy;

        let mut reflected = Reflection::default();
        if self.x < 0.0 {
            self.x = 0.0;
            self.vx = -self.vx;
            reflected.x = true;
        } else if self.x > viewport.width {
            self.x = viewport.width;
            self.vx = -self.vx;
            reflected.x = true;
        }

        if self.y < 0.0 {
            self.y = 0.0;
            self.vy = -self.vy;
            reflected.y = true;
        } else if self.y > viewport.height {
            self.y = viewport.height;
            self.vy = -self.vy;
            reflected.y = true;
        }

        reflected
    }

    pub fn distance_to(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Three distinct point indices filled with a faint shade.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [usize; 3],
    pub opacity: f32,
}

/// Number of points for a viewport at the given density.
pub fn point_count(viewport: Viewport, density: f64) -> usize {
    let count = viewport.width as f64 * viewport.height as f64 * density;
    if count > 0.0 { count.floor() as usize } else { 0 }
}

/// Displacement pushing a point at `(x, y)` away from `pointer`.
///
/// Zero at or beyond `radius`; `strength` at the pointer itself, where the
/// push points along +x.
pub fn repulsion(x: f32, y: f32, pointer: (f32, f32), radius: f32, strength: f32) -> (f32, f32) {
    let dx = x - pointer.0;
    let dy = y - pointer.1;
    let distance = dx.hypot(dy);
    if distance >= radius {
        return (0.0, 0.0);
    }

    let force = (radius - distance) / radius * strength;
    if distance == 0.0 {
        (force, 0.0)
    } else {
        (dx / distance * force, dy / distance * force)
    }
}

/// Every unordered pair of points closer than `max_distance`.
pub fn connections(points: &[Point], max_distance: f32) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in points.iter().enumerate() {
        for (j, b) in points.iter().enumerate().skip(i + 1) {
            if a.distance_to(b) < max_distance {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Pick up to `count` triangles, each anchored on a random point and closed
/// by two distinct neighbours within `max_distance` of it.
///
/// Anchors with fewer than two neighbours are skipped.
pub fn build_triangles<R: Rng>(
    points: &[Point],
    count: usize,
    max_distance: f32,
    opacity: UniformRange,
    rng: &mut R,
) -> Vec<Triangle> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut triangles = Vec::with_capacity(count);
    for _ in 0..count {
        let anchor = rng.gen_range(0..points.len());
        let nearby: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|&(i, p)| i != anchor && p.distance_to(&points[anchor]) < max_distance)
            .map(|(i, _)| i)
            .collect();

        if nearby.len() < 2 {
            continue;
        }

        let second = nearby[rng.gen_range(0..nearby.len())];
        let third = loop {
            let candidate = nearby[rng.gen_range(0..nearby.len())];
            if candidate != second {
                break candidate;
            }
        };

        triangles.push(Triangle {
            vertices: [anchor, second, third],
            opacity: sample(rng, opacity),
        });
    }
    triangles
}

/// The network effect: points, the triangles between them and the pointer.
#[derive(Debug)]
pub struct PointNetwork {
    settings: NetworkSettings,
    viewport: Viewport,
    points: Vec<Point>,
    triangles: Vec<Triangle>,
    pointer: Pointer,
}

impl PointNetwork {
    pub fn new(settings: NetworkSettings) -> Self {
        Self {
            settings,
            viewport: Viewport::default(),
            points: Vec::new(),
            triangles: Vec::new(),
            pointer: Pointer::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Pointer moved to `(x, y)` in viewport pixels.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer.move_to(x, y);
    }

    /// Pointer left the surface; repulsion stops until it returns.
    pub fn clear_pointer(&mut self) {
        self.pointer.leave();
    }

    /// Upper bound on triangles for the current point count.
    pub fn requested_triangles(&self) -> usize {
        (self.points.len() as f64 * self.settings.triangle_fraction).floor() as usize
    }

    /// Discard all points and triangles and generate new ones.
    pub fn seed<R: Rng>(&mut self, viewport: Viewport, rng: &mut R) {
        let s = &self.settings;
        self.viewport = viewport;
        self.points = (0..point_count(viewport, s.density))
            .map(|_| Point {
                x: sample_extent(rng, viewport.width),
                y: sample_extent(rng, viewport.height),
                radius: sample(rng, s.radius),
                vx: sample(rng, s.velocity),
                vy: sample(rng, s.velocity),
            })
            .collect();

        self.triangles = build_triangles(
            &self.points,
            self.requested_triangles(),
            self.settings.connection_distance,
            self.settings.triangle_opacity,
            rng,
        );
    }

    /// Move every point one frame, including pointer repulsion.
    pub fn step(&mut self) {
        let viewport = self.viewport;
        let pointer = self.pointer.position();
        let radius = self.settings.repulsion_radius;
        let strength = self.settings.repulsion_strength;

        for point in &mut self.points {
            point.advance(viewport);

            if let Some(pointer) = pointer {
                let (dx, dy) = repulsion(point.x, point.y, pointer, radius, strength);
                (point.x, point.y) = viewport.clamp(point.x + dx, point.y + dy);
            }
        }
    }
}

impl Effect for PointNetwork {
    fn surface(&self) -> SurfaceId {
        SurfaceId::Network
    }

    fn resize(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.seed(viewport, rng);
        log::info!(
            "{}: seeded {} points and {} triangles",
            self.surface().element_id(),
            self.points.len(),
            self.triangles.len()
        );
    }

    fn tick(&mut self, _ctx: &FrameContext) -> Vec<DrawCommand> {
        self.step();

        let s = &self.settings;
        let pairs = connections(&self.points, s.connection_distance);
        let mut commands =
            Vec::with_capacity(1 + pairs.len() + self.triangles.len() + self.points.len());
        commands.push(DrawCommand::Clear);

        commands.extend(pairs.into_iter().map(|(a, b)| {
            let (a, b) = (&self.points[a], &self.points[b]);
            DrawCommand::StrokeLine {
                from: (a.x, a.y),
                to: (b.x, b.y),
                width: s.line_width,
                color: s.line_color,
            }
        }));

        commands.extend(self.triangles.iter().map(|triangle| {
            let [a, b, c] = triangle.vertices.map(|i| (self.points[i].x, self.points[i].y));
            DrawCommand::FillTriangle {
                vertices: [a, b, c],
                color: s.triangle_color.with_alpha(triangle.opacity),
            }
        }));

        commands.extend(self.points.iter().map(|p| DrawCommand::FillCircle {
            x: p.x,
            y: p.y,
            radius: p.radius,
            color: s.point_color,
        }));

        commands
    }
}
