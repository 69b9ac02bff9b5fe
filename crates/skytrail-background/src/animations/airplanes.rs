//! Airplane flock with fading smoke trails (stateful).

use std::f32::consts::TAU;

use rand::Rng;
use rand::rngs::StdRng;
use skytrail_config::AirplaneSettings;
use skytrail_core::{DrawCommand, FrameContext, SpriteTransform, SurfaceId, Viewport};

use super::{Effect, sample, sample_extent};

/// A fading mark left behind an airplane.
#[derive(Debug, Clone, PartialEq)]
pub struct SmokeDot {
    pub x: f32,
    pub y: f32,
    /// Frame time at which the dot was emitted.
    pub created_ms: u64,
    pub size: f32,
}

impl SmokeDot {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_ms)
    }
}

/// Opacity of a smoke dot of the given age: 1 when fresh, 0 at `duration_ms`.
pub fn smoke_opacity(age_ms: u64, duration_ms: u64) -> f32 {
    if age_ms >= duration_ms {
        0.0
    } else {
        1.0 - age_ms as f32 / duration_ms as f32
    }
}

/// Wrap a coordinate across an axis of length `extent` with `margin` overscan.
fn wrap(value: f32, extent: f32, margin: f32) -> f32 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

/// State for a single airplane.
#[derive(Debug, Clone)]
pub struct Airplane {
    pub x: f32,
    pub y: f32,
    /// Current heading in radians.
    pub angle: f32,
    size: f32,
    speed: f32,
    rotation_speed: f32,
    smoke: Vec<SmokeDot>,
    last_smoke_ms: Option<u64>,
    /// Distance travelled since the last smoke dot.
    smoke_distance: f32,
}

impl Airplane {
    pub fn new(x: f32, y: f32, size: f32, speed: f32, angle: f32, rotation_speed: f32) -> Self {
        Self {
            x,
            y,
            angle,
            size,
            speed,
            rotation_speed,
            smoke: Vec::new(),
            last_smoke_ms: None,
            smoke_distance: 0.0,
        }
    }

    /// A randomly placed airplane within `viewport`.
    pub fn random<R: Rng>(
        viewport: Viewport,
        settings: &AirplaneSettings,
        rng: &mut R,
    ) -> Self {
        Self::new(
            sample_extent(rng, viewport.width),
            sample_extent(rng, viewport.height),
            sample(rng, settings.size),
            sample(rng, settings.speed),
            rng.gen_range(0.0..TAU),
            sample(rng, settings.rotation_speed),
        )
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn smoke(&self) -> &[SmokeDot] {
        &self.smoke
    }

    pub fn smoke_distance(&self) -> f32 {
        self.smoke_distance
    }

    pub fn last_smoke_ms(&self) -> Option<u64> {
        self.last_smoke_ms
    }

    /// Move along the heading, turn, wrap around the viewport and
    /// accumulate distance towards the next smoke dot.
    pub fn advance(&mut self, viewport: Viewport, margin: f32) {
        let (sin, cos) = self.angle.sin_cos();
        self.x += cos * self.speed;
        self.y += sin * self.speed;

        self.angle += self.rotation_speed;

        self.x = wrap(self.x, viewport.width, margin);
        self.y = wrap(self.y, viewport.height, margin);

        self.smoke_distance += self.speed;
    }

    /// Drop a smoke dot behind the airplane once it has travelled far enough.
    /// Returns whether a dot was emitted.
    pub fn emit_smoke(&mut self, now_ms: u64, settings: &AirplaneSettings) -> bool {
        if self.smoke_distance < settings.smoke_spacing {
            return false;
        }

        let (sin, cos) = self.angle.sin_cos();
        let offset = self.size * settings.smoke_offset;
        self.smoke.push(SmokeDot {
            x: self.x - cos * offset,
            y: self.y - sin * offset,
            created_ms: now_ms,
            size: self.size / 3.0,
        });
        self.smoke_distance = 0.0;
        self.last_smoke_ms = Some(now_ms);
        true
    }

    /// Remove smoke dots whose age has reached `duration_ms`.
    pub fn prune_smoke(&mut self, now_ms: u64, duration_ms: u64) {
        self.smoke.retain(|dot| dot.age_ms(now_ms) < duration_ms);
    }

    /// Placement of the airplane sprite.
    pub fn sprite_transform(&self, settings: &AirplaneSettings) -> SpriteTransform {
        SpriteTransform {
            x: self.x,
            y: self.y,
            rotation: self.angle + settings.sprite_rotation_offset,
            scale_x: settings.sprite_stretch_x,
            scale_y: settings.sprite_stretch_y,
            size: self.size * settings.sprite_scale,
        }
    }
}

/// The airplane effect: a fixed-size flock over one surface.
#[derive(Debug)]
pub struct AirplaneField {
    settings: AirplaneSettings,
    viewport: Viewport,
    airplanes: Vec<Airplane>,
}

impl AirplaneField {
    pub fn new(settings: AirplaneSettings) -> Self {
        Self {
            settings,
            viewport: Viewport::default(),
            airplanes: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn airplanes(&self) -> &[Airplane] {
        &self.airplanes
    }

    /// Replace the flock with freshly seeded airplanes.
    pub fn seed<R: Rng>(&mut self, viewport: Viewport, rng: &mut R) {
        self.viewport = viewport;
        self.airplanes = (0..self.settings.count)
            .map(|_| Airplane::random(viewport, &self.settings, rng))
            .collect();
    }
}

impl Effect for AirplaneField {
    fn surface(&self) -> SurfaceId {
        SurfaceId::Airplanes
    }

    fn resize(&mut self, viewport: Viewport, rng: &mut StdRng) {
        self.seed(viewport, rng);
        log::debug!(
            "{}: seeded {} airplanes for {}x{}",
            self.surface().element_id(),
            self.airplanes.len(),
            viewport.width,
            viewport.height
        );
    }

    fn tick(&mut self, ctx: &FrameContext) -> Vec<DrawCommand> {
        let settings = &self.settings;
        let duration = settings.trail_duration_ms;
        let mut commands = vec![DrawCommand::Clear];

        for airplane in &mut self.airplanes {
            airplane.advance(self.viewport, settings.wrap_margin);
            airplane.emit_smoke(ctx.now_ms, settings);
            airplane.prune_smoke(ctx.now_ms, duration);

            commands.extend(airplane.smoke.iter().map(|dot| {
                let opacity = smoke_opacity(dot.age_ms(ctx.now_ms), duration);
                DrawCommand::FillCircle {
                    x: dot.x,
                    y: dot.y,
                    radius: dot.size,
                    color: settings.smoke_color.with_alpha(opacity),
                }
            }));

            // The sprite may still be loading; the state above advances anyway.
            if ctx.sprite_ready {
                commands.push(DrawCommand::Sprite(airplane.sprite_transform(settings)));
            }
        }

        commands
    }
}
