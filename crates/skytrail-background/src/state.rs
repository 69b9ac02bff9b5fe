//! Background animation state management.

use ratatui::{Frame, layout::Rect, style::Color, symbols::Marker, widgets::canvas::Canvas};
use rand::{SeedableRng, rngs::StdRng};
use skytrail_config::Settings;
use skytrail_core::{DrawCommand, EffectSelection, FrameContext, SurfaceId, Viewport};

use crate::animations::{Effect, airplanes::AirplaneField, network::PointNetwork};
use crate::render::SurfacePainter;
use crate::sprite::SpriteLoader;

/// Draw commands produced for one surface in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFrame {
    pub surface: SurfaceId,
    pub commands: Vec<DrawCommand>,
}

/// Owns both effects and drives them frame by frame.
#[derive(Debug)]
pub struct BackgroundState {
    settings: Settings,
    airplanes: AirplaneField,
    network: PointNetwork,
    sprite: SpriteLoader,
    rng: StdRng,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
}

impl BackgroundState {
    /// Create the state and start loading the airplane sprite.
    pub fn new(settings: Settings) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        // Capture system time as seed for randomness
        let init_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        let sprite = SpriteLoader::spawn(settings.airplanes.sprite_path.clone());
        Self::with_parts(settings, init_seed, sprite)
    }

    /// Create the state from an explicit seed and sprite loader.
    pub fn with_parts(settings: Settings, seed: u64, sprite: SpriteLoader) -> Self {
        Self {
            airplanes: AirplaneField::new(settings.airplanes.clone()),
            network: PointNetwork::new(settings.network.clone()),
            settings,
            sprite,
            rng: StdRng::seed_from_u64(seed),
            last_width: 0,
            last_height: 0,
        }
    }

    pub fn airplanes(&self) -> &AirplaneField {
        &self.airplanes
    }

    pub fn network(&self) -> &PointNetwork {
        &self.network
    }

    /// Pixel viewport covered by a terminal area.
    pub fn viewport_for(&self, width: u16, height: u16) -> Viewport {
        let display = &self.settings.display;
        Viewport::new(
            width as f32 * display.cell_width_px,
            height as f32 * display.cell_height_px,
        )
    }

    /// Re-seed both effects for new terminal dimensions.
    pub fn resize(&mut self, width: u16, height: u16) {
        let viewport = self.viewport_for(width, height);
        self.airplanes.resize(viewport, &mut self.rng);
        self.network.resize(viewport, &mut self.rng);
        self.last_width = width;
        self.last_height = height;
    }

    /// Pointer moved over the given terminal cell.
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        let display = &self.settings.display;
        let x = (column as f32 + 0.5) * display.cell_width_px;
        let y = (row as f32 + 0.5) * display.cell_height_px;
        self.network.set_pointer(x, y);
    }

    /// Pointer left the terminal.
    pub fn pointer_left(&mut self) {
        self.network.clear_pointer();
    }

    /// Advance every shown surface one frame, re-seeding first if the
    /// terminal size changed.
    pub fn tick(
        &mut self,
        width: u16,
        height: u16,
        elapsed_ms: u64,
        effects: EffectSelection,
    ) -> Vec<SurfaceFrame> {
        if width != self.last_width || height != self.last_height {
            self.resize(width, height);
        }

        let ctx = FrameContext::at(elapsed_ms).with_sprite_ready(self.sprite.is_complete());
        let mut frames = Vec::with_capacity(2);
        // Network first so the airplanes fly over it.
        let layers: [&mut dyn Effect; 2] = [&mut self.network, &mut self.airplanes];
        for effect in layers {
            if effects.shows(effect.surface()) {
                frames.push(SurfaceFrame {
                    surface: effect.surface(),
                    commands: effect.tick(&ctx),
                });
            }
        }
        frames
    }

    /// Render the background to the frame.
    pub fn render(&mut self, frame: &mut Frame, elapsed_ms: u64, effects: EffectSelection) {
        let area = frame.area();
        self.render_area(frame, area, elapsed_ms, effects);
    }

    /// Render the background into part of the frame.
    pub fn render_area(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        elapsed_ms: u64,
        effects: EffectSelection,
    ) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let frames = self.tick(area.width, area.height, elapsed_ms, effects);
        let sprite = self.sprite.get();
        let painter = SurfacePainter::new(
            self.viewport_for(area.width, area.height),
            area,
            self.settings.display.background,
            sprite.as_deref(),
        );

        let background = self.settings.display.background;
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .background_color(Color::Rgb(background.r, background.g, background.b))
            .x_bounds(painter.x_bounds())
            .y_bounds(painter.y_bounds())
            .paint(|ctx| {
                for surface in &frames {
                    painter.paint(ctx, &surface.commands);
                }
            });

        frame.render_widget(canvas, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use ratatui::{Terminal, backend::TestBackend};

    use crate::sprite::Sprite;

    fn state() -> BackgroundState {
        BackgroundState::with_parts(
            Settings::default(),
            99,
            SpriteLoader::spawn("/nonexistent/skytrail/airplane.png"),
        )
    }

    #[test]
    fn test_first_tick_seeds_both_effects() {
        let mut state = state();
        // 125 x 63 cells at 8 x 16 px is 1000 x 1008 px.
        let frames = state.tick(125, 63, 0, EffectSelection::Both);

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].surface, SurfaceId::Network);
        assert_eq!(frames[1].surface, SurfaceId::Airplanes);
        assert_eq!(state.network().points().len(), 100);
        assert_eq!(state.airplanes().airplanes().len(), 8);
    }

    #[test]
    fn test_resize_replaces_points_and_triangles() {
        let mut state = state();
        state.tick(125, 63, 0, EffectSelection::Both);
        let before = state.network().points().to_vec();

        state.tick(60, 20, 16, EffectSelection::Both);
        let viewport = state.network().viewport();
        assert_eq!(viewport, Viewport::new(480.0, 320.0));
        assert_eq!(state.network().points().len(), 15);
        assert_ne!(state.network().points(), &before[..15]);
        let count = state.network().points().len();
        for t in state.network().triangles() {
            assert!(t.vertices.iter().all(|&i| i < count));
        }
        assert_eq!(state.airplanes().viewport(), viewport);
    }

    #[test]
    fn test_selection_limits_surfaces() {
        let mut state = state();
        let frames = state.tick(40, 20, 0, EffectSelection::Airplanes);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].surface, SurfaceId::Airplanes);

        let frames = state.tick(40, 20, 16, EffectSelection::Network);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].surface, SurfaceId::Network);
    }

    #[test]
    fn test_pointer_maps_cell_centre() {
        let mut state = state();
        state.pointer_moved(2, 1);
        assert_eq!(state.network().pointer().position(), Some((20.0, 24.0)));
        state.pointer_left();
        assert!(!state.network().pointer().is_present());
    }

    #[test]
    fn test_sprites_drawn_once_loaded() {
        let image = RgbaImage::from_pixel(2, 2, image::Rgba([255, 255, 255, 255]));
        let loader = SpriteLoader::ready(Sprite::from_image(&image).unwrap());
        let mut loaded = BackgroundState::with_parts(Settings::default(), 5, loader);

        let frames = loaded.tick(80, 24, 0, EffectSelection::Airplanes);
        let sprites = frames[0]
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite(_)))
            .count();
        assert_eq!(sprites, 8);

        let mut missing = state();
        let frames = missing.tick(80, 24, 0, EffectSelection::Airplanes);
        assert!(
            !frames[0]
                .commands
                .iter()
                .any(|c| matches!(c, DrawCommand::Sprite(_)))
        );
    }

    #[test]
    fn test_render_into_terminal() {
        let mut state = state();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        for frame_ms in [0, 16, 32] {
            terminal
                .draw(|frame| state.render(frame, frame_ms, EffectSelection::Both))
                .unwrap();
        }
        assert_eq!(state.network().viewport(), Viewport::new(320.0, 192.0));
    }
}
