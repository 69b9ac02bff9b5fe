//! Settings for the skytrail backgrounds.
//!
//! Every tunable constant of both effects lives here. Values are read once
//! at startup from an optional TOML file; a missing file means defaults.

mod error;

use std::f32::consts::FRAC_PI_4;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use skytrail_core::{EffectSelection, Rgba};

pub use error::ConfigError;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV: &str = "SKYTRAIL_CONFIG";

/// Half-open range `[min, max)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: f32,
    pub max: f32,
}

impl UniformRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies in `[min, max)`.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }

    fn check(&self, name: &str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!(
                "{name}: expected min < max, got [{}, {})",
                self.min, self.max
            )))
        }
    }
}

/// Airplane flock settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirplaneSettings {
    /// Number of airplanes seeded per viewport.
    pub count: usize,
    pub size: UniformRange,
    pub speed: UniformRange,
    /// Per-frame heading change in radians.
    pub rotation_speed: UniformRange,
    /// Overscan before an airplane wraps to the opposite edge.
    pub wrap_margin: f32,
    /// Distance travelled between smoke dots.
    pub smoke_spacing: f32,
    /// Lifetime of a smoke dot.
    pub trail_duration_ms: u64,
    /// Smoke dots are placed this many airplane sizes behind the airplane.
    pub smoke_offset: f32,
    pub smoke_color: Rgba,
    /// Sprite image, relative to the working directory.
    pub sprite_path: PathBuf,
    /// Added to the heading so the sprite's nose points forward.
    pub sprite_rotation_offset: f32,
    pub sprite_stretch_x: f32,
    pub sprite_stretch_y: f32,
    /// Sprite edge length as a multiple of the airplane size.
    pub sprite_scale: f32,
}

impl Default for AirplaneSettings {
    fn default() -> Self {
        Self {
            count: 8,
            size: UniformRange::new(3.0, 11.0),
            speed: UniformRange::new(1.0, 2.5),
            rotation_speed: UniformRange::new(-0.01, 0.01),
            wrap_margin: 50.0,
            smoke_spacing: 20.0,
            trail_duration_ms: 2500,
            smoke_offset: 1.5,
            smoke_color: Rgba::WHITE,
            sprite_path: PathBuf::from("assets/airplane.png"),
            sprite_rotation_offset: FRAC_PI_4,
            sprite_stretch_x: 2.5,
            sprite_stretch_y: 1.5,
            sprite_scale: 2.0,
        }
    }
}

/// Point network settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Points per square pixel.
    pub density: f64,
    pub radius: UniformRange,
    /// Initial velocity range, sampled independently per axis.
    pub velocity: UniformRange,
    /// Triangles requested per point.
    pub triangle_fraction: f64,
    pub connection_distance: f32,
    pub repulsion_radius: f32,
    /// Displacement at zero distance from the pointer.
    pub repulsion_strength: f32,
    pub triangle_opacity: UniformRange,
    pub point_color: Rgba,
    pub line_color: Rgba,
    pub line_width: f32,
    /// Triangle fill; alpha comes from each triangle's opacity.
    pub triangle_color: Rgba,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            density: 0.0001,
            radius: UniformRange::new(1.0, 3.0),
            velocity: UniformRange::new(-0.15, 0.35),
            triangle_fraction: 0.1,
            connection_distance: 190.0,
            repulsion_radius: 150.0,
            repulsion_strength: 4.0,
            triangle_opacity: UniformRange::new(0.02, 0.12),
            point_color: Rgba::rgb(0xaa, 0xaa, 0xaa),
            line_color: Rgba::rgba(180, 180, 180, 0.4),
            line_width: 0.5,
            triangle_color: Rgba::rgb(187, 187, 187),
        }
    }
}

/// Terminal presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Target time between frames.
    pub frame_interval_ms: u64,
    /// Pixel width assumed for one terminal cell.
    pub cell_width_px: f32,
    /// Pixel height assumed for one terminal cell.
    pub cell_height_px: f32,
    /// Color the translucent shapes are composited against.
    pub background: Rgba,
    pub effects: EffectSelection,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            background: Rgba::BLACK,
            effects: EffectSelection::Both,
        }
    }
}

/// All settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub airplanes: AirplaneSettings,
    pub network: NetworkSettings,
    pub display: DisplaySettings,
}

impl Settings {
    /// Default location of the settings file.
    ///
    /// `$SKYTRAIL_CONFIG` wins over the platform config directory.
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "skytrail").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Where the log file goes when logging is enabled.
    pub fn log_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "skytrail").map(|dirs| dirs.data_dir().join("skytrail.log"))
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a file; a missing file yields defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let settings = Self::from_toml(&contents)?;
        log::info!("loaded config from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to TOML text.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the simulations cannot sample from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.airplanes;
        a.size.check("airplanes.size")?;
        a.speed.check("airplanes.speed")?;
        a.rotation_speed.check("airplanes.rotation_speed")?;
        if a.smoke_spacing <= 0.0 {
            return Err(ConfigError::Invalid(
                "airplanes.smoke_spacing must be positive".into(),
            ));
        }
        if a.trail_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "airplanes.trail_duration_ms must be positive".into(),
            ));
        }

        let n = &self.network;
        n.radius.check("network.radius")?;
        n.velocity.check("network.velocity")?;
        n.triangle_opacity.check("network.triangle_opacity")?;
        if n.density < 0.0 || n.triangle_fraction < 0.0 {
            return Err(ConfigError::Invalid(
                "network.density and network.triangle_fraction must not be negative".into(),
            ));
        }
        if n.repulsion_radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "network.repulsion_radius must be positive".into(),
            ));
        }

        let d = &self.display;
        if d.cell_width_px <= 0.0 || d.cell_height_px <= 0.0 {
            return Err(ConfigError::Invalid(
                "display cell size must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_effect_constants() {
        let settings = Settings::default();
        assert_eq!(settings.airplanes.count, 8);
        assert_eq!(settings.airplanes.trail_duration_ms, 2500);
        assert_eq!(settings.airplanes.smoke_spacing, 20.0);
        assert_eq!(settings.airplanes.wrap_margin, 50.0);
        assert_eq!(settings.network.density, 0.0001);
        assert_eq!(settings.network.connection_distance, 190.0);
        assert_eq!(settings.network.repulsion_radius, 150.0);
        assert_eq!(settings.network.velocity, UniformRange::new(-0.15, 0.35));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            [network]
            connection_distance = 120.0

            [display]
            effects = "network"
            "#,
        )
        .unwrap();
        assert_eq!(settings.network.connection_distance, 120.0);
        assert_eq!(settings.network.density, 0.0001);
        assert_eq!(settings.display.effects, EffectSelection::Network);
        assert_eq!(settings.airplanes, AirplaneSettings::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }

    #[test]
    fn test_rejects_empty_range() {
        let err = Settings::from_toml(
            r#"
            [airplanes]
            size = { min = 5.0, max = 5.0 }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = Settings::from_toml("[network\ndensity = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_default() {
        let settings = Settings::load_from("/nonexistent/skytrail/config.toml").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_uniform_range_is_half_open() {
        let r = UniformRange::new(0.02, 0.12);
        assert!(r.contains(0.02));
        assert!(!r.contains(0.12));
    }
}
