//! Airplane sprite asset and its background loader.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;

use image::RgbaImage;
use skytrail_core::Rgba;

/// Pixels more transparent than this are not part of the sprite.
const ALPHA_THRESHOLD: u8 = 32;

/// Error raised while decoding a sprite.
#[derive(Debug)]
pub enum SpriteError {
    /// The file could not be read or decoded.
    Decode(image::ImageError),
    /// The image has no visible pixels.
    Empty,
}

impl fmt::Display for SpriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteError::Decode(err) => write!(f, "sprite decode error: {err}"),
            SpriteError::Empty => write!(f, "sprite has no visible pixels"),
        }
    }
}

impl std::error::Error for SpriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpriteError::Decode(err) => Some(err),
            SpriteError::Empty => None,
        }
    }
}

impl From<image::ImageError> for SpriteError {
    fn from(err: image::ImageError) -> Self {
        SpriteError::Decode(err)
    }
}

/// One visible sprite pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSample {
    /// Pixel centre in normalized image coordinates (`0.0..=1.0`, y down).
    pub u: f32,
    pub v: f32,
    pub color: Rgba,
}

/// A decoded sprite reduced to its visible pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    samples: Vec<SpriteSample>,
}

impl Sprite {
    /// Decode a sprite from an image file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SpriteError> {
        let image = image::open(path)?.to_rgba8();
        Self::from_image(&image)
    }

    pub fn from_image(image: &RgbaImage) -> Result<Self, SpriteError> {
        let (width, height) = image.dimensions();
        let samples: Vec<SpriteSample> = image
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel[3] >= ALPHA_THRESHOLD)
            .map(|(x, y, pixel)| SpriteSample {
                u: (x as f32 + 0.5) / width as f32,
                v: (y as f32 + 0.5) / height as f32,
                color: Rgba::rgba(pixel[0], pixel[1], pixel[2], pixel[3] as f32 / 255.0),
            })
            .collect();

        if samples.is_empty() {
            return Err(SpriteError::Empty);
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn samples(&self) -> &[SpriteSample] {
        &self.samples
    }
}

/// Decodes a sprite on a background thread; frames poll for completion.
#[derive(Debug, Clone)]
pub struct SpriteLoader {
    sprite: Arc<RwLock<Option<Arc<Sprite>>>>,
    /// Set once the loading thread has finished, successfully or not.
    finished: Arc<AtomicBool>,
}

impl SpriteLoader {
    /// Start decoding the sprite at `path`.
    pub fn spawn<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let loader = Self {
            sprite: Arc::new(RwLock::new(None)),
            finished: Arc::new(AtomicBool::new(false)),
        };

        let slot = loader.sprite.clone();
        let finished = loader.finished.clone();
        thread::spawn(move || {
            match Sprite::open(&path) {
                Ok(sprite) => {
                    log::info!(
                        "loaded sprite {} ({} visible pixels)",
                        path.display(),
                        sprite.samples().len()
                    );
                    if let Ok(mut slot) = slot.write() {
                        *slot = Some(Arc::new(sprite));
                    }
                }
                Err(err) => {
                    log::warn!("airplane sprite {} unavailable: {err}", path.display());
                }
            }
            finished.store(true, Ordering::Release);
        });

        loader
    }

    /// A loader whose sprite is already available.
    pub fn ready(sprite: Sprite) -> Self {
        Self {
            sprite: Arc::new(RwLock::new(Some(Arc::new(sprite)))),
            finished: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the sprite is available for drawing.
    pub fn is_complete(&self) -> bool {
        self.get().is_some()
    }

    /// Whether the loading thread has given up or succeeded.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// The decoded sprite, if loaded. Never blocks.
    pub fn get(&self) -> Option<Arc<Sprite>> {
        self.sprite.try_read().ok().and_then(|slot| slot.clone())
    }
}
