use crate::errors::{MapGenError, MapGenResult};
use image::{GrayImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Largest accepted width or height
pub const MAX_DIMENSION: u32 = 2048;

/// Grayscale depth image produced by every generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DepthMap {
    #[validate(range(min = 2, max = 2048))]
    pub width: u32,
    #[validate(range(min = 2, max = 2048))]
    pub height: u32,
    pub pixels: Vec<u8>, // Row-major, one byte per pixel
}

impl DepthMap {
    /// Create a new depth map with validation
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> MapGenResult<Self> {
        let expected_size = width as usize * height as usize;
        if pixels.len() != expected_size {
            return Err(MapGenError::InvalidParameters {
                reason: format!(
                    "Pixel buffer size {} does not match dimensions {}x{} (expected {})",
                    pixels.len(),
                    width,
                    height,
                    expected_size
                ),
            });
        }

        let map = Self {
            width,
            height,
            pixels,
        };
        map.validate()
            .map_err(|errors| MapGenError::from_validation(&errors))?;

        Ok(map)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Gray replicated into R, G and B with opaque alpha
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&gray| [gray, gray, gray, 255])
            .collect()
    }

    /// Write an 8-bit grayscale PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> MapGenResult<()> {
        let image = GrayImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or_else(
            || MapGenError::InvalidParameters {
                reason: "Pixel buffer does not fit image dimensions".to_string(),
            },
        )?;
        image.save_with_format(path.as_ref(), ImageFormat::Png)?;
        tracing::info!(path = %path.as_ref().display(), "wrote PNG depth map");
        Ok(())
    }

    /// Write raw interleaved RGBA bytes with no header
    pub fn save_rgba<P: AsRef<Path>>(&self, path: P) -> MapGenResult<()> {
        std::fs::write(path.as_ref(), self.to_rgba())?;
        tracing::info!(path = %path.as_ref().display(), "wrote raw RGBA depth map");
        Ok(())
    }

    /// Mean gray level, handy for summaries
    pub fn mean(&self) -> f64 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        self.pixels.iter().map(|&p| p as f64).sum::<f64>() / self.pixels.len() as f64
    }
}
