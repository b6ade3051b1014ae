//! Vision encoders for the multimodal scorer

use anyhow::Result;
use image::imageops::FilterType;
use image::DynamicImage;

/// Image embedding abstraction
pub trait VisionEncoder: Send + Sync {
    /// One fixed-length vector per image
    fn encode(&self, images: &[DynamicImage]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

/// Grayscale thumbnail encoder
///
/// Downscales each image to `side x side` luma pixels scaled to [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailEncoder {
    side: u32,
}

impl ThumbnailEncoder {
    pub const DEFAULT_SIDE: u32 = 8;

    pub fn new(side: u32) -> Self {
        Self { side: side.max(1) }
    }

    fn encode_one(&self, image: &DynamicImage) -> Vec<f32> {
        image
            .resize_exact(self.side, self.side, FilterType::Triangle)
            .to_luma8()
            .into_raw()
            .into_iter()
            .map(|p| p as f32 / 255.0)
            .collect()
    }
}

impl Default for ThumbnailEncoder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIDE)
    }
}

impl VisionEncoder for ThumbnailEncoder {
    fn encode(&self, images: &[DynamicImage]) -> Result<Vec<Vec<f32>>> {
        Ok(images.iter().map(|img| self.encode_one(img)).collect())
    }

    fn dimension(&self) -> usize {
        (self.side * self.side) as usize
    }

    fn name(&self) -> &str {
        "thumbnail-luma"
    }
}
