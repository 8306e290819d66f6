// pixie-batch/src/processors/resizer.rs
use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Exact-size resampling with a Lanczos3 kernel.
pub struct Resizer;

impl Resizer {
    pub fn new() -> Self {
        Self
    }

    /// Resizes to exactly `width`x`height`; aspect ratio is not preserved.
    pub fn resize_exact(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        if (width, height) == image.dimensions() {
            log::debug!("Image dimensions unchanged, skipping resize");
            return image.clone();
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );

        image.resize_exact(width, height, FilterType::Lanczos3)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}
