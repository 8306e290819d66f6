// pixie-batch/src/processors/filters.rs
//
// Enhancement filters expressed as a blend between a "degenerate" image and
// the original: `out = degenerate + factor * (original - degenerate)`.
// A factor of 1.0 returns the original; 0.0 returns the degenerate image.
use crate::core::FilterKind;
use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};
use imageproc::stats::histogram;

// 3x3 smoothing kernel, centre weight 5, normalized by 13
const SMOOTH_KERNEL: [f32; 9] = [
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    5.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
    1.0 / 13.0,
];

macro_rules! map_buffer {
    ($image:expr, $buf:ident, $alpha:ident => $body:expr) => {
        match $image {
            DynamicImage::ImageLuma8($buf) => {
                let $alpha = false;
                DynamicImage::ImageLuma8($body)
            }
            DynamicImage::ImageLumaA8($buf) => {
                let $alpha = true;
                DynamicImage::ImageLumaA8($body)
            }
            DynamicImage::ImageRgb8($buf) => {
                let $alpha = false;
                DynamicImage::ImageRgb8($body)
            }
            DynamicImage::ImageRgba8($buf) => {
                let $alpha = true;
                DynamicImage::ImageRgba8($body)
            }
            other => {
                let $buf = &other.to_rgba8();
                let $alpha = true;
                DynamicImage::ImageRgba8($body)
            }
        }
    };
}

pub struct FilterSet;

impl FilterSet {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, image: &DynamicImage, kind: FilterKind, value: f32) -> DynamicImage {
        log::debug!("Applying {} filter with intensity {}", kind, value);

        match kind {
            FilterKind::Brightness => map_buffer!(image, buf, alpha => blend(buf, alpha, value, |_, _, _| 0.0)),
            FilterKind::Contrast => {
                let mean = mean_luminance(image);
                map_buffer!(image, buf, alpha => blend(buf, alpha, value, |_, _, _| mean))
            }
            FilterKind::Sharpen => {
                let smoothed = image.filter3x3(&SMOOTH_KERNEL);
                map_buffer!(image, buf, alpha => blend(buf, alpha, value, |x, y, channel| {
                    smoothed.get_pixel(x, y).0[channel] as f32
                }))
            }
            FilterKind::Grayscale => image.grayscale(),
        }
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::new()
    }
}

fn blend<P, F>(
    image: &ImageBuffer<P, Vec<u8>>,
    has_alpha: bool,
    factor: f32,
    degenerate: F,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
    F: Fn(u32, u32, usize) -> f32,
{
    // alpha is always the last channel and is never blended
    let color_channels = if has_alpha {
        P::CHANNEL_COUNT as usize - 1
    } else {
        P::CHANNEL_COUNT as usize
    };

    let mut output = image.clone();
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let channels = pixel.channels_mut();
        for (channel, value) in channels.iter_mut().take(color_channels).enumerate() {
            let base = degenerate(x, y, channel);
            let mixed = base + factor * (*value as f32 - base);
            *value = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }
    output
}

fn mean_luminance(image: &DynamicImage) -> f32 {
    let gray = image.to_luma8();
    let counts = &histogram(&gray).channels[0];

    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0.0;
    }

    let weighted: u64 = counts
        .iter()
        .enumerate()
        .map(|(level, &count)| level as u64 * count as u64)
        .sum();

    (weighted as f64 / total as f64 + 0.5).floor() as f32
}
