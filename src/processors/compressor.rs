// pixie-batch/src/processors/compressor.rs
use crate::core::{ImageToolError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use oxipng::{optimize_from_memory, Options};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

pub struct Compressor {
    quality: u8,
    optimize_png: bool,
}

impl Compressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            optimize_png: true,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn save_with_format(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: ImageFormat,
    ) -> Result<()> {
        log::debug!(
            "Saving image to {} with format {:?}, quality: {}",
            path.display(),
            format,
            self.quality
        );

        match format {
            ImageFormat::Jpeg => self.save_jpeg(image, path),
            ImageFormat::Png => self.save_png(image, path),
            _ => self.save_generic(image, path, format),
        }
    }

    fn save_jpeg(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        let encoder = JpegEncoder::new_with_quality(writer, self.quality);

        // JPEG has no alpha channel and no 16-bit mode
        match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => {
                image.write_with_encoder(encoder)?
            }
            _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?,
        }

        self.log_save_result(path)
    }

    fn save_png(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;

        let data = if self.optimize_png {
            optimize_from_memory(buffer.get_ref(), &Options::default()).map_err(|e| {
                ImageToolError::ProcessingError(format!("PNG optimization failed: {}", e))
            })?
        } else {
            buffer.into_inner()
        };

        std::fs::write(path, data)?;
        self.log_save_result(path)
    }

    fn save_generic(&self, image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);

        match image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_) => image.write_to(&mut writer, format)?,
            _ if image.color().has_alpha() => {
                DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut writer, format)?
            }
            _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut writer, format)?,
        }

        self.log_save_result(path)
    }

    fn log_save_result(&self, path: &Path) -> Result<()> {
        let file_size = std::fs::metadata(path)?.len();
        log::debug!(
            "Saved image: {} ({})",
            path.display(),
            crate::utils::format_file_size(file_size)
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    #[test]
    fn test_jpeg_drops_alpha() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.jpg");
        let image = DynamicImage::new_rgba8(4, 4);

        Compressor::new(80)
            .save_with_format(&image, &path, ImageFormat::Jpeg)
            .unwrap();

        let reloaded = image::open(&path).unwrap();
        assert!(!reloaded.color().has_alpha());
    }

    #[test]
    fn test_png_with_and_without_optimization() {
        let temp = TempDir::new().unwrap();
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_fn(16, 16, |x, y| {
            image::Rgb([(x * 16) as u8, (y * 16) as u8, 128])
        }));

        for (name, optimize) in [("opt.png", true), ("raw.png", false)] {
            let path = temp.path().join(name);
            Compressor::new(90)
                .with_png_optimization(optimize)
                .save_with_format(&image, &path, ImageFormat::Png)
                .unwrap();
            assert_eq!(image::open(&path).unwrap().to_rgb8(), image.to_rgb8());
        }
    }

    #[test]
    fn test_bmp_from_sixteen_bit_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("deep.bmp");
        let image = DynamicImage::new_rgb16(3, 3);

        Compressor::new(90)
            .save_with_format(&image, &path, ImageFormat::Bmp)
            .unwrap();
        assert!(path.exists());
    }
}
