// pixie-batch/src/processors/loader.rs
use crate::core::{ImageToolError, Result};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::path::Path;

#[derive(Clone)]
pub struct Loader {
    max_dimension: u32,
}

impl Loader {
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| {
                ImageToolError::ProcessingError(format!("Failed to decode image: {}", e))
            })?;

        let (width, height) = image.dimensions();
        if width > self.max_dimension || height > self.max_dimension {
            return Err(ImageToolError::InvalidParameter(format!(
                "Image dimensions {}x{} exceed maximum {}x{}",
                width, height, self.max_dimension, self.max_dimension
            )));
        }

        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    /// Format to write when the output keeps the input's extension.
    pub fn detect_format(&self, path: &Path) -> Result<ImageFormat> {
        ImageFormat::from_path(path).map_err(|_| {
            ImageToolError::UnsupportedFormat(format!(
                "cannot infer format for {}",
                path.display()
            ))
        })
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let metadata = path.metadata()?;
        if metadata.len() == 0 {
            return Err(ImageToolError::InvalidParameter(format!(
                "File is empty: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MAX_DIMENSION;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    #[test]
    fn test_empty_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let empty = temp.child("empty.png");
        empty.touch().unwrap();

        let result = Loader::new(MAX_DIMENSION).load(empty.path());
        assert!(matches!(result, Err(ImageToolError::InvalidParameter(_))));
    }

    #[test]
    fn test_garbage_file_fails_to_decode() {
        let temp = TempDir::new().unwrap();
        let junk = temp.child("junk.jpg");
        junk.write_str("definitely not a jpeg").unwrap();

        assert!(Loader::new(MAX_DIMENSION).load(junk.path()).is_err());
    }

    #[test]
    fn test_dimension_limit() {
        let temp = TempDir::new().unwrap();
        let path = temp.child("wide.png");
        image::RgbImage::new(8, 2).save(path.path()).unwrap();

        assert!(Loader::new(4).load(path.path()).is_err());
        assert!(Loader::new(MAX_DIMENSION).load(path.path()).is_ok());
    }

    #[test]
    fn test_detect_format_from_extension() {
        let loader = Loader::new(MAX_DIMENSION);
        assert_eq!(
            loader.detect_format(Path::new("a.JPEG")).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(
            loader.detect_format(Path::new("b.bmp")).unwrap(),
            ImageFormat::Bmp
        );
    }
}
