// pixie-batch/src/core/mod.rs
pub mod processor;

use image::ImageFormat;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Largest width or height read or written.
pub const MAX_DIMENSION: u32 = 100_000;
/// Largest pixel count of a produced image (16384 x 16384).
pub const MAX_OUTPUT_PIXELS: u64 = 1 << 28;

pub const DEFAULT_MODEL_PATH: &str = "EDSR_x2.pb";
pub const DEFAULT_MODEL_URL: &str =
    "https://github.com/Saafke/EDSR_Tensorflow/raw/master/models/EDSR_x2.pb";

#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub output_dir: PathBuf,
    pub quality: u8,
    pub optimize_png: bool,
    pub model: ModelConfig,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub url: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            quality: 90,
            optimize_png: true,
            model: ModelConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(DEFAULT_MODEL_PATH),
            url: DEFAULT_MODEL_URL.to_string(),
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.quality == 0 || self.quality > 100 {
            return Err(ImageToolError::InvalidParameter(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ImageToolError::InvalidParameter(
                "Output directory must not be empty".to_string(),
            ));
        }

        if self.model.enabled && self.model.path.as_os_str().is_empty() {
            return Err(ImageToolError::InvalidParameter(
                "Model path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// A batch operation as the user typed it. Arguments stay raw and are
/// resolved once per candidate, so a bad argument fails each file rather
/// than the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Resize { width: String, height: String },
    Convert { format: String },
    Filter { name: String, value: String },
    Enhance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Resize { width: u32, height: u32 },
    Convert { format: ImageFormat, extension: String },
    Filter { kind: FilterKind, value: f32 },
    Enhance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Brightness,
    Contrast,
    Sharpen,
    Grayscale,
}

#[derive(Debug, Clone)]
pub struct BatchJob {
    pub directory: PathBuf,
    pub operation: Operation,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Resize { .. } => "resize",
            Operation::Convert { .. } => "convert",
            Operation::Filter { .. } => "filter",
            Operation::Enhance => "enhance",
        }
    }

    pub fn resolve(&self) -> Result<Transform> {
        match self {
            Operation::Resize { width, height } => {
                let width = parse_dimension("width", width)?;
                let height = parse_dimension("height", height)?;
                check_output_size(width, height)?;
                Ok(Transform::Resize { width, height })
            }
            Operation::Convert { format } => {
                let extension = format.trim().trim_start_matches('.').to_lowercase();
                let format = ImageFormat::from_extension(&extension)
                    .ok_or_else(|| ImageToolError::UnsupportedFormat(extension.clone()))?;
                Ok(Transform::Convert { format, extension })
            }
            Operation::Filter { name, value } => {
                let kind = name.parse::<FilterKind>()?;
                let value = value.trim().parse::<f32>().map_err(|_| {
                    ImageToolError::InvalidParameter(format!(
                        "Filter value must be a number, got '{}'",
                        value
                    ))
                })?;
                if !value.is_finite() {
                    return Err(ImageToolError::InvalidParameter(format!(
                        "Filter value must be finite, got '{}'",
                        value
                    )));
                }
                Ok(Transform::Filter { kind, value })
            }
            Operation::Enhance => Ok(Transform::Enhance),
        }
    }
}

fn parse_dimension(label: &str, raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ImageToolError::InvalidParameter(format!(
            "{} must be a positive integer, got '{}'",
            label, raw
        ))),
    }
}

/// Rejects output sizes above `MAX_DIMENSION` per side or
/// `MAX_OUTPUT_PIXELS` in total.
pub fn check_output_size(width: u32, height: u32) -> Result<()> {
    let pixels = width as u64 * height as u64;
    if width > MAX_DIMENSION || height > MAX_DIMENSION || pixels > MAX_OUTPUT_PIXELS {
        return Err(ImageToolError::InvalidParameter(format!(
            "Output size {}x{} exceeds the limit of {} per side and {} pixels",
            width, height, MAX_DIMENSION, MAX_OUTPUT_PIXELS
        )));
    }

    Ok(())
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Brightness,
        FilterKind::Contrast,
        FilterKind::Sharpen,
        FilterKind::Grayscale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Brightness => "brightness",
            FilterKind::Contrast => "contrast",
            FilterKind::Sharpen => "sharpen",
            FilterKind::Grayscale => "grayscale",
        }
    }
}

impl FromStr for FilterKind {
    type Err = ImageToolError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or(ImageToolError::UnknownFilter(name))
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ImageToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown filter '{0}' (expected brightness, contrast, sharpen or grayscale)")]
    UnknownFilter(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Input path does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("AI enhancement model not available: {0}")]
    ModelUnavailable(String),

    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ImageToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn resize(width: &str, height: &str) -> Operation {
        Operation::Resize {
            width: width.to_string(),
            height: height.to_string(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ProcessConfig::default().validate().is_ok());
    }

    #[test]
    fn test_quality_out_of_range() {
        let config = ProcessConfig {
            quality: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ImageToolError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_resize_resolves_positive_integers() {
        assert_eq!(
            resize("640", "480").resolve().unwrap(),
            Transform::Resize {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn test_resize_rejects_bad_dimensions() {
        for (w, h) in [("abc", "10"), ("10", "1.5"), ("0", "10"), ("-3", "10")] {
            assert!(
                matches!(
                    resize(w, h).resolve(),
                    Err(ImageToolError::InvalidParameter(_))
                ),
                "{}x{} should be rejected",
                w,
                h
            );
        }
    }

    #[test]
    fn test_resize_rejects_oversized_targets() {
        for (w, h) in [("4294967295", "4294967295"), ("100001", "1"), ("20000", "20000")] {
            assert!(
                matches!(
                    resize(w, h).resolve(),
                    Err(ImageToolError::InvalidParameter(msg)) if msg.contains("exceeds")
                ),
                "{}x{} should be rejected",
                w,
                h
            );
        }
        assert!(resize("16384", "16384").resolve().is_ok());
        assert!(resize("100000", "2").resolve().is_ok());
    }

    #[test]
    fn test_convert_lowercases_token() {
        let op = Operation::Convert {
            format: "PNG".to_string(),
        };
        assert_eq!(
            op.resolve().unwrap(),
            Transform::Convert {
                format: ImageFormat::Png,
                extension: "png".to_string()
            }
        );
    }

    #[test]
    fn test_convert_unknown_format() {
        let op = Operation::Convert {
            format: "xyz".to_string(),
        };
        assert!(matches!(
            op.resolve(),
            Err(ImageToolError::UnsupportedFormat(ext)) if ext == "xyz"
        ));
    }

    #[test]
    fn test_filter_kind_parsing() {
        assert_eq!("Sharpen".parse::<FilterKind>().unwrap(), FilterKind::Sharpen);
        assert!(matches!(
            "sepia".parse::<FilterKind>(),
            Err(ImageToolError::UnknownFilter(name)) if name == "sepia"
        ));
    }

    #[test]
    fn test_filter_value_must_be_numeric() {
        let op = Operation::Filter {
            name: "brightness".to_string(),
            value: "bright".to_string(),
        };
        assert!(matches!(
            op.resolve(),
            Err(ImageToolError::InvalidParameter(_))
        ));
    }
}
