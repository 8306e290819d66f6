// pixie-batch/src/processors/enhancer.rs
use crate::core::{check_output_size, ImageToolError, ModelConfig, Result};
use crate::report::{Notice, Reporter};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tract_tensorflow::prelude::*;

/// Upscales a single image with a pre-trained network.
pub trait Upscaler {
    fn name(&self) -> &str;
    /// Factor applied to both sides.
    fn scale(&self) -> u32;
    fn upscale(&self, image: &DynamicImage) -> Result<DynamicImage>;
}

/// Whether super-resolution can be used in this session. Resolved once at
/// startup; an unavailable provider keeps the reason so every enhance
/// candidate can report it.
pub enum SuperResolution {
    Available(Box<dyn Upscaler>),
    Unavailable(String),
}

impl SuperResolution {
    pub fn initialize(config: &ModelConfig, reporter: &mut dyn Reporter) -> Self {
        if !config.enabled {
            log::info!("AI enhancement model loading disabled");
            return SuperResolution::Unavailable("model loading disabled".to_string());
        }

        let loaded = ensure_model(config, reporter).and_then(|path| EdsrUpscaler::from_path(&path));

        match loaded {
            Ok(upscaler) => {
                reporter.notice(Notice::ModelReady {
                    name: upscaler.name().to_string(),
                });
                SuperResolution::Available(Box::new(upscaler))
            }
            Err(e) => {
                log::warn!("Super-resolution unavailable: {}", e);
                let reason = e.to_string();
                reporter.notice(Notice::ModelUnavailable {
                    reason: reason.clone(),
                });
                SuperResolution::Unavailable(reason)
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SuperResolution::Available(_))
    }

    pub fn upscaler(&self) -> Result<&dyn Upscaler> {
        match self {
            SuperResolution::Available(upscaler) => Ok(upscaler.as_ref()),
            SuperResolution::Unavailable(reason) => {
                Err(ImageToolError::ModelUnavailable(reason.clone()))
            }
        }
    }
}

fn ensure_model(config: &ModelConfig, reporter: &mut dyn Reporter) -> Result<PathBuf> {
    if config.path.is_file() {
        log::debug!("Using cached model at {}", config.path.display());
        return Ok(config.path.clone());
    }

    reporter.notice(Notice::ModelDownloading {
        url: config.url.clone(),
    });
    fetch_model(&config.url, &config.path)?;

    Ok(config.path.clone())
}

fn fetch_model(url: &str, destination: &Path) -> Result<()> {
    log::info!("Downloading {} to {}", url, destination.display());

    // only the connect phase is bounded
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(None::<Duration>)
        .build()?;
    let response = client.get(url).send()?.error_for_status()?;
    let bytes = response.bytes()?;

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // a partial download must never be mistaken for a cached model
    let partial = destination.with_extension("part");
    fs::write(&partial, &bytes)?;
    fs::rename(&partial, destination)?;

    log::info!(
        "Model saved: {} ({})",
        destination.display(),
        crate::utils::format_file_size(bytes.len() as u64)
    );
    Ok(())
}

/// EDSR x2 frozen TensorFlow graph. Input and output are NHWC float
/// tensors holding BGR samples in 0..=255.
pub struct EdsrUpscaler {
    model: InferenceModel,
}

impl EdsrUpscaler {
    pub fn from_path(path: &Path) -> Result<Self> {
        log::debug!("Loading super-resolution graph from {}", path.display());

        let model = tract_tensorflow::tensorflow()
            .model_for_path(path)
            .map_err(|e| inference_error("failed to load model", e))?;

        Ok(Self { model })
    }
}

impl Upscaler for EdsrUpscaler {
    fn name(&self) -> &str {
        "EDSR x2"
    }

    fn scale(&self) -> u32 {
        2
    }

    fn upscale(&self, image: &DynamicImage) -> Result<DynamicImage> {
        let rgb = image.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);

        let plan = self
            .model
            .clone()
            .with_input_fact(0, f32::fact([1, height, width, 3]).into())
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| inference_error("failed to prepare model", e))?;

        let input: Tensor =
            tract_ndarray::Array4::from_shape_fn((1, height, width, 3), |(_, y, x, c)| {
                rgb.get_pixel(x as u32, y as u32).0[2 - c] as f32
            })
            .into();

        let outputs = plan
            .run(tvec!(input.into()))
            .map_err(|e| inference_error("inference failed", e))?;

        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| inference_error("unexpected output tensor", e))?
            .into_dimensionality::<tract_ndarray::Ix4>()
            .map_err(|e| inference_error("unexpected output rank", e))?;

        let (_, out_height, out_width, channels) = view.dim();
        if channels != 3 {
            return Err(ImageToolError::ProcessingError(format!(
                "model produced {} channels, expected 3",
                channels
            )));
        }

        let output = RgbImage::from_fn(out_width as u32, out_height as u32, |x, y| {
            let sample = |c: usize| {
                view[(0, y as usize, x as usize, 2 - c)]
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            Rgb([sample(0), sample(1), sample(2)])
        });

        Ok(DynamicImage::ImageRgb8(output))
    }
}

fn inference_error(context: &str, error: impl std::fmt::Display) -> ImageToolError {
    ImageToolError::ProcessingError(format!("{}: {}", context, error))
}

/// Full enhance pipeline: network upsample, a detail pass, then a linear
/// contrast/brightness lift.
pub struct Enhancer {
    detail_sigma: f32,
    detail_threshold: i32,
    contrast: f32,
    brightness: f32,
}

impl Enhancer {
    pub fn new() -> Self {
        Self {
            detail_sigma: 2.0,
            detail_threshold: 1,
            contrast: 1.2,
            brightness: 10.0,
        }
    }

    pub fn enhance(&self, upscaler: &dyn Upscaler, image: &DynamicImage) -> Result<DynamicImage> {
        let scale = upscaler.scale();
        let (width, height) = image.dimensions();
        match (width.checked_mul(scale), height.checked_mul(scale)) {
            (Some(w), Some(h)) => check_output_size(w, h)?,
            _ => {
                return Err(ImageToolError::InvalidParameter(format!(
                    "{}x upscale of {}x{} is too large",
                    scale, width, height
                )))
            }
        }

        log::debug!("Upscaling with {}", upscaler.name());

        let upscaled = upscaler.upscale(image)?;
        let detailed = upscaled.unsharpen(self.detail_sigma, self.detail_threshold);

        Ok(DynamicImage::ImageRgb8(self.lift(detailed.to_rgb8())))
    }

    fn lift(&self, mut image: RgbImage) -> RgbImage {
        for pixel in image.pixels_mut() {
            for value in pixel.0.iter_mut() {
                let scaled = (*value as f32 * self.contrast + self.brightness).abs();
                *value = scaled.round().min(255.0) as u8;
            }
        }
        image
    }
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::new()
    }
}
