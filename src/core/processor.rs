// pixie-batch/src/core/processor.rs
use super::{ImageToolError, ProcessConfig, Result, Transform, MAX_DIMENSION};
use crate::processors::{Compressor, Enhancer, FilterSet, Loader, Resizer, SuperResolution};
use crate::utils::output_file_name;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Applies one transform to one file and writes the result into the
/// configured output directory. Never touches a source file.
pub struct ImageProcessor {
    config: ProcessConfig,
    loader: Loader,
    resizer: Resizer,
    compressor: Compressor,
    filters: FilterSet,
    enhancer: Enhancer,
    super_resolution: SuperResolution,
}

impl ImageProcessor {
    pub fn new(config: ProcessConfig, super_resolution: SuperResolution) -> Self {
        let compressor = Compressor::new(config.quality).with_png_optimization(config.optimize_png);

        Self {
            config,
            loader: Loader::new(MAX_DIMENSION),
            resizer: Resizer::new(),
            compressor,
            filters: FilterSet::new(),
            enhancer: Enhancer::new(),
            super_resolution,
        }
    }

    pub fn super_resolution(&self) -> &SuperResolution {
        &self.super_resolution
    }

    /// `sources` holds the canonical paths of every file in the batch; an
    /// output that resolves to one of them is refused.
    pub fn process(
        &self,
        input_path: &Path,
        transform: &Transform,
        sources: &HashSet<PathBuf>,
    ) -> Result<PathBuf> {
        let file_name = input_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ImageToolError::InvalidParameter(format!(
                    "Invalid file name: {}",
                    input_path.display()
                ))
            })?;

        let output_path = self
            .config
            .output_dir
            .join(output_file_name(file_name, transform));
        guard_sources(&output_path, sources)?;

        // fail before decoding when the model is missing
        let upscaler = match transform {
            Transform::Enhance => Some(self.super_resolution.upscaler()?),
            _ => None,
        };

        let image = self.loader.load(input_path)?;

        let (image, format) = match transform {
            Transform::Resize { width, height } => (
                self.resizer.resize_exact(&image, *width, *height),
                self.loader.detect_format(input_path)?,
            ),
            Transform::Convert { format, .. } => (image, *format),
            Transform::Filter { kind, value } => (
                self.filters.apply(&image, *kind, *value),
                self.loader.detect_format(input_path)?,
            ),
            Transform::Enhance => {
                let upscaler = upscaler.ok_or_else(|| {
                    ImageToolError::ModelUnavailable("no upscaler resolved".to_string())
                })?;
                (
                    self.enhancer.enhance(upscaler, &image)?,
                    self.loader.detect_format(input_path)?,
                )
            }
        };

        std::fs::create_dir_all(&self.config.output_dir)?;
        self.compressor
            .save_with_format(&image, &output_path, format)?;

        Ok(output_path)
    }
}

fn guard_sources(output_path: &Path, sources: &HashSet<PathBuf>) -> Result<()> {
    if !output_path.exists() {
        return Ok(());
    }

    if sources.contains(&output_path.canonicalize()?) {
        return Err(ImageToolError::InvalidParameter(format!(
            "Output would overwrite the source file {}",
            output_path.display()
        )));
    }

    Ok(())
}
