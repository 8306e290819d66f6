// pixie-batch/src/cli.rs
use crate::command::Action;
use crate::core::{ModelConfig, Operation, ProcessConfig, DEFAULT_MODEL_PATH, DEFAULT_MODEL_URL};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Batch image processing. Starts an interactive prompt when no command is given.
#[derive(Parser)]
#[command(name = "pixie-batch")]
#[command(version)]
#[command(about = "Resize, convert, filter, AI-enhance and organize folders of images", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory that receives output files
    #[arg(short, long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// JPEG quality (1-100)
    #[arg(short, long, global = true, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Skip lossless recompression of PNG outputs
    #[arg(long, global = true)]
    pub no_png_optimize: bool,

    /// Super-resolution model file, downloaded on first use when missing
    #[arg(long, global = true, default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Where to download the model from
    #[arg(long, global = true, default_value = DEFAULT_MODEL_URL)]
    pub model_url: String,

    /// Do not load the super-resolution model
    #[arg(long, global = true)]
    pub no_model: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resize every image to WIDTH x HEIGHT
    Resize {
        /// Source directory
        input: PathBuf,
        #[arg(allow_hyphen_values = true)]
        width: String,
        #[arg(allow_hyphen_values = true)]
        height: String,
    },

    /// Convert every image to FORMAT (jpg/png/bmp)
    Convert {
        /// Source directory
        input: PathBuf,
        format: String,
    },

    /// Apply a filter (brightness/contrast/sharpen/grayscale) with an intensity
    Filter {
        /// Source directory
        input: PathBuf,
        name: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Upscale every image 2x with the super-resolution model
    Enhance {
        /// Source directory
        input: PathBuf,
    },

    /// Move images into subfolders named after their extension
    Organize {
        /// Source directory
        input: PathBuf,
    },
}

impl Cli {
    pub fn process_config(&self) -> ProcessConfig {
        ProcessConfig {
            output_dir: self.output_dir.clone(),
            quality: self.quality,
            optimize_png: !self.no_png_optimize,
            model: ModelConfig {
                enabled: !self.no_model,
                path: self.model.clone(),
                url: self.model_url.clone(),
            },
        }
    }
}

impl Commands {
    pub fn into_action(self) -> (PathBuf, Action) {
        match self {
            Commands::Resize {
                input,
                width,
                height,
            } => (
                input,
                Action::Batch(Operation::Resize { width, height }),
            ),
            Commands::Convert { input, format } => {
                (input, Action::Batch(Operation::Convert { format }))
            }
            Commands::Filter { input, name, value } => {
                (input, Action::Batch(Operation::Filter { name, value }))
            }
            Commands::Enhance { input } => (input, Action::Batch(Operation::Enhance)),
            Commands::Organize { input } => (input, Action::Organize),
        }
    }
}
