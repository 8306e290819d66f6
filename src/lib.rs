mod cli;
mod command;
mod core;
mod processors;
mod repl;
mod report;
mod utils;

pub use cli::{Cli, Commands};
pub use command::{Action, Command, HELP_ENTRIES};
pub use crate::core::processor::ImageProcessor;
pub use crate::core::{
    BatchJob, FilterKind, ImageToolError, ModelConfig, Operation, ProcessConfig,
    Result, Transform, DEFAULT_MODEL_PATH, DEFAULT_MODEL_URL, SUPPORTED_EXTENSIONS,
};
pub use processors::{
    collect_candidates, BatchReport, BatchRunner, BatchSummary, Candidate, Compressor,
    EdsrUpscaler, Enhancer, FileOutcome, FilterSet, Loader, Organizer, Resizer,
    SuperResolution, Upscaler,
};
pub use repl::Repl;
pub use report::{ConsoleReporter, MemoryReporter, Notice, Reporter};
pub use utils::{format_file_size, is_supported_format, output_file_name};

pub mod prelude {
    pub use crate::{
        Action, BatchJob, BatchRunner, ImageProcessor, MemoryReporter, Operation, ProcessConfig,
        Reporter, SuperResolution,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
