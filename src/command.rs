// pixie-batch/src/command.rs
use crate::core::{BatchJob, ImageToolError, ModelConfig, Operation, Result};
use crate::processors::{collect_candidates, BatchReport, BatchRunner, SuperResolution};
use crate::report::Reporter;
use std::path::Path;
use std::str::FromStr;

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Action),
    Help,
    Exit,
}

/// Work that targets a directory.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Batch(Operation),
    Organize,
}

pub const HELP_ENTRIES: [(&str, &str); 7] = [
    ("resize <width> <height>", "Resize images to specified dimensions"),
    ("convert <format>", "Convert images to specified format (jpg/png/bmp)"),
    ("filter <name> <value>", "Apply filter (brightness/contrast/sharpen/grayscale)"),
    ("enhance", "Apply AI enhancement to improve image quality (2x upscale)"),
    ("organize", "Organize images into folders by format"),
    ("help", "Show this help message"),
    ("exit", "Exit the program"),
];

impl FromStr for Command {
    type Err = ImageToolError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.to_lowercase();
        let parts: Vec<&str> = line.split_whitespace().collect();

        let command = match parts.as_slice() {
            ["exit"] => Command::Exit,
            ["help"] => Command::Help,
            ["resize", width, height] => Command::Run(Action::Batch(Operation::Resize {
                width: width.to_string(),
                height: height.to_string(),
            })),
            ["convert", format] => Command::Run(Action::Batch(Operation::Convert {
                format: format.to_string(),
            })),
            ["filter", name, value] => Command::Run(Action::Batch(Operation::Filter {
                name: name.to_string(),
                value: value.to_string(),
            })),
            ["enhance"] => Command::Run(Action::Batch(Operation::Enhance)),
            ["organize"] => Command::Run(Action::Organize),
            _ => return Err(ImageToolError::InvalidCommand(line.trim().to_string())),
        };

        Ok(command)
    }
}

impl Action {
    pub fn needs_model(&self) -> bool {
        matches!(self, Action::Batch(Operation::Enhance))
    }

    /// Model capability for a one-shot run. The directory is listed first,
    /// so a missing directory or one without images never loads or
    /// downloads the model.
    pub fn super_resolution(
        &self,
        directory: &Path,
        model: &ModelConfig,
        reporter: &mut dyn Reporter,
    ) -> Result<SuperResolution> {
        if !self.needs_model() {
            return Ok(SuperResolution::Unavailable(
                "model not loaded for this command".to_string(),
            ));
        }

        if collect_candidates(directory)?.is_empty() {
            return Ok(SuperResolution::Unavailable(
                "no images to enhance".to_string(),
            ));
        }

        Ok(SuperResolution::initialize(model, reporter))
    }

    pub fn execute(
        &self,
        runner: &BatchRunner,
        directory: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<BatchReport> {
        match self {
            Action::Batch(operation) => {
                let job = BatchJob {
                    directory: directory.to_path_buf(),
                    operation: operation.clone(),
                };
                runner.run(&job, reporter)
            }
            Action::Organize => runner.organize(directory, reporter),
        }
    }
}
