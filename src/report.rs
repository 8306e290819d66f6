// pixie-batch/src/report.rs
use crate::processors::{BatchSummary, FileOutcome};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    NothingToDo { directory: PathBuf },
    FileFailed { file: String, reason: String },
    Complete(BatchSummary),
    Organized(BatchSummary),
    ModelDownloading { url: String },
    ModelReady { name: String },
    ModelUnavailable { reason: String },
}

/// Receives everything a batch wants to tell the user.
pub trait Reporter {
    fn begin(&mut self, total: usize);
    fn advance(&mut self, outcome: &FileOutcome);
    fn notice(&mut self, notice: Notice);
}

pub struct ConsoleReporter {
    progress: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self { progress: None }
    }

    fn print(&self, line: String) {
        match &self.progress {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }

    fn finish(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn begin(&mut self, total: usize) {
        self.finish();
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Processing images...");
        self.progress = Some(pb);
    }

    fn advance(&mut self, outcome: &FileOutcome) {
        if let Some(pb) = &self.progress {
            pb.set_message(outcome.file().to_string());
            pb.inc(1);
        }
    }

    fn notice(&mut self, notice: Notice) {
        match notice {
            Notice::NothingToDo { directory } => self.print(format!(
                "{} No supported image files found in {}",
                "[WARN]".yellow().bold(),
                directory.display()
            )),
            Notice::FileFailed { file, reason } => self.print(format!(
                "{} Error processing {}: {}",
                "[ERR]".red().bold(),
                file,
                reason
            )),
            Notice::Complete(summary) => {
                self.finish();
                println!(
                    "{} Processing complete: {} attempted, {} succeeded, {} failed",
                    "[DONE]".green().bold(),
                    summary.attempted,
                    summary.succeeded,
                    summary.failed
                );
            }
            Notice::Organized(summary) => {
                self.finish();
                println!(
                    "{} Images organized: {} moved, {} failed",
                    "[DONE]".green().bold(),
                    summary.succeeded,
                    summary.failed
                );
            }
            Notice::ModelDownloading { url } => self.print(format!(
                "{} Downloading AI enhancement model from {}",
                "[*]".blue().bold(),
                url
            )),
            Notice::ModelReady { name } => self.print(format!(
                "{} AI enhancement model loaded ({})",
                "[OK]".green().bold(),
                name
            )),
            Notice::ModelUnavailable { reason } => self.print(format!(
                "{} Failed to load AI model: {}",
                "[WARN]".yellow().bold(),
                reason
            )),
        }
    }
}

/// Keeps every notice in memory instead of printing it.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub started: Option<usize>,
    pub advanced: usize,
    pub notices: Vec<Notice>,
}

impl MemoryReporter {
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::FileFailed { file, reason } => Some((file.as_str(), reason.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<BatchSummary> {
        self.notices
            .iter()
            .filter_map(|notice| match notice {
                Notice::Complete(summary) | Notice::Organized(summary) => Some(*summary),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn begin(&mut self, total: usize) {
        self.started = Some(total);
    }

    fn advance(&mut self, _outcome: &FileOutcome) {
        self.advanced += 1;
    }

    fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
