// pixie-batch/src/processors/batch.rs
use super::organizer::Organizer;
use crate::core::processor::ImageProcessor;
use crate::core::{BatchJob, ImageToolError, Result};
use crate::report::{Notice, Reporter};
use crate::utils::{get_file_extension, is_supported_format};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file in the source directory with a recognized image extension.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub path: PathBuf,
    pub name: String,
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Succeeded { file: String, output: PathBuf },
    Failed { file: String, reason: String },
}

impl FileOutcome {
    pub fn file(&self) -> &str {
        match self {
            FileOutcome::Succeeded { file, .. } | FileOutcome::Failed { file, .. } => file,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn merge(&mut self, outcome: &FileOutcome) {
        self.attempted += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for outcome in &self.outcomes {
            summary.merge(outcome);
        }
        summary
    }
}

/// Runs one operation over every candidate in a directory, one file at a
/// time. A failing file is recorded and reported; it never stops the batch.
pub struct BatchRunner {
    processor: ImageProcessor,
    organizer: Organizer,
}

impl BatchRunner {
    pub fn new(processor: ImageProcessor) -> Self {
        Self {
            processor,
            organizer: Organizer::new(),
        }
    }

    pub fn processor(&self) -> &ImageProcessor {
        &self.processor
    }

    pub fn run(&self, job: &BatchJob, reporter: &mut dyn Reporter) -> Result<BatchReport> {
        let candidates = collect_candidates(&job.directory)?;

        if candidates.is_empty() {
            log::warn!("No image files found in {}", job.directory.display());
            reporter.notice(Notice::NothingToDo {
                directory: job.directory.clone(),
            });
            return Ok(BatchReport::default());
        }

        log::info!(
            "Running {} over {} images from {}",
            job.operation.name(),
            candidates.len(),
            job.directory.display()
        );

        let sources = source_set(&candidates);
        reporter.begin(candidates.len());

        let outcomes = candidates
            .iter()
            .map(|candidate| {
                let outcome = self.process_candidate(job, candidate, &sources);
                if let FileOutcome::Failed { file, reason } = &outcome {
                    reporter.notice(Notice::FileFailed {
                        file: file.clone(),
                        reason: reason.clone(),
                    });
                }
                reporter.advance(&outcome);
                outcome
            })
            .collect();

        let report = BatchReport { outcomes };
        reporter.notice(Notice::Complete(report.summary()));

        Ok(report)
    }

    pub fn organize(&self, directory: &Path, reporter: &mut dyn Reporter) -> Result<BatchReport> {
        self.organizer.organize(directory, reporter)
    }

    fn process_candidate(
        &self,
        job: &BatchJob,
        candidate: &Candidate,
        sources: &HashSet<PathBuf>,
    ) -> FileOutcome {
        let result = job.operation.resolve().and_then(|transform| {
            self.processor
                .process(&candidate.path, &transform, sources)
        });

        match result {
            Ok(output) => {
                log::debug!("{} -> {}", candidate.name, output.display());
                FileOutcome::Succeeded {
                    file: candidate.name.clone(),
                    output,
                }
            }
            Err(e) => {
                log::debug!("{} failed: {}", candidate.name, e);
                FileOutcome::Failed {
                    file: candidate.name.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn source_set(candidates: &[Candidate]) -> HashSet<PathBuf> {
    candidates
        .iter()
        .map(|candidate| {
            candidate
                .path
                .canonicalize()
                .unwrap_or_else(|_| candidate.path.clone())
        })
        .collect()
}

/// Lists the top-level files of `directory` with a supported extension.
/// Order follows the directory listing.
pub fn collect_candidates(directory: &Path) -> Result<Vec<Candidate>> {
    if !directory.is_dir() {
        return Err(ImageToolError::DirectoryNotFound(directory.to_path_buf()));
    }

    let candidates = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            if !is_supported_format(entry.path()) {
                return None;
            }
            let extension = get_file_extension(entry.path())?;
            let name = entry.file_name().to_string_lossy().into_owned();
            Some(Candidate {
                path: entry.into_path(),
                name,
                extension,
            })
        })
        .collect();

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    #[test]
    fn test_candidates_filter_by_extension_case_insensitive() {
        let temp = TempDir::new().unwrap();
        for name in ["a.jpg", "b.JPEG", "c.Png", "d.bmp", "e.gif", "f.txt", "noext"] {
            temp.child(name).write_str("x").unwrap();
        }
        temp.child("nested").create_dir_all().unwrap();
        temp.child("nested/g.png").write_str("x").unwrap();
        temp.child("dir.png").create_dir_all().unwrap();

        let mut names: Vec<String> = collect_candidates(temp.path())
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.jpg", "b.JPEG", "c.Png", "d.bmp"]);
    }

    #[test]
    fn test_candidate_extension_is_lowercased() {
        let temp = TempDir::new().unwrap();
        temp.child("photo.JPG").write_str("x").unwrap();

        let candidates = collect_candidates(temp.path()).unwrap();
        assert_eq!(candidates[0].extension, "jpg");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_are_listed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9.png");
        std::fs::write(temp.path().join(raw), b"x").unwrap();

        let candidates = collect_candidates(temp.path()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, temp.path().join(raw));
        assert_eq!(candidates[0].name, "caf\u{FFFD}.png");
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        assert!(matches!(
            collect_candidates(&missing),
            Err(ImageToolError::DirectoryNotFound(path)) if path == missing
        ));
    }

    #[test]
    fn test_summary_tally() {
        let report = BatchReport {
            outcomes: vec![
                FileOutcome::Succeeded {
                    file: "a.png".into(),
                    output: PathBuf::from("resized_a.png"),
                },
                FileOutcome::Failed {
                    file: "b.png".into(),
                    reason: "broken".into(),
                },
            ],
        };

        assert_eq!(
            report.summary(),
            BatchSummary {
                attempted: 2,
                succeeded: 1,
                failed: 1
            }
        );
    }
}
