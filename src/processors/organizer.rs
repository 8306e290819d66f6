// pixie-batch/src/processors/organizer.rs
use super::batch::{collect_candidates, BatchReport, Candidate, FileOutcome};
use crate::core::{ImageToolError, Result};
use crate::report::{Notice, Reporter};
use std::fs;
use std::path::{Path, PathBuf};

/// Moves every candidate into a subfolder named after its lowercase
/// extension, e.g. `photos/a.JPG` -> `photos/jpg/a.JPG`.
///
/// Moves are isolated the same way batch transforms are: a file that
/// cannot be moved is reported and the remaining files are still moved.
pub struct Organizer;

impl Organizer {
    pub fn new() -> Self {
        Self
    }

    pub fn organize(&self, directory: &Path, reporter: &mut dyn Reporter) -> Result<BatchReport> {
        let candidates = collect_candidates(directory)?;

        if candidates.is_empty() {
            log::warn!("No image files to organize in {}", directory.display());
            reporter.notice(Notice::NothingToDo {
                directory: directory.to_path_buf(),
            });
            return Ok(BatchReport::default());
        }

        reporter.begin(candidates.len());

        let mut report = BatchReport::default();
        for candidate in &candidates {
            let outcome = match self.move_candidate(directory, candidate) {
                Ok(destination) => FileOutcome::Succeeded {
                    file: candidate.name.clone(),
                    output: destination,
                },
                Err(e) => {
                    reporter.notice(Notice::FileFailed {
                        file: candidate.name.clone(),
                        reason: e.to_string(),
                    });
                    FileOutcome::Failed {
                        file: candidate.name.clone(),
                        reason: e.to_string(),
                    }
                }
            };
            reporter.advance(&outcome);
            report.outcomes.push(outcome);
        }

        reporter.notice(Notice::Organized(report.summary()));
        Ok(report)
    }

    fn move_candidate(&self, directory: &Path, candidate: &Candidate) -> Result<PathBuf> {
        let folder = directory.join(&candidate.extension);
        fs::create_dir_all(&folder)?;

        let file_name = candidate.path.file_name().ok_or_else(|| {
            ImageToolError::InvalidParameter(format!(
                "Invalid file name: {}",
                candidate.path.display()
            ))
        })?;
        let destination = folder.join(file_name);
        fs::rename(&candidate.path, &destination)?;
        log::debug!(
            "Moved {} -> {}",
            candidate.path.display(),
            destination.display()
        );

        Ok(destination)
    }
}

impl Default for Organizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReporter;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    #[test]
    fn test_moves_keep_the_original_name() {
        let temp = TempDir::new().unwrap();
        temp.child("Photo.JPG").write_str("x").unwrap();

        let mut reporter = MemoryReporter::default();
        let report = Organizer::new()
            .organize(temp.path(), &mut reporter)
            .unwrap();

        assert_eq!(report.summary().succeeded, 1);
        assert!(temp.child("jpg/Photo.JPG").path().is_file());
        assert_eq!(reporter.advanced, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_moved_unchanged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9.png");
        fs::write(temp.path().join(raw), b"x").unwrap();

        let mut reporter = MemoryReporter::default();
        let report = Organizer::new()
            .organize(temp.path(), &mut reporter)
            .unwrap();

        assert_eq!(report.summary().succeeded, 1);
        assert!(temp.path().join("png").join(raw).is_file());
        assert!(!temp.path().join(raw).exists());
    }
}
