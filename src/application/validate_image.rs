//! Validate image use case
//!
//! Enforces the size cap, picks a codec from the destination extension,
//! confirms the content signature, strips metadata and hands the result to
//! the writer. Failures of any kind end up as a rejected input.

use crate::application::dto::{
    BatchSummary, ScrubJob, ScrubOutcome, ScrubReport, UnitReport, ValidationOptions,
};
use crate::domain::repositories::{ImageWriter, WriterError};
use crate::error::ScrubError;
use crate::formats::{self, assemble};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Scrub(#[from] ScrubError),

    #[error("Failed to write scrubbed image: {0}")]
    Write(#[from] WriterError),
}

pub struct ValidateImageUseCase<W: ImageWriter> {
    writer: W,
    options: ValidationOptions,
}

impl<W: ImageWriter> ValidateImageUseCase<W> {
    pub fn new(writer: W, options: ValidationOptions) -> Self {
        Self { writer, options }
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Scrubs an in-memory buffer without touching the filesystem.
    pub fn scrub(&self, source: &[u8], extension: &str) -> Result<ScrubOutcome, ScrubError> {
        if source.len() > self.options.max_input_size {
            return Err(ScrubError::OversizedInput {
                size: source.len(),
                limit: self.options.max_input_size,
            });
        }

        let codec = formats::select_codec(extension)?;
        if !codec.detect(source) {
            return Err(ScrubError::SignatureMismatch(codec.format()));
        }

        let units = codec.walk(source)?;
        let data = assemble(source, &units)?;
        Ok(ScrubOutcome {
            format: codec.format(),
            original_size: source.len(),
            data,
            units,
        })
    }

    /// Scrubs `source` and writes the result to `destination`, whose
    /// extension selects the codec.
    pub fn execute(
        &self,
        source: &[u8],
        destination: &Path,
    ) -> Result<ScrubReport, ValidationError> {
        let extension = destination
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let outcome = self.scrub(source, extension)?;

        let write_result =
            self.writer
                .write(destination, &outcome.data, &self.options.write_options())?;

        tracing::info!(
            destination = %write_result.saved_path.display(),
            format = %outcome.format,
            removed = outcome.bytes_removed(),
            "scrubbed image"
        );

        Ok(ScrubReport {
            source: None,
            destination: write_result.saved_path,
            format: outcome.format,
            original_size: outcome.original_size,
            scrubbed_size: outcome.data.len(),
            removed: UnitReport::from_units(source, outcome.removed_units()),
        })
    }

    /// Boolean entry point: true iff the image was scrubbed and persisted.
    pub fn validate(&self, source: &[u8], destination: &Path) -> bool {
        match self.execute(source, destination) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(destination = %destination.display(), error = %e, "rejected image");
                false
            }
        }
    }

    /// Reads `source_path` (after checking its size on disk) and scrubs it
    /// into `destination`.
    pub fn execute_file(
        &self,
        source_path: &Path,
        destination: &Path,
    ) -> Result<ScrubReport, ValidationError> {
        let data = self.load_source(source_path)?;
        let mut report = self.execute(&data, destination)?;
        report.source = Some(source_path.to_path_buf());
        Ok(report)
    }

    /// Scrubs every job in parallel; jobs share no state besides the writer.
    pub fn execute_batch(&self, jobs: &[ScrubJob]) -> BatchSummary {
        let start_time = Instant::now();
        tracing::info!("Starting scrub of {} file(s)", jobs.len());

        let results: Vec<(&ScrubJob, Result<ScrubReport, ValidationError>)> = jobs
            .par_iter()
            .map(|job| (job, self.execute_file(&job.source, &job.destination)))
            .collect();

        let mut summary = BatchSummary::new();
        for (job, result) in results {
            match result {
                Ok(report) => summary.add_scrubbed(report),
                Err(e) => {
                    tracing::warn!(source = %job.source.display(), error = %e, "rejected image");
                    summary.add_error(format!("{}: {}", job.source.display(), e));
                }
            }
        }
        summary.duration = start_time.elapsed();

        tracing::info!(
            "Scrub complete: {} file(s) scrubbed, {} rejected in {:.2}s",
            summary.files_scrubbed,
            summary.failed_files,
            summary.duration.as_secs_f64()
        );
        summary
    }

    fn load_source(&self, path: &Path) -> Result<Vec<u8>, ValidationError> {
        let read_error = |source| ValidationError::Read {
            path: path.to_path_buf(),
            source,
        };

        let size = fs::metadata(path).map_err(read_error)?.len();
        let limit = self.options.max_input_size;
        if size > limit as u64 {
            return Err(ScrubError::OversizedInput {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                limit,
            }
            .into());
        }

        fs::read(path).map_err(read_error)
    }
}
