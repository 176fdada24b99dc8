//! Batch summary DTO

use crate::application::dto::ScrubReport;
use crate::types::ImageFormat;
use humansize::{BINARY, format_size};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// One file to scrub and where to write the result
#[derive(Debug, Clone)]
pub struct ScrubJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl ScrubJob {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Result of scrubbing a batch of files
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Files validated, scrubbed and written
    pub files_scrubbed: usize,
    /// Scrubbed files by format
    pub files_by_format: HashMap<ImageFormat, usize>,
    /// Metadata bytes removed across all files
    pub bytes_removed: u64,
    /// Bytes written across all files
    pub bytes_written: u64,
    /// Duration of the batch
    pub duration: Duration,
    /// One message per rejected file
    pub errors: Vec<String>,
    /// Files that were rejected
    pub failed_files: usize,
    pub reports: Vec<ScrubReport>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scrubbed(&mut self, report: ScrubReport) {
        self.files_scrubbed += 1;
        *self.files_by_format.entry(report.format).or_insert(0) += 1;
        self.bytes_removed += report.bytes_removed() as u64;
        self.bytes_written += report.scrubbed_size as u64;
        self.reports.push(report);
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
        self.failed_files += 1;
    }

    pub fn is_success(&self) -> bool {
        self.failed_files == 0
    }

    /// Returns success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.files_scrubbed + self.failed_files;
        if total == 0 {
            return 1.0;
        }
        self.files_scrubbed as f64 / total as f64
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Scrubbed {} file(s), removed {} of metadata in {:.2}s\n",
            self.files_scrubbed,
            format_size(self.bytes_removed, BINARY),
            self.duration.as_secs_f64()
        );

        let mut formats: Vec<_> = self.files_by_format.iter().collect();
        formats.sort_by_key(|(format, _)| format.name());
        for (format, count) in formats {
            summary.push_str(&format!("  - {}: {}\n", format, count));
        }

        if !self.errors.is_empty() {
            summary.push_str(&format!("\n{} file(s) rejected\n", self.failed_files));
            for error in &self.errors {
                summary.push_str(&format!("  - {}\n", error));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(format: ImageFormat, original_size: usize, scrubbed_size: usize) -> ScrubReport {
        ScrubReport {
            source: None,
            destination: PathBuf::from("out"),
            format,
            original_size,
            scrubbed_size,
            removed: Vec::new(),
        }
    }

    #[test]
    fn test_accumulates_counts() {
        let mut summary = BatchSummary::new();
        summary.add_scrubbed(report(ImageFormat::Png, 100, 60));
        summary.add_scrubbed(report(ImageFormat::Png, 50, 50));
        summary.add_error("bad.gif: truncated".to_string());

        assert_eq!(summary.files_scrubbed, 2);
        assert_eq!(summary.files_by_format[&ImageFormat::Png], 2);
        assert_eq!(summary.bytes_removed, 40);
        assert_eq!(summary.bytes_written, 110);
        assert!(!summary.is_success());
        assert!((summary.success_rate() - 2.0 / 3.0).abs() < 1e-9);

        let text = summary.summary();
        assert!(text.contains("Scrubbed 2 file(s)"));
        assert!(text.contains("PNG: 2"));
        assert!(text.contains("bad.gif: truncated"));
    }

    #[test]
    fn test_empty_batch_is_success() {
        let summary = BatchSummary::new();
        assert!(summary.is_success());
        assert_eq!(summary.success_rate(), 1.0);
    }
}
