//! Image writer trait
//!
//! Defines the interface for persisting scrubbed images.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when writing scrubbed images
#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("File already exists: {0}")]
    FileExists(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Options for writing scrubbed images
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Whether to replace an existing file at the destination
    pub overwrite: bool,
}

/// Result of writing a single image
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Path the image was saved to
    pub saved_path: PathBuf,
    /// Size in bytes of the saved image
    pub saved_size: u64,
}

/// Trait for persisting scrubbed images
///
/// Keeps the scrubbing core free of filesystem concerns so tests and
/// embedders can capture output elsewhere.
///
/// # Example
///
/// ```ignore
/// let writer = LocalFileWriter::new();
/// let result = writer.write(Path::new("clean.png"), &bytes, &WriteOptions::default())?;
/// println!("Saved to: {}", result.saved_path.display());
/// ```
pub trait ImageWriter: Send + Sync {
    /// Writes `data` to `destination`
    fn write(
        &self,
        destination: &Path,
        data: &[u8],
        options: &WriteOptions,
    ) -> Result<WriteResult, WriterError>;

    /// Returns the number of files written so far
    fn files_written(&self) -> usize;

    /// Returns the total bytes written so far
    fn bytes_written(&self) -> u64;
}
