//! Local file writer implementation
//!
//! Writes scrubbed images to the local filesystem.

use crate::domain::repositories::{ImageWriter, WriteOptions, WriteResult, WriterError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Local file system writer
#[derive(Debug, Default)]
pub struct LocalFileWriter {
    files_written: AtomicUsize,
    bytes_written: AtomicU64,
}

impl LocalFileWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `<dir>/<stem> (1).<ext>` next to the source file.
pub fn sibling_output_path(source: &Path) -> PathBuf {
    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    let filename = match source.extension() {
        Some(ext) => format!("{} (1).{}", stem, ext.to_string_lossy()),
        None => format!("{} (1)", stem),
    };
    parent.join(filename)
}

/// Same file name, placed in `output_dir`.
pub fn output_path_in(output_dir: &Path, source: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) => output_dir.join(name),
        None => sibling_output_path(source),
    }
}

impl ImageWriter for LocalFileWriter {
    fn write(
        &self,
        destination: &Path,
        data: &[u8],
        options: &WriteOptions,
    ) -> Result<WriteResult, WriterError> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| match e.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    WriterError::PermissionDenied(parent.display().to_string())
                }
                std::io::ErrorKind::NotFound => {
                    WriterError::DirectoryNotFound(parent.display().to_string())
                }
                _ => WriterError::IoError(e),
            })?;
        }

        if destination.exists() && !options.overwrite {
            return Err(WriterError::FileExists(destination.display().to_string()));
        }

        let mut output_file = File::create(destination)?;
        output_file.write_all(data)?;
        output_file.sync_all()?;

        let saved_size = data.len() as u64;
        self.files_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(saved_size, Ordering::Relaxed);

        Ok(WriteResult {
            saved_path: destination.to_path_buf(),
            saved_size,
        })
    }

    fn files_written(&self) -> usize {
        self.files_written.load(Ordering::Relaxed)
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }
}
