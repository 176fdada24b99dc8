//! Validation options DTO

use crate::domain::repositories::WriteOptions;

/// 10 MiB
pub const DEFAULT_MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

/// Options for validating and scrubbing images
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Inputs strictly larger than this are rejected before parsing
    pub max_input_size: usize,
    /// Whether an existing destination file may be replaced
    pub overwrite: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            overwrite: false,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input size cap in bytes
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            overwrite: self.overwrite,
        }
    }
}
