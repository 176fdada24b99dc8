//! Repository traits (interfaces)
//!
//! These traits define the contracts for external dependencies.

mod file_writer;

pub use file_writer::{ImageWriter, WriteOptions, WriteResult, WriterError};
