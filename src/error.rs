use crate::types::ImageFormat;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrubError {
    #[error("Input of {size} bytes exceeds the {limit}-byte limit")]
    OversizedInput { size: usize, limit: usize },

    #[error("Unsupported format: {0:?}")]
    UnsupportedFormat(String),

    #[error("Content does not carry a {0} signature")]
    SignatureMismatch(ImageFormat),

    #[error("Unrecognized {format} marker 0x{marker:02X} at offset {offset}")]
    UnrecognizedMarker {
        format: ImageFormat,
        marker: u8,
        offset: usize,
    },

    #[error("Truncated input: {needed} bytes needed at offset {offset}, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{format} stream ended at offset {offset} without its terminator")]
    MissingTerminator { format: ImageFormat, offset: usize },

    #[error("Invalid {format} length field {length} at offset {offset}")]
    InvalidLength {
        format: ImageFormat,
        length: u64,
        offset: usize,
    },
}

pub type Result<T> = std::result::Result<T, ScrubError>;
