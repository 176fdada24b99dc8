pub mod application;
pub mod cursor;
pub mod domain;
mod error;
pub mod formats;
pub mod infrastructure;
pub mod presentation;
pub mod types;

pub use application::{ValidateImageUseCase, ValidationError};
pub use application::dto::{BatchSummary, ScrubJob, ScrubReport, ValidationOptions};
pub use domain::repositories::{ImageWriter, WriteOptions, WriterError};
pub use error::{Result, ScrubError};
pub use formats::{ImageCodec, codec_for, select_codec, sniff};
pub use infrastructure::persistence::LocalFileWriter;
pub use types::{Disposition, ImageFormat, Unit, UnitKind};
