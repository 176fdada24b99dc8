//! Data Transfer Objects

mod batch_summary;
mod scrub_report;
mod validation_options;

pub use batch_summary::{BatchSummary, ScrubJob};
pub use scrub_report::{ScrubOutcome, ScrubReport, UnitReport};
pub use validation_options::{DEFAULT_MAX_INPUT_SIZE, ValidationOptions};
