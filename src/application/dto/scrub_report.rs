//! Per-image scrub results

use crate::formats::png;
use crate::types::{Disposition, ImageFormat, Unit};
use serde::Serialize;
use std::path::PathBuf;

/// Output of scrubbing one in-memory buffer
#[derive(Debug, Clone)]
pub struct ScrubOutcome {
    pub format: ImageFormat,
    pub original_size: usize,
    /// The scrubbed image
    pub data: Vec<u8>,
    /// Every unit walked in the input, retained and dropped
    pub units: Vec<Unit>,
}

impl ScrubOutcome {
    pub fn bytes_removed(&self) -> usize {
        self.original_size - self.data.len()
    }

    pub fn removed_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| !u.is_retained())
    }
}

/// Serializable description of one walked unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub offset: usize,
    pub length: usize,
    pub kind: String,
    pub disposition: Disposition,
    /// Only for PNG chunks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crc_valid: Option<bool>,
}

impl UnitReport {
    pub fn from_unit(data: &[u8], unit: &Unit) -> Self {
        Self {
            offset: unit.offset,
            length: unit.length,
            kind: unit.kind.to_string(),
            disposition: unit.disposition,
            crc_valid: png::verify_chunk_crc(data, unit),
        }
    }

    pub fn from_units<'a>(data: &[u8], units: impl IntoIterator<Item = &'a Unit>) -> Vec<Self> {
        units
            .into_iter()
            .map(|unit| Self::from_unit(data, unit))
            .collect()
    }
}

/// Result of a validated and persisted image
#[derive(Debug, Clone, Serialize)]
pub struct ScrubReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    pub destination: PathBuf,
    pub format: ImageFormat,
    pub original_size: usize,
    pub scrubbed_size: usize,
    pub removed: Vec<UnitReport>,
}

impl ScrubReport {
    pub fn bytes_removed(&self) -> usize {
        self.original_size - self.scrubbed_size
    }
}
