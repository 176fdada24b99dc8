//! Format codecs and the dispatcher that picks one.
//!
//! Each codec walks its container grammar into an ordered list of [`Unit`]s
//! and marks which of them carry removable metadata. Stripping is the same
//! for every format: copy the retained units, in order, into a fresh buffer.

pub mod gif;
pub mod jpeg;
pub mod png;

use crate::cursor::OutputSink;
use crate::error::{Result, ScrubError};
use crate::types::{ImageFormat, Unit};
use std::path::Path;

pub use gif::GifCodec;
pub use jpeg::JpegCodec;
pub use png::PngCodec;

/// A container grammar that can be recognised and stripped.
///
/// Implementations must never read past the end of the buffer; every
/// malformed input surfaces as a [`ScrubError`].
pub trait ImageCodec: Send + Sync {
    fn format(&self) -> ImageFormat;

    /// True iff the buffer starts with this format's magic bytes.
    fn detect(&self, data: &[u8]) -> bool;

    /// Walks the full structure and returns every unit in input order.
    fn walk(&self, data: &[u8]) -> Result<Vec<Unit>>;

    /// Returns a copy of `data` with every dropped unit removed.
    fn strip(&self, data: &[u8]) -> Result<Vec<u8>> {
        let units = self.walk(data)?;
        assemble(data, &units)
    }
}

static GIF: GifCodec = GifCodec;
static JPEG: JpegCodec = JpegCodec;
static PNG: PngCodec = PngCodec;

pub fn codec_for(format: ImageFormat) -> &'static dyn ImageCodec {
    match format {
        ImageFormat::Gif => &GIF,
        ImageFormat::Jpeg => &JPEG,
        ImageFormat::Png => &PNG,
    }
}

/// Chooses a codec from a file extension alone. Content is not probed here;
/// the caller confirms the choice with [`ImageCodec::detect`].
pub fn select_codec(extension: &str) -> Result<&'static dyn ImageCodec> {
    let format = ImageFormat::from_extension(extension)
        .ok_or_else(|| ScrubError::UnsupportedFormat(extension.to_string()))?;
    tracing::debug!(%format, extension, "selected codec");
    Ok(codec_for(format))
}

pub fn codec_for_path(path: &Path) -> Result<&'static dyn ImageCodec> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    select_codec(extension)
}

/// Identifies a buffer by its signature alone.
pub fn sniff(data: &[u8]) -> Option<ImageFormat> {
    ImageFormat::ALL
        .into_iter()
        .find(|&format| codec_for(format).detect(data))
}

/// Copies every retained unit of `data` into a new buffer.
pub fn assemble(data: &[u8], units: &[Unit]) -> Result<Vec<u8>> {
    let mut sink = OutputSink::with_capacity(data.len());
    for unit in units {
        if unit.is_retained() {
            sink.append_range(data, unit.range())?;
        } else {
            tracing::debug!(
                offset = unit.offset,
                length = unit.length,
                kind = %unit.kind,
                "dropping unit"
            );
        }
    }
    Ok(sink.finish())
}
