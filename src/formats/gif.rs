//! GIF block walker.
//!
//! Layout: 13-byte header (+ global color table), then a sequence of image
//! blocks (`0x2C`) and extension blocks (`0x21`), ended by the trailer
//! (`0x3B`). Comment, plain text and application extensions are dropped.

use crate::cursor::ByteCursor;
use crate::error::{Result, ScrubError};
use crate::formats::ImageCodec;
use crate::types::{GifExtension, ImageFormat, Unit, UnitKind};

pub const GIF_SIGNATURE: [u8; 3] = *b"GIF";
pub const GIF_VERSION_87A: [u8; 3] = *b"87a";
pub const GIF_VERSION_89A: [u8; 3] = *b"89a";

pub const IMAGE_SEPARATOR: u8 = 0x2C;
pub const EXTENSION_INTRODUCER: u8 = 0x21;
pub const TRAILER: u8 = 0x3B;
const BLOCK_TERMINATOR: u8 = 0x00;

const HEADER_SIZE: usize = 13;
const HEADER_PACKED_OFFSET: usize = 10;
const IMAGE_DESCRIPTOR_SIZE: usize = 10;
const IMAGE_PACKED_OFFSET: usize = 9;
const LZW_MIN_CODE_SIZE_LEN: usize = 1;
const EXTENSION_LABEL_OFFSET: usize = 1;

const COLOR_TABLE_FLAG: u8 = 0x80;
const COLOR_TABLE_SIZE_MASK: u8 = 0x07;
const BYTES_PER_COLOR: usize = 3;

/// Bytes of a color table announced by a header or image descriptor packed
/// field: `3 * 2^(n + 1)` when the table flag is set, otherwise zero.
#[inline]
pub const fn color_table_size(packed: u8) -> usize {
    if packed & COLOR_TABLE_FLAG == 0 {
        return 0;
    }
    BYTES_PER_COLOR << ((packed & COLOR_TABLE_SIZE_MASK) + 1)
}

/// Bytes between the extension introducer and its first data sub-block
/// length byte.
const fn extension_header_len(ext: GifExtension) -> usize {
    match ext {
        GifExtension::GraphicControl | GifExtension::Comment => 2,
        // introducer, label, block size 11, 8-byte identifier, 3-byte auth code
        GifExtension::Application => 14,
        // introducer, label, block size 12, 12 bytes of text grid parameters
        GifExtension::PlainText => 15,
    }
}

/// Length of a sub-block chain starting `rel` bytes past `cursor`,
/// terminator included. Only length bytes are read here; the caller
/// bounds-checks the whole unit.
fn sub_block_chain_len(cursor: ByteCursor<'_>, rel: usize) -> Result<usize> {
    let mut offset = rel;
    loop {
        let size = cursor.byte_at(offset)?;
        offset += 1 + size as usize;
        if size == BLOCK_TERMINATOR {
            return Ok(offset - rel);
        }
    }
}

fn read_header(cursor: ByteCursor<'_>) -> Result<(Unit, ByteCursor<'_>)> {
    let packed = cursor.byte_at(HEADER_PACKED_OFFSET)?;
    let length = HEADER_SIZE + color_table_size(packed);
    let next = cursor.advance(length)?;
    Ok((Unit::retained(0, length, UnitKind::GifHeader), next))
}

fn read_image(cursor: ByteCursor<'_>) -> Result<(Unit, ByteCursor<'_>)> {
    let packed = cursor.byte_at(IMAGE_PACKED_OFFSET)?;
    let data_start = IMAGE_DESCRIPTOR_SIZE + color_table_size(packed) + LZW_MIN_CODE_SIZE_LEN;
    let length = data_start + sub_block_chain_len(cursor, data_start)?;
    let next = cursor.advance(length)?;
    Ok((
        Unit::retained(cursor.position(), length, UnitKind::GifImage),
        next,
    ))
}

fn read_extension(cursor: ByteCursor<'_>) -> Result<(Unit, ByteCursor<'_>)> {
    let label = cursor.byte_at(EXTENSION_LABEL_OFFSET)?;
    let ext = GifExtension::from_label(label).ok_or(ScrubError::UnrecognizedMarker {
        format: ImageFormat::Gif,
        marker: label,
        offset: cursor.position() + EXTENSION_LABEL_OFFSET,
    })?;
    let header = extension_header_len(ext);
    let length = header + sub_block_chain_len(cursor, header)?;
    let next = cursor.advance(length)?;
    let kind = UnitKind::GifExtension(ext);
    let unit = if ext.is_metadata() {
        Unit::dropped(cursor.position(), length, kind)
    } else {
        Unit::retained(cursor.position(), length, kind)
    };
    Ok((unit, next))
}

pub fn detect_gif(data: &[u8]) -> bool {
    data.len() >= 6
        && data[..3] == GIF_SIGNATURE
        && (data[3..6] == GIF_VERSION_87A || data[3..6] == GIF_VERSION_89A)
}

/// Walks a GIF stream up to and including its trailer.
pub fn walk_gif(data: &[u8]) -> Result<Vec<Unit>> {
    if !detect_gif(data) {
        return Err(ScrubError::SignatureMismatch(ImageFormat::Gif));
    }

    let mut units = Vec::new();
    let (header, mut cursor) = read_header(ByteCursor::new(data))?;
    units.push(header);

    loop {
        let (unit, next) = match cursor.peek() {
            Some(IMAGE_SEPARATOR) => read_image(cursor)?,
            Some(EXTENSION_INTRODUCER) => read_extension(cursor)?,
            Some(TRAILER) => {
                let offset = cursor.position();
                units.push(Unit::retained(offset, 1, UnitKind::GifTrailer));
                if offset + 1 < data.len() {
                    units.push(Unit::dropped(
                        offset + 1,
                        data.len() - offset - 1,
                        UnitKind::TrailingData,
                    ));
                }
                return Ok(units);
            }
            other => {
                tracing::debug!(
                    offset = cursor.position(),
                    byte = ?other,
                    "GIF block loop stopped before the trailer"
                );
                return Err(ScrubError::MissingTerminator {
                    format: ImageFormat::Gif,
                    offset: cursor.position(),
                });
            }
        };
        tracing::trace!(offset = unit.offset, length = unit.length, kind = %unit.kind, "gif block");
        units.push(unit);
        cursor = next;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GifCodec;

impl ImageCodec for GifCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Gif
    }

    fn detect(&self, data: &[u8]) -> bool {
        detect_gif(data)
    }

    fn walk(&self, data: &[u8]) -> Result<Vec<Unit>> {
        walk_gif(data)
    }
}
