//! PNG chunk walker. Textual chunks (tEXt, zTXt, iTXt) are dropped whole,
//! every other chunk is copied with its CRC.

use crate::cursor::ByteCursor;
use crate::error::{Result, ScrubError};
use crate::formats::ImageCodec;
use crate::types::{ImageFormat, Unit, UnitKind};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
pub const IHDR: [u8; 4] = *b"IHDR";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";
pub const TEXT: [u8; 4] = *b"tEXt";
pub const ZTXT: [u8; 4] = *b"zTXt";
pub const ITXT: [u8; 4] = *b"iTXt";

/// length + type + CRC
pub const CHUNK_OVERHEAD: usize = 12;
const MAX_CHUNK_LENGTH: u32 = 0x7FFF_FFFF;

#[inline]
pub fn is_textual_chunk(chunk_type: &[u8; 4]) -> bool {
    matches!(chunk_type, &TEXT | &ZTXT | &ITXT)
}

#[inline]
pub fn chunk_crc(chunk_type: &[u8; 4], payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(payload);
    hasher.finalize()
}

/// Compares a walked chunk's stored CRC with the CRC of its type and data.
/// Returns `None` for units that are not PNG chunks or do not fit `data`.
pub fn verify_chunk_crc(data: &[u8], unit: &Unit) -> Option<bool> {
    let UnitKind::PngChunk(chunk_type) = unit.kind else {
        return None;
    };
    let chunk = data.get(unit.range())?;
    if chunk.len() < CHUNK_OVERHEAD {
        return None;
    }
    let (body, crc) = chunk.split_at(chunk.len() - 4);
    let stored = u32::from_be_bytes([crc[0], crc[1], crc[2], crc[3]]);
    Some(stored == chunk_crc(&chunk_type, &body[8..]))
}

fn read_chunk(cursor: ByteCursor<'_>) -> Result<(Unit, ByteCursor<'_>)> {
    let length = cursor.be_u32_at(0)?;
    if length > MAX_CHUNK_LENGTH {
        return Err(ScrubError::InvalidLength {
            format: ImageFormat::Png,
            length: length as u64,
            offset: cursor.position(),
        });
    }
    let t = cursor.bytes_at(4, 4)?;
    let chunk_type = [t[0], t[1], t[2], t[3]];
    let total = CHUNK_OVERHEAD + length as usize;
    let next = cursor.advance(total)?;

    let kind = UnitKind::PngChunk(chunk_type);
    let unit = if is_textual_chunk(&chunk_type) {
        Unit::dropped(cursor.position(), total, kind)
    } else {
        Unit::retained(cursor.position(), total, kind)
    };
    Ok((unit, next))
}

pub fn detect_png(data: &[u8]) -> bool {
    data.starts_with(&PNG_SIGNATURE)
}

/// Walks a PNG chunk stream up to and including IEND.
pub fn walk_png(data: &[u8]) -> Result<Vec<Unit>> {
    if !detect_png(data) {
        return Err(ScrubError::SignatureMismatch(ImageFormat::Png));
    }

    let mut units = vec![Unit::retained(0, PNG_SIGNATURE.len(), UnitKind::Signature)];
    let mut cursor = ByteCursor::new(data).advance(PNG_SIGNATURE.len())?;

    while !cursor.is_at_end() {
        let (unit, next) = read_chunk(cursor)?;
        tracing::trace!(offset = unit.offset, length = unit.length, kind = %unit.kind, "png chunk");
        let is_end = unit.kind == UnitKind::PngChunk(IEND);
        units.push(unit);
        cursor = next;

        if is_end {
            if !cursor.is_at_end() {
                units.push(Unit::dropped(
                    cursor.position(),
                    cursor.remaining(),
                    UnitKind::TrailingData,
                ));
            }
            return Ok(units);
        }
    }

    Err(ScrubError::MissingTerminator {
        format: ImageFormat::Png,
        offset: cursor.position(),
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn detect(&self, data: &[u8]) -> bool {
        detect_png(data)
    }

    fn walk(&self, data: &[u8]) -> Result<Vec<Unit>> {
        walk_png(data)
    }
}
