//! JPEG marker/segment walker.
//!
//! Every segment after SOI is `FF <marker> [length:u16be payload]`, where
//! the length counts itself. SOS is followed by entropy-coded scan data that
//! has no length field and runs until the next marker that is neither a
//! stuffed zero (`FF 00`) nor a restart marker (`FF D0`..`FF D7`).

use crate::cursor::ByteCursor;
use crate::error::{Result, ScrubError};
use crate::formats::ImageCodec;
use crate::types::{ImageFormat, Unit, UnitKind};

pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
pub const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

pub const MARKER_PREFIX: u8 = 0xFF;
pub const SOI: u8 = 0xD8;
pub const EOI: u8 = 0xD9;
pub const SOS: u8 = 0xDA;
pub const APP0: u8 = 0xE0;
pub const APP14: u8 = 0xEE;
pub const COM: u8 = 0xFE;

const MARKER_SIZE: usize = 2;
const MIN_SEGMENT_LENGTH: u16 = 2;

/// SOI and EOI are the only markers without a length field.
#[inline]
pub const fn is_standalone_marker(marker: u8) -> bool {
    matches!(marker, SOI | EOI)
}

/// APP1..APP13, APP15 and COM. APP0 (JFIF) and APP14 (Adobe color
/// transform) affect decoding and stay.
#[inline]
pub const fn is_metadata_marker(marker: u8) -> bool {
    matches!(marker, 0xE1..=0xED | 0xEF | COM)
}

/// Bytes following `FF` that keep an entropy-coded segment going.
#[inline]
const fn continues_scan(byte: u8) -> bool {
    matches!(byte, 0x00 | 0xD0..=0xD7)
}

/// Number of entropy-coded bytes at the start of `scan`, counting stuffed
/// zeros and restart markers as scan data. Stops before the first real
/// marker, or before a lone `FF` at the very end of the buffer.
pub fn scan_data_len(scan: &[u8]) -> usize {
    let mut pos = 0;
    while let Some(found) = memchr::memchr(MARKER_PREFIX, &scan[pos..]) {
        let prefix = pos + found;
        match scan.get(prefix + 1) {
            Some(&next) if continues_scan(next) => pos = prefix + MARKER_SIZE,
            _ => return prefix,
        }
    }
    scan.len()
}

/// Reads one segment starting at `cursor` (which points at an `FF`).
fn read_segment(cursor: ByteCursor<'_>) -> Result<(Unit, ByteCursor<'_>)> {
    // Optional fill bytes: FF FF ... FF <marker>
    let mut fill = 0;
    while cursor.byte_at(fill + 1)? == MARKER_PREFIX {
        fill += 1;
    }
    let marker = cursor.byte_at(fill + 1)?;
    let header = fill + MARKER_SIZE;

    let mut length = header;
    if !is_standalone_marker(marker) {
        let declared = cursor.be_u16_at(header)?;
        if declared < MIN_SEGMENT_LENGTH {
            return Err(ScrubError::InvalidLength {
                format: ImageFormat::Jpeg,
                length: declared as u64,
                offset: cursor.position() + header,
            });
        }
        length += declared as usize;
    }
    cursor.span(length)?;

    if marker == SOS {
        length += scan_data_len(&cursor.rest()[length..]);
    }

    let next = cursor.advance(length)?;
    let kind = UnitKind::JpegSegment(marker);
    let unit = if is_metadata_marker(marker) {
        Unit::dropped(cursor.position(), length, kind)
    } else {
        Unit::retained(cursor.position(), length, kind)
    };
    Ok((unit, next))
}

pub fn detect_jpeg(data: &[u8]) -> bool {
    data.starts_with(&JPEG_SOI)
}

/// Walks a JPEG stream segment by segment until the next byte is not a
/// marker prefix.
pub fn walk_jpeg(data: &[u8]) -> Result<Vec<Unit>> {
    if !detect_jpeg(data) {
        return Err(ScrubError::SignatureMismatch(ImageFormat::Jpeg));
    }

    let mut units = vec![Unit::retained(0, JPEG_SOI.len(), UnitKind::Signature)];
    let mut cursor = ByteCursor::new(data).advance(JPEG_SOI.len())?;

    while cursor.peek() == Some(MARKER_PREFIX) {
        let (unit, next) = read_segment(cursor)?;
        tracing::trace!(offset = unit.offset, length = unit.length, kind = %unit.kind, "jpeg segment");
        units.push(unit);
        cursor = next;
    }

    if !cursor.is_at_end() {
        units.push(Unit::dropped(
            cursor.position(),
            cursor.remaining(),
            UnitKind::TrailingData,
        ));
    }
    Ok(units)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JpegCodec;

impl ImageCodec for JpegCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }

    fn detect(&self, data: &[u8]) -> bool {
        detect_jpeg(data)
    }

    fn walk(&self, data: &[u8]) -> Result<Vec<Unit>> {
        walk_jpeg(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
        let mut seg = vec![0xFF, marker];
        seg.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        seg.extend_from_slice(payload);
        seg
    }

    #[test]
    fn test_metadata_markers() {
        assert!(!is_metadata_marker(APP0));
        assert!(!is_metadata_marker(APP14));
        for marker in (0xE1..=0xED).chain([0xEF, COM]) {
            assert!(is_metadata_marker(marker), "marker {marker:02X}");
        }
        for marker in [0xC0, 0xC4, 0xDA, 0xDB, 0xDD, 0xD9] {
            assert!(!is_metadata_marker(marker));
        }
    }

    #[test]
    fn test_scan_data_len() {
        assert_eq!(scan_data_len(&[0x12, 0x34, 0xFF, 0xD9]), 2);
        assert_eq!(scan_data_len(&[0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD9]), 4);
        assert_eq!(scan_data_len(&[0xFF, 0xD0, 0x01, 0xFF, 0xD7, 0xFF, 0xC4]), 5);
        assert_eq!(scan_data_len(&[0x01, 0x02, 0x03]), 3);
        assert_eq!(scan_data_len(&[0x01, 0xFF]), 1);
        assert_eq!(scan_data_len(&[]), 0);
    }

    #[test]
    fn test_sos_includes_scan_data() {
        let mut data = JPEG_SOI.to_vec();
        let sos = segment(SOS, &[0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        data.extend_from_slice(&sos);
        data.extend_from_slice(&[0xAA, 0xFF, 0x00, 0xBB, 0xFF, 0xD3, 0xCC]);
        data.extend_from_slice(&JPEG_EOI);
        let units = walk_jpeg(&data).unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[1], Unit::retained(2, sos.len() + 7, UnitKind::JpegSegment(SOS)));
        assert_eq!(units[2], Unit::retained(data.len() - 2, 2, UnitKind::JpegSegment(EOI)));
    }

    #[test]
    fn test_app_segments_dropped() {
        let mut data = JPEG_SOI.to_vec();
        data.extend_from_slice(&segment(APP0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"));
        data.extend_from_slice(&segment(0xE1, b"Exif\0\0abcd"));
        data.extend_from_slice(&segment(APP14, b"Adobe\0\x64\0\0\0\0\x01"));
        data.extend_from_slice(&segment(0xEF, b"x"));
        data.extend_from_slice(&JPEG_EOI);
        let dropped: Vec<UnitKind> = walk_jpeg(&data)
            .unwrap()
            .into_iter()
            .filter(|u| !u.is_retained())
            .map(|u| u.kind)
            .collect();
        assert_eq!(
            dropped,
            vec![UnitKind::JpegSegment(0xE1), UnitKind::JpegSegment(0xEF)]
        );
    }

    #[test]
    fn test_length_is_unsigned() {
        let payload = vec![0x55; 0x8000];
        let mut data = JPEG_SOI.to_vec();
        data.extend_from_slice(&segment(0xE2, &payload));
        data.extend_from_slice(&JPEG_EOI);
        let units = walk_jpeg(&data).unwrap();
        assert_eq!(units[1].length, 2 + 0x8002);
        assert_eq!(JpegCodec.strip(&data).unwrap(), [JPEG_SOI, JPEG_EOI].concat());
    }

    #[test]
    fn test_fill_bytes_belong_to_segment() {
        let mut data = JPEG_SOI.to_vec();
        data.extend_from_slice(&[0xFF, 0xFF]);
        data.extend_from_slice(&segment(COM, b"hi"));
        data.extend_from_slice(&JPEG_EOI);
        let units = walk_jpeg(&data).unwrap();
        assert_eq!(units[1], Unit::dropped(2, 2 + 6, UnitKind::JpegSegment(COM)));
    }

    #[test]
    fn test_invalid_length() {
        let data = [0xFF, 0xD8, 0xFF, 0xDB, 0x00, 0x01, 0x00];
        assert_eq!(
            walk_jpeg(&data),
            Err(ScrubError::InvalidLength {
                format: ImageFormat::Jpeg,
                length: 1,
                offset: 4
            })
        );
    }

    #[test]
    fn test_segment_past_end_is_truncated() {
        let data = [0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x40, 0x00];
        assert!(matches!(
            walk_jpeg(&data),
            Err(ScrubError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_dangling_marker_prefix() {
        let data = [0xFF, 0xD8, 0xFF];
        assert!(matches!(
            walk_jpeg(&data),
            Err(ScrubError::TruncatedInput { offset: 3, .. })
        ));
    }

    #[test]
    fn test_non_marker_byte_ends_walk() {
        let mut data = JPEG_SOI.to_vec();
        data.extend_from_slice(&JPEG_EOI);
        data.extend_from_slice(&[0x00, 0x01, 0x02]);
        let units = walk_jpeg(&data).unwrap();
        assert_eq!(units.last(), Some(&Unit::dropped(4, 3, UnitKind::TrailingData)));
        assert_eq!(JpegCodec.strip(&data).unwrap(), [JPEG_SOI, JPEG_EOI].concat());
    }

    #[test]
    fn test_bare_soi() {
        assert_eq!(JpegCodec.strip(&JPEG_SOI).unwrap(), JPEG_SOI.to_vec());
        assert!(!detect_jpeg(&[0xFF]));
    }
}
