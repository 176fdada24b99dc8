//! Shared value types: the supported formats and the structural units a
//! codec walk produces.

use serde::Serialize;
use std::fmt;
use std::ops::Range;
use std::path::Path;

/// Container formats the scrubber understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Gif,
    Jpeg,
    Png,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Gif, ImageFormat::Jpeg, ImageFormat::Png];

    /// Maps a file extension (with or without the leading dot, any case)
    /// to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        match extension.to_ascii_lowercase().as_str() {
            "gif" => Some(ImageFormat::Gif),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Gif => "gif",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageFormat::Gif => &["gif"],
            ImageFormat::Jpeg => &["jpg", "jpeg"],
            ImageFormat::Png => &["png"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Gif => "GIF",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// GIF extension blocks, keyed by their label byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GifExtension {
    GraphicControl,
    Comment,
    PlainText,
    Application,
}

impl GifExtension {
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0xF9 => Some(GifExtension::GraphicControl),
            0xFE => Some(GifExtension::Comment),
            0x01 => Some(GifExtension::PlainText),
            0xFF => Some(GifExtension::Application),
            _ => None,
        }
    }

    pub fn label(&self) -> u8 {
        match self {
            GifExtension::GraphicControl => 0xF9,
            GifExtension::Comment => 0xFE,
            GifExtension::PlainText => 0x01,
            GifExtension::Application => 0xFF,
        }
    }

    /// Comment, plain text and application blocks carry no decoding data.
    pub fn is_metadata(&self) -> bool {
        !matches!(self, GifExtension::GraphicControl)
    }
}

/// What a walked unit is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Fixed magic bytes (JPEG SOI, PNG signature)
    Signature,
    /// GIF header plus global color table
    GifHeader,
    /// GIF image descriptor, local color table and image data
    GifImage,
    GifExtension(GifExtension),
    GifTrailer,
    /// JPEG marker segment, including trailing scan data for SOS
    JpegSegment(u8),
    PngChunk([u8; 4]),
    /// Bytes after the terminator, never copied
    TrailingData,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Signature => f.write_str("Signature"),
            UnitKind::GifHeader => f.write_str("Header"),
            UnitKind::GifImage => f.write_str("Image"),
            UnitKind::GifExtension(ext) => match ext {
                GifExtension::GraphicControl => f.write_str("Graphic Control Extension"),
                GifExtension::Comment => f.write_str("Comment Extension"),
                GifExtension::PlainText => f.write_str("Plain Text Extension"),
                GifExtension::Application => f.write_str("Application Extension"),
            },
            UnitKind::GifTrailer => f.write_str("Trailer"),
            UnitKind::JpegSegment(marker) => f.write_str(&jpeg_marker_name(*marker)),
            UnitKind::PngChunk(chunk_type) => {
                f.write_str(&String::from_utf8_lossy(chunk_type))
            }
            UnitKind::TrailingData => f.write_str("Trailing data"),
        }
    }
}

fn jpeg_marker_name(marker: u8) -> String {
    match marker {
        0xC4 => "DHT".to_string(),
        0xC8 => "JPG".to_string(),
        0xCC => "DAC".to_string(),
        0xC0..=0xCF => format!("SOF{}", marker - 0xC0),
        0xD0..=0xD7 => format!("RST{}", marker - 0xD0),
        0xD8 => "SOI".to_string(),
        0xD9 => "EOI".to_string(),
        0xDA => "SOS".to_string(),
        0xDB => "DQT".to_string(),
        0xDD => "DRI".to_string(),
        0xE0..=0xEF => format!("APP{}", marker - 0xE0),
        0xFE => "COM".to_string(),
        other => format!("FF{other:02X}"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Retain,
    Drop,
}

/// One structural unit of an input buffer and the decision taken on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub offset: usize,
    pub length: usize,
    pub kind: UnitKind,
    pub disposition: Disposition,
}

impl Unit {
    pub fn retained(offset: usize, length: usize, kind: UnitKind) -> Self {
        Self {
            offset,
            length,
            kind,
            disposition: Disposition::Retain,
        }
    }

    pub fn dropped(offset: usize, length: usize, kind: UnitKind) -> Self {
        Self {
            offset,
            length,
            kind,
            disposition: Disposition::Drop,
        }
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.length
    }

    #[inline]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }

    #[inline]
    pub fn is_retained(&self) -> bool {
        self.disposition == Disposition::Retain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension(".Jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("gif"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_extension("PnG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("webp"), None);
        assert_eq!(ImageFormat::from_extension(""), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ImageFormat::from_path(Path::new("/tmp/photo.JPEG")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_path(Path::new("/tmp/noext")), None);
    }

    #[test]
    fn test_unit_kind_names() {
        assert_eq!(UnitKind::JpegSegment(0xE1).to_string(), "APP1");
        assert_eq!(UnitKind::JpegSegment(0xFE).to_string(), "COM");
        assert_eq!(UnitKind::JpegSegment(0xC4).to_string(), "DHT");
        assert_eq!(UnitKind::JpegSegment(0xC2).to_string(), "SOF2");
        assert_eq!(UnitKind::PngChunk(*b"tEXt").to_string(), "tEXt");
        assert_eq!(
            UnitKind::GifExtension(GifExtension::Comment).to_string(),
            "Comment Extension"
        );
    }

    #[test]
    fn test_gif_extension_labels() {
        for ext in [
            GifExtension::GraphicControl,
            GifExtension::Comment,
            GifExtension::PlainText,
            GifExtension::Application,
        ] {
            assert_eq!(GifExtension::from_label(ext.label()), Some(ext));
        }
        assert_eq!(GifExtension::from_label(0x02), None);
        assert!(!GifExtension::GraphicControl.is_metadata());
        assert!(GifExtension::Comment.is_metadata());
    }

    #[test]
    fn test_unit_range() {
        let unit = Unit::dropped(10, 5, UnitKind::TrailingData);
        assert_eq!(unit.range(), 10..15);
        assert_eq!(unit.end(), 15);
        assert!(!unit.is_retained());
    }
}
