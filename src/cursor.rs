//! Bounds-checked read position over an input buffer and the append-only
//! output it is copied into.
//!
//! `ByteCursor` is `Copy`: walkers take a cursor, read relative to it and
//! hand back the advanced cursor instead of mutating shared state.

use crate::error::{Result, ScrubError};
use std::ops::Range;

#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Bytes from the current position to the end of the buffer.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or(&[])
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Absolute range of `len` bytes starting `rel` bytes past the cursor.
    pub fn span_at(&self, rel: usize, len: usize) -> Result<Range<usize>> {
        let start = self.pos.checked_add(rel);
        let end = start.and_then(|s| s.checked_add(len));
        match (start, end) {
            (Some(start), Some(end)) if end <= self.data.len() => Ok(start..end),
            _ => Err(self.truncated(rel, len)),
        }
    }

    #[inline]
    pub fn span(&self, len: usize) -> Result<Range<usize>> {
        self.span_at(0, len)
    }

    pub fn bytes_at(&self, rel: usize, len: usize) -> Result<&'a [u8]> {
        let range = self.span_at(rel, len)?;
        Ok(&self.data[range])
    }

    pub fn byte_at(&self, rel: usize) -> Result<u8> {
        Ok(self.bytes_at(rel, 1)?[0])
    }

    pub fn be_u16_at(&self, rel: usize) -> Result<u16> {
        let b = self.bytes_at(rel, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn be_u32_at(&self, rel: usize) -> Result<u32> {
        let b = self.bytes_at(rel, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Returns the cursor moved `len` bytes forward; fails if that would
    /// leave the buffer.
    pub fn advance(self, len: usize) -> Result<Self> {
        let range = self.span(len)?;
        Ok(Self {
            data: self.data,
            pos: range.end,
        })
    }

    fn truncated(&self, rel: usize, len: usize) -> ScrubError {
        let offset = self.pos.saturating_add(rel);
        ScrubError::TruncatedInput {
            offset,
            needed: len,
            available: self.data.len().saturating_sub(offset),
        }
    }
}

/// Output buffer built strictly by appending whole ranges of the input.
#[derive(Debug, Default)]
pub struct OutputSink {
    buf: Vec<u8>,
}

impl OutputSink {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn append_range(&mut self, source: &[u8], range: Range<usize>) -> Result<()> {
        let available = source.len().saturating_sub(range.start);
        let needed = range.len();
        let offset = range.start;
        let bytes = source.get(range).ok_or(ScrubError::TruncatedInput {
            offset,
            needed,
            available,
        })?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.buf.shrink_to_fit();
        self.buf
    }
}
