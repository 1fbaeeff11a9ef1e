//! In-memory transport over a borrowed byte range.

use crate::DecodeError;

// BYTE READER TRAIT
// ================================================================================================

/// Defines how raw bytes are pulled out of a transport.
///
/// Whenever data is read using any of the `read_*` functions, the reader advances to the next
/// unread byte. If an error occurs, the reader is not rolled back to the state prior to the call.
pub trait ByteReader {
    // REQUIRED METHODS
    // --------------------------------------------------------------------------------------------

    /// Returns a single byte read from `self`.
    ///
    /// # Errors
    /// Returns a [DecodeError] if the reader is at the end of its window.
    fn read_u8(&mut self) -> Result<u8, DecodeError>;

    /// Returns the next byte to be read from `self` without advancing the reader.
    ///
    /// # Errors
    /// Returns a [DecodeError] if the reader is at the end of its window.
    fn peek_u8(&self) -> Result<u8, DecodeError>;

    /// Returns a slice of bytes of the specified length read from `self`.
    ///
    /// # Errors
    /// Returns a [DecodeError] if fewer than `len` bytes remain.
    fn read_slice(&mut self, len: usize) -> Result<&[u8], DecodeError>;

    /// Advances the reader by `len` bytes without looking at them.
    ///
    /// # Errors
    /// Returns a [DecodeError] if fewer than `len` bytes remain; the reader does not move.
    fn skip_bytes(&mut self, len: usize) -> Result<(), DecodeError>;

    /// Returns the number of bytes left to be read.
    fn remaining(&self) -> usize;

    // PROVIDED METHODS
    // --------------------------------------------------------------------------------------------

    /// Checks if it is possible to read at least `num_bytes` bytes from this reader.
    ///
    /// # Errors
    /// Returns an error if reading `num_bytes` bytes would go past the end of the window.
    fn check_eor(&self, num_bytes: usize) -> Result<(), DecodeError> {
        let remaining = self.remaining();
        if num_bytes > remaining {
            return Err(DecodeError::UnexpectedEof { needed: num_bytes, remaining });
        }
        Ok(())
    }

    /// Returns true if there are more bytes left to be read from `self`.
    fn has_more_bytes(&self) -> bool {
        self.remaining() > 0
    }

    /// Returns a byte array of length `N` read from `self`.
    ///
    /// # Errors
    /// Returns a [DecodeError] if fewer than `N` bytes remain.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_slice(N)?);
        Ok(array)
    }
}

// TRANSPORT WINDOW
// ================================================================================================

/// A non-owning view over `buf[offset..offset + len]`.
///
/// The window never copies the underlying bytes and can be repointed at a different range with
/// [TransportWindow::reset] without allocating.
#[derive(Debug, Clone, Copy)]
pub struct TransportWindow<'a> {
    buf: &'a [u8],
    start: usize,
    pos: usize,
    end: usize,
}

impl<'a> TransportWindow<'a> {
    /// Returns a window over `buf[offset..offset + len]`.
    ///
    /// # Errors
    /// Returns [DecodeError::InvalidRange] if the range does not fit in `buf`.
    pub fn new(buf: &'a [u8], offset: usize, len: usize) -> Result<Self, DecodeError> {
        let end = checked_end(buf, offset, len)?;
        Ok(Self { buf, start: offset, pos: offset, end })
    }

    /// Returns a window spanning all of `buf`.
    pub fn full(buf: &'a [u8]) -> Self {
        Self { buf, start: 0, pos: 0, end: buf.len() }
    }

    /// Returns a window over no bytes at all.
    pub fn empty() -> Self {
        Self::full(&[])
    }

    /// Repoints this window at `buf[offset..offset + len]`.
    ///
    /// On error the window is left untouched.
    pub fn reset(&mut self, buf: &'a [u8], offset: usize, len: usize) -> Result<(), DecodeError> {
        let end = checked_end(buf, offset, len)?;
        self.buf = buf;
        self.start = offset;
        self.pos = offset;
        self.end = end;
        Ok(())
    }

    /// Returns the absolute position of the next unread byte within the underlying buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes read since the window was created or last reset.
    pub fn consumed(&self) -> usize {
        self.pos - self.start
    }

    /// Returns the unread part of the window.
    pub fn as_slice(&self) -> &'a [u8] {
        &self.buf[self.pos..self.end]
    }
}

impl Default for TransportWindow<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl ByteReader for TransportWindow<'_> {
    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    fn peek_u8(&self) -> Result<u8, DecodeError> {
        if self.pos < self.end {
            Ok(self.buf[self.pos])
        } else {
            Err(DecodeError::UnexpectedEof { needed: 1, remaining: 0 })
        }
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], DecodeError> {
        self.check_eor(len)?;
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..self.pos])
    }

    fn skip_bytes(&mut self, len: usize) -> Result<(), DecodeError> {
        self.check_eor(len)?;
        self.pos += len;
        Ok(())
    }

    fn remaining(&self) -> usize {
        self.end - self.pos
    }
}

// HELPER FUNCTIONS
// ================================================================================================

fn checked_end(buf: &[u8], offset: usize, len: usize) -> Result<usize, DecodeError> {
    match offset.checked_add(len) {
        Some(end) if end <= buf.len() => Ok(end),
        _ => Err(DecodeError::InvalidRange { offset, len, buffer_len: buf.len() }),
    }
}

// TESTS
// ================================================================================================
