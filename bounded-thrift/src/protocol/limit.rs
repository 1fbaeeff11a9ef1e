//! Read-length caps for protocol readers.
//!
//! Whether a reader can cap the number of bytes it consumes is a property of its type: it is
//! expressed by [ReadLimit::SETTABLE] and therefore decided once, at compile time, for every
//! reader variant. [ReadLength] supports the cap; [Unlimited] models a reader without it.

use crate::DecodeError;

// READ LIMIT TRAIT
// ================================================================================================

/// Tracks how many more bytes a protocol reader is willing to consume.
pub trait ReadLimit: Default {
    /// True if [ReadLimit::set_read_length] actually bounds consumption.
    const SETTABLE: bool;

    /// Clears any cap and consumption state left over from a previous decode.
    fn reset(&mut self);

    /// Caps the total number of bytes the reader may consume from now on.
    fn set_read_length(&mut self, len: usize);

    /// Returns the number of bytes that may still be consumed, or `None` if uncapped.
    fn remaining(&self) -> Option<usize>;

    /// Records the consumption of `num_bytes` bytes.
    ///
    /// # Errors
    /// Returns [DecodeError::LengthExceeded] if the cap does not cover `num_bytes`; nothing is
    /// charged in that case.
    fn charge(&mut self, num_bytes: usize) -> Result<(), DecodeError>;

    /// Checks that a value declared to occupy `num_bytes` bytes fits under the cap without
    /// charging for it.
    ///
    /// This is what turns a corrupt length prefix into a fast failure instead of an allocation.
    fn check_declared(&self, num_bytes: usize) -> Result<(), DecodeError> {
        match self.remaining() {
            Some(remaining) if num_bytes > remaining => {
                Err(DecodeError::LengthExceeded { requested: num_bytes, remaining })
            },
            _ => Ok(()),
        }
    }
}

// READ LENGTH
// ================================================================================================

/// A settable read-length cap.
///
/// The cap is absent until [ReadLimit::set_read_length] is called and is cleared again by
/// [ReadLimit::reset].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadLength {
    remaining: Option<usize>,
}

impl ReadLimit for ReadLength {
    const SETTABLE: bool = true;

    fn reset(&mut self) {
        self.remaining = None;
    }

    fn set_read_length(&mut self, len: usize) {
        self.remaining = Some(len);
    }

    fn remaining(&self) -> Option<usize> {
        self.remaining
    }

    fn charge(&mut self, num_bytes: usize) -> Result<(), DecodeError> {
        if let Some(remaining) = self.remaining {
            if num_bytes > remaining {
                return Err(DecodeError::LengthExceeded { requested: num_bytes, remaining });
            }
            self.remaining = Some(remaining - num_bytes);
        }
        Ok(())
    }
}

// UNLIMITED
// ================================================================================================

/// A reader variant without a read-length cap.
///
/// Setting a read length is silently ignored; decoding of well-formed input is unaffected, only
/// the early rejection of oversized length prefixes is lost.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Unlimited;

impl ReadLimit for Unlimited {
    const SETTABLE: bool = false;

    fn reset(&mut self) {}

    fn set_read_length(&mut self, _len: usize) {}

    fn remaining(&self) -> Option<usize> {
        None
    }

    fn charge(&mut self, _num_bytes: usize) -> Result<(), DecodeError> {
        Ok(())
    }
}

// TESTS
// ================================================================================================
