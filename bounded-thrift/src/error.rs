use alloc::string::String;

use thiserror::Error;

/// Errors that can occur while decoding a Thrift binary-encoded record.
///
/// A decode that fails with any of these errors leaves the target record in an unspecified,
/// partially-populated state; callers must discard it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input ended before a value could be read in full.
    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Number of bytes the read required.
        needed: usize,
        /// Number of bytes left in the transport window.
        remaining: usize,
    },

    /// A field header carried a type tag that is not part of the binary protocol.
    #[error("invalid thrift type tag {0}")]
    InvalidType(u8),

    /// A container header declared an element type that cannot appear inside a container.
    #[error("unexpected type tag {0} in a container")]
    InvalidContainerType(u8),

    /// A string, binary, or container header declared a negative size.
    #[error("negative size {0}")]
    NegativeSize(i32),

    /// A declared size would require more bytes than the reader is allowed to consume.
    #[error("length exceeded: requested {requested} bytes, {remaining} remaining")]
    LengthExceeded {
        /// Bytes required by the declared size.
        requested: usize,
        /// Bytes the reader may still consume.
        remaining: usize,
    },

    /// The requested `offset..offset + len` range does not fit in the input buffer.
    #[error("range {offset}+{len} is out of bounds for a buffer of {buffer_len} bytes")]
    InvalidRange {
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range.
        len: usize,
        /// Length of the buffer the range was taken from.
        buffer_len: usize,
    },

    /// Structs or containers were nested deeper than the configured maximum.
    #[error("nesting depth exceeds the maximum of {0}")]
    DepthLimitExceeded(usize),

    /// A string field did not contain valid UTF-8.
    #[error("string is not valid utf-8")]
    InvalidUtf8,

    /// The record rejected a decoded value.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl DecodeError {
    /// Returns true if this error was raised by the read-length cap or a configured size limit.
    pub fn is_length_exceeded(&self) -> bool {
        matches!(self, Self::LengthExceeded { .. })
    }
}
