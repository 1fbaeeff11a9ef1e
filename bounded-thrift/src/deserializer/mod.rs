//! Bounded, zero-copy deserialization of Thrift binary records.

use alloc::vec::Vec;
use core::ops::Range;

use crate::{
    DecodeError, Deserializable, TransportWindow,
    protocol::{BinaryProtocolConfig, ProtocolState, ReadLength, ReadLimit},
};

#[cfg(feature = "std")]
pub mod pool;


// BINARY DESERIALIZER
// ================================================================================================

/// Decodes Thrift binary records from borrowed byte ranges.
///
/// The deserializer keeps one [ProtocolState] for its whole lifetime and resets it at the start
/// of every call, so repeated decodes do not allocate on its behalf. Before each decode the read
/// length is capped to the size of the input range when the reader variant `L` supports it;
/// oversized length prefixes then fail with [DecodeError::LengthExceeded] instead of driving an
/// allocation. Unknown fields are skipped with the binary reader's fast skip.
///
/// The input range is never stored: each call builds a [TransportWindow] over it on the stack and
/// binds the state to that window for the duration of the decode, without heap allocation.
///
/// Every decode takes `&mut self`: an instance serves one decode at a time. Share work across
/// threads with one instance per worker or a [DeserializerPool](pool::DeserializerPool).
#[derive(Debug, Clone, Default)]
pub struct BinaryDeserializer<L: ReadLimit = ReadLength> {
    state: ProtocolState<L>,
}

impl BinaryDeserializer<ReadLength> {
    /// Returns a deserializer with the default configuration and a settable read-length cap.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: ReadLimit> BinaryDeserializer<L> {
    pub fn with_config(config: BinaryProtocolConfig) -> Self {
        Self { state: ProtocolState::new(config) }
    }

    pub fn config(&self) -> &BinaryProtocolConfig {
        self.state.config()
    }

    /// Decodes the struct at the start of `bytes` into `target`.
    ///
    /// Same as [Self::deserialize_range] over the whole buffer.
    pub fn deserialize<T: Deserializable>(
        &mut self,
        target: &mut T,
        bytes: &[u8],
    ) -> Result<usize, DecodeError> {
        self.deserialize_range(target, bytes, 0, bytes.len())
    }

    /// Decodes the struct at the start of `bytes[offset..offset + len]` into `target` without
    /// copying the range.
    ///
    /// Returns the number of bytes the struct occupied; bytes after it within the range are
    /// ignored.
    ///
    /// # Errors
    /// Returns a [DecodeError] if the range does not fit in `bytes`, if the encoded data is
    /// malformed or needs more than `len` bytes, or if `target` rejects a value. On error
    /// `target` is left partially populated and must be discarded.
    pub fn deserialize_range<T: Deserializable>(
        &mut self,
        target: &mut T,
        bytes: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<usize, DecodeError> {
        self.state.reset();
        if L::SETTABLE {
            self.state.set_read_length(len);
        }
        let window = TransportWindow::new(bytes, offset, len)?;

        let mut protocol = self.state.bind(window);
        target.read(&mut protocol)?;
        Ok(protocol.into_inner().consumed())
    }
}

// BATCH DECODING
// ================================================================================================

/// Decodes every range of `bytes` into a fresh `T`, preserving the order of `ranges`.
///
/// With the `concurrent` feature ranges are decoded in parallel and every worker reuses its own
/// [BinaryDeserializer]; otherwise a single deserializer decodes them one after another.
pub fn deserialize_many<T>(
    bytes: &[u8],
    ranges: &[Range<usize>],
    config: BinaryProtocolConfig,
) -> Vec<Result<T, DecodeError>>
where
    T: Deserializable + Default + Send,
{
    #[cfg(feature = "concurrent")]
    {
        use rayon::prelude::*;

        ranges
            .par_iter()
            .map_init(
                || BinaryDeserializer::<ReadLength>::with_config(config),
                |deserializer, range| decode_range(deserializer, bytes, range),
            )
            .collect()
    }

    #[cfg(not(feature = "concurrent"))]
    {
        let mut deserializer = BinaryDeserializer::<ReadLength>::with_config(config);
        ranges.iter().map(|range| decode_range(&mut deserializer, bytes, range)).collect()
    }
}

fn decode_range<T, L>(
    deserializer: &mut BinaryDeserializer<L>,
    bytes: &[u8],
    range: &Range<usize>,
) -> Result<T, DecodeError>
where
    T: Deserializable + Default,
    L: ReadLimit,
{
    let len = range.end.checked_sub(range.start).ok_or(DecodeError::InvalidRange {
        offset: range.start,
        len: 0,
        buffer_len: bytes.len(),
    })?;
    let mut target = T::default();
    deserializer.deserialize_range(&mut target, bytes, range.start, len)?;
    Ok(target)
}
