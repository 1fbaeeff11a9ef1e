//! Thrift binary protocol reader.

use alloc::{borrow::ToOwned, string::String, vec::Vec};

use super::{
    BinaryProtocolConfig, FieldHeader, InputProtocol, ListHeader, MapHeader, ReadLength,
    ReadLimit, SetHeader, TType,
};
use crate::{ByteReader, DecodeError};

// PROTOCOL STATE
// ================================================================================================

/// Reader state that outlives a single decode.
///
/// A [ProtocolState] owns the configuration, the read limit, and the nesting depth. It is bound
/// to a transport with [ProtocolState::bind] for the duration of one decode, which creates a
/// [BinaryInputProtocol] without allocating.
#[derive(Debug, Clone, Default)]
pub struct ProtocolState<L: ReadLimit = ReadLength> {
    config: BinaryProtocolConfig,
    limit: L,
    depth: usize,
}

impl<L: ReadLimit> ProtocolState<L> {
    pub fn new(config: BinaryProtocolConfig) -> Self {
        Self { config, limit: L::default(), depth: 0 }
    }

    pub fn config(&self) -> &BinaryProtocolConfig {
        &self.config
    }

    /// Discards the read limit and nesting depth left over from a previous decode.
    pub fn reset(&mut self) {
        self.limit.reset();
        self.depth = 0;
    }

    /// Caps the number of bytes the next decode may consume. A no-op for readers whose limit is
    /// not [ReadLimit::SETTABLE].
    pub fn set_read_length(&mut self, len: usize) {
        self.limit.set_read_length(len);
    }

    /// Returns the number of bytes that may still be consumed, or `None` if uncapped.
    pub fn read_length_remaining(&self) -> Option<usize> {
        self.limit.remaining()
    }

    /// Binds this state to `reader`, returning a protocol that reads from it.
    pub fn bind<R: ByteReader>(&mut self, reader: R) -> BinaryInputProtocol<'_, R, L> {
        BinaryInputProtocol { reader, state: self }
    }
}

// BINARY INPUT PROTOCOL
// ================================================================================================

/// A Thrift binary protocol reader over a [ByteReader].
///
/// Besides the plain wire format, this reader:
/// - charges every consumed byte against the read limit and rejects declared string, binary, and
///   container sizes that could not fit under it before anything is allocated;
/// - rejects container headers whose element types cannot appear in a container;
/// - skips unknown values without materializing them, in a single step for fixed-width values
///   and containers of fixed-width elements.
pub struct BinaryInputProtocol<'s, R, L: ReadLimit = ReadLength> {
    reader: R,
    state: &'s mut ProtocolState<L>,
}

impl<R: ByteReader, L: ReadLimit> BinaryInputProtocol<'_, R, L> {
    /// Returns the underlying reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Releases the bound state and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    // PRIMITIVE READS
    // --------------------------------------------------------------------------------------------

    // Each read checks the window before charging the limit: truncated input is `UnexpectedEof`
    // under every reader variant.

    fn take(&mut self, len: usize) -> Result<&[u8], DecodeError> {
        self.reader.check_eor(len)?;
        self.state.limit.charge(len)?;
        self.reader.read_slice(len)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.reader.check_eor(N)?;
        self.state.limit.charge(N)?;
        self.reader.read_array()
    }

    fn take_u8(&mut self) -> Result<u8, DecodeError> {
        self.reader.check_eor(1)?;
        self.state.limit.charge(1)?;
        self.reader.read_u8()
    }

    fn skip_raw(&mut self, len: usize) -> Result<(), DecodeError> {
        self.reader.check_eor(len)?;
        self.state.limit.charge(len)?;
        self.reader.skip_bytes(len)
    }

    /// Returns the number of bytes the next reads may still consume.
    fn budget(&self) -> usize {
        self.state.limit.remaining().unwrap_or(self.reader.remaining())
    }

    fn read_size(&mut self) -> Result<usize, DecodeError> {
        let size = self.read_i32()?;
        usize::try_from(size).map_err(|_| DecodeError::NegativeSize(size))
    }

    fn read_element_type(&mut self) -> Result<TType, DecodeError> {
        let tag = self.take_u8()?;
        match TType::try_from(tag) {
            Ok(element_type) if element_type.is_container_element() => Ok(element_type),
            _ => Err(DecodeError::InvalidContainerType(tag)),
        }
    }

    // LIMIT CHECKS
    // --------------------------------------------------------------------------------------------

    fn check_string_length(&self, len: usize) -> Result<(), DecodeError> {
        if let Some(limit) = self.state.config.string_length_limit
            && len > limit
        {
            return Err(DecodeError::LengthExceeded { requested: len, remaining: limit });
        }
        self.state.limit.check_declared(len)
    }

    fn check_container_size(&self, size: usize, element_size: usize) -> Result<(), DecodeError> {
        if let Some(limit) = self.state.config.container_length_limit
            && size > limit
        {
            return Err(DecodeError::LengthExceeded { requested: size, remaining: limit });
        }
        self.state.limit.check_declared(size.saturating_mul(element_size))
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        if self.state.depth >= self.state.config.max_depth {
            return Err(DecodeError::DepthLimitExceeded(self.state.config.max_depth));
        }
        self.state.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.state.depth = self.state.depth.saturating_sub(1);
    }

    // SKIPPING
    // --------------------------------------------------------------------------------------------

    /// Skips `count` consecutive values of `element_type`.
    fn skip_elements(&mut self, element_type: TType, count: usize) -> Result<(), DecodeError> {
        match element_type.fixed_width() {
            Some(width) => {
                let span = checked_span(count, width, self.budget())?;
                self.skip_raw(span)
            },
            None => {
                for _ in 0..count {
                    self.skip(element_type)?;
                }
                Ok(())
            },
        }
    }
}

impl<R: ByteReader, L: ReadLimit> InputProtocol for BinaryInputProtocol<'_, R, L> {
    fn read_struct_begin(&mut self) -> Result<(), DecodeError> {
        self.enter()
    }

    fn read_struct_end(&mut self) -> Result<(), DecodeError> {
        self.leave();
        Ok(())
    }

    fn read_field_begin(&mut self) -> Result<FieldHeader, DecodeError> {
        let field_type = TType::try_from(self.take_u8()?)?;
        if field_type == TType::Stop {
            return Ok(FieldHeader::STOP);
        }
        let id = self.read_i16()?;
        Ok(FieldHeader::new(field_type, id))
    }

    fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.take_u8()? == 1)
    }

    fn read_byte(&mut self) -> Result<i8, DecodeError> {
        Ok(self.take_u8()? as i8)
    }

    fn read_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(i16::from_be_bytes(self.take_array()?))
    }

    fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_be_bytes(self.take_array()?))
    }

    fn read_double(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(u64::from_be_bytes(self.take_array()?)))
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_size()?;
        self.check_string_length(len)?;
        let bytes = self.take(len)?;
        core::str::from_utf8(bytes).map(ToOwned::to_owned).map_err(|_| DecodeError::InvalidUtf8)
    }

    fn read_binary(&mut self) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_size()?;
        self.check_string_length(len)?;
        Ok(self.take(len)?.to_vec())
    }

    fn read_list_begin(&mut self) -> Result<ListHeader, DecodeError> {
        let element_type = self.read_element_type()?;
        let size = self.read_size()?;
        self.check_container_size(size, element_type.min_encoded_size())?;
        self.enter()?;
        Ok(ListHeader::new(element_type, size))
    }

    fn read_list_end(&mut self) -> Result<(), DecodeError> {
        self.leave();
        Ok(())
    }

    fn read_set_begin(&mut self) -> Result<SetHeader, DecodeError> {
        self.read_list_begin()
    }

    fn read_set_end(&mut self) -> Result<(), DecodeError> {
        self.read_list_end()
    }

    fn read_map_begin(&mut self) -> Result<MapHeader, DecodeError> {
        let key_type = self.read_element_type()?;
        let value_type = self.read_element_type()?;
        let size = self.read_size()?;
        self.check_container_size(
            size,
            key_type.min_encoded_size() + value_type.min_encoded_size(),
        )?;
        self.enter()?;
        Ok(MapHeader::new(key_type, value_type, size))
    }

    fn read_map_end(&mut self) -> Result<(), DecodeError> {
        self.leave();
        Ok(())
    }

    fn skip(&mut self, field_type: TType) -> Result<(), DecodeError> {
        if let Some(width) = field_type.fixed_width() {
            return self.skip_raw(width);
        }

        match field_type {
            TType::String => {
                let len = self.read_size()?;
                self.check_string_length(len)?;
                self.skip_raw(len)
            },
            TType::Struct => {
                self.read_struct_begin()?;
                loop {
                    let field = self.read_field_begin()?;
                    if field.is_stop() {
                        break;
                    }
                    self.skip(field.field_type)?;
                }
                self.read_struct_end()
            },
            TType::List | TType::Set => {
                let header = self.read_list_begin()?;
                self.skip_elements(header.element_type, header.size)?;
                self.read_list_end()
            },
            TType::Map => {
                let header = self.read_map_begin()?;
                match (header.key_type.fixed_width(), header.value_type.fixed_width()) {
                    (Some(key_width), Some(value_width)) => {
                        let width = key_width + value_width;
                        let span = checked_span(header.size, width, self.budget())?;
                        self.skip_raw(span)?
                    },
                    _ => {
                        for _ in 0..header.size {
                            self.skip(header.key_type)?;
                            self.skip(header.value_type)?;
                        }
                    },
                }
                self.read_map_end()
            },
            _ => Err(DecodeError::InvalidType(field_type as u8)),
        }
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Returns the number of bytes occupied by `count` values of `width` bytes each.
///
/// A span that does not fit in `usize` is reported against the `remaining` byte budget.
pub(super) fn checked_span(
    count: usize,
    width: usize,
    remaining: usize,
) -> Result<usize, DecodeError> {
    count.checked_mul(width).ok_or(DecodeError::LengthExceeded {
        requested: count.saturating_mul(width),
        remaining,
    })
}
