//! Thrift binary protocol primitives.
//!
//! The [InputProtocol] and [OutputProtocol] traits are the boundary between record types, which
//! know their own schema, and the wire format, which knows nothing about records. The binary
//! protocol implementations live in [binary] and [writer]; the optional read-length cap lives in
//! [limit].

use alloc::{string::String, vec::Vec};

use crate::DecodeError;

pub mod binary;
pub mod limit;
pub mod writer;


pub use binary::{BinaryInputProtocol, ProtocolState};
pub use limit::{ReadLength, ReadLimit, Unlimited};
pub use writer::BinaryOutputProtocol;

// CONSTANTS
// ================================================================================================

/// Default maximum nesting depth of structs and containers.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// THRIFT TYPES
// ================================================================================================

/// Type tags of the Thrift binary protocol.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TType {
    Stop = 0,
    Void = 1,
    Bool = 2,
    Byte = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    String = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
}

impl TType {
    /// Returns the encoded size of a value of this type if it does not depend on the value.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Byte => Some(1),
            Self::I16 => Some(2),
            Self::I32 => Some(4),
            Self::Double | Self::I64 => Some(8),
            _ => None,
        }
    }

    /// Returns the smallest number of bytes a value of this type can occupy on the wire.
    pub const fn min_encoded_size(self) -> usize {
        match self {
            Self::Stop | Self::Void => 0,
            Self::Bool | Self::Byte => 1,
            Self::I16 => 2,
            Self::I32 => 4,
            Self::Double | Self::I64 => 8,
            // i32 length prefix
            Self::String => 4,
            // a lone stop byte
            Self::Struct => 1,
            // key type, value type, i32 size
            Self::Map => 6,
            // element type, i32 size
            Self::Set | Self::List => 5,
        }
    }

    /// Returns true if values of this type may appear as container elements, keys, or values.
    pub const fn is_container_element(self) -> bool {
        !matches!(self, Self::Stop | Self::Void)
    }
}

impl TryFrom<u8> for TType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Stop),
            1 => Ok(Self::Void),
            2 => Ok(Self::Bool),
            3 => Ok(Self::Byte),
            4 => Ok(Self::Double),
            6 => Ok(Self::I16),
            8 => Ok(Self::I32),
            10 => Ok(Self::I64),
            11 => Ok(Self::String),
            12 => Ok(Self::Struct),
            13 => Ok(Self::Map),
            14 => Ok(Self::Set),
            15 => Ok(Self::List),
            _ => Err(DecodeError::InvalidType(value)),
        }
    }
}

// HEADERS
// ================================================================================================

/// Header preceding every field of a struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldHeader {
    pub field_type: TType,
    pub id: i16,
}

impl FieldHeader {
    /// Header of the field-stop marker that terminates a struct.
    pub const STOP: Self = Self { field_type: TType::Stop, id: 0 };

    pub const fn new(field_type: TType, id: i16) -> Self {
        Self { field_type, id }
    }

    pub const fn is_stop(&self) -> bool {
        matches!(self.field_type, TType::Stop)
    }
}

/// Header of a list or a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHeader {
    pub element_type: TType,
    pub size: usize,
}

impl ListHeader {
    pub const fn new(element_type: TType, size: usize) -> Self {
        Self { element_type, size }
    }
}

/// Sets share the list header layout.
pub type SetHeader = ListHeader;

/// Header of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    pub key_type: TType,
    pub value_type: TType,
    pub size: usize,
}

impl MapHeader {
    pub const fn new(key_type: TType, value_type: TType, size: usize) -> Self {
        Self { key_type, value_type, size }
    }
}

// CONFIGURATION
// ================================================================================================

/// Limits applied by the binary protocol reader in addition to the read-length cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryProtocolConfig {
    /// Maximum length of a single string or binary value.
    pub string_length_limit: Option<usize>,
    /// Maximum number of elements (or map entries) in a single container.
    pub container_length_limit: Option<usize>,
    /// Maximum nesting depth of structs and containers.
    pub max_depth: usize,
}

impl BinaryProtocolConfig {
    pub const fn new() -> Self {
        Self {
            string_length_limit: None,
            container_length_limit: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub const fn with_string_length_limit(mut self, limit: usize) -> Self {
        self.string_length_limit = Some(limit);
        self
    }

    pub const fn with_container_length_limit(mut self, limit: usize) -> Self {
        self.container_length_limit = Some(limit);
        self
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for BinaryProtocolConfig {
    fn default() -> Self {
        Self::new()
    }
}

// INPUT PROTOCOL
// ================================================================================================

/// Tag-level primitives a record needs to read itself.
///
/// Every `*_begin` call must be matched by the corresponding `*_end` call; implementations use
/// the pairs to bound nesting depth.
pub trait InputProtocol {
    fn read_struct_begin(&mut self) -> Result<(), DecodeError>;

    fn read_struct_end(&mut self) -> Result<(), DecodeError>;

    /// Reads the next field header; a header for which [FieldHeader::is_stop] holds ends the
    /// struct.
    fn read_field_begin(&mut self) -> Result<FieldHeader, DecodeError>;

    fn read_field_end(&mut self) -> Result<(), DecodeError> {
        Ok(())
    }

    fn read_bool(&mut self) -> Result<bool, DecodeError>;

    fn read_byte(&mut self) -> Result<i8, DecodeError>;

    fn read_i16(&mut self) -> Result<i16, DecodeError>;

    fn read_i32(&mut self) -> Result<i32, DecodeError>;

    fn read_i64(&mut self) -> Result<i64, DecodeError>;

    fn read_double(&mut self) -> Result<f64, DecodeError>;

    fn read_string(&mut self) -> Result<String, DecodeError>;

    fn read_binary(&mut self) -> Result<Vec<u8>, DecodeError>;

    fn read_list_begin(&mut self) -> Result<ListHeader, DecodeError>;

    fn read_list_end(&mut self) -> Result<(), DecodeError>;

    fn read_set_begin(&mut self) -> Result<SetHeader, DecodeError>;

    fn read_set_end(&mut self) -> Result<(), DecodeError>;

    fn read_map_begin(&mut self) -> Result<MapHeader, DecodeError>;

    fn read_map_end(&mut self) -> Result<(), DecodeError>;

    /// Consumes one value of the given type without returning it.
    ///
    /// The default walks the value through the other `read_*` methods, materializing every
    /// string and visiting every container element.
    fn skip(&mut self, field_type: TType) -> Result<(), DecodeError>
    where
        Self: Sized,
    {
        skip_by_reading(self, field_type)
    }
}

/// Skips a value by reading it field by field.
pub fn skip_by_reading<P: InputProtocol>(
    protocol: &mut P,
    field_type: TType,
) -> Result<(), DecodeError> {
    match field_type {
        TType::Bool => protocol.read_bool().map(drop),
        TType::Byte => protocol.read_byte().map(drop),
        TType::I16 => protocol.read_i16().map(drop),
        TType::I32 => protocol.read_i32().map(drop),
        TType::I64 => protocol.read_i64().map(drop),
        TType::Double => protocol.read_double().map(drop),
        TType::String => protocol.read_binary().map(drop),
        TType::Struct => {
            protocol.read_struct_begin()?;
            loop {
                let field = protocol.read_field_begin()?;
                if field.is_stop() {
                    break;
                }
                skip_by_reading(protocol, field.field_type)?;
                protocol.read_field_end()?;
            }
            protocol.read_struct_end()
        },
        TType::List => {
            let header = protocol.read_list_begin()?;
            for _ in 0..header.size {
                skip_by_reading(protocol, header.element_type)?;
            }
            protocol.read_list_end()
        },
        TType::Set => {
            let header = protocol.read_set_begin()?;
            for _ in 0..header.size {
                skip_by_reading(protocol, header.element_type)?;
            }
            protocol.read_set_end()
        },
        TType::Map => {
            let header = protocol.read_map_begin()?;
            for _ in 0..header.size {
                skip_by_reading(protocol, header.key_type)?;
                skip_by_reading(protocol, header.value_type)?;
            }
            protocol.read_map_end()
        },
        TType::Stop | TType::Void => Err(DecodeError::InvalidType(field_type as u8)),
    }
}

// OUTPUT PROTOCOL
// ================================================================================================

/// Tag-level primitives a record needs to write itself.
///
/// Output protocols write into memory and therefore cannot fail.
pub trait OutputProtocol {
    fn write_struct_begin(&mut self) {}

    fn write_struct_end(&mut self) {}

    fn write_field_begin(&mut self, field_type: TType, id: i16);

    fn write_field_end(&mut self) {}

    fn write_field_stop(&mut self);

    fn write_bool(&mut self, value: bool);

    fn write_byte(&mut self, value: i8);

    fn write_i16(&mut self, value: i16);

    fn write_i32(&mut self, value: i32);

    fn write_i64(&mut self, value: i64);

    fn write_double(&mut self, value: f64);

    fn write_string(&mut self, value: &str) {
        self.write_binary(value.as_bytes())
    }

    fn write_binary(&mut self, value: &[u8]);

    fn write_list_begin(&mut self, header: ListHeader);

    fn write_list_end(&mut self) {}

    fn write_set_begin(&mut self, header: SetHeader);

    fn write_set_end(&mut self) {}

    fn write_map_begin(&mut self, header: MapHeader);

    fn write_map_end(&mut self) {}
}
