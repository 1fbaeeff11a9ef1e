//! Contracts between record types and protocols.

use alloc::vec::Vec;

use crate::{
    DecodeError,
    protocol::{BinaryOutputProtocol, FieldHeader, InputProtocol, OutputProtocol},
};

// RECORD TRAITS
// ================================================================================================

/// Defines how a record populates itself from an [InputProtocol].
///
/// Implementations read a whole struct: `read_struct_begin`, the field loop up to the stop
/// marker, and `read_struct_end`. Fields the record does not know are passed to
/// [InputProtocol::skip].
pub trait Deserializable {
    /// Reads a struct from `protocol` into `self`, overwriting the fields present in the input.
    ///
    /// # Errors
    /// Returns a [DecodeError] if the input is malformed. `self` is left partially populated and
    /// must not be used.
    fn read<P: InputProtocol>(&mut self, protocol: &mut P) -> Result<(), DecodeError>;
}

/// Defines how a record writes itself to an [OutputProtocol].
pub trait Serializable {
    fn write<W: OutputProtocol>(&self, protocol: &mut W);

    /// Returns an estimate of how many bytes are needed to represent `self`.
    ///
    /// The default implementation returns zero.
    fn get_size_hint(&self) -> usize {
        0
    }

    /// Serializes `self` with the binary protocol.
    fn to_bytes(&self) -> Vec<u8> {
        let mut protocol = BinaryOutputProtocol::with_capacity(self.get_size_hint());
        self.write(&mut protocol);
        protocol.into_inner()
    }
}

// STRUCT OUTLINE
// ================================================================================================

/// A schema-less record that keeps the header of every field and skips every value.
///
/// Decoding into a [StructOutline] validates that a buffer holds a well-formed struct without
/// knowing its schema.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StructOutline {
    fields: Vec<FieldHeader>,
}

impl StructOutline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the headers of the fields in the order they were encoded.
    pub fn fields(&self) -> &[FieldHeader] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Deserializable for StructOutline {
    fn read<P: InputProtocol>(&mut self, protocol: &mut P) -> Result<(), DecodeError> {
        self.fields.clear();
        protocol.read_struct_begin()?;
        loop {
            let field = protocol.read_field_begin()?;
            if field.is_stop() {
                break;
            }
            protocol.skip(field.field_type)?;
            protocol.read_field_end()?;
            self.fields.push(field);
        }
        protocol.read_struct_end()
    }
}
