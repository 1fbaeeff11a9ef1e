//! Thrift binary protocol writer.

use alloc::vec::Vec;

use super::{ListHeader, MapHeader, OutputProtocol, SetHeader, TType};

/// A Thrift binary protocol writer that appends to a growable buffer.
#[derive(Debug, Default, Clone)]
pub struct BinaryOutputProtocol {
    buf: Vec<u8>,
}

impl BinaryOutputProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    fn write_size(&mut self, size: usize) {
        // sizes past i32::MAX cannot be represented; saturate so the reader rejects the value
        self.write_i32(i32::try_from(size).unwrap_or(i32::MAX));
    }
}

impl OutputProtocol for BinaryOutputProtocol {
    fn write_field_begin(&mut self, field_type: TType, id: i16) {
        self.buf.push(field_type as u8);
        self.write_i16(id);
    }

    fn write_field_stop(&mut self) {
        self.buf.push(TType::Stop as u8);
    }

    fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    fn write_byte(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    fn write_double(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_bits().to_be_bytes());
    }

    fn write_binary(&mut self, value: &[u8]) {
        self.write_size(value.len());
        self.buf.extend_from_slice(value);
    }

    fn write_list_begin(&mut self, header: ListHeader) {
        self.buf.push(header.element_type as u8);
        self.write_size(header.size);
    }

    fn write_set_begin(&mut self, header: SetHeader) {
        self.write_list_begin(header);
    }

    fn write_map_begin(&mut self, header: MapHeader) {
        self.buf.push(header.key_type as u8);
        self.buf.push(header.value_type as u8);
        self.write_size(header.size);
    }
}
