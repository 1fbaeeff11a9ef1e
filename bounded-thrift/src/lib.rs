//! Thrift binary deserialization hardened against corrupt and adversarial input.
//!
//! [BinaryDeserializer] decodes records from borrowed byte ranges without copying them. Before
//! every decode it caps the number of bytes the protocol reader may consume to the size of the
//! range, so a corrupt length prefix fails fast instead of triggering a huge allocation, and it
//! skips unknown fields without walking or materializing their contents.
//!
//! ```
//! use bounded_thrift::{BinaryDeserializer, StructOutline};
//!
//! // struct { 1: i32 = 42 }, surrounded by unrelated bytes
//! let buffer = [0xff, 0xff, 8, 0, 1, 0, 0, 0, 42, 0, 0xee];
//!
//! let mut deserializer = BinaryDeserializer::new();
//! let mut outline = StructOutline::new();
//! let consumed = deserializer.deserialize_range(&mut outline, &buffer, 2, 8).unwrap();
//!
//! assert_eq!(consumed, 8);
//! assert_eq!(outline.fields()[0].id, 1);
//! ```

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod deserializer;
pub mod protocol;
pub mod record;
pub mod transport;

mod error;

#[cfg(test)]
mod test_utils;

// RE-EXPORTS
// ================================================================================================

#[cfg(feature = "std")]
pub use deserializer::pool::{DeserializerPool, PooledDeserializer};
pub use deserializer::{BinaryDeserializer, deserialize_many};
pub use error::DecodeError;
pub use protocol::{
    BinaryInputProtocol, BinaryOutputProtocol, BinaryProtocolConfig, FieldHeader, InputProtocol,
    OutputProtocol, ReadLength, ReadLimit, TType, Unlimited,
};
pub use record::{Deserializable, Serializable, StructOutline};
pub use transport::{ByteReader, TransportWindow};
