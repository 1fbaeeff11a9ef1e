//! Hand-written record types shaped like generated Thrift code.

use alloc::{collections::BTreeMap, string::String, vec::Vec};

use proptest::prelude::*;

use crate::{
    DecodeError, Deserializable, Serializable,
    protocol::{InputProtocol, ListHeader, MapHeader, OutputProtocol, TType},
};

// PERSON
// ================================================================================================

/// `struct Person { 1: i32 id, 2: string name }`
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub id: i32,
    pub name: String,
}

impl Person {
    pub fn new(id: i32, name: &str) -> Self {
        Self { id, name: name.into() }
    }
}

impl Deserializable for Person {
    fn read<P: InputProtocol>(&mut self, protocol: &mut P) -> Result<(), DecodeError> {
        protocol.read_struct_begin()?;
        loop {
            let field = protocol.read_field_begin()?;
            match (field.id, field.field_type) {
                (_, TType::Stop) => break,
                (1, TType::I32) => self.id = protocol.read_i32()?,
                (2, TType::String) => self.name = protocol.read_string()?,
                (_, field_type) => protocol.skip(field_type)?,
            }
            protocol.read_field_end()?;
        }
        protocol.read_struct_end()
    }
}

impl Serializable for Person {
    fn write<W: OutputProtocol>(&self, protocol: &mut W) {
        protocol.write_struct_begin();
        protocol.write_field_begin(TType::I32, 1);
        protocol.write_i32(self.id);
        protocol.write_field_end();
        protocol.write_field_begin(TType::String, 2);
        protocol.write_string(&self.name);
        protocol.write_field_end();
        protocol.write_field_stop();
        protocol.write_struct_end();
    }

    fn get_size_hint(&self) -> usize {
        // two field headers, i32, length-prefixed string, stop
        3 + 4 + 3 + 4 + self.name.len() + 1
    }
}

// EVENT
// ================================================================================================

/// ```thrift
/// struct Event {
///   1: i64 id
///   2: string name
///   3: bool active
///   4: double score
///   5: list<i32> samples
///   6: map<string, i64> counters
///   7: optional Person owner
///   8: binary payload
///   9: list<Person> watchers
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub active: bool,
    pub score: f64,
    pub samples: Vec<i32>,
    pub counters: BTreeMap<String, i64>,
    pub owner: Option<Person>,
    pub payload: Vec<u8>,
    pub watchers: Vec<Person>,
}

impl Deserializable for Event {
    fn read<P: InputProtocol>(&mut self, protocol: &mut P) -> Result<(), DecodeError> {
        protocol.read_struct_begin()?;
        loop {
            let field = protocol.read_field_begin()?;
            match (field.id, field.field_type) {
                (_, TType::Stop) => break,
                (1, TType::I64) => self.id = protocol.read_i64()?,
                (2, TType::String) => self.name = protocol.read_string()?,
                (3, TType::Bool) => self.active = protocol.read_bool()?,
                (4, TType::Double) => self.score = protocol.read_double()?,
                (5, TType::List) => {
                    let header = protocol.read_list_begin()?;
                    let mut samples = Vec::with_capacity(header.size);
                    for _ in 0..header.size {
                        samples.push(protocol.read_i32()?);
                    }
                    protocol.read_list_end()?;
                    self.samples = samples;
                },
                (6, TType::Map) => {
                    let header = protocol.read_map_begin()?;
                    let mut counters = BTreeMap::new();
                    for _ in 0..header.size {
                        let key = protocol.read_string()?;
                        let value = protocol.read_i64()?;
                        counters.insert(key, value);
                    }
                    protocol.read_map_end()?;
                    self.counters = counters;
                },
                (7, TType::Struct) => {
                    let mut owner = Person::default();
                    owner.read(protocol)?;
                    self.owner = Some(owner);
                },
                (8, TType::String) => self.payload = protocol.read_binary()?,
                (9, TType::List) => {
                    let header = protocol.read_list_begin()?;
                    let mut watchers = Vec::with_capacity(header.size);
                    for _ in 0..header.size {
                        let mut watcher = Person::default();
                        watcher.read(protocol)?;
                        watchers.push(watcher);
                    }
                    protocol.read_list_end()?;
                    self.watchers = watchers;
                },
                (_, field_type) => protocol.skip(field_type)?,
            }
            protocol.read_field_end()?;
        }
        protocol.read_struct_end()
    }
}

impl Serializable for Event {
    fn write<W: OutputProtocol>(&self, protocol: &mut W) {
        protocol.write_struct_begin();

        protocol.write_field_begin(TType::I64, 1);
        protocol.write_i64(self.id);
        protocol.write_field_end();

        protocol.write_field_begin(TType::String, 2);
        protocol.write_string(&self.name);
        protocol.write_field_end();

        protocol.write_field_begin(TType::Bool, 3);
        protocol.write_bool(self.active);
        protocol.write_field_end();

        protocol.write_field_begin(TType::Double, 4);
        protocol.write_double(self.score);
        protocol.write_field_end();

        protocol.write_field_begin(TType::List, 5);
        protocol.write_list_begin(ListHeader::new(TType::I32, self.samples.len()));
        for sample in &self.samples {
            protocol.write_i32(*sample);
        }
        protocol.write_list_end();
        protocol.write_field_end();

        protocol.write_field_begin(TType::Map, 6);
        protocol.write_map_begin(MapHeader::new(TType::String, TType::I64, self.counters.len()));
        for (key, value) in &self.counters {
            protocol.write_string(key);
            protocol.write_i64(*value);
        }
        protocol.write_map_end();
        protocol.write_field_end();

        if let Some(owner) = &self.owner {
            protocol.write_field_begin(TType::Struct, 7);
            owner.write(protocol);
            protocol.write_field_end();
        }

        protocol.write_field_begin(TType::String, 8);
        protocol.write_binary(&self.payload);
        protocol.write_field_end();

        protocol.write_field_begin(TType::List, 9);
        protocol.write_list_begin(ListHeader::new(TType::Struct, self.watchers.len()));
        for watcher in &self.watchers {
            watcher.write(protocol);
        }
        protocol.write_list_end();
        protocol.write_field_end();

        protocol.write_field_stop();
        protocol.write_struct_end();
    }
}

// ARBITRARY INSTANCES
// ================================================================================================

impl Arbitrary for Person {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (any::<i32>(), ".{0,16}").prop_map(|(id, name)| Person { id, name }).boxed()
    }
}

impl Arbitrary for Event {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (
            (any::<i64>(), ".{0,24}", any::<bool>(), -1.0e12f64..1.0e12),
            (
                prop::collection::vec(any::<i32>(), 0..32),
                prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8),
                prop::option::of(any::<Person>()),
                prop::collection::vec(any::<u8>(), 0..64),
                prop::collection::vec(any::<Person>(), 0..4),
            ),
        )
            .prop_map(
                |((id, name, active, score), (samples, counters, owner, payload, watchers))| {
                    Event {
                        id,
                        name,
                        active,
                        score,
                        samples,
                        counters,
                        owner,
                        payload,
                        watchers,
                    }
                },
            )
            .boxed()
    }
}
