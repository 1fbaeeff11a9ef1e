//! A pool of deserializers with exclusive checkout.

use alloc::vec::Vec;
use core::{
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};
use std::sync::{Mutex, PoisonError};

use super::BinaryDeserializer;
use crate::protocol::{BinaryProtocolConfig, ReadLength, ReadLimit};

/// Default number of idle deserializers a pool keeps around.
pub const DEFAULT_MAX_IDLE: usize = 16;

/// A thread-safe pool of [BinaryDeserializer]s.
///
/// [DeserializerPool::checkout] hands out an exclusive guard; the deserializer goes back to the
/// pool when the guard is dropped. The lock is held only while an instance is taken or returned,
/// never during a decode.
#[derive(Debug)]
pub struct DeserializerPool<L: ReadLimit = ReadLength> {
    config: BinaryProtocolConfig,
    max_idle: usize,
    idle: Mutex<Vec<BinaryDeserializer<L>>>,
}

impl<L: ReadLimit> DeserializerPool<L> {
    pub fn new(config: BinaryProtocolConfig) -> Self {
        Self::with_max_idle(config, DEFAULT_MAX_IDLE)
    }

    /// Returns a pool that keeps at most `max_idle` returned deserializers.
    pub fn with_max_idle(config: BinaryProtocolConfig, max_idle: usize) -> Self {
        Self { config, max_idle, idle: Mutex::new(Vec::new()) }
    }

    pub fn config(&self) -> &BinaryProtocolConfig {
        &self.config
    }

    /// Takes an idle deserializer out of the pool, creating one if none is available.
    pub fn checkout(&self) -> PooledDeserializer<'_, L> {
        let deserializer = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_else(|| BinaryDeserializer::with_config(self.config));
        PooledDeserializer { pool: self, deserializer: ManuallyDrop::new(deserializer) }
    }

    /// Returns the number of deserializers currently waiting in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn give_back(&self, deserializer: BinaryDeserializer<L>) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_idle {
            idle.push(deserializer);
        }
    }
}

impl<L: ReadLimit> Default for DeserializerPool<L> {
    fn default() -> Self {
        Self::new(BinaryProtocolConfig::default())
    }
}

/// A deserializer checked out of a [DeserializerPool].
#[derive(Debug)]
pub struct PooledDeserializer<'p, L: ReadLimit = ReadLength> {
    pool: &'p DeserializerPool<L>,
    // moved back into the pool when the guard is dropped
    deserializer: ManuallyDrop<BinaryDeserializer<L>>,
}

impl<L: ReadLimit> Deref for PooledDeserializer<'_, L> {
    type Target = BinaryDeserializer<L>;

    fn deref(&self) -> &Self::Target {
        &self.deserializer
    }
}

impl<L: ReadLimit> DerefMut for PooledDeserializer<'_, L> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.deserializer
    }
}

impl<L: ReadLimit> Drop for PooledDeserializer<'_, L> {
    fn drop(&mut self) {
        // SAFETY: the deserializer is taken exactly once, here, and the guard is never used again
        let deserializer = unsafe { ManuallyDrop::take(&mut self.deserializer) };
        self.pool.give_back(deserializer);
    }
}
