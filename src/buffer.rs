//! # Reusable Serialization Buffer
//!
//! One fixed-capacity byte buffer, allocated once before any redirect is
//! installed and overwritten in place on every serialize call. The backing
//! storage is never resized and never reallocated, so the steady-state
//! serialize path performs no allocation and the address handed to the
//! native module stays stable for the buffer's whole lifetime.
//!
//! ## Stale contents
//! Previous contents are not cleared between calls. Consumers must read only
//! [`SerialBuffer::contents`], which is bounded by the most recent written
//! length; trailing bytes from a longer earlier write are never exposed.
//!
//! ## Overflow
//! A write is rejected if the reported length exceeds capacity or equals the
//! native overflow sentinel. The rejected write leaves the buffer logically
//! empty rather than exposing a truncated tail.

use crate::error::{BridgeError, Result};
use crate::loader::module::OVERFLOW_SENTINEL;

/// Fixed-capacity output buffer shared by every serialize invocation
#[derive(Debug)]
pub struct SerialBuffer {
    storage: Box<[u8]>,
    written: usize,
}

impl SerialBuffer {
    /// Allocate the buffer once at the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            written: 0,
        }
    }

    /// Capacity in bytes; fixed for the buffer's lifetime
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of bytes recorded by the most recent successful write
    pub fn written(&self) -> usize {
        self.written
    }

    /// Raw pointer to the backing storage, for the native serialize call.
    /// The address is stable across calls; the pointer must not be retained
    /// past one call's dynamic extent.
    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.storage.as_mut_ptr()
    }

    /// Whole backing storage, for host-side serializers that write in place
    pub(crate) fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }

    /// Record the length reported by a serializer for the write it just
    /// performed. Rejects the overflow sentinel and anything past capacity.
    pub(crate) fn record_write(&mut self, written: usize) -> Result<usize> {
        if written == OVERFLOW_SENTINEL || written > self.capacity() {
            self.written = 0;
            return Err(BridgeError::BufferOverflow {
                capacity: self.capacity(),
            });
        }
        self.written = written;
        Ok(written)
    }

    /// Contents of the most recent successful write
    pub fn contents(&self) -> &[u8] {
        &self.storage[..self.written]
    }

    /// Contents of the most recent successful write as text
    pub fn contents_str(&self) -> Result<&str> {
        Ok(std::str::from_utf8(self.contents())?)
    }
}
