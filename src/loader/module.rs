//! # Native Module Handle and ABI Contract
//!
//! Loads the extracted native module with `libloading` and resolves both
//! entry points up front. Resolution either fully succeeds, yielding a
//! usable [`NativeModule`], or fully fails, in which case the module is
//! discarded and the dependent features stay on their reference paths.
//!
//! ## ABI Contract
//! The symbol names and signatures below are a fixed, versioned contract
//! between host and native module. Nothing at this boundary can verify a
//! signature; a mismatch is silent undefined behavior, not a catchable
//! error, so any change here must ship in lockstep with the native module.
//!
//! ```text
//! decrypt(id_ptr, id_len, data_ptr, data_len, key_ptr, key_len, dst_ptr)
//!     dst capacity precondition: data_len + key_len
//! serialize(snapshot, buf_ptr, buf_cap) -> written
//!     written == usize::MAX signals truncation (output exceeded buf_cap)
//! ```
//!
//! The module handle lives for the rest of the process; there is no unload
//! path and at most one successful load per bridge.

use crate::error::{BridgeError, Result};
use crate::snapshot::StateSnapshot;
use libloading::Library;
use std::path::Path;
use tracing::debug;

/// Exported name of the decrypt entry point
pub const DECRYPT_SYMBOL: &[u8] = b"decrypt\0";

/// Exported name of the serialize entry point
pub const SERIALIZE_SYMBOL: &[u8] = b"serialize\0";

/// Return value of `serialize` signaling that the output was truncated
/// because it would have exceeded the buffer capacity
pub const OVERFLOW_SENTINEL: usize = usize::MAX;

/// Decrypt entry point: three (pointer, length) input views plus a raw
/// output pointer with capacity `data_len + key_len`. Writes synchronously
/// and to completion before returning.
pub type DecryptFn = unsafe extern "C" fn(
    id_ptr: *const u8,
    id_len: usize,
    data_ptr: *const u8,
    data_len: usize,
    key_ptr: *const u8,
    key_len: usize,
    dst_ptr: *mut u8,
);

/// Serialize entry point: reads the snapshot by reference, overwrites the
/// buffer from the start up to `buf_cap`, and returns the number of bytes
/// written or [`OVERFLOW_SENTINEL`] on truncation.
pub type SerializeFn =
    unsafe extern "C" fn(snapshot: *const StateSnapshot, buf_ptr: *mut u8, buf_cap: usize) -> usize;

/// A loaded native module with both entry points resolved.
///
/// Owns the underlying library handle for the rest of the process; the
/// resolved function pointers never outlive it because they are only
/// reachable through this struct.
pub struct NativeModule {
    decrypt: DecryptFn,
    serialize: SerializeFn,
    /// Keeps the mapped library alive; dropped only at process exit.
    _library: Library,
}

impl NativeModule {
    /// Load the module at `path` and resolve both entry points.
    ///
    /// The OS error text is preserved in [`BridgeError::LoadFailed`] for
    /// diagnostics. Failure is terminal: the caller must not retry.
    pub fn load(path: &Path) -> Result<Self> {
        // SAFETY: loading a module executes its initialization code in this
        // process. The payload is a trusted, co-developed component that was
        // just extracted from the host bundle, not arbitrary third-party code.
        let library = unsafe { Library::new(path) }
            .map_err(|e| BridgeError::LoadFailed(e.to_string()))?;

        // SAFETY: the signatures below are the fixed ABI contract described
        // in the module docs; they cannot be checked at this boundary.
        let decrypt = unsafe {
            *library
                .get::<DecryptFn>(DECRYPT_SYMBOL)
                .map_err(|_| BridgeError::SymbolNotFound("decrypt"))?
        };
        let serialize = unsafe {
            *library
                .get::<SerializeFn>(SERIALIZE_SYMBOL)
                .map_err(|_| BridgeError::SymbolNotFound("serialize"))?
        };

        debug!(path = %path.display(), "native module loaded, entry points resolved");
        Ok(Self {
            decrypt,
            serialize,
            _library: library,
        })
    }

    /// The resolved decrypt entry point
    pub(crate) fn decrypt_fn(&self) -> DecryptFn {
        self.decrypt
    }

    /// The resolved serialize entry point
    pub(crate) fn serialize_fn(&self) -> SerializeFn {
        self.serialize
    }
}

impl std::fmt::Debug for NativeModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeModule").finish_non_exhaustive()
    }
}
