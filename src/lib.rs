//! # Native Bridge
//!
//! Accelerates two hot-path operations of a host application by routing
//! them through a dynamically loaded native module: payload decryption and
//! per-tick state serialization. The bridge owns the whole foreign-code
//! boundary: payload extraction, module loading, symbol resolution,
//! raw-buffer marshaling, and the zero-allocation reusable output buffer.
//!
//! ## Components
//! - **Loader**: extracts the embedded payload and resolves entry points
//! - **Marshal**: (pointer, length) views and the two FFI call wrappers
//! - **Redirect**: strategy substitution between native and reference paths
//! - **Reference**: host-side implementations used as fallback and yardstick
//! - **Buffer**: the fixed-capacity serialization buffer, allocated once
//!
//! ## Usage
//! ```rust,no_run
//! use native_bridge::{Bridge, BridgeConfig, EventSink, PayloadSource, StateSnapshot};
//!
//! struct LogSink;
//! impl EventSink for LogSink {
//!     fn publish(&mut self, payload: &str) {
//!         println!("state update: {payload}");
//!     }
//! }
//!
//! let config = BridgeConfig::default();
//! // In the real host the bytes come from `include_bytes!` of the bundled
//! // native module.
//! let embedded: &[u8] = &[0x7f, 0x45, 0x4c, 0x46];
//! let payload = PayloadSource {
//!     file_name: "libaccel.so",
//!     bytes: embedded,
//! };
//! let mut bridge = Bridge::install(&config, &payload);
//!
//! // Decrypt hot path
//! let plaintext = bridge.decrypt.decrypt("asset-guid", &[0x01, 0x02], &[0xAA]);
//! assert_eq!(plaintext.len(), 3);
//!
//! // Update-tick hot path
//! let mut sink = LogSink;
//! let snapshot = StateSnapshot::default();
//! bridge.serialize.on_update(&snapshot, &mut sink).ok();
//! ```
//!
//! ## Failure Model
//! Installation never panics and never fails the host: any extraction,
//! load, or resolution error is logged and the affected feature stays on
//! its reference implementation for the rest of the process.
//!
//! ## Threading
//! The bridge is single-threaded by design, driven by the host's own
//! update tick. Native calls are synchronous and blocking; using the
//! bridge from more than one thread requires external synchronization.

pub mod buffer;
pub mod config;
pub mod error;
pub mod loader;
pub mod marshal;
pub mod redirect;
pub mod reference;
pub mod snapshot;
pub mod utils;

pub use buffer::SerialBuffer;
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use loader::{NativeModule, PayloadSource};
pub use redirect::{
    Bridge, DecryptRedirect, Decryptor, EventSink, RedirectState, SerializeRedirect, Serializer,
};
pub use snapshot::StateSnapshot;
