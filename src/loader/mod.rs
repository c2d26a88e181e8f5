//! # Native Module Loader
//!
//! Brings the native acceleration module into the process: extracts the
//! embedded payload to its install location, loads it into the address
//! space, and resolves the exported entry points into typed callables.
//!
//! ## Components
//! - **Payload**: extraction of the embedded native payload to disk
//! - **Module**: `libloading`-backed load and symbol resolution
//!
//! ## Failure Policy
//! Any failure at extraction, load, or resolution is terminal for the
//! process lifetime: the error is logged at the install site and the
//! dependent feature stays on its reference path. There is no retry, no
//! alternate path, and no unload.

pub mod module;
pub mod payload;

pub use module::NativeModule;
pub use payload::{extract, PayloadSource};
