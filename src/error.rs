//! # Error Types
//!
//! Error handling for the native acceleration bridge.
//!
//! This module defines all error variants that can occur while bringing the
//! native module online and while exchanging buffers with it.
//!
//! ## Error Categories
//! - **Extraction Errors**: I/O failures writing the embedded payload to disk
//! - **Load Errors**: OS-level module load failures (error text preserved)
//! - **Resolution Errors**: missing or misnamed entry points
//! - **Buffer Errors**: serializer output exceeding the fixed buffer capacity
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Propagation Policy
//! None of these errors propagate to the host application as a panic. Every
//! failure is handled at the point of occurrence by logging and disabling
//! exactly the dependent feature; the host keeps running on its reference
//! implementations.

use std::io;
use std::str::Utf8Error;
use thiserror::Error;

/// `BridgeError` is the primary error type for all bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("failed to extract native payload: {0}")]
    ExtractionFailed(#[from] io::Error),

    #[error("native module load failed: {0}")]
    LoadFailed(String),

    #[error("symbol '{0}' not found in native module")]
    SymbolNotFound(&'static str),

    #[error("serialized output exceeds buffer capacity ({capacity} bytes)")]
    BufferOverflow { capacity: usize },

    #[error("native serializer produced invalid UTF-8: {0}")]
    InvalidOutput(#[from] Utf8Error),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;
