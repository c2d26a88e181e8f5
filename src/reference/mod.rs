//! # Reference Implementations
//!
//! Host-side implementations of both accelerated operations. These are the
//! fallback paths when the native module is unavailable or deliberately
//! disabled, and the yardstick for the first-call diagnostic comparison.
//!
//! ## Components
//! - **Decrypt**: the payload descramble algorithm
//! - **Json**: an in-place JSON writer for snapshots with no steady-state
//!   allocation

pub mod decrypt;
pub mod json;

pub use decrypt::descramble;
pub use json::write_snapshot;
