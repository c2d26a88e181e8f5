//! # Utility Modules
//!
//! Supporting utilities used throughout the bridge.
//!
//! ## Components
//! - **Timing**: wall-clock measurement for the first-call diagnostic and
//!   the disabled-mode instrumentation

pub mod timing;

pub use timing::timed;
