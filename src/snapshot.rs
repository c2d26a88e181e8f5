//! # State Snapshot
//!
//! The frequently-changing host state that the serialize hot path turns into
//! JSON on every update tick.
//!
//! The struct is `#[repr(C)]` because the native serializer reads it by
//! reference across the FFI boundary; its layout is part of the versioned
//! ABI contract in [`crate::loader::module`]. Field order here is also the
//! field order of the JSON output, for both the native module and the
//! reference serializer.

use serde::{Deserialize, Serialize};

/// Host state published to the downstream sink once per update tick.
///
/// All fields are fixed-size scalars so the layout is stable across the
/// native boundary. Adding, removing, or reordering fields is an ABI break
/// and must be coordinated with the native module.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Monotonic frame counter
    pub frame: u64,
    /// Milliseconds since the host session started
    pub session_ms: u64,
    /// Players currently in the instance
    pub player_count: u32,
    /// Round-trip latency to the instance server, in milliseconds
    pub ping_ms: u32,
    /// Health as an integer percentage
    pub health_pct: u32,
    /// Stamina as an integer percentage
    pub stamina_pct: u32,
    /// Whether the in-game menu is open
    pub menu_open: bool,
    /// Whether the local microphone is muted
    pub muted: bool,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            frame: 0,
            session_ms: 0,
            player_count: 0,
            ping_ms: 0,
            health_pct: 100,
            stamina_pct: 100,
            menu_open: false,
            muted: false,
        }
    }
}
