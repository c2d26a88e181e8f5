//! Serialize redirect: owns the reusable buffer and the update hot path.
//!
//! Every host update tick lands in [`SerializeRedirect::on_update`], which
//! serializes the snapshot into the one fixed-capacity buffer and publishes
//! the contents to the downstream sink exactly once per successful call.
//! The first invocation additionally runs a timing comparison against
//! `serde_json` and logs both outputs for validation; steady-state calls
//! take the direct, unverified path.

use crate::buffer::SerialBuffer;
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::loader::NativeModule;
use crate::marshal;
use crate::redirect::{trace_transition, RedirectState};
use crate::reference;
use crate::snapshot::StateSnapshot;
use crate::utils::timed;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Produces serialized text for a snapshot, written into the reusable buffer
pub trait Serializer {
    fn serialize_into(&self, snapshot: &StateSnapshot, buffer: &mut SerialBuffer) -> Result<usize>;
}

/// The host's notification mechanism; called once per successful serialize
pub trait EventSink {
    fn publish(&mut self, payload: &str);
}

/// Native-backed serializer routing through the marshaling layer
pub struct NativeSerializer {
    module: Arc<NativeModule>,
}

impl NativeSerializer {
    pub(crate) fn new(module: Arc<NativeModule>) -> Self {
        Self { module }
    }
}

impl Serializer for NativeSerializer {
    fn serialize_into(&self, snapshot: &StateSnapshot, buffer: &mut SerialBuffer) -> Result<usize> {
        marshal::call_serialize(self.module.serialize_fn(), snapshot, buffer)
    }
}

/// Host-side reference serializer (in-place JSON writer)
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceSerializer;

impl Serializer for ReferenceSerializer {
    fn serialize_into(&self, snapshot: &StateSnapshot, buffer: &mut SerialBuffer) -> Result<usize> {
        reference::write_snapshot(snapshot, buffer)
    }
}

/// The serialize substitution point.
///
/// Owns the reusable buffer for its whole lifetime; no other component
/// reads or writes it between calls. The invocation counter starts at zero,
/// increments once per call, and is never reset. The enabled flag falls
/// back to the reference serializer at runtime without reinstalling.
pub struct SerializeRedirect {
    state: RedirectState,
    native: Option<Box<dyn Serializer>>,
    reference: ReferenceSerializer,
    buffer: SerialBuffer,
    invocations: AtomicU64,
    native_enabled: AtomicBool,
    first_call_diagnostics: bool,
}

impl SerializeRedirect {
    pub(crate) fn install(native: Box<dyn Serializer>, config: &BridgeConfig) -> Self {
        trace_transition("serialize", RedirectState::Uninstalled, RedirectState::Installing);
        trace_transition("serialize", RedirectState::Installing, RedirectState::Installed);
        Self {
            state: RedirectState::Installed,
            native: Some(native),
            reference: ReferenceSerializer,
            buffer: SerialBuffer::with_capacity(config.buffer_capacity),
            invocations: AtomicU64::new(0),
            native_enabled: AtomicBool::new(true),
            first_call_diagnostics: config.first_call_diagnostics,
        }
    }

    pub(crate) fn reference(config: &BridgeConfig) -> Self {
        Self {
            state: RedirectState::Uninstalled,
            native: None,
            reference: ReferenceSerializer,
            buffer: SerialBuffer::with_capacity(config.buffer_capacity),
            invocations: AtomicU64::new(0),
            native_enabled: AtomicBool::new(false),
            first_call_diagnostics: config.first_call_diagnostics,
        }
    }

    pub(crate) fn failed(config: &BridgeConfig) -> Self {
        trace_transition("serialize", RedirectState::Uninstalled, RedirectState::Installing);
        trace_transition("serialize", RedirectState::Installing, RedirectState::Failed);
        Self {
            state: RedirectState::Failed,
            native: None,
            reference: ReferenceSerializer,
            buffer: SerialBuffer::with_capacity(config.buffer_capacity),
            invocations: AtomicU64::new(0),
            native_enabled: AtomicBool::new(false),
            first_call_diagnostics: config.first_call_diagnostics,
        }
    }

    pub fn state(&self) -> RedirectState {
        self.state
    }

    /// Calls intercepted so far
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Toggle the native path at runtime. Disabling falls back to the
    /// reference serializer without reinstalling the redirect.
    pub fn set_native_enabled(&self, enabled: bool) {
        self.native_enabled.store(enabled, Ordering::Relaxed);
    }

    /// The reusable buffer, exposed read-only for inspection
    pub fn buffer(&self) -> &SerialBuffer {
        &self.buffer
    }

    /// One intercepted update tick: serialize the snapshot into the
    /// reusable buffer and publish the contents downstream.
    ///
    /// A failed serialize (overflow, invalid output) is logged and returned
    /// without publishing; the buffer is left logically empty and the next
    /// tick proceeds normally.
    pub fn on_update(&mut self, snapshot: &StateSnapshot, sink: &mut dyn EventSink) -> Result<()> {
        let call_index = self.invocations.fetch_add(1, Ordering::Relaxed);
        let first = call_index == 0 && self.first_call_diagnostics;

        if first {
            match timed(|| serde_json::to_string(snapshot)) {
                (Ok(expected), elapsed) => info!(
                    elapsed_us = elapsed.as_micros() as u64,
                    output = %expected,
                    "first call: reference serializer"
                ),
                (Err(e), _) => debug!(error = %e, "first call: reference comparison skipped"),
            }
        }

        let (outcome, elapsed) = timed(|| self.serialize_once(snapshot));
        if let Err(e) = outcome {
            error!(error = %e, "serialize failed; update not published");
            return Err(e);
        }

        let payload = match self.buffer.contents_str() {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "serializer output rejected; update not published");
                return Err(e);
            }
        };

        if first {
            info!(
                elapsed_us = elapsed.as_micros() as u64,
                output = %payload,
                "first call: accelerated serializer"
            );
        }

        sink.publish(payload);
        debug!(written = payload.len(), "published state update");
        Ok(())
    }

    fn serialize_once(&mut self, snapshot: &StateSnapshot) -> Result<usize> {
        match (&self.native, self.native_enabled.load(Ordering::Relaxed)) {
            (Some(native), true) => native.serialize_into(snapshot, &mut self.buffer),
            _ => self.reference.serialize_into(snapshot, &mut self.buffer),
        }
    }
}

impl std::fmt::Debug for SerializeRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializeRedirect")
            .field("state", &self.state)
            .field("native", &self.native.is_some())
            .field("invocations", &self.invocations())
            .field("capacity", &self.buffer.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;

    #[derive(Default)]
    struct VecSink {
        events: Vec<String>,
    }

    impl EventSink for VecSink {
        fn publish(&mut self, payload: &str) {
            self.events.push(payload.to_string());
        }
    }

    struct MarkerSerializer;

    impl Serializer for MarkerSerializer {
        fn serialize_into(
            &self,
            _snapshot: &StateSnapshot,
            buffer: &mut SerialBuffer,
        ) -> Result<usize> {
            let marker = b"native-output";
            buffer.storage_mut()[..marker.len()].copy_from_slice(marker);
            buffer.record_write(marker.len())
        }
    }

    struct OverflowSerializer;

    impl Serializer for OverflowSerializer {
        fn serialize_into(
            &self,
            _snapshot: &StateSnapshot,
            buffer: &mut SerialBuffer,
        ) -> Result<usize> {
            buffer.record_write(usize::MAX)
        }
    }

    fn config() -> BridgeConfig {
        BridgeConfig::default_with_overrides(|c| c.buffer_capacity = 256)
    }

    #[test]
    fn test_publishes_once_per_invocation() {
        let mut redirect = SerializeRedirect::install(Box::new(MarkerSerializer), &config());
        let mut sink = VecSink::default();
        let snapshot = StateSnapshot::default();

        redirect.on_update(&snapshot, &mut sink).expect("first");
        redirect.on_update(&snapshot, &mut sink).expect("second");

        assert_eq!(redirect.invocations(), 2);
        assert_eq!(sink.events, vec!["native-output", "native-output"]);
    }

    #[test]
    fn test_enabled_flag_falls_back_to_reference() {
        let mut redirect = SerializeRedirect::install(Box::new(MarkerSerializer), &config());
        let mut sink = VecSink::default();
        let snapshot = StateSnapshot::default();

        redirect.on_update(&snapshot, &mut sink).expect("native");
        redirect.set_native_enabled(false);
        redirect.on_update(&snapshot, &mut sink).expect("reference");

        assert_eq!(sink.events[0], "native-output");
        assert_eq!(
            sink.events[1],
            serde_json::to_string(&snapshot).expect("serde_json")
        );
    }

    #[test]
    fn test_overflow_not_published() {
        let mut redirect = SerializeRedirect::install(Box::new(OverflowSerializer), &config());
        let mut sink = VecSink::default();

        let result = redirect.on_update(&StateSnapshot::default(), &mut sink);
        assert!(matches!(result, Err(BridgeError::BufferOverflow { .. })));
        assert!(sink.events.is_empty());
        assert!(redirect.buffer().contents().is_empty());
    }

    #[test]
    fn test_reference_redirect_serializes_snapshot() {
        let mut redirect = SerializeRedirect::reference(&config());
        assert_eq!(redirect.state(), RedirectState::Uninstalled);

        let snapshot = StateSnapshot {
            frame: 9,
            ..StateSnapshot::default()
        };
        let mut sink = VecSink::default();
        redirect.on_update(&snapshot, &mut sink).expect("reference");

        assert_eq!(
            sink.events,
            vec![serde_json::to_string(&snapshot).expect("serde_json")]
        );
    }

    #[test]
    fn test_failure_does_not_poison_next_tick() {
        let mut redirect = SerializeRedirect::reference(&BridgeConfig::default_with_overrides(
            |c| c.buffer_capacity = 16,
        ));
        let mut sink = VecSink::default();

        // Reference JSON for any snapshot is larger than 16 bytes.
        let result = redirect.on_update(&StateSnapshot::default(), &mut sink);
        assert!(result.is_err());
        assert!(sink.events.is_empty());

        // The redirect keeps running; a later fitting write publishes.
        let mut roomy = SerializeRedirect::reference(&config());
        roomy
            .on_update(&StateSnapshot::default(), &mut sink)
            .expect("fits");
        assert_eq!(sink.events.len(), 1);
    }
}
