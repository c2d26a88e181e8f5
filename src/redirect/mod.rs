//! # Call Redirection Shim
//!
//! Substitutes the accelerated implementations for the host's reference
//! ones. Rather than rewriting method bodies at runtime, the substitution
//! point is explicit: each hot-path capability is a trait with
//! a native-backed implementation and a reference implementation, selected
//! once at install time and, for serialization, toggled at runtime by a
//! process-wide enabled flag.
//!
//! ## Components
//! - **Decrypt**: [`DecryptRedirect`] answers every decrypt call
//! - **Serialize**: [`SerializeRedirect`] owns the reusable buffer and
//!   publishes each update to the downstream sink
//!
//! ## State Machine
//! `Uninstalled → Installing → Installed` on success, or
//! `Uninstalled → Installing → Failed` on any loader error. Both end states
//! are terminal: a failed redirect stays inert on the reference path for
//! the rest of the process, and nothing transitions back to `Uninstalled`.
//!
//! Exactly one path executes per call; a redirect never runs both the
//! native and the reference implementation for the same invocation outside
//! the one-time diagnostic, so side effects such as event publication
//! happen once.

pub mod decrypt;
pub mod serialize;

pub use decrypt::{DecryptRedirect, Decryptor, NativeDecryptor, ReferenceDecryptor};
pub use serialize::{
    EventSink, NativeSerializer, ReferenceSerializer, SerializeRedirect, Serializer,
};

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::loader::{self, NativeModule, PayloadSource};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Installation state of a redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectState {
    /// Redirect not attempted; the reference path executes
    Uninstalled,
    /// Loader chain in flight
    Installing,
    /// Native path active; terminal
    Installed,
    /// Loader chain failed; reference path executes; terminal
    Failed,
}

pub(crate) fn trace_transition(redirect: &'static str, from: RedirectState, to: RedirectState) {
    debug!(redirect, ?from, ?to, "redirect state transition");
}

/// Both redirects plus the one-time native module bring-up.
///
/// `install` never fails from the host's perspective: any loader error is
/// logged and the affected redirects stay on their reference paths.
#[derive(Debug)]
pub struct Bridge {
    pub decrypt: DecryptRedirect,
    pub serialize: SerializeRedirect,
}

impl Bridge {
    /// Extract, load, and resolve the native module once, then install both
    /// redirects against it.
    pub fn install(config: &BridgeConfig, payload: &PayloadSource<'_>) -> Self {
        if !config.native_enabled {
            info!("native module disabled by configuration; reference paths with timing");
            return Self {
                decrypt: DecryptRedirect::reference_with_timing(),
                serialize: SerializeRedirect::reference(config),
            };
        }

        match Self::load_native(config, payload) {
            Ok(module) => {
                let module = Arc::new(module);
                Self {
                    decrypt: DecryptRedirect::install(Box::new(NativeDecryptor::new(
                        Arc::clone(&module),
                    ))),
                    serialize: SerializeRedirect::install(
                        Box::new(NativeSerializer::new(module)),
                        config,
                    ),
                }
            }
            Err(e) => {
                error!(error = %e, "native module unavailable; features disabled for process lifetime");
                Self {
                    decrypt: DecryptRedirect::failed(),
                    serialize: SerializeRedirect::failed(config),
                }
            }
        }
    }

    fn load_native(config: &BridgeConfig, payload: &PayloadSource<'_>) -> Result<NativeModule> {
        let path = loader::extract(payload, &config.install_dir)?;
        NativeModule::load(&path)
    }
}
