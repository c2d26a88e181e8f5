//! Decrypt redirect: answers every decrypt call with one strategy.
//!
//! Once installed, the native path fully replaces the reference one; there
//! is no per-call fallback, so the reference implementation never runs
//! again for the process lifetime. The diagnostic variant
//! (native deliberately disabled) instead wraps the reference path with
//! per-call timing logs.

use crate::loader::NativeModule;
use crate::marshal;
use crate::redirect::{trace_transition, RedirectState};
use crate::reference;
use crate::utils::timed;
use std::sync::Arc;
use tracing::debug;

/// Produces decrypted bytes given `(identifier, ciphertext, key_fragment)`
pub trait Decryptor {
    fn decrypt(&self, identifier: &str, ciphertext: &[u8], key_fragment: &[u8]) -> Vec<u8>;
}

/// Native-backed decryptor routing through the marshaling layer
pub struct NativeDecryptor {
    module: Arc<NativeModule>,
}

impl NativeDecryptor {
    pub(crate) fn new(module: Arc<NativeModule>) -> Self {
        Self { module }
    }
}

impl Decryptor for NativeDecryptor {
    fn decrypt(&self, identifier: &str, ciphertext: &[u8], key_fragment: &[u8]) -> Vec<u8> {
        marshal::call_decrypt(
            self.module.decrypt_fn(),
            identifier,
            ciphertext,
            key_fragment,
        )
    }
}

/// Host-side reference decryptor
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceDecryptor;

impl Decryptor for ReferenceDecryptor {
    fn decrypt(&self, identifier: &str, ciphertext: &[u8], key_fragment: &[u8]) -> Vec<u8> {
        let mut output = vec![0u8; ciphertext.len() + key_fragment.len()];
        reference::descramble(identifier.as_bytes(), ciphertext, key_fragment, &mut output);
        output
    }
}

/// The decrypt substitution point
pub struct DecryptRedirect {
    state: RedirectState,
    native: Option<Box<dyn Decryptor>>,
    reference: ReferenceDecryptor,
    /// Log per-call timing on the reference path (diagnostic variant)
    timing: bool,
}

impl DecryptRedirect {
    pub(crate) fn install(native: Box<dyn Decryptor>) -> Self {
        trace_transition("decrypt", RedirectState::Uninstalled, RedirectState::Installing);
        trace_transition("decrypt", RedirectState::Installing, RedirectState::Installed);
        Self {
            state: RedirectState::Installed,
            native: Some(native),
            reference: ReferenceDecryptor,
            timing: false,
        }
    }

    pub(crate) fn reference_with_timing() -> Self {
        Self {
            state: RedirectState::Uninstalled,
            native: None,
            reference: ReferenceDecryptor,
            timing: true,
        }
    }

    pub(crate) fn failed() -> Self {
        trace_transition("decrypt", RedirectState::Uninstalled, RedirectState::Installing);
        trace_transition("decrypt", RedirectState::Installing, RedirectState::Failed);
        Self {
            state: RedirectState::Failed,
            native: None,
            reference: ReferenceDecryptor,
            timing: false,
        }
    }

    pub fn state(&self) -> RedirectState {
        self.state
    }

    /// Decrypt one payload. Exactly one strategy runs per call.
    pub fn decrypt(&self, identifier: &str, ciphertext: &[u8], key_fragment: &[u8]) -> Vec<u8> {
        if let Some(native) = &self.native {
            return native.decrypt(identifier, ciphertext, key_fragment);
        }

        if self.timing {
            let (output, elapsed) =
                timed(|| self.reference.decrypt(identifier, ciphertext, key_fragment));
            debug!(
                identifier,
                elapsed_us = elapsed.as_micros() as u64,
                "reference decrypt"
            );
            output
        } else {
            self.reference.decrypt(identifier, ciphertext, key_fragment)
        }
    }
}

impl std::fmt::Debug for DecryptRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptRedirect")
            .field("state", &self.state)
            .field("native", &self.native.is_some())
            .field("timing", &self.timing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UppercaseStub;

    impl Decryptor for UppercaseStub {
        fn decrypt(&self, _identifier: &str, ciphertext: &[u8], key_fragment: &[u8]) -> Vec<u8> {
            let mut out: Vec<u8> = ciphertext.iter().chain(key_fragment).copied().collect();
            out.iter_mut().for_each(|b| *b = b.to_ascii_uppercase());
            out
        }
    }

    #[test]
    fn test_installed_redirect_routes_to_native() {
        let redirect = DecryptRedirect::install(Box::new(UppercaseStub));
        assert_eq!(redirect.state(), RedirectState::Installed);
        assert_eq!(redirect.decrypt("id", b"ab", b"c"), b"ABC");
    }

    #[test]
    fn test_failed_redirect_runs_reference() {
        let redirect = DecryptRedirect::failed();
        assert_eq!(redirect.state(), RedirectState::Failed);

        let output = redirect.decrypt("id", &[0x01, 0x02, 0x03], &[0xAA, 0xBB]);
        assert_eq!(output.len(), 5);
        assert_eq!(output, ReferenceDecryptor.decrypt("id", &[0x01, 0x02, 0x03], &[0xAA, 0xBB]));
    }

    #[test]
    fn test_timing_variant_matches_reference_output() {
        let redirect = DecryptRedirect::reference_with_timing();
        assert_eq!(redirect.state(), RedirectState::Uninstalled);

        let plain = redirect.decrypt("guid", b"payload-bytes", b"frag");
        assert_eq!(plain, ReferenceDecryptor.decrypt("guid", b"payload-bytes", b"frag"));
    }
}
