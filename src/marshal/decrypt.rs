//! The decrypt call: three input views in, one freshly sized buffer out.

use crate::loader::module::DecryptFn;
use crate::marshal::view::InputView;

/// Invoke the decrypt entry point over `(identifier, ciphertext,
/// key_fragment)` and return the plaintext.
///
/// The output buffer is sized to exactly `ciphertext.len() +
/// key_fragment.len()` bytes. That rule is a contract with the native
/// module, not something this layer can verify; if the algorithm ever
/// writes more, the contract must be renegotiated, not patched here.
pub fn call_decrypt(
    decrypt: DecryptFn,
    identifier: &str,
    ciphertext: &[u8],
    key_fragment: &[u8],
) -> Vec<u8> {
    let id = InputView::from_str(identifier);
    let data = InputView::new(ciphertext);
    let key = InputView::new(key_fragment);
    let mut output = vec![0u8; ciphertext.len() + key_fragment.len()];

    // SAFETY: all three views borrow their backing memory for the duration
    // of this call, and `output` is owned locally with the capacity the ABI
    // contract requires. The callee writes synchronously and to completion
    // before returning; no pointer survives this expression.
    unsafe {
        decrypt(
            id.as_ptr(),
            id.len(),
            data.as_ptr(),
            data.len(),
            key.as_ptr(),
            key.len(),
            output.as_mut_ptr(),
        );
    }

    output
}
