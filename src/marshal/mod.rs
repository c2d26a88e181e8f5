//! # Buffer Marshaling Layer
//!
//! The only place in the crate permitted to take raw addresses of host
//! memory. Inputs cross the boundary as non-owning (pointer, length) views
//! scoped to one call; outputs are caller-owned buffers the native module
//! writes in place.
//!
//! ## Components
//! - **View**: borrowed (pointer, length) input views
//! - **Decrypt**: the decrypt call with its output sizing contract
//! - **Serialize**: the serialize call into the reusable buffer
//!
//! ## Pinning
//! Runtimes with moving collectors need explicit pin/unpin guards around
//! foreign calls. Here the borrow checker carries the same contract: a
//! view borrows its backing slice, so the memory can
//! neither move nor be freed while the view exists, and the view cannot
//! outlive the call site that created it. Raw pointers are taken inside the
//! call expression and never escape its dynamic extent.

pub mod decrypt;
pub mod serialize;
pub mod view;

pub use decrypt::call_decrypt;
pub use serialize::call_serialize;
pub use view::InputView;
