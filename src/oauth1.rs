//! OAuth 1.0a protocol primitives: parameter sets, PLAINTEXT signatures, nonces,
//! `Authorization` header rendering, and form-encoded token responses.
//!
//! Everything here is a pure function of its inputs except nonce generation, which is
//! injected through [`NonceGenerator`] so tests can substitute a deterministic source.

pub mod form;
pub mod header;
pub mod nonce;
pub mod params;
pub mod signature;

pub use form::*;
pub use header::*;
pub use nonce::*;
pub use params::*;
pub use signature::*;
