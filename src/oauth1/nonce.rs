//! Nonce and timestamp sources.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

const NONCE_LEN: usize = 32;

/// Capability producing single-use request nonces.
///
/// Implementations must return an unpredictable value on every call; the broker asks
/// for a new nonce per outgoing request and never caches one.
pub trait NonceGenerator
where
	Self: Send + Sync,
{
	/// Returns a fresh nonce.
	fn generate_nonce(&self) -> String;
}

/// Default generator drawing alphanumeric nonces from the thread-local CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsNonceGenerator;
impl NonceGenerator for OsNonceGenerator {
	fn generate_nonce(&self) -> String {
		rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
	}
}

/// Current Unix time in whole seconds, as sent in `oauth_timestamp`.
pub fn unix_timestamp() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}
