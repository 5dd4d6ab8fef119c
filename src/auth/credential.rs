//! Static application credential supplied by configuration.

// self
use crate::{
	_prelude::*,
	auth::{ConsumerKey, IdentifierError, TokenSecret},
};

/// Consumer key/secret pair registered with the provider for this application.
///
/// The credential is immutable and long-lived; every handshake step receives it by
/// reference so no step reads it from shared state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredential {
	/// Public consumer key sent as `oauth_consumer_key`.
	pub consumer_key: ConsumerKey,
	/// Consumer secret, the left half of every PLAINTEXT signature.
	pub consumer_secret: TokenSecret,
}
impl AppCredential {
	/// Validates and assembles a credential; both halves must be non-empty.
	pub fn new(
		consumer_key: impl AsRef<str>,
		consumer_secret: impl Into<TokenSecret>,
	) -> Result<Self, IdentifierError> {
		let consumer_key = ConsumerKey::new(consumer_key)?;
		let consumer_secret = consumer_secret.into();

		if consumer_secret.is_empty() {
			return Err(IdentifierError::Empty { kind: "Consumer secret" });
		}

		Ok(Self { consumer_key, consumer_secret })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn credential_requires_both_halves() {
		assert!(AppCredential::new("", "secret").is_err());
		assert_eq!(
			AppCredential::new("key", "").expect_err("Empty secret should be rejected."),
			IdentifierError::Empty { kind: "Consumer secret" }
		);

		let credential =
			AppCredential::new("key", "secret").expect("Credential fixture should be valid.");

		assert_eq!(credential.consumer_key.as_str(), "key");
		assert!(format!("{credential:?}").contains("<redacted>"));
	}
}
