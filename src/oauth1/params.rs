//! Protocol parameter sets carried in the `Authorization` header.

// self
use crate::{
	_prelude::*,
	auth::{AppCredential, Callback, OAuthToken, TokenSecret, Verifier},
	oauth1::{self, SignatureMethod},
};

/// `oauth_consumer_key`.
pub const CONSUMER_KEY: &str = "oauth_consumer_key";
/// `oauth_nonce`.
pub const NONCE: &str = "oauth_nonce";
/// `oauth_signature`.
pub const SIGNATURE: &str = "oauth_signature";
/// `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "oauth_signature_method";
/// `oauth_timestamp`.
pub const TIMESTAMP: &str = "oauth_timestamp";
/// `oauth_token`.
pub const TOKEN: &str = "oauth_token";
/// `oauth_token_secret`.
pub const TOKEN_SECRET: &str = "oauth_token_secret";
/// `oauth_callback`.
pub const CALLBACK: &str = "oauth_callback";
/// `oauth_callback_confirmed`.
pub const CALLBACK_CONFIRMED: &str = "oauth_callback_confirmed";
/// `oauth_verifier`.
pub const VERIFIER: &str = "oauth_verifier";

/// Ordered parameter set for one outgoing request.
///
/// Values are kept raw; encoding happens when the header is rendered. Keys are sorted,
/// so rendering is deterministic for identical inputs.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthParams(BTreeMap<&'static str, String>);
impl OAuthParams {
	/// Seeds the parameters every request carries.
	///
	/// `token_secret` is `None` before the provider has issued any token.
	pub fn signed(
		credential: &AppCredential,
		token_secret: Option<&TokenSecret>,
		nonce: String,
		timestamp: i64,
	) -> Self {
		let signature = oauth1::plaintext_signature(&credential.consumer_secret, token_secret);
		let map = BTreeMap::from([
			(CONSUMER_KEY, credential.consumer_key.to_string()),
			(NONCE, nonce),
			(SIGNATURE, signature.expose().to_owned()),
			(SIGNATURE_METHOD, SignatureMethod::Plaintext.as_str().to_owned()),
			(TIMESTAMP, timestamp.to_string()),
		]);

		Self(map)
	}

	/// Adds `oauth_token`.
	pub fn with_token(mut self, token: &OAuthToken) -> Self {
		self.0.insert(TOKEN, token.to_string());

		self
	}

	/// Adds `oauth_callback`.
	pub fn with_callback(mut self, callback: &Callback) -> Self {
		self.0.insert(CALLBACK, callback.as_str().to_owned());

		self
	}

	/// Adds `oauth_verifier`.
	pub fn with_verifier(mut self, verifier: &Verifier) -> Self {
		self.0.insert(VERIFIER, verifier.to_string());

		self
	}

	/// Returns a raw parameter value.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Iterates over parameter names in rendering order.
	pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.0.keys().copied()
	}

	/// Renders the `Authorization` header value.
	pub fn to_header_value(&self) -> String {
		oauth1::authorization_header(&self.0)
	}
}
impl Debug for OAuthParams {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut map = f.debug_map();

		for (key, value) in &self.0 {
			if *key == SIGNATURE {
				map.entry(key, &"<redacted>");
			} else {
				map.entry(key, value);
			}
		}

		map.finish()
	}
}
