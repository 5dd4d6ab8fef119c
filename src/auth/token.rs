//! Token pairs issued during the handshake and the callback the provider redirects to.

// self
use crate::{
	_prelude::*,
	auth::{OAuthToken, TokenSecret},
};

/// Out-of-band marker defined by OAuth 1.0a for clients without a redirect target.
pub const OUT_OF_BAND: &str = "oob";

/// Short-lived, unauthorized token pair returned by the request-token endpoint.
///
/// The pair belongs to exactly one login attempt: the caller keeps it until the
/// verifier arrives and then hands it to the access-token step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestTokenPair {
	/// Request token, echoed to the authorization page and the access-token step.
	pub token: OAuthToken,
	/// Request-token secret, the right half of the access-token signature.
	pub secret: TokenSecret,
	/// Whether the provider acknowledged the callback (`oauth_callback_confirmed=true`).
	pub callback_confirmed: bool,
}

/// Durable access token pair authorizing API calls on the user's behalf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenPair {
	/// Access token sent as `oauth_token` on authenticated calls.
	pub access_token: OAuthToken,
	/// Access-token secret, the right half of every authenticated signature.
	pub token_secret: TokenSecret,
}

/// Where the provider sends the user after approval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Callback {
	/// Redirect to an absolute URL (web route or custom app scheme).
	Url(Url),
	/// No redirect; the provider displays the verifier for manual entry.
	OutOfBand,
}
impl Callback {
	/// Returns the `oauth_callback` parameter value.
	pub fn as_str(&self) -> &str {
		match self {
			Callback::Url(url) => url.as_str(),
			Callback::OutOfBand => OUT_OF_BAND,
		}
	}
}
impl From<Url> for Callback {
	fn from(url: Url) -> Self {
		Self::Url(url)
	}
}
impl Display for Callback {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
