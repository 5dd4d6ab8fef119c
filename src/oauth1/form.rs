//! Form-encoded token endpoint responses.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{OAuthToken, TokenSecret},
	error::MalformedError,
	oauth1::{CALLBACK_CONFIRMED, TOKEN, TOKEN_SECRET},
};

/// Fields extracted from a request-token or access-token response body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenResponse {
	/// `oauth_token`.
	pub token: OAuthToken,
	/// `oauth_token_secret`.
	pub secret: TokenSecret,
	/// `oauth_callback_confirmed`, when present.
	pub callback_confirmed: Option<bool>,
}
impl TokenResponse {
	/// Parses `oauth_token=...&oauth_token_secret=...` bodies.
	///
	/// Unknown keys are ignored and the first occurrence of a repeated key wins.
	pub fn parse(body: &[u8]) -> Result<Self, MalformedError> {
		let mut token = None;
		let mut secret = None;
		let mut callback_confirmed = None;

		for (key, value) in form_urlencoded::parse(body) {
			match key.as_ref() {
				TOKEN if token.is_none() => token = Some(value.into_owned()),
				TOKEN_SECRET if secret.is_none() => secret = Some(value.into_owned()),
				CALLBACK_CONFIRMED if callback_confirmed.is_none() =>
					callback_confirmed = Some(value.eq_ignore_ascii_case("true")),
				_ => {},
			}
		}

		let token = token.ok_or(MalformedError::MissingField { field: TOKEN })?;
		let token = OAuthToken::new(token)
			.map_err(|source| MalformedError::InvalidField { field: TOKEN, source })?;
		let secret = secret
			.filter(|value| !value.is_empty())
			.ok_or(MalformedError::MissingField { field: TOKEN_SECRET })?;

		Ok(Self { token, secret: TokenSecret::new(secret), callback_confirmed })
	}
}
