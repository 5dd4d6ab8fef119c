//! First leg: obtain an unauthorized request token.
//!
//! [`Broker::request_token`] signs with `consumer_secret&` (no token secret exists
//! yet), posts to the request-token endpoint, and parses the form-encoded reply.
//! [`Broker::start_authorization`] additionally builds the approval URL the caller sends
//! the user to, packaged as a [`PendingAuthorization`] the caller retains until the
//! verifier comes back.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	auth::{AppCredential, Callback, RequestTokenPair, Verifier},
	error::{ConfigError, MalformedError},
	flows::Broker,
	http::HandshakeHttpClient,
	oauth1::{self, TokenResponse},
	obs::{self, HandshakeStep, StepOutcome, StepSpan},
	transport::TransportErrorMapper,
};

/// Request token awaiting user approval, plus the URL the user must visit.
///
/// The value is self-contained: keep it for as long as the user may take to approve
/// and redeem it later through [`Broker::access_token`] or
/// [`Handshake::resume`](crate::flows::Handshake::resume).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAuthorization {
	/// Request token pair issued by the provider.
	pub request: RequestTokenPair,
	/// Provider page where the user approves the request token.
	pub authorize_url: Url,
}
impl PendingAuthorization {
	/// Extracts the verifier from the callback redirect.
	///
	/// The redirect must echo this pair's `oauth_token` when it carries one; a redirect
	/// for another login attempt is rejected instead of being redeemed with this secret.
	pub fn verifier_from_callback(&self, callback: &Url) -> Result<Verifier> {
		let mut token = None;
		let mut verifier = None;

		for (key, value) in callback.query_pairs() {
			match key.as_ref() {
				oauth1::TOKEN if token.is_none() => token = Some(value.into_owned()),
				oauth1::VERIFIER if verifier.is_none() => verifier = Some(value.into_owned()),
				_ => {},
			}
		}

		if let Some(token) = token
			&& token != self.request.token.as_str()
		{
			return Err(ConfigError::CallbackTokenMismatch.into());
		}

		let verifier = verifier.ok_or(ConfigError::MissingVerifier)?;

		Verifier::new(verifier).map_err(|e| ConfigError::InvalidCallback(e).into())
	}
}

impl<C, M> Broker<C, M>
where
	C: ?Sized + HandshakeHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Obtains a request token pair for `callback`.
	///
	/// Fails with [`Error::Protocol`] on a non-success status and with
	/// [`Error::MalformedResponse`] when the body lacks either token field.
	pub async fn request_token(
		&self,
		credential: &AppCredential,
		callback: &Callback,
	) -> Result<RequestTokenPair> {
		const STEP: HandshakeStep = HandshakeStep::RequestToken;

		let span = StepSpan::new(STEP, "request_token");

		obs::record_step_outcome(STEP, StepOutcome::Attempt);

		let result = span
			.instrument(async move {
				let params = self.signed_params(credential, None).with_callback(callback);
				let response = self
					.send(STEP, Method::POST, &self.descriptor.endpoints.request_token, &params)
					.await?
					.into_success(STEP)?;
				let parsed = TokenResponse::parse(&response.body)
					.map_err(|source| Error::malformed(STEP, response.text(), source))?;
				let callback_confirmed = parsed.callback_confirmed.unwrap_or(false);

				if self.descriptor.quirks.require_callback_confirmed && !callback_confirmed {
					return Err(Error::malformed(
						STEP,
						response.text(),
						MalformedError::CallbackNotConfirmed,
					));
				}

				Ok(RequestTokenPair { token: parsed.token, secret: parsed.secret, callback_confirmed })
			})
			.await;

		obs::record_step_result(STEP, &result);

		result
	}

	/// Builds the provider approval URL for a request token pair.
	pub fn authorize_url(&self, request: &RequestTokenPair) -> Url {
		self.descriptor.authorize_url(request.token.as_str())
	}

	/// Runs [`Broker::request_token`] and pairs the result with its approval URL.
	pub async fn start_authorization(
		&self,
		credential: &AppCredential,
		callback: &Callback,
	) -> Result<PendingAuthorization> {
		let request = self.request_token(credential, callback).await?;
		let authorize_url = self.authorize_url(&request);

		Ok(PendingAuthorization { request, authorize_url })
	}
}
