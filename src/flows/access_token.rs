//! Second leg: trade an approved request token for an access token.

// crates.io
use oauth2::http::Method;
// self
use crate::{
	_prelude::*,
	auth::{AccessTokenPair, AppCredential, RequestTokenPair, Verifier},
	flows::Broker,
	http::HandshakeHttpClient,
	oauth1::TokenResponse,
	obs::{self, HandshakeStep, StepOutcome, StepSpan},
	transport::TransportErrorMapper,
};

impl<C, M> Broker<C, M>
where
	C: ?Sized + HandshakeHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Exchanges `request` plus the user's `verifier` for an access token pair.
	///
	/// The request is signed with `consumer_secret&request_secret`. A verifier that does
	/// not belong to `request` is not checked locally; the provider rejects it and the
	/// rejection surfaces as [`Error::Protocol`].
	pub async fn access_token(
		&self,
		credential: &AppCredential,
		request: &RequestTokenPair,
		verifier: &Verifier,
	) -> Result<AccessTokenPair> {
		const STEP: HandshakeStep = HandshakeStep::AccessToken;

		let span = StepSpan::new(STEP, "access_token");

		obs::record_step_outcome(STEP, StepOutcome::Attempt);

		let result = span
			.instrument(async move {
				let params = self
					.signed_params(credential, Some(&request.secret))
					.with_token(&request.token)
					.with_verifier(verifier);
				let response = self
					.send(STEP, Method::POST, &self.descriptor.endpoints.access_token, &params)
					.await?
					.into_success(STEP)?;
				let parsed = TokenResponse::parse(&response.body)
					.map_err(|source| Error::malformed(STEP, response.text(), source))?;

				Ok(AccessTokenPair { access_token: parsed.token, token_secret: parsed.secret })
			})
			.await;

		obs::record_step_result(STEP, &result);

		result
	}
}
