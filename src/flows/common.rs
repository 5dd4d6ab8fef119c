//! Shared request plumbing for handshake steps (signing, dispatch, status checks).

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{AppCredential, TokenSecret},
	error::ConfigError,
	flows::Broker,
	http::{self, HandshakeHttpClient, ResponseMetadataSlot},
	oauth1::{self, OAuthParams},
	obs::HandshakeStep,
	transport::TransportErrorMapper,
};

/// Content type of token endpoint requests.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Status and body of a provider response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes; empty when a failed response body could not be read.
	pub body: Vec<u8>,
	/// Retry-After hint, if supplied.
	pub retry_after: Option<Duration>,
}
impl ProviderResponse {
	/// Body decoded as (lossy) UTF-8 text.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Returns the response when the status is 2xx, otherwise a protocol error.
	pub fn into_success(self, step: HandshakeStep) -> Result<Self> {
		if (200..300).contains(&self.status) {
			Ok(self)
		} else {
			Err(Error::Protocol {
				step,
				status: self.status,
				body: self.text(),
				retry_after: self.retry_after,
			})
		}
	}
}

impl<C, M> Broker<C, M>
where
	C: ?Sized + HandshakeHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Seeds a parameter set with a fresh nonce and the current timestamp.
	pub(crate) fn signed_params(
		&self,
		credential: &AppCredential,
		token_secret: Option<&TokenSecret>,
	) -> OAuthParams {
		OAuthParams::signed(
			credential,
			token_secret,
			self.nonce_generator.generate_nonce(),
			oauth1::unix_timestamp(),
		)
	}

	/// Sends one signed request and returns whatever status the provider answered with.
	pub(crate) async fn send(
		&self,
		step: HandshakeStep,
		method: Method,
		url: &Url,
		params: &OAuthParams,
	) -> Result<ProviderResponse> {
		let descriptor = &self.descriptor;
		let request =
			build_request(method, url, params, &descriptor.user_agent, &descriptor.quirks.accept)?;
		let slot = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(slot.clone());
		let response = handle.call(request).await.map_err(|err| {
			self.transport_mapper.map_transport_error(step, slot.take().as_ref(), err)
		})?;
		let retry_after = http::parse_retry_after(response.headers());

		Ok(ProviderResponse {
			status: response.status().as_u16(),
			body: response.into_body(),
			retry_after,
		})
	}
}

/// Builds the HTTP request for a step; POSTs carry the form content type and no body.
pub fn build_request(
	method: Method,
	url: &Url,
	params: &OAuthParams,
	user_agent: &str,
	accept: &str,
) -> Result<HttpRequest> {
	let mut builder = Request::builder()
		.method(method.clone())
		.uri(url.as_str())
		.header(AUTHORIZATION, params.to_header_value())
		.header(USER_AGENT, user_agent)
		.header(ACCEPT, accept);

	if method == Method::POST {
		builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
	}

	builder.body(Vec::new()).map_err(|e| ConfigError::from(e).into())
}
