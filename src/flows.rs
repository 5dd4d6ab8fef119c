//! Handshake steps and the state machine that sequences them.

pub mod access_token;
pub mod common;
pub mod identity;
pub mod request_token;
pub mod session;

pub use request_token::PendingAuthorization;
pub use session::*;

// self
use crate::{
	_prelude::*,
	http::HandshakeHttpClient,
	oauth1::{NonceGenerator, OsNonceGenerator},
	provider::ProviderDescriptor,
	transport::TransportErrorMapper,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, transport::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport stack.
pub type ReqwestBroker = Broker<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Executes OAuth 1.0a handshake steps against a single provider descriptor.
///
/// The broker owns only immutable capabilities (transport, error mapper, descriptor,
/// nonce source). Every per-user value (credential, token pairs, verifier) is passed to
/// the step methods explicitly, so one broker can serve any number of concurrent
/// handshakes and cloning it is cheap.
pub struct Broker<C, M>
where
	C: ?Sized + HandshakeHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Provider descriptor that defines endpoints and quirks.
	pub descriptor: ProviderDescriptor,
	/// Source of per-request nonces.
	pub nonce_generator: Arc<dyn NonceGenerator>,
}
impl<C, M> Broker<C, M>
where
	C: ?Sized + HandshakeHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a broker that reuses the caller-provided transport + mapper pair.
	///
	/// Descriptors built through [`ProviderDescriptor::builder`] are already validated;
	/// call [`ProviderDescriptor::validate`] first when loading one from configuration.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			descriptor,
			nonce_generator: Arc::new(OsNonceGenerator),
		}
	}

	/// Replaces the nonce source (deterministic generators are handy in tests).
	pub fn with_nonce_generator(mut self, generator: Arc<dyn NonceGenerator>) -> Self {
		self.nonce_generator = generator;

		self
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a broker with its own reqwest transport using the default timeout.
	pub fn new(descriptor: ProviderDescriptor) -> Result<Self> {
		Ok(Self::with_http_client(
			descriptor,
			ReqwestHttpClient::new()?,
			Arc::new(ReqwestTransportErrorMapper),
		))
	}
}
impl<C, M> Clone for Broker<C, M>
where
	C: ?Sized + HandshakeHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			transport_mapper: Arc::clone(&self.transport_mapper),
			descriptor: self.descriptor.clone(),
			nonce_generator: Arc::clone(&self.nonce_generator),
		}
	}
}
impl<C, M> Debug for Broker<C, M>
where
	C: ?Sized + HandshakeHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker").field("descriptor", &self.descriptor).finish()
	}
}
