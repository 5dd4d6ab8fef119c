//! Explicit handshake state machine layered over the stateless [`Broker`] steps.
//!
//! A [`Handshake`] tracks one login attempt. The broker stays shareable; each caller
//! owns its own `Handshake` and passes the broker in on every transition.

// std
use std::mem;
// self
use crate::{
	_prelude::*,
	auth::{AccessTokenPair, AppCredential, Callback, Identity, Verifier},
	error::{ConfigError, ErrorKind},
	flows::{Broker, PendingAuthorization},
	http::HandshakeHttpClient,
	obs::HandshakeStep,
	transport::TransportErrorMapper,
};

/// Payload-free label for a [`HandshakeState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakePhase {
	/// Nothing started yet.
	Idle,
	/// Request-token call in flight.
	RequestingToken,
	/// Waiting for the user to approve on the provider site.
	AwaitingAuthorization,
	/// Access-token call in flight.
	ExchangingToken,
	/// Access token issued; identity not yet resolved.
	ResolvingIdentity,
	/// Handshake finished.
	Authenticated,
	/// A step failed.
	Failed,
}
impl HandshakePhase {
	/// Returns a human-readable label used in transition errors.
	pub const fn as_str(self) -> &'static str {
		match self {
			HandshakePhase::Idle => "idle",
			HandshakePhase::RequestingToken => "requesting a token",
			HandshakePhase::AwaitingAuthorization => "awaiting authorization",
			HandshakePhase::ExchangingToken => "exchanging the token",
			HandshakePhase::ResolvingIdentity => "resolving the identity",
			HandshakePhase::Authenticated => "authenticated",
			HandshakePhase::Failed => "failed",
		}
	}
}
impl Display for HandshakePhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Result of a completed handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authenticated {
	/// Durable access token pair; persisting it is the caller's job.
	pub access: AccessTokenPair,
	/// Resolved identity.
	pub identity: Identity,
}

/// Summary of a failed step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandshakeFailure {
	/// Step that failed.
	pub step: HandshakeStep,
	/// Error classification.
	pub kind: ErrorKind,
	/// Access pair issued before the failure, kept so identity resolution can be retried.
	pub access: Option<AccessTokenPair>,
}

/// Where a handshake currently stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HandshakeState {
	/// Nothing started yet.
	#[default]
	Idle,
	/// Request-token call in flight (or abandoned mid-flight).
	RequestingToken,
	/// Request token issued; waiting for the verifier.
	AwaitingAuthorization(PendingAuthorization),
	/// Access-token call in flight (or abandoned mid-flight).
	ExchangingToken,
	/// Access token issued; identity resolution in flight or pending a retry.
	ResolvingIdentity(AccessTokenPair),
	/// Handshake finished.
	Authenticated(Authenticated),
	/// A step failed.
	Failed(HandshakeFailure),
}
impl HandshakeState {
	/// Payload-free label for this state.
	pub fn phase(&self) -> HandshakePhase {
		match self {
			HandshakeState::Idle => HandshakePhase::Idle,
			HandshakeState::RequestingToken => HandshakePhase::RequestingToken,
			HandshakeState::AwaitingAuthorization(_) => HandshakePhase::AwaitingAuthorization,
			HandshakeState::ExchangingToken => HandshakePhase::ExchangingToken,
			HandshakeState::ResolvingIdentity(_) => HandshakePhase::ResolvingIdentity,
			HandshakeState::Authenticated(_) => HandshakePhase::Authenticated,
			HandshakeState::Failed(_) => HandshakePhase::Failed,
		}
	}
}

/// One login attempt driven step by step.
#[derive(Clone, Debug, Default)]
pub struct Handshake {
	state: HandshakeState,
}
impl Handshake {
	/// Creates an idle handshake.
	pub fn new() -> Self {
		Self::default()
	}

	/// Rebuilds a handshake that is waiting for the verifier of `pending`.
	pub fn resume(pending: PendingAuthorization) -> Self {
		Self { state: HandshakeState::AwaitingAuthorization(pending) }
	}

	/// Current state.
	pub fn state(&self) -> &HandshakeState {
		&self.state
	}

	/// Current phase label.
	pub fn phase(&self) -> HandshakePhase {
		self.state.phase()
	}

	/// Consumes the handshake, returning its state.
	pub fn into_state(self) -> HandshakeState {
		self.state
	}

	/// Starts (or restarts) the handshake by obtaining a request token.
	///
	/// Allowed from any state; a previous attempt is simply abandoned.
	pub async fn request_token<C, M>(
		&mut self,
		broker: &Broker<C, M>,
		credential: &AppCredential,
		callback: &Callback,
	) -> Result<PendingAuthorization>
	where
		C: ?Sized + HandshakeHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		self.state = HandshakeState::RequestingToken;

		match broker.start_authorization(credential, callback).await {
			Ok(pending) => {
				self.state = HandshakeState::AwaitingAuthorization(pending.clone());

				Ok(pending)
			},
			Err(e) => Err(self.fail(HandshakeStep::RequestToken, e, None)),
		}
	}

	/// Redeems the verifier and resolves the identity.
	///
	/// Only allowed while awaiting authorization.
	pub async fn complete<C, M>(
		&mut self,
		broker: &Broker<C, M>,
		credential: &AppCredential,
		verifier: &Verifier,
	) -> Result<Authenticated>
	where
		C: ?Sized + HandshakeHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let pending = match mem::take(&mut self.state) {
			HandshakeState::AwaitingAuthorization(pending) => pending,
			other => {
				let phase = other.phase();

				self.state = other;

				return Err(ConfigError::InvalidTransition {
					phase: phase.as_str(),
					action: "exchange the verifier",
				}
				.into());
			},
		};

		self.state = HandshakeState::ExchangingToken;

		let access = match broker.access_token(credential, &pending.request, verifier).await {
			Ok(access) => access,
			Err(e) => return Err(self.fail(HandshakeStep::AccessToken, e, None)),
		};

		self.resolve(broker, credential, access).await
	}

	/// Re-runs identity resolution with the access pair already issued.
	///
	/// Allowed while resolving the identity or after a failure that kept an access pair.
	pub async fn retry_identity<C, M>(
		&mut self,
		broker: &Broker<C, M>,
		credential: &AppCredential,
	) -> Result<Authenticated>
	where
		C: ?Sized + HandshakeHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		let access = match mem::take(&mut self.state) {
			HandshakeState::ResolvingIdentity(access)
			| HandshakeState::Failed(HandshakeFailure { access: Some(access), .. }) => access,
			other => {
				let phase = other.phase();

				self.state = other;

				return Err(ConfigError::InvalidTransition {
					phase: phase.as_str(),
					action: "retry identity resolution",
				}
				.into());
			},
		};

		self.resolve(broker, credential, access).await
	}

	async fn resolve<C, M>(
		&mut self,
		broker: &Broker<C, M>,
		credential: &AppCredential,
		access: AccessTokenPair,
	) -> Result<Authenticated>
	where
		C: ?Sized + HandshakeHttpClient,
		M: ?Sized + TransportErrorMapper<C::TransportError>,
	{
		self.state = HandshakeState::ResolvingIdentity(access.clone());

		match broker.resolve_identity(credential, &access).await {
			Ok(identity) => {
				let authenticated = Authenticated { access, identity };

				self.state = HandshakeState::Authenticated(authenticated.clone());

				Ok(authenticated)
			},
			Err(e) => Err(self.fail(HandshakeStep::Identity, e, Some(access))),
		}
	}

	fn fail(&mut self, step: HandshakeStep, error: Error, access: Option<AccessTokenPair>) -> Error {
		self.state = HandshakeState::Failed(HandshakeFailure {
			step: error.step().unwrap_or(step),
			kind: error.kind(),
			access,
		});

		error
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{OAuthToken, RequestTokenPair, TokenSecret},
		flows::ReqwestBroker,
		provider::ProviderDescriptor,
	};

	fn broker() -> ReqwestBroker {
		let descriptor =
			ProviderDescriptor::discogs("Fixture/1.0").expect("Discogs preset should build.");

		Broker::new(descriptor).expect("Broker should build.")
	}

	fn credential() -> AppCredential {
		AppCredential::new("key", "secret").expect("Credential fixture should be valid.")
	}

	fn pending() -> PendingAuthorization {
		PendingAuthorization {
			request: RequestTokenPair {
				token: OAuthToken::new("req").expect("Token fixture should be valid."),
				secret: TokenSecret::new("req-secret"),
				callback_confirmed: true,
			},
			authorize_url: Url::parse("https://www.discogs.com/oauth/authorize?oauth_token=req")
				.expect("Authorize URL should parse."),
		}
	}

	#[test]
	fn resume_restores_awaiting_state() {
		let handshake = Handshake::resume(pending());

		assert_eq!(handshake.phase(), HandshakePhase::AwaitingAuthorization);
		assert_eq!(handshake.into_state(), HandshakeState::AwaitingAuthorization(pending()));
		assert_eq!(Handshake::new().phase(), HandshakePhase::Idle);
	}

	#[tokio::test]
	async fn complete_requires_awaiting_authorization() {
		let mut handshake = Handshake::new();
		let verifier = Verifier::new("v").expect("Verifier fixture should be valid.");
		let err = handshake
			.complete(&broker(), &credential(), &verifier)
			.await
			.expect_err("Idle handshakes cannot exchange a verifier.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::InvalidTransition { phase: "idle", .. })
		));
		assert_eq!(handshake.phase(), HandshakePhase::Idle);
	}

	#[tokio::test]
	async fn retry_identity_requires_an_access_pair() {
		let mut handshake = Handshake::resume(pending());
		let err = handshake
			.retry_identity(&broker(), &credential())
			.await
			.expect_err("No access pair has been issued yet.");

		assert_eq!(
			err.to_string(),
			"Cannot retry identity resolution while the handshake is awaiting authorization."
		);
		assert_eq!(handshake.phase(), HandshakePhase::AwaitingAuthorization);
	}
}
