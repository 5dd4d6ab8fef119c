//! Handshake error taxonomy shared by every step.

// self
use crate::{_prelude::*, auth::IdentifierError, http::ResponseMetadata, obs::HandshakeStep};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical handshake error exposed by public APIs.
///
/// Every variant surfaces to the caller unchanged; the crate never retries.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or usage problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure or timeout before a usable response arrived.
	#[error("The {step} request failed in transit.")]
	Network {
		/// Step whose request failed.
		step: HandshakeStep,
		/// Last status seen before the failure, when the status line had arrived.
		status: Option<u16>,
		/// Transport classification.
		#[source]
		source: TransportError,
	},

	/// Endpoint answered with a non-success status.
	#[error("The {step} endpoint responded with HTTP {status}.")]
	Protocol {
		/// Step whose request was rejected.
		step: HandshakeStep,
		/// HTTP status code.
		status: u16,
		/// Response body text; empty when the body could not be read.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Endpoint answered successfully but the body lacks required data.
	#[error("The {step} endpoint returned a malformed response.")]
	MalformedResponse {
		/// Step whose response could not be used.
		step: HandshakeStep,
		/// Raw response body kept for diagnosis.
		body: String,
		/// What exactly was wrong with the body.
		#[source]
		source: MalformedError,
	},
}
impl Error {
	/// Coarse classification used by the handshake state machine.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::Config(_) => ErrorKind::Config,
			Error::Network { .. } => ErrorKind::Network,
			Error::Protocol { .. } => ErrorKind::Protocol,
			Error::MalformedResponse { .. } => ErrorKind::MalformedResponse,
		}
	}

	/// Step that produced the error; `None` for local configuration failures.
	pub fn step(&self) -> Option<HandshakeStep> {
		match self {
			Error::Network { step, .. }
			| Error::Protocol { step, .. }
			| Error::MalformedResponse { step, .. } => Some(*step),
			Error::Config(_) => None,
		}
	}

	/// HTTP status carried by a [`Error::Protocol`] failure, or the status line a
	/// [`Error::Network`] failure got past.
	pub fn status(&self) -> Option<u16> {
		match self {
			Error::Protocol { status, .. } => Some(*status),
			Error::Network { status, .. } => *status,
			_ => None,
		}
	}

	/// Attaches a transport failure to the step that issued the request.
	pub fn network(
		step: HandshakeStep,
		metadata: Option<&ResponseMetadata>,
		source: TransportError,
	) -> Self {
		Self::Network { step, status: metadata.and_then(|meta| meta.status), source }
	}

	pub(crate) fn malformed(
		step: HandshakeStep,
		body: impl Into<String>,
		source: impl Into<MalformedError>,
	) -> Self {
		Self::MalformedResponse { step, body: body.into(), source: source.into() }
	}
}

/// Payload-free error classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	/// See [`Error::Config`].
	Config,
	/// See [`Error::Network`].
	Network,
	/// See [`Error::Protocol`].
	Protocol,
	/// See [`Error::MalformedResponse`].
	MalformedResponse,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Config => "config",
			ErrorKind::Network => "network",
			ErrorKind::Protocol => "protocol",
			ErrorKind::MalformedResponse => "malformed_response",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Reasons a successful response could not be used.
#[derive(Debug, ThisError)]
pub enum MalformedError {
	/// A required field is absent.
	#[error("Response is missing the `{field}` field.")]
	MissingField {
		/// Protocol field name.
		field: &'static str,
	},
	/// A field is present but fails validation.
	#[error("Response field `{field}` is invalid.")]
	InvalidField {
		/// Protocol field name.
		field: &'static str,
		/// Validation failure.
		#[source]
		source: IdentifierError,
	},
	/// Body is not the JSON document the endpoint promises.
	#[error("Response body is not valid JSON.")]
	Json(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// Provider did not confirm the callback although the descriptor requires it.
	#[error("Provider did not confirm the callback URL.")]
	CallbackNotConfirmed,
}

/// Configuration and usage failures raised locally.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Profile URL could not be derived from the descriptor.
	#[error("The profile endpoint cannot carry a username path segment.")]
	ProfileEndpoint,
	/// The callback redirect belongs to another request token.
	#[error("Callback token does not match the pending request token.")]
	CallbackTokenMismatch,
	/// The callback redirect carries no verifier.
	#[error("Callback is missing the oauth_verifier parameter.")]
	MissingVerifier,
	/// The callback redirect carries a malformed value.
	#[error("Callback parameter is invalid.")]
	InvalidCallback(#[from] IdentifierError),
	/// The handshake cannot perform the requested action in its current phase.
	#[error("Cannot {action} while the handshake is {phase}.")]
	InvalidTransition {
		/// Phase label at the time of the call.
		phase: &'static str,
		/// Attempted action.
		action: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, timeout, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request exceeded the transport timeout.
	#[error("Request to the provider timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport failure reported only as text.
	#[error("HTTP client error occurred while calling the provider: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
