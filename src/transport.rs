//! Classification of transport failures into the broker error taxonomy.

pub use oauth2;

// crates.io
use oauth2::HttpClientError;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	http::ResponseMetadata,
	obs::HandshakeStep,
};

/// Maps HTTP transport failures into broker [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a broker error.
	fn map_transport_error(
		&self,
		step: HandshakeStep,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		step: HandshakeStep,
		metadata: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(step, metadata, *inner),
			other => map_common_transport_error(step, metadata, other),
		}
	}
}

/// Maps the transport-independent [`HttpClientError`] variants.
///
/// Network failures are attributed to `step` and keep the status recorded in `metadata`.
/// Custom mappers can delegate here after handling their own `Reqwest(..)` payloads.
pub fn map_common_transport_error<E>(
	step: HandshakeStep,
	metadata: Option<&ResponseMetadata>,
	err: HttpClientError<E>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let transport = match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner),
		HttpClientError::Http(inner) => return ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner),
		HttpClientError::Other(message) => TransportError::Other { message },
		_ => TransportError::Other { message: "unknown transport failure".into() },
	};

	Error::network(step, metadata, transport)
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(
	step: HandshakeStep,
	metadata: Option<&ResponseMetadata>,
	err: ReqwestError,
) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	let transport =
		if err.is_timeout() { TransportError::timeout(err) } else { TransportError::network(err) };

	Error::network(step, metadata, transport)
}
