// std
use std::net::IpAddr;
// crates.io
use url::Host;
// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	provider::{ProviderDescriptor, ProviderEndpoints, ProviderQuirks},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// A required endpoint was never configured.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTPS (loopback hosts excepted).
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The profile endpoint cannot take a username path segment.
	#[error("The profile endpoint cannot be extended with a username: {url}.")]
	OpaqueProfileEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A built-in endpoint failed to parse.
	#[error("Endpoint URL is invalid: {url}.")]
	InvalidUrl {
		/// Raw URL text.
		url: String,
	},
	/// A built-in identifier failed validation.
	#[error("Descriptor identifier is invalid.")]
	InvalidId,
	/// Providers reject anonymous clients, so the user agent is mandatory.
	#[error("User agent must be non-empty, visible ASCII text.")]
	InvalidUserAgent,
	/// The Accept header value must be sendable as an HTTP header.
	#[error("Accept header must be non-empty, visible ASCII text.")]
	InvalidAccept,
	/// The avatar field name must be usable as a JSON key.
	#[error("Avatar field name must be a non-empty, printable string.")]
	InvalidAvatarField,
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Request-token endpoint.
	pub request_token_endpoint: Option<Url>,
	/// User approval page.
	pub authorize_endpoint: Option<Url>,
	/// Access-token endpoint.
	pub access_token_endpoint: Option<Url>,
	/// Identity endpoint.
	pub identity_endpoint: Option<Url>,
	/// Profile endpoint base.
	pub profile_endpoint: Option<Url>,
	/// Identifying user agent.
	pub user_agent: Option<String>,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			request_token_endpoint: None,
			authorize_endpoint: None,
			access_token_endpoint: None,
			identity_endpoint: None,
			profile_endpoint: None,
			user_agent: None,
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the request-token endpoint.
	pub fn request_token_endpoint(mut self, url: Url) -> Self {
		self.request_token_endpoint = Some(url);

		self
	}

	/// Sets the user approval page.
	pub fn authorize_endpoint(mut self, url: Url) -> Self {
		self.authorize_endpoint = Some(url);

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token_endpoint = Some(url);

		self
	}

	/// Sets the identity endpoint.
	pub fn identity_endpoint(mut self, url: Url) -> Self {
		self.identity_endpoint = Some(url);

		self
	}

	/// Sets the profile endpoint base.
	pub fn profile_endpoint(mut self, url: Url) -> Self {
		self.profile_endpoint = Some(url);

		self
	}

	/// Sets the identifying user agent.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let endpoints = ProviderEndpoints {
			request_token: require("request_token", self.request_token_endpoint)?,
			authorize: require("authorize", self.authorize_endpoint)?,
			access_token: require("access_token", self.access_token_endpoint)?,
			identity: require("identity", self.identity_endpoint)?,
			profile: require("profile", self.profile_endpoint)?,
		};
		let descriptor = ProviderDescriptor {
			id: self.id,
			endpoints,
			user_agent: self.user_agent.unwrap_or_default(),
			quirks: self.quirks,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	pub fn validate(&self) -> Result<(), ProviderDescriptorError> {
		let endpoints = &self.endpoints;

		validate_endpoint("request_token", &endpoints.request_token)?;
		validate_endpoint("authorize", &endpoints.authorize)?;
		validate_endpoint("access_token", &endpoints.access_token)?;
		validate_endpoint("identity", &endpoints.identity)?;
		validate_endpoint("profile", &endpoints.profile)?;

		if endpoints.profile.cannot_be_a_base() {
			return Err(ProviderDescriptorError::OpaqueProfileEndpoint {
				url: endpoints.profile.to_string(),
			});
		}
		if !is_header_text(&self.user_agent) {
			return Err(ProviderDescriptorError::InvalidUserAgent);
		}
		if !is_header_text(&self.quirks.accept) {
			return Err(ProviderDescriptorError::InvalidAccept);
		}
		if self.quirks.avatar_field.trim().is_empty()
			|| self.quirks.avatar_field.chars().any(char::is_control)
		{
			return Err(ProviderDescriptorError::InvalidAvatarField);
		}

		Ok(())
	}
}

fn require(endpoint: &'static str, url: Option<Url>) -> Result<Url, ProviderDescriptorError> {
	url.ok_or(ProviderDescriptorError::MissingEndpoint { endpoint })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() == "https" || (url.scheme() == "http" && is_loopback(url)) {
		Ok(())
	} else {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_header_text(value: &str) -> bool {
	!value.trim().is_empty() && value.bytes().all(|b| b == b' ' || b.is_ascii_graphic())
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse descriptor fixture URL.")
	}

	fn complete(base: &str) -> ProviderDescriptorBuilder {
		ProviderDescriptor::builder(ProviderId::new("fixture").expect("Id should be valid."))
			.request_token_endpoint(url(&format!("{base}/oauth/request_token")))
			.authorize_endpoint(url(&format!("{base}/oauth/authorize")))
			.access_token_endpoint(url(&format!("{base}/oauth/access_token")))
			.identity_endpoint(url(&format!("{base}/oauth/identity")))
			.profile_endpoint(url(&format!("{base}/users/")))
			.user_agent("Fixture/1.0")
	}

	#[test]
	fn rejects_plain_http_for_remote_hosts() {
		let err = complete("http://api.example.com")
			.build()
			.expect_err("Remote plain-HTTP endpoints must be rejected.");

		assert!(matches!(
			err,
			ProviderDescriptorError::InsecureEndpoint { endpoint: "request_token", .. }
		));
	}

	#[test]
	fn allows_plain_http_on_loopback() {
		for base in ["http://127.0.0.1:8080", "http://localhost:9000", "http://[::1]:7000"] {
			complete(base).build().expect("Loopback endpoints should be accepted.");
		}
	}

	#[test]
	fn reports_missing_endpoint_and_user_agent() {
		let err = ProviderDescriptor::builder(ProviderId::new("empty").expect("Id should be valid."))
			.build()
			.expect_err("Endpoints are required.");

		assert_eq!(err, ProviderDescriptorError::MissingEndpoint { endpoint: "request_token" });

		let mut builder = complete("https://api.example.com");

		builder.user_agent = Some("  ".into());

		assert_eq!(builder.build(), Err(ProviderDescriptorError::InvalidUserAgent));
	}

	#[test]
	fn header_values_must_be_visible_ascii() {
		for user_agent in ["Crät/1.0", "Fixture/1.0\r\nX-Injected: 1", "Fixture\t1.0"] {
			let mut builder = complete("https://api.example.com");

			builder.user_agent = Some(user_agent.into());

			assert_eq!(builder.build(), Err(ProviderDescriptorError::InvalidUserAgent));
		}

		let quirks = ProviderQuirks { accept: "application/jsön".into(), ..ProviderQuirks::default() };

		assert_eq!(
			complete("https://api.example.com").quirks(quirks).build(),
			Err(ProviderDescriptorError::InvalidAccept)
		);

		complete("https://api.example.com")
			.user_agent("CrateDigger/0.1 +https://crates.example.com")
			.build()
			.expect("Visible ASCII user agents should be accepted.");
	}

	#[test]
	fn rejects_empty_avatar_field() {
		let quirks = ProviderQuirks { avatar_field: String::new(), ..ProviderQuirks::default() };

		assert_eq!(
			complete("https://api.example.com").quirks(quirks).build(),
			Err(ProviderDescriptorError::InvalidAvatarField)
		);
	}
}
