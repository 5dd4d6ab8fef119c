//! Provider descriptor data structures and helpers shared by all steps.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// self
use crate::{_prelude::*, auth::ProviderId};

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Request-token endpoint (POST).
	pub request_token: Url,
	/// Page the user visits to approve the request token.
	pub authorize: Url,
	/// Access-token endpoint (POST).
	pub access_token: Url,
	/// Identity endpoint (GET) reporting the authenticated username.
	pub identity: Url,
	/// Base of the user-profile endpoint; the username is appended as a path segment.
	pub profile: Url,
}

/// Immutable provider descriptor consumed by the broker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Identifying `User-Agent` sent on every request.
	pub user_agent: String,
	/// Provider-specific quirks.
	#[serde(default)]
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Descriptor for the Discogs API.
	pub fn discogs(user_agent: impl Into<String>) -> Result<Self, ProviderDescriptorError> {
		let id = ProviderId::new("discogs").map_err(|_| ProviderDescriptorError::InvalidId)?;

		Self::builder(id)
			.request_token_endpoint(discogs_url("https://api.discogs.com/oauth/request_token")?)
			.authorize_endpoint(discogs_url("https://www.discogs.com/oauth/authorize")?)
			.access_token_endpoint(discogs_url("https://api.discogs.com/oauth/access_token")?)
			.identity_endpoint(discogs_url("https://api.discogs.com/oauth/identity")?)
			.profile_endpoint(discogs_url("https://api.discogs.com/users/")?)
			.user_agent(user_agent)
			.build()
	}

	/// Builds the approval URL for a request token.
	pub fn authorize_url(&self, request_token: &str) -> Url {
		let mut url = self.endpoints.authorize.clone();

		url.query_pairs_mut().append_pair("oauth_token", request_token);

		url
	}

	/// Builds the profile URL for `username`, or `None` when the base cannot take segments.
	pub fn profile_url(&self, username: &str) -> Option<Url> {
		let mut url = self.endpoints.profile.clone();

		url.path_segments_mut().ok()?.pop_if_empty().push(username);

		Some(url)
	}
}

fn discogs_url(raw: &str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(raw).map_err(|_| ProviderDescriptorError::InvalidUrl { url: raw.to_owned() })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn discogs() -> ProviderDescriptor {
		ProviderDescriptor::discogs("CrateDigger/1.0 +https://example.com")
			.expect("Discogs preset should build.")
	}

	#[test]
	fn discogs_preset_uses_https_endpoints() {
		let descriptor = discogs();

		assert_eq!(descriptor.id.as_str(), "discogs");
		assert_eq!(
			descriptor.endpoints.request_token.as_str(),
			"https://api.discogs.com/oauth/request_token"
		);
		assert_eq!(descriptor.quirks.avatar_field, "avatar_url");
	}

	#[test]
	fn authorize_url_carries_request_token() {
		let url = discogs().authorize_url("req token");

		assert_eq!(url.as_str(), "https://www.discogs.com/oauth/authorize?oauth_token=req+token");
	}

	#[test]
	fn profile_url_encodes_username_as_one_segment() {
		let descriptor = discogs();

		assert_eq!(
			descriptor.profile_url("crate-digger").map(String::from),
			Some("https://api.discogs.com/users/crate-digger".into())
		);
		assert_eq!(
			descriptor.profile_url("a/b?c").map(String::from),
			Some("https://api.discogs.com/users/a%2Fb%3Fc".into())
		);
	}

	#[test]
	fn descriptor_round_trips_through_json() {
		let descriptor = discogs();
		let json = serde_json::to_string(&descriptor).expect("Descriptor should serialize.");

		assert_eq!(
			serde_json::from_str::<ProviderDescriptor>(&json)
				.expect("Descriptor should deserialize."),
			descriptor
		);
	}
}
