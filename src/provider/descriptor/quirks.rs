// self
use crate::_prelude::*;

/// Provider-specific quirks that influence how steps behave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Treat a request-token response without `oauth_callback_confirmed=true` as malformed.
	pub require_callback_confirmed: bool,
	/// JSON field on the profile document that holds the avatar URL.
	pub avatar_field: String,
	/// `Accept` header sent with every request.
	pub accept: String,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self {
			require_callback_confirmed: false,
			avatar_field: "avatar_url".into(),
			accept: "application/json".into(),
		}
	}
}
