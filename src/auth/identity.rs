//! Identity resolved at the end of a successful handshake.

// self
use crate::{_prelude::*, auth::Username};

/// Outcome of the best-effort avatar lookup.
///
/// The lookup either yields a URL or is [`Ignored`]; an ignored lookup never fails
/// identity resolution.
pub type AvatarLookup = Result<AvatarUrl, Ignored>;

/// Avatar image URL reported by the provider profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarUrl(String);
impl AvatarUrl {
	/// Wraps a non-empty avatar URL; empty values count as absent.
	pub fn new(value: impl Into<String>) -> Option<Self> {
		let value = value.into();

		if value.is_empty() { None } else { Some(Self(value)) }
	}

	/// Returns the URL string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for AvatarUrl {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Marker for an avatar lookup whose failure was absorbed.
///
/// Transport failures, non-success statuses, unreadable bodies, and missing fields all
/// collapse into this single value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Avatar lookup failed and was ignored.")]
pub struct Ignored;

/// Authenticated account resolved with the access token pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
	/// Provider handle of the authenticated user.
	pub username: Username,
	/// Numeric account identifier, when the identity endpoint reports one.
	pub user_id: Option<u64>,
	/// Avatar lookup outcome.
	pub avatar: AvatarLookup,
}
impl Identity {
	/// Avatar URL, or `""` when the lookup was ignored.
	pub fn avatar_url(&self) -> &str {
		match &self.avatar {
			Ok(url) => url.as_str(),
			Err(Ignored) => "",
		}
	}
}
