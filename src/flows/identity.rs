//! Third leg: resolve who authenticated, then look up their avatar on a best-effort basis.
//!
//! Both calls are signed with `consumer_secret&access_secret` and carry the access token.
//! A failing identity call fails the step; a failing profile call only degrades the
//! avatar to [`Ignored`].

// crates.io
use oauth2::http::Method;
use serde::{Deserializer, de::DeserializeOwned};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{
		AccessTokenPair, AppCredential, AvatarLookup, AvatarUrl, Identity, Ignored, Username,
	},
	error::{ConfigError, MalformedError},
	flows::Broker,
	http::HandshakeHttpClient,
	oauth1::OAuthParams,
	obs::{self, HandshakeStep, StepOutcome, StepSpan},
	transport::TransportErrorMapper,
};

const USERNAME_FIELD: &str = "username";

#[derive(Debug, Deserialize)]
struct IdentityDocument {
	#[serde(default)]
	username: Option<String>,
	#[serde(default, deserialize_with = "lenient_id")]
	id: Option<u64>,
}

// The numeric id is informational; anything but an unsigned integer reads as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(Value::as_u64))
}

impl<C, M> Broker<C, M>
where
	C: ?Sized + HandshakeHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Resolves the authenticated username and, best-effort, the avatar URL.
	///
	/// Only the identity call can fail this step. The profile lookup runs afterwards
	/// and any of its failures leave [`Identity::avatar`] as [`Ignored`].
	pub async fn resolve_identity(
		&self,
		credential: &AppCredential,
		access: &AccessTokenPair,
	) -> Result<Identity> {
		const STEP: HandshakeStep = HandshakeStep::Identity;

		let span = StepSpan::new(STEP, "resolve_identity");

		obs::record_step_outcome(STEP, StepOutcome::Attempt);

		let result: Result<(Username, Option<u64>)> = span
			.instrument(async move {
				let params = self.access_params(credential, access);
				let response = self
					.send(STEP, Method::GET, &self.descriptor.endpoints.identity, &params)
					.await?
					.into_success(STEP)?;
				let document = parse_json::<IdentityDocument>(&response.body)
					.map_err(|source| Error::malformed(STEP, response.text(), source))?;
				let username = document
					.username
					.ok_or(MalformedError::MissingField { field: USERNAME_FIELD })
					.and_then(|raw| {
						Username::new(raw).map_err(|source| MalformedError::InvalidField {
							field: USERNAME_FIELD,
							source,
						})
					})
					.map_err(|source| Error::malformed(STEP, response.text(), source))?;

				Ok((username, document.id))
			})
			.await;

		obs::record_step_result(STEP, &result);

		let (username, user_id) = result?;
		let avatar = self.fetch_avatar(credential, access, &username).await;

		Ok(Identity { username, user_id, avatar })
	}

	/// Looks up the avatar URL on the user's profile; never fails.
	pub async fn fetch_avatar(
		&self,
		credential: &AppCredential,
		access: &AccessTokenPair,
		username: &Username,
	) -> AvatarLookup {
		const STEP: HandshakeStep = HandshakeStep::Profile;

		let span = StepSpan::new(STEP, "fetch_avatar");

		obs::record_step_outcome(STEP, StepOutcome::Attempt);

		let result = span.instrument(self.lookup_avatar(credential, access, username)).await;

		match result {
			Ok(Some(url)) => {
				obs::record_step_outcome(STEP, StepOutcome::Success);

				Ok(url)
			},
			Ok(None) => {
				obs::note_degraded(STEP, &format!("`{}` is absent or empty", self.avatar_field()));
				obs::record_step_outcome(STEP, StepOutcome::Degraded);

				Err(Ignored)
			},
			Err(e) => {
				obs::note_degraded(STEP, &e);
				obs::record_step_outcome(STEP, StepOutcome::Degraded);

				Err(Ignored)
			},
		}
	}

	async fn lookup_avatar(
		&self,
		credential: &AppCredential,
		access: &AccessTokenPair,
		username: &Username,
	) -> Result<Option<AvatarUrl>> {
		const STEP: HandshakeStep = HandshakeStep::Profile;

		let url =
			self.descriptor.profile_url(username.as_str()).ok_or(ConfigError::ProfileEndpoint)?;
		let params = self.access_params(credential, access);
		let response = self.send(STEP, Method::GET, &url, &params).await?.into_success(STEP)?;
		let profile = parse_json::<Value>(&response.body)
			.map_err(|source| Error::malformed(STEP, response.text(), source))?;

		Ok(profile
			.get(self.avatar_field())
			.and_then(Value::as_str)
			.and_then(AvatarUrl::new))
	}

	fn access_params(&self, credential: &AppCredential, access: &AccessTokenPair) -> OAuthParams {
		self.signed_params(credential, Some(&access.token_secret)).with_token(&access.access_token)
	}

	fn avatar_field(&self) -> &str {
		&self.descriptor.quirks.avatar_field
	}
}

fn parse_json<T>(body: &[u8]) -> Result<T, MalformedError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	Ok(serde_path_to_error::deserialize(&mut deserializer)?)
}
