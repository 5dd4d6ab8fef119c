#![allow(dead_code)]

// std
use std::{
	collections::{BTreeMap, HashMap},
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	future::Future,
	pin::Pin,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use httpmock::MockServer;
use oauth1_broker::{
	auth::{AppCredential, OAuthToken, ProviderId, Verifier},
	error::Error,
	flows::Broker,
	http::{HandshakeHttpClient, ResponseMetadata, ResponseMetadataSlot},
	oauth1::NonceGenerator,
	obs::HandshakeStep,
	provider::ProviderDescriptor,
	transport::{
		TransportErrorMapper, map_common_transport_error,
		oauth2::{
			AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
			http::{
				Method, Response,
				header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, USER_AGENT},
			},
		},
	},
	url::Url,
};
use parking_lot::Mutex;
use percent_encoding::percent_decode_str;
use serde_json::json;

pub const USER_AGENT_VALUE: &str = "CrateDigger/1.0 +https://crates.example.com";

pub fn credential(key: &str, secret: &str) -> AppCredential {
	AppCredential::new(key, secret).expect("Credential fixture should be valid.")
}

/// Descriptor whose endpoints all live on `server`.
pub fn mock_descriptor(server: &MockServer) -> ProviderDescriptor {
	descriptor_with_profile(server, &server.url("/users/"))
}

/// Descriptor pointing at `server` except for the profile endpoint.
pub fn descriptor_with_profile(server: &MockServer, profile: &str) -> ProviderDescriptor {
	let url = |path: &str| Url::parse(&server.url(path)).expect("Mock endpoint should parse.");

	ProviderDescriptor::builder(ProviderId::new("mock").expect("Provider id should be valid."))
		.request_token_endpoint(url("/oauth/request_token"))
		.authorize_endpoint(url("/oauth/authorize"))
		.access_token_endpoint(url("/oauth/access_token"))
		.identity_endpoint(url("/oauth/identity"))
		.profile_endpoint(Url::parse(profile).expect("Profile endpoint should parse."))
		.user_agent(USER_AGENT_VALUE)
		.build()
		.expect("Mock descriptor should build.")
}

/// Descriptor for the in-process [`FakeProvider`].
pub fn fake_descriptor() -> ProviderDescriptor {
	let url = |path: &str| {
		Url::parse(&format!("https://provider.test{path}")).expect("Fake endpoint should parse.")
	};

	ProviderDescriptor::builder(ProviderId::new("fake").expect("Provider id should be valid."))
		.request_token_endpoint(url("/oauth/request_token"))
		.authorize_endpoint(url("/oauth/authorize"))
		.access_token_endpoint(url("/oauth/access_token"))
		.identity_endpoint(url("/oauth/identity"))
		.profile_endpoint(url("/users/"))
		.user_agent(USER_AGENT_VALUE)
		.build()
		.expect("Fake descriptor should build.")
}

/// Decodes an `OAuth k="v", ...` header back into its parameters.
pub fn parse_authorization(value: &str) -> BTreeMap<String, String> {
	let decode = |raw: &str| percent_decode_str(raw).decode_utf8_lossy().into_owned();

	value
		.strip_prefix("OAuth ")
		.unwrap_or(value)
		.split(", ")
		.filter_map(|pair| {
			let (key, value) = pair.split_once('=')?;

			Some((decode(key), decode(value.trim_matches('"'))))
		})
		.collect()
}

/// Nonce source yielding `nonce-0`, `nonce-1`, ...
#[derive(Debug, Default)]
pub struct SequenceNonceGenerator(AtomicUsize);
impl NonceGenerator for SequenceNonceGenerator {
	fn generate_nonce(&self) -> String {
		format!("nonce-{}", self.0.fetch_add(1, Ordering::SeqCst))
	}
}

#[derive(Debug)]
pub struct FakeTransportError;
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Connection refused.")
	}
}
impl StdError for FakeTransportError {}

/// Mapper delegating to the crate's common classification.
#[derive(Clone, Copy, Debug, Default)]
pub struct FakeMapper;
impl TransportErrorMapper<FakeTransportError> for FakeMapper {
	fn map_transport_error(
		&self,
		step: HandshakeStep,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<FakeTransportError>,
	) -> Error {
		map_common_transport_error(step, metadata, error)
	}
}

pub type FakeBroker = Broker<FakeProvider, FakeMapper>;

/// One request as observed by the [`FakeProvider`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub method: Method,
	pub path: String,
	pub content_type: Option<String>,
	pub user_agent: Option<String>,
	pub params: BTreeMap<String, String>,
}
impl RecordedRequest {
	pub fn param(&self, key: &str) -> &str {
		self.params.get(key).map(String::as_str).unwrap_or_default()
	}
}

struct PendingGrant {
	consumer_key: String,
	secret: String,
	verifier: String,
	username: Option<String>,
}

struct Grant {
	consumer_key: String,
	secret: String,
	username: String,
	user_id: u64,
}

#[derive(Default)]
struct ProviderState {
	apps: HashMap<String, String>,
	request_tokens: HashMap<String, PendingGrant>,
	access_tokens: HashMap<String, Grant>,
	requests: Vec<RecordedRequest>,
	issued: u64,
	identity_failures: u32,
	identity_unreachable: bool,
	profile_unreachable: bool,
}

enum Reply {
	Respond(u16, String),
	Unreachable,
}

/// In-process OAuth 1.0a provider that verifies PLAINTEXT signatures and verifiers.
#[derive(Clone, Default)]
pub struct FakeProvider {
	state: Arc<Mutex<ProviderState>>,
}
impl FakeProvider {
	pub fn with_app(self, key: &str, secret: &str) -> Self {
		self.state.lock().apps.insert(key.into(), secret.into());

		self
	}

	pub fn broker(&self) -> FakeBroker {
		Broker::with_http_client(fake_descriptor(), Arc::new(self.clone()), Arc::new(FakeMapper))
	}

	/// Simulates the user approving `token` as `username`; returns the issued verifier.
	pub fn approve(&self, token: &OAuthToken, username: &str) -> Verifier {
		let mut state = self.state.lock();
		let grant = state
			.request_tokens
			.get_mut(token.as_str())
			.expect("Approved request token should have been issued.");

		grant.username = Some(username.into());

		Verifier::new(&grant.verifier).expect("Issued verifier should be valid.")
	}

	/// Makes the next `count` identity calls answer HTTP 503.
	pub fn fail_identity(&self, count: u32) {
		self.state.lock().identity_failures = count;
	}

	/// Makes identity calls fail at the transport level.
	pub fn make_identity_unreachable(&self) {
		self.state.lock().identity_unreachable = true;
	}

	/// Makes profile calls fail at the transport level.
	pub fn make_profile_unreachable(&self) {
		self.state.lock().profile_unreachable = true;
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.state.lock().requests.clone()
	}

	fn respond(&self, request: &HttpRequest) -> Reply {
		let header = |name: HeaderName| {
			request.headers().get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
		};
		let params =
			header(AUTHORIZATION).map(|value| parse_authorization(&value)).unwrap_or_default();
		let path = request.uri().path().to_owned();
		let mut state = self.state.lock();

		state.requests.push(RecordedRequest {
			method: request.method().clone(),
			path: path.clone(),
			content_type: header(CONTENT_TYPE),
			user_agent: header(USER_AGENT),
			params: params.clone(),
		});

		let param = |key: &str| params.get(key).cloned().unwrap_or_default();
		let consumer_key = param("oauth_consumer_key");
		let Some(consumer_secret) = state.apps.get(&consumer_key).cloned() else {
			return Reply::Respond(401, "invalid consumer".into());
		};
		let signature = param("oauth_signature");

		if param("oauth_signature_method") != "PLAINTEXT" {
			return Reply::Respond(400, "unsupported signature method".into());
		}

		match path.as_str() {
			"/oauth/request_token" => {
				if signature != format!("{consumer_secret}&") {
					return Reply::Respond(401, "invalid signature".into());
				}

				state.issued += 1;

				let n = state.issued;
				let token = format!("req-{n}");
				let secret = format!("req-secret-{n}");

				state.request_tokens.insert(token.clone(), PendingGrant {
					consumer_key,
					secret: secret.clone(),
					verifier: format!("ver-{n}"),
					username: None,
				});

				Reply::Respond(
					200,
					format!(
						"oauth_token={token}&oauth_token_secret={secret}&oauth_callback_confirmed=true"
					),
				)
			},
			"/oauth/access_token" => {
				let token = param("oauth_token");
				let Some(grant) = state.request_tokens.get(&token) else {
					return Reply::Respond(401, "invalid request token".into());
				};

				if grant.consumer_key != consumer_key
					|| signature != format!("{consumer_secret}&{}", grant.secret)
				{
					return Reply::Respond(401, "invalid signature".into());
				}
				if grant.verifier != param("oauth_verifier") {
					return Reply::Respond(401, "invalid verifier".into());
				}

				let Some(username) = grant.username.clone() else {
					return Reply::Respond(401, "request token not approved".into());
				};

				state.request_tokens.remove(&token);
				state.issued += 1;

				let n = state.issued;
				let access = format!("acc-{n}");
				let secret = format!("acc-secret-{n}");

				state.access_tokens.insert(access.clone(), Grant {
					consumer_key,
					secret: secret.clone(),
					username,
					user_id: n,
				});

				Reply::Respond(200, format!("oauth_token={access}&oauth_token_secret={secret}"))
			},
			_ => {
				let Some(grant) = state.access_tokens.get(&param("oauth_token")) else {
					return Reply::Respond(401, "invalid access token".into());
				};

				if grant.consumer_key != consumer_key
					|| signature != format!("{consumer_secret}&{}", grant.secret)
				{
					return Reply::Respond(401, "invalid signature".into());
				}

				let (username, user_id) = (grant.username.clone(), grant.user_id);

				if path == "/oauth/identity" {
					if state.identity_unreachable {
						return Reply::Unreachable;
					}
					if state.identity_failures > 0 {
						state.identity_failures -= 1;

						return Reply::Respond(503, "try again later".into());
					}

					return Reply::Respond(
						200,
						json!({ "id": user_id, "username": username }).to_string(),
					);
				}

				match path.strip_prefix("/users/") {
					Some(_) if state.profile_unreachable => Reply::Unreachable,
					Some(name) if name == username => Reply::Respond(
						200,
						json!({
							"username": name,
							"avatar_url": format!("https://img.example.com/{name}.png"),
						})
						.to_string(),
					),
					Some(_) => Reply::Respond(403, "forbidden".into()),
					None => Reply::Respond(404, "not found".into()),
				}
			},
		}
	}
}
impl HandshakeHttpClient for FakeProvider {
	type Handle = FakeHandle;
	type TransportError = FakeTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		FakeHandle { provider: self.clone(), slot }
	}
}

pub struct FakeHandle {
	provider: FakeProvider,
	slot: ResponseMetadataSlot,
}
impl<'c> AsyncHttpClient<'c> for FakeHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			assert!(
				self.slot.take().is_none(),
				"ResponseMetadataSlot must be clear before dispatching a request."
			);

			// Let concurrent handshakes interleave.
			tokio::task::yield_now().await;

			match self.provider.respond(&request) {
				Reply::Respond(status, body) => {
					self.slot.store(ResponseMetadata { status: Some(status), retry_after: None });

					Ok(Response::builder()
						.status(status)
						.body(body.into_bytes())
						.expect("Fake response should build."))
				},
				Reply::Unreachable => Err(HttpClientError::Reqwest(Box::new(FakeTransportError))),
			}
		})
	}
}
