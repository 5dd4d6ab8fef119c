//! Interactive three-legged OAuth 1.0a login against Discogs.
//!
//! The demo obtains a request token, prints the approval URL, waits for the user to
//! paste either the verifier or the full callback URL, then exchanges it for an access
//! token and resolves the Discogs username and avatar.

// std
use std::io::{self, Write};
// crates.io
use color_eyre::Result;
// self
use oauth1_broker::{
	auth::{AppCredential, Callback, Verifier},
	flows::{Broker, Handshake},
	provider::ProviderDescriptor,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let consumer_key = prompt_with_default("Enter your Discogs consumer key", None)?;
	let consumer_secret = prompt_with_default("Enter your Discogs consumer secret", None)?;
	let user_agent = prompt_with_default(
		"Enter the User-Agent to identify your app",
		Some("CrateDigger/0.1 +https://crates.example.com"),
	)?;
	let callback_input = prompt_with_default(
		"Enter the callback URL registered with Discogs (or `oob`)",
		Some("oob"),
	)?;
	let callback = match callback_input.as_str() {
		"oob" => Callback::OutOfBand,
		url => Url::parse(url)?.into(),
	};
	let credential = AppCredential::new(consumer_key, consumer_secret)?;
	let broker = Broker::new(ProviderDescriptor::discogs(user_agent)?)?;
	let mut handshake = Handshake::new();
	let pending = handshake.request_token(&broker, &credential, &callback).await?;

	println!("Authorize URL: {}", pending.authorize_url);
	println!(
		"After approving, paste the verifier code or the full callback URL Discogs redirected to."
	);

	let answer = prompt_optional("Verifier or callback URL (leave blank to stop here)")?;
	let Some(answer) = answer else {
		println!("No verifier provided; keep the request token and resume the handshake later.");

		return Ok(());
	};
	let verifier = match Url::parse(&answer) {
		Ok(callback_url) => pending.verifier_from_callback(&callback_url)?,
		Err(_) => Verifier::new(&answer)?,
	};
	let authenticated = handshake.complete(&broker, &credential, &verifier).await?;
	let identity = &authenticated.identity;

	println!("Signed in as: {}", identity.username);
	if let Some(id) = identity.user_id {
		println!("Discogs user id: {id}");
	}
	if identity.avatar_url().is_empty() {
		println!("Avatar lookup was skipped.");
	} else {
		println!("Avatar: {}", identity.avatar_url());
	}
	println!("Access token pair (persist this): {}", serde_json::to_string(&authenticated.access)?);

	Ok(())
}

fn prompt_with_default(message: &str, default: Option<&str>) -> Result<String> {
	loop {
		if let Some(value) = default {
			print!("{message} [{value}]: ");
		} else {
			print!("{message}: ");
		}

		io::stdout().flush()?;

		let mut input = String::new();

		io::stdin().read_line(&mut input)?;

		let trimmed = input.trim();

		if trimmed.is_empty() {
			if let Some(value) = default {
				return Ok(value.to_owned());
			}
		} else {
			return Ok(trimmed.to_owned());
		}
	}
}

fn prompt_optional(message: &str) -> Result<Option<String>> {
	print!("{message}: ");

	io::stdout().flush()?;

	let mut input = String::new();

	io::stdin().read_line(&mut input)?;

	let trimmed = input.trim();

	if trimmed.is_empty() { Ok(None) } else { Ok(Some(trimmed.to_owned())) }
}
