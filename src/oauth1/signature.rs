//! PLAINTEXT signature construction.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Signature methods understood by the broker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureMethod {
	/// `consumer_secret&token_secret`, protected only by TLS.
	#[default]
	#[serde(rename = "PLAINTEXT")]
	Plaintext,
}
impl SignatureMethod {
	/// Returns the `oauth_signature_method` value.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureMethod::Plaintext => "PLAINTEXT",
		}
	}
}
impl Display for SignatureMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Builds the PLAINTEXT signature `consumer_secret&token_secret`.
///
/// Before authorization there is no token secret and the right half stays empty.
pub fn plaintext_signature(
	consumer_secret: &TokenSecret,
	token_secret: Option<&TokenSecret>,
) -> TokenSecret {
	let token_secret = token_secret.map(TokenSecret::expose).unwrap_or_default();

	TokenSecret::new(format!("{}&{token_secret}", consumer_secret.expose()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signature_without_token_secret_ends_with_ampersand() {
		for secret in ["S", "consumer-secret", "with&amp", ""] {
			let signature = plaintext_signature(&TokenSecret::new(secret), None);

			assert_eq!(signature.expose(), format!("{secret}&"));
		}
	}

	#[test]
	fn signature_joins_both_secrets() {
		let pairs = [("S", "T"), ("consumer", "request-secret"), ("a", "")];

		for (consumer, token) in pairs {
			let signature =
				plaintext_signature(&TokenSecret::new(consumer), Some(&TokenSecret::new(token)));

			assert_eq!(signature.expose(), format!("{consumer}&{token}"));
		}
	}

	#[test]
	fn method_label_matches_protocol() {
		assert_eq!(SignatureMethod::default().as_str(), "PLAINTEXT");
		assert_eq!(
			serde_json::to_string(&SignatureMethod::Plaintext)
				.expect("Signature method should serialize."),
			"\"PLAINTEXT\""
		);
	}
}
