//! `Authorization: OAuth ...` header rendering.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// RFC 3986 unreserved characters stay literal; everything else is escaped.
///
/// Unlike URI-component encoders this escapes `!`, `'`, `(`, `)` and `*`, so commas,
/// quotes, and `&` never appear raw inside a quoted header value.
pub const OAUTH_ENCODE_SET: &AsciiSet =
	&NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Header scheme prefix.
pub const OAUTH_SCHEME: &str = "OAuth";

/// Percent-encodes a single protocol key or value.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

/// Renders `OAuth k1="v1", k2="v2", ...` from parameter pairs, in iteration order.
///
/// Feed it an ordered map to get a deterministic header.
pub fn authorization_header<I, K, V>(params: I) -> String
where
	I: IntoIterator<Item = (K, V)>,
	K: AsRef<str>,
	V: AsRef<str>,
{
	let mut header = String::from(OAUTH_SCHEME);

	for (idx, (key, value)) in params.into_iter().enumerate() {
		header.push_str(if idx == 0 { " " } else { ", " });
		header.push_str(&percent_encode(key.as_ref()));
		header.push_str("=\"");
		header.push_str(&percent_encode(value.as_ref()));
		header.push('"');
	}

	header
}
