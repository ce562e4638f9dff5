//! Fingerprinted path encoding and decoding
//!
//! The marker `-dact-<32 hex>` goes immediately before the first `.` of the
//! final path segment, so `archive.tar.gz` becomes
//! `archive-dact-<hex>.tar.gz`, not `archive.tar-dact-<hex>.gz`. Clients
//! already hold URLs in this shape; keep the split point where it is.

use crate::engine::Fingerprint;
use regex::Regex;
use std::sync::LazyLock;

/// Literal text introducing the digest in a path segment
pub const MARKER: &str = "-dact-";

/// A slash, a non-empty segment head, the marker, then an optional extension
static FINGERPRINTED_PATH: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"/[^/]+(-dact-([0-9a-f]{32}))(\.[^/]*)?$")
		.expect("fingerprinted path pattern is valid")
});

/// Inserts the marker for `fingerprint` into `real_path`, without any prefix
///
/// # Example
///
/// ```rust
/// use dactyloscope_fingerprint::{Fingerprint, fingerprinted_path};
///
/// let fingerprint: Fingerprint = "0123456789abcdef0123456789abcdef".parse().unwrap();
///
/// assert_eq!(
///     fingerprinted_path("images/logo.png", &fingerprint),
///     "images/logo-dact-0123456789abcdef0123456789abcdef.png"
/// );
/// assert_eq!(
///     fingerprinted_path("README", &fingerprint),
///     "README-dact-0123456789abcdef0123456789abcdef"
/// );
/// ```
pub fn fingerprinted_path(real_path: &str, fingerprint: &Fingerprint) -> String {
	let marker = format!("{MARKER}{fingerprint}");
	let segment_start = real_path.rfind('/').unwrap_or(0);

	match real_path[segment_start..].find('.') {
		Some(offset) => {
			let dot = segment_start + offset;
			format!("{}{}{}", &real_path[..dot], marker, &real_path[dot..])
		}
		None => format!("{real_path}{marker}"),
	}
}

/// Outward-facing fingerprinted path: `prefix` + [`fingerprinted_path`]
pub fn encode(real_path: &str, fingerprint: &Fingerprint, prefix: &str) -> String {
	with_prefix(&fingerprinted_path(real_path, fingerprint), prefix)
}

/// Recovers the real path, or `None` when `path` carries no marker
///
/// Only the final segment is inspected, and only the first textual
/// occurrence of the matched marker is removed.
///
/// # Example
///
/// ```rust
/// use dactyloscope_fingerprint::decode;
///
/// assert_eq!(
///     decode("/images/logo-dact-0123456789abcdef0123456789abcdef.png").as_deref(),
///     Some("/images/logo.png")
/// );
/// assert_eq!(decode("/images/logo.png"), None);
/// ```
pub fn decode(path: &str) -> Option<String> {
	let captures = FINGERPRINTED_PATH.captures(path)?;
	let marker = captures.get(1)?.as_str();
	Some(path.replacen(marker, "", 1))
}

/// Whether `path` has the fingerprinted shape
pub fn is_fingerprinted(path: &str) -> bool {
	FINGERPRINTED_PATH.is_match(path)
}

/// The digest embedded in the final segment of `path`, if any
pub fn extract_fingerprint(path: &str) -> Option<Fingerprint> {
	let captures = FINGERPRINTED_PATH.captures(path)?;
	captures.get(2)?.as_str().parse().ok()
}

/// Prepends `prefix` to an outward-facing path
pub fn with_prefix(path: &str, prefix: &str) -> String {
	format!("{prefix}{path}")
}

/// Removes `prefix` when `path` starts with it on a segment boundary;
/// otherwise returns `path`
///
/// `/s` is stripped from `/s/app.js` but not from `/scripts/app.js`.
pub fn strip_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
	if prefix.is_empty() {
		return path;
	}
	match path.strip_prefix(prefix) {
		Some(rest) if rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/') => rest,
		_ => path,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::fingerprint_bytes;
	use proptest::prelude::*;
	use rstest::rstest;

	const HEX: &str = "abcdef0123456789abcdef0123456789";

	fn fingerprint() -> Fingerprint {
		HEX.parse().unwrap()
	}

	#[rstest]
	#[case("images/logo.png", "images/logo-dact-abcdef0123456789abcdef0123456789.png")]
	#[case("README", "README-dact-abcdef0123456789abcdef0123456789")]
	#[case("archive.tar.gz", "archive-dact-abcdef0123456789abcdef0123456789.tar.gz")]
	#[case("/v1.2/LICENSE", "/v1.2/LICENSE-dact-abcdef0123456789abcdef0123456789")]
	#[case("/js/app.min.js", "/js/app-dact-abcdef0123456789abcdef0123456789.min.js")]
	fn test_fingerprinted_path(#[case] real: &str, #[case] expected: &str) {
		assert_eq!(fingerprinted_path(real, &fingerprint()), expected);
	}

	#[rstest]
	fn test_encode_prepends_prefix() {
		assert_eq!(
			encode("/css/site.css", &fingerprint(), "https://cdn.example.com"),
			format!("https://cdn.example.com/css/site-dact-{HEX}.css")
		);
	}

	#[rstest]
	#[case(format!("/images/logo-dact-{HEX}.png"), Some("/images/logo.png"))]
	#[case(format!("/README-dact-{HEX}"), Some("/README"))]
	#[case(format!("/archive-dact-{HEX}.tar.gz"), Some("/archive.tar.gz"))]
	#[case("/images/logo.png".to_string(), None)]
	#[case(format!("logo-dact-{HEX}.png"), None)]
	#[case(format!("/logo-dact-{HEX}0.png"), None)]
	#[case(format!("/logo-dact-{}.png", HEX.to_uppercase()), None)]
	#[case(format!("/logo-dact-{HEX}/child.png"), None)]
	#[case(format!("/-dact-{HEX}.png"), None)]
	fn test_decode(#[case] path: String, #[case] expected: Option<&str>) {
		assert_eq!(decode(&path).as_deref(), expected);
		assert_eq!(is_fingerprinted(&path), expected.is_some());
	}

	#[rstest]
	fn test_decode_only_strips_first_occurrence_of_last_marker() {
		let other = "00000000000000000000000000000000";
		// Same marker text appears in a directory name and the file name
		let path = format!("/dir-dact-{HEX}/file-dact-{HEX}.css");
		assert_eq!(
			decode(&path).as_deref(),
			Some(format!("/dir/file-dact-{HEX}.css").as_str())
		);

		// Two markers in the final segment: the greedy match picks the last
		let path = format!("/file-dact-{other}-dact-{HEX}.css");
		assert_eq!(
			decode(&path).as_deref(),
			Some(format!("/file-dact-{other}.css").as_str())
		);
	}

	#[rstest]
	fn test_extract_fingerprint() {
		let path = format!("/a/b-dact-{HEX}.js");
		assert_eq!(extract_fingerprint(&path), Some(fingerprint()));
		assert_eq!(extract_fingerprint("/a/b.js"), None);
	}

	#[rstest]
	#[case("/static/app.js", "/static", "/app.js")]
	#[case("/app.js", "/static", "/app.js")]
	#[case("/app.js", "", "/app.js")]
	#[case("/scripts/a.js", "/s", "/scripts/a.js")]
	#[case("/staticfiles/a.js", "/static", "/staticfiles/a.js")]
	#[case("/s/a.js", "/s", "/a.js")]
	#[case("/static", "/static", "")]
	#[case("/assets/a.js", "/assets/", "a.js")]
	fn test_strip_prefix(#[case] path: &str, #[case] prefix: &str, #[case] expected: &str) {
		assert_eq!(strip_prefix(path, prefix), expected);
	}

	proptest! {
		#[test]
		fn prop_decode_inverts_encode(
			dirs in proptest::collection::vec("[a-z0-9_.]{1,8}", 0..4),
			stem in "[a-zA-Z0-9_]{1,12}",
			extension in proptest::option::of("[a-z0-9.]{1,8}"),
			content in proptest::collection::vec(any::<u8>(), 0..64),
			prefix in "(|/static|https://cdn\\.example\\.com)",
		) {
			let mut real = String::new();
			for dir in &dirs {
				real.push('/');
				real.push_str(dir);
			}
			real.push('/');
			real.push_str(&stem);
			if let Some(extension) = &extension {
				real.push('.');
				real.push_str(extension);
			}

			let encoded = encode(&real, &fingerprint_bytes(&content), &prefix);
			let stripped = strip_prefix(&encoded, &prefix);
			prop_assert_eq!(decode(stripped), Some(real));
		}
	}
}
