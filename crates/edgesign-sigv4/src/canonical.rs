//! Canonical request construction for AWS Signature Version 4.
//!
//! For presigned URLs the canonical request has the shape:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! UNSIGNED-PAYLOAD
//! ```
//!
//! The path and query encoders here are the single source of truth for both
//! the canonical request and the final URL. Any divergence between the two
//! produces a URL the backend rejects.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::PresignError;

/// Characters left unescaped by the SigV4 URI-encode function:
/// `A-Z`, `a-z`, `0-9`, `-`, `_`, `.`, `~`.
const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The `encodeURIComponent` table, which additionally leaves `! ' ( ) *` alone.
const URI_COMPONENT_ENCODE_SET: &AsciiSet = &RFC3986_ENCODE_SET
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*');

/// Escape table applied to each object-path segment.
///
/// S3-compatible backends disagree on a handful of sub-delimiters, so the
/// table is chosen per deployment. Query parameters always use the strict
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PathEncoding {
    /// Strict SigV4 encoding: everything except unreserved characters.
    #[default]
    Rfc3986,
    /// `encodeURIComponent`-compatible: also keeps `! ' ( ) *` literal.
    UriComponent,
}

impl PathEncoding {
    /// The configuration name of this table.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rfc3986 => "rfc3986",
            Self::UriComponent => "uri-component",
        }
    }

    fn ascii_set(self) -> &'static AsciiSet {
        match self {
            Self::Rfc3986 => RFC3986_ENCODE_SET,
            Self::UriComponent => URI_COMPONENT_ENCODE_SET,
        }
    }
}

impl fmt::Display for PathEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathEncoding {
    type Err = PresignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rfc3986" | "strict" => Ok(Self::Rfc3986),
            "uri-component" | "uricomponent" => Ok(Self::UriComponent),
            other => Err(PresignError::UnknownPathEncoding(other.to_owned())),
        }
    }
}

/// Percent-encode an object path segment by segment.
///
/// The path is split on `/`, every segment is encoded with `encoding`, and
/// the segments are rejoined with a literal `/`. No leading slash is added.
///
/// # Examples
///
/// ```
/// use edgesign_sigv4::canonical::{PathEncoding, encode_object_path};
///
/// assert_eq!(
///     encode_object_path("docs/문서 1.png", PathEncoding::Rfc3986),
///     "docs/%EB%AC%B8%EC%84%9C%201.png"
/// );
/// ```
#[must_use]
pub fn encode_object_path(path: &str, encoding: PathEncoding) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, encoding.ascii_set()).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Re-canonicalize a path taken from a request line.
///
/// Each segment is decoded and encoded again, so a raw path and its already
/// escaped form produce the same canonical URI. Empty paths become `/`.
///
/// # Examples
///
/// ```
/// use edgesign_sigv4::canonical::{PathEncoding, canonicalize_request_path};
///
/// assert_eq!(
///     canonicalize_request_path("/hello%20world", PathEncoding::Rfc3986),
///     canonicalize_request_path("/hello world", PathEncoding::Rfc3986),
/// );
/// assert_eq!(canonicalize_request_path("", PathEncoding::Rfc3986), "/");
/// ```
#[must_use]
pub fn canonicalize_request_path(path: &str, encoding: PathEncoding) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, encoding.ascii_set()).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Serialize query parameters into a canonical query string.
///
/// Names and values are encoded with the strict SigV4 table, then pairs are
/// sorted by encoded name (and by value for duplicate names).
///
/// # Examples
///
/// ```
/// use edgesign_sigv4::canonical::encode_query_params;
///
/// assert_eq!(
///     encode_query_params(&[("b", "2"), ("a", "x/y")]),
///     "a=x%2Fy&b=2"
/// );
/// ```
#[must_use]
pub fn encode_query_params(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(name, value)| (encode_query_component(name), encode_query_component(value)))
        .collect();
    encoded.sort_unstable();

    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode a query-string name or value with the strict SigV4 table.
#[must_use]
pub fn encode_query_component(input: &str) -> String {
    utf8_percent_encode(input, RFC3986_ENCODE_SET).to_string()
}

/// Build the canonical query string from a raw (already encoded) query.
///
/// Parameters are sorted by name, then by value. Raw values are kept as they
/// appear on the wire, which is what the signer put there.
///
/// # Examples
///
/// ```
/// use edgesign_sigv4::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(""), "");
/// assert_eq!(build_canonical_query_string("b=2&a=1"), "a=1&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string(query: &str) -> String {
    if query.is_empty() {
        return String::new();
    }

    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| param.split_once('=').unwrap_or((param, "")))
        .collect();

    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical headers block from the signed headers.
///
/// Header names are lowercased, values trimmed with inner whitespace runs
/// collapsed, and entries sorted by name. The result has no trailing newline;
/// [`build_canonical_request`] adds the blank line that follows the block.
#[must_use]
pub fn build_canonical_headers(headers: &[(&str, &str)], signed_headers: &[&str]) -> String {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let trimmed_value = collapse_whitespace(value.trim());
        header_map
            .entry(name.to_lowercase())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&trimmed_value);
            })
            .or_insert(trimmed_value);
    }

    let mut sorted_signed: Vec<&str> = signed_headers.to_vec();
    sorted_signed.sort_unstable();

    sorted_signed
        .iter()
        .filter_map(|name| header_map.get(*name).map(|value| format!("{name}:{value}")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the signed headers list: lowercase names, sorted, joined by `;`.
///
/// # Examples
///
/// ```
/// use edgesign_sigv4::canonical::build_signed_headers_string;
///
/// assert_eq!(build_signed_headers_string(&["x-amz-date", "host"]), "host;x-amz-date");
/// ```
#[must_use]
pub fn build_signed_headers_string(signed_headers: &[&str]) -> String {
    let mut sorted: Vec<&str> = signed_headers.to_vec();
    sorted.sort_unstable();
    sorted.join(";")
}

/// Assemble the canonical request from already-canonical components.
///
/// `canonical_uri` and `canonical_query` are used verbatim; callers produce
/// them with [`encode_object_path`] / [`encode_query_params`] when signing or
/// [`canonicalize_request_path`] / [`build_canonical_query_string`] when
/// verifying.
#[must_use]
pub fn build_canonical_request(
    method: &str,
    canonical_uri: &str,
    canonical_query: &str,
    headers: &[(&str, &str)],
    signed_headers: &[&str],
    payload_hash: &str,
) -> String {
    let canonical_headers = build_canonical_headers(headers, signed_headers);
    let signed_headers_str = build_signed_headers_string(signed_headers);

    format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n\n{signed_headers_str}\n{payload_hash}"
    )
}

fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
