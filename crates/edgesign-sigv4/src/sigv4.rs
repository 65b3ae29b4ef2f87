//! AWS Signature Version 4 signing primitives.
//!
//! The presigned-URL flow is built from four steps:
//!
//! 1. Hash the canonical request with SHA-256 ([`hash_hex`]).
//! 2. Build the string to sign from the timestamp, credential scope and that
//!    hash ([`build_string_to_sign`]).
//! 3. Derive the signing key through the four-step HMAC chain
//!    ([`derive_signing_key`]).
//! 4. HMAC the string to sign with the signing key ([`compute_signature`]).
//!
//! Every HMAC here consumes and produces raw bytes; only the final signature
//! and the canonical-request hash are hex-encoded.

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};

/// The only signing algorithm this crate produces.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Payload hash placeholder used by every presigned URL.
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Terminator of every credential scope.
pub const SCOPE_TERMINATOR: &str = "aws4_request";

/// `strftime` pattern of `X-Amz-Date` (ISO 8601 basic format).
pub const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

type HmacSha256 = Hmac<Sha256>;

/// The two timestamp strings a signature depends on.
///
/// Both are derived from one instant so they can never straddle a date
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningTime {
    /// `YYYYMMDD`, used in the credential scope and key derivation.
    pub date_stamp: String,
    /// `YYYYMMDDThhmmssZ`, used as `X-Amz-Date`.
    pub amz_date: String,
}

impl SigningTime {
    /// Derive both timestamp strings from a single instant.
    ///
    /// Sub-second precision is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use edgesign_sigv4::sigv4::SigningTime;
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
    /// let time = SigningTime::from_instant(now);
    /// assert_eq!(time.date_stamp, "20240101");
    /// assert_eq!(time.amz_date, "20240101T235959Z");
    /// ```
    #[must_use]
    pub fn from_instant(now: DateTime<Utc>) -> Self {
        Self {
            date_stamp: now.format("%Y%m%d").to_string(),
            amz_date: now.format(AMZ_DATE_FORMAT).to_string(),
        }
    }
}

/// Build the credential scope `date/region/service/aws4_request`.
#[must_use]
pub fn build_credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{date_stamp}/{region}/{service}/{SCOPE_TERMINATOR}")
}

/// Build the SigV4 string to sign.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
///
/// # Examples
///
/// ```
/// use edgesign_sigv4::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20130524T000000Z",
///     "20130524/us-east-1/s3/aws4_request",
///     "3bfa292879f6447bbcda7001decf97f4a54dc650c8942174ae0a9121cf58ad04",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20130524T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key using the HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac_sha256(&date_key, region.as_bytes());
    let date_region_service_key = hmac_sha256(&date_region_key, service.as_bytes());
    hmac_sha256(&date_region_service_key, SCOPE_TERMINATOR.as_bytes())
}

/// HMAC `data` with `signing_key` and return lowercase hex.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Lowercase hex SHA-256 of `data`.
///
/// # Examples
///
/// ```
/// use edgesign_sigv4::sigv4::hash_hex;
///
/// assert_eq!(
///     hash_hex(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
