//! Presigned URL verification.
//!
//! This is the check an S3-compatible backend performs when a presigned URL
//! is used, reproduced locally so issued URLs can be validated without a
//! round trip to storage. The verifier only accepts the URL shape this crate
//! issues: `host` as the sole signed header and an `UNSIGNED-PAYLOAD` body.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use percent_encoding::percent_decode_str;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{
    PathEncoding, build_canonical_query_string, build_canonical_request,
    canonicalize_request_path,
};
use crate::credentials::Credentials;
use crate::error::VerifyError;
use crate::presign::MAX_EXPIRES_SECS;
use crate::sigv4::{
    ALGORITHM, AMZ_DATE_FORMAT, SCOPE_TERMINATOR, UNSIGNED_PAYLOAD, build_credential_scope,
    build_string_to_sign, compute_signature, derive_signing_key, hash_hex,
};

/// Facts established by a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPresign {
    /// The access key the URL was signed with.
    pub access_key_id: String,
    /// The method the URL was used with.
    pub method: http::Method,
    /// The decoded object path, without the leading `/`.
    pub object_path: String,
    /// The `X-Amz-Date` instant.
    pub signed_at: DateTime<Utc>,
    /// The last instant the URL is valid.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug)]
struct PresignedParams {
    access_key_id: String,
    date: String,
    region: String,
    service: String,
    timestamp: String,
    expires: u64,
    signed_headers: String,
    signature: String,
}

/// Verify that `url` is a valid presigned URL for `method` at instant `now`.
///
/// `encoding` must be the path table the URL was signed with.
///
/// # Errors
///
/// Returns the [`VerifyError`] describing the first check that fails. The
/// checks run in this order: URL syntax, required parameters, algorithm,
/// credential format and scope, host, signed headers, validity window and
/// finally the signature itself.
pub fn verify_presigned(
    method: &http::Method,
    url: &str,
    credentials: &Credentials,
    encoding: PathEncoding,
    now: DateTime<Utc>,
) -> Result<VerifiedPresign, VerifyError> {
    let uri: http::Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| VerifyError::InvalidUri(e.to_string()))?;
    let authority = uri
        .authority()
        .ok_or_else(|| VerifyError::InvalidUri("URL has no host".to_owned()))?;
    let query = uri.query().unwrap_or("");

    let params = parse_presigned_params(query)?;

    debug!(
        access_key_id = %params.access_key_id,
        date = %params.date,
        expires = params.expires,
        "Verifying presigned URL"
    );

    if params.access_key_id != credentials.access_key_id() {
        return Err(VerifyError::AccessKeyNotFound(params.access_key_id));
    }
    if params.region != credentials.region() || params.service != credentials.service() {
        return Err(VerifyError::CredentialMismatch {
            expected: format!("{}/{}", credentials.region(), credentials.service()),
            actual: format!("{}/{}", params.region, params.service),
        });
    }
    if authority.as_str() != credentials.host() {
        return Err(VerifyError::HostMismatch {
            expected: credentials.host().to_owned(),
            actual: authority.as_str().to_owned(),
        });
    }
    if params.signed_headers != "host" {
        return Err(VerifyError::UnsupportedSignedHeaders(params.signed_headers));
    }

    let (signed_at, expires_at) = check_validity_window(&params, now)?;

    let canonical_uri = canonicalize_request_path(uri.path(), encoding);
    let canonical_query = build_canonical_query_string_without_signature(query);
    let canonical_request = build_canonical_request(
        method.as_str(),
        &canonical_uri,
        &canonical_query,
        &[("host", credentials.host())],
        &["host"],
        UNSIGNED_PAYLOAD,
    );
    debug!(canonical_request, "Rebuilt presigned canonical request");

    let credential_scope = build_credential_scope(&params.date, &params.region, &params.service);
    let string_to_sign = build_string_to_sign(
        &params.timestamp,
        &credential_scope,
        &hash_hex(canonical_request.as_bytes()),
    );
    let signing_key = derive_signing_key(
        credentials.secret_access_key(),
        &params.date,
        &params.region,
        &params.service,
    );
    let expected_signature = compute_signature(&signing_key, &string_to_sign);

    if !bool::from(
        params
            .signature
            .as_bytes()
            .ct_eq(expected_signature.as_bytes()),
    ) {
        debug!(
            expected = %expected_signature,
            provided = %params.signature,
            "Presigned URL signature mismatch"
        );
        return Err(VerifyError::SignatureDoesNotMatch);
    }

    let object_path = percent_decode_str(uri.path().trim_start_matches('/'))
        .decode_utf8_lossy()
        .into_owned();

    Ok(VerifiedPresign {
        access_key_id: params.access_key_id,
        method: method.clone(),
        object_path,
        signed_at,
        expires_at,
    })
}

fn parse_presigned_params(query: &str) -> Result<PresignedParams, VerifyError> {
    let params: HashMap<&str, String> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            Some((key, percent_decode_str(value).decode_utf8_lossy().into_owned()))
        })
        .collect();

    let required = |name: &'static str| {
        params
            .get(name)
            .cloned()
            .ok_or(VerifyError::MissingQueryParam(name))
    };

    let algorithm = required("X-Amz-Algorithm")?;
    if algorithm != ALGORITHM {
        return Err(VerifyError::UnsupportedAlgorithm(algorithm));
    }

    let credential = required("X-Amz-Credential")?;
    let timestamp = required("X-Amz-Date")?;
    let expires = required("X-Amz-Expires")?
        .parse::<u64>()
        .map_err(|_| VerifyError::MissingQueryParam("X-Amz-Expires"))?;
    let signed_headers = required("X-Amz-SignedHeaders")?;
    let signature = required("X-Amz-Signature")?;

    // AKID/date/region/service/aws4_request
    let parts: Vec<&str> = credential.splitn(5, '/').collect();
    let [access_key_id, date, region, service, terminator] = parts.as_slice() else {
        return Err(VerifyError::InvalidCredential);
    };
    if *terminator != SCOPE_TERMINATOR || !timestamp.starts_with(date) || date.len() != 8 {
        return Err(VerifyError::InvalidCredential);
    }

    Ok(PresignedParams {
        access_key_id: (*access_key_id).to_owned(),
        date: (*date).to_owned(),
        region: (*region).to_owned(),
        service: (*service).to_owned(),
        timestamp,
        expires,
        signed_headers,
        signature,
    })
}

fn check_validity_window(
    params: &PresignedParams,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), VerifyError> {
    if params.expires == 0 || params.expires > MAX_EXPIRES_SECS {
        return Err(VerifyError::InvalidExpires(params.expires));
    }

    let signed_at = NaiveDateTime::parse_from_str(&params.timestamp, AMZ_DATE_FORMAT)
        .map_err(|_| VerifyError::MissingQueryParam("X-Amz-Date"))?
        .and_utc();
    let lifetime = i64::try_from(params.expires)
        .map_err(|_| VerifyError::InvalidExpires(params.expires))?;
    let expires_at = signed_at + Duration::seconds(lifetime);

    if now < signed_at {
        return Err(VerifyError::NotYetValid);
    }
    if now > expires_at {
        return Err(VerifyError::Expired);
    }
    Ok((signed_at, expires_at))
}

fn build_canonical_query_string_without_signature(query: &str) -> String {
    let filtered = query
        .split('&')
        .filter(|param| !param.starts_with("X-Amz-Signature="))
        .collect::<Vec<_>>()
        .join("&");
    build_canonical_query_string(&filtered)
}
