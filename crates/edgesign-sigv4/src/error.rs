//! Error types for presigning and presigned URL verification.
//!
//! [`PresignError`] covers everything that can go wrong before a signature is
//! computed. These are configuration problems on the signing side and must
//! surface distinctly from a remote rejection. [`VerifyError`] mirrors the
//! reasons an S3-compatible backend refuses a presigned URL.

/// Errors raised while building a presigned URL.
///
/// Every variant is detected before any hashing work starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresignError {
    /// A required credential field is missing or empty.
    #[error("missing storage credential: {0} is empty")]
    MissingCredential(&'static str),

    /// The object path is empty.
    #[error("object path must not be empty")]
    EmptyObjectPath,

    /// The expiry is zero or exceeds the SigV4 maximum of seven days.
    #[error("invalid expiry: {0} seconds (must be between 1 and 604800)")]
    InvalidExpiry(u64),

    /// The HTTP method cannot be presigned.
    #[error("unsupported method for presigning: {0}")]
    UnsupportedMethod(String),

    /// The path escape table name is not recognized.
    #[error("unknown path encoding: {0} (expected rfc3986 or uri-component)")]
    UnknownPathEncoding(String),
}

/// Reasons a presigned URL fails verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUri(String),

    /// A required query parameter is absent or malformed.
    #[error("missing required query parameter: {0}")]
    MissingQueryParam(&'static str),

    /// The signing algorithm is not `AWS4-HMAC-SHA256`.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The `X-Amz-Credential` value is not `AKID/date/region/service/aws4_request`
    /// or its date disagrees with `X-Amz-Date`.
    #[error("invalid credential format")]
    InvalidCredential,

    /// The access key id is not the one this verifier holds.
    #[error("access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The credential scope names a different region or service.
    #[error("credential scope mismatch: expected {expected}, got {actual}")]
    CredentialMismatch {
        /// The scope this verifier accepts.
        expected: String,
        /// The scope found in the URL.
        actual: String,
    },

    /// The URL targets a different host than the credentials are bound to.
    #[error("host mismatch: expected {expected}, got {actual}")]
    HostMismatch {
        /// The host the credentials are bound to.
        expected: String,
        /// The host found in the URL.
        actual: String,
    },

    /// Only `host` may be signed for presigned URLs issued by edgesign.
    #[error("unsupported signed headers: {0}")]
    UnsupportedSignedHeaders(String),

    /// `X-Amz-Expires` is zero or exceeds seven days.
    #[error("invalid expiry: {0}")]
    InvalidExpires(u64),

    /// The URL is used before its `X-Amz-Date`.
    #[error("request is not yet valid")]
    NotYetValid,

    /// The current time is past `X-Amz-Date` + `X-Amz-Expires`.
    #[error("request has expired")]
    Expired,

    /// The recomputed signature differs from `X-Amz-Signature`.
    #[error("signature does not match")]
    SignatureDoesNotMatch,
}
