//! HTTP-layer error type.
//!
//! Every failure a handler can produce is a [`ServiceError`]: a code that
//! fixes the HTTP status, plus the message rendered into the
//! `{"success":false,"error":...}` envelope.

use std::fmt;

use edgesign_sigv4::PresignError;

/// Categories of request failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceErrorCode {
    /// A required field is absent or a value is not acceptable.
    Validation,
    /// The request body is not valid JSON of the expected shape.
    MalformedBody,
    /// The signer rejected its own configuration.
    SigningFailed,
    /// Anything else on the server side.
    Internal,
}

impl ServiceErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::MalformedBody => "MalformedBody",
            Self::SigningFailed => "SigningFailed",
            Self::Internal => "Internal",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::Validation | Self::MalformedBody => http::StatusCode::BAD_REQUEST,
            Self::SigningFailed | Self::Internal => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed request, ready to be rendered as a JSON error envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ServiceError {
    /// The error category.
    pub code: ServiceErrorCode,
    /// Message returned to the client.
    pub message: String,
}

impl ServiceError {
    /// Create a new error with an explicit code.
    #[must_use]
    pub fn new(code: ServiceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        self.code.status_code()
    }

    /// A 400 validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::Validation, message)
    }

    /// A 400 for a body that failed to parse.
    #[must_use]
    pub fn malformed_body(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::MalformedBody, message)
    }

    /// A 500 for unexpected server-side failures.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorCode::Internal, message)
    }
}

impl From<PresignError> for ServiceError {
    fn from(err: PresignError) -> Self {
        match err {
            PresignError::UnsupportedMethod(_) => Self::validation(err.to_string()),
            PresignError::MissingCredential(_)
            | PresignError::EmptyObjectPath
            | PresignError::InvalidExpiry(_)
            | PresignError::UnknownPathEncoding(_) => {
                Self::new(ServiceErrorCode::SigningFailed, err.to_string())
            }
        }
    }
}
