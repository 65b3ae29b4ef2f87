//! AWS Signature Version 4 presigned URLs for S3-compatible object storage.
//!
//! This crate implements the signing side of query-string authentication: given
//! an access key pair, an account-scoped host and an object path, it produces a
//! time-limited URL that lets the holder perform one HTTP method on that object
//! without ever seeing the secret key. A matching verifier reproduces the
//! backend's check locally.
//!
//! Everything here is a pure function of its inputs. The current time is always
//! passed in, which keeps signatures reproducible in tests.
//!
//! # Usage
//!
//! ```rust
//! use chrono::Utc;
//! use edgesign_sigv4::{
//!     Credentials, PathEncoding, PresignMethod, PresignRequest, Presigner, verify_presigned,
//! };
//!
//! let creds = Credentials::new("AKID", "secret", "acct.r2.cloudflarestorage.com").unwrap();
//! let presigner = Presigner::new(creds.clone());
//! let now = Utc::now();
//!
//! let signed = presigner
//!     .presign(&PresignRequest::new(PresignMethod::Put, "uploads/a.png", 900), now)
//!     .unwrap();
//!
//! let verified =
//!     verify_presigned(&http::Method::PUT, &signed.url, &creds, PathEncoding::Rfc3986, now)
//!         .unwrap();
//! assert_eq!(verified.object_path, "uploads/a.png");
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Path/query encoding and canonical request construction
//! - [`credentials`] - Validated access key pair and credential scope
//! - [`error`] - Presign and verification error types
//! - [`presign`] - Presigned URL generation
//! - [`sigv4`] - Hashing, key derivation and signature primitives
//! - [`verify`] - Presigned URL verification

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod presign;
pub mod sigv4;
pub mod verify;

pub use canonical::PathEncoding;
pub use credentials::Credentials;
pub use error::{PresignError, VerifyError};
pub use presign::{MAX_EXPIRES_SECS, PresignMethod, PresignRequest, PresignedUrl, Presigner};
pub use verify::{VerifiedPresign, verify_presigned};
