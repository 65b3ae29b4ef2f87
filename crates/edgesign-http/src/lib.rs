//! HTTP service layer for edgesign.
//!
//! This crate exposes the presign signer over a small JSON API:
//!
//! - **Router**: Exact method + path matching, `OPTIONS` as CORS preflight
//! - **Handlers**: Upload and view presign endpoints plus the health probe
//! - **Object keys**: Server-generated storage keys for uploads
//! - **Service**: Hyper `Service` implementation with CORS and request ids
//! - **Response helpers**: JSON success/error envelopes
#![allow(missing_docs)]

pub mod body;
pub mod clock;
pub mod error;
pub mod handler;
pub mod model;
pub mod object_key;
pub mod response;
pub mod router;
pub mod service;

pub use body::EdgesignResponseBody;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ServiceError, ServiceErrorCode};
pub use service::{EdgesignHttpConfig, EdgesignHttpService};
