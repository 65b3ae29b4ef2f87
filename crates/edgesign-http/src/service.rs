//! edgesign HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use edgesign_sigv4::{PresignMethod, Presigner};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use tracing::{debug, error};

use crate::body::EdgesignResponseBody;
use crate::clock::{Clock, SystemClock};
use crate::error::ServiceError;
use crate::handler;
use crate::response::{add_common_headers, error_to_response, json_response, not_found, preflight};
use crate::router::{Route, resolve_route};

/// Settings for the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgesignHttpConfig {
    /// Reported by `/health`.
    pub service_name: String,
    /// Base of `publicUrl`, without a trailing `/`.
    pub public_url: String,
    /// Expiry in seconds for every method except GET.
    pub upload_url_expires: u64,
    /// Expiry in seconds for GET.
    pub view_url_expires: u64,
}

impl Default for EdgesignHttpConfig {
    fn default() -> Self {
        Self {
            service_name: "edgesign".to_owned(),
            public_url: String::new(),
            upload_url_expires: 900,
            view_url_expires: 3600,
        }
    }
}

impl EdgesignHttpConfig {
    /// The validity to request for `method`.
    #[must_use]
    pub fn expires_for(&self, method: PresignMethod) -> u64 {
        match method {
            PresignMethod::Get => self.view_url_expires,
            PresignMethod::Put | PresignMethod::Head | PresignMethod::Delete => {
                self.upload_url_expires
            }
        }
    }
}

/// Hyper `Service` for the presign API.
///
/// Cloning is cheap: the presigner, clock and config are shared.
#[derive(Clone)]
pub struct EdgesignHttpService {
    presigner: Arc<Presigner>,
    clock: Arc<dyn Clock>,
    config: Arc<EdgesignHttpConfig>,
}

impl fmt::Debug for EdgesignHttpService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgesignHttpService")
            .field("presigner", &self.presigner)
            .field("clock", &"...")
            .field("config", &self.config)
            .finish()
    }
}

impl EdgesignHttpService {
    /// Create a service that reads the system clock.
    pub fn new(presigner: Arc<Presigner>, config: EdgesignHttpConfig) -> Self {
        Self {
            presigner,
            clock: Arc::new(SystemClock),
            config: Arc::new(config),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Handle one request end to end, including common headers.
    ///
    /// Generic over the body so tests can drive the service without a socket.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<EdgesignResponseBody>
    where
        B: http_body::Body<Data = Bytes>,
        B::Error: fmt::Display,
    {
        let request_id = uuid::Uuid::new_v4().to_string();
        let response = self.process_request(req, &request_id).await;
        add_common_headers(response, &request_id)
    }

    async fn process_request<B>(
        &self,
        req: http::Request<B>,
        request_id: &str,
    ) -> http::Response<EdgesignResponseBody>
    where
        B: http_body::Body<Data = Bytes>,
        B::Error: fmt::Display,
    {
        let (parts, incoming) = req.into_parts();
        let path = parts.uri.path();
        let route = resolve_route(&parts.method, path);

        debug!(method = %parts.method, path, ?route, request_id, "Routing request");

        match route {
            Route::Preflight => preflight(),
            Route::Health => json_response(
                http::StatusCode::OK,
                &handler::health(&self.config, self.clock.now()),
            ),
            Route::NotFound => not_found(path),
            Route::PresignUpload | Route::PresignView => {
                let body = match collect_body(incoming).await {
                    Ok(body) => body,
                    Err(err) => return render_error(&err, request_id),
                };
                let now = self.clock.now();

                let result = if route == Route::PresignUpload {
                    handler::presign_upload(&self.presigner, &self.config, &body, now)
                        .map(|output| json_response(http::StatusCode::OK, &output))
                } else {
                    handler::presign_view(&self.presigner, &self.config, &body, now)
                        .map(|output| json_response(http::StatusCode::OK, &output))
                };

                result.unwrap_or_else(|err| render_error(&err, request_id))
            }
        }
    }
}

/// Log a failed request and render its error envelope.
fn render_error(err: &ServiceError, request_id: &str) -> http::Response<EdgesignResponseBody> {
    if err.status_code().is_server_error() {
        error!(code = %err.code, message = %err.message, request_id, "Request failed");
    } else {
        debug!(code = %err.code, message = %err.message, request_id, "Request rejected");
    }
    error_to_response(err)
}

impl hyper::service::Service<http::Request<Incoming>> for EdgesignHttpService {
    type Response = http::Response<EdgesignResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body<B>(incoming: B) -> Result<Bytes, ServiceError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: fmt::Display,
{
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| ServiceError::internal(format!("Failed to read request body: {e}")))
}
