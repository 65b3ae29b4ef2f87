//! Request router.
//!
//! The surface is small enough that routing is an exact match on method and
//! path. Any `OPTIONS` request is a CORS preflight regardless of path.

/// Path of the health probe.
pub const HEALTH_PATH: &str = "/health";
/// Path of the upload presign endpoint.
pub const PRESIGN_UPLOAD_PATH: &str = "/api/presigned-url";
/// Path of the view presign endpoint.
pub const PRESIGN_VIEW_PATH: &str = "/api/presigned-url-view";

/// The endpoint a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `OPTIONS` on any path.
    Preflight,
    /// `GET /health`.
    Health,
    /// `POST /api/presigned-url`.
    PresignUpload,
    /// `POST /api/presigned-url-view`.
    PresignView,
    /// No endpoint matched.
    NotFound,
}

/// Resolve the route for a method and path.
#[must_use]
pub fn resolve_route(method: &http::Method, path: &str) -> Route {
    if *method == http::Method::OPTIONS {
        return Route::Preflight;
    }

    let is_get = *method == http::Method::GET;
    let is_post = *method == http::Method::POST;

    match path {
        HEALTH_PATH if is_get => Route::Health,
        PRESIGN_UPLOAD_PATH if is_post => Route::PresignUpload,
        PRESIGN_VIEW_PATH if is_post => Route::PresignView,
        _ => Route::NotFound,
    }
}
