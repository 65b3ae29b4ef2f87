//! Integration tests for the edgesign server.
//!
//! These tests require a running edgesign server at `localhost:8787`.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p edgesign-integration -- --ignored
//! ```
//!
//! Set `EDGESIGN_ENDPOINT_URL` to target another address.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("EDGESIGN_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8787".to_owned())
}

/// Create an HTTP client for talking to the local server.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// POST a JSON body to `path` and return the status and parsed JSON response.
pub async fn post_json(
    client: &reqwest::Client,
    path: &str,
    body: &serde_json::Value,
) -> anyhow::Result<(reqwest::StatusCode, serde_json::Value)> {
    let resp = client
        .post(format!("{}{path}", endpoint_url()))
        .json(body)
        .send()
        .await?;
    let status = resp.status();
    let json = resp.json::<serde_json::Value>().await?;
    tracing::debug!(%status, path, "received response");
    Ok((status, json))
}

/// A valid upload request body for `file_type`.
#[must_use]
pub fn upload_body(file_type: &str) -> serde_json::Value {
    serde_json::json!({
        "fileName": "문서 1.png",
        "userId": "integration-user",
        "contentType": "image/png",
        "fileType": file_type,
        "companyId": "42",
    })
}

mod test_cors;
mod test_error;
mod test_health;
mod test_presign;
