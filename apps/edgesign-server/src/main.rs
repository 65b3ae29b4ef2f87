//! edgesign Server - presigned URL broker for S3-compatible object storage.
//!
//! Clients ask this server for a time-limited URL and then upload to, or
//! download from, the storage backend directly. File bytes never pass through
//! the server.
//!
//! # Usage
//!
//! ```text
//! R2_ACCOUNT_ID=... R2_ACCESS_KEY_ID=... R2_SECRET_ACCESS_KEY=... \
//! R2_PUBLIC_URL=https://cdn.example.com edgesign-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8787` | Bind address |
//! | `SERVICE_NAME` | `edgesign` | Name reported by `/health` |
//! | `R2_ACCOUNT_ID` | *(unset)* | Account id; builds `{id}.r2.cloudflarestorage.com` |
//! | `R2_ENDPOINT_HOST` | *(unset)* | Explicit storage host (overrides `R2_ACCOUNT_ID`) |
//! | `R2_ACCESS_KEY_ID` | *(required)* | Access key id |
//! | `R2_SECRET_ACCESS_KEY` | *(required)* | Secret access key |
//! | `R2_PUBLIC_URL` | *(empty)* | Base of the returned `publicUrl` |
//! | `R2_REGION` | `auto` | Credential-scope region |
//! | `R2_PATH_ENCODING` | `rfc3986` | Path escape table: `rfc3986` or `uri-component` |
//! | `UPLOAD_URL_EXPIRES` | `900` | Validity of non-GET URLs in seconds |
//! | `VIEW_URL_EXPIRES` | `3600` | Validity of GET URLs in seconds |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use edgesign_core::{EdgesignConfig, StorageConfig};
use edgesign_http::{EdgesignHttpConfig, EdgesignHttpService};
use edgesign_sigv4::{Credentials, MAX_EXPIRES_SECS, PathEncoding, Presigner};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Server version logged at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the signer from the storage settings.
///
/// Fails on missing credentials or host and on an unknown path table, so a
/// misconfigured deployment never starts handing out URLs the backend rejects.
fn build_presigner(storage: &StorageConfig) -> Result<Presigner> {
    let host = storage
        .host()
        .context("storage host is not configured: set R2_ACCOUNT_ID or R2_ENDPOINT_HOST")?;

    let credentials = Credentials::with_scope(
        storage.access_key_id.as_str(),
        storage.secret_access_key.as_str(),
        host,
        storage.region.as_str(),
        edgesign_sigv4::credentials::DEFAULT_SERVICE,
    )
    .context("invalid storage credentials")?;

    let encoding: PathEncoding = storage
        .path_encoding
        .parse()
        .context("invalid R2_PATH_ENCODING")?;

    Ok(Presigner::new(credentials).with_path_encoding(encoding))
}

/// Build the [`EdgesignHttpConfig`] from the application [`EdgesignConfig`].
fn build_http_config(config: &EdgesignConfig) -> Result<EdgesignHttpConfig> {
    for (key, secs) in [
        ("UPLOAD_URL_EXPIRES", config.upload_url_expires),
        ("VIEW_URL_EXPIRES", config.view_url_expires),
    ] {
        if secs > MAX_EXPIRES_SECS {
            anyhow::bail!("{key}={secs} exceeds the maximum of {MAX_EXPIRES_SECS} seconds");
        }
    }

    Ok(EdgesignHttpConfig {
        service_name: config.service_name.clone(),
        public_url: config.storage.public_url.clone(),
        upload_url_expires: config.upload_url_expires,
        view_url_expires: config.view_url_expires,
    })
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: EdgesignHttpService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Probe `GET /health` on the running server.
///
/// Succeeds only on a 200 response whose body reports `"status":"ok"`.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if is_healthy_response(&response) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

fn is_healthy_response(raw: &str) -> bool {
    raw.starts_with("HTTP/1.1 200") && raw.contains("\"status\":\"ok\"")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = EdgesignConfig::from_env().context("failed to load configuration")?;

    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;

    let presigner = build_presigner(&config.storage)?;
    let http_config = build_http_config(&config)?;

    if http_config.public_url.is_empty() {
        warn!("R2_PUBLIC_URL is not set, publicUrl values will be relative");
    }

    info!(
        host = presigner.credentials().host(),
        region = presigner.credentials().region(),
        path_encoding = %presigner.path_encoding(),
        upload_url_expires = http_config.upload_url_expires,
        view_url_expires = http_config.view_url_expires,
        "initializing presign service",
    );

    let service = EdgesignHttpService::new(Arc::new(presigner), http_config);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting edgesign server");

    serve(listener, service).await
}
