//! Configuration management for edgesign.
//!
//! All configuration is driven by environment variables. Values are read once
//! at startup; unset variables fall back to the defaults below, and malformed
//! values are reported as [`EdgesignError::InvalidSetting`].

use std::fmt;

use crate::error::{EdgesignError, EdgesignResult};

/// Host suffix of Cloudflare R2's S3-compatible endpoint.
const R2_HOST_SUFFIX: &str = "r2.cloudflarestorage.com";

/// Global configuration for the edgesign server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgesignConfig {
    /// Bind address for the HTTP listener.
    pub gateway_listen: String,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Service name reported by the health endpoint.
    pub service_name: String,
    /// Validity in seconds of presigned URLs for writes (PUT, DELETE, HEAD).
    pub upload_url_expires: u64,
    /// Validity in seconds of presigned URLs for reads (GET).
    pub view_url_expires: u64,
    /// Object-storage settings.
    pub storage: StorageConfig,
}

/// Object-storage account and credential settings.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// R2 account id, used to derive the endpoint host.
    pub account_id: Option<String>,
    /// Explicit endpoint host; takes precedence over `account_id`.
    pub endpoint_host: Option<String>,
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Public base URL under which uploaded objects are served.
    pub public_url: String,
    /// Credential-scope region.
    pub region: String,
    /// Name of the path escape table (`rfc3986` or `uri-component`).
    pub path_encoding: String,
}

impl Default for EdgesignConfig {
    fn default() -> Self {
        Self {
            gateway_listen: "0.0.0.0:8787".to_owned(),
            log_level: "info".to_owned(),
            service_name: "edgesign".to_owned(),
            upload_url_expires: 900,
            view_url_expires: 3600,
            storage: StorageConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            endpoint_host: None,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            public_url: String::new(),
            region: "auto".to_owned(),
            path_encoding: "rfc3986".to_owned(),
        }
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("account_id", &self.account_id)
            .field("endpoint_host", &self.endpoint_host)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("public_url", &self.public_url)
            .field("region", &self.region)
            .field("path_encoding", &self.path_encoding)
            .finish()
    }
}

impl EdgesignConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`EdgesignError::InvalidSetting`] if a numeric setting is not
    /// a positive integer.
    pub fn from_env() -> EdgesignResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`EdgesignError::InvalidSetting`] if a numeric setting is not
    /// a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EdgesignResult<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = var("SERVICE_NAME") {
            config.service_name = v;
        }
        if let Some(v) = var("UPLOAD_URL_EXPIRES") {
            config.upload_url_expires = parse_seconds("UPLOAD_URL_EXPIRES", &v)?;
        }
        if let Some(v) = var("VIEW_URL_EXPIRES") {
            config.view_url_expires = parse_seconds("VIEW_URL_EXPIRES", &v)?;
        }

        let storage = &mut config.storage;
        storage.account_id = var("R2_ACCOUNT_ID");
        storage.endpoint_host = var("R2_ENDPOINT_HOST");
        if let Some(v) = var("R2_ACCESS_KEY_ID") {
            storage.access_key_id = v;
        }
        if let Some(v) = var("R2_SECRET_ACCESS_KEY") {
            storage.secret_access_key = v;
        }
        if let Some(v) = var("R2_PUBLIC_URL") {
            storage.public_url = v.trim_end_matches('/').to_owned();
        }
        if let Some(v) = var("R2_REGION") {
            storage.region = v;
        }
        if let Some(v) = var("R2_PATH_ENCODING") {
            storage.path_encoding = v.to_ascii_lowercase();
        }

        Ok(config)
    }
}

impl StorageConfig {
    /// The account-scoped endpoint host presigned URLs point at.
    ///
    /// `R2_ENDPOINT_HOST` wins; otherwise the host is derived from the
    /// account id. Returns `None` when neither is configured.
    #[must_use]
    pub fn host(&self) -> Option<String> {
        if let Some(host) = &self.endpoint_host {
            return Some(host.clone());
        }
        self.account_id
            .as_ref()
            .map(|id| format!("{id}.{R2_HOST_SUFFIX}"))
    }
}

fn parse_seconds(key: &'static str, raw: &str) -> EdgesignResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(EdgesignError::InvalidSetting {
            key,
            value: raw.to_owned(),
            reason: "must be greater than zero",
        }),
        Ok(secs) => Ok(secs),
        Err(_) => Err(EdgesignError::InvalidSetting {
            key,
            value: raw.to_owned(),
            reason: "expected a whole number of seconds",
        }),
    }
}
