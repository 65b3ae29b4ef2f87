//! JSON request and response bodies.
//!
//! Field names are camelCase on the wire. Request fields are all optional at
//! the serde level so that a missing field produces the service's own
//! validation message instead of a deserializer error.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/presigned-url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignUploadInput {
    /// Original client file name; only its extension is kept.
    pub file_name: Option<String>,
    /// Id of the uploading user.
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    /// Content type the client will upload with.
    pub content_type: Option<String>,
    /// Upload category, e.g. `campaign-images`.
    pub file_type: Option<String>,
    /// Method to presign; `PUT` when absent.
    pub method: Option<String>,
    /// Owning company, required for `campaign-images`.
    #[serde(default, deserialize_with = "string_or_number")]
    pub company_id: Option<String>,
    /// Product name (informational).
    pub product_name: Option<String>,
    /// Company name (informational).
    pub company_name: Option<String>,
}

/// Response of `POST /api/presigned-url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignUploadOutput {
    pub success: bool,
    pub url: String,
    pub file_path: String,
    pub public_url: String,
    pub expires_in: u64,
    /// Unix seconds.
    pub expires_at: i64,
    pub method: String,
}

/// Body of `POST /api/presigned-url-view`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignViewInput {
    /// Key of an existing object.
    pub file_path: Option<String>,
}

/// Response of `POST /api/presigned-url-view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignViewOutput {
    pub success: bool,
    pub url: String,
    pub file_path: String,
    pub expires_in: u64,
    /// Unix seconds.
    pub expires_at: i64,
    pub method: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthOutput {
    pub status: &'static str,
    /// RFC 3339.
    pub timestamp: String,
    pub service: String,
}

/// Error envelope for API failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub error: String,
}

/// Body of a 404.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFoundOutput {
    pub error: &'static str,
    pub path: String,
}

/// Accept ids sent either as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    }))
}
