//! Endpoint logic, independent of the hyper transport.
//!
//! Each handler takes the raw request body and the instant sampled for this
//! request, and returns the response model or a [`ServiceError`].

use chrono::{DateTime, SecondsFormat, Utc};
use edgesign_sigv4::{PresignMethod, PresignRequest, Presigner};
use serde::de::DeserializeOwned;
use tracing::info;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::model::{
    HealthOutput, PresignUploadInput, PresignUploadOutput, PresignViewInput, PresignViewOutput,
};
use crate::object_key::{FileType, build_object_key};
use crate::service::EdgesignHttpConfig;

/// `GET /health`.
#[must_use]
pub fn health(config: &EdgesignHttpConfig, now: DateTime<Utc>) -> HealthOutput {
    HealthOutput {
        status: "ok",
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        service: config.service_name.clone(),
    }
}

/// `POST /api/presigned-url`: generate an object key and presign it.
///
/// # Errors
///
/// Returns a 400 error for malformed JSON, missing required fields, an
/// unknown method or an unusable file type / company id, and a 500 error when
/// the signer rejects its configuration.
pub fn presign_upload(
    presigner: &Presigner,
    config: &EdgesignHttpConfig,
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<PresignUploadOutput, ServiceError> {
    let input: PresignUploadInput = parse_json(body)?;

    let (Some(file_name), Some(_), Some(content_type), Some(file_type)) = (
        non_empty(input.file_name.as_deref()),
        non_empty(input.user_id.as_deref()),
        non_empty(input.content_type.as_deref()),
        non_empty(input.file_type.as_deref()),
    ) else {
        return Err(ServiceError::validation("Missing required fields"));
    };

    let method: PresignMethod = input.method.as_deref().unwrap_or("PUT").parse()?;
    let file_type = FileType::parse(file_type)?;
    let file_path = build_object_key(
        &file_type,
        input.company_id.as_deref(),
        file_name,
        now,
        Uuid::new_v4(),
    )?;

    let expires_in = config.expires_for(method);
    let request = PresignRequest::new(method, file_path.as_str(), expires_in)
        .with_content_type(content_type);
    let signed = presigner.presign(&request, now)?;

    info!(
        %method,
        file_path = %file_path,
        file_type = file_type.folder(),
        expires_in,
        "Issued upload URL"
    );

    Ok(PresignUploadOutput {
        success: true,
        url: signed.url,
        public_url: format!("{}/{file_path}", config.public_url),
        file_path,
        expires_in,
        expires_at: signed.expires_at.timestamp(),
        method: method.as_str().to_owned(),
    })
}

/// `POST /api/presigned-url-view`: presign a GET for an existing key.
///
/// # Errors
///
/// Returns a 400 error for malformed JSON or a missing `filePath`, and a 500
/// error when the signer rejects its configuration.
pub fn presign_view(
    presigner: &Presigner,
    config: &EdgesignHttpConfig,
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<PresignViewOutput, ServiceError> {
    let input: PresignViewInput = parse_json(body)?;
    let file_path = non_empty(input.file_path.as_deref())
        .ok_or_else(|| ServiceError::validation("filePath is required"))?;

    let method = PresignMethod::Get;
    let expires_in = config.expires_for(method);
    let signed = presigner.presign(&PresignRequest::new(method, file_path, expires_in), now)?;

    info!(file_path, expires_in, "Issued view URL");

    Ok(PresignViewOutput {
        success: true,
        url: signed.url,
        file_path: file_path.to_owned(),
        expires_in,
        expires_at: signed.expires_at.timestamp(),
        method: method.as_str().to_owned(),
    })
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::malformed_body(format!("Invalid JSON body: {e}")))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
