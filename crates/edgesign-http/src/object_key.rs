//! Object-key layout for uploads.
//!
//! Keys are generated server-side; the client's file name only contributes
//! its extension. Layout by file type:
//!
//! ```text
//! campaign-images/{companyId}/product/{timestamp}_{uuid}{ext}
//! business-registration/{timestamp}_{uuid}{ext}
//! {fileType}/{timestamp}_{uuid}{ext}
//! ```
//!
//! `timestamp` is the upload instant in KST (UTC+9) as `YYYYMMDDhhmmssSSS`.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::ServiceError;

/// KST is a fixed UTC+9 offset with no daylight saving.
const KST_OFFSET_HOURS: i64 = 9;

/// Upload category chosen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileType {
    /// Product images attached to a company's campaign.
    CampaignImages,
    /// Business registration certificates.
    BusinessRegistration,
    /// Any other top-level folder.
    Other(String),
}

impl FileType {
    /// Parse a client-supplied file type.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the value is empty, is a `.`/`..`
    /// segment, or contains `/`.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw {
            "campaign-images" => Ok(Self::CampaignImages),
            "business-registration" => Ok(Self::BusinessRegistration),
            other if is_single_segment(other) => Ok(Self::Other(other.to_owned())),
            other => Err(ServiceError::validation(format!("Invalid fileType: {other}"))),
        }
    }

    /// The top-level folder for this type.
    #[must_use]
    pub fn folder(&self) -> &str {
        match self {
            Self::CampaignImages => "campaign-images",
            Self::BusinessRegistration => "business-registration",
            Self::Other(folder) => folder,
        }
    }
}

/// Build the storage key for a new upload.
///
/// # Errors
///
/// Returns a validation error when a campaign image has no usable
/// `company_id`.
pub fn build_object_key(
    file_type: &FileType,
    company_id: Option<&str>,
    file_name: &str,
    now: DateTime<Utc>,
    id: Uuid,
) -> Result<String, ServiceError> {
    let stem = format!("{}_{id}{}", kst_timestamp(now), file_extension(file_name));

    match file_type {
        FileType::CampaignImages => {
            let company_id = company_id
                .filter(|c| !c.is_empty())
                .ok_or_else(|| ServiceError::validation("companyId is required for campaign-images"))?;
            if !is_single_segment(company_id) {
                return Err(ServiceError::validation(format!(
                    "Invalid companyId: {company_id}"
                )));
            }
            Ok(format!("campaign-images/{company_id}/product/{stem}"))
        }
        FileType::BusinessRegistration | FileType::Other(_) => {
            Ok(format!("{}/{stem}", file_type.folder()))
        }
    }
}

/// Format `now` in KST as `YYYYMMDDhhmmssSSS`.
#[must_use]
pub fn kst_timestamp(now: DateTime<Utc>) -> String {
    (now.naive_utc() + Duration::hours(KST_OFFSET_HOURS))
        .format("%Y%m%d%H%M%S%3f")
        .to_string()
}

/// The extension of `file_name` including the leading dot.
///
/// Empty when there is no dot or the text after the last dot contains `/`.
#[must_use]
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if !file_name[idx..].contains('/') => &file_name[idx..],
        _ => "",
    }
}

fn is_single_segment(value: &str) -> bool {
    !value.is_empty() && value != "." && value != ".." && !value.contains('/')
}
