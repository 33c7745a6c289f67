//! Confluence attachment types.

use serde::{Deserialize, Serialize};

use crate::error::AttachmentError;

/// Prefix the service puts in front of numeric attachment ids.
const ATTACHMENT_ID_PREFIX: &str = "att";

/// Confluence attachment.
///
/// Only `id` and `title` are required. Serde ignores unknown fields from the
/// API response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attachment {
    /// Attachment ID, including the `att` type prefix.
    pub id: String,
    /// Content type (always "attachment").
    #[serde(rename = "type", default)]
    pub content_type: String,
    /// Content status, e.g. "current".
    #[serde(default)]
    pub status: String,
    /// Attachment title/filename.
    pub title: String,
    /// Attachment metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Version information.
    #[serde(default)]
    pub version: Version,
}

impl Attachment {
    /// Attachment id without its type prefix, usable as a path segment.
    pub fn stripped_id(&self) -> Result<&str, AttachmentError> {
        strip_type_prefix(&self.id)
    }

    /// MIME type reported by the service.
    pub fn media_type(&self) -> &str {
        &self.metadata.media_type
    }

    /// Version number, bumped by every successful update.
    pub fn version_number(&self) -> u32 {
        self.version.number
    }
}

/// Attachment metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Metadata {
    /// Upload comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// MIME type.
    #[serde(rename = "mediaType", default)]
    pub media_type: String,
}

/// Attachment version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    #[serde(default)]
    pub number: u32,
}

/// Attachments API response.
///
/// `size` is informational; the length of `results` is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttachmentList {
    /// List of attachments.
    pub results: Vec<Attachment>,
    /// Count reported by the service.
    #[serde(default)]
    pub size: usize,
}

impl AttachmentList {
    /// First attachment in the list, if any.
    pub fn into_first(self) -> Option<Attachment> {
        self.results.into_iter().next()
    }
}

/// Remove the `att` type prefix from an attachment id.
///
/// The remainder must be a non-empty run of ASCII digits.
pub fn strip_type_prefix(id: &str) -> Result<&str, AttachmentError> {
    id.strip_prefix(ATTACHMENT_ID_PREFIX)
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| AttachmentError::UnrecognizedIdFormat(id.to_owned()))
}
