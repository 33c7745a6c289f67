//! Attachment endpoint URLs.
//!
//! All endpoints live under `{root}/content/{content_id}/child/attachment`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use ureq::http::Uri;

use crate::error::AttachmentError;

/// Unreserved characters per RFC 3986: A-Z a-z 0-9 - . _ ~
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds attachment endpoint URLs under a validated API root.
#[derive(Debug, Clone)]
pub struct Endpoints {
    root: String,
}

impl Endpoints {
    /// Validate an API root such as `https://confluence.example.com/rest/api`.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::MalformedEndpoint`] unless the root is an
    /// absolute http(s) URI with a host and without query or fragment.
    pub fn new(api_root: &str) -> Result<Self, AttachmentError> {
        let root = api_root.trim_end_matches('/');
        let uri: Uri = root
            .parse()
            .map_err(|e| AttachmentError::MalformedEndpoint(format!("{api_root:?}: {e}")))?;

        if !matches!(uri.scheme_str(), Some("http" | "https")) {
            return Err(AttachmentError::MalformedEndpoint(format!(
                "{api_root:?}: scheme must be http or https"
            )));
        }
        if uri.host().is_none_or(str::is_empty) {
            return Err(AttachmentError::MalformedEndpoint(format!(
                "{api_root:?}: missing host"
            )));
        }
        if uri.query().is_some() || root.contains('#') {
            return Err(AttachmentError::MalformedEndpoint(format!(
                "{api_root:?}: must not carry a query or fragment"
            )));
        }

        Ok(Self {
            root: root.to_owned(),
        })
    }

    /// API root without trailing slash.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// `{root}/content/{content_id}/child/attachment`
    pub fn collection(&self, content_id: &str) -> Result<String, AttachmentError> {
        let content_id = segment(content_id, "content id")?;
        checked(format!("{}/content/{content_id}/child/attachment", self.root))
    }

    /// `{root}/content/{content_id}/child/attachment/{attachment_id}`
    pub fn attachment(
        &self,
        content_id: &str,
        attachment_id: &str,
    ) -> Result<String, AttachmentError> {
        let collection = self.collection(content_id)?;
        let attachment_id = segment(attachment_id, "attachment id")?;
        checked(format!("{collection}/{attachment_id}"))
    }

    /// `{root}/content/{content_id}/child/attachment/{attachment_id}/data`
    pub fn data(&self, content_id: &str, attachment_id: &str) -> Result<String, AttachmentError> {
        let attachment = self.attachment(content_id, attachment_id)?;
        Ok(format!("{attachment}/data"))
    }

    /// `{root}/content/{content_id}/child/attachment?filename={filename}`
    pub fn by_filename(&self, content_id: &str, filename: &str) -> Result<String, AttachmentError> {
        if filename.is_empty() {
            return Err(AttachmentError::MalformedEndpoint(
                "filename cannot be empty".to_owned(),
            ));
        }
        let collection = self.collection(content_id)?;
        let encoded = utf8_percent_encode(filename, QUERY_ENCODE_SET);
        checked(format!("{collection}?filename={encoded}"))
    }
}

/// Validate an identifier used as a single path segment.
fn segment<'a>(value: &'a str, what: &str) -> Result<&'a str, AttachmentError> {
    if value.is_empty() {
        return Err(AttachmentError::MalformedEndpoint(format!(
            "{what} cannot be empty"
        )));
    }
    if value
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace() || c.is_control())
    {
        return Err(AttachmentError::MalformedEndpoint(format!(
            "{what} {value:?} is not a valid path segment"
        )));
    }
    Ok(value)
}

/// Make sure the assembled URL still parses.
fn checked(url: String) -> Result<String, AttachmentError> {
    match url.parse::<Uri>() {
        Ok(_) => Ok(url),
        Err(e) => Err(AttachmentError::MalformedEndpoint(format!("{url:?}: {e}"))),
    }
}
