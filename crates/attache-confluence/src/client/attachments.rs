//! Attachment operations for Confluence API.

use std::path::Path;

use tracing::info;

use super::AttachmentClient;
use crate::error::AttachmentError;
use crate::multipart::MultipartBody;
use crate::transport::{Method, Transport};
use crate::types::{Attachment, AttachmentList};

impl<T: Transport> AttachmentClient<T> {
    /// Get attachment by id.
    ///
    /// `attachment_id` is the id without its `att` prefix.
    pub fn get(
        &self,
        content_id: &str,
        attachment_id: &str,
    ) -> Result<Attachment, AttachmentError> {
        let url = self.endpoints.attachment(content_id, attachment_id)?;
        let body = self.transport.send(Method::Get, &url, None)?;
        let list: AttachmentList = serde_json::from_slice(&body)?;
        list.into_first().ok_or_else(|| {
            AttachmentError::NotFound(format!(
                "attachment {attachment_id} on content {content_id}"
            ))
        })
    }

    /// Find attachment by filename on a page.
    ///
    /// When several attachments share the filename, the first one returned by
    /// the service wins.
    pub fn get_by_filename(
        &self,
        content_id: &str,
        filename: &str,
    ) -> Result<Attachment, AttachmentError> {
        let url = self.endpoints.by_filename(content_id, filename)?;
        let body = self.transport.send(Method::Get, &url, None)?;
        let list: AttachmentList = serde_json::from_slice(&body)?;
        list.into_first().ok_or_else(|| {
            AttachmentError::NotFound(format!(
                "attachment '{filename}' on content {content_id}"
            ))
        })
    }

    /// List attachments on a page.
    ///
    /// Returns the single page of results the service sends back.
    pub fn list(&self, content_id: &str) -> Result<Vec<Attachment>, AttachmentError> {
        let url = self.endpoints.collection(content_id)?;

        info!("Getting attachments for content {}", content_id);

        let body = self.transport.send(Method::Get, &url, None)?;
        let list: AttachmentList = serde_json::from_slice(&body)?;
        Ok(list.results)
    }

    /// Delete attachment.
    ///
    /// The service answers with an empty body, so success means the transport
    /// reported no error.
    pub fn delete(&self, content_id: &str, attachment_id: &str) -> Result<(), AttachmentError> {
        let url = self.endpoints.attachment(content_id, attachment_id)?;

        info!(
            "Deleting attachment {} from content {}",
            attachment_id, content_id
        );

        self.transport.send(Method::Delete, &url, None)?;
        Ok(())
    }

    /// Upload a new attachment.
    ///
    /// The service answers with a list even for a single upload; the first
    /// element is the created attachment.
    pub fn create(&self, content_id: &str, path: &Path) -> Result<Attachment, AttachmentError> {
        let url = self.endpoints.collection(content_id)?;
        let form = MultipartBody::from_file(path, None)?;

        info!(
            "Uploading new attachment '{}' to content {}",
            path.display(),
            content_id
        );

        let body = self
            .transport
            .send(Method::Post, &url, Some(form.request_body()))?;
        let list: AttachmentList = serde_json::from_slice(&body)?;
        list.into_first()
            .ok_or_else(|| AttachmentError::EmptyCreateResponse {
                content_id: content_id.to_owned(),
            })
    }

    /// Upload new data for an existing attachment.
    ///
    /// `attachment_id` is the id without its `att` prefix. The response is a
    /// single attachment object, not a list.
    pub fn update(
        &self,
        content_id: &str,
        attachment_id: &str,
        path: &Path,
        minor_edit: bool,
    ) -> Result<Attachment, AttachmentError> {
        let url = self.endpoints.data(content_id, attachment_id)?;
        let form = MultipartBody::from_file(path, Some(minor_edit))?;

        info!(
            "Updating existing attachment '{}' (id={})",
            path.display(),
            attachment_id
        );

        let body = self
            .transport
            .send(Method::Post, &url, Some(form.request_body()))?;
        Ok(serde_json::from_slice(&body)?)
    }
}
