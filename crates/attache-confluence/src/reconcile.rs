//! Upsert-by-filename reconciliation of local files against a page.
//!
//! For each file the page's attachments are looked up by base name. A match
//! is updated in place as a minor edit; otherwise a new attachment is created.
//! Files are processed one at a time and a failure never stops the batch.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::client::AttachmentClient;
use crate::error::AttachmentError;
use crate::multipart::upload_name;
use crate::transport::Transport;
use crate::types::{Attachment, strip_type_prefix};

/// What reconciliation did with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    /// No attachment with the file's name existed; a new one was uploaded.
    Created,
    /// An attachment with the file's name existed and got new data.
    Updated,
}

/// Successful upsert of one file.
#[derive(Debug, Clone)]
pub struct Upserted {
    /// Attachment as returned by the service.
    pub attachment: Attachment,
    /// Whether the attachment was created or updated.
    pub action: UpsertAction,
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct FileOutcome {
    /// Input path, as given.
    pub path: PathBuf,
    /// Upserted attachment or the error that stopped this file.
    pub result: Result<Upserted, AttachmentError>,
}

/// Outcomes of a batch, aligned with the input order.
#[derive(Debug, Default)]
pub struct UpsertReport {
    /// One outcome per input file.
    pub outcomes: Vec<FileOutcome>,
}

impl UpsertReport {
    /// Successfully upserted attachments.
    pub fn successes(&self) -> impl Iterator<Item = &Upserted> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Files that failed, with their errors.
    pub fn errors(&self) -> impl Iterator<Item = (&Path, &AttachmentError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.path.as_path(), e)))
    }

    /// Whether every file was upserted.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

impl<T: Transport> AttachmentClient<T> {
    /// Upsert every file as an attachment of `content_id`.
    ///
    /// Continues past failures; the report holds exactly one outcome per
    /// input file, in input order.
    pub fn upsert_attachments<P: AsRef<Path>>(
        &self,
        content_id: &str,
        files: &[P],
    ) -> UpsertReport {
        let outcomes: Vec<FileOutcome> = files
            .iter()
            .map(|file| {
                let path = file.as_ref();
                let result = self.upsert_attachment(content_id, path);
                if let Err(e) = &result {
                    warn!(path = %path.display(), error = %e, "Attachment upsert failed");
                }
                FileOutcome {
                    path: path.to_path_buf(),
                    result,
                }
            })
            .collect();

        let report = UpsertReport { outcomes };
        info!(
            "Upserted {} of {} attachments on content {}",
            report.successes().count(),
            report.outcomes.len(),
            content_id
        );
        report
    }

    /// Upsert a single file: update the same-named attachment or create one.
    ///
    /// Only a `NotFound` lookup leads to creation; any other lookup error is
    /// returned as is.
    pub fn upsert_attachment(
        &self,
        content_id: &str,
        path: &Path,
    ) -> Result<Upserted, AttachmentError> {
        let filename = upload_name(path)?;

        match self.get_by_filename(content_id, filename) {
            Ok(existing) => {
                let attachment_id = strip_type_prefix(&existing.id)?;
                let attachment = self.update(content_id, attachment_id, path, true)?;
                Ok(Upserted {
                    attachment,
                    action: UpsertAction::Updated,
                })
            }
            Err(AttachmentError::NotFound(_)) => {
                let attachment = self.create(content_id, path)?;
                Ok(Upserted {
                    attachment,
                    action: UpsertAction::Created,
                })
            }
            Err(e) => Err(e),
        }
    }
}
