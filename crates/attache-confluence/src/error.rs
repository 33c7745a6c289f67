//! Error types for Confluence attachment operations.

use std::io;
use std::path::{Path, PathBuf};

use crate::transport::TransportError;

/// Error from attachment operations.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    /// Endpoint could not be built from the given root or identifiers.
    ///
    /// Never sent over the wire.
    #[error("malformed endpoint: {0}")]
    MalformedEndpoint(String),

    /// Attachment id does not carry the expected type prefix.
    #[error("unrecognized attachment id format: {0:?}")]
    UnrecognizedIdFormat(String),

    /// Local upload source cannot be opened, inspected or read.
    #[error("cannot read {}", .path.display())]
    LocalIo {
        /// Path of the local file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Response body does not match the expected shape.
    #[error("unexpected response body")]
    Decode(#[from] serde_json::Error),

    /// Service returned a well-formed but empty result set.
    #[error("not found: {0}")]
    NotFound(String),

    /// Upload succeeded but the response listed no created attachment.
    #[error("upload to content {content_id} returned no attachment")]
    EmptyCreateResponse {
        /// Content the attachment was uploaded to.
        content_id: String,
    },

    /// Transport failed, including non-2xx statuses.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl AttachmentError {
    pub(crate) fn local_io(path: &Path, source: io::Error) -> Self {
        Self::LocalIo {
            path: path.to_path_buf(),
            source,
        }
    }
}
