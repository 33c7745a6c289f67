//! Confluence attachment REST client.
//!
//! Sync client for the Confluence Server/Data Center attachment endpoints.
//! Every call is a single request/response exchange through the
//! [`Transport`]; nothing is cached between calls.

mod attachments;

use attache_config::ConfluenceConfig;

use crate::endpoint::Endpoints;
use crate::error::AttachmentError;
use crate::transport::{Transport, UreqTransport};

/// Confluence attachment client.
pub struct AttachmentClient<T> {
    transport: T,
    endpoints: Endpoints,
}

impl AttachmentClient<UreqTransport> {
    /// Create client with a [`UreqTransport`] from config values.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::MalformedEndpoint`] if the configured API root
    /// is not a usable http(s) URL.
    pub fn from_config(config: &ConfluenceConfig) -> Result<Self, AttachmentError> {
        Self::new(&config.api_url(), UreqTransport::from_config(config))
    }
}

impl<T: Transport> AttachmentClient<T> {
    /// Create client for an API root such as `https://host/rest/api`.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::MalformedEndpoint`] if `api_root` is malformed.
    pub fn new(api_root: &str, transport: T) -> Result<Self, AttachmentError> {
        Ok(Self {
            transport,
            endpoints: Endpoints::new(api_root)?,
        })
    }
}
