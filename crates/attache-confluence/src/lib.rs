//! Confluence attachment management.
//!
//! Builds attachment endpoints, runs create/update/delete/lookup requests
//! through a [`Transport`], and reconciles local files against a page's
//! attachments (update when a same-named attachment exists, create
//! otherwise).
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use attache_config::Config;
//! use attache_confluence::AttachmentClient;
//!
//! let config = Config::load(None)?;
//! let client = AttachmentClient::from_config(&config.confluence)?;
//!
//! let report = client.upsert_attachments("123", &[Path::new("out/diagram.png")]);
//! for (path, err) in report.errors() {
//!     eprintln!("{}: {err}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoint;
mod error;
mod multipart;
mod reconcile;
mod transport;
mod types;

#[cfg(test)]
mod testing;

pub use client::AttachmentClient;
pub use endpoint::Endpoints;
pub use error::AttachmentError;
pub use multipart::MultipartBody;
pub use reconcile::{FileOutcome, UpsertAction, UpsertReport, Upserted};
pub use transport::{Method, RequestBody, Transport, TransportError, UreqTransport};
pub use types::{Attachment, AttachmentList, Metadata, Version, strip_type_prefix};
