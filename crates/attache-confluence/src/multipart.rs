//! `multipart/form-data` upload bodies.

use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::path::Path;

use rand::RngExt;

use crate::error::AttachmentError;
use crate::transport::RequestBody;

/// Upload body holding one `file` part and optional text fields.
#[derive(Debug)]
pub struct MultipartBody {
    content_type: String,
    data: Vec<u8>,
}

impl MultipartBody {
    /// Build an upload body from a local file.
    ///
    /// The part filename is the file's base name. `minor_edit` adds the
    /// `minorEdit` field used by the update endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::LocalIo`] if the file cannot be opened or read.
    pub fn from_file(path: &Path, minor_edit: Option<bool>) -> Result<Self, AttachmentError> {
        let filename = upload_name(path)?;

        let mut file = File::open(path).map_err(|e| AttachmentError::local_io(path, e))?;
        let metadata = file
            .metadata()
            .map_err(|e| AttachmentError::local_io(path, e))?;
        if metadata.is_dir() {
            return Err(AttachmentError::local_io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
            ));
        }

        let boundary = format!("----AttacheFormBoundary{:016x}", rand::rng().random::<u64>());
        let capacity = usize::try_from(metadata.len()).unwrap_or(0) + 512;
        let mut data = Vec::with_capacity(capacity);

        data.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        data.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                encode_filename(filename)
            )
            .as_bytes(),
        );
        data.extend_from_slice(
            format!("Content-Type: {}\r\n\r\n", guess_media_type(filename)).as_bytes(),
        );
        io::copy(&mut file, &mut data).map_err(|e| AttachmentError::local_io(path, e))?;
        data.extend_from_slice(b"\r\n");

        if let Some(minor_edit) = minor_edit {
            data.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            data.extend_from_slice(b"Content-Disposition: form-data; name=\"minorEdit\"\r\n\r\n");
            data.extend_from_slice(minor_edit.to_string().as_bytes());
            data.extend_from_slice(b"\r\n");
        }

        data.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Ok(Self {
            content_type: format!("multipart/form-data; boundary={boundary}"),
            data,
        })
    }

    /// Value for the request `Content-Type` header.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Encoded body.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn request_body(&self) -> RequestBody<'_> {
        RequestBody {
            content_type: &self.content_type,
            data: &self.data,
        }
    }
}

/// Base name of a local upload source, used as the attachment title.
pub(crate) fn upload_name(path: &Path) -> Result<&str, AttachmentError> {
    path.file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| {
            AttachmentError::local_io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "no UTF-8 file name"),
            )
        })
}

/// Percent-encode the characters that would end the quoted `filename`
/// parameter or the header line, as RFC 7578 section 4.2 allows.
fn encode_filename(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn guess_media_type(filename: &str) -> mime_guess::Mime {
    mime_guess::from_path(filename).first_or_octet_stream()
}
