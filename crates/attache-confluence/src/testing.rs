//! Recording transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::transport::{Method, RequestBody, Transport, TransportError};

/// Request captured by [`RecordingTransport`].
#[derive(Debug, Clone)]
pub(crate) struct SentRequest {
    pub method: Method,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl SentRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    responses: RefCell<VecDeque<Result<Vec<u8>, TransportError>>>,
    requests: RefCell<Vec<SentRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(body.as_bytes().to_vec()));
        self
    }

    pub fn fail(self, status: u16, body: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(TransportError::Status {
                status,
                body: body.to_owned(),
            }));
        self
    }

    pub fn requests(&self) -> Vec<SentRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<RequestBody<'_>>,
    ) -> Result<Vec<u8>, TransportError> {
        self.requests.borrow_mut().push(SentRequest {
            method,
            url: url.to_owned(),
            content_type: body.map(|b| b.content_type.to_owned()),
            body: body.map(|b| b.data.to_vec()).unwrap_or_default(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("no response queued for {method} {url}"))
    }
}

/// One attachment as the service returns it.
pub(crate) fn attachment_json(id: &str, title: &str, version: u32) -> String {
    format!(
        r#"{{"id":"{id}","type":"attachment","status":"current","title":"{title}","metadata":{{"mediaType":"image/png"}},"version":{{"number":{version}}}}}"#
    )
}

/// Attachment list envelope around the given items.
pub(crate) fn list_json(items: &[String]) -> String {
    format!(
        r#"{{"results":[{}],"size":{}}}"#,
        items.join(","),
        items.len()
    )
}
