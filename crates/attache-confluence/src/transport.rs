//! HTTP transport seam.
//!
//! Attachment operations talk to the service only through [`Transport`].
//! [`UreqTransport`] is the blocking implementation used in production;
//! tests substitute in-memory fakes.

use std::fmt;
use std::time::Duration;

use attache_config::{AuthConfig, ConfluenceConfig};
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use tracing::debug;
use ureq::{Agent, RequestBuilder};

/// HTTP method used by attachment operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

/// Request payload with its content type.
#[derive(Debug, Clone, Copy)]
pub struct RequestBody<'a> {
    /// Value of the `Content-Type` header.
    pub content_type: &'a str,
    /// Raw body bytes.
    pub data: &'a [u8],
}

/// Error from the transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    Request(#[from] ureq::Error),

    /// HTTP response error (server returned non-2xx status).
    #[error("HTTP error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },
}

/// Executes a single authenticated request and returns the response body.
///
/// Implementations own authentication, connection reuse, timeouts and
/// status handling. A non-2xx status must come back as an error.
pub trait Transport {
    /// Send one request. `body` is `None` for `GET` and `DELETE`.
    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<RequestBody<'_>>,
    ) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<RequestBody<'_>>,
    ) -> Result<Vec<u8>, TransportError> {
        (**self).send(method, url, body)
    }
}

/// Blocking transport on a shared `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
    authorization: Option<String>,
}

impl UreqTransport {
    /// Create transport from config values.
    pub fn from_config(config: &ConfluenceConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            authorization: config.auth.as_ref().map(authorization_header),
        }
    }

    fn prepare<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        let request = request
            .header("X-Atlassian-Token", "nocheck")
            .header("Accept", "application/json");
        match &self.authorization {
            Some(value) => request.header("Authorization", value),
            None => request,
        }
    }
}

impl Transport for UreqTransport {
    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<RequestBody<'_>>,
    ) -> Result<Vec<u8>, TransportError> {
        debug!("{method} {url}");

        let response = match (method, body) {
            (Method::Get, _) => self.prepare(self.agent.get(url)).call()?,
            (Method::Delete, _) => self.prepare(self.agent.delete(url)).call()?,
            (Method::Post, Some(body)) => self
                .prepare(self.agent.post(url))
                .header("Content-Type", body.content_type)
                .send(body.data)?,
            (Method::Post, None) => self.prepare(self.agent.post(url)).send_empty()?,
        };

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if !(200..300).contains(&status) {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(TransportError::Status {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_to_vec()?)
    }
}

/// `Authorization` header value for the configured credentials.
fn authorization_header(auth: &AuthConfig) -> String {
    match auth {
        AuthConfig::Basic { username, password } => {
            let credentials = BASE64_STANDARD.encode(format!("{username}:{password}"));
            format!("Basic {credentials}")
        }
        AuthConfig::Bearer { token } => format!("Bearer {token}"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;

    /// Answer one request on a loopback port with a canned response.
    ///
    /// Returns the server's base URL and a handle yielding the raw request.
    fn serve_once(response: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                request.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();
            request.push_str(&String::from_utf8_lossy(&body));

            reader.get_mut().write_all(response.as_bytes()).unwrap();
            request
        });

        (base_url, handle)
    }

    fn transport_for(base_url: &str, auth: Option<AuthConfig>) -> UreqTransport {
        let mut config = ConfluenceConfig::new(base_url);
        config.timeout_secs = 5;
        config.auth = auth;
        UreqTransport::from_config(&config)
    }

    #[test]
    fn test_send_post_returns_body_and_sets_headers() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
             Content-Length: 14\r\nConnection: close\r\n\r\n{\"results\":[]}",
        );
        let transport = transport_for(
            &base_url,
            Some(AuthConfig::Bearer {
                token: "pat-123".to_owned(),
            }),
        );

        let body = RequestBody {
            content_type: "multipart/form-data; boundary=xyz",
            data: b"payload",
        };
        let response = transport
            .send(
                Method::Post,
                &format!("{base_url}/rest/api/content/123/child/attachment"),
                Some(body),
            )
            .unwrap();
        assert_eq!(response, b"{\"results\":[]}".to_vec());

        let request = server.join().unwrap();
        assert!(
            request.starts_with("POST /rest/api/content/123/child/attachment HTTP/1.1\r\n"),
            "got {request}"
        );
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("\r\nx-atlassian-token: nocheck\r\n"), "got {request}");
        assert!(lower.contains("\r\naccept: application/json\r\n"), "got {request}");
        assert!(lower.contains("\r\nauthorization: bearer pat-123\r\n"), "got {request}");
        assert!(
            lower.contains("\r\ncontent-type: multipart/form-data; boundary=xyz\r\n"),
            "got {request}"
        );
        assert!(request.ends_with("\r\n\r\npayload"), "got {request}");
    }

    #[test]
    fn test_send_maps_error_status_with_body() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\n\
             Content-Length: 25\r\nConnection: close\r\n\r\nNo attachment with id 999",
        );
        let transport = transport_for(&base_url, None);

        let err = transport
            .send(Method::Delete, &format!("{base_url}/rest/api/content/999"), None)
            .unwrap_err();
        match err {
            TransportError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "No attachment with id 999");
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let request = server.join().unwrap();
        assert!(request.starts_with("DELETE /rest/api/content/999 HTTP/1.1\r\n"));
        assert!(!request.to_ascii_lowercase().contains("\r\nauthorization:"));
    }

    #[test]
    fn test_send_no_content_is_empty_body() {
        let (base_url, server) =
            serve_once("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n");
        let transport = transport_for(&base_url, None);

        let response = transport
            .send(Method::Get, &format!("{base_url}/rest/api/content/1"), None)
            .unwrap();
        assert!(response.is_empty());
        assert!(server.join().unwrap().starts_with("GET /rest/api/content/1 HTTP/1.1\r\n"));
    }

    #[test]
    fn test_basic_authorization_header() {
        let auth = AuthConfig::Basic {
            username: "Aladdin".to_owned(),
            password: "open sesame".to_owned(),
        };
        assert_eq!(
            authorization_header(&auth),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn test_bearer_authorization_header() {
        let auth = AuthConfig::Bearer {
            token: "pat-123".to_owned(),
        };
        assert_eq!(authorization_header(&auth), "Bearer pat-123");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_status_error_message_keeps_body() {
        let err = TransportError::Status {
            status: 404,
            body: "No attachment with id 999".to_owned(),
        };
        assert_eq!(err.to_string(), "HTTP error: 404 - No attachment with id 999");
    }

    #[test]
    fn test_from_config_without_auth() {
        let transport = UreqTransport::from_config(&ConfluenceConfig::new(
            "https://confluence.example.com",
        ));
        assert!(transport.authorization.is_none());
    }
}
