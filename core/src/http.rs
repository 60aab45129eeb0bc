//! HTTP transport seam.
//!
//! # Design
//! Requests and responses are plain data. The executor builds an
//! `HttpRequest`, hands it to a `Transport`, and interprets the
//! `HttpResponse` it gets back; status codes are never turned into errors at
//! this layer. Tests substitute their own `Transport` to observe requests and
//! script responses or faults.

use async_trait::async_trait;

/// A transport fault, carried unchanged from the transport to the caller.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An outgoing request. Every endpoint is a GET without a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as received. An absent body is represented as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests on behalf of a `SonarQubeClient`.
///
/// Implementations must allow concurrent `send` calls. 4xx/5xx responses are
/// returned as `Ok`; only failures below HTTP (DNS, connect, TLS, I/O) are
/// `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;

    /// Frees the transport's resources. Called once by the owning client.
    fn release(&self) {}
}
