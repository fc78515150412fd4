//! Request/response types and the transport seam.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::Result;

/// WebDAV methods issued by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DavMethod {
    Propfind,
    Get,
    Put,
    Delete,
    Move,
    Mkcol,
}

impl DavMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DavMethod::Propfind => "PROPFIND",
            DavMethod::Get => "GET",
            DavMethod::Put => "PUT",
            DavMethod::Delete => "DELETE",
            DavMethod::Move => "MOVE",
            DavMethod::Mkcol => "MKCOL",
        }
    }
}

impl fmt::Display for DavMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
pub enum RequestBody {
    Empty,
    Text(String),
    /// Chunked upload body of a known total length.
    Stream {
        length: u64,
        chunks: BoxStream<'static, std::io::Result<Bytes>>,
    },
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Text(t) => f.debug_tuple("Text").field(&t.len()).finish(),
            RequestBody::Stream { length, .. } => {
                f.debug_struct("Stream").field("length", length).finish()
            }
        }
    }
}

/// A single request against the file store.
#[derive(Debug)]
pub struct DavRequest {
    pub method: DavMethod,
    /// Percent-encoded, mount-prefixed path (e.g. `/dav/docs/a%20b.txt`)
    pub path: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: RequestBody,
}

impl DavRequest {
    pub fn new(method: DavMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Look up a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub struct DavResponse {
    pub status: u16,
    pub body: Bytes,
}

impl DavResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        super::status::DavStatus::is_success(self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes requests against a file store.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status, and [`DavError::Network`](crate::DavError::Network) only when no
/// response was obtained.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn execute(&self, request: DavRequest) -> Result<DavResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(DavMethod::Propfind.as_str(), "PROPFIND");
        assert_eq!(DavMethod::Mkcol.to_string(), "MKCOL");
    }

    #[test]
    fn test_request_builder() {
        let req = DavRequest::new(DavMethod::Move, "/dav/a.txt")
            .header("Destination", "/dav/b.txt")
            .header("Overwrite", "F");
        assert_eq!(req.header_value("destination"), Some("/dav/b.txt"));
        assert_eq!(req.header_value("Depth"), None);
        assert!(matches!(req.body, RequestBody::Empty));
    }

    #[test]
    fn test_response_helpers() {
        let ok = DavResponse::new(207, "<x/>");
        assert!(ok.is_success());
        assert_eq!(ok.text(), "<x/>");
        assert!(!DavResponse::new(404, "").is_success());
    }
}
