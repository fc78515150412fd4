//! HTTP transport for WebDAV requests.

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Method};
use tracing::debug;

use crate::config::DavConfig;
use crate::dav::request::{DavRequest, DavResponse, RequestBody, Transport};
use crate::error::{DavError, Result};

/// HTTP client for making requests to a WebDAV server.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client for `base_url` (scheme and authority).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a new HTTP client with a proxy.
    pub fn with_proxy(base_url: impl Into<String>, proxy: &str) -> Result<Self> {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| DavError::Config(format!("Invalid proxy: {}", e)))?;

        let client = Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| DavError::Config(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from a configuration, honouring its proxy setting.
    pub fn from_config(config: &DavConfig) -> Result<Self> {
        match &config.proxy {
            Some(proxy) => Self::with_proxy(config.base_url.clone(), proxy),
            None => Ok(Self::new(config.base_url.clone())),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Destination` must be an absolute URI; servers reject bare paths.
    fn header_value(&self, name: &str, value: String) -> String {
        if name.eq_ignore_ascii_case("Destination") && value.starts_with('/') {
            format!("{}{}", self.base_url, value)
        } else {
            value
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: DavRequest) -> Result<DavResponse> {
        let method = Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| DavError::Config(format!("Invalid method: {}", e)))?;
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(method, &url);
        for (name, value) in request.headers {
            let value = self.header_value(name, value);
            builder = builder.header(name, value);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Text(text) => builder
                .header(CONTENT_TYPE, "application/xml; charset=utf-8")
                .body(text),
            RequestBody::Stream { length, chunks } => builder
                .header(CONTENT_LENGTH, length)
                .body(Body::wrap_stream(chunks)),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                DavError::Request(e)
            } else {
                DavError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DavError::Network(e.to_string()))?;
        debug!(status, bytes = body.len(), "received response");

        Ok(DavResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new("http://cam.local/");
        assert_eq!(client.base_url(), "http://cam.local");
    }

    #[test]
    fn test_proxy_creation() {
        let client = HttpClient::with_proxy("http://cam.local", "http://127.0.0.1:8080");
        assert!(client.is_ok());
    }

    #[test]
    fn test_proxy_invalid() {
        let res = HttpClient::with_proxy("http://cam.local", ":::::::");
        assert!(res.is_err());
    }

    #[test]
    fn test_from_config() {
        let mut config = DavConfig::new("http://cam.local");
        assert!(HttpClient::from_config(&config).is_ok());
        config.proxy = Some(":::::::".into());
        assert!(HttpClient::from_config(&config).is_err());
    }

    #[test]
    fn test_destination_made_absolute() {
        let client = HttpClient::new("http://cam.local");
        assert_eq!(
            client.header_value("Destination", "/dav/b.txt".into()),
            "http://cam.local/dav/b.txt"
        );
        assert_eq!(
            client.header_value("Destination", "http://other/dav/b.txt".into()),
            "http://other/dav/b.txt"
        );
        assert_eq!(client.header_value("Depth", "1".into()), "1");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = HttpClient::new("http://127.0.0.1:9");
        let err = client
            .execute(DavRequest::new(crate::dav::DavMethod::Propfind, "/dav/"))
            .await
            .unwrap_err();
        assert!(matches!(err, DavError::Network(_)));
    }
}
