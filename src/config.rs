//! Client configuration.
//!
//! A [`DavConfig`] names the server, the WebDAV mount under which every
//! remote path lives, and where the companion editor is served. It can be
//! saved to and loaded from a JSON file.

use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{DavError, Result};
use crate::fs::path::{encode_path, normalize};

/// Default mount point of the file-access protocol on the server.
pub const DEFAULT_MOUNT: &str = "/dav";

/// Default location of the companion editor page.
pub const DEFAULT_EDITOR_PATH: &str = "/editor.html";

/// Default upload chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Query parameter carrying the initial directory on the launch URL.
pub const LAUNCH_DIR_PARAM: &str = "dir";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DavConfig {
    /// Scheme and authority of the server, e.g. `http://192.168.4.1`
    pub base_url: String,
    /// Path prefix of the WebDAV mount
    pub mount: String,
    /// Path of the companion editor page
    pub editor_path: String,
    /// Size of each upload chunk reported to progress callbacks
    pub upload_chunk_size: usize,
    /// Optional HTTP/SOCKS proxy URL
    pub proxy: Option<String>,
}

impl Default for DavConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            mount: DEFAULT_MOUNT.to_string(),
            editor_path: DEFAULT_EDITOR_PATH.to_string(),
            upload_chunk_size: DEFAULT_CHUNK_SIZE,
            proxy: None,
        }
    }
}

impl DavConfig {
    /// Configuration for a server with every other setting defaulted.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Check the values and canonicalize `base_url` and `mount`.
    pub fn validated(mut self) -> Result<Self> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| DavError::Config(format!("invalid base_url {}: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DavError::Config(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }
        if self.upload_chunk_size == 0 {
            return Err(DavError::Config(
                "upload_chunk_size must be positive".to_string(),
            ));
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self.mount = mount_prefix(&self.mount);
        Ok(self)
    }

    /// Mount-prefixed, percent-encoded wire path for a remote path.
    pub fn resource_path(&self, path: &str) -> String {
        format!("{}{}", mount_prefix(&self.mount), encode_path(path))
    }

    /// Absolute URL for a wire path produced by [`resource_path`](Self::resource_path).
    pub fn absolute_url(&self, wire_path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), wire_path)
    }

    /// Companion editor URL for a file.
    pub fn editor_url(&self, file_path: &str, extension: &str) -> String {
        format!(
            "{}?file={}&type={}",
            self.editor_path,
            urlencoding::encode(file_path),
            urlencoding::encode(extension)
        )
    }

    /// Initial directory from a launch URL (`...?dir=/docs`), else `/`.
    ///
    /// Accepts either a full URL or just its query string.
    pub fn initial_directory_from_url(launch: &str) -> String {
        let query = match Url::parse(launch) {
            Ok(url) => url.query().unwrap_or_default().to_string(),
            Err(_) => launch.trim_start_matches('?').to_string(),
        };
        let dir = Url::parse(&format!("http://launch/?{}", query))
            .ok()
            .and_then(|url| {
                url.query_pairs()
                    .find(|(k, _)| k == LAUNCH_DIR_PARAM)
                    .map(|(_, v)| v.into_owned())
            })
            .filter(|v| !v.is_empty());
        normalize(dir.as_deref().unwrap_or("/"))
    }

    /// Save configuration to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from a JSON file.
    ///
    /// Returns `None` if the file doesn't exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        Ok(Some(config.validated()?))
    }
}

/// `/dav`, `dav/`, `/dav/` all become `/dav`; an empty mount stays empty.
fn mount_prefix(mount: &str) -> String {
    let trimmed = mount.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
