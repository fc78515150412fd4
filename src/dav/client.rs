//! WebDAV protocol client.

use std::io;
use std::path::Path;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use super::multistatus::{entries_from_records, parse_multistatus, ListingRecord};
use super::request::{DavMethod, DavRequest, DavResponse, RequestBody, Transport};
use crate::config::DavConfig;
use crate::error::{DavError, Result};
use crate::fs::Entry;
use crate::http::HttpClient;
use crate::progress::ProgressCallback;

/// Client for the file-access protocol mounted at [`DavConfig::mount`].
///
/// All paths given to this client are remote paths relative to the mount
/// (`/docs/report.txt`, `/docs/`); the mount prefix and percent-encoding are
/// added here. The client never retries: a failed call surfaces once.
#[derive(Clone)]
pub struct DavClient {
    transport: Arc<dyn Transport>,
    config: Arc<DavConfig>,
}

impl std::fmt::Debug for DavClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DavClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DavClient {
    /// Create a client over any transport.
    pub fn new(transport: Arc<dyn Transport>, config: DavConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    /// Create a client talking HTTP to the configured server.
    ///
    /// # Example
    /// ```no_run
    /// use davlib::{DavClient, DavConfig};
    ///
    /// # async fn example() -> davlib::Result<()> {
    /// let client = DavClient::connect(DavConfig::new("http://192.168.4.1"))?;
    /// for record in client.list("/").await? {
    ///     println!("{}", record.href);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(config: DavConfig) -> Result<Self> {
        let config = config.validated()?;
        let http = HttpClient::from_config(&config)?;
        Ok(Self::new(Arc::new(http), config))
    }

    pub fn config(&self) -> &DavConfig {
        &self.config
    }

    /// Execute a request and turn non-2xx answers into [`DavError::Transport`].
    async fn send(&self, request: DavRequest) -> Result<DavResponse> {
        let method = request.method;
        let wire_path = request.path.clone();
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            debug!(%method, path = %wire_path, status = response.status, "request failed");
            return Err(DavError::Transport {
                status: response.status,
                body: response.text(),
            });
        }
        Ok(response)
    }

    fn request(&self, method: DavMethod, path: &str) -> DavRequest {
        DavRequest::new(method, self.config.resource_path(path))
    }

    /// List a collection one level deep (`PROPFIND`, `Depth: 1`).
    ///
    /// The first record is always the collection itself.
    pub async fn list(&self, path: &str) -> Result<Vec<ListingRecord>> {
        let request = self
            .request(DavMethod::Propfind, path)
            .header("Depth", "1");
        let response = self.send(request).await?;
        let records = parse_multistatus(&response.text())?;
        debug!(path, records = records.len(), "listed collection");
        Ok(records)
    }

    /// List a collection and return its children as entries.
    pub async fn list_entries(&self, path: &str) -> Result<Vec<Entry>> {
        let records = self.list(path).await?;
        Ok(entries_from_records(&records))
    }

    /// Fetch the contents of a file.
    pub async fn download(&self, path: &str) -> Result<Bytes> {
        let response = self.send(self.request(DavMethod::Get, path)).await?;
        Ok(response.body)
    }

    /// Fetch a file and save it locally, returning the number of bytes written.
    pub async fn download_to<P: AsRef<Path>>(&self, path: &str, local: P) -> Result<u64> {
        let data = self.download(path).await?;
        tokio::fs::write(local.as_ref(), &data).await?;
        info!(path, bytes = data.len(), "downloaded");
        Ok(data.len() as u64)
    }

    /// Upload `payload` to a file path (`PUT`).
    ///
    /// The payload is streamed in chunks of [`DavConfig::upload_chunk_size`];
    /// `on_progress` receives the running byte count as the transport takes
    /// each chunk.
    pub async fn store(
        &self,
        path: &str,
        payload: Bytes,
        on_progress: Option<ProgressCallback>,
    ) -> Result<()> {
        check_file_path(path)?;
        let length = payload.len() as u64;
        let chunks = stream::iter(chunk_payload(payload, self.config.upload_chunk_size))
            .map(Ok)
            .boxed();
        self.store_stream(path, length, chunks, on_progress).await
    }

    /// Upload a local file to a file path (`PUT`), reading it from disk one
    /// chunk at a time. Returns the number of bytes sent.
    pub async fn store_file<P: AsRef<Path>>(
        &self,
        path: &str,
        local: P,
        on_progress: Option<ProgressCallback>,
    ) -> Result<u64> {
        check_file_path(path)?;
        let file = File::open(local.as_ref()).await?;
        let length = file.metadata().await?.len();
        let chunks = file_chunks(file, length, self.config.upload_chunk_size);
        self.store_stream(path, length, chunks, on_progress).await?;
        Ok(length)
    }

    async fn store_stream(
        &self,
        path: &str,
        length: u64,
        chunks: BoxStream<'static, io::Result<Bytes>>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<()> {
        let mut sent = 0u64;
        let body = chunks
            .map(move |chunk| {
                if let Ok(chunk) = &chunk {
                    sent += chunk.len() as u64;
                    if let Some(cb) = &on_progress {
                        cb(sent);
                    }
                }
                chunk
            })
            .boxed();

        let request = self
            .request(DavMethod::Put, path)
            .body(RequestBody::Stream {
                length,
                chunks: body,
            });
        self.send(request).await?;
        info!(path, bytes = length, "stored");
        Ok(())
    }

    /// Delete a file or collection.
    pub async fn remove(&self, path: &str) -> Result<()> {
        self.send(self.request(DavMethod::Delete, path)).await?;
        info!(path, "removed");
        Ok(())
    }

    /// Move or rename a file (`MOVE` with a `Destination` header).
    ///
    /// Collections cannot be moved; a source path ending in `/` is rejected
    /// before any request is made.
    pub async fn move_or_rename(&self, source: &str, destination: &str) -> Result<()> {
        if source.ends_with('/') {
            return Err(DavError::Unsupported(
                "moving directories is not supported".to_string(),
            ));
        }
        if destination.ends_with('/') {
            return Err(DavError::InvalidPath(format!(
                "destination must name a file: {}",
                destination
            )));
        }
        let request = self
            .request(DavMethod::Move, source)
            .header("Destination", self.config.resource_path(destination));
        self.send(request).await?;
        info!(source, destination, "moved");
        Ok(())
    }

    /// Create an empty collection (`MKCOL`). The path must end in `/`.
    pub async fn create_directory(&self, path: &str) -> Result<()> {
        if !path.ends_with('/') {
            return Err(DavError::InvalidPath(format!(
                "collection path must end in '/': {}",
                path
            )));
        }
        self.send(self.request(DavMethod::Mkcol, path)).await?;
        info!(path, "created directory");
        Ok(())
    }
}

fn check_file_path(path: &str) -> Result<()> {
    if path.ends_with('/') {
        return Err(DavError::InvalidPath(format!(
            "cannot store into a collection path: {}",
            path
        )));
    }
    Ok(())
}

/// Read `length` bytes of `file` as a stream of `chunk_size` pieces.
fn file_chunks(
    file: File,
    length: u64,
    chunk_size: usize,
) -> BoxStream<'static, io::Result<Bytes>> {
    let chunk_size = chunk_size.max(1) as u64;
    stream::try_unfold((file, 0u64), move |(mut file, offset)| async move {
        if offset >= length {
            return Ok::<_, io::Error>(None);
        }
        let size = (length - offset).min(chunk_size) as usize;
        let mut buf = BytesMut::zeroed(size);
        file.read_exact(&mut buf).await?;
        Ok(Some((buf.freeze(), (file, offset + size as u64))))
    })
    .boxed()
}

fn chunk_payload(payload: Bytes, chunk_size: usize) -> Vec<Bytes> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(payload.len() / chunk_size + 1);
    let mut offset = 0;
    while offset < payload.len() {
        let end = (offset + chunk_size).min(payload.len());
        chunks.push(payload.slice(offset..end));
        offset = end;
    }
    chunks
}
