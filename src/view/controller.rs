//! Directory view controller.
//!
//! [`DirectoryView`] owns the navigation state of one pane: the directory on
//! display and the last rendered listing. Every navigation or successful
//! mutation ends with a refresh. Refreshes are tagged with a generation
//! number; when several overlap, only the most recently issued one may
//! replace the rendered listing and older answers are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::render::DirectoryListing;
use crate::config::DavConfig;
use crate::dav::DavClient;
use crate::error::{DavError, Result};
use crate::fs::path::{child_path, file_extension, is_editable, normalize, validate_name};
use crate::fs::Entry;

/// Directory currently on display. Always absolute and ending in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current_directory: String,
}

impl NavigationState {
    pub fn new(initial: &str) -> Self {
        Self {
            current_directory: normalize(initial),
        }
    }

    pub fn current_directory(&self) -> &str {
        &self.current_directory
    }

    fn navigate(&mut self, path: &str) {
        self.current_directory = normalize(path);
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Result of an operation that ends in a refresh.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The refresh completed and its listing is now on display.
    Current(Arc<DirectoryListing>),
    /// A newer refresh was issued meanwhile; this answer was discarded.
    Superseded,
    /// Nothing to do; no request was issued.
    Skipped,
}

impl RefreshOutcome {
    pub fn listing(&self) -> Option<&Arc<DirectoryListing>> {
        match self {
            RefreshOutcome::Current(listing) => Some(listing),
            _ => None,
        }
    }
}

pub struct DirectoryView {
    client: DavClient,
    state: RwLock<NavigationState>,
    issued: AtomicU64,
    listing: RwLock<Option<Arc<DirectoryListing>>>,
}

impl DirectoryView {
    /// Create a view starting at `initial_directory`. Nothing is fetched yet.
    pub fn new(client: DavClient, initial_directory: &str) -> Self {
        Self {
            client,
            state: RwLock::new(NavigationState::new(initial_directory)),
            issued: AtomicU64::new(0),
            listing: RwLock::new(None),
        }
    }

    /// Create a view whose start directory comes from the launch URL's `dir`
    /// parameter, defaulting to the root.
    pub fn from_launch_url(client: DavClient, launch_url: &str) -> Self {
        let initial = DavConfig::initial_directory_from_url(launch_url);
        Self::new(client, &initial)
    }

    pub fn client(&self) -> &DavClient {
        &self.client
    }

    pub async fn current_directory(&self) -> String {
        self.state.read().await.current_directory().to_string()
    }

    /// Most recently applied listing.
    pub async fn listing(&self) -> Option<Arc<DirectoryListing>> {
        self.listing.read().await.clone()
    }

    /// Switch to `path` and refresh.
    pub async fn navigate(&self, path: &str) -> Result<RefreshOutcome> {
        let directory = {
            let mut state = self.state.write().await;
            state.navigate(path);
            state.current_directory().to_string()
        };
        info!(%directory, "navigate");
        self.refresh().await
    }

    /// Fetch the current directory and render it.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let directory = self.current_directory().await;
        debug!(%directory, generation, "refresh");

        let result = self.client.list_entries(&directory).await;
        if self.is_stale(generation) {
            debug!(%directory, generation, "discarding superseded listing");
            return Ok(RefreshOutcome::Superseded);
        }
        let entries = result?;

        let mut slot = self.listing.write().await;
        if self.is_stale(generation) || slot.as_ref().is_some_and(|l| l.generation > generation) {
            return Ok(RefreshOutcome::Superseded);
        }
        let listing = Arc::new(DirectoryListing::build(&directory, entries, generation));
        *slot = Some(listing.clone());
        Ok(RefreshOutcome::Current(listing))
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.issued.load(Ordering::SeqCst) != generation
    }

    /// Delete an entry of the current directory, then refresh.
    pub async fn delete(&self, entry: &Entry) -> Result<RefreshOutcome> {
        let directory = self.current_directory().await;
        let path = child_path(&directory, &entry.name, entry.is_directory());
        self.client.remove(&path).await?;
        self.refresh().await
    }

    /// Rename a file within the current directory, then refresh.
    ///
    /// An empty or unchanged name is a no-op and issues no request.
    pub async fn rename(&self, name: &str, new_name: &str) -> Result<RefreshOutcome> {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == name {
            return Ok(RefreshOutcome::Skipped);
        }
        if !validate_name(new_name) {
            return Err(DavError::InvalidPath(format!("invalid name: {}", new_name)));
        }
        let directory = self.current_directory().await;
        let source = child_path(&directory, name, false);
        let destination = child_path(&directory, new_name, false);
        self.client.move_or_rename(&source, &destination).await?;
        self.refresh().await
    }

    /// Move a file into `destination_directory`, keeping its name, then refresh.
    ///
    /// Directories cannot be moved. An empty destination is a no-op, as is
    /// moving a file into the directory it already lives in.
    pub async fn move_entry(
        &self,
        entry: &Entry,
        destination_directory: &str,
    ) -> Result<RefreshOutcome> {
        if entry.is_directory() {
            return Err(DavError::Unsupported(
                "moving directories is not supported".to_string(),
            ));
        }
        if destination_directory.trim().is_empty() {
            return Ok(RefreshOutcome::Skipped);
        }
        let directory = self.current_directory().await;
        let target_directory = normalize(destination_directory.trim());
        if target_directory == directory {
            return Ok(RefreshOutcome::Skipped);
        }
        let source = child_path(&directory, &entry.name, false);
        let destination = child_path(&target_directory, &entry.name, false);
        self.client.move_or_rename(&source, &destination).await?;
        self.refresh().await
    }

    /// Create a directory in the current directory, then refresh.
    pub async fn create_directory(&self, name: &str) -> Result<RefreshOutcome> {
        let name = name.trim().trim_end_matches('/');
        if name.is_empty() {
            return Ok(RefreshOutcome::Skipped);
        }
        if !validate_name(name) {
            return Err(DavError::InvalidPath(format!("invalid name: {}", name)));
        }
        let directory = self.current_directory().await;
        self.client
            .create_directory(&child_path(&directory, name, true))
            .await?;
        self.refresh().await
    }

    /// Contents of a file in the current directory.
    pub async fn download(&self, name: &str) -> Result<Bytes> {
        let directory = self.current_directory().await;
        self.client.download(&child_path(&directory, name, false)).await
    }

    /// Companion editor URL for a file in the current directory.
    pub async fn edit_url(&self, name: &str) -> Result<String> {
        if !is_editable(name) {
            return Err(DavError::Unsupported(format!("{} is not editable", name)));
        }
        let directory = self.current_directory().await;
        let extension = file_extension(name).unwrap_or_default();
        Ok(self
            .client
            .config()
            .editor_url(&child_path(&directory, name, false), &extension))
    }
}
