//! # davlib
//!
//! Rust client library for browsing and managing a WebDAV file store.
//!
//! ## Features
//!
//! - **Listing**: `PROPFIND` depth-1 listings parsed from multistatus XML,
//!   sorted with directories before files.
//! - **Navigation**: a [`DirectoryView`] keeps the current directory, its
//!   breadcrumbs and the rendered rows with the actions each one offers.
//! - **Mutations**:
//!   - Delete files and directories.
//!   - Rename and move files (`MOVE` with a `Destination` header).
//!   - Create directories (`MKCOL`).
//! - **File Transfers**:
//!   - Download files (`GET`).
//!   - Concurrent uploads (`PUT`), one independent task per file.
//!   - Per-task progress events and a last-write-wins progress indicator.
//! - **Editing**: companion editor URLs for text-like files.
//!
//! Every view operation that changes the remote store ends with a refresh of
//! the current directory. Overlapping refreshes never let an older answer
//! replace a newer one.
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use davlib::{DavClient, DavConfig, DirectoryView, LocalFile, UploadPipeline};
//!
//! # async fn example() -> davlib::Result<()> {
//! let client = DavClient::connect(DavConfig::new("http://192.168.4.1"))?;
//! let view = Arc::new(DirectoryView::new(client, "/"));
//!
//! // List a directory
//! let outcome = view.navigate("/docs").await?;
//! if let Some(listing) = outcome.listing() {
//!     print!("{}", listing);
//! }
//!
//! // Upload two files; each one refreshes the view when it lands
//! let batch = UploadPipeline::new(view.clone())
//!     .submit(vec![
//!         LocalFile::from_path("notes.txt").await?,
//!         LocalFile::from_bytes("hello.txt", "hello"),
//!     ])
//!     .await;
//! for report in batch.wait().await? {
//!     if let Some(err) = report.error {
//!         eprintln!("{}: {}", report.task.name, err);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dav;
pub mod error;
pub mod fs;
pub mod http;
pub mod progress;
pub mod view;

// Re-export commonly used types
pub use config::DavConfig;
pub use dav::{DavClient, DavMethod, Transport};
pub use error::{DavError, Result};
pub use fs::{Entry, EntryKind, LocalFile, UploadEvent, UploadPipeline, UploadReport};
pub use http::HttpClient;
pub use progress::{ProgressCallback, ProgressIndicator, TransferProgress};
pub use view::{
    ActionKind, ActionOutcome, DirectoryListing, DirectoryView, Prompter, RefreshOutcome,
};
