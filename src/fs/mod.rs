//! Remote paths, directory entries and uploads.

mod entry;
pub mod path;
pub mod upload;

pub use entry::{compare_names, Entry, EntryKind, Partitioned};
pub use upload::{LocalFile, UploadBatch, UploadEvent, UploadPipeline, UploadReport, UploadState};
