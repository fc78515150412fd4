//! Concurrent upload pipeline.
//!
//! Every submitted file becomes its own tokio task that streams the file with
//! `PUT`, then refreshes the view. Tasks share nothing but the event channel:
//! each keeps its own byte counter and publishes snapshots, and a failing task
//! never stops its siblings.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::path::{child_path, validate_name};
use crate::error::{DavError, Result};
use crate::progress::{ProgressCallback, ProgressIndicator, TransferProgress};
use crate::view::{DirectoryView, RefreshOutcome};

/// A local file picked for upload.
///
/// Files opened with [`from_path`](Self::from_path) stay on disk and are
/// streamed chunk by chunk when the upload runs.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    source: Source,
    length: u64,
}

#[derive(Debug, Clone)]
enum Source {
    Memory(Bytes),
    Disk(PathBuf),
}

impl LocalFile {
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            length: data.len() as u64,
            source: Source::Memory(data),
        }
    }

    /// Pick a file from disk; the remote name is its file name.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| DavError::InvalidPath(format!("no file name: {}", path.display())))?;
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(DavError::InvalidPath(format!(
                "not a regular file: {}",
                path.display()
            )));
        }
        Ok(Self {
            name,
            source: Source::Disk(path.to_path_buf()),
            length: metadata.len(),
        })
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Local path, for files picked from disk.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::Disk(path) => Some(path),
            Source::Memory(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Pending,
    InProgress,
    Done,
    Failed,
}

/// Bookkeeping for one file of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub id: usize,
    pub name: String,
    /// Remote path the file is stored at
    pub path: String,
    pub bytes_total: u64,
    pub bytes_transferred: u64,
    pub state: UploadState,
}

/// Progress report from a running task.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Started { id: usize, progress: TransferProgress },
    Progress { id: usize, progress: TransferProgress },
    /// The file is stored and the view was refreshed.
    Completed { id: usize, name: String },
    Failed { id: usize, name: String, error: String },
}

impl UploadEvent {
    pub fn id(&self) -> usize {
        match self {
            UploadEvent::Started { id, .. }
            | UploadEvent::Progress { id, .. }
            | UploadEvent::Completed { id, .. }
            | UploadEvent::Failed { id, .. } => *id,
        }
    }
}

/// Final result of one task.
#[derive(Debug)]
pub struct UploadReport {
    pub task: UploadTask,
    /// Why the upload failed, if it did.
    pub error: Option<DavError>,
    /// Outcome of the refresh that follows a successful upload.
    pub refresh: Option<Result<RefreshOutcome>>,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Starts uploads into a [`DirectoryView`]'s current directory.
#[derive(Clone)]
pub struct UploadPipeline {
    view: Arc<DirectoryView>,
}

impl UploadPipeline {
    pub fn new(view: Arc<DirectoryView>) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &Arc<DirectoryView> {
        &self.view
    }

    /// Start one task per file. Files land in the directory shown at
    /// submission time, even if the view navigates away meanwhile.
    pub async fn submit(&self, files: Vec<LocalFile>) -> UploadBatch {
        let directory = self.view.current_directory().await;
        let (tx, rx) = mpsc::unbounded_channel();
        let mut tasks = Vec::with_capacity(files.len());
        let mut handles = Vec::with_capacity(files.len());

        for (id, file) in files.into_iter().enumerate() {
            let task = UploadTask {
                id,
                name: file.name.clone(),
                path: child_path(&directory, &file.name, false),
                bytes_total: file.len(),
                bytes_transferred: 0,
                state: UploadState::Pending,
            };
            tasks.push(task.clone());
            handles.push(tokio::spawn(run_task(
                self.view.clone(),
                task,
                file.source,
                tx.clone(),
            )));
        }
        info!(%directory, files = tasks.len(), "upload batch submitted");

        UploadBatch {
            tasks,
            events: rx,
            handles,
        }
    }
}

async fn run_task(
    view: Arc<DirectoryView>,
    mut task: UploadTask,
    source: Source,
    events: mpsc::UnboundedSender<UploadEvent>,
) -> UploadReport {
    let id = task.id;
    task.state = UploadState::InProgress;
    // A closed receiver only means nobody is watching.
    let _ = events.send(UploadEvent::Started {
        id,
        progress: TransferProgress::new(0, task.bytes_total, task.name.clone()),
    });

    let transferred = Arc::new(AtomicU64::new(0));
    let on_progress: ProgressCallback = {
        let transferred = transferred.clone();
        let events = events.clone();
        let (total, name) = (task.bytes_total, task.name.clone());
        Arc::new(move |done| {
            transferred.store(done, Ordering::Relaxed);
            let _ = events.send(UploadEvent::Progress {
                id,
                progress: TransferProgress::new(done, total, name.clone()),
            });
        })
    };

    let result = if validate_name(&task.name) {
        let client = view.client();
        match source {
            Source::Memory(data) => client.store(&task.path, data, Some(on_progress)).await,
            Source::Disk(local) => client
                .store_file(&task.path, &local, Some(on_progress))
                .await
                .map(|_| ()),
        }
    } else {
        Err(DavError::InvalidPath(format!("invalid name: {}", task.name)))
    };
    task.bytes_transferred = transferred.load(Ordering::Relaxed);

    match result {
        Ok(()) => {
            task.state = UploadState::Done;
            info!(path = %task.path, bytes = task.bytes_total, "upload complete");
            let refresh = view.refresh().await;
            let _ = events.send(UploadEvent::Completed {
                id,
                name: task.name.clone(),
            });
            UploadReport {
                task,
                error: None,
                refresh: Some(refresh),
            }
        }
        Err(error) => {
            task.state = UploadState::Failed;
            warn!(path = %task.path, %error, "upload failed");
            let _ = events.send(UploadEvent::Failed {
                id,
                name: task.name.clone(),
                error: error.to_string(),
            });
            UploadReport {
                task,
                error: Some(error),
                refresh: None,
            }
        }
    }
}

/// Handle on a submitted batch.
pub struct UploadBatch {
    tasks: Vec<UploadTask>,
    events: mpsc::UnboundedReceiver<UploadEvent>,
    handles: Vec<JoinHandle<UploadReport>>,
}

impl UploadBatch {
    /// Task states as of the last event received.
    pub fn tasks(&self) -> &[UploadTask] {
        &self.tasks
    }

    /// Next event from any task; `None` once every task has finished.
    pub async fn next_event(&mut self) -> Option<UploadEvent> {
        let event = self.events.recv().await?;
        if let Some(task) = self.tasks.get_mut(event.id()) {
            match &event {
                UploadEvent::Started { .. } => task.state = UploadState::InProgress,
                UploadEvent::Progress { progress, .. } => {
                    task.bytes_transferred = progress.done;
                }
                UploadEvent::Completed { .. } => {
                    task.bytes_transferred = task.bytes_total;
                    task.state = UploadState::Done;
                }
                UploadEvent::Failed { .. } => task.state = UploadState::Failed,
            }
        }
        Some(event)
    }

    /// Feed every event into `indicator` until the batch finishes, then
    /// collect the reports.
    pub async fn drive(mut self, indicator: &mut ProgressIndicator) -> Result<Vec<UploadReport>> {
        while let Some(event) = self.next_event().await {
            match event {
                UploadEvent::Started { progress, .. } => {
                    indicator.start(&progress.filename, progress.total)
                }
                UploadEvent::Progress { progress, .. } => indicator.update(progress),
                UploadEvent::Completed { .. } | UploadEvent::Failed { .. } => {
                    if self.tasks.iter().all(|t| {
                        matches!(t.state, UploadState::Done | UploadState::Failed)
                    }) {
                        indicator.hide();
                    }
                }
            }
        }
        self.wait().await
    }

    /// Wait for every task and return one report per file, in submission order.
    pub async fn wait(self) -> Result<Vec<UploadReport>> {
        let mut reports = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            let report = handle
                .await
                .map_err(|e| DavError::Task(e.to_string()))?;
            reports.push(report);
        }
        Ok(reports)
    }
}
