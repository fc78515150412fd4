//! Progress reporting for file transfers.

use std::sync::Arc;

/// Progress information for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes transferred so far
    pub done: u64,
    /// Total bytes to transfer
    pub total: u64,
    /// Name of the file being transferred
    pub filename: String,
}

impl TransferProgress {
    /// Create a new progress report.
    pub fn new(done: u64, total: u64, filename: impl Into<String>) -> Self {
        Self {
            done,
            total,
            filename: filename.into(),
        }
    }

    /// Get progress as a percentage (0.0 to 100.0).
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.done as f64 / self.total as f64) * 100.0
    }

    /// Check if transfer is complete.
    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

/// Callback invoked with the running byte count of a single transfer.
pub type ProgressCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Single progress value shown for a whole upload batch.
///
/// Every report overwrites the previous one, whichever task sent it. Tasks
/// never share a counter; they each publish their own snapshots and only this
/// presentation-side value merges them.
#[derive(Debug, Clone, Default)]
pub struct ProgressIndicator {
    current: Option<TransferProgress>,
    visible: bool,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a fresh transfer starting at zero.
    pub fn start(&mut self, filename: &str, total: u64) {
        self.current = Some(TransferProgress::new(0, total, filename));
        self.visible = true;
    }

    /// Record the latest report (last write wins).
    pub fn update(&mut self, progress: TransferProgress) {
        self.current = Some(progress);
        self.visible = true;
    }

    /// Hide the indicator after a transfer finished.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn current(&self) -> Option<&TransferProgress> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Render as a text progress bar, e.g. `[=====     ] 50.0% a.txt - 5/10 bytes`.
    pub fn render(&self, bar_width: usize) -> Option<String> {
        if !self.visible {
            return None;
        }
        let progress = self.current.as_ref()?;
        let percent = progress.percent().clamp(0.0, 100.0);
        let filled = (percent / 100.0 * bar_width as f64) as usize;
        let empty = bar_width.saturating_sub(filled);
        Some(format!(
            "[{}{}] {:.1}% {} - {}/{} bytes",
            "=".repeat(filled),
            " ".repeat(empty),
            percent,
            progress.filename,
            progress.done,
            progress.total
        ))
    }
}
