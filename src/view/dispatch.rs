//! Action dispatch for rendered rows.
//!
//! The presentation layer reports "the user picked `kind` on `name`"; the
//! listing's dispatch table resolves that to a row and the view runs the
//! matching operation. Confirmation and value prompts go through a
//! [`Prompter`] so the controller stays headless.

use bytes::Bytes;
use tracing::debug;

use super::controller::{DirectoryView, RefreshOutcome};
use super::render::ActionKind;
use crate::error::{DavError, Result};

/// User interaction needed by some actions.
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question.
    fn confirm(&self, message: &str) -> bool;

    /// Ask for a value, pre-filled with `default`. `None` means the user
    /// dismissed the prompt.
    fn prompt(&self, message: &str, default: Option<&str>) -> Option<String>;
}

/// What a dispatched action produced.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// A navigation or mutation ran and was followed by a refresh.
    Refreshed(RefreshOutcome),
    /// File contents, for the presentation to save.
    Downloaded { name: String, data: Bytes },
    /// Editor URL to open.
    OpenEditor(String),
    /// The user declined a confirmation or dismissed a prompt.
    Cancelled,
}

impl DirectoryView {
    /// Run the action `kind` on the entry called `name` of the current listing.
    ///
    /// Fails with [`DavError::Unsupported`] when the listing has no such row,
    /// the row does not offer `kind`, or the listing shows a directory other
    /// than the current one (after a failed navigation). Nothing is prompted
    /// or sent in those cases.
    pub async fn dispatch(
        &self,
        name: &str,
        kind: ActionKind,
        prompter: &dyn Prompter,
    ) -> Result<ActionOutcome> {
        let listing = self
            .listing()
            .await
            .ok_or_else(|| DavError::Unsupported("nothing rendered yet".to_string()))?;
        let current = self.current_directory().await;
        if listing.directory != current {
            return Err(DavError::Unsupported(format!(
                "listing of {} is stale, current directory is {}; refresh first",
                listing.directory, current
            )));
        }
        let row = listing.lookup(name, kind).ok_or_else(|| {
            DavError::Unsupported(format!("{} is not available for {}", kind, name))
        })?;
        debug!(name, action = %kind, "dispatch");

        let outcome = match kind {
            ActionKind::Open => ActionOutcome::Refreshed(self.navigate(&row.path).await?),
            ActionKind::Download => ActionOutcome::Downloaded {
                name: name.to_string(),
                data: self.download(name).await?,
            },
            ActionKind::Edit => ActionOutcome::OpenEditor(self.edit_url(name).await?),
            ActionKind::Delete => {
                if !prompter.confirm(&format!("Delete {}?", row.path)) {
                    return Ok(ActionOutcome::Cancelled);
                }
                ActionOutcome::Refreshed(self.delete(&row.entry).await?)
            }
            ActionKind::Rename => {
                let Some(new_name) = prompter.prompt("New name:", Some(name)) else {
                    return Ok(ActionOutcome::Cancelled);
                };
                ActionOutcome::Refreshed(self.rename(name, &new_name).await?)
            }
            ActionKind::Move => {
                if row.entry.is_directory() {
                    return Err(DavError::Unsupported(
                        "moving directories is not supported".to_string(),
                    ));
                }
                let Some(destination) = prompter.prompt("Move to directory:", Some(&current))
                else {
                    return Ok(ActionOutcome::Cancelled);
                };
                ActionOutcome::Refreshed(self.move_entry(&row.entry, &destination).await?)
            }
        };
        Ok(outcome)
    }

    /// Prompt for a name and create that directory here.
    pub async fn new_folder(&self, prompter: &dyn Prompter) -> Result<ActionOutcome> {
        match prompter.prompt("Folder name:", None) {
            Some(name) => Ok(ActionOutcome::Refreshed(
                self.create_directory(&name).await?,
            )),
            None => Ok(ActionOutcome::Cancelled),
        }
    }
}
