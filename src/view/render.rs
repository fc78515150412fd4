//! Rendered state of one directory.

use std::collections::HashMap;
use std::fmt;

use crate::fs::path::{breadcrumb_segments, child_path, is_editable, Breadcrumb};
use crate::fs::{Entry, Partitioned};

/// Something the user can do with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Navigate into a directory
    Open,
    Download,
    Delete,
    Rename,
    Move,
    /// Hand the file to the companion editor
    Edit,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Open => "open",
            ActionKind::Download => "download",
            ActionKind::Delete => "delete",
            ActionKind::Rename => "rename",
            ActionKind::Move => "move",
            ActionKind::Edit => "edit",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry with its full path and available actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub entry: Entry,
    pub path: String,
    pub actions: Vec<ActionKind>,
}

impl Row {
    fn new(directory: &str, entry: Entry) -> Self {
        let path = child_path(directory, &entry.name, entry.is_directory());
        let actions = if entry.is_directory() {
            vec![ActionKind::Open, ActionKind::Delete, ActionKind::Move]
        } else {
            let mut actions = vec![
                ActionKind::Download,
                ActionKind::Delete,
                ActionKind::Rename,
                ActionKind::Move,
            ];
            if is_editable(&entry.name) {
                actions.push(ActionKind::Edit);
            }
            actions
        };
        Self {
            entry,
            path,
            actions,
        }
    }

    pub fn allows(&self, kind: ActionKind) -> bool {
        self.actions.contains(&kind)
    }
}

/// A fully rendered directory: breadcrumbs, then directories, then files.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    /// Directory this listing shows (normalized)
    pub directory: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Directories first, then files, each sorted by name
    pub rows: Vec<Row>,
    /// Refresh generation that produced this listing
    pub generation: u64,
    dispatch: HashMap<(String, ActionKind), usize>,
}

impl DirectoryListing {
    /// Partition, sort and render `entries` of `directory`.
    pub fn build(directory: &str, entries: Vec<Entry>, generation: u64) -> Self {
        let partitioned = Partitioned::new(entries);
        let rows: Vec<Row> = partitioned
            .directories
            .into_iter()
            .chain(partitioned.files)
            .map(|entry| Row::new(directory, entry))
            .collect();

        let mut dispatch = HashMap::new();
        for (index, row) in rows.iter().enumerate() {
            for action in &row.actions {
                dispatch.insert((row.entry.name.clone(), *action), index);
            }
        }

        Self {
            directory: directory.to_string(),
            breadcrumbs: breadcrumb_segments(directory),
            rows,
            generation,
            dispatch,
        }
    }

    /// Row offering `kind` for the entry called `name`.
    pub fn lookup(&self, name: &str, kind: ActionKind) -> Option<&Row> {
        self.dispatch
            .get(&(name.to_string(), kind))
            .and_then(|&index| self.rows.get(index))
    }

    pub fn row(&self, name: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.entry.name == name)
    }

    pub fn directories(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.entry.is_directory())
    }

    pub fn files(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| r.entry.is_file())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for DirectoryListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trail: Vec<&str> = self.breadcrumbs.iter().map(|c| c.label.as_str()).collect();
        writeln!(f, "{}", trail.join(" / "))?;
        if self.rows.is_empty() {
            return writeln!(f, "  (empty)");
        }
        for row in &self.rows {
            let marker = if row.entry.is_directory() { "d" } else { "-" };
            let size = row
                .entry
                .size
                .map(|s| format!(" {}", format_size(s)))
                .unwrap_or_default();
            let actions: Vec<&str> = row.actions.iter().map(ActionKind::label).collect();
            writeln!(
                f,
                "  {} {}{}  [{}]",
                marker,
                row.entry.name,
                size,
                actions.join(" ")
            )?;
        }
        Ok(())
    }
}

pub(crate) fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else if bytes < 1_073_741_824 {
        format!("{:.1}MB", bytes as f64 / 1_048_576.0)
    } else {
        format!("{:.2}GB", bytes as f64 / 1_073_741_824.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> DirectoryListing {
        DirectoryListing::build(
            "/docs/",
            vec![
                Entry::file("a.txt"),
                Entry::directory("z"),
                Entry::file("Photo.JPG"),
                Entry::directory("Archive"),
                Entry::file("index.HTML"),
            ],
            1,
        )
    }

    #[test]
    fn test_directories_render_first() {
        let l = listing();
        let order: Vec<&str> = l.rows.iter().map(|r| r.entry.name.as_str()).collect();
        assert_eq!(order, vec!["Archive", "z", "a.txt", "index.HTML", "Photo.JPG"]);
        assert_eq!(l.directories().count(), 2);
        assert_eq!(l.files().count(), 3);
    }

    #[test]
    fn test_row_paths_and_actions() {
        let l = listing();
        let dir = l.row("z").unwrap();
        assert_eq!(dir.path, "/docs/z/");
        assert_eq!(
            dir.actions,
            vec![ActionKind::Open, ActionKind::Delete, ActionKind::Move]
        );

        let photo = l.row("Photo.JPG").unwrap();
        assert_eq!(photo.path, "/docs/Photo.JPG");
        assert!(photo.allows(ActionKind::Rename));
        assert!(!photo.allows(ActionKind::Edit));

        assert!(l.row("index.HTML").unwrap().allows(ActionKind::Edit));
        assert!(l.row("a.txt").unwrap().allows(ActionKind::Edit));
    }

    #[test]
    fn test_dispatch_lookup() {
        let l = listing();
        assert_eq!(
            l.lookup("a.txt", ActionKind::Download).unwrap().path,
            "/docs/a.txt"
        );
        assert!(l.lookup("z", ActionKind::Download).is_none());
        assert!(l.lookup("Photo.JPG", ActionKind::Edit).is_none());
        assert!(l.lookup("missing", ActionKind::Delete).is_none());
    }

    #[test]
    fn test_breadcrumbs() {
        let l = listing();
        assert_eq!(l.breadcrumbs.len(), 2);
        assert_eq!(l.breadcrumbs[1].path, "/docs/");
    }

    #[test]
    fn test_display() {
        let text = DirectoryListing::build("/", Vec::new(), 1).to_string();
        assert!(text.starts_with("Root\n"));
        assert!(text.contains("(empty)"));

        let text = listing().to_string();
        assert!(text.contains("Root / docs"));
        assert!(text.contains("d z  [open delete move]"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(2048), "2.0KB");
        assert_eq!(format_size(5 * 1_048_576), "5.0MB");
    }
}
