//! Directory entries and their display ordering.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Collection (directory)
    Directory,
}

/// An item inside the current directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Decoded name (unique within its directory)
    pub name: String,
    /// File or directory
    pub kind: EntryKind,
    /// Size in bytes, when the server reported one
    pub size: Option<u64>,
}

impl Entry {
    /// Create a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size: None,
        }
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            size: None,
        }
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Check if this entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Case-insensitive, locale-aware name ordering used for display.
///
/// Names are collated with the Unicode root collation at secondary strength,
/// so case is ignored and accented letters sort next to their base letter.
/// Names equal under collation fall back to a plain comparison so the order
/// stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    COLLATOR
        .with(|collator| match collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        })
        .then_with(|| a.cmp(b))
}

thread_local! {
    static COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        Collator::try_new(&Default::default(), options).ok()
    };
}

/// Entries split into directories and files, each sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitioned {
    pub directories: Vec<Entry>,
    pub files: Vec<Entry>,
}

impl Partitioned {
    /// Partition and sort a flat entry list.
    pub fn new(entries: Vec<Entry>) -> Self {
        let (mut directories, mut files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(Entry::is_directory);
        directories.sort_by(|a, b| compare_names(&a.name, &b.name));
        files.sort_by(|a, b| compare_names(&a.name, &b.name));
        Self { directories, files }
    }

    /// Directories first, then files.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.directories.iter().chain(self.files.iter())
    }

    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_case_insensitive_sort() {
        let p = Partitioned::new(vec![Entry::file("Zebra"), Entry::file("apple")]);
        assert_eq!(names(&p.files), vec!["apple", "Zebra"]);
    }

    #[test]
    fn test_accented_names_sort_with_base_letter() {
        let p = Partitioned::new(vec![
            Entry::file("zebra"),
            Entry::file("éclair"),
            Entry::file("apple"),
            Entry::file("Eagle"),
        ]);
        assert_eq!(names(&p.files), vec!["apple", "Eagle", "éclair", "zebra"]);
    }

    #[test]
    fn test_compare_names_is_total() {
        assert_eq!(compare_names("b", "B"), compare_names("b", "B"));
        assert_ne!(compare_names("b", "B"), Ordering::Equal);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
        assert_eq!(compare_names("Résumé", "resume2"), Ordering::Less);
    }

    #[test]
    fn test_sort_idempotent() {
        let p = Partitioned::new(vec![
            Entry::file("b"),
            Entry::file("B"),
            Entry::file("a"),
            Entry::directory("Docs"),
            Entry::directory("archive"),
        ]);
        let again = Partitioned::new(p.iter().cloned().collect());
        assert_eq!(p, again);
        assert_eq!(names(&p.files), vec!["a", "B", "b"]);
        assert_eq!(names(&p.directories), vec!["archive", "Docs"]);
    }

    #[test]
    fn test_directories_before_files() {
        let p = Partitioned::new(vec![Entry::file("a"), Entry::directory("z")]);
        let order: Vec<&str> = p.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["z", "a"]);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let input = vec![
            Entry::file("x.txt"),
            Entry::directory("d1"),
            Entry::file("y.txt"),
            Entry::directory("d2"),
        ];
        let p = Partitioned::new(input.clone());
        assert_eq!(p.len(), input.len());
        assert!(p.directories.iter().all(Entry::is_directory));
        assert!(p.files.iter().all(Entry::is_file));
        for e in &input {
            assert_eq!(p.iter().filter(|x| *x == e).count(), 1);
        }
    }

    #[test]
    fn test_empty() {
        let p = Partitioned::new(Vec::new());
        assert!(p.is_empty());
    }
}
