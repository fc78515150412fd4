//! Pure helpers over remote directory paths.
//!
//! Directory paths handled here are absolute and always end in `/`; file paths
//! are a directory path followed by a name. Nothing in this module does I/O.

/// Path separator used by the remote store.
pub const SEPARATOR: char = '/';

/// Label shown for the root breadcrumb.
pub const ROOT_LABEL: &str = "Root";

/// Extensions the companion editor can open.
pub const EDITABLE_EXTENSIONS: &[&str] = &[".txt", ".js", ".json", ".css", ".html"];

/// One navigable step of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Text to display
    pub label: String,
    /// Directory path this crumb navigates to (ends in `/`)
    pub path: String,
}

/// Normalize a directory path (leading and trailing `/`, no `//`).
pub fn normalize(path: &str) -> String {
    let mut result = String::with_capacity(path.len() + 2);
    result.push(SEPARATOR);
    for segment in path.split(SEPARATOR).filter(|s| !s.is_empty()) {
        result.push_str(segment);
        result.push(SEPARATOR);
    }
    result
}

/// Split a directory path into breadcrumbs, root first.
pub fn breadcrumb_segments(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        label: ROOT_LABEL.to_string(),
        path: SEPARATOR.to_string(),
    }];

    let mut cumulative = SEPARATOR.to_string();
    for segment in path.split(SEPARATOR).filter(|s| !s.is_empty()) {
        cumulative.push_str(segment);
        cumulative.push(SEPARATOR);
        crumbs.push(Breadcrumb {
            label: segment.to_string(),
            path: cumulative.clone(),
        });
    }
    crumbs
}

/// Rebuild the directory path a breadcrumb trail was derived from.
///
/// Uses the labels only; the root crumb contributes the leading `/`.
pub fn join_breadcrumbs(crumbs: &[Breadcrumb]) -> String {
    let mut path = SEPARATOR.to_string();
    for crumb in crumbs.iter().skip(1) {
        path.push_str(&crumb.label);
        path.push(SEPARATOR);
    }
    path
}

/// Path of an entry inside `current_directory`.
pub fn child_path(current_directory: &str, name: &str, is_directory: bool) -> String {
    let mut path = String::with_capacity(current_directory.len() + name.len() + 1);
    path.push_str(current_directory);
    if !path.ends_with(SEPARATOR) {
        path.push(SEPARATOR);
    }
    path.push_str(name);
    if is_directory {
        path.push(SEPARATOR);
    }
    path
}

/// Lowercased extension of a file name, without the dot.
pub fn file_extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Whether the companion editor handles this file.
pub fn is_editable(name: &str) -> bool {
    let lower = name.to_lowercase();
    EDITABLE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Check that `name` can be used as a single path segment.
pub(crate) fn validate_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(SEPARATOR)
}

/// Percent-encode every segment of `path`, keeping the separators.
pub fn encode_path(path: &str) -> String {
    path.split(SEPARATOR)
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
