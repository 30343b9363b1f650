//! Namespace and directory normalization.
//!
//! Every key and directory stored in the registry goes through here, which is
//! what keeps the registry invariants:
//!
//! - namespaces are ASCII-lowercase, have no leading separator and end with
//!   exactly one `\`
//! - directories are ASCII-lowercase, use the platform separator and end with
//!   exactly one separator
//!
//! Lowercasing is a fixed ASCII transform so results never depend on locale.

use std::path::{Path, MAIN_SEPARATOR};

/// Separator between namespace segments (`App\Models\Book`).
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Normalize a namespace: trim separators, lowercase, append one separator.
///
/// An empty namespace (or one made only of separators) normalizes to the
/// empty string, which is the root namespace.
pub fn normalize_namespace(namespace: &str) -> String {
    let trimmed = namespace.trim_matches(NAMESPACE_SEPARATOR);
    if trimmed.is_empty() {
        return String::new();
    }

    let mut normalized = trimmed.to_ascii_lowercase();
    normalized.push(NAMESPACE_SEPARATOR);
    normalized
}

/// Normalize a directory: platform separators, lowercase, trim separators,
/// append one separator.
///
/// Both `/` and `\` are accepted as input separators. An empty directory
/// normalizes to the empty string.
pub fn normalize_directory(directory: &str) -> String {
    let unified = unify_separators(&directory.to_ascii_lowercase());
    let trimmed = unified.trim_matches(MAIN_SEPARATOR);
    if trimmed.is_empty() {
        return String::new();
    }

    let mut normalized = trimmed.to_string();
    normalized.push(MAIN_SEPARATOR);
    normalized
}

/// Normalize a project root.
///
/// Unlike [`normalize_directory`], the root keeps its case and its leading
/// separator, so `/srv/App` stays an absolute path. Only the trailing
/// separator is normalized.
pub fn normalize_root(root: &Path) -> String {
    let unified = unify_separators(&root.to_string_lossy());
    if unified.is_empty() {
        return String::new();
    }

    let mut normalized = unified.trim_end_matches(MAIN_SEPARATOR).to_string();
    normalized.push(MAIN_SEPARATOR);
    normalized
}

/// Turn a namespace into the directory it conventionally lives in.
///
/// `App\Controllers` becomes `App/Controllers`.
pub fn namespace_to_directory(namespace: &str) -> String {
    namespace.replace(NAMESPACE_SEPARATOR, "/")
}

/// The final segment of a directory, ignoring trailing separators.
///
/// `app/controllers/` gives `controllers`.
pub fn last_segment(directory: &str) -> &str {
    let trimmed = directory.trim_end_matches(is_path_separator);
    trimmed
        .rsplit(is_path_separator)
        .next()
        .unwrap_or(trimmed)
}

fn is_path_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

fn unify_separators(s: &str) -> String {
    s.chars()
        .map(|c| if is_path_separator(c) { MAIN_SEPARATOR } else { c })
        .collect()
}

/// The fixed base every registered mapping is qualified with.
///
/// Built once from the configuration; [`qualify_namespace`] and
/// [`qualify_directory`] prepend it, so no mapping can escape the base
/// namespace or the base directory.
///
/// [`qualify_namespace`]: BaseLocation::qualify_namespace
/// [`qualify_directory`]: BaseLocation::qualify_directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseLocation {
    namespace: String,
    directory: String,
}

impl BaseLocation {
    /// Base namespace `namespace`, files under `root/base_dir`.
    pub fn new(namespace: &str, root: &Path, base_dir: &str) -> Self {
        let mut directory = normalize_root(root);
        directory.push_str(&normalize_directory(base_dir));

        BaseLocation {
            namespace: normalize_namespace(namespace),
            directory,
        }
    }

    /// The normalized base namespace (`app\`).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The normalized base directory, root included (`/srv/app/src/`).
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Base namespace followed by the normalized `namespace`.
    pub fn qualify_namespace(&self, namespace: &str) -> String {
        let mut qualified = self.namespace.clone();
        qualified.push_str(&normalize_namespace(namespace));
        qualified
    }

    /// Base directory followed by the normalized `directory`.
    pub fn qualify_directory(&self, directory: &str) -> String {
        let mut qualified = self.directory.clone();
        qualified.push_str(&normalize_directory(directory));
        qualified
    }
}
