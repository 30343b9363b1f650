//! Candidate file path construction.
//!
//! A class `Book` in a namespace whose extension is `model` lives in
//! `book.model.php`. The one exception is the standard class of a type, named
//! exactly after the extension: `Model` lives in `model.php`, not
//! `model.model.php`.

use std::path::{PathBuf, MAIN_SEPARATOR_STR};

use crate::normalize::NAMESPACE_SEPARATOR;

/// Whether `relative_class` is the standard class for `extension`.
///
/// Both sides are expected to be lowercase already.
pub fn is_standard_class(relative_class: &str, extension: &str) -> bool {
    relative_class == extension
}

/// Builds file paths for a fixed source extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathBuilder {
    source_extension: String,
}

impl PathBuilder {
    /// Builder for files ending in `source_extension`, taken without a
    /// leading dot and lowercased (`.PHP` becomes `php`).
    pub fn new(source_extension: &str) -> Self {
        PathBuilder {
            source_extension: source_extension
                .trim()
                .trim_start_matches('.')
                .to_ascii_lowercase(),
        }
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    /// Path of `relative_class` inside `directory` for a mapping with `extension`.
    ///
    /// `directory` must end with a path separator. Namespace separators left in
    /// `relative_class` (classes in sub-namespaces) become path separators.
    pub fn build(&self, directory: &str, extension: &str, relative_class: &str) -> PathBuf {
        let relative = relative_class.replace(NAMESPACE_SEPARATOR, MAIN_SEPARATOR_STR);

        let mut file = String::with_capacity(
            directory.len() + relative.len() + extension.len() + self.source_extension.len() + 2,
        );
        file.push_str(directory);
        file.push_str(&relative);

        if !is_standard_class(relative_class, extension) {
            file.push('.');
            file.push_str(extension);
        }

        if !self.source_extension.is_empty() {
            file.push('.');
            file.push_str(&self.source_extension);
        }

        PathBuf::from(file)
    }
}
