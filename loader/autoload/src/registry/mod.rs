//! Namespace prefix registry.
//!
//! Maps a fully-qualified namespace prefix (`app\models\`) to the directory
//! its classes live in and the extension their file names carry. Every
//! prefix and directory is qualified with the [`BaseLocation`] fixed at
//! construction.
//!
//! Insertion order matters: once a prefix matches, the resolver probes
//! mappings in the order they were first registered. Re-registering a prefix
//! replaces its directory and extension but keeps its position.

use std::path::{Path, MAIN_SEPARATOR};

use rustc_hash::FxHashMap;

use crate::normalize::{
    last_segment, namespace_to_directory, normalize_namespace, normalize_root, BaseLocation,
    NAMESPACE_SEPARATOR,
};
use crate::{AutoloadConfig, AutoloadError};

/// Namespace segment and directory name of an exception shadow.
pub const EXCEPTIONS_SEGMENT: &str = "exceptions";

/// Extension every exception shadow uses (`not_found.exception.php`).
pub const EXCEPTION_EXTENSION: &str = "exception";

/// One registered namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamespaceMapping {
    /// Lowercase prefix ending with a single `\` (`app\models\`).
    pub prefix: String,
    /// Directory ending with a single path separator (`/srv/app/src/models/`).
    pub directory: String,
    /// Lowercase type suffix used in file names (`model`).
    pub extension: String,
}

impl NamespaceMapping {
    /// The mapping for this namespace's `exceptions` sub-namespace.
    #[must_use]
    pub fn exception_shadow(&self) -> NamespaceMapping {
        let mut prefix = self.prefix.clone();
        prefix.push_str(EXCEPTIONS_SEGMENT);
        prefix.push(NAMESPACE_SEPARATOR);

        let mut directory = self.directory.clone();
        directory.push_str(EXCEPTIONS_SEGMENT);
        directory.push(MAIN_SEPARATOR);

        NamespaceMapping {
            prefix,
            directory,
            extension: EXCEPTION_EXTENSION.to_string(),
        }
    }
}

/// Registry of namespace mappings, keyed by prefix.
#[derive(Clone, Debug)]
pub struct Registry {
    base: BaseLocation,
    mappings: Vec<NamespaceMapping>,
    /// Prefix to index into `mappings`.
    index: FxHashMap<String, usize>,
}

impl Registry {
    /// Empty registry rooted at the configured base namespace and directory.
    pub fn new(config: &AutoloadConfig) -> Self {
        let root = config.resolved_abspath();
        Self::with_base(BaseLocation::new(
            &config.base_namespace,
            &root,
            &config.base_dir,
        ))
    }

    pub fn with_base(base: BaseLocation) -> Self {
        Registry {
            base,
            mappings: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn base(&self) -> &BaseLocation {
        &self.base
    }

    /// Map `namespace` (relative to the base namespace) to `directory`.
    ///
    /// Defaults, following the conventional layout:
    ///
    /// - no `directory`: the namespace itself, `App\Controllers` → `app/controllers`
    /// - no `extension`: the final segment of the directory, `controllers`
    ///
    /// ```text
    /// registry.register("Models", Some("models"), Some("model"));
    /// // app\models\ → /srv/app/src/models/, book.model.php
    /// ```
    ///
    /// Registering the same namespace again replaces the earlier mapping.
    /// Directories are not checked for existence.
    pub fn register(&mut self, namespace: &str, directory: Option<&str>, extension: Option<&str>) {
        let directory = directory.map_or_else(|| namespace_to_directory(namespace), str::to_string);

        let qualified_directory = self.base.qualify_directory(&directory);
        let extension = extension
            .and_then(explicit_extension)
            .or_else(|| Some(last_segment(&directory)).filter(|seg| !seg.is_empty()))
            .unwrap_or_else(|| last_segment(&qualified_directory))
            .to_ascii_lowercase();

        let prefix = self.base.qualify_namespace(namespace);
        self.insert(NamespaceMapping {
            prefix,
            directory: qualified_directory,
            extension,
        });
    }

    /// Register the `exceptions` sub-namespace of each already-registered
    /// namespace.
    ///
    /// `Models` mapped to `src/models/` gains `Models\Exceptions` mapped to
    /// `src/models/exceptions/` with the extension `exception`.
    ///
    /// # Errors
    ///
    /// [`AutoloadError::MissingPrefix`] if any namespace is not registered.
    /// Nothing is registered in that case, not even the shadows of the
    /// namespaces listed before the missing one.
    pub fn register_exception_shadow<I, S>(&mut self, namespaces: I) -> Result<(), AutoloadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut staged: Vec<NamespaceMapping> = Vec::new();

        for namespace in namespaces {
            let prefix = self.base.qualify_namespace(namespace.as_ref());

            // Shadows staged earlier in the same call count as registered.
            let parent = staged
                .iter()
                .rev()
                .find(|m| m.prefix == prefix)
                .or_else(|| self.get(&prefix));

            let Some(parent) = parent else {
                return Err(AutoloadError::MissingPrefix { prefix });
            };

            let shadow = parent.exception_shadow();
            staged.push(shadow);
        }

        for shadow in staged {
            self.insert(shadow);
        }

        Ok(())
    }

    /// Replace every mapping.
    ///
    /// Meant for restoring a snapshot taken with [`mappings`](Self::mappings).
    /// Prefixes and directories are brought back to their canonical shape but
    /// are not re-qualified with the base. An empty directory becomes the base
    /// directory and a blank extension defaults to the directory's last
    /// segment, as in [`register`](Self::register). Later duplicates of a
    /// prefix replace earlier ones.
    pub fn replace_all<I>(&mut self, mappings: I)
    where
        I: IntoIterator<Item = NamespaceMapping>,
    {
        self.mappings.clear();
        self.index.clear();

        for mapping in mappings {
            let mut directory = normalize_root(Path::new(&mapping.directory));
            if directory.is_empty() {
                directory = self.base.directory().to_string();
            }
            let extension = explicit_extension(&mapping.extension)
                .unwrap_or_else(|| last_segment(&directory))
                .to_ascii_lowercase();

            self.insert(NamespaceMapping {
                prefix: normalize_namespace(&mapping.prefix),
                directory,
                extension,
            });
        }
    }

    /// All mappings in search order.
    pub fn mappings(&self) -> &[NamespaceMapping] {
        &self.mappings
    }

    /// The mapping registered under the fully-qualified `prefix`.
    pub fn get(&self, prefix: &str) -> Option<&NamespaceMapping> {
        self.index.get(prefix).map(|&idx| &self.mappings[idx])
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.index.contains_key(prefix)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn insert(&mut self, mapping: NamespaceMapping) {
        tracing::debug!(
            prefix = %mapping.prefix,
            directory = %mapping.directory,
            extension = %mapping.extension,
            "registered namespace"
        );

        if let Some(&idx) = self.index.get(&mapping.prefix) {
            self.mappings[idx] = mapping;
        } else {
            self.index.insert(mapping.prefix.clone(), self.mappings.len());
            self.mappings.push(mapping);
        }
    }
}

/// `extension` without surrounding dots and blanks, `None` if nothing is left.
fn explicit_extension(extension: &str) -> Option<&str> {
    Some(extension.trim().trim_matches('.')).filter(|ext| !ext.is_empty())
}
