//! Autoloader configuration.
//!
//! # Environment Variables
//!
//! - `AUTOLOAD_ROOT`: Project root used when no absolute path is configured.
//!   Falls back to the current working directory.

use std::path::PathBuf;

/// Base directory under the project root when none is given.
pub const DEFAULT_BASE_DIR: &str = "src";

/// Extension of the class source files.
pub const DEFAULT_SOURCE_EXTENSION: &str = "php";

/// Environment variable consulted for the project root.
pub const ROOT_ENV_VAR: &str = "AUTOLOAD_ROOT";

/// Construction-time settings for a [`Registry`](crate::Registry) and the
/// [`ClassResolver`](crate::ClassResolver) that owns it.
///
/// ```text
/// AutoloadConfig::new("Package")
///     .with_base_dir("src")
///     .with_abspath("/srv/app")
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoloadConfig {
    /// Namespace every registered prefix lives under (e.g. `Package`).
    pub base_namespace: String,
    /// Directory under the project root every registered directory lives under.
    pub base_dir: String,
    /// Project root. `None` means `$AUTOLOAD_ROOT`, then the working directory.
    pub abspath: Option<PathBuf>,
    /// Extension of class source files. A leading dot and uppercase letters
    /// are normalized away when the resolver is built.
    pub source_extension: String,
    /// Probe every registered mapping once a prefix matches, not only the
    /// matched one.
    pub cross_mapping_fallback: bool,
}

impl AutoloadConfig {
    /// Configuration for `base_namespace` with every other setting defaulted.
    pub fn new(base_namespace: impl Into<String>) -> Self {
        AutoloadConfig {
            base_namespace: base_namespace.into(),
            base_dir: DEFAULT_BASE_DIR.to_string(),
            abspath: None,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            cross_mapping_fallback: true,
        }
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<String>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    #[must_use]
    pub fn with_abspath(mut self, abspath: impl Into<PathBuf>) -> Self {
        self.abspath = Some(abspath.into());
        self
    }

    /// Set the source file extension. A leading dot is accepted and dropped.
    #[must_use]
    pub fn with_source_extension(mut self, extension: &str) -> Self {
        self.source_extension = extension.trim_start_matches('.').to_ascii_lowercase();
        self
    }

    /// Restrict probing to the mapping whose prefix matched.
    #[must_use]
    pub fn without_cross_mapping_fallback(mut self) -> Self {
        self.cross_mapping_fallback = false;
        self
    }

    /// The project root this configuration resolves to.
    ///
    /// Explicit `abspath` wins, then `$AUTOLOAD_ROOT`, then the current
    /// working directory, then `.`.
    pub fn resolved_abspath(&self) -> PathBuf {
        if let Some(path) = &self.abspath {
            return path.clone();
        }
        if let Some(root) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
            return PathBuf::from(root);
        }
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}
