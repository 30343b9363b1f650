//! Error types.
//!
//! Only configuration mistakes are errors. A class that cannot be found is a
//! normal outcome and is reported as `false` by the resolver, never as an
//! `AutoloadError`.

use std::io;
use std::path::PathBuf;

/// A configuration error raised while building a [`Registry`](crate::Registry).
#[derive(Debug, thiserror::Error)]
pub enum AutoloadError {
    /// An exception shadow was requested for a namespace that was never registered.
    #[error("the namespace prefix \"{prefix}\" is not set")]
    MissingPrefix {
        /// The fully-qualified prefix that was looked up.
        prefix: String,
    },
}

/// Failure reported by a [`FileLoader`](crate::FileLoader) for a file that exists.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The host refused to load the file.
    #[error("refused to load '{}': {reason}", path.display())]
    Rejected { path: PathBuf, reason: String },
}

impl LoadError {
    /// The path the loader was asked to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Rejected { path, .. } => path,
        }
    }
}
