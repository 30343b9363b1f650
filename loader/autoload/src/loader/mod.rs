//! File loaders.
//!
//! The resolver never touches the filesystem itself. It asks a [`FileLoader`]
//! whether a candidate exists and, for the first one that does, to load it.
//! What "load" means belongs to the host: [`FsLoader`] reads the source and
//! hands it to an optional handler, [`MemoryLoader`] serves a virtual file
//! set and records every call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::LoadError;

/// The two filesystem primitives the resolver depends on.
///
/// `exists` may be called speculatively for many candidates. `load` is called
/// at most once per path by a given resolver and only after `exists` returned
/// true for it.
pub trait FileLoader {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Load the file at `path`, making its declarations available.
    fn load(&self, path: &Path) -> Result<(), LoadError>;
}

impl<L: FileLoader + ?Sized> FileLoader for &L {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn load(&self, path: &Path) -> Result<(), LoadError> {
        (**self).load(path)
    }
}

impl<L: FileLoader + ?Sized> FileLoader for Arc<L> {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn load(&self, path: &Path) -> Result<(), LoadError> {
        (**self).load(path)
    }
}

/// Handler invoked with each file's path and source once it is read.
///
/// Returning `Err(reason)` rejects the file.
pub type LoadHandler = Box<dyn Fn(&Path, &str) -> Result<(), String> + Send + Sync>;

/// Loads class files from disk.
///
/// Every loaded source is kept by path so the rest of the process can reach
/// it through [`source`](Self::source).
#[derive(Default)]
pub struct FsLoader {
    sources: Mutex<FxHashMap<PathBuf, Arc<str>>>,
    handler: Option<LoadHandler>,
}

impl FsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader that passes each source to `handler` after reading it.
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&Path, &str) -> Result<(), String> + Send + Sync + 'static,
    {
        FsLoader {
            sources: Mutex::default(),
            handler: Some(Box::new(handler)),
        }
    }

    /// Source of a loaded file.
    pub fn source(&self, path: &Path) -> Option<Arc<str>> {
        self.sources.lock().get(path).cloned()
    }

    /// Paths loaded so far, sorted.
    pub fn loaded(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.sources.lock().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl FileLoader for FsLoader {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load(&self, path: &Path) -> Result<(), LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(handler) = &self.handler {
            handler(path, &content).map_err(|reason| LoadError::Rejected {
                path: path.to_path_buf(),
                reason,
            })?;
        }

        self.sources.lock().insert(path.to_path_buf(), Arc::from(content));
        Ok(())
    }
}

impl std::fmt::Debug for FsLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsLoader")
            .field("loaded", &self.sources.lock().len())
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

/// In-memory loader over a virtual file set.
///
/// Records every `exists` probe and every `load`, in call order.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    files: Mutex<FxHashSet<PathBuf>>,
    rejected: Mutex<FxHashSet<PathBuf>>,
    probes: Mutex<Vec<PathBuf>>,
    loads: Mutex<Vec<PathBuf>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with the given files present.
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let loader = Self::new();
        for file in files {
            loader.add_file(file);
        }
        loader
    }

    pub fn add_file(&self, path: impl Into<PathBuf>) {
        self.files.lock().insert(path.into());
    }

    /// Make loading `path` fail even though it exists.
    pub fn reject(&self, path: impl Into<PathBuf>) {
        self.rejected.lock().insert(path.into());
    }

    /// Every path passed to `exists`, in order.
    pub fn probes(&self) -> Vec<PathBuf> {
        self.probes.lock().clone()
    }

    /// Every path passed to `load`, in order.
    pub fn loads(&self) -> Vec<PathBuf> {
        self.loads.lock().clone()
    }

    /// Forget recorded probes and loads. Files stay.
    pub fn clear_log(&self) {
        self.probes.lock().clear();
        self.loads.lock().clear();
    }
}

impl FileLoader for MemoryLoader {
    fn exists(&self, path: &Path) -> bool {
        self.probes.lock().push(path.to_path_buf());
        self.files.lock().contains(path)
    }

    fn load(&self, path: &Path) -> Result<(), LoadError> {
        self.loads.lock().push(path.to_path_buf());

        if self.rejected.lock().contains(path) {
            return Err(LoadError::Rejected {
                path: path.to_path_buf(),
                reason: "rejected by memory loader".to_string(),
            });
        }

        if self.files.lock().contains(path) {
            Ok(())
        } else {
            Err(LoadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }
}
