//! Class name resolution.
//!
//! Finds the file of a fully-qualified class by walking its namespace from
//! the most specific prefix to the least specific one:
//!
//! ```text
//! app\models\admin\user
//!   ├── app\models\admin\  + user          (tried first)
//!   ├── app\models\        + admin\user
//!   └── app\               + models\admin\user
//! ```
//!
//! A level whose prefix is not registered is skipped without touching the
//! loader. Once a prefix matches, every registered mapping is probed in
//! registration order, not only the matched one: a class in one namespace may
//! be found under another mapping's directory and extension. This
//! cross-mapping fallback is long-standing behavior that existing layouts rely
//! on; [`AutoloadConfig::without_cross_mapping_fallback`] turns it off.
//!
//! A miss is not an error. [`ClassResolver::resolve`] returns `false` so the
//! next hook in the chain can try.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex, MutexGuard};
use rustc_hash::FxHashMap;

use crate::hook::{AutoloadChain, ClassHook};
use crate::normalize::NAMESPACE_SEPARATOR;
use crate::path::PathBuilder;
use crate::{AutoloadConfig, FileLoader, Registry, DEFAULT_SOURCE_EXTENSION};

/// Resolves class names to files through a frozen [`Registry`].
///
/// The registry is moved in at construction and only read afterwards, so a
/// resolver can be shared across threads when its loader can. A thread that
/// needs a file another thread is loading waits for that load to finish.
pub struct ClassResolver<L> {
    registry: Registry,
    loader: L,
    paths: PathBuilder,
    cross_mapping_fallback: bool,
    /// Files this resolver has loaded or is loading.
    loads: Mutex<FxHashMap<PathBuf, LoadState>>,
    /// Signalled whenever a load finishes.
    settled: Condvar,
}

/// Progress of one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadState {
    /// Being loaded by the given thread.
    Loading(ThreadId),
    Loaded,
}

impl<L: FileLoader> ClassResolver<L> {
    /// Resolver with the default source extension and cross-mapping fallback on.
    pub fn new(registry: Registry, loader: L) -> Self {
        ClassResolver {
            registry,
            loader,
            paths: PathBuilder::new(DEFAULT_SOURCE_EXTENSION),
            cross_mapping_fallback: true,
            loads: Mutex::default(),
            settled: Condvar::new(),
        }
    }

    /// Resolver using the source extension and fallback setting of `config`.
    pub fn from_config(config: &AutoloadConfig, registry: Registry, loader: L) -> Self {
        ClassResolver {
            paths: PathBuilder::new(&config.source_extension),
            cross_mapping_fallback: config.cross_mapping_fallback,
            ..Self::new(registry, loader)
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn source_extension(&self) -> &str {
        self.paths.source_extension()
    }

    pub fn cross_mapping_fallback(&self) -> bool {
        self.cross_mapping_fallback
    }

    /// Find and load the file defining `class`.
    ///
    /// Returns `true` once a candidate file is loaded (or was already loaded
    /// by this resolver), `false` when no candidate exists.
    pub fn resolve(&self, class: &str) -> bool {
        let Some(class) = normalize_class_name(class) else {
            tracing::debug!(class, "not a resolvable class name");
            return false;
        };

        for (prefix, relative) in prefix_levels(&class) {
            for path in self.level_candidates(prefix, relative) {
                if self.load_once(&path) {
                    tracing::debug!(
                        class = %class,
                        prefix,
                        path = %path.display(),
                        "resolved class"
                    );
                    return true;
                }
            }
        }

        tracing::debug!(class = %class, "class not found");
        false
    }

    /// Every path [`resolve`](Self::resolve) would probe for `class`, in order.
    ///
    /// Does not touch the loader.
    pub fn candidates(&self, class: &str) -> Vec<PathBuf> {
        let Some(class) = normalize_class_name(class) else {
            return Vec::new();
        };

        prefix_levels(&class)
            .flat_map(|(prefix, relative)| self.level_candidates(prefix, relative))
            .collect()
    }

    /// Files loaded so far, sorted.
    pub fn loaded_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .loads
            .lock()
            .iter()
            .filter(|(_, state)| **state == LoadState::Loaded)
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        paths
    }

    /// Candidate paths for one namespace level. Empty when `prefix` is not
    /// registered.
    fn level_candidates(&self, prefix: &str, relative: &str) -> Vec<PathBuf> {
        let Some(matched) = self.registry.get(prefix) else {
            return Vec::new();
        };

        if self.cross_mapping_fallback {
            self.registry
                .mappings()
                .iter()
                .map(|m| self.paths.build(&m.directory, &m.extension, relative))
                .collect()
        } else {
            vec![self
                .paths
                .build(&matched.directory, &matched.extension, relative)]
        }
    }

    /// Load `path` unless this resolver already did.
    ///
    /// A load in progress on another thread is waited for. A load in progress
    /// on this thread means a re-entrant resolution from inside that load,
    /// which counts as found.
    fn load_once(&self, path: &Path) -> bool {
        if self.settle(&mut self.loads.lock(), path) {
            return true;
        }

        tracing::trace!(path = %path.display(), "probing");
        if !self.loader.exists(path) {
            return false;
        }

        {
            let mut loads = self.loads.lock();
            if self.settle(&mut loads, path) {
                return true;
            }
            loads.insert(path.to_path_buf(), LoadState::Loading(thread::current().id()));
        }

        let result = self.loader.load(path);

        {
            let mut loads = self.loads.lock();
            if result.is_ok() {
                loads.insert(path.to_path_buf(), LoadState::Loaded);
            } else {
                loads.remove(path);
            }
        }
        self.settled.notify_all();

        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(path = %err.path().display(), "failed to load class file: {err}");
                false
            }
        }
    }

    /// Wait out another thread's load of `path`.
    ///
    /// `true` when the file is loaded or being loaded by this thread, `false`
    /// when nobody holds it and the caller may load it.
    fn settle(
        &self,
        loads: &mut MutexGuard<'_, FxHashMap<PathBuf, LoadState>>,
        path: &Path,
    ) -> bool {
        loop {
            match loads.get(path).copied() {
                None => return false,
                Some(LoadState::Loaded) => {
                    tracing::trace!(path = %path.display(), "already loaded");
                    return true;
                }
                Some(LoadState::Loading(owner)) if owner == thread::current().id() => {
                    tracing::trace!(path = %path.display(), "loading on this thread");
                    return true;
                }
                Some(LoadState::Loading(_)) => {
                    tracing::trace!(path = %path.display(), "waiting for another thread");
                    self.settled.wait(loads);
                }
            }
        }
    }
}

impl<L> ClassResolver<L>
where
    L: FileLoader + Send + Sync + 'static,
{
    /// Install this resolver as a hook of `chain`.
    ///
    /// Consumes the resolver so it is installed exactly once; the returned
    /// handle keeps access to it.
    pub fn install(self, chain: &mut AutoloadChain) -> Arc<Self> {
        let resolver = Arc::new(self);
        chain.register(resolver.clone());
        resolver
    }
}

impl<L> ClassHook for ClassResolver<L>
where
    L: FileLoader + Send + Sync,
{
    fn load_class(&self, class: &str) -> bool {
        self.resolve(class)
    }
}

impl<L> std::fmt::Debug for ClassResolver<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassResolver")
            .field("registry", &self.registry)
            .field("paths", &self.paths)
            .field("cross_mapping_fallback", &self.cross_mapping_fallback)
            .field("loads", &self.loads.lock().len())
            .finish_non_exhaustive()
    }
}

/// Lowercase `class` and drop leading separators.
///
/// `None` for names that cannot denote a class: empty, or ending with a
/// separator.
fn normalize_class_name(class: &str) -> Option<String> {
    let class = class.trim_start_matches(NAMESPACE_SEPARATOR);
    if class.is_empty() || class.ends_with(NAMESPACE_SEPARATOR) {
        return None;
    }
    Some(class.to_ascii_lowercase())
}

/// Split `class` at each namespace separator, rightmost first.
///
/// Yields `(prefix, relative)` pairs where `prefix` keeps its trailing
/// separator and `relative` is everything after it. Runs of separators count
/// as one boundary.
pub fn prefix_levels(class: &str) -> PrefixLevels<'_> {
    PrefixLevels {
        class,
        remaining: class.len(),
    }
}

/// Iterator returned by [`prefix_levels`].
#[derive(Clone, Debug)]
pub struct PrefixLevels<'a> {
    class: &'a str,
    /// Length of the not yet split front of `class`.
    remaining: usize,
}

impl<'a> Iterator for PrefixLevels<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.class[..self.remaining].rfind(NAMESPACE_SEPARATOR)?;
        let (prefix, relative) = self.class.split_at(pos + 1);
        self.remaining = prefix.trim_end_matches(NAMESPACE_SEPARATOR).len();
        Some((prefix, relative))
    }
}
