//! Class-resolution hook chain.
//!
//! The host side of autoloading: hooks are consulted in registration order
//! the first time a class is needed, until one of them loads it. Classes the
//! chain has seen resolved are remembered, so a hook only ever sees names that
//! are not yet defined.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

/// A callback able to load a class by its fully-qualified name.
pub trait ClassHook: Send + Sync {
    /// Try to make `class` available. `false` means "not mine".
    fn load_class(&self, class: &str) -> bool;
}

impl<F> ClassHook for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn load_class(&self, class: &str) -> bool {
        self(class)
    }
}

/// Ordered set of class hooks plus the classes already defined.
#[derive(Default)]
pub struct AutoloadChain {
    hooks: Vec<Arc<dyn ClassHook>>,
    /// Lowercased names of defined classes.
    defined: Mutex<FxHashSet<String>>,
}

impl AutoloadChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `hook`; it is consulted after every hook registered before it.
    pub fn register(&mut self, hook: Arc<dyn ClassHook>) {
        self.hooks.push(hook);
    }

    /// Make sure `class` is defined, consulting the hooks if it is not yet.
    ///
    /// Class names compare case-insensitively (ASCII).
    pub fn ensure_class(&self, class: &str) -> bool {
        let key = class_key(class);
        if self.defined.lock().contains(&key) {
            return true;
        }

        // Hooks may re-enter the chain while loading, so no lock is held here.
        let found = self.hooks.iter().any(|hook| hook.load_class(class));
        if found {
            self.defined.lock().insert(key);
        } else {
            tracing::debug!(class, hooks = self.hooks.len(), "no hook could load class");
        }
        found
    }

    /// Record `class` as defined without consulting any hook.
    pub fn mark_defined(&self, class: &str) {
        self.defined.lock().insert(class_key(class));
    }

    pub fn is_defined(&self, class: &str) -> bool {
        self.defined.lock().contains(&class_key(class))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for AutoloadChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoloadChain")
            .field("hooks", &self.hooks.len())
            .field("defined", &self.defined.lock().len())
            .finish()
    }
}

fn class_key(class: &str) -> String {
    class
        .trim_start_matches(crate::normalize::NAMESPACE_SEPARATOR)
        .to_ascii_lowercase()
}
