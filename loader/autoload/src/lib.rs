//! Namespace-driven class-file autoloader.
//!
//! Maps namespace prefixes to directories and resolves fully-qualified class
//! names to source files on first use, so a project never has to include its
//! class files by hand.
//!
//! # Architecture
//!
//! ```text
//! AutoloadConfig ──► Registry::new()
//!                      │  register("Models")            app\models\ → src/models/, "models"
//!                      │  register_exception_shadow(..)  app\models\exceptions\ → .../exceptions/
//!                      ▼
//!                  ClassResolver::new(registry, loader)   (registry frozen from here on)
//!                      │
//!                      ▼ install()
//!                  AutoloadChain ── ensure_class("App\\Models\\Book")
//!                      │
//!                      ▼
//!   walk prefixes right-to-left ──► candidate paths ──► FileLoader::exists / load
//! ```
//!
//! # File naming
//!
//! ```text
//! {directory}/{class}.{extension}.{source}   book.model.php
//! {directory}/{extension}.{source}           model.php   (the standard class)
//! ```
//!
//! # Debugging
//!
//! Call [`init_tracing`] and set `RUST_LOG=autoload=debug` to see hits and
//! misses, or `RUST_LOG=autoload=trace` to see every probed path.

mod config;
mod error;
pub mod hook;
pub mod loader;
pub mod normalize;
pub mod path;
pub mod registry;
pub mod resolver;

pub use config::{AutoloadConfig, DEFAULT_BASE_DIR, DEFAULT_SOURCE_EXTENSION, ROOT_ENV_VAR};
pub use error::{AutoloadError, LoadError};
pub use hook::{AutoloadChain, ClassHook};
pub use loader::{FileLoader, FsLoader, MemoryLoader};
pub use registry::{NamespaceMapping, Registry};
pub use resolver::ClassResolver;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when `RUST_LOG`
/// is set, e.g. `RUST_LOG=autoload=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
