//! Property-based tests for normalization and the prefix walk.
//!
//! Generates random namespaces and directories and checks the registry
//! invariants hold for any of them, and that resolution never probes a
//! namespace that was not registered.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::path::MAIN_SEPARATOR;

use autoload::normalize::{normalize_directory, normalize_namespace, NAMESPACE_SEPARATOR};
use autoload::resolver::prefix_levels;
use autoload::{AutoloadConfig, ClassResolver, MemoryLoader, Registry};
use proptest::prelude::*;

// -- Strategies --

/// A namespace segment in any case.
fn segment_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9_]{0,8}").expect("valid regex")
}

/// A namespace of 1..5 segments, optionally wrapped in stray separators.
fn namespace_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(segment_strategy(), 1..5),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(segments, leading, trailing)| {
            let mut ns = segments.join("\\");
            if leading {
                ns.insert(0, '\\');
            }
            if trailing {
                ns.push('\\');
            }
            ns
        })
}

/// A directory mixing both separator spellings.
fn directory_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((segment_strategy(), any::<bool>()), 1..5).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(seg, slash)| format!("{seg}{}", if slash { '/' } else { '\\' }))
            .collect::<String>()
    })
}

proptest! {
    #[test]
    fn normalized_namespace_shape(ns in namespace_strategy()) {
        let normalized = normalize_namespace(&ns);

        prop_assert!(!normalized.starts_with(NAMESPACE_SEPARATOR));
        prop_assert!(normalized.ends_with(NAMESPACE_SEPARATOR));
        prop_assert!(!normalized.ends_with("\\\\"));
        prop_assert_eq!(normalized.clone(), normalized.to_ascii_lowercase());
        prop_assert_eq!(normalize_namespace(&normalized), normalized);
    }

    #[test]
    fn normalized_directory_shape(dir in directory_strategy()) {
        let normalized = normalize_directory(&dir);
        let other = if MAIN_SEPARATOR == '/' { '\\' } else { '/' };

        prop_assert!(normalized.ends_with(MAIN_SEPARATOR));
        prop_assert!(!normalized.starts_with(MAIN_SEPARATOR));
        prop_assert!(!normalized.contains(other));
        prop_assert_eq!(normalize_directory(&normalized), normalized);
    }

    #[test]
    fn prefix_levels_cover_every_boundary(ns in namespace_strategy(), class in segment_strategy()) {
        let full = format!("{}{}", normalize_namespace(&ns), class.to_ascii_lowercase());
        let levels: Vec<_> = prefix_levels(&full).collect();

        prop_assert_eq!(levels.len(), full.matches(NAMESPACE_SEPARATOR).count());
        for (prefix, relative) in &levels {
            prop_assert_eq!(format!("{prefix}{relative}"), full.clone());
            prop_assert!(prefix.ends_with(NAMESPACE_SEPARATOR));
        }
        // Most specific first.
        for pair in levels.windows(2) {
            prop_assert!(pair[0].0.len() > pair[1].0.len());
        }
    }

    #[test]
    fn registered_mappings_stay_inside_the_base(
        base in segment_strategy(),
        namespaces in prop::collection::vec(namespace_strategy(), 1..6),
    ) {
        let config = AutoloadConfig::new(base.clone()).with_abspath("/srv/app");
        let mut registry = Registry::new(&config);
        for ns in &namespaces {
            registry.register(ns, None, None);
        }

        let base_prefix = normalize_namespace(&base);
        for mapping in registry.mappings() {
            prop_assert!(mapping.prefix.starts_with(&base_prefix));
            prop_assert!(mapping.directory.starts_with(registry.base().directory()));
            prop_assert!(mapping.directory.ends_with(MAIN_SEPARATOR));
            prop_assert!(!mapping.extension.is_empty());
            prop_assert_eq!(mapping.extension.clone(), mapping.extension.to_ascii_lowercase());
        }
    }

    #[test]
    fn foreign_namespaces_are_never_probed(
        class_ns in namespace_strategy(),
        class in segment_strategy(),
    ) {
        let config = AutoloadConfig::new("Registered").with_abspath("/srv/app");
        let mut registry = Registry::new(&config);
        registry.register("Models", None, None);
        let loader = MemoryLoader::new();
        let resolver = ClassResolver::from_config(&config, registry, &loader);

        // Generated segments are at most 9 characters long, so the 10-character
        // base namespace `Registered` can never be produced.
        let name = format!("{}\\{class}", class_ns.trim_matches('\\'));

        prop_assert!(!resolver.resolve(&name));
        prop_assert!(loader.probes().is_empty());
    }
}
