//! Stock behaviors and their registration.

pub mod caches;
pub mod cam;
pub mod outputs;

pub use caches::{CacheProfile, FileCache, CACHE_PROFILES};
pub use cam::Cam;
pub use outputs::{OutputDriver, OutputProfile, PROFILES};

use splice_registry::BehaviorTable;

/// Register every stock behavior under `namespace`.
///
/// Camera and output driver keys use bare type names, matching the default
/// identifier scheme. File cache keys use full names and only resolve when
/// the registry is configured with the full-name scheme. Returns the number
/// of behaviors registered.
pub fn register_all(table: &mut BehaviorTable, namespace: &str) -> usize {
    table.register_behavior(namespace, "object", "cam", Cam::new);

    for profile in PROFILES {
        let profile = *profile;
        table.register_behavior(namespace, profile.category, profile.type_name, move |host| {
            OutputDriver::new(host, profile)
        });
    }

    for profile in CACHE_PROFILES {
        let profile = *profile;
        table.register_behavior(namespace, profile.category, profile.type_name, move |host| {
            FileCache::new(host, profile)
        });
    }

    let count = 1 + PROFILES.len() + CACHE_PROFILES.len();
    tracing::debug!(namespace, behaviors = count, "registered stock behaviors");
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_registry::BehaviorLoader;

    #[test]
    fn test_register_all_uses_conventional_paths() {
        let mut table = BehaviorTable::new();
        let count = register_all(&mut table, "studio.nodes");

        assert_eq!(count, 9);
        assert!(table.contains_module("studio.nodes.object.cam"));
        assert!(table.contains_module("studio.nodes.sop.rop_alembic"));
        assert!(table.contains_module("studio.nodes.sop.labs_filecache_2_0"));

        let class = table.load("studio.nodes", "driver", "usdrender").unwrap();
        assert_eq!(class.class_name(), "Usdrender");
    }
}
