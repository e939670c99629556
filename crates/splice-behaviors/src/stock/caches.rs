//! File cache behaviors
//!
//! Both cache types share the bare name `filecache`, so they are keyed by
//! their module-safe full names and only resolve under
//! [`IdentifierScheme::FullName`](splice_core::IdentifierScheme::FullName).

use splice_core::{Behavior, HostRef, ParmDefaults};

/// Default parameters for one versioned file cache type.
#[derive(Debug, Clone, Copy)]
pub struct CacheProfile {
    /// Lower-cased host category
    pub category: &'static str,
    /// Module-safe full type name, e.g. `labs_filecache_2_0`
    pub type_name: &'static str,
    defaults: fn() -> ParmDefaults,
}

impl CacheProfile {
    /// Defaults applied on creation.
    pub fn defaults(&self) -> ParmDefaults {
        (self.defaults)()
    }
}

/// Scheduler every cache hands its TOP work to.
pub const TOP_SCHEDULER: &str = "/obj/topnet/deadlinescheduler";

/// `sop/filecache::2.0`
pub const FILECACHE_2_0: CacheProfile = CacheProfile {
    category: "sop",
    type_name: "filecache_2_0",
    defaults: || ParmDefaults::from_iter([("topscheduler", TOP_SCHEDULER)]),
};

/// `sop/labs::filecache::2.0`: also points the TOP networks at `/obj/topnet`.
pub const LABS_FILECACHE_2_0: CacheProfile = CacheProfile {
    category: "sop",
    type_name: "labs_filecache_2_0",
    defaults: || {
        let mut defaults = ParmDefaults::new();
        defaults.insert("usecustomtopscheduler", true);
        defaults.insert("topscheduler", TOP_SCHEDULER);
        defaults.insert("topfilecachepath", "/obj/topnet");
        defaults.insert("topmantrapath", "/obj/topnet");
        defaults
    },
};

/// Every cache profile, in registration order.
pub const CACHE_PROFILES: &[CacheProfile] = &[FILECACHE_2_0, LABS_FILECACHE_2_0];

/// Behavior that only supplies creation defaults.
#[derive(Debug)]
pub struct FileCache {
    host: HostRef,
    profile: CacheProfile,
}

impl FileCache {
    /// Bind `profile` to a host object.
    pub fn new(host: HostRef, profile: CacheProfile) -> Self {
        Self { host, profile }
    }
}

impl Behavior for FileCache {
    fn host(&self) -> &HostRef {
        &self.host
    }

    fn default_parms(&self) -> ParmDefaults {
        self.profile.defaults()
    }
}
