//! Splice Stock Behaviors
//!
//! Reference behaviors for common host object types:
//!
//! - `object/cam`: resolution, pixel aspect and aperture tied to scene variables
//! - output drivers (`geometry`, `alembic`, `rop_alembic`, `ifd`, `usdrender`,
//!   `arnold`): output paths laid out per scene file
//! - file caches (`filecache::2.0`, `labs::filecache::2.0`): TOP scheduler
//!   defaults, keyed by full type name
//!
//! Register them at startup with [`register_all`] before bootstrapping the
//! registry.

pub mod stock;

pub use stock::{
    register_all, CacheProfile, Cam, FileCache, OutputDriver, OutputProfile, CACHE_PROFILES,
    PROFILES,
};
