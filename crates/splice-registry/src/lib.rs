//! Splice Registry
//!
//! Lazily attaches type-specific behaviors to objects owned by a host
//! application whose object model cannot be subclassed.
//!
//! # Components
//!
//! - [`identifier`]: host object → [`BehaviorKey`](splice_core::BehaviorKey)
//! - [`catalog`]: behavior class loading and caching
//! - [`instances`]: one behavior instance per live host identity
//! - [`intercept`]: attribute lookup with native precedence
//! - [`lifecycle`]: eviction on host destruction
//! - [`hooks`]: creation, load and callback events from the host
//!
//! # Example
//!
//! ```rust,ignore
//! use splice_core::ExtensionConfig;
//! use splice_registry::{BehaviorTable, Extensions};
//!
//! let mut table = BehaviorTable::new();
//! table.register_behavior("splice.behaviors", "object", "cam", Cam::new);
//!
//! let extensions = Extensions::bootstrap(ExtensionConfig::default(), table)?;
//! extensions.notify_created(&node)?;
//! let resx = extensions.get_attr(&node, "default_parms", &[])?;
//! ```

pub mod catalog;
pub mod error;
pub mod hooks;
pub mod identifier;
pub mod install;
pub mod instances;
pub mod intercept;
pub mod lifecycle;
pub mod telemetry;

pub use catalog::{BehaviorCatalog, BehaviorClass, BehaviorFactory, BehaviorLoader, BehaviorTable};
pub use error::{CatalogError, ExtensionError, MissReason};
pub use hooks::HookOutcome;
pub use identifier::resolve_key;
pub use instances::{BehaviorHandle, InstanceTable};
pub use intercept::Extensions;
pub use telemetry::{init_from_config, init_tracing};
