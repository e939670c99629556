//! # Splice Core - Host Extension Contracts
//!
//! Shared vocabulary for retrofitting type-specific behavior onto objects that
//! are owned and lifecycle-managed by an external host application.
//!
//! - Identifiers: `HostId`, `BehaviorKey`, `TypeName`
//! - Host capabilities: `Extensible` (identity, introspection, native attributes,
//!   destruction events) and `ParameterHost` (parameter templates and values)
//! - Behavior base contract: `Behavior` hooks plus default-parameter application
//! - Configuration: `ExtensionConfig` loaded from TOML and `SPLICE_*` variables
//!
//! # Architecture
//!
//! The host object model is closed. Instead of splicing a new ancestor into the
//! host's types, host wrappers implement [`Extensible`] and the registry in
//! `splice-registry` works purely against that trait. Behaviors hold a
//! non-owning [`HostRef`] back to the object they augment.
//!
//! # Example
//!
//! ```ignore
//! use splice_core::{Behavior, HostRef, ParmDefaults};
//!
//! struct Geometry { host: HostRef }
//!
//! impl Behavior for Geometry {
//!     fn host(&self) -> &HostRef { &self.host }
//!
//!     fn default_parms(&self) -> ParmDefaults {
//!         ParmDefaults::from_iter([("sopoutput", "$HIP/geo/$OS.bgeo.sc")])
//!     }
//! }
//! ```

pub mod behavior;
pub mod config;
pub mod defaults;
pub mod errors;
pub mod host;
pub mod identifiers;
pub mod parms;

#[cfg(test)]
mod test_support;

pub use behavior::{dispatch, responds_to, Behavior, BASE_CAPABILITIES};
pub use config::{ExtensionConfig, IdentifierScheme, MissPolicy};
pub use defaults::{apply_default_parms, AppliedDefaults};
pub use errors::{BehaviorError, ConfigError, HostError};
pub use host::{DestroyCallback, Extensible, HostObject, HostRef, ParameterHost};
pub use identifiers::{capitalize, BehaviorKey, HostId, TypeName};
pub use parms::{
    DefaultValue, ParmComponent, ParmDefaults, ParmTemplate, ParmTemplateGroup, ParmValue,
    ValueKind,
};

/// Attribute arguments and results crossing the interception boundary.
pub type AttrValue = serde_json::Value;
