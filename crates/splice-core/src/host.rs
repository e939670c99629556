//! Host capability interface
//!
//! The host owns every object and decides when it dies. Wrappers around host
//! objects implement these traits; nothing in Splice mutates the host's type
//! hierarchy.

use crate::errors::{BehaviorError, HostError};
use crate::identifiers::{HostId, TypeName};
use crate::parms::{ParmComponent, ParmTemplateGroup};
use crate::AttrValue;
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback fired once, synchronously, when the host destroys an object.
pub type DestroyCallback = Box<dyn FnMut(HostId)>;

/// Identity, introspection, native attributes and destruction events.
pub trait Extensible {
    /// Stable identity for the object's lifetime.
    fn host_id(&self) -> HostId;

    /// `false` once the host has destroyed the object.
    ///
    /// The registry refuses to register objects reporting `false`, so stale
    /// handles never recreate an evicted entry.
    fn is_alive(&self) -> bool;

    /// Category type name as reported by the host, e.g. `Object`.
    fn category_name(&self) -> String;

    /// Type name with its components, e.g. `labs::filecache::2.0`.
    fn type_name(&self) -> TypeName;

    /// Human-readable `Category/type` label used in error messages.
    fn type_label(&self) -> String {
        format!("{}/{}", self.category_name(), self.type_name())
    }

    /// Whether the host object itself exposes an attribute of this name.
    fn has_native_attr(&self, name: &str) -> bool;

    /// Call a native attribute. Only called when `has_native_attr` is true.
    fn call_native(&self, name: &str, args: &[AttrValue]) -> Result<AttrValue, HostError>;

    /// Register a destruction callback.
    fn subscribe_destroyed(&self, callback: DestroyCallback) -> Result<(), HostError>;
}

/// Parameter templates and current values.
pub trait ParameterHost {
    /// Snapshot of the object's parameter templates.
    fn parm_template_group(&self) -> ParmTemplateGroup;

    /// Replace the object's parameter templates.
    fn set_parm_template_group(&self, group: ParmTemplateGroup) -> Result<(), HostError>;

    /// Whether a parameter of this name exists.
    fn has_parm(&self, name: &str) -> bool;

    /// Current value of every component.
    fn parm_value(&self, name: &str) -> Option<Vec<ParmComponent>>;

    /// Set the current value of one component.
    fn set_parm_component(
        &self,
        name: &str,
        index: usize,
        component: ParmComponent,
    ) -> Result<(), HostError>;
}

/// Everything a behavior may ask of its host object.
pub trait HostObject: Extensible + ParameterHost {}

impl<T: Extensible + ParameterHost + ?Sized> HostObject for T {}

/// Non-owning back-reference from a behavior to its host object.
#[derive(Clone)]
pub struct HostRef {
    id: HostId,
    inner: Weak<dyn HostObject>,
}

impl HostRef {
    /// Downgrade a host handle.
    pub fn new(host: &Rc<dyn HostObject>) -> Self {
        Self {
            id: host.host_id(),
            inner: Rc::downgrade(host),
        }
    }

    /// Identity of the referenced object.
    pub fn id(&self) -> HostId {
        self.id
    }

    /// Borrow the host object for the duration of a call.
    pub fn upgrade(&self) -> Result<Rc<dyn HostObject>, BehaviorError> {
        match self.inner.upgrade() {
            Some(host) if host.is_alive() => Ok(host),
            _ => Err(BehaviorError::HostGone),
        }
    }
}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRef")
            .field("id", &self.id)
            .field("live", &(self.inner.strong_count() > 0))
            .finish()
    }
}
