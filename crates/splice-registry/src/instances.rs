//! Instance registry: host identity → live behavior instance.

use splice_core::{Behavior, BehaviorKey, HostId, BASE_CAPABILITIES};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Shared handle to the single behavior instance of one host object.
///
/// The registry holds the only long-lived strong reference. Callers should
/// drop handles once an access completes.
#[derive(Clone)]
pub struct BehaviorHandle {
    key: BehaviorKey,
    capabilities: Rc<[&'static str]>,
    instance: Rc<RefCell<Box<dyn Behavior>>>,
}

impl BehaviorHandle {
    pub(crate) fn new(key: BehaviorKey, behavior: Box<dyn Behavior>) -> Self {
        Self {
            key,
            capabilities: Rc::from(behavior.capabilities()),
            instance: Rc::new(RefCell::new(behavior)),
        }
    }

    /// Whether the behavior answers to `name`.
    ///
    /// Capabilities are captured at instantiation, so this works while the
    /// behavior is running.
    pub fn responds_to(&self, name: &str) -> bool {
        BASE_CAPABILITIES.contains(&name) || self.capabilities.contains(&name)
    }

    /// Key the behavior was resolved from.
    pub fn key(&self) -> &BehaviorKey {
        &self.key
    }

    /// Whether both handles refer to the same instance.
    pub fn same_instance(&self, other: &BehaviorHandle) -> bool {
        Rc::ptr_eq(&self.instance, &other.instance)
    }

    pub(crate) fn instance(&self) -> &RefCell<Box<dyn Behavior>> {
        &self.instance
    }
}

impl fmt::Debug for BehaviorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorHandle")
            .field("key", &self.key)
            .field("capabilities", &self.capabilities)
            .field("busy", &self.instance.try_borrow().is_err())
            .finish()
    }
}

/// Live behavior instances keyed by host identity.
///
/// At most one entry per identity.
#[derive(Debug, Default)]
pub struct InstanceTable {
    entries: HashMap<HostId, BehaviorHandle>,
}

impl InstanceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered instance for `id`.
    pub fn get(&self, id: HostId) -> Option<BehaviorHandle> {
        self.entries.get(&id).cloned()
    }

    /// Register `handle` for `id`, returning the handle now stored.
    ///
    /// An existing entry is kept and returned; the new handle is discarded.
    pub fn insert(&mut self, id: HostId, handle: BehaviorHandle) -> BehaviorHandle {
        if let Some(existing) = self.entries.get(&id) {
            tracing::warn!(host = %id, key = %existing.key(), "duplicate behavior registration ignored");
            return existing.clone();
        }
        self.entries.insert(id, handle.clone());
        handle
    }

    /// Remove and return the entry for `id`.
    pub fn evict(&mut self, id: HostId) -> Option<BehaviorHandle> {
        self.entries.remove(&id)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: HostId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
