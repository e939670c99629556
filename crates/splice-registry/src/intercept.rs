//! Interception layer
//!
//! [`Extensions`] is the runtime the host integration talks to. Attribute
//! access goes through [`Extensions::get_attr`]: native host attributes win,
//! then the object's behavior, created lazily on first use and kept until the
//! host destroys the object.

use crate::catalog::{BehaviorCatalog, BehaviorLoader};
use crate::error::{ExtensionError, MissReason};
use crate::identifier::resolve_key;
use crate::instances::{BehaviorHandle, InstanceTable};
use crate::lifecycle;
use splice_core::{dispatch, AttrValue, ExtensionConfig, HostId, HostObject, HostRef};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Behavior registry and attribute interception for one host process.
///
/// Single-threaded. No internal borrow is held while host or behavior code
/// runs, so behaviors may call back into the registry. A behavior calling
/// one of its own capabilities through the registry gets
/// [`ExtensionError::BehaviorBusy`].
pub struct Extensions {
    pub(crate) config: ExtensionConfig,
    catalog: RefCell<BehaviorCatalog>,
    instances: Rc<RefCell<InstanceTable>>,
    pub(crate) installed: RefCell<BTreeSet<String>>,
}

impl Extensions {
    /// Create a runtime with no categories installed.
    pub fn new(config: ExtensionConfig, loader: impl BehaviorLoader + 'static) -> Self {
        let catalog = BehaviorCatalog::new(
            config.namespace.clone(),
            Box::new(loader),
            config.miss_policy,
        );
        Self {
            config,
            catalog: RefCell::new(catalog),
            instances: Rc::new(RefCell::new(InstanceTable::new())),
            installed: RefCell::new(BTreeSet::new()),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Behavior instance for `host`, created on first use.
    ///
    /// Later calls for the same live object return the same instance.
    pub fn resolve(&self, host: &Rc<dyn HostObject>) -> Result<BehaviorHandle, ExtensionError> {
        let id = host.host_id();
        if !host.is_alive() {
            return Err(ExtensionError::HostDestroyed { host: id });
        }

        let existing = self.instances.borrow().get(id);
        if let Some(handle) = existing {
            return Ok(handle);
        }

        let category = host.category_name().to_lowercase();
        if !self.is_installed(&category) {
            return Err(ExtensionError::NotExtended { category });
        }

        let key = resolve_key(host.as_ref(), self.config.identifier_scheme);
        let class = self.catalog.borrow_mut().resolve(&key).map_err(|source| {
            ExtensionError::NoBehavior {
                host_type: host.type_label(),
                source,
            }
        })?;

        let fresh = BehaviorHandle::new(key, class.instantiate(HostRef::new(host)));
        let stored = self.instances.borrow_mut().insert(id, fresh.clone());
        if !stored.same_instance(&fresh) {
            // The factory registered this object itself
            return Ok(stored);
        }

        if let Err(err) = lifecycle::watch(host.as_ref(), Rc::downgrade(&self.instances)) {
            let rolled_back = self.instances.borrow_mut().evict(id);
            drop(rolled_back);
            tracing::warn!(host = %id, error = %err, "destruction subscription failed");
            return Err(err.into());
        }

        tracing::debug!(
            host = %id,
            key = %stored.key(),
            host_type = %host.type_label(),
            "registered behavior instance"
        );
        Ok(stored)
    }

    /// Resolve attribute `name` on `host` and call it with `args`.
    ///
    /// Native host attributes take precedence over behavior capabilities of
    /// the same name.
    pub fn get_attr(
        &self,
        host: &Rc<dyn HostObject>,
        name: &str,
        args: &[AttrValue],
    ) -> Result<AttrValue, ExtensionError> {
        if !host.is_alive() {
            return Err(ExtensionError::HostDestroyed {
                host: host.host_id(),
            });
        }
        if host.has_native_attr(name) {
            return Ok(host.call_native(name, args)?);
        }

        let handle = self
            .resolve(host)
            .map_err(|err| attribute_miss(host.as_ref(), name, err))?;
        call_behavior(host.as_ref(), &handle, name, args)
    }

    /// Whether `name` resolves on `host`, natively or through its behavior.
    ///
    /// Never fails. May register the behavior as a side effect.
    pub fn has_attr(&self, host: &Rc<dyn HostObject>, name: &str) -> bool {
        if host.has_native_attr(name) {
            return true;
        }
        match self.resolve(host) {
            Ok(handle) => handle.responds_to(name),
            Err(err) => {
                tracing::trace!(host = %host.host_id(), attribute = name, error = %err, "attribute lookup missed");
                false
            }
        }
    }

    /// Whether a behavior instance is registered for `id`.
    pub fn is_registered(&self, id: HostId) -> bool {
        self.instances.borrow().contains(id)
    }

    /// Number of registered behavior instances.
    pub fn registered_count(&self) -> usize {
        self.instances.borrow().len()
    }

    /// Number of times the behavior loader has been asked for a class.
    pub fn load_count(&self) -> u64 {
        self.catalog.borrow().load_count()
    }

    /// Drop every registered instance and cached class.
    ///
    /// Installed categories stay installed.
    pub fn reset(&self) {
        let dropped = std::mem::take(&mut *self.instances.borrow_mut());
        self.catalog.borrow_mut().reset();
        tracing::info!(instances = dropped.len(), "extension registry reset");
        drop(dropped);
    }
}

/// Dispatch `name` to a registered behavior.
pub(crate) fn call_behavior(
    host: &dyn HostObject,
    handle: &BehaviorHandle,
    name: &str,
    args: &[AttrValue],
) -> Result<AttrValue, ExtensionError> {
    let id = host.host_id();
    let mut behavior = handle
        .instance()
        .try_borrow_mut()
        .map_err(|_| ExtensionError::BehaviorBusy { host: id })?;

    match dispatch(&mut **behavior, name, args) {
        Some(result) => Ok(result?),
        None => Err(ExtensionError::attribute_not_found(
            host.type_label(),
            name,
            MissReason::NotProvided(handle.key().clone()),
        )),
    }
}

/// Report a failed lazy registration as an attribute miss.
fn attribute_miss(host: &dyn HostObject, name: &str, err: ExtensionError) -> ExtensionError {
    match err {
        ExtensionError::NoBehavior { host_type, source } => {
            ExtensionError::attribute_not_found(host_type, name, MissReason::NoBehavior(source))
        }
        ExtensionError::NotExtended { category } => ExtensionError::attribute_not_found(
            host.type_label(),
            name,
            MissReason::NotExtended(category),
        ),
        other => other,
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("namespace", &self.config.namespace)
            .field("installed", &self.installed.borrow())
            .field("registered", &self.registered_count())
            .field("catalog", &self.catalog.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BehaviorTable;
    use assert_matches::assert_matches;
    use serde_json::json;
    use splice_core::{Behavior, BehaviorError, HostError};
    use splice_testkit::{fixtures, MockScene};

    struct Greeter {
        host: HostRef,
        calls: u32,
    }

    impl Behavior for Greeter {
        fn host(&self) -> &HostRef {
            &self.host
        }

        fn capabilities(&self) -> &[&'static str] {
            &["greet", "name", "calls"]
        }

        fn invoke(&mut self, name: &str, _args: &[AttrValue]) -> Result<AttrValue, BehaviorError> {
            self.calls += 1;
            match name {
                "greet" => Ok(json!("hello")),
                "name" => Ok(json!("shadowed")),
                "calls" => Ok(json!(self.calls)),
                other => Err(BehaviorError::UnknownCapability(other.to_string())),
            }
        }
    }

    fn extensions() -> Extensions {
        let config = ExtensionConfig::default();
        let mut table = BehaviorTable::new();
        table.register_behavior(&config.namespace, "object", "cam", |host| Greeter {
            host,
            calls: 0,
        });
        let extensions = Extensions::new(config, table);
        extensions.install(&["object", "sop", "driver"]);
        extensions
    }

    #[test]
    fn test_same_instance_for_repeated_access() {
        let extensions = extensions();
        let scene = MockScene::new();
        let cam = fixtures::camera(&scene).as_host();

        let first = extensions.resolve(&cam).unwrap();
        let second = extensions.resolve(&cam).unwrap();
        assert!(first.same_instance(&second));
        assert_eq!(extensions.registered_count(), 1);
        assert_eq!(extensions.load_count(), 1);

        // State persists across accesses on the one instance
        extensions.get_attr(&cam, "calls", &[]).unwrap();
        assert_eq!(extensions.get_attr(&cam, "calls", &[]).unwrap(), json!(2));
    }

    #[test]
    fn test_native_attribute_wins() {
        let extensions = extensions();
        let scene = MockScene::new();
        let node = fixtures::camera(&scene);
        let cam = node.as_host();

        assert_eq!(extensions.get_attr(&cam, "name", &[]).unwrap(), json!("cam1"));
        assert_eq!(node.native_calls(), 1);
        // Native hits never register a behavior
        assert!(!extensions.is_registered(cam.host_id()));
        assert_eq!(extensions.get_attr(&cam, "greet", &[]).unwrap(), json!("hello"));
    }

    #[test]
    fn test_missing_capability_names_type_and_attribute() {
        let extensions = extensions();
        let scene = MockScene::new();
        let cam = fixtures::camera(&scene).as_host();

        let err = extensions.get_attr(&cam, "publish", &[]).unwrap_err();
        assert_matches!(
            err,
            ExtensionError::AttributeNotFound { reason: MissReason::NotProvided(_), .. }
        );
        assert!(err.to_string().contains("Object/cam"));
        assert!(err.to_string().contains("'publish'"));
    }

    #[test]
    fn test_uninstalled_category_is_not_intercepted() {
        let extensions = Extensions::new(ExtensionConfig::default(), BehaviorTable::new());
        let scene = MockScene::new();
        let cam = fixtures::camera(&scene).as_host();

        assert_matches!(
            extensions.resolve(&cam),
            Err(ExtensionError::NotExtended { ref category }) if category == "object"
        );
        assert_eq!(extensions.get_attr(&cam, "name", &[]).unwrap(), json!("cam1"));
        assert_eq!(extensions.load_count(), 0);
    }

    #[test]
    fn test_destroyed_host_is_never_registered() {
        let extensions = extensions();
        let scene = MockScene::new();
        let node = fixtures::camera(&scene);
        let cam = node.as_host();
        scene.destroy(&node);

        assert_matches!(
            extensions.get_attr(&cam, "greet", &[]),
            Err(ExtensionError::HostDestroyed { .. })
        );
        assert_eq!(extensions.registered_count(), 0);
    }

    #[test]
    fn test_stale_handle_after_eviction_is_rejected() {
        let extensions = extensions();
        let scene = MockScene::new();
        let node = fixtures::camera(&scene);
        let cam = node.as_host();
        let id = cam.host_id();

        extensions.resolve(&cam).unwrap();
        scene.destroy(&node);
        assert!(!extensions.is_registered(id));

        assert_matches!(
            extensions.resolve(&cam),
            Err(ExtensionError::HostDestroyed { host }) if host == id
        );
        assert!(!extensions.has_attr(&cam, "greet"));
        assert!(!extensions.is_registered(id));
        assert_eq!(node.subscriptions(), 1);
    }

    #[test]
    fn test_refused_subscription_rolls_back_registration() {
        let extensions = extensions();
        let scene = MockScene::new();
        let cam = scene
            .node("Object", "cam")
            .refuse_subscriptions()
            .build()
            .as_host();

        assert_matches!(
            extensions.resolve(&cam),
            Err(ExtensionError::Host(HostError::Subscription(_)))
        );
        assert!(!extensions.is_registered(cam.host_id()));
        assert_eq!(extensions.registered_count(), 0);

        // The class stays cached; only the instance is rolled back
        assert!(extensions.resolve(&cam).is_err());
        assert_eq!(extensions.load_count(), 1);
    }

    #[test]
    fn test_has_attr_precedence() {
        let extensions = extensions();
        let scene = MockScene::new();
        let cam = fixtures::camera(&scene).as_host();
        let unknown = fixtures::unknown(&scene).as_host();

        assert!(extensions.has_attr(&cam, "name"));
        assert!(extensions.has_attr(&cam, "greet"));
        assert!(extensions.has_attr(&cam, "on_created"));
        assert!(!extensions.has_attr(&cam, "publish"));
        assert!(extensions.has_attr(&unknown, "name"));
        assert!(!extensions.has_attr(&unknown, "on_created"));
    }

    #[test]
    fn test_reset_drops_instances() {
        let extensions = extensions();
        let scene = MockScene::new();
        let cam = fixtures::camera(&scene).as_host();

        let before = extensions.resolve(&cam).unwrap();
        extensions.reset();
        assert!(!extensions.is_registered(cam.host_id()));

        let after = extensions.resolve(&cam).unwrap();
        assert!(!before.same_instance(&after));
        assert_eq!(extensions.load_count(), 2);
    }
}
