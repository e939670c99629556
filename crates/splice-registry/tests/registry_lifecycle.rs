//! End-to-end registry behavior against the mock host
//!
//! Covers lazy registration, eviction on destruction, identity reuse, class
//! caching under both miss policies and re-entrant behavior calls.

use assert_matches::assert_matches;
use serde_json::json;
use splice_core::{
    AttrValue, Behavior, BehaviorError, ExtensionConfig, HostRef, IdentifierScheme, MissPolicy,
    ParmComponent, ParmDefaults,
};
use splice_registry::{BehaviorTable, CatalogError, ExtensionError, Extensions, MissReason};
use splice_testkit::{fixtures, MockScene};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

const NAMESPACE: &str = "splice.behaviors";

struct Cam {
    host: HostRef,
}

impl Behavior for Cam {
    fn host(&self) -> &HostRef {
        &self.host
    }

    fn default_parms(&self) -> ParmDefaults {
        ParmDefaults::from_iter([("resx", "$RESX"), ("resy", "$RESY")])
    }
}

/// Behavior that calls back into the registry for its own host.
struct Reentrant {
    host: HostRef,
    extensions: Weak<Extensions>,
}

impl Behavior for Reentrant {
    fn host(&self) -> &HostRef {
        &self.host
    }

    fn capabilities(&self) -> &[&'static str] {
        &["recurse", "native_name"]
    }

    fn invoke(&mut self, name: &str, _args: &[AttrValue]) -> Result<AttrValue, BehaviorError> {
        let extensions = self
            .extensions
            .upgrade()
            .ok_or_else(|| BehaviorError::failed("registry gone"))?;
        let host = self.host.upgrade()?;
        let attribute = match name {
            "recurse" => "recurse",
            _ => "name",
        };
        extensions
            .get_attr(&host, attribute, &[])
            .map_err(|err| BehaviorError::failed(err.to_string()))
    }
}

fn config(policy: MissPolicy) -> ExtensionConfig {
    ExtensionConfig {
        miss_policy: policy,
        categories: vec!["object".into(), "driver".into(), "bar".into()],
        ..ExtensionConfig::default()
    }
}

fn cam_table() -> BehaviorTable {
    let mut table = BehaviorTable::new();
    table.register_behavior(NAMESPACE, "object", "cam", |host| Cam { host });
    table
}

#[test]
fn test_first_access_registers_and_subscribes_once() {
    let extensions = Extensions::bootstrap(config(MissPolicy::Retry), cam_table()).unwrap();
    let scene = MockScene::new();
    let node = fixtures::camera(&scene);
    let cam = node.as_host();

    extensions.get_attr(&cam, "default_parms", &[]).unwrap();
    extensions.get_attr(&cam, "default_parms", &[]).unwrap();

    assert!(extensions.is_registered(cam.host_id()));
    assert_eq!(node.subscriptions(), 1);
}

#[test]
fn test_destruction_evicts_and_identity_reuse_starts_fresh() {
    let extensions = Extensions::bootstrap(config(MissPolicy::Retry), cam_table()).unwrap();
    let scene = MockScene::new();
    let node = fixtures::camera(&scene);
    let cam = node.as_host();
    let id = cam.host_id();

    let key = extensions.resolve(&cam).unwrap().key().clone();

    scene.destroy(&node);
    assert!(!extensions.is_registered(id));
    assert_eq!(extensions.registered_count(), 0);

    // Destroyed handles are never served
    assert_matches!(
        extensions.resolve(&cam),
        Err(ExtensionError::HostDestroyed { host }) if host == id
    );

    let reused = scene.node("Object", "cam").with_id(id).build().as_host();
    let fresh = extensions.resolve(&reused).unwrap();
    assert_eq!(fresh.key(), &key);
    assert!(extensions.is_registered(id));
}

#[test]
fn test_behavior_does_not_keep_host_alive() {
    let extensions = Extensions::bootstrap(config(MissPolicy::Retry), cam_table()).unwrap();
    let scene = MockScene::new();
    let node = fixtures::camera(&scene);
    let cam = node.as_host();
    extensions.resolve(&cam).unwrap();

    let weak = Rc::downgrade(&node);
    drop(cam);
    drop(node);
    assert!(weak.upgrade().is_none());
}

#[test]
fn test_unknown_type_reports_attribute_not_found() {
    let extensions = Extensions::bootstrap(config(MissPolicy::Retry), cam_table()).unwrap();
    let scene = MockScene::new();
    let foo = fixtures::unknown(&scene).as_host();

    let err = extensions.get_attr(&foo, "publish", &[]).unwrap_err();
    assert_matches!(
        &err,
        ExtensionError::AttributeNotFound {
            reason: MissReason::NoBehavior(CatalogError::ModuleNotFound { .. }),
            ..
        }
    );
    let message = err.to_string();
    assert!(message.contains("bar/foo"), "{message}");
    assert!(message.contains("'publish'"), "{message}");
    assert!(!extensions.is_registered(foo.host_id()));

    // Native attributes still work on objects without a behavior
    assert_eq!(extensions.get_attr(&foo, "name", &[]).unwrap(), json!("foo1"));
}

#[test]
fn test_loader_called_once_per_key() {
    let extensions = Extensions::bootstrap(config(MissPolicy::Retry), cam_table()).unwrap();
    let scene = MockScene::new();

    for _ in 0..4 {
        let cam = fixtures::camera(&scene).as_host();
        extensions.resolve(&cam).unwrap();
    }

    assert_eq!(extensions.registered_count(), 4);
    assert_eq!(extensions.load_count(), 1);
}

#[test]
fn test_retry_policy_picks_up_late_registration() {
    let table = Rc::new(RefCell::new(BehaviorTable::new()));
    let extensions = Extensions::bootstrap(config(MissPolicy::Retry), table.clone()).unwrap();
    let scene = MockScene::new();
    let cam = fixtures::camera(&scene).as_host();

    assert!(extensions.resolve(&cam).is_err());
    assert!(extensions.resolve(&cam).is_err());
    assert_eq!(extensions.load_count(), 2);

    table
        .borrow_mut()
        .register_behavior(NAMESPACE, "object", "cam", |host| Cam { host });
    assert!(extensions.resolve(&cam).is_ok());
    assert_eq!(extensions.load_count(), 3);
}

#[test]
fn test_memoize_policy_skips_loader_until_reset() {
    let table = Rc::new(RefCell::new(BehaviorTable::new()));
    let extensions = Extensions::bootstrap(config(MissPolicy::Memoize), table.clone()).unwrap();
    let scene = MockScene::new();
    let cam = fixtures::camera(&scene).as_host();

    assert!(extensions.resolve(&cam).is_err());
    table
        .borrow_mut()
        .register_behavior(NAMESPACE, "object", "cam", |host| Cam { host });
    assert!(extensions.resolve(&cam).is_err());
    assert_eq!(extensions.load_count(), 1);

    extensions.reset();
    assert!(extensions.resolve(&cam).is_ok());
    assert_eq!(extensions.load_count(), 2);
}

#[test]
fn test_created_hook_applies_default_parms() {
    let extensions = Extensions::bootstrap(config(MissPolicy::Retry), cam_table()).unwrap();
    let scene = MockScene::new();
    let node = fixtures::camera(&scene);
    let cam = node.as_host();

    extensions.notify_created(&cam).unwrap();

    let expected = vec![ParmComponent::expression("$RESX")];
    assert_eq!(node.declared_default("resx"), expected);
    assert_eq!(cam.parm_value("resx"), Some(expected));
    // Parameters without a default entry are untouched
    assert_eq!(cam.parm_value("aspect"), Some(vec![ParmComponent::literal(1.0)]));
}

#[test]
fn test_loaded_hook_leaves_parameters_alone() {
    let extensions = Extensions::bootstrap(config(MissPolicy::Retry), cam_table()).unwrap();
    let scene = MockScene::new();
    let node = fixtures::camera(&scene);
    let cam = node.as_host();

    extensions.notify_loaded(&cam).unwrap();
    assert_eq!(cam.parm_value("resx"), Some(vec![ParmComponent::literal(1920)]));
}

#[test]
fn test_reentrant_call_into_own_behavior_is_busy() {
    let extensions = Rc::new_cyclic(|weak: &Weak<Extensions>| {
        let weak = weak.clone();
        let mut table = BehaviorTable::new();
        table.register_behavior(NAMESPACE, "object", "cam", move |host| Reentrant {
            host,
            extensions: weak.clone(),
        });
        Extensions::new(config(MissPolicy::Retry), table)
    });
    extensions.install(&["object"]);
    let scene = MockScene::new();
    let cam = fixtures::camera(&scene).as_host();

    // Native attributes are reachable from inside a running behavior
    assert_eq!(
        extensions.get_attr(&cam, "native_name", &[]).unwrap(),
        json!("cam1")
    );

    let err = extensions.get_attr(&cam, "recurse", &[]).unwrap_err();
    assert_matches!(err, ExtensionError::Behavior(BehaviorError::Failed(ref message)) if message.contains("already running"));
}

#[test]
fn test_full_name_scheme_keys_by_namespace_and_version() {
    let config = ExtensionConfig::from_toml_str(
        "categories = [\"sop\"]\nidentifier_scheme = \"full_name\"",
    )
    .unwrap();
    assert_eq!(config.identifier_scheme, IdentifierScheme::FullName);

    let mut table = BehaviorTable::new();
    table.register_behavior(NAMESPACE, "sop", "labs_filecache_2_0", |host| Cam { host });
    let extensions = Extensions::bootstrap(config, table).unwrap();
    let scene = MockScene::new();

    let labs = scene.node("Sop", "labs::filecache::2.0").build().as_host();
    let handle = extensions.resolve(&labs).unwrap();
    assert_eq!(handle.key().to_string(), "sop/labs_filecache_2_0");

    // Same bare name, different namespace: a separate key with no behavior
    let plain = scene.node("Sop", "filecache::2.0").build().as_host();
    let err = extensions.get_attr(&plain, "default_parms", &[]).unwrap_err();
    assert_matches!(
        &err,
        ExtensionError::AttributeNotFound {
            reason: MissReason::NoBehavior(CatalogError::ModuleNotFound { .. }),
            ..
        }
    );
    assert!(err.to_string().contains("filecache_2_0"), "{err}");
    assert_eq!(extensions.load_count(), 2);
}
