//! Behavior class cache
//!
//! Maps a [`BehaviorKey`] to the behavior class that implements it. Classes
//! come from a [`BehaviorLoader`]; the default loader is an explicit
//! registration table keyed by the conventional module path
//! `<namespace>.<category>.<type>` and class name `capitalize(type)`.

use crate::error::CatalogError;
use splice_core::{Behavior, BehaviorKey, HostRef, MissPolicy};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Constructor for a behavior bound to one host object.
pub type BehaviorFactory = Rc<dyn Fn(HostRef) -> Box<dyn Behavior>>;

/// A loaded behavior implementation. Immutable once loaded.
pub struct BehaviorClass {
    key: BehaviorKey,
    module_path: String,
    class_name: String,
    factory: BehaviorFactory,
}

impl BehaviorClass {
    /// Bind a factory to a key.
    pub fn new(
        key: BehaviorKey,
        module_path: impl Into<String>,
        class_name: impl Into<String>,
        factory: BehaviorFactory,
    ) -> Self {
        Self {
            key,
            module_path: module_path.into(),
            class_name: class_name.into(),
            factory,
        }
    }

    /// Key this class implements.
    pub fn key(&self) -> &BehaviorKey {
        &self.key
    }

    /// Module the class was loaded from.
    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Exported class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Create a behavior instance bound to `host`.
    pub fn instantiate(&self, host: HostRef) -> Box<dyn Behavior> {
        (self.factory)(host)
    }
}

impl fmt::Debug for BehaviorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorClass")
            .field("key", &self.key)
            .field("module_path", &self.module_path)
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

/// Dynamic resolution of behavior classes by naming convention.
///
/// Absence is an expected outcome, reported as a [`CatalogError`].
pub trait BehaviorLoader {
    /// Load the class for `category`/`type_name` under `namespace`.
    fn load(
        &self,
        namespace: &str,
        category: &str,
        type_name: &str,
    ) -> Result<BehaviorClass, CatalogError>;
}

impl<L: BehaviorLoader + ?Sized> BehaviorLoader for Rc<L> {
    fn load(
        &self,
        namespace: &str,
        category: &str,
        type_name: &str,
    ) -> Result<BehaviorClass, CatalogError> {
        (**self).load(namespace, category, type_name)
    }
}

impl<L: BehaviorLoader> BehaviorLoader for RefCell<L> {
    fn load(
        &self,
        namespace: &str,
        category: &str,
        type_name: &str,
    ) -> Result<BehaviorClass, CatalogError> {
        self.borrow().load(namespace, category, type_name)
    }
}

/// Explicit registration table: module path → exported classes.
///
/// Populated at startup. Share it as `Rc<RefCell<BehaviorTable>>` to register
/// more modules after the runtime is up.
#[derive(Default)]
pub struct BehaviorTable {
    modules: HashMap<String, Vec<(String, BehaviorFactory)>>,
}

impl BehaviorTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Export `class_name` from `module_path`. Re-registering replaces the export.
    pub fn register(
        &mut self,
        module_path: impl Into<String>,
        class_name: impl Into<String>,
        factory: BehaviorFactory,
    ) {
        let class_name = class_name.into();
        let exports = self.modules.entry(module_path.into()).or_default();
        exports.retain(|(name, _)| *name != class_name);
        exports.push((class_name, factory));
    }

    /// Register a behavior under the conventional module path and class name
    /// for `category`/`type_name`.
    pub fn register_behavior<F, B>(
        &mut self,
        namespace: &str,
        category: &str,
        type_name: &str,
        factory: F,
    ) where
        F: Fn(HostRef) -> B + 'static,
        B: Behavior + 'static,
    {
        let key = BehaviorKey::new(category, type_name);
        let factory: BehaviorFactory =
            Rc::new(move |host: HostRef| -> Box<dyn Behavior> { Box::new(factory(host)) });
        self.register(key.module_path(namespace), key.class_name(), factory);
    }

    /// Whether a module is registered.
    pub fn contains_module(&self, module_path: &str) -> bool {
        self.modules.contains_key(module_path)
    }

    /// Number of registered modules.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl BehaviorLoader for BehaviorTable {
    fn load(
        &self,
        namespace: &str,
        category: &str,
        type_name: &str,
    ) -> Result<BehaviorClass, CatalogError> {
        let key = BehaviorKey::new(category, type_name);
        let module_path = key.module_path(namespace);
        let Some(exports) = self.modules.get(&module_path) else {
            return Err(CatalogError::ModuleNotFound { key, module_path });
        };

        let class_name = key.class_name();
        match exports.iter().find(|(name, _)| *name == class_name) {
            Some((_, factory)) => Ok(BehaviorClass::new(
                key,
                module_path,
                class_name,
                factory.clone(),
            )),
            None => Err(CatalogError::ClassNotFound {
                key,
                module_path,
                class_name,
            }),
        }
    }
}

impl fmt::Debug for BehaviorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut modules: Vec<&String> = self.modules.keys().collect();
        modules.sort();
        f.debug_struct("BehaviorTable")
            .field("modules", &modules)
            .finish()
    }
}

/// Process-wide cache in front of a [`BehaviorLoader`].
///
/// Successful loads are cached until [`BehaviorCatalog::reset`]. Failed loads
/// follow the [`MissPolicy`].
pub struct BehaviorCatalog {
    namespace: String,
    loader: Box<dyn BehaviorLoader>,
    policy: MissPolicy,
    classes: HashMap<BehaviorKey, Rc<BehaviorClass>>,
    failures: HashMap<BehaviorKey, CatalogError>,
    load_count: u64,
}

impl BehaviorCatalog {
    /// Create a catalog resolving under `namespace`.
    pub fn new(
        namespace: impl Into<String>,
        loader: Box<dyn BehaviorLoader>,
        policy: MissPolicy,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            loader,
            policy,
            classes: HashMap::new(),
            failures: HashMap::new(),
            load_count: 0,
        }
    }

    /// Resolve the class for `key`, loading it on first use.
    pub fn resolve(&mut self, key: &BehaviorKey) -> Result<Rc<BehaviorClass>, CatalogError> {
        if let Some(class) = self.classes.get(key) {
            return Ok(class.clone());
        }
        if let Some(failure) = self.failures.get(key) {
            return Err(failure.clone());
        }

        self.load_count += 1;
        match self
            .loader
            .load(&self.namespace, key.category(), key.type_name())
        {
            Ok(class) => {
                tracing::debug!(
                    key = %key,
                    module = class.module_path(),
                    class = class.class_name(),
                    "loaded behavior class"
                );
                let class = Rc::new(class);
                self.classes.insert(key.clone(), class.clone());
                Ok(class)
            }
            Err(err) => {
                tracing::trace!(key = %key, error = %err, policy = %self.policy, "behavior class miss");
                if self.policy == MissPolicy::Memoize {
                    self.failures.insert(key.clone(), err.clone());
                }
                Err(err)
            }
        }
    }

    /// Cached class for `key`, without loading.
    pub fn cached(&self, key: &BehaviorKey) -> Option<Rc<BehaviorClass>> {
        self.classes.get(key).cloned()
    }

    /// Number of loader invocations so far.
    pub fn load_count(&self) -> u64 {
        self.load_count
    }

    /// Number of cached classes.
    pub fn cached_count(&self) -> usize {
        self.classes.len()
    }

    /// Failed-resolution policy in effect.
    pub fn policy(&self) -> MissPolicy {
        self.policy
    }

    /// Namespace classes are resolved under.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Forget cached classes and memoized failures.
    pub fn reset(&mut self) {
        self.classes.clear();
        self.failures.clear();
    }
}

impl fmt::Debug for BehaviorCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorCatalog")
            .field("namespace", &self.namespace)
            .field("policy", &self.policy)
            .field("classes", &self.classes.len())
            .field("failures", &self.failures.len())
            .field("load_count", &self.load_count)
            .finish()
    }
}
