//! In-memory host object

use splice_core::{
    AttrValue, DestroyCallback, Extensible, HostError, HostId, HostObject, ParameterHost,
    ParmComponent, ParmTemplate, ParmTemplateGroup, TypeName,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// A host object owned by a [`crate::MockScene`].
///
/// Native attributes return stored values. Parameters start at their declared
/// defaults. Destruction fires every subscribed callback exactly once.
pub struct MockNode {
    id: HostId,
    category: String,
    type_name: TypeName,
    alive: Cell<bool>,
    natives: RefCell<HashMap<String, AttrValue>>,
    native_calls: Cell<usize>,
    group: RefCell<ParmTemplateGroup>,
    values: RefCell<HashMap<String, Vec<ParmComponent>>>,
    destroy_callbacks: RefCell<Vec<DestroyCallback>>,
    subscriptions: Cell<usize>,
    refuse_subscriptions: bool,
}

impl MockNode {
    pub(crate) fn new(
        id: HostId,
        category: String,
        type_name: TypeName,
        natives: HashMap<String, AttrValue>,
        group: ParmTemplateGroup,
        refuse_subscriptions: bool,
    ) -> Self {
        let values = group
            .iter()
            .map(|t| (t.name().to_string(), t.default_components()))
            .collect();
        Self {
            id,
            category,
            type_name,
            alive: Cell::new(true),
            natives: RefCell::new(natives),
            native_calls: Cell::new(0),
            group: RefCell::new(group),
            values: RefCell::new(values),
            destroy_callbacks: RefCell::new(Vec::new()),
            subscriptions: Cell::new(0),
            refuse_subscriptions,
        }
    }

    /// Upcast to the handle type the registry consumes.
    pub fn as_host(self: &Rc<Self>) -> Rc<dyn HostObject> {
        self.clone()
    }

    /// Destroy the node, firing destruction callbacks once.
    ///
    /// Destroying an already destroyed node does nothing.
    pub fn destroy(&self) {
        if !self.alive.replace(false) {
            return;
        }
        let callbacks = std::mem::take(&mut *self.destroy_callbacks.borrow_mut());
        tracing::trace!(host = %self.id, callbacks = callbacks.len(), "mock node destroyed");
        for mut callback in callbacks {
            callback(self.id);
        }
    }

    /// Add or replace a native attribute after construction.
    pub fn set_native(&self, name: impl Into<String>, value: AttrValue) {
        self.natives.borrow_mut().insert(name.into(), value);
    }

    /// Number of native attribute calls served.
    pub fn native_calls(&self) -> usize {
        self.native_calls.get()
    }

    /// Number of destruction subscriptions ever made.
    pub fn subscriptions(&self) -> usize {
        self.subscriptions.get()
    }

    /// Destruction callbacks still waiting to fire.
    pub fn pending_callbacks(&self) -> usize {
        self.destroy_callbacks.borrow().len()
    }

    /// Declared default components of a parameter (empty if absent).
    pub fn declared_default(&self, name: &str) -> Vec<ParmComponent> {
        self.group
            .borrow()
            .find(name)
            .map(ParmTemplate::default_components)
            .unwrap_or_default()
    }
}

impl Extensible for MockNode {
    fn host_id(&self) -> HostId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }

    fn category_name(&self) -> String {
        self.category.clone()
    }

    fn type_name(&self) -> TypeName {
        self.type_name.clone()
    }

    fn has_native_attr(&self, name: &str) -> bool {
        self.natives.borrow().contains_key(name)
    }

    fn call_native(&self, name: &str, _args: &[AttrValue]) -> Result<AttrValue, HostError> {
        if !self.alive.get() {
            return Err(HostError::Destroyed(self.id));
        }
        self.native_calls.set(self.native_calls.get() + 1);
        self.natives
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| HostError::native(name, "no such native attribute"))
    }

    fn subscribe_destroyed(&self, callback: DestroyCallback) -> Result<(), HostError> {
        if !self.alive.get() {
            return Err(HostError::Destroyed(self.id));
        }
        if self.refuse_subscriptions {
            return Err(HostError::Subscription(format!(
                "{} does not accept destruction callbacks",
                self.id
            )));
        }
        self.subscriptions.set(self.subscriptions.get() + 1);
        self.destroy_callbacks.borrow_mut().push(callback);
        Ok(())
    }
}

impl ParameterHost for MockNode {
    fn parm_template_group(&self) -> ParmTemplateGroup {
        self.group.borrow().clone()
    }

    fn set_parm_template_group(&self, group: ParmTemplateGroup) -> Result<(), HostError> {
        if !self.alive.get() {
            return Err(HostError::Destroyed(self.id));
        }
        // Parameters added by the new group start at their declared defaults
        let mut values = self.values.borrow_mut();
        for template in group.iter() {
            values
                .entry(template.name().to_string())
                .or_insert_with(|| template.default_components());
        }
        values.retain(|name, _| group.find(name).is_some());
        *self.group.borrow_mut() = group;
        Ok(())
    }

    fn has_parm(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
    }

    fn parm_value(&self, name: &str) -> Option<Vec<ParmComponent>> {
        self.values.borrow().get(name).cloned()
    }

    fn set_parm_component(
        &self,
        name: &str,
        index: usize,
        component: ParmComponent,
    ) -> Result<(), HostError> {
        let mut values = self.values.borrow_mut();
        let slots = values
            .get_mut(name)
            .ok_or_else(|| HostError::no_such_parm(name))?;
        let slot = slots
            .get_mut(index)
            .ok_or_else(|| HostError::native(name, format!("no component {index}")))?;
        *slot = component;
        Ok(())
    }
}

impl std::fmt::Debug for MockNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockNode")
            .field("id", &self.id)
            .field("type", &self.type_label())
            .field("alive", &self.alive.get())
            .finish()
    }
}
