//! Minimal in-crate host used by unit tests.

use crate::errors::HostError;
use crate::host::{DestroyCallback, Extensible, ParameterHost};
use crate::identifiers::{HostId, TypeName};
use crate::parms::{ParmComponent, ParmTemplateGroup};
use crate::AttrValue;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub(crate) struct ParmSheet {
    group: RefCell<ParmTemplateGroup>,
    values: RefCell<HashMap<String, Vec<ParmComponent>>>,
    group_writes: Cell<usize>,
}

impl ParmSheet {
    pub(crate) fn new(group: ParmTemplateGroup) -> Self {
        let values = group
            .iter()
            .map(|t| (t.name().to_string(), t.default_components()))
            .collect();
        Self {
            group: RefCell::new(group),
            values: RefCell::new(values),
            group_writes: Cell::new(0),
        }
    }

    pub(crate) fn declared_default(&self, name: &str) -> Vec<ParmComponent> {
        self.group
            .borrow()
            .find(name)
            .map(|t| t.default_components())
            .unwrap_or_default()
    }

    pub(crate) fn group_writes(&self) -> usize {
        self.group_writes.get()
    }
}

impl ParameterHost for ParmSheet {
    fn parm_template_group(&self) -> ParmTemplateGroup {
        self.group.borrow().clone()
    }

    fn set_parm_template_group(&self, group: ParmTemplateGroup) -> Result<(), HostError> {
        self.group_writes.set(self.group_writes.get() + 1);
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
        match slots.get_mut(index) {
            Some(slot) => {
                *slot = component;
                Ok(())
            }
            None => Err(HostError::native(name, "component index out of range")),
        }
    }
}

impl Extensible for ParmSheet {
    fn host_id(&self) -> HostId {
        HostId::new(1)
    }

    fn is_alive(&self) -> bool {
        true
    }

    fn category_name(&self) -> String {
        "Sop".to_string()
    }

    fn type_name(&self) -> TypeName {
        TypeName::parse("sheet")
    }

    fn has_native_attr(&self, _name: &str) -> bool {
        false
    }

    fn call_native(&self, name: &str, _args: &[AttrValue]) -> Result<AttrValue, HostError> {
        Err(HostError::native(name, "no native attributes"))
    }

    fn subscribe_destroyed(&self, _callback: DestroyCallback) -> Result<(), HostError> {
        Ok(())
    }
}
