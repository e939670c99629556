//! Mock host application: creates nodes and hands out identities.

use crate::node::MockNode;
use splice_core::{AttrValue, HostId, ParmTemplate, ParmTemplateGroup, ParmValue, TypeName};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Owner of mock host objects.
///
/// Identities are allocated sequentially unless a test asks for a specific one
/// to exercise identity reuse.
#[derive(Debug, Default)]
pub struct MockScene {
    next_id: Cell<u64>,
}

impl MockScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
        }
    }

    /// Start building a node of `category` and full type name `type_name`.
    pub fn node(&self, category: &str, type_name: &str) -> NodeBuilder<'_> {
        NodeBuilder {
            scene: self,
            id: None,
            category: category.to_string(),
            type_name: TypeName::parse(type_name),
            natives: HashMap::new(),
            group: ParmTemplateGroup::new(),
            refuse_subscriptions: false,
        }
    }

    /// Destroy a node, firing its destruction callbacks.
    pub fn destroy(&self, node: &MockNode) {
        node.destroy();
    }

    fn allocate(&self) -> HostId {
        let raw = self.next_id.get().max(1);
        self.next_id.set(raw + 1);
        HostId::new(raw)
    }
}

/// Builder for [`MockNode`].
pub struct NodeBuilder<'a> {
    scene: &'a MockScene,
    id: Option<HostId>,
    category: String,
    type_name: TypeName,
    natives: HashMap<String, AttrValue>,
    group: ParmTemplateGroup,
    refuse_subscriptions: bool,
}

impl NodeBuilder<'_> {
    /// Use a specific identity, e.g. one freed by a destroyed node.
    pub fn with_id(mut self, id: HostId) -> Self {
        self.id = Some(id);
        self
    }

    /// Add a native attribute returning `value`.
    pub fn native(mut self, name: &str, value: AttrValue) -> Self {
        self.natives.insert(name.to_string(), value);
        self
    }

    /// Add a single-component parameter.
    pub fn parm(mut self, name: &str, default: impl Into<ParmValue>) -> Self {
        self.group.append(ParmTemplate::scalar(name, default));
        self
    }

    /// Add an arbitrary parameter template.
    pub fn template(mut self, template: ParmTemplate) -> Self {
        self.group.append(template);
        self
    }

    /// Make the node reject destruction subscriptions.
    pub fn refuse_subscriptions(mut self) -> Self {
        self.refuse_subscriptions = true;
        self
    }

    /// Create the node.
    pub fn build(self) -> Rc<MockNode> {
        let id = self.id.unwrap_or_else(|| self.scene.allocate());
        Rc::new(MockNode::new(
            id,
            self.category,
            self.type_name,
            self.natives,
            self.group,
            self.refuse_subscriptions,
        ))
    }
}
