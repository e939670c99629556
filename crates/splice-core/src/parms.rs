//! Host parameter model
//!
//! Parameters are described by templates (declared defaults) and hold a current
//! value per component. Either may be a literal or an expression evaluated by
//! the host.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic kind of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Integer or floating-point number
    Number,
    /// Free text, including paths
    Text,
    /// On/off toggle
    Toggle,
}

/// A literal parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParmValue {
    /// Toggle value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    Str(String),
}

impl ParmValue {
    /// Semantic kind; integers and floats are both numbers.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Toggle,
            Self::Int(_) | Self::Float(_) => ValueKind::Number,
            Self::Str(_) => ValueKind::Text,
        }
    }

    /// Whether both values share a semantic kind.
    pub fn same_kind(&self, other: &ParmValue) -> bool {
        self.kind() == other.kind()
    }

    /// Expression text the host evaluates to this value.
    pub fn to_expression(&self) -> String {
        match self {
            Self::Bool(true) => "1".to_string(),
            Self::Bool(false) => "0".to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for ParmValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParmValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParmValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParmValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParmValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParmValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParmValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// One component of a declared default or a current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum ParmComponent {
    /// Literal value
    Literal(ParmValue),
    /// Host expression, e.g. `$RESX`
    Expression(String),
}

impl ParmComponent {
    /// Shorthand for an expression component.
    pub fn expression(text: impl Into<String>) -> Self {
        Self::Expression(text.into())
    }

    /// Shorthand for a literal component.
    pub fn literal(value: impl Into<ParmValue>) -> Self {
        Self::Literal(value.into())
    }

    /// Whether this component is an expression.
    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }
}

/// Declared shape and defaults of one parameter.
///
/// `defaults` carries one typed value per component and fixes the parameter's
/// semantic kind. `expressions` overrides the literal default of a component
/// when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParmTemplate {
    name: String,
    defaults: Vec<ParmValue>,
    expressions: Vec<Option<String>>,
}

impl ParmTemplate {
    /// Create a template with literal defaults, one per component.
    pub fn new(name: impl Into<String>, defaults: Vec<ParmValue>) -> Self {
        let expressions = vec![None; defaults.len()];
        Self {
            name: name.into(),
            defaults,
            expressions,
        }
    }

    /// Single-component template.
    pub fn scalar(name: impl Into<String>, default: impl Into<ParmValue>) -> Self {
        Self::new(name, vec![default.into()])
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of components.
    pub fn num_components(&self) -> usize {
        self.defaults.len()
    }

    /// Typed literal default of a component.
    pub fn default_value(&self, index: usize) -> Option<&ParmValue> {
        self.defaults.get(index)
    }

    /// Effective declared default of a component: the expression if one is
    /// set, otherwise the literal.
    pub fn default_component(&self, index: usize) -> Option<ParmComponent> {
        match self.expressions.get(index) {
            Some(Some(expr)) => Some(ParmComponent::Expression(expr.clone())),
            Some(None) => self.defaults.get(index).cloned().map(ParmComponent::Literal),
            None => None,
        }
    }

    /// Effective declared defaults of every component.
    pub fn default_components(&self) -> Vec<ParmComponent> {
        (0..self.num_components())
            .filter_map(|index| self.default_component(index))
            .collect()
    }

    /// Replace a component's declared default. Out-of-range indices are ignored.
    pub fn set_default(&mut self, index: usize, component: ParmComponent) {
        if index >= self.defaults.len() {
            return;
        }
        match component {
            ParmComponent::Literal(value) => {
                self.defaults[index] = value;
                self.expressions[index] = None;
            }
            ParmComponent::Expression(expr) => {
                self.expressions[index] = Some(expr);
            }
        }
    }
}

/// Ordered collection of parameter templates for one host object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParmTemplateGroup {
    templates: Vec<ParmTemplate>,
}

impl ParmTemplateGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a template, builder style.
    pub fn with(mut self, template: ParmTemplate) -> Self {
        self.append(template);
        self
    }

    /// Append a template.
    pub fn append(&mut self, template: ParmTemplate) {
        self.templates.push(template);
    }

    /// Find a template by parameter name.
    pub fn find(&self, name: &str) -> Option<&ParmTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Find a template by parameter name for editing.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut ParmTemplate> {
        self.templates.iter_mut().find(|t| t.name == name)
    }

    /// Iterate over templates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParmTemplate> {
        self.templates.iter()
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the group has no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Desired default for a parameter: a single value or one value per component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Same value for the first (or only) component
    Single(ParmValue),
    /// Component-wise values
    Tuple(Vec<ParmValue>),
}

impl DefaultValue {
    /// Desired values in component order.
    pub fn components(&self) -> &[ParmValue] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Tuple(values) => values,
        }
    }
}

impl<T: Into<ParmValue>> From<T> for DefaultValue {
    fn from(value: T) -> Self {
        Self::Single(value.into())
    }
}

impl From<Vec<ParmValue>> for DefaultValue {
    fn from(values: Vec<ParmValue>) -> Self {
        Self::Tuple(values)
    }
}

/// Ordered map from parameter name to desired default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParmDefaults(IndexMap<String, DefaultValue>);

impl ParmDefaults {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a desired default, keeping first-insertion order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<DefaultValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Desired default for a parameter.
    pub fn get(&self, name: &str) -> Option<&DefaultValue> {
        self.0.get(name)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DefaultValue)> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ParmDefaults
where
    K: Into<String>,
    V: Into<DefaultValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}
