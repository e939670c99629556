//! Identifiers for host objects and the behaviors bound to them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a host object for as long as the host keeps it alive.
///
/// The host may reuse an identity value after the object is destroyed, so a
/// `HostId` says nothing about the object's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostId(u64);

impl HostId {
    /// Wrap a raw host identity value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host#{}", self.0)
    }
}

impl From<u64> for HostId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Immutable `(category, type)` pair selecting which behavior applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BehaviorKey {
    category: String,
    type_name: String,
}

impl BehaviorKey {
    /// Create a key from a category and a type name.
    pub fn new(category: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            type_name: type_name.into(),
        }
    }

    /// Host object category, e.g. `object` or `sop`.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Host object type within the category, e.g. `cam`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Module path that provides this behavior: `<namespace>.<category>.<type>`.
    pub fn module_path(&self, namespace: &str) -> String {
        format!("{namespace}.{}.{}", self.category, self.type_name)
    }

    /// Class name the module is expected to export.
    pub fn class_name(&self) -> String {
        capitalize(&self.type_name)
    }
}

impl fmt::Display for BehaviorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.type_name)
    }
}

/// Upper-case the first character and lower-case the rest.
///
/// `filecache_2_0` becomes `Filecache_2_0`, `rop_ALEMBIC` becomes `Rop_alembic`.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// A host type name split into its `scope::namespace::name::version` components.
///
/// Only `name` is mandatory. Parsing follows the host convention that a version
/// is a trailing component starting with a digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    scope: String,
    namespace: String,
    name: String,
    version: String,
}

impl TypeName {
    /// Build a type name from explicit components.
    pub fn from_components(
        scope: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse a full type name such as `labs::filecache::2.0`.
    pub fn parse(full: &str) -> Self {
        let mut parts: Vec<&str> = full.split("::").collect();
        let has_version = parts.len() > 1
            && parts
                .last()
                .is_some_and(|last| last.starts_with(|c: char| c.is_ascii_digit()));
        let version = if has_version {
            parts.pop().unwrap_or_default()
        } else {
            ""
        };
        let name = parts.pop().unwrap_or_default();
        let namespace = parts.pop().unwrap_or_default();
        let scope = parts.join("::");

        Self::from_components(scope, namespace, name, version)
    }

    /// Scope component (usually empty).
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Namespace component, e.g. `labs`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Bare type name, e.g. `filecache`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version component, e.g. `2.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Rejoin the non-empty components with `::`.
    pub fn full_name(&self) -> String {
        [
            self.scope.as_str(),
            self.namespace.as_str(),
            self.name.as_str(),
            self.version.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("::")
    }

    /// Full name folded into a module-safe identifier: `labs_filecache_2_0`.
    pub fn module_safe_name(&self) -> String {
        self.full_name()
            .to_lowercase()
            .replace("::", "_")
            .replace('.', "_")
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
