//! Registry error types

use splice_core::{BehaviorError, BehaviorKey, HostError, HostId};
use std::fmt;
use thiserror::Error;

/// Why a behavior class could not be resolved. Both cases are expected and
/// never fatal to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No module is registered under the conventional path.
    #[error("no behavior module '{module_path}' for {key}")]
    ModuleNotFound {
        /// Key being resolved
        key: BehaviorKey,
        /// `<namespace>.<category>.<type>`
        module_path: String,
    },

    /// The module exists but does not export the conventional class name.
    #[error("module '{module_path}' has no class '{class_name}' for {key}")]
    ClassNotFound {
        /// Key being resolved
        key: BehaviorKey,
        /// Module that was found
        module_path: String,
        /// Capitalized type name that was looked up
        class_name: String,
    },
}

impl CatalogError {
    /// Key the failed resolution was for.
    pub fn key(&self) -> &BehaviorKey {
        match self {
            Self::ModuleNotFound { key, .. } | Self::ClassNotFound { key, .. } => key,
        }
    }
}

/// Why an attribute lookup missed after the native attributes were checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    /// No behavior class resolves for the object's key
    NoBehavior(CatalogError),
    /// The behavior exists but lacks the capability
    NotProvided(BehaviorKey),
    /// The object's category was never extended
    NotExtended(String),
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBehavior(source) => write!(f, "{source}"),
            Self::NotProvided(key) => write!(f, "behavior {key} does not provide it"),
            Self::NotExtended(category) => write!(f, "category '{category}' is not extended"),
        }
    }
}

/// Errors surfaced by the extension registry at an access site.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// Neither the host object nor its behavior has the attribute.
    #[error("{host_type} has no attribute '{attribute}' ({reason})")]
    AttributeNotFound {
        /// Host `Category/type` label
        host_type: String,
        /// Requested attribute
        attribute: String,
        /// What was missing
        reason: MissReason,
    },

    /// No behavior class resolves for this object.
    #[error("no behavior for {host_type}: {source}")]
    NoBehavior {
        /// Host `Category/type` label
        host_type: String,
        /// Resolution failure
        #[source]
        source: CatalogError,
    },

    /// The object's category was not extended at startup.
    #[error("category '{category}' is not extended")]
    NotExtended {
        /// Lower-cased category name
        category: String,
    },

    /// The object was destroyed; evicted identities are never served.
    #[error("{host} was destroyed")]
    HostDestroyed {
        /// Destroyed identity
        host: HostId,
    },

    /// The object's behavior is already executing further up the stack.
    #[error("behavior for {host} is already running")]
    BehaviorBusy {
        /// Identity whose behavior is borrowed
        host: HostId,
    },

    /// Host call failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Behavior hook or capability failed; passed through unchanged.
    #[error(transparent)]
    Behavior(#[from] BehaviorError),
}

impl ExtensionError {
    /// Create an attribute miss.
    pub fn attribute_not_found(
        host_type: impl Into<String>,
        attribute: impl Into<String>,
        reason: MissReason,
    ) -> Self {
        Self::AttributeNotFound {
            host_type: host_type.into(),
            attribute: attribute.into(),
            reason,
        }
    }

    /// Whether this is an attribute miss rather than a failure.
    pub fn is_attribute_not_found(&self) -> bool {
        matches!(self, Self::AttributeNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_not_found_names_key_and_attribute() {
        let key = BehaviorKey::new("bar", "foo");
        let err = ExtensionError::attribute_not_found(
            "Bar/foo",
            "publish",
            MissReason::NoBehavior(CatalogError::ModuleNotFound {
                module_path: key.module_path("ns"),
                key,
            }),
        );

        let message = err.to_string();
        assert!(message.contains("bar/foo"));
        assert!(message.contains("'publish'"));
        assert!(message.contains("ns.bar.foo"));
        assert!(err.is_attribute_not_found());
    }

    #[test]
    fn test_catalog_error_key() {
        let key = BehaviorKey::new("object", "cam");
        let err = CatalogError::ClassNotFound {
            key: key.clone(),
            module_path: "ns.object.cam".to_string(),
            class_name: "Cam".to_string(),
        };
        assert_eq!(err.key(), &key);
        assert!(err.to_string().contains("'Cam'"));
    }
}
