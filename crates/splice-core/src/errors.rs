//! Error types shared by host wrappers, behaviors and configuration.

use crate::identifiers::HostId;
use thiserror::Error;

/// Failures reported by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// A native attribute call failed inside the host.
    #[error("native attribute '{attribute}' failed: {message}")]
    Native {
        /// Attribute that was called
        attribute: String,
        /// Host-provided reason
        message: String,
    },

    /// The object has no parameter with this name.
    #[error("no parameter named '{0}'")]
    NoSuchParm(String),

    /// The object was destroyed by the host.
    #[error("{0} was destroyed")]
    Destroyed(HostId),

    /// Subscribing to a host event failed.
    #[error("event subscription failed: {0}")]
    Subscription(String),
}

impl HostError {
    /// Create a native call failure.
    pub fn native(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Native {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Create a missing parameter error.
    pub fn no_such_parm(name: impl Into<String>) -> Self {
        Self::NoSuchParm(name.into())
    }
}

/// Failures raised by behavior hooks and capabilities.
///
/// These propagate to the caller unchanged; the registry never rolls back a
/// completed registration because of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BehaviorError {
    /// The host object behind the back-reference no longer exists.
    #[error("host object is gone")]
    HostGone,

    /// Host call failed while the behavior was running.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The behavior does not provide the requested capability.
    #[error("unknown capability '{0}'")]
    UnknownCapability(String),

    /// Arguments passed to a capability were rejected.
    #[error("invalid arguments for '{capability}': {message}")]
    InvalidArguments {
        /// Capability that rejected the call
        capability: String,
        /// Reason
        message: String,
    },

    /// Behavior-specific failure.
    #[error("behavior failed: {0}")]
    Failed(String),
}

impl BehaviorError {
    /// Create an invalid arguments error.
    pub fn invalid_arguments(capability: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            capability: capability.into(),
            message: message.into(),
        }
    }

    /// Create a behavior-specific failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that could not be read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A key passed through the environment or CLI is unknown.
    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    /// A value is present but unacceptable.
    #[error("invalid config value for '{key}': {message}")]
    Invalid {
        /// Offending key
        key: String,
        /// Reason
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}
