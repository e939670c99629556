//! Extension runtime configuration
//!
//! Layering order: built-in defaults, then a TOML file, then `SPLICE_*`
//! environment variables, then validation.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Environment variable prefix for overrides, e.g. `SPLICE_MISS_POLICY=memoize`.
pub const ENV_PREFIX: &str = "SPLICE_";

/// What the behavior cache does after a failed class resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Ask the loader again on every miss; picks up late registrations.
    #[default]
    Retry,
    /// Remember the failure until the cache is reset.
    Memoize,
}

impl FromStr for MissPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retry" => Ok(Self::Retry),
            "memoize" => Ok(Self::Memoize),
            other => Err(ConfigError::invalid(
                "miss_policy",
                format!("expected 'retry' or 'memoize', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for MissPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Retry => "retry",
            Self::Memoize => "memoize",
        })
    }
}

/// How the type half of a behavior key is derived from a host type name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierScheme {
    /// Bare name component: `labs::filecache::2.0` → `filecache`
    #[default]
    NameComponent,
    /// Whole name, module-safe: `labs::filecache::2.0` → `labs_filecache_2_0`
    FullName,
}

impl FromStr for IdentifierScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name_component" => Ok(Self::NameComponent),
            "full_name" => Ok(Self::FullName),
            other => Err(ConfigError::invalid(
                "identifier_scheme",
                format!("expected 'name_component' or 'full_name', got '{other}'"),
            )),
        }
    }
}

/// Settings for an extension runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionConfig {
    /// Module namespace behaviors are registered under
    pub namespace: String,
    /// Host categories extended with interception at startup
    pub categories: Vec<String>,
    /// Failed class resolution policy
    pub miss_policy: MissPolicy,
    /// Behavior key derivation
    pub identifier_scheme: IdentifierScheme,
    /// `tracing` filter directive
    pub log_filter: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            namespace: "splice.behaviors".to_string(),
            categories: vec!["sop".to_string(), "object".to_string(), "driver".to_string()],
            miss_policy: MissPolicy::Retry,
            identifier_scheme: IdentifierScheme::NameComponent,
            log_filter: "info".to_string(),
        }
    }
}

impl ExtensionConfig {
    /// Defaults, optionally overlaid by a file, then by the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::load_from_file(path)?,
            _ => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `SPLICE_*` environment variables.
    pub fn merge_with_env(&mut self) -> Result<(), ConfigError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `SPLICE_*` pairs from any source; other keys are ignored.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            if let Some(config_key) = key.as_ref().strip_prefix(ENV_PREFIX) {
                self.set_from_string(&config_key.to_lowercase(), value.as_ref())?;
            }
        }
        Ok(())
    }

    /// Set one value from its string form (environment or command line).
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "namespace" => self.namespace = value.trim().to_string(),
            "categories" => {
                self.categories = value
                    .split(',')
                    .map(|c| c.trim().to_lowercase())
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            "miss_policy" => self.miss_policy = value.parse()?,
            "identifier_scheme" => self.identifier_scheme = value.parse()?,
            "log_filter" => self.log_filter = value.trim().to_string(),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Reject configurations the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.is_empty() {
            return Err(ConfigError::invalid("namespace", "must not be empty"));
        }
        let valid_segment =
            |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !self.namespace.split('.').all(valid_segment) {
            return Err(ConfigError::invalid(
                "namespace",
                format!("'{}' is not a dotted module path", self.namespace),
            ));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::invalid(
                "categories",
                "at least one category must be extended",
            ));
        }
        if let Some(bad) = self.categories.iter().find(|c| c.trim().is_empty()) {
            return Err(ConfigError::invalid(
                "categories",
                format!("empty category name '{bad}'"),
            ));
        }
        Ok(())
    }
}
