//! Startup installation of interception per host category.

use crate::catalog::BehaviorLoader;
use crate::intercept::Extensions;
use crate::telemetry;
use splice_core::{ConfigError, ExtensionConfig};

impl Extensions {
    /// Validate `config`, install logging with its `log_filter`, create the
    /// runtime and install every configured category.
    ///
    /// Logging is left alone if the host already installed a subscriber.
    pub fn bootstrap(
        config: ExtensionConfig,
        loader: impl BehaviorLoader + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        telemetry::init_from_config(&config)?;
        let categories = config.categories.clone();
        let extensions = Self::new(config, loader);
        extensions.install(&categories);
        Ok(extensions)
    }

    /// Extend `categories` with interception.
    ///
    /// Category names are matched case-insensitively. Installing a category
    /// twice has no further effect. Returns how many categories were newly
    /// installed.
    pub fn install<S: AsRef<str>>(&self, categories: &[S]) -> usize {
        let mut installed = self.installed.borrow_mut();
        let mut added = 0;
        for category in categories {
            let category = category.as_ref().trim().to_lowercase();
            if category.is_empty() {
                continue;
            }
            if installed.insert(category.clone()) {
                tracing::info!(category = %category, namespace = %self.config.namespace, "installed behavior interception");
                added += 1;
            }
        }
        added
    }

    /// Whether interception is installed for `category`.
    pub fn is_installed(&self, category: &str) -> bool {
        self.installed.borrow().contains(&category.to_lowercase())
    }

    /// Installed categories in sorted order.
    pub fn installed_categories(&self) -> Vec<String> {
        self.installed.borrow().iter().cloned().collect()
    }
}
