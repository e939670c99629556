//! Host hook dispatch
//!
//! Entry points the host's startup scripts call after a node is created,
//! loaded or pasted, and from parameter callbacks.

use crate::error::ExtensionError;
use crate::intercept::Extensions;
use splice_core::{AttrValue, HostObject};
use std::rc::Rc;

/// Result of forwarding a host event to a behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The behavior hook ran
    Ran,
    /// The object has no behavior answering to the hook
    Skipped,
}

impl Extensions {
    /// Forward a user creation event. Runs `on_created` if the object has one.
    pub fn notify_created(&self, host: &Rc<dyn HostObject>) -> Result<HookOutcome, ExtensionError> {
        self.run_hook(host, "on_created")
    }

    /// Forward a scene load or paste event. Runs `on_loaded` if the object has
    /// one.
    pub fn notify_loaded(&self, host: &Rc<dyn HostObject>) -> Result<HookOutcome, ExtensionError> {
        self.run_hook(host, "on_loaded")
    }

    /// Run a named capability from a UI callback, e.g. a parameter button.
    pub fn invoke_callback(
        &self,
        host: &Rc<dyn HostObject>,
        name: &str,
        args: &[AttrValue],
    ) -> Result<AttrValue, ExtensionError> {
        tracing::debug!(host = %host.host_id(), callback = name, "invoking callback");
        self.get_attr(host, name, args)
    }

    fn run_hook(&self, host: &Rc<dyn HostObject>, hook: &str) -> Result<HookOutcome, ExtensionError> {
        if !self.has_attr(host, hook) {
            tracing::trace!(host = %host.host_id(), hook, "no hook to run");
            return Ok(HookOutcome::Skipped);
        }
        self.get_attr(host, hook, &[])?;
        tracing::debug!(host = %host.host_id(), hook, host_type = %host.type_label(), "ran host hook");
        Ok(HookOutcome::Ran)
    }
}
