//! Behavior base contract
//!
//! A behavior is the set of custom hooks and methods retrofitted onto one host
//! object. The registry creates exactly one behavior per live host object and
//! resolves attribute access against it once the host's own attributes miss.

use crate::defaults::apply_default_parms;
use crate::errors::BehaviorError;
use crate::host::HostRef;
use crate::parms::ParmDefaults;
use crate::AttrValue;

/// Capabilities every behavior answers to.
pub const BASE_CAPABILITIES: &[&str] = &[
    "on_created",
    "on_loaded",
    "default_parms",
    "apply_default_parms",
];

/// Custom behavior attached to a host object.
///
/// All hooks are optional. Implementations add further named methods through
/// [`Behavior::capabilities`] and [`Behavior::invoke`]; those become reachable
/// through the interception layer once the behavior is registered.
pub trait Behavior {
    /// Back-reference to the host object this behavior augments.
    fn host(&self) -> &HostRef;

    /// Parameter defaults applied when a new object is created.
    fn default_parms(&self) -> ParmDefaults {
        ParmDefaults::new()
    }

    /// Invoked once when the host instantiates a brand-new object.
    ///
    /// Never invoked when restoring persisted state. The default applies
    /// [`Behavior::default_parms`].
    fn on_created(&mut self) -> Result<(), BehaviorError> {
        let host = self.host().upgrade()?;
        apply_default_parms(host.as_ref(), &self.default_parms())?;
        Ok(())
    }

    /// Invoked once per object restored from persisted state, including
    /// copy/paste duplication.
    ///
    /// Objects nested inside a packaged sub-assembly only see this hook if the
    /// sub-assembly's own load hook forwards it.
    fn on_loaded(&mut self) -> Result<(), BehaviorError> {
        Ok(())
    }

    /// Names of additional methods this behavior provides.
    fn capabilities(&self) -> &[&'static str] {
        &[]
    }

    /// Call one of the additional methods listed in [`Behavior::capabilities`].
    fn invoke(&mut self, name: &str, _args: &[AttrValue]) -> Result<AttrValue, BehaviorError> {
        Err(BehaviorError::UnknownCapability(name.to_string()))
    }
}

/// Whether `behavior` answers to `name`, either as a base hook or an added method.
pub fn responds_to(behavior: &dyn Behavior, name: &str) -> bool {
    BASE_CAPABILITIES.contains(&name) || behavior.capabilities().contains(&name)
}

/// Resolve `name` against a behavior.
///
/// Returns `None` when the behavior has no such capability so the caller can
/// report the miss with host context.
pub fn dispatch(
    behavior: &mut dyn Behavior,
    name: &str,
    args: &[AttrValue],
) -> Option<Result<AttrValue, BehaviorError>> {
    let result = match name {
        "on_created" => behavior.on_created().map(|()| AttrValue::Null),
        "on_loaded" => behavior.on_loaded().map(|()| AttrValue::Null),
        "default_parms" => serde_json::to_value(behavior.default_parms())
            .map_err(|e| BehaviorError::failed(e.to_string())),
        "apply_default_parms" => apply_own_defaults(behavior),
        _ if behavior.capabilities().contains(&name) => behavior.invoke(name, args),
        _ => return None,
    };
    Some(result)
}

fn apply_own_defaults(behavior: &dyn Behavior) -> Result<AttrValue, BehaviorError> {
    let host = behavior.host().upgrade()?;
    let applied = apply_default_parms(host.as_ref(), &behavior.default_parms())?;
    Ok(AttrValue::from(applied.applied))
}
