//! Default-parameter application
//!
//! Changing a template default does not touch a value the host has already
//! materialized, so every applied default is written twice: once into the
//! template group and once as the parameter's current value.

use crate::errors::HostError;
use crate::host::ParameterHost;
use crate::parms::{DefaultValue, ParmComponent, ParmDefaults, ParmTemplate};

/// Outcome of [`apply_default_parms`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedDefaults {
    /// Parameters whose default and current value were updated, in order
    pub applied: Vec<String>,
    /// Requested parameters the host object does not have
    pub skipped: Vec<String>,
}

/// Apply desired defaults to a host object's parameters.
///
/// For each entry:
/// - unknown parameter names are skipped;
/// - a component whose existing default has the same semantic kind as the
///   desired value becomes a literal default, otherwise an expression default;
/// - composite parameters are handled component by component.
///
/// The updated template group is written back before the same components are
/// re-applied as current values.
pub fn apply_default_parms<H: ParameterHost + ?Sized>(
    host: &H,
    defaults: &ParmDefaults,
) -> Result<AppliedDefaults, HostError> {
    let mut outcome = AppliedDefaults::default();
    if defaults.is_empty() {
        return Ok(outcome);
    }

    let mut group = host.parm_template_group();
    let mut planned: Vec<(String, Vec<ParmComponent>)> = Vec::with_capacity(defaults.len());

    for (name, desired) in defaults.iter() {
        let template = if host.has_parm(name) {
            group.find_mut(name)
        } else {
            None
        };
        let Some(template) = template else {
            tracing::debug!(parm = %name, "skipping default for missing parameter");
            outcome.skipped.push(name.clone());
            continue;
        };

        let components = plan_components(template, desired);
        if components.is_empty() {
            outcome.skipped.push(name.clone());
            continue;
        }
        for (index, component) in components.iter().enumerate() {
            template.set_default(index, component.clone());
        }
        planned.push((name.clone(), components));
    }

    host.set_parm_template_group(group)?;

    for (name, components) in planned {
        for (index, component) in components.into_iter().enumerate() {
            host.set_parm_component(&name, index, component)?;
        }
        outcome.applied.push(name);
    }

    tracing::trace!(
        applied = outcome.applied.len(),
        skipped = outcome.skipped.len(),
        "applied parameter defaults"
    );
    Ok(outcome)
}

/// Decide literal vs expression for each component the template can hold.
fn plan_components(template: &ParmTemplate, desired: &DefaultValue) -> Vec<ParmComponent> {
    desired
        .components()
        .iter()
        .zip(0..template.num_components())
        .map(|(value, index)| match template.default_value(index) {
            Some(existing) if existing.same_kind(value) => ParmComponent::Literal(value.clone()),
            _ => ParmComponent::Expression(value.to_expression()),
        })
        .collect()
}


#[cfg(test)]
mod proptest_defaults {
    use super::*;
    use crate::parms::{ParmTemplateGroup, ParmValue};
    use crate::test_support::ParmSheet;
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = ParmValue> {
        prop_oneof![
            any::<bool>().prop_map(ParmValue::Bool),
            (-1000i64..1000).prop_map(ParmValue::Int),
            (-1000.0f64..1000.0).prop_map(ParmValue::Float),
            "[$A-Z_]{1,8}".prop_map(ParmValue::Str),
        ]
    }

    proptest! {
        /// Declared default and current value agree after application, and
        /// each component is literal exactly when the kinds match.
        #[test]
        fn defaults_and_values_agree(existing in arb_value(), desired in arb_value()) {
            let host = ParmSheet::new(
                ParmTemplateGroup::new().with(ParmTemplate::scalar("p", existing.clone())),
            );
            let defaults = ParmDefaults::from_iter([("p", desired.clone())]);

            apply_default_parms(&host, &defaults).unwrap();

            let declared = host.declared_default("p");
            prop_assert_eq!(Some(declared.clone()), host.parm_value("p"));
            prop_assert_eq!(declared[0].is_expression(), !existing.same_kind(&desired));
        }
    }
}
