//! Identifier resolution: host object → behavior key.

use splice_core::{BehaviorKey, Extensible, IdentifierScheme};

/// Compute the behavior key for a host object.
///
/// The category is the host's category type name lower-cased. The type
/// component follows `scheme`. Never loads anything and never fails.
pub fn resolve_key<H: Extensible + ?Sized>(host: &H, scheme: IdentifierScheme) -> BehaviorKey {
    let category = host.category_name().to_lowercase();
    let type_name = host.type_name();
    let type_part = match scheme {
        IdentifierScheme::NameComponent => type_name.name().to_string(),
        IdentifierScheme::FullName => type_name.module_safe_name(),
    };
    BehaviorKey::new(category, type_part)
}
