//! Cross-member validation rules applied after resolution.

use command_bind_core::Error;

use crate::SpecificationProperty;

/// Reports required members that were not parsed and have no declared
/// default.
///
/// A required member of a mutual-exclusion set is satisfied when any member
/// of its set was parsed.
pub fn enforce_required<T>(properties: &[SpecificationProperty<'_, T>]) -> Vec<Error> {
    properties
        .iter()
        .filter(|prop| {
            let spec = prop.specification();
            spec.required && !prop.is_parsed() && spec.default.is_none()
        })
        .filter(|prop| match prop.specification().set_name() {
            Some(set) => !properties
                .iter()
                .any(|other| other.specification().set_name() == Some(set) && other.is_parsed()),
            None => true,
        })
        .map(|prop| Error::MissingRequiredOption {
            name: prop.name_info(),
        })
        .collect()
}

/// Reports each set in which more than one member was parsed with a
/// non-default value, naming every such member.
pub fn enforce_mutually_exclusive_set<T>(properties: &[SpecificationProperty<'_, T>]) -> Vec<Error> {
    let mut sets: Vec<&str> = Vec::new();
    for prop in properties {
        if let Some(set) = prop.specification().set_name() {
            if !sets.contains(&set) {
                sets.push(set);
            }
        }
    }

    sets.into_iter()
        .filter_map(|set| {
            let names: Vec<_> = properties
                .iter()
                .filter(|prop| {
                    prop.specification().set_name() == Some(set) && prop.is_parsed_non_default()
                })
                .map(SpecificationProperty::name_info)
                .collect();
            (names.len() > 1).then(|| Error::MutuallyExclusiveSet {
                set_name: set.to_string(),
                names,
            })
        })
        .collect()
}
