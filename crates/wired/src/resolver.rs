//! Characteristic contracts of a component
//!
//! Only the contracts a type declares itself are roles worth wiring by.
//! Contracts contributed by an ancestor describe the ancestor, and helper
//! contracts (event listeners and the like) are plumbing.

use crate::manifest::Blueprint;
use crate::role::Role;

/// Roles under which an instance described by `blueprint` is registered,
/// besides its own type. Declaration order is kept; duplicates are dropped.
pub fn characteristic_interfaces<S: AsRef<str>>(
    blueprint: &Blueprint,
    helper_suffixes: &[S],
) -> Vec<Role> {
    let mut characteristic: Vec<Role> = Vec::new();
    for role in blueprint.declared_interfaces() {
        if characteristic.contains(&role) || blueprint.inherited_interfaces().contains(&role) {
            continue;
        }
        if is_helper(role, helper_suffixes) {
            continue;
        }
        characteristic.push(role);
    }
    characteristic
}

fn is_helper<S: AsRef<str>>(role: Role, helper_suffixes: &[S]) -> bool {
    let name = role.simple_name();
    helper_suffixes
        .iter()
        .any(|suffix| !suffix.as_ref().is_empty() && name.ends_with(suffix.as_ref()))
}
