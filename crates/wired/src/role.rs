//! Role identity
//!
//! A role is the lookup key of the container: either a concrete type or a
//! contract (`dyn Trait`). Roles compare by [`TypeId`] only, so two roles are
//! the same exactly when they describe the very same type.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A type used as a lookup key for a dependency slot.
#[derive(Clone, Copy)]
pub struct Role {
    id: TypeId,
    name: &'static str,
}

impl Role {
    /// Role of the given type. Use `Role::of::<dyn Trait>()` for contracts.
    pub fn of<R: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<R>(),
            name: type_name::<R>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Type name without module path, `dyn ` prefix or generic arguments
    pub fn simple_name(&self) -> &'static str {
        simple_name(self.name)
    }
}

impl PartialEq for Role {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Role {}

impl Hash for Role {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Role").field(&self.name).finish()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

/// Reduce a `std::any::type_name` rendering to the bare type identifier.
///
/// `dyn my_crate::service::ThingListener + Send` becomes `ThingListener`,
/// `my_crate::Repo<my_crate::User>` becomes `Repo`.
pub fn simple_name(full: &'static str) -> &'static str {
    let trimmed = full.strip_prefix("dyn ").unwrap_or(full);
    let head = trimmed
        .split(|c| c == '<' || c == ' ' || c == '+')
        .next()
        .unwrap_or(trimmed);
    head.rsplit("::").next().unwrap_or(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    trait ThingListener {}
    struct Repo<T>(T);

    #[test]
    fn test_roles_compare_by_type_identity() {
        assert_eq!(Role::of::<String>(), Role::of::<String>());
        assert_ne!(Role::of::<String>(), Role::of::<dyn ThingListener>());
        assert_ne!(Role::of::<Repo<u8>>(), Role::of::<Repo<u16>>());
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(Role::of::<dyn ThingListener>().simple_name(), "ThingListener");
        assert_eq!(Role::of::<Repo<String>>().simple_name(), "Repo");
        assert_eq!(Role::of::<String>().simple_name(), "String");
        assert_eq!(simple_name("dyn a::b::Thing + Send"), "Thing");
    }
}
