//! Auto-discovered mock factories using the inventory crate
//!
//! Test support crates can ship mock factories for their contracts without
//! every test spelling them out. Each factory is submitted with
//! `inventory::submit!` and picked up by [`MockCatalog::discover`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use wired::{MockHandle, MockRegistration, Role};
//!
//! inventory::submit! {
//!     MockRegistration::new(
//!         "null-mailer",
//!         || Role::of::<dyn Mailer>(),
//!         || MockHandle::new::<dyn Mailer>(Rc::new(NullMailer)),
//!     )
//! }
//! ```
//!
//! [`MockCatalog::discover`]: crate::MockCatalog::discover

use tracing::debug;

use crate::registry::MockHandle;
use crate::role::Role;

/// A mock factory descriptor collected via inventory.
pub struct MockRegistration {
    /// Name used in logs and diagnostics
    pub name: &'static str,

    /// The role the produced mock stands in for
    pub role: fn() -> Role,

    /// Builds a fresh mock
    pub factory: fn() -> MockHandle,
}

impl MockRegistration {
    pub const fn new(
        name: &'static str,
        role: fn() -> Role,
        factory: fn() -> MockHandle,
    ) -> Self {
        Self {
            name,
            role,
            factory,
        }
    }
}

inventory::collect!(MockRegistration);

/// All submitted mock factories, ordered by name.
pub fn discovered_mocks() -> Vec<&'static MockRegistration> {
    let mut registrations: Vec<&MockRegistration> =
        inventory::iter::<MockRegistration>().collect();
    registrations.sort_by_key(|r| r.name);
    debug!("Discovered {} mock registrations via inventory", registrations.len());
    registrations
}

/// Get the count of discovered mock factories.
pub fn discovered_mock_count() -> usize {
    inventory::iter::<MockRegistration>().count()
}

/// List all discovered mock factory names.
pub fn list_discovered_mocks() -> Vec<&'static str> {
    discovered_mocks().into_iter().map(|r| r.name).collect()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::config::{Config, MockCatalog};

    trait Archive {}
    struct NullArchive;
    impl Archive for NullArchive {}

    inventory::submit! {
        MockRegistration::new(
            "test-archive",
            || Role::of::<dyn Archive>(),
            || MockHandle::new::<dyn Archive>(Rc::new(NullArchive)),
        )
    }

    #[test]
    fn test_discovered_mocks_include_test() {
        let names = list_discovered_mocks();
        assert!(
            names.contains(&"test-archive"),
            "Should discover test-archive registration"
        );
        assert!(discovered_mock_count() >= 1);
    }

    #[test]
    fn test_catalog_discovers_submitted_factories() {
        let catalog = MockCatalog::new().discover();
        let role = Role::of::<dyn Archive>();
        assert!(catalog.contains(&role));
        assert_eq!(catalog.mock(&role).unwrap().role(), role);
    }
}
